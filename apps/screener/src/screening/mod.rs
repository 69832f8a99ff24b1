//! Caller-side surfaces over the scoring core: decision policy, batch scan,
//! report rendering and HTTP handlers.

pub mod batch;
pub mod candidate;
pub mod decision;
pub mod handlers;
pub mod report;
