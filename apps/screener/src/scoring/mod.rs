//! Rule-based scoring core.
//!
//! raw text → {skills, experience, education, bonus} → aggregate → `ScreeningResult`
//!
//! Every sub-scorer is a pure function over normalized text and the read-only
//! `ScoringTables`; none of them can fail. Only profile lookup can.

pub mod aggregate;
pub mod bonus;
pub mod education;
pub mod experience;
pub mod params;
pub mod screener;
pub mod skills;
pub mod tables;
pub mod terms;

pub use screener::{RuleBasedScreener, Screener};
pub use tables::ScoringTables;
