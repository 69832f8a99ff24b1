use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::CandidateDocument;
use crate::scoring::aggregate::ScreeningResult;
use crate::screening::decision::Decision;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    pub text: String,
    /// Falls back to the configured default profile.
    pub position_profile: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub screening_id: Uuid,
    pub backend: String,
    pub decision: Decision,
    pub result: ScreeningResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub name: String,
    pub display_name: String,
    pub required_skills: Vec<String>,
    pub keyword_count: usize,
    pub is_default: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileInfo>,
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(State(state): State<AppState>) -> Json<ProfileListResponse> {
    let profiles = state
        .screener
        .profiles()
        .into_iter()
        .map(|p| ProfileInfo {
            name: p.name.clone(),
            display_name: p.display_name.clone(),
            required_skills: p.required_skills.clone(),
            keyword_count: p.keywords.len(),
            is_default: p.name == state.config.default_profile,
        })
        .collect();
    Json(ProfileListResponse { profiles })
}

/// POST /api/v1/screen
/// Scores already-extracted text.
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(req): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let profile = req
        .position_profile
        .unwrap_or_else(|| state.config.default_profile.clone());

    let result = state.screener.score(&req.text, &profile)?;
    Ok(Json(respond(&state, result)))
}

/// POST /api/v1/screen/upload
/// Multipart form: `file` (pdf, docx or txt) and optional `position_profile`.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut profile: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file field has no file name".into()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                upload = Some((file_name, bytes));
            }
            Some("position_profile") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid position_profile: {e}")))?;
                if !value.trim().is_empty() {
                    profile = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let profile = profile.unwrap_or_else(|| state.config.default_profile.clone());
    info!(file = %file_name, size = bytes.len(), profile = %profile, "Screening upload");

    let document = CandidateDocument::new(file_name, bytes)?;
    let screener = state.screener.clone();
    let result = tokio::task::spawn_blocking(move || screener.score_document(&document, &profile))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in upload: {e}")))??;

    Ok(Json(respond(&state, result)))
}

fn respond(state: &AppState, result: ScreeningResult) -> ScreenResponse {
    ScreenResponse {
        screening_id: Uuid::new_v4(),
        backend: state.screener.backend().to_string(),
        decision: state.config.decision_policy.decide(result.composite()),
        result,
    }
}
