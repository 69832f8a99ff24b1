pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profiles", get(handlers::handle_list_profiles))
        .route("/api/v1/screen", post(handlers::handle_screen))
        .route("/api/v1/screen/upload", post(handlers::handle_screen_upload))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::scoring::screener::RuleBasedScreener;
    use crate::scoring::tables::ScoringTables;

    const BOUNDARY: &str = "screener-test-boundary";

    fn test_app() -> Router {
        let mut config = Config::from_lookup(|key| match key {
            "SCREENER_EVALUATION_DATE" => Some("2024-06-15".to_string()),
            _ => None,
        })
        .unwrap();
        let screener = Arc::new(RuleBasedScreener::new(
            Arc::new(ScoringTables::builtin().unwrap()),
            config.evaluation_date,
        ));
        config.decision_policy = crate::calibrate_policy(&config, screener.as_ref()).unwrap();
        build_router(AppState { config, screener })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(file_name: &str, contents: &[u8], profile: Option<&str>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(profile) = profile {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"position_profile\"\r\n\r\n{profile}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/screen/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "rule_based");
    }

    #[tokio::test]
    async fn test_list_profiles_marks_default() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profiles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let profiles = body["profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 4);
        let default: Vec<&Value> = profiles.iter().filter(|p| p["is_default"] == true).collect();
        assert_eq!(default.len(), 1);
        assert_eq!(default[0]["name"], "software_engineer");
    }

    #[tokio::test]
    async fn test_screen_text() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/screen",
                json!({
                    "text": "Senior Software Engineer with 8 years of experience in Python, AWS, and Docker. PhD in Computer Science from MIT. AWS Certified.",
                    "position_profile": "software_engineer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["backend"], "rule_based");
        // 58.2 of a reachable 80: review band is [56, 64]
        assert_eq!(body["decision"], "review");
        assert!(body["screening_id"].as_str().is_some());
        assert_eq!(body["result"]["breakdown"]["education"]["score"], 15.0);
        assert_eq!(body["result"]["breakdown"]["experience"]["score"], 21.0);
    }

    #[tokio::test]
    async fn test_screen_strong_resume_is_accepted() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/screen",
                json!({
                    "text": "Principal engineer with 25 years of experience. PhD from Stanford. \
                             Previously at Google. AWS Certified. Won an award. Cut costs by 40%. \
                             Python, Java, JavaScript, AWS, Docker, SQL, Kubernetes.",
                    "position_profile": "software_engineer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"]["breakdown"]["total"], 80.0);
        assert_eq!(body["decision"], "accept");
    }

    #[tokio::test]
    async fn test_screen_uses_default_profile() {
        let response = test_app()
            .oneshot(post_json("/api/v1/screen", json!({ "text": "python developer" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"]["profile"], "software_engineer");
    }

    #[tokio::test]
    async fn test_screen_unknown_profile_is_400() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/screen",
                json!({ "text": "python developer", "position_profile": "astronaut" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_screen_empty_text_is_400() {
        let response = test_app()
            .oneshot(post_json("/api/v1/screen", json!({ "text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_txt() {
        let response = test_app()
            .oneshot(multipart_upload(
                "cv.txt",
                b"DevOps engineer. 5 years experience with AWS, Docker, Kubernetes.",
                Some("devops"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"]["profile"], "devops");
        assert_eq!(body["result"]["breakdown"]["skills"]["focus_bonus_applied"], true);
    }

    #[tokio::test]
    async fn test_upload_unsupported_format_is_422() {
        let response = test_app()
            .oneshot(multipart_upload("cv.odt", b"whatever", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_upload_corrupt_docx_is_422() {
        let response = test_app()
            .oneshot(multipart_upload("cv.docx", b"not a zip archive", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
