pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::grading::handlers as grading;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(sessions::handle_list_roles))
        // Stateless grading
        .route("/api/v1/evaluate", post(grading::handle_evaluate))
        // Session API
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", delete(sessions::handle_delete_session))
        .route(
            "/api/v1/sessions/:id/question",
            get(sessions::handle_next_question),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(sessions::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/transcript",
            post(sessions::handle_push_segment),
        )
        .route(
            "/api/v1/sessions/:id/transcript/stop",
            post(sessions::handle_stop_capture),
        )
        .route(
            "/api/v1/sessions/:id/transcript/submit",
            post(sessions::handle_submit_transcript),
        )
        .route(
            "/api/v1/sessions/:id/result",
            get(sessions::handle_get_result),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(sessions::handle_get_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    const ANSWER: &str = "Situation: When I led the Q3 migration. Task: I needed to cut \
        downtime. Action: I first audited risk, then built a rollback script, then \
        coordinated with three teams. Result: We reduced downtime by 20% and saved $5,000. \
        I learned I should document runbooks earlier next time.";

    fn app() -> Router {
        app_with(Config {
            analysis_delay: Duration::ZERO,
            seed: Some(11),
            ..Config::default()
        })
    }

    fn app_with(config: Config) -> Router {
        build_router(AppState::new(config))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, role: &str, count: usize) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "role": role, "question_count": count })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["rules_version"], crate::grading::rules::RULES_VERSION);
    }

    #[tokio::test]
    async fn test_roles_lists_three_builtin_roles() {
        let (status, body) = call(&app(), Method::GET, "/api/v1/roles", None).await;
        assert_eq!(status, StatusCode::OK);
        let roles = body["roles"].as_array().unwrap();
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0]["role"], "SWE");
        assert_eq!(roles[0]["question_count"], 12);
    }

    #[tokio::test]
    async fn test_evaluate_is_stateless_and_tolerant() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/evaluate",
            Some(json!({
                "answer": ANSWER,
                "question": "Tell me about a time you had to prioritize multiple conflicting deadlines"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["relevance"], "strong");
        assert_eq!(body["scores"]["structure"], 5);
        assert_eq!(body["scores"]["total"], 74);

        let (status, body) = call(&app, Method::POST, "/api/v1/evaluate", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scores"]["clarity"], 1);
    }

    #[tokio::test]
    async fn test_evaluate_accepts_null_fields_and_question_records() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/evaluate",
            Some(json!({ "answer": null, "question": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word_count"], 0);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/evaluate",
            Some(json!({
                "answer": "I found a bug in production, it was my mistake, and I fixed the error.",
                "question": {
                    "id": "q1",
                    "text": "How did you persuade a stakeholder to change course?",
                    "tags": []
                }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["relevance"], "mismatch");
    }

    #[tokio::test]
    async fn test_evaluate_body_language_varies_per_request_when_seeded() {
        let app = app();
        let mut readings = Vec::new();
        for _ in 0..8 {
            let (_, body) = call(
                &app,
                Method::POST,
                "/api/v1/evaluate",
                Some(json!({ "answer": ANSWER, "question": "Why us?" })),
            )
            .await;
            readings.push(body["scores"]["body_language"].clone());
        }
        assert!(readings.iter().any(|r| *r != readings[0]));
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected_and_not_stored() {
        let (status, body) = call(
            &app(),
            Method::POST,
            "/api/v1/sessions",
            Some(json!({ "role": "Designer" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNKNOWN_ROLE");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app();
        let id = create(&app, "SWE", 2).await;
        let base = format!("/api/v1/sessions/{id}");

        let (status, body) = call(&app, Method::GET, &format!("{base}/question"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "question");
        assert_eq!(body["index"], 0);

        let (status, _) = call(&app, Method::GET, &format!("{base}/result"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("{base}/answers"),
            Some(json!({ "answer": ANSWER })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"]["status"], "graded");
        assert_eq!(body["next"]["index"], 1);

        let (_, body) = call(
            &app,
            Method::POST,
            &format!("{base}/answers"),
            Some(json!({ "answer": ANSWER })),
        )
        .await;
        assert_eq!(body["next"]["status"], "session_complete");

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("{base}/answers"),
            Some(json!({ "answer": ANSWER })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "SESSION_COMPLETE");

        let (status, body) = call(&app, Method::GET, &format!("{base}/result"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);

        let (status, body) = call(&app, Method::GET, &format!("{base}/report"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answered"], 2);
        assert_eq!(body["role"], "SWE");

        let (status, _) = call(&app, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = call(&app, Method::GET, &format!("{base}/question"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_short_answer_guard_over_http() {
        let app = app_with(Config {
            analysis_delay: Duration::ZERO,
            min_answer_words: Some(3),
            seed: Some(2),
            ..Config::default()
        });
        let id = create(&app, "product", 1).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/answers"),
            Some(json!({ "answer": "ok" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "SHORT_ANSWER");
    }

    #[tokio::test]
    async fn test_transcript_flow() {
        let app = app();
        let id = create(&app, "Data Analyst", 1).await;
        let base = format!("/api/v1/sessions/{id}/transcript");

        call(
            &app,
            Method::POST,
            &base,
            Some(json!({ "text": "When I joined", "is_final": true })),
        )
        .await;
        let (_, body) = call(
            &app,
            Method::POST,
            &base,
            Some(json!({ "text": "the data team", "is_final": false })),
        )
        .await;
        assert_eq!(body["combined"], "When I joined the data team");

        let (_, body) = call(&app, Method::POST, &format!("{base}/stop"), None).await;
        assert_eq!(body["combined"], "When I joined");

        let (status, body) = call(&app, Method::POST, &format!("{base}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next"]["status"], "session_complete");
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_rejected() {
        let app = app_with(Config {
            analysis_delay: Duration::from_millis(300),
            seed: Some(5),
            ..Config::default()
        });
        let id = create(&app, "SWE", 2).await;
        let uri = format!("/api/v1/sessions/{id}/answers");

        let first = {
            let app = app.clone();
            let uri = uri.clone();
            tokio::spawn(async move {
                call(&app, Method::POST, &uri, Some(json!({ "answer": ANSWER }))).await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (status, body) =
            call(&app, Method::POST, &uri, Some(json!({ "answer": ANSWER }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "ANALYSIS_IN_PROGRESS");

        let (status, _) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/v1/sessions/{}/result", uuid::Uuid::new_v4());
        let (status, _) = call(&app(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
