use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::error;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::models::{lenient_opt_string, lenient_string, Story, TestCase};
use crate::orchestrator::ProcessError;
use crate::publish::publish_csv;

#[derive(Deserialize)]
pub struct FetchStoryRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub story_id: String,
}

#[derive(Deserialize)]
pub struct GenerateTestsRequest {
    pub story: Story,
}

#[derive(Deserialize)]
pub struct PublishTestsRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub story_id: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

#[derive(Deserialize)]
pub struct CreateZephyrRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub story_key: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateZephyrUiRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub story_key: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub project_id: Option<String>,
}

/// Error con cuerpo `{success: false, error}`
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        let status = match err {
            ProcessError::StoryNotFound => StatusCode::NOT_FOUND,
            ProcessError::NoProject => StatusCode::BAD_REQUEST,
            ProcessError::NoTestCases | ProcessError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

/// Ejecuta las llamadas bloqueantes fuera del runtime de tokio
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("Tarea bloqueante abortada: {}", e);
        ApiError::internal("Internal error")
    })
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn fetch_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchStoryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let story = blocking(move || state.stories.fetch_story(&req.story_id)).await?;

    match story {
        Ok(Some(story)) => Ok(Json(json!({ "success": true, "story": story }))),
        Ok(None) => Err(ProcessError::StoryNotFound.into()),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

pub async fn generate_tests(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateTestsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let test_cases = blocking(move || state.generator.generate(&req.story)).await?;

    if test_cases.is_empty() {
        return Err(ApiError::internal("Failed to generate test cases"));
    }
    Ok(Json(json!({ "success": true, "test_cases": test_cases })))
}

pub async fn publish_tests(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PublishTestsRequest>,
) -> Response {
    let story_id = req.story_id.clone();
    let published =
        blocking(move || publish_csv(state.attachments.as_ref(), &req.story_id, &req.test_cases)).await;

    match published {
        Ok(Ok(true)) => Json(json!({
            "success": true,
            "message": format!("Test cases published for story {}", story_id),
        }))
        .into_response(),
        Ok(Ok(false)) => publish_failed(),
        Ok(Err(e)) => {
            error!("{}", e);
            publish_failed()
        }
        Err(e) => e.into_response(),
    }
}

fn publish_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Failed to publish test cases" })),
    )
        .into_response()
}

pub async fn create_zephyr_tests(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateZephyrRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = blocking(move || {
        state
            .orchestrator()
            .process(&req.story_key, req.project_id.as_deref())
    })
    .await??;

    Ok(Json(json!({
        "success": true,
        "created": report.created_keys(),
        "results": report.outcomes,
    })))
}

pub async fn create_zephyr_tests_ui(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateZephyrUiRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let total = req.test_cases.len();
    let report = blocking(move || {
        state
            .orchestrator()
            .publish_cases(&req.story_key, &req.test_cases, req.project_id.as_deref())
    })
    .await??;

    let created_keys = report.created_keys();
    let message = if created_keys.is_empty() {
        "Failed to create test cases in Zephyr Scale".to_string()
    } else {
        format!(
            "Created {} of {} test cases in Zephyr Scale",
            created_keys.len(),
            total
        )
    };

    Ok(Json(json!({
        "success": !created_keys.is_empty(),
        "created": created_keys.len(),
        "created_keys": created_keys,
        "message": message,
        "results": report.outcomes,
    })))
}

#[cfg(test)]
mod tests {
    use super::super::{router, AppState};
    use crate::clients::mocks::{MockAttachments, MockLlm, MockStories, MockTestManagement};
    use crate::generator::TestCaseGenerator;
    use crate::models::Story;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn story() -> Story {
        Story {
            id: "10042".into(),
            key: "PROJ-1".into(),
            summary: "Login".into(),
            description: "<p>Login</p>".into(),
            plain_description: "Login".into(),
        }
    }

    fn state(reply: &str, tests: MockTestManagement, attachments: MockAttachments) -> Arc<AppState> {
        Arc::new(AppState {
            stories: Arc::new(MockStories::with(story())),
            attachments: Arc::new(attachments),
            generator: TestCaseGenerator::new(Arc::new(MockLlm::new(reply)), true),
            tests: Arc::new(tests),
            project_key: Some("QA".into()),
        })
    }

    async fn post(state: Arc<AppState>, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn fetch_story_returns_story() {
        let state = state("[]", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(state, "/fetch_story", json!({"story_id": "PROJ-1"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["story"]["key"], "PROJ-1");
        assert_eq!(body["story"]["plain_description"], "Login");
    }

    #[tokio::test]
    async fn fetch_unknown_story_is_404() {
        let state = state("[]", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(state, "/fetch_story", json!({"story_id": "NOPE-1"})).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Story not found"}));
    }

    #[tokio::test]
    async fn generate_tests_returns_parsed_cases() {
        let state = state(
            r#"```json
[{"id":"TC-1","description":"Login works"}]
```"#,
            MockTestManagement::default(),
            MockAttachments::default(),
        );

        let (status, body) = post(
            state,
            "/generate_tests",
            json!({"story": {"id": "PROJ-1", "summary": "Login", "description": "<p>Login</p>"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "test_cases": [{"id": "TC-1", "description": "Login works"}]})
        );
    }

    #[tokio::test]
    async fn generate_tests_without_cases_is_500() {
        let state = state("nothing", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(state, "/generate_tests", json!({"story": {"summary": "Login"}})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn publish_tests_uploads_attachment() {
        let state = state("[]", MockTestManagement::default(), MockAttachments::accepting());

        let (status, body) = post(
            state,
            "/publish_tests",
            json!({"story_id": "PROJ-1", "test_cases": [{"id": "TC-1", "description": "Login works"}]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Test cases published for story PROJ-1"})
        );
    }

    #[tokio::test]
    async fn rejected_publish_is_500() {
        let state = state("[]", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(state, "/publish_tests", json!({"story_id": "PROJ-1", "test_cases": []})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to publish test cases");
    }

    #[tokio::test]
    async fn create_zephyr_tests_reports_only_created_keys() {
        let tests = MockTestManagement {
            fail_creates: vec![0],
            ..MockTestManagement::default()
        };
        let state = state(
            r#"[{"id":"TC-1","description":"Login works"},{"id":"TC-2","description":"Bad password"}]"#,
            tests,
            MockAttachments::default(),
        );

        let (status, body) = post(
            state,
            "/create_zephyr_tests",
            json!({"story_key": "PROJ-1", "project_id": 10000}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["created"], json!(["QA-T2"]));
        assert_eq!(body["results"][0]["status"], "failed");
        assert_eq!(body["results"][1]["status"], "created");
    }

    #[tokio::test]
    async fn create_zephyr_tests_without_cases() {
        let state = state("no cases", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(state, "/create_zephyr_tests", json!({"story_key": "PROJ-1"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": "No test cases generated"}));
    }

    #[tokio::test]
    async fn create_zephyr_tests_ui_publishes_given_cases() {
        let state = state("[]", MockTestManagement::default(), MockAttachments::default());

        let (status, body) = post(
            state,
            "/create_zephyr_tests_ui",
            json!({
                "story_key": "PROJ-1",
                "project_id": 10000,
                "test_cases": [
                    {"id": "TC-1", "description": "Login works"},
                    {"id": "TC-2", "description": "Bad password"}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["created"], 2);
        assert_eq!(body["created_keys"], json!(["QA-T1", "QA-T2"]));
        assert_eq!(body["message"], "Created 2 of 2 test cases in Zephyr Scale");
    }

    #[tokio::test]
    async fn unknown_story_is_404_even_without_project() {
        let state = Arc::new(AppState {
            stories: Arc::new(MockStories::default()),
            attachments: Arc::new(MockAttachments::default()),
            generator: TestCaseGenerator::new(Arc::new(MockLlm::new("[]")), true),
            tests: Arc::new(MockTestManagement::default()),
            project_key: None,
        });

        let (status, body) = post(state, "/create_zephyr_tests", json!({"story_key": "NOPE-1"})).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Story not found"}));
    }
}
