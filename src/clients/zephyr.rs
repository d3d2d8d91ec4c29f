use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ZephyrConfig;
use crate::error::{AppError, Result};
use crate::models::TestStep;

const SERVICE: &str = "Zephyr Scale";

/// Sistema de gestión de pruebas donde se publican los casos
pub trait TestManagement: Send + Sync {
    /// Crea el caso y devuelve su clave (p. ej. `QA-T12`)
    fn create_test_case(&self, project_key: &str, name: &str, objective: &str) -> Result<String>;

    fn add_test_step(&self, case_key: &str, step: &TestStep) -> Result<()>;

    fn link_issue(&self, case_key: &str, issue_id: i64) -> Result<()>;
}

pub struct ZephyrClient {
    config: ZephyrConfig,
    client: Client,
}

impl ZephyrClient {
    pub fn new(config: ZephyrConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("story_test_generator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http(SERVICE, e))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path);
        debug!(
            "POST {} {}",
            url,
            serde_json::to_string(body).unwrap_or_default()
        );

        let resp = self
            .authorized(self.client.post(&url))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .map_err(|e| AppError::http(SERVICE, e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| AppError::http(SERVICE, e))?;
        debug!("{} {} -> {}", url, status, text);

        if !status.is_success() {
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AppError::response(SERVICE, e.to_string()))
    }
}

impl TestManagement for ZephyrClient {
    fn create_test_case(&self, project_key: &str, name: &str, objective: &str) -> Result<String> {
        let body = json!({
            "projectKey": project_key,
            "name": name,
            "objective": objective,
        });
        let created = self.post_json("/testcases", &body)?;
        created_key(&created)
    }

    fn add_test_step(&self, case_key: &str, step: &TestStep) -> Result<()> {
        self.post_json(&format!("/testcases/{}/teststeps", case_key), step)?;
        Ok(())
    }

    fn link_issue(&self, case_key: &str, issue_id: i64) -> Result<()> {
        let body = json!({ "issueId": issue_id });
        self.post_json(&format!("/testcases/{}/links/issues", case_key), &body)?;
        Ok(())
    }
}

fn created_key(json: &Value) -> Result<String> {
    json["key"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::response(SERVICE, "created test case has no key"))
}
