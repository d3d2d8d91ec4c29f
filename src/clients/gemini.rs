use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};

const SERVICE: &str = "Gemini";

/// Modelo generativo de una sola vuelta: recibe un prompt y devuelve texto libre
pub trait LlmBackend: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Cliente de la API `generateContent` de Gemini
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("story_test_generator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http(SERVICE, e))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

impl LlmBackend for GeminiBackend {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!("POST {} ({} caracteres de prompt)", self.endpoint(), prompt.len());

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AppError::http(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!("Gemini devolvió {}: {}", status, body);
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().map_err(|e| AppError::http(SERVICE, e))?;
        response_text(&json)
    }
}

/// Texto de la primera candidata: `candidates[0].content.parts[0].text`
pub fn response_text(json: &Value) -> Result<String> {
    json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::response(SERVICE, "no text in first candidate"))
}
