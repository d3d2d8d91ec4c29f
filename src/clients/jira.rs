use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};
use reqwest::blocking::{multipart, Client};
use serde_json::Value;

use crate::config::JiraConfig;
use crate::error::{AppError, Result};
use crate::models::{Story, NO_DESCRIPTION, NO_SUMMARY};
use crate::utils::adf_to_plain_text;

const SERVICE: &str = "Jira";

/// Fuente de historias de usuario
pub trait StorySource: Send + Sync {
    /// `Ok(None)` cuando el gestor responde con un estado distinto de 2xx
    fn fetch_story(&self, key: &str) -> Result<Option<Story>>;
}

/// Destino de adjuntos de una incidencia
pub trait AttachmentSink: Send + Sync {
    /// `Ok(true)` solo si la subida respondió 200 o 201
    fn upload_attachment(&self, issue_key: &str, file_name: &str, bytes: Vec<u8>) -> Result<bool>;
}

pub struct JiraClient {
    config: JiraConfig,
    client: Client,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("story_test_generator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http(SERVICE, e))?;
        Ok(Self { config, client })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/3/issue/{}", self.config.base_url, key)
    }

    /// Cabecera Basic construida a mano para la subida de adjuntos
    fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.config.email, self.config.api_token);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl StorySource for JiraClient {
    fn fetch_story(&self, key: &str) -> Result<Option<Story>> {
        let url = self.issue_url(key);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("expand", "renderedFields")])
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| AppError::http(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Jira devolvió {} para la historia {}", status, key);
            return Ok(None);
        }

        let json: Value = resp.json().map_err(|e| AppError::http(SERVICE, e))?;
        Ok(Some(parse_issue(&json, key)))
    }
}

impl AttachmentSink for JiraClient {
    fn upload_attachment(&self, issue_key: &str, file_name: &str, bytes: Vec<u8>) -> Result<bool> {
        let url = format!("{}/attachments", self.issue_url(issue_key));

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| AppError::http(SERVICE, e))?;
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(&url)
            .header("X-Atlassian-Token", "no-check")
            .header("Authorization", self.basic_auth_header())
            .multipart(form)
            .send()
            .map_err(|e| AppError::http(SERVICE, e))?;

        let status = resp.status().as_u16();
        if status == 200 || status == 201 {
            info!("Adjunto {} subido a {}", file_name, issue_key);
            Ok(true)
        } else {
            let body = resp.text().unwrap_or_default();
            warn!("Jira rechazó el adjunto {} ({}): {}", file_name, status, body);
            Ok(false)
        }
    }
}

/// Convierte la respuesta de `GET /issue/{key}` en una historia
pub fn parse_issue(json: &Value, requested_key: &str) -> Story {
    let fields = &json["fields"];

    let summary = fields["summary"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY)
        .to_string();

    let description = json["renderedFields"]["description"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    let id = match &json["id"] {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    };

    Story {
        id,
        key: json["key"].as_str().unwrap_or(requested_key).to_string(),
        summary,
        description,
        plain_description: adf_to_plain_text(&fields["description"]),
    }
}
