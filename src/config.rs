use std::env;
use thiserror::Error;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ZEPHYR_BASE_URL: &str = "https://api.zephyrscale.smartbear.com/v2";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Pedir también los pasos de cada caso de prueba
    pub include_steps: bool,
}

#[derive(Debug, Clone)]
pub struct ZephyrConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
}

/// Configuración de la aplicación, leída una sola vez al arrancar
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraConfig,
    pub gemini: GeminiConfig,
    pub zephyr: ZephyrConfig,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let jira = JiraConfig {
            base_url: trim_base(required("JIRA_BASE_URL")?),
            email: required("JIRA_EMAIL")?,
            api_token: required("JIRA_API_TOKEN")?,
        };

        let include_steps = match get("GEMINI_INCLUDE_STEPS") {
            Some(value) => parse_bool("GEMINI_INCLUDE_STEPS", &value)?,
            None => true,
        };

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            base_url: trim_base(
                get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            ),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            include_steps,
        };

        let zephyr = ZephyrConfig {
            base_url: trim_base(
                get("ZEPHYR_BASE_URL").unwrap_or_else(|| DEFAULT_ZEPHYR_BASE_URL.to_string()),
            ),
            api_token: get("ZEPHYR_API_TOKEN"),
            project_key: get("ZEPHYR_PROJECT_KEY"),
        };

        let port = match get("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            jira,
            gemini,
            zephyr,
            port,
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
