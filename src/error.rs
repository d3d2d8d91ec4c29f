use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errores de las llamadas a servicios externos y de los archivos locales
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error calling {service}: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {service}: {message}")]
    Response {
        service: &'static str,
        message: String,
    },

    #[error("Invalid issue id '{0}'")]
    InvalidIssueId(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn http(service: &'static str, source: reqwest::Error) -> Self {
        AppError::Http { service, source }
    }

    pub fn response(service: &'static str, message: impl Into<String>) -> Self {
        AppError::Response {
            service,
            message: message.into(),
        }
    }
}
