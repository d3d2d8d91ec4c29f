//! Servidor HTTP
//!
//! Expone el flujo de historias a casos de prueba como endpoints JSON.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use tower_http::cors::CorsLayer;

use crate::clients::{AttachmentSink, GeminiBackend, JiraClient, StorySource, TestManagement, ZephyrClient};
use crate::config::AppConfig;
use crate::generator::TestCaseGenerator;
use crate::orchestrator::Orchestrator;

/// Estado compartido por los handlers; inmutable durante la vida del proceso
pub struct AppState {
    pub stories: Arc<dyn StorySource>,
    pub attachments: Arc<dyn AttachmentSink>,
    pub generator: TestCaseGenerator,
    pub tests: Arc<dyn TestManagement>,
    pub project_key: Option<String>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> crate::error::Result<Self> {
        let jira = Arc::new(JiraClient::new(config.jira.clone())?);
        let gemini = Arc::new(GeminiBackend::new(config.gemini.clone())?);
        let zephyr = Arc::new(ZephyrClient::new(config.zephyr.clone())?);

        if config.zephyr.api_token.is_none() {
            warn!("ZEPHYR_API_TOKEN no está configurado; las llamadas a Zephyr Scale irán sin autenticación");
        }

        Ok(Self {
            stories: jira.clone(),
            attachments: jira,
            generator: TestCaseGenerator::new(gemini, config.gemini.include_steps),
            tests: zephyr,
            project_key: config.zephyr.project_key.clone(),
        })
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(
            self.stories.as_ref(),
            &self.generator,
            self.tests.as_ref(),
            self.project_key.as_deref(),
        )
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/fetch_story", post(handlers::fetch_story))
        .route("/generate_tests", post(handlers::generate_tests))
        .route("/publish_tests", post(handlers::publish_tests))
        .route("/create_zephyr_tests", post(handlers::create_zephyr_tests))
        .route("/create_zephyr_tests_ui", post(handlers::create_zephyr_tests_ui))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Servidor escuchando en http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
