use serde::{Deserialize, Serialize};

use super::CaseStatus;

/// Resultado de publicar un caso de prueba
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaseOutcome {
    /// Id que traía el caso generado
    pub source_id: String,
    /// Clave asignada por el sistema de gestión de pruebas, si se llegó a crear
    pub key: Option<String>,
    pub status: CaseStatus,
    pub steps_added: usize,
    pub steps_failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CaseOutcome {
    pub fn failed(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            key: None,
            status: CaseStatus::Failed,
            steps_added: 0,
            steps_failed: 0,
            reason: Some(reason.into()),
        }
    }
}

/// Resumen de la sincronización de una historia
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyncReport {
    pub story_key: String,
    pub outcomes: Vec<CaseOutcome>,
}

impl SyncReport {
    /// Claves de los casos creados y vinculados, en orden de procesamiento
    pub fn created_keys(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CaseStatus::Created)
            .filter_map(|o| o.key.clone())
            .collect()
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
