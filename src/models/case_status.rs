use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado final de un caso publicado en el sistema de gestión de pruebas
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Creado y vinculado a la historia
    Created,
    /// Creado, pero la vinculación con la historia falló
    Unlinked,
    Failed,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Created => write!(f, "✅ Creado"),
            CaseStatus::Unlinked => write!(f, "🔗 Sin vincular"),
            CaseStatus::Failed => write!(f, "❌ Fallido"),
        }
    }
}
