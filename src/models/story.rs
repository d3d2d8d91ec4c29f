use serde::{Deserialize, Serialize};

use super::test_case::lenient_string;

pub const NO_SUMMARY: &str = "No summary available";
pub const NO_DESCRIPTION: &str = "No description available";

/// Historia de usuario leída del gestor de incidencias
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Story {
    /// Identificador numérico de la incidencia, en texto
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub summary: String,
    /// Descripción en HTML
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub plain_description: String,
}

impl Story {
    /// Texto de la descripción que se envía al modelo
    pub fn prompt_description(&self) -> &str {
        if self.plain_description.trim().is_empty() {
            &self.description
        } else {
            &self.plain_description
        }
    }
}
