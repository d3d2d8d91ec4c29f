use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;

use crate::clients::LlmBackend;
use crate::models::{Story, TestCase};
use crate::utils::extract_test_cases;

/// Genera casos de prueba a partir de una historia usando un modelo generativo
pub struct TestCaseGenerator {
    backend: Arc<dyn LlmBackend>,
    include_steps: bool,
}

impl TestCaseGenerator {
    pub fn new(backend: Arc<dyn LlmBackend>, include_steps: bool) -> Self {
        Self {
            backend,
            include_steps,
        }
    }

    /// Devuelve los casos generados, o una lista vacía si el modelo falla o
    /// su respuesta no contiene un arreglo JSON legible.
    pub fn generate(&self, story: &Story) -> Vec<TestCase> {
        let prompt = build_prompt(&story.summary, story.prompt_description(), self.include_steps);

        let text = match self.backend.complete(&prompt) {
            Ok(text) => text,
            Err(e) => {
                warn!("No se pudieron generar casos para {}: {}", story.key, e);
                return Vec::new();
            }
        };

        let mut cases = extract_test_cases(&text);
        for case in cases.iter_mut().filter(|c| c.id.trim().is_empty()) {
            case.id = short_id();
        }

        info!("{} casos de prueba generados para {}", cases.len(), story.key);
        cases
    }
}

fn short_id() -> String {
    let uuid = Uuid::new_v4().to_string();
    format!("TC-{}", uuid.split('-').next().unwrap_or("0"))
}

/// Instrucción para el modelo con el resumen y la descripción de la historia
pub fn build_prompt(summary: &str, description: &str, include_steps: bool) -> String {
    let shape = if include_steps {
        "Return ONLY a JSON array of objects with the fields 'id', 'description' and 'steps', \
         where 'steps' is an array of objects with the fields 'step' (the action), \
         'data' (the test data) and 'result' (the expected result)."
    } else {
        "Return ONLY a JSON array of objects with the fields 'id' and 'description'."
    };

    format!(
        "Generate all possible functional test cases for the following user story. {}\n\n\
         User Story: {}\n\n{}",
        shape, summary, description
    )
}
