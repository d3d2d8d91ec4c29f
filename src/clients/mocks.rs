//! Implementaciones en memoria de los servicios externos para las pruebas.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{AttachmentSink, LlmBackend, StorySource, TestManagement};
use crate::error::{AppError, Result};
use crate::models::{Story, TestStep};

#[derive(Default)]
pub struct MockStories {
    pub stories: HashMap<String, Story>,
}

impl MockStories {
    pub fn with(story: Story) -> Self {
        let mut stories = HashMap::new();
        stories.insert(story.key.clone(), story);
        Self { stories }
    }
}

impl StorySource for MockStories {
    fn fetch_story(&self, key: &str) -> Result<Option<Story>> {
        Ok(self.stories.get(key).cloned())
    }
}

pub struct MockLlm {
    pub response: String,
    pub prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl LlmBackend for MockLlm {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

pub struct FailingLlm;

impl LlmBackend for FailingLlm {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(AppError::Status {
            service: "Gemini",
            status: 503,
            body: "overloaded".into(),
        })
    }
}

#[derive(Default)]
pub struct MockAttachments {
    pub accept: bool,
    pub uploads: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MockAttachments {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }
}

impl AttachmentSink for MockAttachments {
    fn upload_attachment(&self, issue_key: &str, file_name: &str, bytes: Vec<u8>) -> Result<bool> {
        self.uploads
            .lock()
            .unwrap()
            .push((issue_key.to_string(), file_name.to_string(), bytes));
        Ok(self.accept)
    }
}

/// Llamada registrada contra el sistema de gestión de pruebas
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        project_key: String,
        name: String,
        objective: String,
    },
    Step {
        case_key: String,
        step: TestStep,
    },
    Link {
        case_key: String,
        issue_id: i64,
    },
}

/// Asigna claves `QA-T1`, `QA-T2`... y falla las llamadas configuradas
#[derive(Default)]
pub struct MockTestManagement {
    pub calls: Mutex<Vec<Call>>,
    /// Índices (desde 0) de las creaciones que deben fallar
    pub fail_creates: Vec<usize>,
    pub fail_links: bool,
    /// Texto de los pasos que deben fallar
    pub fail_steps: Vec<String>,
    pub creates: Mutex<usize>,
}

impl MockTestManagement {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn rejected(status: u16) -> AppError {
        AppError::Status {
            service: "Zephyr Scale",
            status,
            body: "rejected".into(),
        }
    }
}

impl TestManagement for MockTestManagement {
    fn create_test_case(&self, project_key: &str, name: &str, objective: &str) -> Result<String> {
        self.calls.lock().unwrap().push(Call::Create {
            project_key: project_key.into(),
            name: name.into(),
            objective: objective.into(),
        });

        let mut creates = self.creates.lock().unwrap();
        let index = *creates;
        *creates += 1;

        if self.fail_creates.contains(&index) {
            return Err(Self::rejected(400));
        }
        Ok(format!("QA-T{}", index + 1))
    }

    fn add_test_step(&self, case_key: &str, step: &TestStep) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Step {
            case_key: case_key.into(),
            step: step.clone(),
        });
        if self.fail_steps.contains(&step.step) {
            return Err(Self::rejected(500));
        }
        Ok(())
    }

    fn link_issue(&self, case_key: &str, issue_id: i64) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Link {
            case_key: case_key.into(),
            issue_id,
        });
        if self.fail_links {
            return Err(Self::rejected(404));
        }
        Ok(())
    }
}

/// Ejecuta un cliente bloqueante fuera del runtime de las pruebas asíncronas
pub async fn off_runtime<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}
