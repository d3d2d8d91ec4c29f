//! Flujo completo para una historia: obtener, generar y publicar.

use log::info;
use thiserror::Error;

use crate::clients::{StorySource, TestManagement};
use crate::error::AppError;
use crate::generator::TestCaseGenerator;
use crate::models::{Story, SyncReport, TestCase};
use crate::publish::publish_case;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Story not found")]
    StoryNotFound,

    #[error("No test cases generated")]
    NoTestCases,

    #[error("No project key configured")]
    NoProject,

    #[error(transparent)]
    Upstream(#[from] AppError),
}

pub struct Orchestrator<'a> {
    stories: &'a dyn StorySource,
    generator: &'a TestCaseGenerator,
    tests: &'a dyn TestManagement,
    project_key: Option<&'a str>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        stories: &'a dyn StorySource,
        generator: &'a TestCaseGenerator,
        tests: &'a dyn TestManagement,
        project_key: Option<&'a str>,
    ) -> Self {
        Self {
            stories,
            generator,
            tests,
            project_key,
        }
    }

    /// Obtiene la historia, genera sus casos y los publica uno a uno.
    pub fn process(
        &self,
        story_key: &str,
        project_id: Option<&str>,
    ) -> Result<SyncReport, ProcessError> {
        let story = self.fetch(story_key)?;
        let project = self.project(project_id)?;

        let test_cases = self.generator.generate(&story);
        if test_cases.is_empty() {
            return Err(ProcessError::NoTestCases);
        }

        Ok(self.publish(&project, &story, &test_cases))
    }

    /// Publica casos ya generados (p. ej. editados por el usuario) para la historia.
    pub fn publish_cases(
        &self,
        story_key: &str,
        test_cases: &[TestCase],
        project_id: Option<&str>,
    ) -> Result<SyncReport, ProcessError> {
        let story = self.fetch(story_key)?;
        let project = self.project(project_id)?;
        Ok(self.publish(&project, &story, test_cases))
    }

    fn fetch(&self, story_key: &str) -> Result<Story, ProcessError> {
        self.stories
            .fetch_story(story_key)?
            .ok_or(ProcessError::StoryNotFound)
    }

    /// La clave configurada tiene prioridad sobre el proyecto de la petición
    fn project(&self, project_id: Option<&str>) -> Result<String, ProcessError> {
        self.project_key
            .or(project_id)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or(ProcessError::NoProject)
    }

    fn publish(&self, project: &str, story: &Story, test_cases: &[TestCase]) -> SyncReport {
        let outcomes = test_cases
            .iter()
            .map(|tc| publish_case(self.tests, project, &story.id, tc))
            .collect();

        let report = SyncReport {
            story_key: story.key.clone(),
            outcomes,
        };
        info!(
            "{}: {} de {} casos creados y vinculados",
            report.story_key,
            report.created_keys().len(),
            test_cases.len()
        );
        report
    }
}
