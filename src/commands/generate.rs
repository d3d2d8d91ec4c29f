use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use colored::*;

use crate::clients::{GeminiBackend, JiraClient, StorySource};
use crate::commands::fetch::print_story;
use crate::config::AppConfig;
use crate::generator::TestCaseGenerator;
use crate::models::{Story, TestCase};
use crate::utils::{save_to_csv, DEFINITIONS_DIR};

/// Obtiene la historia y genera sus casos; `None` si la historia no existe
pub fn fetch_and_generate(config: &AppConfig, key: &str) -> Result<Option<(Story, Vec<TestCase>)>> {
    let jira = JiraClient::new(config.jira.clone())?;
    let Some(story) = jira.fetch_story(key)? else {
        println!("{}", format!("No se encontró la historia {}", key).red());
        return Ok(None);
    };
    print_story(&story);

    let backend = GeminiBackend::new(config.gemini.clone())?;
    let generator = TestCaseGenerator::new(Arc::new(backend), config.gemini.include_steps);

    println!("{}", "Generando casos de prueba...".blue());
    let test_cases = generator.generate(&story);

    Ok(Some((story, test_cases)))
}

/// Genera casos de prueba para una historia y opcionalmente los guarda en `definitions/`
pub fn generate_test_cases(config: &AppConfig, key: &str, save: bool) -> Result<()> {
    let Some((story, test_cases)) = fetch_and_generate(config, key)? else {
        return Ok(());
    };

    if test_cases.is_empty() {
        println!("{}", "No se generaron casos de prueba.".yellow());
        return Ok(());
    }

    print_test_cases(&test_cases);

    if save {
        let path = definition_path(&story.key);
        save_to_csv(&path, &test_cases)?;
        println!(
            "{}",
            format!("Casos de prueba guardados en {}", path.display()).green()
        );
    }

    Ok(())
}

pub fn print_test_cases(test_cases: &[TestCase]) {
    println!("{}", "Casos de prueba generados:".green());
    for test_case in test_cases {
        println!("{}: {}", test_case.id.cyan(), test_case.description);
        for (i, step) in test_case.steps().iter().enumerate() {
            println!("    {}. {}", i + 1, step.step);
            if !step.data.is_empty() {
                println!("       Datos: {}", step.data);
            }
            if !step.result.is_empty() {
                println!("       Resultado esperado: {}", step.result);
            }
        }
    }
    println!();
}

fn definition_path(story_key: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(DEFINITIONS_DIR).join(format!("{}-{}.csv", story_key, timestamp))
}
