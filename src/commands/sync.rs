use std::sync::Arc;

use anyhow::Result;
use colored::*;

use crate::clients::{GeminiBackend, JiraClient, ZephyrClient};
use crate::config::AppConfig;
use crate::generator::TestCaseGenerator;
use crate::models::{CaseStatus, SyncReport};
use crate::orchestrator::{Orchestrator, ProcessError};

/// Genera los casos de una historia y los crea en Zephyr Scale
pub fn sync_test_cases(config: &AppConfig, key: &str, project: Option<&str>) -> Result<()> {
    let jira = JiraClient::new(config.jira.clone())?;
    let zephyr = ZephyrClient::new(config.zephyr.clone())?;
    let backend = GeminiBackend::new(config.gemini.clone())?;
    let generator = TestCaseGenerator::new(Arc::new(backend), config.gemini.include_steps);

    let orchestrator = Orchestrator::new(
        &jira,
        &generator,
        &zephyr,
        config.zephyr.project_key.as_deref(),
    );

    println!("{}", format!("Sincronizando {} con Zephyr Scale...", key).blue());

    match orchestrator.process(key, project) {
        Ok(report) => print_report(&report),
        Err(ProcessError::Upstream(e)) => return Err(e.into()),
        Err(e) => println!("{}", e.to_string().red()),
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    for outcome in &report.outcomes {
        let key = outcome.key.as_deref().unwrap_or("-");
        let line = format!("{} [{}] {}", outcome.status, outcome.source_id, key);
        let line = match outcome.status {
            CaseStatus::Created => line.green(),
            CaseStatus::Unlinked => line.yellow(),
            CaseStatus::Failed => line.red(),
        };
        println!("{}", line);

        if outcome.steps_added + outcome.steps_failed > 0 {
            println!(
                "    Pasos: {} añadidos, {} fallidos",
                outcome.steps_added, outcome.steps_failed
            );
        }
        if let Some(reason) = &outcome.reason {
            println!("    {}", reason);
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "Creados: {} | Sin vincular: {} | Fallidos: {}",
            report.count(CaseStatus::Created),
            report.count(CaseStatus::Unlinked),
            report.count(CaseStatus::Failed)
        )
        .bold()
    );
}
