use anyhow::Result;
use colored::*;

use crate::clients::JiraClient;
use crate::commands::generate::{fetch_and_generate, print_test_cases};
use crate::config::AppConfig;
use crate::publish::{attachment_name, publish_csv};
use crate::utils::load_from_csv;

/// Publica los casos como adjunto CSV de la historia.
///
/// Si se indica un archivo se publican sus casos; si no, se generan.
pub fn publish_test_cases(config: &AppConfig, key: &str, file: Option<&str>) -> Result<()> {
    let test_cases = match file {
        Some(path) => {
            println!("{}", format!("Cargando casos de prueba de {}", path).blue());
            load_from_csv(path)?
        }
        None => match fetch_and_generate(config, key)? {
            Some((_, test_cases)) => test_cases,
            None => return Ok(()),
        },
    };

    if test_cases.is_empty() {
        println!("{}", "No hay casos de prueba para publicar.".yellow());
        return Ok(());
    }
    print_test_cases(&test_cases);

    let jira = JiraClient::new(config.jira.clone())?;
    if publish_csv(&jira, key, &test_cases)? {
        println!(
            "{}",
            format!("Casos de prueba publicados en {} como {}", key, attachment_name(key)).green()
        );
    } else {
        println!("{}", "No se pudieron publicar los casos de prueba.".red());
    }

    Ok(())
}
