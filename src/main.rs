mod clients;
mod commands;
mod config;
mod error;
mod generator;
mod models;
mod orchestrator;
mod publish;
mod server;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use inquire::{Select, Text};

use crate::commands::{fetch_story, generate_test_cases, publish_test_cases, sync_test_cases};
use crate::config::AppConfig;
use crate::server::AppState;
use crate::utils::get_definition_files;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Iniciar el servidor HTTP
    Serve {
        /// Puerto de escucha (por defecto PORT o 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Mostrar una historia de Jira
    Fetch {
        /// Clave de la historia, p. ej. PROJ-123
        #[arg(short, long)]
        story: String,
    },
    /// Generar casos de prueba para una historia
    Generate {
        #[arg(short, long)]
        story: String,

        /// Guardar los casos en definitions/
        #[arg(long)]
        save: bool,
    },
    /// Publicar los casos como adjunto CSV de la historia
    Publish {
        #[arg(short, long)]
        story: String,

        /// Archivo CSV con los casos; si se omite, se generan
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Crear los casos en Zephyr Scale y vincularlos a la historia
    Sync {
        #[arg(short, long)]
        story: String,

        /// Proyecto de Zephyr si no hay ZEPHYR_PROJECT_KEY
        #[arg(short, long)]
        project: Option<String>,
    },
}

fn main() -> Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Configuración cargada de {}", path.display());
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Error de configuración".red().bold(), e);
            eprintln!("Define JIRA_BASE_URL, JIRA_EMAIL, JIRA_API_TOKEN y GEMINI_API_KEY en el entorno o en un archivo .env");
            std::process::exit(1);
        }
    };

    match &cli.command {
        Some(Commands::Serve { port }) => serve(&config, port.unwrap_or(config.port))?,
        Some(Commands::Fetch { story }) => fetch_story(&config, story)?,
        Some(Commands::Generate { story, save }) => generate_test_cases(&config, story, *save)?,
        Some(Commands::Publish { story, file }) => {
            publish_test_cases(&config, story, file.as_deref())?
        }
        Some(Commands::Sync { story, project }) => {
            sync_test_cases(&config, story, project.as_deref())?
        }
        None => interactive_menu(&config)?,
    }

    Ok(())
}

/// Los clientes bloqueantes se crean y se liberan fuera del runtime de tokio
fn serve(config: &AppConfig, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(Arc::clone(&state), port))
}

/// Menú interactivo si no se proporciona un comando
fn interactive_menu(config: &AppConfig) -> Result<()> {
    let options = vec![
        "Ver historia",
        "Generar casos de prueba",
        "Publicar casos en Jira (CSV)",
        "Crear casos en Zephyr Scale",
        "Iniciar servidor",
        "Salir",
    ];

    let selection = Select::new("¿Qué deseas hacer?", options).prompt();

    match selection {
        Ok("Ver historia") => fetch_story(config, &ask_story()?)?,
        Ok("Generar casos de prueba") => {
            let story = ask_story()?;
            let save = Select::new("¿Guardar los casos en definitions/?", vec!["Sí", "No"])
                .prompt()
                .map(|answer| answer == "Sí")
                .unwrap_or(false);
            generate_test_cases(config, &story, save)?
        }
        Ok("Publicar casos en Jira (CSV)") => {
            let story = ask_story()?;
            let file = select_definition_file()?;
            publish_test_cases(config, &story, file.as_deref())?
        }
        Ok("Crear casos en Zephyr Scale") => {
            let story = ask_story()?;
            let project = match config.zephyr.project_key {
                Some(_) => None,
                None => Some(Text::new("Proyecto de Zephyr Scale:").prompt()?),
            };
            sync_test_cases(config, &story, project.as_deref())?
        }
        Ok("Iniciar servidor") => serve(config, config.port)?,
        _ => println!("¡Hasta pronto!"),
    }

    Ok(())
}

fn ask_story() -> Result<String> {
    let story = Text::new("Clave de la historia (p. ej. PROJ-123):").prompt()?;
    Ok(story.trim().to_string())
}

/// Permite elegir un archivo de definición o generar los casos de nuevo
fn select_definition_file() -> Result<Option<String>> {
    let files = get_definition_files()?;
    if files.is_empty() {
        return Ok(None);
    }

    let generate = "Generar casos nuevos".to_string();
    let mut options = vec![generate.clone()];
    options.extend(files);

    let selection = Select::new("Selecciona los casos a publicar:", options).prompt()?;
    Ok((selection != generate).then_some(selection))
}
