use anyhow::Result;
use colored::*;

use crate::clients::{JiraClient, StorySource};
use crate::config::AppConfig;
use crate::models::Story;

/// Muestra una historia de Jira
pub fn fetch_story(config: &AppConfig, key: &str) -> Result<()> {
    let jira = JiraClient::new(config.jira.clone())?;

    match jira.fetch_story(key)? {
        Some(story) => print_story(&story),
        None => println!("{}", format!("No se encontró la historia {}", key).red()),
    }

    Ok(())
}

pub fn print_story(story: &Story) {
    println!("{}", format!("{} - {}", story.key, story.summary).green().bold());
    if story.plain_description.is_empty() {
        println!("{}", "(sin descripción)".yellow());
    } else {
        println!("{}", story.plain_description);
    }
    println!();
}
