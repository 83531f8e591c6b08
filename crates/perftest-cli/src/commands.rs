//! Command execution
//!
//! Each command returns the text to print; `main` owns stdout.

use std::path::Path;

use anyhow::{bail, Context, Result};
use perftest_core::{
    checked_count, topic_persistence, DocumentFormat, Replicator, TestDefinition,
    TopicPersistenceConfig,
};
use serde_json::Value;
use tracing::info;

use crate::cli::Commands;

/// Overrides applied on top of the scenario config file
#[derive(Debug, Default)]
pub struct TopicPersistenceOverrides {
    pub consumers: Option<usize>,
    pub duration_ms: Option<u64>,
    pub topic: Option<String>,
    pub first_index: Option<u64>,
}

pub fn execute(command: Commands) -> Result<Option<String>> {
    match command {
        Commands::TopicPersistence {
            config,
            consumers,
            duration_ms,
            topic,
            first_index,
            format,
            output,
        } => {
            let overrides = TopicPersistenceOverrides {
                consumers,
                duration_ms,
                topic,
                first_index,
            };
            let rendered = render_topic_persistence(config.as_deref(), overrides, format.into())?;
            match output {
                Some(path) => {
                    write_output(&path, &rendered)?;
                    Ok(None)
                }
                None => Ok(Some(rendered)),
            }
        }
        Commands::Replicate {
            template,
            count,
            placeholder,
            first_index,
        } => replicate_template(&template, count, &placeholder, first_index).map(Some),
        Commands::Validate { file } => validate_file(&file).map(Some),
    }
}

pub fn render_topic_persistence(
    config_path: Option<&Path>,
    overrides: TopicPersistenceOverrides,
    format: DocumentFormat,
) -> Result<String> {
    let mut config = match config_path {
        Some(path) => {
            info!("Loading scenario parameters from: {}", path.display());
            TopicPersistenceConfig::from_toml_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => TopicPersistenceConfig::default(),
    };

    if let Some(consumers) = overrides.consumers {
        config.consumer_count = consumers;
    }
    if let Some(duration_ms) = overrides.duration_ms {
        config.duration_ms = duration_ms;
    }
    if let Some(topic) = overrides.topic {
        config.topic = topic;
    }
    if let Some(first_index) = overrides.first_index {
        config.first_index = first_index;
    }

    let definition = topic_persistence(&config)?;
    Ok(definition.render(format)?)
}

pub fn replicate_template(
    template_path: &Path,
    count: i64,
    placeholder: &str,
    first_index: u64,
) -> Result<String> {
    let count = checked_count(count)?;
    let content = std::fs::read_to_string(template_path)
        .with_context(|| format!("failed to read template {}", template_path.display()))?;
    let template: Value = serde_json::from_str(&content)
        .with_context(|| format!("template {} is not valid JSON", template_path.display()))?;

    let copies = Replicator::new(placeholder)?
        .starting_at(first_index)
        .replicate_value(count, &template)?;
    info!(count = copies.len(), "Generated copies");

    Ok(serde_json::to_string_pretty(&copies)?)
}

pub fn validate_file(path: &Path) -> Result<String> {
    let definition = TestDefinition::from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    // validate() logs each issue itself
    let issues = definition.validate();
    if !issues.is_empty() {
        bail!("{} issue(s) found in {}", issues.len(), path.display());
    }

    Ok(format!(
        "{}: {} test(s), no issues",
        path.display(),
        definition.tests.len()
    ))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote definition to {}", path.display());
    Ok(())
}
