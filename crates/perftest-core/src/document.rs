//! Loading and saving test definition documents

use std::path::Path;

use tracing::debug;

use crate::errors::{PerftestError, Result};
use crate::model::TestDefinition;

/// On-disk document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(DocumentFormat::Json),
            Some("toml") => Ok(DocumentFormat::Toml),
            other => Err(PerftestError::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = PerftestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            other => Err(PerftestError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TestDefinition {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Render in the given format
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Json => self.to_json_pretty(),
            DocumentFormat::Toml => self.to_toml_pretty(),
        }
    }

    /// Load a definition, choosing the format from the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let definition = match format {
            DocumentFormat::Json => Self::from_json_str(&content)?,
            DocumentFormat::Toml => Self::from_toml_str(&content)?,
        };
        debug!(
            path = %path.display(),
            tests = definition.tests.len(),
            "Loaded test definition"
        );
        Ok(definition)
    }

    /// Save a definition, choosing the format from the file extension
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = self.render(DocumentFormat::from_path(path)?)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "Saved test definition");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Client, Connection, Consumer, DeliveryMode, Iteration, Session, Test};

    fn sample() -> TestDefinition {
        TestDefinition::new().with_test(
            Test::new("sample")
                .with_iteration(Iteration::new().with_delivery_mode(DeliveryMode::NonPersistent))
                .with_client(
                    Client::new("consumingClient-0").with_connection(
                        Connection::new("connection1", "connectionfactory").with_session(
                            Session::new("session1")
                                .with_consumer(Consumer::new("Consumer-0", "queue", false, 500)),
                        ),
                    ),
                ),
        )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("defs/a.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.js")),
            Err(PerftestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<DocumentFormat>().unwrap(), DocumentFormat::Json);
        assert!("yaml".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_json_text_round_trip() {
        let definition = sample();
        let text = definition.to_json_pretty().unwrap();
        assert_eq!(TestDefinition::from_json_str(&text).unwrap(), definition);
    }

    #[test]
    fn test_toml_text_round_trip() {
        let definition = sample();
        let text = definition.to_toml_pretty().unwrap();
        assert_eq!(TestDefinition::from_toml_str(&text).unwrap(), definition);
    }
}
