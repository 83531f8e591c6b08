//! Advisory checks for assembled definitions
//!
//! Building a document never runs these. They are offered to whoever loads a
//! definition for execution, so malformed documents can be rejected up front.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::errors::{PerftestError, Result};
use crate::model::{Session, Test, TestDefinition};

/// A single problem found in a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Name of the test containing the problem
    pub test: String,
    /// Slash-separated path to the offending entity within the test
    pub location: String,
    pub reason: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "[{}] {}", self.test, self.reason)
        } else {
            write!(f, "[{}] {}: {}", self.test, self.location, self.reason)
        }
    }
}

impl TestDefinition {
    /// Collect every issue in the document
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let issues: Vec<ValidationIssue> = self.tests.iter().flat_map(check_test).collect();
        for issue in &issues {
            warn!(%issue, "Test definition issue");
        }
        issues
    }

    /// Fail on the first issue found
    pub fn ensure_valid(&self) -> Result<()> {
        match self.validate().into_iter().next() {
            Some(issue) => Err(PerftestError::Validation {
                test: issue.test,
                reason: if issue.location.is_empty() {
                    issue.reason
                } else {
                    format!("{}: {}", issue.location, issue.reason)
                },
            }),
            None => Ok(()),
        }
    }
}

fn check_test(test: &Test) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut report = |location: String, reason: String| {
        issues.push(ValidationIssue {
            test: test.name.clone(),
            location,
            reason,
        });
    };

    if test.name.trim().is_empty() {
        report(String::new(), "test name is empty".to_string());
    }

    let mut client_names = HashSet::new();
    for client in &test.clients {
        if client.name.trim().is_empty() {
            report(String::new(), "client name is empty".to_string());
        } else if !client_names.insert(client.name.as_str()) {
            report(String::new(), format!("duplicate client name '{}'", client.name));
        }

        for connection in &client.connections {
            let connection_path = format!("{}/{}", client.name, connection.name);
            if connection.factory.trim().is_empty() {
                report(connection_path.clone(), "connection factory is empty".to_string());
            }
            for session in &connection.sessions {
                let session_path = format!("{}/{}", connection_path, session.session_name);
                for reason in check_session(session) {
                    report(session_path.clone(), reason);
                }
            }
        }
    }

    issues
}

fn check_session(session: &Session) -> Vec<String> {
    let mut reasons = Vec::new();

    let mut producer_names = HashSet::new();
    for producer in &session.producers {
        if !producer_names.insert(producer.name.as_str()) {
            reasons.push(format!("duplicate producer name '{}'", producer.name));
        }
        if producer.destination_name.trim().is_empty() {
            reasons.push(format!("producer '{}' has no destination", producer.name));
        }
    }

    let mut consumer_names = HashSet::new();
    for consumer in &session.consumers {
        if !consumer_names.insert(consumer.name.as_str()) {
            reasons.push(format!("duplicate consumer name '{}'", consumer.name));
        }
        if consumer.destination_name.trim().is_empty() {
            reasons.push(format!("consumer '{}' has no destination", consumer.name));
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Client, Connection, Consumer, Producer};

    fn client(name: &str, session: Session) -> Client {
        Client::new(name)
            .with_connection(Connection::new("connection1", "connectionfactory").with_session(session))
    }

    #[test]
    fn test_valid_definition_has_no_issues() {
        let definition = TestDefinition::new().with_test(
            Test::new("t")
                .with_client(client(
                    "producer",
                    Session::new("session1").with_producer(Producer::new("Producer", "topic", 10)),
                ))
                .with_client(client(
                    "consumer",
                    Session::new("session1").with_consumer(Consumer::new("Consumer", "topic", true, 10)),
                )),
        );

        assert!(definition.validate().is_empty());
        assert!(definition.ensure_valid().is_ok());
    }

    #[test]
    fn test_duplicate_client_names_detected() {
        let definition = TestDefinition::new().with_test(
            Test::new("t")
                .with_client(Client::new("same"))
                .with_client(Client::new("same")),
        );

        let issues = definition.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].reason, "duplicate client name 'same'");

        let err = definition.ensure_valid().unwrap_err();
        assert!(matches!(err, PerftestError::Validation { ref test, .. } if test == "t"));
    }

    #[test]
    fn test_session_level_issues_located() {
        let session = Session::new("session1")
            .with_consumer(Consumer::new("c", "topic", true, 10))
            .with_consumer(Consumer::new("c", "", true, 10));
        let definition = TestDefinition::new().with_test(Test::new("t").with_client(client("cl", session)));

        let issues = definition.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.location == "cl/connection1/session1"));
        assert_eq!(
            issues[0].to_string(),
            "[t] cl/connection1/session1: duplicate consumer name 'c'"
        );
    }

    #[test]
    fn test_same_names_in_different_sessions_allowed() {
        let definition = TestDefinition::new().with_test(
            Test::new("t")
                .with_client(client("a", Session::new("session1").with_consumer(Consumer::new("c", "d", true, 1))))
                .with_client(client("b", Session::new("session1").with_consumer(Consumer::new("c", "d", true, 1)))),
        );

        assert!(definition.validate().is_empty());
    }
}
