//! Bundled test definitions
//!
//! Each scenario is assembled from a literal base topology plus replicated
//! participants appended onto it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Result;
use crate::model::{
    Client, Connection, Consumer, DeliveryMode, Iteration, Producer, Session, Test, TestDefinition,
};
use crate::replicate::{Replicator, DEFAULT_PLACEHOLDER};

// ----------------------------------------------------------------------------
// Topic Persistence
// ----------------------------------------------------------------------------

/// Parameters for the topic persistence scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPersistenceConfig {
    /// Number of consuming clients to generate
    #[serde(default = "default_consumer_count")]
    pub consumer_count: usize,
    /// Maximum duration for every producer and consumer (ms)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Destination address shared by all participants
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Head start given to consumers so they create the topic first (ms)
    #[serde(default = "default_producer_start_delay_ms")]
    pub producer_start_delay_ms: u64,
    #[serde(default = "default_connection_factory")]
    pub connection_factory: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub first_index: u64,
}

fn default_consumer_count() -> usize { 10 }
fn default_duration_ms() -> u64 { 30000 }
fn default_topic() -> String { "topic://amq.topic/?routingkey='testTopic'".to_string() }
fn default_producer_start_delay_ms() -> u64 { 2000 }
fn default_connection_factory() -> String { "connectionfactory".to_string() }
fn default_placeholder() -> String { DEFAULT_PLACEHOLDER.to_string() }

impl Default for TopicPersistenceConfig {
    fn default() -> Self {
        Self {
            consumer_count: default_consumer_count(),
            duration_ms: default_duration_ms(),
            topic: default_topic(),
            producer_start_delay_ms: default_producer_start_delay_ms(),
            connection_factory: default_connection_factory(),
            placeholder: default_placeholder(),
            first_index: 0,
        }
    }
}

impl TopicPersistenceConfig {
    /// Load parameters from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TopicPersistenceConfig = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded topic persistence config");
        Ok(config)
    }
}

/// Name of the test produced by [`topic_persistence`]
pub const TOPIC_PERSISTENCE_TEST: &str = "Topic persistence";

/// One producer publishing to a topic while many consumers subscribe,
/// run once non-persistent/non-durable and once persistent/durable
pub fn topic_persistence(config: &TopicPersistenceConfig) -> Result<TestDefinition> {
    let producing_client = Client::new("producingClient").with_connection(
        Connection::new("connection1", &config.connection_factory).with_session(
            Session::new("session1").with_producer(
                Producer::new("Producer", &config.topic, config.duration_ms)
                    .with_start_delay(config.producer_start_delay_ms),
            ),
        ),
    );

    let consuming_template = Client::new(format!("consumingClient-{}", config.placeholder))
        .with_connection(
            Connection::new("connection1", &config.connection_factory).with_session(
                Session::new("session1").with_consumer(Consumer::new(
                    format!("Consumer-{}", config.placeholder),
                    &config.topic,
                    true,
                    config.duration_ms,
                )),
            ),
        );

    let consuming_clients = Replicator::new(config.placeholder.as_str())?
        .starting_at(config.first_index)
        .replicate(config.consumer_count, &consuming_template)?;

    let test = Test::new(TOPIC_PERSISTENCE_TEST)
        .with_iteration(
            Iteration::new()
                .with_delivery_mode(DeliveryMode::NonPersistent)
                .with_durable_subscription(false),
        )
        .with_iteration(
            Iteration::new()
                .with_delivery_mode(DeliveryMode::Persistent)
                .with_durable_subscription(true),
        )
        .with_client(producing_client)
        .with_clients(consuming_clients);

    info!(
        test = TOPIC_PERSISTENCE_TEST,
        clients = test.clients.len(),
        "Assembled test definition"
    );

    Ok(TestDefinition::new().with_test(test))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let definition = topic_persistence(&TopicPersistenceConfig::default()).unwrap();
        let test = definition.test(TOPIC_PERSISTENCE_TEST).unwrap();

        assert_eq!(test.iterations.len(), 2);
        assert_eq!(test.iterations[0].delivery_mode, Some(DeliveryMode::NonPersistent));
        assert_eq!(test.iterations[0].durable_subscription, Some(false));
        assert_eq!(test.iterations[1].delivery_mode, Some(DeliveryMode::Persistent));
        assert_eq!(test.iterations[1].durable_subscription, Some(true));

        assert_eq!(test.clients.len(), 11);
        assert_eq!(test.clients[0].name, "producingClient");
        assert_eq!(test.clients[1].name, "consumingClient-0");
        assert_eq!(test.clients[10].name, "consumingClient-9");
    }

    #[test]
    fn test_producer_start_delay() {
        let definition = topic_persistence(&TopicPersistenceConfig::default()).unwrap();
        let producer = definition.tests[0].clients[0].producers().next().unwrap();

        assert_eq!(producer.name, "Producer");
        assert_eq!(producer.start_delay, 2000);
        assert_eq!(producer.maximum_duration, 30000);
    }

    #[test]
    fn test_custom_config() {
        let config = TopicPersistenceConfig {
            consumer_count: 3,
            first_index: 1,
            placeholder: "{i}".to_string(),
            ..TopicPersistenceConfig::default()
        };
        let definition = topic_persistence(&config).unwrap();
        let test = &definition.tests[0];

        assert_eq!(
            test.client_names(),
            vec!["producingClient", "consumingClient-1", "consumingClient-2", "consumingClient-3"]
        );
        let consumer = test.clients[3].consumers().next().unwrap();
        assert_eq!(consumer.name, "Consumer-3");
    }

    #[test]
    fn test_zero_consumers() {
        let config = TopicPersistenceConfig {
            consumer_count: 0,
            ..TopicPersistenceConfig::default()
        };
        let definition = topic_persistence(&config).unwrap();
        assert_eq!(definition.tests[0].client_names(), vec!["producingClient"]);
    }

    #[test]
    fn test_config_defaults_from_partial_toml() {
        let config: TopicPersistenceConfig = toml::from_str("consumer_count = 4").unwrap();
        assert_eq!(config.consumer_count, 4);
        assert_eq!(config.duration_ms, 30000);
        assert_eq!(config.placeholder, "__INDEX");
    }

    #[test]
    fn test_generated_definition_is_valid() {
        let definition = topic_persistence(&TopicPersistenceConfig::default()).unwrap();
        assert!(definition.validate().is_empty());
    }
}
