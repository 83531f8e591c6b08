//! Test definition schema
//!
//! The document is a strict ownership tree:
//! `TestDefinition -> Test -> {Iteration, Client} -> Connection -> Session -> {Producer, Consumer}`.
//! Every entity is a plain value. Builder methods consume `self` and hand back
//! the extended value, so an assembled document is never edited in place.
//!
//! Keys serialize in camelCase. The underscore-prefixed property names used by
//! older definition files (`_name`, `_clients`, ...) are accepted on load.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::PerftestError;

// ----------------------------------------------------------------------------
// Root Document
// ----------------------------------------------------------------------------

/// Root of a test definition document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    #[serde(alias = "_tests")]
    pub tests: Vec<Test>,
}

impl TestDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test(mut self, test: Test) -> Self {
        self.tests.push(test);
        self
    }

    /// Find a test by name
    pub fn test(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name == name)
    }
}

// ----------------------------------------------------------------------------
// Test and Iterations
// ----------------------------------------------------------------------------

/// A single named test with its parameter variants and participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(alias = "_name")]
    pub name: String,
    /// Parameter variants; the execution engine performs one run per iteration
    #[serde(default, alias = "_iterations")]
    pub iterations: Vec<Iteration>,
    #[serde(default, alias = "_clients")]
    pub clients: Vec<Client>,
}

impl Test {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterations: Vec::new(),
            clients: Vec::new(),
        }
    }

    pub fn with_iteration(mut self, iteration: Iteration) -> Self {
        self.iterations.push(iteration);
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.clients.push(client);
        self
    }

    /// Append clients after the existing ones, preserving their order
    pub fn with_clients<I>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = Client>,
    {
        self.clients.extend(clients);
        self
    }

    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name == name)
    }

    pub fn client_names(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name.as_str()).collect()
    }
}

/// JMS delivery mode, carried on the wire as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeliveryMode {
    NonPersistent,
    Persistent,
}

impl DeliveryMode {
    pub fn code(self) -> u8 {
        match self {
            DeliveryMode::NonPersistent => 1,
            DeliveryMode::Persistent => 2,
        }
    }
}

impl TryFrom<u8> for DeliveryMode {
    type Error = PerftestError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DeliveryMode::NonPersistent),
            2 => Ok(DeliveryMode::Persistent),
            other => Err(PerftestError::InvalidArgument(format!(
                "unknown delivery mode {}, expected 1 or 2",
                other
            ))),
        }
    }
}

impl From<DeliveryMode> for u8 {
    fn from(mode: DeliveryMode) -> Self {
        mode.code()
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::NonPersistent => write!(f, "non-persistent"),
            DeliveryMode::Persistent => write!(f, "persistent"),
        }
    }
}

/// One parameter combination a test is run under
///
/// The well-known parameters get typed fields; anything else the execution
/// engine understands is kept verbatim in `params`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "_deliveryMode")]
    pub delivery_mode: Option<DeliveryMode>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "_durableSubscription"
    )]
    pub durable_subscription: Option<bool>,
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Iteration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = Some(mode);
        self
    }

    pub fn with_durable_subscription(mut self, durable: bool) -> Self {
        self.durable_subscription = Some(durable);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

// ----------------------------------------------------------------------------
// Topology
// ----------------------------------------------------------------------------

/// A logical test participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique within the owning test
    #[serde(alias = "_name")]
    pub name: String,
    #[serde(default, alias = "_connections")]
    pub connections: Vec<Connection>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connections: Vec::new(),
        }
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn producers(&self) -> impl Iterator<Item = &Producer> {
        self.sessions().flat_map(|s| s.producers.iter())
    }

    pub fn consumers(&self) -> impl Iterator<Item = &Consumer> {
        self.sessions().flat_map(|s| s.consumers.iter())
    }

    fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.connections.iter().flat_map(|c| c.sessions.iter())
    }
}

/// A connection opened by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(alias = "_name")]
    pub name: String,
    /// Name of a connection factory resolved by the execution engine
    #[serde(alias = "_factory")]
    pub factory: String,
    #[serde(default, alias = "_sessions")]
    pub sessions: Vec<Session>,
}

impl Connection {
    pub fn new(name: impl Into<String>, factory: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factory: factory.into(),
            sessions: Vec::new(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions.push(session);
        self
    }
}

/// A session holding producers, consumers, or both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "_sessionName")]
    pub session_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "_producers")]
    pub producers: Vec<Producer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "_consumers")]
    pub consumers: Vec<Consumer>,
}

impl Session {
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            producers: Vec::new(),
            consumers: Vec::new(),
        }
    }

    pub fn with_producer(mut self, producer: Producer) -> Self {
        self.producers.push(producer);
        self
    }

    pub fn with_consumer(mut self, consumer: Consumer) -> Self {
        self.consumers.push(consumer);
        self
    }
}

// ----------------------------------------------------------------------------
// Participants
// ----------------------------------------------------------------------------

/// Message producer; durations are in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    #[serde(alias = "_name")]
    pub name: String,
    /// Opaque address, interpreted only by the execution engine
    #[serde(alias = "_destinationName")]
    pub destination_name: String,
    #[serde(alias = "_maximumDuration")]
    pub maximum_duration: u64,
    #[serde(default, skip_serializing_if = "is_zero", alias = "_startDelay")]
    pub start_delay: u64,
}

impl Producer {
    pub fn new(
        name: impl Into<String>,
        destination_name: impl Into<String>,
        maximum_duration: u64,
    ) -> Self {
        Self {
            name: name.into(),
            destination_name: destination_name.into(),
            maximum_duration,
            start_delay: 0,
        }
    }

    pub fn with_start_delay(mut self, start_delay: u64) -> Self {
        self.start_delay = start_delay;
        self
    }
}

/// Message consumer; durations are in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumer {
    #[serde(alias = "_name")]
    pub name: String,
    #[serde(alias = "_destinationName")]
    pub destination_name: String,
    /// Topic (publish/subscribe) rather than queue semantics
    #[serde(alias = "_isTopic")]
    pub is_topic: bool,
    #[serde(alias = "_maximumDuration")]
    pub maximum_duration: u64,
}

impl Consumer {
    pub fn new(
        name: impl Into<String>,
        destination_name: impl Into<String>,
        is_topic: bool,
        maximum_duration: u64,
    ) -> Self {
        Self {
            name: name.into(),
            destination_name: destination_name.into(),
            is_topic,
            maximum_duration,
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
