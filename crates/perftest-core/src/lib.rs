//! Performance Test Definition Core
//!
//! Declarative description of messaging performance tests: which clients,
//! connections, sessions, producers and consumers a test harness should
//! instantiate against a destination, and under which parameter iterations.
//!
//! Besides the schema, the crate provides the replication generator used to
//! mint many symmetric participants from a single authored template.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod document;
pub mod errors;
pub mod model;
pub mod replicate;
pub mod scenarios;
pub mod validation;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use document::DocumentFormat;
pub use errors::{PerftestError, Result};
pub use model::{
    Client, Connection, Consumer, DeliveryMode, Iteration, Producer, Session, Test,
    TestDefinition,
};
pub use replicate::{checked_count, replicate, replicate_value, Replicator, DEFAULT_PLACEHOLDER};
pub use scenarios::{topic_persistence, TopicPersistenceConfig, TOPIC_PERSISTENCE_TEST};
pub use validation::ValidationIssue;
