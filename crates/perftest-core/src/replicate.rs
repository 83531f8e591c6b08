//! Template replication
//!
//! Expands one template into `count` independent copies, replacing every
//! occurrence of a placeholder token inside string values with the copy's
//! index. Used to mint many symmetric participants (typically consuming
//! clients) from a single authored template; the caller appends the result
//! to whichever collection it is extending.
//!
//! The substitution walks any nested mapping/sequence/scalar value, so it is
//! not tied to a particular entity type. Typed entities are routed through
//! [`serde_json::Value`] and back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{PerftestError, Result};

/// Placeholder token used by the bundled definitions
pub const DEFAULT_PLACEHOLDER: &str = "__INDEX";

// ----------------------------------------------------------------------------
// Replicator
// ----------------------------------------------------------------------------

/// Replication settings: which token to substitute and where numbering starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replicator {
    placeholder: String,
    first_index: u64,
}

impl Default for Replicator {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            first_index: 0,
        }
    }
}

impl Replicator {
    /// Create a replicator numbering copies from 0
    pub fn new(placeholder: impl Into<String>) -> Result<Self> {
        let placeholder = placeholder.into();
        if placeholder.is_empty() {
            return Err(PerftestError::InvalidArgument(
                "placeholder must not be empty".to_string(),
            ));
        }
        Ok(Self {
            placeholder,
            first_index: 0,
        })
    }

    /// Number copies from `first_index` instead of 0 (e.g. 1 for display names)
    pub fn starting_at(mut self, first_index: u64) -> Self {
        self.first_index = first_index;
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn first_index(&self) -> u64 {
        self.first_index
    }

    /// Expand a generic nested value into `count` substituted copies
    ///
    /// Fails with [`PerftestError::InvalidArgument`] when the last index would
    /// not fit in a `u64`.
    pub fn replicate_value(&self, count: usize, template: &Value) -> Result<Vec<Value>> {
        self.check_index_range(count)?;

        debug!(
            count,
            placeholder = %self.placeholder,
            first_index = self.first_index,
            "Replicating template"
        );

        Ok((0..count as u64)
            .map(|offset| {
                let index = (self.first_index + offset).to_string();
                substitute(template, &self.placeholder, &index)
            })
            .collect())
    }

    fn check_index_range(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        match self.first_index.checked_add(count as u64 - 1) {
            Some(_) => Ok(()),
            None => Err(PerftestError::InvalidArgument(format!(
                "{} copies starting at index {} overflow the index range",
                count, self.first_index
            ))),
        }
    }

    /// Expand a typed template into `count` substituted copies
    ///
    /// Fails with [`PerftestError::Construction`] when the template cannot be
    /// represented as a nested value or a substituted copy no longer fits `T`.
    /// Nothing is returned on failure.
    pub fn replicate<T>(&self, count: usize, template: &T) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let value = serde_json::to_value(template)
            .map_err(|e| PerftestError::Construction(format!("template is not copyable: {}", e)))?;

        self.replicate_value(count, &value)?
            .into_iter()
            .enumerate()
            .map(|(offset, copy)| {
                serde_json::from_value(copy).map_err(|e| {
                    PerftestError::Construction(format!(
                        "copy {} does not match the template type: {}",
                        self.first_index + offset as u64,
                        e
                    ))
                })
            })
            .collect()
    }
}

// ----------------------------------------------------------------------------
// Free Functions
// ----------------------------------------------------------------------------

/// Expand a typed template into `count` copies numbered from 0
pub fn replicate<T>(count: usize, template: &T, placeholder: &str) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    Replicator::new(placeholder)?.replicate(count, template)
}

/// Expand a generic nested value into `count` copies numbered from 0
pub fn replicate_value(count: usize, template: &Value, placeholder: &str) -> Result<Vec<Value>> {
    Replicator::new(placeholder)?.replicate_value(count, template)
}

/// Convert a signed repeat count, rejecting negative values
///
/// Zero is a valid count and yields no copies.
pub fn checked_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| {
        PerftestError::InvalidArgument(format!("replica count must not be negative, got {}", count))
    })
}

/// Build a fresh value with `placeholder` replaced in every string scalar
///
/// Map keys and non-string scalars are copied as they are.
fn substitute(value: &Value, placeholder: &str, replacement: &str) -> Value {
    match value {
        Value::String(s) if s.contains(placeholder) => {
            Value::String(s.replace(placeholder, replacement))
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute(item, placeholder, replacement))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                map.insert(key.clone(), substitute(entry, placeholder, replacement));
            }
            Value::Object(map)
        }
        other => other.clone(),
    }
}
