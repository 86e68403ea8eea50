//! Counter key construction.
//!
//! A counter key is the sole durable handle to a counter's prior value, so
//! construction must be deterministic and stable across process restarts:
//! no randomness, no timestamps, fixed delimiter layout.
//!
//! Layout: `"{context}:agent:{agent_id}:{name}"`.

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Deterministic string address of one counter inside the external store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterKey(String);

impl CounterKey {
    /// Build the key for a (context, agent_id, name) triple.
    ///
    /// Rejects empty components, and rejects the `:` delimiter inside
    /// `context` or `name` — with those excluded the mapping is injective:
    /// the context is the segment before the first `:`, the name the segment
    /// after the last `:`, and the middle `agent:{agent_id}` pins the agent
    /// id even when the id itself contains `:`.
    pub fn build(context: &str, agent_id: &str, name: &str) -> EngineResult<Self> {
        if context.is_empty() {
            return Err(EngineError::invalid_key_input("Counter key context is empty"));
        }
        if name.is_empty() {
            return Err(EngineError::invalid_key_input("Counter key name is empty"));
        }
        if agent_id.is_empty() {
            return Err(EngineError::invalid_key_input("Counter key agent id is empty"));
        }
        if context.contains(':') {
            return Err(EngineError::invalid_key_input(format!(
                "Context {:?} contains the key delimiter ':'",
                context
            )));
        }
        if name.contains(':') {
            return Err(EngineError::invalid_key_input(format!(
                "Achievement name {:?} contains the key delimiter ':'",
                name
            )));
        }

        Ok(Self(format!("{}:agent:{}:{}", context, agent_id, name)))
    }

    /// The key as a string slice, for handing to a store client
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CounterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CounterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
