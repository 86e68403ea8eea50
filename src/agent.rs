//! Agent binding facade.
//!
//! Lets a host object that already carries its own identifier trigger
//! achievements without restating the identifier on every call. Pure
//! delegation over a shared [`Engine`] — implemented by composition, so the
//! engine's correctness never depends on the host's object model.

use crate::engine::Engine;
use crate::errors::EngineResult;
use crate::types::{AchievementProgress, TriggerResult};
use std::sync::Arc;

/// Host agent contract: anything that can supply a stable identifier
/// usable inside a counter key.
pub trait Achiever {
    /// The agent's stable identifier. Must be non-empty and deterministic
    /// for the same agent across calls and process restarts.
    fn agent_id(&self) -> String;

    /// Attach this agent to a shared engine.
    fn binding(&self, engine: Arc<Engine>) -> AgentBinding {
        AgentBinding::new(engine, self.agent_id())
    }
}

impl Achiever for str {
    fn agent_id(&self) -> String {
        self.to_string()
    }
}

impl Achiever for String {
    fn agent_id(&self) -> String {
        self.clone()
    }
}

/// A (shared engine, agent id) pair. Cheap to clone; one per host object.
#[derive(Clone)]
pub struct AgentBinding {
    engine: Arc<Engine>,
    agent_id: String,
}

impl AgentBinding {
    /// Bind an agent id to a shared engine
    pub fn new(engine: Arc<Engine>, agent_id: impl Into<String>) -> Self {
        Self {
            engine,
            agent_id: agent_id.into(),
        }
    }

    /// The bound agent id
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The shared engine
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Trigger an achievement for this agent
    pub fn trigger(&self, context: &str, name: &str) -> EngineResult<TriggerResult> {
        self.engine.trigger(context, &self.agent_id, name)
    }

    /// Corrective decrement for this agent
    pub fn decr(&self, context: &str, name: &str) -> EngineResult<i64> {
        self.engine.decr(context, &self.agent_id, name)
    }

    /// This agent's progress toward an achievement
    pub fn progress(&self, context: &str, name: &str) -> EngineResult<AchievementProgress> {
        self.engine.progress(context, &self.agent_id, name)
    }
}
