//! The achievement engine.
//!
//! One engine instance owns one registry, one counter-store handle, and one
//! event manager. Bind achievements while the engine is still exclusively
//! owned (`bind` takes `&mut self`), then share it — typically behind an
//! `Arc` — for the trigger phase. With the registry frozen, `trigger`,
//! `decr`, and `progress` take `&self` and need no engine-side locking:
//! crossing correctness rests on the store's atomic increment, not on
//! mutual exclusion here.
//!
//! ```
//! use achievements::prelude::*;
//! use std::sync::Arc;
//!
//! let mut engine = Engine::new(["fitness"], Arc::new(MemoryStore::new()));
//! engine.bind("fitness", "ran_5k", 3).unwrap();
//! let engine = Arc::new(engine);
//!
//! for _ in 0..2 {
//!     assert!(!engine.trigger("fitness", "a1", "ran_5k").unwrap().unlocked_now);
//! }
//! let third = engine.trigger("fitness", "a1", "ran_5k").unwrap();
//! assert!(third.unlocked_now);
//! assert_eq!(third.value, 3);
//! ```

use crate::errors::{EngineError, EngineResult};
use crate::events::{EngineEvent, EventManager, EventReceiver};
use crate::key::CounterKey;
use crate::registry::AchievementRegistry;
use crate::store::CounterStore;
use crate::types::{Achievement, AchievementProgress, BindRecord, TriggerResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for constructing an engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Contexts this engine accepts; fixed for the engine's lifetime
    pub contexts: Vec<String>,

    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            contexts: Vec::new(),
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Create a config over a set of contexts
    pub fn new<I, S>(contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contexts: contexts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Add a context
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.contexts.push(context.into());
        self
    }

    /// Set the event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

/// Orchestrates registry lookups, counter-key construction, store calls,
/// and threshold-crossing evaluation.
pub struct Engine {
    registry: AchievementRegistry,
    store: Arc<dyn CounterStore>,
    events: EventManager,
}

impl Engine {
    /// Create an engine over a fixed context set and a store handle
    pub fn new<I, S>(contexts: I, store: Arc<dyn CounterStore>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(EngineConfig::new(contexts), store)
    }

    /// Create an engine from a full configuration
    pub fn with_config(config: EngineConfig, store: Arc<dyn CounterStore>) -> Self {
        Self {
            registry: AchievementRegistry::new(config.contexts),
            store,
            events: EventManager::new(config.event_capacity),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Binding (startup phase, exclusive ownership)
    // ═══════════════════════════════════════════════════════════

    /// Bind an achievement with a counter threshold.
    ///
    /// See [`AchievementRegistry::bind`] for the failure modes.
    pub fn bind(
        &mut self,
        context: impl Into<String>,
        name: impl Into<String>,
        threshold: u64,
    ) -> EngineResult<Achievement> {
        let achievement = self.registry.bind(context, name, threshold)?;
        self.events.emit(EngineEvent::bound(&achievement));
        Ok(achievement)
    }

    /// Bind an ordered sequence of achievement-like records, fail-fast.
    pub fn bind_all<I, R>(&mut self, records: I) -> EngineResult<Vec<Achievement>>
    where
        I: IntoIterator<Item = R>,
        R: BindRecord,
    {
        let mut bound = Vec::new();
        for record in records {
            bound.push(self.bind(record.context(), record.name(), record.threshold())?);
        }
        Ok(bound)
    }

    /// Look up a bound achievement
    pub fn lookup(&self, context: &str, name: &str) -> Option<&Achievement> {
        self.registry.lookup(context, name)
    }

    /// The registry this engine owns
    pub fn registry(&self) -> &AchievementRegistry {
        &self.registry
    }

    // ═══════════════════════════════════════════════════════════
    // Triggering (shared phase, &self)
    // ═══════════════════════════════════════════════════════════

    /// Record one occurrence of an agent action and report whether the
    /// increment crossed the achievement's threshold.
    ///
    /// The achievement is resolved before any store mutation, so a trigger
    /// against an unbound (context, name) fails with `UnboundAchievement`
    /// and leaves every counter untouched. On success exactly one durable
    /// increment has happened.
    ///
    /// The crossing test is the inequality
    /// `previous_value < threshold <= new_value`, not an equality check:
    /// each concurrent caller gets its own (previous, new) pair from the
    /// atomic increment, so exactly one caller per crossing observes
    /// `unlocked_now`, even when the counter jumps past the threshold
    /// between one caller's observations.
    pub fn trigger(&self, context: &str, agent_id: &str, name: &str) -> EngineResult<TriggerResult> {
        let achievement = self
            .registry
            .lookup(context, name)
            .ok_or_else(|| EngineError::unbound_achievement(context, name))?;
        let threshold = achievement.threshold;

        let key = CounterKey::build(context, agent_id, name)?;
        let value = self.store.increment(&key)?;
        let previous_value = value - 1;

        let unlocked_now = previous_value < threshold as i64 && value >= threshold as i64;

        self.events
            .emit(EngineEvent::triggered(context, name, agent_id, value));
        if unlocked_now {
            self.events.emit(EngineEvent::unlocked(
                context, name, agent_id, value, threshold,
            ));
        }

        Ok(TriggerResult {
            previous_value,
            value,
            threshold,
            unlocked_now,
        })
    }

    /// Corrective decrement of an agent's counter.
    ///
    /// No crossing is evaluated: crossing detection is one-directional,
    /// defined only for counters increasing toward a threshold. Decrementing
    /// back under a threshold does not re-lock anything — the engine keeps
    /// no unlocked flag — but a later trigger that re-crosses reports
    /// `unlocked_now` again. Returns the new counter value.
    pub fn decr(&self, context: &str, agent_id: &str, name: &str) -> EngineResult<i64> {
        if self.registry.lookup(context, name).is_none() {
            return Err(EngineError::unbound_achievement(context, name));
        }

        let key = CounterKey::build(context, agent_id, name)?;
        let value = self.store.decrement(&key)?;

        self.events
            .emit(EngineEvent::decremented(context, name, agent_id, value));
        Ok(value)
    }

    /// Point-read an agent's progress toward an achievement. No mutation.
    pub fn progress(
        &self,
        context: &str,
        agent_id: &str,
        name: &str,
    ) -> EngineResult<AchievementProgress> {
        let achievement = self
            .registry
            .lookup(context, name)
            .ok_or_else(|| EngineError::unbound_achievement(context, name))?;
        let threshold = achievement.threshold;

        let key = CounterKey::build(context, agent_id, name)?;
        let value = self.store.get(&key)?;

        Ok(AchievementProgress {
            value,
            threshold,
            unlocked: value >= threshold as i64,
        })
    }

    // ═══════════════════════════════════════════════════════════
    // Observability
    // ═══════════════════════════════════════════════════════════

    /// Subscribe to engine events
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Get recent engine events, most recent first
    pub fn recent_events(&self, limit: usize) -> Vec<EngineEvent> {
        self.events.recent(limit)
    }
}
