//! Event emission for observability.
//!
//! The engine emits standardized events a host can subscribe to for
//! monitoring and for delivering unlock notifications to end users.
//! Events are best-effort observability: the authoritative unlock decision
//! is the `TriggerResult` returned to the caller, never the event stream.

use crate::types::Achievement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Unique event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt_{}", self.0)
    }
}

/// Event types the engine emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventType {
    /// An achievement was bound into the registry.
    AchievementBound {
        context: String,
        name: String,
        threshold: u64,
    },

    /// A trigger incremented an agent's counter.
    AchievementTriggered {
        context: String,
        name: String,
        agent_id: String,
        value: i64,
    },

    /// A trigger's increment crossed the threshold.
    AchievementUnlocked {
        context: String,
        name: String,
        agent_id: String,
        value: i64,
        threshold: u64,
    },

    /// A corrective decrement was applied to an agent's counter.
    CounterDecremented {
        context: String,
        name: String,
        agent_id: String,
        value: i64,
    },
}

/// Event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Unique event ID.
    pub id: EventId,

    /// Event type and data.
    #[serde(flatten)]
    pub event_type: EventType,

    /// Timestamp.
    pub timestamp: DateTime<Utc>,
}

impl EngineEvent {
    /// Create a new event.
    pub fn new(event_type: EventType) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            timestamp: Utc::now(),
        }
    }

    /// The context this event occurred in.
    pub fn context(&self) -> &str {
        match &self.event_type {
            EventType::AchievementBound { context, .. }
            | EventType::AchievementTriggered { context, .. }
            | EventType::AchievementUnlocked { context, .. }
            | EventType::CounterDecremented { context, .. } => context,
        }
    }

    // Event constructors

    pub fn bound(achievement: &Achievement) -> Self {
        Self::new(EventType::AchievementBound {
            context: achievement.context.clone(),
            name: achievement.name.clone(),
            threshold: achievement.threshold,
        })
    }

    pub fn triggered(
        context: impl Into<String>,
        name: impl Into<String>,
        agent_id: impl Into<String>,
        value: i64,
    ) -> Self {
        Self::new(EventType::AchievementTriggered {
            context: context.into(),
            name: name.into(),
            agent_id: agent_id.into(),
            value,
        })
    }

    pub fn unlocked(
        context: impl Into<String>,
        name: impl Into<String>,
        agent_id: impl Into<String>,
        value: i64,
        threshold: u64,
    ) -> Self {
        Self::new(EventType::AchievementUnlocked {
            context: context.into(),
            name: name.into(),
            agent_id: agent_id.into(),
            value,
            threshold,
        })
    }

    pub fn decremented(
        context: impl Into<String>,
        name: impl Into<String>,
        agent_id: impl Into<String>,
        value: i64,
    ) -> Self {
        Self::new(EventType::CounterDecremented {
            context: context.into(),
            name: name.into(),
            agent_id: agent_id.into(),
            value,
        })
    }
}

/// Filter for subscribing to events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Filter by context.
    pub context: Option<String>,

    /// Only unlock events.
    pub unlocks_only: bool,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn unlocks_only(mut self) -> Self {
        self.unlocks_only = true;
        self
    }

    /// Check if an event matches this filter.
    pub fn matches(&self, event: &EngineEvent) -> bool {
        if let Some(ctx) = &self.context {
            if event.context() != ctx {
                return false;
            }
        }

        if self.unlocks_only && !matches!(event.event_type, EventType::AchievementUnlocked { .. }) {
            return false;
        }

        true
    }
}

/// Event receiver (broadcast channel).
pub type EventReceiver = broadcast::Receiver<EngineEvent>;

/// Event sender (broadcast channel).
pub type EventSender = broadcast::Sender<EngineEvent>;

/// Helper struct for managing event emission.
pub struct EventManager {
    sender: EventSender,
    recent: std::sync::Mutex<Vec<EngineEvent>>,
    max_recent: usize,
}

impl EventManager {
    /// Create a new event manager.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            recent: std::sync::Mutex::new(Vec::new()),
            max_recent: 100,
        }
    }

    /// Emit an event.
    pub fn emit(&self, event: EngineEvent) {
        // Store in recent
        if let Ok(mut recent) = self.recent.lock() {
            recent.push(event.clone());
            if recent.len() > self.max_recent {
                recent.remove(0);
            }
        }

        // Broadcast (ignore errors if no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Get recent events, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<EngineEvent> {
        match self.recent.lock() {
            Ok(recent) => recent.iter().rev().take(limit).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = EngineEvent::unlocked("fitness", "ran_5k", "a1", 3, 3);
        assert!(matches!(
            event.event_type,
            EventType::AchievementUnlocked { .. }
        ));
        assert_eq!(event.context(), "fitness");
    }

    #[test]
    fn test_event_filter() {
        let unlock = EngineEvent::unlocked("fitness", "ran_5k", "a1", 3, 3);
        let trigger = EngineEvent::triggered("fitness", "ran_5k", "a1", 1);

        let filter = EventFilter::new().in_context("fitness").unlocks_only();
        assert!(filter.matches(&unlock));
        assert!(!filter.matches(&trigger));

        let other = EventFilter::new().in_context("social");
        assert!(!other.matches(&unlock));
    }

    #[test]
    fn test_event_manager_recent() {
        let manager = EventManager::new(16);

        manager.emit(EngineEvent::triggered("fitness", "ran_5k", "a1", 1));
        manager.emit(EngineEvent::triggered("fitness", "ran_5k", "a1", 2));

        let recent = manager.recent(10);
        assert_eq!(recent.len(), 2);
        // Most recent first
        assert!(matches!(
            recent[0].event_type,
            EventType::AchievementTriggered { value: 2, .. }
        ));
    }

    #[test]
    fn test_event_manager_broadcast() {
        let manager = EventManager::new(16);
        let mut rx = manager.subscribe();

        manager.emit(EngineEvent::triggered("fitness", "ran_5k", "a1", 1));

        let event = rx.try_recv().unwrap();
        assert!(matches!(
            event.event_type,
            EventType::AchievementTriggered { .. }
        ));
    }

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::bound(&crate::types::Achievement::new("social", "first_post", 1));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("achievement_bound"));
    }
}
