//! Shared value types for the achievements engine.

use serde::{Deserialize, Serialize};

/// A named milestone bound to a context and a counter threshold.
///
/// Achievements are created through [`bind`](crate::engine::Engine::bind)
/// and never mutated afterwards. The engine holds them in memory for the
/// process lifetime; it does not persist them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Achievement {
    /// Logical grouping this achievement belongs to (e.g. "social")
    pub context: String,

    /// Name, unique within its context
    pub name: String,

    /// Counter value at which the achievement is considered unlocked
    pub threshold: u64,
}

impl Achievement {
    /// Create a new achievement record
    pub fn new(context: impl Into<String>, name: impl Into<String>, threshold: u64) -> Self {
        Self {
            context: context.into(),
            name: name.into(),
            threshold,
        }
    }
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} @ {}", self.context, self.name, self.threshold)
    }
}

/// Outcome of a single `trigger` call.
///
/// `unlocked_now` is true only on the call whose increment moved the
/// counter from below the threshold to at-or-above it. Every earlier and
/// every later trigger for the same triple reports false, even when the
/// counter jumps by more than one between a caller's observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResult {
    /// Counter value before this trigger's increment
    pub previous_value: i64,

    /// Counter value after this trigger's increment
    pub value: i64,

    /// The bound threshold for the triggered achievement
    pub threshold: u64,

    /// Did this call cause the locked-to-unlocked crossing?
    pub unlocked_now: bool,
}

impl TriggerResult {
    /// Is the counter at or past the threshold after this trigger?
    pub fn unlocked(&self) -> bool {
        self.value >= self.threshold as i64
    }

    /// Progress toward the threshold, clamped to `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.threshold == 0 {
            return 1.0;
        }
        (self.value.max(0) as f64 / self.threshold as f64).min(1.0)
    }
}

/// Point-read snapshot of one (context, agent, name) counter.
///
/// Returned by [`progress`](crate::engine::Engine::progress); performs no
/// mutation and detects no crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Current counter value (0 if the counter was never written)
    pub value: i64,

    /// The bound threshold
    pub threshold: u64,

    /// Is the counter currently at or past the threshold?
    pub unlocked: bool,
}

/// Bulk-bind input contract.
///
/// `bind_all` consumes any ordered sequence of records exposing these three
/// accessors, so hosts can feed their own achievement model (an ORM row, a
/// config entry) without converting to [`Achievement`] first.
pub trait BindRecord {
    /// Context the achievement belongs to
    fn context(&self) -> &str;

    /// Achievement name
    fn name(&self) -> &str;

    /// Unlock threshold
    fn threshold(&self) -> u64;
}

impl BindRecord for Achievement {
    fn context(&self) -> &str {
        &self.context
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> u64 {
        self.threshold
    }
}

impl<C: AsRef<str>, N: AsRef<str>> BindRecord for (C, N, u64) {
    fn context(&self) -> &str {
        self.0.as_ref()
    }

    fn name(&self) -> &str {
        self.1.as_ref()
    }

    fn threshold(&self) -> u64 {
        self.2
    }
}

impl<T: BindRecord + ?Sized> BindRecord for &T {
    fn context(&self) -> &str {
        (**self).context()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn threshold(&self) -> u64 {
        (**self).threshold()
    }
}
