//! In-memory achievement registry.
//!
//! The registry maps (context, name) to a bound threshold. It is populated
//! once at startup and read-only afterwards, which is what makes the engine
//! safe for unsynchronized concurrent `trigger` calls.

use crate::errors::{EngineError, EngineResult};
use crate::types::{Achievement, BindRecord};
use std::collections::{HashMap, HashSet};

/// Registry of bound achievements for one engine instance.
#[derive(Debug, Clone)]
pub struct AchievementRegistry {
    /// Configured contexts; fixed at construction
    contexts: HashSet<String>,

    /// Bound achievements keyed by (context, name)
    achievements: HashMap<(String, String), Achievement>,
}

impl AchievementRegistry {
    /// Create a registry over a fixed set of contexts
    pub fn new<I, S>(contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contexts: contexts.into_iter().map(Into::into).collect(),
            achievements: HashMap::new(),
        }
    }

    /// Bind an achievement with a counter threshold.
    ///
    /// Fails with `InvalidContext` for a context outside the configured set,
    /// `InvalidThreshold` for a zero threshold, and `DuplicateAchievement`
    /// when (context, name) is already bound — re-binding is an error, never
    /// a silent overwrite, so an accidental double registration cannot drift
    /// an existing threshold.
    pub fn bind(
        &mut self,
        context: impl Into<String>,
        name: impl Into<String>,
        threshold: u64,
    ) -> EngineResult<Achievement> {
        let (context, name) = (context.into(), name.into());

        if !self.contexts.contains(&context) {
            return Err(EngineError::invalid_context(context));
        }
        if threshold == 0 {
            return Err(EngineError::invalid_threshold(context, name));
        }
        if self.achievements.contains_key(&(context.clone(), name.clone())) {
            return Err(EngineError::duplicate_achievement(context, name));
        }

        let achievement = Achievement::new(context.clone(), name.clone(), threshold);
        self.achievements.insert((context, name), achievement.clone());
        Ok(achievement)
    }

    /// Bind an ordered sequence of achievement-like records.
    ///
    /// Fail-fast: stops at the first binding error and surfaces it, leaving
    /// previously bound entries in place (each successful bind is
    /// independently valid). Returns the achievements bound by this call.
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

    /// Pure in-memory lookup of a bound achievement
    pub fn lookup(&self, context: &str, name: &str) -> Option<&Achievement> {
        self.achievements
            .get(&(context.to_string(), name.to_string()))
    }

    /// Is this context among the configured set?
    pub fn has_context(&self, context: &str) -> bool {
        self.contexts.contains(context)
    }

    /// The configured contexts
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(String::as_str)
    }

    /// Number of bound achievements
    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    /// True if nothing is bound yet
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::types::Achievement;

    #[test]
    fn test_bind_then_lookup() {
        let mut registry = AchievementRegistry::new(["fitness"]);
        registry.bind("fitness", "ran_5k", 3).unwrap();

        let found = registry.lookup("fitness", "ran_5k").unwrap();
        assert_eq!(found.threshold, 3);
        assert!(registry.lookup("fitness", "ran_10k").is_none());
    }

    #[test]
    fn test_bind_unknown_context() {
        let mut registry = AchievementRegistry::new(["social"]);
        let err = registry.bind("combat", "slayer", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidContext);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bind_zero_threshold() {
        let mut registry = AchievementRegistry::new(["social"]);
        let err = registry.bind("social", "ghost", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidThreshold);
    }

    #[test]
    fn test_duplicate_bind_keeps_original_threshold() {
        let mut registry = AchievementRegistry::new(["social"]);
        registry.bind("social", "first_post", 1).unwrap();

        let err = registry.bind("social", "first_post", 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateAchievement);
        assert_eq!(registry.lookup("social", "first_post").unwrap().threshold, 1);
    }

    #[test]
    fn test_same_name_in_two_contexts() {
        let mut registry = AchievementRegistry::new(["social", "combat"]);
        registry.bind("social", "veteran", 100).unwrap();
        registry.bind("combat", "veteran", 50).unwrap();
        assert_eq!(registry.lookup("combat", "veteran").unwrap().threshold, 50);
    }

    #[test]
    fn test_bind_all_fail_fast_keeps_prior_entries() {
        let mut registry = AchievementRegistry::new(["fitness"]);
        let records = vec![
            Achievement::new("fitness", "ran_5k", 3),
            Achievement::new("fitness", "ran_5k", 7), // duplicate
            Achievement::new("fitness", "ran_10k", 5),
        ];

        let err = registry.bind_all(records).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateAchievement);

        // First entry survived, third was never reached
        assert_eq!(registry.lookup("fitness", "ran_5k").unwrap().threshold, 3);
        assert!(registry.lookup("fitness", "ran_10k").is_none());
    }

    #[test]
    fn test_bind_all_tuples() {
        let mut registry = AchievementRegistry::new(["social"]);
        let bound = registry
            .bind_all([("social", "first_post", 1), ("social", "prolific", 100)])
            .unwrap();
        assert_eq!(bound.len(), 2);
        assert_eq!(registry.len(), 2);
    }
}
