//! Standard error types for the achievements engine.
//!
//! One error type covers the whole surface: binding failures, trigger
//! failures, key-construction failures, and store transport failures.
//! Every error carries a machine-readable [`ErrorCode`] so hosts can
//! branch on the failure class without parsing messages.
//!
//! # Propagation rules
//!
//! - Binding errors surface synchronously from `bind`/`bind_all`; a failed
//!   bulk bind leaves already-applied entries in place.
//! - `UnboundAchievement` is detected before any store mutation.
//! - `StoreUnavailable` is surfaced as-is. The engine never retries
//!   internally; retry/backoff belongs to the store adapter or the host.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by engine, registry, key, and store operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct EngineError {
    /// Error code (machine-readable)
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,

    /// Additional context (for debugging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,

    /// Is this recoverable by the caller?
    pub recoverable: bool,
}

impl EngineError {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            recoverable: code.is_typically_recoverable(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let context = self.context.get_or_insert_with(HashMap::new);
        if let Ok(v) = serde_json::to_value(value) {
            context.insert(key.into(), v);
        }
        self
    }

    /// Set recoverable flag
    pub fn recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    // ═══════════════════════════════════════════════════════════
    // Common error constructors
    // ═══════════════════════════════════════════════════════════

    /// Context is not among the engine's configured contexts
    pub fn invalid_context(context: impl Into<String>) -> Self {
        let context = context.into();
        Self::new(
            ErrorCode::InvalidContext,
            format!("Context {:?} is not registered with this engine", context),
        )
        .with_context("context", context)
    }

    /// (context, name) is already bound
    pub fn duplicate_achievement(context: impl Into<String>, name: impl Into<String>) -> Self {
        let (context, name) = (context.into(), name.into());
        Self::new(
            ErrorCode::DuplicateAchievement,
            format!("Achievement {:?} is already bound in context {:?}", name, context),
        )
        .with_context("context", context)
        .with_context("name", name)
    }

    /// Trigger against a (context, name) that was never bound
    pub fn unbound_achievement(context: impl Into<String>, name: impl Into<String>) -> Self {
        let (context, name) = (context.into(), name.into());
        Self::new(
            ErrorCode::UnboundAchievement,
            format!("No achievement {:?} bound in context {:?}", name, context),
        )
        .with_context("context", context)
        .with_context("name", name)
    }

    /// The counter store cannot be reached or timed out
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Empty or ambiguous component fed to counter-key construction
    pub fn invalid_key_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidKeyInput, message)
    }

    /// Non-positive threshold fed to `bind`
    pub fn invalid_threshold(context: impl Into<String>, name: impl Into<String>) -> Self {
        let (context, name) = (context.into(), name.into());
        Self::new(
            ErrorCode::InvalidThreshold,
            format!(
                "Achievement {:?} in context {:?} requires a positive threshold",
                name, context
            ),
        )
    }
}

/// Machine-readable error codes for every failure class of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// `bind` used a context outside the engine's configured set
    InvalidContext,

    /// `bind` hit an already-bound (context, name)
    DuplicateAchievement,

    /// `trigger`/`decr` against an unknown (context, name)
    UnboundAchievement,

    /// Transport/timeout failure talking to the counter store
    StoreUnavailable,

    /// Empty or ambiguous counter-key component
    InvalidKeyInput,

    /// Threshold was zero (thresholds must be positive)
    InvalidThreshold,
}

impl ErrorCode {
    /// Check if this error is typically recoverable
    pub fn is_typically_recoverable(&self) -> bool {
        match self {
            Self::StoreUnavailable => true, // Can retry at the host's discretion
            Self::InvalidContext | Self::InvalidKeyInput | Self::InvalidThreshold => true,
            Self::UnboundAchievement => true, // Can bind and re-trigger
            Self::DuplicateAchievement => true, // Can use the existing binding
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidContext => "INVALID_CONTEXT",
            Self::DuplicateAchievement => "DUPLICATE_ACHIEVEMENT",
            Self::UnboundAchievement => "UNBOUND_ACHIEVEMENT",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::InvalidKeyInput => "INVALID_KEY_INPUT",
            Self::InvalidThreshold => "INVALID_THRESHOLD",
        };
        write!(f, "{}", s)
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
