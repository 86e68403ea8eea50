//! # Achievements
//!
//! An abstract, store-backed achievements engine: per-agent counters with
//! threshold-crossing detection.
//!
//! Callers define **contexts** (logical groupings of achievements), **bind**
//! achievements with a name and counter threshold inside a context, and
//! **trigger** counter increments on agent actions. The engine resolves the
//! bound threshold, atomically increments the durable counter, and reports
//! whether this increment crossed the threshold — exactly once per crossing,
//! even under concurrent triggers from multiple threads or processes.
//!
//! The crate provides:
//!
//! - **Engine**: bind / bind_all / trigger / decr / progress orchestration
//! - **CounterStore trait**: the narrow atomic incr/decr/get seam toward any
//!   durable key-value store, with a bundled in-process `MemoryStore`
//! - **CounterKey**: deterministic, collision-free counter addressing
//! - **AgentBinding**: a facade letting host objects trigger with their own
//!   identifier pre-bound
//! - **Events**: a broadcast stream of bound/triggered/unlocked events for
//!   host-side notification delivery
//! - **Errors**: one structured error type with machine-readable codes
//!
//! ## Usage
//!
//! ```
//! use achievements::prelude::*;
//! use std::sync::Arc;
//!
//! let mut engine = Engine::new(["fitness", "social"], Arc::new(MemoryStore::new()));
//! engine.bind("fitness", "ran_5k", 3)?;
//!
//! // Startup is done; share the engine.
//! let engine = Arc::new(engine);
//!
//! engine.trigger("fitness", "runner_7", "ran_5k")?;
//! engine.trigger("fitness", "runner_7", "ran_5k")?;
//! let result = engine.trigger("fitness", "runner_7", "ran_5k")?;
//! assert!(result.unlocked_now);
//! # Ok::<(), achievements::EngineError>(())
//! ```
//!
//! ## What the engine does NOT do
//!
//! It stores only the latest counter value per (context, agent, name) — no
//! event history, no analytics. It keeps no persistent "unlocked" flag:
//! a corrective `decr` below a threshold followed by a fresh crossing
//! reports `unlocked_now` again; hosts wanting once-only semantics layer
//! their own unlocked record on top.

pub mod agent;
pub mod engine;
pub mod errors;
pub mod events;
pub mod key;
pub mod registry;
pub mod store;
pub mod types;

// Re-export everything in prelude for convenience
pub mod prelude {
    pub use crate::agent::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::key::*;
    pub use crate::registry::*;
    pub use crate::store::*;
    pub use crate::types::*;
}

// Also re-export at crate root
pub use prelude::*;
