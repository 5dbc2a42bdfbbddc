//! Associative recall: learns which memory files are used together.
//!
//! - [`session`]: which paths each session has touched
//! - [`index`]: the symmetric co-visitation graph
//! - [`persistence`]: atomic JSON storage of the graph
//! - [`recommend`]: ranked, content-free recommendations
//! - [`recorder`]: the orchestrator called by every file operation

pub mod error;
pub mod index;
pub mod persistence;
pub mod recommend;
pub mod recorder;
pub mod session;
pub mod types;

pub use error::RecallError;
pub use index::CoVisitationIndex;
pub use persistence::IndexStore;
pub use recorder::{MemoryAccessRecorder, RecallStats, RecorderOptions};
pub use session::SessionTracker;
pub use types::{AccessKind, CoVisitGraph, Recommendation};
