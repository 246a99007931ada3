//! Storage abstractions and implementations.
//!
//! Trait definitions live in [`traits`]; [`memory::MemoryStore`] is the
//! bundled in-memory backend. Persistent database backends are expected to
//! implement the same traits out of tree.

pub mod errors;
pub mod memory;
pub mod traits;

pub use errors::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use traits::{
    ArticleStore, BaseStore, ClusterStore, OpportunityStore, ScoreStore, SearchStore,
};
