//! Crash-atomic checkpoint persistence for the historical replayer.
//!
//! Written after every successful enqueue (or spill) so a restarted replayer can resume at
//! `last_index + 1` instead of replaying from the beginning. Loaded once at startup; never
//! touched by consumers.

mod checkpoint;
mod error;
mod store;

pub use checkpoint::Checkpoint;
pub use error::CheckpointError;
pub use store::CheckpointStore;
