//! Bounded envelope queue with disk spill.
//!
//! Decouples the historical/live replayers from the mid-price consumers: producers never
//! block indefinitely, and items that cannot be admitted within their timeout are persisted
//! to a spill file instead of being dropped silently.
//!
//! # Example
//!
//! ```
//! use replay_queue::{Queue, QueueConfig, PutOutcome};
//! use std::time::Duration;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let queue = Queue::<u64>::new(QueueConfig::new(4, dir.path())).unwrap();
//!
//! assert_eq!(queue.put(1, Duration::from_millis(10)), PutOutcome::Accepted);
//! assert_eq!(queue.get(Duration::from_millis(10)), Some(1));
//! ```

mod config;
mod error;
mod metrics;
mod queue;
mod spill;

pub use config::QueueConfig;
pub use error::{QueueError, SpillError};
pub use metrics::QueueMetrics;
pub use queue::{PutOutcome, Queue};
pub use spill::{read_spill_file, write_spill_file};
