//! Historical and live record sources and their wall-clock-paced replayers.
//!
//! [`source::load_historical`] and [`source::load_live`] turn a CSV file into
//! [`replay_record::Record`]s; [`HistoricalReplayer`] and [`LiveReplayer`] drive them onto a
//! [`replay_queue::Queue`] under independent pause/resume/stop control, matching the
//! engine's mode-switching contract.

mod control;
mod error;
mod historical;
mod live;
mod source;

pub use control::ReplayControl;
pub use error::RecordSourceError;
pub use historical::HistoricalReplayer;
pub use live::LiveReplayer;
pub use source::{load_historical, load_live};
