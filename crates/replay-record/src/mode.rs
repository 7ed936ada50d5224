use serde::{Deserialize, Serialize};
use std::fmt;

/// Which producer an [`crate::Envelope`] originated from.
///
/// Carried on the envelope itself rather than tracked by the consumer, so a message keeps
/// its provenance even after the engine has since switched modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Historical,
    Live,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Historical => f.write_str("historical"),
            Mode::Live => f.write_str("live"),
        }
    }
}
