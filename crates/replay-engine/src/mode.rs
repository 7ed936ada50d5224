use std::fmt;

/// Position in the mode-transition table. `Stopped` is terminal: every arrow out of it in
/// the table is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Historical,
    Live,
    Stopped,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineMode::Idle => "idle",
            EngineMode::Historical => "historical",
            EngineMode::Live => "live",
            EngineMode::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
