//! Engine error type
//!
//! The per-substep pipeline never fails. Only the edges of the engine
//! (bundle/settings parsing, grid addressing from the host) return
//! `Result<T, EngineError>`.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// Grid cell coordinates are outside the partition.
    CellOutOfBounds {
        i: u32,
        j: u32,
        nx: u32,
        ny: u32,
    },
    /// Material id is not present in the registry.
    UnknownMaterial { id: u16 },
    /// A JSON document could not be parsed.
    Parse { message: String },
    /// A material bundle or settings document is well-formed but invalid.
    InvalidConfiguration { reason: String },
    /// Operation requires edit mode but a run is active.
    SimulationRunning,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds { i, j, nx, ny } => {
                write!(f, "cell ({i}, {j}) outside {nx}x{ny} grid")
            }
            Self::UnknownMaterial { id } => write!(f, "unknown material id {id}"),
            Self::Parse { message } => write!(f, "parse error: {message}"),
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::SimulationRunning => write!(f, "grid is locked while a simulation is running"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse { message: e.to_string() }
    }
}
