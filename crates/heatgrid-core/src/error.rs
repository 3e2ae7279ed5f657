//! Error types for the heatgrid solver.
//!
//! Three layers: [`ConfigError`] rejects a run before anything is
//! allocated, [`CommError`] reports a transport failure (always fatal),
//! and [`SolveError`] is what a whole run returns.

use std::error::Error;
use std::fmt;

use crate::id::Rank;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a run configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A grid dimension is zero.
    ZeroDimension {
        /// Which axis (`"x"` or `"y"`).
        axis: &'static str,
    },
    /// The iteration count is zero.
    ZeroIterations,
    /// The participant count is zero.
    ZeroParticipants,
    /// The per-participant thread count is zero.
    ZeroThreads,
    /// A rank outside `[0, participants)` was asked for its partition.
    RankOutOfRange {
        /// The offending rank.
        rank: Rank,
        /// Number of participants.
        participants: usize,
    },
    /// `rank · grid_x` overflows, so the partition bounds are undefined.
    PartitionOverflow {
        /// Global X extent in cells.
        grid_x: usize,
        /// Number of participants.
        participants: usize,
    },
    /// The halo-padded grid `(width+2)·(height+2)` overflows `usize`.
    CellCountOverflow {
        /// Global X extent in cells.
        width: usize,
        /// Global Y extent in cells.
        height: usize,
    },
    /// A physical extent is NaN, infinite, zero, or negative.
    InvalidExtent {
        /// Which axis (`"x"` or `"y"`).
        axis: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The convergence tolerance is NaN, infinite, zero, or negative.
    InvalidTolerance {
        /// The invalid value.
        value: f64,
    },
    /// The derived time step violates `dt·(dx⁻² + dy⁻²) ≤ 0.5`.
    Unstable {
        /// The computed stability number.
        stability: f64,
    },
    /// The shared-memory thread pool could not be built.
    ThreadPool {
        /// Description from the pool builder.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { axis } => write!(f, "grid_{axis} must be at least 1"),
            Self::ZeroIterations => write!(f, "iteration count must be at least 1"),
            Self::ZeroParticipants => write!(f, "participant count must be at least 1"),
            Self::ZeroThreads => write!(f, "thread count must be at least 1"),
            Self::RankOutOfRange { rank, participants } => {
                write!(f, "rank {rank} out of range for {participants} participants")
            }
            Self::PartitionOverflow {
                grid_x,
                participants,
            } => write!(
                f,
                "partitioning grid_x={grid_x} across {participants} participants overflows"
            ),
            Self::CellCountOverflow { width, height } => {
                write!(f, "cell count of a {width}x{height} grid overflows usize")
            }
            Self::InvalidExtent { axis, value } => {
                write!(f, "extent_{axis} must be finite and positive, got {value}")
            }
            Self::InvalidTolerance { value } => {
                write!(f, "tolerance must be finite and positive, got {value}")
            }
            Self::Unstable { stability } => write!(
                f,
                "time step violates the explicit stability bound: dt·(dx⁻²+dy⁻²) = {stability} > 0.5"
            ),
            Self::ThreadPool { reason } => write!(f, "thread pool: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── CommError ──────────────────────────────────────────────────────

/// Failures of the message-passing transport.
///
/// None of these are recovered locally: the participant that sees one
/// aborts the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A peer rank outside the world, or the caller itself.
    InvalidPeer {
        /// The offending peer.
        peer: Rank,
        /// World size.
        size: usize,
    },
    /// A strided layout reaches past the end of the buffer it describes.
    LayoutOutOfBounds {
        /// Last element index the layout touches, plus one.
        required: usize,
        /// Length of the buffer.
        len: usize,
    },
    /// A received payload does not have the expected element count.
    LengthMismatch {
        /// Sender of the payload.
        source: Rank,
        /// Elements expected by the receiver.
        expected: usize,
        /// Elements actually received.
        actual: usize,
    },
    /// Another participant aborted the run.
    Aborted {
        /// The participant that triggered the abort.
        origin: Rank,
    },
    /// A peer's channel closed before the expected message arrived.
    Disconnected {
        /// The rank this endpoint was waiting on.
        peer: Rank,
    },
    /// The transport world does not have the size the run was configured for.
    WorldSizeMismatch {
        /// Participants requested by the configuration.
        expected: usize,
        /// Participants the transport provides.
        actual: usize,
    },
    /// Gather counts and displacements are inconsistent with the world.
    InvalidGatherLayout {
        /// Description of the inconsistency.
        reason: String,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeer { peer, size } => {
                write!(f, "invalid peer rank {peer} in world of size {size}")
            }
            Self::LayoutOutOfBounds { required, len } => write!(
                f,
                "strided layout needs {required} elements but buffer has {len}"
            ),
            Self::LengthMismatch {
                source,
                expected,
                actual,
            } => write!(
                f,
                "message from rank {source} has {actual} elements, expected {expected}"
            ),
            Self::Aborted { origin } => write!(f, "run aborted by rank {origin}"),
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::WorldSizeMismatch { expected, actual } => write!(
                f,
                "transport world has {actual} participants, configuration expects {expected}"
            ),
            Self::InvalidGatherLayout { reason } => write!(f, "invalid gather layout: {reason}"),
        }
    }
}

impl Error for CommError {}

// ── SolveError ─────────────────────────────────────────────────────

/// Errors returned by a complete solver run.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveError {
    /// The configuration was rejected before allocation.
    Config(ConfigError),
    /// The transport failed; the run was aborted.
    Comm(CommError),
    /// A participant thread panicked.
    ParticipantPanicked {
        /// Rank of the participant that panicked.
        rank: Rank,
    },
    /// A participant thread could not be spawned.
    ThreadSpawnFailed {
        /// Rank whose thread failed to start.
        rank: Rank,
        /// Description from the OS.
        reason: String,
    },
    /// The coordinator finished without producing a result.
    MissingResult,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comm(e) => write!(f, "communication: {e}"),
            Self::ParticipantPanicked { rank } => write!(f, "participant {rank} panicked"),
            Self::ThreadSpawnFailed { rank, reason } => {
                write!(f, "participant {rank} thread spawn failed: {reason}")
            }
            Self::MissingResult => write!(f, "coordinator produced no result"),
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CommError> for SolveError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

impl SolveError {
    /// Whether this error is only an echo of another participant's failure.
    ///
    /// When several participants fail, the run reports the first error
    /// that is not an echo.
    pub fn is_abort_echo(&self) -> bool {
        matches!(self, Self::Comm(CommError::Aborted { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_error_exposes_source() {
        let e = SolveError::from(ConfigError::ZeroIterations);
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "config: iteration count must be at least 1");
    }

    #[test]
    fn abort_echo_detection() {
        let echo = SolveError::Comm(CommError::Aborted { origin: Rank(2) });
        assert!(echo.is_abort_echo());
        let root = SolveError::Comm(CommError::Disconnected { peer: Rank(1) });
        assert!(!root.is_abort_echo());
    }
}
