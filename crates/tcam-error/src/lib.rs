//! Error taxonomy for the TCAM bank handler.
//!
//! One structured enum covers the whole surface: resource errors are fatal to
//! the handle, capacity errors are caller-recoverable, and usage errors never
//! mutate state. No error is retried internally.

use thiserror::Error;

/// Primary error type for TCAM bank operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcamError {
    /// The batch does not fit in the remaining free cells.
    #[error("tcam bank is full: {needed} entries requested, {free} cells free")]
    CapacityExceeded { needed: usize, free: usize },

    /// An owned buffer could not be allocated at init time.
    #[error("allocation of {what} failed")]
    Allocation { what: &'static str },

    /// The table was never initialized, or has been destroyed.
    #[error("tcam table is not initialized")]
    Uninitialized,

    /// No entry with the given id exists in the table.
    #[error("no entry with id {id}")]
    UnknownId { id: u32 },

    /// A device write was directed past the end of the bank.
    #[error("cell position {position} out of range (bank capacity {capacity})")]
    PositionOutOfRange { position: usize, capacity: usize },

    /// The id is already present in the table or earlier in the same batch.
    #[error("duplicate entry id {id}")]
    DuplicateId { id: u32 },

    /// A bank must hold at least one cell.
    #[error("bank capacity must be nonzero")]
    InvalidCapacity,
}

impl TcamError {
    /// Whether this error reports caller misuse rather than a resource or
    /// capacity condition. Usage errors leave all state untouched.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Uninitialized
                | Self::UnknownId { .. }
                | Self::PositionOutOfRange { .. }
                | Self::DuplicateId { .. }
                | Self::InvalidCapacity
        )
    }

    /// Whether the caller can reasonably retry after corrective action.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Suggest a recovery action for user-facing errors.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExceeded { .. } => {
                Some("Remove entries or split the batch before retrying")
            }
            Self::Uninitialized => Some("Initialize the table before issuing operations"),
            Self::DuplicateId { .. } => Some("Remove the existing entry first, or pick a fresh id"),
            _ => None,
        }
    }
}

/// Result type alias using `TcamError`.
pub type Result<T> = std::result::Result<T, TcamError>;
