//! Public API facade for the TCAM bank handler.
//!
//! Re-exports the engine, the bank interface, and the shared value and error
//! types as a single dependency surface. Integration scenarios live in this
//! crate's `tests/` directory.

pub use tcam_engine::{InsertOutcome, ShiftDirection, ShiftPolicy, SlotRecord, TcamEngine};
pub use tcam_error::{Result, TcamError};
pub use tcam_hw::{SoftBank, TcamBank};
pub use tcam_types::{Entry, EntryId, HwCell, InvalidEntryId, Priority, limits};
