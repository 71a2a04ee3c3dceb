//! Priority-ordered rule table mirrored onto a TCAM bank with minimal
//! device writes.
//!
//! This crate is the table engine:
//!
//! - [`layout`]: placement and relocation arithmetic over the logical slot
//!   array, plus per-call touch tracking.
//! - [`engine`]: the [`TcamEngine`] owning the table, its bookkeeping, and
//!   the bank it replays changes to.
//!
//! The engine keeps occupied cells sorted by ascending priority value, with
//! ties broken toward the most recently inserted entry, and rewrites only the
//! minimal contiguous range of cells an insert disturbed.

pub mod engine;
pub mod layout;

#[cfg(test)]
mod engine_invariant_tests;

pub use engine::{InsertOutcome, SlotRecord, TcamEngine};
pub use layout::{ShiftDirection, ShiftPolicy, TouchLog};
