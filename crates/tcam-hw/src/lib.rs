//! Hardware TCAM bank interface.
//!
//! The engine only ever value-copies cells into the bank through
//! [`TcamBank::program`]; it never reads the bank back. [`SoftBank`] is the
//! in-memory stand-in for the real part, with read accessors so tests and
//! diagnostics can verify convergence and count writes.

pub mod bank;

pub use bank::{SoftBank, TcamBank};
