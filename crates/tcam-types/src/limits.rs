//! Shared limits for the TCAM bank handler.

/// Default number of cells in one hardware bank.
///
/// Real deployments size this per part; tests and the diagnostics surface
/// default to the classic 2048-cell bank.
pub const DEFAULT_BANK_CAPACITY: usize = 2048;
