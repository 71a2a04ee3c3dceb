//! In-memory hardware bank stub.

use tcam_error::{Result, TcamError};
use tcam_types::{Entry, HwCell};
use tracing::trace;

/// Programming surface of one hardware bank.
///
/// Exactly one engine drives a bank at a time; the engine owns its bank
/// value. Implementors count every single-cell write in a monotonically
/// increasing access counter, clears included: a cleared cell still costs
/// a write cycle.
pub trait TcamBank {
    /// Number of cells in the bank.
    fn capacity(&self) -> usize;

    /// Copy `cell` into `position`, counting one access.
    ///
    /// Fails with [`TcamError::PositionOutOfRange`] when `position` is past
    /// the end of the bank; the counter does not move on failure.
    fn program(&mut self, cell: HwCell, position: usize) -> Result<()>;

    /// Monotonic count of single-cell writes issued so far.
    fn access_count(&self) -> u64;
}

/// In-memory bank: a flat cell array plus the access counter.
///
/// Every cell starts zeroed (the empty sentinel), matching what the real
/// part reports after a bank reset.
#[derive(Debug)]
pub struct SoftBank {
    cells: Vec<HwCell>,
    access: u64,
}

impl SoftBank {
    /// Create a bank with `capacity` zeroed cells.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TcamError::InvalidCapacity);
        }
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| TcamError::Allocation { what: "bank cells" })?;
        cells.resize(capacity, HwCell::EMPTY);
        Ok(Self { cells, access: 0 })
    }

    /// Read one cell back, or `None` past the end of the bank.
    #[must_use]
    pub fn cell(&self, position: usize) -> Option<HwCell> {
        self.cells.get(position).copied()
    }

    /// Occupied cells in ascending position order, decoded.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, Entry)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(position, cell)| cell.decode().map(|entry| (position, entry)))
    }
}

impl TcamBank for SoftBank {
    fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn program(&mut self, cell: HwCell, position: usize) -> Result<()> {
        let capacity = self.cells.len();
        let target = self
            .cells
            .get_mut(position)
            .ok_or(TcamError::PositionOutOfRange { position, capacity })?;
        *target = cell;
        self.access += 1;
        trace!(position, id = cell.id, prio = cell.prio, "programmed cell");
        Ok(())
    }

    fn access_count(&self) -> u64 {
        self.access
    }
}
