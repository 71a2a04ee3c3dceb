//! Slot placement and relocation over the logical table.
//!
//! This module is pure table arithmetic: it decides where an entry lands,
//! slides occupied runs by one cell when no free neighbour exists, and keeps
//! the per-call [`TouchLog`] that later drives the device replay. It never
//! talks to the bank.
//!
//! Placement preserves two ordering rules over occupied cells:
//!
//! - ascending priority by index (lower index = earlier match), and
//! - within one priority value, newer entries sit at lower indices.

use tcam_error::{Result, TcamError};
use tcam_types::Entry;

/// Direction classification of the relocations performed by one call.
///
/// The replay step orders its writes by this: batches that only slid runs
/// toward higher indices replay ascending, toward lower indices descending,
/// so no cell is overwritten before its previous content has been rewritten
/// one position over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftPolicy {
    /// Every placement found a free cell; touched cells are independent.
    #[default]
    None,
    /// At least one run slid toward higher indices.
    TowardHigher,
    /// At least one run slid toward lower indices.
    TowardLower,
    /// Both directions occurred in the same call.
    Both,
}

impl ShiftPolicy {
    /// Fold one more relocation direction into the call-level policy.
    #[must_use]
    pub const fn merged(self, direction: ShiftDirection) -> Self {
        match (self, direction) {
            (Self::None | Self::TowardHigher, ShiftDirection::TowardHigher) => Self::TowardHigher,
            (Self::None | Self::TowardLower, ShiftDirection::TowardLower) => Self::TowardLower,
            _ => Self::Both,
        }
    }

    /// Whether any relocation happened.
    #[must_use]
    pub const fn any_shift(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Direction a displaced run moved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    TowardHigher,
    TowardLower,
}

/// Per-call record of which cells changed and how far relocation reached.
///
/// Owned by the engine and reset at the start of every insert, so the
/// bookkeeping buffer is allocated once at init time.
#[derive(Debug)]
pub struct TouchLog {
    /// Cells written by direct placement (no relocation involved).
    written: Vec<bool>,
    /// Minimal contiguous index range covering every touched cell.
    span: Option<(usize, usize)>,
    policy: ShiftPolicy,
}

impl TouchLog {
    /// Allocate a log able to track `capacity` cells.
    pub fn new(capacity: usize) -> Result<Self> {
        let mut written = Vec::new();
        written
            .try_reserve_exact(capacity)
            .map_err(|_| TcamError::Allocation {
                what: "touch bitmap",
            })?;
        written.resize(capacity, false);
        Ok(Self {
            written,
            span: None,
            policy: ShiftPolicy::None,
        })
    }

    /// A log tracking nothing, for destroyed engines.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            written: Vec::new(),
            span: None,
            policy: ShiftPolicy::None,
        }
    }

    /// Clear all per-call state.
    pub fn reset(&mut self) {
        self.written.fill(false);
        self.span = None;
        self.policy = ShiftPolicy::None;
    }

    /// Record a direct placement at `index`.
    pub fn record_write(&mut self, index: usize) {
        self.written[index] = true;
        self.extend_span(index, index);
    }

    /// Record a one-cell relocation of the run covering `[lo, hi]`.
    pub fn record_shift(&mut self, direction: ShiftDirection, lo: usize, hi: usize) {
        self.policy = self.policy.merged(direction);
        self.extend_span(lo, hi);
    }

    fn extend_span(&mut self, lo: usize, hi: usize) {
        self.span = Some(match self.span {
            None => (lo, hi),
            Some((cur_lo, cur_hi)) => (cur_lo.min(lo), cur_hi.max(hi)),
        });
    }

    /// The minimal touched range, or `None` when nothing was touched.
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        self.span
    }

    /// The call-level relocation classification.
    #[must_use]
    pub fn policy(&self) -> ShiftPolicy {
        self.policy
    }

    /// Whether `index` was written by a direct placement.
    #[must_use]
    pub fn is_written(&self, index: usize) -> bool {
        self.written.get(index).copied().unwrap_or(false)
    }
}

/// Place `entry` into `slots`, relocating a neighbouring run if no free cell
/// exists at the landing boundary. Every touched cell lands in `log`.
///
/// Fails with [`TcamError::CapacityExceeded`] only when no free cell is
/// reachable; callers that pre-check the batch against the free count never
/// see this.
pub fn place_entry(slots: &mut [Option<Entry>], entry: Entry, log: &mut TouchLog) -> Result<()> {
    let boundary = slots
        .iter()
        .position(|slot| matches!(slot, Some(held) if held.priority >= entry.priority));

    let Some(at) = boundary else {
        return place_past_tail(slots, entry, log);
    };

    // Free predecessor: the common single-write case.
    if at > 0 && slots[at - 1].is_none() {
        slots[at - 1] = Some(entry);
        log.record_write(at - 1);
        return Ok(());
    }

    // A cell must be vacated at the boundary. Prefer sliding the run that
    // starts at the boundary toward higher indices.
    if let Some(free) = first_free_above(slots, at) {
        for index in (at..free).rev() {
            slots[index + 1] = slots[index];
        }
        slots[at] = Some(entry);
        log.record_shift(ShiftDirection::TowardHigher, at, free);
        return Ok(());
    }

    // No room above: pull the run below the boundary toward lower indices.
    if let Some(free) = last_free_below(slots, at) {
        for index in free..at - 1 {
            slots[index] = slots[index + 1];
        }
        slots[at - 1] = Some(entry);
        log.record_shift(ShiftDirection::TowardLower, free, at);
        return Ok(());
    }

    Err(TcamError::CapacityExceeded { needed: 1, free: 0 })
}

/// Nothing in the table outranks `entry`: it belongs after the last occupied
/// cell, sliding the tail run down one cell when the table ends occupied.
fn place_past_tail(slots: &mut [Option<Entry>], entry: Entry, log: &mut TouchLog) -> Result<()> {
    let last = slots.len() - 1;

    if slots[last].is_some() {
        let Some(free) = last_free_below(slots, last) else {
            return Err(TcamError::CapacityExceeded { needed: 1, free: 0 });
        };
        for index in free..last {
            slots[index] = slots[index + 1];
        }
        slots[last] = Some(entry);
        log.record_shift(ShiftDirection::TowardLower, free, last);
        return Ok(());
    }

    let position = slots[..last]
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |occupied| occupied + 1);
    slots[position] = Some(entry);
    log.record_write(position);
    Ok(())
}

fn first_free_above(slots: &[Option<Entry>], boundary: usize) -> Option<usize> {
    slots[boundary + 1..]
        .iter()
        .position(Option::is_none)
        .map(|offset| boundary + 1 + offset)
}

fn last_free_below(slots: &[Option<Entry>], boundary: usize) -> Option<usize> {
    slots[..boundary].iter().rposition(Option::is_none)
}
