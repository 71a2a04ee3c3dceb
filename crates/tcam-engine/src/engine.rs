//! The table engine: logical slot array, bookkeeping, and device replay.

use std::collections::BTreeSet;

use tcam_error::{Result, TcamError};
use tcam_hw::{SoftBank, TcamBank};
use tcam_types::{Entry, EntryId, HwCell};
use tracing::debug;

use crate::layout::{self, ShiftPolicy, TouchLog};

/// Outcome of one successful insert call.
///
/// `device_writes` is the access-counter delta the replay consumed; callers
/// watching wear budgets read it instead of diffing the counter themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Entries placed by this call.
    pub inserted: usize,
    /// Single-cell device writes issued by the replay.
    pub device_writes: u64,
    /// Relocation directions the batch needed.
    pub shift_policy: ShiftPolicy,
}

/// One occupied slot as reported by [`TcamEngine::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SlotRecord {
    pub index: usize,
    pub id: u32,
    pub priority: u32,
}

/// Priority-ordered rule table mirrored onto a hardware bank.
///
/// The engine exclusively owns both the logical table and its bank; several
/// engines (each with their own bank) coexist freely in one process. All
/// operations are synchronous and bounded by `O(capacity)` scans per entry.
///
/// Ordering across occupied cells: ascending priority value by index, and
/// within one priority value the most recently inserted entry sits at the
/// lowest index.
#[derive(Debug)]
pub struct TcamEngine<B: TcamBank = SoftBank> {
    slots: Vec<Option<Entry>>,
    occupied: usize,
    touch: TouchLog,
    bank: B,
}

impl TcamEngine<SoftBank> {
    /// Create an engine over a fresh in-memory bank of `capacity` cells.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_bank(SoftBank::new(capacity)?)
    }
}

impl<B: TcamBank> TcamEngine<B> {
    /// Create an engine over an already-initialized bank, sized to match it.
    pub fn with_bank(bank: B) -> Result<Self> {
        let capacity = bank.capacity();
        if capacity == 0 {
            return Err(TcamError::InvalidCapacity);
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TcamError::Allocation {
                what: "table slots",
            })?;
        slots.resize(capacity, None);
        Ok(Self {
            slots,
            occupied: 0,
            touch: TouchLog::new(capacity)?,
            bank,
        })
    }

    /// Number of slots in the table (0 after `destroy`).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Total single-cell writes the bank has absorbed.
    #[must_use]
    pub fn access_count(&self) -> u64 {
        self.bank.access_count()
    }

    /// Shared borrow of the bank, for verification and diagnostics.
    #[must_use]
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Insert a batch of entries, keeping the table ordered and replaying
    /// every changed cell to the bank.
    ///
    /// The batch is all-or-nothing: it is laid out on a scratch copy of the
    /// table first and committed only when every entry placed, so a failing
    /// call leaves the table, the occupied count, and the bank untouched.
    ///
    /// Fails with [`TcamError::CapacityExceeded`] when the batch does not fit
    /// in the remaining free cells, and [`TcamError::DuplicateId`] when an id
    /// is already present in the table or appears twice in the batch.
    pub fn insert(&mut self, entries: &[Entry]) -> Result<InsertOutcome> {
        self.ensure_initialized()?;
        let free = self.capacity() - self.occupied;
        if entries.len() > free {
            return Err(TcamError::CapacityExceeded {
                needed: entries.len(),
                free,
            });
        }
        self.reject_duplicates(entries)?;
        if entries.is_empty() {
            return Ok(InsertOutcome {
                inserted: 0,
                device_writes: 0,
                shift_policy: ShiftPolicy::None,
            });
        }

        let mut scratch = self.slots.clone();
        self.touch.reset();
        for entry in entries {
            layout::place_entry(&mut scratch, *entry, &mut self.touch)?;
        }

        self.slots = scratch;
        self.occupied += entries.len();

        let before = self.bank.access_count();
        self.replay()?;
        let device_writes = self.bank.access_count() - before;
        let shift_policy = self.touch.policy();
        debug!(
            inserted = entries.len(),
            device_writes,
            ?shift_policy,
            occupied = self.occupied,
            "insert committed"
        );
        Ok(InsertOutcome {
            inserted: entries.len(),
            device_writes,
            shift_policy,
        })
    }

    /// Remove the entry holding `id`.
    ///
    /// The bank cell is cleared first; the logical slot follows only once
    /// that write has landed. Exactly one device write per remove.
    pub fn remove(&mut self, id: EntryId) -> Result<()> {
        self.ensure_initialized()?;
        let position = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Some(held) if held.id == id))
            .ok_or(TcamError::UnknownId { id: id.get() })?;
        self.bank.program(HwCell::EMPTY, position)?;
        self.slots[position] = None;
        self.occupied -= 1;
        debug!(id = id.get(), position, occupied = self.occupied, "entry removed");
        Ok(())
    }

    /// Release the table and bookkeeping storage and reset the counts.
    ///
    /// Idempotent; operations on a destroyed engine fail with
    /// [`TcamError::Uninitialized`]. The bank value stays owned but is never
    /// programmed again.
    pub fn destroy(&mut self) {
        self.slots = Vec::new();
        self.occupied = 0;
        self.touch = TouchLog::released();
    }

    /// Occupied slots in ascending index order. Never touches the bank.
    #[must_use]
    pub fn dump(&self) -> Vec<SlotRecord> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.map(|held| SlotRecord {
                    index,
                    id: held.id.get(),
                    priority: held.priority.get(),
                })
            })
            .collect()
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(TcamError::Uninitialized);
        }
        Ok(())
    }

    fn reject_duplicates(&self, entries: &[Entry]) -> Result<()> {
        let mut seen: BTreeSet<u32> = self
            .slots
            .iter()
            .flatten()
            .map(|held| held.id.get())
            .collect();
        for entry in entries {
            if !seen.insert(entry.id.get()) {
                return Err(TcamError::DuplicateId { id: entry.id.get() });
            }
        }
        Ok(())
    }

    /// Replay the touched cells to the bank in the direction-correct order.
    ///
    /// A slid run is rewritten in the order the data moved, so the bank never
    /// loses a cell whose old content has not yet been rewritten one position
    /// over. Independent single-cell placements carry no such hazard and are
    /// written individually.
    fn replay(&mut self) -> Result<()> {
        let Self {
            slots, touch, bank, ..
        } = self;
        let Some((lo, hi)) = touch.span() else {
            return Ok(());
        };
        match touch.policy() {
            ShiftPolicy::None => {
                for index in lo..=hi {
                    if touch.is_written(index) {
                        if let Some(entry) = slots[index] {
                            bank.program(HwCell::from(entry), index)?;
                        }
                    }
                }
            }
            ShiftPolicy::TowardHigher | ShiftPolicy::Both => {
                for index in lo..=hi {
                    if let Some(entry) = slots[index] {
                        bank.program(HwCell::from(entry), index)?;
                    }
                }
            }
            ShiftPolicy::TowardLower => {
                for index in (lo..=hi).rev() {
                    if let Some(entry) = slots[index] {
                        bank.program(HwCell::from(entry), index)?;
                    }
                }
            }
        }
        Ok(())
    }
}
