//! Core value types shared across the TCAM bank handler crates.
//!
//! The hardware encodes an empty cell as the all-zero bit pattern, so the
//! rule id `0` is permanently reserved and can never name a rule. The types
//! here make that sentinel unrepresentable in the caller-facing API
//! ([`EntryId`] is a `NonZeroU32` newtype) while keeping the raw encoding
//! available at the device boundary ([`HwCell`]).

pub mod limits;

use std::fmt;
use std::num::NonZeroU32;

/// Identifier of one rule entry.
///
/// Ids are nonzero and unique per table (uniqueness is enforced by the
/// engine at insert time). The raw value `0` is the empty-cell sentinel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct EntryId(NonZeroU32);

impl EntryId {
    /// Create an id from a raw u32.
    ///
    /// Returns `None` for `0`, which is reserved as the empty-cell sentinel.
    #[inline]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for EntryId {
    type Error = InvalidEntryId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidEntryId)
    }
}

/// Error returned when attempting to create an `EntryId` from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEntryId;

impl fmt::Display for InvalidEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("entry id cannot be zero")
    }
}

impl std::error::Error for InvalidEntryId {}

/// Match priority of a rule.
///
/// Lower values match first: a priority-0 rule outranks every other rule in
/// the bank. Ties are broken by insertion recency (newer rules win).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Priority(u32);

impl Priority {
    /// Highest possible priority.
    pub const HIGHEST: Self = Self(0);

    /// Create a priority from a raw u32.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rule: identity plus match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub priority: Priority,
}

impl Entry {
    /// Create an entry.
    #[inline]
    #[must_use]
    pub const fn new(id: EntryId, priority: Priority) -> Self {
        Self { id, priority }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id={} prio={}", self.id, self.priority)
    }
}

/// Raw cell image as held by the hardware bank.
///
/// The all-zero pattern is the empty sentinel; everything else decodes to an
/// [`Entry`]. This is the only place where the sentinel encoding leaks out of
/// the type system, and it stays confined to the device boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HwCell {
    pub id: u32,
    pub prio: u32,
}

impl HwCell {
    /// The empty (cleared) cell.
    pub const EMPTY: Self = Self { id: 0, prio: 0 };

    /// Whether this cell holds no rule.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.id == 0
    }

    /// Decode the cell back into an entry, or `None` for the sentinel.
    #[inline]
    #[must_use]
    pub fn decode(self) -> Option<Entry> {
        let id = EntryId::new(self.id)?;
        Some(Entry::new(id, Priority::new(self.prio)))
    }
}

impl From<Entry> for HwCell {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.get(),
            prio: entry.priority.get(),
        }
    }
}

impl From<Option<Entry>> for HwCell {
    fn from(slot: Option<Entry>) -> Self {
        slot.map_or(Self::EMPTY, Self::from)
    }
}
