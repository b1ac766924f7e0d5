//! Arena identifiers for units and streams.

use core::fmt;
use core::num::NonZeroU32;

/// Position of a unit or stream in its flowsheet arena.
///
/// Stored as `position + 1` so that `Option<Id>` is no larger than `Id`.
/// Ids compare in insertion order; network ordering relies on that for
/// every tie-break.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Id of the arena entry at `index` (0-based).
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// 0-based arena position.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Arena position as a `usize`, for slice lookups.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl From<Id> for usize {
    fn from(id: Id) -> usize {
        id.slot()
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

pub type UnitId = Id;
pub type StreamId = Id;
