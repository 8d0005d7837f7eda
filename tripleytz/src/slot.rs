use serde::{Deserialize, Serialize};

use crate::Column;

/// A single committable cell of the score sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    /// Shows what the current dice would score, without being committed.
    Previewing(u32),
    Committed(u32),
}

// The mutators report whether the slot changed, so that the caller knows
// which totals to recompute and which notifications to emit.
impl Slot {
    /// Empty or Previewing to Previewing(v). Committed slots are left alone.
    #[must_use]
    pub fn preview(&mut self, value: u32) -> bool {
        match *self {
            Slot::Committed(_) => false,
            Slot::Previewing(v) if v == value => false,
            _ => {
                *self = Slot::Previewing(value);
                true
            }
        }
    }

    /// Drops a preview. Committed and empty slots are left alone.
    #[must_use]
    pub fn unpreview(&mut self) -> bool {
        if self.is_previewing() {
            *self = Slot::Empty;
            true
        } else {
            false
        }
    }

    /// Overwrites any preview.
    ///
    /// Panics if the slot is already committed.
    pub fn commit(&mut self, value: u32) {
        assert!(!self.is_committed(), "slot is already committed");
        *self = Slot::Committed(value);
    }

    #[must_use]
    pub fn clear(&mut self) -> bool {
        let changed = *self != Slot::Empty;
        *self = Slot::Empty;
        changed
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Slot::Committed(_))
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, Slot::Previewing(_))
    }

    /// The committed value. Previews don't count.
    pub fn committed(&self) -> Option<u32> {
        match *self {
            Slot::Committed(v) => Some(v),
            _ => None,
        }
    }

    /// Whatever should be displayed in the cell, preview or not.
    pub fn shown(&self) -> Option<u32> {
        match *self {
            Slot::Empty => None,
            Slot::Previewing(v) | Slot::Committed(v) => Some(v),
        }
    }
}

/// The three slots (single, double, triple) of one category.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    slots: [Slot; Column::COUNT],
}

impl CategoryRow {
    pub fn slot(&self, column: Column) -> Slot {
        self.slots[column.index()]
    }

    pub fn slot_mut(&mut self, column: Column) -> &mut Slot {
        &mut self.slots[column.index()]
    }

    /// Columns in which this category has not been committed yet.
    pub fn open_columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL
            .into_iter()
            .filter(|&column| !self.slot(column).is_committed())
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Slot::is_committed)
    }
}
