use serde::{Deserialize, Serialize};

use crate::{Category, CategoryRow, Slot};

/// The upper subtotal needed for the bonus.
pub const BONUS_THRESHOLD: u32 = 63;
pub const BONUS_SCORE: u32 = 35;

/// One of the three parallel score columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Column {
    Single,
    Double,
    Triple,
}

impl Column {
    pub const COUNT: usize = 3;

    pub const ALL: [Column; Column::COUNT] = [Column::Single, Column::Double, Column::Triple];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn multiplier(self) -> u32 {
        self.index() as u32 + 1
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.multiplier())
    }
}

/// The derived values of one column.
///
/// `None` means "nothing to show", which is not the same as a zero score.
/// In particular a missed bonus is `None`, never `Some(0)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTotals {
    pub upper_subtotal: Option<u32>,
    pub bonus: Option<u32>,
    pub upper_total: Option<u32>,
    pub lower_total: Option<u32>,
    pub combined_total: Option<u32>,
    /// The combined total times the column's multiplier.
    pub final_total: Option<u32>,
}

impl ColumnTotals {
    /// Computes the totals from scratch out of the committed slots of `column`.
    ///
    /// Previews are ignored.
    pub fn compute(rows: &[CategoryRow; Category::COUNT], column: Column) -> Self {
        let committed_sum = |categories: &[Category]| -> Option<u32> {
            categories
                .iter()
                .filter_map(|c| rows[c.index()].slot(column).committed())
                .fold(None, |acc, v| Some(acc.unwrap_or(0) + v))
        };

        let upper_subtotal = committed_sum(&Category::UPPER[..]);
        let bonus = upper_subtotal
            .filter(|&subtotal| subtotal >= BONUS_THRESHOLD)
            .map(|_| BONUS_SCORE);
        let upper_total = upper_subtotal.map(|subtotal| subtotal + bonus.unwrap_or(0));
        let lower_total = committed_sum(&Category::LOWER[..]);
        let combined_total = match (upper_total, lower_total) {
            (None, None) => None,
            (upper, lower) => Some(upper.unwrap_or(0) + lower.unwrap_or(0)),
        };
        let final_total = combined_total.map(|total| total * column.multiplier());

        Self {
            upper_subtotal,
            bonus,
            upper_total,
            lower_total,
            combined_total,
            final_total,
        }
    }
}

/// 13 category rows of three slots each, plus the derived totals of every column.
///
/// The slots live in one arena indexed by `(Category, Column)`. Totals are
/// cached and only change through [`ScoreSheet::recompute()`], which the
/// game calls after every slot mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    rows: [CategoryRow; Category::COUNT],
    totals: [ColumnTotals; Column::COUNT],
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, category: Category) -> &CategoryRow {
        &self.rows[category.index()]
    }

    pub fn slot(&self, category: Category, column: Column) -> Slot {
        self.rows[category.index()].slot(column)
    }

    /// Direct access to a slot. Call [`Self::recompute()`] afterwards.
    pub(crate) fn slot_mut(&mut self, category: Category, column: Column) -> &mut Slot {
        self.rows[category.index()].slot_mut(column)
    }

    pub fn totals(&self, column: Column) -> ColumnTotals {
        self.totals[column.index()]
    }

    /// Sum of the three columns' final totals.
    pub fn grand_total(&self) -> u32 {
        self.totals.iter().filter_map(|t| t.final_total).sum()
    }

    /// Number of slots that are committed.
    pub fn committed_count(&self) -> usize {
        self.slots()
            .filter(|&(_, _, slot)| slot.is_committed())
            .count()
    }

    /// All 39 slots in row-major order.
    pub fn slots(&self) -> impl Iterator<Item = (Category, Column, Slot)> + '_ {
        Category::ALL.into_iter().flat_map(move |category| {
            Column::ALL
                .into_iter()
                .map(move |column| (category, column, self.slot(category, column)))
        })
    }

    /// Recomputes the totals of `column`. Returns whether they changed.
    pub fn recompute(&mut self, column: Column) -> bool {
        let totals = ColumnTotals::compute(&self.rows, column);
        let changed = self.totals[column.index()] != totals;
        self.totals[column.index()] = totals;
        changed
    }

    /// Drops every preview on the sheet and returns the slots that had one.
    pub(crate) fn clear_previews(&mut self) -> Vec<(Category, Column)> {
        let mut cleared = Vec::new();
        for category in Category::ALL {
            for column in Column::ALL {
                if self.slot_mut(category, column).unpreview() {
                    cleared.push((category, column));
                }
            }
        }
        cleared
    }

    /// Empties every slot and every total. Returns the slots that were not empty.
    pub(crate) fn clear(&mut self) -> Vec<(Category, Column)> {
        let mut cleared = Vec::new();
        for category in Category::ALL {
            for column in Column::ALL {
                if self.slot_mut(category, column).clear() {
                    cleared.push((category, column));
                }
            }
        }
        for column in Column::ALL {
            self.recompute(column);
        }
        cleared
    }
}
