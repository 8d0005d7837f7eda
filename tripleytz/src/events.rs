use serde::{Deserialize, Serialize};

use crate::{Category, Column};

/// A notification from the engine to the presentation layer.
///
/// The game queues these while it processes an intent. The presentation
/// drains them with [`Game::drain_events()`](crate::Game::drain_events) and
/// redraws whatever they name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A die shows a new face. Not emitted for dice that rolled their old value.
    DieChanged { index: usize, value: u8 },
    /// A keep flag was toggled.
    DieKeptChanged { index: usize, kept: bool },
    /// A committable slot changed state.
    SlotChanged { category: Category, column: Column },
    /// The derived rows of a column changed.
    TotalsChanged { column: Column },
    RollsLeftChanged { rolls_left: u8 },
    /// The last slot was committed.
    GameOver { final_score: u32 },
    /// Everything was reset.
    NewGame,
}
