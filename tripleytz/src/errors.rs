use crate::{Category, Column};

/// The error type for intents the rules do not allow in the current state.
///
/// A rejected intent never changes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalIntent {
    NoRollsLeft,
    /// Scoring and keeping dice need at least one roll in the current round.
    NotRolledYet,
    AlreadyCommitted {
        category: Category,
        column: Column,
    },
    NothingToUndo,
    GameIsOver,
    /// Only a finished game can be concluded.
    GameNotOver,
}

impl std::error::Error for IllegalIntent {}

impl std::fmt::Display for IllegalIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalIntent::NoRollsLeft => {
                write!(f, "Tried to roll, but there are no rolls left this round")
            }
            IllegalIntent::NotRolledYet => {
                write!(f, "The dice have not been rolled yet this round")
            }
            IllegalIntent::AlreadyCommitted { category, column } => write!(
                f,
                "{} has already been scored in the {} column",
                category, column
            ),
            IllegalIntent::NothingToUndo => write!(f, "There is nothing to undo"),
            IllegalIntent::GameIsOver => write!(f, "The game is over, start a new one"),
            IllegalIntent::GameNotOver => write!(f, "The game is not over yet"),
        }
    }
}
