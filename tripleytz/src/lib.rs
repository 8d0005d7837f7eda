pub use dice::*;
pub use errors::*;
pub use events::*;
pub use game::*;
pub use highscores::*;
pub use scoring::*;
pub use sheet::*;
pub use slot::*;

#[cfg(test)]
mod arbitrary;
mod dice;
mod errors;
mod events;
mod game;
mod highscores;
mod scoring;
mod sheet;
mod slot;
