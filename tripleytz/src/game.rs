use chrono::{DateTime, Local};

use crate::{
    Category, Column, ColumnTotals, DieSource, Dice, GameEvent, HighScoreLedger, IllegalIntent,
    ScoreSheet, Slot, NUM_DICE,
};

/// Rolls per round.
pub const MAX_ROLLS: u8 = 3;

/// Every category once in every column.
pub const TOTAL_PLAYS: u8 = (Category::COUNT * Column::COUNT) as u8;

/// Where the game is in its round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No roll yet this round.
    AwaitingRoll,
    /// At least one roll this round, a category may be scored.
    RolledAwaitingCommit,
    /// All 39 slots are committed.
    GameOver,
}

/// Summarizes what committing a category led to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    NextRound,
    GameOver { final_score: u32 },
}

/// What happened when a finished game was handed to the high-score ledger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Conclusion {
    pub final_score: u32,
    /// Whether the score made it onto the list.
    pub ranked: bool,
}

/// Enough to take back the most recent commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct UndoRecord {
    category: Category,
    column: Column,
    rolls_left: u8,
    kept: [bool; NUM_DICE],
}

/// A single-player game: the dice, the score sheet and the round bookkeeping.
///
/// All mutation goes through the intent methods (`roll`, `select_die`,
/// `preview`, `unpreview`, `commit`, `undo`, `new_game`, `conclude`). An intent
/// either applies completely or is rejected with an [`IllegalIntent`] before
/// anything changes.
#[derive(Clone, Debug)]
pub struct Game {
    dice: Dice,
    sheet: ScoreSheet,
    rolls_left: u8,
    plays_left: u8,
    undo: Option<UndoRecord>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            dice: Dice::new(),
            sheet: ScoreSheet::new(),
            rolls_left: MAX_ROLLS,
            plays_left: TOTAL_PLAYS,
            undo: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.plays_left == 0 {
            Phase::GameOver
        } else if self.rolls_left == MAX_ROLLS {
            Phase::AwaitingRoll
        } else {
            Phase::RolledAwaitingCommit
        }
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn sheet(&self) -> &ScoreSheet {
        &self.sheet
    }

    pub fn slot(&self, category: Category, column: Column) -> Slot {
        self.sheet.slot(category, column)
    }

    pub fn totals(&self, column: Column) -> ColumnTotals {
        self.sheet.totals(column)
    }

    /// Sum of the final totals of all three columns.
    pub fn grand_total(&self) -> u32 {
        self.sheet.grand_total()
    }

    pub fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    pub fn plays_left(&self) -> u8 {
        self.plays_left
    }

    pub fn can_roll(&self) -> bool {
        self.phase() != Phase::GameOver && self.rolls_left > 0
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Whether the cell is interactive right now.
    pub fn can_commit(&self, category: Category, column: Column) -> bool {
        self.phase() == Phase::RolledAwaitingCommit
            && !self.sheet.slot(category, column).is_committed()
    }

    /// Takes the notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rolls every die that is not kept.
    pub fn roll<S: DieSource + ?Sized>(&mut self, source: &mut S) -> Result<(), IllegalIntent> {
        self.check_not_over()?;
        if self.rolls_left == 0 {
            return Err(IllegalIntent::NoRollsLeft);
        }

        self.drop_previews();
        for (index, value) in self.dice.roll(source) {
            self.events.push(GameEvent::DieChanged { index, value });
        }
        self.set_rolls_left(self.rolls_left - 1);
        self.undo = None;
        Ok(())
    }

    /// Marks a die as kept (or not) for the next roll.
    ///
    /// Panics if `index` is not in `0..5`.
    pub fn select_die(&mut self, index: usize, keep: bool) -> Result<(), IllegalIntent> {
        assert!(index < NUM_DICE, "die index {} out of range", index);
        self.check_not_over()?;
        if self.rolls_left == MAX_ROLLS {
            return Err(IllegalIntent::NotRolledYet);
        }
        if self.dice.is_kept(index) != keep {
            self.dice.select(index, keep);
            self.events.push(GameEvent::DieKeptChanged { index, kept: keep });
        }
        Ok(())
    }

    pub fn toggle_die(&mut self, index: usize) -> Result<(), IllegalIntent> {
        let keep = !self.dice.is_kept(index);
        self.select_die(index, keep)
    }

    /// Shows what the current dice would score in this slot, without committing.
    pub fn preview(&mut self, category: Category, column: Column) -> Result<u32, IllegalIntent> {
        self.check_scorable(category, column)?;
        let value = category.score(&self.dice.faces());
        if self.sheet.slot_mut(category, column).preview(value) {
            self.events
                .push(GameEvent::SlotChanged { category, column });
        }
        Ok(value)
    }

    /// Drops the preview of this slot, if it has one.
    pub fn unpreview(&mut self, category: Category, column: Column) {
        if self.sheet.slot_mut(category, column).unpreview() {
            self.events
                .push(GameEvent::SlotChanged { category, column });
        }
    }

    /// Scores the current dice in this slot and ends the round.
    ///
    /// The value is computed from the dice now, not taken from a preview.
    pub fn commit(
        &mut self,
        category: Category,
        column: Column,
    ) -> Result<CommitOutcome, IllegalIntent> {
        self.check_scorable(category, column)?;

        let value = category.score(&self.dice.faces());
        self.drop_previews();
        self.sheet.slot_mut(category, column).commit(value);
        self.events
            .push(GameEvent::SlotChanged { category, column });
        self.recompute(column);
        self.plays_left -= 1;

        if self.plays_left == 0 {
            self.undo = None;
            let final_score = self.grand_total();
            self.events.push(GameEvent::GameOver { final_score });
            return Ok(CommitOutcome::GameOver { final_score });
        }

        self.undo = Some(UndoRecord {
            category,
            column,
            rolls_left: self.rolls_left,
            kept: self.dice.kept(),
        });
        self.set_kept([false; NUM_DICE]);
        self.set_rolls_left(MAX_ROLLS);
        Ok(CommitOutcome::NextRound)
    }

    /// Takes back the most recent commit. Only one step, and only before the next roll.
    pub fn undo(&mut self) -> Result<(), IllegalIntent> {
        let record = self.undo.take().ok_or(IllegalIntent::NothingToUndo)?;

        self.drop_previews();
        if self.sheet.slot_mut(record.category, record.column).clear() {
            self.events.push(GameEvent::SlotChanged {
                category: record.category,
                column: record.column,
            });
        }
        self.recompute(record.column);
        self.plays_left += 1;
        self.set_kept(record.kept);
        self.set_rolls_left(record.rolls_left);
        Ok(())
    }

    /// Starts over. Allowed at any time.
    pub fn new_game(&mut self) {
        self.dice.reset();
        for (category, column) in self.sheet.clear() {
            self.events
                .push(GameEvent::SlotChanged { category, column });
        }
        for column in Column::ALL {
            self.events.push(GameEvent::TotalsChanged { column });
        }
        self.rolls_left = MAX_ROLLS;
        self.plays_left = TOTAL_PLAYS;
        self.undo = None;
        self.events.push(GameEvent::NewGame);
        self.events.push(GameEvent::RollsLeftChanged {
            rolls_left: MAX_ROLLS,
        });
    }

    /// Hands the final score of a finished game to the ledger, then starts a new game.
    ///
    /// `ask_name` is only called if the score qualifies. It gets the score and
    /// the ledger's suggestion, and returns `None` if the player declines.
    pub fn conclude<L, F>(
        &mut self,
        ledger: &mut L,
        ask_name: F,
        now: DateTime<Local>,
    ) -> Result<Conclusion, IllegalIntent>
    where
        L: HighScoreLedger + ?Sized,
        F: FnOnce(u32, Option<&str>) -> Option<String>,
    {
        if self.phase() != Phase::GameOver {
            return Err(IllegalIntent::GameNotOver);
        }
        let final_score = self.grand_total();
        let mut ranked = false;
        if ledger.is_high_score(final_score) {
            if let Some(name) = ask_name(final_score, ledger.last_used_name()) {
                ranked = ledger.insert(final_score, &name, now);
                if ranked {
                    ledger.save();
                }
            }
        }
        self.new_game();
        Ok(Conclusion {
            final_score,
            ranked,
        })
    }

    fn check_not_over(&self) -> Result<(), IllegalIntent> {
        if self.phase() == Phase::GameOver {
            Err(IllegalIntent::GameIsOver)
        } else {
            Ok(())
        }
    }

    fn check_scorable(&self, category: Category, column: Column) -> Result<(), IllegalIntent> {
        self.check_not_over()?;
        if self.rolls_left == MAX_ROLLS {
            return Err(IllegalIntent::NotRolledYet);
        }
        if self.sheet.slot(category, column).is_committed() {
            return Err(IllegalIntent::AlreadyCommitted { category, column });
        }
        Ok(())
    }

    fn recompute(&mut self, column: Column) {
        if self.sheet.recompute(column) {
            self.events.push(GameEvent::TotalsChanged { column });
        }
    }

    fn drop_previews(&mut self) {
        for (category, column) in self.sheet.clear_previews() {
            self.events
                .push(GameEvent::SlotChanged { category, column });
        }
    }

    fn set_rolls_left(&mut self, rolls_left: u8) {
        self.rolls_left = rolls_left;
        self.events.push(GameEvent::RollsLeftChanged { rolls_left });
    }

    fn set_kept(&mut self, kept: [bool; NUM_DICE]) {
        for (index, (&old, &new)) in self.dice.kept().iter().zip(&kept).enumerate() {
            if old != new {
                self.events
                    .push(GameEvent::DieKeptChanged { index, kept: new });
            }
        }
        self.dice.set_kept(kept);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{HighScores, ScriptedDice};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 6, 1, 20, 0, 0).unwrap()
    }

    fn rolled(faces: &[u8]) -> Game {
        let mut game = Game::new();
        game.roll(&mut ScriptedDice::new(faces)).unwrap();
        game
    }

    #[test]
    fn starts_awaiting_roll() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::AwaitingRoll);
        assert_eq!(game.rolls_left(), 3);
        assert_eq!(game.plays_left(), 39);
        assert_eq!(game.dice().faces(), [1, 2, 3, 4, 5]);
        assert!(!game.can_undo());
    }

    #[test]
    fn three_rolls_per_round() {
        let mut game = Game::new();
        let mut src = ScriptedDice::new(&[2, 5, 6]);
        for expected in [2, 1, 0] {
            game.roll(&mut src).unwrap();
            assert_eq!(game.rolls_left(), expected);
        }
        assert!(!game.can_roll());
        assert_eq!(game.roll(&mut src), Err(IllegalIntent::NoRollsLeft));
        assert_eq!(game.rolls_left(), 0);
    }

    #[test]
    fn scoring_needs_a_roll_first() {
        let mut game = Game::new();
        assert_eq!(
            game.preview(Category::Chance, Column::Single),
            Err(IllegalIntent::NotRolledYet)
        );
        assert_eq!(
            game.commit(Category::Chance, Column::Single),
            Err(IllegalIntent::NotRolledYet)
        );
        assert_eq!(game.select_die(0, true), Err(IllegalIntent::NotRolledYet));
        assert!(!game.can_commit(Category::Chance, Column::Single));
        assert_eq!(game.slot(Category::Chance, Column::Single), Slot::Empty);
    }

    #[test]
    fn kept_dice_survive_the_roll() {
        let mut game = rolled(&[6, 6, 1, 2, 3]);
        game.select_die(0, true).unwrap();
        game.select_die(1, true).unwrap();
        game.roll(&mut ScriptedDice::new(&[4])).unwrap();
        assert_eq!(game.dice().faces(), [6, 6, 4, 4, 4]);
    }

    #[test]
    fn preview_and_unpreview() {
        let mut game = rolled(&[3, 3, 3, 2, 2]);
        assert_eq!(game.preview(Category::FullHouse, Column::Double), Ok(25));
        assert_eq!(game.slot(Category::FullHouse, Column::Double), Slot::Previewing(25));
        assert_eq!(game.totals(Column::Double), ColumnTotals::default());
        game.unpreview(Category::FullHouse, Column::Double);
        assert_eq!(game.slot(Category::FullHouse, Column::Double), Slot::Empty);
    }

    #[test]
    fn commit_uses_current_dice_and_starts_next_round() {
        let mut game = rolled(&[5, 5, 5, 5, 1]);
        game.preview(Category::Fives, Column::Single).unwrap();
        game.select_die(4, true).unwrap();
        game.roll(&mut ScriptedDice::new(&[2])).unwrap();
        assert_eq!(
            game.commit(Category::Fives, Column::Single),
            Ok(CommitOutcome::NextRound)
        );
        assert_eq!(game.slot(Category::Fives, Column::Single), Slot::Committed(0));
        assert_eq!(game.rolls_left(), 3);
        assert_eq!(game.plays_left(), 38);
        assert_eq!(game.dice().kept(), [false; 5]);
        assert_eq!(game.dice().faces(), [2, 2, 2, 2, 1]);
        assert_eq!(game.phase(), Phase::AwaitingRoll);
    }

    #[test]
    fn committed_slot_cannot_be_reused() {
        let mut game = rolled(&[1, 1, 1, 1, 1]);
        game.commit(Category::Aces, Column::Triple).unwrap();
        game.roll(&mut ScriptedDice::new(&[1])).unwrap();
        let err = IllegalIntent::AlreadyCommitted {
            category: Category::Aces,
            column: Column::Triple,
        };
        assert_eq!(game.commit(Category::Aces, Column::Triple), Err(err));
        assert_eq!(game.preview(Category::Aces, Column::Triple), Err(err));
        assert_eq!(game.plays_left(), 38);
        // The same category in another column is still open.
        assert!(game.can_commit(Category::Aces, Column::Single));
    }

    #[test]
    fn undo_restores_the_state_before_commit() {
        let mut game = rolled(&[4, 4, 4, 2, 6]);
        game.select_die(0, true).unwrap();
        game.roll(&mut ScriptedDice::new(&[4])).unwrap();
        let sheet_before = game.sheet().clone();
        let dice_before = *game.dice();
        let rolls_before = game.rolls_left();
        let plays_before = game.plays_left();

        game.commit(Category::Fours, Column::Double).unwrap();
        assert!(game.can_undo());
        game.undo().unwrap();

        assert_eq!(game.sheet(), &sheet_before);
        assert_eq!(game.dice(), &dice_before);
        assert_eq!(game.rolls_left(), rolls_before);
        assert_eq!(game.plays_left(), plays_before);
        assert_eq!(game.undo(), Err(IllegalIntent::NothingToUndo));
    }

    #[test]
    fn rolling_forfeits_undo() {
        let mut game = rolled(&[1, 2, 3, 4, 5]);
        game.commit(Category::LargeStraight, Column::Single).unwrap();
        game.roll(&mut ScriptedDice::new(&[6])).unwrap();
        assert_eq!(game.undo(), Err(IllegalIntent::NothingToUndo));
        assert_eq!(
            game.slot(Category::LargeStraight, Column::Single),
            Slot::Committed(40)
        );
    }

    #[test]
    fn events_describe_a_round() {
        let mut game = Game::new();
        game.roll(&mut ScriptedDice::new(&[1, 2, 3, 4, 6])).unwrap();
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::DieChanged { index: 4, value: 6 },
                GameEvent::RollsLeftChanged { rolls_left: 2 },
            ]
        );
        game.commit(Category::SmallStraight, Column::Triple).unwrap();
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::SlotChanged {
                    category: Category::SmallStraight,
                    column: Column::Triple
                },
                GameEvent::TotalsChanged {
                    column: Column::Triple
                },
                GameEvent::RollsLeftChanged { rolls_left: 3 },
            ]
        );
        assert!(game.drain_events().is_empty());
    }

    /// Fills the whole sheet, committing the columns in an interleaved order.
    fn play_out(game: &mut Game) -> Option<u32> {
        let mut src = ScriptedDice::new(&[6]);
        let mut outcome = None;
        for column in [Column::Triple, Column::Single, Column::Double] {
            for category in Category::ALL.into_iter().rev() {
                game.roll(&mut src).unwrap();
                if let CommitOutcome::GameOver { final_score } =
                    game.commit(category, column).unwrap()
                {
                    outcome = Some(final_score);
                }
            }
        }
        outcome
    }

    #[test]
    fn last_commit_ends_the_game() {
        let mut game = Game::new();
        let final_score = play_out(&mut game).unwrap();
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.plays_left(), 0);

        // Five sixes every round: Sixes 30 (no bonus), 3/4 of a kind 30 each, Yahtzee 50, Chance 30.
        let combined = 30 + 30 + 30 + 50 + 30;
        assert_eq!(game.totals(Column::Single).combined_total, Some(combined));
        let expected: u32 = Column::ALL
            .iter()
            .map(|&c| game.totals(c).final_total.unwrap())
            .sum();
        assert_eq!(final_score, expected);
        assert_eq!(final_score, combined * 6);

        assert!(!game.can_undo());
        assert_eq!(game.roll(&mut ScriptedDice::new(&[1])), Err(IllegalIntent::GameIsOver));
        assert_eq!(game.undo(), Err(IllegalIntent::NothingToUndo));
    }

    #[test]
    fn conclude_records_a_high_score_and_resets() {
        let mut game = Game::new();
        let final_score = play_out(&mut game).unwrap();
        let mut ledger = HighScores::new(3);

        let conclusion = game
            .conclude(&mut ledger, |_, _| Some(String::from("Jo")), now())
            .unwrap();
        assert_eq!(
            conclusion,
            Conclusion {
                final_score,
                ranked: true
            }
        );
        assert_eq!(ledger.entries()[0].name, "Jo");
        assert_eq!(ledger.entries()[0].score, final_score);
        assert_eq!(game.phase(), Phase::AwaitingRoll);
        assert_eq!(game.plays_left(), 39);
        assert_eq!(game.sheet(), &ScoreSheet::new());
    }

    #[test]
    fn conclude_skips_the_prompt_for_low_scores() {
        let mut game = Game::new();
        let final_score = play_out(&mut game).unwrap();
        let mut ledger = HighScores::new(1);
        ledger.insert(final_score + 1, "best", now());

        let mut asked = false;
        let conclusion = game
            .conclude(
                &mut ledger,
                |_, _| {
                    asked = true;
                    None
                },
                now(),
            )
            .unwrap();
        assert!(!asked);
        assert!(!conclusion.ranked);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn conclude_needs_a_finished_game() {
        let mut game = rolled(&[1, 1, 2, 2, 3]);
        let mut ledger = HighScores::default();
        assert_eq!(
            game.conclude(&mut ledger, |_, _| None, now()),
            Err(IllegalIntent::GameNotOver)
        );
        assert_eq!(game.rolls_left(), 2);
    }

    #[test]
    fn new_game_from_the_middle() {
        let mut game = rolled(&[2, 2, 2, 2, 2]);
        game.select_die(2, true).unwrap();
        game.commit(Category::Yahtzee, Column::Single).unwrap();
        game.new_game();
        assert_eq!(game.dice(), &Dice::new());
        assert_eq!(game.sheet(), &ScoreSheet::new());
        assert_eq!(game.rolls_left(), 3);
        assert_eq!(game.plays_left(), 39);
        assert!(!game.can_undo());
    }

    #[test]
    #[should_panic]
    fn die_index_out_of_range_panics() {
        let mut game = rolled(&[1]);
        let _ = game.select_die(7, true);
    }
}
