use chrono::Local;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, trace};
use tripleytz::{
    Category, Column, CommitOutcome, Game, GameEvent, HighScoreLedger, IllegalIntent, NUM_DICE,
};
use tripleytz_config::Config;

/// Frames a rolled die keeps tumbling before it shows its real face.
const BOUNCE_FRAMES: u8 = 8;

/// What the keyboard currently controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Playing,
    /// The game is over and the score did not make the list.
    GameOver { final_score: u32 },
    /// The game is over and the player is typing a name for the high-score list.
    NamePrompt { final_score: u32, input: String },
    HighScores,
}

/// Cosmetic tumbling of freshly rolled dice. Never touches the game.
#[derive(Clone, Debug)]
pub struct Bounce {
    tumbling: [bool; NUM_DICE],
    faces: [u8; NUM_DICE],
    frames_left: u8,
}

pub struct App {
    pub game: Game,
    pub config: Config,
    rng: StdRng,
    /// The focused score cell.
    pub cursor: (Category, Column),
    pub mode: Mode,
    pub bounce: Option<Bounce>,
    /// One line of feedback, e.g. why an intent was rejected.
    pub status: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, rng: StdRng) -> Self {
        Self {
            game: Game::new(),
            config,
            rng,
            cursor: (Category::Aces, Column::Single),
            mode: Mode::Playing,
            bounce: None,
            status: String::from("Press r to roll"),
            should_quit: false,
        }
    }

    /// The faces to draw, including the tumbling ones.
    pub fn shown_faces(&self) -> [u8; NUM_DICE] {
        let mut faces = self.game.dice().faces();
        if let Some(bounce) = &self.bounce {
            for i in 0..NUM_DICE {
                if bounce.tumbling[i] {
                    faces[i] = bounce.faces[i];
                }
            }
        }
        faces
    }

    pub fn on_tick(&mut self) {
        let Some(bounce) = &mut self.bounce else {
            return;
        };
        if bounce.frames_left == 0 {
            self.bounce = None;
            return;
        }
        bounce.frames_left -= 1;
        let mut rng = rand::thread_rng();
        for i in 0..NUM_DICE {
            if bounce.tumbling[i] {
                bounce.faces[i] = rng.gen_range(1..=6);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match &mut self.mode {
            Mode::Playing => self.on_key_playing(key.code),
            Mode::GameOver { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.conclude(None);
                }
            }
            Mode::NamePrompt { input, .. } => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let name = input.trim().to_string();
                    self.conclude((!name.is_empty()).then_some(name));
                }
                KeyCode::Esc => self.conclude(None),
                _ => {}
            },
            Mode::HighScores => match key.code {
                KeyCode::Char('c') => {
                    self.config.clear_high_scores();
                    self.config.save();
                    self.status = String::from("High scores cleared");
                }
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('q') => {
                    self.mode = Mode::Playing;
                }
                _ => {}
            },
        }
    }

    fn on_key_playing(&mut self, code: KeyCode) {
        let result = match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char('r') | KeyCode::Char(' ') => self.roll(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.game.toggle_die(index)
            }
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter => self.commit(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('n') => {
                self.game.new_game();
                self.status = String::from("New game");
                Ok(())
            }
            KeyCode::Char('h') => {
                self.mode = Mode::HighScores;
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            debug!(%err, "Intent rejected");
            self.status = err.to_string();
        }
        self.process_events();
    }

    fn roll(&mut self) -> Result<(), IllegalIntent> {
        self.game.roll(&mut self.rng)?;
        self.status = format!("Rolled {}", self.game.dice());
        self.preview_cursor();
        Ok(())
    }

    fn commit(&mut self) -> Result<(), IllegalIntent> {
        let (category, column) = self.cursor;
        match self.game.commit(category, column)? {
            CommitOutcome::NextRound => {
                self.status = format!(
                    "{} ({}) scored {}",
                    category,
                    column,
                    self.game.slot(category, column).shown().unwrap_or(0)
                );
            }
            CommitOutcome::GameOver { final_score } => {
                info!(final_score, "Game over");
                self.status = format!("Your final score is {}!", final_score);
                self.mode = if self.config.is_high_score(final_score) {
                    Mode::NamePrompt {
                        final_score,
                        input: String::from(self.config.last_used_name()),
                    }
                } else {
                    Mode::GameOver { final_score }
                };
            }
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), IllegalIntent> {
        self.game.undo()?;
        self.status = String::from("Undone");
        self.preview_cursor();
        Ok(())
    }

    fn conclude(&mut self, name: Option<String>) {
        match self
            .game
            .conclude(&mut self.config, |_, _| name, Local::now())
        {
            Ok(conclusion) => {
                self.mode = if conclusion.ranked {
                    Mode::HighScores
                } else {
                    Mode::Playing
                };
                self.status = format!("Final score {}. New game", conclusion.final_score);
            }
            Err(err) => {
                self.status = err.to_string();
                self.mode = Mode::Playing;
            }
        }
        self.process_events();
    }

    fn move_cursor(&mut self, d_row: i32, d_col: i32) -> Result<(), IllegalIntent> {
        let (category, column) = self.cursor;
        let row = (category.index() as i32 + d_row).rem_euclid(Category::COUNT as i32);
        let col = (column.index() as i32 + d_col).rem_euclid(Column::COUNT as i32);
        self.game.unpreview(category, column);
        self.cursor = (Category::ALL[row as usize], Column::ALL[col as usize]);
        self.preview_cursor();
        Ok(())
    }

    /// Focus on a cell previews it when it can be scored.
    fn preview_cursor(&mut self) {
        let (category, column) = self.cursor;
        if self.game.can_commit(category, column) {
            // Can't fail after can_commit().
            let _ = self.game.preview(category, column);
        }
    }

    fn process_events(&mut self) {
        let mut rolled = [false; NUM_DICE];
        for event in self.game.drain_events() {
            trace!(?event);
            match event {
                GameEvent::DieChanged { index, .. } => rolled[index] = true,
                GameEvent::NewGame => self.bounce = None,
                _ => {}
            }
        }
        if rolled.iter().any(|&r| r) {
            self.bounce = Some(Bounce {
                tumbling: rolled,
                faces: self.game.dice().faces(),
                frames_left: BOUNCE_FRAMES,
            });
        }
    }
}
