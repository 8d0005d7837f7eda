use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of dice in a [`Dice`] set.
pub const NUM_DICE: usize = 5;

/// The faces the dice show after [`Dice::reset()`].
pub const INITIAL_FACES: [u8; NUM_DICE] = [1, 2, 3, 4, 5];

/// Something that can produce die faces.
///
/// Every [`rand::Rng`] is a `DieSource`. Tests and replays can use
/// [`ScriptedDice`] instead.
pub trait DieSource {
    /// A face value in `1..=6`.
    fn roll_die(&mut self) -> u8;
}

impl<R: Rng + ?Sized> DieSource for R {
    fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=6)
    }
}

/// A deterministic [`DieSource`] that cycles through a fixed list of faces.
///
/// ```
/// use tripleytz::{DieSource, ScriptedDice};
/// let mut src = ScriptedDice::new(&[6, 2]);
/// assert_eq!([src.roll_die(), src.roll_die(), src.roll_die()], [6, 2, 6]);
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Panics if `faces` is empty or contains a value outside `1..=6`.
    pub fn new(faces: &[u8]) -> Self {
        assert!(!faces.is_empty(), "ScriptedDice needs at least one face");
        assert!(
            faces.iter().all(|f| (1..=6).contains(f)),
            "ScriptedDice faces must be in 1..=6, got {:?}",
            faces
        );
        Self {
            faces: faces.to_vec(),
            next: 0,
        }
    }
}

impl DieSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

/// Five dice, each with a "kept" flag.
///
/// The order of the dice only matters for display, never for scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    faces: [u8; NUM_DICE],
    kept: [bool; NUM_DICE],
}

impl Dice {
    pub fn new() -> Self {
        Self {
            faces: INITIAL_FACES,
            kept: [false; NUM_DICE],
        }
    }

    pub fn faces(&self) -> [u8; NUM_DICE] {
        self.faces
    }

    pub fn kept(&self) -> [bool; NUM_DICE] {
        self.kept
    }

    pub fn is_kept(&self, index: usize) -> bool {
        assert!(index < NUM_DICE, "die index {} out of range", index);
        self.kept[index]
    }

    /// Marks die `index` as kept or not. The face values are untouched.
    ///
    /// Panics if `index` is not in `0..5`.
    pub fn select(&mut self, index: usize, keep: bool) {
        assert!(index < NUM_DICE, "die index {} out of range", index);
        self.kept[index] = keep;
    }

    pub fn release_all(&mut self) {
        self.kept = [false; NUM_DICE];
    }

    pub(crate) fn set_kept(&mut self, kept: [bool; NUM_DICE]) {
        self.kept = kept;
    }

    /// Draws a new face for every die that is not kept.
    ///
    /// Returns `(index, new_face)` for each die whose face actually changed.
    pub fn roll<S: DieSource + ?Sized>(&mut self, source: &mut S) -> Vec<(usize, u8)> {
        let mut changed = Vec::new();
        for (index, face) in self.faces.iter_mut().enumerate() {
            if self.kept[index] {
                continue;
            }
            let new_face = source.roll_die();
            debug_assert!((1..=6).contains(&new_face));
            if new_face != *face {
                *face = new_face;
                changed.push((index, new_face));
            }
        }
        changed
    }

    /// Back to `1, 2, 3, 4, 5` with nothing kept.
    ///
    /// Only a new game does this; rounds keep the faces of the previous round.
    pub fn reset(&mut self) {
        self.faces = INITIAL_FACES;
        self.kept = [false; NUM_DICE];
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, face) in self.faces.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            if self.kept[index] {
                write!(f, "[{}]", face)?;
            } else {
                write!(f, "{}", face)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn roll_leaves_kept_dice_alone() {
        let mut dice = Dice::new();
        dice.select(1, true);
        dice.select(3, true);
        dice.roll(&mut ScriptedDice::new(&[6]));
        assert_eq!(dice.faces(), [6, 2, 6, 4, 6]);
        assert_eq!(dice.kept(), [false, true, false, true, false]);
    }

    #[test]
    fn roll_reports_only_changed_dice() {
        let mut dice = Dice::new();
        let changed = dice.roll(&mut ScriptedDice::new(&[1, 2, 6, 4, 1]));
        assert_eq!(changed, vec![(2, 6), (4, 1)]);
    }

    #[test]
    fn rng_faces_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut dice = Dice::new();
        for _ in 0..200 {
            dice.roll(&mut rng);
            assert!(dice.faces().iter().all(|f| (1..=6).contains(f)));
        }
    }

    #[test]
    fn reset_restores_initial_pattern() {
        let mut dice = Dice::new();
        dice.select(0, true);
        dice.roll(&mut ScriptedDice::new(&[3]));
        dice.reset();
        assert_eq!(dice, Dice::new());
        assert_eq!(dice.to_string(), "1 2 3 4 5");
    }

    #[test]
    #[should_panic]
    fn select_out_of_range_panics() {
        Dice::new().select(5, true);
    }
}
