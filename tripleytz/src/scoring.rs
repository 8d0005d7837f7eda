use serde::{Deserialize, Serialize};

use crate::NUM_DICE;

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YAHTZEE_SCORE: u32 = 50;

/// One of the 13 scoring categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Aces,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    pub const COUNT: usize = 13;

    /// All categories in score sheet order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Aces,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    pub const UPPER: [Category; 6] = [
        Category::Aces,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    pub const LOWER: [Category; 7] = [
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Aces through Sixes.
    pub fn is_upper(self) -> bool {
        self.index() < 6
    }

    /// The score these dice would get in this category.
    pub fn score(self, faces: &[u8; NUM_DICE]) -> u32 {
        PipCounts::from_faces(faces).score(self)
    }

    /// The label shown on the score sheet.
    pub fn label(self) -> &'static str {
        match self {
            Category::Aces => "Aces",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::ThreeOfAKind => "Three of a kind",
            Category::FourOfAKind => "Four of a kind",
            Category::FullHouse => "Full House",
            Category::SmallStraight => "Sm. Straight",
            Category::LargeStraight => "Lg. Straight",
            Category::Yahtzee => "YAHTZEE",
            Category::Chance => "Chance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How many dice show each face. Index 0 is the count of ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PipCounts([u8; 6]);

impl PipCounts {
    /// Panics (in debug builds) on a face outside `1..=6`.
    pub fn from_faces(faces: &[u8; NUM_DICE]) -> Self {
        let mut counts = [0u8; 6];
        for &face in faces {
            debug_assert!((1..=6).contains(&face), "invalid die face {}", face);
            counts[face as usize - 1] += 1;
        }
        Self(counts)
    }

    /// Number of dice showing `face`.
    pub fn count(&self, face: u8) -> u8 {
        self.0[face as usize - 1]
    }

    pub fn sum_of_pips(&self) -> u32 {
        self.0
            .iter()
            .zip(1u32..)
            .map(|(&count, face)| count as u32 * face)
            .sum()
    }

    fn any_count(&self, pred: impl Fn(u8) -> bool) -> bool {
        self.0.iter().any(|&c| pred(c))
    }

    /// True if every face in `lo..=hi` satisfies `pred`.
    fn run(&self, lo: u8, hi: u8, pred: impl Fn(u8) -> bool) -> bool {
        (lo..=hi).all(|face| pred(self.count(face)))
    }

    pub fn score(&self, category: Category) -> u32 {
        match category {
            Category::Aces => self.upper(1),
            Category::Twos => self.upper(2),
            Category::Threes => self.upper(3),
            Category::Fours => self.upper(4),
            Category::Fives => self.upper(5),
            Category::Sixes => self.upper(6),
            Category::ThreeOfAKind => {
                if self.any_count(|c| c >= 3) {
                    self.sum_of_pips()
                } else {
                    0
                }
            }
            Category::FourOfAKind => {
                if self.any_count(|c| c >= 4) {
                    self.sum_of_pips()
                } else {
                    0
                }
            }
            // Five of a kind has no face with exactly three, so it is not a full house.
            Category::FullHouse => {
                if self.any_count(|c| c == 3) && self.any_count(|c| c == 2) {
                    FULL_HOUSE_SCORE
                } else {
                    0
                }
            }
            Category::SmallStraight => {
                if [(1, 4), (2, 5), (3, 6)]
                    .into_iter()
                    .any(|(lo, hi)| self.run(lo, hi, |c| c >= 1))
                {
                    SMALL_STRAIGHT_SCORE
                } else {
                    0
                }
            }
            Category::LargeStraight => {
                if [(1, 5), (2, 6)]
                    .into_iter()
                    .any(|(lo, hi)| self.run(lo, hi, |c| c == 1))
                {
                    LARGE_STRAIGHT_SCORE
                } else {
                    0
                }
            }
            Category::Yahtzee => {
                if self.any_count(|c| c == 5) {
                    YAHTZEE_SCORE
                } else {
                    0
                }
            }
            Category::Chance => self.sum_of_pips(),
        }
    }

    fn upper(&self, face: u8) -> u32 {
        self.count(face) as u32 * face as u32
    }
}
