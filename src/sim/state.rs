//! Quiz state types
//!
//! Everything the presentation layer reads lives here.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::expr::Operator;
use crate::consts::{OPTION_COUNT, TIER_BREAKPOINTS, TIER_COUNT};
use crate::error::StoreError;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Clock running, waiting for an answer
    Playing,
    /// Answer submitted, showing feedback before the next question
    AwaitingNext,
    /// Run ended; only a restart leaves this state
    GameOver,
}

/// Difficulty tier, 1 (easiest) to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(TIER_COUNT);

    pub fn new(value: u8) -> Result<Self, StoreError> {
        if (1..=TIER_COUNT).contains(&value) {
            Ok(Tier(value))
        } else {
            Err(StoreError::InvalidTier(value))
        }
    }

    /// Tier for a score: [0,3) → 1, [3,6) → 2, [6,8) → 3, [8,10) → 4, 10+ → 5
    pub fn for_score(score: u32) -> Self {
        let passed = TIER_BREAKPOINTS.iter().filter(|&&b| score >= b).count();
        Tier(1 + passed as u8)
    }

    /// Tier for a raw level, clamped into 1..=5
    pub fn for_level(level: u8) -> Self {
        Tier(level.clamp(1, TIER_COUNT))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index, for per-tier arrays
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = Tier> {
        (1..=TIER_COUNT).map(Tier)
    }
}

impl TryFrom<u8> for Tier {
    type Error = StoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully resolved question
///
/// `third_number` only means something when `second_operator` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub first_number: i64,
    pub second_number: i64,
    pub third_number: i64,
    pub first_operator: Operator,
    pub second_operator: Option<Operator>,
    pub correct_answer: i64,
    pub options: [i64; OPTION_COUNT],
}

impl Question {
    pub fn is_correct(&self, answer: i64) -> bool {
        answer == self.correct_answer
    }

    /// Prompt text, e.g. `"10 - 4 * 2 = ?"`
    pub fn prompt(&self) -> String {
        format!("{self} = ?")
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.first_number, self.first_operator, self.second_number
        )?;
        if let Some(op) = self.second_operator {
            write!(f, " {} {}", op, self.third_number)?;
        }
        Ok(())
    }
}

/// Read-only copy of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: Status,
    pub score: u32,
    pub high_score: u32,
    pub time_remaining: i32,
    /// Starting clock value, for drawing the countdown ring
    pub start_time: i32,
    pub question: Question,
    pub selected_answer: Option<i64>,
    pub last_answer_correct: Option<bool>,
}

impl Snapshot {
    /// Fraction of the starting clock left, clamped to [0, 1]
    pub fn time_fraction(&self) -> f32 {
        if self.start_time <= 0 {
            return 0.0;
        }
        (self.time_remaining as f32 / self.start_time as f32).clamp(0.0, 1.0)
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_breakpoints() {
        let cases = [
            (0, 1),
            (2, 1),
            (3, 2),
            (5, 2),
            (6, 3),
            (7, 3),
            (8, 4),
            (9, 4),
            (10, 5),
            (1000, 5),
            (u32::MAX, 5),
        ];
        for (score, tier) in cases {
            assert_eq!(Tier::for_score(score).get(), tier, "score {score}");
        }
    }

    #[test]
    fn test_tier_bounds() {
        assert!(Tier::new(0).is_err());
        assert!(Tier::new(6).is_err());
        assert_eq!(Tier::new(3).unwrap().index(), 2);
        assert_eq!(Tier::all().count(), 5);
        assert_eq!(Tier::all().last(), Some(Tier::MAX));
    }

    #[test]
    fn test_tier_deserialize_checks_bounds() {
        assert!(serde_json::from_str::<Tier>("0").is_err());
        assert!(serde_json::from_str::<Tier>("6").is_err());
        let tier: Tier = serde_json::from_str("4").unwrap();
        assert_eq!(tier.index(), 3);
        assert_eq!(serde_json::to_string(&tier).unwrap(), "4");
    }

    #[test]
    fn test_question_prompt() {
        let mut q = Question {
            first_number: 10,
            second_number: 4,
            third_number: 2,
            first_operator: Operator::Sub,
            second_operator: Some(Operator::Mul),
            correct_answer: 12,
            options: [12, 3, 40, 77],
        };
        assert_eq!(q.prompt(), "10 - 4 * 2 = ?");
        q.second_operator = None;
        assert_eq!(q.prompt(), "10 - 4 = ?");
        assert!(q.is_correct(12));
        assert!(!q.is_correct(6));
    }

    #[test]
    fn test_time_fraction_clamps() {
        let q = Question {
            first_number: 1,
            second_number: 1,
            third_number: 0,
            first_operator: Operator::Add,
            second_operator: None,
            correct_answer: 2,
            options: [2, 0, 1, 3],
        };
        let mut snap = Snapshot {
            status: Status::Playing,
            score: 0,
            high_score: 0,
            time_remaining: 15,
            start_time: 30,
            question: q,
            selected_answer: None,
            last_answer_correct: None,
        };
        assert_eq!(snap.time_fraction(), 0.5);
        snap.time_remaining = 45;
        assert_eq!(snap.time_fraction(), 1.0);
        snap.time_remaining = -2;
        assert_eq!(snap.time_fraction(), 0.0);
    }
}
