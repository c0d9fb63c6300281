//! Quick Math - a timed arithmetic quiz
//!
//! Core modules:
//! - `sim`: Deterministic quiz engine (evaluation, options, selection, session)
//! - `catalog`: Content catalog trait, JSON file format, offline generator
//! - `settings`: Tunable game rules
//! - `highscores`: High score persistence hook
//! - `error`: Error taxonomy

pub mod catalog;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use catalog::{CatalogEntry, ContentCatalog, MemoryCatalog};
pub use error::{QuizError, StoreError};
pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore};
pub use settings::Settings;
pub use sim::{AdvanceTicket, Operator, Question, Session, Snapshot, Status, SubmitOutcome, Tier};

/// Game configuration constants
pub mod consts {
    /// Seconds on the clock at the start of every run
    pub const START_TIME: i32 = 30;
    /// Seconds added for a correct answer
    pub const CORRECT_BONUS: i32 = 1;
    /// Seconds removed for a wrong answer
    pub const WRONG_PENALTY: i32 = 5;
    /// Pause between an answer and the next question
    pub const FEEDBACK_DELAY_MS: u64 = 500;
    /// Length of one clock unit for the host driver
    pub const TICK_INTERVAL_MS: u64 = 1000;

    /// Answer options shown per question
    pub const OPTION_COUNT: usize = 4;
    /// Default distractor range (inclusive)
    pub const OPTION_LOW: i64 = 0;
    pub const OPTION_HIGH: i64 = 99;

    /// Number of difficulty tiers
    pub const TIER_COUNT: u8 = 5;
    /// First score of tiers 2..=5
    pub const TIER_BREAKPOINTS: [u32; 4] = [3, 6, 8, 10];

    /// Offline generator: operand range
    pub const GEN_OPERAND_MIN: i64 = 1;
    pub const GEN_OPERAND_MAX: i64 = 50;
    /// Offline generator: divisor and quotient range for division
    pub const GEN_DIVISOR_MIN: i64 = 2;
    pub const GEN_DIVISOR_MAX: i64 = 10;
    /// Offline generator: accepted answer range (inclusive)
    pub const GEN_ANSWER_MIN: i64 = -20;
    pub const GEN_ANSWER_MAX: i64 = 90;
    /// Offline generator: entries written per tier
    pub const GEN_PER_TIER: usize = 200;
    /// Offline generator: candidates tried before giving up
    pub const GEN_MAX_ATTEMPTS: u64 = 2_000_000;
}
