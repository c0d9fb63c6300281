//! Game rules and timing
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StoreError;
use crate::sim::options::check_range;

/// Tunable rules for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Clock value at the start of every run
    pub start_time: i32,
    /// Time added for a correct answer
    pub correct_bonus: i32,
    /// Time removed for a wrong answer
    pub wrong_penalty: i32,
    /// Pause before the next question, in milliseconds
    pub feedback_delay_ms: u64,
    /// Length of one clock unit, in milliseconds (host driver only)
    pub tick_interval_ms: u64,
    /// Inclusive range distractors are drawn from
    pub option_low: i64,
    pub option_high: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_time: START_TIME,
            correct_bonus: CORRECT_BONUS,
            wrong_penalty: WRONG_PENALTY,
            feedback_delay_ms: FEEDBACK_DELAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
            option_low: OPTION_LOW,
            option_high: OPTION_HIGH,
        }
    }
}

impl Settings {
    pub fn option_range(&self) -> RangeInclusive<i64> {
        self.option_low..=self.option_high
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject settings that would break the clock rules or fail on every
    /// question
    pub fn validate(&self) -> Result<(), StoreError> {
        let invalid = |field: &'static str, value: i64, reason: &'static str| {
            StoreError::InvalidSettings { field, value, reason }
        };
        if self.start_time <= 0 {
            return Err(invalid("start_time", self.start_time.into(), "must be positive"));
        }
        if self.correct_bonus < 0 {
            return Err(invalid("correct_bonus", self.correct_bonus.into(), "must not be negative"));
        }
        if self.wrong_penalty <= 0 {
            return Err(invalid("wrong_penalty", self.wrong_penalty.into(), "must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", 0, "must be positive"));
        }
        check_range(&self.option_range())?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is unusable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }
}
