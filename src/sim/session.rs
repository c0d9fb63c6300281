//! Session state machine
//!
//! ```text
//! Playing --submit--> AwaitingNext --advance--> Playing
//!    |                     |
//!    +--tick/game_over-----+--time out--> GameOver --restart--> Playing
//! ```
//!
//! The session owns no timer. The host calls `tick` once per clock unit and
//! fires the `AdvanceTicket` returned by `submit_answer` after its delay.
//! Tickets carry the generation they were issued in; `restart`, `game_over`
//! and later submissions move the generation on, so an old ticket does
//! nothing when it finally fires.

use std::fmt;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::options::check_range;
use super::select::select_question;
use super::state::{Question, Snapshot, Status};
use crate::catalog::{ContentCatalog, MemoryCatalog};
use crate::error::QuizError;
use crate::settings::Settings;

/// Handle returned by `Session::subscribe`
pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(&Snapshot) + Send>;

/// Deferred move to the next question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    delay: Duration,
}

impl AdvanceTicket {
    /// How long the host should wait before calling `Session::advance`
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of `Session::submit_answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not accepting answers right now
    Ignored,
    /// Answer judged; fire the ticket after its delay
    Feedback { correct: bool, ticket: AdvanceTicket },
    /// Answer judged and the clock ran out
    GameOver { correct: bool },
}

pub struct Session<C = MemoryCatalog> {
    catalog: C,
    settings: Settings,
    rng: Pcg32,
    score: u32,
    high_score: u32,
    time_remaining: i32,
    status: Status,
    question: Question,
    selected_answer: Option<i64>,
    last_answer_correct: Option<bool>,
    generation: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

impl<C: ContentCatalog> Session<C> {
    /// Start a session with a fixed RNG seed
    pub fn new(catalog: C, settings: Settings, seed: u64) -> Result<Self, QuizError> {
        check_range(&settings.option_range())?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let question = select_question(&catalog, &mut rng, 0, settings.option_range())?;
        log::debug!("Session started with seed {seed}");

        Ok(Self {
            time_remaining: settings.start_time,
            catalog,
            settings,
            rng,
            score: 0,
            high_score: 0,
            status: Status::Playing,
            question,
            selected_answer: None,
            last_answer_correct: None,
            generation: 0,
            observers: Vec::new(),
            next_subscription: 1,
        })
    }

    /// Start a session seeded from the thread RNG
    pub fn from_entropy(catalog: C, settings: Settings) -> Result<Self, QuizError> {
        let seed = rand::rng().random::<u64>();
        Self::new(catalog, settings, seed)
    }

    /// Carry over a high score from an earlier run
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = self.high_score.max(high_score);
        self
    }

    /// Advance the clock by one unit
    pub fn tick(&mut self) {
        if self.status == Status::GameOver {
            return;
        }
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        if self.time_remaining <= 0 {
            self.enter_game_over();
        }
        self.notify();
    }

    /// Judge an answer. Only the first submission per question counts.
    pub fn submit_answer(&mut self, answer: i64) -> SubmitOutcome {
        if self.status != Status::Playing {
            log::debug!("Ignoring answer {answer} while {:?}", self.status);
            return SubmitOutcome::Ignored;
        }

        self.status = Status::AwaitingNext;
        self.selected_answer = Some(answer);
        self.generation += 1;

        let correct = self.question.is_correct(answer);
        if correct {
            self.score = self.score.saturating_add(1);
            self.time_remaining = self.time_remaining.saturating_add(self.settings.correct_bonus);
            self.high_score = self.high_score.max(self.score);
        } else if self.time_remaining > 0 {
            self.time_remaining = self.time_remaining.saturating_sub(self.settings.wrong_penalty);
        }
        self.last_answer_correct = Some(correct);
        log::debug!(
            "Answer {answer} {} (score {}, time {})",
            if correct { "correct" } else { "wrong" },
            self.score,
            self.time_remaining
        );

        let outcome = if self.time_remaining <= 0 {
            self.enter_game_over();
            SubmitOutcome::GameOver { correct }
        } else {
            SubmitOutcome::Feedback {
                correct,
                ticket: AdvanceTicket {
                    generation: self.generation,
                    delay: self.settings.feedback_delay(),
                },
            }
        };
        self.notify();
        outcome
    }

    /// Load the next question for a ticket from `submit_answer`.
    ///
    /// Returns `Ok(false)` when the ticket is stale. On error the session is
    /// left as it was, still awaiting the next question.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Result<bool, QuizError> {
        if self.status != Status::AwaitingNext || ticket.generation != self.generation {
            log::debug!("Dropping stale advance ticket {}", ticket.generation);
            return Ok(false);
        }

        self.question = self.next_question(self.score)?;
        self.selected_answer = None;
        self.last_answer_correct = None;
        self.status = Status::Playing;
        self.notify();
        Ok(true)
    }

    /// Start a new run. The high score survives.
    ///
    /// On error nothing changes, so a failed restart can be retried.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        let question = self.next_question(0)?;

        self.generation += 1;
        self.score = 0;
        self.time_remaining = self.settings.start_time;
        self.question = question;
        self.selected_answer = None;
        self.last_answer_correct = None;
        self.status = Status::Playing;
        log::info!("Restarted (high score {})", self.high_score);
        self.notify();
        Ok(())
    }

    /// End the run now
    pub fn game_over(&mut self) {
        if self.status == Status::GameOver {
            return;
        }
        self.enter_game_over();
        self.notify();
    }

    /// Register an observer called after every change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            score: self.score,
            high_score: self.high_score,
            time_remaining: self.time_remaining,
            start_time: self.settings.start_time,
            question: self.question.clone(),
            selected_answer: self.selected_answer,
            last_answer_correct: self.last_answer_correct,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn time_remaining(&self) -> i32 {
        self.time_remaining
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn selected_answer(&self) -> Option<i64> {
        self.selected_answer
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_answer_correct
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn next_question(&mut self, score: u32) -> Result<Question, QuizError> {
        select_question(&self.catalog, &mut self.rng, score, self.settings.option_range())
    }

    fn enter_game_over(&mut self) {
        self.status = Status::GameOver;
        self.selected_answer = None;
        self.generation += 1;
        log::info!("Game over: score {}, high score {}", self.score, self.high_score);
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("time_remaining", &self.time_remaining)
            .field("question", &self.question)
            .field("selected_answer", &self.selected_answer)
            .field("last_answer_correct", &self.last_answer_correct)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
