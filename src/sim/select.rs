//! Question selection
//!
//! Score picks the tier, the tier picks a random catalog entry, and the entry
//! is resolved into a `Question` with an answer and shuffled options.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::options::generate_options;
use super::state::{Question, Tier};
use crate::catalog::ContentCatalog;
use crate::error::QuizError;

/// Draw a question suited to `score`.
///
/// Draws are independent; the same entry may come up twice in a row.
pub fn select_question<C, R>(
    catalog: &C,
    rng: &mut R,
    score: u32,
    option_range: RangeInclusive<i64>,
) -> Result<Question, QuizError>
where
    C: ContentCatalog + ?Sized,
    R: Rng + ?Sized,
{
    let tier = Tier::for_score(score);
    let entry = catalog
        .entries_for_tier(tier)
        .choose(rng)
        .ok_or(QuizError::EmptyCatalogTier { tier: tier.get() })?;

    let correct_answer = entry.evaluate()?;
    let options = generate_options(rng, correct_answer, option_range)?;

    let question = Question {
        first_number: entry.first_number,
        second_number: entry.second_number,
        third_number: entry.third_number,
        first_operator: entry.first_operator,
        second_operator: entry.second_operator,
        correct_answer,
        options,
    };
    log::debug!("Tier {} question: {} = {}", tier, question, correct_answer);
    Ok(question)
}
