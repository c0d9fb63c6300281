//! Offline catalog generation
//!
//! Builds random candidate expressions, keeps those whose answer falls in the
//! accepted range, and sorts them into tiers with a `DifficultyClassifier`.
//! Run once ahead of time; the engine only ever reads the result.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::{CatalogEntry, ContentCatalog, MemoryCatalog};
use crate::consts::*;
use crate::error::StoreError;
use crate::sim::{Operator, Tier};

/// Assigns a difficulty tier to a candidate expression
pub trait DifficultyClassifier {
    fn classify(&self, entry: &CatalogEntry, answer: i64) -> Tier;
}

impl<F> DifficultyClassifier for F
where
    F: Fn(&CatalogEntry, i64) -> Tier,
{
    fn classify(&self, entry: &CatalogEntry, answer: i64) -> Tier {
        self(entry, answer)
    }
}

/// Rule-of-thumb classifier: more operands, multiplication, division, large
/// or negative answers each push the tier up.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl DifficultyClassifier for RuleClassifier {
    fn classify(&self, entry: &CatalogEntry, answer: i64) -> Tier {
        let op_weight = |op: Operator| match op {
            Operator::Add | Operator::Sub => 0,
            Operator::Mul | Operator::Div => 1,
        };

        let mut points = op_weight(entry.first_operator);
        if let Some(op) = entry.second_operator {
            points += 2 + op_weight(op);
        }
        if answer.abs() >= 30 {
            points += 1;
        }
        if answer < 0 {
            points += 1;
        }

        let level = (1 + points).min(i32::from(TIER_COUNT));
        Tier::for_level(level as u8)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Entries to collect for each tier
    pub per_tier: usize,
    /// Candidates to try before giving up
    pub max_attempts: u64,
    /// Answers outside this range are discarded
    pub answer_range: RangeInclusive<i64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            per_tier: GEN_PER_TIER,
            max_attempts: GEN_MAX_ATTEMPTS,
            answer_range: GEN_ANSWER_MIN..=GEN_ANSWER_MAX,
        }
    }
}

/// Exact division pair: `(divisor * quotient, divisor)`
fn division_pair<R: Rng + ?Sized>(rng: &mut R) -> (i64, i64) {
    let divisor = rng.random_range(GEN_DIVISOR_MIN..=GEN_DIVISOR_MAX);
    let quotient = rng.random_range(1..=GEN_DIVISOR_MAX);
    (divisor * quotient, divisor)
}

/// Draw one candidate, or `None` if it breaks a rule.
pub fn random_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    answer_range: &RangeInclusive<i64>,
) -> Option<(CatalogEntry, i64)> {
    let operands = GEN_OPERAND_MIN..=GEN_OPERAND_MAX;
    let op1 = *Operator::ALL.choose(rng)?;
    let (a, b) = if op1 == Operator::Div {
        division_pair(rng)
    } else {
        (rng.random_range(operands.clone()), rng.random_range(operands.clone()))
    };

    let entry = if rng.random_bool(0.5) {
        CatalogEntry::binary(a, op1, b)
    } else {
        let op2 = *Operator::ALL.choose(rng)?;
        let c = if op2 == Operator::Div {
            let head = op1.apply(a, b).ok()?;
            let divisor = rng.random_range(GEN_DIVISOR_MIN..=GEN_DIVISOR_MAX);
            if head % divisor != 0 {
                return None;
            }
            divisor
        } else {
            rng.random_range(operands)
        };
        CatalogEntry::ternary(a, op1, b, op2, c)
    };

    let answer = entry.evaluate().ok()?;
    answer_range.contains(&answer).then_some((entry, answer))
}

/// Fill every tier with `config.per_tier` entries
pub fn generate_catalog<R, D>(
    rng: &mut R,
    classifier: &D,
    config: &GeneratorConfig,
) -> Result<MemoryCatalog, StoreError>
where
    R: Rng + ?Sized,
    D: DifficultyClassifier + ?Sized,
{
    let mut catalog = MemoryCatalog::new();
    let mut remaining = config.per_tier * usize::from(TIER_COUNT);
    let mut attempts = 0u64;

    while remaining > 0 {
        if attempts >= config.max_attempts {
            let short = Tier::all()
                .find(|t| catalog.tier_len(*t) < config.per_tier)
                .unwrap_or(Tier::MIN);
            return Err(StoreError::GenerationExhausted {
                attempts,
                tier: short.get(),
            });
        }
        attempts += 1;

        let Some((entry, answer)) = random_candidate(rng, &config.answer_range) else {
            continue;
        };
        let tier = classifier.classify(&entry, answer);
        if catalog.tier_len(tier) < config.per_tier {
            catalog.push(tier, entry);
            remaining -= 1;
            if catalog.tier_len(tier) == config.per_tier {
                log::info!("Tier {tier} full after {attempts} attempts");
            }
        }
    }

    debug_assert!(Tier::all().all(|t| catalog.entries_for_tier(t).len() == config.per_tier));
    Ok(catalog)
}
