//! Content catalog
//!
//! The engine never writes questions itself. It draws them from a catalog of
//! pre-generated expressions grouped by difficulty tier.
//!
//! - `json`: on-disk format (one file per tier)
//! - `generate`: offline tool that builds catalogs

pub mod generate;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::sim::{Operator, Tier, evaluate};

/// One catalog expression: `first op second [op third]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "json::RawEntry", into = "json::RawEntry")]
pub struct CatalogEntry {
    pub first_number: i64,
    pub second_number: i64,
    /// Zero when `second_operator` is `None`
    pub third_number: i64,
    pub first_operator: Operator,
    pub second_operator: Option<Operator>,
}

impl CatalogEntry {
    pub fn binary(a: i64, op: Operator, b: i64) -> Self {
        Self {
            first_number: a,
            second_number: b,
            third_number: 0,
            first_operator: op,
            second_operator: None,
        }
    }

    pub fn ternary(a: i64, op1: Operator, b: i64, op2: Operator, c: i64) -> Self {
        Self {
            first_number: a,
            second_number: b,
            third_number: c,
            first_operator: op1,
            second_operator: Some(op2),
        }
    }

    pub fn tail(&self) -> Option<(Operator, i64)> {
        self.second_operator.map(|op| (op, self.third_number))
    }

    pub fn evaluate(&self) -> Result<i64, QuizError> {
        evaluate(
            self.first_number,
            self.first_operator,
            self.second_number,
            self.tail(),
        )
    }
}

/// Source of expressions for each tier.
///
/// Lookups are assumed to be in-memory; the engine calls this on every new
/// question.
pub trait ContentCatalog {
    fn entries_for_tier(&self, tier: Tier) -> &[CatalogEntry];
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCatalog {
    tiers: [Vec<CatalogEntry>; crate::consts::TIER_COUNT as usize],
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: Tier, entry: CatalogEntry) {
        self.tiers[tier.index()].push(entry);
    }

    /// Replace every entry of a tier
    pub fn set_tier(&mut self, tier: Tier, entries: Vec<CatalogEntry>) {
        self.tiers[tier.index()] = entries;
    }

    pub fn with_tier(mut self, tier: Tier, entries: Vec<CatalogEntry>) -> Self {
        self.set_tier(tier, entries);
        self
    }

    pub fn tier_len(&self, tier: Tier) -> usize {
        self.tiers[tier.index()].len()
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(Vec::is_empty)
    }

    /// Tiers that hold no entries
    pub fn empty_tiers(&self) -> Vec<Tier> {
        Tier::all().filter(|t| self.tier_len(*t) == 0).collect()
    }
}

impl ContentCatalog for MemoryCatalog {
    fn entries_for_tier(&self, tier: Tier) -> &[CatalogEntry] {
        &self.tiers[tier.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_catalog_tiers() {
        let t2 = Tier::new(2).unwrap();
        let mut catalog = MemoryCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.empty_tiers().len(), 5);

        catalog.push(t2, CatalogEntry::binary(1, Operator::Add, 1));
        catalog.push(t2, CatalogEntry::binary(2, Operator::Mul, 3));
        assert_eq!(catalog.tier_len(t2), 2);
        assert_eq!(catalog.entries_for_tier(Tier::MIN).len(), 0);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.empty_tiers().contains(&t2));
    }

    #[test]
    fn test_entry_evaluate() {
        let entry = CatalogEntry::ternary(20, Operator::Div, 4, Operator::Add, 3);
        assert_eq!(entry.evaluate(), Ok(8));
        assert_eq!(entry.tail(), Some((Operator::Add, 3)));
        assert_eq!(CatalogEntry::binary(9, Operator::Sub, 12).evaluate(), Ok(-3));
    }
}
