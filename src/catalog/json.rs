//! Catalog file format
//!
//! One JSON array per tier, stored as `math_problems_difficulty_<tier>.json`:
//!
//! ```json
//! [
//!   { "firstNumber": 6, "secondNumber": 3, "firstOperator": "+" },
//!   { "firstNumber": 10, "secondNumber": 4, "thirdNumber": 2,
//!     "firstOperator": "-", "secondOperator": "*" }
//! ]
//! ```
//!
//! Missing numbers read as 0 and missing operators as `""`. An empty second
//! operator means a two-operand expression; any other unknown token is
//! rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CatalogEntry, MemoryCatalog};
use crate::error::StoreError;
use crate::sim::{Operator, Tier};

/// Wire shape of a catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(default)]
    pub first_number: Option<i64>,
    #[serde(default)]
    pub second_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_number: Option<i64>,
    #[serde(default)]
    pub first_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_operator: Option<String>,
}

impl TryFrom<RawEntry> for CatalogEntry {
    type Error = StoreError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let first_operator: Operator = raw.first_operator.unwrap_or_default().parse()?;
        let second_operator = match raw.second_operator.as_deref() {
            None | Some("") => None,
            Some(token) => Some(token.parse::<Operator>()?),
        };
        Ok(CatalogEntry {
            first_number: raw.first_number.unwrap_or(0),
            second_number: raw.second_number.unwrap_or(0),
            third_number: second_operator.and(raw.third_number).unwrap_or(0),
            first_operator,
            second_operator,
        })
    }
}

impl From<CatalogEntry> for RawEntry {
    fn from(entry: CatalogEntry) -> Self {
        RawEntry {
            first_number: Some(entry.first_number),
            second_number: Some(entry.second_number),
            third_number: entry.second_operator.map(|_| entry.third_number),
            first_operator: Some(entry.first_operator.symbol().to_string()),
            second_operator: entry.second_operator.map(|op| op.symbol().to_string()),
        }
    }
}

pub fn tier_file_name(tier: Tier) -> String {
    format!("math_problems_difficulty_{}.json", tier.get())
}

pub fn tier_path(dir: &Path, tier: Tier) -> PathBuf {
    dir.join(tier_file_name(tier))
}

/// Parse one tier file's contents
pub fn parse_tier(json: &str) -> Result<Vec<CatalogEntry>, StoreError> {
    Ok(serde_json::from_str(json)?)
}

pub fn tier_to_json(entries: &[CatalogEntry]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Load all five tier files from `dir`
pub fn load_dir(dir: &Path) -> Result<MemoryCatalog, StoreError> {
    let mut catalog = MemoryCatalog::new();
    for tier in Tier::all() {
        let path = tier_path(dir, tier);
        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let entries = parse_tier(&text)?;
        log::info!("Loaded {} entries for tier {} from {}", entries.len(), tier, path.display());
        catalog.set_tier(tier, entries);
    }
    Ok(catalog)
}

/// Write every tier of `catalog` into `dir`, creating it if needed
pub fn save_dir(catalog: &MemoryCatalog, dir: &Path) -> Result<(), StoreError> {
    use super::ContentCatalog;

    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    for tier in Tier::all() {
        let path = tier_path(dir, tier);
        let json = tier_to_json(catalog.entries_for_tier(tier))?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        log::info!("Saved tier {} to {}", tier, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;

    #[test]
    fn test_parse_tier_file_shape() {
        let json = r#"[
            { "firstNumber": 6, "secondNumber": 3, "firstOperator": "+" },
            { "firstNumber": 10, "secondNumber": 4, "thirdNumber": 2,
              "firstOperator": "-", "secondOperator": "*" },
            { "firstNumber": 8, "secondNumber": 2, "thirdNumber": null,
              "firstOperator": "/", "secondOperator": "" }
        ]"#;
        let entries = parse_tier(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], CatalogEntry::binary(6, Operator::Add, 3));
        assert_eq!(entries[1], CatalogEntry::ternary(10, Operator::Sub, 4, Operator::Mul, 2));
        assert_eq!(entries[2].second_operator, None);
        assert_eq!(entries[2].third_number, 0);
        assert_eq!(entries[1].evaluate(), Ok(12));
    }

    #[test]
    fn test_stray_third_number_dropped() {
        let json = r#"[{ "firstNumber": 9, "secondNumber": 3, "thirdNumber": 7,
                         "firstOperator": "/", "secondOperator": "" }]"#;
        let entries = parse_tier(json).unwrap();
        assert_eq!(entries[0], CatalogEntry::binary(9, Operator::Div, 3));

        let reparsed = parse_tier(&tier_to_json(&entries).unwrap()).unwrap();
        assert_eq!(reparsed, entries);
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let entries = parse_tier(r#"[{ "firstNumber": 5, "firstOperator": "*" }]"#).unwrap();
        assert_eq!(entries[0].second_number, 0);
        assert_eq!(entries[0].evaluate(), Ok(0));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = parse_tier(r#"[{ "firstNumber": 5, "secondNumber": 2, "firstOperator": "%" }]"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown operator"), "{err}");

        let err = parse_tier(r#"[{ "firstNumber": 5, "secondNumber": 2 }]"#).unwrap_err();
        assert!(err.to_string().contains("unknown operator"), "{err}");

        let err = parse_tier(
            r#"[{ "firstNumber": 5, "secondNumber": 2, "thirdNumber": 1,
                  "firstOperator": "+", "secondOperator": "^" }]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("\"^\""), "{err}");
    }

    #[test]
    fn test_written_json_omits_unused_fields() {
        let json = tier_to_json(&[CatalogEntry::binary(7, Operator::Add, 2)]).unwrap();
        assert!(json.contains("\"firstOperator\": \"+\""));
        assert!(!json.contains("thirdNumber"));
        assert!(!json.contains("secondOperator"));
    }

    #[test]
    fn test_dir_round_trip() {
        let dir = std::env::temp_dir().join(format!("quick-math-catalog-{}", std::process::id()));
        let mut catalog = MemoryCatalog::new();
        for tier in Tier::all() {
            let n = i64::from(tier.get());
            catalog.push(tier, CatalogEntry::ternary(n, Operator::Mul, 3, Operator::Sub, 1));
        }

        save_dir(&catalog, &dir).unwrap();
        assert!(tier_path(&dir, Tier::MAX).exists());
        let loaded = load_dir(&dir).unwrap();
        assert_eq!(loaded, catalog);
        assert_eq!(loaded.entries_for_tier(Tier::MAX)[0].evaluate(), Ok(14));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_dir_is_io_error() {
        let err = load_dir(Path::new("/nonexistent/quick-math")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
