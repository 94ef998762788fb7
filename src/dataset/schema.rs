//! Dataset description file (dataset.json).
//!
//! JSON shape:
//! {
//!   "name": "diamonds",
//!   "columns": [
//!     { "name": "carat", "kind": "numeric", "values": [0.23, 0.21] },
//!     { "name": "cut", "values": ["Ideal", "Premium"] }   // kind inferred
//!   ],
//!   "aliases": { "carat": ["karat", "carrot"] }          // column -> mis-hearings
//! }
//!
//! We check column names are unique, resolve every column kind exactly once,
//! and flip the alias table into a mis-hearing -> column lookup.

use crate::Result;
use crate::dataset::{Column, ColumnKind, Dataset};
use crate::diagnostics;

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub columns: Vec<RawColumn>,

    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

/// Raw column shape as it appears in dataset.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawColumn {
    pub name: String,

    #[serde(default)]
    pub kind: Option<ColumnKind>,

    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// Read and validate a dataset description file.
pub fn load_dataset_file(path: &str) -> Result<Dataset> {
    let text = fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read dataset file {}", path)))?;
    let raw: DatasetFile = serde_json::from_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse dataset file {}", path)))?;

    let mut dataset = raw.validate_and_build()?;
    if dataset.name().is_empty() {
        dataset.name = path.to_string();
    }
    Ok(dataset)
}

impl DatasetFile {
    pub fn validate_and_build(self) -> Result<Dataset> {
        if self.columns.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message("dataset contained no columns")
            );
        }

        // Phase 1: unique names, kinds resolved once.
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for raw in self.columns {
            let name = raw.name.trim().to_string();
            if name.is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message("dataset has a column with an empty name")
                );
            }
            if !seen.insert(name.to_lowercase()) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("duplicate column name: {}", name))
                );
            }

            let kind = match raw.kind {
                Some(kind) => kind,
                None => infer_kind(&raw.values).ok_or_else(|| {
                    anyhow::anyhow!(diagnostics::error_message(format!(
                        "column '{}' has neither a kind nor any values",
                        name
                    )))
                })?,
            };

            columns.push(Column {
                name,
                kind,
                values: raw.values,
            });
        }

        // Phase 2: columns that carry values must agree on the row count.
        let mut lengths = columns
            .iter()
            .filter(|c| !c.values.is_empty())
            .map(|c| (c.name.as_str(), c.values.len()));
        if let Some((first_name, first_len)) = lengths.next() {
            for (name, len) in lengths {
                if len != first_len {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "column '{}' has {} values but '{}' has {}",
                            name, len, first_name, first_len
                        ))
                    );
                }
            }
        }

        // Phase 3: flip the alias table; every target must be a real column.
        let mut aliases: BTreeMap<String, String> = BTreeMap::new();
        for (target, heard) in self.aliases {
            let Some(column) = columns.iter().find(|c| c.name.eq_ignore_ascii_case(&target))
            else {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "alias table references unknown column '{}'",
                        target
                    ))
                );
            };
            for word in heard {
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                if let Some(prev) = aliases.insert(word.clone(), column.name.clone()) {
                    if prev != column.name {
                        bail!(
                            "{}",
                            diagnostics::error_message(format!(
                                "alias '{}' maps to both '{}' and '{}'",
                                word, prev, column.name
                            ))
                        );
                    }
                }
            }
        }

        log::debug!(
            "dataset '{}': {} columns, {} aliases",
            self.name,
            columns.len(),
            aliases.len()
        );

        Ok(Dataset {
            name: self.name,
            columns,
            aliases,
        })
    }
}

/// All non-null values numeric -> numeric; any other value -> categorical.
fn infer_kind(values: &[serde_json::Value]) -> Option<ColumnKind> {
    let mut present = values.iter().filter(|v| !v.is_null()).peekable();
    present.peek()?;
    if present.all(|v| v.is_number()) {
        Some(ColumnKind::Numeric)
    } else {
        Some(ColumnKind::Categorical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<Dataset> {
        let raw: DatasetFile = serde_json::from_str(json)?;
        raw.validate_and_build()
    }

    #[test]
    fn builds_columns_and_aliases() {
        let ds = parse(
            r#"{
                "name": "diamonds",
                "columns": [
                    {"name": "carat", "kind": "numeric"},
                    {"name": "cut", "values": ["Ideal", "Good"]},
                    {"name": "price", "values": [326, null]}
                ],
                "aliases": {"carat": ["Karat", "carrot"]}
            }"#,
        )
        .unwrap();

        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            vec!["carat", "cut", "price"]
        );
        assert_eq!(ds.kind_of("cut"), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind_of("price"), Some(ColumnKind::Numeric));
        assert_eq!(ds.aliases().get("karat").map(String::as_str), Some("carat"));
        assert_eq!(ds.aliases().get("carrot").map(String::as_str), Some("carat"));
    }

    #[test]
    fn rejects_duplicate_columns_case_insensitively() {
        let err = parse(r#"{"columns": [{"name": "x", "kind": "numeric"}, {"name": "X", "kind": "numeric"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate column name"));
    }

    #[test]
    fn rejects_untyped_empty_column() {
        let err = parse(r#"{"columns": [{"name": "x"}]}"#).unwrap_err();
        assert!(err.to_string().contains("neither a kind nor any values"));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = parse(r#"{"columns": [{"name": "a", "values": [1, 2]}, {"name": "b", "values": [1]}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("has 1 values"));
    }

    #[test]
    fn rejects_alias_to_missing_column() {
        let err = parse(r#"{"columns": [{"name": "a", "kind": "numeric"}], "aliases": {"b": ["bee"]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown column 'b'"));
    }

    #[test]
    fn rejects_alias_claimed_by_two_columns() {
        let err = parse(
            r#"{"columns": [{"name": "a", "kind": "numeric"}, {"name": "b", "kind": "numeric"}],
                "aliases": {"a": ["hey"], "b": ["hey"]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("maps to both"));
    }
}
