//! Dataset provider: named, typed columns plus the homophone table that goes
//! with them.
//!
//! The interpreter never parses data files itself; it only sees a validated
//! [`Dataset`]. Column kinds are resolved once, when the dataset is built.

pub mod schema;

pub use schema::load_dataset_file;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => f.write_str("numeric"),
            ColumnKind::Categorical => f.write_str("categorical"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    /// Raw cell values; empty when the dataset only describes its schema.
    pub values: Vec<serde_json::Value>,
}

/// Validated dataset. Build one with [`schema::DatasetFile::validate_and_build`] or
/// [`Dataset::new`].
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    /// Mis-hearing (lowercase) -> canonical column name.
    aliases: BTreeMap<String, String>,
}

impl Dataset {
    /// Build a dataset from already-typed columns. Column names must be unique;
    /// callers loading from disk go through [`schema::DatasetFile`], which checks that.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            aliases: BTreeMap::new(),
        }
    }

    /// Attach a homophone table. Keys are lowercased; targets are kept as given.
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (heard, column) in aliases {
            self.aliases
                .insert(heard.into().to_lowercase(), column.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind)
    }

    pub fn values(&self, name: &str) -> Option<&[serde_json::Value]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Number of rows, taken from the longest column that carries values.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    /// Row-major view of the requested columns, one JSON object per row.
    pub fn rows(&self, names: &[&str]) -> Vec<serde_json::Map<String, serde_json::Value>> {
        let cols: Vec<(&str, &[serde_json::Value])> = names
            .iter()
            .filter_map(|n| self.values(n).map(|v| (*n, v)))
            .collect();
        (0..self.row_count())
            .map(|i| {
                cols.iter()
                    .map(|(name, values)| {
                        let v = values.get(i).cloned().unwrap_or(serde_json::Value::Null);
                        (name.to_string(), v)
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    /// A slice of the classic diamonds table with its usual mis-hearings.
    pub fn diamonds() -> Dataset {
        let num = |name: &str, values: Vec<serde_json::Value>| Column {
            name: name.to_string(),
            kind: ColumnKind::Numeric,
            values,
        };
        let cat = |name: &str, values: Vec<serde_json::Value>| Column {
            name: name.to_string(),
            kind: ColumnKind::Categorical,
            values,
        };
        Dataset::new(
            "diamonds",
            vec![
                num("carat", vec![json!(0.23), json!(0.21), json!(0.29)]),
                cat("cut", vec![json!("Ideal"), json!("Premium"), json!("Good")]),
                cat("color", vec![json!("E"), json!("E"), json!("I")]),
                cat("clarity", vec![json!("SI2"), json!("SI1"), json!("VS2")]),
                num("depth", vec![json!(61.5), json!(59.8), json!(62.4)]),
                num("table", vec![json!(55), json!(61), json!(58)]),
                num("price", vec![json!(326), json!(326), json!(334)]),
                num("x", vec![json!(3.95), json!(3.89), json!(4.2)]),
                num("y", vec![json!(3.98), json!(3.84), json!(4.23)]),
                num("z", vec![json!(2.43), json!(2.31), json!(2.63)]),
            ],
        )
        .with_aliases([
            ("carrot", "carat"),
            ("karat", "carat"),
            ("current", "carat"),
            ("parrot", "carat"),
            ("ferret", "carat"),
            ("death", "depth"),
            ("def", "depth"),
            ("press", "price"),
            ("ex", "x"),
            ("why", "y"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn kinds_are_resolved_per_column() {
        let ds = fixtures::diamonds();
        assert_eq!(ds.kind_of("carat"), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind_of("cut"), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind_of("weight"), None);
    }

    #[test]
    fn rows_pick_requested_columns_in_order() {
        let ds = fixtures::diamonds();
        let rows = ds.rows(&["price", "cut"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            serde_json::Value::Object(rows[0].clone()),
            json!({"price": 326, "cut": "Ideal"})
        );
    }

    #[test]
    fn values_accessor_and_unknown_columns() {
        let ds = fixtures::diamonds();
        assert_eq!(ds.values("cut").map(<[_]>::len), Some(3));
        assert_eq!(ds.values("weight"), None);
        let rows = ds.rows(&["weight", "x"]);
        assert_eq!(serde_json::Value::Object(rows[2].clone()), json!({"x": 4.2}));
    }

    #[test]
    fn alias_keys_are_lowercased() {
        let ds = Dataset::new("t", vec![]).with_aliases([("Karat", "carat")]);
        assert_eq!(ds.aliases().get("karat").map(String::as_str), Some("carat"));
    }
}
