use crate::dataset::{ColumnKind, Dataset};
use crate::interpret::validate;

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Chart type. Declaration order is also keyword priority: when an utterance
/// names several geometries, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Histogram,
    Bar,
    Density,
    Line,
    Point,
}

impl Geometry {
    /// Number of primary columns the geometry plots.
    pub fn arity(self) -> usize {
        match self {
            Geometry::Point | Geometry::Line => 2,
            Geometry::Histogram | Geometry::Bar | Geometry::Density => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Geometry::Histogram => "histogram",
            Geometry::Bar => "bar",
            Geometry::Density => "density",
            Geometry::Line => "line",
            Geometry::Point => "point",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stat overlays layered on top of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Smooth,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Smooth => f.write_str("smooth"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    NoDataset,
    NoGeometry,
    Arity {
        geometry: Geometry,
        expected: usize,
        found: usize,
    },
    NotNumeric {
        geometry: Geometry,
        column: String,
    },
    UnknownColumn(String),
    GroupingIsPrimary(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NoDataset => write!(f, "no dataset"),
            InvalidReason::NoGeometry => write!(f, "no geometry found"),
            InvalidReason::Arity {
                geometry,
                expected,
                found,
            } => write!(
                f,
                "{} needs {} variable(s), got {}",
                geometry, expected, found
            ),
            InvalidReason::NotNumeric { geometry, column } => {
                write!(f, "{} needs numeric data but '{}' is categorical", geometry, column)
            }
            InvalidReason::UnknownColumn(c) => write!(f, "unknown variable '{}'", c),
            InvalidReason::GroupingIsPrimary(c) => {
                write!(f, "'{}' is both plotted and used for grouping", c)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(InvalidReason),
}

/// Structured description of one chart against one dataset.
///
/// Cloning gives an independent value: the column lists are copied and only the
/// immutable dataset is shared.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSpec {
    #[serde(rename = "dataset", serialize_with = "serialize_dataset_name")]
    dataset: Option<Arc<Dataset>>,

    pub primary_columns: Vec<String>,
    pub geometry: Option<Geometry>,
    pub grouping_column: Option<String>,
    pub modifiers: BTreeSet<Modifier>,

    #[serde(skip)]
    validity: Validity,
}

impl GraphSpec {
    /// Empty spec tied to a dataset: the session's base.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let mut spec = Self::detached();
        spec.dataset = Some(dataset);
        spec.revalidate();
        spec
    }

    /// Spec with no dataset attached. Nothing can be extracted into it.
    pub fn detached() -> Self {
        Self {
            dataset: None,
            primary_columns: Vec::new(),
            geometry: None,
            grouping_column: None,
            modifiers: BTreeSet::new(),
            validity: Validity::Invalid(InvalidReason::NoDataset),
        }
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.dataset.as_ref().and_then(|d| d.kind_of(column))
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Recompute validity from the current fields.
    pub fn revalidate(&mut self) -> &Validity {
        self.validity = validate::check(self);
        &self.validity
    }

    /// A geometry is chosen and enough primary columns are present for it.
    pub fn has_base(&self) -> bool {
        match self.geometry {
            Some(g) => self.primary_columns.len() >= g.arity(),
            None => false,
        }
    }

    /// Human-readable dump of every field and the validity status.
    pub fn summary(&self) -> String {
        let mut out = String::from(" - Summary - \n");
        let dataset = self.dataset.as_ref().map(|d| d.name()).unwrap_or("(none)");
        out.push_str(&format!("Dataset: {}\n", dataset));
        let geom = self.geometry.map(|g| g.name()).unwrap_or("(unset)");
        out.push_str(&format!("Geom: {}\n", geom));
        out.push_str(&format!("Datacols: [{}]\n", self.primary_columns.join(", ")));
        for (i, col) in self.primary_columns.iter().enumerate() {
            let kind = self
                .kind_of(col)
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            out.push_str(&format!("Type data {}: {}\n", i, kind));
        }
        if let Some(group) = &self.grouping_column {
            out.push_str(&format!("Grouping: {}\n", group));
        }
        if !self.modifiers.is_empty() {
            let mods: Vec<String> = self.modifiers.iter().map(|m| m.to_string()).collect();
            out.push_str(&format!("Modifiers: {}\n", mods.join(", ")));
        }
        match &self.validity {
            Validity::Valid => out.push_str("Valid status: true"),
            Validity::Invalid(reason) => {
                out.push_str(&format!("Valid status: false ({})", reason))
            }
        }
        out
    }
}

fn serialize_dataset_name<S>(
    dataset: &Option<Arc<Dataset>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dataset {
        Some(d) => serializer.serialize_some(d.name()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn base_spec_is_invalid_and_unbased() {
        let spec = GraphSpec::new(Arc::new(fixtures::diamonds()));
        assert!(!spec.is_valid());
        assert!(!spec.has_base());
        assert_eq!(
            spec.validity(),
            &Validity::Invalid(InvalidReason::NoGeometry)
        );
    }

    #[test]
    fn clone_does_not_alias_columns() {
        let base = GraphSpec::new(Arc::new(fixtures::diamonds()));
        let mut current = base.clone();
        current.primary_columns.push("carat".to_string());
        assert!(base.primary_columns.is_empty());
    }

    #[test]
    fn serializes_dataset_by_name() {
        let mut spec = GraphSpec::new(Arc::new(fixtures::diamonds()));
        spec.primary_columns = vec!["carat".to_string(), "price".to_string()];
        spec.geometry = Some(Geometry::Point);
        spec.modifiers.insert(Modifier::Smooth);
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "dataset": "diamonds",
                "primary_columns": ["carat", "price"],
                "geometry": "point",
                "grouping_column": null,
                "modifiers": ["smooth"]
            })
        );
    }

    #[test]
    fn summary_reports_kinds_and_status() {
        let mut spec = GraphSpec::new(Arc::new(fixtures::diamonds()));
        spec.primary_columns = vec!["carat".to_string(), "price".to_string()];
        spec.geometry = Some(Geometry::Point);
        spec.grouping_column = Some("clarity".to_string());
        spec.revalidate();

        let summary = spec.summary();
        assert!(summary.contains("Dataset: diamonds"));
        assert!(summary.contains("Geom: point"));
        assert!(summary.contains("Datacols: [carat, price]"));
        assert!(summary.contains("Type data 1: numeric"));
        assert!(summary.contains("Grouping: clarity"));
        assert!(summary.ends_with("Valid status: true"));
    }
}
