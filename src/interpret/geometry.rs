//! Geometry resolution: explicit keyword first, otherwise inferred from the
//! primary columns.

use crate::dataset::ColumnKind;
use crate::diagnostics::Diagnostic;
use crate::spec::{Geometry, GraphSpec};
use crate::vocab::Vocabulary;

/// Highest-priority geometry named anywhere in the utterance.
pub fn explicit_geometry(tokens: &[String], vocab: &Vocabulary) -> Option<Geometry> {
    vocab
        .geometry_words
        .iter()
        .find(|(_, words)| tokens.iter().any(|t| words.contains(t)))
        .map(|(geometry, _)| *geometry)
}

/// Set `spec.geometry`. An explicit keyword always wins; otherwise a spec that
/// already has a geometry keeps it and an unset one is inferred.
pub fn resolve_geometry(spec: &mut GraphSpec, explicit: Option<Geometry>) -> Vec<Diagnostic> {
    if let Some(geometry) = explicit {
        spec.geometry = Some(geometry);
        return Vec::new();
    }
    if spec.geometry.is_some() {
        return Vec::new();
    }
    match infer(spec) {
        Some(geometry) => {
            log::debug!("inferred geometry {}", geometry);
            spec.geometry = Some(geometry);
            Vec::new()
        }
        None => vec![Diagnostic::CannotInferGeometry {
            columns: spec.primary_columns.len(),
        }],
    }
}

/// Inference table. Mixed or all-categorical pairs are reshaped into one
/// primary column plus a grouping column; nothing else is ever moved.
fn infer(spec: &mut GraphSpec) -> Option<Geometry> {
    use ColumnKind::{Categorical, Numeric};

    let kinds: Vec<ColumnKind> = spec
        .primary_columns
        .iter()
        .map(|c| spec.kind_of(c))
        .collect::<Option<_>>()?;

    match kinds.as_slice() {
        [Numeric] => Some(Geometry::Histogram),
        [Categorical] => Some(Geometry::Bar),
        [Numeric, Numeric] => Some(Geometry::Point),
        [Numeric, Categorical] | [Categorical, Numeric] => {
            let numeric_first = kinds[0] == Numeric;
            let (numeric, categorical) = split_pair(spec, numeric_first);
            spec.primary_columns = vec![numeric];
            spec.grouping_column = Some(categorical);
            Some(Geometry::Histogram)
        }
        [Categorical, Categorical] => {
            let (first, second) = split_pair(spec, true);
            spec.primary_columns = vec![first];
            spec.grouping_column = Some(second);
            Some(Geometry::Bar)
        }
        _ => None,
    }
}

/// Take both primary columns out, `keep_order` false swaps them.
fn split_pair(spec: &mut GraphSpec, keep_order: bool) -> (String, String) {
    let mut cols = std::mem::take(&mut spec.primary_columns);
    let second = cols.pop().unwrap_or_default();
    let first = cols.pop().unwrap_or_default();
    if keep_order {
        (first, second)
    } else {
        (second, first)
    }
}
