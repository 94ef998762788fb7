//! Renderability check, recomputed from scratch on every call.

use crate::dataset::ColumnKind;
use crate::spec::{Geometry, GraphSpec, InvalidReason, Validity};

pub fn check(spec: &GraphSpec) -> Validity {
    match reason(spec) {
        None => Validity::Valid,
        Some(reason) => Validity::Invalid(reason),
    }
}

fn reason(spec: &GraphSpec) -> Option<InvalidReason> {
    let Some(dataset) = spec.dataset() else {
        return Some(InvalidReason::NoDataset);
    };
    let Some(geometry) = spec.geometry else {
        return Some(InvalidReason::NoGeometry);
    };

    for column in spec.primary_columns.iter().chain(&spec.grouping_column) {
        if dataset.column(column).is_none() {
            return Some(InvalidReason::UnknownColumn(column.clone()));
        }
    }
    if let Some(group) = &spec.grouping_column {
        if spec.primary_columns.contains(group) {
            return Some(InvalidReason::GroupingIsPrimary(group.clone()));
        }
    }

    if spec.primary_columns.len() != geometry.arity() {
        return Some(InvalidReason::Arity {
            geometry,
            expected: geometry.arity(),
            found: spec.primary_columns.len(),
        });
    }

    let needs_numeric = match geometry {
        Geometry::Point | Geometry::Line | Geometry::Histogram | Geometry::Density => true,
        Geometry::Bar => false,
    };
    if needs_numeric {
        if let Some(column) = spec
            .primary_columns
            .iter()
            .find(|c| dataset.kind_of(c) != Some(ColumnKind::Numeric))
        {
            return Some(InvalidReason::NotNumeric {
                geometry,
                column: column.clone(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn spec(geometry: Option<Geometry>, columns: &[&str], group: Option<&str>) -> GraphSpec {
        let mut spec = GraphSpec::new(Arc::new(fixtures::diamonds()));
        spec.geometry = geometry;
        spec.primary_columns = columns.iter().map(|c| c.to_string()).collect();
        spec.grouping_column = group.map(str::to_string);
        spec
    }

    #[test]
    fn unset_geometry_is_invalid() {
        assert_eq!(
            check(&spec(None, &["carat"], None)),
            Validity::Invalid(InvalidReason::NoGeometry)
        );
    }

    #[test]
    fn scatter_and_line_need_two_numeric_columns() {
        for g in [Geometry::Point, Geometry::Line] {
            assert_eq!(check(&spec(Some(g), &["carat", "price"], None)), Validity::Valid);
            assert_eq!(
                check(&spec(Some(g), &["carat"], None)),
                Validity::Invalid(InvalidReason::Arity {
                    geometry: g,
                    expected: 2,
                    found: 1
                })
            );
            assert_eq!(
                check(&spec(Some(g), &["carat", "cut"], None)),
                Validity::Invalid(InvalidReason::NotNumeric {
                    geometry: g,
                    column: "cut".to_string()
                })
            );
        }
    }

    #[test]
    fn categorical_histogram_is_not_converted() {
        let s = spec(Some(Geometry::Histogram), &["cut"], None);
        assert_eq!(
            check(&s),
            Validity::Invalid(InvalidReason::NotNumeric {
                geometry: Geometry::Histogram,
                column: "cut".to_string()
            })
        );
        assert_eq!(s.geometry, Some(Geometry::Histogram));
    }

    #[test]
    fn bar_takes_one_column_of_any_kind() {
        assert_eq!(check(&spec(Some(Geometry::Bar), &["cut"], None)), Validity::Valid);
        assert_eq!(check(&spec(Some(Geometry::Bar), &["price"], None)), Validity::Valid);
        assert!(matches!(
            check(&spec(Some(Geometry::Bar), &["cut", "clarity"], None)),
            Validity::Invalid(InvalidReason::Arity { .. })
        ));
    }

    #[test]
    fn density_needs_one_numeric_column() {
        assert_eq!(check(&spec(Some(Geometry::Density), &["depth"], None)), Validity::Valid);
        assert!(matches!(
            check(&spec(Some(Geometry::Density), &["color"], None)),
            Validity::Invalid(InvalidReason::NotNumeric { .. })
        ));
    }

    #[test]
    fn grouping_must_differ_from_primary() {
        assert_eq!(
            check(&spec(Some(Geometry::Point), &["carat", "price"], Some("price"))),
            Validity::Invalid(InvalidReason::GroupingIsPrimary("price".to_string()))
        );
        assert_eq!(
            check(&spec(Some(Geometry::Point), &["carat", "price"], Some("clarity"))),
            Validity::Valid
        );
    }

    #[test]
    fn unknown_columns_are_invalid() {
        assert_eq!(
            check(&spec(Some(Geometry::Histogram), &["weight"], None)),
            Validity::Invalid(InvalidReason::UnknownColumn("weight".to_string()))
        );
    }

    #[test]
    fn detached_spec_is_invalid() {
        assert_eq!(
            check(&GraphSpec::detached()),
            Validity::Invalid(InvalidReason::NoDataset)
        );
    }
}
