//! Typed plot builder: (geometry, grouping present) -> one renderer call.

use crate::spec::{Geometry, GraphSpec, Modifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotCall {
    Scatter {
        x: String,
        y: String,
        smooth: bool,
    },
    GroupedScatter {
        x: String,
        y: String,
        group: String,
        smooth: bool,
    },
    Line {
        x: String,
        y: String,
        smooth: bool,
    },
    GroupedLine {
        x: String,
        y: String,
        group: String,
        smooth: bool,
    },
    Histogram {
        column: String,
    },
    StackedHistogram {
        column: String,
        group: String,
    },
    Bar {
        column: String,
    },
    GroupedBar {
        column: String,
        group: String,
    },
    Density {
        column: String,
    },
    GroupedDensity {
        column: String,
        group: String,
    },
}

impl PlotCall {
    /// `None` unless the spec is valid.
    pub fn build(spec: &GraphSpec) -> Option<PlotCall> {
        if !spec.is_valid() {
            return None;
        }
        let geometry = spec.geometry?;
        let smooth = spec.modifiers.contains(&Modifier::Smooth);
        if smooth && geometry.arity() == 1 {
            log::warn!("smooth overlay does not apply to {}; dropping it", geometry);
        }

        let first = spec.primary_columns.first()?.clone();
        let second = || spec.primary_columns.get(1).cloned();

        let call = match (geometry, spec.grouping_column.clone()) {
            (Geometry::Point, None) => PlotCall::Scatter {
                x: first,
                y: second()?,
                smooth,
            },
            (Geometry::Point, Some(group)) => PlotCall::GroupedScatter {
                x: first,
                y: second()?,
                group,
                smooth,
            },
            (Geometry::Line, None) => PlotCall::Line {
                x: first,
                y: second()?,
                smooth,
            },
            (Geometry::Line, Some(group)) => PlotCall::GroupedLine {
                x: first,
                y: second()?,
                group,
                smooth,
            },
            (Geometry::Histogram, None) => PlotCall::Histogram { column: first },
            (Geometry::Histogram, Some(group)) => PlotCall::StackedHistogram {
                column: first,
                group,
            },
            (Geometry::Bar, None) => PlotCall::Bar { column: first },
            (Geometry::Bar, Some(group)) => PlotCall::GroupedBar {
                column: first,
                group,
            },
            (Geometry::Density, None) => PlotCall::Density { column: first },
            (Geometry::Density, Some(group)) => PlotCall::GroupedDensity {
                column: first,
                group,
            },
        };
        Some(call)
    }

    /// Every dataset column the call reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            PlotCall::Scatter { x, y, .. } | PlotCall::Line { x, y, .. } => vec![x.as_str(), y.as_str()],
            PlotCall::GroupedScatter { x, y, group, .. }
            | PlotCall::GroupedLine { x, y, group, .. } => vec![x.as_str(), y.as_str(), group.as_str()],
            PlotCall::Histogram { column }
            | PlotCall::Bar { column }
            | PlotCall::Density { column } => vec![column.as_str()],
            PlotCall::StackedHistogram { column, group }
            | PlotCall::GroupedBar { column, group }
            | PlotCall::GroupedDensity { column, group } => vec![column.as_str(), group.as_str()],
        }
    }

    pub fn describe(&self) -> String {
        let with_smooth = |s: bool| if s { " with smooth" } else { "" };
        match self {
            PlotCall::Scatter { x, y, smooth } => {
                format!("scatter of {} vs {}{}", x, y, with_smooth(*smooth))
            }
            PlotCall::GroupedScatter { x, y, group, smooth } => format!(
                "scatter of {} vs {} colored by {}{}",
                x,
                y,
                group,
                with_smooth(*smooth)
            ),
            PlotCall::Line { x, y, smooth } => {
                format!("line of {} vs {}{}", x, y, with_smooth(*smooth))
            }
            PlotCall::GroupedLine { x, y, group, smooth } => format!(
                "line of {} vs {} colored by {}{}",
                x,
                y,
                group,
                with_smooth(*smooth)
            ),
            PlotCall::Histogram { column } => format!("histogram of {}", column),
            PlotCall::StackedHistogram { column, group } => {
                format!("histogram of {} stacked by {}", column, group)
            }
            PlotCall::Bar { column } => format!("bar chart of {}", column),
            PlotCall::GroupedBar { column, group } => {
                format!("bar chart of {} split by {}", column, group)
            }
            PlotCall::Density { column } => format!("density of {}", column),
            PlotCall::GroupedDensity { column, group } => {
                format!("density of {} per {}", column, group)
            }
        }
    }
}
