use crate::Result;
use crate::dataset::Dataset;
use crate::diagnostics;
use crate::render::{PlotCall, Renderer};

use anyhow::Context;
use serde_json::{Value, json};
use std::fs;

/// Rewrites one HTML file each time a new plot is committed; keep it open in a
/// browser and reload.
pub struct HtmlRenderer {
    out: String,
}

impl HtmlRenderer {
    pub fn new(out: impl Into<String>) -> Self {
        Self { out: out.into() }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, call: &PlotCall, dataset: &Dataset) -> Result<()> {
        let html = render_html_report(call, dataset)?;
        fs::write(&self.out, html)
            .with_context(|| diagnostics::error_message(format!("write {}", self.out)))?;
        println!("Plot: {} -> {}", call.describe(), self.out);
        Ok(())
    }
}

/// Vega-Lite document for the call, with the needed columns embedded as rows.
pub fn vega_lite(call: &PlotCall, dataset: &Dataset) -> Value {
    let rows = dataset.rows(&call.columns());
    if rows.is_empty() {
        log::warn!("dataset '{}' carries no values; the chart will be empty", dataset.name());
    }

    let q = |field: &str| json!({ "field": field, "type": "quantitative" });
    let n = |field: &str| json!({ "field": field, "type": "nominal" });
    let count = json!({ "aggregate": "count", "type": "quantitative" });

    let body = match call {
        PlotCall::Scatter { x, y, smooth } => {
            xy_layers("point", json!({ "x": q(x), "y": q(y) }), x, y, None, *smooth)
        }
        PlotCall::GroupedScatter {
            x,
            y,
            group,
            smooth,
        } => xy_layers(
            "point",
            json!({ "x": q(x), "y": q(y), "color": n(group) }),
            x,
            y,
            Some(group.as_str()),
            *smooth,
        ),
        PlotCall::Line { x, y, smooth } => {
            xy_layers("line", json!({ "x": q(x), "y": q(y) }), x, y, None, *smooth)
        }
        PlotCall::GroupedLine {
            x,
            y,
            group,
            smooth,
        } => xy_layers(
            "line",
            json!({ "x": q(x), "y": q(y), "color": n(group) }),
            x,
            y,
            Some(group.as_str()),
            *smooth,
        ),
        PlotCall::Histogram { column } => json!({
            "mark": "bar",
            "encoding": { "x": { "field": column, "bin": true, "type": "quantitative" }, "y": count },
        }),
        PlotCall::StackedHistogram { column, group } => json!({
            "mark": "bar",
            "encoding": {
                "x": { "field": column, "bin": true, "type": "quantitative" },
                "y": count,
                "color": n(group),
            },
        }),
        PlotCall::Bar { column } => json!({
            "mark": "bar",
            "encoding": { "x": n(column), "y": count },
        }),
        PlotCall::GroupedBar { column, group } => json!({
            "mark": "bar",
            "encoding": { "x": n(column), "y": count, "color": n(group), "xOffset": n(group) },
        }),
        PlotCall::Density { column } => json!({
            "transform": [{ "density": column }],
            "mark": "area",
            "encoding": {
                "x": { "field": "value", "type": "quantitative", "title": column },
                "y": { "field": "density", "type": "quantitative" },
            },
        }),
        PlotCall::GroupedDensity { column, group } => json!({
            "transform": [{ "density": column, "groupby": [group] }],
            "mark": { "type": "area", "opacity": 0.5 },
            "encoding": {
                "x": { "field": "value", "type": "quantitative", "title": column },
                "y": { "field": "density", "type": "quantitative" },
                "color": n(group),
            },
        }),
    };

    let mut doc = json!({
        "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
        "title": call.describe(),
        "width": 640,
        "height": 400,
        "data": { "values": rows },
    });
    if let (Some(doc), Some(body)) = (doc.as_object_mut(), body.as_object()) {
        doc.extend(body.clone());
    }
    doc
}

/// Plain mark, or the mark plus a loess trend layer.
fn xy_layers(
    mark: &str,
    encoding: Value,
    x: &str,
    y: &str,
    group: Option<&str>,
    smooth: bool,
) -> Value {
    if !smooth {
        return json!({ "mark": mark, "encoding": encoding });
    }
    let mut loess = json!({ "loess": y, "on": x });
    if let Some(group) = group {
        loess["groupby"] = json!([group]);
    }
    json!({
        "encoding": encoding,
        "layer": [
            { "mark": mark },
            { "mark": { "type": "line", "strokeWidth": 3 }, "transform": [loess] },
        ],
    })
}

/// Render a self-contained HTML page (chart embedded as JSON).
///
/// We substitute a placeholder instead of using `format!()` because the page
/// is full of `{}` from JS and CSS.
pub fn render_html_report(call: &PlotCall, dataset: &Dataset) -> Result<String> {
    // "</" would end the script element early if it showed up in the data.
    let json = serde_json::to_string(&vega_lite(call, dataset))?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>ggspeak</title>
<script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 16px; }
</style>
</head>
<body>
<div id="chart"></div>
<script>
const SPEC = __SPEC__;
vegaEmbed("#chart", SPEC, { actions: false });
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__SPEC__", &json))
}
