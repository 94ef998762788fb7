//! Renderer boundary.
//!
//! A valid [`GraphSpec`](crate::spec::GraphSpec) is turned into a typed
//! [`PlotCall`] and handed to a [`Renderer`]. Nothing here builds code as text.

pub mod html;
pub mod plot;

pub use html::HtmlRenderer;
pub use plot::PlotCall;

use crate::Result;
use crate::dataset::Dataset;

pub trait Renderer {
    fn render(&mut self, call: &PlotCall, dataset: &Dataset) -> Result<()>;
}

/// Prints what would be drawn. Used when no output file is configured.
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, call: &PlotCall, dataset: &Dataset) -> Result<()> {
        println!("Plot: {} from {}", call.describe(), dataset.name());
        Ok(())
    }
}
