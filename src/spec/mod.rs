//! Spec layer: the graph specification built up across turns.
//!
//! This module owns the data model only. Deciding what goes into a spec is the
//! interpreter's job (`crate::interpret`); deciding whether it is renderable is
//! the validator's.

pub mod graph;

pub use graph::{Geometry, GraphSpec, InvalidReason, Modifier, Validity};
