//! Utterance interpretation, one stage per module, leaves first:
//! normalize -> intent -> fuzzy -> extract -> geometry -> validate.
//!
//! Every stage is a plain function over tokens and a spec; the session decides
//! what to keep.

pub mod extract;
pub mod fuzzy;
pub mod geometry;
pub mod intent;
pub mod normalize;
pub mod validate;

pub use intent::Intent;
pub use normalize::Normalizer;
