//! Session state: one base spec, one working spec, and the turn loop step.
//!
//! `base` is the empty spec taken when the dataset was chosen and never
//! changes. `current` is either a copy of it or a valid refinement of it; an
//! invalid candidate is never stored, it rolls `current` back to `base`.

use crate::Result;
use crate::dataset::Dataset;
use crate::diagnostics::Diagnostic;
use crate::interpret::{Intent, Normalizer, extract, fuzzy, geometry, intent};
use crate::spec::{GraphSpec, InvalidReason, Validity};
use crate::vocab::Vocabulary;

use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Outcome {
    /// Nothing was said; the turn is a no-op.
    Silent,
    Quit,
    /// The current spec, ready to be persisted.
    Save(GraphSpec),
    Reset,
    Summary(String),
    /// A new valid spec was committed and should be rendered.
    Updated(GraphSpec),
    /// The current spec did not change.
    Unchanged,
    /// The candidate spec was invalid; `current` is back to `base`.
    RolledBack {
        rejected: GraphSpec,
        reason: InvalidReason,
    },
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub tokens: Vec<String>,
    pub intent: Intent,
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Session {
    vocab: Vocabulary,
    normalizer: Normalizer,
    base: GraphSpec,
    current: GraphSpec,
}

impl Session {
    pub fn new(dataset: Arc<Dataset>, vocab: Vocabulary) -> Result<Self> {
        Self::with_base(GraphSpec::new(dataset), vocab)
    }

    /// Session with no dataset. Control words still work; updates only report
    /// that no dataset is loaded.
    pub fn detached(vocab: Vocabulary) -> Result<Self> {
        Self::with_base(GraphSpec::detached(), vocab)
    }

    fn with_base(base: GraphSpec, vocab: Vocabulary) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new(&vocab)?,
            vocab,
            current: base.clone(),
            base,
        })
    }

    pub fn base(&self) -> &GraphSpec {
        &self.base
    }

    pub fn current(&self) -> &GraphSpec {
        &self.current
    }

    pub fn reset(&mut self) {
        self.current = self.base.clone();
    }

    /// Keep `spec` if it is valid; otherwise reset and hand the rejected spec
    /// back so it can be summarized. Validity is recomputed here, whatever the
    /// caller last cached on the spec.
    pub fn commit(&mut self, mut spec: GraphSpec) -> Outcome {
        match spec.revalidate().clone() {
            Validity::Valid => {
                self.current = spec.clone();
                Outcome::Updated(spec)
            }
            Validity::Invalid(reason) => {
                log::info!("rolling back to base: {}", reason);
                self.reset();
                Outcome::RolledBack {
                    rejected: spec,
                    reason,
                }
            }
        }
    }

    pub fn summarize(&self) -> String {
        self.current.summary()
    }

    /// Run one transcript through the interpreter.
    pub fn turn(&mut self, transcript: &str) -> Turn {
        let tokens = self.normalizer.normalize(transcript);
        log::debug!("tokens: {:?}", tokens);

        if tokens.is_empty() {
            return Turn {
                tokens,
                intent: Intent::Update,
                outcome: Outcome::Silent,
                diagnostics: Vec::new(),
            };
        }

        let intent = intent::classify(&tokens, &self.vocab);
        let mut diagnostics = Vec::new();
        let outcome = match intent {
            Intent::Quit => Outcome::Quit,
            Intent::Save => {
                if self.current.is_valid() {
                    Outcome::Save(self.current.clone())
                } else {
                    diagnostics.push(Diagnostic::NothingToSave);
                    Outcome::Unchanged
                }
            }
            Intent::Reset => {
                self.reset();
                Outcome::Reset
            }
            Intent::Summary => Outcome::Summary(self.summarize()),
            Intent::Update => self.update(&tokens, &mut diagnostics),
        };

        for d in diagnostics.iter().filter(|d| !d.is_informational()) {
            log::warn!("{}", d);
        }

        Turn {
            tokens,
            intent,
            outcome,
            diagnostics,
        }
    }

    fn update(&mut self, tokens: &[String], diagnostics: &mut Vec<Diagnostic>) -> Outcome {
        let Some(dataset) = self.current.dataset().cloned() else {
            diagnostics.push(Diagnostic::DatasetUnavailable);
            return Outcome::Unchanged;
        };

        let report = fuzzy::match_columns(tokens, &dataset, &self.vocab);
        diagnostics.extend(report.diagnostics.iter().cloned());

        let mut candidate = self.current.clone();
        let explicit = geometry::explicit_geometry(tokens, &self.vocab);
        let modified = extract::extract_modifiers(&mut candidate, tokens, &self.vocab);
        if report.matches.is_empty() && explicit.is_none() && !modified {
            diagnostics.push(Diagnostic::Unrecognized);
            return Outcome::Unchanged;
        }

        diagnostics.extend(extract::extract_columns(
            &mut candidate,
            &report,
            tokens,
            &self.vocab,
        ));
        diagnostics.extend(geometry::resolve_geometry(&mut candidate, explicit));
        candidate.revalidate();

        if candidate.is_valid() && same_plot(&candidate, &self.current) {
            return Outcome::Unchanged;
        }
        self.commit(candidate)
    }
}

fn same_plot(a: &GraphSpec, b: &GraphSpec) -> bool {
    a.primary_columns == b.primary_columns
        && a.geometry == b.geometry
        && a.grouping_column == b.grouping_column
        && a.modifiers == b.modifiers
}
