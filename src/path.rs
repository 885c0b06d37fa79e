//! Connection path: the explained result of a reachability query.
//!
//! A path is an ordered list of [`PathStep`]s — each one a directly
//! verifiable fact-level claim — plus a found flag. Steps chain: each step
//! shares an endpoint with its predecessor. Where a specialized relation was
//! traversed, the chain contains one `is_a` sub-step per taxonomy edge,
//! written in the child→parent direction.

use serde::{Deserialize, Serialize};

use crate::registry::SymbolRegistry;
use crate::symbol::SymbolId;

/// One fact-level claim in an explained path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    /// The step's subject.
    pub subject: SymbolId,
    /// The relation label.
    pub relation: SymbolId,
    /// The step's object.
    pub object: SymbolId,
}

impl PathStep {
    /// Create a new step.
    pub fn new(subject: SymbolId, relation: SymbolId, object: SymbolId) -> Self {
        Self {
            subject,
            relation,
            object,
        }
    }
}

/// Result of a path query: an ordered step list plus a found flag.
///
/// Created fresh per query and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPath {
    steps: Vec<PathStep>,
    found: bool,
}

impl ConnectionPath {
    /// A successful result with the given explanation steps.
    ///
    /// A zero-step found path means start and target were the same object.
    pub fn found(steps: Vec<PathStep>) -> Self {
        Self { steps, found: true }
    }

    /// A failed result: no connection exists.
    pub fn not_found() -> Self {
        Self {
            steps: Vec::new(),
            found: false,
        }
    }

    /// Whether a connection was found.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Number of explanation steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the step list is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The explanation steps, in order.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Render the path as human-readable text, resolving labels through the
    /// registry. Informational output only, not a machine-parseable format.
    pub fn render(&self, registry: &SymbolRegistry) -> String {
        if !self.found {
            return "no connection found".to_string();
        }
        let trace = self
            .steps
            .iter()
            .map(|step| {
                format!(
                    "{} -[{}]-> {}",
                    registry.resolve_label(step.subject),
                    registry.resolve_label(step.relation),
                    registry.resolve_label(step.object),
                )
            })
            .collect::<Vec<_>>()
            .join(" → ");
        if self.steps.is_empty() {
            "found path (0 steps)".to_string()
        } else {
            format!("found path ({} steps): {}", self.steps.len(), trace)
        }
    }
}
