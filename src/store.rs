//! Fact store: raw objects, directed labeled relations, and exception
//! overrides.
//!
//! Pure storage with no inference. Facts are kept per-subject as an
//! insertion-ordered sequence; duplicates are permitted and never
//! deduplicated. Exceptions forbid asserting a specific (subject, relation,
//! object) triple when the inference layer would otherwise derive it.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};

use crate::symbol::SymbolId;

/// One raw outgoing fact: a labeled edge from its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// The relation label of this edge.
    pub relation: SymbolId,
    /// The edge target.
    pub object: SymbolId,
}

impl Fact {
    /// Create a new fact.
    pub fn new(relation: SymbolId, object: SymbolId) -> Self {
        Self { relation, object }
    }
}

/// Summary statistics over a fact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of known objects.
    pub objects: usize,
    /// Total number of stored facts (duplicates counted).
    pub facts: usize,
    /// Number of registered exception overrides.
    pub exceptions: usize,
    /// Distinct relation labels in use, sorted by symbol ID.
    pub relation_types: Vec<SymbolId>,
}

/// In-memory fact store.
///
/// Read-only from the finder's perspective: populated once at setup, then
/// queried. The collections are concurrent maps so the store can be shared
/// behind an `Arc` without additional locking.
pub struct FactStore {
    /// Subject → insertion-ordered outgoing facts.
    facts: DashMap<SymbolId, Vec<Fact>>,
    /// All known objects (subjects and targets alike).
    objects: DashSet<SymbolId>,
    /// Forbidden (subject, relation, object) triples.
    exceptions: DashSet<(SymbolId, SymbolId, SymbolId)>,
    /// Total fact count.
    fact_count: AtomicUsize,
}

impl FactStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            facts: DashMap::new(),
            objects: DashSet::new(),
            exceptions: DashSet::new(),
            fact_count: AtomicUsize::new(0),
        }
    }

    /// Register an object with no facts (yet).
    pub fn add_object(&self, object: SymbolId) {
        self.objects.insert(object);
    }

    /// Append a fact to the subject's relation list.
    ///
    /// Both endpoints are registered as objects. Duplicate facts are kept.
    pub fn add_fact(&self, subject: SymbolId, relation: SymbolId, object: SymbolId) {
        self.objects.insert(subject);
        self.objects.insert(object);
        self.facts
            .entry(subject)
            .or_default()
            .push(Fact::new(relation, object));
        self.fact_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Raw outgoing facts for one subject, insertion order preserved.
    ///
    /// Unknown subjects yield an empty list, not an error.
    pub fn facts_from(&self, subject: SymbolId) -> Vec<Fact> {
        self.facts
            .get(&subject)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// All known objects.
    pub fn objects(&self) -> Vec<SymbolId> {
        self.objects.iter().map(|r| *r.key()).collect()
    }

    /// Visit every (subject, fact) pair once.
    ///
    /// This is the full-mapping view used to build the taxonomy index.
    pub fn for_each_fact(&self, mut f: impl FnMut(SymbolId, &Fact)) {
        for entry in self.facts.iter() {
            for fact in entry.value() {
                f(*entry.key(), fact);
            }
        }
    }

    /// Register an exception: forbid asserting `subject -relation-> object`
    /// as an inferred edge.
    pub fn add_exception(&self, subject: SymbolId, relation: SymbolId, object: SymbolId) {
        self.exceptions.insert((subject, relation, object));
    }

    /// Whether an override forbids asserting the given (possibly inferred) edge.
    pub fn has_exception(&self, subject: SymbolId, relation: SymbolId, object: SymbolId) -> bool {
        self.exceptions.contains(&(subject, relation, object))
    }

    /// Number of known objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Total number of stored facts.
    pub fn fact_count(&self) -> usize {
        self.fact_count.load(Ordering::Relaxed)
    }

    /// Number of registered exceptions.
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Distinct relation labels in use, sorted by symbol ID.
    pub fn relation_types(&self) -> Vec<SymbolId> {
        let mut types: Vec<SymbolId> = Vec::new();
        self.for_each_fact(|_, fact| {
            if !types.contains(&fact.relation) {
                types.push(fact.relation);
            }
        });
        types.sort_unstable();
        types
    }

    /// Summary statistics over the store.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            objects: self.object_count(),
            facts: self.fact_count(),
            exceptions: self.exception_count(),
            relation_types: self.relation_types(),
        }
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactStore")
            .field("objects", &self.object_count())
            .field("facts", &self.fact_count())
            .field("exceptions", &self.exception_count())
            .finish()
    }
}
