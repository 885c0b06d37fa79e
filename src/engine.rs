//! Engine facade: top-level API for the taxotrace system.
//!
//! The `Engine` owns the symbol allocator, the registry, the fact store, and
//! a lazily-built [`ConnectionFinder`], and provides the label-level public
//! interface for populating facts and running path queries.

use std::sync::{Arc, OnceLock};

use crate::error::{SymbolError, TraceResult};
use crate::finder::{ConnectionFinder, FinderConfig, FinderPredicates};
use crate::path::ConnectionPath;
use crate::registry::SymbolRegistry;
use crate::store::FactStore;
use crate::symbol::{AtomicSymbolAllocator, SymbolId, SymbolKind, SymbolMeta};

/// The taxotrace engine.
///
/// Populated once at setup and read-only during queries. The finder (and its
/// taxonomy index) is built on the first query and kept for the engine's
/// lifetime: facts added after the first query are visible to raw fact reads
/// but not to the cached taxonomy — an explicit scope limitation, not a
/// failure mode.
pub struct Engine {
    config: FinderConfig,
    allocator: Arc<AtomicSymbolAllocator>,
    registry: Arc<SymbolRegistry>,
    store: Arc<FactStore>,
    finder: OnceLock<ConnectionFinder>,
}

impl Engine {
    /// Create a new engine with the default finder configuration.
    pub fn new() -> TraceResult<Self> {
        Self::with_config(FinderConfig::default())
    }

    /// Create a new engine with a custom finder configuration.
    pub fn with_config(config: FinderConfig) -> TraceResult<Self> {
        config.validate()?;
        tracing::debug!(
            inheritable = ?config.inheritable,
            specializable = ?config.specializable,
            "initializing taxotrace engine"
        );
        Ok(Self {
            config,
            allocator: Arc::new(AtomicSymbolAllocator::new()),
            registry: Arc::new(SymbolRegistry::new()),
            store: Arc::new(FactStore::new()),
            finder: OnceLock::new(),
        })
    }

    fn resolve_or_create(&self, kind: SymbolKind, label: &str) -> TraceResult<SymbolId> {
        if let Some(id) = self.registry.lookup(label) {
            return Ok(id);
        }
        let id = self.allocator.next_id()?;
        self.registry.register(SymbolMeta::new(id, kind, label))?;
        Ok(id)
    }

    /// Look up a concept symbol by label, creating it if needed.
    pub fn resolve_or_create_concept(&self, label: &str) -> TraceResult<SymbolId> {
        self.resolve_or_create(SymbolKind::Concept, label)
    }

    /// Look up a relation symbol by label, creating it if needed.
    pub fn resolve_or_create_relation(&self, label: &str) -> TraceResult<SymbolId> {
        self.resolve_or_create(SymbolKind::Relation, label)
    }

    /// Register an object with no facts.
    pub fn add_object(&self, label: &str) -> TraceResult<SymbolId> {
        let id = self.resolve_or_create_concept(label)?;
        self.store.add_object(id);
        Ok(id)
    }

    /// Add a fact, resolving (or creating) all three symbols by label.
    pub fn add_fact(&self, subject: &str, relation: &str, object: &str) -> TraceResult<()> {
        let s = self.resolve_or_create_concept(subject)?;
        let r = self.resolve_or_create_relation(relation)?;
        let o = self.resolve_or_create_concept(object)?;
        self.store.add_fact(s, r, o);
        Ok(())
    }

    /// Register an exception override, resolving symbols by label.
    pub fn add_exception(&self, subject: &str, relation: &str, object: &str) -> TraceResult<()> {
        let s = self.resolve_or_create_concept(subject)?;
        let r = self.resolve_or_create_relation(relation)?;
        let o = self.resolve_or_create_concept(object)?;
        self.store.add_exception(s, r, o);
        Ok(())
    }

    /// The connection finder, built on first use.
    pub fn finder(&self) -> TraceResult<&ConnectionFinder> {
        if let Some(finder) = self.finder.get() {
            return Ok(finder);
        }
        let preds = FinderPredicates::resolve(self)?;
        Ok(self
            .finder
            .get_or_init(|| ConnectionFinder::new(Arc::clone(&self.store), preds)))
    }

    /// Find a connection between two labeled objects.
    ///
    /// Unknown labels fail closed: the result is not-found, never an error.
    pub fn find_path(&self, start: &str, target: &str) -> TraceResult<ConnectionPath> {
        let (Some(s), Some(t)) = (self.registry.lookup(start), self.registry.lookup(target))
        else {
            return Ok(ConnectionPath::not_found());
        };
        Ok(self.finder()?.find_path(s, t))
    }

    /// Resolve a symbol by label or numeric ID (for the CLI).
    pub fn resolve_symbol(&self, name_or_id: &str) -> TraceResult<SymbolId> {
        if let Some(id) = self.registry.lookup(name_or_id) {
            return Ok(id);
        }
        if let Some(id) = name_or_id.parse::<u64>().ok().and_then(SymbolId::new)
            && self.registry.contains(id)
        {
            return Ok(id);
        }
        Err(SymbolError::UnknownSymbol {
            name: name_or_id.to_string(),
        }
        .into())
    }

    /// Resolve a symbol ID to its label, falling back to `sym:{id}`.
    pub fn resolve_label(&self, id: SymbolId) -> String {
        self.registry.resolve_label(id)
    }

    /// Get the symbol registry handle.
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Get the fact store handle.
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Get the finder configuration.
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Summary of the engine state.
    pub fn info(&self) -> EngineInfo {
        let mut relation_types: Vec<String> = self
            .store
            .relation_types()
            .into_iter()
            .map(|id| self.resolve_label(id))
            .collect();
        relation_types.sort_unstable();
        EngineInfo {
            symbols: self.registry.len(),
            objects: self.store.object_count(),
            facts: self.store.fact_count(),
            exceptions: self.store.exception_count(),
            relation_types,
        }
    }
}

/// Summary information about the engine state.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub symbols: usize,
    pub objects: usize,
    pub facts: usize,
    pub exceptions: usize,
    pub relation_types: Vec<String>,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "taxotrace engine info")?;
        writeln!(f, "  symbols:     {}", self.symbols)?;
        writeln!(f, "  objects:     {}", self.objects)?;
        writeln!(f, "  facts:       {}", self.facts)?;
        writeln!(f, "  exceptions:  {}", self.exceptions)?;
        writeln!(f, "  relations:   {}", self.relation_types.join(", "))?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .finish()
    }
}
