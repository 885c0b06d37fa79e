//! Symbol registry: bidirectional label ↔ ID mapping.
//!
//! The [`SymbolRegistry`] provides O(1) lookups in both directions using two
//! `DashMap`s. Labels are matched exactly — symbol equality is identity of
//! the token, and the data is multilingual, so no case normalization is
//! applied.

use dashmap::DashMap;

use crate::error::{SymbolError, TraceResult};
use crate::symbol::{SymbolId, SymbolMeta};

/// Bidirectional symbol registry mapping IDs to metadata and labels to IDs.
pub struct SymbolRegistry {
    /// Forward map: SymbolId → SymbolMeta (source of truth).
    id_to_meta: DashMap<SymbolId, SymbolMeta>,
    /// Reverse map: label → SymbolId.
    label_to_id: DashMap<String, SymbolId>,
}

impl SymbolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            id_to_meta: DashMap::new(),
            label_to_id: DashMap::new(),
        }
    }

    /// Register a symbol. Errors if the label is already taken.
    pub fn register(&self, meta: SymbolMeta) -> TraceResult<()> {
        if let Some(existing) = self.label_to_id.get(&meta.label) {
            return Err(SymbolError::DuplicateLabel {
                label: meta.label.clone(),
                existing_id: existing.value().get(),
            }
            .into());
        }

        self.label_to_id.insert(meta.label.clone(), meta.id);
        self.id_to_meta.insert(meta.id, meta);
        Ok(())
    }

    /// Look up symbol metadata by ID.
    pub fn get(&self, id: SymbolId) -> Option<SymbolMeta> {
        self.id_to_meta.get(&id).map(|r| r.value().clone())
    }

    /// Look up a symbol ID by label (exact match).
    pub fn lookup(&self, label: &str) -> Option<SymbolId> {
        self.label_to_id.get(label).map(|r| *r.value())
    }

    /// Look up symbol metadata by label (exact match).
    pub fn lookup_meta(&self, label: &str) -> Option<SymbolMeta> {
        let id = self.lookup(label)?;
        self.get(id)
    }

    /// Whether the given ID is registered.
    pub fn contains(&self, id: SymbolId) -> bool {
        self.id_to_meta.contains_key(&id)
    }

    /// Return all registered symbols.
    pub fn all(&self) -> Vec<SymbolMeta> {
        self.id_to_meta.iter().map(|r| r.value().clone()).collect()
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.id_to_meta.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_meta.is_empty()
    }

    /// Resolve a label to a human-readable string, falling back to `sym:{id}`.
    pub fn resolve_label(&self, id: SymbolId) -> String {
        self.get(id)
            .map(|m| m.label.clone())
            .unwrap_or_else(|| format!("sym:{}", id.get()))
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolRegistry")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn sym(id: u64) -> SymbolId {
        SymbolId::new(id).unwrap()
    }

    fn meta(id: u64, label: &str) -> SymbolMeta {
        SymbolMeta::new(sym(id), SymbolKind::Concept, label)
    }

    #[test]
    fn register_and_lookup() {
        let reg = SymbolRegistry::new();
        let m = meta(1, "Рослина");
        reg.register(m.clone()).unwrap();

        // Forward lookup by ID.
        let got = reg.get(sym(1)).unwrap();
        assert_eq!(got.label, "Рослина");

        // Reverse lookup by label.
        let id = reg.lookup("Рослина").unwrap();
        assert_eq!(id, sym(1));

        // Lookup meta by label.
        let got_meta = reg.lookup_meta("Рослина").unwrap();
        assert_eq!(got_meta.id, sym(1));
    }

    #[test]
    fn lookup_is_exact_match() {
        let reg = SymbolRegistry::new();
        reg.register(meta(1, "Oak")).unwrap();

        assert_eq!(reg.lookup("Oak"), Some(sym(1)));
        assert_eq!(reg.lookup("oak"), None);
        assert_eq!(reg.lookup("OAK"), None);
    }

    #[test]
    fn distinct_casings_are_distinct_symbols() {
        let reg = SymbolRegistry::new();
        reg.register(meta(1, "Сад")).unwrap();
        reg.register(meta(2, "сад")).unwrap();

        assert_eq!(reg.lookup("Сад"), Some(sym(1)));
        assert_eq!(reg.lookup("сад"), Some(sym(2)));
    }

    #[test]
    fn duplicate_label_error() {
        let reg = SymbolRegistry::new();
        reg.register(meta(1, "Oak")).unwrap();

        let result = reg.register(meta(2, "Oak"));
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("duplicate label"));
    }

    #[test]
    fn resolve_label_falls_back_to_id() {
        let reg = SymbolRegistry::new();
        reg.register(meta(1, "Oak")).unwrap();

        assert_eq!(reg.resolve_label(sym(1)), "Oak");
        assert_eq!(reg.resolve_label(sym(99)), "sym:99");
    }

    #[test]
    fn all_symbols() {
        let reg = SymbolRegistry::new();
        reg.register(meta(1, "Ліс")).unwrap();
        reg.register(meta(2, "Сад")).unwrap();
        reg.register(meta(3, "Поле")).unwrap();

        assert_eq!(reg.all().len(), 3);
        assert_eq!(reg.len(), 3);
        assert!(!reg.is_empty());
        assert!(reg.contains(sym(2)));
        assert!(!reg.contains(sym(9)));
    }
}
