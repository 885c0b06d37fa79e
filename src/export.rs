//! Export types for serializing engine state.
//!
//! These types provide human-readable, label-resolved representations of
//! symbols and facts suitable for JSON export.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;

/// Exported symbol with resolved label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolExport {
    /// Numeric symbol ID.
    pub id: u64,
    /// Human-readable label.
    pub label: String,
    /// Symbol kind (Concept, Relation).
    pub kind: String,
}

/// Exported fact with resolved labels for all positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactExport {
    /// Subject symbol ID.
    pub subject_id: u64,
    /// Subject label.
    pub subject_label: String,
    /// Relation symbol ID.
    pub relation_id: u64,
    /// Relation label.
    pub relation_label: String,
    /// Object symbol ID.
    pub object_id: u64,
    /// Object label.
    pub object_label: String,
}

/// Snapshot the symbol table, sorted by ID.
pub fn export_symbols(engine: &Engine) -> Vec<SymbolExport> {
    let mut symbols: Vec<SymbolExport> = engine
        .registry()
        .all()
        .into_iter()
        .map(|meta| SymbolExport {
            id: meta.id.get(),
            label: meta.label,
            kind: meta.kind.to_string(),
        })
        .collect();
    symbols.sort_by_key(|s| s.id);
    symbols
}

/// Snapshot all stored facts with resolved labels, sorted by subject then
/// insertion order.
pub fn export_facts(engine: &Engine) -> Vec<FactExport> {
    let mut subjects = engine.store().objects();
    subjects.sort_unstable();

    let mut facts = Vec::new();
    for subject in subjects {
        for fact in engine.store().facts_from(subject) {
            facts.push(FactExport {
                subject_id: subject.get(),
                subject_label: engine.resolve_label(subject),
                relation_id: fact.relation.get(),
                relation_label: engine.resolve_label(fact.relation),
                object_id: fact.object.get(),
                object_label: engine.resolve_label(fact.object),
            });
        }
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_round_trip() {
        let engine = Engine::new().unwrap();
        engine.add_fact("Листок", "part_of", "Рослина").unwrap();

        let symbols = export_symbols(&engine);
        assert_eq!(symbols.len(), 3);
        assert!(symbols.windows(2).all(|w| w[0].id < w[1].id));
        assert!(symbols.iter().any(|s| s.label == "part_of" && s.kind == "Relation"));

        let facts = export_facts(&engine);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].subject_label, "Листок");
        assert_eq!(facts[0].relation_label, "part_of");
        assert_eq!(facts[0].object_label, "Рослина");

        // JSON serialization keeps all positions.
        let json = serde_json::to_string(&facts).unwrap();
        assert!(json.contains("Рослина"));
    }
}
