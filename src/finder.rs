//! Connection finder: relation inference and breadth-first path search.
//!
//! The finder does not search the fact graph as stored. For each node it
//! derives the *effective* outgoing edges by applying three rules in order:
//!
//! 1. **Direct facts** — every raw stored fact is an edge with a one-step
//!    explanation. Direct facts are never exception-checked.
//! 2. **Subject-side inheritance** — a node inherits its taxonomic ancestors'
//!    inheritable relations (habitat, part-whole) as if it held them
//!    directly, unless an exception forbids the resulting edge.
//! 3. **Object-side specialization** — a specializable relation to a general
//!    type also reaches every subtype of that type, unless excepted; the
//!    explanation retraces the taxonomy chain one `is_a` step per edge.
//!
//! Multiple rules can produce the same (relation, neighbor) pair; only the
//! shortest explanation is kept per pair, first-discovered winning ties.
//! The search itself is a plain BFS over nodes, minimizing effective-edge
//! hops (not explanation steps), with per-node visited tracking.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, OnceLock};

use crate::engine::Engine;
use crate::error::TraceResult;
use crate::path::{ConnectionPath, PathStep};
use crate::store::FactStore;
use crate::symbol::SymbolId;
use crate::taxonomy::TaxonomyIndex;

/// The taxonomic parent relation label.
pub const IS_A: &str = "is_a";

/// Relation labels treated as inheritable / specializable by the finder.
///
/// Defaults match the biology domain: habitat and part-whole relations are
/// both inherited down the subject's taxonomy and specialized down the
/// object's taxonomy.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Relations a node inherits from its taxonomic ancestors.
    pub inheritable: Vec<String>,
    /// Relations specialized down to the object's subtypes.
    pub specializable: Vec<String>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            inheritable: vec!["is_habitat_of".into(), "part_of".into()],
            specializable: vec!["part_of".into(), "is_habitat_of".into()],
        }
    }
}

impl FinderConfig {
    /// Reject configurations with blank relation labels.
    pub fn validate(&self) -> Result<(), crate::error::EngineError> {
        for label in self.inheritable.iter().chain(&self.specializable) {
            if label.trim().is_empty() {
                return Err(crate::error::EngineError::InvalidConfig {
                    message: "relation labels must be non-empty".into(),
                });
            }
        }
        Ok(())
    }
}

/// Well-known relation SymbolIds for the inference rules.
#[derive(Debug, Clone)]
pub struct FinderPredicates {
    /// `is_a` — taxonomic parent link, used to build the hierarchy.
    pub is_a: SymbolId,
    /// Relations inherited from the subject's ancestors (rule 2).
    pub inheritable: HashSet<SymbolId>,
    /// Relations specialized down the object's descendants (rule 3).
    pub specializable: HashSet<SymbolId>,
}

impl FinderPredicates {
    /// Resolve all finder relations from the engine's registry per its
    /// configuration, creating them if needed.
    pub fn resolve(engine: &Engine) -> TraceResult<Self> {
        let config = engine.config();
        let is_a = engine.resolve_or_create_relation(IS_A)?;
        let inheritable = config
            .inheritable
            .iter()
            .map(|label| engine.resolve_or_create_relation(label))
            .collect::<TraceResult<HashSet<_>>>()?;
        let specializable = config
            .specializable
            .iter()
            .map(|label| engine.resolve_or_create_relation(label))
            .collect::<TraceResult<HashSet<_>>>()?;
        Ok(Self {
            is_a,
            inheritable,
            specializable,
        })
    }
}

/// One edge of the effective graph, with its full explanation.
///
/// The explanation is the step sequence justifying the edge: a single step
/// for direct and inherited edges, the original step plus one `is_a` step
/// per taxonomy edge for specialized ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveEdge {
    /// The relation label of the effective edge.
    pub relation: SymbolId,
    /// The node this edge reaches.
    pub neighbor: SymbolId,
    /// Steps fully describing the transition to `neighbor`.
    pub explanation: Vec<PathStep>,
}

/// Breadth-first path search over the effective relation graph.
///
/// Holds a lazily-built taxonomy index: constructed on the first query and
/// cached for the finder's lifetime. Fact-store mutations after the first
/// query are not reflected in the index — create a fresh finder to pick
/// them up.
pub struct ConnectionFinder {
    store: Arc<FactStore>,
    preds: FinderPredicates,
    taxonomy: OnceLock<TaxonomyIndex>,
}

impl ConnectionFinder {
    /// Create a finder over the given store. The taxonomy index is not built
    /// until the first query.
    pub fn new(store: Arc<FactStore>, preds: FinderPredicates) -> Self {
        Self {
            store,
            preds,
            taxonomy: OnceLock::new(),
        }
    }

    fn taxonomy(&self) -> &TaxonomyIndex {
        self.taxonomy
            .get_or_init(|| TaxonomyIndex::build(&self.store, self.preds.is_a))
    }

    /// The complete set of effective outgoing edges for one node: one winning
    /// explanation per distinct (relation, neighbor) pair, sorted by
    /// (relation, neighbor) for deterministic enumeration.
    ///
    /// A node with no stored facts and no ancestors yields an empty set.
    pub fn effective_edges(&self, node: SymbolId) -> Vec<EffectiveEdge> {
        let taxonomy = self.taxonomy();
        let mut candidates: Vec<EffectiveEdge> = Vec::new();

        // Rule 1: direct facts, exception-exempt.
        for fact in self.store.facts_from(node) {
            candidates.push(EffectiveEdge {
                relation: fact.relation,
                neighbor: fact.object,
                explanation: vec![PathStep::new(node, fact.relation, fact.object)],
            });
        }

        // Rule 2: inheritable relations of every ancestor, asserted as if the
        // node held them directly. Ancestors are visited in symbol order so
        // candidate order does not depend on hash iteration.
        let mut ancestors: Vec<SymbolId> = taxonomy.ancestors_of(node).into_iter().collect();
        ancestors.sort_unstable();
        for ancestor in ancestors {
            for fact in self.store.facts_from(ancestor) {
                if self.preds.inheritable.contains(&fact.relation)
                    && !self.store.has_exception(node, fact.relation, fact.object)
                {
                    candidates.push(EffectiveEdge {
                        relation: fact.relation,
                        neighbor: fact.object,
                        explanation: vec![PathStep::new(node, fact.relation, fact.object)],
                    });
                }
            }
        }

        // Rule 3: specialize accepted candidates down the object's taxonomy.
        let mut specialized: Vec<EffectiveEdge> = Vec::new();
        for edge in &candidates {
            if !self.preds.specializable.contains(&edge.relation) {
                continue;
            }
            let mut descendants: Vec<SymbolId> =
                taxonomy.descendants_of(edge.neighbor).into_iter().collect();
            descendants.sort_unstable();
            for descendant in descendants {
                if self.store.has_exception(node, edge.relation, descendant) {
                    continue;
                }
                let down = taxonomy.down_path(edge.neighbor, descendant);
                if down.is_empty() {
                    // Closure membership guarantees a down-path; an empty one
                    // means the closure computation is buggy.
                    tracing::warn!(
                        ancestor = %edge.neighbor,
                        descendant = %descendant,
                        "descendant without a down-path, dropping specialization"
                    );
                    continue;
                }
                if down.len() < 2 {
                    continue;
                }
                let mut explanation = vec![PathStep::new(node, edge.relation, edge.neighbor)];
                for pair in down.windows(2) {
                    // Each taxonomy edge is recorded in child→parent direction.
                    explanation.push(PathStep::new(pair[1], self.preds.is_a, pair[0]));
                }
                specialized.push(EffectiveEdge {
                    relation: edge.relation,
                    neighbor: descendant,
                    explanation,
                });
            }
        }
        candidates.extend(specialized);

        // Keep the shortest explanation per (relation, neighbor); replace only
        // on strictly shorter, so earlier rules win length ties.
        let mut best: HashMap<(SymbolId, SymbolId), Vec<PathStep>> = HashMap::new();
        for edge in candidates {
            match best.entry((edge.relation, edge.neighbor)) {
                Entry::Occupied(mut slot) => {
                    if edge.explanation.len() < slot.get().len() {
                        slot.insert(edge.explanation);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(edge.explanation);
                }
            }
        }

        let mut edges: Vec<EffectiveEdge> = best
            .into_iter()
            .map(|((relation, neighbor), explanation)| EffectiveEdge {
                relation,
                neighbor,
                explanation,
            })
            .collect();
        edges.sort_unstable_by_key(|e| (e.relation, e.neighbor));
        edges
    }

    /// Find one connecting chain from `start` to `target` through the
    /// effective graph, minimizing effective-edge hops.
    ///
    /// Never errors: unknown nodes, disconnected graphs, and empty stores all
    /// resolve to a not-found result. `start == target` is found with zero
    /// steps.
    pub fn find_path(&self, start: SymbolId, target: SymbolId) -> ConnectionPath {
        let mut visited: HashSet<SymbolId> = HashSet::new();
        let mut queue: VecDeque<(SymbolId, Vec<PathStep>)> = VecDeque::new();
        queue.push_back((start, Vec::new()));

        while let Some((current, path)) = queue.pop_front() {
            if current == target {
                tracing::debug!(
                    %start, %target,
                    steps = path.len(),
                    visited = visited.len(),
                    "connection found"
                );
                return ConnectionPath::found(path);
            }
            if !visited.insert(current) {
                continue;
            }
            for edge in self.effective_edges(current) {
                let mut extended = path.clone();
                extended.extend(edge.explanation);
                queue.push_back((edge.neighbor, extended));
            }
        }

        tracing::debug!(%start, %target, visited = visited.len(), "no connection");
        ConnectionPath::not_found()
    }
}

impl std::fmt::Debug for ConnectionFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFinder")
            .field("store", &self.store)
            .field("taxonomy_built", &self.taxonomy.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    fn seeded_engine(facts: &[(&str, &str, &str)]) -> Engine {
        let engine = Engine::new().unwrap();
        for (s, r, o) in facts {
            engine.add_fact(s, r, o).unwrap();
        }
        engine
    }

    fn step(engine: &Engine, s: &str, r: &str, o: &str) -> PathStep {
        PathStep::new(
            engine.registry().lookup(s).unwrap(),
            engine.registry().lookup(r).unwrap(),
            engine.registry().lookup(o).unwrap(),
        )
    }

    #[test]
    fn direct_facts_become_edges() {
        let engine = seeded_engine(&[("Leaf", "part_of", "Plant")]);
        let finder = engine.finder().unwrap();
        let leaf = engine.registry().lookup("Leaf").unwrap();

        let edges = finder.effective_edges(leaf);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].neighbor, engine.registry().lookup("Plant").unwrap());
        assert_eq!(
            edges[0].explanation,
            vec![step(&engine, "Leaf", "part_of", "Plant")]
        );
    }

    #[test]
    fn inherited_relation_asserted_directly() {
        let engine = seeded_engine(&[
            ("Forest", "is_habitat_of", "Animal"),
            ("Mammal", "is_a", "Animal"),
            ("Taiga", "is_a", "Forest"),
        ]);
        let finder = engine.finder().unwrap();
        let taiga = engine.registry().lookup("Taiga").unwrap();

        // Taiga inherits Forest's habitat fact as its own one-step edge.
        let edges = finder.effective_edges(taiga);
        let habitat = engine.registry().lookup("is_habitat_of").unwrap();
        let inherited: Vec<_> = edges.iter().filter(|e| e.relation == habitat).collect();
        assert!(!inherited.is_empty());
        let animal_edge = inherited
            .iter()
            .find(|e| e.neighbor == engine.registry().lookup("Animal").unwrap())
            .unwrap();
        assert_eq!(
            animal_edge.explanation,
            vec![step(&engine, "Taiga", "is_habitat_of", "Animal")]
        );
    }

    #[test]
    fn non_inheritable_relations_do_not_inherit() {
        let engine = seeded_engine(&[
            ("Animal", "eats", "Food"),
            ("Mammal", "is_a", "Animal"),
        ]);
        let finder = engine.finder().unwrap();
        let mammal = engine.registry().lookup("Mammal").unwrap();

        let eats = engine.registry().lookup("eats").unwrap();
        let edges = finder.effective_edges(mammal);
        assert!(edges.iter().all(|e| e.relation != eats));
    }

    #[test]
    fn specialization_retraces_taxonomy_chain() {
        let engine = seeded_engine(&[
            ("Tail", "part_of", "Mammal"),
            ("Cat", "is_a", "Mammal"),
            ("Manx", "is_a", "Cat"),
        ]);
        let finder = engine.finder().unwrap();
        let tail = engine.registry().lookup("Tail").unwrap();
        let manx = engine.registry().lookup("Manx").unwrap();

        let edges = finder.effective_edges(tail);
        let to_manx = edges.iter().find(|e| e.neighbor == manx).unwrap();
        assert_eq!(
            to_manx.explanation,
            vec![
                step(&engine, "Tail", "part_of", "Mammal"),
                step(&engine, "Cat", "is_a", "Mammal"),
                step(&engine, "Manx", "is_a", "Cat"),
            ]
        );
    }

    #[test]
    fn exception_suppresses_specialization() {
        let engine = seeded_engine(&[
            ("Tail", "part_of", "Mammal"),
            ("Cat", "is_a", "Mammal"),
            ("Manx", "is_a", "Cat"),
        ]);
        engine.add_exception("Tail", "part_of", "Manx").unwrap();
        let finder = engine.finder().unwrap();
        let tail = engine.registry().lookup("Tail").unwrap();
        let manx = engine.registry().lookup("Manx").unwrap();
        let cat = engine.registry().lookup("Cat").unwrap();

        let edges = finder.effective_edges(tail);
        assert!(edges.iter().all(|e| e.neighbor != manx));
        // The sibling specialization survives.
        assert!(edges.iter().any(|e| e.neighbor == cat));
    }

    #[test]
    fn exception_suppresses_inheritance() {
        let engine = seeded_engine(&[
            ("Garden", "is_habitat_of", "Plant"),
            ("Rockery", "is_a", "Garden"),
        ]);
        engine
            .add_exception("Rockery", "is_habitat_of", "Plant")
            .unwrap();
        let finder = engine.finder().unwrap();
        let rockery = engine.registry().lookup("Rockery").unwrap();
        let plant = engine.registry().lookup("Plant").unwrap();

        let edges = finder.effective_edges(rockery);
        assert!(edges.iter().all(|e| e.neighbor != plant));
    }

    #[test]
    fn direct_facts_are_exception_exempt() {
        let engine = seeded_engine(&[("Leaf", "part_of", "Plant")]);
        engine.add_exception("Leaf", "part_of", "Plant").unwrap();
        let finder = engine.finder().unwrap();
        let leaf = engine.registry().lookup("Leaf").unwrap();
        let plant = engine.registry().lookup("Plant").unwrap();

        // Exceptions only apply to inferred edges; the raw fact stays.
        let edges = finder.effective_edges(leaf);
        assert!(edges.iter().any(|e| e.neighbor == plant));
    }

    #[test]
    fn shortest_explanation_wins_dedup() {
        // Leaf part_of Plant both directly and via specialization from
        // Vegetation (Plant is_a Vegetation): the one-step direct explanation
        // must win over the two-step specialized one.
        let engine = seeded_engine(&[
            ("Leaf", "part_of", "Vegetation"),
            ("Leaf", "part_of", "Plant"),
            ("Plant", "is_a", "Vegetation"),
        ]);
        let finder = engine.finder().unwrap();
        let leaf = engine.registry().lookup("Leaf").unwrap();
        let plant = engine.registry().lookup("Plant").unwrap();

        let edges = finder.effective_edges(leaf);
        let to_plant: Vec<_> = edges.iter().filter(|e| e.neighbor == plant).collect();
        assert_eq!(to_plant.len(), 1);
        assert_eq!(
            to_plant[0].explanation,
            vec![step(&engine, "Leaf", "part_of", "Plant")]
        );
    }

    #[test]
    fn effective_edges_are_sorted() {
        let engine = seeded_engine(&[
            ("Tail", "part_of", "Mammal"),
            ("Cat", "is_a", "Mammal"),
            ("Tiger", "is_a", "Mammal"),
            ("Tail", "attached_to", "Body"),
        ]);
        let finder = engine.finder().unwrap();
        let tail = engine.registry().lookup("Tail").unwrap();

        let edges = finder.effective_edges(tail);
        let keys: Vec<_> = edges.iter().map(|e| (e.relation, e.neighbor)).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn dead_end_node_has_no_edges() {
        let engine = seeded_engine(&[("Leaf", "part_of", "Plant")]);
        let finder = engine.finder().unwrap();
        let plant = engine.registry().lookup("Plant").unwrap();

        assert!(finder.effective_edges(plant).is_empty());
    }

    #[test]
    fn find_path_reflexive() {
        let engine = seeded_engine(&[("Leaf", "part_of", "Plant")]);
        let finder = engine.finder().unwrap();
        let leaf = engine.registry().lookup("Leaf").unwrap();

        let path = finder.find_path(leaf, leaf);
        assert!(path.is_found());
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn find_path_chains_effective_edges() {
        let engine = seeded_engine(&[
            ("Tail", "part_of", "Mammal"),
            ("Mammal", "is_a", "Animal"),
        ]);
        let finder = engine.finder().unwrap();
        let tail = engine.registry().lookup("Tail").unwrap();
        let animal = engine.registry().lookup("Animal").unwrap();

        let path = finder.find_path(tail, animal);
        assert!(path.is_found());
        assert_eq!(
            path.steps(),
            &[
                step(&engine, "Tail", "part_of", "Mammal"),
                step(&engine, "Mammal", "is_a", "Animal"),
            ]
        );
    }

    #[test]
    fn find_path_not_found_is_empty() {
        let engine = seeded_engine(&[
            ("Leaf", "part_of", "Plant"),
            ("Tail", "part_of", "Mammal"),
        ]);
        let finder = engine.finder().unwrap();
        let leaf = engine.registry().lookup("Leaf").unwrap();
        let tail = engine.registry().lookup("Tail").unwrap();

        let path = finder.find_path(leaf, tail);
        assert!(!path.is_found());
        assert!(path.is_empty());
    }

    #[test]
    fn find_path_prefers_fewest_hops() {
        // Direct edge A→C exists alongside A→B→C.
        let engine = seeded_engine(&[
            ("A", "linked_to", "B"),
            ("B", "linked_to", "C"),
            ("A", "linked_to", "C"),
        ]);
        let finder = engine.finder().unwrap();
        let a = engine.registry().lookup("A").unwrap();
        let c = engine.registry().lookup("C").unwrap();

        let path = finder.find_path(a, c);
        assert!(path.is_found());
        assert_eq!(path.steps(), &[step(&engine, "A", "linked_to", "C")]);
    }

    #[test]
    fn find_path_survives_relation_cycles() {
        let engine = seeded_engine(&[
            ("A", "linked_to", "B"),
            ("B", "linked_to", "A"),
        ]);
        let finder = engine.finder().unwrap();
        let a = engine.registry().lookup("A").unwrap();

        let missing = engine.resolve_or_create_concept("Nowhere").unwrap();
        let path = finder.find_path(a, missing);
        assert!(!path.is_found());
    }

    #[test]
    fn custom_config_changes_inference() {
        let config = FinderConfig {
            inheritable: vec!["grows_in".into()],
            specializable: vec![],
        };
        let engine = Engine::with_config(config).unwrap();
        engine.add_fact("Plant", "grows_in", "Soil").unwrap();
        engine.add_fact("Moss", "is_a", "Plant").unwrap();

        let finder = engine.finder().unwrap();
        let moss = engine.registry().lookup("Moss").unwrap();
        let soil = engine.registry().lookup("Soil").unwrap();

        let edges = finder.effective_edges(moss);
        assert!(edges.iter().any(|e| e.neighbor == soil));
    }

    #[test]
    fn blank_config_label_rejected() {
        let config = FinderConfig {
            inheritable: vec!["  ".into()],
            specializable: vec![],
        };
        assert!(Engine::with_config(config).is_err());
    }
}
