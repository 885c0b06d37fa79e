//! Taxonomy index: cached `is_a` hierarchy with closure queries.
//!
//! Built once from every stored fact labeled `is_a` (subject = child,
//! object = parent) and never updated afterwards — if the fact store mutates
//! after the first query, the index keeps answering from the earlier
//! snapshot. Backed by a `petgraph` digraph with child→parent edges, so the
//! descendant direction is simply the incoming edge set.
//!
//! All traversals are iterative with an explicit frontier and visited set:
//! a cyclic `is_a` graph terminates instead of recursing forever.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::store::FactStore;
use crate::symbol::SymbolId;

/// Cached child→parent hierarchy derived from `is_a` facts.
pub struct TaxonomyIndex {
    /// Directed graph: an edge child→parent per `is_a` fact.
    graph: DiGraph<SymbolId, ()>,
    /// SymbolId → NodeIndex mapping for O(1) node lookups.
    nodes: HashMap<SymbolId, NodeIndex>,
}

impl TaxonomyIndex {
    /// Build the index by scanning every stored fact once.
    pub fn build(store: &FactStore, is_a: SymbolId) -> Self {
        let mut index = Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };
        store.for_each_fact(|subject, fact| {
            if fact.relation == is_a {
                let child = index.ensure_node(subject);
                let parent = index.ensure_node(fact.object);
                index.graph.add_edge(child, parent, ());
            }
        });
        tracing::debug!(
            nodes = index.nodes.len(),
            edges = index.graph.edge_count(),
            "taxonomy index built"
        );
        index
    }

    fn ensure_node(&mut self, symbol: SymbolId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&symbol) {
            return idx;
        }
        let idx = self.graph.add_node(symbol);
        self.nodes.insert(symbol, idx);
        idx
    }

    /// Number of nodes that participate in at least one `is_a` fact.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes reachable from `node` by repeatedly following child→parent
    /// edges. Excludes `node` itself unless it is reachable via a cycle.
    pub fn ancestors_of(&self, node: SymbolId) -> HashSet<SymbolId> {
        self.closure(node, Direction::Outgoing)
    }

    /// All nodes reachable from `node` by repeatedly following parent→child
    /// edges. Excludes `node` itself unless it is reachable via a cycle.
    pub fn descendants_of(&self, node: SymbolId) -> HashSet<SymbolId> {
        self.closure(node, Direction::Incoming)
    }

    fn closure(&self, node: SymbolId, direction: Direction) -> HashSet<SymbolId> {
        let mut result: HashSet<SymbolId> = HashSet::new();
        let Some(&start) = self.nodes.get(&node) else {
            return result;
        };

        // The result set doubles as the visited guard; the start node is not
        // pre-inserted, so a cycle back to it shows up in the closure.
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for next in self.graph.neighbors_directed(current, direction) {
                if result.insert(self.graph[next]) {
                    stack.push(next);
                }
            }
        }
        result
    }

    /// One shortest node sequence from `ancestor` down to `descendant`,
    /// strictly via parent→child edges.
    ///
    /// Returns `[ancestor]` when the two are equal, and the empty sequence
    /// when `descendant` is not below `ancestor`. BFS with predecessor
    /// tracking, so the sequence has the fewest possible taxonomy edges.
    pub fn down_path(&self, ancestor: SymbolId, descendant: SymbolId) -> Vec<SymbolId> {
        if ancestor == descendant {
            return vec![ancestor];
        }
        let (Some(&start), Some(&goal)) = (self.nodes.get(&ancestor), self.nodes.get(&descendant))
        else {
            return Vec::new();
        };

        let mut queue = VecDeque::new();
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        queue.push_back(start);
        prev.insert(start, start);

        while let Some(current) = queue.pop_front() {
            for child in self.graph.neighbors_directed(current, Direction::Incoming) {
                if prev.contains_key(&child) {
                    continue;
                }
                prev.insert(child, current);
                if child == goal {
                    // Walk the predecessor chain back up to the ancestor.
                    let mut path = vec![self.graph[child]];
                    let mut at = child;
                    while at != start {
                        at = prev[&at];
                        path.push(self.graph[at]);
                    }
                    path.reverse();
                    return path;
                }
                queue.push_back(child);
            }
        }
        Vec::new()
    }
}

impl std::fmt::Debug for TaxonomyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaxonomyIndex")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
