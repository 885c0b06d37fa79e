//! # taxotrace
//!
//! Taxonomy-aware connection finder: answers "is there a chain of relations
//! connecting concept A to concept B, and what is it?" over a small directed,
//! typed relational graph of taxonomy and part-whole/habitat facts.
//!
//! ## Architecture
//!
//! - **Fact store** (`store`): raw objects, insertion-ordered labeled
//!   relations, exception overrides. Pure storage, no inference.
//! - **Taxonomy index** (`taxonomy`): build-once `is_a` hierarchy with
//!   ancestor/descendant closures and shortest down-paths.
//! - **Finder** (`finder`): derives effective edges per node (direct +
//!   inherited + specialized, minus exceptions, deduplicated by shortest
//!   explanation) and runs BFS, reconstructing a fully-explained path.
//! - **Engine** (`engine`): facade owning symbols, registry, store, and the
//!   lazily-built finder.
//!
//! ## Library usage
//!
//! ```
//! use taxotrace::engine::Engine;
//!
//! let engine = Engine::new().unwrap();
//! engine.add_fact("Листок", "part_of", "Рослина").unwrap();
//! engine.add_fact("Однодольна", "is_a", "Рослина").unwrap();
//!
//! let path = engine.find_path("Листок", "Однодольна").unwrap();
//! assert!(path.is_found());
//! assert_eq!(path.len(), 2);
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod finder;
pub mod path;
pub mod registry;
pub mod seeds;
pub mod store;
pub mod symbol;
pub mod taxonomy;
