//! Seed packs: knowledge bootstrapping for the engine.
//!
//! A seed pack is a TOML-defined bundle of facts and exception overrides
//! that can be applied to an engine to populate a knowledge base. Two packs
//! are bundled into the binary: `flora-fauna` (the Ukrainian-labelled
//! biology base) and `savanna` (a small English demo).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::Engine;

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, Diagnostic)]
pub enum SeedError {
    #[error("seed pack not found: \"{id}\"")]
    #[diagnostic(
        code(taxotrace::seed::not_found),
        help("List available packs with `taxotrace packs`.")
    )]
    NotFound { id: String },

    #[error("failed to parse seed pack \"{id}\": {message}")]
    #[diagnostic(
        code(taxotrace::seed::parse),
        help(
            "Check the seed.toml syntax: a [seed] header plus [[facts]] and \
             [[exceptions]] tables with subject/relation/object strings."
        )
    )]
    Parse { id: String, message: String },

    #[error("failed to read seed file: {path}")]
    #[diagnostic(code(taxotrace::seed::io), help("Ensure the file exists and is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to apply seed \"{id}\": {message}")]
    #[diagnostic(
        code(taxotrace::seed::apply),
        help("Check that the fact subjects, relations, and objects are valid labels.")
    )]
    Apply { id: String, message: String },
}

pub type SeedResult<T> = std::result::Result<T, SeedError>;

// ── Seed pack data model ────────────────────────────────────────────────

/// A seed pack: TOML-defined knowledge bundle.
#[derive(Debug, Clone)]
pub struct SeedPack {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub facts: Vec<SeedFact>,
    pub exceptions: Vec<SeedFact>,
    /// Source: `Bundled` or `External(path)`.
    pub source: SeedSource,
}

/// Where a seed pack came from.
#[derive(Debug, Clone)]
pub enum SeedSource {
    /// Bundled into the binary via `include_str!`.
    Bundled,
    /// Loaded from an external file.
    External(PathBuf),
}

/// One labeled triple in a seed pack, used for both facts and exceptions.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFact {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

/// Report after applying a seed pack.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub id: String,
    pub facts_applied: usize,
    pub exceptions_applied: usize,
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SeedToml {
    seed: SeedMeta,
    #[serde(default)]
    facts: Vec<SeedFact>,
    #[serde(default)]
    exceptions: Vec<SeedFact>,
}

#[derive(Debug, Deserialize)]
struct SeedMeta {
    id: String,
    name: String,
    version: String,
    description: String,
}

// ── Bundled seed packs ──────────────────────────────────────────────────

const FLORA_FAUNA_TOML: &str = include_str!("../data/seeds/flora-fauna/seed.toml");
const SAVANNA_TOML: &str = include_str!("../data/seeds/savanna/seed.toml");

fn parse_seed_toml(toml_str: &str, source: SeedSource) -> SeedResult<SeedPack> {
    let parsed: SeedToml = toml::from_str(toml_str).map_err(|e| SeedError::Parse {
        id: "(unknown)".into(),
        message: e.to_string(),
    })?;
    Ok(SeedPack {
        id: parsed.seed.id,
        name: parsed.seed.name,
        version: parsed.seed.version,
        description: parsed.seed.description,
        facts: parsed.facts,
        exceptions: parsed.exceptions,
        source,
    })
}

fn bundled_packs() -> Vec<SeedPack> {
    [
        (FLORA_FAUNA_TOML, "flora-fauna"),
        (SAVANNA_TOML, "savanna"),
    ]
    .iter()
    .filter_map(
        |(toml, id)| match parse_seed_toml(toml, SeedSource::Bundled) {
            Ok(pack) => Some(pack),
            Err(e) => {
                tracing::warn!(seed = id, "failed to parse bundled seed: {e}");
                None
            }
        },
    )
    .collect()
}

// ── Seed registry ───────────────────────────────────────────────────────

/// Registry of available seed packs (bundled + discovered from disk).
pub struct SeedRegistry {
    packs: HashMap<String, SeedPack>,
}

impl SeedRegistry {
    /// Create a registry with only bundled packs.
    pub fn bundled() -> Self {
        let packs = bundled_packs()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        Self { packs }
    }

    /// Discover seed packs from a directory (in addition to bundled packs).
    ///
    /// Each subdirectory containing a `seed.toml` is loaded as a pack.
    pub fn discover(seeds_dir: &Path) -> Self {
        let mut registry = Self::bundled();

        if let Ok(entries) = std::fs::read_dir(seeds_dir) {
            for entry in entries.flatten() {
                let seed_file = entry.path().join("seed.toml");
                if !seed_file.is_file() {
                    continue;
                }
                match std::fs::read_to_string(&seed_file) {
                    Ok(content) => {
                        match parse_seed_toml(&content, SeedSource::External(entry.path())) {
                            Ok(pack) => {
                                registry.packs.insert(pack.id.clone(), pack);
                            }
                            Err(e) => {
                                tracing::warn!(
                                    path = %seed_file.display(),
                                    "failed to parse seed pack: {e}"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %seed_file.display(),
                            "failed to read seed file: {e}"
                        );
                    }
                }
            }
        }

        registry
    }

    /// Load a single pack from an explicit TOML file.
    pub fn load_file(path: &Path) -> SeedResult<SeedPack> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_seed_toml(&content, SeedSource::External(path.to_path_buf()))
    }

    /// List all available seed packs, sorted by ID.
    pub fn list(&self) -> Vec<&SeedPack> {
        let mut packs: Vec<&SeedPack> = self.packs.values().collect();
        packs.sort_by(|a, b| a.id.cmp(&b.id));
        packs
    }

    /// Get a seed pack by ID.
    pub fn get(&self, id: &str) -> SeedResult<&SeedPack> {
        self.packs
            .get(id)
            .ok_or_else(|| SeedError::NotFound { id: id.to_string() })
    }

    /// Apply a single seed pack to an engine by ID.
    pub fn apply(&self, pack_id: &str, engine: &Engine) -> SeedResult<SeedReport> {
        let pack = self.get(pack_id)?;
        apply_seed_pack(pack, engine)
    }
}

// ── Application logic ───────────────────────────────────────────────────

/// Apply a seed pack's facts and exceptions to an engine.
///
/// Reapplying a pack duplicates its facts — the store never deduplicates —
/// so packs are normally applied once into a fresh engine.
pub fn apply_seed_pack(pack: &SeedPack, engine: &Engine) -> SeedResult<SeedReport> {
    for fact in &pack.facts {
        engine
            .add_fact(&fact.subject, &fact.relation, &fact.object)
            .map_err(|e| SeedError::Apply {
                id: pack.id.clone(),
                message: e.to_string(),
            })?;
    }
    for exception in &pack.exceptions {
        engine
            .add_exception(&exception.subject, &exception.relation, &exception.object)
            .map_err(|e| SeedError::Apply {
                id: pack.id.clone(),
                message: e.to_string(),
            })?;
    }
    tracing::info!(
        seed = %pack.id,
        facts = pack.facts.len(),
        exceptions = pack.exceptions.len(),
        "seed pack applied"
    );
    Ok(SeedReport {
        id: pack.id.clone(),
        facts_applied: pack.facts.len(),
        exceptions_applied: pack.exceptions.len(),
    })
}
