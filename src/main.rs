//! taxotrace CLI: explained path queries over a typed fact graph.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use taxotrace::engine::Engine;
use taxotrace::export;
use taxotrace::seeds::{SeedRegistry, SeedSource, apply_seed_pack};

#[derive(Parser)]
#[command(name = "taxotrace", version, about = "Taxonomy-aware connection finder")]
struct Cli {
    /// Directory with extra seed packs (each subdirectory holding a seed.toml).
    #[arg(long, global = true)]
    seeds_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the bundled biology pack and run the demo queries.
    Demo,

    /// Find an explained connection between two objects.
    Query {
        /// Start object label.
        #[arg(long)]
        from: String,

        /// Target object label.
        #[arg(long)]
        to: String,

        /// Seed pack ID to load.
        #[arg(long, default_value = "flora-fauna")]
        pack: String,

        /// Load facts from an explicit seed TOML file instead of a pack.
        #[arg(long, conflicts_with = "pack")]
        file: Option<PathBuf>,
    },

    /// List available seed packs.
    Packs,

    /// Show engine statistics for a loaded pack.
    Info {
        /// Seed pack ID to load.
        #[arg(long, default_value = "flora-fauna")]
        pack: String,

        /// Load facts from an explicit seed TOML file instead of a pack.
        #[arg(long, conflicts_with = "pack")]
        file: Option<PathBuf>,
    },

    /// Export engine data as JSON.
    Export {
        #[command(subcommand)]
        action: ExportAction,

        /// Seed pack ID to load.
        #[arg(long, default_value = "flora-fauna")]
        pack: String,

        /// Load facts from an explicit seed TOML file instead of a pack.
        #[arg(long, conflicts_with = "pack")]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ExportAction {
    /// Export the symbol table as JSON.
    Symbols,
    /// Export all facts as JSON.
    Facts,
}

fn seed_registry(seeds_dir: Option<&Path>) -> SeedRegistry {
    match seeds_dir {
        Some(dir) => SeedRegistry::discover(dir),
        None => SeedRegistry::bundled(),
    }
}

fn load_engine(registry: &SeedRegistry, pack: &str, file: Option<&Path>) -> Result<Engine> {
    let engine = Engine::new().into_diagnostic()?;
    match file {
        Some(path) => {
            let pack = SeedRegistry::load_file(path).into_diagnostic()?;
            apply_seed_pack(&pack, &engine).into_diagnostic()?;
        }
        None => {
            registry.apply(pack, &engine).into_diagnostic()?;
        }
    }
    Ok(engine)
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let registry = seed_registry(cli.seeds_dir.as_deref());

    match cli.command {
        Commands::Demo => {
            let engine = load_engine(&registry, "flora-fauna", None)?;
            for (from, to) in [("Хвіст", "Тигр"), ("Сад", "Корінь")] {
                let path = engine.find_path(from, to).into_diagnostic()?;
                println!("{from} → {to}: {}", path.render(engine.registry()));
            }
            println!();
            print!("{}", engine.info());
        }

        Commands::Query {
            from,
            to,
            pack,
            file,
        } => {
            let engine = load_engine(&registry, &pack, file.as_deref())?;

            // Resolve up front so typos surface as diagnostics instead of a
            // silent not-found.
            let start = engine.resolve_symbol(&from).into_diagnostic()?;
            let target = engine.resolve_symbol(&to).into_diagnostic()?;

            let path = engine.finder().into_diagnostic()?.find_path(start, target);
            println!("{}", path.render(engine.registry()));
        }

        Commands::Packs => {
            for pack in registry.list() {
                let source = match &pack.source {
                    SeedSource::Bundled => "bundled".to_string(),
                    SeedSource::External(path) => path.display().to_string(),
                };
                println!(
                    "{} v{} — {} ({} facts, {} exceptions, {source})",
                    pack.id,
                    pack.version,
                    pack.description,
                    pack.facts.len(),
                    pack.exceptions.len(),
                );
            }
        }

        Commands::Info { pack, file } => {
            let engine = load_engine(&registry, &pack, file.as_deref())?;
            print!("{}", engine.info());
        }

        Commands::Export { action, pack, file } => {
            let engine = load_engine(&registry, &pack, file.as_deref())?;
            let json = match action {
                ExportAction::Symbols => {
                    serde_json::to_string_pretty(&export::export_symbols(&engine))
                        .into_diagnostic()?
                }
                ExportAction::Facts => {
                    serde_json::to_string_pretty(&export::export_facts(&engine))
                        .into_diagnostic()?
                }
            };
            println!("{json}");
        }
    }

    Ok(())
}
