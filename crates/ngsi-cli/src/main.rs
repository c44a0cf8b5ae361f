//! CLI entry point for the selector index.
//!
//! This binary exercises the indexing engine from the command line:
//! full-index a project, look up a selector, prefix-search, and resolve
//! import paths through the alias mappings.
//!
//! # Usage
//!
//! ```bash
//! ngsi [OPTIONS] <COMMAND>
//!
//! # Index a project and show a summary
//! ngsi index --path /path/to/project
//!
//! # Resolve a selector to its declaring entity
//! ngsi find app-widget --path /path/to/project
//!
//! # Prefix-search the selector index
//! ngsi search app- --path /path/to/project
//!
//! # Resolve an import path through the alias mappings
//! ngsi resolve src/app/widget.component.ts --from src/app/panel.component.ts
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use ngsi_core::{ElementRecord, IndexConfig, IndexSnapshot};
use ngsi_indexer::{Indexer, StatsSnapshot};
use ngsi_resolver::{AliasResolver, PathMappings};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// CLI for indexing component, directive, and pipe selectors.
///
/// Walks a project source tree, extracts entity metadata from decorated
/// classes, and answers selector lookups against the resulting index.
#[derive(Parser)]
#[command(name = "ngsi", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Project root directory to index.
    ///
    /// Defaults to the current directory if not specified.
    #[arg(short, long, global = true, env = "NGSI_PATH")]
    path: Option<Utf8PathBuf>,

    /// Path to a JSON file with merged path mappings (`base_url`, `paths`).
    #[arg(long, global = true, env = "NGSI_MAPPINGS")]
    mappings: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Index the project and display a summary.
    Index {
        /// List every indexed selector.
        #[arg(short, long)]
        detailed: bool,

        /// Write the index snapshot to a JSON file.
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Look up a selector and print its declaring entity.
    Find {
        /// The selector to resolve.
        selector: String,

        /// Print every colliding candidate, not just the winner.
        #[arg(short, long)]
        all: bool,
    },

    /// Prefix-search the selector index.
    Search {
        /// The selector prefix.
        prefix: String,
    },

    /// Resolve a file path to its import path (alias-first).
    Resolve {
        /// Target file to import.
        target: Utf8PathBuf,

        /// File the import statement lives in.
        #[arg(long)]
        from: Utf8PathBuf,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level.to_owned())
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds an [`IndexConfig`] from CLI arguments.
///
/// # Errors
///
/// Returns an error if the project root doesn't exist or isn't a
/// directory.
fn build_config(cli: &Cli) -> color_eyre::Result<IndexConfig> {
    let path = cli.path.clone().unwrap_or_else(|| Utf8PathBuf::from("."));

    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("Path does not exist: {}", path));
    }
    if !path.is_dir() {
        return Err(color_eyre::eyre::eyre!("Path is not a directory: {}", path));
    }

    Ok(IndexConfig::for_root(path))
}

/// Creates an [`Indexer`] and runs a full sweep.
///
/// # Errors
///
/// Returns an error if the indexer cannot be created or the sweep fails.
fn build_index(config: IndexConfig) -> color_eyre::Result<(Indexer, IndexSnapshot)> {
    info!(root = %config.project_root, "Indexing project");
    let indexer =
        Indexer::new(config).map_err(|e| color_eyre::eyre::eyre!("Failed to create indexer: {e}"))?;
    let snapshot = indexer.full_index()?;
    Ok((indexer, snapshot))
}

/// Loads path mappings from the `--mappings` file, if given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
fn load_mappings(cli: &Cli) -> color_eyre::Result<PathMappings> {
    let Some(path) = &cli.mappings else {
        return Ok(PathMappings::default());
    };
    let contents = std::fs::read_to_string(path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read mappings {path}: {e}"))?;
    serde_json::from_str(&contents)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to parse mappings {path}: {e}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a full index with summary output.
///
/// # Errors
///
/// Returns an error if indexing or snapshot writing fails.
fn run_index(
    config: IndexConfig,
    detailed: bool,
    output: Option<Utf8PathBuf>,
) -> color_eyre::Result<()> {
    let (indexer, snapshot) = build_index(config)?;

    print_stats_summary(&indexer.stats(), &snapshot);

    if detailed {
        print_selector_list(&indexer);
    }

    if let Some(output_path) = output {
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize snapshot: {e}"))?;
        std::fs::write(output_path.as_std_path(), content)?;
        info!(path = %output_path, "Snapshot written");
    }

    Ok(())
}

/// Looks up one selector and prints the result.
///
/// # Errors
///
/// Returns an error if indexing fails.
fn run_find(config: IndexConfig, selector: &str, all: bool) -> color_eyre::Result<()> {
    let (indexer, _) = build_index(config)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if all {
        let records = indexer.get_elements(selector);
        if records.is_empty() {
            let _ = writeln!(handle, "No entity declares '{selector}'");
            return Ok(());
        }
        let _ = writeln!(handle, "Candidates for '{selector}' ({}):", records.len());
        for record in &records {
            print_record(&mut handle, record);
        }
    } else if let Some(record) = indexer.get_element(selector) {
        print_record(&mut handle, &record);
    } else {
        let _ = writeln!(handle, "No entity declares '{selector}'");
    }

    Ok(())
}

/// Prefix-searches the index and prints matching selectors.
///
/// # Errors
///
/// Returns an error if indexing fails.
fn run_search(config: IndexConfig, prefix: &str) -> color_eyre::Result<()> {
    let (indexer, _) = build_index(config)?;
    let matches = indexer.search_with_selectors(prefix);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle, "Selectors matching '{prefix}' ({}):", matches.len());
    for entry in &matches {
        let _ = writeln!(
            handle,
            "  {:<32} {} ({})",
            entry.selector,
            entry.record.display_name,
            entry.record.kind.label()
        );
    }

    Ok(())
}

/// Resolves a file path to its import path through the alias mappings.
///
/// # Errors
///
/// Returns an error if the mappings file cannot be loaded.
fn run_resolve(
    cli: &Cli,
    config: &IndexConfig,
    target: &Utf8PathBuf,
    from: &Utf8PathBuf,
) -> color_eyre::Result<()> {
    let mappings = load_mappings(cli)?;
    let resolver = AliasResolver::new(&mappings);
    let resolved = resolver.resolve_import_path(target, from, &config.project_root);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{resolved}");

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints a summary of index statistics.
fn print_stats_summary(stats: &StatsSnapshot, snapshot: &IndexSnapshot) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Selector Index Summary");
    let _ = writeln!(handle, "======================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Files indexed:      {}", stats.files_indexed);
    let _ = writeln!(handle, "Entities indexed:   {}", stats.entities_indexed);
    let _ = writeln!(handle, "Selector variants:  {}", snapshot.selectors.len());
    let _ = writeln!(handle, "Errors:             {}", stats.errors);
}

/// Prints every indexed selector with its declaring entity.
fn print_selector_list(indexer: &Indexer) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let mut selectors = indexer.all_selectors();
    selectors.sort_unstable();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Indexed selectors ({}):", selectors.len());
    for selector in &selectors {
        let _ = writeln!(handle, "  {selector}");
    }
}

/// Prints one entity record.
fn print_record(handle: &mut impl Write, record: &ElementRecord) {
    let _ = writeln!(
        handle,
        "  {} ({})",
        record.display_name,
        record.kind.label()
    );
    let _ = writeln!(handle, "    selector: {}", record.original_selector);
    let _ = writeln!(handle, "    import:   {}", record.import_source);
    let _ = writeln!(handle, "    file:     {}", record.source_file);
    if record.is_standalone {
        let _ = writeln!(handle, "    standalone");
    }
    if let Some(module) = &record.exporting_module {
        let _ = writeln!(handle, "    module:   {module}");
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // Install color-eyre first, before any potential panics
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    match &cli.command {
        Commands::Index { detailed, output } => {
            let config = build_config(&cli)?;
            run_index(config, *detailed, output.clone())
        }
        Commands::Find { selector, all } => {
            let config = build_config(&cli)?;
            run_find(config, selector, *all)
        }
        Commands::Search { prefix } => {
            let config = build_config(&cli)?;
            run_search(config, prefix)
        }
        Commands::Resolve { target, from } => {
            let config = build_config(&cli)?;
            run_resolve(&cli, &config, target, from)
        }
    }
}
