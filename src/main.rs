//! eixdb CLI - Command-line tool for inspecting eix cache files.
//!
//! This is the main entry point for the eixdb command-line application.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use tracing_subscriber::EnvFilter;

use eixdb::prelude::*;

/// Default location of the cache written by `eix-update`.
const DEFAULT_CACHE: &str = "/var/cache/eix/portage.eix";

/// eixdb - eix package-index cache inspector
#[derive(Parser)]
#[command(name = "eixdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the eix cache file
    #[arg(short, long, global = true, env = "EIX_CACHE", default_value = DEFAULT_CACHE)]
    cache: PathBuf,

    /// Log decoder activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cache header: format version, overlays, and table sizes
    Header,

    /// List packages in the cache
    List {
        /// Filter pattern for `category/name` (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Show versions of each package
        #[arg(long)]
        versions: bool,
    },

    /// Search package names and descriptions
    Search {
        /// Case-insensitive substring to look for
        pattern: String,
    },

    /// Show all details of one package
    Show {
        /// Package as `category/name`
        atom: String,
    },

    /// Export the decoded cache as JSON
    Export {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Header => cmd_header(&cli.cache)?,
        Commands::List { filter, versions } => cmd_list(&cli.cache, filter.as_deref(), versions)?,
        Commands::Search { pattern } => cmd_search(&cli.cache, &pattern)?,
        Commands::Show { atom } => cmd_show(&cli.cache, &atom)?,
        Commands::Export { output } => cmd_export(&cli.cache, &output)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "eixdb=debug,eixdb_format=debug" } else { "eixdb=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cache: &Path) -> Result<EixDatabase> {
    let start = Instant::now();
    let db = EixDatabase::open(cache)
        .with_context(|| format!("Failed to decode eix cache {}", cache.display()))?;
    tracing::info!(
        packages = db.package_count(),
        elapsed = ?start.elapsed(),
        "Loaded cache"
    );
    Ok(db)
}

fn cmd_header(cache: &Path) -> Result<()> {
    let header = EixDatabase::read_header(cache)
        .with_context(|| format!("Failed to read header of {}", cache.display()))?;

    println!("Format version: {}", header.file_format_version);
    println!("Categories:     {}", header.no_categories);
    println!("Dependencies:   {}", if header.dependencies_stored { "stored" } else { "not stored" });
    println!("REQUIRED_USE:   {}", if header.required_use_stored { "stored" } else { "not stored" });

    println!("\nOverlays:");
    for (i, overlay) in header.overlays.iter().enumerate() {
        println!("  [{}] {} ({})", i, overlay.label, overlay.path);
    }

    println!("\nTables:");
    for kind in [
        HashKind::Eapi,
        HashKind::Licenses,
        HashKind::Keywords,
        HashKind::UseFlags,
        HashKind::Slots,
        HashKind::WorldSets,
        HashKind::Depend,
    ] {
        println!("  {:<12} {:>8}", kind.name(), header.table(kind).len());
    }

    Ok(())
}

fn cmd_list(cache: &Path, filter: Option<&str>, versions: bool) -> Result<()> {
    let filter = filter.map(AtomFilter::new).transpose()?;
    let db = load(cache)?;
    let header = db.header();

    let mut count = 0;
    for (category, package) in db.packages() {
        let atom = format!("{}/{}", category.name, package.name);
        if let Some(filter) = &filter {
            if !filter.matches(&atom) {
                continue;
            }
        }

        println!("{}", atom);
        if versions {
            for version in &package.versions {
                println!("    {}", version_line(header, version));
            }
        }
        count += 1;
    }

    println!("\nTotal: {} packages", count);

    Ok(())
}

fn cmd_search(cache: &Path, pattern: &str) -> Result<()> {
    let db = load(cache)?;

    let mut count = 0;
    for (category, package) in db.search(pattern) {
        println!("{}/{}", category.name, package.name);
        println!("    {}", package.description);
        count += 1;
    }

    println!("\nFound {} matches", count);

    Ok(())
}

fn cmd_show(cache: &Path, atom: &str) -> Result<()> {
    let db = load(cache)?;
    let header = db.header();

    let Some(package) = db.find(atom) else {
        anyhow::bail!("Package {} not found in {}", atom, cache.display());
    };

    println!("{}", atom);
    println!("  Description: {}", package.description);
    println!("  Homepage:    {}", package.homepage);
    println!("  License:     {}", package.license(header).unwrap_or_default());

    for version in &package.versions {
        println!("\n  {}", version_line(header, version));
        println!("    EAPI:         {}", version.eapi(header).unwrap_or_default());
        println!("    Keywords:     {}", version.keywords);
        println!("    USE:          {}", version.use_flags);
        if header.required_use_stored {
            println!("    REQUIRED_USE: {}", version.required_use);
        }
        println!(
            "    Flags:        mask={:#x} properties={:#x} restrict={:#x}",
            version.mask, version.properties, version.restrict
        );
        if let Some(deps) = &version.dependencies {
            println!("    DEPEND:       {}", deps.depend);
            println!("    RDEPEND:      {}", deps.rdepend);
            println!("    PDEPEND:      {}", deps.pdepend);
            println!("    HDEPEND:      {}", deps.hdepend);
        }
    }

    Ok(())
}

fn cmd_export(cache: &Path, output: &Path) -> Result<()> {
    println!("Exporting: {} -> {}", cache.display(), output.display());

    let db = load(cache)?;
    let file = File::create(output).context("Failed to create output file")?;
    db.write_json(BufWriter::new(file))
        .context("Failed to write JSON")?;

    println!(
        "Exported {} categories, {} packages",
        db.categories().len(),
        db.package_count()
    );

    Ok(())
}

/// One-line summary of a version: parts, slot, and overlay path.
fn version_line(header: &Header, version: &Version) -> String {
    let parts: Vec<String> = version.parts.iter().map(ToString::to_string).collect();
    format!(
        "[{}] slot {} ::{}",
        parts.join(" "),
        version.slot_name(header).unwrap_or_default(),
        version.overlay(header).map(|o| o.path.as_str()).unwrap_or_default()
    )
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// `--filter` for `category/name`: a glob when the pattern has wildcards,
/// otherwise a case-insensitive substring.
enum AtomFilter {
    Glob(Pattern),
    Substring(String),
}

impl AtomFilter {
    fn new(pattern: &str) -> Result<Self> {
        if pattern.contains(['*', '?', '[']) {
            let glob = Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?;
            Ok(Self::Glob(glob))
        } else {
            Ok(Self::Substring(pattern.to_lowercase()))
        }
    }

    fn matches(&self, atom: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.matches_with(atom, MATCH_OPTIONS),
            Self::Substring(needle) => atom.to_lowercase().contains(needle.as_str()),
        }
    }
}
