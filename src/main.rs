//! MTG Collection - card collection tracker
//!
//! Looks up cards in the Scryfall bulk database and diffs collection
//! CSV exports against each other.

use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use mtg_collection::{default_bulk_path, download_bulk, CardOracle, CardQuery, Collection};

#[derive(Parser)]
#[command(name = "mtg_collection")]
#[command(version, about = "MTG collection tracker backed by the Scryfall bulk card database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up printings of a card in the oracle
    Lookup {
        /// Card name; affix * wildcards widen the search (e.g. "*bolt", "fire*")
        name: String,

        /// Extend the search beyond exact name matches
        #[arg(long)]
        expand: bool,

        /// Restrict expanded matches to double-faced cards
        #[arg(long)]
        doubles_only: bool,

        /// Show only the first printing per card name
        #[arg(long)]
        unique: bool,

        /// Filter by set code (e.g. mir); unknown codes match as a prefix
        #[arg(long)]
        set_code: Option<String>,

        /// Filter by set type (promo, expansion, memorabilia, premium_deck, funny)
        #[arg(long)]
        set_type: Option<String>,

        /// Path to the bulk card file
        #[arg(long, default_value_t = default_bulk_file())]
        bulk_file: String,
    },

    /// Show rows of one collection that are missing from another
    Diff {
        /// Reference collection CSV
        old: String,

        /// Collection CSV to compare against
        new: String,
    },

    /// Download the bulk card database
    Fetch {
        /// Path to write the bulk card file
        #[arg(long, default_value_t = default_bulk_file())]
        bulk_file: String,

        /// Re-download even if the file already exists
        #[arg(long)]
        force: bool,
    },
}

/// Returns the default bulk file path as a displayable string
fn default_bulk_file() -> String {
    default_bulk_path().to_string_lossy().to_string()
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup {
            name,
            expand,
            doubles_only,
            unique,
            set_code,
            set_type,
            bulk_file,
        } => {
            let query = CardQuery {
                name: Some(name),
                expand_search: expand,
                doubles_only,
                unique,
                set_code,
                set_type,
            };
            run_lookup(&query, Path::new(&bulk_file));
        }
        Commands::Diff { old, new } => run_diff(Path::new(&old), Path::new(&new)),
        Commands::Fetch { bulk_file, force } => run_fetch(Path::new(&bulk_file), force),
    }
}

fn run_lookup(query: &CardQuery, bulk_file: &Path) {
    let oracle = load_oracle(bulk_file);

    let cards = match oracle.lookup(query) {
        Ok(cards) => cards,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if cards.is_empty() {
        println!("No printings found");
        return;
    }

    println!("{} printing(s):", cards.len());
    for card in &cards {
        println!(
            "  {} [{}] {} ({})",
            card.name, card.set_code, card.set_name, card.set_type
        );
    }
}

fn run_diff(old: &Path, new: &Path) {
    let left = open_collection(old);
    let right = open_collection(new);

    let missing = match left.diff(&right) {
        Ok(missing) => missing,
        Err(e) => {
            log::error!("Cannot diff collections: {}", e);
            std::process::exit(1);
        }
    };

    if missing.is_empty() {
        println!(
            "No differences: every row of {} is present in {}",
            left.name(),
            right.name()
        );
        return;
    }

    println!(
        "{} row(s) of {} missing from {}:",
        missing.len(),
        left.name(),
        right.name()
    );
    for card in &missing {
        let foil = if card.foil { " foil" } else { "" };
        println!(
            "  {}x {} [{}]{} {} {}",
            card.quantity,
            card.name,
            card.expansion_code,
            foil,
            card.condition.as_str(),
            card.language.as_str()
        );
    }
}

fn run_fetch(bulk_file: &Path, force: bool) {
    if bulk_file.exists() && !force {
        log::info!(
            "Bulk file {} already exists, use --force to re-download",
            bulk_file.display()
        );
        return;
    }

    let pb = spinner("Downloading card database...");
    match download_bulk(bulk_file) {
        Ok(written) => {
            pb.finish_and_clear();
            log::info!("Downloaded {} bytes to {}", written, bulk_file.display());
        }
        Err(e) => {
            pb.finish_and_clear();
            log::error!("Failed to download bulk data: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_oracle(bulk_file: &Path) -> CardOracle {
    let pb = spinner("Loading card database...");
    match CardOracle::load(bulk_file) {
        Ok(oracle) => {
            pb.finish_and_clear();
            oracle
        }
        Err(e) => {
            pb.finish_and_clear();
            log::error!("Failed to load card database: {}", e);
            std::process::exit(1);
        }
    }
}

fn open_collection(path: &Path) -> Collection {
    match Collection::open(path) {
        Ok(collection) => collection,
        Err(e) => {
            log::error!("Failed to open collection {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(msg.to_string());
    pb
}
