//! Card Catalog - command line entrypoint.
//!
//! Loads configuration, initializes logging, fills a card store from the
//! given CSV and JSON files, then runs one query or maintenance command.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use card_catalog_lib::config::{CatalogConfig, ConfigLoader, LogConfig, Validate, ENV_PREFIX};
use card_catalog_lib::data_structures::{Card, RatingThreshold};
use card_catalog_lib::error::{report_error, CatalogError, CatalogResult, ErrorContext};
use card_catalog_lib::ingest::{self, CsvCardSource, IngestReport, JsonCardSource};
use card_catalog_lib::store::CardStore;
use clap::{Parser, Subcommand};
use prettytable::{row, Table};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the card catalog.
#[derive(Parser, Debug)]
#[command(name = "card_catalog", version, about)]
struct Args {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV card file to load (repeatable)
    #[arg(long)]
    csv: Vec<PathBuf>,

    /// JSON card page to load (repeatable)
    #[arg(long)]
    json: Vec<PathBuf>,

    /// Stop loading after this many cards
    #[arg(long)]
    limit: Option<usize>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Show hash table and tree metrics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all cards in id order
    List,

    /// Print the ordered index sideways
    Tree,

    /// Show the best-rated cards
    Top {
        /// Number of cards (defaults to store.top_k)
        #[arg(short)]
        k: Option<usize>,
    },

    /// Look up a card by id
    Find {
        /// Card id
        id: String,
    },

    /// Find cards whose name contains the text (case-sensitive)
    Search {
        /// Text to look for
        text: String,
    },

    /// List cards rated within an inclusive range
    Range {
        /// Lowest rating
        min: f64,
        /// Highest rating
        max: f64,
    },

    /// Print a rating tree of the cards above or below a threshold
    Snapshot {
        /// Keep cards rated strictly above this value
        #[arg(long, conflicts_with = "below", required_unless_present = "below")]
        above: Option<f64>,

        /// Keep cards rated strictly below this value
        #[arg(long)]
        below: Option<f64>,
    },

    /// Add one card, optionally writing the catalog to a file
    Add {
        /// Card id
        id: String,

        /// Card name
        name: String,

        /// Attack power
        #[arg(long, allow_hyphen_values = true)]
        power: i32,

        /// Resistance
        #[arg(long, allow_hyphen_values = true)]
        resistance: i32,

        /// Rating, within the configured bounds
        #[arg(long)]
        rating: f64,

        /// Tags joined by the configured tag delimiter (defaults to the configured tags)
        #[arg(long)]
        tags: Option<String>,

        /// Where to export the catalog after adding
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove cards, optionally writing the remaining catalog to a file
    Remove {
        /// Ids to remove
        #[arg(required = true)]
        ids: Vec<String>,

        /// Where to export the remaining cards
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the catalog as CSV
    Export {
        /// Path to output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate the configuration and the loaded catalog
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Initialize the logging system. Log output goes to stderr.
fn init_logging(log: &LogConfig) -> CatalogResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| {
        CatalogError::Custom(format!("Failed to set global tracing subscriber: {e}"))
    })
}

fn card_table<'a, I>(cards: I) -> Table
where
    I: IntoIterator<Item = &'a Arc<Card>>,
{
    let mut table = Table::new();
    table.set_titles(row!["ID", "Name", "Power", "Resistance", "Rating", "Tags"]);
    for card in cards {
        table.add_row(row![
            card.id,
            card.name,
            r->card.power,
            r->card.resistance,
            r->format!("{:.1}", card.rating),
            card.tags.join(", ")
        ]);
    }
    table
}

fn print_cards<'a, I>(cards: I)
where
    I: IntoIterator<Item = &'a Arc<Card>>,
{
    let cards: Vec<_> = cards.into_iter().collect();
    if cards.is_empty() {
        println!("No cards.");
    } else {
        card_table(cards).printstd();
    }
}

/// Fills a store from every file named on the command line.
fn load_store(args: &Args, config: &CatalogConfig) -> CatalogResult<CardStore> {
    let mut store = CardStore::with_config(&config.store);
    let mut total = IngestReport::default();
    let remaining =
        |total: &IngestReport| args.limit.map(|limit| limit.saturating_sub(total.added));

    for path in &args.csv {
        let started = Instant::now();
        let mut source = CsvCardSource::from_path(path, &config.ingest)?;
        let report = ingest::ingest(&mut store, &mut source, remaining(&total))?;
        info!(
            path = %path.display(),
            added = report.added,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded CSV file"
        );
        total.merge(report);
    }

    for path in &args.json {
        let started = Instant::now();
        let mut source = JsonCardSource::from_path(path, &config.ingest)?;
        let report = ingest::ingest(&mut store, &mut source, remaining(&total))?;
        info!(
            path = %path.display(),
            added = report.added,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded JSON file"
        );
        total.merge(report);
    }

    info!(
        cards = store.len(),
        duplicates = total.duplicates,
        rejected = total.rejected,
        "catalog loaded"
    );
    Ok(store)
}

fn export_to(store: &CardStore, path: &Path, config: &CatalogConfig) -> CatalogResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    let written = ingest::export_csv(store, file, &config.ingest)?;
    info!(path = %path.display(), written, "catalog exported");
    Ok(())
}

/// Adds `card`, reporting a duplicate id instead of failing.
///
/// Returns whether the card was stored.
fn add_card(store: &mut CardStore, card: Card) -> bool {
    let label = format!("{} ({})", card.name, card.id);
    match store.add(card) {
        Ok(()) => {
            println!("Added {label}");
            true
        }
        Err(e) => {
            report_error(ErrorContext::new(e, "cli").with_details("add"));
            false
        }
    }
}

fn run(args: Args, config: CatalogConfig) -> CatalogResult<()> {
    if let Command::GenConfig { output } = &args.command {
        info!("Generating default configuration");
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(&CatalogConfig::default())
            .map_err(|e| CatalogError::Custom(format!("Failed to serialize config: {e}")))?;
        fs::write(output, toml)?;
        info!("Default configuration written to {:?}", output);
        return Ok(());
    }

    let mut store = load_store(&args, &config)?;

    match args.command {
        Command::Stats { json } => {
            let stats = store.statistics();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{stats}");
            }
        }
        Command::List => print_cards(store.iter_by_id()),
        Command::Tree => print!("{}", store.render_tree()),
        Command::Top { k } => {
            print_cards(&store.top_by_rating(k.unwrap_or(config.store.top_k)));
        }
        Command::Find { id } => match store.find_by_id(&id) {
            Some(card) => print_cards([card]),
            None => println!("No card with id '{id}'."),
        },
        Command::Search { text } => print_cards(&store.find_by_name_substring(&text)),
        Command::Range { min, max } => print_cards(&store.find_by_rating_range(min, max)),
        Command::Snapshot { above, below } => {
            let threshold = match (above, below) {
                (Some(value), _) => RatingThreshold::Above(value),
                (None, Some(value)) => RatingThreshold::Below(value),
                (None, None) => {
                    return Err(CatalogError::Custom(
                        "one of --above or --below is required".to_string(),
                    ))
                }
            };
            let tree = store.rating_snapshot(threshold);
            println!("{} card(s) rated {}", tree.len(), tree.threshold());
            print!("{}", tree.render());
        }
        Command::Add {
            id,
            name,
            power,
            resistance,
            rating,
            tags,
            output,
        } => {
            let card = ingest::manual_card(
                id,
                name,
                power,
                resistance,
                rating,
                tags.as_deref(),
                &config.ingest,
            )?;
            add_card(&mut store, card);
            if let Some(output) = output {
                export_to(&store, &output, &config)?;
            }
        }
        Command::Remove { ids, output } => {
            for id in &ids {
                match store.remove(id) {
                    Ok(card) => println!("Removed {} ({})", card.name, card.id),
                    Err(e) => report_error(ErrorContext::new(e, "cli").with_details("remove")),
                }
            }
            if let Some(output) = output {
                export_to(&store, &output, &config)?;
            }
        }
        Command::Export { output } => export_to(&store, &output, &config)?,
        Command::Validate => {
            config.validate()?;
            store.verify_consistency()?;
            println!("Configuration and catalog of {} card(s) are valid.", store.len());
        }
        Command::GenConfig { .. } => {}
    }

    Ok(())
}

/// Main entry point for the application.
fn main() -> CatalogResult<()> {
    let args = Args::parse();

    let loaded = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX).load();
    let log = loaded.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    init_logging(&log)?;
    card_catalog_lib::init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    run(args, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_catalog_lib::config::IngestConfig;

    #[test]
    fn test_add_command_parses() {
        let args = Args::try_parse_from([
            "card_catalog",
            "--csv",
            "cards.csv",
            "add",
            "base1-10",
            "Mewtwo",
            "--power",
            "120",
            "--resistance",
            "-20",
            "--rating",
            "9.5",
            "--tags",
            "Psychic|Legend",
            "-o",
            "out.csv",
        ])
        .unwrap();

        match args.command {
            Command::Add {
                id,
                power,
                resistance,
                rating,
                tags,
                output,
                ..
            } => {
                assert_eq!(id, "base1-10");
                assert_eq!(power, 120);
                assert_eq!(resistance, -20);
                assert_eq!(rating, 9.5);
                assert_eq!(tags.as_deref(), Some("Psychic|Legend"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_add_command_requires_every_stat() {
        assert!(Args::try_parse_from(["card_catalog", "add", "x", "Mew", "--power", "1"]).is_err());
    }

    #[test]
    fn test_load_store_reads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("cards.csv");
        let json = dir.path().join("page.json");
        std::fs::write(
            &csv,
            "id,name,power,resistance,rating,tags\na1,Abra,20,10,4,Psychic\na2,Kadabra,40,20,6,\n",
        )
        .unwrap();
        std::fs::write(&json, r#"{"data":[{"id":"a3","name":"Alakazam","rating":8.5}]}"#).unwrap();

        let args = Args::try_parse_from([
            "card_catalog",
            "--csv",
            csv.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
            "list",
        ])
        .unwrap();
        let store = load_store(&args, &CatalogConfig::default()).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.find_by_id("a2").is_some_and(|c| c.tags.is_empty()));
        assert_eq!(store.find_by_id("a3").map(|c| c.rating), Some(8.5));
    }

    #[test]
    fn test_add_card_reports_duplicates() {
        let config = IngestConfig::default();
        let mut store = CardStore::new();
        let card = |name: &str| {
            ingest::manual_card("base1-10", name, 120, 20, 9.5, None, &config).unwrap()
        };

        assert!(add_card(&mut store, card("Mewtwo")));
        assert!(!add_card(&mut store, card("Mewtwo again")));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_by_id("base1-10").map(|c| c.name.as_str()),
            Some("Mewtwo")
        );
    }
}
