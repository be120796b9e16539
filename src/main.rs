//! Command-line front end for the vocabulary store. It brings up the
//! database, seeds the sample deck when the store is empty, and runs one
//! command against it.
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;
use vocab_deck::{
    default_db_path, ImportOptions, ListFilters, Page, StatusFilter, VocabularyStore,
};

/// Overrides the database location.
const DB_PATH_ENV: &str = "VOCAB_DECK_DB";
/// Log filter directives, e.g. `debug` or `vocab_deck=debug`.
const LOG_ENV: &str = "VOCAB_DECK_LOG";

const USAGE: &str = "usage: vocab-deck [summary | seed | import <file.json> [--skip-duplicates] \
                     | list [letters] | flashcards [letters] | done | clear-done | years]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut store = open_store()?;
    store.initialize().context("failed to initialize database")?;

    if store.list(&ListFilters::default().limit(1))?.meta.grand_total == 0 {
        store.seed_samples().context("failed to seed sample vocabulary")?;
    }

    match args.first().map(String::as_str) {
        None | Some("summary") => print_summary(&store)?,
        Some("seed") => {
            let added = store.seed_samples()?;
            println!("Added {added} sample words.");
        }
        Some("import") => {
            let Some(path) = args.get(1) else {
                bail!("{USAGE}");
            };
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read import file {path}"))?;
            let options = ImportOptions {
                skip_duplicates: args.iter().any(|arg| arg == "--skip-duplicates"),
            };
            let report = store.import_json(&json, options)?;
            println!(
                "Imported {} entries ({} skipped, {} failed).",
                report.inserted, report.skipped, report.failed
            );
            for failure in &report.failures {
                println!("  item {}: {}", failure.index + 1, failure.reason);
            }
        }
        Some("list") => print_page(&store.list(&letter_filters(args.get(1)))?),
        Some("flashcards") => print_page(&store.list_flashcards(&letter_filters(args.get(1)))?),
        Some("done") => {
            for entry in store.done_list()? {
                println!("{:>5}  {}", entry.id, entry);
            }
        }
        Some("clear-done") => {
            let cleared = store.clear_done()?;
            println!("Removed {} entries from the done list.", cleared.deleted_count);
        }
        Some("years") => {
            let years: Vec<String> = store
                .distinct_years()?
                .into_iter()
                .map(|year| year.to_string())
                .collect();
            println!("{}", years.join(" "));
        }
        Some(_) => bail!("{USAGE}"),
    }

    store.close().context("failed to close database")?;
    Ok(())
}

fn open_store() -> Result<VocabularyStore> {
    let path = match env::var_os(DB_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => default_db_path()?,
    };
    VocabularyStore::open(&path)
        .with_context(|| format!("failed to open database at {}", path.display()))
}

fn letter_filters(letters: Option<&String>) -> ListFilters {
    let filters = ListFilters::default().limit(1000);
    match letters {
        Some(letters) => filters.sort_type(letters.as_str()),
        None => filters,
    }
}

fn print_summary(store: &VocabularyStore) -> Result<()> {
    let count = |status: StatusFilter| -> Result<u64> {
        let filters = ListFilters::default().status(status).limit(1);
        Ok(store.list(&filters)?.meta.total_items)
    };
    println!("Practice: {}", count(StatusFilter::PracticeOnly)?);
    println!("Done:     {}", count(StatusFilter::DoneOnly)?);
    println!("Total:    {}", count(StatusFilter::All)?);
    Ok(())
}

fn print_page(page: &Page) {
    for entry in &page.data {
        println!("{:>5}  [{}] {}", entry.id, entry.sort_type, entry);
    }
    println!("{} of {} entries", page.meta.total_items, page.meta.grand_total);
}
