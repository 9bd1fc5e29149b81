//! Scryfall bulk catalogue download and parsing
//!
//! The "Default Cards" bulk export is a single JSON array with one object
//! per printing, weighing in at over a gigabyte. Only the handful of fields
//! the oracle needs are deserialized; serde skips the rest.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CollectionError, Result};

/// Scryfall "Default Cards" bulk data download URL
pub const DEFAULT_CARDS_URL: &str =
    "https://data.scryfall.io/default-cards/default-cards.json";

/// One printing as it appears in the bulk catalogue
#[derive(Debug, Deserialize, Clone)]
pub struct BulkEntry {
    pub name: String,
    pub lang: String,
    #[serde(rename = "set")]
    pub set_code: String,
    pub set_name: String,
    pub set_type: String,
    /// Platforms the printing is available on ("paper", "mtgo", "arena")
    #[serde(default)]
    pub games: Vec<String>,
}

impl BulkEntry {
    /// True for printings that only ever existed on Magic Online
    pub fn is_mtgo_only(&self) -> bool {
        self.games.len() == 1 && self.games[0] == "mtgo"
    }
}

/// Default location of the downloaded bulk file
pub fn default_bulk_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mtg_collection")
        .join("default_cards.json")
}

/// Download the bulk catalogue from Scryfall into `path`
pub fn download_bulk(path: &Path) -> Result<u64> {
    download_bulk_from(DEFAULT_CARDS_URL, path)
}

/// Downloads the bulk catalogue from the given URL (for testing with mock servers).
pub(crate) fn download_bulk_from(url: &str, path: &Path) -> Result<u64> {
    log::info!("Downloading bulk card data from: {}", url);

    // The bulk file is large; the default 30s request timeout would cut it off
    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()?;

    let mut response = client
        .get(url)
        .header("User-Agent", "MtgCollection/1.0")
        .send()?;

    if !response.status().is_success() {
        return Err(CollectionError::HttpStatus(response.status()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let written = std::io::copy(&mut response, &mut file)?;

    log::info!("Saved {} bytes to {}", written, path.display());

    Ok(written)
}

/// Parse a previously downloaded bulk file
pub fn read_bulk_file(path: &Path) -> Result<Vec<BulkEntry>> {
    log::info!("Reading bulk card data from: {}", path.display());

    let file = File::open(path)?;
    let entries: Vec<BulkEntry> = serde_json::from_reader(BufReader::new(file))?;

    log::info!("Parsed {} catalogue entries", entries.len());

    Ok(entries)
}

/// Read the bulk file at `path`, downloading it first if it does not exist
pub fn load_bulk(path: &Path) -> Result<Vec<BulkEntry>> {
    load_bulk_from(DEFAULT_CARDS_URL, path)
}

/// Loads the bulk catalogue, fetching from the given URL when the file is
/// missing (for testing with mock servers).
pub(crate) fn load_bulk_from(url: &str, path: &Path) -> Result<Vec<BulkEntry>> {
    if !path.exists() {
        log::info!("Bulk file {} not found, downloading", path.display());
        download_bulk_from(url, path)?;
    }
    read_bulk_file(path)
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
