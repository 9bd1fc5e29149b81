//! MTG Collection - card collection tracker
//!
//! Tracks personal card collections against the Scryfall bulk card
//! database. The oracle indexes every English paper printing by
//! normalized name and answers exact, wildcard and set-scoped lookups;
//! collection CSV files are normalized on read and can be diffed
//! against each other.

pub mod collection;
pub mod error;
pub mod models;
pub mod oracle;
pub mod scryfall;

// Re-export commonly used items
pub use collection::{Collection, EIGHT_COLUMN_LAYOUT, NINE_COLUMN_LAYOUT};
pub use error::{CollectionError, Result};
pub use models::{Card, CollectionCard, Condition, Language};
pub use oracle::{CardOracle, CardQuery, ALLOWED_SET_TYPES};
pub use scryfall::{default_bulk_path, download_bulk, load_bulk, BulkEntry, DEFAULT_CARDS_URL};
