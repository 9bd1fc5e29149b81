//! Card oracle: in-memory lookup index over the bulk catalogue.
//!
//! Printings are indexed by normalized name (lowercase, spaces replaced
//! with hyphens). Each key maps to every retained printing of that name,
//! in catalogue order. The index is rebuilt from the catalogue on each
//! load and never persisted.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{CollectionError, Result};
use crate::models::Card;
use crate::scryfall::{load_bulk, BulkEntry};

/// Set types accepted as a lookup filter
pub const ALLOWED_SET_TYPES: [&str; 5] =
    ["promo", "expansion", "memorabilia", "premium_deck", "funny"];

/// Index key: lowercase with spaces replaced by hyphens
fn index_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Query parameters for [`CardOracle::lookup`]
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    /// Card name to look up, case-insensitive. Affix `*` wildcards select
    /// the expanded matcher; a name consisting only of `*` counts as no name.
    pub name: Option<String>,
    /// Extend the search beyond exact name matches
    pub expand_search: bool,
    /// Restrict the expanded pool to double-faced cards ("Fire // Ice").
    /// Ignored unless `expand_search` is set.
    pub doubles_only: bool,
    /// Keep only the first printing per distinct card name
    pub unique: bool,
    /// Filter by set code; unknown codes fall back to prefix matching
    pub set_code: Option<String>,
    /// Filter by set type; must be one of [`ALLOWED_SET_TYPES`]
    pub set_type: Option<String>,
}

impl CardQuery {
    /// Query for a card by name
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_set_code(mut self, code: &str) -> Self {
        self.set_code = Some(code.to_string());
        self
    }

    pub fn with_set_type(mut self, set_type: &str) -> Self {
        self.set_type = Some(set_type.to_string());
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expand_search = true;
        self
    }

    pub fn doubles_only(mut self) -> Self {
        self.doubles_only = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Pattern matcher selected by the wildcard shape of the query name
enum NameMatcher {
    /// `*term*`: name starts or ends with the term
    Affix(String),
    /// `*term`: name ends with the term
    Suffix(String),
    /// `term*`: name starts with the term
    Prefix(String),
    /// No wildcard: every query token appears as a whole word in the name
    WholeWords(Vec<String>),
}

impl NameMatcher {
    /// Strips exactly one `*` per matched side; inner stars stay literal
    fn for_pattern(pattern: &str) -> Self {
        if pattern.len() > 1 && pattern.starts_with('*') && pattern.ends_with('*') {
            NameMatcher::Affix(pattern[1..pattern.len() - 1].to_lowercase())
        } else if let Some(term) = pattern.strip_prefix('*') {
            NameMatcher::Suffix(term.to_lowercase())
        } else if let Some(term) = pattern.strip_suffix('*') {
            NameMatcher::Prefix(term.to_lowercase())
        } else {
            NameMatcher::WholeWords(
                pattern
                    .to_lowercase()
                    .split_whitespace()
                    .map(String::from)
                    .collect(),
            )
        }
    }

    fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        match self {
            NameMatcher::Affix(term) => lower.starts_with(term) || lower.ends_with(term),
            NameMatcher::Suffix(term) => lower.ends_with(term),
            NameMatcher::Prefix(term) => lower.starts_with(term),
            NameMatcher::WholeWords(tokens) => {
                if tokens.is_empty() {
                    return false;
                }
                let words: Vec<&str> = lower.split_whitespace().collect();
                tokens.iter().all(|t| words.contains(&t.as_str()))
            }
        }
    }
}

/// The card lookup index
pub struct CardOracle {
    /// Retained printings in catalogue order
    cards: Vec<Card>,
    /// Normalized name to positions in `cards`
    by_name: HashMap<String, Vec<usize>>,
    /// Set code to full set name, extendable at runtime
    set_names: HashMap<String, String>,
}

impl CardOracle {
    /// Build the index from raw catalogue entries.
    ///
    /// Non-English printings are skipped, as are printings that only ever
    /// existed on Magic Online.
    pub fn from_entries(entries: Vec<BulkEntry>) -> Self {
        let mut cards: Vec<Card> = Vec::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();

        for entry in entries {
            if entry.lang != "en" {
                continue;
            }
            if entry.is_mtgo_only() {
                continue;
            }
            let card = Card {
                name: entry.name,
                lang: entry.lang,
                set_code: entry.set_code,
                set_name: entry.set_name,
                set_type: entry.set_type,
            };
            by_name.entry(index_key(&card.name)).or_default().push(cards.len());
            cards.push(card);
        }

        let mut set_names = HashMap::new();
        for card in &cards {
            set_names.insert(card.set_code.clone(), card.set_name.clone());
        }

        log::info!(
            "Indexed {} printings under {} card names ({} sets)",
            cards.len(),
            by_name.len(),
            set_names.len()
        );

        Self {
            cards,
            by_name,
            set_names,
        }
    }

    /// Build the index from the bulk file at `path`, downloading it first
    /// if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_entries(load_bulk(path)?))
    }

    /// Look up printings matching the query.
    ///
    /// Candidates are resolved in stages: exact name matches first, then
    /// (with `expand_search`) wildcard or whole-word matches appended over
    /// the full pool, then set-code and set-type filters, then uniqueness.
    /// Result order is catalogue order within each stage and the full
    /// candidate list is materialized before returning. No match at any
    /// stage is an empty result, not an error; the only error is a
    /// `set_type` outside [`ALLOWED_SET_TYPES`].
    pub fn lookup(&self, query: &CardQuery) -> Result<Vec<&Card>> {
        if let Some(set_type) = query.set_type.as_deref() {
            if !set_type.is_empty() && !ALLOWED_SET_TYPES.contains(&set_type) {
                return Err(CollectionError::UnknownSetType(set_type.to_string()));
            }
        }

        let name = query.name.as_deref().unwrap_or("");
        let has_name = name.chars().any(|c| c != '*');
        let has_set_code = query.set_code.is_some();
        let has_set_type = query.set_type.is_some();
        if !has_name && !has_set_code && !has_set_type {
            return Ok(Vec::new());
        }

        let mut entries: Vec<&Card> = if has_name {
            let exact: Vec<&Card> = self
                .by_name
                .get(&index_key(name))
                .map(|positions| positions.iter().map(|&i| &self.cards[i]).collect())
                .unwrap_or_default();

            if exact.is_empty() && !query.expand_search {
                return Ok(Vec::new());
            }

            if query.expand_search {
                let matcher = NameMatcher::for_pattern(name);
                let mut entries = exact;
                entries.extend(self.cards.iter().filter(|c| {
                    (!query.doubles_only || c.is_double_faced()) && matcher.matches(&c.name)
                }));
                entries
            } else {
                exact
            }
        } else {
            self.cards.iter().collect()
        };

        if let Some(code) = query.set_code.as_deref() {
            if self.set_names.contains_key(code) {
                entries.retain(|c| c.set_code == code);
            } else {
                entries.retain(|c| c.set_code.starts_with(code));
            }
            if entries.is_empty() {
                return Ok(Vec::new());
            }
        }

        if let Some(set_type) = query.set_type.as_deref() {
            entries.retain(|c| c.set_type == set_type);
        }

        if query.unique {
            let mut seen = HashSet::new();
            entries.retain(|c| seen.insert(c.name.as_str()));
        }

        Ok(entries)
    }

    /// True if at least one printing is indexed under the exact name
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&index_key(name))
    }

    /// All printings of the exact name, in catalogue order
    pub fn get(&self, name: &str) -> Vec<&Card> {
        self.by_name
            .get(&index_key(name))
            .map(|positions| positions.iter().map(|&i| &self.cards[i]).collect())
            .unwrap_or_default()
    }

    /// Iterate over every indexed printing in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Total number of indexed printings
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Full set name for a code, if the catalogue or a manual addition knows it
    pub fn set_name_of(&self, code: &str) -> Option<&str> {
        self.set_names.get(code).map(String::as_str)
    }

    /// Set code to full set name, for every retained printing plus manual additions
    pub fn expansion_names(&self) -> &HashMap<String, String> {
        &self.set_names
    }

    /// Register a code/name pair absent from the catalogue, such as codes
    /// that only appear in collection files. Known codes filter by exact
    /// equality in [`Self::lookup`]; unknown codes fall back to prefix
    /// matching.
    pub fn add_expansion_code(&mut self, code: &str, name: &str) {
        self.set_names.insert(code.to_string(), name.to_string());
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;
