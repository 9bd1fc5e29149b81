//! Collection files: reading, diffing and writing card collections.
//!
//! A collection is a CSV export with one row per owned card, in either an
//! eight-column layout or a nine-column layout that adds the expansion
//! name. Legacy MTG Manager exports are detected by their "Code" header
//! and normalized on read (lowercase set codes, numeric condition and
//! language scales translated to labels). After normalization, columns
//! are positional; header names beyond the legacy marker do not matter.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{CollectionError, Result};
use crate::models::{CollectionCard, Condition, Language};

pub const EIGHT_COLUMN_LAYOUT: [&str; 8] = [
    "Quantity",
    "Name",
    "ExpansionCode",
    "PurchasePrice",
    "Foil",
    "Condition",
    "Language",
    "PurchaseDate",
];

pub const NINE_COLUMN_LAYOUT: [&str; 9] = [
    "Quantity",
    "Name",
    "ExpansionCode",
    "ExpansionName",
    "PurchasePrice",
    "Foil",
    "Condition",
    "Language",
    "PurchaseDate",
];

/// A collection of cards read from a CSV file
#[derive(Debug)]
pub struct Collection {
    label: String,
    source: String,
    path: PathBuf,
    cards: Vec<CollectionCard>,
    has_expansion_names: bool,
}

impl Collection {
    /// Open a collection file, deriving label and source from its path
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, None, None)
    }

    /// Open a collection file with an explicit label and source.
    ///
    /// `label` defaults to the file stem and `source` to the parent folder
    /// name, with underscores and hyphens read as spaces.
    pub fn open_with(path: &Path, label: Option<&str>, source: Option<&str>) -> Result<Self> {
        let (cards, has_expansion_names) = read_cards(path)?;

        let label = label
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| label_from(path));
        let source = source
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| path.parent().map(label_from).unwrap_or_default());

        log::debug!("Opened collection {}/{} with {} rows", source, label, cards.len());

        Ok(Self {
            label,
            source,
            path: path.to_path_buf(),
            cards,
            has_expansion_names,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Qualified collection name, "source/label"
    pub fn name(&self) -> String {
        format!("{}/{}", self.source, self.label)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cards(&self) -> &[CollectionCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut Vec<CollectionCard> {
        &mut self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionCard> {
        self.cards.iter()
    }

    /// Number of rows in the collection
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Total number of cards, summing row quantities
    pub fn total_quantity(&self) -> u64 {
        self.cards.iter().map(|c| c.quantity as u64).sum()
    }

    /// True for nine-column collections carrying expansion names
    pub fn has_expansion_names(&self) -> bool {
        self.has_expansion_names
    }

    /// Distinct (code, name) expansion pairs appearing in the collection.
    /// Empty for eight-column collections. Feed these to the oracle to
    /// register codes the catalogue does not know.
    pub fn expansion_pairs(&self) -> Vec<(String, String)> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for card in &self.cards {
            if let Some(name) = &card.expansion_name {
                let pair = (card.expansion_code.clone(), name.clone());
                if seen.insert(pair.clone()) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    /// Rows of this collection that are absent from `other`.
    ///
    /// Both collections must carry the same label and the same column
    /// layout. Purchase dates are not compared and are cleared in the
    /// result; names are compared and returned lowercased.
    pub fn diff(&self, other: &Collection) -> Result<Vec<CollectionCard>> {
        if self.label != other.label {
            return Err(CollectionError::LabelMismatch {
                left: self.label.clone(),
                right: other.label.clone(),
            });
        }
        if self.has_expansion_names != other.has_expansion_names {
            return Err(CollectionError::LayoutMismatch {
                left: self.column_count(),
                right: other.column_count(),
            });
        }

        let right: HashSet<DiffKey> = other.cards.iter().map(diff_key).collect();

        let mut missing = Vec::new();
        for card in &self.cards {
            if !right.contains(&diff_key(card)) {
                let mut row = card.clone();
                row.name = row.name.to_lowercase();
                row.purchase_date = None;
                missing.push(row);
            }
        }
        Ok(missing)
    }

    /// Write the collection back to disk in its canonical layout.
    ///
    /// With no target the original file is overwritten. A relative target
    /// folder is resolved against the collection's own directory; missing
    /// folders are created. Returns the path written.
    pub fn save(&self, target_folder: Option<&Path>) -> Result<PathBuf> {
        let filepath = match target_folder {
            None => self.path.clone(),
            Some(folder) => {
                let folder = if folder.is_absolute() {
                    folder.to_path_buf()
                } else {
                    self.path
                        .parent()
                        .unwrap_or_else(|| Path::new(""))
                        .join(folder)
                };
                fs::create_dir_all(&folder)?;
                folder.join(self.path.file_name().unwrap_or_default())
            }
        };

        let mut writer = csv::Writer::from_path(&filepath)?;
        if self.has_expansion_names {
            writer.write_record(NINE_COLUMN_LAYOUT)?;
        } else {
            writer.write_record(EIGHT_COLUMN_LAYOUT)?;
        }
        for card in &self.cards {
            writer.write_record(self.card_record(card))?;
        }
        writer.flush()?;

        log::info!("{} saved in {}", self.name(), filepath.display());

        Ok(filepath)
    }

    fn column_count(&self) -> usize {
        if self.has_expansion_names {
            9
        } else {
            8
        }
    }

    fn card_record(&self, card: &CollectionCard) -> Vec<String> {
        let mut fields = vec![
            card.quantity.to_string(),
            card.name.clone(),
            card.expansion_code.clone(),
        ];
        if self.has_expansion_names {
            fields.push(card.expansion_name.clone().unwrap_or_default());
        }
        fields.push(card.purchase_price.to_string());
        fields.push(card.foil.to_string());
        fields.push(card.condition.as_str().to_string());
        fields.push(card.language.as_str().to_string());
        fields.push(
            card.purchase_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        );
        fields
    }
}

/// Row identity for diffing: every column except the purchase date,
/// with the name lowercased. Prices are compared bit-exact; both sides
/// come from the same parser.
type DiffKey = (u32, String, String, Option<String>, u64, bool, Condition, Language);

fn diff_key(card: &CollectionCard) -> DiffKey {
    (
        card.quantity,
        card.name.to_lowercase(),
        card.expansion_code.clone(),
        card.expansion_name.clone(),
        card.purchase_price.to_bits(),
        card.foil,
        card.condition,
        card.language,
    )
}

/// File stem with underscores and hyphens read as spaces
fn label_from(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .trim()
        .replace(['_', '-'], " ")
}

fn read_cards(path: &Path) -> Result<(Vec<CollectionCard>, bool)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.len() != 8 && headers.len() != 9 {
        return Err(invalid_row(
            1,
            format!("expected 8 or 9 columns, found {}", headers.len()),
        ));
    }
    let legacy = headers.iter().any(|h| h == "Code");
    let has_expansion_names = headers.len() == 9;

    let mut cards = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        cards.push(parse_record(&record, line, legacy, has_expansion_names)?);
    }

    Ok((cards, has_expansion_names))
}

fn parse_record(
    record: &csv::StringRecord,
    line: u64,
    legacy: bool,
    has_expansion_names: bool,
) -> Result<CollectionCard> {
    let expected = if has_expansion_names { 9 } else { 8 };
    if record.len() != expected {
        return Err(invalid_row(
            line,
            format!("expected {} columns, found {}", expected, record.len()),
        ));
    }
    // Columns are positional: Quantity, Name, ExpansionCode,
    // [ExpansionName,] PurchasePrice, Foil, Condition, Language, PurchaseDate
    let offset = if has_expansion_names { 1 } else { 0 };
    let field = |i: usize| record.get(i).unwrap_or("");

    let quantity = field(0)
        .parse::<u32>()
        .map_err(|_| invalid_row(line, format!("invalid quantity '{}'", field(0))))?;

    let name = field(1).to_string();
    if name.is_empty() {
        return Err(invalid_row(line, "empty card name".to_string()));
    }

    let expansion_code = if legacy {
        field(2).to_lowercase()
    } else {
        field(2).to_string()
    };

    let expansion_name = if has_expansion_names {
        let value = field(3);
        (!value.is_empty()).then(|| value.to_string())
    } else {
        None
    };

    let raw_price = field(3 + offset);
    let purchase_price = if raw_price.is_empty() {
        0.0
    } else {
        raw_price
            .parse::<f64>()
            .map_err(|_| invalid_row(line, format!("invalid purchase price '{}'", raw_price)))?
    };

    let foil = match field(4 + offset).to_lowercase().as_str() {
        "1" | "true" => true,
        "0" | "false" => false,
        other => return Err(invalid_row(line, format!("invalid foil value '{}'", other))),
    };

    let raw_condition = field(5 + offset);
    let condition = if legacy {
        raw_condition
            .parse::<u8>()
            .ok()
            .and_then(Condition::from_legacy_code)
    } else {
        Condition::parse(raw_condition)
    }
    .ok_or_else(|| invalid_row(line, format!("invalid condition '{}'", raw_condition)))?;

    let raw_language = field(6 + offset);
    let language = if legacy {
        raw_language
            .parse::<u8>()
            .ok()
            .and_then(Language::from_legacy_code)
    } else {
        Language::parse(raw_language)
    }
    .ok_or_else(|| invalid_row(line, format!("invalid language '{}'", raw_language)))?;

    let purchase_date = parse_date(field(7 + offset), line);

    Ok(CollectionCard {
        quantity,
        name,
        expansion_code,
        expansion_name,
        purchase_price,
        foil,
        condition,
        language,
        purchase_date,
    })
}

/// Dates arrive in ISO form, day-first form, or with a time suffix from
/// older exports. Anything else is dropped with a warning rather than
/// failing the row.
fn parse_date(raw: &str, line: u64) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(stamp) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(stamp.date());
    }
    log::warn!("Line {}: unparseable purchase date '{}'", line, raw);
    None
}

fn invalid_row(line: u64, reason: String) -> CollectionError {
    CollectionError::InvalidRow { line, reason }
}
