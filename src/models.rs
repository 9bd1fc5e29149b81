use chrono::NaiveDate;

/// One printing of a card, as retained in the oracle index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub lang: String,
    pub set_code: String,
    pub set_name: String,
    /// Raw catalogue set type ("expansion", "promo", "core", ...).
    /// Only lookup queries are restricted to a fixed allow-list.
    pub set_type: String,
}

impl Card {
    /// Returns true for compound cards whose name joins two faces with "//"
    pub fn is_double_faced(&self) -> bool {
        self.name.contains("//")
    }
}

/// Card condition scale, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    Poor,
    Played,
    LightPlayed,
    Good,
    Excellent,
    NearMint,
    Mint,
}

impl Condition {
    /// Returns the label used in collection files (e.g., "NearMint")
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Poor => "Poor",
            Condition::Played => "Played",
            Condition::LightPlayed => "LightPlayed",
            Condition::Good => "Good",
            Condition::Excellent => "Excellent",
            Condition::NearMint => "NearMint",
            Condition::Mint => "Mint",
        }
    }

    /// Parse a condition label into a Condition
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Some(Condition::Poor),
            "played" => Some(Condition::Played),
            "lightplayed" => Some(Condition::LightPlayed),
            "good" => Some(Condition::Good),
            "excellent" => Some(Condition::Excellent),
            "nearmint" => Some(Condition::NearMint),
            "mint" => Some(Condition::Mint),
            _ => None,
        }
    }

    /// Translate the numeric scale of legacy MTG Manager exports
    pub fn from_legacy_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Condition::NearMint),
            1 => Some(Condition::Excellent),
            2 => Some(Condition::Good),
            3 => Some(Condition::Played),
            4 => Some(Condition::Poor),
            _ => None,
        }
    }

    /// Returns all conditions, worst first
    pub fn all() -> &'static [Condition] {
        &[
            Condition::Poor,
            Condition::Played,
            Condition::LightPlayed,
            Condition::Good,
            Condition::Excellent,
            Condition::NearMint,
            Condition::Mint,
        ]
    }
}

/// Print languages appearing in collection files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    German,
    Portuguese,
    French,
    Italian,
    Spanish,
    Japanese,
    SimplifiedChinese,
    Russian,
    TraditionalChinese,
    Korean,
}

impl Language {
    /// Returns the full name of the language (e.g., "English", "German")
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::Portuguese => "Portuguese",
            Language::French => "French",
            Language::Italian => "Italian",
            Language::Spanish => "Spanish",
            Language::Japanese => "Japanese",
            Language::SimplifiedChinese => "Simplified Chinese",
            Language::Russian => "Russian",
            Language::TraditionalChinese => "Traditional Chinese",
            Language::Korean => "Korean",
        }
    }

    /// Parse a full language name (e.g., "English", "German") into a Language
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" => Some(Language::English),
            "german" => Some(Language::German),
            "portuguese" => Some(Language::Portuguese),
            "french" => Some(Language::French),
            "italian" => Some(Language::Italian),
            "spanish" => Some(Language::Spanish),
            "japanese" => Some(Language::Japanese),
            "simplified chinese" => Some(Language::SimplifiedChinese),
            "russian" => Some(Language::Russian),
            "traditional chinese" => Some(Language::TraditionalChinese),
            "korean" => Some(Language::Korean),
            _ => None,
        }
    }

    /// Translate the numeric scale of legacy MTG Manager exports
    pub fn from_legacy_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Language::English),
            1 => Some(Language::German),
            2 => Some(Language::Portuguese),
            3 => Some(Language::French),
            4 => Some(Language::Italian),
            5 => Some(Language::Spanish),
            6 => Some(Language::Japanese),
            7 => Some(Language::SimplifiedChinese),
            8 => Some(Language::Russian),
            9 => Some(Language::TraditionalChinese),
            10 => Some(Language::Korean),
            _ => None,
        }
    }

    /// Returns all supported languages
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::German,
            Language::Portuguese,
            Language::French,
            Language::Italian,
            Language::Spanish,
            Language::Japanese,
            Language::SimplifiedChinese,
            Language::Russian,
            Language::TraditionalChinese,
            Language::Korean,
        ]
    }
}

/// One row of a collection file
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionCard {
    pub quantity: u32,
    pub name: String,
    /// Expansion code; legacy exports are lowercased on read
    pub expansion_code: String,
    /// Only present in the nine-column layout
    pub expansion_name: Option<String>,
    pub purchase_price: f64,
    pub foil: bool,
    pub condition: Condition,
    pub language: Language,
    pub purchase_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_scale_is_ordered() {
        let all = Condition::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should rank below {:?}", pair[0], pair[1]);
        }
        assert!(Condition::Poor < Condition::Mint);
        assert!(Condition::Good < Condition::NearMint);
    }

    #[test]
    fn condition_parse_roundtrip() {
        for c in Condition::all() {
            assert_eq!(Condition::parse(c.as_str()), Some(*c));
        }
        assert_eq!(Condition::parse("nearmint"), Some(Condition::NearMint));
        assert_eq!(Condition::parse("  Mint "), Some(Condition::Mint));
        assert_eq!(Condition::parse("pristine"), None);
    }

    #[test]
    fn condition_legacy_codes() {
        assert_eq!(Condition::from_legacy_code(0), Some(Condition::NearMint));
        assert_eq!(Condition::from_legacy_code(1), Some(Condition::Excellent));
        assert_eq!(Condition::from_legacy_code(2), Some(Condition::Good));
        assert_eq!(Condition::from_legacy_code(3), Some(Condition::Played));
        assert_eq!(Condition::from_legacy_code(4), Some(Condition::Poor));
        assert_eq!(Condition::from_legacy_code(5), None);
    }

    #[test]
    fn language_parse_roundtrip() {
        for l in Language::all() {
            assert_eq!(Language::parse(l.as_str()), Some(*l));
        }
        assert_eq!(Language::parse("simplified chinese"), Some(Language::SimplifiedChinese));
        assert_eq!(Language::parse("Klingon"), None);
    }

    #[test]
    fn language_legacy_codes_cover_the_scale() {
        for code in 0..=10u8 {
            assert!(Language::from_legacy_code(code).is_some());
        }
        assert_eq!(Language::from_legacy_code(0), Some(Language::English));
        assert_eq!(Language::from_legacy_code(10), Some(Language::Korean));
        assert_eq!(Language::from_legacy_code(11), None);
    }

    #[test]
    fn double_faced_names() {
        let double = Card {
            name: "Fire // Ice".to_string(),
            lang: "en".to_string(),
            set_code: "apc".to_string(),
            set_name: "Apocalypse".to_string(),
            set_type: "expansion".to_string(),
        };
        assert!(double.is_double_faced());

        let single = Card { name: "Fireball".to_string(), ..double.clone() };
        assert!(!single.is_double_faced());
    }
}
