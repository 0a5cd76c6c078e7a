//! Fixed enumerations and the university catalog
//!
//! Provides the closed vocabularies a draft can draw from:
//! - [`ResearcherLevel`]: the ten researcher positions
//! - [`Industry`]: the 33 sector categories
//! - [`UniversityCatalog`]: the enumerable universities grouped by subregion

use crate::locale::Locale;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Researcher position levels
///
/// Serialized with the Japanese names the matching backend expects.
/// Variant order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResearcherLevel {
    /// 教授
    #[serde(rename = "教授")]
    Professor,
    /// 准教授
    #[serde(rename = "准教授")]
    AssociateProfessor,
    /// 助教
    #[serde(rename = "助教")]
    AssistantProfessor,
    /// 講師
    #[serde(rename = "講師")]
    Lecturer,
    /// 助教授 (pre-2007 title)
    #[serde(rename = "助教授")]
    FormerAssistantProfessor,
    /// 助手
    #[serde(rename = "助手")]
    ResearchAssistant,
    /// 研究員
    #[serde(rename = "研究員")]
    Researcher,
    /// 特任教授
    #[serde(rename = "特任教授")]
    ProjectProfessor,
    /// 特任助教
    #[serde(rename = "特任助教")]
    ProjectAssistantProfessor,
    /// 主任研究員
    #[serde(rename = "主任研究員")]
    ChiefResearcher,
}

impl ResearcherLevel {
    /// Every level, in canonical order
    pub const ALL: [ResearcherLevel; 10] = [
        Self::Professor,
        Self::AssociateProfessor,
        Self::AssistantProfessor,
        Self::Lecturer,
        Self::FormerAssistantProfessor,
        Self::ResearchAssistant,
        Self::Researcher,
        Self::ProjectProfessor,
        Self::ProjectAssistantProfessor,
        Self::ChiefResearcher,
    ];

    /// Number of enumerated levels
    pub const COUNT: usize = Self::ALL.len();

    /// Name used on the wire (Japanese)
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Professor => "教授",
            Self::AssociateProfessor => "准教授",
            Self::AssistantProfessor => "助教",
            Self::Lecturer => "講師",
            Self::FormerAssistantProfessor => "助教授",
            Self::ResearchAssistant => "助手",
            Self::Researcher => "研究員",
            Self::ProjectProfessor => "特任教授",
            Self::ProjectAssistantProfessor => "特任助教",
            Self::ChiefResearcher => "主任研究員",
        }
    }

    /// English display label
    #[must_use]
    pub fn english_label(self) -> &'static str {
        match self {
            Self::Professor => "Professor",
            Self::AssociateProfessor => "Associate Professor",
            Self::AssistantProfessor => "Assistant Professor",
            Self::Lecturer => "Lecturer",
            Self::FormerAssistantProfessor => "Assistant Professor (former title)",
            Self::ResearchAssistant => "Research Assistant",
            Self::Researcher => "Researcher",
            Self::ProjectProfessor => "Project Professor",
            Self::ProjectAssistantProfessor => "Project Assistant Professor",
            Self::ChiefResearcher => "Chief Researcher",
        }
    }

    /// Display label for a locale
    #[inline]
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ja => self.wire_name(),
            Locale::En => self.english_label(),
        }
    }
}

impl FromStr for ResearcherLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.wire_name() == s || l.english_label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("researcher level", s))
    }
}

impl std::fmt::Display for ResearcherLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

macro_rules! industries {
    ($($variant:ident => $wire:literal, $en:literal;)+) => {
        /// Industry categories (the 33 TSE sectors)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Industry {
            $(
                #[doc = $en]
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Industry {
            /// Every industry, in canonical order
            pub const ALL: &'static [Industry] = &[$(Self::$variant),+];

            /// Name used on the wire (Japanese)
            #[must_use]
            pub fn wire_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// English display label
            #[must_use]
            pub fn english_label(self) -> &'static str {
                match self {
                    $(Self::$variant => $en,)+
                }
            }
        }
    };
}

industries! {
    FisheryAgricultureForestry => "水産・農林業", "Fishery, Agriculture & Forestry";
    Mining => "鉱業", "Mining";
    Construction => "建設業", "Construction";
    Foods => "食料品", "Foods";
    Textiles => "繊維製品", "Textiles & Apparels";
    PulpPaper => "パルプ・紙", "Pulp & Paper";
    Chemicals => "化学", "Chemicals";
    Pharmaceutical => "医薬品", "Pharmaceutical";
    OilCoal => "石油・石炭製品", "Oil & Coal Products";
    Rubber => "ゴム製品", "Rubber Products";
    GlassCeramics => "ガラス・土石製品", "Glass & Ceramics Products";
    IronSteel => "鉄鋼", "Iron & Steel";
    NonferrousMetals => "非鉄金属", "Nonferrous Metals";
    MetalProducts => "金属製品", "Metal Products";
    Machinery => "機械", "Machinery";
    ElectricAppliances => "電気機器", "Electric Appliances";
    TransportationEquipment => "輸送用機器", "Transportation Equipment";
    PrecisionInstruments => "精密機器", "Precision Instruments";
    OtherProducts => "その他製品", "Other Products";
    ElectricPowerGas => "電気・ガス業", "Electric Power & Gas";
    LandTransportation => "陸運業", "Land Transportation";
    MarineTransportation => "海運業", "Marine Transportation";
    AirTransportation => "空運業", "Air Transportation";
    Warehousing => "倉庫・運輸関連業", "Warehousing & Harbor Transportation Services";
    InformationCommunication => "情報・通信業", "Information & Communication";
    Wholesale => "卸売業", "Wholesale Trade";
    Retail => "小売業", "Retail Trade";
    Banks => "銀行業", "Banks";
    Securities => "証券、商品先物取引業", "Securities & Commodity Futures";
    Insurance => "保険業", "Insurance";
    OtherFinancing => "その他金融業", "Other Financing Business";
    RealEstate => "不動産業", "Real Estate";
    Services => "サービス業", "Services";
}

impl Industry {
    /// Display label for a locale
    #[inline]
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ja => self.wire_name(),
            Locale::En => self.english_label(),
        }
    }
}

impl FromStr for Industry {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.wire_name() == s || i.english_label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("industry", s))
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A string did not name any member of a closed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Vocabulary name
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file unreadable
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON malformed
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Enumerable universities grouped by subregion
///
/// Subregion and university order follow the source document. The
/// "all universities" count is the number of distinct names, so a name
/// listed under two subregions counts once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniversityCatalog {
    subregions: IndexMap<String, Vec<String>>,
}

impl UniversityCatalog {
    /// Create catalog from subregion groups
    #[must_use]
    pub fn new(subregions: IndexMap<String, Vec<String>>) -> Self {
        Self { subregions }
    }

    /// Parse a `{ "subregion": ["name", ...] }` JSON document
    ///
    /// # Errors
    /// Returns [`CatalogError::Parse`] on malformed input
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    /// Returns [`CatalogError`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            universities = catalog.len(),
            "loaded university catalog"
        );
        Ok(catalog)
    }

    /// Number of distinct enumerable universities
    #[must_use]
    pub fn len(&self) -> usize {
        self.names().collect::<BTreeSet<_>>().len()
    }

    /// Check if catalog lists no universities
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate university names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subregions.values().flatten().map(String::as_str)
    }

    /// Iterate subregions with their universities
    pub fn subregions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.subregions
            .iter()
            .map(|(region, names)| (region.as_str(), names.as_slice()))
    }

    /// Check whether a university is enumerable
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Full-coverage set of university names
    #[must_use]
    pub fn full_set(&self) -> BTreeSet<String> {
        self.names().map(str::to_string).collect()
    }
}
