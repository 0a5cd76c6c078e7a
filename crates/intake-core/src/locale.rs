//! Locales and display-label resolution
//!
//! Text resources are owned elsewhere; this module only defines the
//! [`LabelResolver`] seam the export and presentation layers call through,
//! plus a catalog-backed default.

use crate::catalog::{Industry, ResearcherLevel, UnknownVariant};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Active presentation locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Japanese (source language of all backend data)
    #[default]
    Ja,
    /// English
    En,
}

impl Locale {
    /// Language tag sent to remote services
    #[inline]
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }

    /// Whether researcher records need a localized overlay
    #[inline]
    #[must_use]
    pub fn needs_localized_fields(self) -> bool {
        self != Self::Ja
    }
}

impl FromStr for Locale {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" => Ok(Self::Ja),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(UnknownVariant {
                kind: "locale",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Resolves enumerated values to display labels
pub trait LabelResolver: Send + Sync {
    /// Label for a researcher level
    fn level(&self, level: ResearcherLevel) -> String;

    /// Label for a university name
    fn university(&self, name: &str) -> String;

    /// Label for an industry category
    fn industry(&self, industry: Industry) -> String;
}

/// Labels taken straight from the built-in vocabularies
///
/// University names have no translations available and pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogLabels {
    locale: Locale,
}

impl CatalogLabels {
    /// Create resolver for a locale
    #[inline]
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl LabelResolver for CatalogLabels {
    fn level(&self, level: ResearcherLevel) -> String {
        level.label(self.locale).to_string()
    }

    fn university(&self, name: &str) -> String {
        name.to_string()
    }

    fn industry(&self, industry: Industry) -> String {
        industry.label(self.locale).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parse_and_tag() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ja-JP".parse::<Locale>().unwrap(), Locale::Ja);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default().tag(), "ja");
    }

    #[test]
    fn catalog_labels_follow_locale() {
        let en = CatalogLabels::new(Locale::En);
        let ja = CatalogLabels::new(Locale::Ja);
        assert_eq!(en.level(ResearcherLevel::Professor), "Professor");
        assert_eq!(ja.level(ResearcherLevel::Professor), "教授");
        assert_eq!(en.university("Tokyo"), "Tokyo");
        assert_eq!(en.industry(Industry::Banks), "Banks");
    }
}
