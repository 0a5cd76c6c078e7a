//! Matched researcher records and field resolution
//!
//! Display fields resolve through a fixed priority chain:
//! localized record (non-Japanese locales only) → base record → placeholder.

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder shown for any absent researcher field
pub const FIELD_PLACEHOLDER: &str = "―";

/// Identifier of one matching (used for favorite and offer calls)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchingId(pub i64);

impl std::fmt::Display for MatchingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a researcher profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearcherId(pub i64);

impl std::fmt::Display for ResearcherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Researcher fields with localized variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResearcherField {
    /// Full name
    Name,
    /// Current affiliation
    Affiliation,
    /// Current department
    Department,
    /// Current position
    Position,
    /// Research field
    ResearchField,
}

/// One candidate researcher as returned by the matching service
///
/// Immutable once fetched. `favorite_status` is the server's view at fetch
/// time only; live favorite state belongs to the favorite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedResearcher {
    /// Matching identifier
    pub matching_id: MatchingId,
    /// Profile identifier
    pub researcher_id: ResearcherId,
    /// Full name
    pub name: Option<String>,
    /// Current affiliation
    pub affiliation: Option<String>,
    /// Current department
    pub department: Option<String>,
    /// Current position
    pub position: Option<String>,
    /// Research field
    pub research_field: Option<String>,
    /// Matching reason written for this project
    pub matching_reason: Option<String>,
    /// Explanation nested in the researcher record
    pub nested_explanation: Option<String>,
    /// Explanation on the matching record itself
    pub explanation: Option<String>,
    /// Favorite flag as of fetch time
    pub favorite_status: bool,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

impl MatchedResearcher {
    /// Create a record with only identifiers set
    ///
    /// A missing profile id defaults to the matching id.
    #[must_use]
    pub fn new(matching_id: MatchingId, researcher_id: Option<ResearcherId>) -> Self {
        Self {
            matching_id,
            researcher_id: researcher_id.unwrap_or(ResearcherId(matching_id.0)),
            name: None,
            affiliation: None,
            department: None,
            position: None,
            research_field: None,
            matching_reason: None,
            nested_explanation: None,
            explanation: None,
            favorite_status: false,
        }
    }

    /// With name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With affiliation, department and position
    #[must_use]
    pub fn with_post(
        mut self,
        affiliation: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        self.affiliation = Some(affiliation.into());
        self.department = Some(department.into());
        self.position = Some(position.into());
        self
    }

    /// With matching reason
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.matching_reason = Some(reason.into());
        self
    }

    /// With server-side favorite flag
    #[must_use]
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite_status = favorite;
        self
    }

    /// Base record value for a field
    #[must_use]
    pub fn field(&self, field: ResearcherField) -> Option<&str> {
        let value = match field {
            ResearcherField::Name => self.name.as_ref(),
            ResearcherField::Affiliation => self.affiliation.as_ref(),
            ResearcherField::Department => self.department.as_ref(),
            ResearcherField::Position => self.position.as_ref(),
            ResearcherField::ResearchField => self.research_field.as_ref(),
        };
        non_blank(value)
    }

    /// First present of matching reason, nested explanation, explanation
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        non_blank(self.matching_reason.as_ref())
            .or_else(|| non_blank(self.nested_explanation.as_ref()))
            .or_else(|| non_blank(self.explanation.as_ref()))
    }

    /// Reason with a placeholder fallback, never empty
    #[must_use]
    pub fn reason_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.reason().unwrap_or(placeholder)
    }
}

/// Localized researcher fields returned by the directory service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedFields {
    /// Localized name
    pub name: Option<String>,
    /// Localized affiliation
    pub affiliation: Option<String>,
    /// Localized department
    pub department: Option<String>,
    /// Localized position
    pub position: Option<String>,
    /// Localized research field
    pub research_field: Option<String>,
}

impl LocalizedFields {
    /// Localized value for a field
    #[must_use]
    pub fn field(&self, field: ResearcherField) -> Option<&str> {
        let value = match field {
            ResearcherField::Name => self.name.as_ref(),
            ResearcherField::Affiliation => self.affiliation.as_ref(),
            ResearcherField::Department => self.department.as_ref(),
            ResearcherField::Position => self.position.as_ref(),
            ResearcherField::ResearchField => self.research_field.as_ref(),
        };
        non_blank(value)
    }
}

/// Localized fields keyed by researcher
pub type LocalizedDirectory = HashMap<ResearcherId, LocalizedFields>;

/// Resolves display fields through the localized → base → placeholder chain
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    locale: Locale,
    localized: Option<&'a LocalizedDirectory>,
    placeholder: &'a str,
}

impl<'a> FieldResolver<'a> {
    /// Create resolver for a locale with no localized overlay
    #[inline]
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            localized: None,
            placeholder: FIELD_PLACEHOLDER,
        }
    }

    /// With localized overlay
    #[inline]
    #[must_use]
    pub fn with_localized(mut self, localized: &'a LocalizedDirectory) -> Self {
        self.localized = Some(localized);
        self
    }

    /// With placeholder text
    #[inline]
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Resolve one field
    #[must_use]
    pub fn resolve(&self, researcher: &'a MatchedResearcher, field: ResearcherField) -> &'a str {
        let localized = if self.locale.needs_localized_fields() {
            self.localized
                .and_then(|dir| dir.get(&researcher.researcher_id))
                .and_then(|fields| fields.field(field))
        } else {
            None
        };

        localized
            .or_else(|| researcher.field(field))
            .unwrap_or(self.placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn researcher() -> MatchedResearcher {
        MatchedResearcher::new(MatchingId(5), Some(ResearcherId(42)))
            .with_name("山田 太郎")
            .with_post("東京大学", "工学部", "教授")
    }

    #[test]
    fn researcher_id_defaults_to_matching_id() {
        let r = MatchedResearcher::new(MatchingId(9), None);
        assert_eq!(r.researcher_id, ResearcherId(9));
    }

    #[test]
    fn reason_priority_chain() {
        let mut r = researcher();
        assert_eq!(r.reason(), None);
        assert_eq!(r.reason_or("―"), "―");

        r.explanation = Some("top".into());
        assert_eq!(r.reason(), Some("top"));

        r.nested_explanation = Some("nested".into());
        assert_eq!(r.reason(), Some("nested"));

        r.matching_reason = Some("  ".into());
        assert_eq!(r.reason(), Some("nested"));

        r.matching_reason = Some("reason".into());
        assert_eq!(r.reason(), Some("reason"));
    }

    #[test]
    fn localized_value_wins_for_english() {
        let r = researcher();
        let mut dir = LocalizedDirectory::new();
        dir.insert(
            ResearcherId(42),
            LocalizedFields {
                name: Some("Taro Yamada".into()),
                ..LocalizedFields::default()
            },
        );

        let en = FieldResolver::new(Locale::En).with_localized(&dir);
        assert_eq!(en.resolve(&r, ResearcherField::Name), "Taro Yamada");
        assert_eq!(en.resolve(&r, ResearcherField::Affiliation), "東京大学");
        assert_eq!(en.resolve(&r, ResearcherField::ResearchField), FIELD_PLACEHOLDER);

        let ja = FieldResolver::new(Locale::Ja).with_localized(&dir);
        assert_eq!(ja.resolve(&r, ResearcherField::Name), "山田 太郎");
    }
}
