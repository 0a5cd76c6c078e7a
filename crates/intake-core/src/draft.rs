//! Project draft and its editing rules
//!
//! Length caps truncate instead of rejecting. The university selection
//! collapses a full-coverage pick into the [`ALL_UNIVERSITIES`] sentinel and
//! expands it back on load.

use crate::catalog::{Industry, ResearcherLevel, UniversityCatalog};
use crate::error::{RequiredField, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum title length (Unicode scalar values)
pub const TITLE_MAX_CHARS: usize = 40;

/// Maximum background length
pub const BACKGROUND_MAX_CHARS: usize = 2000;

/// Maximum business description length
pub const BUSINESS_DESCRIPTION_MAX_CHARS: usize = 100;

/// Sentinel meaning "every enumerable university"
pub const ALL_UNIVERSITIES: &str = "ALL";

/// Sentinel spelling still emitted by older backend records
pub const LEGACY_ALL_UNIVERSITIES: &str = "全大学";

/// Target university selection
///
/// Serialized as a string array; [`UniversitySelection::All`] is `["ALL"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum UniversitySelection {
    /// Full coverage sentinel
    All,
    /// Explicit subset
    Selected(BTreeSet<String>),
}

impl UniversitySelection {
    /// Empty selection
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::Selected(BTreeSet::new())
    }

    /// Collapse an explicit pick, using the sentinel when it covers the catalog
    #[must_use]
    pub fn collapse(selected: BTreeSet<String>, catalog: &UniversityCatalog) -> Self {
        if !catalog.is_empty() && selected == catalog.full_set() {
            Self::All
        } else {
            Self::Selected(selected)
        }
    }

    /// Expand to explicit names
    #[must_use]
    pub fn expand(&self, catalog: &UniversityCatalog) -> BTreeSet<String> {
        match self {
            Self::All => catalog.full_set(),
            Self::Selected(names) => names.clone(),
        }
    }

    /// Check for the sentinel
    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Check whether nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Selected(names) => names.is_empty(),
        }
    }

    /// Number of universities covered
    #[must_use]
    pub fn count(&self, catalog: &UniversityCatalog) -> usize {
        match self {
            Self::All => catalog.len(),
            Self::Selected(names) => names.len(),
        }
    }

    /// Wire representation
    #[must_use]
    pub fn to_wire(&self) -> Vec<String> {
        match self {
            Self::All => vec![ALL_UNIVERSITIES.to_string()],
            Self::Selected(names) => names.iter().cloned().collect(),
        }
    }
}

impl Default for UniversitySelection {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<String>> for UniversitySelection {
    fn from(names: Vec<String>) -> Self {
        if names
            .iter()
            .any(|n| n == ALL_UNIVERSITIES || n == LEGACY_ALL_UNIVERSITIES)
        {
            Self::All
        } else {
            Self::Selected(
                names
                    .into_iter()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect(),
            )
        }
    }
}

impl From<UniversitySelection> for Vec<String> {
    fn from(selection: UniversitySelection) -> Self {
        selection.to_wire()
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// User-editable project request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    title: String,
    background: String,
    industry: Option<Industry>,
    business_description: String,
    universities: UniversitySelection,
    researcher_levels: BTreeSet<ResearcherLevel>,
    deadline: Option<NaiveDate>,
}

impl ProjectDraft {
    /// Create empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With title (clipped)
    #[must_use]
    pub fn with_title(mut self, title: impl AsRef<str>) -> Self {
        self.set_title(title);
        self
    }

    /// With background (clipped)
    #[must_use]
    pub fn with_background(mut self, background: impl AsRef<str>) -> Self {
        self.set_background(background);
        self
    }

    /// With industry
    #[must_use]
    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    /// With business description (clipped)
    #[must_use]
    pub fn with_business_description(mut self, text: impl AsRef<str>) -> Self {
        self.set_business_description(text);
        self
    }

    /// With university selection
    #[must_use]
    pub fn with_universities(mut self, universities: UniversitySelection) -> Self {
        self.universities = universities;
        self
    }

    /// With researcher levels
    #[must_use]
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = ResearcherLevel>) -> Self {
        self.researcher_levels = levels.into_iter().collect();
        self
    }

    /// With application deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Project title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Project background
    #[inline]
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Industry category
    #[inline]
    #[must_use]
    pub fn industry(&self) -> Option<Industry> {
        self.industry
    }

    /// Business description
    #[inline]
    #[must_use]
    pub fn business_description(&self) -> &str {
        &self.business_description
    }

    /// Target universities
    #[inline]
    #[must_use]
    pub fn universities(&self) -> &UniversitySelection {
        &self.universities
    }

    /// Requested researcher levels
    #[inline]
    #[must_use]
    pub fn researcher_levels(&self) -> &BTreeSet<ResearcherLevel> {
        &self.researcher_levels
    }

    /// Application deadline
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Replace the title, clipping to [`TITLE_MAX_CHARS`]
    pub fn set_title(&mut self, title: impl AsRef<str>) {
        self.title = clip(title.as_ref(), TITLE_MAX_CHARS);
    }

    /// Replace the background, clipping to [`BACKGROUND_MAX_CHARS`]
    pub fn set_background(&mut self, background: impl AsRef<str>) {
        self.background = clip(background.as_ref(), BACKGROUND_MAX_CHARS);
    }

    /// Replace the industry
    pub fn set_industry(&mut self, industry: Option<Industry>) {
        self.industry = industry;
    }

    /// Replace the business description, clipping to [`BUSINESS_DESCRIPTION_MAX_CHARS`]
    pub fn set_business_description(&mut self, text: impl AsRef<str>) {
        self.business_description = clip(text.as_ref(), BUSINESS_DESCRIPTION_MAX_CHARS);
    }

    /// Replace the deadline
    pub fn set_deadline(&mut self, deadline: Option<NaiveDate>) {
        self.deadline = deadline;
    }

    /// Set universities from an explicit pick, collapsing full coverage
    pub fn select_universities(
        &mut self,
        selected: impl IntoIterator<Item = String>,
        catalog: &UniversityCatalog,
    ) {
        self.universities = UniversitySelection::collapse(selected.into_iter().collect(), catalog);
    }

    /// Select every university (the sentinel)
    pub fn select_all_universities(&mut self) {
        self.universities = UniversitySelection::All;
    }

    /// Replace the university selection verbatim
    pub fn set_universities(&mut self, universities: UniversitySelection) {
        self.universities = universities;
    }

    /// Add or remove one level
    pub fn toggle_level(&mut self, level: ResearcherLevel) {
        if !self.researcher_levels.remove(&level) {
            self.researcher_levels.insert(level);
        }
    }

    /// Select every level, or clear them all
    pub fn select_all_levels(&mut self, selected: bool) {
        self.researcher_levels = if selected {
            ResearcherLevel::ALL.into_iter().collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Fields missing before an AI assist may be requested
    #[must_use]
    pub fn missing_for_assist(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push(RequiredField::Title);
        }
        if blank(&self.background) {
            missing.push(RequiredField::Background);
        }
        missing
    }

    /// Fields missing before submission, in field order
    #[must_use]
    pub fn missing_for_submission(&self) -> Vec<RequiredField> {
        let mut missing = self.missing_for_assist();
        if self.universities.is_empty() {
            missing.push(RequiredField::Universities);
        }
        if self.researcher_levels.is_empty() {
            missing.push(RequiredField::ResearcherLevels);
        }
        missing
    }

    /// Validate assist preconditions
    ///
    /// # Errors
    /// Returns [`ValidationError`] naming title and/or background
    pub fn check_assist(&self) -> Result<(), ValidationError> {
        ValidationError::from_missing(self.missing_for_assist()).map_or(Ok(()), Err)
    }

    /// Validate submission preconditions
    ///
    /// # Errors
    /// Returns [`ValidationError`] naming every missing field
    pub fn check_submission(&self) -> Result<(), ValidationError> {
        ValidationError::from_missing(self.missing_for_submission()).map_or(Ok(()), Err)
    }

    /// Researcher levels as wire names, canonical order
    #[must_use]
    pub fn level_wire_names(&self) -> Vec<String> {
        self.researcher_levels
            .iter()
            .map(|l| l.wire_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog() -> UniversityCatalog {
        UniversityCatalog::from_json_str(r#"{"North": ["A", "B"], "South": ["C", "D", "E"]}"#)
            .unwrap()
    }

    #[test]
    fn caps_truncate_by_chars() {
        let mut draft = ProjectDraft::new();
        draft.set_title("あ".repeat(50));
        assert_eq!(draft.title().chars().count(), TITLE_MAX_CHARS);

        draft.set_business_description("x".repeat(101));
        assert_eq!(draft.business_description().len(), 100);

        draft.set_background("short");
        assert_eq!(draft.background(), "short");
    }

    #[test]
    fn sentinel_count_ignores_duplicate_listings() {
        let catalog = UniversityCatalog::from_json_str(
            r#"{"Kanto": ["Tokyo", "Keio"], "Online": ["Tokyo"]}"#,
        )
        .unwrap();
        let picked: BTreeSet<String> = ["Keio", "Tokyo"].map(String::from).into();

        let selection = UniversitySelection::collapse(picked.clone(), &catalog);
        assert!(selection.is_all());
        assert_eq!(selection.count(&catalog), picked.len());
    }

    #[test]
    fn full_pick_collapses_to_sentinel() {
        let catalog = catalog();
        let mut draft = ProjectDraft::new();
        draft.select_universities(catalog.full_set(), &catalog);
        assert!(draft.universities().is_all());
        assert_eq!(draft.universities().to_wire(), vec!["ALL".to_string()]);

        draft.select_universities(vec!["A".to_string()], &catalog);
        assert!(!draft.universities().is_all());
    }

    #[test]
    fn sentinel_expands_then_recollapses() {
        let catalog = catalog();
        let expanded = UniversitySelection::All.expand(&catalog);
        assert_eq!(expanded.len(), 5);
        assert_eq!(
            UniversitySelection::collapse(expanded, &catalog),
            UniversitySelection::All
        );
    }

    #[test]
    fn legacy_sentinel_is_accepted() {
        let selection: UniversitySelection =
            serde_json::from_str(r#"["全大学"]"#).unwrap();
        assert!(selection.is_all());
    }

    #[test]
    fn submission_reports_missing_fields_in_order() {
        let draft = ProjectDraft::new().with_background("bg");
        assert_eq!(
            draft.missing_for_submission(),
            vec![
                RequiredField::Title,
                RequiredField::Universities,
                RequiredField::ResearcherLevels
            ]
        );

        let complete = draft
            .with_title("t")
            .with_universities(UniversitySelection::All)
            .with_levels([ResearcherLevel::Professor]);
        assert!(complete.check_submission().is_ok());
    }

    #[test]
    fn whitespace_title_is_missing_for_assist() {
        let draft = ProjectDraft::new().with_title("   ").with_background("bg");
        let err = draft.check_assist().unwrap_err();
        assert_eq!(err.missing, vec![RequiredField::Title]);
    }

    #[test]
    fn level_toggling_and_select_all() {
        let mut draft = ProjectDraft::new();
        draft.toggle_level(ResearcherLevel::Lecturer);
        draft.toggle_level(ResearcherLevel::Professor);
        assert_eq!(draft.level_wire_names(), vec!["教授", "講師"]);
        draft.toggle_level(ResearcherLevel::Lecturer);
        assert_eq!(draft.researcher_levels().len(), 1);

        draft.select_all_levels(true);
        assert_eq!(draft.researcher_levels().len(), ResearcherLevel::COUNT);
        draft.select_all_levels(false);
        assert!(draft.researcher_levels().is_empty());
    }

    proptest! {
        #[test]
        fn prop_caps_never_exceeded(s in ".{0,3000}") {
            let draft = ProjectDraft::new()
                .with_title(&s)
                .with_background(&s)
                .with_business_description(&s);
            prop_assert!(draft.title().chars().count() <= TITLE_MAX_CHARS);
            prop_assert!(draft.background().chars().count() <= BACKGROUND_MAX_CHARS);
            prop_assert!(draft.business_description().chars().count() <= BUSINESS_DESCRIPTION_MAX_CHARS);
            prop_assert!(s.starts_with(draft.title()));
        }

        #[test]
        fn prop_partial_pick_never_collapses(mask in proptest::collection::vec(any::<bool>(), 5)) {
            let catalog = catalog();
            let picked: BTreeSet<String> = catalog
                .names()
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .map(|(n, _)| n.to_string())
                .collect();
            let selection = UniversitySelection::collapse(picked.clone(), &catalog);
            prop_assert_eq!(selection.is_all(), picked.len() == catalog.len());
            prop_assert_eq!(selection.expand(&catalog), picked);
        }
    }
}
