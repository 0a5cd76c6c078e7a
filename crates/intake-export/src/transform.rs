//! Matching results → workbook transform
//!
//! Pure and deterministic: no I/O, inputs are only borrowed, and identical
//! inputs always produce an identical [`WorkbookModel`].
//!
//! # Layout
//! - Sheet 1: six key/value rows (title, background, industry, business
//!   description, university summary, researcher-level summary)
//! - Sheet 2: seven-column header row, then one row per researcher in
//!   session order

use crate::text::ExportText;
use crate::workbook::{ExportFile, Sheet, WorkbookModel};
use intake_core::{
    FavoriteSet, FieldResolver, LabelResolver, Locale, LocalizedDirectory, ProjectDraft,
    ProjectId, ResearchSession, ResearcherField, ResearcherId, ResearcherLevel,
    UniversityCatalog, UniversitySelection,
};

/// External profile link prefix; the 12-digit identifier follows
pub const PROFILE_URL_PREFIX: &str = "https://nrid.nii.ac.jp/ja/nrid/1";

/// Filename title used when the title is blank
pub const UNTITLED: &str = "untitled";

/// Maximum sanitized title length in a filename
pub const FILENAME_TITLE_MAX_CHARS: usize = 30;

const FILENAME_ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Zero-padded 12-digit profile identifier
#[must_use]
pub fn profile_identifier(id: ResearcherId) -> String {
    format!("{:012}", id.0)
}

/// External profile URL for a researcher
#[must_use]
pub fn profile_url(id: ResearcherId) -> String {
    format!("{PROFILE_URL_PREFIX}{}", profile_identifier(id))
}

/// Title with filename-illegal characters removed, clipped, never empty
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !FILENAME_ILLEGAL.contains(c))
        .collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return UNTITLED.to_string();
    }
    trimmed.chars().take(FILENAME_TITLE_MAX_CHARS).collect()
}

/// `{projectId}_{sanitizedTitle}.xlsx`
#[must_use]
pub fn export_filename(project_id: ProjectId, title: &str) -> String {
    format!("{project_id}_{}.xlsx", sanitize_title(title))
}

/// Workbook builder bound to its label sources
pub struct ExportTransform<'a> {
    labels: &'a dyn LabelResolver,
    catalog: &'a UniversityCatalog,
    text: &'a ExportText,
    locale: Locale,
    localized: Option<&'a LocalizedDirectory>,
}

impl<'a> ExportTransform<'a> {
    /// Create transform
    #[must_use]
    pub fn new(
        labels: &'a dyn LabelResolver,
        catalog: &'a UniversityCatalog,
        text: &'a ExportText,
    ) -> Self {
        Self {
            labels,
            catalog,
            text,
            locale: Locale::default(),
            localized: None,
        }
    }

    /// With presentation locale (selects localized researcher fields)
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// With localized researcher fields
    #[must_use]
    pub fn with_localized(mut self, localized: &'a LocalizedDirectory) -> Self {
        self.localized = Some(localized);
        self
    }

    /// Build workbook and filename for a session
    #[must_use]
    pub fn export(
        &self,
        draft: &ProjectDraft,
        session: &ResearchSession,
        favorites: &FavoriteSet,
    ) -> ExportFile {
        ExportFile {
            filename: export_filename(session.project_id, draft.title()),
            workbook: self.build(draft, session, favorites),
        }
    }

    /// Build the two-sheet workbook
    #[must_use]
    pub fn build(
        &self,
        draft: &ProjectDraft,
        session: &ResearchSession,
        favorites: &FavoriteSet,
    ) -> WorkbookModel {
        tracing::debug!(
            project_id = %session.project_id,
            researchers = session.researchers.len(),
            "building export workbook"
        );
        WorkbookModel {
            sheets: vec![
                self.project_sheet(draft),
                self.researcher_sheet(session, favorites),
            ],
        }
    }

    fn project_sheet(&self, draft: &ProjectDraft) -> Sheet {
        let text = self.text;
        let industry = draft
            .industry()
            .map_or_else(|| text.unspecified.clone(), |i| self.labels.industry(i));
        let business = if draft.business_description().trim().is_empty() {
            text.unspecified.clone()
        } else {
            draft.business_description().to_string()
        };

        let values = [
            draft.title().to_string(),
            draft.background().to_string(),
            industry,
            business,
            self.university_summary(draft.universities()),
            self.level_summary(draft.researcher_levels().iter().copied()),
        ];

        let mut sheet = Sheet::new(text.project_sheet.clone());
        for (label, value) in text.project_labels.iter().zip(values) {
            sheet.push_row([label.clone(), value]);
        }
        sheet
    }

    fn researcher_sheet(&self, session: &ResearchSession, favorites: &FavoriteSet) -> Sheet {
        let text = self.text;
        let mut resolver = FieldResolver::new(self.locale).with_placeholder(&text.placeholder);
        if let Some(localized) = self.localized {
            resolver = resolver.with_localized(localized);
        }

        let mut sheet = Sheet::new(text.researcher_sheet.clone());
        sheet.push_row(text.researcher_headers.iter().cloned());

        for researcher in &session.researchers {
            let favorite = favorites
                .get(&researcher.matching_id)
                .copied()
                .unwrap_or(false);
            sheet.push_row([
                resolver.resolve(researcher, ResearcherField::Name).to_string(),
                resolver.resolve(researcher, ResearcherField::Affiliation).to_string(),
                resolver.resolve(researcher, ResearcherField::Department).to_string(),
                resolver.resolve(researcher, ResearcherField::Position).to_string(),
                profile_url(researcher.researcher_id),
                researcher.reason_or(&text.placeholder).to_string(),
                if favorite {
                    text.favorite_registered.clone()
                } else {
                    text.favorite_unregistered.clone()
                },
            ]);
        }
        sheet
    }

    /// University summary cell
    #[must_use]
    pub fn university_summary(&self, selection: &UniversitySelection) -> String {
        match selection {
            UniversitySelection::All => self.text.all_universities(self.catalog.len()),
            UniversitySelection::Selected(names) => {
                let joined = names
                    .iter()
                    .map(|n| self.labels.university(n))
                    .collect::<Vec<_>>()
                    .join("/");
                format!("{joined}{}", self.text.university_count(names.len()))
            }
        }
    }

    /// Researcher-level summary cell
    ///
    /// Every level, and no level, both render the canonical "all levels"
    /// text.
    #[must_use]
    pub fn level_summary(&self, levels: impl IntoIterator<Item = ResearcherLevel>) -> String {
        let labels: Vec<String> = levels.into_iter().map(|l| self.labels.level(l)).collect();
        if labels.is_empty() || labels.len() == ResearcherLevel::COUNT {
            return self.text.all_levels.clone();
        }
        labels.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::CatalogLabels;

    #[test]
    fn profile_identifier_is_zero_padded() {
        assert_eq!(profile_identifier(ResearcherId(42)), "000000000042");
        assert_eq!(
            profile_url(ResearcherId(42)),
            "https://nrid.nii.ac.jp/ja/nrid/1000000000042"
        );
    }

    #[test]
    fn filename_examples() {
        assert_eq!(export_filename(ProjectId(7), "A/B:C"), "7_ABC.xlsx");
        assert_eq!(export_filename(ProjectId(7), ""), "7_untitled.xlsx");
        assert_eq!(export_filename(ProjectId(7), "   "), "7_untitled.xlsx");
        assert_eq!(export_filename(ProjectId(7), "???"), "7_untitled.xlsx");
        assert_eq!(sanitize_title(&"x".repeat(45)).len(), FILENAME_TITLE_MAX_CHARS);
    }

    #[test]
    fn level_summary_fallbacks() {
        let labels = CatalogLabels::new(Locale::Ja);
        let catalog = UniversityCatalog::default();
        let text = ExportText::default();
        let transform = ExportTransform::new(&labels, &catalog, &text);

        assert_eq!(transform.level_summary(ResearcherLevel::ALL), "all levels");
        assert_eq!(transform.level_summary([]), "all levels");
        assert_eq!(
            transform.level_summary([ResearcherLevel::Professor, ResearcherLevel::Lecturer]),
            "教授/講師"
        );
    }
}
