//! Intake Export - matching results as a workbook model
//!
//! Converts a submitted draft, its research session and the live favorite
//! flags into a two-sheet [`WorkbookModel`] plus a download filename.
//! Writing spreadsheet bytes is left to the presentation layer.
//!
//! # Example
//!
//! ```rust
//! use intake_core::{CatalogLabels, FavoriteSet, Locale, ProjectDraft, ProjectId, ResearchSession, UniversityCatalog};
//! use intake_export::{ExportText, ExportTransform};
//!
//! let labels = CatalogLabels::new(Locale::En);
//! let catalog = UniversityCatalog::default();
//! let text = ExportText::default();
//! let draft = ProjectDraft::new().with_title("A/B:C");
//! let session = ResearchSession::new(ProjectId(7), "A/B:C", draft.clone(), Vec::new());
//!
//! let file = ExportTransform::new(&labels, &catalog, &text)
//!     .export(&draft, &session, &FavoriteSet::new());
//! assert_eq!(file.filename, "7_ABC.xlsx");
//! assert_eq!(file.workbook.sheets.len(), 2);
//! ```

#![warn(unreachable_pub)]

pub mod text;
pub mod transform;
pub mod workbook;

pub use text::ExportText;
pub use transform::{
    export_filename, profile_identifier, profile_url, sanitize_title, ExportTransform,
    FILENAME_TITLE_MAX_CHARS, PROFILE_URL_PREFIX, UNTITLED,
};
pub use workbook::{ExportFile, Sheet, WorkbookModel};
