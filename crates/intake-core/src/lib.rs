//! Intake Core - data model and remote boundaries
//!
//! Defines everything the intake workflow shares:
//! - The project draft and its editing rules
//! - Closed vocabularies (researcher levels, industries, universities)
//! - Matched researchers and research sessions
//! - Capability traits for the six remote operations
//! - The error taxonomy and the notice board
//!
//! # Example
//!
//! ```rust
//! use intake_core::{ProjectDraft, RequiredField, ResearcherLevel, UniversitySelection};
//!
//! let draft = ProjectDraft::new()
//!     .with_title("Battery recycling")
//!     .with_background("Looking for electrochemistry expertise");
//! assert_eq!(
//!     draft.check_submission().unwrap_err().missing,
//!     vec![RequiredField::Universities, RequiredField::ResearcherLevels]
//! );
//!
//! let draft = draft
//!     .with_universities(UniversitySelection::All)
//!     .with_levels([ResearcherLevel::Professor]);
//! assert!(draft.check_submission().is_ok());
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod connector;
pub mod draft;
pub mod error;
pub mod locale;
pub mod notice;
pub mod researcher;
pub mod session;

pub use catalog::{CatalogError, Industry, ResearcherLevel, UniversityCatalog, UnknownVariant};
pub use connector::{
    ContentSuggester, FavoriteSink, IntakeBackend, MatchingResults, MatchingSource, OfferSink,
    ProjectRegistry, Registration, ResearcherDirectory, SuggestRequest,
};
pub use draft::{
    ProjectDraft, UniversitySelection, ALL_UNIVERSITIES, BACKGROUND_MAX_CHARS,
    BUSINESS_DESCRIPTION_MAX_CHARS, LEGACY_ALL_UNIVERSITIES, TITLE_MAX_CHARS,
};
pub use error::{RemoteCallError, RemoteOperation, RequiredField, ValidationError};
pub use locale::{CatalogLabels, LabelResolver, Locale};
pub use notice::{Notice, NoticeBoard, NoticeId, NoticeKind};
pub use researcher::{
    FieldResolver, LocalizedDirectory, LocalizedFields, MatchedResearcher, MatchingId,
    ResearcherField, ResearcherId, FIELD_PLACEHOLDER,
};
pub use session::{FavoriteSet, ProjectId, ResearchSession};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
