//! Remote capability interfaces
//!
//! One trait per remote operation so each consumer depends only on what it
//! calls. [`IntakeBackend`] bundles all six for the workflow controller.

use crate::draft::ProjectDraft;
use crate::error::RemoteCallError;
use crate::locale::Locale;
use crate::researcher::{LocalizedDirectory, MatchedResearcher, MatchingId, ResearcherId};
use crate::session::ProjectId;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input of suggest-content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestRequest {
    /// Draft snapshot at request time
    pub draft: ProjectDraft,
    /// Application deadline (draft value or configured default)
    pub deadline: NaiveDate,
    /// Output language
    pub locale: Locale,
}

impl SuggestRequest {
    /// Build from a draft, falling back to `default_deadline`
    #[must_use]
    pub fn from_draft(draft: &ProjectDraft, locale: Locale, default_deadline: NaiveDate) -> Self {
        Self {
            draft: draft.clone(),
            deadline: draft.deadline().unwrap_or(default_deadline),
            locale,
        }
    }
}

/// Output of register-project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Assigned project id
    pub project_id: ProjectId,
    /// Echoed project title
    pub project_title: String,
    /// Candidates embedded in the registration response, if any
    pub researchers: Vec<MatchedResearcher>,
    /// Raw response body
    pub payload: serde_json::Value,
}

/// Output of fetch-matching-results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingResults {
    /// Project id queried
    pub project_id: ProjectId,
    /// Project title
    pub project_title: String,
    /// Project metadata as stored by the backend
    pub project: ProjectDraft,
    /// Candidates in server order
    pub researchers: Vec<MatchedResearcher>,
}

/// suggest-content
#[async_trait]
pub trait ContentSuggester: Send + Sync {
    /// Request suggested background text; may be empty
    async fn suggest_content(&self, request: &SuggestRequest) -> Result<String, RemoteCallError>;
}

/// register-project
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    /// Register a draft for matching
    async fn register_project(&self, draft: &ProjectDraft) -> Result<Registration, RemoteCallError>;
}

/// fetch-matching-results
#[async_trait]
pub trait MatchingSource: Send + Sync {
    /// Fetch matching results for a project
    async fn fetch_matching_results(
        &self,
        project_id: ProjectId,
        locale: Locale,
    ) -> Result<MatchingResults, RemoteCallError>;
}

/// fetch-localized-researcher-fields
#[async_trait]
pub trait ResearcherDirectory: Send + Sync {
    /// Fetch localized fields for a set of researchers
    async fn fetch_localized_fields(
        &self,
        researcher_ids: &[ResearcherId],
    ) -> Result<LocalizedDirectory, RemoteCallError>;
}

/// set-favorite
#[async_trait]
pub trait FavoriteSink: Send + Sync {
    /// Persist a favorite flag
    async fn set_favorite(&self, matching_id: MatchingId, favorite: bool)
        -> Result<(), RemoteCallError>;
}

/// send-offer
#[async_trait]
pub trait OfferSink: Send + Sync {
    /// Send offers to researchers for a project
    async fn send_offer(
        &self,
        project_id: ProjectId,
        researcher_ids: &[ResearcherId],
    ) -> Result<(), RemoteCallError>;
}

/// Every remote capability the intake flow consumes
pub trait IntakeBackend:
    ContentSuggester + ProjectRegistry + MatchingSource + ResearcherDirectory + FavoriteSink + OfferSink
{
}

impl<T> IntakeBackend for T where
    T: ContentSuggester
        + ProjectRegistry
        + MatchingSource
        + ResearcherDirectory
        + FavoriteSink
        + OfferSink
{
}
