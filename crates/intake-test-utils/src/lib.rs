//! Testing utilities for the intake workspace
//!
//! Shared fixtures, a scripted in-memory backend and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use intake_core::{
    ContentSuggester, FavoriteSink, LocalizedDirectory, MatchedResearcher, MatchingId,
    MatchingResults, MatchingSource, OfferSink, ProjectDraft, ProjectId, ProjectRegistry,
    Registration, RemoteCallError, RemoteOperation, ResearcherDirectory, ResearcherId,
    ResearcherLevel, SuggestRequest, UniversityCatalog, UniversitySelection,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Install a test-writer tracing subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn sample_catalog() -> UniversityCatalog {
    UniversityCatalog::from_json_str(
        r#"{
            "Hokkaido": ["北海道大学", "小樽商科大学"],
            "Kanto": ["東京大学", "東京工業大学", "筑波大学"],
            "Kansai": ["京都大学", "大阪大学"]
        }"#,
    )
    .expect("fixture catalog is valid")
}

pub fn complete_draft() -> ProjectDraft {
    ProjectDraft::new()
        .with_title("次世代電池材料の共同研究")
        .with_background("全固体電池の電解質材料について知見を持つ研究者を探しています。")
        .with_universities(UniversitySelection::Selected(
            ["東京大学".to_string(), "京都大学".to_string()].into(),
        ))
        .with_levels([ResearcherLevel::Professor, ResearcherLevel::AssociateProfessor])
}

pub fn sample_researcher(n: i64) -> MatchedResearcher {
    MatchedResearcher::new(MatchingId(n), Some(ResearcherId(1000 + n)))
        .with_name(format!("研究者 {n}"))
        .with_post("東京大学", "工学系研究科", "教授")
        .with_reason(format!("reason {n}"))
}

pub fn sample_researchers(count: i64) -> Vec<MatchedResearcher> {
    (1..=count).map(sample_researcher).collect()
}

pub fn sample_results(project_id: ProjectId, count: i64) -> MatchingResults {
    let draft = complete_draft();
    MatchingResults {
        project_id,
        project_title: draft.title().to_string(),
        project: draft,
        researchers: sample_researchers(count),
    }
}

type Scripted<T> = Mutex<VecDeque<Result<T, RemoteCallError>>>;

/// In-memory backend with scripted responses and a call log
///
/// Each operation pops its scripted queue first and falls back to a
/// successful default when the queue is empty.
#[derive(Default)]
pub struct ScriptedBackend {
    log: Mutex<Vec<RemoteOperation>>,
    suggestions: Scripted<String>,
    registrations: Scripted<Registration>,
    results: Mutex<HashMap<ProjectId, VecDeque<Result<MatchingResults, RemoteCallError>>>>,
    localized: Scripted<LocalizedDirectory>,
    favorites: Scripted<()>,
    offers: Scripted<()>,
    favorite_calls: Mutex<Vec<(MatchingId, bool)>>,
    offer_calls: Mutex<Vec<(ProjectId, Vec<ResearcherId>)>>,
    registered: Mutex<Vec<ProjectDraft>>,
    favorite_gate: Mutex<Option<Arc<Semaphore>>>,
    next_project: AtomicI64,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            next_project: AtomicI64::new(1),
            ..Self::default()
        }
    }

    pub fn push_suggestion(&self, response: Result<String, RemoteCallError>) -> &Self {
        self.suggestions.lock().push_back(response);
        self
    }

    pub fn push_registration(&self, response: Result<Registration, RemoteCallError>) -> &Self {
        self.registrations.lock().push_back(response);
        self
    }

    pub fn push_results(
        &self,
        project_id: ProjectId,
        response: Result<MatchingResults, RemoteCallError>,
    ) -> &Self {
        self.results
            .lock()
            .entry(project_id)
            .or_default()
            .push_back(response);
        self
    }

    pub fn push_localized(&self, response: Result<LocalizedDirectory, RemoteCallError>) -> &Self {
        self.localized.lock().push_back(response);
        self
    }

    pub fn push_favorite(&self, response: Result<(), RemoteCallError>) -> &Self {
        self.favorites.lock().push_back(response);
        self
    }

    pub fn push_offer(&self, response: Result<(), RemoteCallError>) -> &Self {
        self.offers.lock().push_back(response);
        self
    }

    /// Hold set-favorite responses until permits are released
    pub fn gate_favorites(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.favorite_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn calls(&self, operation: RemoteOperation) -> usize {
        self.log.lock().iter().filter(|op| **op == operation).count()
    }

    pub fn total_calls(&self) -> usize {
        self.log.lock().len()
    }

    pub fn favorite_calls(&self) -> Vec<(MatchingId, bool)> {
        self.favorite_calls.lock().clone()
    }

    pub fn offer_calls(&self) -> Vec<(ProjectId, Vec<ResearcherId>)> {
        self.offer_calls.lock().clone()
    }

    pub fn registered_drafts(&self) -> Vec<ProjectDraft> {
        self.registered.lock().clone()
    }

    fn record(&self, operation: RemoteOperation) {
        self.log.lock().push(operation);
    }

    fn pop<T>(queue: &Scripted<T>) -> Option<Result<T, RemoteCallError>> {
        queue.lock().pop_front()
    }
}

#[async_trait]
impl ContentSuggester for ScriptedBackend {
    async fn suggest_content(&self, request: &SuggestRequest) -> Result<String, RemoteCallError> {
        self.record(RemoteOperation::SuggestContent);
        Self::pop(&self.suggestions)
            .unwrap_or_else(|| Ok(format!("「{} の改善案」", request.draft.title())))
    }
}

#[async_trait]
impl ProjectRegistry for ScriptedBackend {
    async fn register_project(&self, draft: &ProjectDraft) -> Result<Registration, RemoteCallError> {
        self.record(RemoteOperation::RegisterProject);
        self.registered.lock().push(draft.clone());
        Self::pop(&self.registrations).unwrap_or_else(|| {
            let id = ProjectId(self.next_project.fetch_add(1, Ordering::SeqCst));
            Ok(Registration {
                project_id: id,
                project_title: draft.title().to_string(),
                researchers: Vec::new(),
                payload: serde_json::json!({ "project_id": id.0 }),
            })
        })
    }
}

#[async_trait]
impl MatchingSource for ScriptedBackend {
    async fn fetch_matching_results(
        &self,
        project_id: ProjectId,
        _locale: intake_core::Locale,
    ) -> Result<MatchingResults, RemoteCallError> {
        self.record(RemoteOperation::FetchMatchingResults);
        let scripted = self
            .results
            .lock()
            .get_mut(&project_id)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| Ok(sample_results(project_id, 3)))
    }
}

#[async_trait]
impl ResearcherDirectory for ScriptedBackend {
    async fn fetch_localized_fields(
        &self,
        _researcher_ids: &[ResearcherId],
    ) -> Result<LocalizedDirectory, RemoteCallError> {
        self.record(RemoteOperation::FetchLocalizedFields);
        Self::pop(&self.localized).unwrap_or_else(|| Ok(LocalizedDirectory::new()))
    }
}

#[async_trait]
impl FavoriteSink for ScriptedBackend {
    async fn set_favorite(
        &self,
        matching_id: MatchingId,
        favorite: bool,
    ) -> Result<(), RemoteCallError> {
        self.record(RemoteOperation::SetFavorite);
        self.favorite_calls.lock().push((matching_id, favorite));
        let scripted = Self::pop(&self.favorites);
        let gate = self.favorite_gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("favorite gate closed").forget();
        }
        scripted.unwrap_or(Ok(()))
    }
}

#[async_trait]
impl OfferSink for ScriptedBackend {
    async fn send_offer(
        &self,
        project_id: ProjectId,
        researcher_ids: &[ResearcherId],
    ) -> Result<(), RemoteCallError> {
        self.record(RemoteOperation::SendOffer);
        self.offer_calls
            .lock()
            .push((project_id, researcher_ids.to_vec()));
        Self::pop(&self.offers).unwrap_or(Ok(()))
    }
}

pub fn status_error(operation: RemoteOperation, status: u16) -> RemoteCallError {
    RemoteCallError::status(operation, status, "scripted failure")
}
