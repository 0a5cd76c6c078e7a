//! Workflow controller
//!
//! Owns the draft, the workflow state and the live research session.
//! Remote work is split in three steps so a caller can drive it from any
//! task: a `confirm_*`/`begin_*` call stamps a ticket with an epoch,
//! `ticket.run(&backend)` performs the remote calls without touching the
//! controller, and `finish_*` applies the outcome only when the epoch (and
//! state) still match. Assist and submit share the flow epoch; results
//! loads carry their own, so a load never invalidates a draft-flow call.
//! [`WorkflowController::reset`] bumps both, so every outcome issued
//! before it is discarded as stale.

use crate::cache::SessionCache;
use crate::completion::{await_completion, Completion};
use crate::config::{CompletionPolicy, WorkflowConfig};
use crate::error::WorkflowError;
use crate::session::LiveSession;
use crate::state::{next_state, WorkflowAction, WorkflowState};
use chrono::NaiveDate;
use intake_core::{
    CatalogLabels, ContentSuggester, FavoriteSink, Industry, IntakeBackend, LabelResolver, Locale,
    LocalizedDirectory, MatchingId, MatchingResults, MatchingSource, NoticeBoard, NoticeKind,
    ProjectDraft, ProjectId, ProjectRegistry, Registration, RemoteCallError,
    ResearchSession, ResearcherDirectory, ResearcherId, ResearcherLevel, SuggestRequest,
    UniversityCatalog, UniversitySelection,
};
use intake_export::{ExportFile, ExportText, ExportTransform};
use intake_favorites::{FavoriteStore, ToggleOutcome};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Result of the last AI assist
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnosis {
    /// Cleaned suggestion text
    Suggested(String),
    /// Call succeeded with nothing to suggest
    Empty,
    /// Call failed; the failure text is shown instead
    Failed(RemoteCallError),
}

impl Diagnosis {
    /// Suggestion text, if any
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Suggested(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Text to display for this diagnosis
    #[must_use]
    pub fn display_text<'a>(&'a self, config: &'a WorkflowConfig) -> &'a str {
        match self {
            Self::Suggested(text) => text,
            Self::Empty => &config.messages.assist_empty,
            Self::Failed(_) => &config.messages.assist_failure,
        }
    }
}

/// Trim a suggestion and strip its surrounding bracket punctuation
#[must_use]
pub fn clean_suggestion(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['「', '『'])
        .trim_end_matches(['」', '』'])
        .trim()
        .to_string()
}

/// Stamped suggest-content request
#[derive(Debug, Clone)]
#[must_use]
pub struct AssistTicket {
    epoch: u64,
    request: SuggestRequest,
}

/// Finished suggest-content call
#[derive(Debug, Clone)]
pub struct AssistOutcome {
    epoch: u64,
    result: Result<String, RemoteCallError>,
}

impl AssistTicket {
    /// Request that will be sent
    #[inline]
    #[must_use]
    pub fn request(&self) -> &SuggestRequest {
        &self.request
    }

    /// Call suggest-content
    pub async fn run<S>(self, suggester: &S) -> AssistOutcome
    where
        S: ContentSuggester + ?Sized,
    {
        let result = suggester.suggest_content(&self.request).await;
        AssistOutcome {
            epoch: self.epoch,
            result,
        }
    }
}

/// Stamped registration request
#[derive(Debug, Clone)]
#[must_use]
pub struct SubmitTicket {
    epoch: u64,
    draft: ProjectDraft,
    policy: CompletionPolicy,
    locale: Locale,
    cache: SessionCache,
}

/// Finished registration plus completion wait
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    epoch: u64,
    result: Result<(Registration, Completion), RemoteCallError>,
}

impl SubmitOutcome {
    /// Registered project, when registration succeeded
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.result.as_ref().ok().map(|(reg, _)| reg.project_id)
    }
}

impl SubmitTicket {
    /// Draft snapshot that will be registered
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    /// Register the draft and wait for matching to complete
    pub async fn run<S>(self, backend: &S) -> SubmitOutcome
    where
        S: ProjectRegistry + MatchingSource + ?Sized,
    {
        let result = self.register(backend).await;
        SubmitOutcome {
            epoch: self.epoch,
            result,
        }
    }

    async fn register<S>(&self, backend: &S) -> Result<(Registration, Completion), RemoteCallError>
    where
        S: ProjectRegistry + MatchingSource + ?Sized,
    {
        let registration = backend.register_project(&self.draft).await?;
        let project_id = registration.project_id;
        tracing::info!(%project_id, "project registered");
        self.cache
            .store_registration(self.draft.clone(), registration.clone())
            .await;

        let completion = await_completion(&self.policy, backend, project_id, self.locale).await;
        if let Completion::Ready(results) = &completion {
            self.cache.store_results(results.clone()).await;
        }
        Ok((registration, completion))
    }
}

/// Stamped results load
#[derive(Debug, Clone)]
#[must_use]
pub struct ResultsTicket {
    epoch: u64,
    project_id: ProjectId,
    locale: Locale,
    cache: SessionCache,
}

/// Finished results load
#[derive(Debug, Clone)]
pub struct ResultsOutcome {
    epoch: u64,
    project_id: ProjectId,
    result: Result<(MatchingResults, LocalizedDirectory), RemoteCallError>,
}

impl ResultsOutcome {
    /// Project the results belong to
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl ResultsTicket {
    /// Project being loaded
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Load results (cache first) and localized fields
    pub async fn run<S>(self, backend: &S) -> ResultsOutcome
    where
        S: MatchingSource + ResearcherDirectory + ?Sized,
    {
        let result = self.load(backend).await;
        ResultsOutcome {
            epoch: self.epoch,
            project_id: self.project_id,
            result,
        }
    }

    async fn load<S>(
        &self,
        backend: &S,
    ) -> Result<(MatchingResults, LocalizedDirectory), RemoteCallError>
    where
        S: MatchingSource + ResearcherDirectory + ?Sized,
    {
        let project_id = self.project_id;
        let results = match self.cache.results(project_id).await {
            Some(cached) if !cached.researchers.is_empty() => {
                tracing::debug!(%project_id, "matching results served from cache");
                cached
            }
            _ => {
                let fetched = backend.fetch_matching_results(project_id, self.locale).await?;
                self.cache.store_results(fetched.clone()).await;
                fetched
            }
        };

        let localized = if self.locale.needs_localized_fields() {
            let ids: Vec<ResearcherId> =
                results.researchers.iter().map(|r| r.researcher_id).collect();
            match backend.fetch_localized_fields(&ids).await {
                Ok(directory) => directory,
                Err(error) => {
                    tracing::warn!(%project_id, %error, "localized fields unavailable");
                    LocalizedDirectory::new()
                }
            }
        } else {
            LocalizedDirectory::new()
        };

        Ok((results, localized))
    }
}

/// Drives one intake session: draft editing, assist, submission and results
pub struct WorkflowController<B: IntakeBackend + 'static> {
    backend: Arc<B>,
    config: WorkflowConfig,
    catalog: UniversityCatalog,
    labels: Arc<dyn LabelResolver>,
    export_text: ExportText,
    notices: NoticeBoard,
    cache: SessionCache,
    state: WorkflowState,
    draft: ProjectDraft,
    diagnosis: Option<Diagnosis>,
    live: Option<LiveSession>,
    pending_results: Option<ProjectId>,
    completed: Option<ProjectId>,
    flow_epoch: u64,
    results_epoch: u64,
}

impl<B: IntakeBackend + 'static> std::fmt::Debug for WorkflowController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("diagnosis", &self.diagnosis)
            .field("live", &self.live)
            .field("pending_results", &self.pending_results)
            .field("completed", &self.completed)
            .field("flow_epoch", &self.flow_epoch)
            .field("results_epoch", &self.results_epoch)
            .finish_non_exhaustive()
    }
}

impl<B: IntakeBackend + 'static> WorkflowController<B> {
    /// Create controller with labels and export text for the configured locale
    #[must_use]
    pub fn new(backend: Arc<B>, catalog: UniversityCatalog, config: WorkflowConfig) -> Self {
        let locale = config.locale;
        let export_text = match locale {
            Locale::Ja => ExportText::japanese(),
            Locale::En => ExportText::default(),
        };
        Self {
            backend,
            cache: SessionCache::new(&config.cache),
            catalog,
            labels: Arc::new(CatalogLabels::new(locale)),
            export_text,
            notices: NoticeBoard::new(),
            state: WorkflowState::default(),
            draft: ProjectDraft::new(),
            diagnosis: None,
            live: None,
            pending_results: None,
            completed: None,
            flow_epoch: 0,
            results_epoch: 0,
            config,
        }
    }

    /// With a custom label resolver
    #[must_use]
    pub fn with_labels(mut self, labels: Arc<dyn LabelResolver>) -> Self {
        self.labels = labels;
        self
    }

    /// With custom export text
    #[must_use]
    pub fn with_export_text(mut self, text: ExportText) -> Self {
        self.export_text = text;
        self
    }

    /// With a shared notice board
    #[must_use]
    pub fn with_notices(mut self, notices: NoticeBoard) -> Self {
        self.notices = notices;
        self
    }

    // ---- accessors ----

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    /// Last assist result while it is on display
    #[inline]
    #[must_use]
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnosis.as_ref()
    }

    /// Notice board
    #[inline]
    #[must_use]
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Loaded research session
    #[inline]
    #[must_use]
    pub fn live_session(&self) -> Option<&LiveSession> {
        self.live.as_ref()
    }

    /// Project registered by this instance
    #[inline]
    #[must_use]
    pub fn completed_project(&self) -> Option<ProjectId> {
        self.completed
    }

    /// Project whose results are being loaded
    #[inline]
    #[must_use]
    pub fn pending_results(&self) -> Option<ProjectId> {
        self.pending_results
    }

    /// Result cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// University catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &UniversityCatalog {
        &self.catalog
    }

    fn transition(&mut self, action: WorkflowAction) -> Result<WorkflowState, WorkflowError> {
        let from = self.state;
        let Some(to) = next_state(from, action) else {
            tracing::debug!(%from, %action, "illegal transition");
            return Err(WorkflowError::IllegalTransition { from, action });
        };
        if to != from {
            tracing::debug!(%from, %to, %action, "workflow transition");
        }
        self.state = to;
        Ok(to)
    }

    // ---- draft editing ----

    fn edit(&mut self, apply: impl FnOnce(&mut ProjectDraft)) -> Result<(), WorkflowError> {
        self.transition(WorkflowAction::Edit)?;
        apply(&mut self.draft);
        Ok(())
    }

    /// Set title (clipped)
    pub fn set_title(&mut self, title: &str) -> Result<(), WorkflowError> {
        self.edit(|d| d.set_title(title))
    }

    /// Set background (clipped)
    pub fn set_background(&mut self, background: &str) -> Result<(), WorkflowError> {
        self.edit(|d| d.set_background(background))
    }

    /// Set or clear the industry
    pub fn set_industry(&mut self, industry: Option<Industry>) -> Result<(), WorkflowError> {
        self.edit(|d| d.set_industry(industry))
    }

    /// Set business description (clipped)
    pub fn set_business_description(&mut self, text: &str) -> Result<(), WorkflowError> {
        self.edit(|d| d.set_business_description(text))
    }

    /// Set or clear the application deadline
    pub fn set_deadline(&mut self, deadline: Option<NaiveDate>) -> Result<(), WorkflowError> {
        self.edit(|d| d.set_deadline(deadline))
    }

    /// Add or remove one university; returns whether it is now selected
    ///
    /// Selecting the last missing university collapses to the sentinel,
    /// deselecting one from the sentinel expands it first.
    pub fn toggle_university(&mut self, name: &str) -> Result<bool, WorkflowError> {
        self.transition(WorkflowAction::Edit)?;
        let mut selected = self.draft.universities().expand(&self.catalog);
        let now_selected = if selected.remove(name) {
            false
        } else {
            selected.insert(name.to_string());
            true
        };
        self.draft.select_universities(selected, &self.catalog);
        Ok(now_selected)
    }

    /// Select every university, or none
    pub fn select_all_universities(&mut self, selected: bool) -> Result<(), WorkflowError> {
        self.edit(|d| {
            if selected {
                d.select_all_universities();
            } else {
                d.set_universities(UniversitySelection::none());
            }
        })
    }

    /// Selected universities with the sentinel expanded
    #[must_use]
    pub fn selected_universities(&self) -> BTreeSet<String> {
        self.draft.universities().expand(&self.catalog)
    }

    /// Add or remove one researcher level
    pub fn toggle_level(&mut self, level: ResearcherLevel) -> Result<(), WorkflowError> {
        self.edit(|d| d.toggle_level(level))
    }

    /// Select every researcher level, or none
    pub fn select_all_levels(&mut self, selected: bool) -> Result<(), WorkflowError> {
        self.edit(|d| d.select_all_levels(selected))
    }

    /// Replace the whole draft
    pub fn load_draft(&mut self, draft: ProjectDraft) -> Result<(), WorkflowError> {
        self.edit(|d| *d = draft)
    }

    // ---- AI assist ----

    /// Ask for an AI assist; validates title and background first
    pub fn request_assist(&mut self) -> Result<(), WorkflowError> {
        self.ensure(WorkflowAction::RequestAssist)?;
        if let Err(err) = self.draft.check_assist() {
            self.notices.push(NoticeKind::Validation, err.to_string());
            return Err(err.into());
        }
        self.transition(WorkflowAction::RequestAssist)?;
        Ok(())
    }

    /// Back out of the assist prompt
    pub fn cancel_assist(&mut self) -> Result<(), WorkflowError> {
        self.transition(WorkflowAction::CancelAssist)?;
        Ok(())
    }

    /// Confirm the assist prompt and stamp a suggest-content ticket
    pub fn confirm_assist(&mut self) -> Result<AssistTicket, WorkflowError> {
        self.transition(WorkflowAction::ConfirmAssist)?;
        self.diagnosis = None;
        self.flow_epoch += 1;
        Ok(AssistTicket {
            epoch: self.flow_epoch,
            request: SuggestRequest::from_draft(
                &self.draft,
                self.config.locale,
                self.config.default_deadline,
            ),
        })
    }

    /// Apply a suggest-content outcome
    pub fn finish_assist(&mut self, outcome: AssistOutcome) -> Result<&Diagnosis, WorkflowError> {
        if outcome.epoch != self.flow_epoch || self.state != WorkflowState::Diagnosing {
            tracing::debug!(
                epoch = outcome.epoch,
                current = self.flow_epoch,
                "stale assist outcome"
            );
            return Err(WorkflowError::StaleResponse);
        }
        let diagnosis = match outcome.result {
            Ok(raw) => {
                let cleaned = clean_suggestion(&raw);
                if cleaned.is_empty() {
                    Diagnosis::Empty
                } else {
                    Diagnosis::Suggested(cleaned)
                }
            }
            Err(error) => {
                tracing::warn!(%error, "assist degraded to failure text");
                self.notices
                    .push(NoticeKind::Degraded, self.config.messages.assist_failure.clone());
                Diagnosis::Failed(error)
            }
        };
        self.transition(WorkflowAction::AssistSettled)?;
        let diagnosis = self.diagnosis.insert(diagnosis);
        Ok(&*diagnosis)
    }

    /// Confirm, call and apply an AI assist in one go
    pub async fn run_assist(&mut self) -> Result<&Diagnosis, WorkflowError> {
        let ticket = self.confirm_assist()?;
        let backend = Arc::clone(&self.backend);
        let outcome = ticket.run(&*backend).await;
        self.finish_assist(outcome)
    }

    /// Replace the background with the suggestion; returns whether it changed
    pub fn apply_suggestion(&mut self) -> Result<bool, WorkflowError> {
        self.transition(WorkflowAction::ApplySuggestion)?;
        let applied = match self.diagnosis.take() {
            Some(Diagnosis::Suggested(text)) => {
                self.draft.set_background(&text);
                true
            }
            _ => false,
        };
        Ok(applied)
    }

    /// Close the suggestion without changing the draft
    pub fn dismiss_suggestion(&mut self) -> Result<(), WorkflowError> {
        self.transition(WorkflowAction::DismissSuggestion)?;
        self.diagnosis = None;
        Ok(())
    }

    // ---- submission ----

    /// Ask to submit; validates every required field first
    pub fn request_submit(&mut self) -> Result<(), WorkflowError> {
        self.ensure(WorkflowAction::RequestSubmit)?;
        if let Err(err) = self.draft.check_submission() {
            self.notices.push(NoticeKind::Validation, err.to_string());
            return Err(err.into());
        }
        self.transition(WorkflowAction::RequestSubmit)?;
        Ok(())
    }

    /// Back out of the submit prompt
    pub fn cancel_submit(&mut self) -> Result<(), WorkflowError> {
        self.transition(WorkflowAction::CancelSubmit)?;
        Ok(())
    }

    /// Confirm submission and stamp a registration ticket
    pub fn confirm_submit(&mut self) -> Result<SubmitTicket, WorkflowError> {
        self.transition(WorkflowAction::ConfirmSubmit)?;
        self.flow_epoch += 1;
        Ok(SubmitTicket {
            epoch: self.flow_epoch,
            draft: self.draft.clone(),
            policy: self.config.completion.clone(),
            locale: self.config.locale,
            cache: self.cache.clone(),
        })
    }

    /// Apply a registration outcome
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Result<ProjectId, WorkflowError> {
        if outcome.epoch != self.flow_epoch || self.state != WorkflowState::Researching {
            tracing::debug!(
                epoch = outcome.epoch,
                current = self.flow_epoch,
                "stale submit outcome"
            );
            return Err(WorkflowError::StaleResponse);
        }
        match outcome.result {
            Ok((registration, completion)) => {
                if completion.is_exhausted() {
                    self.notices.push(
                        NoticeKind::Degraded,
                        self.config.messages.completion_pending.clone(),
                    );
                }
                self.transition(WorkflowAction::RegistrationSucceeded)?;
                self.completed = Some(registration.project_id);
                Ok(registration.project_id)
            }
            Err(error) => {
                tracing::warn!(%error, "registration failed");
                self.notices.push(
                    NoticeKind::RemoteCall,
                    self.config.messages.registration_failed.clone(),
                );
                self.transition(WorkflowAction::RegistrationFailed)?;
                Err(error.into())
            }
        }
    }

    /// Confirm, register and complete in one go
    pub async fn run_submit(&mut self) -> Result<ProjectId, WorkflowError> {
        let ticket = self.confirm_submit()?;
        let backend = Arc::clone(&self.backend);
        let outcome = ticket.run(&*backend).await;
        self.finish_submit(outcome)
    }

    // ---- results ----

    /// Start loading results for a project, superseding any earlier load
    pub fn begin_results(&mut self, project_id: ProjectId) -> ResultsTicket {
        self.results_epoch += 1;
        self.pending_results = Some(project_id);
        tracing::debug!(%project_id, epoch = self.results_epoch, "loading matching results");
        ResultsTicket {
            epoch: self.results_epoch,
            project_id,
            locale: self.config.locale,
            cache: self.cache.clone(),
        }
    }

    /// Apply a results outcome, replacing the live session
    pub fn finish_results(&mut self, outcome: ResultsOutcome) -> Result<&LiveSession, WorkflowError> {
        if outcome.epoch != self.results_epoch
            || self.pending_results != Some(outcome.project_id)
        {
            tracing::debug!(
                project_id = %outcome.project_id,
                epoch = outcome.epoch,
                current = self.results_epoch,
                "stale results discarded"
            );
            return Err(WorkflowError::StaleResponse);
        }
        self.pending_results = None;

        let (results, localized) = match outcome.result {
            Ok(loaded) => loaded,
            Err(error) => {
                tracing::warn!(project_id = %outcome.project_id, %error, "results load failed");
                self.notices
                    .push(NoticeKind::RemoteCall, self.config.messages.results_failed.clone());
                return Err(error.into());
            }
        };

        let session = ResearchSession::new(
            results.project_id,
            results.project_title,
            results.project,
            results.researchers,
        );
        let sink: Arc<dyn FavoriteSink> = self.backend.clone();
        let favorites =
            FavoriteStore::seeded(sink, self.notices.clone(), &session.initial_favorites())
                .with_rollback_message(self.config.messages.favorite_failed.clone());
        tracing::info!(
            project_id = %session.project_id,
            researchers = session.len(),
            "research session loaded"
        );
        let live = self.live.insert(LiveSession::new(session, favorites, localized));
        Ok(&*live)
    }

    /// Load results for a project in one go
    pub async fn load_results(&mut self, project_id: ProjectId) -> Result<&LiveSession, WorkflowError> {
        let ticket = self.begin_results(project_id);
        let backend = Arc::clone(&self.backend);
        let outcome = ticket.run(&*backend).await;
        self.finish_results(outcome)
    }

    // ---- session actions ----

    fn session(&self) -> Result<&LiveSession, WorkflowError> {
        self.live.as_ref().ok_or(WorkflowError::NoSession)
    }

    /// Toggle a favorite through the optimistic store
    pub async fn toggle_favorite(
        &self,
        matching_id: MatchingId,
    ) -> Result<ToggleOutcome, WorkflowError> {
        let live = self.session()?;
        if live.session().find(matching_id).is_none() {
            return Err(WorkflowError::UnknownMatching(matching_id));
        }
        let store = Arc::clone(live.favorites());
        Ok(store.toggle(matching_id).await)
    }

    /// Favorited matchings of the live session
    pub fn favorites(&self) -> Result<Vec<MatchingId>, WorkflowError> {
        Ok(self.session()?.favorites().favorites())
    }

    /// Add or remove a researcher from the offer selection
    pub fn toggle_selection(&mut self, researcher_id: ResearcherId) -> Result<bool, WorkflowError> {
        let live = self.live.as_mut().ok_or(WorkflowError::NoSession)?;
        if !live.contains_researcher(researcher_id) {
            return Err(WorkflowError::UnknownResearcher(researcher_id));
        }
        Ok(live.toggle_selection(researcher_id))
    }

    /// Empty the offer selection
    pub fn clear_selection(&mut self) -> Result<(), WorkflowError> {
        self.live
            .as_mut()
            .ok_or(WorkflowError::NoSession)?
            .clear_selection();
        Ok(())
    }

    /// Send offers to the selected researchers; returns how many were sent
    pub async fn send_offer(&mut self) -> Result<usize, WorkflowError> {
        let live = self.session()?;
        let project_id = live.project_id();
        let selection = live.selection();
        if selection.is_empty() {
            tracing::debug!(%project_id, "offer skipped, nothing selected");
            return Ok(0);
        }

        match self.backend.send_offer(project_id, &selection).await {
            Ok(()) => {
                tracing::info!(%project_id, researchers = selection.len(), "offers sent");
                if let Some(live) = self.live.as_mut() {
                    live.clear_selection();
                }
                self.notices
                    .push(NoticeKind::Info, self.config.messages.offer_sent.clone());
                Ok(selection.len())
            }
            Err(error) => {
                tracing::warn!(%project_id, %error, "offer failed");
                self.notices
                    .push(NoticeKind::RemoteCall, self.config.messages.offer_failed.clone());
                Err(error.into())
            }
        }
    }

    /// Build the export workbook for the live session
    pub fn export(&self) -> Result<ExportFile, WorkflowError> {
        let live = self.session()?;
        let session = live.session();
        if session.is_empty() {
            return Err(WorkflowError::NothingToExport);
        }
        let transform = ExportTransform::new(&*self.labels, &self.catalog, &self.export_text)
            .with_locale(self.config.locale)
            .with_localized(live.localized());
        Ok(transform.export(&session.submitted, session, &live.favorite_set()))
    }

    // ---- lifecycle ----

    /// Start over with an empty draft; in-flight outcomes become stale
    pub fn reset(&mut self) {
        self.flow_epoch += 1;
        self.results_epoch += 1;
        let abandoned = self.state.is_busy() || self.pending_results.is_some();
        tracing::debug!(from = %self.state, abandoned, "workflow reset");
        self.state = WorkflowState::Drafting;
        self.draft = ProjectDraft::new();
        self.diagnosis = None;
        self.live = None;
        self.pending_results = None;
        self.completed = None;
    }

    fn ensure(&self, action: WorkflowAction) -> Result<(), WorkflowError> {
        match next_state(self.state, action) {
            Some(_) => Ok(()),
            None => Err(WorkflowError::IllegalTransition {
                from: self.state,
                action,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_brackets_are_stripped() {
        assert_eq!(clean_suggestion("  「改善案です」 \n"), "改善案です");
        assert_eq!(clean_suggestion("『 quoted 』"), "quoted");
        assert_eq!(clean_suggestion("plain"), "plain");
        assert_eq!(clean_suggestion(" 「」 "), "");
    }

    #[test]
    fn diagnosis_display_text() {
        let config = WorkflowConfig::default();
        let failed = Diagnosis::Failed(RemoteCallError::transport(
            intake_core::RemoteOperation::SuggestContent,
            "down",
        ));
        assert_eq!(failed.display_text(&config), config.messages.assist_failure);
        assert_eq!(Diagnosis::Empty.display_text(&config), config.messages.assist_empty);
        assert_eq!(Diagnosis::Suggested("x".into()).suggestion(), Some("x"));
        assert_eq!(failed.suggestion(), None);
    }
}
