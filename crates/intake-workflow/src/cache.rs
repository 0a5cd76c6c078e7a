//! Session-local result cache using moka
//!
//! Keyed by project id. Entries expire after the configured TTL and the
//! cache holds at most `max_entries` projects.

use crate::config::CacheConfig;
use intake_core::{MatchingResults, ProjectDraft, ProjectId, Registration};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// What is remembered about one submitted project
#[derive(Debug, Clone, PartialEq)]
pub struct CachedProject {
    /// Project id
    pub project_id: ProjectId,
    /// Project data as submitted, or as last reported by the backend
    pub project: ProjectDraft,
    /// Registration reply, when the project was submitted in this session
    pub registration: Option<Registration>,
    /// Last matching results fetched
    pub results: Option<MatchingResults>,
}

/// Project cache shared by the controller and its in-flight tickets
#[derive(Debug, Clone)]
pub struct SessionCache {
    inner: Cache<ProjectId, Arc<CachedProject>>,
}

impl SessionCache {
    /// Create cache from config
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_ttl(config.max_entries, config.ttl())
    }

    /// Create cache with explicit bounds
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Remember a freshly registered project
    pub async fn store_registration(&self, project: ProjectDraft, registration: Registration) {
        let project_id = registration.project_id;
        tracing::debug!(%project_id, "caching registration");
        self.inner
            .insert(
                project_id,
                Arc::new(CachedProject {
                    project_id,
                    project,
                    registration: Some(registration),
                    results: None,
                }),
            )
            .await;
    }

    /// Remember fetched matching results, keeping any registration
    pub async fn store_results(&self, results: MatchingResults) {
        let project_id = results.project_id;
        let registration = self
            .inner
            .get(&project_id)
            .await
            .and_then(|cached| cached.registration.clone());
        tracing::debug!(%project_id, researchers = results.researchers.len(), "caching results");
        self.inner
            .insert(
                project_id,
                Arc::new(CachedProject {
                    project_id,
                    project: results.project.clone(),
                    registration,
                    results: Some(results),
                }),
            )
            .await;
    }

    /// Cached entry for a project
    #[must_use]
    pub async fn get(&self, project_id: ProjectId) -> Option<Arc<CachedProject>> {
        self.inner.get(&project_id).await
    }

    /// Cached matching results for a project
    #[must_use]
    pub async fn results(&self, project_id: ProjectId) -> Option<MatchingResults> {
        self.get(project_id).await.and_then(|c| c.results.clone())
    }

    /// Forget a project
    #[inline]
    pub async fn invalidate(&self, project_id: ProjectId) {
        self.inner.invalidate(&project_id).await;
    }
}
