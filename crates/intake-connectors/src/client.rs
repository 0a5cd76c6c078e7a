//! HTTP backend implementing every connector trait

use crate::config::{ConnectorError, HttpBackendConfig};
use crate::http::{check_response, decode, transport_error};
use crate::wire::{
    self, FavoriteBody, LocalizedBody, LocalizedReply, MatchingReply, OfferBody, ProjectBody,
    RegistrationReply, SuggestBody, SuggestReply,
};
use async_trait::async_trait;
use intake_core::{
    ContentSuggester, FavoriteSink, Locale, LocalizedDirectory, MatchingId, MatchingResults,
    MatchingSource, OfferSink, ProjectDraft, ProjectId, ProjectRegistry, Registration,
    RemoteCallError, RemoteOperation, ResearcherDirectory, ResearcherId, SuggestRequest,
};
use reqwest::Method;

/// Connector set backed by one `reqwest` client
///
/// Every request carries the configured timeout; expiry surfaces as
/// [`RemoteCallError::Timeout`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Build client from config
    ///
    /// # Errors
    /// Returns [`ConnectorError::InvalidBaseUrl`] for a non-absolute base URL
    /// and [`ConnectorError::Client`] if the TLS backend fails to initialize
    pub fn new(config: HttpBackendConfig) -> Result<Self, ConnectorError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| ConnectorError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "http backend ready"
        );
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        operation: RemoteOperation,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteCallError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| transport_error(operation, self.config.timeout_ms, &e))?;
        check_response(operation, resp).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: RemoteOperation,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, RemoteCallError> {
        let resp = self.send(operation, builder).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_error(operation, self.config.timeout_ms, &e))?;
        decode(operation, &bytes)
    }
}

#[async_trait]
impl ContentSuggester for HttpBackend {
    async fn suggest_content(&self, request: &SuggestRequest) -> Result<String, RemoteCallError> {
        let body = SuggestBody {
            project: ProjectBody::from_draft(&request.draft),
            application_deadline: request.deadline.format("%Y-%m-%d").to_string(),
            language: request.locale.tag(),
        };
        let builder = self
            .request(Method::POST, &self.config.endpoints.suggest_content)
            .json(&body);
        let reply: SuggestReply = self
            .send_json(RemoteOperation::SuggestContent, builder)
            .await?;
        Ok(reply.into_text())
    }
}

#[async_trait]
impl ProjectRegistry for HttpBackend {
    async fn register_project(&self, draft: &ProjectDraft) -> Result<Registration, RemoteCallError> {
        let operation = RemoteOperation::RegisterProject;
        let builder = self
            .request(Method::POST, &self.config.endpoints.register_project)
            .json(&ProjectBody::from_draft(draft));
        let payload: serde_json::Value = self.send_json(operation, builder).await?;

        let reply: RegistrationReply =
            serde_json::from_value(payload.clone()).map_err(|e| RemoteCallError::Decode {
                operation,
                message: e.to_string(),
            })?;
        let project_id = reply.assigned_id().ok_or_else(|| RemoteCallError::Decode {
            operation,
            message: "reply carries neither project_id nor id".into(),
        })?;

        tracing::info!(project_id, "project registered");
        Ok(Registration {
            project_id: ProjectId(project_id),
            project_title: reply
                .project_title
                .unwrap_or_else(|| draft.title().to_string()),
            researchers: wire::researchers(reply.matched_researchers),
            payload,
        })
    }
}

#[async_trait]
impl MatchingSource for HttpBackend {
    async fn fetch_matching_results(
        &self,
        project_id: ProjectId,
        locale: Locale,
    ) -> Result<MatchingResults, RemoteCallError> {
        let builder = self
            .request(Method::GET, &self.config.endpoints.matching_results)
            .query(&[
                ("project_id", project_id.to_string()),
                ("language", locale.tag().to_string()),
            ])
            .header(reqwest::header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(reqwest::header::PRAGMA, "no-cache");
        let reply: MatchingReply = self
            .send_json(RemoteOperation::FetchMatchingResults, builder)
            .await?;

        let project = reply.project();
        let researchers = wire::researchers(reply.matched_researchers);
        tracing::debug!(
            %project_id,
            researchers = researchers.len(),
            "matching results fetched"
        );
        Ok(MatchingResults {
            project_id,
            project_title: project.title().to_string(),
            project,
            researchers,
        })
    }
}

#[async_trait]
impl ResearcherDirectory for HttpBackend {
    async fn fetch_localized_fields(
        &self,
        researcher_ids: &[ResearcherId],
    ) -> Result<LocalizedDirectory, RemoteCallError> {
        if researcher_ids.is_empty() {
            return Ok(LocalizedDirectory::new());
        }
        let body = LocalizedBody {
            researcher_ids: researcher_ids.iter().map(|id| id.0).collect(),
        };
        let builder = self
            .request(Method::POST, &self.config.endpoints.localized_fields)
            .json(&body);
        let reply: LocalizedReply = self
            .send_json(RemoteOperation::FetchLocalizedFields, builder)
            .await?;
        Ok(reply.into_directory())
    }
}

#[async_trait]
impl FavoriteSink for HttpBackend {
    async fn set_favorite(
        &self,
        matching_id: MatchingId,
        favorite: bool,
    ) -> Result<(), RemoteCallError> {
        let body = FavoriteBody {
            matching_id: matching_id.0,
            favorite_status: favorite,
        };
        let builder = self
            .request(Method::POST, &self.config.endpoints.favorites)
            .json(&body);
        self.send(RemoteOperation::SetFavorite, builder).await?;
        Ok(())
    }
}

#[async_trait]
impl OfferSink for HttpBackend {
    async fn send_offer(
        &self,
        project_id: ProjectId,
        researcher_ids: &[ResearcherId],
    ) -> Result<(), RemoteCallError> {
        let body = OfferBody {
            project_id: project_id.0,
            researcher_ids: researcher_ids.iter().map(|id| id.0).collect(),
        };
        let builder = self
            .request(Method::POST, &self.config.endpoints.offers)
            .json(&body);
        self.send(RemoteOperation::SendOffer, builder).await?;
        tracing::info!(%project_id, offers = researcher_ids.len(), "offers sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_base_url_is_rejected() {
        let err = HttpBackend::new(HttpBackendConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let backend = HttpBackend::new(HttpBackendConfig::new("http://localhost:8000/api/")).unwrap();
        assert_eq!(backend.url("/favorites"), "http://localhost:8000/api/favorites");
        assert_eq!(backend.url("offers"), "http://localhost:8000/api/offers");
    }
}
