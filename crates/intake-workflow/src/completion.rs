//! Researching → Completed signalling
//!
//! [`CompletionPolicy::FixedDelay`] waits a constant settling delay.
//! [`CompletionPolicy::Poll`] re-queries fetch-matching-results until the
//! list is non-empty, sleeping with exponential backoff between attempts.

use crate::config::CompletionPolicy;
use intake_core::{Locale, MatchingResults, MatchingSource, ProjectId};
use std::time::Duration;

/// How completion was reached
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Fixed delay elapsed
    Settled,
    /// Polling found researchers
    Ready(MatchingResults),
    /// Polling gave up
    Exhausted {
        /// Attempts made
        attempts: u32,
    },
}

impl Completion {
    /// Check whether polling gave up
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Next backoff interval, capped
#[must_use]
pub fn next_interval(current: Duration, factor: f64, max: Duration) -> Duration {
    current.mul_f64(factor).min(max)
}

/// Wait for matching to complete under `policy`
pub async fn await_completion<M>(
    policy: &CompletionPolicy,
    source: &M,
    project_id: ProjectId,
    locale: Locale,
) -> Completion
where
    M: MatchingSource + ?Sized,
{
    match policy {
        CompletionPolicy::FixedDelay { delay_ms } => {
            tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            Completion::Settled
        }
        CompletionPolicy::Poll {
            interval_ms,
            max_attempts,
            backoff_factor,
            max_interval_ms,
        } => {
            let max_interval = Duration::from_millis(*max_interval_ms);
            let mut interval = Duration::from_millis(*interval_ms);

            for attempt in 1..=*max_attempts {
                match source.fetch_matching_results(project_id, locale).await {
                    Ok(results) if !results.researchers.is_empty() => {
                        tracing::debug!(%project_id, attempt, "matching completed");
                        return Completion::Ready(results);
                    }
                    Ok(_) => tracing::debug!(%project_id, attempt, "matching not ready"),
                    Err(error) => {
                        tracing::warn!(%project_id, attempt, %error, "completion poll failed");
                    }
                }
                if attempt < *max_attempts {
                    tokio::time::sleep(interval).await;
                    interval = next_interval(interval, *backoff_factor, max_interval);
                }
            }

            tracing::warn!(%project_id, attempts = *max_attempts, "matching completion not observed");
            Completion::Exhausted {
                attempts: *max_attempts,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{ProjectDraft, RemoteOperation};
    use intake_test_utils::{sample_results, status_error, ScriptedBackend};

    fn empty(project_id: ProjectId) -> MatchingResults {
        MatchingResults {
            project_id,
            project_title: String::new(),
            project: ProjectDraft::new(),
            researchers: Vec::new(),
        }
    }

    #[test]
    fn backoff_is_capped() {
        let max = Duration::from_millis(350);
        let a = next_interval(Duration::from_millis(100), 2.0, max);
        let b = next_interval(a, 2.0, max);
        assert_eq!(a, Duration::from_millis(200));
        assert_eq!(b, max);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_settles_without_calls() {
        let backend = ScriptedBackend::new();
        let started = tokio::time::Instant::now();
        let completion = await_completion(
            &CompletionPolicy::fixed(Duration::from_secs(3)),
            &backend,
            ProjectId(1),
            Locale::Ja,
        )
        .await;

        assert_eq!(completion, Completion::Settled);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_retries_until_researchers_appear() {
        let backend = ScriptedBackend::new();
        let id = ProjectId(4);
        backend
            .push_results(id, Ok(empty(id)))
            .push_results(id, Err(status_error(RemoteOperation::FetchMatchingResults, 502)))
            .push_results(id, Ok(sample_results(id, 2)));

        let policy = CompletionPolicy::poll(Duration::from_millis(100), 5, Duration::from_secs(1));
        let completion = await_completion(&policy, &backend, id, Locale::Ja).await;

        match completion {
            Completion::Ready(results) => assert_eq!(results.researchers.len(), 2),
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(backend.calls(RemoteOperation::FetchMatchingResults), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_exhaustion_is_reported() {
        let backend = ScriptedBackend::new();
        let id = ProjectId(9);
        for _ in 0..3 {
            backend.push_results(id, Ok(empty(id)));
        }

        let policy = CompletionPolicy::poll(Duration::from_millis(10), 3, Duration::from_millis(40));
        let completion = await_completion(&policy, &backend, id, Locale::En).await;

        assert_eq!(completion, Completion::Exhausted { attempts: 3 });
        assert_eq!(backend.calls(RemoteOperation::FetchMatchingResults), 3);
    }
}
