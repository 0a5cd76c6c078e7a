//! Workflow configuration
//!
//! Loaded from TOML. Every section is optional; an empty document yields
//! [`WorkflowConfig::default`].
//!
//! ```toml
//! locale = "en"
//! default_deadline = "2099-12-31"
//!
//! [completion]
//! mode = "poll"
//! interval_ms = 1000
//! max_attempts = 8
//! backoff_factor = 2.0
//! max_interval_ms = 15000
//!
//! [cache]
//! ttl_secs = 1800
//! max_entries = 64
//! ```

use chrono::NaiveDate;
use intake_core::Locale;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settling delay used by the fixed-delay completion policy
pub const DEFAULT_SETTLING_DELAY_MS: u64 = 3_000;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read workflow config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config TOML malformed
    #[error("invalid workflow config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid workflow config value: {0}")]
    Invalid(String),
}

/// How the Researching state learns that matching finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Wait a fixed settling delay after registration
    FixedDelay {
        /// Delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },
    /// Re-query matching results until researchers appear
    Poll {
        /// First wait between attempts
        interval_ms: u64,
        /// Attempts before giving up
        max_attempts: u32,
        /// Wait multiplier after each attempt
        #[serde(default = "default_backoff_factor")]
        backoff_factor: f64,
        /// Upper bound on a single wait
        max_interval_ms: u64,
    },
}

fn default_delay_ms() -> u64 {
    DEFAULT_SETTLING_DELAY_MS
}

fn default_backoff_factor() -> f64 {
    2.0
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self::FixedDelay {
            delay_ms: DEFAULT_SETTLING_DELAY_MS,
        }
    }
}

impl CompletionPolicy {
    /// Fixed delay policy
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self::FixedDelay {
            delay_ms: duration_ms(delay),
        }
    }

    /// Polling policy with exponential backoff
    #[must_use]
    pub fn poll(interval: Duration, max_attempts: u32, max_interval: Duration) -> Self {
        Self::Poll {
            interval_ms: duration_ms(interval),
            max_attempts,
            backoff_factor: default_backoff_factor(),
            max_interval_ms: duration_ms(max_interval),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::FixedDelay { .. } => Ok(()),
            Self::Poll {
                interval_ms,
                max_attempts,
                backoff_factor,
                max_interval_ms,
            } => {
                if *max_attempts == 0 {
                    return Err(ConfigError::Invalid("completion.max_attempts must be > 0".into()));
                }
                if !backoff_factor.is_finite() || *backoff_factor < 1.0 {
                    return Err(ConfigError::Invalid(
                        "completion.backoff_factor must be a finite value >= 1.0".into(),
                    ));
                }
                if interval_ms > max_interval_ms {
                    return Err(ConfigError::Invalid(
                        "completion.interval_ms exceeds completion.max_interval_ms".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Result cache bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Maximum cached projects
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            max_entries: 64,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// User-visible texts posted by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown in place of a suggestion when suggest-content fails
    pub assist_failure: String,
    /// Shown when suggest-content returns nothing
    pub assist_empty: String,
    /// Registration failed
    pub registration_failed: String,
    /// Matching results could not be loaded
    pub results_failed: String,
    /// Matching did not report completion in time
    pub completion_pending: String,
    /// Offer dispatch failed
    pub offer_failed: String,
    /// Offers sent
    pub offer_sent: String,
    /// Favorite change rolled back
    pub favorite_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            assist_failure: "An error occurred during diagnosis.".into(),
            assist_empty: "No diagnosis result was returned.".into(),
            registration_failed: "Project registration failed.".into(),
            results_failed: "Failed to load matching results.".into(),
            completion_pending: "Matching is still running; results may be incomplete.".into(),
            offer_failed: "Failed to send offers. Please try again.".into(),
            offer_sent: "Offers sent.".into(),
            favorite_failed: "Failed to update favorite.".into(),
        }
    }
}

impl Messages {
    /// Japanese texts
    #[must_use]
    pub fn japanese() -> Self {
        Self {
            assist_failure: "診断中にエラーが発生しました".into(),
            assist_empty: "診断結果が取得できませんでした".into(),
            registration_failed: "案件登録に失敗しました".into(),
            results_failed: "研究者データの取得に失敗しました".into(),
            completion_pending: "マッチング処理が完了していません".into(),
            offer_failed: "オファー送信に失敗しました。もう一度お試しください。".into(),
            offer_sent: "オファーを送信しました".into(),
            favorite_failed: "お気に入りの更新に失敗しました".into(),
        }
    }
}

/// Workflow controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Presentation locale
    pub locale: Locale,
    /// Researching → Completed policy
    pub completion: CompletionPolicy,
    /// Result cache bounds
    pub cache: CacheConfig,
    /// Deadline sent with suggest-content when the draft has none
    pub default_deadline: NaiveDate,
    /// Notice texts
    pub messages: Messages,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            completion: CompletionPolicy::default(),
            cache: CacheConfig::default(),
            default_deadline: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or(NaiveDate::MAX),
            messages: Messages::default(),
        }
    }
}

impl WorkflowConfig {
    /// With locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// With completion policy
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    /// With cache bounds
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// With default deadline
    #[must_use]
    pub fn with_default_deadline(mut self, deadline: NaiveDate) -> Self {
        self.default_deadline = deadline;
        self
    }

    /// With notice texts
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending key
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.completion.validate()?;
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid("cache.max_entries must be > 0".into()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttl_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), locale = %config.locale, "loaded workflow config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = WorkflowConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(
            config.completion,
            CompletionPolicy::FixedDelay { delay_ms: 3_000 }
        );
        assert_eq!(config.default_deadline.to_string(), "2099-12-31");
    }

    #[test]
    fn poll_policy_parses() {
        let config = WorkflowConfig::from_toml_str(
            r#"
            locale = "en"

            [completion]
            mode = "poll"
            interval_ms = 500
            max_attempts = 4
            max_interval_ms = 4000

            [cache]
            ttl_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.locale, Locale::En);
        assert_eq!(
            config.completion,
            CompletionPolicy::Poll {
                interval_ms: 500,
                max_attempts: 4,
                backoff_factor: 2.0,
                max_interval_ms: 4000,
            }
        );
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.cache.max_entries, 64);
    }

    #[test]
    fn fixed_delay_without_value_uses_default() {
        let config = WorkflowConfig::from_toml_str("[completion]\nmode = \"fixed_delay\"\n").unwrap();
        assert_eq!(config.completion, CompletionPolicy::default());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let zero_attempts = r#"
            [completion]
            mode = "poll"
            interval_ms = 10
            max_attempts = 0
            max_interval_ms = 10
        "#;
        assert!(matches!(
            WorkflowConfig::from_toml_str(zero_attempts),
            Err(ConfigError::Invalid(_))
        ));

        let shrinking = r#"
            [completion]
            mode = "poll"
            interval_ms = 10
            max_attempts = 3
            backoff_factor = 0.5
            max_interval_ms = 100
        "#;
        assert!(matches!(
            WorkflowConfig::from_toml_str(shrinking),
            Err(ConfigError::Invalid(_))
        ));

        assert!(matches!(
            WorkflowConfig::from_toml_str("[cache]\nmax_entries = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_mode_is_parse_error() {
        let err = WorkflowConfig::from_toml_str("[completion]\nmode = \"push\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.toml");
        std::fs::write(&path, "default_deadline = \"2030-03-31\"\n[messages]\noffer_sent = \"ok\"\n")
            .unwrap();

        let config = WorkflowConfig::load(&path).unwrap();
        assert_eq!(config.default_deadline.to_string(), "2030-03-31");
        assert_eq!(config.messages.offer_sent, "ok");
        assert_eq!(config.messages.offer_failed, Messages::default().offer_failed);

        assert!(matches!(
            WorkflowConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
