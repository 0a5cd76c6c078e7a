//! Error taxonomy shared across the intake crates
//!
//! - [`ValidationError`]: required draft fields missing, detected locally
//! - [`RemoteCallError`]: non-2xx, transport, decode or timeout failures
//!   from any remote operation

use serde::{Deserialize, Serialize};

/// Draft fields that gate assist and submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    /// Project title
    Title,
    /// Project background / content
    Background,
    /// At least one target university
    Universities,
    /// At least one researcher level
    ResearcherLevels,
}

impl RequiredField {
    /// Human-readable field name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Title => "project title",
            Self::Background => "project background",
            Self::Universities => "target universities",
            Self::ResearcherLevels => "researcher levels",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Required fields are missing
///
/// `missing` is ordered by field order, never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", join_fields(.missing))]
pub struct ValidationError {
    /// Missing fields, in field order
    pub missing: Vec<RequiredField>,
}

impl ValidationError {
    /// Build from a list of missing fields; `None` when nothing is missing
    #[must_use]
    pub fn from_missing(mut missing: Vec<RequiredField>) -> Option<Self> {
        if missing.is_empty() {
            return None;
        }
        missing.sort_unstable();
        missing.dedup();
        Some(Self { missing })
    }

    /// Check whether a field is reported missing
    #[inline]
    #[must_use]
    pub fn is_missing(&self, field: RequiredField) -> bool {
        self.missing.contains(&field)
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The six remote operations the intake flow consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteOperation {
    /// AI content suggestion
    SuggestContent,
    /// Project registration
    RegisterProject,
    /// Matching results lookup
    FetchMatchingResults,
    /// Localized researcher fields lookup
    FetchLocalizedFields,
    /// Favorite flag update
    SetFavorite,
    /// Offer dispatch
    SendOffer,
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SuggestContent => "suggest-content",
            Self::RegisterProject => "register-project",
            Self::FetchMatchingResults => "fetch-matching-results",
            Self::FetchLocalizedFields => "fetch-localized-researcher-fields",
            Self::SetFavorite => "set-favorite",
            Self::SendOffer => "send-offer",
        };
        f.write_str(name)
    }
}

/// Remote call failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteCallError {
    /// Service answered with a non-2xx status
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        /// Failed operation
        operation: RemoteOperation,
        /// HTTP status code
        status: u16,
        /// Response body (possibly empty)
        body: String,
    },

    /// Connection-level failure
    #[error("{operation} transport failure: {message}")]
    Transport {
        /// Failed operation
        operation: RemoteOperation,
        /// Transport error text
        message: String,
    },

    /// Response body could not be decoded
    #[error("{operation} returned an undecodable body: {message}")]
    Decode {
        /// Failed operation
        operation: RemoteOperation,
        /// Decoder error text
        message: String,
    },

    /// No response within the configured bound
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout {
        /// Failed operation
        operation: RemoteOperation,
        /// Elapsed bound in milliseconds
        after_ms: u64,
    },
}

impl RemoteCallError {
    /// Operation that failed
    #[must_use]
    pub fn operation(&self) -> RemoteOperation {
        match self {
            Self::Status { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Timeout { operation, .. } => *operation,
        }
    }

    /// Check if a later retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Decode { .. } => false,
        }
    }

    /// Shorthand for a status failure
    #[must_use]
    pub fn status(operation: RemoteOperation, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            operation,
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a transport failure
    #[must_use]
    pub fn transport(operation: RemoteOperation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_orders_and_dedups() {
        let err = ValidationError::from_missing(vec![
            RequiredField::ResearcherLevels,
            RequiredField::Title,
            RequiredField::Title,
        ])
        .unwrap();

        assert_eq!(
            err.missing,
            vec![RequiredField::Title, RequiredField::ResearcherLevels]
        );
        assert_eq!(
            err.to_string(),
            "missing required fields: project title, researcher levels"
        );
    }

    #[test]
    fn nothing_missing_is_not_an_error() {
        assert!(ValidationError::from_missing(Vec::new()).is_none());
    }

    #[test]
    fn remote_error_classification() {
        let err = RemoteCallError::status(RemoteOperation::SetFavorite, 503, "busy");
        assert_eq!(err.operation(), RemoteOperation::SetFavorite);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "set-favorite returned HTTP 503: busy");

        let err = RemoteCallError::status(RemoteOperation::SendOffer, 400, "");
        assert!(!err.is_retryable());
    }
}
