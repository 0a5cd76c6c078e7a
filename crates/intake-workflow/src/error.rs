//! Workflow error types

use crate::config::ConfigError;
use crate::state::{WorkflowAction, WorkflowState};
use intake_core::{MatchingId, RemoteCallError, ResearcherId, ValidationError};

/// Errors returned by [`crate::WorkflowController`]
///
/// None of these is fatal: every variant leaves the controller in the
/// state it held before the failing action, or in the documented
/// fallback state.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Required draft fields are missing
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteCallError),

    /// Action not permitted in the current state
    #[error("{action} is not allowed while {from}")]
    IllegalTransition {
        /// State at the time of the action
        from: WorkflowState,
        /// Rejected action
        action: WorkflowAction,
    },

    /// No research session is loaded
    #[error("no research session is loaded")]
    NoSession,

    /// A response arrived for an abandoned operation and was discarded
    #[error("discarded a response for an abandoned operation")]
    StaleResponse,

    /// The loaded session has no researchers
    #[error("no researchers to export")]
    NothingToExport,

    /// Matching id is not part of the loaded session
    #[error("matching {0} is not part of the loaded session")]
    UnknownMatching(MatchingId),

    /// Researcher id is not part of the loaded session
    #[error("researcher {0} is not part of the loaded session")]
    UnknownResearcher(ResearcherId),

    /// Configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WorkflowError {
    /// Check whether the error came from draft validation
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Missing fields, for validation errors
    #[must_use]
    pub fn missing_fields(&self) -> Option<&[intake_core::RequiredField]> {
        match self {
            Self::Validation(err) => Some(&err.missing),
            _ => None,
        }
    }
}
