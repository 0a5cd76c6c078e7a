//! Workflow states and the transition table
//!
//! Every state change goes through [`next_state`]; an action with no entry
//! for the current state is an illegal transition.

use serde::{Deserialize, Serialize};

/// Workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Editing the draft
    #[default]
    Drafting,
    /// Waiting for the user to confirm an AI assist
    AssistConfirm,
    /// suggest-content in flight
    Diagnosing,
    /// Suggestion (or failure placeholder) on display
    AssistResult,
    /// Waiting for the user to confirm submission
    SubmitConfirm,
    /// register-project and completion in flight
    Researching,
    /// Registration done; terminal for this instance
    Completed,
}

impl WorkflowState {
    /// Every state
    pub const ALL: [WorkflowState; 7] = [
        Self::Drafting,
        Self::AssistConfirm,
        Self::Diagnosing,
        Self::AssistResult,
        Self::SubmitConfirm,
        Self::Researching,
        Self::Completed,
    ];

    /// Check for the terminal state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Check whether a remote call owned by the state machine is in flight
    #[inline]
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Diagnosing | Self::Researching)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Drafting => "drafting",
            Self::AssistConfirm => "assist-confirm",
            Self::Diagnosing => "diagnosing",
            Self::AssistResult => "assist-result",
            Self::SubmitConfirm => "submit-confirm",
            Self::Researching => "researching",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Events that move the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    /// User asks for an AI assist
    RequestAssist,
    /// User cancels the assist prompt
    CancelAssist,
    /// User confirms the assist prompt
    ConfirmAssist,
    /// suggest-content resolved (success or failure)
    AssistSettled,
    /// User applies the suggestion
    ApplySuggestion,
    /// User dismisses the suggestion
    DismissSuggestion,
    /// User asks to submit
    RequestSubmit,
    /// User cancels the submit prompt
    CancelSubmit,
    /// User confirms the submit prompt
    ConfirmSubmit,
    /// Registration and completion finished
    RegistrationSucceeded,
    /// Registration call failed
    RegistrationFailed,
    /// Draft field edit
    Edit,
}

impl WorkflowAction {
    /// Every action
    pub const ALL: [WorkflowAction; 12] = [
        Self::RequestAssist,
        Self::CancelAssist,
        Self::ConfirmAssist,
        Self::AssistSettled,
        Self::ApplySuggestion,
        Self::DismissSuggestion,
        Self::RequestSubmit,
        Self::CancelSubmit,
        Self::ConfirmSubmit,
        Self::RegistrationSucceeded,
        Self::RegistrationFailed,
        Self::Edit,
    ];
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RequestAssist => "request-assist",
            Self::CancelAssist => "cancel-assist",
            Self::ConfirmAssist => "confirm-assist",
            Self::AssistSettled => "assist-settled",
            Self::ApplySuggestion => "apply-suggestion",
            Self::DismissSuggestion => "dismiss-suggestion",
            Self::RequestSubmit => "request-submit",
            Self::CancelSubmit => "cancel-submit",
            Self::ConfirmSubmit => "confirm-submit",
            Self::RegistrationSucceeded => "registration-succeeded",
            Self::RegistrationFailed => "registration-failed",
            Self::Edit => "edit",
        };
        f.write_str(name)
    }
}

/// State reached by applying `action` in `from`, if legal
///
/// Draft edits keep the current state and are legal everywhere except
/// [`WorkflowState::Completed`].
#[must_use]
pub fn next_state(from: WorkflowState, action: WorkflowAction) -> Option<WorkflowState> {
    use WorkflowAction as A;
    use WorkflowState as S;

    match (from, action) {
        (S::Completed, A::Edit) => None,
        (state, A::Edit) => Some(state),
        (S::Drafting, A::RequestAssist) => Some(S::AssistConfirm),
        (S::Drafting, A::RequestSubmit) => Some(S::SubmitConfirm),
        (S::AssistConfirm, A::ConfirmAssist) => Some(S::Diagnosing),
        (S::AssistConfirm, A::CancelAssist) => Some(S::Drafting),
        (S::Diagnosing, A::AssistSettled) => Some(S::AssistResult),
        (S::AssistResult, A::ApplySuggestion | A::DismissSuggestion) => Some(S::Drafting),
        (S::SubmitConfirm, A::ConfirmSubmit) => Some(S::Researching),
        (S::SubmitConfirm, A::CancelSubmit) => Some(S::Drafting),
        (S::Researching, A::RegistrationSucceeded) => Some(S::Completed),
        (S::Researching, A::RegistrationFailed) => Some(S::Drafting),
        _ => None,
    }
}

/// States reachable from `from` in one step, excluding self-loops
#[must_use]
pub fn allowed_transitions(from: WorkflowState) -> Vec<WorkflowState> {
    let mut targets: Vec<WorkflowState> = Vec::new();
    for action in WorkflowAction::ALL {
        if let Some(to) = next_state(from, action) {
            if to != from && !targets.contains(&to) {
                targets.push(to);
            }
        }
    }
    targets
}

/// Check whether `from → to` appears in the table
#[must_use]
pub fn validate_transition(from: WorkflowState, to: WorkflowState) -> bool {
    allowed_transitions(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkflowState::*;

    #[test]
    fn table_matches_state_diagram() {
        assert_eq!(allowed_transitions(Drafting), vec![AssistConfirm, SubmitConfirm]);
        assert_eq!(allowed_transitions(AssistConfirm), vec![Drafting, Diagnosing]);
        assert_eq!(allowed_transitions(Diagnosing), vec![AssistResult]);
        assert_eq!(allowed_transitions(AssistResult), vec![Drafting]);
        assert_eq!(allowed_transitions(SubmitConfirm), vec![Drafting, Researching]);
        assert_eq!(allowed_transitions(Researching), vec![Completed, Drafting]);
        assert!(allowed_transitions(Completed).is_empty());
    }

    #[test]
    fn no_double_submission() {
        assert_eq!(next_state(Researching, WorkflowAction::ConfirmSubmit), None);
        assert_eq!(next_state(Researching, WorkflowAction::RequestSubmit), None);
        assert!(!validate_transition(Researching, Researching));
    }

    #[test]
    fn busy_only_while_remote_call_owned() {
        let busy: Vec<_> = WorkflowState::ALL.into_iter().filter(|s| s.is_busy()).collect();
        assert_eq!(busy, vec![Diagnosing, Researching]);
    }

    #[test]
    fn edits_everywhere_but_completed() {
        for state in WorkflowState::ALL {
            let expected = if state.is_terminal() { None } else { Some(state) };
            assert_eq!(next_state(state, WorkflowAction::Edit), expected);
        }
    }

    #[test]
    fn cancel_only_from_matching_prompt() {
        assert_eq!(next_state(SubmitConfirm, WorkflowAction::CancelAssist), None);
        assert_eq!(next_state(AssistConfirm, WorkflowAction::CancelSubmit), None);
    }
}
