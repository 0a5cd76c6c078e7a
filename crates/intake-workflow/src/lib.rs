//! Intake Workflow - request workflow state machine
//!
//! Drives a project request from drafting through AI assist, submission
//! and matching completion, then owns the loaded research session:
//! favorites, offer selection and export.
//!
//! # State machine
//!
//! ```text
//! Drafting ──request_assist──▶ AssistConfirm ──confirm──▶ Diagnosing ──▶ AssistResult
//!    ▲  │                          │ cancel                                 │ apply / dismiss
//!    │  │                          ▼                                        ▼
//!    │  └──request_submit──▶ SubmitConfirm ──confirm──▶ Researching ──▶ Completed
//!    └────────── cancel / registration failed ◀──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let mut controller = WorkflowController::new(backend, catalog, WorkflowConfig::default());
//! controller.set_title("Battery recycling")?;
//! controller.set_background("Looking for electrochemistry expertise")?;
//! controller.select_all_universities(true)?;
//! controller.select_all_levels(true)?;
//!
//! controller.request_submit()?;
//! let project_id = controller.run_submit().await?;
//! controller.load_results(project_id).await?;
//! let file = controller.export()?;
//! ```

#![warn(unreachable_pub)]

pub mod cache;
pub mod completion;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod state;

pub use cache::{CachedProject, SessionCache};
pub use completion::{await_completion, Completion};
pub use config::{
    CacheConfig, CompletionPolicy, ConfigError, Messages, WorkflowConfig,
    DEFAULT_SETTLING_DELAY_MS,
};
pub use controller::{
    clean_suggestion, AssistOutcome, AssistTicket, Diagnosis, ResultsOutcome, ResultsTicket,
    SubmitOutcome, SubmitTicket, WorkflowController,
};
pub use error::WorkflowError;
pub use session::LiveSession;
pub use state::{allowed_transitions, next_state, validate_transition, WorkflowAction, WorkflowState};
