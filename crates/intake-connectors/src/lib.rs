//! Intake Connectors - HTTP access to the matching backend
//!
//! [`HttpBackend`] implements all six capability traits from `intake-core`
//! over one `reqwest` client, so it can be handed to the workflow
//! controller as its [`intake_core::IntakeBackend`].
//!
//! # Example
//!
//! ```rust,no_run
//! use intake_connectors::{HttpBackend, HttpBackendConfig};
//!
//! # fn main() -> Result<(), intake_connectors::ConnectorError> {
//! let config = HttpBackendConfig::new("https://matching.example.com/api").with_timeout_ms(10_000);
//! let backend = HttpBackend::new(config)?;
//! # let _ = backend;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod client;
pub mod config;
mod http;
mod wire;

pub use client::HttpBackend;
pub use config::{ConnectorError, Endpoints, HttpBackendConfig, DEFAULT_TIMEOUT_MS};
