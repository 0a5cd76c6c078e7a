//! Intake Favorites - optimistic favorite flags
//!
//! Provides [`FavoriteStore`], a per-session map of matching id → favorite
//! flag whose updates are applied locally first and confirmed against the
//! remote set-favorite operation, with rollback on failure.

#![warn(unreachable_pub)]

pub mod store;

pub use store::{FavoriteStore, ToggleOutcome, DEFAULT_ROLLBACK_MESSAGE};
