//! Optimistic favorite store
//!
//! Toggle protocol:
//! 1. Read current flag (absent = `false`)
//! 2. Apply the negation locally, visible to readers immediately
//! 3. Send set-favorite with the negated flag
//! 4. Keep it on success, restore the previous flag and post a notice on failure
//!
//! Toggles of the same key are serialized through a per-key async lock, so
//! a second toggle reads the first one's confirmed (or restored) value.
//! Distinct keys never wait on each other.

use dashmap::DashMap;
use intake_core::{
    FavoriteSet, FavoriteSink, MatchingId, NoticeBoard, NoticeKind, RemoteCallError,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Notice text posted when a toggle is rolled back
pub const DEFAULT_ROLLBACK_MESSAGE: &str = "Failed to update favorite.";

/// Result of one toggle transaction
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ToggleOutcome {
    /// Remote accepted the new flag
    Confirmed {
        /// Toggled key
        matching_id: MatchingId,
        /// Flag now in effect
        favorite: bool,
    },
    /// Remote rejected; the previous flag was restored
    RolledBack {
        /// Toggled key
        matching_id: MatchingId,
        /// Flag restored
        restored: bool,
        /// Remote failure
        error: RemoteCallError,
    },
}

impl ToggleOutcome {
    /// Flag in effect after the transaction
    #[inline]
    #[must_use]
    pub fn favorite(&self) -> bool {
        match self {
            Self::Confirmed { favorite, .. } => *favorite,
            Self::RolledBack { restored, .. } => *restored,
        }
    }

    /// Check whether the remote confirmed the change
    #[inline]
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Per-session favorite flags with optimistic remote updates
pub struct FavoriteStore {
    values: DashMap<MatchingId, bool>,
    locks: DashMap<MatchingId, Arc<Mutex<()>>>,
    sink: Arc<dyn FavoriteSink>,
    notices: NoticeBoard,
    rollback_message: String,
}

impl std::fmt::Debug for FavoriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteStore")
            .field("values", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl FavoriteStore {
    /// Create empty store
    #[must_use]
    pub fn new(sink: Arc<dyn FavoriteSink>, notices: NoticeBoard) -> Self {
        Self {
            values: DashMap::new(),
            locks: DashMap::new(),
            sink,
            notices,
            rollback_message: DEFAULT_ROLLBACK_MESSAGE.to_string(),
        }
    }

    /// With a custom rollback notice text
    #[must_use]
    pub fn with_rollback_message(mut self, message: impl Into<String>) -> Self {
        self.rollback_message = message.into();
        self
    }

    /// Create store seeded with fetched flags
    #[must_use]
    pub fn seeded(sink: Arc<dyn FavoriteSink>, notices: NoticeBoard, initial: &FavoriteSet) -> Self {
        let store = Self::new(sink, notices);
        for (id, favorite) in initial {
            store.values.insert(*id, *favorite);
        }
        store
    }

    /// Current flag for a key (absent = `false`)
    #[inline]
    #[must_use]
    pub fn get(&self, matching_id: MatchingId) -> bool {
        self.values.get(&matching_id).is_some_and(|v| *v)
    }

    /// Copy of every tracked flag
    #[must_use]
    pub fn snapshot(&self) -> FavoriteSet {
        self.values.iter().map(|e| (*e.key(), *e.value())).collect()
    }

    /// Keys currently flagged, ascending
    #[must_use]
    pub fn favorites(&self) -> Vec<MatchingId> {
        let mut ids: Vec<MatchingId> = self
            .values
            .iter()
            .filter(|e| *e.value())
            .map(|e| *e.key())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Check whether a toggle of this key is awaiting the remote
    #[must_use]
    pub fn is_pending(&self, matching_id: MatchingId) -> bool {
        self.locks
            .get(&matching_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    /// Toggle a key with optimistic apply and rollback on failure
    pub async fn toggle(&self, matching_id: MatchingId) -> ToggleOutcome {
        let lock = self.key_lock(matching_id);
        let _serial = lock.lock().await;

        let previous = self.get(matching_id);
        let desired = !previous;
        self.values.insert(matching_id, desired);
        tracing::debug!(%matching_id, favorite = desired, "favorite applied optimistically");

        match self.sink.set_favorite(matching_id, desired).await {
            Ok(()) => {
                tracing::debug!(%matching_id, favorite = desired, "favorite confirmed");
                ToggleOutcome::Confirmed {
                    matching_id,
                    favorite: desired,
                }
            }
            Err(error) => {
                self.values.insert(matching_id, previous);
                tracing::warn!(%matching_id, restored = previous, %error, "favorite rolled back");
                self.notices
                    .push(NoticeKind::Rollback, self.rollback_message.clone());
                ToggleOutcome::RolledBack {
                    matching_id,
                    restored: previous,
                    error,
                }
            }
        }
    }

    fn key_lock(&self, matching_id: MatchingId) -> Arc<Mutex<()>> {
        self.locks.entry(matching_id).or_default().clone()
    }
}
