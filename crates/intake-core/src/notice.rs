//! User-visible notices
//!
//! Every non-fatal failure lands here as a dismissible entry. The board is a
//! cheap clonable handle shared by the controller and the favorite store.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

/// Notice identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub Ulid);

impl NoticeId {
    /// Generate new notice ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Notice categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Required fields missing
    Validation,
    /// Remote call failed
    RemoteCall,
    /// Operation proceeded with a fallback result
    Degraded,
    /// Optimistic change reverted
    Rollback,
    /// Informational
    Info,
}

/// A dismissible user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Identifier
    pub id: NoticeId,
    /// Category
    pub kind: NoticeKind,
    /// Message text
    pub message: String,
}

/// Shared notice list
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    /// Create empty board
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notice
    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) -> NoticeId {
        let notice = Notice {
            id: NoticeId::new(),
            kind,
            message: message.into(),
        };
        let id = notice.id;
        self.inner.lock().push(notice);
        id
    }

    /// Dismiss a notice; returns whether it was present
    pub fn dismiss(&self, id: NoticeId) -> bool {
        let mut guard = self.inner.lock();
        let before = guard.len();
        guard.retain(|n| n.id != id);
        guard.len() != before
    }

    /// Take every pending notice
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.inner.lock())
    }

    /// Copy of pending notices
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.inner.lock().clone()
    }

    /// Pending notices of one kind
    #[must_use]
    pub fn of_kind(&self, kind: NoticeKind) -> Vec<Notice> {
        self.inner
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of pending notices
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_dismiss_drain() {
        let board = NoticeBoard::new();
        let shared = board.clone();

        let a = board.push(NoticeKind::Rollback, "favorite update failed");
        shared.push(NoticeKind::Info, "sent");
        assert_eq!(board.len(), 2);
        assert_eq!(board.of_kind(NoticeKind::Rollback).len(), 1);

        assert!(board.dismiss(a));
        assert!(!board.dismiss(a));

        let drained = shared.drain();
        assert_eq!(drained.len(), 1);
        assert!(board.is_empty());
    }
}
