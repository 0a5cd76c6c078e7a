//! Research sessions: the matching result set for one submitted project

use crate::draft::ProjectDraft;
use crate::researcher::{MatchedResearcher, MatchingId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registered project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Favorite flags keyed by matching id
pub type FavoriteSet = BTreeMap<MatchingId, bool>;

/// Matching results for one submitted project
///
/// Researcher order is server arrival order and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSession {
    /// Registered project
    pub project_id: ProjectId,
    /// Project title as echoed by the backend
    pub project_title: String,
    /// Draft as submitted
    pub submitted: ProjectDraft,
    /// Candidates in arrival order
    pub researchers: Vec<MatchedResearcher>,
}

impl ResearchSession {
    /// Create session
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        project_title: impl Into<String>,
        submitted: ProjectDraft,
        researchers: Vec<MatchedResearcher>,
    ) -> Self {
        Self {
            project_id,
            project_title: project_title.into(),
            submitted,
            researchers,
        }
    }

    /// Favorite flags as reported at fetch time
    #[must_use]
    pub fn initial_favorites(&self) -> FavoriteSet {
        self.researchers
            .iter()
            .map(|r| (r.matching_id, r.favorite_status))
            .collect()
    }

    /// Find a researcher by matching id
    #[must_use]
    pub fn find(&self, matching_id: MatchingId) -> Option<&MatchedResearcher> {
        self.researchers.iter().find(|r| r.matching_id == matching_id)
    }

    /// Number of candidates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.researchers.len()
    }

    /// Check for an empty result set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.researchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::researcher::ResearcherId;

    #[test]
    fn favorites_seeded_from_fetch_snapshot() {
        let session = ResearchSession::new(
            ProjectId(1),
            "t",
            ProjectDraft::new(),
            vec![
                MatchedResearcher::new(MatchingId(3), Some(ResearcherId(30))).with_favorite(true),
                MatchedResearcher::new(MatchingId(1), None),
            ],
        );

        let favs = session.initial_favorites();
        assert_eq!(favs.get(&MatchingId(3)), Some(&true));
        assert_eq!(favs.get(&MatchingId(1)), Some(&false));
        assert_eq!(session.researchers[0].matching_id, MatchingId(3));
        assert!(session.find(MatchingId(2)).is_none());
    }
}
