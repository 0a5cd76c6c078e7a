//! Live research session context
//!
//! Created when matching results load and dropped on reset. Owns
//! everything that belongs to one project's result view.

use intake_core::{
    FavoriteSet, FieldResolver, Locale, LocalizedDirectory, MatchedResearcher, MatchingId,
    ProjectId, ResearchSession, ResearcherId,
};
use intake_favorites::FavoriteStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Research session plus its favorite store, localized fields and offer selection
#[derive(Debug)]
pub struct LiveSession {
    session: ResearchSession,
    favorites: Arc<FavoriteStore>,
    localized: LocalizedDirectory,
    selection: BTreeSet<ResearcherId>,
}

impl LiveSession {
    pub(crate) fn new(
        session: ResearchSession,
        favorites: FavoriteStore,
        localized: LocalizedDirectory,
    ) -> Self {
        Self {
            session,
            favorites: Arc::new(favorites),
            localized,
            selection: BTreeSet::new(),
        }
    }

    /// Project of this session
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.session.project_id
    }

    /// Matching results
    #[inline]
    #[must_use]
    pub fn session(&self) -> &ResearchSession {
        &self.session
    }

    /// Researchers in arrival order
    #[inline]
    #[must_use]
    pub fn researchers(&self) -> &[MatchedResearcher] {
        &self.session.researchers
    }

    /// Favorite store handle; clones share state
    #[inline]
    #[must_use]
    pub fn favorites(&self) -> &Arc<FavoriteStore> {
        &self.favorites
    }

    /// Live favorite flag for a matching
    #[inline]
    #[must_use]
    pub fn is_favorite(&self, matching_id: MatchingId) -> bool {
        self.favorites.get(matching_id)
    }

    /// Live favorite flags
    #[must_use]
    pub fn favorite_set(&self) -> FavoriteSet {
        self.favorites.snapshot()
    }

    /// Localized researcher fields
    #[inline]
    #[must_use]
    pub fn localized(&self) -> &LocalizedDirectory {
        &self.localized
    }

    /// Display field resolver for a locale
    #[must_use]
    pub fn resolver(&self, locale: Locale) -> FieldResolver<'_> {
        FieldResolver::new(locale).with_localized(&self.localized)
    }

    /// Researchers selected for an offer, ascending
    #[must_use]
    pub fn selection(&self) -> Vec<ResearcherId> {
        self.selection.iter().copied().collect()
    }

    /// Check whether a researcher is selected
    #[inline]
    #[must_use]
    pub fn is_selected(&self, researcher_id: ResearcherId) -> bool {
        self.selection.contains(&researcher_id)
    }

    pub(crate) fn contains_researcher(&self, researcher_id: ResearcherId) -> bool {
        self.session
            .researchers
            .iter()
            .any(|r| r.researcher_id == researcher_id)
    }

    /// Flip selection; returns whether the researcher is now selected
    pub(crate) fn toggle_selection(&mut self, researcher_id: ResearcherId) -> bool {
        if self.selection.remove(&researcher_id) {
            false
        } else {
            self.selection.insert(researcher_id);
            true
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
