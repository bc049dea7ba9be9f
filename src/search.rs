//! One search interaction: query, results and per-screen stars.
use crate::api::RemoteApi;
use crate::articles::{starred_first, StarredSet};
use crate::error::{Error, Result};
use crate::ids::{ArticleId, UserId};
use crate::model::SearchHit;
use crate::session::{Session, SessionStore};

/// Transient search state, dropped when the user leaves the screen.
///
/// Every call to [`search`](Self::search) issues exactly one request and the
/// response replaces the results wholesale. Overlapping calls are not
/// ordered: whichever response is applied last wins.
#[derive(Debug)]
pub struct SearchSession<A> {
    api: A,
    user: Option<UserId>,
    results: Vec<SearchHit>,
    shown: bool,
    starred: StarredSet,
}

impl<A: RemoteApi> SearchSession<A> {
    pub fn new(api: A, user: Option<UserId>) -> Self {
        Self {
            api,
            user,
            results: Vec::new(),
            shown: false,
            starred: StarredSet::new(),
        }
    }

    /// Open the search screen, resolving the user id from the session.
    ///
    /// A missing id is not fatal here; it surfaces on the first search.
    pub async fn open<S: SessionStore>(api: A, session: &Session<S>) -> Self {
        let user = match session.user_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Search opened without a signed-in user");
                None
            }
        };
        Self::new(api, user)
    }

    /// Run `query` as typed. An empty query is sent too.
    ///
    /// On failure the results are cleared and hidden.
    pub async fn search(&mut self, query: &str) -> Result<&[SearchHit]> {
        let Some(user) = self.user else {
            return Err(Error::Identity);
        };

        tracing::debug!(user_id = %user, query_len = query.len(), "Searching");
        match self.api.search(user, query).await {
            Ok(hits) => {
                tracing::debug!(user_id = %user, hits = hits.len(), "Search complete");
                self.results = hits;
                self.shown = true;
                Ok(&self.results)
            }
            Err(e) => {
                tracing::warn!(user_id = %user, error = %e, "Search failed");
                self.results.clear();
                self.shown = false;
                Err(e.into())
            }
        }
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    /// Whether a response has been received and is on screen.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn toggle_starred(&mut self, id: ArticleId) -> bool {
        self.starred.toggle(id)
    }

    pub fn is_starred(&self, id: ArticleId) -> bool {
        self.starred.contains(id)
    }

    /// Results with starred hits first.
    pub fn ordered(&self) -> Vec<&SearchHit> {
        starred_first(&self.results, &self.starred, |h: &SearchHit| h.id)
    }
}
