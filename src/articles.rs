//! Articles of the signed-in user and the starred-first ordering.
use std::collections::HashSet;

use crate::api::{ApiError, NewArticle, RemoteApi};
use crate::error::{require, Result, ValidationError};
use crate::ids::{ArticleId, CategoryId, UserId};
use crate::model::{Article, Category};
use crate::navigation::{Outcome, Route};
use crate::util::clean_field;

/// Priority sent when the form does not set one.
pub const DEFAULT_PRIORITY: i64 = 1;

// ============================================================================
// Starred set
// ============================================================================

/// Article ids starred on one screen. Never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarredSet {
    ids: HashSet<ArticleId>,
}

impl StarredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `id`. Returns whether it is starred afterwards.
    pub fn toggle(&mut self, id: ArticleId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Stable partition: starred items first, each group in its original order.
pub fn starred_first<'a, T, I>(
    items: I,
    starred: &StarredSet,
    id: impl Fn(&T) -> ArticleId,
) -> Vec<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    T: 'a,
{
    let (mut first, rest): (Vec<&T>, Vec<&T>) =
        items.into_iter().partition(|item| starred.contains(id(*item)));
    first.extend(rest);
    first
}

// ============================================================================
// Edit state
// ============================================================================

/// Per-article state while a title edit is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Clean,
    Saving,
}

/// A validated title change that has not been confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEdit {
    pub id: ArticleId,
    pub title: String,
}

// ============================================================================
// Collection
// ============================================================================

/// In-memory copy of the user's articles, with the categories that came in
/// the same response.
///
/// Edits and deletes reach the local list only once the backend confirmed
/// them. Creating an article leaves the list alone; the caller reloads.
#[derive(Debug)]
pub struct ArticleCollection<A> {
    api: A,
    articles: Vec<Article>,
    categories: Vec<Category>,
    starred: StarredSet,
    saving: HashSet<ArticleId>,
}

impl<A: RemoteApi> ArticleCollection<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            articles: Vec::new(),
            categories: Vec::new(),
            starred: StarredSet::new(),
            saving: HashSet::new(),
        }
    }

    /// Fetch articles and categories in one call and replace both lists.
    pub async fn load(&mut self, user: UserId) -> Result<()> {
        tracing::debug!(user_id = %user, "Loading articles");
        let snapshot = self.api.fetch_user(user).await.inspect_err(|e| {
            tracing::warn!(user_id = %user, error = %e, "Failed to load articles");
        })?;
        self.articles = snapshot.articles;
        self.categories = snapshot.categories;
        Ok(())
    }

    /// Create an article from the raw form values.
    ///
    /// Title, body and a category are required. Nothing is inserted locally;
    /// the returned route leads to the category list, which reloads.
    pub async fn create(
        &self,
        title: &str,
        body: &str,
        category: Option<CategoryId>,
        user: UserId,
        priority: i64,
    ) -> Result<Outcome> {
        let title = clean_field(title);
        let title = require("Title", &title)?;
        let body = require("Body", body)?;
        let category_id = category.ok_or(ValidationError::MissingField("Category"))?;

        let article = NewArticle {
            title: title.to_owned(),
            body: body.to_owned(),
            priority,
            category_id,
            user_id: user,
        };
        tracing::debug!(user_id = %user, category_id = %category_id, "Creating article");
        let message = self.api.create_article(&article).await?;
        tracing::info!(user_id = %user, category_id = %category_id, "Article created");
        Ok(Outcome::new(message, Route::CategoryList))
    }

    /// Change an article's title. The local copy changes only on success.
    pub async fn edit(&mut self, id: ArticleId, new_title: &str) -> Result<()> {
        let edit = self.begin_edit(id, new_title)?;
        let result = self.api.edit_article_title(edit.id, &edit.title).await;
        self.finish_edit(edit, result)
    }

    /// Validate a new title and mark the article as [`EditState::Saving`].
    ///
    /// The caller sends the returned edit (see [`api`](Self::api)) and hands
    /// the outcome to [`finish_edit`](Self::finish_edit).
    pub fn begin_edit(&mut self, id: ArticleId, new_title: &str) -> Result<TitleEdit> {
        let title = clean_field(new_title);
        let title = require("Title", &title)?.to_owned();
        self.saving.insert(id);
        Ok(TitleEdit { id, title })
    }

    /// Leave [`EditState::Saving`]. The title is applied only if the backend
    /// accepted it.
    pub fn finish_edit(&mut self, edit: TitleEdit, result: Result<(), ApiError>) -> Result<()> {
        self.saving.remove(&edit.id);
        match result {
            Ok(()) => {
                if let Some(article) = self.articles.iter_mut().find(|a| a.id == edit.id) {
                    article.title = edit.title;
                }
                tracing::debug!(article_id = %edit.id, "Article title updated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(article_id = %edit.id, error = %e, "Article edit failed");
                Err(e.into())
            }
        }
    }

    /// Delete an article. It stays in the list if the backend refuses.
    pub async fn delete(&mut self, id: ArticleId) -> Result<()> {
        if let Err(e) = self.api.delete_article(id).await {
            tracing::warn!(article_id = %id, error = %e, "Article delete failed");
            return Err(e.into());
        }
        self.articles.retain(|a| a.id != id);
        tracing::debug!(article_id = %id, "Article deleted");
        Ok(())
    }

    /// Star or unstar an article. Purely local.
    pub fn toggle_starred(&mut self, id: ArticleId) -> bool {
        self.starred.toggle(id)
    }

    pub fn is_starred(&self, id: ArticleId) -> bool {
        self.starred.contains(id)
    }

    pub fn edit_state(&self, id: ArticleId) -> EditState {
        if self.saving.contains(&id) {
            EditState::Saving
        } else {
            EditState::Clean
        }
    }

    /// Every article, starred first. Recomputed on each call.
    pub fn ordered(&self) -> Vec<&Article> {
        starred_first(&self.articles, &self.starred, |a: &Article| a.id)
    }

    /// Articles of one category, starred first.
    pub fn in_category(&self, category: CategoryId) -> Vec<&Article> {
        starred_first(
            self.articles.iter().filter(|a| a.category_id == category),
            &self.starred,
            |a: &Article| a.id,
        )
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Articles in server order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }
}
