//! Domain records held in memory by the collections.
//!
//! These are decoupled from the backend's wire format (see `api::wire`);
//! conversion happens once, when a response is decoded.
use crate::catalog::{Color, Icon};
use crate::ids::{ArticleId, CategoryId, UserId};

/// The signed-in account as recorded in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Name and email shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

/// A user's category as shown on the home grid and the category list.
///
/// `article_count` is computed by the server and only changes on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Icon,
    pub color: Color,
    pub article_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub body: String,
    pub priority: i64,
    pub category_id: CategoryId,
    /// Absent in some server projections of the article list.
    pub user_id: Option<UserId>,
}

/// One row of a search response. The backend returns a reduced article shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: ArticleId,
    pub title: String,
    pub body: String,
    pub category_id: Option<CategoryId>,
}

/// Entry in the category picker of the create-article form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub label: String,
}

/// Everything `GET /user/{id}` returns, already converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub user: UserIdentity,
    pub categories: Vec<Category>,
    pub articles: Vec<Article>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub user: UserIdentity,
    pub categories: Vec<Category>,
}
