//! The OnTa REST backend.
//!
//! [`RemoteApi`] lists every endpoint the client consumes. [`HttpApi`] is the
//! production implementation over reqwest; the collections are generic over
//! the trait so a screen never talks HTTP directly.
mod http;
pub(crate) mod wire;

pub use http::HttpApi;

use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{Color, Icon};
use crate::ids::{ArticleId, CategoryId, UserId};
use crate::model::{CategoryOption, LoginGrant, SearchHit, UserSnapshot};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response. `message` is the body's `error` field when present.
    #[error("Server error (status {status})")]
    Status { status: u16, message: Option<String> },
    #[error("Malformed response: {0}")]
    Parse(String),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Optional human-readable text the backend attaches to a 2xx response.
pub type ServerMessage = Option<String>;

/// Fields of the registration form.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub accepts_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub icon: Icon,
    pub color: Color,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub body: String,
    pub priority: i64,
    pub category_id: CategoryId,
    pub user_id: UserId,
}

/// Endpoint contract of the backend. One method per route.
#[allow(async_fn_in_trait)]
pub trait RemoteApi {
    /// `POST /login`
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginGrant, ApiError>;

    /// `POST /register`
    async fn register(&self, registration: &Registration) -> Result<ServerMessage, ApiError>;

    /// `POST /password_reset_request`
    async fn request_password_reset(&self, email: &str) -> Result<ServerMessage, ApiError>;

    /// `PUT /user/{id}/password`
    async fn change_password(
        &self,
        user: UserId,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<ServerMessage, ApiError>;

    /// `PUT /user/{id}/name`
    async fn rename_user(&self, user: UserId, name: &str) -> Result<ServerMessage, ApiError>;

    /// `PUT /user/{id}/email`
    async fn change_email(&self, user: UserId, email: &str) -> Result<ServerMessage, ApiError>;

    /// `GET /user/{id}`: profile, categories and articles in one response.
    async fn fetch_user(&self, user: UserId) -> Result<UserSnapshot, ApiError>;

    /// `GET /categories/{userId}`
    async fn list_category_options(&self, user: UserId) -> Result<Vec<CategoryOption>, ApiError>;

    /// `POST /categories`
    async fn create_category(&self, category: &NewCategory) -> Result<ServerMessage, ApiError>;

    /// `DELETE /categories/{id}`
    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError>;

    /// `POST /articles`
    async fn create_article(&self, article: &NewArticle) -> Result<ServerMessage, ApiError>;

    /// `PUT /articles/{id}` with a new title.
    async fn edit_article_title(&self, id: ArticleId, title: &str) -> Result<(), ApiError>;

    /// `DELETE /articles/{id}`
    async fn delete_article(&self, id: ArticleId) -> Result<(), ApiError>;

    /// `GET /Buscar/{userId}?query=`
    async fn search(&self, user: UserId, query: &str) -> Result<Vec<SearchHit>, ApiError>;
}
