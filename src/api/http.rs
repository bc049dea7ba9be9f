use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use super::wire::{
    Ack, ChangeEmailRequest, ChangePasswordRequest, CreateArticleRequest, CreateCategoryRequest,
    EditArticleRequest, Failure, LoginRequest, LoginResponse, PasswordResetRequest,
    RegisterRequest, RenameRequest, UserResponse,
};
use super::wire::{CategoryOptionWire, SearchHitWire};
use super::{ApiError, NewArticle, NewCategory, Registration, RemoteApi, ServerMessage};
use crate::config::Config;
use crate::ids::{ArticleId, CategoryId, UserId};
use crate::model::{CategoryOption, LoginGrant, SearchHit, UserSnapshot};

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_BODY: usize = 5 * 1024 * 1024; // 5MB

/// reqwest-backed [`RemoteApi`].
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
    max_body: usize,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpApi {
    /// Build a client for `base_url` with default limits.
    ///
    /// Credentials travel in request bodies, so a plain-HTTP base URL is
    /// only accepted for `localhost` / `127.0.0.1`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_limits(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_BODY,
        )
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_limits(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            config.max_response_bytes,
        )
    }

    pub fn with_limits(
        base_url: &str,
        timeout: Duration,
        max_body: usize,
    ) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        match base.scheme() {
            "https" => {}
            "http" => {
                let is_localhost = matches!(base.host_str(), Some("localhost" | "127.0.0.1"));
                if !is_localhost {
                    tracing::error!(base_url = %base, "Rejecting non-HTTPS API base URL");
                    return Err(ApiError::InsecureBaseUrl);
                }
                tracing::warn!(base_url = %base, "Using non-HTTPS API base URL (localhost only)");
            }
            other => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme {other}"))),
        }

        // Url::join replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()?;

        Ok(Self {
            client,
            base,
            timeout,
            max_body,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// Non-2xx responses become [`ApiError::Status`], carrying the body's
    /// `error` text when it parses.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let status = response.status();
        let body = read_limited_text(response, self.max_body).await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Failure>(&body)
                .ok()
                .and_then(|f| f.error);
            tracing::debug!(status = status.as_u16(), message = ?message, "Request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        let body = self.send(self.client.get(url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_with_body<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<String, ApiError> {
        tracing::debug!(method = %method, url = %url, "Sending request");
        self.send(self.client.request(method, url).json(body)).await
    }

    /// Send `body` and decode the optional `message` of the response.
    async fn ack<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<ServerMessage, ApiError> {
        let text = self.send_with_body(method, url, body).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let ack: Ack = serde_json::from_str(&text)?;
        Ok(ack.message)
    }

    async fn delete(&self, url: Url) -> Result<(), ApiError> {
        tracing::debug!(url = %url, "DELETE");
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}

impl RemoteApi for HttpApi {
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginGrant, ApiError> {
        let url = self.endpoint("login")?;
        let body = LoginRequest {
            correo_electronico: email,
            contrasena: password.expose_secret(),
        };
        let text = self
            .send_with_body(reqwest::Method::POST, url, &body)
            .await?;
        let response: LoginResponse = serde_json::from_str(&text)?;
        Ok(LoginGrant {
            user: response.user.into(),
            categories: response
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<ServerMessage, ApiError> {
        let body = RegisterRequest {
            nombre: &registration.name,
            correo_electronico: &registration.email,
            contrasena: registration.password.expose_secret(),
            acepta_terminos: registration.accepts_terms,
        };
        self.ack(reqwest::Method::POST, self.endpoint("register")?, &body)
            .await
    }

    async fn request_password_reset(&self, email: &str) -> Result<ServerMessage, ApiError> {
        let body = PasswordResetRequest {
            correo_electronico: email,
        };
        self.ack(
            reqwest::Method::POST,
            self.endpoint("password_reset_request")?,
            &body,
        )
        .await
    }

    async fn change_password(
        &self,
        user: UserId,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<ServerMessage, ApiError> {
        let body = ChangePasswordRequest {
            contrasena_actual: current.expose_secret(),
            nueva_contrasena: new.expose_secret(),
        };
        let url = self.endpoint(&format!("user/{user}/password"))?;
        self.ack(reqwest::Method::PUT, url, &body).await
    }

    async fn rename_user(&self, user: UserId, name: &str) -> Result<ServerMessage, ApiError> {
        let url = self.endpoint(&format!("user/{user}/name"))?;
        self.ack(
            reqwest::Method::PUT,
            url,
            &RenameRequest { nuevo_nombre: name },
        )
        .await
    }

    async fn change_email(&self, user: UserId, email: &str) -> Result<ServerMessage, ApiError> {
        let url = self.endpoint(&format!("user/{user}/email"))?;
        self.ack(
            reqwest::Method::PUT,
            url,
            &ChangeEmailRequest {
                nuevo_correo: email,
            },
        )
        .await
    }

    async fn fetch_user(&self, user: UserId) -> Result<UserSnapshot, ApiError> {
        let response: UserResponse = self.get_json(self.endpoint(&format!("user/{user}"))?).await?;
        Ok(UserSnapshot {
            user: response.user.into(),
            categories: response
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            articles: response
                .articles
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }

    async fn list_category_options(&self, user: UserId) -> Result<Vec<CategoryOption>, ApiError> {
        let options: Vec<CategoryOptionWire> = self
            .get_json(self.endpoint(&format!("categories/{user}"))?)
            .await?;
        Ok(options.into_iter().map(Into::into).collect())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<ServerMessage, ApiError> {
        let body = CreateCategoryRequest {
            nombre: &category.name,
            icono: category.icon,
            color: category.color,
            id_usuario: category.user_id,
        };
        self.ack(reqwest::Method::POST, self.endpoint("categories")?, &body)
            .await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.delete(self.endpoint(&format!("categories/{id}"))?)
            .await
    }

    async fn create_article(&self, article: &NewArticle) -> Result<ServerMessage, ApiError> {
        let body = CreateArticleRequest {
            titulo: &article.title,
            texto: &article.body,
            prioridad: article.priority,
            id_categoria: article.category_id,
            id_usuario: article.user_id,
        };
        self.ack(reqwest::Method::POST, self.endpoint("articles")?, &body)
            .await
    }

    async fn edit_article_title(&self, id: ArticleId, title: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("articles/{id}"))?;
        self.send_with_body(
            reqwest::Method::PUT,
            url,
            &EditArticleRequest { titulo: title },
        )
        .await
        .map(|_| ())
    }

    async fn delete_article(&self, id: ArticleId) -> Result<(), ApiError> {
        self.delete(self.endpoint(&format!("articles/{id}"))?)
            .await
    }

    async fn search(&self, user: UserId, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let mut url = self.endpoint(&format!("Buscar/{user}"))?;
        // Empty queries are forwarded too; the backend decides what they match.
        url.query_pairs_mut().append_pair("query", query);
        let hits: Vec<SearchHitWire> = self.get_json(url).await?;
        Ok(hits.into_iter().map(Into::into).collect())
    }
}

async fn read_limited_text(response: reqwest::Response, limit: usize) -> Result<String, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| ApiError::InvalidUtf8)
}
