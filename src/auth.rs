//! Sign-in, registration, password reset and sign-out.
//!
//! [`Account`] pairs the backend with the session. Profile operations live
//! in `profile.rs` as a second `impl` block.
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::api::{Registration, RemoteApi};
use crate::error::{require, Result, ValidationError};
use crate::navigation::{Outcome, Route};
use crate::session::{Session, SessionStore};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub(crate) fn require_email(email: &str) -> Result<&str> {
    let email = require("Email", email)?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    Ok(email)
}

fn require_secret(field: &'static str, secret: &SecretString) -> Result<()> {
    if secret.expose_secret().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}

/// The signed-in account: backend plus session.
#[derive(Debug, Clone)]
pub struct Account<A, S> {
    api: A,
    session: Session<S>,
}

impl<A: RemoteApi, S: SessionStore> Account<A, S> {
    pub fn new(api: A, session: Session<S>) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Sign in and record the user in the session.
    ///
    /// A rejected login leaves the session exactly as it was; the server's
    /// `error` text is available through [`Error::notice`](crate::Error::notice).
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Route> {
        let email = require("Email", email)?;
        require_secret("Password", password)?;

        tracing::debug!("Logging in");
        let grant = self.api.login(email, password).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Login rejected");
        })?;
        self.session.begin(&grant).await?;
        Ok(Route::Home { refresh: false })
    }

    /// Create an account. Success leads back to the login screen.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: SecretString,
        accepts_terms: bool,
    ) -> Result<Outcome> {
        let name = require("Name", name)?;
        let email = require("Email", email)?;
        require_secret("Password", &password)?;
        if !accepts_terms {
            return Err(ValidationError::TermsNotAccepted.into());
        }

        let registration = Registration {
            name: name.to_owned(),
            email: email.to_owned(),
            password,
            accepts_terms,
        };
        let message = self.api.register(&registration).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Registration rejected");
        })?;
        tracing::info!("Account registered");
        Ok(Outcome::new(message, Route::Login))
    }

    /// Ask the backend to email a reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<Outcome> {
        let email = require_email(email)?;
        let message = self.api.request_password_reset(email).await?;
        tracing::debug!("Password reset requested");
        Ok(Outcome::new(message, Route::Login))
    }

    /// Forget the signed-in user.
    pub async fn logout(&self) -> Result<Route> {
        self.session.end().await?;
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpApi;
    use crate::error::Error;
    use crate::session::{MemorySessionStore, SessionKey};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn account(server: &MockServer) -> Account<HttpApi, MemorySessionStore> {
        Account::new(
            HttpApi::new(&server.uri()).unwrap(),
            Session::new(MemorySessionStore::new()),
        )
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn test_login_with_empty_field_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let account = account(&server);

        let err = account
            .login(" ", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField("Email"))
        ));

        let err = account
            .login("ana@example.com", &SecretString::from(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField("Password"))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let server = MockServer::start().await;
        let account = account(&server);
        let store = account.session().store();
        store.set(SessionKey::UserId, "3").await.unwrap();
        store.set(SessionKey::Username, "Ana").await.unwrap();

        assert_eq!(account.logout().await.unwrap(), Route::Login);

        for key in SessionKey::ALL {
            assert_eq!(store.get(key).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_register_sends_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(json!({
                "nombre": "Ana",
                "correo_electronico": "ana@example.com",
                "contrasena": "hunter2",
                "acepta_terminos": true
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Usuario registrado"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = account(&server)
            .register(" Ana ", "ana@example.com", SecretString::from("hunter2"), true)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::new(Some("Usuario registrado".to_string()), Route::Login)
        );
    }

    #[tokio::test]
    async fn test_register_requires_terms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = account(&server)
            .register("Ana", "ana@example.com", SecretString::from("pw"), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::TermsNotAccepted)
        ));
    }

    #[tokio::test]
    async fn test_register_conflict_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"error": "El correo ya existe"})),
            )
            .mount(&server)
            .await;

        let err = account(&server)
            .register("Ana", "ana@example.com", SecretString::from("pw"), true)
            .await
            .unwrap_err();
        assert_eq!(err.notice(), "El correo ya existe");
    }

    #[tokio::test]
    async fn test_password_reset_validates_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password_reset_request"))
            .and(body_json(json!({"correo_electronico": "ana@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Correo enviado"})))
            .expect(1)
            .mount(&server)
            .await;
        let account = account(&server);

        let err = account.request_password_reset("not-an-email").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidEmail)
        ));

        let outcome = account
            .request_password_reset(" ana@example.com ")
            .await
            .unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Correo enviado"));
    }
}
