//! Profile screen: view and edit name, email and password.
use secrecy::{ExposeSecret, SecretString};

use crate::api::{RemoteApi, ServerMessage};
use crate::auth::{require_email, Account};
use crate::error::{require, Result, ValidationError};
use crate::model::Profile;
use crate::session::SessionStore;
use crate::util::clean_field;

impl<A: RemoteApi, S: SessionStore> Account<A, S> {
    /// Name and email as the backend has them.
    pub async fn profile(&self) -> Result<Profile> {
        let user = self.session().user_id().await?;
        let snapshot = self.api().fetch_user(user).await.inspect_err(|e| {
            tracing::warn!(user_id = %user, error = %e, "Failed to load profile");
        })?;
        Ok(Profile {
            name: snapshot.user.name,
            email: snapshot.user.email,
        })
    }

    /// Rename the user. The session's `username` follows on success.
    pub async fn rename(&self, name: &str) -> Result<ServerMessage> {
        let name = clean_field(name);
        let name = require("Name", &name)?;
        let user = self.session().user_id().await?;

        let message = self.api().rename_user(user, name).await?;
        self.session().set_name(name).await?;
        tracing::info!(user_id = %user, "User renamed");
        Ok(message)
    }

    /// Change the sign-in email. The session's `userEmail` follows on success.
    pub async fn change_email(&self, email: &str) -> Result<ServerMessage> {
        let email = require_email(email)?;
        let user = self.session().user_id().await?;

        let message = self.api().change_email(user, email).await?;
        self.session().set_email(email).await?;
        tracing::info!(user_id = %user, "User email changed");
        Ok(message)
    }

    /// Change the password. Both fields are required.
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<ServerMessage> {
        if current.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("Current password").into());
        }
        if new.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("New password").into());
        }
        let user = self.session().user_id().await?;

        let message = self
            .api()
            .change_password(user, current, new)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user, error = %e, "Password change rejected");
            })?;
        tracing::info!(user_id = %user, "Password changed");
        Ok(message)
    }
}
