//! The user's categories, shared by the home grid and the category list.
use std::collections::HashSet;

use crate::api::{NewCategory, RemoteApi};
use crate::catalog::{Color, Icon};
use crate::error::{require, Result};
use crate::ids::{CategoryId, UserId};
use crate::model::{Category, CategoryOption};
use crate::navigation::{Outcome, Route};
use crate::util::clean_field;

/// In-memory copy of one user's categories.
///
/// `load` replaces the whole list. `create` never inserts locally; the home
/// screen reloads when it is re-entered. `delete` is optimistic: the category
/// leaves the list before the backend answers and stays gone if the backend
/// refuses, in which case its id is kept as *pending reconcile* until the
/// next successful `load`.
#[derive(Debug)]
pub struct CategoryCollection<A> {
    api: A,
    categories: Vec<Category>,
    pending_reconcile: HashSet<CategoryId>,
}

impl<A: RemoteApi> CategoryCollection<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            categories: Vec::new(),
            pending_reconcile: HashSet::new(),
        }
    }

    /// Fetch the user's categories. On failure the current list is kept.
    pub async fn load(&mut self, user: UserId) -> Result<()> {
        tracing::debug!(user_id = %user, "Loading categories");
        let snapshot = self.api.fetch_user(user).await.inspect_err(|e| {
            tracing::warn!(user_id = %user, error = %e, "Failed to load categories");
        })?;
        self.categories = snapshot.categories;
        self.pending_reconcile.clear();
        Ok(())
    }

    /// Create a category from the raw form values.
    ///
    /// Name, icon and color are all required; an empty or unknown value
    /// fails before any request is made. The collection itself is not
    /// touched. The returned route asks the home screen to reload.
    pub async fn create(
        &self,
        name: &str,
        icon: &str,
        color: &str,
        user: UserId,
    ) -> Result<Outcome> {
        let name = clean_field(name);
        let name = require("Name", &name)?;
        let icon = Icon::parse(require("Icon", icon)?)?;
        let color = Color::parse(require("Color", color)?)?;

        let category = NewCategory {
            name: name.to_owned(),
            icon,
            color,
            user_id: user,
        };
        tracing::debug!(user_id = %user, icon = %icon, color = %color, "Creating category");
        let message = self.api.create_category(&category).await?;
        tracing::info!(user_id = %user, "Category created");
        Ok(Outcome::new(message, Route::Home { refresh: true }))
    }

    /// Remove a category locally, then ask the backend to delete it.
    ///
    /// The local removal is kept whatever the backend answers. A refused
    /// delete is logged, remembered in [`pending_reconcile`](Self::pending_reconcile)
    /// and returned so the caller can show it.
    pub async fn delete(&mut self, id: CategoryId) -> Result<()> {
        self.categories.retain(|c| c.id != id);

        if let Err(e) = self.api.delete_category(id).await {
            tracing::warn!(category_id = %id, error = %e, "Category delete failed, keeping local removal");
            self.pending_reconcile.insert(id);
            return Err(e.into());
        }
        tracing::debug!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// Options for the category picker of the create-article form.
    pub async fn options(&self, user: UserId) -> Result<Vec<CategoryOption>> {
        let options = self.api.list_category_options(user).await.inspect_err(|e| {
            tracing::warn!(user_id = %user, error = %e, "Failed to load category options");
        })?;
        Ok(options)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Removed locally but possibly still present on the backend.
    pub fn pending_reconcile(&self) -> &HashSet<CategoryId> {
        &self.pending_reconcile
    }

    /// Route into the per-category article screen.
    pub fn route_to(&self, id: CategoryId) -> Option<Route> {
        self.get(id).map(|c| Route::SelectedCategory {
            id: c.id,
            title: c.name.clone(),
            color: c.color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpApi;
    use crate::catalog::{DEFAULT_COLOR, FALLBACK_ICON};
    use crate::error::{Error, ValidationError};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_body() -> serde_json::Value {
        json!({
            "user": {"id": 3, "nombre": "Ana", "correo_electronico": "ana@example.com"},
            "categories": [
                {"id": 1, "nombre": "Work", "icono": "briefcase", "color": "#FF7306", "numero_articulos": 2},
                {"id": 2, "nombre": "Reading", "icono": "book", "color": "#1E90FF", "numero_articulos": 0}
            ],
            "articles": []
        })
    }

    async fn loaded(server: &MockServer) -> CategoryCollection<HttpApi> {
        Mock::given(method("GET"))
            .and(path("/user/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
            .mount(server)
            .await;
        let mut categories = CategoryCollection::new(HttpApi::new(&server.uri()).unwrap());
        categories.load(UserId(3)).await.unwrap();
        categories
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let server = MockServer::start().await;
        let categories = loaded(&server).await;

        let names: Vec<&str> = categories.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Reading"]);
        assert_eq!(categories.get(CategoryId(1)).unwrap().article_count, 2);
    }

    #[tokio::test]
    async fn test_load_keeps_category_with_retired_icon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 3, "nombre": "Ana", "correo_electronico": "ana@example.com"},
                "categories": [
                    {"id": 1, "nombre": "Work", "icono": "briefcase", "color": "#FF7306"},
                    {"id": 4, "nombre": "Food", "icono": "restaurant", "color": "#ABCDEF"}
                ]
            })))
            .mount(&server)
            .await;
        let mut categories = CategoryCollection::new(HttpApi::new(&server.uri()).unwrap());

        categories.load(UserId(3)).await.unwrap();

        let food = categories.get(CategoryId(4)).unwrap();
        assert_eq!(food.icon, FALLBACK_ICON);
        assert_eq!(food.color, DEFAULT_COLOR);
        assert_eq!(categories.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_state() {
        let server = MockServer::start().await;
        let mut categories = loaded(&server).await;
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/user/3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = categories.load(UserId(3)).await.unwrap_err();

        assert!(matches!(err, Error::Api(_)));
        assert_eq!(categories.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_create_sends_request_without_local_insert() {
        let server = MockServer::start().await;
        let categories = loaded(&server).await;
        Mock::given(method("POST"))
            .and(path("/categories"))
            .and(body_json(json!({
                "nombre": "Ideas",
                "icono": "star",
                "color": "#FF7306",
                "id_usuario": 3
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Categoría creada"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = categories
            .create("  Ideas ", "star", "#ff7306", UserId(3))
            .await
            .unwrap();

        assert_eq!(outcome.next, Route::Home { refresh: true });
        assert_eq!(outcome.message.as_deref(), Some("Categoría creada"));
        assert_eq!(categories.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_create_with_missing_field_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let categories = CategoryCollection::new(HttpApi::new(&server.uri()).unwrap());

        for (name, icon, color, field) in [
            ("", "star", "#FF7306", "Name"),
            ("\x1b[0m ", "star", "#FF7306", "Name"),
            ("Ideas", "", "#FF7306", "Icon"),
            ("Ideas", "star", " ", "Color"),
        ] {
            let err = categories.create(name, icon, color, UserId(3)).await.unwrap_err();
            assert!(
                matches!(err, Error::Validation(ValidationError::MissingField(f)) if f == field),
                "unexpected error for {field}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_with_unknown_icon_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let categories = CategoryCollection::new(HttpApi::new(&server.uri()).unwrap());

        let err = categories
            .create("Ideas", "not-an-icon", "#FF7306", UserId(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownIcon(_))
        ));

        let err = categories
            .create("Ideas", "star", "#123456", UserId(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownColor(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let server = MockServer::start().await;
        let mut categories = loaded(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/categories/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        categories.delete(CategoryId(1)).await.unwrap();

        assert!(categories.get(CategoryId(1)).is_none());
        assert!(categories.pending_reconcile().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_local_removal() {
        let server = MockServer::start().await;
        let mut categories = loaded(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/categories/1"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let err = categories.delete(CategoryId(1)).await.unwrap_err();

        assert_eq!(err.notice(), "boom");
        assert!(categories.get(CategoryId(1)).is_none());
        assert!(categories.pending_reconcile().contains(&CategoryId(1)));
    }

    #[tokio::test]
    async fn test_load_clears_pending_reconcile() {
        let server = MockServer::start().await;
        let mut categories = loaded(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/categories/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let _ = categories.delete(CategoryId(1)).await;

        categories.load(UserId(3)).await.unwrap();

        assert!(categories.pending_reconcile().is_empty());
        assert!(categories.get(CategoryId(1)).is_some());
    }

    #[tokio::test]
    async fn test_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nombre": "Work"},
                {"value": "2", "label": "Reading"}
            ])))
            .mount(&server)
            .await;
        let categories = CategoryCollection::new(HttpApi::new(&server.uri()).unwrap());

        let options = categories.options(UserId(3)).await.unwrap();

        assert_eq!(
            options,
            vec![
                CategoryOption {
                    id: CategoryId(1),
                    label: "Work".to_string()
                },
                CategoryOption {
                    id: CategoryId(2),
                    label: "Reading".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_route_to_selected_category() {
        let server = MockServer::start().await;
        let categories = loaded(&server).await;

        assert_eq!(
            categories.route_to(CategoryId(2)),
            Some(Route::SelectedCategory {
                id: CategoryId(2),
                title: "Reading".to_string(),
                color: Color::parse("#1E90FF").unwrap(),
            })
        );
        assert_eq!(categories.route_to(CategoryId(9)), None);
    }
}
