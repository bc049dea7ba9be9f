//! JSON shapes exactly as the backend sends and expects them.
//!
//! Field names follow the server (`nombre`, `titulo`, `id_categoria`, ...).
//! Nothing outside `api` and `session` sees these types.
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Color, Icon, DEFAULT_COLOR, FALLBACK_ICON};
use crate::ids::{ArticleId, CategoryId, UserId};
use crate::model::{Article, Category, CategoryOption, SearchHit, UserIdentity};

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct UserWire {
    pub id: UserId,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub correo_electronico: String,
}

impl From<UserWire> for UserIdentity {
    fn from(user: UserWire) -> Self {
        UserIdentity {
            id: user.id,
            name: user.nombre,
            email: user.correo_electronico,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct CategoryWire {
    pub id: CategoryId,
    pub nombre: String,
    #[serde(default = "fallback_icon", deserialize_with = "lenient_icon")]
    pub icono: Icon,
    #[serde(default = "fallback_color", deserialize_with = "lenient_color")]
    pub color: Color,
    #[serde(default)]
    pub numero_articulos: i64,
}

impl From<CategoryWire> for Category {
    fn from(c: CategoryWire) -> Self {
        Category {
            id: c.id,
            name: c.nombre,
            icon: c.icono,
            color: c.color,
            article_count: c.numero_articulos,
        }
    }
}

impl From<&Category> for CategoryWire {
    fn from(c: &Category) -> Self {
        CategoryWire {
            id: c.id,
            nombre: c.name.clone(),
            icono: c.icon,
            color: c.color,
            numero_articulos: c.article_count,
        }
    }
}

fn fallback_icon() -> Icon {
    FALLBACK_ICON
}

fn fallback_color() -> Color {
    DEFAULT_COLOR
}

// Stored categories may predate the current picker tables, or have no icon
// at all. They still decode; only new categories are held to the tables.
fn lenient_icon<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Icon, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(match name.as_deref().map(Icon::parse) {
        Some(Ok(icon)) => icon,
        _ => {
            tracing::warn!(icon = ?name, "Category icon not in catalog, using fallback");
            FALLBACK_ICON
        }
    })
}

fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let hex = Option::<String>::deserialize(deserializer)?;
    Ok(match hex.as_deref().map(Color::parse) {
        Some(Ok(color)) => color,
        _ => {
            tracing::warn!(color = ?hex, "Category color not in catalog, using default");
            DEFAULT_COLOR
        }
    })
}

fn default_priority() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleWire {
    pub id: ArticleId,
    pub titulo: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default = "default_priority")]
    pub prioridad: i64,
    pub id_categoria: CategoryId,
    #[serde(default)]
    pub id_usuario: Option<UserId>,
}

impl From<ArticleWire> for Article {
    fn from(a: ArticleWire) -> Self {
        Article {
            id: a.id,
            title: a.titulo,
            body: a.texto,
            priority: a.prioridad,
            category_id: a.id_categoria,
            user_id: a.id_usuario,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHitWire {
    pub id: ArticleId,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub id_categoria: Option<CategoryId>,
}

impl From<SearchHitWire> for SearchHit {
    fn from(h: SearchHitWire) -> Self {
        SearchHit {
            id: h.id,
            title: h.titulo,
            body: h.texto,
            category_id: h.id_categoria,
        }
    }
}

/// Picker entries. Older server builds answer with `{value, label}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryOptionWire {
    #[serde(alias = "value")]
    pub id: CategoryId,
    #[serde(alias = "label")]
    pub nombre: String,
}

impl From<CategoryOptionWire> for CategoryOption {
    fn from(o: CategoryOptionWire) -> Self {
        CategoryOption {
            id: o.id,
            label: o.nombre,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub user: UserWire,
    #[serde(default)]
    pub categories: Option<Vec<CategoryWire>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub user: UserWire,
    #[serde(default)]
    pub categories: Option<Vec<CategoryWire>>,
    #[serde(default)]
    pub articles: Option<Vec<ArticleWire>>,
}

/// Body of any 2xx response that carries only a status text.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Failure {
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub correo_electronico: &'a str,
    pub contrasena: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub nombre: &'a str,
    pub correo_electronico: &'a str,
    pub contrasena: &'a str,
    pub acepta_terminos: bool,
}

#[derive(Serialize)]
pub(crate) struct PasswordResetRequest<'a> {
    pub correo_electronico: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub contrasena_actual: &'a str,
    pub nueva_contrasena: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenameRequest<'a> {
    pub nuevo_nombre: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeEmailRequest<'a> {
    pub nuevo_correo: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CreateCategoryRequest<'a> {
    pub nombre: &'a str,
    pub icono: Icon,
    pub color: Color,
    pub id_usuario: UserId,
}

#[derive(Serialize)]
pub(crate) struct CreateArticleRequest<'a> {
    pub titulo: &'a str,
    pub texto: &'a str,
    pub prioridad: i64,
    pub id_categoria: CategoryId,
    pub id_usuario: UserId,
}

#[derive(Serialize)]
pub(crate) struct EditArticleRequest<'a> {
    pub titulo: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_response_with_string_ids() {
        let body = json!({
            "user": {"id": "3", "nombre": "Ana", "correo_electronico": "ana@example.com"},
            "categories": [
                {"id": 1, "nombre": "Work", "icono": "briefcase", "color": "#FF7306", "numero_articulos": 2}
            ],
            "articles": [
                {"id": "10", "titulo": "Plan", "id_categoria": "1"}
            ]
        });
        let parsed: UserResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.user.id, UserId(3));
        let article: Article = parsed.articles.unwrap().remove(0).into();
        assert_eq!(article.id, ArticleId(10));
        assert_eq!(article.category_id, CategoryId(1));
        assert_eq!(article.priority, 1);
        assert_eq!(article.body, "");
        assert_eq!(article.user_id, None);
    }

    #[test]
    fn test_category_off_catalog_values_fall_back() {
        let body = json!({"id": 1, "nombre": "Food", "icono": "restaurant", "color": "#123456"});
        let category: Category = serde_json::from_value::<CategoryWire>(body).unwrap().into();
        assert_eq!(category.icon, FALLBACK_ICON);
        assert_eq!(category.color, DEFAULT_COLOR);

        let body = json!({"id": 2, "nombre": "Bare", "icono": null});
        let category: Category = serde_json::from_value::<CategoryWire>(body).unwrap().into();
        assert_eq!(category.icon, FALLBACK_ICON);
        assert_eq!(category.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_category_catalog_values_kept() {
        let body = json!({"id": 1, "nombre": "Work", "icono": "briefcase", "color": "#1e90ff"});
        let category: Category = serde_json::from_value::<CategoryWire>(body).unwrap().into();
        assert_eq!(category.icon, Icon::parse("briefcase").unwrap());
        assert_eq!(category.color.as_str(), "#1E90FF");
    }

    #[test]
    fn test_option_accepts_legacy_shape() {
        let body = json!([{"value": "4", "label": "Ideas"}]);
        let parsed: Vec<CategoryOptionWire> = serde_json::from_value(body).unwrap();
        assert_eq!(parsed[0].id, CategoryId(4));
        assert_eq!(parsed[0].nombre, "Ideas");
    }

    #[test]
    fn test_password_change_uses_camel_case_keys() {
        let body = serde_json::to_value(ChangePasswordRequest {
            contrasena_actual: "old",
            nueva_contrasena: "new",
        })
        .unwrap();
        assert_eq!(body, json!({"contrasenaActual": "old", "nuevaContrasena": "new"}));
    }

    #[test]
    fn test_create_article_ids_are_numbers() {
        let body = serde_json::to_value(CreateArticleRequest {
            titulo: "T",
            texto: "B",
            prioridad: 1,
            id_categoria: CategoryId(5),
            id_usuario: UserId(9),
        })
        .unwrap();
        assert_eq!(body["id_categoria"], json!(5));
        assert_eq!(body["id_usuario"], json!(9));
    }
}
