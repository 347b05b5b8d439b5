use serde::{Deserialize, Serialize};

use crate::application::catalog::FilterParams;
use crate::application::favorites::UserDraft;

#[derive(Debug, Deserialize)]
pub struct MangaNameQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteQuery {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            id: request.id,
            email: request.email,
            name: request.name,
            image: request.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub is_favorite: bool,
}

/// Collects filter criteria from raw query pairs.
///
/// Genres may repeat as `genres[]` or `genres`; page values that do not parse
/// are ignored.
pub fn filter_params_from_pairs(pairs: Vec<(String, String)>) -> FilterParams {
    let mut params = FilterParams::default();
    for (key, value) in pairs {
        match key.as_str() {
            "name" => params.name = Some(value),
            "genres[]" | "genres" => params.genres.push(value),
            "status" => params.status = Some(value),
            "country" => params.country = Some(value),
            "orderField" => params.order_field = Some(value),
            "orderSort" => params.order_sort = Some(value),
            "page" => params.page = value.trim().parse().ok(),
            "perPage" => params.per_page = value.trim().parse().ok(),
            _ => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_genres_accumulate() {
        let params = filter_params_from_pairs(pairs(&[
            ("genres[]", "Action"),
            ("genres[]", "Drama"),
            ("status", "ongoing"),
            ("page", "2"),
            ("perPage", "ten"),
        ]));

        assert_eq!(params.genres, vec!["Action", "Drama"]);
        assert_eq!(params.status.as_deref(), Some("ongoing"));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.per_page, None);
    }

    #[test]
    fn favorite_response_uses_camel_case() {
        let body = serde_json::to_value(FavoriteResponse { is_favorite: true }).unwrap();
        assert_eq!(body, serde_json::json!({ "isFavorite": true }));
    }
}
