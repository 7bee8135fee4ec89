//! User CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::extractors::{UserId, ValidJson};
use crate::model::{CreateUser, UpdateUser, UserFilters};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

/// Build list filters from the query string. Blank values count as absent,
/// other values are matched as sent; a non-numeric `age` is rejected rather than ignored.
fn parse_filters(params: &HashMap<String, String>) -> Result<UserFilters, AppError> {
    let value = |key: &str| params.get(key).filter(|v| !v.trim().is_empty()).cloned();
    let age = match value("age") {
        Some(raw) => Some(
            raw.trim()
                .parse::<i32>()
                .map_err(|_| AppError::Validation("age must be an integer".into()))?,
        ),
        None => None,
    };
    Ok(UserFilters {
        name: value("name"),
        email: value("email"),
        age,
    })
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.create(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users?name=&email=&age=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filters = parse_filters(&params)?;
    let users = state.users.list(&filters).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn read(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    UserId(id): UserId,
    ValidJson(body): ValidJson<UpdateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.update(id, body).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<impl IntoResponse, AppError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn filters_from_query() {
        let f = parse_filters(&params(&[("name", "John"), ("age", "30"), ("page", "2")])).unwrap();
        assert_eq!(
            f,
            UserFilters { name: Some("John".into()), email: None, age: Some(30) }
        );
    }

    #[test]
    fn blank_filters_are_absent() {
        let f = parse_filters(&params(&[("name", ""), ("email", "  "), ("age", "")])).unwrap();
        assert_eq!(f, UserFilters::default());
    }

    #[test]
    fn text_filters_keep_surrounding_whitespace() {
        let f = parse_filters(&params(&[("name", " Doe"), ("email", "x "), ("age", " 30 ")])).unwrap();
        assert_eq!(f.name.as_deref(), Some(" Doe"));
        assert_eq!(f.email.as_deref(), Some("x "));
        assert_eq!(f.age, Some(30));
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let err = parse_filters(&params(&[("age", "thirty")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
