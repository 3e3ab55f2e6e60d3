//! User endpoints and the user side of the user-interest join.

use axum::{extract::State, http::StatusCode, Json};
use futures::future::try_join_all;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::crypto::hash_password;
use crate::db::{CreateUserRequest, DbPool, IdResponse, UpdateUserRequest, User, UserInterest};
use crate::AppState;

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::validation::{
    first_unaccepted_field, missing_user_field_message, validate_email, ACCEPTED_USER_FIELDS,
};

const EMAIL_TAKEN: &str = "An account with that email already exists.";

fn hash_optional_password(password: Option<&str>) -> Result<Option<String>, ApiError> {
    password
        .map(hash_password)
        .transpose()
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to store password")
        })
}

/// List all users
///
/// GET /users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users))
}

/// Get a single user
///
/// GET /users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with the id of {} was found.", id)))?;

    Ok(Json(user))
}

/// Create a new user
///
/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let user = req
        .into_new_user()
        .map_err(|field| ApiError::validation(missing_user_field_message(field)))?;

    validate_email(&user.email).map_err(ApiError::validation)?;

    let password = hash_optional_password(user.password.as_deref())?;

    // Uniqueness of the email is left to the UNIQUE constraint
    let result = sqlx::query(
        "INSERT INTO users (name, email, password, building_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&password)
    .bind(user.building_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        ApiError::from(e)
            .on_conflict(EMAIL_TAKEN)
            .on_invalid_reference(ApiError::validation(format!(
                "Building {} does not exist.",
                user.building_id
            )))
    })?;

    let id = result.last_insert_rowid();
    info!(user_id = id, email = %user.email, "User created");

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Update whitelisted fields of a user
///
/// PUT /users/:id
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<Map<String, Value>>,
) -> Result<Json<IdResponse>, ApiError> {
    if first_unaccepted_field(&body, &ACCEPTED_USER_FIELDS).is_some() {
        return Err(ApiError::validation(
            "Looks like you are using unaccepted parameters.",
        ));
    }

    let req = serde_json::from_value::<UpdateUserRequest>(Value::Object(body))
        .map_err(|e| ApiError::validation(e.to_string()))?
        .without_empty_password();

    if req.is_empty() {
        return Err(ApiError::validation("No fields were provided to update."));
    }

    if req.name.as_deref() == Some("") {
        return Err(ApiError::validation("name cannot be empty."));
    }

    if let Some(ref email) = req.email {
        validate_email(email).map_err(ApiError::validation)?;
    }

    let password = hash_optional_password(req.password.as_deref())?;

    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            email = COALESCE(?, email),
            password = COALESCE(?, password),
            building_id = COALESCE(?, building_id)
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password)
    .bind(req.building_id)
    .bind(id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        ApiError::from(e)
            .on_conflict(EMAIL_TAKEN)
            .on_invalid_reference(ApiError::validation(format!(
                "Building {} does not exist.",
                req.building_id.unwrap_or_default()
            )))
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!(
            "Could not find user with id: {}.",
            id
        )));
    }

    info!(user_id = id, "User updated");
    Ok(Json(IdResponse { id }))
}

/// Delete a user (their saved interests go with them)
///
/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<String, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!(
            "Could not find user with id {}.",
            id
        )));
    }

    info!(user_id = id, "User deleted");
    Ok(format!("User {} was successfully deleted", id))
}

/// Save an interest for a user
///
/// POST /users/:id/interests/:interest_id
pub async fn add_user_interest(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, interest_id)): ApiPath<(i64, i64)>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let result = sqlx::query("INSERT INTO user_interests (user_id, interest_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(interest_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            ApiError::from(e)
                .on_conflict("Interest is already saved for this user.")
                .on_invalid_reference(ApiError::not_found(format!(
                    "Could not find user {} or interest {}.",
                    user_id, interest_id
                )))
        })?;

    let id = result.last_insert_rowid();
    info!(user_id, interest_id, "User interest saved");

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Remove a saved interest from a user
///
/// DELETE /users/:id/interests/:interest_id
pub async fn remove_user_interest(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, interest_id)): ApiPath<(i64, i64)>,
) -> Result<String, ApiError> {
    let result = sqlx::query("DELETE FROM user_interests WHERE user_id = ? AND interest_id = ?")
        .bind(user_id)
        .bind(interest_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Could not find a matching user interest."));
    }

    info!(user_id, interest_id, "User interest removed");
    Ok(format!(
        "Interest {} was successfully deleted for user {}.",
        interest_id, user_id
    ))
}

async fn interest_name(db: &DbPool, interest_id: i64) -> Result<String, ApiError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM interests WHERE id = ?")
        .bind(interest_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            tracing::error!(interest_id, "Saved user interest points at a missing interest");
            ApiError::internal(format!("Interest {} no longer exists.", interest_id))
        })
}

/// Names of every interest saved by a user, in the order they were saved
///
/// GET /users/:id/interests
pub async fn list_user_interests(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Vec<String>>, ApiError> {
    let saved = sqlx::query_as::<_, UserInterest>(
        "SELECT * FROM user_interests WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    if saved.is_empty() {
        return Err(ApiError::not_found(format!(
            "Could not find interests for user {}",
            user_id
        )));
    }

    // Lookups run concurrently; try_join_all keeps results in input order
    let names = try_join_all(
        saved
            .iter()
            .map(|row| interest_name(&state.db, row.interest_id)),
    )
    .await?;

    Ok(Json(names))
}
