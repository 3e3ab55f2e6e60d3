//! Interest endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{CreateInterestRequest, IdResponse, Interest, InterestQuery};
use crate::AppState;

use super::error::ApiError;
use super::extract::{ApiJson, ApiQuery};

/// List every interest, or with `?interest=NAME` the users holding that interest
///
/// GET /interests
pub async fn list_interests(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<InterestQuery>,
) -> Result<Response, ApiError> {
    match query.interest {
        Some(name) => Ok(users_with_interest(&state, &name).await?.into_response()),
        None => {
            let interests =
                sqlx::query_as::<_, Interest>("SELECT * FROM interests ORDER BY id")
                    .fetch_all(&state.db)
                    .await?;
            Ok(Json(interests).into_response())
        }
    }
}

/// Display names of the users holding the named interest, in the order
/// the interest was saved
async fn users_with_interest(state: &AppState, name: &str) -> Result<Json<Vec<String>>, ApiError> {
    let interest = sqlx::query_as::<_, Interest>("SELECT * FROM interests WHERE name = ?")
        .bind(name)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Interest {} is not valid.", name)))?;

    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT users.name
        FROM user_interests
        JOIN users ON users.id = user_interests.user_id
        WHERE user_interests.interest_id = ?
        ORDER BY user_interests.id
        "#,
    )
    .bind(interest.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(names))
}

/// Create a new interest
///
/// POST /interests
pub async fn create_interest(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateInterestRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let name = req.name.filter(|n| !n.is_empty()).ok_or_else(|| {
        ApiError::validation(
            "Expected format: { name: <String> }. You're missing a \"name\" property.",
        )
    })?;

    let result = sqlx::query("INSERT INTO interests (name) VALUES (?)")
        .bind(&name)
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::from(e).on_conflict(format!("Interest {} already exists.", name)))?;

    let id = result.last_insert_rowid();
    info!(interest_id = id, name = %name, "Interest created");

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seeded_app, send_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_interests_golf_first() {
        let app = seeded_app().await;
        let (status, body) = send_json(&app, "GET", "/api/v1/interests", None).await;

        assert_eq!(status, StatusCode::OK);
        let interests = body.as_array().unwrap();
        assert_eq!(interests.len(), 14);
        assert_eq!(interests[0], json!({ "id": 1, "name": "golf" }));
    }

    #[tokio::test]
    async fn test_users_with_interest() {
        let app = seeded_app().await;
        let (status, body) =
            send_json(&app, "GET", "/api/v1/interests?interest=golf", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Gray Smith"]));
    }

    #[tokio::test]
    async fn test_users_with_interest_in_saved_order() {
        let app = seeded_app().await;
        let (status, body) =
            send_json(&app, "GET", "/api/v1/interests?interest=hiking", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Gray Smith", "Luis Ortega"]));
    }

    #[tokio::test]
    async fn test_interest_nobody_holds() {
        let app = seeded_app().await;
        let (status, body) =
            send_json(&app, "GET", "/api/v1/interests?interest=skiing", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_interest_is_404() {
        let app = seeded_app().await;
        let (status, body) =
            send_json(&app, "GET", "/api/v1/interests?interest=cheesemongering", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "error": "Interest cheesemongering is not valid." })
        );
    }

    #[tokio::test]
    async fn test_repeated_interest_parameter_is_422() {
        let app = seeded_app().await;
        let (status, body) = send_json(
            &app,
            "GET",
            "/api/v1/interests?interest=golf&interest=hiking",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("duplicate field `interest`"));
    }

    #[tokio::test]
    async fn test_create_interest() {
        let app = seeded_app().await;
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/v1/interests",
            Some(json!({ "name": "tennis" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "id": 15 }));
    }

    #[tokio::test]
    async fn test_create_interest_missing_name() {
        let app = seeded_app().await;
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/v1/interests",
            Some(json!({ "skills": "cheese mongering" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_interest_mistyped_name() {
        let app = seeded_app().await;
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/v1/interests",
            Some(json!({ "name": 42 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_duplicate_interest() {
        let app = seeded_app().await;
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/v1/interests",
            Some(json!({ "name": "golf" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Interest golf already exists." }));
    }
}
