use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::catalog::CatalogError;
use crate::application::repos::{CreateItemParams, RepoError, UpdateItemParams};

use super::error::{ApiError, codes};
use super::models::*;
use super::state::AppState;

pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.catalog.list_items().await.map_err(catalog_to_api)?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.catalog.get_item(id).await.map_err(catalog_to_api)?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = CreateItemParams {
        image: payload.image,
        company: payload.company,
        item_name: payload.item_name,
        original_price: payload.original_price,
        current_price: payload.current_price,
        discount_percentage: payload.discount_percentage,
        return_period: payload.return_period,
        delivery_date: payload.delivery_date,
        rating_stars: payload.rating.stars,
        rating_count: payload.rating.count,
    };

    let item = state
        .catalog
        .create_item(params)
        .await
        .map_err(catalog_to_api)?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemPatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rating = payload.rating.unwrap_or_default();
    let params = UpdateItemParams {
        image: payload.image,
        company: payload.company,
        item_name: payload.item_name,
        original_price: payload.original_price,
        current_price: payload.current_price,
        discount_percentage: payload.discount_percentage,
        return_period: payload.return_period,
        delivery_date: payload.delivery_date,
        rating_stars: rating.stars,
        rating_count: rating.count,
    };

    let item = state
        .catalog
        .update_item(id, params)
        .await
        .map_err(catalog_to_api)?;

    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog
        .delete_item(id)
        .await
        .map_err(catalog_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.catalog.cache_stats();

    match state.db.health_check().await {
        Ok(()) => {
            let body = HealthResponse {
                status: "ok",
                database: "ok",
                cache,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            let body = HealthResponse {
                status: "degraded",
                database: "unavailable",
                cache,
            };
            let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
            crate::application::error::ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

fn catalog_to_api(err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound => ApiError::not_found("Item not found"),
        CatalogError::Validation(message) => {
            ApiError::bad_request("Invalid item payload", Some(message))
        }
        CatalogError::Repo(repo) => repo_to_api(repo),
    }
}

fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("Item not found"),
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(message),
        ),
    }
}
