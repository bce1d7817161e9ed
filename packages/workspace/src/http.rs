//! HTTP transport for the content service.
//!
//! - `GET  /api/pages`              list editable pages
//! - `GET  /api/content?path=/x`    editable content of a page
//! - `POST /api/content`            save content (`Authorization: Bearer <credential>`)
//!
//! Failures render as `{ "error": <kind>, "message": <user message> }`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use pagesmith_editor::VersionTag;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::{ContentService, SaveRequest, ServiceError};

pub fn router(service: ContentService) -> Router {
    Router::new()
        .route("/api/pages", get(list_pages))
        .route("/api/content", get(get_content).post(save_content))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.kind(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ContentQuery {
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody {
    #[serde(default)]
    path: String,
    #[serde(default)]
    content: String,
    title: Option<String>,
    message: Option<String>,
    base_version: Option<VersionTag>,
}

/// Credential from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    Some(token.trim().to_string())
}

async fn list_pages(State(service): State<ContentService>) -> impl IntoResponse {
    Json(service.list_pages())
}

async fn get_content(
    State(service): State<ContentService>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return ServiceError::Validation(rejection.body_text()).into_response(),
    };

    match service.get_content(&query.path).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => {
            tracing::info!(path = %query.path, error = %e, "content request failed");
            e.into_response()
        }
    }
}

async fn save_content(
    State(service): State<ContentService>,
    headers: HeaderMap,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::info!(status = %rejection.status(), "malformed save body");
            return ServiceError::Validation(rejection.body_text()).into_response();
        }
    };

    let request = SaveRequest {
        path: body.path,
        content: body.content,
        title: body.title,
        message: body.message,
        credential: bearer_token(&headers),
        base_version: body.base_version,
    };

    match service.save_content(request).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => e.into_response(),
    }
}
