//! Document CRUD API.
//!
//! - `GET /api/docs` lists documents without content
//! - `POST /api/docs` creates a document (slug derived from the title if omitted)
//! - `GET|PUT|DELETE /api/docs/{slug}` read, partially update, or remove one document
//!
//! Successful responses wrap the payload in `{"data": ...}`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use o24_renderer::slugify;
use o24_store::{Document, DocumentStore, DocumentSummary, DocumentUpdate, NewDocument};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Success envelope.
#[derive(Serialize)]
pub(crate) struct DataResponse<T> {
    data: T,
}

/// Response for DELETE.
#[derive(Serialize)]
pub(crate) struct MessageResponse {
    message: String,
}

/// Handle GET /api/docs.
pub(crate) async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<Vec<DocumentSummary>>>, ServerError> {
    let data = state.site.store().list_documents().await?;
    Ok(Json(DataResponse { data }))
}

/// Handle POST /api/docs.
pub(crate) async fn create_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewDocument>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Document>>), ServerError> {
    let Json(mut new) = payload?;

    if new.slug.trim().is_empty() {
        new.slug = slugify(&new.title);
    }
    if new.title.trim().is_empty() || new.slug.is_empty() {
        return Err(ServerError::BadRequest(
            "Title and slug are required".to_owned(),
        ));
    }

    let data = state.site.store().create_document(new).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// Handle GET /api/docs/{slug}.
pub(crate) async fn get_document(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<Document>>, ServerError> {
    match state.site.store().get_document(&slug).await? {
        Some(data) => Ok(Json(DataResponse { data })),
        None => Err(ServerError::DocumentNotFound(slug)),
    }
}

/// Handle PUT /api/docs/{slug}.
pub(crate) async fn update_document(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DocumentUpdate>, JsonRejection>,
) -> Result<Json<DataResponse<Document>>, ServerError> {
    let Json(update) = payload?;
    let data = state.site.store().update_document(&slug, update).await?;
    Ok(Json(DataResponse { data }))
}

/// Handle DELETE /api/docs/{slug}.
pub(crate) async fn delete_document(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.site.store().delete_document(&slug).await?;
    Ok(Json(MessageResponse {
        message: "Document deleted".to_owned(),
    }))
}
