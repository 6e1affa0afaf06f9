//! `/api/persons`: CRUD over the contact store.

use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;
use crate::store::{ContactDraft, ContactPatch};

type ApiResult = Result<Response, ApiError>;

/// Body of `POST` and `PUT` requests. Both fields are optional at the JSON
/// level; each route decides which ones it requires.
#[derive(Debug, Default, Deserialize)]
struct PersonBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: Option<String>,
}

/// `Some(value)` if the field was sent and is not the empty string.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

fn id_param(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}

// GET /api/persons
pub async fn list(_req: Request, state: AppState) -> ApiResult {
    let contacts = state.store.list().await?;
    Ok(Json(contacts).into_response())
}

// GET /api/persons/{id}
pub async fn get(req: Request, state: AppState) -> ApiResult {
    match state.store.get(id_param(&req)).await? {
        Some(contact) => Ok(Json(contact).into_response()),
        None => Err(ApiError::NotFound),
    }
}

// POST /api/persons
pub async fn create(req: Request, state: AppState) -> ApiResult {
    let body: PersonBody = req.json()?;
    let (Some(name), Some(number)) = (present(body.name), present(body.number)) else {
        return Err(ApiError::Missing("name or number missing"));
    };

    let contact = state.store.create(ContactDraft { name, number }).await?;
    debug!(id = %contact.id, "created contact");
    Ok(Json(contact).into_response())
}

// PUT /api/persons/{id}
pub async fn update(req: Request, state: AppState) -> ApiResult {
    let body: PersonBody = req.json()?;
    let Some(number) = present(body.number) else {
        return Err(ApiError::Missing("number missing"));
    };

    let patch = ContactPatch { name: body.name, number };
    match state.store.update(id_param(&req), patch).await? {
        Some(contact) => Ok(Json(contact).into_response()),
        None => Err(ApiError::NotFound),
    }
}

// DELETE /api/persons/{id}
pub async fn delete(req: Request, state: AppState) -> ApiResult {
    let existed = state.store.delete(id_param(&req)).await?;
    debug!(id = id_param(&req), existed, "deleted contact");
    Ok(Response::status(Status::NoContent))
}
