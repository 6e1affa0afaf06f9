//! Human-facing pages: the greeting and the phonebook summary.

use chrono::{DateTime, Local, TimeZone};

use super::error::ApiError;
use super::AppState;
use crate::request::Request;
use crate::response::Response;

// GET /
pub async fn root(_req: Request, _state: AppState) -> Response {
    Response::html("<h1>Phonebook backend</h1>")
}

// GET /info
pub async fn info(_req: Request, state: AppState) -> Result<Response, ApiError> {
    let count = state.store.count().await?;
    Ok(Response::html(info_page(count, &Local::now())))
}

fn info_page<Tz>(count: usize, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let people = if count == 1 { "person" } else { "people" };
    format!(
        "<p>Phonebook has info for {count} {people}</p><p>{}</p>",
        now.format("%a %b %d %Y %H:%M:%S GMT%z"),
    )
}
