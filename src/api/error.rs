//! Mapping of request failures onto HTTP responses.

use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::store::{ErrorKind, StoreError};

/// Everything a person handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required body field was absent or empty.
    #[error("{0}")]
    Missing(&'static str),

    /// The body is not the JSON object the route expects.
    #[error("malformatted request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::Missing(_) | Self::MalformedBody(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::Store(e) => match e.kind() {
                ErrorKind::Cast | ErrorKind::Validation => Status::BadRequest,
                ErrorKind::Other => Status::InternalServerError,
            },
        }
    }

    /// The `error` field of the JSON body, or `None` for an empty body.
    fn reason(&self) -> Option<String> {
        match self {
            Self::Missing(reason) => Some((*reason).to_owned()),
            Self::MalformedBody(_) => Some("malformatted request body".to_owned()),
            Self::NotFound => None,
            Self::Store(e) => Some(match e.kind() {
                ErrorKind::Cast => "malformatted id".to_owned(),
                ErrorKind::Validation => e.to_string(),
                ErrorKind::Other => "internal server error".to_owned(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            Status::InternalServerError => error!(error = %self, "request failed"),
            Status::NotFound => {}
            _ => warn!(error = %self, "request rejected"),
        }

        match self.reason() {
            Some(reason) => Response::builder()
                .status(status)
                .json(json!({ "error": reason }).to_string()),
            None => Response::status(status),
        }
    }
}
