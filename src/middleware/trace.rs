//! Per-request access log.

use std::time::Duration;

use tracing::info;

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// Bytes of a request body that make it into the access log.
const LOGGED_BODY_BYTES: usize = 512;

/// The request body as it should appear in the access log, if any.
///
/// Bodies longer than [`LOGGED_BODY_BYTES`] are cut and tagged with their
/// full length.
pub(crate) fn body_for_log(req: &Request) -> Option<String> {
    let body = req.body();
    if body.is_empty() {
        return None;
    }
    if body.len() <= LOGGED_BODY_BYTES {
        return Some(String::from_utf8_lossy(body).into_owned());
    }
    let head = String::from_utf8_lossy(&body[..LOGGED_BODY_BYTES]);
    Some(format!("{head}... ({} bytes)", body.len()))
}

/// Emits the access-log event for one finished request.
pub(crate) fn log_request(
    method: Method,
    path: &str,
    response: &Response,
    elapsed: Duration,
    body: Option<&str>,
) {
    info!(
        method = %method,
        path,
        status = response.status_code(),
        content_length = response.body().len(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        body = body.unwrap_or("-"),
        "request"
    );
}
