//! Permissive CORS: any origin, the methods the API routes on.

use crate::response::Response;
use crate::status::Status;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";
const ALLOW_HEADERS: &str = "content-type";

/// Answer to an `OPTIONS` preflight request.
pub(crate) fn preflight() -> Response {
    Response::builder()
        .status(Status::NoContent)
        .header("access-control-allow-methods", ALLOW_METHODS)
        .header("access-control-allow-headers", ALLOW_HEADERS)
        .no_body()
}

/// Adds the allow-origin header to an outgoing response.
pub(crate) fn apply(response: &mut Response) {
    response.set_default_header("access-control-allow-origin", ALLOW_ORIGIN);
}
