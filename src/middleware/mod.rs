//! Middleware layer.
//!
//! Cross-cutting concerns applied by [`Router::handle`](crate::Router::handle)
//! around every request:
//!
//! - [`trace`]: one structured log line per request with method, path,
//!   status, length, latency and the request body
//! - [`cors`]: permissive cross-origin headers and preflight answers, enabled
//!   with [`Router::cors`](crate::Router::cors)

pub mod cors;
pub mod trace;
