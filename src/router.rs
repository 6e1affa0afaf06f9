//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler. The application state is owned by the router and handed to
//! every handler, so there is nothing global to reach for.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{cors, trace};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// One radix tree per HTTP method. Build it once at startup and pass it to
/// [`Server::serve`](crate::Server::serve). Each [`Router::on`] call returns
/// `self` so registrations chain naturally.
pub struct Router<S = ()> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    fallback: Option<BoxedHandler<S>>,
    cors: bool,
    state: S,
}

impl Router<()> {
    /// A router whose handlers take no application state (`()`).
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// A router that hands a clone of `state` to every handler.
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), fallback: None, cors: false, state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use phonebook::{Method, Request, Response, Router};
    /// # async fn get_person(_: Request, _: ()) -> Response { Response::text("") }
    /// # async fn create_person(_: Request, _: ()) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/api/persons/{id}", get_person)
    ///     .on(Method::Post, "/api/persons",      create_person);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for the same method. Routes are wired once at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Handler for requests that match no route.
    ///
    /// Paths routed under another method still get `405 Method Not Allowed`;
    /// without a fallback everything else gets `404 Not Found`.
    pub fn fallback(mut self, handler: impl Handler<S>) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// Enables permissive CORS headers and `OPTIONS` preflight answers.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Dispatches one request and produces one response.
    ///
    /// This is what the server calls per request; it is public so the whole
    /// application can be exercised in-process.
    pub async fn handle(&self, mut req: Request) -> Response {
        let started = Instant::now();
        let method = req.method();
        let path = req.path.clone();
        let body = trace::body_for_log(&req);

        let mut response = if self.cors && method == Method::Options {
            cors::preflight()
        } else {
            match self.lookup(method, &path) {
                Some((handler, params)) => {
                    req.params = params;
                    handler.call(req, self.state.clone()).await
                }
                None if self.routed_elsewhere(method, &path) => {
                    Response::status(Status::MethodNotAllowed)
                }
                None => match &self.fallback {
                    Some(fallback) => fallback.call(req, self.state.clone()).await,
                    None => Response::status(Status::NotFound),
                },
            }
        };

        if method == Method::Head {
            response.body = Bytes::new();
        }
        if self.cors {
            cors::apply(&mut response);
        }
        trace::log_request(method, &path, &response, started.elapsed(), body.as_deref());
        response
    }

    /// Finds the handler for `method` and `path`. `HEAD` falls back to the
    /// `GET` route.
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let matched = self.routes.get(&method).and_then(|tree| tree.at(path).ok());
        let matched = match (matched, method) {
            (Some(matched), _) => matched,
            (None, Method::Head) => self.routes.get(&Method::Get)?.at(path).ok()?,
            (None, _) => return None,
        };
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn routed_elsewhere(&self, method: Method, path: &str) -> bool {
        self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }
}
