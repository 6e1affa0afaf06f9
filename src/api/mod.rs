//! The phonebook HTTP API.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`pages::root`] |
//! | `GET /info` | [`pages::info`] |
//! | `GET /api/persons` | [`persons::list`] |
//! | `GET /api/persons/{id}` | [`persons::get`] |
//! | `POST /api/persons` | [`persons::create`] |
//! | `PUT /api/persons/{id}` | [`persons::update`] |
//! | `DELETE /api/persons/{id}` | [`persons::delete`] |
//!
//! Anything else falls through to the static bundle, if one is configured.

pub mod error;
pub mod pages;
pub mod persons;

use std::sync::Arc;

use crate::assets::{self, StaticFiles};
use crate::method::Method;
use crate::router::Router;
use crate::store::ContactStore;

pub use error::ApiError;

/// What every handler gets: the store handle and the optional bundle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub assets: Option<StaticFiles>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store, assets: None }
    }

    pub fn with_assets(mut self, assets: StaticFiles) -> Self {
        self.assets = Some(assets);
        self
    }
}

/// Wires every route onto a router holding `state`.
pub fn router(state: AppState) -> Router<AppState> {
    Router::with_state(state)
        .on(Method::Get,    "/",                 pages::root)
        .on(Method::Get,    "/info",             pages::info)
        .on(Method::Get,    "/api/persons",      persons::list)
        .on(Method::Post,   "/api/persons",      persons::create)
        .on(Method::Get,    "/api/persons/{id}", persons::get)
        .on(Method::Put,    "/api/persons/{id}", persons::update)
        .on(Method::Delete, "/api/persons/{id}", persons::delete)
        .fallback(assets::fallback)
}
