//! # phonebook
//!
//! A small JSON backend for a phonebook client: CRUD over one `contact`
//! resource kept in a document store.
//!
//! ## Layout
//!
//! The crate is two layers.
//!
//! The bottom layer is a minimal HTTP stack: [`Router`] keeps one radix tree
//! per [`Method`] (via [`matchit`]), handlers are plain `async fn`s taking a
//! [`Request`] and the router's state, and [`Server`] runs them on hyper with
//! graceful shutdown on SIGTERM / Ctrl-C.
//!
//! The top layer is the application:
//!
//! - [`store`]: the [`ContactStore`](store::ContactStore) trait, schema
//!   validation, and the in-memory and JSON-file backends
//! - [`api`]: the routes, wired onto a router by [`api::router`], and the
//!   mapping of store failures onto status codes
//! - [`assets`]: the prebuilt frontend bundle, served for unmatched `GET`s
//! - [`config`]: environment configuration
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use phonebook::api::{self, AppState};
//! use phonebook::store::MemoryStore;
//! use phonebook::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), phonebook::Error> {
//!     let state = AppState::new(Arc::new(MemoryStore::new()));
//!     let app = api::router(state).cors(true);
//!
//!     Server::bind("0.0.0.0:3001".parse()?).serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod assets;
pub mod config;
pub mod middleware;
pub mod store;

pub use crate::config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{Request, MAX_BODY_BYTES};
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
