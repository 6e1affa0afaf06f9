//! Phonebook backend binary.
//!
//! Run with:
//!   PORT=3001 DATABASE_URL=file:contacts.json cargo run
//!
//! Try:
//!   curl http://localhost:3001/api/persons
//!   curl -X POST http://localhost:3001/api/persons \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"Ada Lovelace","number":"39-44-5323523"}'

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use phonebook::api::{self, AppState};
use phonebook::assets::StaticFiles;
use phonebook::{Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is the normal case in production.
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let location = config.store_location()?;
    let store = location.open().await.context("opening contact store")?;
    tracing::info!(store = ?location, "contact store ready");

    let mut state = AppState::new(store);
    if config.static_dir.is_dir() {
        tracing::info!(dir = %config.static_dir.display(), "serving static bundle");
        state = state.with_assets(StaticFiles::new(&config.static_dir));
    }

    let app = api::router(state).cors(config.cors);

    Server::bind(config.socket_addr()?).serve(app).await?;
    Ok(())
}
