//! Static file serving for the prebuilt frontend bundle.
//!
//! Installed as the router fallback: any `GET`/`HEAD` that matches no API
//! route is looked up under the bundle directory. `/` itself belongs to the
//! greeting route, so the bundle's `index.html` is reachable as
//! `/index.html`.

use std::path::{Component, Path, PathBuf};

use tracing::error;

use crate::api::AppState;
use crate::method::Method;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::status::Status;

/// A directory of static files.
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto a file under the root.
    ///
    /// Returns `None` for anything that could step outside it.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    /// Serves `request_path`, answering 404 for anything missing.
    pub async fn serve(&self, request_path: &str, head: bool) -> Response {
        let Some(mut path) = self.resolve(request_path) else {
            return Response::status(Status::NotFound);
        };
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            path.push("index.html");
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory
            ) => return Response::status(Status::NotFound),
            Err(e) => {
                error!(path = %path.display(), "failed to read static file: {e}");
                return Response::status(Status::InternalServerError);
            }
        };

        let content_type = path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(ContentType::OctetStream, ContentType::from_extension);
        let body = if head { Vec::new() } else { bytes };
        Response::builder().bytes(content_type, body)
    }
}

/// Router fallback: serves the bundle for `GET`/`HEAD`, 404 otherwise.
pub async fn fallback(req: Request, state: AppState) -> Response {
    match (&state.assets, req.method()) {
        (Some(assets), Method::Get) => assets.serve(req.path(), false).await,
        (Some(assets), Method::Head) => assets.serve(req.path(), true).await,
        _ => Response::status(Status::NotFound),
    }
}
