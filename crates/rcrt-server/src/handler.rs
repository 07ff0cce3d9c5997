use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use rcrt_store::{EntryStore, StoreResult};
use rcrt_types::Entry;
use serde_json::{json, Map, Value};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::shell;

/// Fixed acknowledgement for successful edits.
pub const ACK: &str = "Ok";

/// Shared per-router state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntryStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<EntryStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    fn ensure_editable(&self) -> ServerResult<()> {
        if self.config.editable {
            Ok(())
        } else {
            Err(ServerError::ReadOnly)
        }
    }
}

/// Run a store operation off the async executor.
async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// `GET /`: the HTML shell.
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(shell::render(&state.config))
}

/// `POST /edit/{path}`.
///
/// `meta` takes a JSON object of `{id: record}` and replaces those records;
/// any other path is written verbatim as a content file.
pub async fn edit_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> ServerResult<&'static str> {
    state.ensure_editable()?;
    let store = state.store.clone();

    if path == "meta" {
        let update: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
            ServerError::BadRequest(format!("metadata update must be a JSON object: {e}"))
        })?;
        tracing::debug!(records = update.len(), "metadata edit");
        blocking(move || store.update_metadata_fields(update)).await?;
    } else {
        tracing::debug!(path = %path, bytes = body.len(), "content edit");
        blocking(move || store.write_content_file(&path, &body)).await?;
    }
    Ok(ACK)
}

/// `GET /edit/{id}`: reserved for a per-entry editor that does not exist yet.
pub async fn edit_page_handler(Path(path): Path<String>) -> ServerResult<&'static str> {
    Err(ServerError::NotImplemented(format!("edit page for {path}")))
}

/// `POST /new`: add an entry under a fresh id.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(entry): Json<Entry>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    state.ensure_editable()?;
    let store = state.store.clone();
    let id = blocking(move || store.create_entry(entry, None)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
