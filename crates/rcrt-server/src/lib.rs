//! HTTP gateway for rcrt.
//!
//! Serves the HTML shell, the client bundle (`/app`), raw store files
//! (`/db`), and the edit endpoints that write back into the store. All
//! settings come from an explicit [`ServerConfig`]; there is no global state.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod shell;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{ErrorBody, ServerError, ServerResult};
pub use handler::AppState;
pub use server::RcrtServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use rcrt_store::{EntryStore, Seeded};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    struct Fixture {
        _dir: TempDir,
        store: Arc<EntryStore>,
        seeded: Seeded,
        config: ServerConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with(|_| {})
        }

        fn with(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
            let dir = TempDir::new().unwrap();
            let (store, seeded) = EntryStore::init(dir.path().join("db")).unwrap();
            let app_dir = dir.path().join("app");
            std::fs::create_dir(&app_dir).unwrap();
            std::fs::write(app_dir.join("core.js"), "function startApp() {}\n").unwrap();

            let mut config = ServerConfig {
                db_path: store.root().to_path_buf(),
                app_dir,
                ..ServerConfig::default()
            };
            tweak(&mut config);
            Self {
                _dir: dir,
                store: Arc::new(store),
                seeded,
                config,
            }
        }

        fn app(&self) -> Router {
            router::build_router(AppState::new(self.store.clone(), self.config.clone()))
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(body.into())
            .unwrap()
    }

    fn error_code(body: &[u8]) -> String {
        let v: Value = serde_json::from_slice(body).unwrap();
        v["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn index_serves_shell() {
        let fx = Fixture::new();
        let (status, body) = send(fx.app(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("window.rcrtMode = \"editable\""));
        assert!(html.contains("app/core.js"));
    }

    #[tokio::test]
    async fn app_assets_are_served() {
        let fx = Fixture::new();
        let (status, body) = send(fx.app(), get("/app/core.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"function startApp() {}\n");

        let (status, _) = send(fx.app(), get("/app/missing.js")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn db_meta_matches_store() {
        let fx = Fixture::new();
        let (status, body) = send(fx.app(), get("/db/meta.json")).await;
        assert_eq!(status, StatusCode::OK);

        let served = rcrt_store::Metadata::from_json(&body).unwrap();
        assert_eq!(served, fx.store.load().unwrap());
        assert_eq!(served.len(), 4);
    }

    #[tokio::test]
    async fn db_serves_content_files() {
        let fx = Fixture::new();
        let uri = format!("/db/{}.txt", fx.seeded.article);
        let (status, body) = send(fx.app(), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains(&format!("#{}", fx.seeded.link)));
    }

    #[tokio::test]
    async fn edit_meta_replaces_record() {
        let fx = Fixture::new();
        let update = json!({ fx.seeded.post.as_str(): {"type": "post", "text": "new"} });
        let (status, body) = send(fx.app(), post("/edit/meta", update.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Ok");

        let raw: Value =
            serde_json::from_slice(&std::fs::read(fx.store.meta_path()).unwrap()).unwrap();
        assert_eq!(raw[fx.seeded.post.as_str()], json!({"type": "post", "text": "new"}));
    }

    #[tokio::test]
    async fn edit_meta_unknown_key_is_404() {
        let fx = Fixture::new();
        let before = std::fs::read(fx.store.meta_path()).unwrap();
        let update = json!({"zzzzzz": {"type": "post", "text": "x"}});
        let (status, body) = send(fx.app(), post("/edit/meta", update.to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "UNKNOWN_KEY");
        assert_eq!(std::fs::read(fx.store.meta_path()).unwrap(), before);
    }

    #[tokio::test]
    async fn edit_meta_requires_json_object() {
        let fx = Fixture::new();
        let (status, body) = send(fx.app(), post("/edit/meta", "[1, 2]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "BAD_REQUEST");
    }

    #[tokio::test]
    async fn edit_content_writes_file() {
        let fx = Fixture::new();
        let name = format!("{}.txt", fx.seeded.article);
        let text = format!("Rewritten, still pointing at [home]#{}", fx.seeded.link);
        let (status, _) = send(fx.app(), post(&format!("/edit/{name}"), text.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fx.store.read_content(&name).unwrap(), text.as_bytes());
    }

    #[tokio::test]
    async fn edit_content_rejects_dangling_reference() {
        let fx = Fixture::new();
        let uri = format!("/edit/{}.txt", fx.seeded.article);
        let (status, body) = send(fx.app(), post(&uri, "[gone]#zzzzzz")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "DANGLING_REFERENCE");
    }

    #[tokio::test]
    async fn edit_content_rejects_traversal() {
        let fx = Fixture::new();
        let (status, body) = send(
            fx.app(),
            post("/edit/..%2F..%2Fetc%2Fpasswd", "root::0:0"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_PATH");
        assert!(!fx._dir.path().join("etc").exists());
    }

    #[tokio::test]
    async fn edit_page_is_not_implemented() {
        let fx = Fixture::new();
        let uri = format!("/edit/{}", fx.seeded.post);
        let (status, body) = send(fx.app(), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(error_code(&body), "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn new_entry_gets_fresh_id() {
        let fx = Fixture::new();
        let entry = json!({"type": "link", "url": "https://example.org"});
        let request = Request::builder()
            .method("POST")
            .uri("/new")
            .header("content-type", "application/json")
            .body(Body::from(entry.to_string()))
            .unwrap();
        let (status, body) = send(fx.app(), request).await;
        assert_eq!(status, StatusCode::CREATED);

        let v: Value = serde_json::from_slice(&body).unwrap();
        let id = rcrt_types::EntryId::parse(v["id"].as_str().unwrap()).unwrap();
        let meta = fx.store.load().unwrap();
        assert_eq!(meta.len(), 5);
        assert_eq!(
            meta.get(&id),
            Some(&rcrt_types::Entry::Link { url: "https://example.org".into() })
        );
    }

    #[tokio::test]
    async fn readonly_mode_refuses_edits() {
        let fx = Fixture::with(|c| c.editable = false);
        let update = json!({ fx.seeded.post.as_str(): {"type": "post", "text": "x"} });
        let (status, body) = send(fx.app(), post("/edit/meta", update.to_string())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "READ_ONLY");

        let (_, body) = send(fx.app(), get("/")).await;
        assert!(String::from_utf8(body).unwrap().contains("\"readonly\""));
    }

    #[tokio::test]
    async fn routes_mount_under_prefix() {
        let fx = Fixture::with(|c| c.prefix = "/rcrt".into());
        let (status, _) = send(fx.app(), get("/rcrt/db/meta.json")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(fx.app(), get("/db/meta.json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let fx = Fixture::with(|c| c.max_body_bytes = 8);
        let (status, _) = send(fx.app(), post("/edit/blob.bin", vec![0u8; 64])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!fx.store.root().join("blob.bin").exists());
    }
}
