use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use assert_cmd::Command;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const TREE_PATH: &str = "/repos/nf-core/modules/git/trees/master?recursive=1";

type Routes = HashMap<String, (u16, String)>;

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Canned GitHub API: every GET is answered from a table of JSON bodies keyed
/// by path and query. Unknown paths get a 404.
pub struct MockGitHub {
    base_url: String,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockGitHub {
    pub fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let (addr_tx, addr_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build mock server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("failed to bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock server has no address"))
                    .expect("test went away before the mock server started");
                axum::serve(listener, app)
                    .await
                    .expect("mock server stopped");
            });
        });
        let addr = addr_rx.recv().expect("mock server failed to start");

        Self {
            base_url: format!("http://{addr}"),
            routes: state.routes,
            requests: state.requests,
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn route(&self, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Every request path seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn blob_path(&self, sha: &str) -> String {
        format!("/repos/nf-core/modules/git/blobs/{sha}")
    }

    pub fn entry(&self, path: &str, kind: &str, sha: &str) -> Value {
        json!({
            "path": path,
            "type": kind,
            "sha": sha,
            "url": format!("{}{}", self.base_url, self.blob_path(sha)),
        })
    }

    pub fn blob(&self, sha: &str, content: &[u8]) {
        self.route(
            &self.blob_path(sha),
            200,
            json!({
                "sha": sha,
                "content": STANDARD.encode(content),
                "encoding": "base64",
                "size": content.len(),
            }),
        );
    }

    /// Serves a small nf-core style tree:
    ///   software/fastqc/{main.nf,meta.yml,test/main.nf}
    ///   software/samtools/sort/main.nf
    pub fn serve_sample_tree(&self) {
        self.route(
            TREE_PATH,
            200,
            json!({
                "sha": "0123456789abcdef",
                "truncated": false,
                "tree": [
                    self.entry("README.md", "blob", "readme"),
                    self.entry("software", "tree", "t-software"),
                    self.entry("software/fastqc", "tree", "t-fastqc"),
                    self.entry("software/fastqc/main.nf", "blob", "fastqc-main"),
                    self.entry("software/fastqc/meta.yml", "blob", "fastqc-meta"),
                    self.entry("software/fastqc/test", "tree", "t-fastqc-test"),
                    self.entry("software/fastqc/test/main.nf", "blob", "fastqc-test"),
                    self.entry("software/samtools/sort/main.nf", "blob", "sort-main"),
                ],
            }),
        );
        self.blob("fastqc-main", b"process FASTQC {\n}\n");
        self.blob("fastqc-meta", b"name: fastqc\n");
        self.blob("fastqc-test", b"workflow test_fastqc {\n}\n");
        self.blob("sort-main", b"process SAMTOOLS_SORT {\n}\n");
    }
}

async fn handle_request(State(state): State<MockState>, uri: Uri) -> impl IntoResponse {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.requests.lock().unwrap().push(path.clone());

    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or((404, r#"{"message":"Not Found"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

pub struct TestEnv {
    pub config_dir: TempDir,
    pub project_dir: TempDir,
    pub github: MockGitHub,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().expect("failed to create config_dir"),
            project_dir: TempDir::new().expect("failed to create project_dir"),
            github: MockGitHub::start(),
        }
    }

    /// Build an nfmod Command pointed at the mock API, with cwd = project_dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nfmod"));
        cmd.arg("--config-dir")
            .arg(self.config_dir.path())
            .arg("--api-url")
            .arg(self.github.url())
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .current_dir(self.project_dir.path());
        cmd
    }

    pub fn module_dir(&self, name: &str) -> std::path::PathBuf {
        self.project_dir.path().join("modules/software").join(name)
    }
}
