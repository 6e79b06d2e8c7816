//! Router tests against in-memory fakes of the vault host and email relay.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use garden_server::config::Config;
use garden_server::contact::{EmailRelay, RelayError, Submission};
use garden_server::vault::{FetchError, VaultSource};
use garden_server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

struct FakeVault {
    files: HashMap<String, String>,
}

#[async_trait::async_trait]
impl VaultSource for FakeVault {
    async fn list_files(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn fetch_note(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

struct BrokenVault;

#[async_trait::async_trait]
impl VaultSource for BrokenVault {
    async fn list_files(&self) -> Result<Vec<String>, FetchError> {
        Err(FetchError::Status {
            url: "https://api.example.com/tree".to_string(),
            status: 500,
        })
    }

    async fn fetch_note(&self, path: &str) -> Result<String, FetchError> {
        Err(FetchError::NotFound(path.to_string()))
    }
}

#[derive(Default)]
struct FakeRelay {
    sent: Mutex<Vec<Submission>>,
    fail: bool,
}

#[async_trait::async_trait]
impl EmailRelay for FakeRelay {
    async fn send(&self, submission: &Submission) -> Result<(), RelayError> {
        if self.fail {
            return Err(RelayError::Status {
                status: 500,
                body: "down".to_string(),
            });
        }
        self.sent.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// Collects formatted log output written during a test.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn vault_files() -> HashMap<String, String> {
    [
        (
            "Index.md",
            "---\ntitle: Welcome\ntags: [home]\n---\n# Home\n\nStart with [[Garden Design]] or [[Missing Note]].\n",
        ),
        (
            "Projects/Garden Design.md",
            "# Garden Design\n\nBack to [[Index]]. See [[Soil]].\n\n> [!tip] Water daily\n> Mornings are best.\n",
        ),
        ("Projects/Soil.md", "# Soil\n\nNo links here."),
        ("A/Foo.md", "# Foo"),
        ("private/Diary.md", "secret [[Index]]"),
        ("assets/map.png", ""),
    ]
    .into_iter()
    .map(|(p, c)| (p.to_string(), c.to_string()))
    .collect()
}

fn app_with(source: Arc<dyn VaultSource>, relay: Arc<FakeRelay>) -> Router {
    let mut config = Config::default();
    config.vault.owner = "me".to_string();
    config.vault.repo = "vault".to_string();
    config.contact.fallback_email = "me@example.org".to_string();

    let state = AppState::new(config, source, relay).unwrap();
    router(Arc::new(state))
}

fn app() -> (Router, Arc<FakeRelay>) {
    let relay = Arc::new(FakeRelay::default());
    let source = Arc::new(FakeVault {
        files: vault_files(),
    });
    (app_with(source, relay.clone()), relay)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_html(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, bytes) = get(app, uri).await;
    (status, String::from_utf8(bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn healthz() {
    let (app, _) = app();
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn notes_listing_excludes_private_and_attachments() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/notes").await;

    assert_eq!(status, StatusCode::OK);
    let paths: Vec<&str> = body["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["A/Foo.md", "Index.md", "Projects/Garden Design.md", "Projects/Soil.md"]
    );

    let folders: Vec<&str> = body["tree"]["folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(folders, vec!["A", "Projects"]);
}

#[tokio::test]
async fn note_is_rendered_with_links_and_callouts() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/notes/Projects/Garden%20Design.md").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Garden Design");
    let html = body["html"].as_str().unwrap();
    assert!(html.contains(r#"href="/garden/Index.md""#));
    assert!(html.contains(r#"href="/garden/Projects/Soil.md""#));
    assert!(html.contains(r#"data-callout="tip""#));
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn note_title_and_tags_come_from_frontmatter() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/notes/Index.md").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Welcome");
    assert_eq!(body["tags"], json!(["home"]));
    assert!(body["html"].as_str().unwrap().contains("wikilink-missing"));
}

#[tokio::test]
async fn note_path_may_omit_extension() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/notes/Projects/Soil").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "Projects/Soil.md");
}

#[tokio::test]
async fn missing_and_private_notes_are_404() {
    let (app, _) = app();

    let (status, body) = get_json(&app, "/api/notes/Nowhere.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
    assert_eq!(body["path"], "Nowhere.md");

    let (status, _) = get_json(&app, "/api/notes/private/Diary.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resolve_by_name_with_or_without_extension() {
    let (app, _) = app();

    for target in ["Foo", "Foo.md", "foo"] {
        let (status, body) = get_json(&app, &format!("/api/resolve?target={}", target)).await;
        assert_eq!(status, StatusCode::OK, "{target}");
        assert_eq!(body["path"], "A/Foo.md");
        assert_eq!(body["kind"], "name");
    }
}

#[tokio::test]
async fn resolve_unknown_target_is_404() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/resolve?target=Zebra").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
    assert_eq!(body["path"], "Zebra");
}

#[tokio::test]
async fn resolve_falls_back_to_path_substring() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/resolve?target=Garden%20Des").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "Projects/Garden Design.md");
    assert_eq!(body["kind"], "path_substring");
}

#[tokio::test]
async fn link_graph_covers_listed_notes() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/graph").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 4);
    // Index<->Garden Design, Garden Design->Soil
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn local_graph_around_focus() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/graph?mode=links&focus=Soil&depth=1").await;

    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<&str> = body["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["Projects/Garden Design.md", "Projects/Soil.md"]);

    let (status, _) = get_json(&app, "/api/graph?focus=Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn folder_graph_has_hubs() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/api/graph?mode=folders").await;

    assert_eq!(status, StatusCode::OK);
    let nodes = body["nodes"].as_array().unwrap();
    assert!(nodes.iter().any(|n| n["id"] == "folder:Projects" && n["kind"] == "folder"));
    assert_eq!(nodes.len(), 6);
}

#[tokio::test]
async fn unknown_graph_mode_is_rejected() {
    let (app, _) = app();
    let (status, _) = get(&app, "/api/graph?mode=spiral").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_listing_failure_is_502() {
    let app = app_with(Arc::new(BrokenVault), Arc::new(FakeRelay::default()));
    let (status, body) = get_json(&app, "/api/notes").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("HTTP 500"));
}

#[tokio::test]
async fn terminal_round_trip_keeps_session_in_client() {
    let (app, _) = app();

    let (status, body) = post_json(&app, "/api/terminal", json!({ "line": "cd notes" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cwd"], "/home/guest/notes");
    assert_eq!(body["prompt"], "guest@garden:~/notes$");
    assert_eq!(body["history"], json!(["cd notes"]));

    let (_, body) = post_json(
        &app,
        "/api/terminal",
        json!({ "line": "cat todo.txt", "cwd": body["cwd"], "history": body["history"] }),
    )
    .await;
    assert_eq!(body["output"][0], "- water the garden");
    assert_eq!(body["history"], json!(["cd notes", "cat todo.txt"]));
    assert_eq!(body["clear"], false);
    assert_eq!(body["open"], Value::Null);
}

#[tokio::test]
async fn terminal_open_and_unknown_commands() {
    let (app, _) = app();

    let (_, body) = post_json(&app, "/api/terminal", json!({ "line": "open garden" })).await;
    assert_eq!(body["open"], "/garden");

    let (_, body) = post_json(&app, "/api/terminal", json!({ "line": "xyzzy" })).await;
    assert_eq!(body["output"], json!(["command not found: xyzzy"]));

    let (_, body) = post_json(&app, "/api/terminal", json!({ "line": "clear" })).await;
    assert_eq!(body["clear"], true);
}

#[tokio::test]
async fn contact_rejects_empty_message_without_relaying() {
    let (app, relay) = app();
    let (status, body) = post_json(
        &app,
        "/api/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "   " }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please enter a message.");
    assert!(relay.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contact_rejects_short_message_and_bad_email() {
    let (app, relay) = app();

    let (status, body) = post_json(
        &app,
        "/api/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "hi there" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Message must be at least 10 characters long.");

    let (status, body) = post_json(
        &app,
        "/api/contact",
        json!({ "name": "Ada", "email": "foo@bar", "message": "A perfectly fine message" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please enter a valid email address.");

    assert!(relay.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contact_relays_valid_submission() {
    let (app, relay) = app();
    let (status, body) = post_json(
        &app,
        "/api/contact",
        json!({ "name": " Ada ", "email": "ada@example.com", "message": "Lovely garden you have!" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let sent = relay.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Ada");
}

#[tokio::test]
async fn contact_logs_do_not_contain_visitor_address() {
    let logs = LogCapture::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (app, relay) = app();
    let (status, _) = post_json(
        &app,
        "/api/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Lovely garden you have!" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(relay.sent.lock().unwrap().len(), 1);
    let output = logs.contents();
    assert!(output.contains("Contact message relayed"));
    assert!(!output.contains("ada@example.com"));
}

#[tokio::test]
async fn contact_relay_failure_offers_fallback_address() {
    let relay = Arc::new(FakeRelay {
        fail: true,
        ..Default::default()
    });
    let app = app_with(
        Arc::new(FakeVault {
            files: vault_files(),
        }),
        relay,
    );

    let (status, body) = post_json(
        &app,
        "/api/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Lovely garden you have!" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("me@example.org"));
}

#[tokio::test]
async fn landing_page_renders() {
    let (app, _) = app();
    let (status, html) = get_html(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"id="contact-form""#));
    assert!(html.contains("garden.terminal.history"));
    assert!(html.contains("garden.graph.position"));
}

#[tokio::test]
async fn garden_index_shows_configured_note() {
    let (app, _) = app();
    let (status, html) = get_html(&app, "/garden").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Welcome - Guest Gardener</title>"));
    assert!(html.contains(r#"<li class="note active"><a href="/garden/Index.md">Index</a></li>"#));
}

#[tokio::test]
async fn garden_missing_note_renders_error_panel() {
    let (app, _) = app();
    let (status, html) = get_html(&app, "/garden/Ghost.md").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains(r#"class="error-panel""#));
    assert!(html.contains("<code>Ghost.md</code>"));
    // Sidebar still lists the vault
    assert!(html.contains("/garden/Projects/Soil.md"));
}

#[tokio::test]
async fn garden_page_survives_listing_failure() {
    let app = app_with(Arc::new(BrokenVault), Arc::new(FakeRelay::default()));
    let (status, html) = get_html(&app, "/garden/Index.md").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains(r#"class="error-panel""#));
    assert!(html.contains("<code>Index.md</code>"));
}

#[tokio::test]
async fn graph_page_renders() {
    let (app, _) = app();
    let (status, html) = get_html(&app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"id="graph""#));
}
