//! HTTP server for the interactive form
//!
//! `matrice-radar serve` → starts server, opens browser, shows the upload form
//!
//! Routes:
//!
//! | Method | Path          | Body / query                         | Answer                  |
//! |--------|---------------|--------------------------------------|-------------------------|
//! | GET    | `/`           |                                      | embedded UI             |
//! | POST   | `/api/upload` | raw `.xlsx` bytes, `?name=file.xlsx` | new session + render    |
//! | GET    | `/api/session`| `?session=s1`                        | session + render        |
//! | POST   | `/api/event`  | `{"session": "s1", "event": {...}}`  | render after the change |
//! | GET    | `/api/render` | `?session=s1&series=row&row=A...`    | render of that view     |

use crate::error::{Error, Result};
use crate::render::{render, RenderSettings, Rendered};
use crate::selection::{choices, default_choice_index, ChoiceEntry, ControlEvent, ViewQuery, ViewState};
use crate::session::{Session, SessionStore};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

/// Uploads above this size are refused.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(error: String) -> Self {
        Self { ok: false, data: None, error: Some(error) }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
}

#[derive(Deserialize, Debug, Default)]
struct UploadParams {
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SessionParams {
    session: String,
}

#[derive(Deserialize, Debug)]
struct EventRequest {
    session: String,
    event: ControlEvent,
}

/// A session as the UI needs it to (re)build its controls.
#[derive(Serialize)]
pub struct SessionView {
    pub session: String,
    pub file_name: Option<String>,
    pub choices: Vec<ChoiceEntry>,
    pub default_choice: usize,
    pub view: ViewState,
    pub generated: String,
    pub rendered: Rendered,
}

#[derive(Serialize)]
pub struct RenderView {
    pub session: String,
    pub view: ViewState,
    pub generated: String,
    pub rendered: Rendered,
}

/// An HTTP answer, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", body: "Not found".to_string() }
    }

    fn json<T: Serialize>(result: Result<T>) -> Self {
        let (status, body) = match result {
            Ok(data) => (200, serde_json::to_string(&ApiResponse::success(data))),
            Err(e) => {
                log::warn!("request failed: {}", e);
                (
                    e.status_code(),
                    serde_json::to_string(&ApiResponse::<()>::failure(e.to_string())),
                )
            }
        };
        match body {
            Ok(body) => Self { status, content_type: "application/json", body },
            Err(e) => {
                log::error!("could not serialize response: {}", e);
                Self {
                    status: 500,
                    content_type: "application/json",
                    body: r#"{"ok":false,"data":null,"error":"serialization failed"}"#.to_string(),
                }
            }
        }
    }
}

/// Server state: the sessions and the process-wide render settings.
pub struct App {
    sessions: SessionStore,
    settings: RenderSettings,
    preloaded: Option<String>,
}

impl App {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            sessions: SessionStore::new(),
            settings,
            preloaded: None,
        }
    }

    /// Load a file from disk into a session the UI opens on start.
    pub fn preload(&mut self, path: &Path) -> Result<String> {
        let table = Table::open(path)?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let id = self.sessions.create(table, name).id.clone();
        log::info!("preloaded {} as session {}", path.display(), id);
        self.preloaded = Some(id.clone());
        Ok(id)
    }

    /// Route one request.
    pub fn handle(&mut self, method: &Method, url: &str, body: &[u8]) -> Reply {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        match (method, path) {
            // Serve embedded UI
            (&Method::Get, "/") => {
                // Inject the preloaded session id into the HTML
                let preloaded = match &self.preloaded {
                    Some(id) => format!("\"{}\"", id),
                    None => "null".to_string(),
                };
                Reply::html(UI_HTML.replace("{{PRELOADED_SESSION}}", &preloaded))
            }

            (&Method::Post, "/api/upload") => Reply::json(self.upload(query, body)),

            (&Method::Get, "/api/session") => Reply::json(
                parse_query::<SessionParams>(query).and_then(|p| self.session_view(&p.session)),
            ),

            (&Method::Post, "/api/event") => Reply::json(self.event(body)),

            (&Method::Get, "/api/render") => Reply::json(self.render_query(query)),

            _ => Reply::not_found(),
        }
    }

    fn upload(&mut self, query: &str, body: &[u8]) -> Result<SessionView> {
        let params: UploadParams = if query.is_empty() {
            UploadParams::default()
        } else {
            parse_query(query)?
        };
        let table = Table::from_xlsx_bytes(body)?;
        log::info!(
            "upload {}: {} rows x {} columns",
            params.name.as_deref().unwrap_or("<unnamed>"),
            table.num_rows(),
            table.num_columns()
        );
        let id = self.sessions.create(table, params.name).id.clone();
        self.session_view(&id)
    }

    fn session_view(&self, id: &str) -> Result<SessionView> {
        let session = self.sessions.get(id)?;
        let rendered = render(&session.table, &session.view, &self.settings)?;
        Ok(SessionView {
            session: session.id.clone(),
            file_name: session.file_name.clone(),
            choices: choices(&session.table),
            default_choice: default_choice_index(&session.table),
            view: session.view.clone(),
            generated: timestamp(),
            rendered,
        })
    }

    fn event(&mut self, body: &[u8]) -> Result<RenderView> {
        let request: EventRequest = serde_json::from_slice(body)
            .map_err(|e| Error::BadRequest(format!("malformed event: {}", e)))?;
        log::debug!("session {}: {:?}", request.session, request.event);
        let session = self.sessions.apply(&request.session, request.event)?;
        render_view(session, session.view.clone(), &self.settings)
    }

    fn render_query(&self, query: &str) -> Result<RenderView> {
        let params: SessionParams = parse_query(query)?;
        let session = self.sessions.get(&params.session)?;
        let view = parse_query::<ViewQuery>(query)?.into_view(&session.table)?;
        render_view(session, view, &self.settings)
    }
}

fn render_view(session: &Session, view: ViewState, settings: &RenderSettings) -> Result<RenderView> {
    let rendered = render(&session.table, &view, settings)?;
    Ok(RenderView {
        session: session.id.clone(),
        view,
        generated: timestamp(),
        rendered,
    })
}

fn parse_query<T: serde::de::DeserializeOwned>(query: &str) -> Result<T> {
    serde_urlencoded::from_str(query).map_err(|e| Error::BadRequest(e.to_string()))
}

fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Start server, open browser, serve UI
pub fn start(config: &ServerConfig, mut app: App) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let server = Server::http(&addr).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let url = format!("http://localhost:{}", config.port);

    eprintln!("\n\x1b[1;32mMatrice en radar\x1b[0m");
    eprintln!("   {}\n", url);
    log::info!("listening on {}", addr);

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            log::warn!("could not open browser: {}", e);
        }
    }

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &mut app) {
            log::error!("{}", e);
        }
    }

    Ok(())
}

fn handle_request(mut request: Request, app: &mut App) -> std::io::Result<()> {
    let url = request.url().to_string();
    let method = request.method().clone();
    log::debug!("{} {}", method, url);

    // Chunked requests carry no length, so the cap is enforced while reading too
    if request.body_length().unwrap_or(0) > MAX_UPLOAD_BYTES {
        let reply = Reply::json::<()>(Err(Error::UploadTooLarge(MAX_UPLOAD_BYTES)));
        return respond(request, reply);
    }

    let reply = match read_body(request.as_reader(), MAX_UPLOAD_BYTES) {
        Ok(body) => app.handle(&method, &url, &body),
        Err(e) => Reply::json::<()>(Err(e)),
    };
    respond(request, reply)
}

/// Read a request body of at most `limit` bytes.
fn read_body<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(Error::UploadTooLarge(limit));
    }
    Ok(body)
}

fn respond(request: Request, reply: Reply) -> std::io::Result<()> {
    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()).unwrap());
    request.respond(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MAX_SESSIONS;
    use crate::table::tests::xlsx_bytes;
    use serde_json::Value;

    fn app_with_upload() -> (App, String) {
        let mut app = App::new(RenderSettings::default());
        let bytes = xlsx_bytes(&["x", "y", "z"], &[("A", &[1.0, 2.0, 3.0]), ("B", &[4.0, 5.0, 6.0])]);
        let reply = app.handle(&Method::Post, "/api/upload?name=scores.xlsx", &bytes);
        assert_eq!(reply.status, 200, "{}", reply.body);
        let json: Value = serde_json::from_str(&reply.body).unwrap();
        let id = json["data"]["session"].as_str().unwrap().to_string();
        (app, id)
    }

    fn json(reply: &Reply) -> Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    // ==========================================================================
    // UI AND ROUTING
    // ==========================================================================

    #[test]
    fn test_index_injects_preloaded_session() {
        let mut app = App::new(RenderSettings::default());
        let reply = app.handle(&Method::Get, "/", b"");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains("const PRELOADED_SESSION = null;"));
        assert!(!reply.body.contains("{{PRELOADED_SESSION}}"));
    }

    #[test]
    fn test_body_within_limit_is_read_whole() {
        let body = read_body(&b"abcd"[..], 4).unwrap();
        assert_eq!(body, b"abcd");
    }

    #[test]
    fn test_body_over_limit_is_refused_without_length() {
        // A reader with no known length, like a chunked upload
        let endless = std::io::repeat(0u8);
        let err = read_body(endless, 1024).unwrap_err();
        assert!(matches!(err, Error::UploadTooLarge(1024)));

        let reply = Reply::json::<()>(Err(err));
        assert_eq!(reply.status, 413);
        assert!(reply.body.contains("upload larger than 1024 bytes"));
    }

    #[test]
    fn test_ui_drops_previous_render_on_failed_upload() {
        // A failed upload must not leave the last chart and table on screen
        assert!(UI_HTML.contains("function clearSession()"));
        assert!(UI_HTML.contains("$('output').classList.add('hidden');"));
        assert!(UI_HTML.contains("} catch (e) {\n        clearSession();\n        showError(e.message);"));
    }

    #[test]
    fn test_unknown_route_is_404() {
        let mut app = App::new(RenderSettings::default());
        assert_eq!(app.handle(&Method::Get, "/nope", b"").status, 404);
        assert_eq!(app.handle(&Method::Delete, "/api/upload", b"").status, 404);
    }

    // ==========================================================================
    // UPLOAD
    // ==========================================================================

    #[test]
    fn test_empty_upload_halts_with_no_file() {
        let mut app = App::new(RenderSettings::default());
        let reply = app.handle(&Method::Post, "/api/upload", b"");
        assert_eq!(reply.status, 400);
        let body = json(&reply);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "no file uploaded");
        assert!(app.sessions.is_empty());
    }

    #[test]
    fn test_upload_returns_choices_and_first_render() {
        let mut app = App::new(RenderSettings::default());
        let bytes = xlsx_bytes(&["x", "y", "z"], &[("A", &[1.0, 2.0, 3.0]), ("B", &[4.0, 5.0, 6.0])]);
        let reply = app.handle(&Method::Post, "/api/upload?name=scores.xlsx", &bytes);
        let body = json(&reply);
        assert_eq!(body["ok"], true);
        let data = &body["data"];
        assert_eq!(data["file_name"], "scores.xlsx");
        let texts: Vec<&str> = data["choices"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["A", "B", "Tous", "Synthese"]);
        assert_eq!(data["default_choice"], 2);
        assert_eq!(data["view"]["selection"]["kind"], "all");
        assert_eq!(data["view"]["selection"]["value"], "detailed");
        assert!(data["rendered"]["chart_svg"].as_str().unwrap().starts_with("<svg"));
        assert!(data["rendered"]["table_html"].as_str().unwrap().contains("<table"));
    }

    // ==========================================================================
    // EVENTS AND RENDER QUERIES
    // ==========================================================================

    #[test]
    fn test_event_changes_view() {
        let (mut app, id) = app_with_upload();
        let event = format!(
            r#"{{"session":"{}","event":{{"control":"series","value":{{"kind":"row","label":"B"}}}}}}"#,
            id
        );
        let reply = app.handle(&Method::Post, "/api/event", event.as_bytes());
        assert_eq!(reply.status, 200, "{}", reply.body);
        let body = json(&reply);
        let series = body["data"]["rendered"]["chart"]["series"].as_array().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0]["label"], "B");
        assert_eq!(series[0]["values"], serde_json::json!([4.0, 5.0, 6.0, 4.0]));

        // The change sticks to the session
        let reply = app.handle(&Method::Get, &format!("/api/session?session={}", id), b"");
        assert_eq!(json(&reply)["data"]["view"]["selection"]["value"], "B");
    }

    #[test]
    fn test_bad_event_is_400() {
        let (mut app, id) = app_with_upload();
        let reply = app.handle(&Method::Post, "/api/event", b"{not json");
        assert_eq!(reply.status, 400);

        let event = format!(r#"{{"session":"{}","event":{{"control":"font_size","value":99}}}}"#, id);
        let reply = app.handle(&Method::Post, "/api/event", event.as_bytes());
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn test_repeated_uploads_keep_store_bounded() {
        let mut app = App::new(RenderSettings::default());
        let bytes = xlsx_bytes(&["x"], &[("A", &[1.0])]);
        for _ in 0..MAX_SESSIONS + 5 {
            let reply = app.handle(&Method::Post, "/api/upload", &bytes);
            assert_eq!(reply.status, 200);
        }
        assert_eq!(app.sessions.len(), MAX_SESSIONS);

        // The first upload is gone, the latest still answers
        assert_eq!(app.handle(&Method::Get, "/api/session?session=s1", b"").status, 404);
        let latest = format!("/api/session?session=s{}", MAX_SESSIONS + 5);
        assert_eq!(app.handle(&Method::Get, &latest, b"").status, 200);
    }

    #[test]
    fn test_unknown_session_is_404() {
        let (mut app, _) = app_with_upload();
        let reply = app.handle(
            &Method::Post,
            "/api/event",
            br#"{"session":"zzz","event":{"control":"wrap_labels","value":false}}"#,
        );
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn test_render_query_is_stateless() {
        let (mut app, id) = app_with_upload();
        let url = format!("/api/render?session={}&series=synthese&font_size=12", id);
        let reply = app.handle(&Method::Get, &url, b"");
        assert_eq!(reply.status, 200, "{}", reply.body);
        let body = json(&reply);
        assert_eq!(body["data"]["rendered"]["chart"]["series"][0]["label"], "Synthese");
        assert_eq!(body["data"]["rendered"]["chart"]["label_font_size"], 12);

        // Session view unchanged
        let reply = app.handle(&Method::Get, &format!("/api/session?session={}", id), b"");
        assert_eq!(json(&reply)["data"]["view"]["selection"]["kind"], "all");
    }
}
