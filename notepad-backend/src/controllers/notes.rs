//! Note endpoints — one dispatcher for `/` and `/{name}`.
//!
//! Priority order for a request:
//!   1. `?new&text=...` creates a note under a random name and returns its URL
//!   2. `/{name}?text=...` saves straight from the query string
//!   3. a missing or invalid name redirects to a fresh random name
//!   4. `?raw` returns the stored bytes as text/plain
//!   5. POST/PUT saves the form field `text`, or the raw body
//!   6. curl/Wget user agents get the raw bytes (compatibility shim)
//!   7. everything else gets the editor page

use actix_web::http::{header, Method, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use notepad_types::{NewNoteResponse, SaveStatus};
use std::sync::Arc;

use super::editor::render_editor;
use crate::notes::name::trim_name;
use crate::notes::{NoteError, NoteName, NoteStore, SaveOutcome, MAX_NOTE_BYTES};
use crate::AppState;

/// Request bodies may be form-encoded, so allow room for percent-escapes.
/// The note size limit itself is enforced by the store.
const MAX_BODY_BYTES: usize = MAX_NOTE_BYTES * 4;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl ResponseError for NoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            NoteError::ContentTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            NoteError::InvalidName | NoteError::PathEscape => StatusCode::BAD_REQUEST,
            NoteError::NotFound => StatusCode::NOT_FOUND,
            NoteError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Query flags. `new` and `raw` count when present, even without a value.
#[derive(Debug, Default)]
struct NoteQuery {
    new: bool,
    raw: bool,
    text: Option<String>,
}

impl NoteQuery {
    fn parse(query_string: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            match &*key {
                "new" => query.new = true,
                "raw" => query.raw = true,
                "text" => query.text = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawRead {
    /// `?raw` — a 404 says "Note not found"
    Explicit,
    /// user-agent sniffed — a 404 has no body
    Sniffed,
}

/// Run blocking store work on actix's blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, NoteError>
where
    F: FnOnce() -> Result<T, NoteError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| NoteError::Storage(std::io::Error::other(e.to_string())))?
}

fn json_error(e: &NoteError) -> HttpResponse {
    HttpResponse::build(e.status_code()).json(SaveStatus::err(e.to_string()))
}

fn is_cli_agent(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|ua| ua.starts_with("curl") || ua.starts_with("Wget"))
        .unwrap_or(false)
}

fn base_url(data: &AppState, req: &HttpRequest) -> String {
    match &data.config.public_url {
        Some(url) => url.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

/// Send the client to a freshly generated note, dropping the query string
pub async fn redirect_to_random() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/{}", NoteName::random())))
        .finish()
}

async fn handle_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, NoteError> {
    let NoteQuery { new, raw, text } = NoteQuery::parse(req.query_string());
    let raw_name = req
        .match_info()
        .get("name")
        .map(trim_name)
        .filter(|n| !n.is_empty());

    if let (true, Some(text)) = (new, text.as_deref()) {
        return Ok(create_random_note(&data, &req, text.as_bytes().to_vec()).await);
    }

    if let (Some(raw_name), Some(text)) = (raw_name, text.as_deref()) {
        return Ok(save_from_query(&data, raw_name, text.as_bytes().to_vec()).await);
    }

    let name = match raw_name.map(NoteName::parse) {
        Some(Ok(name)) => name,
        _ => return Ok(redirect_to_random().await),
    };

    if raw {
        return read_raw(&data.store, name, RawRead::Explicit).await;
    }

    if matches!(*req.method(), Method::POST | Method::PUT) {
        return save_from_body(&data.store, name, &req, &body).await;
    }

    if data.config.cli_raw_shim && is_cli_agent(&req) {
        return read_raw(&data.store, name, RawRead::Sniffed).await;
    }

    render_note(&data.store, name).await
}

async fn create_random_note(data: &AppState, req: &HttpRequest, content: Vec<u8>) -> HttpResponse {
    let name = NoteName::random();
    let store = Arc::clone(&data.store);
    let saved_name = name.clone();

    let result = run_blocking(move || {
        if store.exists(&saved_name)? {
            log::warn!("[NOTES] Random name {} collided with an existing note, overwriting", saved_name);
        }
        store.save(&saved_name, &content)
    })
    .await;

    match result {
        Ok(_) => {
            log::info!("[NOTES] Created note {}", name);
            HttpResponse::Ok().json(NewNoteResponse {
                url: format!("{}/{}", base_url(data, req), name),
            })
        }
        Err(e) => json_error(&e),
    }
}

async fn save_from_query(data: &AppState, raw_name: &str, content: Vec<u8>) -> HttpResponse {
    let name = match NoteName::parse(raw_name) {
        Ok(name) => name,
        Err(e) => return json_error(&e),
    };

    let store = Arc::clone(&data.store);
    match run_blocking(move || store.save(&name, &content)).await {
        Ok(_) => HttpResponse::Ok().json(SaveStatus::success()),
        Err(e) => json_error(&e),
    }
}

async fn read_raw(
    store: &Arc<NoteStore>,
    name: NoteName,
    mode: RawRead,
) -> Result<HttpResponse, NoteError> {
    let store = Arc::clone(store);
    match run_blocking(move || store.read_existing(&name)).await {
        Ok(content) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(content)),
        Err(NoteError::NotFound) if mode == RawRead::Sniffed => Ok(HttpResponse::NotFound().finish()),
        Err(e) => Err(e),
    }
}

/// Note content from a POST body: the `text` form field when the body is
/// form-encoded and carries one, otherwise the body verbatim
fn body_content(req: &HttpRequest, body: &[u8]) -> Vec<u8> {
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false);

    if is_form {
        // a repeated field keeps its last value, like the query string
        let text = url::form_urlencoded::parse(body)
            .filter(|(key, _)| key == "text")
            .last();
        if let Some((_, text)) = text {
            return text.into_owned().into_bytes();
        }
    }

    body.to_vec()
}

async fn save_from_body(
    store: &Arc<NoteStore>,
    name: NoteName,
    req: &HttpRequest,
    body: &[u8],
) -> Result<HttpResponse, NoteError> {
    let content = body_content(req, body);
    let store = Arc::clone(store);
    let log_name = name.clone();

    let outcome = run_blocking(move || store.save(&name, &content)).await?;
    match outcome {
        SaveOutcome::Written => log::debug!("[NOTES] Saved note {}", log_name),
        SaveOutcome::Deleted => log::info!("[NOTES] Deleted note {}", log_name),
        SaveOutcome::Unchanged => {}
    }

    Ok(HttpResponse::Ok().finish())
}

async fn render_note(store: &Arc<NoteStore>, name: NoteName) -> Result<HttpResponse, NoteError> {
    let store = Arc::clone(store);
    let (name, content) = run_blocking(move || {
        let content = store.read(&name)?;
        Ok((name, content))
    })
    .await?;

    let is_new_note = content.is_none();
    let page = render_editor(&name, content.as_deref().unwrap_or_default(), is_new_note);

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

/// Note routes. Register after any fixed routes such as `/api/health`:
/// the last pattern catches every remaining path.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/", web::route().to(handle_note))
        .route("/{name}", web::route().to(handle_note))
        .route("/{tail:.*}", web::route().to(redirect_to_random));
}
