//! Single binary web server: leaderboard page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Document store: JSONBIN_BIN_ID, JSONBIN_API_KEY (and optionally JSONBIN_BASE_URL).
//! Edit password: EDIT_PASSWORD.

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use league_leaderboard::{
    rank_players, AccessGate, AccessVerdict, AppConfig, DocumentStore, EditError, EditSession,
    JsonBinStore, PlayerRecord, RecordField, StoreError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

type SessionId = Uuid;

/// Per-page-load entry: edit session + timestamps (last_activity drives auto-cleanup).
struct SessionEntry {
    session: EditSession,
    loaded_at: DateTime<Utc>,
    saved_at: Option<DateTime<Utc>>,
    last_activity: Instant,
}

/// Shared server state: store client, gate, and edit sessions by id.
struct AppState {
    store: Arc<dyn DocumentStore>,
    gate: AccessGate,
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl AppState {
    fn new(store: Arc<dyn DocumentStore>, gate: AccessGate) -> Self {
        Self {
            store,
            gate,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

type SharedState = Data<AppState>;

/// Sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

const MISCONFIGURED_PASSWORD: &str = "Server misconfigured. No password set.";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct LeaderboardResponse {
    players: Vec<PlayerRecord>,
    fetched_at: DateTime<Utc>,
}

/// What the page renders for one session.
#[derive(Serialize)]
struct SessionView<'a> {
    id: SessionId,
    mode: &'static str,
    rows: &'a [PlayerRecord],
    prompt_error: Option<&'a str>,
    loaded_at: DateTime<Utc>,
    saved_at: Option<DateTime<Utc>>,
}

impl<'a> SessionView<'a> {
    fn of(id: SessionId, entry: &'a SessionEntry) -> Self {
        Self {
            id,
            mode: entry.session.mode().name(),
            rows: entry.session.visible_rows(),
            prompt_error: entry.session.prompt_error(),
            loaded_at: entry.loaded_at,
            saved_at: entry.saved_at,
        }
    }
}

#[derive(Deserialize)]
struct PasswordBody {
    #[serde(default)]
    password: String,
}

/// Number inputs may arrive as JSON strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldInput {
    Text(String),
    Number(f64),
}

impl FieldInput {
    fn as_raw(&self) -> String {
        match self {
            FieldInput::Text(s) => s.clone(),
            FieldInput::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct StageFieldBody {
    field: RecordField,
    value: FieldInput,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and row position (e.g. /api/sessions/{id}/rows/{index})
#[derive(Deserialize)]
struct SessionRowPath {
    id: SessionId,
    index: usize,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn edit_error_response(e: &EditError) -> HttpResponse {
    let body = error_json(e);
    match e {
        EditError::WrongPassword => HttpResponse::Unauthorized().json(body),
        EditError::Misconfigured | EditError::StoreMisconfigured(_) => {
            HttpResponse::InternalServerError().json(body)
        }
        EditError::SaveInProgress => HttpResponse::Conflict().json(body),
        EditError::SaveFailed(_) => HttpResponse::BadGateway().json(body),
        EditError::InvalidState
        | EditError::NoSuchRow(_)
        | EditError::NotNumeric { .. }
        | EditError::OutOfRange { .. } => HttpResponse::BadRequest().json(body),
    }
}

fn load_error_response(e: &StoreError) -> HttpResponse {
    if e.is_misconfigured() {
        log::error!("{}", e);
        HttpResponse::InternalServerError().json(error_json("Server misconfigured. Document store is not set up."))
    } else {
        log::warn!("Failed to load the leaderboard: {}", e);
        HttpResponse::BadGateway().json(error_json("Could not load leaderboard."))
    }
}

/// Look up a session, refresh its activity time and hand it to `f`.
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut SessionEntry) -> HttpResponse,
{
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(entry)
        }
        None => HttpResponse::NotFound().json(error_json("No session")),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-leaderboard",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Ranked leaderboard, read-only.
#[get("/api/leaderboard")]
async fn api_get_leaderboard(state: SharedState) -> HttpResponse {
    match state.store.fetch_latest().await {
        Ok(records) => HttpResponse::Ok().json(LeaderboardResponse {
            players: rank_players(&records),
            fetched_at: Utc::now(),
        }),
        Err(e) => load_error_response(&e),
    }
}

/// Shared-secret check: 200 allow, 401 deny, 500 when no secret is configured.
#[post("/api/validate-password")]
async fn api_validate_password(state: SharedState, body: Json<PasswordBody>) -> HttpResponse {
    match state.gate.check(&body.password) {
        AccessVerdict::Allow => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        AccessVerdict::Deny => {
            HttpResponse::Unauthorized().json(serde_json::json!({ "success": false }))
        }
        AccessVerdict::Misconfigured => {
            HttpResponse::InternalServerError().json(error_json(MISCONFIGURED_PASSWORD))
        }
    }
}

/// Fetch the document once and open a session on it (one per page load).
#[post("/api/sessions")]
async fn api_create_session(state: SharedState) -> HttpResponse {
    let records = match state.store.fetch_latest().await {
        Ok(records) => records,
        Err(e) => return load_error_response(&e),
    };
    let id = Uuid::new_v4();
    let entry = SessionEntry {
        session: EditSession::new(records),
        loaded_at: Utc::now(),
        saved_at: None,
        last_activity: Instant::now(),
    };
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!(
        "Opened session {} with {} player(s)",
        id,
        entry.session.displayed().len()
    );
    let entry = g.entry(id).or_insert(entry);
    HttpResponse::Ok().json(SessionView::of(id, entry))
}

/// Current session view (404 if unknown).
#[get("/api/sessions/{id}")]
async fn api_get_session(state: SharedState, path: Path<SessionPath>) -> HttpResponse {
    let id = path.id;
    with_session(&state, id, |entry| {
        HttpResponse::Ok().json(SessionView::of(id, entry))
    })
}

/// Open the password prompt.
#[post("/api/sessions/{id}/edit")]
async fn api_begin_edit(state: SharedState, path: Path<SessionPath>) -> HttpResponse {
    let id = path.id;
    with_session(&state, id, |entry| match entry.session.begin_edit() {
        Ok(()) => HttpResponse::Ok().json(SessionView::of(id, entry)),
        Err(e) => edit_error_response(&e),
    })
}

/// Submit the edit password. A wrong password keeps the prompt open.
#[post("/api/sessions/{id}/password")]
async fn api_submit_password(
    state: SharedState,
    path: Path<SessionPath>,
    body: Json<PasswordBody>,
) -> HttpResponse {
    let id = path.id;
    let gate = &state.gate;
    with_session(&state, id, |entry| {
        match entry.session.submit_password(gate, &body.password) {
            Ok(()) => HttpResponse::Ok().json(SessionView::of(id, entry)),
            Err(e) => edit_error_response(&e),
        }
    })
}

/// Close the prompt or discard staged edits.
#[post("/api/sessions/{id}/cancel")]
async fn api_cancel(state: SharedState, path: Path<SessionPath>) -> HttpResponse {
    let id = path.id;
    with_session(&state, id, |entry| match entry.session.cancel() {
        Ok(()) => HttpResponse::Ok().json(SessionView::of(id, entry)),
        Err(e) => edit_error_response(&e),
    })
}

/// Stage one field of one row (Editing only).
#[put("/api/sessions/{id}/rows/{index}")]
async fn api_stage_field(
    state: SharedState,
    path: Path<SessionRowPath>,
    body: Json<StageFieldBody>,
) -> HttpResponse {
    let id = path.id;
    let raw = body.value.as_raw();
    with_session(&state, id, |entry| {
        match entry.session.stage_field(path.index, body.field, &raw) {
            Ok(_) => HttpResponse::Ok().json(SessionView::of(id, entry)),
            Err(e) => edit_error_response(&e),
        }
    })
}

/// Write all staged rows to the document store in one overwrite.
#[post("/api/sessions/{id}/commit")]
async fn api_commit(state: SharedState, path: Path<SessionPath>) -> HttpResponse {
    let id = path.id;
    let mut staged = None;
    let early = with_session(&state, id, |entry| match entry.session.begin_commit() {
        Ok(body) => {
            staged = Some(body);
            HttpResponse::Accepted().finish()
        }
        Err(e) => edit_error_response(&e),
    });
    let Some(staged) = staged else {
        return early;
    };

    // The write and its resolution run in their own task so a dropped request
    // cannot leave the session stuck in Saving. The lock is not held meanwhile.
    let task_state = state.clone();
    let saving = actix_web::rt::spawn(async move {
        let outcome = task_state.store.overwrite(&staged).await;
        with_session(&task_state, id, |entry| match entry.session.finish_commit(outcome) {
            Ok(()) => {
                entry.saved_at = Some(Utc::now());
                log::info!("Session {} saved {} player(s)", id, staged.len());
                HttpResponse::Ok().json(SessionView::of(id, entry))
            }
            Err(e) => edit_error_response(&e),
        })
    });
    match saving.await {
        Ok(resp) => resp,
        Err(e) => {
            log::error!("Save task for session {} failed: {}", id, e);
            HttpResponse::InternalServerError().json(error_json("Failed to save changes"))
        }
    }
}

/// JSON bodies that fail to parse get the same `{ "error": ... }` shape as other errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let resp = HttpResponse::BadRequest().json(error_json(&err));
        actix_web::error::InternalError::from_response(err, resp).into()
    })
}

/// Routes shared by the server and the tests.
fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(serve_index_async))
        .service(api_health)
        .service(favicon)
        .service(api_get_leaderboard)
        .service(api_validate_password)
        .service(api_create_session)
        .service(api_get_session)
        .service(api_begin_edit)
        .service(api_submit_password)
        .service(api_cancel)
        .service(api_stage_field)
        .service(api_commit);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    for name in config.missing() {
        log::warn!("{} is not set; requests that need it will report a misconfigured server", name);
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store: Arc<dyn DocumentStore> = Arc::new(JsonBinStore::new(&config.store));
    let state = Data::new(AppState::new(store, AccessGate::new(config.edit_password.clone())));

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.sessions.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
