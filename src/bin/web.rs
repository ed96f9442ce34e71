//! Single binary JSON API for organizing pickleball courts.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR, SESSION_TTL_HOURS.
//! Each session is persisted under DATA_DIR/<session id>/ and reloaded on demand.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use pickleball_courts::config::ServerConfig;
use pickleball_courts::{
    CourtId, GameConfig, JsonFileStore, MemoryStore, PlayerId, Session, SessionId, SharedStore,
    TimerAction,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path as FsPath, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-session entry: session data + last activity time (for auto-unload).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// Loaded sessions by id. Idle ones are dropped from memory; their files stay on disk.
struct Sessions {
    entries: RwLock<HashMap<SessionId, SessionEntry>>,
    data_dir: PathBuf,
}

type AppState = Data<Sessions>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct SessionPlayersBody {
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct AssignBody {
    court_id: CourtId,
    position: u32,
    player_id: PlayerId,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and player id (e.g. /api/sessions/{id}/players/{player_id})
#[derive(Deserialize)]
struct SessionPlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

/// Path segments: session id, court and position.
#[derive(Deserialize)]
struct SessionSlotPath {
    id: SessionId,
    court_id: CourtId,
    position: u32,
}

#[derive(Deserialize)]
struct TimerPath {
    id: SessionId,
    action: TimerAction,
}

fn error_response(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

/// Store for a session's directory; falls back to memory if the directory cannot be created.
fn session_store(data_dir: &FsPath, id: SessionId) -> SharedStore {
    match JsonFileStore::open(data_dir.join(id.to_string())) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("Session {} will not be saved to disk: {}", id, e);
            MemoryStore::shared()
        }
    }
}

/// Run `f` on a session, reloading it from disk if it was unloaded. Refreshes last_activity.
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> HttpResponse,
{
    let mut g = match state.entries.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if !g.contains_key(&id) {
        if !state.data_dir.join(id.to_string()).is_dir() {
            return not_found();
        }
        let session = Session::open(id, session_store(&state.data_dir, id));
        g.insert(
            id,
            SessionEntry {
                session,
                last_activity: Instant::now(),
            },
        );
    }
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.session)
        }
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pickleball-courts",
    })
}

/// Create a new session (returns its snapshot with id; client stores id for later requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState) -> HttpResponse {
    let id = Uuid::new_v4();
    let session = Session::open(id, session_store(&state.data_dir, id));
    let body = serde_json::to_value(session.snapshot());
    let mut g = match state.entries.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    match body {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| HttpResponse::Ok().json(s.snapshot()))
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| match s.add_player(&body.name) {
        Ok(_) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => error_response(e),
    })
}

#[put("/api/sessions/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<SessionPlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| match s.rename_player(path.player_id, &body.name) {
        Ok(_) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => error_response(e),
    })
}

/// Remove a player; their court position and session-player entry go with them.
#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    with_session(&state, path.id, |s| match s.remove_player(path.player_id) {
        Ok(_) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => error_response(e),
    })
}

/// Import players from a CSV body (first column is the name).
#[post("/api/sessions/{id}/players/import")]
async fn api_import_players(
    state: AppState,
    path: Path<SessionPath>,
    body: String,
) -> HttpResponse {
    with_session(&state, path.id, |s| match s.import_players(body.as_bytes()) {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
            "imported": summary,
            "session": s.snapshot(),
        })),
        Err(e) => error_response(e),
    })
}

#[get("/api/sessions/{id}/players/export")]
async fn api_export_players(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| match s.export_players() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(e),
    })
}

#[get("/api/sessions/{id}/players/{player_id}/assignments")]
async fn api_player_assignments(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        HttpResponse::Ok().json(s.player_assignments(path.player_id))
    })
}

/// Replace the game configuration (changing game type clears the courts).
#[put("/api/sessions/{id}/config")]
async fn api_update_config(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<GameConfig>,
) -> HttpResponse {
    let config = body.into_inner();
    with_session(&state, path.id, |s| match s.update_config(config).map(|_| ()) {
        Ok(()) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => error_response(e),
    })
}

#[put("/api/sessions/{id}/session-players")]
async fn api_set_session_players(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SessionPlayersBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        match s.set_session_players(&body.player_ids).map(|_| ()) {
            Ok(()) => HttpResponse::Ok().json(s.snapshot()),
            Err(e) => error_response(e),
        }
    })
}

#[post("/api/sessions/{id}/assignments")]
async fn api_assign_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<AssignBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        match s.assign_player_to_court(body.court_id, body.player_id, body.position) {
            Ok(()) => HttpResponse::Ok().json(s.snapshot()),
            Err(e) => error_response(e),
        }
    })
}

/// Empty one slot (no-op if already empty).
#[delete("/api/sessions/{id}/assignments/{court_id}/{position}")]
async fn api_remove_assignment(state: AppState, path: Path<SessionSlotPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.remove_player_from_court(path.court_id, path.position);
        HttpResponse::Ok().json(s.snapshot())
    })
}

#[delete("/api/sessions/{id}/assignments")]
async fn api_clear_assignments(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.clear_all_assignments();
        HttpResponse::Ok().json(s.snapshot())
    })
}

/// Randomly place the session players (or everyone, if none selected) on courts.
#[post("/api/sessions/{id}/assignments/randomize")]
async fn api_randomize_assignments(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.randomize_assignments(&mut rand::thread_rng());
        HttpResponse::Ok().json(s.snapshot())
    })
}

/// Timer control: start, pause, resume or reset.
#[post("/api/sessions/{id}/timer/{action}")]
async fn api_timer_action(state: AppState, path: Path<TimerPath>) -> HttpResponse {
    with_session(&state, path.id, |s| match s.timer_action(path.action).map(|_| ()) {
        Ok(_) => HttpResponse::Ok().json(s.snapshot()),
        Err(e) => error_response(e),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Session data in {}", config.data_dir.display());

    let state = Data::new(Sessions {
        entries: RwLock::new(HashMap::new()),
        data_dir: config.data_dir.clone(),
    });

    // Background task: every second, advance running game timers
    let state_timers = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let mut g = match state_timers.entries.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            for entry in g.values_mut() {
                entry.session.tick_timer();
            }
        }
    });

    // Background task: every 30 minutes, unload sessions idle past the TTL
    let state_cleanup = state.clone();
    let ttl = config.session_ttl;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.entries.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < ttl);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Unloaded {} idle session(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_import_players)
            .service(api_export_players)
            .service(api_add_player)
            .service(api_rename_player)
            .service(api_remove_player)
            .service(api_player_assignments)
            .service(api_update_config)
            .service(api_set_session_players)
            .service(api_randomize_assignments)
            .service(api_assign_player)
            .service(api_clear_assignments)
            .service(api_remove_assignment)
            .service(api_timer_action)
    })
    .bind(bind)?
    .run()
    .await
}
