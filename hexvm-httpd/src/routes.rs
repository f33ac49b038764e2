//! Endpoint table and the translation between HTTP and dispatcher commands.
//!
//! | Path        | Command            |
//! |-------------|--------------------|
//! | `/load/bin` | load raw bytes     |
//! | `/load/hex` | load hex text      |
//! | `/exec`     | execute            |
//! | `/dump`     | dump               |
//! | `/`         | redirect to index  |
//! | anything    | static asset store |

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use hexvm_control::{Command, ControlError, Dispatcher, Reply};
use parking_lot::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, warn};

pub const PHASE_HEADER: &str = "x-hexvm-phase";
pub const HALT_HEADER: &str = "x-hexvm-halt";
pub const FAULT_HEADER: &str = "x-hexvm-fault";

#[derive(Clone)]
pub struct AppState {
    // One lock around the only machine: a request holds it from its first
    // operation until its dump is rendered.
    dispatcher: Arc<Mutex<Dispatcher>>,
    index: Arc<str>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, index: impl Into<Arc<str>>) -> Self {
        AppState {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            index: index.into(),
        }
    }
}

/// Owned form of a control request, classified from the path
enum Endpoint {
    LoadBin(Bytes),
    LoadHex(Bytes),
    Exec,
    Dump,
}

impl Endpoint {
    fn command(&self) -> Command<'_> {
        match self {
            Endpoint::LoadBin(body) => Command::LoadBinary(body),
            Endpoint::LoadHex(body) => Command::LoadHex(body),
            Endpoint::Exec => Command::Execute,
            Endpoint::Dump => Command::Dump,
        }
    }
}

pub fn router(state: AppState, www: impl AsRef<Path>, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/load/bin", post(load_bin))
        .route("/load/hex", post(load_hex))
        .route("/exec", get(exec).post(exec))
        .route("/dump", get(dump))
        .fallback_service(ServeDir::new(www))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn index(State(state): State<AppState>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, state.index.to_string())]).into_response()
}

async fn load_bin(State(state): State<AppState>, body: Bytes) -> Response {
    run(state, Endpoint::LoadBin(body)).await
}

async fn load_hex(State(state): State<AppState>, body: Bytes) -> Response {
    run(state, Endpoint::LoadHex(body)).await
}

async fn exec(State(state): State<AppState>) -> Response {
    run(state, Endpoint::Exec).await
}

async fn dump(State(state): State<AppState>) -> Response {
    run(state, Endpoint::Dump).await
}

// Execution can run for as long as the program does, so the whole command
// runs on the blocking pool; the lock keeps it to one command at a time.
async fn run(state: AppState, endpoint: Endpoint) -> Response {
    let dispatcher = state.dispatcher.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let mut dispatcher = dispatcher.lock();
        dispatcher.dispatch(endpoint.command())
    })
    .await;

    match joined {
        Ok(Ok(reply)) => dump_response(reply),
        Ok(Err(err)) => rejection(err),
        Err(err) => {
            error!(%err, "dispatch task failed");
            plain(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), err.to_string())
        }
    }
}

fn dump_response(reply: Reply) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(PHASE_HEADER, HeaderValue::from_static(reply.phase.as_str()));
    if let Some(fault) = reply.fault {
        headers.insert(HALT_HEADER, HeaderValue::from_static("fault"));
        if let Ok(value) = HeaderValue::from_str(&fault.to_string()) {
            headers.insert(FAULT_HEADER, value);
        }
    }
    plain(StatusCode::OK, headers, reply.dump)
}

fn rejection(err: ControlError) -> Response {
    let status = status_for(&err);
    warn!(%err, status = status.as_u16(), "request rejected");
    plain(status, HeaderMap::new(), err.to_string())
}

pub fn status_for(err: &ControlError) -> StatusCode {
    match err {
        ControlError::InvalidEncoding { .. } => StatusCode::BAD_REQUEST,
        ControlError::ProgramTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ControlError::BufferTooSmall { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn plain(status: StatusCode, mut headers: HeaderMap, body: String) -> Response {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    (status, headers, body).into_response()
}
