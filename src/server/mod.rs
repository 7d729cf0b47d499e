//! REST surface over the session manager and resolver.

pub mod levels;

pub use levels::{Level, LEVELS};

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde_json::{json, Value};

use crate::board::Position;
use crate::codec::{self, Placement};
use crate::error::Error;
use crate::render;
use crate::resolver::Resolver;
use crate::session::manager::INVALID_ELO;
use crate::session::{SessionId, SessionManager};

pub const CONVERSATION_HEADER: &str = "openai-conversation-id";
const MISSING_COLOR: &str = "Missing assistant_color in request data. Please specify 'white' or 'black'";
const MISSING_ELO: &str = "Missing elo in request data. Please specify a number between 1350 and 2850";
const MISSING_MOVE: &str = "Missing move in request data";
const IMAGE_CACHE: &str = "public, max-age=31536000";

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub resolver: Arc<Resolver>,
    /// Overrides the base URL derived from request headers.
    pub public_url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/levels", get(levels))
        .route("/api/new_game", post(new_game))
        .route("/api/move", post(make_move))
        .route("/api/fen", get(fen))
        .route("/api/move_history", get(move_history))
        .route("/board.svg", get(board_svg))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// A JSON error body with its status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self { status, body: json!({ "success": false, "message": message }) }
    }

    fn bad_request(message: &str) -> Self {
        warn!("rejected request: {message}");
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn with_levels(mut self) -> Self {
        self.body["levels"] = json!(LEVELS);
        self
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(m) if m == INVALID_ELO => ApiError::bad_request(&m).with_levels(),
            Error::Validation(m) => ApiError::bad_request(&m),
            Error::Move(e) => ApiError::bad_request(&e.to_string()),
            Error::Decode(e) => {
                warn!("bad board token: {e}");
                ApiError::new(StatusCode::BAD_REQUEST, "Invalid b query parameter")
            }
            Error::NotFound => {
                warn!("no game found");
                ApiError::new(StatusCode::NOT_FOUND, "No game found")
            }
            Error::Engine(e) => {
                error!("engine failure: {e}");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "The chess engine is unavailable, please try again")
            }
            Error::Store(e) => {
                error!("store failure: {e}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Error::Internal(m) => {
                error!("internal error: {m}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, Json(self.body)).into_response() }
}

type ApiResult<T> = Result<T, ApiError>;

/// Runs session and engine work off the async executor.
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("worker task failed: {e}");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let res = next.run(req).await;
    if uri.path() != "/board.svg" {
        info!("{method} {uri} -> {}", res.status().as_u16());
    }
    res
}

fn conversation(headers: &HeaderMap) -> ApiResult<SessionId> {
    let id = headers
        .get(CONVERSATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing Openai-Conversation-Id header"))?;
    Ok(SessionId::from_conversation(id))
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.clone();
    }
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok()).unwrap_or("localhost");
    let scheme = headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()).unwrap_or("http");
    format!("{scheme}://{host}")
}

fn json_body(body: &Bytes) -> ApiResult<Value> {
    if body.is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Request body is not valid JSON"))
}

async fn levels() -> Json<[Level; 5]> { Json(LEVELS) }

async fn new_game(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<Response> {
    let id = conversation(&headers)?;
    let base = base_url(&state, &headers);
    let data = json_body(&body)?;
    let color = data.get("assistant_color").and_then(Value::as_str).ok_or_else(|| ApiError::bad_request(MISSING_COLOR))?.to_string();
    let elo = match data.get("elo") {
        None | Some(Value::Null) => return Err(ApiError::bad_request(MISSING_ELO).with_levels()),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => String::new(),
    };

    let board = blocking(move || {
        let session = state.sessions.create(&id, &color, &elo)?;
        Ok(state.resolver.resolve(&session, &base)?)
    })
    .await?;
    Ok(Json(board).into_response())
}

async fn make_move(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<Response> {
    let id = conversation(&headers)?;
    let base = base_url(&state, &headers);

    let (status, board) = blocking(move || {
        let session = state.sessions.load(&id, None)?;
        let data = json_body(&body)?;
        let text = data.get("move").and_then(Value::as_str).ok_or_else(|| ApiError::bad_request(MISSING_MOVE))?;
        match state.sessions.apply_move(&session, text) {
            Ok(next) => Ok((StatusCode::OK, state.resolver.resolve(&next, &base)?)),
            Err(Error::Move(e)) => {
                warn!("{id}: {e}");
                let mut board = state.resolver.resolve(&session, &base)?;
                board.error_message = Some(e.to_string());
                Ok((StatusCode::BAD_REQUEST, board))
            }
            Err(e) => Err(e.into()),
        }
    })
    .await?;
    Ok((status, Json(board)).into_response())
}

async fn fen(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let id = conversation(&headers)?;
    let fen = blocking(move || Ok(state.sessions.load(&id, None)?.position().fen())).await?;
    Ok(Json(json!({ "FEN": fen })))
}

async fn move_history(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let id = conversation(&headers)?;
    let history = blocking(move || Ok(state.sessions.load(&id, None)?.formatted_history())).await?;
    Ok(Json(json!({ "move_history": history })))
}

/// `?b=<token>`, `?cid=<session>&m=<ply>` or `?fen=<fen>`.
async fn board_svg(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> ApiResult<Response> {
    let placement = if let Some(token) = params.get("b") {
        codec::decode(token).map_err(Error::from)?
    } else if let Some(cid) = params.get("cid") {
        let id = SessionId::parse(cid).ok_or_else(|| ApiError::bad_request("Invalid cid query parameter"))?;
        let ply = match params.get("m") {
            None => None,
            Some(m) => Some(m.parse::<usize>().map_err(|_| ApiError::bad_request("Invalid m query parameter"))?),
        };
        blocking(move || {
            let session = state.sessions.load(&id, ply)?;
            Ok(Placement::from_board(session.position().board()))
        })
        .await?
    } else if let Some(fen) = params.get("fen") {
        let fen = fen.replace('+', " ");
        let position = Position::from_fen(&fen).map_err(|_| ApiError::bad_request("Invalid fen query parameter"))?;
        Placement::from_board(position.board())
    } else {
        return Err(ApiError::bad_request("Missing b query parameter"));
    };

    let headers = [(header::CONTENT_TYPE, "image/svg+xml"), (header::CACHE_CONTROL, IMAGE_CACHE)];
    Ok((headers, render::svg(&placement)).into_response())
}
