//! HTTP boundary: routes, request validation, error mapping, and the
//! admission-control middleware.
//!
//! The boundary owns everything the engine does not: parsing user-supplied
//! identifiers, bounding row/col input, and mapping [`GameError`] kinds to
//! HTTP statuses. Handlers call the [`GameService`] synchronously; nothing
//! here blocks on I/O.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GameError;
use crate::player::{Player, PlayerStats};
use crate::rate_limit::{Decision, RateLimiter};
use crate::service::GameService;
use crate::session::{GameSession, GameStatus};
use crate::store::SessionStats;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game service.
    pub service: Arc<GameService>,
    /// Admission-control limiter guarding the API routes.
    pub limiter: Arc<RateLimiter>,
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable message, advisory only.
    pub message: String,
}

/// HTTP wrapper around [`GameError`] that selects a status from the variant,
/// never from message text.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            GameError::GameNotFound(_) => (StatusCode::NOT_FOUND, "game_not_found"),
            GameError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "player_not_found"),
            GameError::InvalidState(_) => (StatusCode::BAD_REQUEST, "invalid_state"),
            GameError::InvalidMove(_) => (StatusCode::BAD_REQUEST, "invalid_move"),
            GameError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        };
        let body = ErrorBody {
            error: code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the application router: `/health` unthrottled, everything else
/// behind the rate-limit middleware.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(game_routes())
        .merge(player_routes())
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
}

fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/waiting", get(waiting_games))
        .route("/games/stats", get(game_stats))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/status", get(get_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/moves", post(make_move))
}

fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/players", post(create_player).get(search_players))
        .route("/players/count", get(player_count))
        .route("/players/leaderboard", get(leaderboard))
        .route("/players/most-active", get(most_active))
        .route("/players/most-efficient", get(most_efficient))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
        .route("/players/{id}/stats", get(player_stats))
}

// ─────────────────────────────────────────────────────────────
//  Admission control
// ─────────────────────────────────────────────────────────────

/// Rate-limit middleware: one fixed window per client key.
///
/// The client key is the first `X-Forwarded-For` entry when present,
/// otherwise a shared local key (tests and direct connections).
async fn rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = state.limiter.check(&client);

    if !decision.allowed {
        let body = ErrorBody {
            error: "rate_limited",
            message: "Rate limit exceeded. Please try again later.".into(),
        };
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        let headers = response.headers_mut();
        insert_rate_headers(headers, &decision);
        if let Ok(value) = HeaderValue::from_str(&decision.retry_after.as_secs().to_string()) {
            headers.insert("Retry-After", value);
        }
        return response;
    }

    let mut response = next.run(request).await;
    insert_rate_headers(response.headers_mut(), &decision);
    response
}

fn client_key(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

fn insert_rate_headers(headers: &mut axum::http::HeaderMap, decision: &Decision) {
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", value);
    }
    // Seconds until the window resets; the limiter clock is monotonic, so no
    // epoch timestamp is available.
    if let Ok(value) = HeaderValue::from_str(&decision.retry_after.as_secs().to_string()) {
        headers.insert("X-RateLimit-Reset", value);
    }
}

// ─────────────────────────────────────────────────────────────
//  Health
// ─────────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─────────────────────────────────────────────────────────────
//  Game handlers
// ─────────────────────────────────────────────────────────────

/// Body for creating a game.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// Display name for the game.
    pub name: String,
}

/// Body for joining a game.
#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    /// Id of the joining player.
    pub player_id: String,
}

/// Body for making a move.
#[derive(Debug, Deserialize)]
pub struct MakeMoveRequest {
    /// Id of the moving player.
    pub player_id: String,
    /// Board row, 0-2.
    pub row: usize,
    /// Board column, 0-2.
    pub col: usize,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> (StatusCode, Json<GameSession>) {
    let game = state.service.create_game(request.name);
    (StatusCode::CREATED, Json(game))
}

#[instrument(skip(state))]
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<GameSession>>, ApiError> {
    let games = match query.status {
        Some(raw) => {
            let status = GameStatus::from_str(&raw)
                .map_err(|_| GameError::Validation(format!("Unknown status: {raw}")))?;
            state.service.games_by_status(status)
        }
        None => state.service.list_games(),
    };
    Ok(Json(games))
}

#[instrument(skip(state))]
async fn waiting_games(State(state): State<AppState>) -> Json<Vec<GameSession>> {
    Json(state.service.games_by_status(GameStatus::Waiting))
}

#[instrument(skip(state))]
async fn game_stats(State(state): State<AppState>) -> Json<SessionStats> {
    Json(state.service.game_stats())
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameSession>, ApiError> {
    let game = state
        .service
        .find_game(&id)
        .ok_or_else(|| GameError::GameNotFound("Game not found".into()))?;
    Ok(Json(game))
}

#[instrument(skip(state))]
async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<GameSession>, ApiError> {
    if request.player_id.trim().is_empty() {
        return Err(GameError::Validation("player_id is required".into()).into());
    }
    let game = state.service.join_game(&id, &request.player_id)?;
    Ok(Json(game))
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MakeMoveRequest>,
) -> Result<Json<GameSession>, ApiError> {
    if request.player_id.trim().is_empty() {
        return Err(GameError::Validation("player_id is required".into()).into());
    }
    if request.row > 2 || request.col > 2 {
        return Err(GameError::Validation("row and col must be between 0 and 2".into()).into());
    }
    let game = state
        .service
        .make_move(&id, &request.player_id, request.row, request.col)?;
    Ok(Json(game))
}

#[instrument(skip(state))]
async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.service.delete_game(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ─────────────────────────────────────────────────────────────
//  Player handlers
// ─────────────────────────────────────────────────────────────

/// Body for creating or updating a player.
#[derive(Debug, Deserialize)]
pub struct PlayerRequest {
    /// Player display name, 1-100 characters.
    pub name: String,
    /// Player email, unique across the registry.
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

fn validate_player_request(request: &PlayerRequest) -> Result<(), GameError> {
    let name = request.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(GameError::Validation(
            "Player name must be between 1 and 100 characters".into(),
        ));
    }
    let email = request.email.trim();
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !well_formed {
        return Err(GameError::Validation(
            "Please provide a valid email address".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    validate_player_request(&request)?;
    let player = state
        .service
        .players()
        .create(request.name.trim().to_string(), request.email.trim().to_string())?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[instrument(skip(state))]
async fn search_players(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Json<Vec<Player>> {
    let players = state
        .service
        .players()
        .search_by_name(query.name.as_deref().unwrap_or(""));
    debug!(count = players.len(), "Players matched");
    Json(players)
}

#[instrument(skip(state))]
async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let player = state
        .service
        .players()
        .get(&id)
        .ok_or_else(|| GameError::PlayerNotFound("Player not found".into()))?;
    Ok(Json(player))
}

#[instrument(skip(state))]
async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PlayerRequest>,
) -> Result<Json<Player>, ApiError> {
    validate_player_request(&request)?;
    let player = state.service.players().update(
        &id,
        request.name.trim().to_string(),
        request.email.trim().to_string(),
    )?;
    Ok(Json(player))
}

#[instrument(skip(state))]
async fn delete_player(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.service.players().delete(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[instrument(skip(state))]
async fn player_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerStats>, ApiError> {
    let player = state
        .service
        .players()
        .get(&id)
        .ok_or_else(|| GameError::PlayerNotFound("Player not found".into()))?;
    Ok(Json(*player.stats()))
}

#[instrument(skip(state))]
async fn player_count(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "count": state.service.players().count() }))
}

#[instrument(skip(state))]
async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Player>> {
    Json(state.service.players().leaderboard(query.limit.unwrap_or(10)))
}

#[instrument(skip(state))]
async fn most_active(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Player>> {
    Json(state.service.players().most_active(query.limit.unwrap_or(10)))
}

#[instrument(skip(state))]
async fn most_efficient(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Player>> {
    Json(
        state
            .service
            .players()
            .most_efficient(query.limit.unwrap_or(10)),
    )
}
