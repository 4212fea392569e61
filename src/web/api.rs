use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use super::{AppState, StateEvent};
use crate::engine::{EngineError, PredictionTracker, UndoReport};
use crate::patterns::{Advice, Prediction, SuggestionFamily};
use crate::types::Outcome;

// === Read Endpoints ===

pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    let window = state.config.display.display_window;

    Json(json!({
        "history": tracker.history().last_n(window).to_vec(),
        "totalRounds": tracker.history().len(),
        "signals": tracker.signals(),
        "performance": tracker.performance(),
        "accuracy": tracker.accuracy(),
        "prediction": prediction_json(&tracker.current_prediction()),
        "suggestions": advice_json(&tracker.suggestions(&SuggestionFamily::all())),
    }))
}

pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    Json(tracker.history().rounds().to_vec())
}

pub async fn get_signals(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    Json(tracker.signals().to_vec())
}

pub async fn get_performance(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    Json(json!({
        "total": tracker.performance().total,
        "hits": tracker.performance().hits,
        "misses": tracker.performance().misses,
        "accuracy": tracker.accuracy(),
        "perPattern": per_pattern_json(&tracker),
    }))
}

pub async fn get_prediction(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    Json(prediction_json(&tracker.current_prediction()))
}

#[derive(Deserialize)]
pub struct SuggestionsQuery {
    pub families: Option<String>,
}

pub async fn get_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> impl IntoResponse {
    let families = match SuggestionFamily::parse_list(query.families.as_deref().unwrap_or("")) {
        Ok(families) => families,
        Err(bad) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("unknown suggestion family: {}", bad)})),
            )
                .into_response();
        }
    };
    let tracker = state.tracker.lock().await;
    Json(advice_json(&tracker.suggestions(&families))).into_response()
}

pub async fn get_export(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    ([(header::CONTENT_TYPE, "text/csv")], tracker.export_csv())
}

// === Mutating Endpoints ===

#[derive(Deserialize)]
pub struct AppendRoundRequest {
    pub outcome: Option<String>,
    pub sums: Option<(u8, u8)>,
}

pub async fn post_round(
    State(state): State<AppState>,
    Json(req): Json<AppendRoundRequest>,
) -> impl IntoResponse {
    let outcome = match req.outcome.as_deref() {
        Some(raw) => match Outcome::from_str(raw) {
            Some(outcome) => Some(outcome),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": format!("unknown outcome: {}", raw)})),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let mut tracker = state.tracker.lock().await;
    match tracker.append(outcome, req.sums) {
        Ok(report) => {
            state.notify(StateEvent::RoundAppended {
                timestamp: report.round.timestamp,
                outcome: report.round.outcome,
            });
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "round": report.round,
                    "resolved": report.resolved,
                    "opened": report.opened,
                    "performance": tracker.performance(),
                })),
            )
                .into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn post_undo(State(state): State<AppState>) -> impl IntoResponse {
    let mut tracker = state.tracker.lock().await;
    match tracker.undo_last() {
        Ok(UndoReport::Undone { round }) => {
            state.notify(StateEvent::RoundUndone {
                timestamp: round.timestamp,
                outcome: round.outcome,
            });
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "undone": true,
                    "round": round,
                    "performance": tracker.performance(),
                })),
            )
                .into_response()
        }
        Ok(UndoReport::Empty) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "undone": false})),
        )
            .into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn post_clear(State(state): State<AppState>) -> impl IntoResponse {
    let mut tracker = state.tracker.lock().await;
    match tracker.clear_all() {
        Ok(()) => {
            state.notify(StateEvent::SessionCleared);
            (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

fn engine_error_response(err: EngineError) -> axum::response::Response {
    if err.is_validation() {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": err.to_string()})),
        )
            .into_response()
    } else {
        error!("Request failed: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": err.to_string()})),
        )
            .into_response()
    }
}

fn prediction_json(prediction: &Prediction) -> serde_json::Value {
    match prediction {
        Prediction::InsufficientData => json!({"status": "insufficient-data"}),
        Prediction::NoMatch => json!({"status": "no-match"}),
        Prediction::Match(matched) => json!({
            "status": "match",
            "patternId": matched.pattern_id,
            "name": matched.name,
            "predicted": matched.predicted,
        }),
    }
}

fn advice_json(advice: &Advice) -> serde_json::Value {
    match advice {
        Advice::InsufficientData => json!({"status": "insufficient-data", "suggestions": []}),
        Advice::Suggestions(suggestions) => json!({
            "status": "ok",
            "suggestions": suggestions,
        }),
    }
}

fn per_pattern_json(tracker: &PredictionTracker) -> serde_json::Value {
    let rows: Vec<_> = tracker
        .per_pattern_breakdown()
        .into_iter()
        .map(|stats| {
            json!({
                "patternId": stats.pattern_id,
                "name": stats.name,
                "total": stats.counters.total,
                "hits": stats.counters.hits,
                "misses": stats.counters.misses,
                "accuracy": stats.counters.accuracy_pct(),
            })
        })
        .collect();
    json!(rows)
}

// === WebSocket Handler ===

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.events.subscribe();

    info!("WebSocket client connected");

    // Send a first frame so the client can render without a fetch
    let initial = {
        let tracker = state.tracker.lock().await;
        json!({
            "type": "initial",
            "totalRounds": tracker.history().len(),
            "performance": tracker.performance(),
            "accuracy": tracker.accuracy(),
            "prediction": prediction_json(&tracker.current_prediction()),
        })
    };
    if let Ok(json_str) = serde_json::to_string(&initial) {
        let _ = sender.send(Message::Text(json_str)).await;
    }

    // Forward state events to the client
    let send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => {
                info!("WebSocket client disconnected");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
}

// === Health Check ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: "0.1.0",
    })
}
