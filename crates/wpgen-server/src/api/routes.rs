//! REST routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use wpgen_core::{
    completion_replies, greeting, history_replies, mission_file_name, new_user_notice,
    Calculation, CalculationRequest, Command, Keyboard, Outcome, Reply, Step, MISSION_CAPTION,
};

use crate::api::request_id;
use crate::export::write_mission_file;
use crate::persistence::{
    admins as admins_db, calculations as calculations_db, users as users_db,
};
use crate::state::{AppState, SessionSnapshot};

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/users/:user_id/start", post(start_user))
        .route("/v1/users/:user_id/messages", post(post_message))
        .route("/v1/users/:user_id/history", get(get_history))
        .route(
            "/v1/users/:user_id/session",
            get(get_session).delete(cancel_session),
        )
        .layer(middleware::from_fn(request_id::propagate_request_id))
}

// === Request/Response types ===

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub full_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub new_user: bool,
    pub is_admin: bool,
    pub state: Step,
    pub replies: Vec<Reply>,
    /// Messages the transport forwards to each admin.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_notices: Vec<AdminNotice>,
}

#[derive(Debug, Serialize)]
pub struct AdminNotice {
    pub admin_id: i64,
    pub reply: Reply,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub state: Step,
    pub replies: Vec<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentOut>,
}

/// Mission file the transport should upload after the replies.
#[derive(Debug, Serialize)]
pub struct DocumentOut {
    pub file_name: String,
    pub path: String,
    pub caption: String,
    pub keyboard: Keyboard,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: i64,
    pub results: Vec<String>,
    pub replies: Vec<Reply>,
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

// === Handlers ===

async fn start_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let new_user = users_db::add_user(
        state.db().pool(),
        user_id,
        &req.full_name,
        req.username.as_deref(),
    )
    .await
    .map_err(|err| {
        tracing::error!("Failed to register user {}: {}", user_id, err);
        internal_error("⚠️ An internal error occurred.\nPlease try again later.")
    })?;

    let pool = state.db().pool();
    let mut admin_notices = Vec::new();
    if new_user {
        tracing::info!("New user registered: {} ({})", req.full_name, user_id);
        match admins_db::admin_ids(pool).await {
            Ok(admin_ids) => {
                let notice = new_user_notice(&req.full_name, req.username.as_deref(), user_id);
                admin_notices = admin_ids
                    .into_iter()
                    .map(|admin_id| AdminNotice {
                        admin_id,
                        reply: notice.clone(),
                    })
                    .collect();
            }
            Err(err) => tracing::warn!("Failed to load admins for new user notice: {}", err),
        }
    }

    let is_admin = admins_db::is_admin(pool, user_id).await.unwrap_or_else(|err| {
        tracing::warn!("Admin lookup for user {} failed: {}", user_id, err);
        false
    });

    // Read-only: registering must not create a session slot.
    let step = state
        .snapshot(user_id)
        .await
        .map_or(Step::Idle, |snapshot| snapshot.state);
    Ok(Json(StartResponse {
        new_user,
        is_admin,
        state: step,
        replies: vec![greeting(&req.full_name)],
        admin_notices,
    }))
}

async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let command = Command::classify(&req.text);
    let limits = *state.limits();

    // Held until the mission file is on disk, so a second message from the
    // same user waits for this one to finish.
    let mut slot = state.lock_session(user_id).await;
    slot.touch();
    let outcome = slot.session.handle(command, &limits);
    let step = slot.session.step();

    let response = match outcome {
        Outcome::Prompted(reply) | Outcome::Cancelled(reply) | Outcome::Info(reply) => {
            MessageResponse {
                state: step,
                replies: vec![reply],
                document: None,
            }
        }
        Outcome::Rejected { step, error, reply } => {
            tracing::debug!("User {} input rejected at {:?}: {}", user_id, step, error);
            MessageResponse {
                state: step,
                replies: vec![reply],
                document: None,
            }
        }
        Outcome::History => MessageResponse {
            state: step,
            replies: history(&state, user_id).await?.1,
            document: None,
        },
        Outcome::Completed(calculation) => {
            let document = export(&state, user_id, &calculation).await?;
            state.queue_history(calculation.record(user_id));
            tracing::info!(
                "User {} completed a calculation: {}",
                user_id,
                calculation.result_summary()
            );
            MessageResponse {
                state: step,
                replies: completion_replies(&calculation),
                document: Some(document),
            }
        }
    };

    Ok(Json(response))
}

async fn export(
    state: &AppState,
    user_id: i64,
    calculation: &Calculation,
) -> Result<DocumentOut, ApiError> {
    let path = write_mission_file(&state.config().export_dir, user_id, &calculation.mission_xml)
        .await
        .map_err(|err| {
            tracing::error!("Mission export for user {} failed: {}", user_id, err);
            internal_error("⚠️ Failed to generate the mission file.")
        })?;

    Ok(DocumentOut {
        file_name: mission_file_name(user_id),
        path: path.to_string_lossy().into_owned(),
        caption: MISSION_CAPTION.to_string(),
        keyboard: Keyboard::MainMenu,
    })
}

async fn history(state: &AppState, user_id: i64) -> Result<(Vec<String>, Vec<Reply>), ApiError> {
    let results = calculations_db::last_results(
        state.db().pool(),
        user_id,
        state.config().history_limit,
    )
    .await
    .map_err(|err| {
        tracing::error!("Failed to load history for user {}: {}", user_id, err);
        internal_error("⚠️ Failed to load history.")
    })?;

    let replies = history_replies(&results);
    Ok((results, replies))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (results, replies) = history(&state, user_id).await?;
    Ok(Json(HistoryResponse {
        user_id,
        results,
        replies,
    }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Json<SessionSnapshot> {
    let snapshot = state.snapshot(user_id).await.unwrap_or(SessionSnapshot {
        user_id,
        state: Step::Idle,
        request: CalculationRequest::default(),
        last_activity: None,
    });
    Json(snapshot)
}

async fn cancel_session(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Json<MessageResponse> {
    let mut slot = state.lock_session(user_id).await;
    slot.touch();

    let reply = slot.session.cancel();

    Json(MessageResponse {
        state: slot.session.step(),
        replies: vec![reply],
        document: None,
    })
}
