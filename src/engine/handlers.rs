use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{ActionKind, ActionOutcome},
    types::RegisterRequest,
};
use crate::shared::{AppError, AppState, CommandReply};
use crate::user::UserRecord;

/// POST /users/:user_id
#[instrument(name = "register_user", skip(state, request))]
pub async fn register_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<CommandReply<UserRecord>>, AppError> {
    let display_name = request.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::BadRequest(
            "display_name must not be empty".to_string(),
        ));
    }

    let record = state.engine.register(&user_id, display_name).await?;
    info!(user_id = %record.user_id, "Registration completed");

    Ok(Json(CommandReply::ephemeral(
        format!("Welcome, {}! You're now registered.", record.display_name),
        record,
    )))
}

/// DELETE /users/:user_id
#[instrument(name = "unregister_user", skip(state))]
pub async fn unregister_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CommandReply<()>>, AppError> {
    state.engine.unregister(&user_id).await?;

    Ok(Json(CommandReply::ephemeral(
        "You have been unregistered. Hope to see you again!",
        (),
    )))
}

/// POST /users/:user_id/actions/:action
///
/// Check-in replies are private; everything else is posted publicly.
#[instrument(name = "perform_action", skip(state))]
pub async fn perform_action(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(String, ActionKind)>,
) -> Result<Json<CommandReply<ActionOutcome>>, AppError> {
    let outcome = state.engine.perform_now(&user_id, kind).await?;
    let message = outcome.message();

    let reply = match kind {
        ActionKind::CheckIn => CommandReply::ephemeral(message, outcome),
        _ => CommandReply::public(message, outcome),
    };
    Ok(Json(reply))
}
