use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{BalanceAdjustment, BalanceView, RankingEntry},
    types::{AdjustBalanceRequest, TopQuery},
};
use crate::shared::{AppError, AppState, CommandReply};

/// GET /ledger/top
#[instrument(name = "top_balances", skip(state))]
pub async fn top_balances(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<CommandReply<Vec<RankingEntry>>>, AppError> {
    let limit = query.limit.unwrap_or(state.ranking_limit);
    let ranking = state.ledger.top_balances(limit).await?;

    let message = if ranking.is_empty() {
        "Nobody has earned anything yet.".to_string()
    } else {
        let lines: Vec<String> = ranking
            .iter()
            .map(|entry| format!("{}. {} - {}", entry.rank, entry.display_name, entry.balance))
            .collect();
        format!("Richest users:\n{}", lines.join("\n"))
    };

    Ok(Json(CommandReply::public(message, ranking)))
}

/// GET /users/:user_id/balance
#[instrument(name = "get_balance", skip(state))]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CommandReply<BalanceView>>, AppError> {
    let view = state.ledger.balance(&user_id).await?;
    let message = format!("{} has {} coins.", view.display_name, view.balance);

    Ok(Json(CommandReply::public(message, view)))
}

/// POST /admin/users/:user_id/balance
///
/// Callers are expected to sit behind an operator-only route.
#[instrument(name = "adjust_balance", skip(state, request))]
pub async fn adjust_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AdjustBalanceRequest>,
) -> Result<Json<CommandReply<BalanceAdjustment>>, AppError> {
    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("reason must not be empty".to_string()));
    }

    let adjustment = state
        .ledger
        .adjust_balance(&user_id, request.delta, reason)
        .await?;
    info!(
        delta = adjustment.delta,
        new_balance = adjustment.new_balance,
        "Operator adjusted balance"
    );

    let message = format!(
        "{}'s balance changed by {} ({}). New balance: {}",
        adjustment.display_name, adjustment.delta, adjustment.reason, adjustment.new_balance
    );
    Ok(Json(CommandReply::public(message, adjustment)))
}
