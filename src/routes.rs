use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::engine::{perform_action, register_user, unregister_user};
use crate::ledger::{adjust_balance, get_balance, top_balances};
use crate::shared::AppState;

/// Every chat command as an HTTP route
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Distagram is running" }))
        .route(
            "/users/:user_id",
            post(register_user).delete(unregister_user),
        )
        .route("/users/:user_id/actions/:action", post(perform_action))
        .route("/users/:user_id/balance", get(get_balance))
        .route("/ledger/top", get(top_balances))
        .route("/admin/users/:user_id/balance", post(adjust_balance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
