use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::cooldown::remaining_secs;
use crate::engine::{ActionEngine, ActionError, Rejection};
use crate::ledger::LedgerService;
use crate::user::StorageError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ActionEngine>,
    pub ledger: Arc<LedgerService>,
    pub ranking_limit: usize,
}

impl AppState {
    pub fn new(
        engine: Arc<ActionEngine>,
        ledger: Arc<LedgerService>,
        ranking_limit: usize,
    ) -> Self {
        Self {
            engine,
            ledger,
            ranking_limit,
        }
    }
}

/// Who gets to see a reply on the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the invoking user
    Ephemeral,
    Public,
}

/// Envelope for every successful command reply
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandReply<T> {
    pub visibility: Visibility,
    pub message: String,
    pub data: T,
}

impl<T> CommandReply<T> {
    pub fn public(message: impl Into<String>, data: T) -> Self {
        Self {
            visibility: Visibility::Public,
            message: message.into(),
            data,
        }
    }

    pub fn ephemeral(message: impl Into<String>, data: T) -> Self {
        Self {
            visibility: Visibility::Ephemeral,
            message: message.into(),
            data,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Rejected(Rejection),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Rejected(rejection) => AppError::Rejected(rejection),
            ActionError::Storage(storage) => AppError::Storage(storage),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Failures are always shown only to the invoker
        let (status, body) = match self {
            AppError::Rejected(rejection) => {
                let status = match &rejection {
                    Rejection::NotRegistered => StatusCode::NOT_FOUND,
                    Rejection::AlreadyRegistered => StatusCode::CONFLICT,
                    Rejection::CounterOverflow => StatusCode::UNPROCESSABLE_ENTITY,
                    Rejection::OnCooldown { .. } | Rejection::AlreadyCheckedIn { .. } => {
                        StatusCode::TOO_MANY_REQUESTS
                    }
                };
                let body = json!({
                    "error": rejection.to_string(),
                    "reason": rejection.reason(),
                    "remaining_secs": rejection.remaining().map(remaining_secs),
                    "visibility": Visibility::Ephemeral,
                });
                (status, body)
            }
            AppError::Storage(err) => {
                error!(error = %err, "Storage failure surfaced to caller");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Something went wrong while saving. Nothing was changed.",
                        "reason": "storage_error",
                        "visibility": Visibility::Ephemeral,
                    }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": msg,
                    "reason": "bad_request",
                    "visibility": Visibility::Ephemeral,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
