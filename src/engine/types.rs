use serde::{Deserialize, Serialize};

/// Request payload for registering a user
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub display_name: String,
}
