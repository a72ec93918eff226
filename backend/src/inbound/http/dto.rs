//! Response bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain acknowledgement, e.g. `{"message":"Mood saved successfully"}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
