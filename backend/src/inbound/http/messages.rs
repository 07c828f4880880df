//! Plain confirmation payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Human-readable confirmation returned by deletes and order writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "The beer was successfully deleted.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
