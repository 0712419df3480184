//! Request and response payloads of the HTTP API that are not records
//! themselves.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationErrors};

/// Body of `PUT /api/stats/total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StatTotalUpdate {
    /// New absolute value for the collected commission.
    pub total_commission: f64,
}

/// `{ "message": ... }` acknowledgement returned by bulk and clear operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Build a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /api/healthz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
}

impl HealthResponse {
    /// The healthy response.
    pub fn ok() -> Self {
        Self {
            status: String::from("ok"),
        }
    }
}

/// A JSON array body whose every element must pass validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch<T>(pub Vec<T>);

impl<T> Batch<T> {
    /// Unwrap into the element vector.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: Validate> Validate for Batch<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        for item in &self.0 {
            item.validate()?;
        }
        Ok(())
    }
}
