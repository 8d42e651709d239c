//! JSON API over [`DataService`](crate::service::DataService)
//!
//! Request bodies are validated here, before the service is reached, so a
//! rejected request is never counted.

pub mod data;
pub mod error;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Body of `POST /api/data`
///
/// Missing fields decode as empty strings and are rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KeyValue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Acknowledgement for a mutation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub key: String,
}

impl StatusResponse {
    pub fn created(key: impl Into<String>) -> Self {
        Self {
            status: "created".to_string(),
            key: key.into(),
        }
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        Self {
            status: "deleted".to_string(),
            key: key.into(),
        }
    }
}
