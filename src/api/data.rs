use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{INVALID_JSON, KEY_NOT_FOUND, KEY_REQUIRED, MISSING_FIELDS};
use crate::api::{ApiError, KeyValue, StatusResponse};
use crate::service::DataService;

/// Single entry returned by `GET /api/data/{key}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
}

/// Decode a `POST /api/data` body regardless of its content type.
///
/// A JSON `null` decodes as an empty pair.
pub fn parse_key_value(body: &[u8]) -> Result<KeyValue, ApiError> {
    serde_json::from_slice::<Option<KeyValue>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            debug!("rejecting body: {}", e);
            ApiError::BadRequest(INVALID_JSON.to_string())
        })
}

/// POST /api/data
pub async fn save(
    State(service): State<Arc<DataService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let kv = parse_key_value(&body)?;

    if kv.key.is_empty() || kv.value.is_empty() {
        return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
    }

    info!(key = %kv.key, "save");
    service.save(kv.key.clone(), kv.value);
    Ok((StatusCode::CREATED, Json(StatusResponse::created(kv.key))))
}

/// GET /api/data
pub async fn list(State(service): State<Arc<DataService>>) -> Json<HashMap<String, String>> {
    Json(service.get_all())
}

/// GET /api/data/{key}
pub async fn get(
    State(service): State<Arc<DataService>>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>, ApiError> {
    match service.get(&key) {
        Some(value) => Ok(Json(EntryResponse { key, value })),
        None => Err(ApiError::NotFound(KEY_NOT_FOUND.to_string())),
    }
}

/// DELETE /api/data/{key}
pub async fn delete(
    State(service): State<Arc<DataService>>,
    Path(key): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    if !service.delete(&key) {
        return Err(ApiError::NotFound(KEY_NOT_FOUND.to_string()));
    }

    info!(key = %key, "delete");
    Ok(Json(StatusResponse::deleted(key)))
}

/// GET or DELETE /api/data/ with no key segment
pub async fn missing_key() -> ApiError {
    ApiError::BadRequest(KEY_REQUIRED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_whitespace_and_extra_fields() {
        let kv = parse_key_value(br#" {"key":"a","value":"1","ttl":5} "#).unwrap();
        assert_eq!(kv.key, "a");
        assert_eq!(kv.value, "1");
    }

    #[test]
    fn test_parse_null_is_empty_pair() {
        assert_eq!(parse_key_value(b"null").unwrap(), KeyValue::default());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bodies: [&[u8]; 4] = [b"", b"{not json", b"\"just a string\"", br#"{"key":1}"#];
        for body in bodies {
            assert_eq!(
                parse_key_value(body),
                Err(ApiError::BadRequest(INVALID_JSON.to_string()))
            );
        }
    }
}
