//! Request body decoding.
//!
//! Bodies are read as raw bytes and decoded here so malformed JSON maps to
//! the shared error envelope instead of Actix's plain-text rejection.

use serde::de::DeserializeOwned;

use crate::domain::Error;

/// Decode a JSON request body.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body)
        .map_err(|error| Error::invalid_request(format!("Invalid JSON body: {error}")))
}
