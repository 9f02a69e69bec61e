//! The vendor's JSON envelope.
//!
//! Every endpoint answers with the same outer shape:
//!
//! ```json
//! { "code": 200, "data": { ... } }
//! { "code": 401, "error": { "message": "...", "type": "unauthorized" } }
//! ```
//!
//! `data` is kept as a raw [`serde_json::Value`] so callers can map it onto
//! their own structs per endpoint; the vendor's surface is too wide to type
//! out in full.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// A parsed response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    /// Status code reported inside the body (0 when absent).
    #[serde(default)]
    pub code: u16,

    /// Endpoint payload, `Null` when the envelope carries none.
    #[serde(default)]
    pub data: Value,

    /// Error object, present on failure envelopes.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,

    /// HTTP status observed on the wire. Not part of the JSON; filled in
    /// by the client after the body is read.
    #[serde(skip)]
    pub status: u16,
}

/// The `error` object of a failure envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable description.
    #[serde(default)]
    pub message: String,

    /// Machine-readable category, e.g. `unauthorized`.
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl ApiResponse {
    /// Decode a raw body into an envelope. An envelope carrying an `error`
    /// object still parses; the client layer decides what to do with it.
    pub fn parse(raw: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(raw).map_err(Error::from)
    }

    /// `type: message` when the envelope carries an error, `None` otherwise.
    pub fn error_message(&self) -> Option<String> {
        let err = self.error.as_ref()?;
        if err.message.is_empty() && err.kind.is_empty() {
            return None;
        }
        if err.kind.is_empty() {
            return Some(err.message.clone());
        }
        Some(format!("{}: {}", err.kind, err.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_envelope() {
        let raw = br#"{"code":200,"data":{"zone":{"id":12345,"name":"assets"}}}"#;
        let envelope = ApiResponse::parse(raw).unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.data["zone"]["id"], 12345);
        assert!(envelope.error.is_none());
        assert!(envelope.error_message().is_none());
    }

    #[test]
    fn parses_error_envelope() {
        let raw = br#"{"code":401,"error":{"message":"invalid signature","type":"unauthorized"}}"#;
        let envelope = ApiResponse::parse(raw).unwrap();
        assert_eq!(envelope.code, 401);
        assert_eq!(
            envelope.error_message().as_deref(),
            Some("unauthorized: invalid signature")
        );
    }

    #[test]
    fn missing_fields_default() {
        let envelope = ApiResponse::parse(b"{}").unwrap();
        assert_eq!(envelope.code, 0);
        assert!(envelope.data.is_null());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = br#"{"code":200,"data":null,"meta":{"page":1}}"#;
        assert!(ApiResponse::parse(raw).is_ok());
    }

    #[test]
    fn error_without_kind_keeps_message_bare() {
        let raw = br#"{"code":500,"error":{"message":"boom"}}"#;
        let envelope = ApiResponse::parse(raw).unwrap();
        assert_eq!(envelope.error_message().as_deref(), Some("boom"));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        assert!(matches!(
            ApiResponse::parse(b"<html>504</html>"),
            Err(Error::Parse(_))
        ));
    }
}
