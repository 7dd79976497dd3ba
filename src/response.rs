//! Bridge reply decoding.
//!
//! Mutating calls and failed reads answer with an array of single-key
//! objects, each either `{"success": {...}}` or
//! `{"error": {"type": .., "address": .., "description": ..}}`.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// One attribute the bridge confirmed it changed, e.g.
/// `/lights/1/state/on = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub address: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReplyEntry {
    Success(Map<String, Value>),
    Error(ApiError),
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    code: u16,
    address: String,
    description: String,
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Error::Api {
            code: e.code,
            address: e.address,
            description: e.description,
        }
    }
}

/// Decode a reply array, failing on the first error entry.
///
/// Returns the merged contents of every success entry.
pub(crate) fn decode_reply(body: &[u8]) -> Result<Vec<Map<String, Value>>> {
    let entries: Vec<ReplyEntry> = serde_json::from_slice(body).map_err(Error::JsonLoad)?;
    if entries.is_empty() {
        return Err(Error::MalformedResponse("empty reply array".into()));
    }
    entries
        .into_iter()
        .map(|entry| match entry {
            ReplyEntry::Success(map) => Ok(map),
            ReplyEntry::Error(e) => Err(e.into()),
        })
        .collect()
}

/// Decode the reply to a state change into the list of applied attributes.
pub(crate) fn decode_applied(body: &[u8]) -> Result<Vec<Applied>> {
    Ok(decode_reply(body)?
        .into_iter()
        .flatten()
        .map(|(address, value)| Applied { address, value })
        .collect())
}

/// A read that got an error array back instead of the resource.
///
/// Returns `Ok(())` when `body` is not an array, letting the caller decode it
/// as the resource it asked for.
pub(crate) fn check_read(body: &[u8]) -> Result<()> {
    if body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[') {
        decode_reply(body)?;
        return Err(Error::MalformedResponse(
            "expected an object, got a reply array".into(),
        ));
    }
    Ok(())
}

/// Pull the username out of a registration reply.
pub(crate) fn decode_username(body: &[u8]) -> Result<String> {
    decode_reply(body)?
        .iter()
        .find_map(|success| success.get("username").and_then(Value::as_str))
        .map(String::from)
        .ok_or_else(|| Error::MalformedResponse("registration reply has no username".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_applied_attributes() {
        let body = br#"[
            {"success": {"/lights/1/state/on": true}},
            {"success": {"/lights/1/state/xy": [0.7006, 0.2993]}}
        ]"#;
        let applied = decode_applied(body).unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].address, "/lights/1/state/on");
        assert_eq!(applied[0].value, json!(true));
    }

    #[test]
    fn test_error_entry_wins() {
        let body = br#"[
            {"success": {"/lights/1/state/on": true}},
            {"error": {"type": 201, "address": "/lights/1/state/bri",
                       "description": "parameter, bri, is not modifiable. Device is set to off."}}
        ]"#;
        let err = decode_applied(body).unwrap_err();
        assert!(matches!(err, Error::Api { code: 201, .. }));
    }

    #[test]
    fn test_username() {
        let body = br#"[{"success": {"username": "83b7780291a6ceffbe0bd049104df"}}]"#;
        assert_eq!(decode_username(body).unwrap(), "83b7780291a6ceffbe0bd049104df");

        let body = br#"[{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]"#;
        assert_eq!(
            decode_username(body).unwrap_err(),
            Error::Api {
                code: 101,
                address: "".into(),
                description: "link button not pressed".into()
            }
        );

        assert!(matches!(
            decode_username(br#"[{"success": {}}]"#),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_check_read() {
        assert!(check_read(br#"{"1": {}}"#).is_ok());

        let unauthorized = br#" [{"error": {"type": 1, "address": "/", "description": "unauthorized user"}}]"#;
        assert!(matches!(
            check_read(unauthorized),
            Err(Error::Api { code: 1, .. })
        ));
    }

    #[test]
    fn test_garbage() {
        assert!(matches!(decode_reply(b"[]"), Err(Error::MalformedResponse(_))));
        assert!(matches!(decode_reply(b"<html>"), Err(Error::JsonLoad(_))));
        assert!(matches!(
            decode_reply(br#"[{"neither": 1}]"#),
            Err(Error::JsonLoad(_))
        ));
    }
}
