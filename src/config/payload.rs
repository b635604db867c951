//! Host-boundary payload validation
//!
//! The core only ever sees already-validated typed inputs; the loose JSON
//! shapes callers hand over are coerced and checked here, before any file
//! I/O. A string where an array is expected is accepted as a one-element
//! array, matching how callers of the original binding pass single values.

use crate::error::{Result, TagbridgeError};
use crate::store::{PropertyKey, PropertyStore};
use crate::types::ChannelMap;
use serde_json::Value;

/// Parse a write-tags payload: a JSON object mapping keys to a string or an
/// array of strings. An empty array survives as an explicit "delete" marker.
pub fn parse_property_payload(raw: &str) -> Result<PropertyStore> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TagbridgeError::invalid_argument(format!("payload is not valid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(TagbridgeError::invalid_argument(
            "properties payload must be a JSON object",
        ));
    };

    let mut store = PropertyStore::new();
    for (raw_key, value) in object {
        let key = PropertyKey::new(&raw_key)?;
        let values = match value {
            Value::String(single) => vec![single],
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(TagbridgeError::invalid_argument(format!(
                        "values for '{key}' must be strings, got {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(TagbridgeError::invalid_argument(format!(
                    "value for '{key}' must be a string or an array of strings, got {other}"
                )));
            }
        };
        store.set(key, values);
    }

    Ok(store)
}

/// Parse a binary-channel payload: a JSON object mapping descriptions to
/// base64 strings (empty string = delete)
pub fn parse_channel_payload(raw: &str) -> Result<ChannelMap> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TagbridgeError::invalid_argument(format!("payload is not valid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(TagbridgeError::invalid_argument(
            "channel payload must be a JSON object",
        ));
    };

    let mut entries = ChannelMap::new();
    for (description, value) in object {
        let Value::String(text) = value else {
            return Err(TagbridgeError::invalid_argument(format!(
                "value for '{description}' must be a string"
            )));
        };
        entries.insert(description, text);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arrays_and_single_strings() {
        let store =
            parse_property_payload(r#"{"artist": ["A", "B"], "title": "T"}"#).expect("valid");

        let artist = PropertyKey::new("ARTIST").expect("key");
        let title = PropertyKey::new("TITLE").expect("key");
        assert_eq!(store.get(&artist).map(<[String]>::len), Some(2));
        assert_eq!(store.get(&title), Some(&["T".to_string()][..]));
    }

    #[test]
    fn keeps_empty_array_as_delete_marker() {
        let store = parse_property_payload(r#"{"artist": []}"#).expect("valid");
        let artist = PropertyKey::new("ARTIST").expect("key");
        assert_eq!(store.get(&artist), Some(&[][..]));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(matches!(
            parse_property_payload(r#"["not", "an", "object"]"#),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(matches!(
            parse_property_payload(r#"{"year": 1999}"#),
            Err(TagbridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_property_payload(r#"{"artist": ["A", 2]}"#),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_property_payload("{not json"),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn parses_channel_entries() {
        let entries =
            parse_channel_payload(r#"{"waveform": "AAEC", "stale": ""}"#).expect("valid");
        assert_eq!(entries.get("waveform").map(String::as_str), Some("AAEC"));
        assert_eq!(entries.get("stale").map(String::as_str), Some(""));
    }

    #[test]
    fn rejects_non_string_channel_values() {
        assert!(matches!(
            parse_channel_payload(r#"{"waveform": 3}"#),
            Err(TagbridgeError::InvalidArgument(_))
        ));
    }
}
