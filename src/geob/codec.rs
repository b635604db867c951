//! Delimited record codec and transport encoding for the binary channel
//!
//! A serialized record is `mime NUL file_name NUL description NUL payload`.
//! The three leading text fields are Latin-1 (single-byte encoding, so the
//! delimiter is a single zero byte); the payload is arbitrary bytes and may
//! itself contain zero bytes. For transport through string-typed APIs the
//! whole byte sequence is base64-encoded.

use crate::error::{Result, TagbridgeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Safe as a one-byte delimiter because the text fields are single-byte
/// encoded and cannot contain a zero
const DELIMITER: u8 = 0;

/// A named binary blob carried inside a GEOB frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeobRecord {
    pub mime_type: String,
    pub file_name: String,
    pub description: String,
    pub payload: Vec<u8>,
}

/// Serialize a record into the delimited byte layout
pub fn encode_record(record: &GeobRecord) -> Result<Vec<u8>> {
    let mime = latin1_bytes(&record.mime_type)?;
    let file_name = latin1_bytes(&record.file_name)?;
    let description = latin1_bytes(&record.description)?;

    let mut out =
        Vec::with_capacity(mime.len() + file_name.len() + description.len() + record.payload.len() + 3);
    out.extend_from_slice(&mime);
    out.push(DELIMITER);
    out.extend_from_slice(&file_name);
    out.push(DELIMITER);
    out.extend_from_slice(&description);
    out.push(DELIMITER);
    out.extend_from_slice(&record.payload);
    Ok(out)
}

/// Parse the delimited byte layout back into a record.
///
/// Scans forward for each of the three delimiters in turn; a missing
/// delimiter is a typed failure, never a silently empty field. Everything
/// after the third delimiter is the raw payload.
pub fn decode_record(bytes: &[u8]) -> Result<GeobRecord> {
    let mut cursor = FieldCursor::new(bytes);

    let mime_type = latin1_string(cursor.take_field("mime type")?);
    let file_name = latin1_string(cursor.take_field("file name")?);
    let description = latin1_string(cursor.take_field("description")?);
    let payload = cursor.remainder().to_vec();

    Ok(GeobRecord {
        mime_type,
        file_name,
        description,
        payload,
    })
}

/// Base64-encode a serialized record for string-typed transport
pub fn to_transport(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode the transport form back into raw bytes
pub fn from_transport(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| TagbridgeError::malformed_record(format!("invalid base64 transport: {e}")))
}

/// Forward-scanning parser over the delimited layout
struct FieldCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take_field(&mut self, name: &'static str) -> Result<&'a [u8]> {
        let rest = &self.bytes[self.pos..];
        let end = rest.iter().position(|&b| b == DELIMITER).ok_or_else(|| {
            TagbridgeError::malformed_record(format!("missing delimiter after {name} field"))
        })?;

        self.pos += end + 1;
        Ok(&rest[..end])
    }

    fn remainder(self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

fn latin1_bytes(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                TagbridgeError::malformed_record(format!(
                    "character '{c}' is not representable in the single-byte text encoding"
                ))
            })
        })
        .collect()
}

fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> GeobRecord {
        GeobRecord {
            mime_type: "application/octet-stream".into(),
            file_name: "blob.bin".into(),
            description: "waveform".into(),
            payload: vec![0x00, 0x01, 0xFF, 0x00, 0x7F],
        }
    }

    #[test]
    fn record_round_trips() {
        let record = sample_record();
        let bytes = encode_record(&record).expect("encodes");
        assert_eq!(decode_record(&bytes).expect("decodes"), record);
    }

    #[test]
    fn transport_round_trips() {
        let record = sample_record();
        let bytes = encode_record(&record).expect("encodes");
        let text = to_transport(&bytes);
        assert_eq!(from_transport(&text).expect("decodes"), bytes);
    }

    #[test]
    fn payload_may_contain_delimiter_bytes() {
        let record = GeobRecord {
            mime_type: "text/plain".into(),
            file_name: String::new(),
            description: "zeros".into(),
            payload: vec![0, 0, 0, 1],
        };
        let decoded = decode_record(&encode_record(&record).expect("encodes")).expect("decodes");
        assert_eq!(decoded.payload, vec![0, 0, 0, 1]);
    }

    #[test]
    fn missing_delimiter_is_a_typed_failure() {
        // Only two delimiters: description field is never terminated.
        let bytes = b"mime\0name\0desc-without-end".to_vec();
        let err = decode_record(&bytes).expect_err("must fail");
        assert!(matches!(err, TagbridgeError::MalformedRecord(_)));
    }

    #[test]
    fn empty_text_fields_are_allowed() {
        let record = GeobRecord {
            mime_type: String::new(),
            file_name: String::new(),
            description: String::new(),
            payload: b"data".to_vec(),
        };
        let decoded = decode_record(&encode_record(&record).expect("encodes")).expect("decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn non_latin1_text_is_rejected() {
        let record = GeobRecord {
            mime_type: "text/plain".into(),
            file_name: "日本語.txt".into(),
            description: "d".into(),
            payload: vec![],
        };
        assert!(matches!(
            encode_record(&record),
            Err(TagbridgeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn latin1_supplement_characters_round_trip() {
        let record = GeobRecord {
            mime_type: "text/plain".into(),
            file_name: "naïve.txt".into(),
            description: "résumé".into(),
            payload: vec![1, 2, 3],
        };
        let decoded = decode_record(&encode_record(&record).expect("encodes")).expect("decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn bad_transport_text_is_rejected() {
        assert!(matches!(
            from_transport("not-valid-base64!!!"),
            Err(TagbridgeError::MalformedRecord(_))
        ));
    }
}
