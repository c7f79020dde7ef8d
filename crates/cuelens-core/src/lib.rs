//! Core library for decoding SCTE-35 cue messages found in HLS manifests.
//!
//! The pipeline runs in four pure stages: [`extract_cue_payload`] locates the
//! encoded payload on a tag line, [`decode_payload`] turns the base64/hex
//! text into bytes, [`parse_splice_info_section`] decodes the binary
//! splice_info_section, and [`summarize`] renders the result as one
//! descriptive line. Failures are values: every stage reports malformed input
//! through the `error` field of the returned [`CueMessage`], and nothing
//! panics on untrusted bytes.
//!
//! Invariants:
//! - Every multi-byte read is bounds checked; truncated input names the field
//!   that could not be read and keeps everything decoded before it.
//! - 33-bit time values use the exact bit layouts observed in production
//!   streams.
//! - Decoding is synchronous and allocation-local; callers own all inputs and
//!   outputs outright, so concurrent decodes need no locking.
//!
//! # Examples
//! ```
//! use cuelens_core::decode_tag_line;
//!
//! let line = r#"#EXT-X-DATERANGE:ID="break",SCTE35-CMD=0xFC301000000000000000FFF00000004F253396"#;
//! let message = decode_tag_line(line).expect("cue payload present");
//! assert!(message.is_valid());
//! assert_eq!(message.table_id, Some(0xFC));
//! ```

use serde::{Deserialize, Serialize};

pub mod manifest;
pub mod splice;
pub mod summary;

pub use manifest::{Encoding, ExtractedPayload, PayloadError, decode_payload, extract_cue_payload};
pub use splice::{
    BreakDuration, CueError, CueMessage, Descriptor, DescriptorInfo, SegmentationDescriptor,
    SpliceCommand, SpliceInsert, SpliceTime, TimeSignal, parse_splice_info_section,
};
pub use summary::summarize;

/// One cue detected while scanning a manifest body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueRecord {
    /// 1-based line number in the scanned text.
    pub line: usize,
    pub encoding: Encoding,
    pub encoded: String,
    pub message: CueMessage,
    pub summary: String,
}

/// Decode the cue payload carried by a single manifest tag line.
///
/// Returns `None` when the line carries no recognized SCTE-35 attribute.
/// Undecodable payloads still return a message, with the failure recorded on
/// its `error` field.
pub fn decode_tag_line(line: &str) -> Option<CueMessage> {
    let payload = extract_cue_payload(line)?;
    Some(decode_extracted(&payload))
}

/// Scan every line of a manifest body for cue payloads.
///
/// Pure text-in/values-out: no I/O, no timeline bookkeeping. Lines that
/// carry a payload produce one record each, in document order.
pub fn scan_manifest(text: &str) -> Vec<CueRecord> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let Some(payload) = extract_cue_payload(line) else {
            continue;
        };
        let message = decode_extracted(&payload);
        let summary = summarize(&message);
        records.push(CueRecord {
            line: index + 1,
            encoding: payload.encoding,
            encoded: payload.encoded,
            message,
            summary,
        });
    }
    records
}

fn decode_extracted(payload: &ExtractedPayload) -> CueMessage {
    match decode_payload(&payload.encoded, payload.encoding) {
        Ok(bytes) => parse_splice_info_section(&bytes),
        Err(err) => CueMessage::from_error(CueError::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tag_line_ignores_plain_lines() {
        assert_eq!(decode_tag_line("#EXTINF:6.006,"), None);
    }

    #[test]
    fn decode_tag_line_reports_bad_payload_as_error() {
        let msg = decode_tag_line("#EXT-X-DATERANGE:SCTE35-OUT=0xFC3").unwrap();
        match msg.error {
            Some(CueError::Decode {
                encoding, ref text, ..
            }) => {
                assert_eq!(encoding, Encoding::Hex);
                assert_eq!(text, "FC3");
            }
            ref other => panic!("expected decode error, got {other:?}"),
        }
        assert!(summarize(&msg).starts_with("invalid cue:"));
    }

    #[test]
    fn message_json_omits_unread_fields() {
        let msg = parse_splice_info_section(&[0x47, 0x00]);
        let value = serde_json::to_value(&msg).expect("message json");
        assert_eq!(value["table_id"], 0x47);
        assert!(value.get("section_length").is_none());
        assert!(value.get("descriptors").is_none());
        assert!(value.get("warnings").is_none());
        assert_eq!(value["error"]["kind"], "format");
    }
}
