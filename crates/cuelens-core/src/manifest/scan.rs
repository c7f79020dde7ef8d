use std::fmt;

use serde::{Deserialize, Serialize};

/// Text encoding of an extracted cue payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Base64,
    Hex,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        })
    }
}

/// Cue payload located in a manifest tag line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPayload {
    pub encoded: String,
    pub encoding: Encoding,
}

const QUOTED_BASE64_ATTR: &str = "SCTE35=\"";
const HEX_ATTRS: [&str; 3] = ["SCTE35-OUT=", "SCTE35-IN=", "SCTE35-CMD="];
const CUE_TAGS: [&str; 3] = ["#EXT-X-CUE-OUT:", "#EXT-X-CUE-IN:", "#EXT-X-CUE:"];

/// Locate an encoded SCTE-35 payload in one manifest tag line.
///
/// Checked in priority order: a quoted `SCTE35="…"` attribute (base64), the
/// `SCTE35-OUT/-IN/-CMD=0x…` attributes (hex), then the `#EXT-X-CUE*` tag
/// forms carrying a bare base64 token. Lines with no recognized pattern yield
/// `None`; this never fails.
pub fn extract_cue_payload(line: &str) -> Option<ExtractedPayload> {
    if let Some(start) = line.find(QUOTED_BASE64_ATTR) {
        let rest = &line[start + QUOTED_BASE64_ATTR.len()..];
        if let Some(end) = rest.find('"') {
            let encoded = &rest[..end];
            if !encoded.is_empty() {
                return Some(ExtractedPayload {
                    encoded: encoded.to_string(),
                    encoding: Encoding::Base64,
                });
            }
        }
    }

    for attr in HEX_ATTRS {
        let Some(start) = line.find(attr) else {
            continue;
        };
        let rest = &line[start + attr.len()..];
        let Some(digits) = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
        else {
            continue;
        };
        let len = digits
            .bytes()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        if len > 0 {
            return Some(ExtractedPayload {
                encoded: digits[..len].to_string(),
                encoding: Encoding::Hex,
            });
        }
    }

    for tag in CUE_TAGS {
        let Some(rest) = line.strip_prefix(tag) else {
            continue;
        };
        let len = rest.bytes().take_while(|b| is_base64_byte(*b)).count();
        if len > 0 {
            return Some(ExtractedPayload {
                encoded: rest[..len].to_string(),
                encoding: Encoding::Base64,
            });
        }
    }

    None
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_out_tag_with_base64_token() {
        let found = extract_cue_payload("#EXT-X-CUE-OUT:AAAAAAAAAAAAAAAA").unwrap();
        assert_eq!(found.encoded, "AAAAAAAAAAAAAAAA");
        assert_eq!(found.encoding, Encoding::Base64);
    }

    #[test]
    fn daterange_hex_attribute() {
        let line = r#"#EXT-X-DATERANGE:ID="splice-1",START-DATE="2024-03-01T08:00:00Z",SCTE35-OUT=0xFC302500FF"#;
        let found = extract_cue_payload(line).unwrap();
        assert_eq!(found.encoded, "FC302500FF");
        assert_eq!(found.encoding, Encoding::Hex);
    }

    #[test]
    fn hex_attribute_stops_at_non_hex() {
        let line = "#EXT-X-DATERANGE:SCTE35-CMD=0xFC30,PLANNED-DURATION=30.0";
        let found = extract_cue_payload(line).unwrap();
        assert_eq!(found.encoded, "FC30");
    }

    #[test]
    fn quoted_attribute_wins_over_tag_prefix() {
        let line = r#"#EXT-X-CUE-OUT:SCTE35="L0FCQw==""#;
        let found = extract_cue_payload(line).unwrap();
        assert_eq!(found.encoded, "L0FCQw==");
        assert_eq!(found.encoding, Encoding::Base64);
    }

    #[test]
    fn unrecognized_lines_yield_none() {
        assert_eq!(extract_cue_payload("#EXTINF:6.006,"), None);
        assert_eq!(extract_cue_payload("segment-001.ts"), None);
        assert_eq!(extract_cue_payload(""), None);
        // Attribute present but empty or malformed.
        assert_eq!(extract_cue_payload(r#"#EXT-X-DATERANGE:SCTE35="""#), None);
        assert_eq!(extract_cue_payload("#EXT-X-DATERANGE:SCTE35-OUT=FC30"), None);
        assert_eq!(extract_cue_payload("#EXT-X-CUE-OUT:"), None);
    }

    #[test]
    fn cue_in_tag_is_recognized() {
        let found = extract_cue_payload("#EXT-X-CUE-IN:/DAlAAAA+ABC=").unwrap();
        assert_eq!(found.encoded, "/DAlAAAA+ABC=");
        assert_eq!(found.encoding, Encoding::Base64);
    }
}
