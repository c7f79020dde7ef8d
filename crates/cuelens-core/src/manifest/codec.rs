use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

use super::scan::Encoding;

/// Standard-alphabet engine that accepts payloads with or without padding;
/// manifests carry both forms.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Failure to turn an extracted payload into bytes. Carries the offending
/// text for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {encoding} payload: {reason}")]
pub struct PayloadError {
    pub encoding: Encoding,
    pub text: String,
    pub reason: String,
}

/// Decode an extracted payload into raw section bytes.
///
/// Base64 uses the standard alphabet; hex is case-insensitive and must have
/// even length.
pub fn decode_payload(encoded: &str, encoding: Encoding) -> Result<Vec<u8>, PayloadError> {
    let text = encoded.trim();
    match encoding {
        Encoding::Base64 => BASE64.decode(text).map_err(|err| PayloadError {
            encoding,
            text: encoded.to_string(),
            reason: err.to_string(),
        }),
        Encoding::Hex => hex::decode(text).map_err(|err| PayloadError {
            encoding,
            text: encoded.to_string(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let encoded = hex::encode(&bytes);
        assert_eq!(decode_payload(&encoded, Encoding::Hex).unwrap(), bytes);
    }

    #[test]
    fn hex_is_case_insensitive() {
        assert_eq!(
            decode_payload("fc30AB", Encoding::Hex).unwrap(),
            vec![0xFC, 0x30, 0xAB]
        );
    }

    #[test]
    fn odd_length_hex_is_an_error() {
        let err = decode_payload("FC3", Encoding::Hex).unwrap_err();
        assert_eq!(err.encoding, Encoding::Hex);
        assert_eq!(err.text, "FC3");
    }

    #[test]
    fn base64_with_and_without_padding() {
        assert_eq!(
            decode_payload("/DA=", Encoding::Base64).unwrap(),
            vec![0xFC, 0x30]
        );
        assert_eq!(
            decode_payload("/DA", Encoding::Base64).unwrap(),
            vec![0xFC, 0x30]
        );
    }

    #[test]
    fn invalid_base64_alphabet_is_an_error() {
        let err = decode_payload("not base64!", Encoding::Base64).unwrap_err();
        assert_eq!(err.encoding, Encoding::Base64);
        assert!(err.to_string().contains("base64"));
    }
}
