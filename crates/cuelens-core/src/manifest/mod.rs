//! Manifest-side cue handling: locating an encoded SCTE-35 payload in an HLS
//! tag line and decoding it into section bytes.
//!
//! Scanning never fails (unrecognized lines yield `None`); decoding reports
//! malformed base64/hex through [`PayloadError`] with the offending text
//! attached for diagnostics.

pub mod codec;
pub mod scan;

pub use codec::{PayloadError, decode_payload};
pub use scan::{Encoding, ExtractedPayload, extract_cue_payload};
