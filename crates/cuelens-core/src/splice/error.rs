use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::{Encoding, PayloadError};

/// Raised by [`super::reader::SpliceReader`] when a read runs past the end of
/// the buffer. Converted into [`CueError::Truncated`] at the section level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("{field} truncated: need {needed} bytes, got {remaining}")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
}

/// Decode failure carried on a [`super::parser::CueMessage`].
///
/// Unrecognized command or descriptor types are not errors; they are kept as
/// raw bytes on the message itself.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CueError {
    /// The extracted payload text was not valid base64/hex.
    #[error("payload is not valid {encoding}: {reason}")]
    Decode {
        encoding: Encoding,
        text: String,
        reason: String,
    },
    /// The buffer does not start with the SCTE-35 table id.
    #[error("not an SCTE-35 section: table_id 0x{table_id:02X}")]
    Format { table_id: u8, raw: Vec<u8> },
    /// The buffer ended before the named field could be read.
    #[error("section truncated at {field}: need {needed} bytes, got {remaining}")]
    Truncated {
        field: String,
        needed: usize,
        remaining: usize,
    },
}

impl From<SpliceError> for CueError {
    fn from(err: SpliceError) -> Self {
        match err {
            SpliceError::Truncated {
                field,
                needed,
                remaining,
            } => CueError::Truncated {
                field: field.to_string(),
                needed,
                remaining,
            },
        }
    }
}

impl From<PayloadError> for CueError {
    fn from(err: PayloadError) -> Self {
        CueError::Decode {
            encoding: err.encoding,
            text: err.text,
            reason: err.reason,
        }
    }
}
