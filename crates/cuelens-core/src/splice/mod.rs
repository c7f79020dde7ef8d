//! SCTE-35 splice_info_section decoding.
//!
//! The decoder follows a layered structure: wire constants in `layout`, safe
//! cursor reads in `reader`, domain decoding in `commands`, `descriptors` and
//! `parser`, explicit errors in `error`. Parsing is pure and total: malformed
//! input becomes an error value on the returned message, never a panic.
//!
//! The 33-bit time layouts in `reader` reproduce what production streams
//! carry, which differs from the generic MPEG-TS PTS encoding in the marker
//! bit positions; do not "fix" them without fixtures to prove it.

pub mod commands;
pub mod descriptors;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use commands::{BreakDuration, SpliceCommand, SpliceInsert, SpliceTime, TimeSignal};
pub use descriptors::{Descriptor, DescriptorInfo, SegmentationDescriptor};
pub use error::CueError;
pub use parser::{CueMessage, parse_splice_info_section};
