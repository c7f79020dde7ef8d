use serde::{Deserialize, Serialize};

use super::error::SpliceError;
use super::layout;
use super::reader::SpliceReader;

/// Splice command carried by a cue message.
///
/// Only `splice_insert` and `time_signal` are decoded field by field; the
/// remaining kinds are preserved as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpliceCommand {
    SpliceNull,
    SpliceInsert(SpliceInsert),
    SpliceSchedule(Vec<u8>),
    TimeSignal(TimeSignal),
    BandwidthReservation(Vec<u8>),
    PrivateCommand(Vec<u8>),
    RawUnknown { command_type: u8, raw: Vec<u8> },
}

impl SpliceCommand {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SpliceCommand::SpliceNull => "splice_null",
            SpliceCommand::SpliceInsert(_) => "splice_insert",
            SpliceCommand::SpliceSchedule(_) => "splice_schedule",
            SpliceCommand::TimeSignal(_) => "time_signal",
            SpliceCommand::BandwidthReservation(_) => "bandwidth_reservation",
            SpliceCommand::PrivateCommand(_) => "private_command",
            SpliceCommand::RawUnknown { .. } => "unknown",
        }
    }
}

/// Maps a splice_command_type byte to its name.
pub fn command_type_name(command_type: u8) -> &'static str {
    match command_type {
        layout::CMD_SPLICE_NULL => "splice_null",
        layout::CMD_SPLICE_SCHEDULE => "splice_schedule",
        layout::CMD_SPLICE_INSERT => "splice_insert",
        layout::CMD_BANDWIDTH_RESERVATION => "bandwidth_reservation",
        layout::CMD_TIME_SIGNAL => "time_signal",
        layout::CMD_PRIVATE => "private_command",
        _ => "unknown",
    }
}

/// splice_time(): an optional 33-bit presentation time.
///
/// `pts_time` is `None` either because no time was specified or because the
/// PTS field itself could not be read; `specified` tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceTime {
    pub specified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pts_time: Option<u64>,
}

/// break_duration(): declared ad-break length in 90 kHz ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakDuration {
    pub auto_return: bool,
    pub duration: u64,
}

/// splice_insert (0x05): an ad insertion point.
///
/// Everything past the cancel indicator is only present when the event is
/// not cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceInsert {
    pub splice_event_id: u32,
    pub splice_event_cancel_indicator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_network_indicator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_splice_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_immediate_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_time: Option<SpliceTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<BreakDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_program_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avail_num: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avails_expected: Option<u8>,
}

/// time_signal: a single optional presentation time. Segmentation context
/// arrives through the descriptor loop, not the command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_time: Option<SpliceTime>,
}

/// Decode a splice_time() structure at the cursor.
///
/// A PTS field that is flagged as present but cut short yields
/// `specified: true` with no value instead of aborting the caller; the rest
/// of the buffer is consumed since nothing after it can be framed.
pub(crate) fn decode_splice_time(
    r: &mut SpliceReader<'_>,
    warnings: &mut Vec<String>,
) -> Result<SpliceTime, SpliceError> {
    let flags = r.peek_u8("splice_time")?;
    if flags & 0x80 == 0 {
        r.seek(r.position() + 1);
        return Ok(SpliceTime {
            specified: false,
            pts_time: None,
        });
    }
    match r.take_pts("pts_time") {
        Ok(pts) => Ok(SpliceTime {
            specified: true,
            pts_time: Some(pts),
        }),
        Err(err) => {
            warnings.push(err.to_string());
            r.seek(r.position() + r.remaining());
            Ok(SpliceTime {
                specified: true,
                pts_time: None,
            })
        }
    }
}

/// Decode a splice_insert() command body into `insert`.
///
/// Fields are written as they are read so a truncated command keeps
/// everything decoded before the cut.
pub(crate) fn decode_splice_insert(
    r: &mut SpliceReader<'_>,
    command_end: usize,
    insert: &mut SpliceInsert,
    warnings: &mut Vec<String>,
) -> Result<(), SpliceError> {
    insert.splice_event_id = r.take_u32_be("splice_event_id")?;
    let cancel = r.take_u8("splice_event_cancel_indicator")? & 0x80 != 0;
    insert.splice_event_cancel_indicator = cancel;
    if cancel {
        return Ok(());
    }

    let flags = r.take_u8("splice_insert flags")?;
    let program_splice = flags & 0x40 != 0;
    let duration_flag = flags & 0x20 != 0;
    let immediate = flags & 0x10 != 0;
    insert.out_of_network_indicator = Some(flags & 0x80 != 0);
    insert.program_splice_flag = Some(program_splice);
    insert.duration_flag = Some(duration_flag);
    insert.splice_immediate_flag = Some(immediate);

    if !program_splice && !immediate {
        // Component-mode insert: skipped wholesale, not decoded per field.
        warnings.push(format!(
            "splice_insert event {}: component mode not decoded",
            insert.splice_event_id
        ));
        r.seek(command_end);
        return Ok(());
    }
    if program_splice && !immediate {
        insert.splice_time = Some(decode_splice_time(r, warnings)?);
    }
    if duration_flag {
        let (auto_return, duration) = r.take_duration("break_duration")?;
        insert.break_duration = Some(BreakDuration {
            auto_return,
            duration,
        });
    }
    insert.unique_program_id = Some(r.take_u16_be("unique_program_id")?);
    insert.avail_num = Some(r.take_u8("avail_num")?);
    insert.avails_expected = Some(r.take_u8("avails_expected")?);
    Ok(())
}

/// Decode a time_signal() command body into `signal`.
///
/// Bytes between the splice_time and the command's declared end are left for
/// the descriptor loop.
pub(crate) fn decode_time_signal(
    r: &mut SpliceReader<'_>,
    command_end: usize,
    signal: &mut TimeSignal,
    warnings: &mut Vec<String>,
) -> Result<(), SpliceError> {
    if r.position() >= command_end {
        return Ok(());
    }
    signal.splice_time = Some(decode_splice_time(r, warnings)?);
    Ok(())
}
