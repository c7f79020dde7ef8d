use serde::{Deserialize, Serialize};

use super::commands::{self, SpliceCommand, SpliceInsert, TimeSignal};
use super::descriptors::{self, Descriptor};
use super::error::CueError;
use super::layout;
use super::reader::SpliceReader;

/// Decoded splice_info_section.
///
/// Fields are populated in wire order. On a decode failure everything read up
/// to that point is kept and `error` names what went wrong; non-fatal
/// oddities land in `warnings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_syntax_indicator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_indicator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_packet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_algorithm: Option<u8>,
    /// 90 kHz ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pts_adjustment: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cw_index: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_command_length: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_command_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splice_command: Option<SpliceCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor_loop_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptors: Vec<Descriptor>,
    /// Raw CRC-32 bytes, located but never verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc_32: Option<[u8; 4]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CueError>,
}

impl CueMessage {
    /// True when no stage recorded a fatal error.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub(crate) fn from_error(error: CueError) -> Self {
        CueMessage {
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Parse a splice_info_section from raw bytes.
///
/// Never panics on untrusted input: malformed buffers come back as a message
/// whose `error` field names the failure, with all fields read before it
/// preserved.
pub fn parse_splice_info_section(data: &[u8]) -> CueMessage {
    let mut msg = CueMessage::default();
    let mut warnings = Vec::new();
    if let Err(err) = parse_into(data, &mut msg, &mut warnings) {
        msg.error = Some(err);
    }
    msg.warnings = warnings;
    msg
}

fn parse_into(
    data: &[u8],
    msg: &mut CueMessage,
    warnings: &mut Vec<String>,
) -> Result<(), CueError> {
    let mut r = SpliceReader::new(data);

    let table_id = r.take_u8("table_id")?;
    msg.table_id = Some(table_id);
    if table_id != layout::TABLE_ID {
        return Err(CueError::Format {
            table_id,
            raw: data.to_vec(),
        });
    }

    let syntax = r.take_u16_be("section_length")?;
    msg.section_syntax_indicator = Some(syntax & 0x8000 != 0);
    msg.private_indicator = Some(syntax & 0x4000 != 0);
    msg.section_length = Some(syntax & 0x0FFF);

    let version_byte = r.take_u8("protocol_version")?;
    msg.protocol_version = Some(version_byte >> 5);
    msg.encrypted_packet = Some(version_byte & 0x10 != 0);
    msg.encryption_algorithm = Some(version_byte & 0x0F);

    msg.pts_adjustment = Some(r.take_pts("pts_adjustment")?);
    msg.cw_index = Some(r.take_u8("cw_index")?);
    msg.tier = Some(r.take_u16_be("tier")? & 0x0FFF);

    let command_length = r.take_u8("splice_command_length")?;
    msg.splice_command_length = Some(command_length);
    if command_length > 0 {
        decode_command(&mut r, command_length, msg, warnings)?;
    }

    let loop_length = r.take_u16_be("descriptor_loop_length")?;
    msg.descriptor_loop_length = Some(loop_length);
    let loop_end = r.position() + loop_length as usize;
    while r.position() + 2 <= loop_end {
        let descriptor = descriptors::decode_descriptor(&mut r, loop_end, warnings)?;
        msg.descriptors.push(descriptor);
    }
    if r.position() < loop_end {
        warnings.push(format!(
            "descriptor loop has {} trailing bytes",
            loop_end - r.position()
        ));
        r.seek(loop_end);
    }

    locate_crc(data, msg, warnings);
    Ok(())
}

fn decode_command(
    r: &mut SpliceReader<'_>,
    command_length: u8,
    msg: &mut CueMessage,
    warnings: &mut Vec<String>,
) -> Result<(), CueError> {
    let command_type = r.take_u8("splice_command_type")?;
    msg.splice_command_type = Some(command_type);
    let body_len = command_length as usize - 1;
    let command_end = r.position() + body_len;

    match command_type {
        layout::CMD_SPLICE_NULL => {
            msg.splice_command = Some(SpliceCommand::SpliceNull);
            r.seek(command_end);
        }
        layout::CMD_SPLICE_INSERT => {
            let mut insert = SpliceInsert::default();
            let result = commands::decode_splice_insert(r, command_end, &mut insert, warnings);
            msg.splice_command = Some(SpliceCommand::SpliceInsert(insert));
            result?;
        }
        layout::CMD_TIME_SIGNAL => {
            // Bytes between the splice_time and the declared command end are
            // left for the descriptor loop.
            let mut signal = TimeSignal::default();
            let result = commands::decode_time_signal(r, command_end, &mut signal, warnings);
            msg.splice_command = Some(SpliceCommand::TimeSignal(signal));
            result?;
        }
        layout::CMD_SPLICE_SCHEDULE => {
            let raw = r.take_slice(body_len, "splice_schedule")?.to_vec();
            msg.splice_command = Some(SpliceCommand::SpliceSchedule(raw));
        }
        layout::CMD_BANDWIDTH_RESERVATION => {
            let raw = r.take_slice(body_len, "bandwidth_reservation")?.to_vec();
            msg.splice_command = Some(SpliceCommand::BandwidthReservation(raw));
        }
        layout::CMD_PRIVATE => {
            let raw = r.take_slice(body_len, "private_command")?.to_vec();
            msg.splice_command = Some(SpliceCommand::PrivateCommand(raw));
        }
        _ => {
            let raw = r.take_slice(body_len, "splice_command")?.to_vec();
            msg.splice_command = Some(SpliceCommand::RawUnknown { command_type, raw });
        }
    }
    Ok(())
}

/// The CRC-32 trails the declared section: located and reported, never
/// computed or verified.
fn locate_crc(data: &[u8], msg: &mut CueMessage, warnings: &mut Vec<String>) {
    let Some(section_length) = msg.section_length else {
        return;
    };
    let section_end = layout::SECTION_HEADER_LEN + section_length as usize;
    if section_end >= layout::CRC_LEN && section_end <= data.len() {
        let crc = &data[section_end - layout::CRC_LEN..section_end];
        msg.crc_32 = Some([crc[0], crc[1], crc[2], crc[3]]);
    } else {
        warnings.push("CRC-32 not present in buffer".to_string());
    }
}
