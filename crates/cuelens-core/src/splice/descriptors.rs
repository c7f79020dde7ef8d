use serde::{Deserialize, Serialize};

use super::error::SpliceError;
use super::layout;
use super::reader::SpliceReader;

/// One entry of the descriptor loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub tag: u8,
    pub tag_name: String,
    pub length: u8,
    pub info: DescriptorInfo,
}

/// Decoded descriptor content; only the segmentation descriptor is
/// understood, everything else keeps its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorInfo {
    Segmentation(SegmentationDescriptor),
    RawUnknown(Vec<u8>),
}

/// segmentation_descriptor() (tag 0x02).
///
/// Fields past the cancel indicator are only present when the event is not
/// cancelled. `is_ad_start`/`is_ad_end` are derived from `type_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationDescriptor {
    /// Four-byte identifier, ASCII when printable ("CUEI"), hex otherwise.
    pub identifier: String,
    pub event_id: u32,
    pub cancel_indicator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_segmentation_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation_duration_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_not_restricted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_delivery_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_regional_blackout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_restrictions: Option<u8>,
    /// 90 kHz ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upid_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upid_length: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upid: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_num: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_expected: Option<u8>,
    pub is_ad_start: bool,
    pub is_ad_end: bool,
}

/// Maps a descriptor tag to its name.
pub fn descriptor_tag_name(tag: u8) -> String {
    match tag {
        layout::TAG_AVAIL => "avail_descriptor".to_string(),
        layout::TAG_DTMF => "dtmf_descriptor".to_string(),
        layout::TAG_SEGMENTATION => "segmentation_descriptor".to_string(),
        layout::TAG_TIME => "time_descriptor".to_string(),
        layout::TAG_AUDIO => "audio_descriptor".to_string(),
        _ => format!("Unknown (0x{tag:02X})"),
    }
}

/// Maps a segmentation_type_id to its name.
pub fn segmentation_type_name(type_id: u8) -> String {
    let known = match type_id {
        0x00 => "Not Indicated",
        0x01 => "Content Identification",
        0x10 => "Program Start",
        0x11 => "Program End",
        0x12 => "Program Early Termination",
        0x13 => "Program Breakaway",
        0x14 => "Program Resumption",
        0x15 => "Program Runover Planned",
        0x16 => "Program Runover Unplanned",
        0x17 => "Program Overlap Start",
        0x18 => "Program Blackout Override",
        0x19 => "Program Join",
        0x20 => "Chapter Start",
        0x21 => "Chapter End",
        0x22 => "Break Start",
        0x23 => "Break End",
        0x24 => "Opening Credit Start",
        0x25 => "Opening Credit End",
        0x26 => "Closing Credit Start",
        0x27 => "Closing Credit End",
        0x30 => "Provider Advertisement Start",
        0x31 => "Provider Advertisement End",
        0x32 => "Distributor Advertisement Start",
        0x33 => "Distributor Advertisement End",
        0x34 => "Provider Placement Opportunity Start",
        0x35 => "Provider Placement Opportunity End",
        0x36 => "Distributor Placement Opportunity Start",
        0x37 => "Distributor Placement Opportunity End",
        0x38 => "Provider Overlay Placement Opportunity Start",
        0x39 => "Provider Overlay Placement Opportunity End",
        0x3A => "Distributor Overlay Placement Opportunity Start",
        0x3B => "Distributor Overlay Placement Opportunity End",
        0x3C => "Provider Promo Start",
        0x3D => "Provider Promo End",
        0x3E => "Distributor Promo Start",
        0x3F => "Distributor Promo End",
        0x40 => "Unscheduled Event Start",
        0x41 => "Unscheduled Event End",
        0x42 => "Alternate Content Opportunity Start",
        0x43 => "Alternate Content Opportunity End",
        0x44 => "Provider Ad Block Start",
        0x45 => "Provider Ad Block End",
        0x46 => "Distributor Ad Block Start",
        0x47 => "Distributor Ad Block End",
        0x50 => "Network Start",
        0x51 => "Network End",
        _ => return format!("Unknown (0x{type_id:02X})"),
    };
    known.to_string()
}

/// True for the segmentation types that open an ad-related segment.
pub fn is_ad_start(type_id: u8) -> bool {
    matches!(
        type_id,
        0x22 | 0x30 | 0x32 | 0x34 | 0x36 | 0x38 | 0x3A | 0x44 | 0x46
    )
}

/// True for the segmentation types that close an ad-related segment.
pub fn is_ad_end(type_id: u8) -> bool {
    matches!(
        type_id,
        0x23 | 0x31 | 0x33 | 0x35 | 0x37 | 0x39 | 0x3B | 0x45 | 0x47
    )
}

/// Decode one descriptor loop entry at the cursor.
///
/// A declared length that overruns the loop is clamped and noted; the bytes
/// themselves must still be present in the buffer.
pub(crate) fn decode_descriptor(
    r: &mut SpliceReader<'_>,
    loop_end: usize,
    warnings: &mut Vec<String>,
) -> Result<Descriptor, SpliceError> {
    let tag = r.take_u8("splice_descriptor_tag")?;
    let declared = r.take_u8("descriptor_length")?;
    let mut length = declared as usize;
    let available = loop_end.saturating_sub(r.position());
    if length > available {
        warnings.push(format!(
            "descriptor 0x{tag:02X}: length {declared} overruns the descriptor loop, clamped to {available}"
        ));
        length = available;
    }
    let body = r.take_slice(length, "descriptor body")?;
    let info = if tag == layout::TAG_SEGMENTATION {
        DescriptorInfo::Segmentation(decode_segmentation(body, warnings))
    } else {
        DescriptorInfo::RawUnknown(body.to_vec())
    };
    Ok(Descriptor {
        tag,
        tag_name: descriptor_tag_name(tag),
        length: declared,
        info,
    })
}

/// Decode a segmentation descriptor body.
///
/// Truncation inside the body keeps the fields read so far and records a
/// warning instead of failing the section; the loop framing already consumed
/// the declared bytes.
fn decode_segmentation(body: &[u8], warnings: &mut Vec<String>) -> SegmentationDescriptor {
    let mut reader = SpliceReader::new(body);
    let mut seg = SegmentationDescriptor::default();
    if let Err(err) = decode_segmentation_fields(&mut reader, &mut seg) {
        warnings.push(format!("segmentation_descriptor: {err}"));
        return seg;
    }
    if reader.remaining() > 0 {
        // sub_segment extensions and the like: left undecoded, but noted.
        warnings.push(format!(
            "segmentation_descriptor event {}: {} trailing bytes not decoded",
            seg.event_id,
            reader.remaining()
        ));
    }
    seg
}

fn decode_segmentation_fields(
    r: &mut SpliceReader<'_>,
    seg: &mut SegmentationDescriptor,
) -> Result<(), SpliceError> {
    seg.identifier = identifier_string(r.take_slice(4, "segmentation identifier")?);
    seg.event_id = r.take_u32_be("segmentation_event_id")?;
    let cancel = r.take_u8("segmentation_event_cancel_indicator")? & 0x80 != 0;
    seg.cancel_indicator = cancel;
    if cancel {
        return Ok(());
    }

    let flags = r.take_u8("segmentation flags")?;
    let duration_flag = flags & 0x40 != 0;
    let not_restricted = flags & 0x20 != 0;
    seg.program_segmentation_flag = Some(flags & 0x80 != 0);
    seg.segmentation_duration_flag = Some(duration_flag);
    seg.delivery_not_restricted = Some(not_restricted);
    if !not_restricted {
        seg.web_delivery_allowed = Some(flags & 0x10 != 0);
        seg.no_regional_blackout = Some(flags & 0x08 != 0);
        seg.archive_allowed = Some(flags & 0x04 != 0);
        seg.device_restrictions = Some(flags & 0x03);
    }
    if duration_flag {
        let (_, duration) = r.take_duration("segmentation_duration")?;
        seg.segmentation_duration = Some(duration);
    }

    let upid_type = r.take_u8("segmentation_upid_type")?;
    let upid_length = r.take_u8("segmentation_upid_length")?;
    seg.upid_type = Some(upid_type);
    seg.upid_length = Some(upid_length);
    seg.upid = r
        .take_slice(upid_length as usize, "segmentation_upid")?
        .to_vec();

    let type_id = r.take_u8("segmentation_type_id")?;
    seg.type_id = Some(type_id);
    seg.type_id_name = Some(segmentation_type_name(type_id));
    seg.is_ad_start = is_ad_start(type_id);
    seg.is_ad_end = is_ad_end(type_id);
    seg.segment_num = Some(r.take_u8("segment_num")?);
    seg.segments_expected = Some(r.take_u8("segments_expected")?);
    Ok(())
}

fn identifier_string(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| (0x20..=0x7E).contains(b)) {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes.iter().map(|b| format!("{b:02X}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(body: &[u8]) -> (SegmentationDescriptor, Vec<String>) {
        let mut warnings = Vec::new();
        let seg = decode_segmentation(body, &mut warnings);
        (seg, warnings)
    }

    #[test]
    fn segmentation_break_start() {
        let mut body = vec![
            0x43, 0x55, 0x45, 0x49, // "CUEI"
            0x00, 0x00, 0x12, 0x34, // event id
            0x00, // not cancelled
            0xE0, // program + duration + not restricted
            0x00, 0x05, 0x26, 0x5C, 0x00, // duration 2_700_000
            0x08, 0x08, // upid type/length
        ];
        body.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x2A]); // upid
        body.extend_from_slice(&[0x22, 0x01, 0x01]); // Break Start, 1/1
        let (seg, warnings) = decode_one(&body);
        assert!(warnings.is_empty());
        assert_eq!(seg.identifier, "CUEI");
        assert_eq!(seg.event_id, 0x1234);
        assert!(!seg.cancel_indicator);
        assert_eq!(seg.delivery_not_restricted, Some(true));
        assert_eq!(seg.web_delivery_allowed, None);
        assert_eq!(seg.segmentation_duration, Some(2_700_000));
        assert_eq!(seg.upid_length, Some(8));
        assert_eq!(seg.upid.len(), 8);
        assert_eq!(seg.type_id, Some(0x22));
        assert_eq!(seg.type_id_name.as_deref(), Some("Break Start"));
        assert!(seg.is_ad_start);
        assert!(!seg.is_ad_end);
        assert_eq!(seg.segment_num, Some(1));
    }

    #[test]
    fn segmentation_delivery_restricted_flags() {
        let body = [
            0x43, 0x55, 0x45, 0x49, // "CUEI"
            0x00, 0x00, 0x00, 0x05, // event id
            0x00, // not cancelled
            0x9E, // program, no duration, restricted, web+blackout, dev 0b10
            0x09, 0x00, // upid type 9, empty
            0x23, 0x02, 0x02, // Break End, 2/2
        ];
        let (seg, warnings) = decode_one(&body);
        assert!(warnings.is_empty());
        assert_eq!(seg.delivery_not_restricted, Some(false));
        assert_eq!(seg.web_delivery_allowed, Some(true));
        assert_eq!(seg.no_regional_blackout, Some(true));
        assert_eq!(seg.archive_allowed, Some(true));
        assert_eq!(seg.device_restrictions, Some(0x02));
        assert_eq!(seg.segmentation_duration, None);
        assert!(seg.upid.is_empty());
        assert!(!seg.is_ad_start);
        assert!(seg.is_ad_end);
    }

    #[test]
    fn segmentation_cancelled_stops_early() {
        let body = [
            0x43, 0x55, 0x45, 0x49, 0x00, 0x00, 0x00, 0x09, 0x80, // cancelled
        ];
        let (seg, warnings) = decode_one(&body);
        assert!(warnings.is_empty());
        assert!(seg.cancel_indicator);
        assert_eq!(seg.program_segmentation_flag, None);
        assert_eq!(seg.type_id, None);
    }

    #[test]
    fn segmentation_truncated_upid_keeps_prefix() {
        let body = [
            0x43, 0x55, 0x45, 0x49, // "CUEI"
            0x00, 0x00, 0x00, 0x06, // event id
            0x00, // not cancelled
            0xA0, // program, not restricted
            0x08, 0x10, // upid length 16, but only 2 bytes follow
            0xAA, 0xBB,
        ];
        let (seg, warnings) = decode_one(&body);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("segmentation_upid"));
        assert_eq!(seg.event_id, 6);
        assert_eq!(seg.upid_length, Some(16));
        assert!(seg.upid.is_empty());
        assert_eq!(seg.type_id, None);
    }

    #[test]
    fn segmentation_trailing_bytes_noted() {
        let body = [
            0x43, 0x55, 0x45, 0x49, // "CUEI"
            0x00, 0x00, 0x00, 0x07, // event id
            0x00, // not cancelled
            0xA0, // program, not restricted
            0x09, 0x00, // empty upid
            0x10, 0x01, 0x01, // Program Start
            0xDE, 0xAD, // sub_segment extension bytes
        ];
        let (seg, warnings) = decode_one(&body);
        assert_eq!(seg.type_id, Some(0x10));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2 trailing bytes"));
    }

    #[test]
    fn identifier_falls_back_to_hex() {
        assert_eq!(identifier_string(b"CUEI"), "CUEI");
        assert_eq!(identifier_string(&[0x00, 0x01, 0xFF, 0x41]), "0001FF41");
    }

    #[test]
    fn ad_classification_tables() {
        assert!(is_ad_start(0x22) && !is_ad_end(0x22));
        assert!(is_ad_end(0x23) && !is_ad_start(0x23));
        assert!(is_ad_start(0x30));
        assert!(is_ad_end(0x31));
        assert!(!is_ad_start(0x10) && !is_ad_end(0x10));
        assert!(!is_ad_start(0x3C) && !is_ad_end(0x3D)); // promos are not ads
    }

    #[test]
    fn tag_names() {
        assert_eq!(descriptor_tag_name(0x02), "segmentation_descriptor");
        assert_eq!(descriptor_tag_name(0x09), "Unknown (0x09)");
    }

    #[test]
    fn unknown_segmentation_type_name() {
        assert_eq!(segmentation_type_name(0x7F), "Unknown (0x7F)");
        assert_eq!(segmentation_type_name(0x34), "Provider Placement Opportunity Start");
    }
}
