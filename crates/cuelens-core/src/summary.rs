//! One-line human-readable rendering of decoded cue messages.

use crate::splice::commands::{SpliceCommand, SpliceInsert, SpliceTime, TimeSignal};
use crate::splice::descriptors::{Descriptor, DescriptorInfo};
use crate::splice::layout;
use crate::splice::parser::CueMessage;

/// Render a decoded message as a single descriptive line.
///
/// Messages carrying an error echo it verbatim, prefixed as invalid.
pub fn summarize(msg: &CueMessage) -> String {
    if let Some(error) = &msg.error {
        return format!("invalid cue: {error}");
    }
    match &msg.splice_command {
        None => "no splice command".to_string(),
        Some(SpliceCommand::SpliceNull) => "splice_null".to_string(),
        Some(SpliceCommand::SpliceInsert(insert)) => summarize_insert(insert),
        Some(SpliceCommand::TimeSignal(signal)) => {
            summarize_time_signal(signal, &msg.descriptors)
        }
        Some(SpliceCommand::SpliceSchedule(raw)) => {
            format!("splice_schedule ({} bytes)", raw.len())
        }
        Some(SpliceCommand::BandwidthReservation(raw)) => {
            format!("bandwidth_reservation ({} bytes)", raw.len())
        }
        Some(SpliceCommand::PrivateCommand(raw)) => {
            format!("private_command ({} bytes)", raw.len())
        }
        Some(SpliceCommand::RawUnknown { command_type, raw }) => {
            format!("unknown command 0x{command_type:02X} ({} bytes)", raw.len())
        }
    }
}

fn summarize_insert(insert: &SpliceInsert) -> String {
    if insert.splice_event_cancel_indicator {
        return format!("splice_insert: event {} cancelled", insert.splice_event_id);
    }
    let kind = match insert.out_of_network_indicator {
        Some(true) => "ad start",
        Some(false) => "ad end",
        None => "splice",
    };
    let mut line = format!("splice_insert: {kind}");
    if insert.splice_immediate_flag == Some(true) {
        line.push_str(" immediate");
    } else if let Some(time) = &insert.splice_time {
        line.push_str(" @ ");
        line.push_str(&pts_text(time));
    }
    if let Some(duration) = &insert.break_duration {
        line.push_str(&format!(", duration {}", seconds(duration.duration)));
    }
    line.push_str(&format!(", event {}", insert.splice_event_id));
    if let Some(program) = insert.unique_program_id {
        line.push_str(&format!(", program {program}"));
    }
    if let (Some(num), Some(expected)) = (insert.avail_num, insert.avails_expected) {
        line.push_str(&format!(", avail {num}/{expected}"));
    }
    line
}

fn summarize_time_signal(signal: &TimeSignal, descriptors: &[Descriptor]) -> String {
    let mut line = String::from("time_signal");
    match &signal.splice_time {
        Some(time) if time.specified => {
            line.push_str(" @ ");
            line.push_str(&pts_text(time));
        }
        _ => line.push_str(" (no pts)"),
    }
    for descriptor in descriptors {
        line.push(' ');
        line.push_str(&descriptor_digest(descriptor));
    }
    line
}

fn descriptor_digest(descriptor: &Descriptor) -> String {
    let DescriptorInfo::Segmentation(seg) = &descriptor.info else {
        return format!("[descriptor 0x{:02X}]", descriptor.tag);
    };
    let mut digest = String::from("[");
    digest.push_str(seg.type_id_name.as_deref().unwrap_or("segmentation"));
    digest.push_str(&format!(": event {}", seg.event_id));
    if seg.cancel_indicator {
        digest.push_str(" cancelled");
    }
    if let Some(duration) = seg.segmentation_duration {
        digest.push_str(&format!(", duration {}", seconds(duration)));
    }
    if !seg.upid.is_empty() {
        digest.push_str(&format!(", upid {} bytes", seg.upid.len()));
    }
    if let (Some(num), Some(expected)) = (seg.segment_num, seg.segments_expected) {
        digest.push_str(&format!(", segment {num}/{expected}"));
    }
    digest.push(']');
    digest
}

fn pts_text(time: &SpliceTime) -> String {
    match time.pts_time {
        Some(pts) => seconds(pts),
        None => "unknown pts".to_string(),
    }
}

fn seconds(ticks: u64) -> String {
    format!("{:.3}s", ticks as f64 / layout::TICKS_PER_SECOND as f64)
}
