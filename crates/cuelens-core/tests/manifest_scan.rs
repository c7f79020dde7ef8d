use std::fs;
use std::path::Path;

use cuelens_core::{CueError, Encoding, SpliceCommand, scan_manifest};

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).expect("read fixture manifest")
}

#[test]
fn scan_ad_break_manifest() {
    let manifest = load_fixture("ad_break.m3u8");
    let records = scan_manifest(&manifest);
    assert_eq!(records.len(), 4);

    let out = &records[0];
    assert_eq!(out.line, 7);
    assert_eq!(out.encoding, Encoding::Hex);
    assert!(out.message.is_valid());
    assert_eq!(
        out.summary,
        "splice_insert: ad start @ 20.000s, duration 30.000s, event 1, program 100, avail 1/2"
    );

    let signal = &records[1];
    assert_eq!(signal.line, 10);
    assert_eq!(signal.encoding, Encoding::Base64);
    assert!(signal.message.is_valid());
    assert_eq!(
        signal.summary,
        "time_signal @ 60.000s [Break Start: event 4660, duration 30.000s, upid 8 bytes, segment 1/1]"
    );
    let Some(SpliceCommand::TimeSignal(ts)) = &signal.message.splice_command else {
        panic!("expected time_signal, got {:?}", signal.message.splice_command);
    };
    assert_eq!(ts.splice_time.unwrap().pts_time, Some(5_400_000));
    assert_eq!(signal.message.descriptors.len(), 1);

    let cue_in = &records[2];
    assert_eq!(cue_in.line, 13);
    assert_eq!(cue_in.encoding, Encoding::Base64);
    assert!(cue_in.message.is_valid());
    assert!(cue_in.summary.starts_with("splice_insert: ad start"));

    let broken = &records[3];
    assert_eq!(broken.line, 16);
    assert_eq!(broken.encoding, Encoding::Hex);
    assert!(matches!(
        broken.message.error,
        Some(CueError::Decode { .. })
    ));
    assert!(broken.summary.starts_with("invalid cue:"));
}

#[test]
fn scan_without_cues_is_empty() {
    let manifest = "#EXTM3U\n#EXTINF:6.006,\nsegment-1.ts\n";
    assert!(scan_manifest(manifest).is_empty());
}

#[test]
fn ad_break_descriptor_classification() {
    let manifest = load_fixture("ad_break.m3u8");
    let records = scan_manifest(&manifest);
    let message = &records[1].message;
    let cuelens_core::DescriptorInfo::Segmentation(seg) = &message.descriptors[0].info else {
        panic!("expected segmentation descriptor");
    };
    assert_eq!(seg.identifier, "CUEI");
    assert_eq!(seg.type_id, Some(0x22));
    assert!(seg.is_ad_start);
    assert!(!seg.is_ad_end);
    assert_eq!(seg.segmentation_duration, Some(2_700_000));
}
