//! Test diagnostics module functionality
#![cfg(feature = "diagnostics")]

use std::path::Path;

use bms_playback::{
    bms::{BmsWarning, command::channel::mapper::Dialect, parse_chart},
    diagnostics::{SimpleSource, collect_bms_reports, emit_bms_warnings},
};

use super::StubDecoder;

#[test]
fn test_simple_source() {
    let source_text = "#TITLE Test Song\n#ARTIST Test Composer\n#BPM 120\n";
    let source = SimpleSource::new("test.bms", source_text);
    assert_eq!(source.text(), source_text);
    assert_eq!(source.name(), "test.bms");
}

#[test]
fn test_report_for_each_warning() {
    let source = "#TITLE Test\n#STAGEFILE a.png\n#WAV01 missing.wav\n#00111:010\n#BPM 0\n";
    let output = parse_chart(source, Dialect::Bms, Path::new("."), &StubDecoder::default());
    assert_eq!(output.warnings.len(), 4);
    assert!(matches!(output.warnings.last(), Some(BmsWarning::PlayingWarning(_))));

    let reports = collect_bms_reports("test.bms", source, &output.warnings);
    assert_eq!(reports.len(), output.warnings.len());

    let mut rendered = Vec::new();
    reports[0]
        .write(("test.bms".to_string(), ariadne::Source::from(source)), &mut rendered)
        .unwrap();
    let rendered = String::from_utf8(rendered).unwrap();
    assert!(rendered.contains("STAGEFILE"));
}

#[test]
fn test_emit_warnings() {
    let source = "#TITLE test\n#INVALID command\n";
    let output = parse_chart(source, Dialect::Bms, Path::new("."), &StubDecoder::default());
    assert_eq!(output.warnings.len(), 2);
    emit_bms_warnings("test.bms", source, &output.warnings);

    let empty_warnings: Vec<BmsWarning> = vec![];
    emit_bms_warnings("test.bms", source, &empty_warnings);
}
