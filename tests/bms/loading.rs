use pretty_assertions::assert_eq;

use bms_playback::bms::{
    ChartOutput, ParseError,
    command::{ObjId, channel::mapper::Dialect},
    load_chart,
};

use super::StubDecoder;

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let chart_path = dir.path().join("chart.bme");
    std::fs::write(&chart_path, "#TITLE On Disk\n#WAV01 kick.ogg\n#00119:01\n").unwrap();
    std::fs::write(dir.path().join("kick.wav"), b"").unwrap();

    let decoder = StubDecoder::default();
    let ChartOutput { chart, warnings } = load_chart(&chart_path, &decoder).unwrap();
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.dialect(), Dialect::Bme);
    assert_eq!(chart.header.title.as_deref(), Some("On Disk"));
    assert_eq!(decoder.decoded(), vec![dir.path().join("kick.wav")]);
    assert!(chart.sample(ObjId::try_from("01").unwrap()).is_some());
}

#[test]
fn test_load_shift_jis_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let chart_path = dir.path().join("sjis.bms");
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("#TITLE 日本語\n#00111:01\n");
    std::fs::write(&chart_path, &bytes).unwrap();

    let ChartOutput { chart, .. } = load_chart(&chart_path, &StubDecoder::default()).unwrap();
    assert_eq!(chart.header.title.as_deref(), Some("日本語"));
    assert_eq!(chart.dialect(), Dialect::Bms);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.bms");
    let err = load_chart(&path, &StubDecoder::default()).unwrap_err();
    assert!(matches!(err, ParseError::NotFound { path: ref p, .. } if *p == path));
}
