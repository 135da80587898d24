use std::path::Path;

use pretty_assertions::assert_eq;

use bms_playback::bms::{
    BmsWarning, ChartOutput,
    command::{ObjId, channel::mapper::Dialect},
    model::{Chart, DEFAULT_BPM},
    parse::{ParseWarning, check_playing::PlayingWarning},
    parse_chart,
};

use super::StubDecoder;

fn parse(source: &str) -> ChartOutput {
    parse_chart(source, Dialect::Bms, Path::new("."), &StubDecoder::default())
}

fn chart(source: &str) -> Chart {
    parse(source).chart
}

#[test]
fn test_bpm_and_bpm_definition() {
    let chart = chart("#BPM 180\n#BPM0A 200\n#00111:01\n");
    assert_eq!(chart.header.bpm, 180.0);
    assert_eq!(chart.defs.bpm.get(&ObjId::try_from("0A").unwrap()), Some(&200.0));

    let chart = self::chart("#BPM0A 200\n#00111:01\n");
    assert_eq!(chart.header.bpm, DEFAULT_BPM);
    assert_eq!(chart.defs.bpm.len(), 1);
}

#[test]
fn test_case_insensitive_keywords() {
    let chart = chart("#bpm 90\n#title lower\n#wav01 a.wav\n#00111:01\n");
    assert_eq!(chart.header.bpm, 90.0);
    assert_eq!(chart.header.title.as_deref(), Some("lower"));
    assert!(chart.sample(ObjId::try_from("01").unwrap()).is_some());
}

#[test]
fn test_numeric_prefixes() {
    let chart = chart("#BPM 12.5abc\n#PLAYLEVEL 7 (hard)\n#RANK -1\n#TOTAL 3e2\n#00111:01\n");
    assert_eq!(chart.header.bpm, 12.5);
    assert_eq!(chart.header.play_level, Some(7));
    assert_eq!(chart.header.rank, -1);
    assert_eq!(chart.header.total, 300.0);
}

#[test]
fn test_invalid_bpm_falls_back() {
    let ChartOutput { chart, warnings } = parse("#BPM abc\n#00111:01\n");
    assert_eq!(chart.header.bpm, 0.0);
    assert_eq!(chart.playback_bpm(), DEFAULT_BPM);
    assert_eq!(
        warnings,
        vec![BmsWarning::PlayingWarning(PlayingWarning::InvalidBpm(0.0))]
    );
}

#[test]
fn test_no_measures() {
    let ChartOutput { chart, warnings } = parse("#TITLE Empty\n#BPM 120\n");
    assert_eq!(chart.total_measures(), 0);
    assert_eq!(
        warnings,
        vec![BmsWarning::PlayingWarning(PlayingWarning::NoMeasures)]
    );
}

#[test]
fn test_odd_length_message() {
    let ChartOutput { chart, warnings } = parse("#00111:010\n");
    let channel = chart
        .measure(1)
        .unwrap()
        .channel("11".parse().unwrap())
        .unwrap();
    assert_eq!(channel.len(), 1);
    assert!(matches!(
        warnings.as_slice(),
        [BmsWarning::ParseWarning(w)] if matches!(w.content(), ParseWarning::OddLengthMessage { .. })
    ));
}

#[test]
fn test_lenient_ids() {
    let chart = chart("#WAV1! odd.wav\n#00111:1!\n");
    let id = ObjId::try_from("01").unwrap();
    assert!(chart.defs.wav.contains_key(&id));
    let object = chart
        .measure(1)
        .unwrap()
        .channel("11".parse().unwrap())
        .unwrap()
        .objects()[0];
    assert_eq!(object.id, id);
}

#[test]
fn test_lines_without_hash_are_comments() {
    let ChartOutput { chart, warnings } =
        parse("this is a memo\n  #TITLE Indented\n*---- #00111:01\n");
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.header.title.as_deref(), Some("Indented"));
    assert_eq!(chart.total_measures(), 1);
}
