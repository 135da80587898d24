use std::path::Path;

use pretty_assertions::assert_eq;

use bms_playback::bms::{
    BmsWarning, ChartOutput,
    command::{ObjId, PlayerMode, channel::mapper::{Dialect, Lane}},
    decode_source,
    lex::LexWarning,
    parse::ParseWarning,
    parse_chart,
};

use super::StubDecoder;

fn id(s: &str) -> ObjId {
    ObjId::try_from(s).unwrap()
}

#[test]
fn test_simple() {
    let source = include_str!("files/simple.bms");
    let decoder = StubDecoder::default();
    let ChartOutput { chart, warnings } =
        parse_chart(source, Dialect::Bms, Path::new("files"), &decoder);

    let header = &chart.header;
    assert_eq!(header.player, PlayerMode::Single);
    assert_eq!(header.genre.as_deref(), Some("Test Genre"));
    assert_eq!(header.title.as_deref(), Some("Simple Chart"));
    assert_eq!(header.subtitle.as_deref(), Some("[NORMAL]"));
    assert_eq!(header.artist.as_deref(), Some("Composer"));
    assert_eq!(header.sub_artists, vec!["obj: Someone".to_string()]);
    assert_eq!(header.maker.as_deref(), Some("Maker"));
    assert_eq!(header.bpm, 150.0);
    assert_eq!(header.play_level, Some(5));
    assert_eq!(header.rank, 2);
    assert_eq!(header.total, 250.0);
    assert_eq!(header.volwav, 80.0);
    assert_eq!(header.comments, vec!["good luck".to_string()]);

    assert_eq!(chart.defs.bpm.get(&id("0A")), Some(&180.0));
    assert_eq!(chart.defs.text.get(&id("01")).map(String::as_str), Some("hello"));
    assert!(chart.defs.bmp.contains_key(&id("01")));
    assert!(chart.sample(id("01")).is_some());
    assert!(chart.sample(id("02")).is_some());
    assert!(chart.defs.wav.contains_key(&id("0Z")));
    assert!(chart.sample(id("0Z")).is_none());
    assert_eq!(decoder.decoded().len(), 2);

    assert_eq!(warnings.len(), 2);
    assert!(matches!(
        &warnings[0],
        BmsWarning::LexWarning(w) if matches!(w.content(), LexWarning::UnknownCommand { command } if command == "#STAGEFILE stage.png")
    ));
    assert!(matches!(
        &warnings[1],
        BmsWarning::ParseWarning(w) if matches!(w.content(), ParseWarning::DecodeFailure { id: failed, .. } if *failed == id("0Z"))
    ));

    assert_eq!(chart.total_measures(), 3);
    assert_eq!(chart.measures().len(), 4);
    assert!(chart.measure(2).is_none());
    let first = chart.measure(0).unwrap();
    assert_eq!(first.bgm_channels().len(), 1);
    assert_eq!(first.bgm_channels()[0].len(), 4);
    let key = first.channel("11".parse().unwrap()).unwrap();
    assert_eq!(key.objects()[0].lane, Some(Lane(1)));
    let scratch = first.channel("16".parse().unwrap()).unwrap();
    assert_eq!(scratch.objects()[0].lane, Some(Lane(0)));

    let second = chart.measure(1).unwrap();
    assert_eq!(second.metre(), 0.5);
    assert_eq!(second.channel("11".parse().unwrap()).unwrap().len(), 4);
    assert_eq!(second.channel("08".parse().unwrap()).unwrap().objects()[1].id, id("0A"));
}

#[test]
fn test_shift_jis() {
    let source = decode_source(include_bytes!("files/shift_jis.bme"));
    let ChartOutput { chart, warnings } =
        parse_chart(&source, Dialect::Bme, Path::new("files"), &StubDecoder::default());
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.header.title.as_deref(), Some("恋のうた"));
    assert_eq!(chart.header.artist.as_deref(), Some("作曲者"));
    assert_eq!(chart.header.bpm, 140.0);
}

#[test]
fn test_pms_lanes() {
    let source = include_str!("files/pop.pms");
    let ChartOutput { chart, warnings } =
        parse_chart(source, Dialect::Pms, Path::new("files"), &StubDecoder::default());
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.dialect(), Dialect::Pms);

    let measure = chart.measure(1).unwrap();
    let lane_of = |channel: &str| {
        measure.channel(channel.parse().unwrap()).unwrap().objects()[0].lane
    };
    assert_eq!(lane_of("11"), Some(Lane(0)));
    assert_eq!(lane_of("22"), Some(Lane(5)));
    assert_eq!(lane_of("25"), Some(Lane(8)));
    assert_eq!(lane_of("51"), Some(Lane(0)));
    // The scratch of the beat layout has no lane in PMS, but it is still a visible channel.
    assert_eq!(lane_of("16"), None);
    assert!(measure.channel("16".parse().unwrap()).unwrap().objects()[0].visible);
}
