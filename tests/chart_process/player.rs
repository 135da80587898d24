use std::{collections::HashSet, sync::Arc, thread};

use gametime::TimeSpan;
use pretty_assertions::assert_eq;

use bms_playback::{
    bms::command::{ObjId, channel::{ChannelId, mapper::{Dialect, Lane}}},
    chart_process::{ChartEvent, PlayheadEvent, player::ChartPlayer},
    config::PlaybackConfig,
    mixer::{Mixer, SampleSink, SlotId},
};

use super::{Recorder, load, sounds};

fn id(s: &str) -> ObjId {
    ObjId::try_from(s).unwrap()
}

#[test]
fn test_end_to_end() {
    let chart = load("#TITLE Test\n#BPM 120\n#WAV01 a.wav\n#WAV02 b.wav\n#00111:0102\n");
    let config = PlaybackConfig::default();
    let mixer = Mixer::from_config(&config);
    let mut player = ChartPlayer::new(chart, &config);
    assert_eq!(player.current_bpm(), 120.0);

    let events = player.step(TimeSpan::ZERO, &mixer);
    assert_eq!(
        events,
        vec![
            PlayheadEvent {
                measure: 1,
                channel: ChannelId::SECTION_LEN,
                position: 0.0,
                event: ChartEvent::MeasureEntered { measure: 0 },
            },
            PlayheadEvent {
                measure: 1,
                channel: "11".parse().unwrap(),
                position: 0.0,
                event: ChartEvent::Sound {
                    wav_id: id("01"),
                    slot: Some(SlotId(0)),
                },
            },
        ]
    );
    // The absent measure 0 was skipped without consuming time.
    assert_eq!(player.current_measure(), 0);
    assert_eq!(player.current_actual_measure(), 1.0);
    assert_eq!(mixer.active_slots(), 1);

    // 2 seconds per measure at 120 BPM.
    let events = player.step(TimeSpan::SECOND, &mixer);
    assert_eq!(
        sounds(&events),
        vec![&PlayheadEvent {
            measure: 1,
            channel: "11".parse().unwrap(),
            position: 0.5,
            event: ChartEvent::Sound {
                wav_id: id("02"),
                slot: Some(SlotId(1)),
            },
        }]
    );
    assert_eq!(player.current_measure_part(), 0.5);

    assert!(player.step(TimeSpan::SECOND, &mixer).is_empty());
    assert!(player.is_finished());
    assert_eq!(player.elapsed(), TimeSpan::SECOND * 2);
}

#[test]
fn test_at_most_once_for_any_step() {
    let source = "#BPM 150\n#WAV01 a.wav\n#00011:01010101\n#00101:0001\n#00112:01000001\n#00213:0101010101010101\n";
    for millis in [1i64, 7, 16, 100, 333] {
        let mut player = ChartPlayer::new(load(source), &PlaybackConfig::default());
        let sink = Recorder::default();
        let mut seen = HashSet::new();
        let mut steps = 0;
        while !player.is_finished() {
            for event in player.step(TimeSpan::MILLISECOND * millis, &sink) {
                if let ChartEvent::Sound { .. } = event.event {
                    let key = (event.measure, event.channel, event.position.to_bits());
                    assert!(seen.insert(key), "{key:?} triggered twice at {millis}ms steps");
                }
            }
            steps += 1;
            assert!(steps < 100_000);
        }
        assert_eq!(sink.count(), seen.len());
        assert_eq!(seen.len(), 15, "at {millis}ms steps");
    }
}

#[test]
fn test_last_division_of_dense_measure() {
    // 200 BPM makes a measure 1.2 seconds, and a 17ms tick jumps over the last of 192 divisions.
    let source = format!("#BPM 200\n#WAV01 a.wav\n#00011:{}01\n#00111:01\n", "00".repeat(191));
    for millis in [1i64, 16, 17, 33] {
        let mut player = ChartPlayer::new(load(&source), &PlaybackConfig::default());
        let sink = Recorder::default();
        while !player.is_finished() {
            player.step(TimeSpan::MILLISECOND * millis, &sink);
        }
        assert_eq!(sink.count(), 2, "at {millis}ms steps");
    }
}

#[test]
fn test_rest_of_measure_when_crossing_boundary() {
    let chart = load("#BPM 120\n#WAV01 a.wav\n#WAV02 b.wav\n#00011:00000001\n#00111:02\n");
    let mut player = ChartPlayer::new(chart, &PlaybackConfig::default());
    let sink = Recorder::default();

    assert!(sounds(&player.step(TimeSpan::MILLISECOND * 1400, &sink)).is_empty());
    assert_eq!(player.current_measure_part(), 0.7);

    let events = player.step(TimeSpan::MILLISECOND * 800, &sink);
    assert_eq!(
        events
            .iter()
            .map(|event| (event.measure, event.position, event.event))
            .collect::<Vec<_>>(),
        vec![
            (0, 0.75, ChartEvent::Sound { wav_id: id("01"), slot: Some(SlotId(0)) }),
            (1, 0.0, ChartEvent::MeasureEntered { measure: 1 }),
            (1, 0.0, ChartEvent::Sound { wav_id: id("02"), slot: Some(SlotId(1)) }),
        ]
    );
    assert_eq!(sink.count(), 2);
}

#[test]
fn test_measures_jumped_over_are_not_triggered() {
    let chart = load("#BPM 120\n#WAV01 a.wav\n#00011:0001\n#00111:01\n#00211:01\n");
    let mut player = ChartPlayer::new(chart, &PlaybackConfig::default());
    let sink = Recorder::default();
    player.step(TimeSpan::ZERO, &sink);
    assert_eq!(sink.count(), 0);

    // From the start of the measure 0 into the measure 2, jumping over the whole measure 1.
    let events = player.step(TimeSpan::MILLISECOND * 4500, &sink);
    assert_eq!(player.current_measure(), 2);
    assert_eq!(
        sounds(&events).iter().map(|event| event.measure).collect::<Vec<_>>(),
        vec![2]
    );
    assert!(!player.chart().measure(0).unwrap().channels().values().flat_map(|c| c.objects()).any(|o| o.is_activated()));
}

#[test]
fn test_gap_skip() {
    let chart = load("#BPM 120\n#WAV01 a.wav\n#00011:01\n#00211:01\n");
    assert_eq!(chart.total_measures(), 2);
    let mut player = ChartPlayer::new(chart, &PlaybackConfig::default());
    let sink = Recorder::default();

    player.step(TimeSpan::ZERO, &sink);
    assert_eq!(player.current_measure(), 0);
    assert_eq!(sink.count(), 1);

    let events = player.step(TimeSpan::MILLISECOND * 2500, &sink);
    assert_eq!(player.current_measure(), 1);
    assert_eq!(player.current_actual_measure(), 2.25);
    assert_eq!(player.current_measure_part(), 0.25);
    assert_eq!(sink.count(), 2);
    assert_eq!(
        events[0],
        PlayheadEvent {
            measure: 2,
            channel: ChannelId::SECTION_LEN,
            position: 0.0,
            event: ChartEvent::MeasureEntered { measure: 1 },
        }
    );
}

#[test]
fn test_finished_only_accumulates_time() {
    let mut player = ChartPlayer::new(load("#WAV01 a.wav\n#00011:01\n"), &PlaybackConfig::default());
    let sink = Recorder::default();
    // Running past the end still plays the rest of the last measure.
    player.step(TimeSpan::SECOND * 5, &sink);
    assert!(player.is_finished());
    assert_eq!(sink.count(), 1);

    assert!(player.step(TimeSpan::SECOND, &sink).is_empty());
    assert_eq!(sink.count(), 1);
    assert_eq!(player.elapsed(), TimeSpan::SECOND * 6);
}

#[test]
fn test_empty_chart_finishes() {
    let mut player = ChartPlayer::new(load("#TITLE Nothing\n"), &PlaybackConfig::default());
    assert!(player.step(TimeSpan::ZERO, &Recorder::default()).is_empty());
    assert!(player.is_finished());
}

#[test]
fn test_dead_samples_and_settings_channels() {
    let chart = load(
        "#WAV01 a.wav\n#WAV02 dead.wav\n#00011:02\n#00004:01\n#00007:01\n#00012:03\n#00013:01\n",
    );
    let mut player = ChartPlayer::new(chart, &PlaybackConfig::default());
    let sink = Recorder::default();
    let events = player.step(TimeSpan::ZERO, &sink);
    // `04` and `07` are BGA channels, `02` failed to decode and `03` is not defined.
    assert_eq!(
        sounds(&events)
            .iter()
            .map(|event| event.channel.to_string())
            .collect::<Vec<_>>(),
        vec!["13"]
    );
    assert_eq!(sink.count(), 1);
    let dead = player.chart().measure(0).unwrap().channel("11".parse().unwrap()).unwrap();
    assert!(!dead.objects()[0].is_activated());
}

#[test]
fn test_bgm_triggers_first() {
    let chart = load("#WAV01 a.wav\n#WAV02 b.wav\n#00011:01\n#00001:02\n#00001:0202\n");
    let mut player = ChartPlayer::new(chart, &PlaybackConfig::default());
    let events = player.step(TimeSpan::ZERO, &Recorder::default());
    assert_eq!(
        sounds(&events)
            .iter()
            .map(|event| event.channel)
            .collect::<Vec<_>>(),
        vec![ChannelId::BGM, ChannelId::BGM, "11".parse().unwrap()]
    );
}

#[test]
fn test_exhausted_mixer_drops() {
    let chart = load("#WAV01 a.wav\n#00011:01\n#00012:01\n");
    let config = PlaybackConfig::default().with_mixer_capacity(1);
    let mixer = Mixer::from_config(&config);
    let mut player = ChartPlayer::new(chart, &config);
    let events = player.step(TimeSpan::ZERO, &mixer);
    let slots: Vec<_> = sounds(&events)
        .iter()
        .map(|event| match event.event {
            ChartEvent::Sound { slot, .. } => slot,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(slots, vec![Some(SlotId(0)), None]);

    // Both were consumed, the dropped one is not retried.
    assert!(sounds(&player.step(TimeSpan::MILLISECOND, &mixer)).is_empty());
}

#[test]
fn test_reset_replays() {
    let mut player = ChartPlayer::new(
        load("#BPM 240\n#WAV01 a.wav\n#00011:0101\n"),
        &PlaybackConfig::default(),
    );
    let sink = Recorder::default();
    while !player.is_finished() {
        player.step(TimeSpan::MILLISECOND * 50, &sink);
    }
    assert_eq!(sink.count(), 2);

    player.reset();
    assert_eq!(player.current_actual_measure(), 0.0);
    assert_eq!(player.elapsed(), TimeSpan::ZERO);
    assert!(!player.chart().measure(0).unwrap().channels().values().flat_map(|c| c.objects()).any(|o| o.is_activated()));
    while !player.is_finished() {
        player.step(TimeSpan::MILLISECOND * 50, &sink);
    }
    assert_eq!(sink.count(), 4);
}

#[test]
fn test_lane_queries() {
    let player = ChartPlayer::new(load("#00011:01\n"), &PlaybackConfig::default());
    assert_eq!(player.dialect(), Dialect::Bms);
    assert_eq!(player.lane_of("16".parse().unwrap()), Some(Lane(0)));
    assert_eq!(player.lane_of("29".parse().unwrap()), Some(Lane(15)));
    assert_eq!(player.lane_of("01".parse().unwrap()), None);
}

#[test]
fn test_concurrent_audio_callback() {
    let chart = load("#BPM 240\n#WAV01 a.wav\n#00011:0101010101010101\n#00101:01010101\n");
    let config = PlaybackConfig::default().with_mixer_capacity(4);
    let mixer = Arc::new(Mixer::from_config(&config));
    let mut player = ChartPlayer::new(chart, &config);

    let audio = {
        let mixer = Arc::clone(&mixer);
        thread::spawn(move || {
            let mut buffer = [0.0f32; 256];
            for _ in 0..2000 {
                mixer.fill(&mut buffer);
                assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
            }
        })
    };
    let sink: &dyn SampleSink = &mixer;
    let mut triggered = 0;
    while !player.is_finished() {
        triggered += sounds(&player.step(TimeSpan::MILLISECOND * 10, sink)).len();
    }
    audio.join().unwrap();
    assert_eq!(triggered, 12);
}
