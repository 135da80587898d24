use gametime::TimeSpan;
use pretty_assertions::assert_eq;

use bms_playback::{
    chart_process::{ChartEvent, player::ChartPlayer},
    config::{PlaybackConfig, TempoChangePolicy},
};

use super::{Recorder, load};

const SOURCE: &str = "#BPM 120\n#BPM01 240\n#BPM02 -5\n#00008:0001\n#00103:0078\n#00108:02\n";

fn bpm_changes(player: &mut ChartPlayer, dt: TimeSpan) -> Vec<f64> {
    player
        .step(dt, &Recorder::default())
        .into_iter()
        .filter_map(|event| match event.event {
            ChartEvent::BpmChange { bpm } => Some(bpm),
            _ => None,
        })
        .collect()
}

#[test]
fn test_apply_tempo_changes() {
    let mut player = ChartPlayer::new(load(SOURCE), &PlaybackConfig::default());
    assert_eq!(bpm_changes(&mut player, TimeSpan::ZERO), vec![]);

    // Half of a measure at 120 BPM reaches `#BPM01`.
    assert_eq!(bpm_changes(&mut player, TimeSpan::SECOND), vec![240.0]);
    assert_eq!(player.current_bpm(), 240.0);

    // The rest of the measure passes twice as fast. `#BPM02` is not positive, so it is passed.
    assert_eq!(bpm_changes(&mut player, TimeSpan::MILLISECOND * 500), vec![]);
    assert_eq!(player.current_actual_measure(), 1.0);
    assert_eq!(player.current_bpm(), 240.0);

    // `78` of the channel `03` is hexadecimal 120.
    assert_eq!(bpm_changes(&mut player, TimeSpan::MILLISECOND * 500), vec![120.0]);
    assert_eq!(player.current_bpm(), 120.0);
    assert_eq!(player.current_actual_measure(), 1.5);
}

#[test]
fn test_ignore_tempo_changes() {
    let config = PlaybackConfig::default().with_tempo_changes(TempoChangePolicy::Ignore);
    let mut player = ChartPlayer::new(load(SOURCE), &config);
    assert_eq!(bpm_changes(&mut player, TimeSpan::ZERO), vec![]);
    assert_eq!(bpm_changes(&mut player, TimeSpan::SECOND), vec![]);
    assert_eq!(bpm_changes(&mut player, TimeSpan::SECOND), vec![]);
    assert_eq!(player.current_bpm(), 120.0);
    assert_eq!(player.current_actual_measure(), 1.0);
}

#[test]
fn test_metre_scales_measure_duration() {
    let mut player = ChartPlayer::new(
        load("#BPM 120\n#00002:0.5\n#00011:01\n#00111:01\n"),
        &PlaybackConfig::default(),
    );
    let sink = Recorder::default();
    player.step(TimeSpan::ZERO, &sink);
    // A half measure lasts 1 second at 120 BPM.
    player.step(TimeSpan::MILLISECOND * 500, &sink);
    assert_eq!(player.current_actual_measure(), 0.5);
    player.step(TimeSpan::MILLISECOND * 500, &sink);
    assert_eq!(player.current_measure(), 1);
    // The measure 1 is in 4/4 again.
    player.step(TimeSpan::SECOND, &sink);
    assert_eq!(player.current_actual_measure(), 1.5);
}
