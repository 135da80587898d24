//! Chart player module
//!
//! The playhead is kept as a real number of measures, `current_actual_measure`, whose integer part is the
//! measure number and fractional part the position in it. Each [`ChartPlayer::step`] advances it by
//! `measures_per_second * dt`, where a measure lasts `60 / bpm * 4 * metre` seconds.
//!
//! Measures never referred by the chart are skipped over without consuming time.

use std::time::Duration;

use gametime::TimeSpan;
use tracing::{debug, trace};

use crate::{
    bms::{
        command::channel::{ChannelId, ChannelKind, mapper::{Dialect, Lane}},
        model::Chart,
        parse::check_playing::is_valid_bpm,
    },
    config::{PlaybackConfig, TempoChangePolicy},
    mixer::SampleSink,
};

use super::{ChartEvent, PlayheadEvent};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Returns how many measures pass in a second at the tempo and the metre.
fn measures_per_second(bpm: f64, metre: f64) -> f64 {
    let measure_duration = 60.0 / bpm * 4.0 * metre;
    1.0 / measure_duration
}

/// The playback state of a chart.
#[derive(Debug, Clone)]
pub struct ChartPlayer {
    chart: Chart,
    tempo_changes: TempoChangePolicy,
    elapsed_nanos: u64,
    current_actual_measure: f64,
    current_measure: usize,
    current_bpm: f64,
    measures_per_second: f64,
    /// The measure number which `measures_per_second` was computed for.
    timed_measure: usize,
    /// The measure number and the part where the last step stopped.
    last_visit: Option<(usize, f64)>,
    entered: Option<usize>,
    finished: bool,
}

impl ChartPlayer {
    /// Prepares the playback of the chart from the start.
    #[must_use]
    pub fn new(chart: Chart, config: &PlaybackConfig) -> Self {
        let mut player = Self {
            chart,
            tempo_changes: config.tempo_changes,
            elapsed_nanos: 0,
            current_actual_measure: 0.0,
            current_measure: 0,
            current_bpm: 0.0,
            measures_per_second: 0.0,
            timed_measure: 0,
            last_visit: None,
            entered: None,
            finished: false,
        };
        player.rewind();
        player
    }

    fn rewind(&mut self) {
        let bpm = self.chart.playback_bpm();
        let metre = self.chart.measure(0).map_or(1.0, |measure| measure.metre());
        self.elapsed_nanos = 0;
        self.current_actual_measure = 0.0;
        self.current_measure = 0;
        self.current_bpm = bpm;
        self.measures_per_second = measures_per_second(bpm, metre);
        self.timed_measure = 0;
        self.last_visit = None;
        self.entered = None;
        self.finished = false;
    }

    /// Rewinds to the start for a replay, making every object triggerable again.
    pub fn reset(&mut self) {
        self.chart.deactivate_all();
        self.rewind();
    }

    /// Advances the playhead by `dt`, and submits the samples of the objects passed to the sink.
    ///
    /// Each object triggers at most once in a playthrough. An object whose sample failed to load is
    /// passed silently. A negative `dt` is treated as zero.
    pub fn step<S>(&mut self, dt: TimeSpan, sink: &S) -> Vec<PlayheadEvent>
    where
        S: SampleSink + ?Sized,
    {
        let dt_nanos = dt.as_nanos().max(0) as u64;
        self.elapsed_nanos = self.elapsed_nanos.saturating_add(dt_nanos);
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        let mut last_measure_index = self.current_actual_measure.floor() as usize;
        self.current_actual_measure += self.measures_per_second * dt_nanos as f64 / NANOS_PER_SECOND;
        let mut measure_index = self.current_actual_measure.floor() as usize;
        while matches!(self.chart.measures().get(measure_index), Some(None)) {
            self.current_actual_measure += 1.0;
            measure_index += 1;
            last_measure_index += 1;
        }
        self.sweep_left_behind(measure_index, sink, &mut events);
        if measure_index >= self.chart.measures().len() {
            self.finished = true;
            debug!(
                elapsed = ?self.elapsed(),
                measures = self.chart.total_measures(),
                "reached the end of the chart"
            );
            return events;
        }
        let part = self.current_actual_measure - measure_index as f64;

        if measure_index > last_measure_index || self.entered.is_none() {
            self.current_measure = self
                .chart
                .measures()
                .iter()
                .take(measure_index)
                .flatten()
                .count();
        }
        if self.entered != Some(self.current_measure) {
            self.entered = Some(self.current_measure);
            debug!(
                measure = measure_index,
                index = self.current_measure,
                bpm = self.current_bpm,
                "entered a measure"
            );
            events.push(PlayheadEvent {
                measure: measure_index,
                channel: ChannelId::SECTION_LEN,
                position: 0.0,
                event: ChartEvent::MeasureEntered {
                    measure: self.current_measure,
                },
            });
        }

        let previous_part = match self.last_visit {
            Some((visited, previous_part)) if visited == measure_index => Some(previous_part),
            _ => None,
        };
        self.last_visit = Some((measure_index, part));

        if self.timed_measure != measure_index {
            if let Some(measure) = self.chart.measure(measure_index) {
                self.timed_measure = measure_index;
                self.measures_per_second = measures_per_second(self.current_bpm, measure.metre());
            }
        }
        self.sweep(measure_index, previous_part, Some(part), sink, &mut events);
        events
    }

    /// Sweeps the rest of the last visited measure, when the playhead has just moved into the next present
    /// measure or past the end. Measures jumped over entirely are left untouched.
    fn sweep_left_behind<S>(&mut self, measure_index: usize, sink: &S, events: &mut Vec<PlayheadEvent>)
    where
        S: SampleSink + ?Sized,
    {
        let origin = self.last_visit.or_else(|| {
            self.chart
                .present_measures()
                .next()
                .map(|(first, _)| (first, 0.0))
        });
        let Some((visited, visited_part)) = origin else {
            return;
        };
        if visited >= measure_index {
            return;
        }
        let previous_present = self
            .chart
            .measures()
            .iter()
            .take(measure_index)
            .rposition(Option::is_some);
        if previous_present != Some(visited) {
            return;
        }
        trace!(measure = visited, from = visited_part, "sweeping the rest of the measure");
        self.sweep(visited, Some(visited_part), None, sink, events);
    }

    /// Triggers the objects of the measure from the part `from` (the start if `None`) up to the part `to`
    /// (the end if `None`).
    fn sweep<S>(
        &mut self,
        measure_index: usize,
        from: Option<f64>,
        to: Option<f64>,
        sink: &S,
        events: &mut Vec<PlayheadEvent>,
    ) where
        S: SampleSink + ?Sized,
    {
        let Some((measure, defs)) = self.chart.measure_with_defs_mut(measure_index) else {
            return;
        };
        let metre = measure.metre;

        let bgm_channels = measure
            .bgm_channels
            .iter_mut()
            .map(|channel| (ChannelId::BGM, channel));
        let other_channels = measure
            .channels
            .iter_mut()
            .map(|(&channel_id, channel)| (channel_id, channel));
        for (channel_id, channel) in bgm_channels.chain(other_channels) {
            let is_sound = channel_id.is_sound_channel();
            let is_tempo = self.tempo_changes == TempoChangePolicy::Apply
                && channel_id.kind().is_tempo_change();
            if !is_sound && !is_tempo {
                continue;
            }
            let due_index = match to {
                Some(part) => channel.due_index(part),
                None => channel.len().checked_sub(1),
            };
            let Some(due_index) = due_index else {
                continue;
            };
            let count = channel.len();
            let sweep_from = from.map_or(0, |from| {
                ((from * count as f64).floor() as usize).min(due_index)
            });

            for (k, object) in channel
                .objects
                .iter_mut()
                .enumerate()
                .take(due_index + 1)
                .skip(sweep_from)
            {
                if object.is_rest() || object.activated {
                    continue;
                }
                let position = k as f64 / count as f64;
                if is_sound {
                    let Some(pcm) = defs.sample(object.id) else {
                        continue;
                    };
                    let slot = sink.submit(pcm);
                    object.activated = true;
                    trace!(measure = measure_index, %channel_id, wav = %object.id, ?slot, "triggered");
                    events.push(PlayheadEvent {
                        measure: measure_index,
                        channel: channel_id,
                        position,
                        event: ChartEvent::Sound {
                            wav_id: object.id,
                            slot,
                        },
                    });
                    continue;
                }

                object.activated = true;
                let bpm = match channel_id.kind() {
                    ChannelKind::BpmChangeU8 => object.id.as_hex().map(f64::from),
                    ChannelKind::BpmChange => defs.bpm.get(&object.id).copied(),
                    _ => None,
                };
                let Some(bpm) = bpm.filter(|&bpm| is_valid_bpm(bpm)) else {
                    continue;
                };
                self.current_bpm = bpm;
                self.measures_per_second = measures_per_second(bpm, metre);
                debug!(measure = measure_index, bpm, "changed the tempo");
                events.push(PlayheadEvent {
                    measure: measure_index,
                    channel: channel_id,
                    position,
                    event: ChartEvent::BpmChange { bpm },
                });
            }
        }
    }

    /// Returns the chart being played.
    #[must_use]
    pub const fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Returns the index of the current measure, counted only over the present measures.
    #[must_use]
    pub const fn current_measure(&self) -> usize {
        self.current_measure
    }

    /// Returns the position in the current measure, in `[0, 1)`.
    #[must_use]
    pub fn current_measure_part(&self) -> f64 {
        self.current_actual_measure - self.current_actual_measure.floor()
    }

    /// Returns the playhead in measures, including the skipped absent measures.
    #[must_use]
    pub const fn current_actual_measure(&self) -> f64 {
        self.current_actual_measure
    }

    /// Returns the tempo in effect.
    #[must_use]
    pub const fn current_bpm(&self) -> f64 {
        self.current_bpm
    }

    /// Returns the time accumulated by the steps since the start.
    #[must_use]
    pub fn elapsed(&self) -> TimeSpan {
        TimeSpan::from_duration(Duration::from_nanos(self.elapsed_nanos))
    }

    /// Returns the lane which the channel is mapped to in the dialect of the chart.
    #[must_use]
    pub fn lane_of(&self, channel: ChannelId) -> Option<Lane> {
        self.chart.lane_of(channel)
    }

    /// Returns the dialect of the chart.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.chart.dialect()
    }

    /// Returns whether the playhead ran past the last measure.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}
