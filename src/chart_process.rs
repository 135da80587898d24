//! Playback of a parsed chart.
//!
//! [`player::ChartPlayer`] advances the playhead by the elapsed time of each game tick, and triggers the
//! sounds of the objects it passes into a [`SampleSink`](crate::mixer::SampleSink). What happened in a
//! tick is reported back as [`PlayheadEvent`]s.
//!
//! [`snapshot::project`] copies the visible objects out of a chart for the presentation layer.

pub mod player;
pub mod snapshot;

use crate::{
    bms::command::{ObjId, channel::ChannelId},
    mixer::SlotId,
};

/// What happened when the playhead passed an object.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartEvent {
    /// A sample was submitted to the sink.
    Sound {
        /// The `#WAVxx` id of the sample.
        wav_id: ObjId,
        /// The slot playing it, or `None` if the sink dropped it.
        slot: Option<SlotId>,
    },
    /// The tempo was changed.
    BpmChange {
        /// The new tempo.
        bpm: f64,
    },
    /// The playhead entered a measure.
    MeasureEntered {
        /// The index of the measure counted only over the present measures.
        measure: usize,
    },
}

/// An event located on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayheadEvent {
    /// The measure number in the source, where the event is.
    pub measure: usize,
    /// The channel where the event is. Measure entries are reported on the measure length channel `02`.
    pub channel: ChannelId,
    /// The fraction of the measure where the event is, `k/n` for the object `k` of `n`.
    pub position: f64,
    /// What happened.
    pub event: ChartEvent,
}

impl PlayheadEvent {
    /// Returns whether this is a sound trigger.
    #[must_use]
    pub const fn is_sound(&self) -> bool {
        matches!(self.event, ChartEvent::Sound { .. })
    }
}
