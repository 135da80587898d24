//! Tests for `bms_playback::chart_process`.

mod player;
mod tempo;

use std::{path::Path, sync::Mutex};

use bms_playback::{
    bms::{command::channel::mapper::Dialect, model::Chart, parse_chart},
    chart_process::{ChartEvent, PlayheadEvent},
    decode::{AudioDecoder, DecodeError, Pcm},
    mixer::{SampleSink, SlotId},
};

/// Decodes every sample into a constant tone, except the files named `dead`.
pub struct ToneDecoder;

impl AudioDecoder for ToneDecoder {
    fn decode(&self, path: &Path) -> Result<Pcm, DecodeError> {
        if path.file_stem().is_some_and(|stem| stem == "dead") {
            return Err(DecodeError::Empty);
        }
        Ok(vec![0.1; 4096].into())
    }
}

/// A sink accepting everything, remembering how many samples were submitted.
#[derive(Default)]
pub struct Recorder(Mutex<usize>);

impl Recorder {
    pub fn count(&self) -> usize {
        *self.0.lock().unwrap()
    }
}

impl SampleSink for Recorder {
    fn submit(&self, _pcm: &Pcm) -> Option<SlotId> {
        let mut count = self.0.lock().unwrap();
        *count += 1;
        Some(SlotId(*count - 1))
    }
}

pub fn load(source: &str) -> Chart {
    parse_chart(source, Dialect::Bms, Path::new("."), &ToneDecoder).chart
}

pub fn sounds(events: &[PlayheadEvent]) -> Vec<&PlayheadEvent> {
    events
        .iter()
        .filter(|event| matches!(event.event, ChartEvent::Sound { .. }))
        .collect()
}
