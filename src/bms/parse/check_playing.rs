//! Check for conditions that would make this chart unplayable, or heavily affect the playing experience.

use thiserror::Error;

use crate::bms::model::{Chart, DEFAULT_BPM};

/// Warnings for playing, which would not make this chart unplayable.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayingWarning {
    /// The `#BPM` is not a positive finite number, so the playback uses the default tempo.
    #[error("The `#BPM` {0} is not positive, the default 130 is used instead.")]
    InvalidBpm(f64),
    /// There is no measure to play.
    #[error("There is no measures.")]
    NoMeasures,
}

impl Chart {
    /// Returns the tempo which the playback starts at.
    #[must_use]
    pub fn playback_bpm(&self) -> f64 {
        if is_valid_bpm(self.header.bpm) {
            self.header.bpm
        } else {
            DEFAULT_BPM
        }
    }

    /// Check for playing warnings based on the parsed chart.
    pub(crate) fn check_playing(&self) -> Vec<PlayingWarning> {
        let mut warnings = Vec::new();
        if !is_valid_bpm(self.header.bpm) {
            warnings.push(PlayingWarning::InvalidBpm(self.header.bpm));
        }
        if self.total_measures() == 0 {
            warnings.push(PlayingWarning::NoMeasures);
        }
        warnings
    }
}

pub(crate) fn is_valid_bpm(bpm: f64) -> bool {
    bpm.is_finite() && bpm > 0.0
}
