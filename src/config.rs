//! Options for the playback, shared by [`ChartPlayer`](crate::chart_process::player::ChartPlayer) and
//! [`Mixer`](crate::mixer::Mixer).

use crate::decode::TARGET_SAMPLE_RATE;

/// How the tempo change objects on channel `03` and `08` are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TempoChangePolicy {
    /// Tempo changes are applied when the playhead reaches them.
    #[default]
    Apply,
    /// Only the initial `#BPM` is used through the whole chart.
    Ignore,
}

/// Settings of the playback.
///
/// ```
/// use bms_playback::config::{PlaybackConfig, TempoChangePolicy};
///
/// let config = PlaybackConfig::default()
///     .with_tempo_changes(TempoChangePolicy::Ignore)
///     .with_mixer_capacity(64);
/// assert_eq!(config.mixer_capacity, 64);
/// assert_eq!(config.master_volume, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Treatment of the tempo change objects.
    pub tempo_changes: TempoChangePolicy,
    /// The number of the sounds that can play at once.
    pub mixer_capacity: usize,
    /// The gain applied to the mixed sum before clipping.
    pub master_volume: f32,
    /// The rate which the samples are decoded to and the mixer is driven at.
    pub sample_rate: u32,
}

impl PlaybackConfig {
    /// The default number of mixer slots.
    pub const DEFAULT_MIXER_CAPACITY: usize = 2048;
    /// The default master volume.
    pub const DEFAULT_MASTER_VOLUME: f32 = 0.5;

    /// Sets the tempo change policy.
    #[must_use]
    pub const fn with_tempo_changes(mut self, policy: TempoChangePolicy) -> Self {
        self.tempo_changes = policy;
        self
    }

    /// Sets the number of mixer slots.
    #[must_use]
    pub const fn with_mixer_capacity(mut self, capacity: usize) -> Self {
        self.mixer_capacity = capacity;
        self
    }

    /// Sets the master volume.
    #[must_use]
    pub const fn with_master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume;
        self
    }

    /// Sets the sample rate.
    #[must_use]
    pub const fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tempo_changes: TempoChangePolicy::default(),
            mixer_capacity: Self::DEFAULT_MIXER_CAPACITY,
            master_volume: Self::DEFAULT_MASTER_VOLUME,
            sample_rate: TARGET_SAMPLE_RATE,
        }
    }
}
