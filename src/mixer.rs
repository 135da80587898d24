//! One-shot sample mixer with a fixed pool of slots.
//!
//! The game side submits decoded samples through [`SampleSink::submit`], and the audio callback pulls the
//! mixed stream with [`Mixer::mix_next_sample`] or [`Mixer::fill`]. Both sides may run on different threads
//! sharing an `Arc<Mixer>`.
//!
//! Each slot moves through the states:
//!
//! ```text
//! IDLE --submit--> RESERVED --filled--> ACTIVE --end of pcm--> FINISHED --next submit--> RESERVED --cleared--> IDLE
//! ```
//!
//! The audio side only advances cursors of `ACTIVE` slots and marks them `FINISHED`. It never waits for a
//! lock, and never drops a buffer: releasing the [`Pcm`] of a finished slot is done on the next submission.

use std::sync::{
    Arc,
    atomic::{AtomicU8, AtomicU32, AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use tracing::trace;

use crate::{config::PlaybackConfig, decode::Pcm};

const IDLE: u8 = 0;
const RESERVED: u8 = 1;
const ACTIVE: u8 = 2;
const FINISHED: u8 = 3;

/// The id of a mixer slot which a sample is playing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(pub usize);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot #{}", self.0)
    }
}

/// A destination of the triggered samples.
pub trait SampleSink {
    /// Starts playing the sample once. Returns `None` if it could not be played, and the sample is dropped.
    fn submit(&self, pcm: &Pcm) -> Option<SlotId>;
}

impl<T: SampleSink + ?Sized> SampleSink for Arc<T> {
    fn submit(&self, pcm: &Pcm) -> Option<SlotId> {
        (**self).submit(pcm)
    }
}

#[derive(Debug, Default)]
struct Voice {
    pcm: Option<Pcm>,
    cursor: usize,
}

#[derive(Debug, Default)]
struct Slot {
    state: AtomicU8,
    voice: Mutex<Voice>,
}

impl Slot {
    fn reclaim(&self) {
        if self
            .state
            .compare_exchange(FINISHED, RESERVED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let mut voice = self.voice.lock();
        voice.pcm = None;
        voice.cursor = 0;
        self.state.store(IDLE, Ordering::Release);
    }
}

/// The mixer of one-shot samples.
#[derive(Debug)]
pub struct Mixer {
    slots: Box<[Slot]>,
    /// One past the highest slot ever claimed, bounding the scan of the audio side.
    high_water: AtomicUsize,
    master_volume: AtomicU32,
}

impl Mixer {
    /// Instances a mixer with the number of slots, at the default master volume.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let slots = std::iter::repeat_with(Slot::default).take(capacity).collect();
        Self {
            slots,
            high_water: AtomicUsize::new(0),
            master_volume: AtomicU32::new(PlaybackConfig::DEFAULT_MASTER_VOLUME.to_bits()),
        }
    }

    /// Instances a mixer with the capacity and the volume of the config.
    #[must_use]
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let mixer = Self::new(config.mixer_capacity);
        mixer.set_master_volume(config.master_volume);
        mixer
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots playing or about to play.
    #[must_use]
    pub fn active_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.state.load(Ordering::Acquire), RESERVED | ACTIVE))
            .count()
    }

    /// Returns the gain applied to the sum.
    #[must_use]
    pub fn master_volume(&self) -> f32 {
        f32::from_bits(self.master_volume.load(Ordering::Relaxed))
    }

    /// Sets the gain applied to the sum.
    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    /// Mixes the next sample of the stream.
    ///
    /// The samples of all active slots are summed, scaled by the master volume and clipped into `[-1, 1]`. A
    /// slot whose voice is locked by the submission side is skipped for this sample.
    pub fn mix_next_sample(&self) -> f32 {
        let scan = self.high_water.load(Ordering::Acquire).min(self.slots.len());
        let mut sum = 0.0f32;
        for slot in self.slots.iter().take(scan) {
            if slot.state.load(Ordering::Acquire) != ACTIVE {
                continue;
            }
            let Some(mut voice) = slot.voice.try_lock() else {
                continue;
            };
            let Voice { pcm, cursor } = &mut *voice;
            let Some(pcm) = pcm.as_ref() else {
                continue;
            };
            if let Some(&sample) = pcm.get(*cursor) {
                sum += sample;
                *cursor += 1;
            }
            if *cursor >= pcm.len() {
                slot.state.store(FINISHED, Ordering::Release);
            }
        }
        (sum * self.master_volume()).clamp(-1.0, 1.0)
    }

    /// Fills the buffer with the consecutive mixed samples.
    pub fn fill(&self, buffer: &mut [f32]) {
        for sample in buffer {
            *sample = self.mix_next_sample();
        }
    }
}

impl SampleSink for Mixer {
    fn submit(&self, pcm: &Pcm) -> Option<SlotId> {
        if pcm.is_empty() {
            return None;
        }
        for slot in self.slots.iter() {
            slot.reclaim();
        }
        let (index, slot) = self.slots.iter().enumerate().find(|(_, slot)| {
            slot.state
                .compare_exchange(IDLE, RESERVED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })?;
        {
            let mut voice = slot.voice.lock();
            voice.pcm = Some(Arc::clone(pcm));
            voice.cursor = 0;
        }
        self.high_water.fetch_max(index + 1, Ordering::AcqRel);
        slot.state.store(ACTIVE, Ordering::Release);
        trace!(slot = index, len = pcm.len(), "submitted a sample");
        Some(SlotId(index))
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}
