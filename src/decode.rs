//! Decoding of the sample files referred by `#WAVxx`.
//!
//! Samples are decoded once at load into [`Pcm`], interleaved stereo `f32` frames at the mixer rate, and
//! shared by the chart and the mixer without copying.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

/// Decoded sample data, interleaved stereo at [`TARGET_SAMPLE_RATE`] unless configured otherwise.
pub type Pcm = Arc<[f32]>;

/// The sample rate which the mixer runs at.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// An error occurred when decoding a sample file. It never aborts a chart load.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be read.
    #[error("failed to read the sample: {0}")]
    Io(#[from] std::io::Error),
    /// The WAV container or its data is malformed.
    #[cfg(feature = "wav")]
    #[error("failed to decode the wave file: {0}")]
    Wav(#[from] hound::Error),
    /// Only mono and stereo sources can be mixed.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),
    /// The file had no sample frames.
    #[error("the sample has no frames")]
    Empty,
    /// The decoder does not load samples at all.
    #[error("sample decoding is disabled")]
    Disabled,
}

/// A decoder of sample files.
pub trait AudioDecoder {
    /// Decodes the file at the path into interleaved stereo PCM.
    fn decode(&self, path: &Path) -> Result<Pcm, DecodeError>;

    /// Extensions tried in order when the referred file does not exist.
    fn extensions(&self) -> &[&str] {
        &[]
    }
}

impl<T: AudioDecoder + ?Sized> AudioDecoder for &T {
    fn decode(&self, path: &Path) -> Result<Pcm, DecodeError> {
        (**self).decode(path)
    }

    fn extensions(&self) -> &[&str] {
        (**self).extensions()
    }
}

/// A decoder which loads nothing, for reading only the metadata of charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDecoder;

impl AudioDecoder for NullDecoder {
    fn decode(&self, _path: &Path) -> Result<Pcm, DecodeError> {
        Err(DecodeError::Disabled)
    }
}

/// Finds the file at the path, or the same stem with one of the extensions.
///
/// Charts often refer `.wav` files while the package ships other formats or cases. Returns `None` if
/// none exists.
#[must_use]
pub fn find_with_extensions(path: &Path, extensions: &[&str]) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    extensions
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Resamples one channel linearly from `src_rate` to `dst_rate`.
#[must_use]
pub fn resample_linear(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() || src_rate == 0 || dst_rate == 0 {
        return samples.to_vec();
    }
    let ratio = f64::from(src_rate) / f64::from(dst_rate);
    let output_len = (samples.len() as f64 / ratio) as usize;
    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 * ratio;
            let src_idx = src_pos as usize;
            let frac = (src_pos - src_idx as f64) as f32;
            match (samples.get(src_idx), samples.get(src_idx + 1)) {
                (Some(&a), Some(&b)) => a + (b - a) * frac,
                (Some(&a), None) => a,
                _ => samples.last().copied().unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(feature = "wav")]
pub use self::wav::WavDecoder;

#[cfg(feature = "wav")]
mod wav {
    use std::path::Path;

    use hound::{SampleFormat, WavReader};
    use itertools::Itertools;
    use tracing::trace;

    use super::{AudioDecoder, DecodeError, Pcm, TARGET_SAMPLE_RATE, resample_linear};

    /// Converts planar channels of the same length into interleaved stereo.
    fn interleave_stereo(left: &[f32], right: &[f32]) -> Pcm {
        left.iter()
            .zip(right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// A decoder of RIFF wave files by [`hound`].
    ///
    /// Only PCM and float wave files are read. A reference whose file is missing falls back to the same stem
    /// with `.wav` or `.WAV`, so a sample shipped as `.ogg` or `.flac` stays unloaded and is reported as a
    /// decode failure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WavDecoder {
        target_rate: u32,
    }

    impl Default for WavDecoder {
        fn default() -> Self {
            Self::new(TARGET_SAMPLE_RATE)
        }
    }

    impl WavDecoder {
        /// Instances a decoder which outputs at the sample rate.
        #[must_use]
        pub const fn new(target_rate: u32) -> Self {
            Self { target_rate }
        }

        /// Instances a decoder which outputs at the rate the mixer is driven at.
        #[must_use]
        pub const fn from_config(config: &crate::config::PlaybackConfig) -> Self {
            Self::new(config.sample_rate)
        }

        /// Returns the sample rate of the output.
        #[must_use]
        pub const fn target_rate(&self) -> u32 {
            self.target_rate
        }
    }

    impl AudioDecoder for WavDecoder {
        fn decode(&self, path: &Path) -> Result<Pcm, DecodeError> {
            let mut reader = WavReader::open(path)?;
            let spec = reader.spec();
            if !(1..=2).contains(&spec.channels) {
                return Err(DecodeError::UnsupportedChannels(spec.channels));
            }

            let samples: Vec<f32> = match spec.sample_format {
                SampleFormat::Int if spec.bits_per_sample <= 8 => reader
                    .samples::<i8>()
                    .map_ok(|s| f32::from(s) / 128.0)
                    .collect::<Result<_, _>>()?,
                SampleFormat::Int if spec.bits_per_sample <= 16 => reader
                    .samples::<i16>()
                    .map_ok(|s| f32::from(s) / 32_768.0)
                    .collect::<Result<_, _>>()?,
                SampleFormat::Int => {
                    let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                    reader
                        .samples::<i32>()
                        .map_ok(|s| s as f32 / scale)
                        .collect::<Result<_, _>>()?
                }
                SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            };
            if samples.len() < usize::from(spec.channels) {
                return Err(DecodeError::Empty);
            }

            let (left, right): (Vec<f32>, Vec<f32>) = if spec.channels == 1 {
                (samples.clone(), samples)
            } else {
                samples.iter().copied().tuples::<(f32, f32)>().unzip()
            };
            let left = resample_linear(&left, spec.sample_rate, self.target_rate);
            let right = resample_linear(&right, spec.sample_rate, self.target_rate);
            if left.is_empty() {
                return Err(DecodeError::Empty);
            }
            trace!(
                ?path,
                channels = spec.channels,
                from = spec.sample_rate,
                to = self.target_rate,
                frames = left.len(),
                "decoded a sample"
            );
            Ok(interleave_stereo(&left, &right))
        }

        fn extensions(&self) -> &[&str] {
            &["wav", "WAV"]
        }
    }
}
