//! Definitions to the key which will be referred from the object.

use std::{collections::BTreeMap, path::PathBuf};

use crate::{bms::command::ObjId, decode::Pcm};

/// A sample defined by `#WAVxx`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleDef {
    /// The id of the definition.
    pub id: ObjId,
    /// The path of the sample file, relative to the chart.
    pub file_path: PathBuf,
    /// The decoded sample. `None` if decoding failed, then the objects referring it are muted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pcm: Option<Pcm>,
}

impl SampleDef {
    /// Returns whether the sample is decoded and playable.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.pcm.is_some()
    }
}

/// An image or movie defined by `#BMPxx`. Kept for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualDef {
    /// The id of the definition.
    pub id: ObjId,
    /// The path of the image file, relative to the chart.
    pub file_path: PathBuf,
}

/// The definition tables in the score, keyed by id. Re-declaring an id overwrites the former.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definitions {
    /// `#WAVxx`.
    pub wav: BTreeMap<ObjId, SampleDef>,
    /// `#BMPxx`.
    pub bmp: BTreeMap<ObjId, VisualDef>,
    /// `#TEXTxx`.
    pub text: BTreeMap<ObjId, String>,
    /// `#BPMxx`, the tempo referred by the `08` channel.
    pub bpm: BTreeMap<ObjId, f64>,
}

impl Definitions {
    /// Returns the decoded sample of the id, if defined and loaded.
    #[must_use]
    pub fn sample(&self, id: ObjId) -> Option<&Pcm> {
        self.wav.get(&id)?.pcm.as_ref()
    }
}
