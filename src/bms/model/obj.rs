//! Definitions of the objects placed on measures.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::bms::command::{
    ObjId,
    channel::{ChannelId, mapper::Lane},
};

/// An object placed at a fraction of a measure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    /// The id of the object, `00` is a rest.
    pub id: ObjId,
    /// The vertical position in the measure for rendering, `1.0` at the start and decreasing to the end.
    pub y_position: f64,
    /// The lane where the note is on, `None` if the channel is not mapped to a lane.
    pub lane: Option<Lane>,
    /// Whether the object is shown on the play field.
    pub visible: bool,
    pub(crate) activated: bool,
}

impl Object {
    /// Returns whether the object is a rest, which never triggers nor shows.
    #[must_use]
    pub const fn is_rest(&self) -> bool {
        self.id.is_null()
    }

    /// Returns whether the object was already triggered in this playthrough.
    #[must_use]
    pub const fn is_activated(&self) -> bool {
        self.activated
    }
}

/// A sequence of objects in a measure, evenly spaced. The object `k` of `n` is at the fraction `k/n`.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    pub(crate) objects: Vec<Object>,
}

impl Channel {
    /// Builds objects from the pairs of a message. A trailing unpaired character is ignored.
    ///
    /// BGM channels pass `shown = false` so that no object on them becomes visible.
    pub(crate) fn from_message(message: &str, lane: Option<Lane>, shown: bool) -> Self {
        let objects = message
            .bytes()
            .tuples()
            .map(|(hi, lo)| {
                let id = ObjId::from_ascii_pair(hi, lo);
                Object {
                    id,
                    y_position: 0.0,
                    lane,
                    visible: shown && !id.is_null(),
                    activated: false,
                }
            })
            .collect();
        Self { objects }
    }

    /// Returns the objects in order.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Returns the number of objects, including rests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns whether there is no object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the index of the object due at the fraction of the measure, `0 <= part < 1`.
    #[must_use]
    pub fn due_index(&self, part: f64) -> Option<usize> {
        let last = self.objects.len().checked_sub(1)?;
        Some(((part * self.objects.len() as f64).floor().max(0.0) as usize).min(last))
    }

    pub(crate) fn assign_positions(&mut self) {
        let n = self.objects.len() as f64;
        for (k, object) in self.objects.iter_mut().enumerate() {
            object.y_position = 1.0 - k as f64 / n;
        }
    }

    pub(crate) fn deactivate(&mut self) {
        for object in &mut self.objects {
            object.activated = false;
        }
    }
}

/// A measure, or bar, of the score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    pub(crate) channels: BTreeMap<ChannelId, Channel>,
    pub(crate) bgm_channels: Vec<Channel>,
    pub(crate) metre: f64,
}

impl Default for Measure {
    fn default() -> Self {
        Self {
            channels: BTreeMap::new(),
            bgm_channels: Vec::new(),
            metre: 1.0,
        }
    }
}

impl Measure {
    /// Returns the channels except the BGM, in the channel order.
    #[must_use]
    pub const fn channels(&self) -> &BTreeMap<ChannelId, Channel> {
        &self.channels
    }

    /// Returns the channel, if defined in this measure.
    #[must_use]
    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(&id)
    }

    /// Returns the BGM channels. Each `01` line adds an independent channel.
    #[must_use]
    pub fn bgm_channels(&self) -> &[Channel] {
        &self.bgm_channels
    }

    /// Returns the length of the measure relative to 4/4.
    #[must_use]
    pub const fn metre(&self) -> f64 {
        self.metre
    }

    pub(crate) fn channels_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.bgm_channels.iter_mut().chain(self.channels.values_mut())
    }
}
