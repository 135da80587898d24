//! Mappers from channels to play lanes.
//!
//! The dialect of a chart is decided by its file extension. Each dialect has its own lane layout:
//!
//! - Beat (BMS/BME/BML) 7K per side:
//! ```text
//! |---------|----------------------|
//! |         |   [12]  [14]  [18]   |
//! |  [16]   |[11]  [13]  [15]  [19]|
//! |---------|----------------------|
//!   lane 0    lanes 1 2 3 4 5 6 7
//! ```
//!
//! - PMS 9K:
//! ```text
//! |----------------------------|
//! |   [12]  [14]  [22]  [24]   |
//! |[11]  [13]  [15]  [23]  [25]|
//! |----------------------------|
//!    lanes 0 1 2 3 4 5 6 7 8
//! ```

use std::path::Path;

use super::ChannelId;

/// A play lane, counted from the left of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane(pub u8);

impl Lane {
    /// Returns the lane number as an index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A channel layout convention of the chart family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// `.bms`, the 5 keys with scratch layout.
    #[default]
    Bms,
    /// `.bme` and `.bml`, the 7 keys with scratch layout.
    Bme,
    /// `.pms`, the 9 buttons layout.
    Pms,
}

/// Beat layout of one side, `(channel, lane)`. The lane is offset by 8 for the player 2 side.
const BEAT_LANES: [(&str, u8); 8] = [
    ("6", 0),
    ("1", 1),
    ("2", 2),
    ("3", 3),
    ("4", 4),
    ("5", 5),
    ("8", 6),
    ("9", 7),
];

/// PMS layout, `(channel, lane)`.
const POPN_LANES: [(&str, u8); 9] = [
    ("11", 0),
    ("12", 1),
    ("13", 2),
    ("14", 3),
    ("15", 4),
    ("22", 5),
    ("23", 6),
    ("24", 7),
    ("25", 8),
];

impl Dialect {
    /// Decides the dialect from a file extension, case-insensitively. Unknown extensions are [`Dialect::Bms`].
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "bme" | "bml" => Self::Bme,
            "pms" => Self::Pms,
            _ => Self::Bms,
        }
    }

    /// Decides the dialect from the extension of a chart path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Bms, Self::from_extension)
    }

    /// Returns the number of lanes on the play field.
    #[must_use]
    pub const fn lane_count(self) -> usize {
        match self {
            Self::Bms | Self::Bme => 16,
            Self::Pms => 9,
        }
    }

    /// Returns whether notes on the channel are shown on the play field.
    ///
    /// These are the visible note channels `11`-`1Z`, `21`-`2Z` and the long note channels `51`-`5Z`, `61`-`6Z`.
    /// The ranges are shared by all dialects, so a PMS chart keeps its `16`-`1Z` and `26`-`2Z` objects here even
    /// though no lane is mapped to them. Use [`LaneMap::lane_of`] to place an object on the field.
    #[must_use]
    pub const fn is_visible_channel(self, channel: ChannelId) -> bool {
        matches!(channel.as_u16(), 37..=71 | 73..=107 | 181..=215 | 217..=251)
    }

    /// Builds the lane map for this dialect.
    #[must_use]
    pub fn lane_map(self) -> LaneMap {
        let mut map = LaneMap::empty();
        match self {
            Self::Bms | Self::Bme => {
                for (visible, long, offset) in [("1", "5", 0), ("2", "6", 8)] {
                    for (key, lane) in BEAT_LANES {
                        map.insert(&format!("{visible}{key}"), Lane(lane + offset));
                        map.insert(&format!("{long}{key}"), Lane(lane + offset));
                    }
                }
            }
            Self::Pms => {
                for (channel, lane) in POPN_LANES {
                    map.insert(channel, Lane(lane));
                    // Long notes live 4 groups above the visible channels.
                    let long = ChannelId(ChannelId::from_lenient(channel).0 + 4 * 36);
                    map.lanes[long.index()] = Some(Lane(lane));
                }
            }
        }
        map
    }
}

/// A table from every channel id to its lane, built once per chart.
#[derive(Clone, PartialEq, Eq)]
pub struct LaneMap {
    lanes: [Option<Lane>; ChannelId::SPACE],
}

impl LaneMap {
    const fn empty() -> Self {
        Self {
            lanes: [None; ChannelId::SPACE],
        }
    }

    fn insert(&mut self, channel: &str, lane: Lane) {
        self.lanes[ChannelId::from_lenient(channel).index()] = Some(lane);
    }

    /// Returns the lane which the channel is mapped to, or `None` if unmapped.
    #[must_use]
    pub fn lane_of(&self, channel: ChannelId) -> Option<Lane> {
        self.lanes.get(channel.index()).copied().flatten()
    }

    /// Iterates all the mapped channels with their lanes.
    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, Lane)> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .filter_map(|(index, lane)| Some((ChannelId(index as u16), (*lane)?)))
    }
}

impl std::fmt::Debug for LaneMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
