//! Header information and measures from a parsed chart.

pub mod def;
pub mod obj;

use crate::bms::command::{
    ObjId, PlayerMode, Track,
    channel::{ChannelId, mapper::{Dialect, Lane, LaneMap}},
};

use self::{def::Definitions, obj::Measure};

/// The tempo used when the score does not declare a valid `#BPM`.
pub const DEFAULT_BPM: f64 = 130.0;
/// The gauge total used when the score does not declare `#TOTAL`.
pub const DEFAULT_TOTAL: f64 = 160.0;

/// A header of the score, including the information that is usually used in music selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// The play style of the score.
    pub player: PlayerMode,
    /// The genre of the score.
    pub genre: Option<String>,
    /// The title of the score.
    pub title: Option<String>,
    /// The subtitle of the score.
    pub subtitle: Option<String>,
    /// The artist of the music in the score.
    pub artist: Option<String>,
    /// The co-artists of the music in the score.
    pub sub_artists: Vec<String>,
    /// Who placed the notes into the score.
    pub maker: Option<String>,
    /// The text messages of the score.
    pub comments: Vec<String>,
    /// The initial tempo of the score.
    pub bpm: f64,
    /// The play level of the score.
    pub play_level: Option<u32>,
    /// The judgement level of the score.
    pub rank: i64,
    /// The total gauge percentage when all notes is got as PERFECT.
    pub total: f64,
    /// The relative volume percentage of the sounds.
    pub volwav: f64,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            player: PlayerMode::default(),
            genre: None,
            title: None,
            subtitle: None,
            artist: None,
            sub_artists: Vec::new(),
            maker: None,
            comments: Vec::new(),
            bpm: DEFAULT_BPM,
            play_level: None,
            rank: 0,
            total: DEFAULT_TOTAL,
            volwav: 100.0,
        }
    }
}

/// A score data aggregate of BMS format.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// The header data in the score.
    pub header: Header,
    /// The definition tables in the score.
    pub defs: Definitions,
    measures: Vec<Option<Measure>>,
    dialect: Dialect,
    lane_map: LaneMap,
    total_measures: usize,
}

impl Chart {
    /// Instances an empty chart of the dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            header: Header::default(),
            defs: Definitions::default(),
            measures: Vec::new(),
            dialect,
            lane_map: dialect.lane_map(),
            total_measures: 0,
        }
    }

    /// Returns the dialect which the channels were read in.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the lane map of the dialect.
    #[must_use]
    pub const fn lane_map(&self) -> &LaneMap {
        &self.lane_map
    }

    /// Returns the lane which the channel is mapped to.
    #[must_use]
    pub fn lane_of(&self, channel: ChannelId) -> Option<Lane> {
        self.lane_map.lane_of(channel)
    }

    /// Returns the sparse measure list, indexed by the measure number. `None` is a measure never referred.
    #[must_use]
    pub fn measures(&self) -> &[Option<Measure>] {
        &self.measures
    }

    /// Returns the measure of the number, if present.
    #[must_use]
    pub fn measure(&self, index: usize) -> Option<&Measure> {
        self.measures.get(index)?.as_ref()
    }

    /// Iterates the present measures with their numbers.
    pub fn present_measures(&self) -> impl Iterator<Item = (usize, &Measure)> {
        self.measures
            .iter()
            .enumerate()
            .filter_map(|(index, measure)| Some((index, measure.as_ref()?)))
    }

    /// Returns the number of present measures.
    #[must_use]
    pub const fn total_measures(&self) -> usize {
        self.total_measures
    }

    /// Returns the decoded sample of the id, if defined and loaded.
    #[must_use]
    pub fn sample(&self, id: ObjId) -> Option<&crate::decode::Pcm> {
        self.defs.sample(id)
    }

    /// Returns the measure of the number for mutation, along with the definitions to resolve its objects.
    pub(crate) fn measure_with_defs_mut(&mut self, index: usize) -> Option<(&mut Measure, &Definitions)> {
        let measure = self.measures.get_mut(index)?.as_mut()?;
        Some((measure, &self.defs))
    }

    /// Returns the measure of the track, creating it and the absent ones before it.
    pub(crate) fn measure_or_insert(&mut self, track: Track) -> &mut Measure {
        let index = track.index();
        if self.measures.len() <= index {
            self.measures.resize_with(index + 1, || None);
        }
        self.measures[index].get_or_insert_with(Measure::default)
    }

    /// Fixes the derived values after all commands are applied.
    pub(crate) fn finalize(&mut self) {
        for measure in self.measures.iter_mut().flatten() {
            for channel in measure.channels_mut() {
                channel.assign_positions();
            }
        }
        self.total_measures = self.measures.iter().flatten().count();
    }

    /// Clears the trigger marks of all objects for a replay.
    pub(crate) fn deactivate_all(&mut self) {
        for measure in self.measures.iter_mut().flatten() {
            for channel in measure.channels_mut() {
                channel.deactivate();
            }
        }
    }
}
