//! Copies of the visible objects for rendering the play field.

use crate::bms::{
    command::channel::ChannelId,
    model::{Chart, obj::Object},
};

/// The visible objects on a channel of a measure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotChannel {
    /// The channel in the source.
    pub channel: ChannelId,
    /// The visible objects in order, each carrying its lane and vertical position.
    pub objects: Vec<Object>,
}

/// The visible channels of a measure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotMeasure {
    /// The measure number in the source.
    pub measure: usize,
    /// The length of the measure relative to 4/4.
    pub metre: f64,
    /// The note channels of the dialect in the channel order. A channel may have no object.
    pub channels: Vec<SnapshotChannel>,
}

/// Projects the chart into the measures to render, one for each present measure in order.
///
/// ```
/// use std::path::Path;
///
/// use bms_playback::{
///     bms::{command::channel::mapper::Dialect, parse_chart},
///     chart_process::snapshot::project,
///     decode::NullDecoder,
/// };
///
/// let chart = parse_chart("#00011:0100\n#00201:01\n", Dialect::Bms, Path::new("."), &NullDecoder).chart;
/// let snapshot = project(&chart);
/// assert_eq!(snapshot.len(), 2);
/// assert_eq!(snapshot[0].channels[0].objects.len(), 1);
/// assert!(snapshot[1].channels.is_empty());
/// ```
#[must_use]
pub fn project(chart: &Chart) -> Vec<SnapshotMeasure> {
    let dialect = chart.dialect();
    chart
        .present_measures()
        .map(|(number, measure)| SnapshotMeasure {
            measure: number,
            metre: measure.metre(),
            channels: measure
                .channels()
                .iter()
                .filter(|(channel, _)| dialect.is_visible_channel(**channel))
                .map(|(&channel, objects)| SnapshotChannel {
                    channel,
                    objects: objects
                        .objects()
                        .iter()
                        .filter(|object| object.visible)
                        .copied()
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
