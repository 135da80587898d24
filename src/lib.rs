//! BMS chart ingestion and playback timing.
//!
//! This crate loads rhythm-game charts of the BMS family (`.bms`, `.bme`, `.bml` and `.pms`) and drives
//! them in real time:
//!
//! - [`bms`] parses the line-oriented chart text into a [`Chart`](bms::model::Chart), resolving the
//!   channel dialect and decoding the sample definitions through an [`AudioDecoder`](decode::AudioDecoder).
//! - [`chart_process`] provides the [`ChartPlayer`](chart_process::player::ChartPlayer), which maps elapsed
//!   time onto the fractional measure position and triggers objects exactly once, and the snapshot
//!   projector building a render-ready copy of the visible notes.
//! - [`mixer`] is the bounded pool of one-shot sample slots, safe to drive from an audio callback.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use bms_playback::{
//!     bms::{ChartOutput, command::channel::mapper::Dialect, parse_chart},
//!     chart_process::{player::ChartPlayer, snapshot::project},
//!     config::PlaybackConfig,
//!     decode::NullDecoder,
//!     mixer::Mixer,
//! };
//! use gametime::TimeSpan;
//!
//! let source = "#TITLE Test\n#BPM 120\n#00111:0102\n";
//! let ChartOutput { chart, warnings } =
//!     parse_chart(source, Dialect::Bms, Path::new("."), &NullDecoder);
//! assert!(warnings.is_empty());
//! assert_eq!(project(&chart).len(), 1);
//!
//! let config = PlaybackConfig::default();
//! let mixer = Mixer::from_config(&config);
//! let mut player = ChartPlayer::new(chart, &config);
//! let _events = player.step(TimeSpan::MILLISECOND * 16, &mixer);
//! assert_eq!(player.current_bpm(), 120.0);
//! ```
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bms;
pub mod chart_process;
pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod mixer;
