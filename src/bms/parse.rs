//! Parsing Bms from the token stream.
//!
//! Tokens are applied to a [`Chart`] in the source order. Later definitions of the same id overwrite the
//! former, and a later message for the same measure and channel replaces the whole channel, except the
//! BGM channel which stacks up.

pub mod check_playing;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    bms::{
        command::{
            ObjId, Track,
            channel::{ChannelId, ChannelKind, mapper::Dialect},
            mixin::{SourceRangeMixin, SourceRangeMixinExt},
        },
        lex::{parsers::float_prefix, token::{Token, TokenWithRange}},
        model::{
            Chart,
            def::{SampleDef, VisualDef},
            obj::Channel,
        },
    },
    decode::{AudioDecoder, DecodeError, Pcm, find_with_extensions},
};

/// A warning occurred when applying the tokens into the chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    /// The message had an odd number of characters, so the last one was dropped.
    #[error("message of channel {channel} in measure {track} has an odd length, the last character is dropped")]
    OddLengthMessage {
        /// The measure of the message.
        track: Track,
        /// The channel of the message.
        channel: ChannelId,
        /// The whole message.
        message: String,
    },
    /// The metre must be a positive finite number, so it was replaced by `1.0`.
    #[error("metre {value} in measure {track} is not positive, using 1.0")]
    InvalidMetre {
        /// The measure of the metre.
        track: Track,
        /// The value read.
        value: f64,
    },
    /// The sample could not be decoded, so objects referring it will be silent.
    #[error("failed to load #WAV{id} {path:?}: {reason}")]
    DecodeFailure {
        /// The id of the definition.
        id: ObjId,
        /// The path tried to decode.
        path: PathBuf,
        /// Why the decoder failed.
        reason: String,
    },
}

/// A [`ParseWarning`] with the byte range of the command.
pub type ParseWarningWithRange = SourceRangeMixin<ParseWarning>;

/// Bms Parse Output
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// The output chart.
    pub chart: Chart,
    /// Warnings that occurred during parsing.
    pub parse_warnings: Vec<ParseWarningWithRange>,
}

impl Chart {
    /// Parses a token stream into a chart.
    ///
    /// `#WAVxx` files are resolved from `base_dir` and decoded with the decoder.
    pub fn from_token_stream<D>(
        tokens: &[TokenWithRange<'_>],
        dialect: Dialect,
        base_dir: &Path,
        decoder: &D,
    ) -> ParseOutput
    where
        D: AudioDecoder + ?Sized,
    {
        let mut chart = Self::new(dialect);
        let mut parse_warnings = vec![];
        for token in tokens {
            if let Err(warning) = chart.apply_token(token.content(), base_dir, decoder) {
                parse_warnings.push(warning.into_wrapper(token));
            }
        }
        chart.finalize();
        debug!(
            ?dialect,
            measures = chart.measures().len(),
            present = chart.total_measures(),
            samples = chart.defs.wav.len(),
            "parsed a chart"
        );
        ParseOutput {
            chart,
            parse_warnings,
        }
    }

    fn apply_token<D>(
        &mut self,
        token: &Token<'_>,
        base_dir: &Path,
        decoder: &D,
    ) -> Result<(), ParseWarning>
    where
        D: AudioDecoder + ?Sized,
    {
        match *token {
            Token::Artist(artist) => self.header.artist = Some(artist.to_string()),
            Token::Bmp(id, path) => {
                self.defs.bmp.insert(
                    id,
                    VisualDef {
                        id,
                        file_path: path.to_path_buf(),
                    },
                );
            }
            Token::Bpm(bpm) => self.header.bpm = bpm,
            Token::BpmChange(id, bpm) => {
                self.defs.bpm.insert(id, bpm);
            }
            Token::Comment(comment) => self.header.comments.push(comment.to_string()),
            Token::Genre(genre) => self.header.genre = Some(genre.to_string()),
            Token::Maker(maker) => self.header.maker = Some(maker.to_string()),
            Token::Message {
                track,
                channel,
                message,
            } => return self.apply_message(track, channel, message),
            Token::Player(player) => self.header.player = player,
            Token::PlayLevel(level) => self.header.play_level = Some(level),
            Token::Rank(rank) => self.header.rank = rank,
            Token::SubArtist(sub_artist) => self.header.sub_artists.push(sub_artist.to_string()),
            Token::SubTitle(subtitle) => self.header.subtitle = Some(subtitle.to_string()),
            Token::Text(id, text) => {
                self.defs.text.insert(id, text.to_string());
            }
            Token::Title(title) => self.header.title = Some(title.to_string()),
            Token::Total(total) => self.header.total = total,
            Token::VolWav(volume) => self.header.volwav = volume,
            Token::Wav(id, file) => {
                let (pcm, failure) = match load_sample(&base_dir.join(file), decoder) {
                    Ok(pcm) => (Some(pcm), None),
                    Err(DecodeError::Disabled) => (None, None),
                    Err(err) => {
                        warn!(%id, path = ?file, %err, "failed to decode a sample");
                        let failure = ParseWarning::DecodeFailure {
                            id,
                            path: file.to_path_buf(),
                            reason: err.to_string(),
                        };
                        (None, Some(failure))
                    }
                };
                self.defs.wav.insert(
                    id,
                    SampleDef {
                        id,
                        file_path: file.to_path_buf(),
                        pcm,
                    },
                );
                return failure.map_or(Ok(()), Err);
            }
        }
        Ok(())
    }

    fn apply_message(
        &mut self,
        track: Track,
        channel: ChannelId,
        message: &str,
    ) -> Result<(), ParseWarning> {
        let lane = self.lane_of(channel);
        let measure = self.measure_or_insert(track);
        match channel.kind() {
            ChannelKind::SectionLen => {
                let value = float_prefix(message);
                if value.is_finite() && value > 0.0 {
                    measure.metre = value;
                    return Ok(());
                }
                measure.metre = 1.0;
                return Err(ParseWarning::InvalidMetre { track, value });
            }
            ChannelKind::Bgm => measure
                .bgm_channels
                .push(Channel::from_message(message, None, false)),
            _ => {
                measure
                    .channels
                    .insert(channel, Channel::from_message(message, lane, true));
            }
        }
        if message.len() % 2 == 1 {
            return Err(ParseWarning::OddLengthMessage {
                track,
                channel,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

/// Decodes the sample, trying the extensions of the decoder if the file does not exist.
fn load_sample<D>(path: &Path, decoder: &D) -> Result<Pcm, DecodeError>
where
    D: AudioDecoder + ?Sized,
{
    let resolved = find_with_extensions(path, decoder.extensions());
    decoder.decode(resolved.as_deref().unwrap_or(path))
}

#[cfg(feature = "diagnostics")]
impl crate::diagnostics::ToAriadne for ParseWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &crate::diagnostics::SimpleSource<'a>,
    ) -> ariadne::Report<'a, (String, std::ops::Range<usize>)> {
        let color = match self.content() {
            ParseWarning::DecodeFailure { .. } => ariadne::Color::Red,
            _ => ariadne::Color::Blue,
        };
        crate::diagnostics::build_report(
            src,
            ariadne::ReportKind::Warning,
            self.range(),
            "parse",
            self.content(),
            color,
        )
    }
}
