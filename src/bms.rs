//! The parser module of BMS(.bms/.bme/.bml/.pms) file.
//!
//! This module consists of two phases: lexical analyzing and token parsing.
//!
//! `lex` module provides definitions of BMS tokens and a translator from string into them. Only the
//! commands needed for playback are recognized, and the others are reported as warnings and dropped.
//!
//! `parse` module applies the tokens into the [`Chart`] model, decoding the samples on the way.
//!
//! In detail, our policies are:
//!
//! - Accept UTF-8 and Shift_JIS sources, as most charts in the wild are written in Shift_JIS.
//! - Read numbers leniently: the longest valid prefix is used, and no prefix means zero.
//! - Never fail because of the content. Only a missing source file is an error.

pub mod command;
pub mod lex;
pub mod model;
pub mod parse;

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::decode::AudioDecoder;

use self::{
    command::channel::mapper::Dialect,
    lex::{LexOutput, LexWarningWithRange},
    model::Chart,
    parse::{ParseOutput, ParseWarningWithRange, check_playing::PlayingWarning},
};

/// A warning occurred when loading the chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BmsWarning {
    /// A warning comes from lexical analyzer.
    #[error("Warn: lex: {0}")]
    LexWarning(#[from] LexWarningWithRange),
    /// A warning comes from syntax parser.
    #[error("Warn: parse: {0}")]
    ParseWarning(#[from] ParseWarningWithRange),
    /// A warning for playing.
    #[error("Warn: playing: {0}")]
    PlayingWarning(#[from] PlayingWarning),
}

/// An error occurred when loading the chart file. Everything else is a [`BmsWarning`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// The chart file could not be opened or read.
    #[error("chart file {path:?} not found")]
    NotFound {
        /// The path tried to read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Output of parsing a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutput {
    /// The parsed chart.
    pub chart: Chart,
    /// Warnings that occurred during parsing.
    pub warnings: Vec<BmsWarning>,
}

/// Decodes the raw bytes of a chart: UTF-8 if valid, otherwise Shift_JIS.
#[must_use]
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
            if had_errors {
                debug!("chart source is neither valid UTF-8 nor Shift_JIS, replaced broken characters");
            }
            text
        }
    }
}

/// Loads a chart file.
///
/// The dialect is decided by the file extension, and `#WAVxx` files are resolved from the directory
/// of the chart.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] if the file could not be read.
pub fn load_chart<D>(path: impl AsRef<Path>, decoder: &D) -> Result<ChartOutput, ParseError>
where
    D: AudioDecoder + ?Sized,
{
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let source = decode_source(&bytes);
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let output = parse_chart(&source, Dialect::from_path(path), base_dir, decoder);
    debug!(
        ?path,
        title = output.chart.header.title.as_deref().unwrap_or_default(),
        warnings = output.warnings.len(),
        "loaded a chart"
    );
    Ok(output)
}

/// Parses a chart from source text.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use bms_playback::{
///     bms::{ChartOutput, command::channel::mapper::Dialect, parse_chart},
///     decode::NullDecoder,
/// };
///
/// let source = "#TITLE Test Song\n#BPM 120\n#00101:0101";
/// let ChartOutput { chart, warnings } = parse_chart(source, Dialect::Bms, Path::new("."), &NullDecoder);
/// assert_eq!(chart.header.title.as_deref(), Some("Test Song"));
/// assert_eq!(chart.header.bpm, 120.0);
/// assert!(warnings.is_empty());
/// ```
pub fn parse_chart<D>(source: &str, dialect: Dialect, base_dir: &Path, decoder: &D) -> ChartOutput
where
    D: AudioDecoder + ?Sized,
{
    let LexOutput {
        tokens,
        lex_warnings,
    } = lex::parse_lex_tokens(source);

    let ParseOutput {
        chart,
        parse_warnings,
    } = Chart::from_token_stream(&tokens, dialect, base_dir, decoder);

    let mut warnings: Vec<BmsWarning> = lex_warnings
        .into_iter()
        .map(BmsWarning::LexWarning)
        .collect();
    warnings.extend(parse_warnings.into_iter().map(BmsWarning::ParseWarning));
    warnings.extend(
        chart
            .check_playing()
            .into_iter()
            .map(BmsWarning::PlayingWarning),
    );
    // Keep the source order for lex and parse warnings.
    warnings.sort_by_key(|warning| match warning {
        BmsWarning::LexWarning(w) => w.start(),
        BmsWarning::ParseWarning(w) => w.start(),
        BmsWarning::PlayingWarning(_) => usize::MAX,
    });

    ChartOutput { chart, warnings }
}

#[cfg(feature = "diagnostics")]
impl crate::diagnostics::ToAriadne for BmsWarning {
    fn to_report<'a>(
        &self,
        src: &crate::diagnostics::SimpleSource<'a>,
    ) -> ariadne::Report<'a, (String, std::ops::Range<usize>)> {
        use crate::diagnostics::ToAriadne;

        match self {
            Self::LexWarning(warning) => warning.to_report(src),
            Self::ParseWarning(warning) => warning.to_report(src),
            Self::PlayingWarning(warning) => crate::diagnostics::build_report(
                src,
                ariadne::ReportKind::Warning,
                0..0,
                "playing",
                warning,
                ariadne::Color::Magenta,
            ),
        }
    }
}
