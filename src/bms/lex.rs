//! Lexical analyzer of BMS format.
//!
//! Raw [String] == [lex](parse_lex_tokens) ==> [`TokenWithRange`]s (in [`LexOutput`]) == [parse](crate::bms::parse) ==> [`Chart`](crate::bms::model::Chart)

mod cursor;
pub(crate) mod parsers;
pub mod token;

use thiserror::Error;
use tracing::trace;

use crate::bms::command::mixin::{SourceRangeMixin, SourceRangeMixinExt};

use self::{
    cursor::Cursor,
    token::{Token, TokenWithRange},
};

/// A warning occurred when lexical analysis.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexWarning {
    /// The command starting with `#` was not recognized, so it was dropped.
    #[error("unknown command `{command}`")]
    UnknownCommand {
        /// The whole command text.
        command: String,
    },
}

/// type alias of core::result::Result<T, LexWarning>
pub(crate) type Result<T> = core::result::Result<T, LexWarning>;

/// A [`LexWarning`] with the byte range of the command.
pub type LexWarningWithRange = SourceRangeMixin<LexWarning>;

/// Lex Parsing Results, includes tokens and warnings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexOutput<'a> {
    /// tokens
    pub tokens: Vec<TokenWithRange<'a>>,
    /// warnings
    pub lex_warnings: Vec<LexWarningWithRange>,
}

/// Analyzes and converts the BMS format text into tokens.
///
/// Each line is a command starting from its first `#`. Lines without `#` are comments.
pub fn parse_lex_tokens(source: &str) -> LexOutput<'_> {
    let mut cursor = Cursor::new(source);

    let mut tokens = vec![];
    let mut lex_warnings = vec![];
    while let Some((line_range, line)) = cursor.next_line_with_range() {
        let Some(hash) = line.find('#') else {
            continue;
        };
        let command = line[hash..].trim_end();
        let start = line_range.start + hash;
        let range = start..start + command.len();
        match Token::parse(command) {
            Ok(token) => tokens.push(token.into_wrapper_range(range)),
            Err(warning) => {
                trace!(line = cursor.line(), %warning, "dropped a command");
                lex_warnings.push(warning.into_wrapper_range(range));
            }
        }
    }
    LexOutput {
        tokens,
        lex_warnings,
    }
}

#[cfg(feature = "diagnostics")]
impl crate::diagnostics::ToAriadne for LexWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &crate::diagnostics::SimpleSource<'a>,
    ) -> ariadne::Report<'a, (String, std::ops::Range<usize>)> {
        crate::diagnostics::build_report(
            src,
            ariadne::ReportKind::Warning,
            self.range(),
            "lex: command dropped",
            self.content(),
            ariadne::Color::Yellow,
        )
    }
}
