//! Fancy diagnostics support using `ariadne`.
//!
//! Warnings of chart loading carry the byte range of the command through `SourceRangeMixin`, so they
//! are rendered onto the chart source with the offending line highlighted. Ariadne handles the row and
//! column calculations from the byte offsets.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use std::path::Path;
//!
//! use bms_playback::{
//!     bms::{command::channel::mapper::Dialect, parse_chart},
//!     decode::NullDecoder,
//!     diagnostics::emit_bms_warnings,
//! };
//!
//! let source = "#TITLE Test\n#ARTIST Composer\n#INVALID command\n#00111:010\n";
//! let output = parse_chart(source, Dialect::Bms, Path::new("."), &NullDecoder);
//!
//! // Output all warnings
//! emit_bms_warnings("test.bms", source, &output.warnings);
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use bms_playback::diagnostics::SimpleSource;
///
/// let source_text = "#TITLE test\n#ARTIST composer\n";
/// let source = SimpleSource::new("test.bms", source_text);
/// assert_eq!(source.text(), source_text);
/// assert_eq!(source.name(), "test.bms");
/// ```
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned warnings to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert the warning to an ariadne Report on the source.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

/// Renders each `BmsWarning` onto the source to the standard error.
#[cfg(feature = "diagnostics")]
pub fn emit_bms_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::bms::BmsWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for warning in warnings {
        let report = warning.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Collect `ariadne::Report` instances for a list of `BmsWarning` without printing.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn collect_bms_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::bms::BmsWarning>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}
