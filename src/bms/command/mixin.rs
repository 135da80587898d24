//! Mixin types for structures.
//!
//! - `SourceRangeMixin` attaches the byte range of the originating source text to a value.
//! - `SourceRangeMixinExt` provides shorthands to wrap any value into a `SourceRangeMixin`.

use std::ops::Range;

/// A generic wrapper that attaches the byte range in the chart source to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRangeMixin<T> {
    content: T,
    range: Range<usize>,
}

impl<T> SourceRangeMixin<T> {
    /// Instances a new `SourceRangeMixin`.
    pub const fn new(content: T, range: Range<usize>) -> Self {
        Self { content, range }
    }

    /// Returns the wrapped content.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Leans the content out of the wrapper.
    pub fn into_content(self) -> T {
        self.content
    }

    /// Returns the byte range of the source, start inclusive and end exclusive.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the start index of the source range.
    pub const fn start(&self) -> usize {
        self.range.start
    }

    /// Returns the end index of the source range.
    pub const fn end(&self) -> usize {
        self.range.end
    }

    /// Maps the content of the wrapper, keeping the range.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceRangeMixin<U> {
        SourceRangeMixin::new(f(self.content), self.range)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceRangeMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at bytes [{}, {})",
            self.content, self.range.start, self.range.end
        )
    }
}

impl<T: std::error::Error + 'static> std::error::Error for SourceRangeMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Extension methods to wrap a value into [`SourceRangeMixin`].
pub trait SourceRangeMixinExt: Sized {
    /// Wraps the value with the given byte range.
    fn into_wrapper_range(self, range: Range<usize>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, range)
    }

    /// Wraps the value with the same range as another wrapper.
    fn into_wrapper<W>(self, wrapper: &SourceRangeMixin<W>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, wrapper.range())
    }
}

impl<T> SourceRangeMixinExt for T {}
