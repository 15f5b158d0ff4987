//! Line-height measurement for the staging editor's input surface.
//!
//! The widget treats line height as an opaque measurement supplied by this
//! oracle: it queries once, caches the result for its lifetime, and multiplies
//! row counts by it when computing height bounds.

use tui_textarea::TextArea;

/// Measured metrics of a rendered input surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineMetrics {
    /// Height of one rendered line, in the surface's height units.
    pub line_height: u16,
}

/// Signature of a line-metrics probe.
pub type MeasureFn = fn(&TextArea<'static>) -> LineMetrics;

/// Measure the effective single-line height of the rendered surface.
///
/// The terminal surface renders each logical line on exactly one row and does
/// not soft-wrap, so the effective line height is one row regardless of
/// content or width.
pub fn measure(_surface: &TextArea<'static>) -> LineMetrics {
    LineMetrics { line_height: 1 }
}
