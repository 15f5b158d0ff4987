//! Staging editor: a multi-line input that commits its lines as a batch.
//!
//! [`StagedInput`] owns the pending (uncommitted) text through an embedded
//! [`TextArea`] surface, a commit callback, and the coalesced resize state.
//! Hosts route key events in via [`StagedInput::handle_key_event`], reserve
//! [`StagedInput::desired_height`] rows for it each frame, and deliver the
//! debouncer's flushes to [`StagedInput::apply_resize`].
//!
//! The surface's visible height is *retained* state: it only changes when a
//! coalesced resize lands, so rapid input does not recompute layout on every
//! keystroke. Growth is bounded by the optional max-rows configuration;
//! content taller than the bound scrolls inside the surface instead.

use std::time::Duration;

use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use tui_textarea::Input;
use tui_textarea::Key;
use tui_textarea::TextArea;

use crate::debounce::Debouncer;
use crate::line_metrics;
use crate::line_metrics::LineMetrics;
use crate::line_metrics::MeasureFn;

/// Quiescence window for coalesced resizes.
pub const RESIZE_QUIET_WINDOW: Duration = Duration::from_millis(200);
/// Upper bound on resize delay under continuous input.
pub const RESIZE_MAX_WAIT: Duration = Duration::from_millis(400);

/// Minimum number of visible content rows inside the surface.
const MIN_VISIBLE_ROWS: u16 = 1;
/// Rows consumed by the surface border.
const BORDER_LINES: u16 = 2;
/// Rows consumed by the commit-control footer.
const FOOTER_LINES: u16 = 1;

/// Callback invoked with the staged lines at commit time.
pub type CommitCallback = Box<dyn FnMut(Vec<String>) + Send>;

/// Host-supplied configuration. Every field is optional; absence means
/// "no constraint" / "empty" / "no-op".
#[derive(Default)]
pub struct StagedInputConfig {
    /// Bound on the maximum visible content rows before the surface scrolls
    /// internally rather than growing further.
    pub max_rows: Option<u16>,
    /// Initial content, joined by newline.
    pub preset_values: Option<Vec<String>>,
    /// Invoked synchronously with the split lines at commit time.
    pub on_commit: Option<CommitCallback>,
}

pub struct StagedInput {
    textarea: TextArea<'static>,
    max_rows: Option<u16>,
    on_commit: Option<CommitCallback>,
    /// Cached line metrics: measured on first resize, then held for the
    /// widget's lifetime even if the true rendered line height later changes.
    line_metrics: Option<LineMetrics>,
    measure: MeasureFn,
    /// Committed visible height, in oracle units. Mutated only by
    /// [`Self::apply_resize`].
    height: u16,
    max_height: Option<u16>,
    resize_debounce: Debouncer,
    has_focus: bool,
}

impl StagedInput {
    pub fn new(config: StagedInputConfig, resize_debounce: Debouncer) -> Self {
        let StagedInputConfig {
            max_rows,
            preset_values,
            on_commit,
        } = config;

        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("one item per line");
        textarea.set_cursor_line_style(Style::default());
        if let Some(values) = &preset_values {
            let _ = textarea.insert_str(values.join("\n"));
        }

        let mut this = Self {
            textarea,
            max_rows,
            on_commit,
            line_metrics: None,
            measure: line_metrics::measure,
            height: MIN_VISIBLE_ROWS,
            max_height: None,
            resize_debounce,
            has_focus: true,
        };
        this.update_border();
        // Initial sizing pass: content supplied at mount must not wait for
        // the first keystroke.
        this.resize_debounce.call();
        this
    }

    /// Replace the pending text with the supplied lines, joined by newline.
    ///
    /// The call itself is the "new sequence" signal: each call re-derives the
    /// pending text even if the values are unchanged. No commit callback or
    /// other notification fires from this path.
    pub fn set_preset_values(&mut self, values: &[String]) {
        self.set_pending_text(values.join("\n"));
        self.resize_debounce.call();
    }

    /// The uncommitted, newline-joined contents of the editor.
    pub fn pending_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Replace the entire editor contents with `text` in place, preserving the
    /// surface's block, placeholder, and cursor styling.
    fn set_pending_text(&mut self, text: String) {
        self.textarea.select_all();
        self.textarea.cut();
        let _ = self.textarea.insert_str(text);
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.is_empty()
    }

    pub fn set_input_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
        self.update_border();
    }

    /// Replace the line-metrics oracle queried on the first resize.
    ///
    /// Only meaningful before metrics are cached; once measured they are held
    /// for the widget's lifetime.
    pub fn set_line_metrics_probe(&mut self, probe: MeasureFn) {
        self.measure = probe;
    }

    /// Route a key event to the editor.
    ///
    /// Every press schedules a coalesced resize, including navigation and
    /// deletion keys whose visual effect can precede a content change.
    /// Returns true when the event was consumed and a redraw is warranted.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        if key_event.kind == KeyEventKind::Release {
            return false;
        }
        self.resize_debounce.call();
        let input: Input = key_event.into();
        match input {
            Input {
                key: Key::Char('d'),
                ctrl: true,
                alt: false,
                shift: false,
            } => {
                self.commit();
            }
            Input {
                key: Key::Enter, ..
            }
            | Input {
                key: Key::Char('j'),
                ctrl: true,
                alt: false,
                shift: false,
            } => {
                self.textarea.insert_newline();
            }
            input => {
                self.textarea.input(input);
            }
        }
        true
    }

    /// Finalize the staged lines as a batch of discrete items.
    ///
    /// The pending text is split on newline (blank lines included; empty
    /// input yields one empty item), handed to the commit callback when one
    /// is configured, and the editor is cleared. A coalesced resize is
    /// scheduled so the surface shrinks back to its empty height.
    pub fn commit(&mut self) {
        let items = self.textarea.lines().to_vec();
        tracing::debug!(count = items.len(), "committing staged lines");
        if let Some(on_commit) = self.on_commit.as_mut() {
            on_commit(items);
        }
        self.set_pending_text(String::new());
        self.resize_debounce.call();
    }

    /// Recompute the retained height bounds from the current content.
    ///
    /// This is the coalesced target: hosts call it when the debouncer fires,
    /// not on every keystroke. Growth and shrinkage both land here.
    pub fn apply_resize(&mut self) {
        let metrics = self.fetch_line_metrics();
        self.max_height = self
            .max_rows
            .map(|rows| rows.saturating_mul(metrics.line_height));
        let content_rows = (self.textarea.lines().len() as u16).max(MIN_VISIBLE_ROWS);
        let natural = content_rows.saturating_mul(metrics.line_height);
        self.height = match self.max_height {
            Some(max) => natural.min(max),
            None => natural,
        };
        tracing::trace!(
            height = self.height,
            max_height = ?self.max_height,
            "resized staging editor"
        );
    }

    /// Rows the host should reserve for the widget: the committed content
    /// rows plus the border and the commit-control footer.
    pub fn desired_height(&self) -> u16 {
        self.visible_rows() + BORDER_LINES + FOOTER_LINES
    }

    /// Committed visible height, in oracle units.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Current maximum height bound, in oracle units.
    pub fn max_height(&self) -> Option<u16> {
        self.max_height
    }

    /// Compute-if-absent accessor for the cached line metrics.
    fn fetch_line_metrics(&mut self) -> LineMetrics {
        *self
            .line_metrics
            .get_or_insert_with(|| (self.measure)(&self.textarea))
    }

    fn visible_rows(&self) -> u16 {
        let line_height = self.line_metrics.map_or(1, |m| m.line_height.max(1));
        (self.height / line_height).max(MIN_VISIBLE_ROWS)
    }

    fn commit_ready(&self) -> bool {
        !self.textarea.is_empty()
    }

    fn footer_line(&self) -> Line<'static> {
        let newline_hint = "  ·  Enter newline".dim();
        if self.commit_ready() {
            let staged = self.textarea.lines().len();
            let plural = if staged == 1 { "" } else { "s" };
            Line::from(vec![
                format!(" Ctrl+D add {staged} item{plural}").cyan().bold(),
                newline_hint,
            ])
        } else {
            Line::from(vec![" Ctrl+D add".dim(), newline_hint])
        }
    }

    fn update_border(&mut self) {
        let border_style = if self.has_focus {
            Style::default()
        } else {
            Style::default().dim()
        };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
    }
}

impl Widget for &StagedInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [surface_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(FOOTER_LINES)]).areas(area);
        self.textarea.render(surface_area, buf);
        self.footer_line().render(footer_area, buf);
    }
}
