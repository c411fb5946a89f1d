use std::ops::Range;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::palette::PaletteConfig;
use crate::config::{AppConfig, CaretPolicy};
use crate::present::input::{colorize_input, floor_char_boundary, place_caret};
use crate::present::source::source_view_text;
use crate::present::{render, Rendered};

mod paste;

pub use paste::{clean_paste, ClipboardPayload};

/// Document the input surface starts with.
pub const EXAMPLE_DOCUMENT: &str = "-Food, clothing, shelter, and more at example.org\n\n(212) 555-1234\n\nhttps://example.org|(Visit us!)\n\nage(14-24)\n\n9a-5p, 10p-6a\nemail@email.com";

pub const COPY_LABEL: &str = "Copy HTML";
pub const COPIED_LABEL: &str = "Copied!";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is unavailable")]
    Unavailable,
    #[error("clipboard rejected the write: {0}")]
    Rejected(String),
}

/// System clipboard as seen by the session.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        match arboard::Clipboard::new() {
            Ok(inner) => Ok(Self { inner }),
            Err(err) => {
                tracing::warn!(%err, "clipboard not available");
                Err(ClipboardError::Unavailable)
            }
        }
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|err| ClipboardError::Rejected(err.to_string()))
    }
}

/// Colored input surface plus where its caret should go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputView {
    pub html: String,
    pub caret: Option<usize>,
}

/// One editing session: the current input text, the outputs of the last
/// pipeline run, and the timers of the deferred run and the transient control
/// feedback. Every run re-reads the whole text and replaces both outputs.
#[derive(Debug)]
pub struct EditSession {
    text: String,
    palette: PaletteConfig,
    caret_policy: CaretPolicy,
    paste_debounce: Duration,
    copy_feedback: Duration,
    refresh_flash: Duration,
    caret: Option<usize>,
    pending_run: Option<Instant>,
    copied_until: Option<Instant>,
    flash_until: Option<Instant>,
    rendered: Rendered,
    input_view: InputView,
    runs: u64,
}

impl EditSession {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            text: String::new(),
            palette: config.palette.clone(),
            caret_policy: config.caret,
            paste_debounce: config.session.paste_debounce(),
            copy_feedback: config.session.copy_feedback(),
            refresh_flash: config.session.refresh_flash(),
            caret: None,
            pending_run: None,
            copied_until: None,
            flash_until: None,
            rendered: Rendered::default(),
            input_view: InputView::default(),
            runs: 0,
        }
    }

    /// Session pre-populated with the example document and rendered once.
    pub fn bootstrap(config: &AppConfig) -> Self {
        let mut session = Self::new(config);
        session.text = EXAMPLE_DOCUMENT.to_string();
        session.run(None);
        session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn input_view(&self) -> &InputView {
        &self.input_view
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn has_pending_run(&self) -> bool {
        self.pending_run.is_some()
    }

    /// Replace the document after a keystroke and re-render right away.
    pub fn input(&mut self, text: &str, caret: Option<usize>) {
        self.text.clear();
        self.text.push_str(text);
        self.pending_run = None;
        self.run(caret);
    }

    /// Enter inserts an explicit line break at the caret. Without a caret
    /// nothing happens. Returns the caret after the break.
    pub fn insert_line_break(&mut self, caret: Option<usize>) -> Option<usize> {
        let at = floor_char_boundary(&self.text, caret?);
        self.text.insert(at, '\n');
        let after = at + 1;
        self.pending_run = None;
        self.run(Some(after));
        Some(after)
    }

    /// Insert cleaned clipboard content over `selection` and schedule a
    /// debounced run. Any run already pending is pushed back. Without a
    /// selection the paste is dropped and nothing is scheduled.
    pub fn paste(
        &mut self,
        payload: &ClipboardPayload,
        selection: Option<Range<usize>>,
        now: Instant,
    ) -> Option<usize> {
        let selection = selection?;
        let start = floor_char_boundary(&self.text, selection.start);
        let end = floor_char_boundary(&self.text, selection.end.max(selection.start));
        let cleaned = clean_paste(payload);
        self.text.replace_range(start..end, &cleaned);
        self.caret = Some(start + cleaned.len());
        self.pending_run = Some(now + self.paste_debounce);
        tracing::debug!(inserted = cleaned.len(), "paste scheduled a render");
        self.caret
    }

    /// Run the deferred pipeline once its deadline has passed. Returns
    /// whether a run happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_run {
            Some(deadline) if now >= deadline => {
                self.pending_run = None;
                self.run(self.caret);
                true
            }
            _ => false,
        }
    }

    /// Re-run everything now and flash the refresh control.
    pub fn force_refresh(&mut self, now: Instant) {
        self.pending_run = None;
        self.run(self.caret);
        self.flash_until = Some(now + self.refresh_flash);
    }

    pub fn refresh_flash_active(&self, now: Instant) -> bool {
        self.flash_until.map(|until| now < until).unwrap_or(false)
    }

    /// Copy the visible text of the source view. Success switches the copy
    /// control to its "Copied!" label for a while; failures are not retried.
    pub fn copy_source(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        let text = source_view_text(&self.rendered.source);
        match clipboard.write_text(&text) {
            Ok(()) => {
                self.copied_until = Some(now + self.copy_feedback);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "copying source view failed");
                Err(err)
            }
        }
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        match self.copied_until {
            Some(until) if now < until => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }

    fn run(&mut self, caret: Option<usize>) {
        self.rendered = render(self.text.trim(), &self.palette);
        self.input_view = InputView {
            html: colorize_input(&self.text, &self.palette.preview),
            caret: place_caret(self.caret_policy, &self.text, caret),
        };
        self.caret = self.input_view.caret;
        self.runs += 1;
        tracing::debug!(run = self.runs, chars = self.text.len(), "rendered session");
    }
}
