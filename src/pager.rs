//! Paginated rolling log
//!
//! A page starts with the status bar; log lines are appended below it. When
//! the next line would run past the bottom of the canvas, a fresh canvas is
//! started and the line becomes the first one on the new page.

use crate::error::{Error, Result};
use crate::graphics::{Canvas, DisplayRotation};
use crate::layout::{draw_log_line, draw_status_bar, LogLine};
use crate::panel::Panel;
use crate::status::StatusFields;
use crate::typeface::Typeface;

/// Which page the renderer is on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Only the status bar has been drawn
    Status,
    /// `lines` log lines sit below the status bar
    Log {
        /// lines on this page
        lines: usize,
    },
}

/// Page and cursor, threaded through every draw call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    /// Current page
    pub page: PageKind,
    /// Next free row
    pub cursor: u32,
}

/// Result of appending one line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// State after the line was drawn
    pub state: PageState,
    /// The page that was closed to make room for the line, if any
    ///
    /// It still holds every line drawn on it and has to be shown before the
    /// panel is cleared.
    pub finished: Option<Canvas>,
}

impl Step {
    /// A new page was started before drawing the line
    pub fn is_reset(&self) -> bool {
        self.finished.is_some()
    }
}

/// Owns the canvas of the current page
pub struct Pager<T> {
    typeface: T,
    fields: StatusFields,
    width: u32,
    height: u32,
    rotation: DisplayRotation,
    canvas: Canvas,
}

impl<T: Typeface> Pager<T> {
    /// Pager for a `width` x `height` panel (native dimensions)
    ///
    /// Nothing is drawn until [`reset`](Pager::reset).
    pub fn new(
        typeface: T,
        fields: StatusFields,
        width: u32,
        height: u32,
        rotation: DisplayRotation,
    ) -> Self {
        Pager {
            typeface,
            fields,
            width,
            height,
            rotation,
            canvas: Canvas::new(width, height, rotation),
        }
    }

    /// Pager sized for `panel`
    pub fn for_panel<P: Panel>(
        typeface: T,
        fields: StatusFields,
        panel: &P,
        rotation: DisplayRotation,
    ) -> Self {
        Self::new(typeface, fields, panel.width(), panel.height(), rotation)
    }

    /// The canvas of the current page
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Start a new page holding only the status bar
    pub fn reset(&mut self) -> Result<PageState> {
        self.start_page().map(|(state, _)| state)
    }

    // New status page, handing back the canvas it replaces
    fn start_page(&mut self) -> Result<(PageState, Canvas)> {
        let mut canvas = Canvas::new(self.width, self.height, self.rotation);
        let cursor = draw_status_bar(&mut canvas, &self.fields, &self.typeface)?;
        let previous = std::mem::replace(&mut self.canvas, canvas);
        log::info!("new page, status bar ends at y={cursor}");
        Ok((
            PageState {
                page: PageKind::Status,
                cursor,
            },
            previous,
        ))
    }

    /// Draw `line` below the last one, starting a new page if it does not fit
    pub fn append(&mut self, state: PageState, line: &LogLine) -> Result<Step> {
        let text = line.to_string();
        let line_height = self.typeface.measure(&text).height;
        let canvas_height = self.canvas.height();

        let (state, finished) = if state.cursor + line_height > canvas_height {
            if state.page == PageKind::Status {
                return Err(overflow(text, line_height, canvas_height, state.cursor));
            }
            log::info!("page full at y={}, starting over", state.cursor);
            let (state, finished) = self.start_page()?;
            if state.cursor + line_height > canvas_height {
                return Err(overflow(text, line_height, canvas_height, state.cursor));
            }
            (state, Some(finished))
        } else {
            (state, None)
        };

        let cursor = draw_log_line(&mut self.canvas, line, state.cursor, &self.typeface);
        let lines = match state.page {
            PageKind::Status => 1,
            PageKind::Log { lines } => lines + 1,
        };
        Ok(Step {
            state: PageState {
                page: PageKind::Log { lines },
                cursor,
            },
            finished,
        })
    }
}

fn overflow(text: String, height: u32, canvas_height: u32, cursor: u32) -> Error {
    Error::TextOverflow {
        text,
        height,
        available: canvas_height.saturating_sub(cursor),
    }
}
