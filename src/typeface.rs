//! Text measurement and drawing

use crate::color::TriColor;
use crate::graphics::Canvas;
use embedded_graphics::{
    mono_font::{ascii::FONT_5X8, MonoFont, MonoTextStyle},
    prelude::*,
    text::{renderer::TextRenderer, Alignment, Baseline, Text, TextStyleBuilder},
};

/// Where the draw position sits relative to the rendered text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Position is the top left corner
    #[default]
    LeftTop,
    /// Position is the middle of the top edge
    MiddleTop,
    /// Position is the top right corner
    RightTop,
}

impl Anchor {
    fn alignment(self) -> Alignment {
        match self {
            Anchor::LeftTop => Alignment::Left,
            Anchor::MiddleTop => Alignment::Center,
            Anchor::RightTop => Alignment::Right,
        }
    }
}

/// The text collaborator of the renderer
pub trait Typeface {
    /// Rendered (width, height) of `text`
    fn measure(&self, text: &str) -> Size;

    /// Draw `text` on the canvas
    fn draw(&self, canvas: &mut Canvas, position: Point, text: &str, anchor: Anchor, color: TriColor);
}

/// Monospace bitmap font from embedded-graphics
#[derive(Clone, Copy)]
pub struct MonoTypeface {
    font: &'static MonoFont<'static>,
}

impl MonoTypeface {
    /// Typeface using `font`
    pub const fn new(font: &'static MonoFont<'static>) -> Self {
        MonoTypeface { font }
    }

    fn style(&self, color: TriColor) -> MonoTextStyle<'static, TriColor> {
        MonoTextStyle::new(self.font, color)
    }
}

impl Default for MonoTypeface {
    /// 5x8 cells, the size the status bar was designed around
    fn default() -> Self {
        MonoTypeface::new(&FONT_5X8)
    }
}

impl core::fmt::Debug for MonoTypeface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MonoTypeface")
            .field("character_size", &self.font.character_size)
            .finish()
    }
}

impl Typeface for MonoTypeface {
    fn measure(&self, text: &str) -> Size {
        self.style(TriColor::Black)
            .measure_string(text, Point::zero(), Baseline::Top)
            .bounding_box
            .size
    }

    fn draw(&self, canvas: &mut Canvas, position: Point, text: &str, anchor: Anchor, color: TriColor) {
        let text_style = TextStyleBuilder::new()
            .baseline(Baseline::Top)
            .alignment(anchor.alignment())
            .build();

        let _ = Text::with_text_style(text, position, self.style(color), text_style).draw(canvas);
    }
}
