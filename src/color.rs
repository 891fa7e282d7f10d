//! B/W and tri-color types for use with embedded-graphics

use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor};

/// Color of a single plane
///
/// Planes store one bit per pixel, 1 is white (light), 0 is ink.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Ink
    Black,
    /// Paper
    White,
}

impl Color {
    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(&self) -> u8 {
        match self {
            Color::White => 0xff,
            Color::Black => 0x00,
        }
    }

    /// Whether the bit for this color is set in a plane
    pub fn is_light(&self) -> bool {
        matches!(self, Color::White)
    }
}

impl PixelColor for Color {
    type Raw = ();
}

impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

/// Colors of a black/white/accent panel
///
/// The accent shows red or yellow depending on the panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TriColor {
    /// Ink on the primary plane
    Black,
    /// Paper on both planes
    White,
    /// Ink on the secondary plane
    Chromatic,
}

impl TriColor {
    /// Colors written to the (primary, secondary) planes for this pixel
    ///
    /// The accent takes precedence on the panel, so the primary plane is left
    /// light underneath it.
    pub fn plane_colors(&self) -> (Color, Color) {
        match self {
            TriColor::Black => (Color::Black, Color::White),
            TriColor::White => (Color::White, Color::White),
            TriColor::Chromatic => (Color::White, Color::Black),
        }
    }
}

impl PixelColor for TriColor {
    type Raw = ();
}

impl From<BinaryColor> for TriColor {
    fn from(b: BinaryColor) -> TriColor {
        match b {
            BinaryColor::On => TriColor::Black,
            BinaryColor::Off => TriColor::White,
        }
    }
}
