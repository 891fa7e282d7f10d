//! Drawing planes and the two-plane canvas

use crate::color::{Color, TriColor};
use crate::error::Result;
use crate::panel::{self, Panel};
use bit_field::BitField;
use embedded_graphics_core::prelude::*;

/// Display rotation, only 90° increments supported
///
/// This is the single orientation parameter of the renderer: the panel always
/// reports its native (unrotated) size and the canvas derives its logical size
/// from it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl DisplayRotation {
    /// Logical size of a `width` x `height` panel drawn with this rotation
    pub fn logical_size(self, width: u32, height: u32) -> Size {
        match self {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(width, height),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(height, width),
        }
    }
}

/// count the number of bytes per line knowing that it may contains padding bits
const fn line_bytes(width: u32) -> usize {
    // round to upper 8 bit count
    (width as usize + 7) / 8
}

/// Number of bytes a `width` x `height` plane occupies
pub const fn buffer_len(width: u32, height: u32) -> usize {
    line_bytes(width) * height as usize
}

/// One bit-per-pixel buffer in the panel's native orientation
///
/// Rows are padded to full bytes, the most significant bit is the leftmost
/// pixel and a set bit is white. A new plane is blank (all white).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    width: u32,
    height: u32,
    rotation: DisplayRotation,
    buffer: Vec<u8>,
}

impl Plane {
    /// Blank plane for a `width` x `height` panel (native dimensions)
    pub fn new(width: u32, height: u32, rotation: DisplayRotation) -> Self {
        Plane {
            width,
            height,
            rotation,
            buffer: vec![Color::White.get_byte_value(); buffer_len(width, height)],
        }
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Native (width, height) of the plane
    pub fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True if no pixel has been inked
    pub fn is_blank(&self) -> bool {
        let full_bytes = self.width as usize / 8;
        let rest = self.width % 8;
        self.buffer.chunks(line_bytes(self.width)).all(|row| {
            row[..full_bytes]
                .iter()
                .all(|&b| b == Color::White.get_byte_value())
                && (rest == 0 || row[full_bytes].get_bits(8 - rest as usize..8) == (1 << rest) - 1)
        })
    }

    /// Set a specific pixel color on this plane
    pub fn set_pixel(&mut self, pixel: Pixel<Color>) {
        let Pixel(point, color) = pixel;
        if let Some((index, bit)) = self.locate(point) {
            self.buffer[index].set_bit(bit, color.is_light());
        }
    }

    /// Color at a logical point, `None` outside the plane
    pub fn pixel(&self, point: Point) -> Option<Color> {
        let (index, bit) = self.locate(point)?;
        Some(if self.buffer[index].get_bit(bit) {
            Color::White
        } else {
            Color::Black
        })
    }

    // Byte index and bit number of a logical point
    fn locate(&self, point: Point) -> Option<(usize, usize)> {
        let (width, height) = (self.width as i32, self.height as i32);

        // as i32 = never use more than 2 billion pixel per line or per column
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (width - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (width - 1 - point.x, height - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, height - 1 - point.x),
        };

        if x < 0 || x >= width || y < 0 || y >= height {
            return None;
        }

        let index = x as usize / 8 + y as usize * line_bytes(self.width);
        Some((index, 7 - x as usize % 8))
    }
}

impl DrawTarget for Plane {
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }
}

impl OriginDimensions for Plane {
    fn size(&self) -> Size {
        self.rotation.logical_size(self.width, self.height)
    }
}

/// Drawing surface with a primary (black) and a secondary (accent) plane
///
/// A canvas has no identity beyond the page it belongs to: the pager replaces
/// it with a blank one whenever the status bar is redrawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    primary: Plane,
    secondary: Plane,
}

impl Canvas {
    /// Blank canvas for a panel of the given native size
    pub fn new(width: u32, height: u32, rotation: DisplayRotation) -> Self {
        Canvas {
            primary: Plane::new(width, height, rotation),
            secondary: Plane::new(width, height, rotation),
        }
    }

    /// The black plane
    pub fn primary(&self) -> &Plane {
        &self.primary
    }

    /// The accent plane
    pub fn secondary(&self) -> &Plane {
        &self.secondary
    }

    /// Logical width after rotation
    pub fn width(&self) -> u32 {
        self.size().width
    }

    /// Logical height after rotation
    pub fn height(&self) -> u32 {
        self.size().height
    }

    /// Combined color at a logical point
    pub fn pixel(&self, point: Point) -> Option<TriColor> {
        let primary = self.primary.pixel(point)?;
        let secondary = self.secondary.pixel(point)?;
        Some(match (primary, secondary) {
            (_, Color::Black) => TriColor::Chromatic,
            (Color::Black, Color::White) => TriColor::Black,
            (Color::White, Color::White) => TriColor::White,
        })
    }

    /// Repaint the whole panel with both planes
    pub fn flush_to<P: Panel>(&self, panel: &mut P) -> Result<()> {
        panel::flush(panel, Some(&self.primary), Some(&self.secondary))
    }
}

impl DrawTarget for Canvas {
    type Color = TriColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (primary, secondary) = color.plane_colors();
            self.primary.set_pixel(Pixel(point, primary));
            self.secondary.set_pixel(Pixel(point, secondary));
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.primary.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle},
    };

    fn assert_first_byte_inked(buffer: &[u8]) {
        assert_eq!(buffer[0], Color::Black.get_byte_value());
        for &byte in buffer.iter().skip(1) {
            assert_eq!(byte, Color::White.get_byte_value());
        }
    }

    // test buffer length
    #[test]
    fn graphics_size() {
        let plane = Plane::new(200, 200, DisplayRotation::Rotate0);
        assert_eq!(plane.buffer().len(), 5000);

        // rows are padded to full bytes
        let plane = Plane::new(104, 212, DisplayRotation::Rotate0);
        assert_eq!(plane.buffer().len(), 13 * 212);
        let plane = Plane::new(122, 250, DisplayRotation::Rotate0);
        assert_eq!(plane.buffer().len(), 16 * 250);
    }

    // test default background color on all bytes
    #[test]
    fn graphics_default() {
        let plane = Plane::new(200, 200, DisplayRotation::Rotate0);
        for &byte in plane.buffer() {
            assert_eq!(byte, Color::White.get_byte_value());
        }
        assert!(plane.is_blank());
    }

    #[test]
    fn graphics_rotation_0() {
        let mut plane = Plane::new(200, 200, DisplayRotation::Rotate0);
        let _ = Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut plane);

        assert_first_byte_inked(plane.buffer());
    }

    #[test]
    fn graphics_rotation_90() {
        let mut plane = Plane::new(200, 200, DisplayRotation::Rotate90);
        let _ = Line::new(Point::new(0, 192), Point::new(0, 199))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut plane);

        assert_first_byte_inked(plane.buffer());
    }

    #[test]
    fn graphics_rotation_180() {
        let mut plane = Plane::new(200, 200, DisplayRotation::Rotate180);
        let _ = Line::new(Point::new(192, 199), Point::new(199, 199))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut plane);

        assert_first_byte_inked(plane.buffer());
    }

    #[test]
    fn graphics_rotation_270() {
        let mut plane = Plane::new(200, 200, DisplayRotation::Rotate270);
        let _ = Line::new(Point::new(199, 0), Point::new(199, 7))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut plane);

        assert_first_byte_inked(plane.buffer());
    }

    #[test]
    fn rotated_size_swaps_axes() {
        let plane = Plane::new(104, 212, DisplayRotation::Rotate90);
        assert_eq!(plane.size(), Size::new(212, 104));
        assert_eq!(plane.native_size(), (104, 212));
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut plane = Plane::new(104, 212, DisplayRotation::Rotate0);
        plane.set_pixel(Pixel(Point::new(104, 0), Color::Black));
        plane.set_pixel(Pixel(Point::new(0, 212), Color::Black));
        plane.set_pixel(Pixel(Point::new(-1, 3), Color::Black));
        assert!(plane.is_blank());
        assert_eq!(plane.pixel(Point::new(0, 212)), None);
    }

    #[test]
    fn padding_bits_do_not_count_as_ink() {
        let mut plane = Plane::new(12, 2, DisplayRotation::Rotate0);
        plane.set_pixel(Pixel(Point::new(11, 1), Color::Black));
        assert!(!plane.is_blank());
        plane.set_pixel(Pixel(Point::new(11, 1), Color::White));
        assert!(plane.is_blank());
    }

    #[test]
    fn canvas_splits_colors_across_planes() {
        let mut canvas = Canvas::new(16, 4, DisplayRotation::Rotate0);
        canvas
            .draw_iter([
                Pixel(Point::new(0, 0), TriColor::Black),
                Pixel(Point::new(1, 0), TriColor::Chromatic),
            ])
            .unwrap();

        assert_eq!(canvas.pixel(Point::new(0, 0)), Some(TriColor::Black));
        assert_eq!(canvas.pixel(Point::new(1, 0)), Some(TriColor::Chromatic));
        assert_eq!(canvas.pixel(Point::new(2, 0)), Some(TriColor::White));

        assert_eq!(canvas.primary().buffer()[0], 0b0111_1111);
        assert_eq!(canvas.secondary().buffer()[0], 0b1011_1111);

        canvas
            .draw_iter([Pixel(Point::new(1, 0), TriColor::White)])
            .unwrap();
        assert!(canvas.secondary().is_blank());
    }
}
