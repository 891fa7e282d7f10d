//! The display collaborator and full-frame flushing
//!
//! The renderer never talks to a controller directly. Everything it needs from
//! the physical panel is behind [`Panel`], so that a loop can run against
//! [`MemoryPanel`] just as well as against real hardware.

use crate::error::{Error, Result};
use crate::graphics::{DisplayRotation, Plane};

/// All the functions the renderer needs from an ePaper panel
///
/// `width` and `height` are the native (unrotated) dimensions. `init` and
/// `clear` must be called before the first [`display`](Panel::display),
/// `sleep` before shutdown, and `release` on every interrupt path.
pub trait Panel {
    /// Error reported by the hardware
    type Error: std::error::Error + Send + Sync + 'static;

    /// Initialises the controller and powers it up
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the visible frame to white
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Let the device enter deep-sleep mode to save power.
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Transmit both planes and refresh the full panel
    fn display(&mut self, primary: &[u8], secondary: &[u8]) -> Result<(), Self::Error>;

    /// Convert a plane into the buffer format the controller expects
    fn to_buffer(&self, plane: &Plane) -> Vec<u8> {
        plane.buffer().to_vec()
    }

    /// Get the width of the display
    fn width(&self) -> u32;

    /// Get the height of the display
    fn height(&self) -> u32;

    /// Hand SPI and GPIO back to the system
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// Repaint the full panel
///
/// A missing plane is sent as a blank plane with the panel's dimensions.
pub fn flush<P: Panel>(
    panel: &mut P,
    primary: Option<&Plane>,
    secondary: Option<&Plane>,
) -> Result<()> {
    let expected = (panel.width(), panel.height());
    let blank = Plane::new(expected.0, expected.1, DisplayRotation::default());

    let primary = primary.unwrap_or(&blank);
    let secondary = secondary.unwrap_or(&blank);
    for plane in [primary, secondary] {
        if plane.native_size() != expected {
            return Err(Error::PlaneSize {
                expected,
                actual: plane.native_size(),
            });
        }
    }

    log::info!("flushing {}x{} frame", expected.0, expected.1);
    let primary = panel.to_buffer(primary);
    let secondary = panel.to_buffer(secondary);
    panel.display(&primary, &secondary).map_err(Error::panel)
}

/// A call received by a [`MemoryPanel`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelCall {
    /// [`Panel::init`]
    Init,
    /// [`Panel::clear`]
    Clear,
    /// [`Panel::sleep`]
    Sleep,
    /// [`Panel::display`] with both buffers
    Display {
        /// black plane
        primary: Vec<u8>,
        /// accent plane
        secondary: Vec<u8>,
    },
    /// [`Panel::release`]
    Release,
}

/// Error injected into a [`MemoryPanel`]
#[derive(Debug, thiserror::Error)]
#[error("injected panel failure")]
pub struct MemoryPanelError;

/// In-memory panel recording every call
///
/// Used to run the renderer without hardware attached.
#[derive(Clone, Debug, Default)]
pub struct MemoryPanel {
    width: u32,
    height: u32,
    calls: Vec<PanelCall>,
    fail_display_after: Option<usize>,
}

impl MemoryPanel {
    /// Panel with the given native dimensions
    pub fn new(width: u32, height: u32) -> Self {
        MemoryPanel {
            width,
            height,
            ..Default::default()
        }
    }

    /// Make `display` fail once `frames` frames have been shown
    pub fn fail_display_after(mut self, frames: usize) -> Self {
        self.fail_display_after = Some(frames);
        self
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> &[PanelCall] {
        &self.calls
    }

    /// Number of frames shown so far
    pub fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PanelCall::Display { .. }))
            .count()
    }

    /// The most recent frame as (primary, secondary)
    pub fn last_frame(&self) -> Option<(&[u8], &[u8])> {
        self.calls.iter().rev().find_map(|call| match call {
            PanelCall::Display { primary, secondary } => {
                Some((primary.as_slice(), secondary.as_slice()))
            }
            _ => None,
        })
    }
}

impl Panel for MemoryPanel {
    type Error = MemoryPanelError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.calls.push(PanelCall::Init);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.calls.push(PanelCall::Clear);
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.calls.push(PanelCall::Sleep);
        Ok(())
    }

    fn display(&mut self, primary: &[u8], secondary: &[u8]) -> Result<(), Self::Error> {
        if self.fail_display_after == Some(self.frames()) {
            return Err(MemoryPanelError);
        }
        self.calls.push(PanelCall::Display {
            primary: primary.to_vec(),
            secondary: secondary.to_vec(),
        });
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.calls.push(PanelCall::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

    #[test]
    fn missing_plane_is_sent_blank() {
        let mut panel = MemoryPanel::new(104, 212);
        let mut black = Plane::new(104, 212, DisplayRotation::Rotate90);
        black.set_pixel(Pixel(Point::new(0, 0), Color::from(BinaryColor::On)));

        flush(&mut panel, Some(&black), None).unwrap();

        let (primary, secondary) = panel.last_frame().unwrap();
        assert_eq!(primary, black.buffer());
        assert_eq!(secondary.len(), primary.len());
        assert!(secondary.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn accent_only_flush() {
        let mut panel = MemoryPanel::new(16, 2);
        let mut accent = Plane::new(16, 2, DisplayRotation::Rotate0);
        accent.set_pixel(Pixel(Point::new(15, 1), Color::Black));

        flush(&mut panel, None, Some(&accent)).unwrap();

        let (primary, secondary) = panel.last_frame().unwrap();
        assert_eq!(primary, &[0xff; 4]);
        assert_eq!(secondary, &[0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn mismatched_plane_is_rejected() {
        let mut panel = MemoryPanel::new(104, 212);
        let plane = Plane::new(122, 250, DisplayRotation::Rotate0);

        let err = flush(&mut panel, Some(&plane), None).unwrap_err();
        assert!(matches!(
            err,
            Error::PlaneSize {
                expected: (104, 212),
                actual: (122, 250)
            }
        ));
        assert_eq!(panel.frames(), 0);
    }

    #[test]
    fn display_failure_surfaces_as_panel_error() {
        let mut panel = MemoryPanel::new(8, 1).fail_display_after(0);
        let err = flush(&mut panel, None, None).unwrap_err();
        assert!(matches!(err, Error::Panel(_)));
    }

    #[test]
    fn records_calls_in_order() {
        let mut panel = MemoryPanel::new(8, 1);
        panel.init().unwrap();
        panel.clear().unwrap();
        panel.sleep().unwrap();
        panel.release().unwrap();
        assert_eq!(
            panel.calls(),
            &[
                PanelCall::Init,
                PanelCall::Clear,
                PanelCall::Sleep,
                PanelCall::Release
            ]
        );
    }
}
