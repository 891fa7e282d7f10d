//! Status bar and log line layout

use std::fmt;

use crate::color::TriColor;
use crate::error::{Error, Result};
use crate::graphics::Canvas;
use crate::status::StatusFields;
use crate::typeface::{Anchor, Typeface};
use crate::watch::{ChangeEvent, ChangeKind};
use embedded_graphics::{
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};

/// Padding between status fields when they do not fit the canvas width
pub const MIN_PADDING: u32 = 1;

/// Where the status bar fields and separator go
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBarLayout {
    /// Left edge of each field
    pub starts: [u32; 3],
    /// Measured width of each field
    pub widths: [u32; 3],
    /// Horizontal gap between fields
    pub padding: u32,
    /// Row of the separator, also the first writable row below it
    pub separator_y: u32,
}

impl StatusBarLayout {
    /// Lay the fields out across a `width` x `height` canvas
    ///
    /// Space left over is split evenly per field (remainder dropped). If the
    /// fields do not fit at all they are packed [`MIN_PADDING`] apart and the
    /// right end is cropped.
    pub fn compute<T: Typeface>(
        fields: &StatusFields,
        typeface: &T,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let texts = fields.as_array();
        let sizes = texts.map(|text| typeface.measure(text));
        let widths = sizes.map(|size| size.width);
        let total: u32 = widths.iter().sum();

        let (tallest, tallest_height) = texts
            .iter()
            .zip(sizes.iter())
            .max_by_key(|(_, size)| size.height)
            .map(|(text, size)| (*text, size.height))
            .unwrap_or_default();
        if tallest_height > height {
            return Err(Error::TextOverflow {
                text: tallest.to_string(),
                height: tallest_height,
                available: height,
            });
        }

        let padding = if total > width {
            log::warn!("status bar is {total}px wide, cropping to {width}px");
            MIN_PADDING
        } else {
            (width - total) / texts.len() as u32
        };

        let mut starts = [0; 3];
        let mut left = 0;
        for (start, field_width) in starts.iter_mut().zip(widths) {
            *start = left;
            left += field_width + padding;
        }

        Ok(StatusBarLayout {
            starts,
            widths,
            padding,
            separator_y: tallest_height + 1,
        })
    }
}

/// Draw the status bar at the top of the canvas
///
/// Returns the separator row, which is where the first log line goes.
pub fn draw_status_bar<T: Typeface>(
    canvas: &mut Canvas,
    fields: &StatusFields,
    typeface: &T,
) -> Result<u32> {
    let layout = StatusBarLayout::compute(fields, typeface, canvas.width(), canvas.height())?;

    for (text, start) in fields.as_array().iter().zip(layout.starts) {
        typeface.draw(
            canvas,
            Point::new(start as i32, 0),
            text,
            Anchor::LeftTop,
            TriColor::Black,
        );
    }

    let y = layout.separator_y as i32;
    let _ = Line::new(Point::new(0, y), Point::new(canvas.width() as i32, y))
        .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 1))
        .draw(canvas);

    Ok(layout.separator_y)
}

/// One rendered change notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    name: String,
    kinds: Vec<ChangeKind>,
}

impl LogLine {
    /// Line for `name` with the given change kinds
    pub fn new(name: impl Into<String>, kinds: Vec<ChangeKind>) -> Self {
        LogLine {
            name: name.into(),
            kinds,
        }
    }
}

impl From<&ChangeEvent> for LogLine {
    fn from(event: &ChangeEvent) -> Self {
        LogLine::new(event.name.clone(), event.kinds.clone())
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        for kind in &self.kinds {
            write!(f, " {}", kind.label())?;
        }
        Ok(())
    }
}

/// Draw `line` at row `y` and return the row below it
pub fn draw_log_line<T: Typeface>(
    canvas: &mut Canvas,
    line: &LogLine,
    y: u32,
    typeface: &T,
) -> u32 {
    let text = line.to_string();
    log::debug!("drawing {text:?} at y={y}");
    typeface.draw(canvas, Point::new(0, y as i32), &text, Anchor::LeftTop, TriColor::Black);
    y + typeface.measure(&text).height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::DisplayRotation;
    use crate::typeface::testing::FixedTypeface;
    use crate::typeface::MonoTypeface;

    fn home_fields() -> StatusFields {
        StatusFields::new("10.0.0.5", "HomeNet", "-42").unwrap()
    }

    fn scenario_typeface() -> FixedTypeface {
        FixedTypeface::new(5, 8)
            .with_width("10.0.0.5", 50)
            .with_width("HomeNet", 56)
            .with_width("-42", 20)
    }

    #[test]
    fn overflowing_fields_fall_back_to_min_padding() {
        let layout =
            StatusBarLayout::compute(&home_fields(), &scenario_typeface(), 122, 250).unwrap();

        assert_eq!(layout.widths, [50, 56, 20]);
        assert_eq!(layout.padding, MIN_PADDING);
        assert_eq!(layout.starts, [0, 51, 108]);
        assert_eq!(layout.separator_y, 9);
    }

    #[test]
    fn fitting_fields_share_remaining_space() {
        let layout =
            StatusBarLayout::compute(&home_fields(), &scenario_typeface(), 212, 104).unwrap();

        // (212 - 126) / 3
        assert_eq!(layout.padding, 28);
        assert_eq!(layout.starts, [0, 78, 162]);
    }

    #[test]
    fn fitting_fields_stay_inside_canvas() {
        let typeface = FixedTypeface::new(5, 8);
        let cases = [
            ("1.1.1.1", "a", "-1"),
            ("192.168.100.200", "CoffeeShop-5G", "-100"),
            ("10.0.0.5", "HomeNet", "-42"),
            ("x", "y", "z"),
        ];
        for width in [60, 104, 122, 212, 250] {
            for (address, network, signal) in cases {
                let fields = StatusFields::new(address, network, signal).unwrap();
                let layout = StatusBarLayout::compute(&fields, &typeface, width, 104).unwrap();
                if layout.widths.iter().sum::<u32>() > width {
                    assert_eq!(layout.padding, MIN_PADDING);
                    continue;
                }
                assert!(layout.starts.windows(2).all(|pair| pair[0] < pair[1]));
                assert!(layout.starts[2] + layout.widths[2] <= width);
            }
        }
    }

    #[test]
    fn status_bar_taller_than_canvas_is_an_error() {
        let typeface = FixedTypeface::new(5, 20);
        let mut canvas = Canvas::new(16, 250, DisplayRotation::Rotate90);
        let err = draw_status_bar(&mut canvas, &home_fields(), &typeface).unwrap_err();

        assert!(matches!(err, Error::TextOverflow { height: 20, available: 16, .. }));
        assert!(canvas.primary().is_blank());
    }

    #[test]
    fn separator_row_is_stable() {
        let typeface = MonoTypeface::default();
        let mut first = Canvas::new(104, 212, DisplayRotation::Rotate90);
        let mut second = Canvas::new(104, 212, DisplayRotation::Rotate90);

        let y1 = draw_status_bar(&mut first, &home_fields(), &typeface).unwrap();
        let y2 = draw_status_bar(&mut second, &home_fields(), &typeface).unwrap();
        let y3 = draw_status_bar(&mut second, &home_fields(), &typeface).unwrap();

        assert_eq!(y1, 9);
        assert_eq!(y1, y2);
        assert_eq!(y2, y3);
        assert_eq!(first, second);
    }

    #[test]
    fn separator_spans_full_width() {
        let typeface = scenario_typeface();
        let mut canvas = Canvas::new(122, 250, DisplayRotation::Rotate0);
        let y = draw_status_bar(&mut canvas, &home_fields(), &typeface).unwrap() as i32;

        for x in 0..122 {
            assert_eq!(canvas.pixel(Point::new(x, y)), Some(TriColor::Black));
        }
        // the padding pixel between the first two fields stays white
        assert_eq!(canvas.pixel(Point::new(50, 0)), Some(TriColor::White));
        assert_eq!(canvas.pixel(Point::new(51, 0)), Some(TriColor::Black));
    }

    #[test]
    fn log_line_text() {
        let line = LogLine::new("report.csv", vec![ChangeKind::Create]);
        assert_eq!(line.to_string(), "report.csv  CREATE");

        let line = LogLine::new("notes.txt", vec![ChangeKind::Modify, ChangeKind::Delete]);
        assert_eq!(line.to_string(), "notes.txt  MODIFY DELETE");
    }

    #[test]
    fn log_line_advances_cursor_by_its_height() {
        let typeface = MonoTypeface::default();
        let mut canvas = Canvas::new(104, 212, DisplayRotation::Rotate90);
        let line = LogLine::new("report.csv", vec![ChangeKind::Create]);

        let next = draw_log_line(&mut canvas, &line, 9, &typeface);

        assert_eq!(next, 17);
        let inked = (0..90).any(|x| {
            (9..17).any(|y| canvas.pixel(Point::new(x, y)) == Some(TriColor::Black))
        });
        assert!(inked);
        assert!((0..212).all(|x| canvas.pixel(Point::new(x, 8)) == Some(TriColor::White)));
    }
}
