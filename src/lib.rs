//! A paginated rolling log for small tri-color ePaper displays
//!
//! The top of the canvas holds a status bar with the local address, the
//! wireless network and its signal level. Below it, one line is drawn for
//! every file-system change in a watched directory. When a line would run
//! past the bottom edge the page starts over with a fresh status bar.
//!
//! The physical panel is reached through [`panel::Panel`], notifications
//! through [`watch::NotificationSource`] and text through
//! [`typeface::Typeface`], so everything except the hardware adapter runs
//! against in-memory doubles.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), epd_rolling_log::Error> {
//! use epd_rolling_log::prelude::*;
//!
//! let mut panel = MemoryPanel::new(104, 212);
//! let fields = StatusFields::new("10.0.0.5", "HomeNet", "-42")?;
//! let mut pager = Pager::for_panel(
//!     MonoTypeface::default(),
//!     fields,
//!     &panel,
//!     DisplayRotation::Rotate90,
//! );
//!
//! let state = pager.reset()?;
//! let event = ChangeEvent::from_mask("report.csv", ChangeKind::Create.bit());
//! let step = pager.append(state, &LogLine::from(&event))?;
//! assert_eq!(step.state.cursor, state.cursor + 8);
//!
//! pager.canvas().flush_to(&mut panel)?;
//! assert_eq!(panel.frames(), 1);
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
mod error;
pub mod graphics;
pub mod layout;
pub mod pager;
pub mod panel;
pub mod runner;
pub mod signals;
pub mod status;
pub mod typeface;
pub mod watch;

/// Adapter for the Waveshare 2.13" (B/C) HAT
#[cfg(feature = "linux-dev")]
pub mod hardware;

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::color::{Color, TriColor};
    pub use crate::config::Config;
    pub use crate::graphics::{Canvas, DisplayRotation, Plane};
    pub use crate::layout::{LogLine, StatusBarLayout};
    pub use crate::pager::{PageKind, PageState, Pager};
    pub use crate::panel::{MemoryPanel, Panel};
    pub use crate::runner::{run, Exit};
    pub use crate::signals::Shutdown;
    pub use crate::status::StatusFields;
    pub use crate::typeface::{Anchor, MonoTypeface, Typeface};
    pub use crate::watch::{subscribe, ChangeEvent, ChangeKind, NotificationSource};
}
