use std::io;

use thiserror::Error;

/// Errors raised while laying out, drawing or flushing a page
#[derive(Debug, Error)]
pub enum Error {
    /// The display collaborator reported a failure
    #[error("display panel failed: {0}")]
    Panel(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading notifications or probing the system failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Text is taller than the space it has to fit in
    #[error("{text:?} is {height}px tall but only {available}px are available")]
    TextOverflow {
        /// The text that did not fit
        text: String,
        /// Its measured height
        height: u32,
        /// Room left on the canvas
        available: u32,
    },

    /// A status field was constructed from an empty string
    #[error("status field `{0}` is empty")]
    EmptyStatusField(&'static str),

    /// A plane handed to the panel does not match its native size
    #[error("plane is {actual:?} but the panel expects {expected:?}")]
    PlaneSize {
        /// (width, height) of the panel
        expected: (u32, u32),
        /// (width, height) of the plane
        actual: (u32, u32),
    },

    /// The notification subscription hung up
    #[error("notification source closed")]
    SourceClosed,

    /// Network status could not be determined
    #[error("status probe failed: {0}")]
    StatusProbe(String),
}

impl Error {
    /// Wrap an error coming out of a [`Panel`](crate::panel::Panel) implementation
    pub fn panel<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Panel(Box::new(err))
    }
}

/// Result type used throughout the crate
pub type Result<T, E = Error> = core::result::Result<T, E>;
