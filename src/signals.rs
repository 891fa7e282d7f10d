//! Interrupt handling
//!
//! The first SIGINT or SIGTERM only raises a flag. The render loop polls it
//! between batches and the caller then releases the panel. A second signal
//! means the loop is stuck, usually inside a panel call, and runs the force
//! hook on its own thread.

use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::error::Result;

/// Shutdown flag shared between signal handlers and the render loop
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    /// Flag that is only raised through [`request`](Shutdown::request)
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag raised by SIGINT and SIGTERM
    ///
    /// `force` runs when a second signal arrives. It is expected to release
    /// whatever it can without the render loop and exit the process.
    pub fn install<F>(force: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let shutdown = Self::new();
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&shutdown.flag))?;
        }

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        thread::Builder::new()
            .name("epd-signals".to_string())
            .spawn(move || escalate(signals.forever(), force))?;
        Ok(shutdown)
    }

    /// Check whether a shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Programmatically request shutdown
    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

// Run `force` on the second delivered signal, true if it ran
fn escalate<I, F>(signals: I, force: F) -> bool
where
    I: IntoIterator<Item = c_int>,
    F: FnOnce(),
{
    let mut signals = signals.into_iter();
    let Some(first) = signals.next() else {
        return false;
    };
    log::info!("signal {first}, stopping after the current batch");

    match signals.next() {
        Some(second) => {
            log::warn!("signal {second} while stopping, forcing exit");
            force();
            true
        }
        None => false,
    }
}
