//! The polling loop
//!
//! One thread owns the panel and the pager. It waits for notification
//! batches, draws every batch that is already queued in arrival order,
//! repaints the panel once and sleeps for the poll interval.

use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::layout::LogLine;
use crate::pager::Pager;
use crate::panel::Panel;
use crate::signals::Shutdown;
use crate::typeface::Typeface;
use crate::watch::Subscription;

/// Why the loop stopped without an error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// A shutdown was requested, the panel still needs to be released
    Interrupted,
}

/// Initialise the panel, show the status page and log changes until interrupted
///
/// Returns an error as soon as the panel or the notification source fails;
/// nothing is retried.
pub fn run<P, T, D>(
    panel: &mut P,
    pager: &mut Pager<T>,
    events: &Subscription,
    shutdown: &Shutdown,
    delay: &mut D,
    config: &Config,
) -> Result<Exit>
where
    P: Panel,
    T: Typeface,
    D: DelayNs,
{
    log::info!("init and clear");
    panel.init().map_err(Error::panel)?;
    panel.clear().map_err(Error::panel)?;

    let mut state = pager.reset()?;
    pager.canvas().flush_to(panel)?;

    loop {
        match events.recv_timeout(config.poll_interval) {
            Ok(first) => {
                let mut batch = first?;
                while let Ok(next) = events.try_recv() {
                    batch.extend(next?);
                }

                // lines drawn since the last flush
                let mut pending = false;
                for event in &batch {
                    let step = pager.append(state, &LogLine::from(event))?;
                    if let Some(page) = &step.finished {
                        if pending {
                            page.flush_to(panel)?;
                        }
                        delay.delay_ms(millis(config.reset_pause));
                        if config.clear_on_reset {
                            panel.clear().map_err(Error::panel)?;
                        }
                    }
                    state = step.state;
                    pending = true;
                }

                if pending {
                    pager.canvas().flush_to(panel)?;
                }
                delay.delay_ms(millis(config.poll_interval));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(Error::SourceClosed),
        }

        if shutdown.is_requested() {
            log::info!("shutdown requested");
            return Ok(Exit::Interrupted);
        }
    }
}

/// Put the panel to sleep and release its resources
///
/// `release` runs even when `sleep` fails; the first error is returned.
pub fn shutdown_panel<P: Panel>(panel: &mut P) -> Result<()> {
    log::info!("goto sleep");
    let slept = panel.sleep().map_err(Error::panel);
    if let Err(err) = &slept {
        log::warn!("panel did not go to sleep: {err}");
    }
    panel.release().map_err(Error::panel)?;
    slept
}

/// Release the panel if the loop ended while a shutdown was requested
///
/// An error from the loop is passed on unchanged. The panel is left alone when
/// the loop failed without an interrupt.
pub fn finish<P: Panel>(panel: &mut P, outcome: Result<Exit>, shutdown: &Shutdown) -> Result<()> {
    match outcome {
        Ok(Exit::Interrupted) => {
            log::info!("ctrl + c:");
            shutdown_panel(panel)
        }
        Err(err) if shutdown.is_requested() => {
            log::error!("{err}");
            if let Err(release) = shutdown_panel(panel) {
                log::warn!("releasing the panel failed: {release}");
            }
            Err(err)
        }
        Err(err) => {
            log::error!("{err}");
            Err(err)
        }
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
