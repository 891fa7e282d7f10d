//! Fixed settings of the renderer
//!
//! There are no flags or environment variables, the binary runs with
//! [`Config::default`].

use std::path::PathBuf;
use std::time::Duration;

use crate::graphics::DisplayRotation;

/// Runtime settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory whose changes are logged
    pub watch_dir: PathBuf,
    /// Orientation of the canvas on the panel
    pub rotation: DisplayRotation,
    /// Wait between polls of the notification channel
    pub poll_interval: Duration,
    /// Pause before the panel is cleared for a new page
    pub reset_pause: Duration,
    /// Clear the physical panel when a new page starts
    pub clear_on_reset: bool,
    /// Interface scanned for the network name and signal level
    pub wireless_interface: String,
    /// Remote address used to find the local address
    pub probe_target: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_dir: PathBuf::from("downloads"),
            // landscape: the long axis of the panel runs left to right
            rotation: DisplayRotation::Rotate90,
            poll_interval: Duration::from_secs(1),
            reset_pause: Duration::from_secs(2),
            clear_on_reset: true,
            wireless_interface: "wlan0".to_string(),
            probe_target: "8.8.8.8:80".to_string(),
        }
    }
}
