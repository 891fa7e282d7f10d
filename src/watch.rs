//! File-system change notifications
//!
//! A [`NotificationSource`] blocks until changes arrive. [`subscribe`] moves
//! that blocking read onto its own thread and hands batches over a channel,
//! so the render loop can wait with a timeout and notice a shutdown request.

use std::thread;

use crossbeam_channel::{unbounded, Receiver};

use crate::error::Result;

/// Kind of change reported for a watched entry
///
/// Ordered by the inotify bit it corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    /// File was modified
    Modify,
    /// File or directory was created
    Create,
    /// File or directory was deleted
    Delete,
    /// The watched directory itself was deleted
    DeleteSelf,
}

impl ChangeKind {
    /// All kinds, in bit order
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Modify,
        ChangeKind::Create,
        ChangeKind::Delete,
        ChangeKind::DeleteSelf,
    ];

    /// inotify mask bit of this kind
    pub const fn bit(self) -> u32 {
        match self {
            ChangeKind::Modify => 0x0000_0002,
            ChangeKind::Create => 0x0000_0100,
            ChangeKind::Delete => 0x0000_0200,
            ChangeKind::DeleteSelf => 0x0000_0400,
        }
    }

    /// Text drawn for this kind
    pub const fn label(self) -> &'static str {
        match self {
            ChangeKind::Modify => "MODIFY",
            ChangeKind::Create => "CREATE",
            ChangeKind::Delete => "DELETE",
            ChangeKind::DeleteSelf => "DELETE_SELF",
        }
    }

    /// Kinds present in `mask`, other bits are ignored
    pub fn from_mask(mask: u32) -> Vec<ChangeKind> {
        ChangeKind::ALL
            .into_iter()
            .filter(|kind| mask & kind.bit() != 0)
            .collect()
    }
}

/// One change notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Entry the change happened to
    pub name: String,
    /// What happened, in bit order
    pub kinds: Vec<ChangeKind>,
}

impl ChangeEvent {
    /// Event from a raw inotify-style mask
    pub fn from_mask(name: impl Into<String>, mask: u32) -> Self {
        ChangeEvent {
            name: name.into(),
            kinds: ChangeKind::from_mask(mask),
        }
    }
}

/// Blocking producer of change notifications
pub trait NotificationSource {
    /// Wait for at least one change and return everything available, oldest first
    fn read(&mut self) -> Result<Vec<ChangeEvent>>;
}

/// Batches handed from the watcher thread to the render loop
pub type Subscription = Receiver<Result<Vec<ChangeEvent>>>;

/// Read `source` on a background thread
///
/// The thread stops after the first error (which is forwarded) or once the
/// receiving side is dropped.
pub fn subscribe<S>(mut source: S) -> Result<Subscription>
where
    S: NotificationSource + Send + 'static,
{
    let (sender, receiver) = unbounded();
    thread::Builder::new()
        .name("epd-watch".to_string())
        .spawn(move || loop {
            let batch = source.read();
            let failed = batch.is_err();
            if sender.send(batch).is_err() || failed {
                log::debug!("watcher thread exiting");
                break;
            }
        })?;
    Ok(receiver)
}

#[cfg(target_os = "linux")]
pub use self::inotify_source::DirectoryWatch;

#[cfg(target_os = "linux")]
mod inotify_source {
    use std::path::{Path, PathBuf};

    use inotify::{Inotify, WatchMask};

    use super::{ChangeEvent, ChangeKind, NotificationSource};
    use crate::error::Result;

    /// inotify watch on a single directory
    pub struct DirectoryWatch {
        inotify: Inotify,
        dir: PathBuf,
        buffer: Vec<u8>,
    }

    impl DirectoryWatch {
        /// Watch `dir` for created, deleted and modified entries and for its own deletion
        pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
            let dir = dir.as_ref().to_path_buf();
            let inotify = Inotify::init()?;
            inotify.watches().add(
                &dir,
                WatchMask::CREATE | WatchMask::DELETE | WatchMask::MODIFY | WatchMask::DELETE_SELF,
            )?;
            log::info!("watching {}", dir.display());
            Ok(DirectoryWatch {
                inotify,
                dir,
                buffer: vec![0; 4096],
            })
        }

        // self events carry no name, report them under the directory's
        fn self_name(&self) -> String {
            self.dir
                .file_name()
                .unwrap_or(self.dir.as_os_str())
                .to_string_lossy()
                .into_owned()
        }
    }

    impl NotificationSource for DirectoryWatch {
        fn read(&mut self) -> Result<Vec<ChangeEvent>> {
            let self_name = self.self_name();
            let events = self.inotify.read_events_blocking(&mut self.buffer)?;
            Ok(events
                .filter_map(|event| {
                    let kinds = ChangeKind::from_mask(event.mask.bits());
                    if kinds.is_empty() {
                        return None;
                    }
                    let name = event
                        .name
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| self_name.clone());
                    Some(ChangeEvent { name, kinds })
                })
                .collect())
        }
    }
}
