//! URL delivery — navigate a surf window and, for local files, wait until
//! surf has loaded them.
//!
//! Writing `_SURF_GO` is fire-and-forget. For `file://` URLs the caller
//! usually wants to delete the file afterwards, so we block until surf
//! closes the file after writing it (inotify `IN_CLOSE_WRITE`), or the
//! timeout expires.

use std::io;
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::sys::inotify::{AddWatchFlags, InitFlags, Inotify};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;
use url::Url;

use crate::error::{Error, Result};
use crate::window::{Property, WindowId, WindowSystem};

/// How long to wait for surf to finish loading a local file.
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// An inotify instance watching a single file for close-after-write.
///
/// Dropping it closes the inotify fd, which removes the watch.
struct CloseWatch {
    inotify: Inotify,
}

impl CloseWatch {
    fn arm(path: &Path) -> Result<Self> {
        let watch_error = |e: nix::Error| Error::Watch {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let inotify =
            Inotify::init(InitFlags::IN_NONBLOCK | InitFlags::IN_CLOEXEC).map_err(watch_error)?;
        inotify
            .add_watch(path, AddWatchFlags::IN_CLOSE_WRITE)
            .map_err(watch_error)?;

        Ok(Self { inotify })
    }
}

impl AsRawFd for CloseWatch {
    fn as_raw_fd(&self) -> RawFd {
        self.inotify.as_fd().as_raw_fd()
    }
}

/// Wait until the watched file is closed after a write.
async fn wait_for_close(watch: &AsyncFd<CloseWatch>) -> io::Result<()> {
    loop {
        let mut guard = watch.readable().await?;

        let events = match guard
            .try_io(|fd| fd.get_ref().inotify.read_events().map_err(io::Error::from))
        {
            Ok(events) => events?,
            Err(_would_block) => continue,
        };

        for event in events {
            if event.mask.contains(AddWatchFlags::IN_CLOSE_WRITE) {
                return Ok(());
            }
            if event.mask.contains(AddWatchFlags::IN_IGNORED) {
                return Err(io::Error::other("file removed before it was loaded"));
            }
        }
    }
}

/// Point `window` at `raw_url`.
///
/// Anything that is not a `file` URL (including strings that don't parse
/// as a URL at all) is written to `_SURF_GO` verbatim. For `file` URLs the
/// decoded path is written instead, and we wait up to `timeout` for the
/// browser to close the file after writing it.
pub async fn open_url<W: WindowSystem>(
    ws: &W,
    window: WindowId,
    raw_url: &str,
    timeout: Duration,
) -> Result<()> {
    let path = match Url::parse(raw_url) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|()| Error::InvalidUrl(raw_url.to_string()))?,
        Ok(_) => return ws.set_string_property(window, Property::Go, raw_url.as_bytes()),
        Err(e) => {
            tracing::debug!(url = raw_url, error = %e, "not a parsable url, sending as-is");
            return ws.set_string_property(window, Property::Go, raw_url.as_bytes());
        }
    };

    // The watch must exist before surf can see the new location, or a fast
    // load could close the file before we are listening.
    let watch = CloseWatch::arm(&path)?;
    // SAFETY: the inotify fd is owned by `watch`, which the AsyncFd owns,
    // so it stays open and unchanged until the AsyncFd is dropped.
    let watch = unsafe { AsyncFd::register_with_interest(watch, Interest::READABLE) }
        .map_err(|e| Error::Watch {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    // Raw bytes: a non-UTF-8 path must reach the browser unchanged.
    ws.set_string_property(window, Property::Go, path.as_os_str().as_bytes())?;

    match tokio::time::timeout(timeout, wait_for_close(&watch)).await {
        Ok(Ok(())) => {
            tracing::debug!(path = %path.display(), "file loaded");
            Ok(())
        }
        Ok(Err(e)) => Err(Error::Watch {
            path,
            reason: e.to_string(),
        }),
        Err(_elapsed) => Err(Error::Timeout(path)),
    }
}
