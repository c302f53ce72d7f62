//! Error type shared by every stage of a dispatch.
//!
//! None of these are recovered locally. `main` logs them with the stage
//! that produced them and exits non-zero.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sticker contains something other than letters and digits.
    #[error("{0:?} cannot contain punctuation")]
    InvalidSticker(String),

    /// The X server could not be reached.
    #[error("x11 connection: {0}")]
    Connection(String),

    /// `_NET_CLIENT_LIST` could not be read from the root window.
    #[error("client list: {0}")]
    Enumeration(String),

    /// The browser failed to start or announced an unusable window id.
    #[error("launch: {0}")]
    Launch(String),

    #[error("set property {property}: {reason}")]
    PropertyWrite {
        property: &'static str,
        reason: String,
    },

    /// `file://` URL that does not name a local path.
    #[error("invalid file url {0:?}")]
    InvalidUrl(String),

    #[error("watch {path}: {reason}")]
    Watch { path: PathBuf, reason: String },

    #[error("timeout watching tempfile: {}", .0.display())]
    Timeout(PathBuf),
}
