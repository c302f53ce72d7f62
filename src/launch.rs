//! Browser launch — start surf and tag its window.
//!
//! surf started with `-w` prints its XID as the first stdout line. We read
//! that line, hand the rest of the pipe to a detached drain task, and write
//! the sticker onto the new window.

use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::sticker::Sticker;
use crate::window::{Property, WindowId, WindowSystem};

/// Command used to start the browser.
///
/// `program` and `args` come first; the window flags and stylesheet are
/// appended on launch, so a wrapper such as `env GDK_SCALE=2 surf` works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BrowserCommand {
    /// Split a command line on whitespace. `None` if it is blank.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

/// Read the first line from the browser and parse it as a window id.
///
/// Waits as long as the browser takes; there is no timeout.
async fn read_window_id<R: AsyncBufRead + Unpin>(stdout: &mut R) -> Result<WindowId> {
    let mut line = String::new();
    let n = stdout
        .read_line(&mut line)
        .await
        .map_err(|e| Error::Launch(format!("read stdout: {e}")))?;
    if n == 0 {
        return Err(Error::Launch("browser exited before printing its window id".into()));
    }

    let line = line.trim_end_matches(['\r', '\n']);
    line.parse::<u32>()
        .map(WindowId)
        .map_err(|e| Error::Launch(format!("parse window id {line:?}: {e}")))
}

/// Start a browser window for `sticker` and tag it.
///
/// Spawns `<browser> -w -b -C ~/.surf/styles/<sticker>.css`. The child is
/// not waited on and keeps running after we exit.
pub async fn start_surf<W: WindowSystem>(
    ws: &W,
    sticker: &Sticker,
    browser: &BrowserCommand,
) -> Result<WindowId> {
    let stylesheet = sticker.stylesheet_path();

    let mut child = Command::new(&browser.program)
        .args(&browser.args)
        .args(["-w", "-b", "-C", stylesheet.as_str()])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Launch(format!("spawn {}: {e}", browser.program)))?;

    tracing::debug!(
        pid = ?child.id(),
        program = %browser.program,
        stylesheet = %stylesheet,
        "browser started"
    );

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Launch("browser stdout not captured".into()))?;
    let mut stdout = BufReader::new(stdout);

    let window = read_window_id(&mut stdout).await?;

    // Keep the pipe drained so the browser never blocks on a full buffer.
    // Never joined; it ends when the browser closes stdout or we exit.
    tokio::spawn(async move {
        if let Err(e) = tokio::io::copy(&mut stdout, &mut tokio::io::sink()).await {
            tracing::debug!(error = %e, "browser stdout drain stopped");
        }
    });

    ws.set_string_property(window, Property::Sticker, sticker.as_str().as_bytes())?;
    Ok(window)
}
