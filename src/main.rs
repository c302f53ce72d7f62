//! surfsticker — open URLs in sticky surf windows.
//!
//! Finds the surf window tagged with `--sticker`, or starts one, and sends
//! it the URL. Every failure is fatal.

mod deliver;
mod error;
mod launch;
mod sticker;
mod window;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::deliver::{LOAD_TIMEOUT, open_url};
use crate::error::{Error, Result};
use crate::launch::{BrowserCommand, start_surf};
use crate::sticker::Sticker;
use crate::window::WindowSystem;
use crate::window::locate::find_running_surf;
use crate::window::x11::X11Context;

#[derive(Parser, Debug)]
#[command(name = "surfsticker", about = "Open URLs in sticky surf windows")]
struct Args {
    /// Tag of the surf window to reuse (letters and digits only).
    #[arg(long, default_value = "default")]
    sticker: String,

    /// Browser command line; window flags and stylesheet are appended.
    #[arg(long, default_value = "surf", value_parser = parse_browser)]
    browser: BrowserCommand,

    /// URL or file:// path to open.
    url: String,
}

fn parse_browser(line: &str) -> std::result::Result<BrowserCommand, String> {
    BrowserCommand::parse(line).ok_or_else(|| "browser command is empty".to_string())
}

/// A failed dispatch and the step it failed in.
struct Failure {
    stage: &'static str,
    error: Error,
}

trait Stage<T> {
    fn stage(self, stage: &'static str) -> std::result::Result<T, Failure>;
}

impl<T> Stage<T> for Result<T> {
    fn stage(self, stage: &'static str) -> std::result::Result<T, Failure> {
        self.map_err(|error| Failure { stage, error })
    }
}

/// Find or launch the window for `sticker` and deliver `url` to it.
async fn dispatch<W: WindowSystem>(
    ws: &W,
    sticker: &Sticker,
    browser: &BrowserCommand,
    url: &str,
) -> std::result::Result<(), Failure> {
    let window = match find_running_surf(ws, sticker).stage("find_running_surf")? {
        Some(window) => window,
        None => start_surf(ws, sticker, browser).await.stage("start_surf")?,
    };
    tracing::info!(window = %window, sticker = %sticker, "surf window resolved");

    open_url(ws, window, url, LOAD_TIMEOUT)
        .await
        .stage("open_url")
}

async fn run(args: Args) -> std::result::Result<(), Failure> {
    let sticker = Sticker::parse(&args.sticker).stage("validate_sticker")?;
    let ws = X11Context::connect().stage("connect")?;
    dispatch(&ws, &sticker, &args.browser, &args.url).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure { stage, error }) => {
            tracing::error!(stage, error = %error, "surfsticker failed");
            ExitCode::FAILURE
        }
    }
}
