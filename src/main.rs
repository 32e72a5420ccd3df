//! sredd, s(ub)redd(it): checks subreddits for posts added since the last
//! run and hands the new URLs to a command.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  urls  ┌──────────┐  new urls  ┌───────────┐
//! │ source/   │ ─────► │ store.rs │ ─────────► │ action.rs │
//! │ (network) │        │ (r_*.log)│            │ (process) │
//! └───────────┘        └──────────┘            └───────────┘
//!        ▲                                           │
//!        └──────────── run.rs (one feed at a time) ◄─┘
//!                          │ between feeds
//!                     ┌──────────┐
//!                     │ pause.rs │
//!                     └──────────┘
//! ```
//!
//! * **`config`**: `config.json` → immutable [`RunConfig`].
//! * **`source/`**: the `FeedSource` trait and the Reddit JSON fetcher.
//! * **`store`**: per-feed state files and new-item detection.
//! * **`action`**: prints new URLs and runs the configured command.
//! * **`pause`**: waits for the user between feeds.
//! * **`run`**: wires one run together.
//! * **`main`**: parses arguments, loads config, maps errors to exit codes.

mod action;
mod config;
mod error;
mod logging;
mod pause;
mod run;
mod source;
mod store;

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use action::CommandAction;
use config::RunConfig;
use error::RunError;
use pause::{LineReader, TerminalReader};
use run::Runner;
use source::{FeedSource, RedditSource};
use store::StateStore;

const LONG_NAME: &str = "s(ub)redd(it)";

/// Run without arguments to check the subreddits listed in
/// ~/.sredd/config.json.
#[derive(Parser, Debug)]
#[command(name = "sredd")]
struct Cli {
    /// Display version information
    #[arg(short = 'v', long = "version")]
    version: bool,
}

/// Parse the command line; at most one option is accepted.
fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() > 2 {
        return Err(Cli::command().error(
            ErrorKind::ArgumentConflict,
            "expected a single option or none at all",
        ));
    }
    Cli::try_parse_from(args)
}

fn version_text() -> String {
    format!(
        "{} - {}, version {}\n\nReleased under the {} license\n",
        env!("CARGO_PKG_NAME"),
        LONG_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_LICENSE"),
    )
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout and succeeds; anything else is a usage error.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.version {
        print!("{}", version_text());
        return ExitCode::SUCCESS;
    }

    logging::init();
    exit_code(run())
}

/// 0 on success; otherwise report on stderr and 1.
fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = RunConfig::load().map_err(|e| anyhow!("Config error: {e}"))?;
    let source = RedditSource::new(config.filter_comments).map_err(RunError::from)?;

    run_with(&config, &source, &mut TerminalReader, &mut io::stdout().lock())?;
    Ok(())
}

/// One full run over the configured feeds.
fn run_with(
    config: &RunConfig,
    source: &dyn FeedSource,
    reader: &mut dyn LineReader,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let store = StateStore::new(&config.program_path);
    let mut action = CommandAction::from_config(config);

    Runner {
        source,
        store: &store,
        action: &mut action,
        reader,
        out,
        fallback_wait: pause::FALLBACK_WAIT,
    }
    .run(&config.subreddits)
}
