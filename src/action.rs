//! Running the user's command on new URLs.

use std::io::Write;
use std::process::Command;

use crate::config::RunConfig;
use crate::error::{ActionError, RunError};

/// What to do with the new URLs of one feed.
pub trait Action {
    /// Report `urls` on `out`, then act on them.
    fn invoke(&mut self, urls: &[String], out: &mut dyn Write) -> Result<(), RunError>;
}

/// Runs `command [args...] url...` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandAction {
    command: String,
    args: Vec<String>,
}

impl CommandAction {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.command.clone(), config.command_args.clone())
    }

    fn run(&self, urls: &[String]) -> Result<(), ActionError> {
        tracing::debug!(command = %self.command, args = ?self.args, urls = urls.len(), "running command");

        let status = Command::new(&self.command)
            .args(&self.args)
            .args(urls)
            .status()
            .map_err(|source| ActionError::Launch {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ActionError::Failed {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl Action for CommandAction {
    fn invoke(&mut self, urls: &[String], out: &mut dyn Write) -> Result<(), RunError> {
        for url in urls {
            writeln!(out, "URL: {url}")?;
        }
        out.flush()?;
        self.run(urls)?;
        Ok(())
    }
}
