//! Command handlers.

pub mod auth;
pub mod config;
pub mod posts;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use bloglist_core::app::{App, Severity};
use bloglist_core::config::Config;
use bloglist_core::storage::{FileStorage, Storage};

/// Builds the app against the configured API and the default session file.
pub fn open_app(config: &Config) -> Result<App<FileStorage>> {
    App::from_config(config, FileStorage::default_location()).context("configure API client")
}

/// Prints the live notification: success to stdout, failure as an error.
pub fn report<S: Storage>(app: &App<S>) -> Result<()> {
    match app.state.notification.current() {
        Some((message, Severity::Success)) => {
            println!("{message}");
            Ok(())
        }
        Some((message, Severity::Failure)) => Err(anyhow::anyhow!(message.to_string())),
        None => Ok(()),
    }
}

/// Fails unless a session was restored.
pub fn require_login<S: Storage>(app: &App<S>) -> Result<()> {
    if app.current_user().is_none() {
        anyhow::bail!("Not logged in. Run `bloglist login` first.");
    }
    Ok(())
}

/// Reads one trimmed line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Asks a yes/no question; anything but `y` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
