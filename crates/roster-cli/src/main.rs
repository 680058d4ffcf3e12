//! `roster` — command-line front end for the Roster session store and user
//! directory.
//!
//! # Usage
//!
//! ```text
//! roster login --email ann@example.com
//! roster users list
//! roster users add --name "Ann Lee" --email ann@example.com
//! roster --store ./roster.db users update 2 --name "Jane S."
//! roster logout
//! ```

mod app;
mod cli;
mod form;
mod settings;

use std::{io, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::{Cli, Command, UsersCommand};
use settings::{Settings, expand_tilde};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so command output stays clean on stdout.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(cli.config.as_deref())?;
  if let Some(path) = &cli.store {
    settings.store_path = expand_tilde(path);
  }
  tracing::debug!(?settings, "loaded settings");

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let command = confirm_removal(prompt_missing_passwords(cli.command)?)?;
  let app = App::open(Arc::new(store), settings.latency(), cli.json).await;
  app.run(command, &mut io::stdout().lock()).await
}

/// Fill in passwords that were not given as flags by reading stdin.
fn prompt_missing_passwords(command: Command) -> anyhow::Result<Command> {
  Ok(match command {
    Command::Login { email, password: None } => Command::Login {
      email,
      password: Some(read_line("Password: ")?),
    },
    Command::Signup { name, email, password, confirm_password } => {
      let password = match password {
        Some(p) => p,
        None => read_line("Password: ")?,
      };
      let confirm_password = match confirm_password {
        Some(p) => p,
        None => read_line("Confirm password: ")?,
      };
      Command::Signup {
        name,
        email,
        password: Some(password),
        confirm_password: Some(confirm_password),
      }
    }
    other => other,
  })
}

/// Ask before deleting a user unless `--yes` was given.
fn confirm_removal(command: Command) -> anyhow::Result<Command> {
  Ok(match command {
    Command::Users(UsersCommand::Remove { id, yes: false }) => {
      let answer = read_line(&format!(
        "Delete user {id}? This action cannot be undone. [y/N] "
      ))?;
      let yes = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
      Command::Users(UsersCommand::Remove { id, yes })
    }
    other => other,
  })
}

/// Read a line from stdin after printing `prompt`.
fn read_line(prompt: &str) -> anyhow::Result<String> {
  use std::io::{BufRead, Write};
  print!("{prompt}");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
