//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Sign in and manage the user directory")]
pub struct Cli {
  /// Path to a TOML settings file (default: ./roster.toml if present).
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// SQLite file to use instead of the configured store path.
  #[arg(long, value_name = "PATH")]
  pub store: Option<PathBuf>,

  /// Print records as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Sign in with an email and password.
  Login {
    #[arg(long)]
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
  },

  /// Create an account and sign in.
  Signup {
    #[arg(long)]
    name:             String,
    #[arg(long)]
    email:            String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password:         Option<String>,
    /// Read from stdin when omitted.
    #[arg(long)]
    confirm_password: Option<String>,
  },

  /// Sign out and forget the stored session.
  Logout,

  /// Show the signed-in identity.
  Whoami,

  /// Manage the user directory (requires a signed-in session).
  #[command(subcommand)]
  Users(UsersCommand),
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
  /// List all users in insertion order.
  List,
  /// Show total, new-this-week and updated-today counts.
  Stats,
  /// Show one user.
  Show { id: String },
  /// Add a user.
  Add {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
  },
  /// Change a user's name and/or email.
  Update {
    id:    String,
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    email: Option<String>,
  },
  /// Delete a user. Asks for confirmation unless `--yes` is given.
  Remove {
    id:  String,
    #[arg(short, long)]
    yes: bool,
  },
}
