//! Command dispatch over the session store and user directory.

use std::{io::Write, sync::Arc};

use anyhow::{Result, bail};
use chrono::Utc;
use roster_core::{
  identity::{SignInCredentials, SignUpCredentials},
  overview::Overview,
  storage::KeyValueStore,
  user::{NewUser, UserPatch, UserRecord},
};
use roster_service::{AuthError, DirectoryError, Latency, SessionStore, UserDirectory};

use crate::{
  cli::{Command, UsersCommand},
  form,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The front end's view of the core: one session store and one directory
/// sharing the same storage.
pub struct App<S> {
  session: SessionStore<S>,
  users:   UserDirectory<S>,
  json:    bool,
}

impl<S: KeyValueStore + 'static> App<S> {
  pub async fn open(storage: Arc<S>, latency: Latency, json: bool) -> Self {
    let session = SessionStore::open(storage.clone(), latency.auth).await;
    let users = UserDirectory::new(storage, latency.directory);
    Self { session, users, json }
  }

  pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
      Command::Login { email, password } => {
        let creds = SignInCredentials::new(email, password.unwrap_or_default());
        self.login(creds, out).await
      }
      Command::Signup { name, email, password, confirm_password } => {
        let creds = SignUpCredentials {
          name,
          email,
          password: password.unwrap_or_default(),
          confirm_password: confirm_password.unwrap_or_default(),
        };
        self.signup(creds, out).await
      }
      Command::Logout => {
        self.session.sign_out().await;
        writeln!(out, "Signed out")?;
        Ok(())
      }
      Command::Whoami => {
        match self.session.identity() {
          Some(me) => writeln!(out, "{} <{}>", me.name, me.email)?,
          None => writeln!(out, "Not signed in")?,
        }
        Ok(())
      }
      Command::Users(cmd) => {
        if self.session.identity().is_none() {
          bail!("Not signed in; run `roster login` first");
        }
        self.users(cmd, out).await
      }
    }
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  async fn login(&self, creds: SignInCredentials, out: &mut impl Write) -> Result<()> {
    form::sign_in(&creds)?;
    match self.session.sign_in(creds).await {
      Ok(me) => {
        writeln!(out, "Signed in as {} <{}>", me.name, me.email)?;
        Ok(())
      }
      Err(AuthError::InvalidCredentials) => bail!("Invalid email or password"),
      Err(e) => Err(e.into()),
    }
  }

  async fn signup(&self, creds: SignUpCredentials, out: &mut impl Write) -> Result<()> {
    form::sign_up(&creds)?;
    match self.session.sign_up(creds).await {
      Ok(me) => {
        writeln!(out, "Account created; signed in as {} <{}>", me.name, me.email)?;
        Ok(())
      }
      Err(AuthError::SignUpFailed) => {
        bail!("Failed to create account. Please try again.")
      }
      Err(e) => Err(e.into()),
    }
  }

  // ── Directory ─────────────────────────────────────────────────────────────

  async fn users(&self, cmd: UsersCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
      UsersCommand::List => {
        let users = self.users.list().await?;
        self.print_list(&users, out)
      }
      UsersCommand::Stats => {
        let users = self.users.list().await?;
        self.print_overview(Overview::of(&users, Utc::now()), out)
      }
      UsersCommand::Show { id } => match self.users.get(&id).await? {
        Some(user) => self.print_one(&user, out),
        None => Err(DirectoryError::UserNotFound(id).into()),
      },
      UsersCommand::Add { name, email } => {
        let input = NewUser { name, email };
        form::new_user(&input)?;
        let user = self.users.create(input).await?;
        self.print_one(&user, out)
      }
      UsersCommand::Update { id, name, email } => {
        let patch = UserPatch { name, email };
        form::user_patch(&patch)?;
        let user = self.users.update(&id, patch).await?;
        self.print_one(&user, out)
      }
      UsersCommand::Remove { id, yes: false } => {
        writeln!(out, "Cancelled; {id} was not deleted")?;
        Ok(())
      }
      UsersCommand::Remove { id, yes: true } => {
        self.users.delete(&id).await?;
        writeln!(out, "Deleted {id}")?;
        Ok(())
      }
    }
  }

  fn print_list(&self, users: &[UserRecord], out: &mut impl Write) -> Result<()> {
    if self.json {
      writeln!(out, "{}", serde_json::to_string_pretty(users)?)?;
      return Ok(());
    }
    writeln!(
      out,
      "{:<36}  {:<24}  {:<28}  {:<10}  UPDATED",
      "ID", "NAME", "EMAIL", "CREATED"
    )?;
    for user in users {
      writeln!(
        out,
        "{:<36}  {:<24}  {:<28}  {:<10}  {}",
        user.id,
        user.name,
        user.email,
        user.created_at.format(DATE_FORMAT),
        user.updated_at.format(DATE_FORMAT),
      )?;
    }
    Ok(())
  }

  fn print_overview(&self, overview: Overview, out: &mut impl Write) -> Result<()> {
    if self.json {
      writeln!(out, "{}", serde_json::to_string_pretty(&overview)?)?;
      return Ok(());
    }
    writeln!(out, "Total users:    {}", overview.total)?;
    writeln!(out, "New this week:  {}", overview.new_this_week)?;
    writeln!(out, "Updated today:  {}", overview.updated_today)?;
    Ok(())
  }

  fn print_one(&self, user: &UserRecord, out: &mut impl Write) -> Result<()> {
    if self.json {
      writeln!(out, "{}", serde_json::to_string_pretty(user)?)?;
      return Ok(());
    }
    writeln!(out, "id:       {}", user.id)?;
    writeln!(out, "name:     {}", user.name)?;
    writeln!(out, "email:    {}", user.email)?;
    writeln!(out, "created:  {}", user.created_at.to_rfc3339())?;
    writeln!(out, "updated:  {}", user.updated_at.to_rfc3339())?;
    Ok(())
  }
}
