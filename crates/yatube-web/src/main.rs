//! yatube server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `YATUBE_*`
//! environment variables, opens the SQLite store and serves the blog over
//! HTTP. The `create-user` and `create-group` subcommands seed the database,
//! since the site itself has no signup or group admin pages.
//!
//! ```
//! echo secret | cargo run -p yatube-web --bin yatube -- create-user --username Irina
//! cargo run -p yatube-web --bin yatube -- create-group --title Night --slug night
//! cargo run -p yatube-web --bin yatube
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yatube_core::{group::NewGroup, store::BlogStore, user::NewUser};
use yatube_store_sqlite::SqliteStore;
use yatube_web::{AppState, ServerConfig, auth};

#[derive(Parser)]
#[command(author, version, about = "Yatube blog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the site (the default).
  Serve,
  /// Create a user; the password is read from stdin.
  CreateUser {
    #[arg(long)]
    username: String,
  },
  /// Create a group posts can be filed under.
  CreateGroup {
    #[arg(long)]
    title:       String,
    #[arg(long)]
    slug:        String,
    #[arg(long, default_value = "")]
    description: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("YATUBE").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, server_cfg).await,
    Command::CreateUser { username } => {
      let password = rpassword_or_stdin()?;
      anyhow::ensure!(!password.is_empty(), "password must not be empty");
      let password_hash = auth::hash_password(&password)?;

      let user = store
        .create_user(NewUser { username, password_hash })
        .await
        .context("failed to create user")?;
      println!("created user {} (id {})", user.username, user.id);
      Ok(())
    }
    Command::CreateGroup { title, slug, description } => {
      let group = store
        .create_group(NewGroup { title, slug, description })
        .await
        .context("failed to create group")?;
      println!("created group {} at /group/{}/", group.title, group.slug);
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let purged = store
    .purge_expired_sessions(Utc::now())
    .await
    .context("failed to purge expired sessions")?;
  if purged > 0 {
    tracing::info!(purged, "removed expired sessions");
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(store, server_cfg).context("invalid configuration")?;
  let app = yatube_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn rpassword_or_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, IsTerminal, Write};
  let stdin = io::stdin();
  if stdin.is_terminal() {
    print!("Password: ");
    io::stdout().flush().ok();
  }
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
