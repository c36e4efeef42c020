//! Error type for `yatube-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] yatube_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("group slug {0:?} is already taken")]
  SlugTaken(String),

  #[error("post not found: {0}")]
  PostNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
