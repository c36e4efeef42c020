//! Error types for `yatube-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid username {0:?}: use letters, digits and @/./+/-/_ only")]
  InvalidUsername(String),

  #[error("invalid slug {0:?}: use letters, digits, hyphens and underscores only")]
  InvalidSlug(String),

  #[error("group title must not be empty")]
  EmptyTitle,

  #[error("page size must be at least 1")]
  ZeroPageSize,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
