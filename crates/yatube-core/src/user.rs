//! Users: the identity posts are authored by.
//!
//! Accounts are created out-of-band (the `yatube create-user` command); the
//! blog itself only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const USERNAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:          i64,
  /// Unique; appears in `/profile/{username}/`.
  pub username:    String,
  pub date_joined: DateTime<Utc>,
}

/// Input to [`crate::store::BlogStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Usernames are 1..=150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<()> {
  let valid = !username.is_empty()
    && username.chars().count() <= USERNAME_MAX_LEN
    && username
      .chars()
      .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));

  if valid {
    Ok(())
  } else {
    Err(Error::InvalidUsername(username.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_cyrillic_and_punctuation() {
    assert!(validate_username("Irina").is_ok());
    assert!(validate_username("ирина.k+1@host-name_2").is_ok());
  }

  #[test]
  fn rejects_spaces_slashes_and_empty() {
    assert!(validate_username("").is_err());
    assert!(validate_username("two words").is_err());
    assert!(validate_username("a/b").is_err());
    assert!(validate_username(&"x".repeat(USERNAME_MAX_LEN + 1)).is_err());
  }
}
