//! Groups: a named category posts may be filed under.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:          i64,
  pub title:       String,
  /// Unique, URL-safe identifier used in `/group/{slug}/`.
  pub slug:        String,
  pub description: String,
}

/// Input to [`crate::store::BlogStore::create_group`].
#[derive(Debug, Clone)]
pub struct NewGroup {
  pub title:       String,
  pub slug:        String,
  pub description: String,
}

impl NewGroup {
  /// Check the title is present and the slug is URL-safe.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyTitle);
    }
    validate_slug(&self.slug)
  }
}

/// Slugs consist of ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(slug: &str) -> Result<()> {
  let valid = !slug.is_empty()
    && slug
      .bytes()
      .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

  if valid {
    Ok(())
  } else {
    Err(Error::InvalidSlug(slug.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slug_rules() {
    assert!(validate_slug("night").is_ok());
    assert!(validate_slug("test-slug_2").is_ok());
    assert!(validate_slug("").is_err());
    assert!(validate_slug("ночь").is_err());
    assert!(validate_slug("with space").is_err());
  }

  #[test]
  fn group_requires_title() {
    let group = NewGroup {
      title:       "  ".into(),
      slug:        "night".into(),
      description: String::new(),
    };
    assert!(matches!(group.validate(), Err(Error::EmptyTitle)));
  }
}
