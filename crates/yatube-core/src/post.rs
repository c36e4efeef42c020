//! Posts: a user-authored text entry, optionally filed under a group.
//!
//! The author is fixed when the post is created and never changes. Only the
//! text and the group can be edited afterwards, and only by the author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{group::Group, user::User};

// ─── Stored row ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:        i64,
  pub text:      String,
  /// Server-assigned creation timestamp; never changes.
  pub pub_date:  DateTime<Utc>,
  pub author_id: i64,
  pub group_id:  Option<i64>,
}

// ─── Write inputs ────────────────────────────────────────────────────────────

/// The user-editable part of a post, as produced by
/// [`crate::form::PostFormInput::validate`].
///
/// A draft carries no author. Whoever persists it decides who the author is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
  pub text:     String,
  pub group_id: Option<i64>,
}

impl PostDraft {
  /// Attach an author, producing a [`NewPost`] ready to be stored.
  pub fn authored_by(self, author: &User) -> NewPost {
    NewPost {
      text:      self.text,
      author_id: author.id,
      group_id:  self.group_id,
    }
  }
}

/// Input to [`crate::store::BlogStore::create_post`].
/// `pub_date` is always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
  pub text:      String,
  pub author_id: i64,
  pub group_id:  Option<i64>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A post joined with its author and group, fetched in one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
  pub post:   Post,
  pub author: User,
  pub group:  Option<Group>,
}

impl PostEntry {
  /// Whether `user` may edit this post. Only the author may.
  pub fn editable_by(&self, user: &User) -> bool {
    self.post.author_id == user.id
  }
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
  All,
  Group(i64),
  Author(i64),
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: i64, name: &str) -> User {
    User { id, username: name.into(), date_joined: Utc::now() }
  }

  #[test]
  fn draft_takes_author_from_caller() {
    let draft = PostDraft { text: "Новый пост".into(), group_id: Some(3) };
    let new_post = draft.authored_by(&user(7, "Irina"));
    assert_eq!(new_post.author_id, 7);
    assert_eq!(new_post.group_id, Some(3));
    assert_eq!(new_post.text, "Новый пост");
  }

  #[test]
  fn only_author_may_edit() {
    let author = user(1, "test_author");
    let other = user(2, "test_not_author");
    let entry = PostEntry {
      post:   Post {
        id:        10,
        text:      "test_post".into(),
        pub_date:  Utc::now(),
        author_id: author.id,
        group_id:  None,
      },
      author: author.clone(),
      group:  None,
    };

    assert!(entry.editable_by(&author));
    assert!(!entry.editable_by(&other));
  }
}
