//! The `BlogStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `yatube-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.
//! Every read is an explicit query; listings return posts already joined with
//! their author and group.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  group::{Group, NewGroup},
  paginate::PageWindow,
  post::{NewPost, Post, PostDraft, PostEntry, PostFilter},
  user::{NewUser, User},
};

/// A login session. Only a digest of the cookie token is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
  /// Hex SHA-256 of the token handed to the client.
  pub token_hash: String,
  pub user_id:    i64,
  pub expires_at: DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Yatube store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// The user and their stored password hash, for login.
  fn get_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<(User, String)>, Self::Error>> + Send + 'a;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Persist a new group. Fails if the slug is taken.
  fn create_group(
    &self,
    input: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn get_group(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  fn get_group_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// All groups ordered by title; the choices offered by the post form.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post. `pub_date` is set by the store.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// A post joined with its author and group. Returns `None` if not found.
  fn get_post(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PostEntry>, Self::Error>> + Send + '_;

  /// Replace the text and group of an existing post. The author and
  /// `pub_date` are left untouched.
  fn update_post(
    &self,
    id: i64,
    draft: PostDraft,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Number of posts matching `filter`, ignoring pagination.
  fn count_posts(
    &self,
    filter: PostFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// One window of posts matching `filter`, newest first.
  fn list_posts(
    &self,
    filter: PostFilter,
    window: PageWindow,
  ) -> impl Future<Output = Result<Vec<PostEntry>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The user owning an unexpired session, if any.
  fn get_session_user<'a>(
    &'a self,
    token_hash: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete every session that expired at or before `now`; returns how many
  /// were removed.
  fn purge_expired_sessions(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
