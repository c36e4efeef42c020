//! [`SqliteStore`], the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use yatube_core::{
  group::{Group, NewGroup},
  paginate::PageWindow,
  post::{NewPost, Post, PostDraft, PostEntry, PostFilter},
  store::{BlogStore, NewSession},
  user::{NewUser, User, validate_username},
};

use crate::{
  Error, Result,
  encode::{
    POST_ENTRY_COLUMNS, POST_ENTRY_FROM, RawPostEntry, RawUser, decode_dt, encode_dt,
    encode_filter, encode_window, group_from_row, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Yatube store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the bare `posts` row for `id`.
  async fn get_post_row(&self, id: i64) -> Result<Option<Post>> {
    let raw: Option<(String, i64, Option<i64>, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT text, author_id, group_id, pub_date FROM posts WHERE id = ?1",
            rusqlite::params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(text, author_id, group_id, pub_date)| {
        Ok(Post { id, text, pub_date: decode_dt(&pub_date)?, author_id, group_id })
      })
      .transpose()
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    validate_username(&input.username)?;

    let date_joined = now();
    let username    = input.username.clone();
    let at_str      = encode_dt(date_joined);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![input.username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO users (username, password_hash, date_joined) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.username, input.password_hash, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or_else(|| Error::UsernameTaken(username.clone()))?;
    Ok(User { id, username, date_joined })
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, date_joined FROM users WHERE id = ?1",
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, date_joined FROM users WHERE username = ?1",
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
    let username = username.to_owned();

    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, date_joined, password_hash FROM users WHERE username = ?1",
            rusqlite::params![username],
            |row| Ok((RawUser::from_row(row)?, row.get(3)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(user, hash)| Ok((user.into_user()?, hash)))
      .transpose()
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn create_group(&self, input: NewGroup) -> Result<Group> {
    input.validate()?;

    let slug = input.slug.clone();
    let row  = input.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM post_groups WHERE slug = ?1",
            rusqlite::params![row.slug],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO post_groups (title, slug, description) VALUES (?1, ?2, ?3)",
          rusqlite::params![row.title, row.slug, row.description],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or(Error::SlugTaken(slug))?;
    Ok(Group {
      id,
      title:       input.title,
      slug:        input.slug,
      description: input.description,
    })
  }

  async fn get_group(&self, id: i64) -> Result<Option<Group>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn
            .query_row(
              "SELECT id, title, slug, description FROM post_groups WHERE id = ?1",
              rusqlite::params![id],
              group_from_row,
            )
            .optional()?)
        })
        .await?,
    )
  }

  async fn get_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
    let slug = slug.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn
            .query_row(
              "SELECT id, title, slug, description FROM post_groups WHERE slug = ?1",
              rusqlite::params![slug],
              group_from_row,
            )
            .optional()?)
        })
        .await?,
    )
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT id, title, slug, description FROM post_groups ORDER BY title, id",
          )?;
          let rows = stmt
            .query_map([], group_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let pub_date     = now();
    let pub_date_str = encode_dt(pub_date);
    let row          = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (text, pub_date, author_id, group_id) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![row.text, pub_date_str, row.author_id, row.group_id],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Post {
      id,
      text: input.text,
      pub_date,
      author_id: input.author_id,
      group_id: input.group_id,
    })
  }

  async fn get_post(&self, id: i64) -> Result<Option<PostEntry>> {
    let raw: Option<RawPostEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {POST_ENTRY_COLUMNS} {POST_ENTRY_FROM} WHERE p.id = ?1");
        Ok(conn
          .query_row(&sql, rusqlite::params![id], RawPostEntry::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPostEntry::into_entry).transpose()
  }

  async fn update_post(&self, id: i64, draft: PostDraft) -> Result<Post> {
    // Only text and group are writable; author_id and pub_date stay as
    // inserted.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET text = ?1, group_id = ?2 WHERE id = ?3",
          rusqlite::params![draft.text, draft.group_id, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PostNotFound(id));
    }

    self.get_post_row(id).await?.ok_or(Error::PostNotFound(id))
  }

  async fn count_posts(&self, filter: PostFilter) -> Result<u64> {
    let (where_clause, param) = encode_filter(filter);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM posts p {where_clause}");
        let count = match param {
          Some(p) => conn.query_row(&sql, rusqlite::params![p], |r| r.get(0))?,
          None => conn.query_row(&sql, [], |r| r.get(0))?,
        };
        Ok(count)
      })
      .await?;

    Ok(u64::try_from(count).unwrap_or_default())
  }

  async fn list_posts(&self, filter: PostFilter, window: PageWindow) -> Result<Vec<PostEntry>> {
    let (where_clause, param) = encode_filter(filter);
    let (limit, offset)       = encode_window(window);

    let raws: Vec<RawPostEntry> = self
      .conn
      .call(move |conn| {
        // Bound parameters are numbered so the same SQL text works with or
        // without the filter parameter.
        let sql = format!(
          "SELECT {POST_ENTRY_COLUMNS} {POST_ENTRY_FROM}
           {where_clause}
           ORDER BY p.pub_date DESC, p.id DESC
           LIMIT ?2 OFFSET ?3"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p, limit, offset], RawPostEntry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => {
            // ?1 is unused without a filter; bind NULL so numbering holds.
            stmt
              .query_map(
                rusqlite::params![Option::<i64>::None, limit, offset],
                RawPostEntry::from_row,
              )?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPostEntry::into_entry).collect()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, input: NewSession) -> Result<()> {
    let expires_str = encode_dt(input.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.token_hash, input.user_id, expires_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_session_user(
    &self,
    token_hash: &str,
    now:        DateTime<Utc>,
  ) -> Result<Option<User>> {
    let token_hash = token_hash.to_owned();
    let now_str    = encode_dt(now);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT u.id, u.username, u.date_joined
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = ?1 AND s.expires_at > ?2",
            rusqlite::params![token_hash, now_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<()> {
    let token_hash = token_hash.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
    let now_str = encode_dt(now);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?)
      })
      .await?;
    if removed > 0 {
      tracing::debug!(removed, "purged expired sessions");
    }
    Ok(u64::try_from(removed).unwrap_or_default())
  }
}
