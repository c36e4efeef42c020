//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! so that lexical order in SQL equals chronological order.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use yatube_core::{
  group::Group,
  paginate::PageWindow,
  post::{Post, PostEntry, PostFilter},
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision stored in the database, so a row handed
/// back by `create_*` equals the same row read back later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Filters and windows ─────────────────────────────────────────────────────

/// `WHERE` clause and its single bound parameter (if any) for a filter.
pub fn encode_filter(filter: PostFilter) -> (&'static str, Option<i64>) {
  match filter {
    PostFilter::All => ("", None),
    PostFilter::Group(id) => ("WHERE p.group_id = ?1", Some(id)),
    PostFilter::Author(id) => ("WHERE p.author_id = ?1", Some(id)),
  }
}

/// `(limit, offset)` as SQLite integers.
pub fn encode_window(window: PageWindow) -> (i64, i64) {
  (
    i64::try_from(window.limit).unwrap_or(i64::MAX),
    i64::try_from(window.offset).unwrap_or(i64::MAX),
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected by every post query, in order. Rows are read with
/// [`RawPostEntry::from_row`].
pub const POST_ENTRY_COLUMNS: &str = "
  p.id, p.text, p.pub_date, p.author_id, p.group_id,
  u.username, u.date_joined,
  g.title, g.slug, g.description";

pub const POST_ENTRY_FROM: &str = "
  FROM posts p
  JOIN users u            ON u.id = p.author_id
  LEFT JOIN post_groups g ON g.id = p.group_id";

/// Raw values read directly from a `posts` row joined with its author and
/// group.
pub struct RawPostEntry {
  // posts columns
  pub id:                i64,
  pub text:              String,
  pub pub_date:          String,
  pub author_id:         i64,
  pub group_id:          Option<i64>,
  // users join
  pub username:          String,
  pub date_joined:       String,
  // post_groups join
  pub group_title:       Option<String>,
  pub group_slug:        Option<String>,
  pub group_description: Option<String>,
}

impl RawPostEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      text:              row.get(1)?,
      pub_date:          row.get(2)?,
      author_id:         row.get(3)?,
      group_id:          row.get(4)?,
      username:          row.get(5)?,
      date_joined:       row.get(6)?,
      group_title:       row.get(7)?,
      group_slug:        row.get(8)?,
      group_description: row.get(9)?,
    })
  }

  pub fn into_entry(self) -> Result<PostEntry> {
    let author = User {
      id:          self.author_id,
      username:    self.username,
      date_joined: decode_dt(&self.date_joined)?,
    };

    let group = match (self.group_id, self.group_title, self.group_slug) {
      (Some(id), Some(title), Some(slug)) => Some(Group {
        id,
        title,
        slug,
        description: self.group_description.unwrap_or_default(),
      }),
      _ => None,
    };

    let post = Post {
      id:        self.id,
      text:      self.text,
      pub_date:  decode_dt(&self.pub_date)?,
      author_id: self.author_id,
      group_id:  group.as_ref().map(|g| g.id),
    };

    Ok(PostEntry { post, author, group })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:          i64,
  pub username:    String,
  pub date_joined: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      username:    row.get(1)?,
      date_joined: row.get(2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:          self.id,
      username:    self.username,
      date_joined: decode_dt(&self.date_joined)?,
    })
  }
}

pub fn group_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
  Ok(Group {
    id:          row.get(0)?,
    title:       row.get(1)?,
    slug:        row.get(2)?,
    description: row.get(3)?,
  })
}
