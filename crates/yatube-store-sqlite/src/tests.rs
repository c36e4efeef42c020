//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use yatube_core::{
  group::{Group, NewGroup},
  paginate::Paginator,
  post::{NewPost, PostDraft, PostFilter},
  store::{BlogStore, NewSession},
  user::{NewUser, User},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, username: &str) -> User {
  s.create_user(NewUser {
    username:      username.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
  })
  .await
  .unwrap()
}

async fn group(s: &SqliteStore, slug: &str) -> Group {
  s.create_group(NewGroup {
    title:       format!("group {slug}"),
    slug:        slug.into(),
    description: "test_description".into(),
  })
  .await
  .unwrap()
}

fn new_post(author: &User, text: &str, group: Option<&Group>) -> NewPost {
  NewPost {
    text:      text.into(),
    author_id: author.id,
    group_id:  group.map(|g| g.id),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_look_up_user() {
  let s = store().await;
  let irina = user(&s, "Irina").await;

  let by_name = s.get_user_by_username("Irina").await.unwrap().unwrap();
  assert_eq!(by_name, irina);

  let by_id = s.get_user(irina.id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "Irina");

  assert!(s.get_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  user(&s, "Irina").await;

  let err = s
    .create_user(NewUser { username: "Irina".into(), password_hash: "x".into() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UsernameTaken(ref name) if name == "Irina"));
}

#[tokio::test]
async fn invalid_username_is_rejected() {
  let s = store().await;
  let err = s
    .create_user(NewUser { username: "bad name".into(), password_hash: "x".into() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(_)));
}

#[tokio::test]
async fn credentials_include_hash() {
  let s = store().await;
  let irina = user(&s, "Irina").await;

  let (found, hash) = s.get_credentials("Irina").await.unwrap().unwrap();
  assert_eq!(found.id, irina.id);
  assert!(hash.starts_with("$argon2id$"));
  assert!(s.get_credentials("nobody").await.unwrap().is_none());
}

// ─── Groups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_look_up_group() {
  let s = store().await;
  let night = group(&s, "night").await;

  let by_slug = s.get_group_by_slug("night").await.unwrap().unwrap();
  assert_eq!(by_slug, night);
  assert_eq!(s.get_group(night.id).await.unwrap(), Some(night));
  assert!(s.get_group_by_slug("day").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
  let s = store().await;
  group(&s, "night").await;

  let err = s
    .create_group(NewGroup {
      title:       "another".into(),
      slug:        "night".into(),
      description: String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SlugTaken(_)));
}

#[tokio::test]
async fn groups_are_listed_by_title() {
  let s = store().await;
  s.create_group(NewGroup { title: "b".into(), slug: "b".into(), description: String::new() })
    .await
    .unwrap();
  s.create_group(NewGroup { title: "a".into(), slug: "a".into(), description: String::new() })
    .await
    .unwrap();

  let titles: Vec<String> = s
    .list_groups()
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.title)
    .collect();
  assert_eq!(titles, ["a", "b"]);
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_and_get_joined_entry() {
  let s = store().await;
  let author = user(&s, "test_author").await;
  let night = group(&s, "night").await;

  let post = s
    .create_post(new_post(&author, "test_post", Some(&night)))
    .await
    .unwrap();

  let entry = s.get_post(post.id).await.unwrap().unwrap();
  assert_eq!(entry.post, post);
  assert_eq!(entry.author, author);
  assert_eq!(entry.group, Some(night));
}

#[tokio::test]
async fn post_without_group() {
  let s = store().await;
  let author = user(&s, "test_author").await;

  let post = s.create_post(new_post(&author, "loose", None)).await.unwrap();
  let entry = s.get_post(post.id).await.unwrap().unwrap();
  assert!(entry.group.is_none());
  assert!(entry.post.group_id.is_none());
}

#[tokio::test]
async fn missing_post_returns_none() {
  let s = store().await;
  assert!(s.get_post(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn post_requires_existing_author() {
  let s = store().await;
  let err = s
    .create_post(NewPost { text: "orphan".into(), author_id: 99, group_id: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn update_changes_text_and_group_only() {
  let s = store().await;
  let author = user(&s, "Irina").await;
  let night = group(&s, "night").await;
  let post = s
    .create_post(new_post(&author, "Текст тестового поста", None))
    .await
    .unwrap();

  let updated = s
    .update_post(
      post.id,
      PostDraft { text: "Обновленный текст".into(), group_id: Some(night.id) },
    )
    .await
    .unwrap();

  assert_eq!(updated.text, "Обновленный текст");
  assert_eq!(updated.group_id, Some(night.id));
  assert_eq!(updated.author_id, author.id);
  assert_eq!(updated.pub_date, post.pub_date);
}

#[tokio::test]
async fn update_missing_post_fails() {
  let s = store().await;
  let err = s
    .update_post(7, PostDraft { text: "x".into(), group_id: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PostNotFound(7)));
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listings_are_newest_first() {
  let s = store().await;
  let author = user(&s, "test_author").await;
  for i in 0..3 {
    s.create_post(new_post(&author, &format!("post {i}"), None))
      .await
      .unwrap();
  }

  let window = Paginator::default().window(None, 3);
  let texts: Vec<String> = s
    .list_posts(PostFilter::All, window)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.post.text)
    .collect();
  assert_eq!(texts, ["post 2", "post 1", "post 0"]);
}

#[tokio::test]
async fn thirteen_posts_page_as_ten_and_three() {
  let s = store().await;
  let author = user(&s, "test_user").await;
  let g = group(&s, "test-slug").await;
  for i in 0..13 {
    s.create_post(new_post(&author, &format!("test_post{i}"), Some(&g)))
      .await
      .unwrap();
  }

  let paginator = Paginator::default();
  for filter in [PostFilter::All, PostFilter::Group(g.id), PostFilter::Author(author.id)] {
    let count = s.count_posts(filter).await.unwrap();
    assert_eq!(count, 13);

    let first = s
      .list_posts(filter, paginator.window(None, count))
      .await
      .unwrap();
    assert_eq!(first.len(), 10, "{filter:?}");

    let second = s
      .list_posts(filter, paginator.window(Some("2"), count))
      .await
      .unwrap();
    assert_eq!(second.len(), 3, "{filter:?}");
  }
}

#[tokio::test]
async fn filters_restrict_listing() {
  let s = store().await;
  let author = user(&s, "test_author").await;
  let other = user(&s, "test_not_author").await;
  let night = group(&s, "night").await;
  let day = group(&s, "day").await;

  s.create_post(new_post(&author, "a-night", Some(&night))).await.unwrap();
  s.create_post(new_post(&author, "a-none", None)).await.unwrap();
  s.create_post(new_post(&other, "o-day", Some(&day))).await.unwrap();

  assert_eq!(s.count_posts(PostFilter::All).await.unwrap(), 3);
  assert_eq!(s.count_posts(PostFilter::Author(author.id)).await.unwrap(), 2);
  assert_eq!(s.count_posts(PostFilter::Group(night.id)).await.unwrap(), 1);

  let window = Paginator::default().window(None, 3);
  let in_day = s.list_posts(PostFilter::Group(day.id), window).await.unwrap();
  assert_eq!(in_day.len(), 1);
  assert_eq!(in_day[0].author, other);
  assert_eq!(in_day[0].group.as_ref().map(|g| g.slug.as_str()), Some("day"));
}

#[tokio::test]
async fn empty_group_lists_nothing() {
  let s = store().await;
  let g = group(&s, "empty").await;

  let count = s.count_posts(PostFilter::Group(g.id)).await.unwrap();
  assert_eq!(count, 0);
  let window = Paginator::default().window(Some("3"), count);
  assert!(s.list_posts(PostFilter::Group(g.id), window).await.unwrap().is_empty());
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_resolves_to_user_until_expiry() {
  let s = store().await;
  let irina = user(&s, "Irina").await;
  let now = Utc::now();

  s.create_session(NewSession {
    token_hash: "abc".into(),
    user_id:    irina.id,
    expires_at: now + Duration::hours(1),
  })
  .await
  .unwrap();

  assert_eq!(s.get_session_user("abc", now).await.unwrap(), Some(irina));
  assert!(s.get_session_user("abc", now + Duration::hours(2)).await.unwrap().is_none());
  assert!(s.get_session_user("other", now).await.unwrap().is_none());
}

#[tokio::test]
async fn deleted_and_purged_sessions_are_gone() {
  let s = store().await;
  let irina = user(&s, "Irina").await;
  let now = Utc::now();

  for (hash, ttl) in [("live", 1), ("stale", -1)] {
    s.create_session(NewSession {
      token_hash: hash.into(),
      user_id:    irina.id,
      expires_at: now + Duration::hours(ttl),
    })
    .await
    .unwrap();
  }

  assert_eq!(s.purge_expired_sessions(now).await.unwrap(), 1);

  s.delete_session("live").await.unwrap();
  assert!(s.get_session_user("live", now).await.unwrap().is_none());
}
