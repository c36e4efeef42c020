//! Path builders for every page, so handlers and templates agree on routes.
//!
//! Path segments are percent-encoded; redirect targets must be valid header
//! values.

use urlencoding::encode;

pub fn index() -> String { "/".to_owned() }

pub fn group(slug: &str) -> String { format!("/group/{}/", encode(slug)) }

pub fn profile(username: &str) -> String { format!("/profile/{}/", encode(username)) }

pub fn post_detail(id: i64) -> String { format!("/posts/{id}/") }

pub fn post_edit(id: i64) -> String { format!("/posts/{id}/edit/") }

pub fn post_create() -> String { "/create/".to_owned() }

pub fn login(next: &str) -> String { format!("/auth/login/?next={}", encode(next)) }

/// Accept only local, absolute paths as a post-login destination.
pub fn safe_next(next: &str) -> &str {
  let local = next.starts_with('/')
    && !next.starts_with("//")
    && !next.contains('\\')
    && next.bytes().all(|b| b.is_ascii_graphic());
  if local { next } else { "/" }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_path_is_percent_encoded() {
    assert_eq!(profile("Irina"), "/profile/Irina/");
    assert_eq!(profile("Ирина"), "/profile/%D0%98%D1%80%D0%B8%D0%BD%D0%B0/");
  }

  #[test]
  fn login_carries_encoded_next() {
    assert_eq!(login("/create/"), "/auth/login/?next=%2Fcreate%2F");
    assert_eq!(login("/?page=2"), "/auth/login/?next=%2F%3Fpage%3D2");
  }

  #[test]
  fn next_must_be_local() {
    assert_eq!(safe_next("/posts/3/edit/"), "/posts/3/edit/");
    assert_eq!(safe_next("https://evil.example/"), "/");
    assert_eq!(safe_next("//evil.example/"), "/");
    assert_eq!(safe_next("/\\evil"), "/");
    assert_eq!(safe_next(""), "/");
  }
}
