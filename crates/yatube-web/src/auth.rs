//! Session-cookie authentication: password hashing, session tokens and the
//! identity extractors used by handlers.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};
use yatube_core::{
  store::{BlogStore, NewSession},
  user::User,
};

use crate::{AppState, error::Error, urls};

pub const SESSION_COOKIE: &str = "sessionid";

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// Hex SHA-256 of a session token; the form stored in the database.
pub fn token_digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Open a session for `user` and return the token to hand to the client.
/// Sessions that have already expired are swept first.
pub async fn start_session<S>(store: &S, user: &User, ttl: Duration) -> Result<String, Error>
where
  S: BlogStore,
{
  let now = Utc::now();
  let purged = store
    .purge_expired_sessions(now)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if purged > 0 {
    tracing::debug!(purged, "removed expired sessions");
  }

  let token = new_token();
  store
    .create_session(NewSession {
      token_hash: token_digest(&token),
      user_id:    user.id,
      expires_at: now + ttl,
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(token)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// Whoever is making the request, if they are logged in. Never rejects for a
/// missing or stale session.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<User>);

impl Viewer {
  pub fn is_authenticated(&self) -> bool { self.0.is_some() }

  pub fn username(&self) -> &str { self.0.as_ref().map_or("", |u| u.username.as_str()) }

  pub fn profile_url(&self) -> String { urls::profile(self.username()) }
}

impl From<User> for Viewer {
  fn from(user: User) -> Self { Self(Some(user)) }
}

impl<S> FromRequestParts<AppState<S>> for Viewer
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(digest) = jar.get(SESSION_COOKIE).map(|c| token_digest(c.value())) else {
      return Ok(Viewer(None));
    };

    let user = state
      .store
      .get_session_user(&digest, Utc::now())
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    Ok(Viewer(user))
  }
}

/// An authenticated user. Requests without a live session are redirected to
/// the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Viewer(user) = Viewer::from_request_parts(parts, state).await?;
    user.map(CurrentUser).ok_or_else(|| Error::LoginRequired {
      next: parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned()),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn correct_password_verifies() {
    let hash = hash_password("secret").unwrap();
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("secret", "not-a-phc-string"));
  }

  #[test]
  fn tokens_are_random_and_digested() {
    let a = new_token();
    let b = new_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 64);
    assert_eq!(token_digest(&a).len(), 64);
    assert_ne!(token_digest(&a), a);
    assert_eq!(token_digest(&a), token_digest(&a));
  }

  #[test]
  fn viewer_username() {
    assert_eq!(Viewer::default().username(), "");
    assert!(!Viewer::default().is_authenticated());
  }
}
