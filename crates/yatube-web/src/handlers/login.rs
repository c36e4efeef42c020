//! `GET|POST /auth/login/` and `POST /auth/logout/`.

use axum::{
  Form,
  extract::{Query, State},
  response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use serde::Deserialize;
use yatube_core::store::BlogStore;

use crate::{
  AppState,
  auth::{
    SESSION_COOKIE, Viewer, expired_session_cookie, session_cookie, start_session,
    token_digest, verify_password,
  },
  error::Error,
  urls,
  views::{LoginTemplate, render},
};

pub const BAD_CREDENTIALS: &str = "Please enter a correct username and password.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
  pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
  #[serde(default)]
  pub next:     String,
}

/// `GET /auth/login/[?next=/path/]`
pub async fn form<S>(
  viewer: Viewer,
  Query(params): Query<LoginParams>,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render(&LoginTemplate {
    viewer,
    username: String::new(),
    next: params.next.unwrap_or_default(),
    error: String::new(),
  })
}

/// `POST /auth/login/`: on success sets the session cookie and redirects to
/// `next` (local paths only). Wrong credentials re-render the form.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  Form(body): Form<LoginBody>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let credentials = state
    .store
    .get_credentials(body.username.trim())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let user = match credentials {
    Some((user, hash)) if verify_password(&body.password, &hash) => user,
    _ => {
      tracing::warn!(username = %body.username, "failed login");
      let page = LoginTemplate {
        viewer:   Viewer::default(),
        username: body.username,
        next:     body.next,
        error:    BAD_CREDENTIALS.to_owned(),
      };
      return Ok(render(&page)?.into_response());
    }
  };

  let ttl   = Duration::hours(state.config.session_ttl_hours);
  let token = start_session(state.store.as_ref(), &user, ttl).await?;
  tracing::info!(username = %user.username, "logged in");

  let jar = jar.add(session_cookie(token));
  Ok((jar, Redirect::to(urls::safe_next(&body.next))).into_response())
}

/// `POST /auth/logout/`: ends the session (if any) and returns to the feed.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(cookie) = jar.get(SESSION_COOKIE) {
    state
      .store
      .delete_session(&token_digest(cookie.value()))
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
  }

  let jar = jar.remove(expired_session_cookie());
  Ok((jar, Redirect::to(&urls::index())).into_response())
}
