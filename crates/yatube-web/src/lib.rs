//! HTTP layer for the Yatube blog.
//!
//! Exposes an axum [`Router`] serving the HTML pages (feeds, profiles, post
//! pages, the post form and login) backed by any [`BlogStore`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod urls;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{Method, Uri},
  response::Redirect,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use yatube_core::{
  paginate::{DEFAULT_PAGE_SIZE, Paginator},
  store::BlogStore,
};

use handlers::{create, detail, edit, listing, login};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `YATUBE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub database_path:     PathBuf,
  /// Posts per listing page.
  pub page_size:         u64,
  pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8000,
      database_path:     PathBuf::from("yatube.sqlite3"),
      page_size:         DEFAULT_PAGE_SIZE,
      session_ttl_hours: 24 * 14,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: BlogStore> {
  pub store:     Arc<S>,
  pub config:    Arc<ServerConfig>,
  pub paginator: Paginator,
}

impl<S: BlogStore> AppState<S> {
  /// Fails if the configured page size is zero.
  pub fn new(store: S, config: ServerConfig) -> yatube_core::Result<Self> {
    Ok(Self {
      store:     Arc::new(store),
      paginator: Paginator::new(config.page_size)?,
      config:    Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the blog.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/",                      get(listing::index::<S>))
    .route("/group/{slug}/",         get(listing::group_posts::<S>))
    .route("/profile/{username}/",   get(listing::profile::<S>))
    .route("/posts/{post_id}/",      get(detail::handler::<S>))
    .route("/posts/{post_id}/edit/", get(edit::form::<S>).post(edit::submit::<S>))
    .route("/create/",               get(create::form::<S>).post(create::submit::<S>))
    .route("/auth/login/",           get(login::form::<S>).post(login::submit::<S>))
    .route("/auth/logout/",          post(login::logout::<S>))
    .fallback(append_slash)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Every route ends in `/`. A GET or HEAD for the same path without it is
/// redirected to the slashed form, query kept; anything else is a 404.
async fn append_slash(method: Method, uri: Uri) -> Result<Redirect, Error> {
  let path = uri.path();
  let readable = method == Method::GET || method == Method::HEAD;
  if !readable || path.ends_with('/') || path.starts_with("//") {
    return Err(Error::NotFound);
  }

  let target = match uri.query() {
    Some(query) => format!("{path}/?{query}"),
    None => format!("{path}/"),
  };
  Ok(Redirect::permanent(&target))
}

// ─── Integration tests ────────────────────────────────────────────────────────
