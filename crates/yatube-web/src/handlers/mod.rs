pub mod create;
pub mod detail;
pub mod edit;
pub mod listing;
pub mod login;

use std::convert::Infallible;

use axum::{
  extract::{FromRequestParts, Query},
  http::request::Parts,
};
use yatube_core::{
  paginate::Page,
  post::{PostEntry, PostFilter},
  store::BlogStore,
};

use crate::{AppState, error::Error, views::PostRow};

/// `?page=` as typed by the user; resolved by the paginator.
///
/// Never rejects: a repeated `page` takes its last value and a malformed
/// query string counts as no page at all.
#[derive(Debug, Default)]
pub struct PageParams {
  pub page: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for PageParams {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let page = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
      .ok()
      .and_then(|Query(pairs)| {
        pairs
          .into_iter()
          .rev()
          .find(|(key, _)| key == "page")
          .map(|(_, value)| value)
      });
    Ok(Self { page })
  }
}

/// Post ids in paths are integers; anything else is simply not a post.
pub(crate) fn parse_post_id(raw: &str) -> Result<i64, Error> {
  raw.parse().map_err(|_| Error::NotFound)
}

pub(crate) async fn fetch_post<S>(state: &AppState<S>, raw_id: &str) -> Result<PostEntry, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_post_id(raw_id)?;
  state
    .store
    .get_post(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)
}

/// Count, resolve the requested page, then load only that window.
pub(crate) async fn load_page<S>(
  state: &AppState<S>,
  filter: PostFilter,
  requested: Option<&str>,
) -> Result<Page<PostRow>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = state
    .store
    .count_posts(filter)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let window  = state.paginator.window(requested, count);
  let entries = state
    .store
    .list_posts(filter, window)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(state.paginator.page(window, count, entries).map(PostRow::from))
}
