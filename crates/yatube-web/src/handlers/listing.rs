//! Paginated post listings: the global feed, one group, one author.

use axum::{
  extract::{Path, State},
  response::Html,
};
use yatube_core::{post::PostFilter, store::BlogStore};

use super::{PageParams, load_page};
use crate::{
  AppState,
  auth::Viewer,
  error::Error,
  views::{GroupTemplate, IndexTemplate, ProfileTemplate, render},
};

/// `GET /[?page=N]`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  params: PageParams,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = load_page(&state, PostFilter::All, params.page.as_deref()).await?;
  render(&IndexTemplate { viewer, page })
}

/// `GET /group/{slug}/[?page=N]`, 404 if the slug is unknown.
pub async fn group_posts<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Path(slug): Path<String>,
  params: PageParams,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let group = state
    .store
    .get_group_by_slug(&slug)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  let page = load_page(&state, PostFilter::Group(group.id), params.page.as_deref()).await?;
  render(&GroupTemplate { viewer, group, page })
}

/// `GET /profile/{username}/[?page=N]`, 404 if the user is unknown.
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Path(username): Path<String>,
  params: PageParams,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let author = state
    .store
    .get_user_by_username(&username)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  let page = load_page(&state, PostFilter::Author(author.id), params.page.as_deref()).await?;
  // The page already counted every post by the author.
  let post_count = page.count;
  render(&ProfileTemplate { viewer, author, post_count, page })
}
