//! `GET /posts/{post_id}/`

use axum::{
  extract::{Path, State},
  response::Html,
};
use yatube_core::{post::PostFilter, store::BlogStore};

use super::fetch_post;
use crate::{
  AppState,
  auth::Viewer,
  error::Error,
  views::{PostDetailTemplate, PostRow, render},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  viewer: Viewer,
  Path(post_id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = fetch_post(&state, &post_id).await?;

  let post_count = state
    .store
    .count_posts(PostFilter::Author(entry.author.id))
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let can_edit = viewer.0.as_ref().is_some_and(|u| entry.editable_by(u));

  render(&PostDetailTemplate {
    viewer,
    post: PostRow::from(entry),
    post_count,
    can_edit,
  })
}
