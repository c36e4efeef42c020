//! `GET|POST /posts/{post_id}/edit/`: login required, author only.
//!
//! A logged-in user who is not the author is sent to the post's page without
//! an error, on both GET and POST, and nothing is written.

use axum::{
  Form,
  extract::{Path, State},
  response::{IntoResponse, Redirect, Response},
};
use yatube_core::{
  form::{FormErrors, PostFormInput},
  post::PostEntry,
  store::BlogStore,
  user::User,
};

use super::fetch_post;
use crate::{
  AppState,
  auth::{CurrentUser, Viewer},
  error::Error,
  urls,
  views::{PostFormTemplate, render},
};

fn refuse(entry: &PostEntry, user: &User) -> Response {
  tracing::warn!(
    post_id = entry.post.id,
    author = %entry.author.username,
    requester = %user.username,
    "edit refused: requester is not the author",
  );
  Redirect::to(&urls::post_detail(entry.post.id)).into_response()
}

pub async fn form<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(post_id): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = fetch_post(&state, &post_id).await?;
  if !entry.editable_by(&user) {
    return Ok(refuse(&entry, &user));
  }

  let groups = state
    .store
    .list_groups()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let page = PostFormTemplate::new(
    Viewer::from(user),
    &PostFormInput::from_entry(&entry),
    &FormErrors::default(),
    &groups,
    Some(entry.post.id),
  );
  Ok(render(&page)?.into_response())
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(post_id): Path<String>,
  Form(input): Form<PostFormInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = fetch_post(&state, &post_id).await?;
  if !entry.editable_by(&user) {
    return Ok(refuse(&entry, &user));
  }

  let groups = state
    .store
    .list_groups()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  match input.validate(&groups) {
    Ok(draft) => {
      let post = state
        .store
        .update_post(entry.post.id, draft)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;

      tracing::info!(post_id = post.id, author = %user.username, "post updated");
      Ok(Redirect::to(&urls::post_detail(post.id)).into_response())
    }
    Err(errors) => {
      let page = PostFormTemplate::new(
        Viewer::from(user),
        &input,
        &errors,
        &groups,
        Some(entry.post.id),
      );
      Ok(render(&page)?.into_response())
    }
  }
}
