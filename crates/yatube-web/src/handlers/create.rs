//! `GET|POST /create/`: login required.
//!
//! The new post's author is always the logged-in user; the form has no
//! author field and any submitted one is dropped.

use axum::{
  Form,
  extract::State,
  response::{Html, IntoResponse, Redirect, Response},
};
use yatube_core::{
  form::{FormErrors, PostFormInput},
  store::BlogStore,
};

use crate::{
  AppState,
  auth::{CurrentUser, Viewer},
  error::Error,
  urls,
  views::{PostFormTemplate, render},
};

pub async fn form<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Html<String>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let groups = state
    .store
    .list_groups()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  render(&PostFormTemplate::new(
    Viewer::from(user),
    &PostFormInput::default(),
    &FormErrors::default(),
    &groups,
    None,
  ))
}

/// Valid input is stored and answered with a redirect to the author's
/// profile. Invalid input re-renders the form with its errors (200).
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Form(input): Form<PostFormInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let groups = state
    .store
    .list_groups()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  match input.validate(&groups) {
    Ok(draft) => {
      let post = state
        .store
        .create_post(draft.authored_by(&user))
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;

      tracing::info!(post_id = post.id, author = %user.username, "post created");
      Ok(Redirect::to(&urls::profile(&user.username)).into_response())
    }
    Err(errors) => {
      let page = PostFormTemplate::new(Viewer::from(user), &input, &errors, &groups, None);
      Ok(render(&page)?.into_response())
    }
  }
}
