//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::urls;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found")]
  NotFound,
  /// A write path was requested without a session; `next` is where to come
  /// back to after logging in.
  #[error("login required for {next}")]
  LoginRequired { next: String },
  #[error("password hash error: {0}")]
  PasswordHash(String),
  #[error("template error: {0}")]
  Template(#[from] askama::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotFound => {
        (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response()
      }
      Error::LoginRequired { next } => {
        Redirect::to(&urls::login(&next)).into_response()
      }
      Error::PasswordHash(_) | Error::Template(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}
