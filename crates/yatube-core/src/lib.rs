//! Core types and trait definitions for the Yatube blog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the web layer both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod form;
pub mod group;
pub mod paginate;
pub mod post;
pub mod store;
pub mod user;

pub use error::{Error, Result};
