//! Template structs and the view rows they display.
//!
//! Handlers turn domain values into flat rows here, so templates only read
//! plain fields and never branch on `Option`s of domain types.

use askama::Template;
use axum::response::Html;
use yatube_core::{
  form::{FormErrors, PostFormInput},
  group::Group,
  paginate::Page,
  post::PostEntry,
  user::User,
};

use crate::{auth::Viewer, error::Error, urls};

/// Render a template to an HTML response body.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, Error> {
  Ok(Html(template.render()?))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One post as shown in a listing or on its own page.
#[derive(Debug, Clone)]
pub struct PostRow {
  pub id:              i64,
  pub text:            String,
  pub pub_date:        String,
  pub author_username: String,
  pub author_url:      String,
  pub has_group:       bool,
  pub group_title:     String,
  pub group_url:       String,
  pub detail_url:      String,
  pub edit_url:        String,
}

impl From<PostEntry> for PostRow {
  fn from(entry: PostEntry) -> Self {
    let (has_group, group_title, group_url) = match entry.group {
      Some(g) => (true, g.title, urls::group(&g.slug)),
      None => (false, String::new(), String::new()),
    };

    Self {
      id: entry.post.id,
      text: entry.post.text,
      pub_date: entry.post.pub_date.format("%d %b %Y %H:%M").to_string(),
      author_url: urls::profile(&entry.author.username),
      author_username: entry.author.username,
      has_group,
      group_title,
      group_url,
      detail_url: urls::post_detail(entry.post.id),
      edit_url: urls::post_edit(entry.post.id),
    }
  }
}

/// A `<select>` choice on the post form.
#[derive(Debug, Clone)]
pub struct GroupOption {
  pub id:       i64,
  pub title:    String,
  pub selected: bool,
}

impl GroupOption {
  pub fn list(groups: &[Group], selected: &str) -> Vec<Self> {
    groups
      .iter()
      .map(|g| GroupOption {
        id:       g.id,
        title:    g.title.clone(),
        selected: g.id.to_string() == selected.trim(),
      })
      .collect()
  }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
  pub viewer: Viewer,
  pub page:   Page<PostRow>,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupTemplate {
  pub viewer: Viewer,
  pub group:  Group,
  pub page:   Page<PostRow>,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
  pub viewer:     Viewer,
  pub author:     User,
  pub post_count: u64,
  pub page:       Page<PostRow>,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
  pub viewer:     Viewer,
  pub post:       PostRow,
  /// All posts by the same author.
  pub post_count: u64,
  pub can_edit:   bool,
}

/// The create and edit pages share one template.
#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormTemplate {
  pub viewer:       Viewer,
  pub text:         String,
  pub groups:       Vec<GroupOption>,
  pub text_errors:  Vec<String>,
  pub group_errors: Vec<String>,
  pub is_edit:      bool,
  pub action:       String,
}

impl PostFormTemplate {
  /// Blank or pre-filled form for creating a post (`post_id == None`) or
  /// editing one.
  pub fn new(
    viewer: Viewer,
    input: &PostFormInput,
    errors: &FormErrors,
    groups: &[Group],
    post_id: Option<i64>,
  ) -> Self {
    let owned = |field: &str| {
      errors
        .for_field(field)
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>()
    };

    Self {
      viewer,
      text: input.text.clone(),
      groups: GroupOption::list(groups, &input.group),
      text_errors: owned("text"),
      group_errors: owned("group"),
      is_edit: post_id.is_some(),
      action: post_id.map_or_else(urls::post_create, urls::post_edit),
    }
  }
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
  pub viewer:   Viewer,
  pub username: String,
  pub next:     String,
  pub error:    String,
}
