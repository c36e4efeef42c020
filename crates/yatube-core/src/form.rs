//! Validation of the post create/edit form.
//!
//! The form binds exactly two fields, `text` and `group`. Anything else a
//! client submits (an `author`, say) is dropped during deserialisation.

use serde::{Deserialize, Serialize};

use crate::{
  group::Group,
  post::{PostDraft, PostEntry},
};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
  "Select a valid choice. That choice is not one of the available choices.";

/// Raw form values as submitted (or pre-filled for editing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormInput {
  #[serde(default)]
  pub text:  String,
  /// Group id as a string; empty means "no group".
  #[serde(default)]
  pub group: String,
}

/// A message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

  /// Messages for a single field, in the order they were added.
  pub fn for_field(&self, field: &str) -> Vec<&str> {
    self
      .0
      .iter()
      .filter(|e| e.field == field)
      .map(|e| e.message.as_str())
      .collect()
  }
}

impl PostFormInput {
  /// Pre-fill the form from a stored post.
  pub fn from_entry(entry: &PostEntry) -> Self {
    Self {
      text:  entry.post.text.clone(),
      group: entry
        .post
        .group_id
        .map(|id| id.to_string())
        .unwrap_or_default(),
    }
  }

  /// Validate against the groups that currently exist.
  ///
  /// The text is trimmed and must not end up empty. The group must be blank
  /// or the id of one of `groups`.
  pub fn validate(&self, groups: &[Group]) -> Result<PostDraft, FormErrors> {
    let mut errors = FormErrors::default();

    let text = self.text.trim();
    if text.is_empty() {
      errors.add("text", REQUIRED);
    }

    let group_id = match self.group.trim() {
      "" => None,
      raw => match raw.parse::<i64>() {
        Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
        _ => {
          errors.add("group", INVALID_CHOICE);
          None
        }
      },
    };

    if errors.is_empty() {
      Ok(PostDraft { text: text.to_owned(), group_id })
    } else {
      Err(errors)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn groups() -> Vec<Group> {
    vec![Group {
      id:          4,
      title:       "Название тестовой группы".into(),
      slug:        "night".into(),
      description: "Тестовое описание".into(),
    }]
  }

  fn input(text: &str, group: &str) -> PostFormInput {
    PostFormInput { text: text.into(), group: group.into() }
  }

  #[test]
  fn valid_with_group() {
    let draft = input("Новый пост", "4").validate(&groups()).unwrap();
    assert_eq!(draft, PostDraft { text: "Новый пост".into(), group_id: Some(4) });
  }

  #[test]
  fn valid_without_group() {
    let draft = input("  hello  ", "").validate(&groups()).unwrap();
    assert_eq!(draft.text, "hello");
    assert_eq!(draft.group_id, None);
  }

  #[test]
  fn blank_text_is_required() {
    for text in ["", "   ", "\n\t"] {
      let errors = input(text, "").validate(&groups()).unwrap_err();
      assert_eq!(errors.for_field("text"), vec![REQUIRED]);
      assert!(errors.for_field("group").is_empty());
    }
  }

  #[test]
  fn unknown_or_malformed_group_is_rejected() {
    for group in ["99", "night", "4x"] {
      let errors = input("text", group).validate(&groups()).unwrap_err();
      assert_eq!(errors.for_field("group"), vec![INVALID_CHOICE]);
    }
  }

  #[test]
  fn both_fields_report_together() {
    let errors = input("", "99").validate(&groups()).unwrap_err();
    assert_eq!(errors.iter().count(), 2);
  }

  #[test]
  fn submitted_author_is_ignored() {
    let parsed: PostFormInput = serde_json::from_value(serde_json::json!({
      "text": "Новый пост",
      "group": "4",
      "author": "someone_else",
    }))
    .unwrap();
    assert_eq!(parsed, input("Новый пост", "4"));
  }
}
