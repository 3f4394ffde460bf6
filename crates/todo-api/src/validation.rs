//! Field-level validation of request bodies.
//!
//! Failures are collected per field as short rule tags (`required`, `max`, …)
//! and rendered as a JSON object mapping the field's JSON name to a reason,
//! e.g. `{"title":"required"}`.

use std::{collections::BTreeMap, fmt};

/// One rule that failed on one field. `field` is the internal (Rust-side,
/// capitalised) field name; `tag` is the rule that rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: &'static str,
  pub tag:   &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: &'static str, tag: &'static str) {
    self.0.push(FieldError { field, tag });
  }

  /// Record a `required` failure when `value` is missing or empty.
  pub fn require(&mut self, field: &'static str, value: Option<&str>) {
    if value.is_none_or(str::is_empty) {
      self.add(field, "required");
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn errors(&self) -> &[FieldError] {
    &self.0
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }

  /// JSON field name → reason. The first failure recorded for a field wins.
  pub fn to_map(&self) -> BTreeMap<String, &'static str> {
    let mut map = BTreeMap::new();
    for e in &self.0 {
      map.entry(json_field_name(e.field)).or_insert_with(|| message_for(e.tag));
    }
    map
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for e in &self.0 {
      if !first {
        f.write_str(", ")?;
      }
      write!(f, "{}: {}", json_field_name(e.field), message_for(e.tag))?;
      first = false;
    }
    Ok(())
  }
}

/// Reason token for a rule tag. Unknown tags map to `"invalid"`.
pub fn message_for(tag: &str) -> &'static str {
  match tag.to_ascii_lowercase().as_str() {
    "required" => "required",
    "email" => "invalid email",
    "min" => "too short",
    "max" => "too long",
    "len" => "invalid length",
    "numeric" => "must be numeric",
    "alpha" => "must contain only letters",
    "alphanum" => "must contain only letters and numbers",
    _ => "invalid",
  }
}

/// `Title` → `title`, `TaskID` → `taskID`.
pub fn json_field_name(field: &str) -> String {
  let mut chars = field.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tag_messages() {
    let cases = [
      ("required", "required"),
      ("email", "invalid email"),
      ("min", "too short"),
      ("max", "too long"),
      ("len", "invalid length"),
      ("numeric", "must be numeric"),
      ("alpha", "must contain only letters"),
      ("alphanum", "must contain only letters and numbers"),
      ("REQUIRED", "required"),
      ("uuid", "invalid"),
      ("", "invalid"),
    ];
    for (tag, want) in cases {
      assert_eq!(message_for(tag), want, "tag {tag:?}");
    }
  }

  #[test]
  fn json_names_lowercase_only_the_first_letter() {
    assert_eq!(json_field_name("Title"), "title");
    assert_eq!(json_field_name("CreatedAt"), "createdAt");
    assert_eq!(json_field_name("title"), "title");
    assert_eq!(json_field_name(""), "");
  }

  #[test]
  fn require_flags_missing_and_empty_values() {
    let mut errors = ValidationErrors::new();
    errors.require("Title", Some("ok"));
    assert!(errors.is_empty());

    errors.require("Title", None);
    errors.require("Title", Some(""));
    assert_eq!(errors.errors().len(), 2);

    let map = errors.to_map();
    assert_eq!(map.len(), 1);
    assert_eq!(map["title"], "required");
  }

  #[test]
  fn display_lists_every_failure() {
    let mut errors = ValidationErrors::new();
    errors.add("Title", "required");
    errors.add("Description", "max");
    assert_eq!(errors.to_string(), "title: required, description: too long");
  }
}
