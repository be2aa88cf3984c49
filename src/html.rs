//! Rendering of `<script>` and `<link>` tags for resolved asset URLs.

use std::fmt::Write as _;

use indexmap::IndexMap;

/// Value of an HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
  /// Boolean attribute rendered without a value, e.g. `nomodule`.
  Flag,
  /// Attribute rendered as `name="value"`.
  Text(String),
}

impl From<&str> for AttrValue {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<String> for AttrValue {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

/// Insertion-ordered tag attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
  /// Empty attribute set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
    self.insert(name, value);
    self
  }

  /// Builder-style insert of a boolean attribute.
  pub fn with_flag(mut self, name: impl Into<String>) -> Self {
    self.insert(name, AttrValue::Flag);
    self
  }

  /// Insert or replace an attribute, keeping its original position when replaced.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
    self.0.insert(name.into(), value.into());
  }

  /// Overlay `overrides` on top of these attributes; the overrides win on conflict.
  pub fn merge(mut self, overrides: &Attributes) -> Self {
    for (name, value) in &overrides.0 {
      self.0.insert(name.clone(), value.clone());
    }
    self
  }

  /// Attributes in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
    self.0.iter().map(|(name, value)| (name.as_str(), value))
  }

  /// Returns `true` when no attributes are set.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect(),
    )
  }
}

/// Turns URLs into markup. Hosts with their own tag helpers implement this.
pub trait TagRenderer {
  /// Markup loading a script from `url`.
  fn script_tag(&self, url: &str, attributes: &Attributes) -> String;

  /// Markup loading a stylesheet from `url`.
  fn style_tag(&self, url: &str, attributes: &Attributes) -> String;
}

/// Plain HTML5 tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTags;

impl TagRenderer for HtmlTags {
  fn script_tag(&self, url: &str, attributes: &Attributes) -> String {
    format!(
      "<script src=\"{}\"{}></script>",
      escape_attribute(url),
      render_attributes(attributes)
    )
  }

  fn style_tag(&self, url: &str, attributes: &Attributes) -> String {
    let defaults = Attributes::new().with("rel", "stylesheet");
    format!(
      "<link href=\"{}\"{}>",
      escape_attribute(url),
      render_attributes(&defaults.merge(attributes))
    )
  }
}

fn render_attributes(attributes: &Attributes) -> String {
  let mut rendered = String::new();
  for (name, value) in attributes.iter() {
    match value {
      AttrValue::Flag => {
        let _ = write!(rendered, " {name}");
      }
      AttrValue::Text(text) => {
        let _ = write!(rendered, " {name}=\"{}\"", escape_attribute(text));
      }
    }
  }
  rendered
}

fn escape_attribute(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '"' => escaped.push_str("&quot;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      other => escaped.push(other),
    }
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_module_script() {
    let attributes = Attributes::new().with("type", "module").with_flag("defer");
    assert_eq!(
      HtmlTags.script_tag("/dist/main.js", &attributes),
      r#"<script src="/dist/main.js" type="module" defer></script>"#
    );
  }

  #[test]
  fn caller_attributes_win_and_keep_position() {
    let merged = Attributes::new()
      .with("type", "module")
      .merge(&Attributes::new().with("defer", AttrValue::Flag).with("type", "text/javascript"));

    let names: Vec<&str> = merged.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["type", "defer"]);
    assert_eq!(
      merged.iter().next().unwrap().1,
      &AttrValue::Text("text/javascript".into())
    );
  }

  #[test]
  fn style_tag_defaults_to_stylesheet_rel() {
    let attributes: Attributes = [("media", "print")].into_iter().collect();
    assert_eq!(
      HtmlTags.style_tag("/dist/app.css", &attributes),
      r#"<link href="/dist/app.css" rel="stylesheet" media="print">"#
    );
  }

  #[test]
  fn escapes_attribute_values() {
    let attributes = Attributes::new().with("data-x", "a\"<b>&");
    assert_eq!(
      HtmlTags.script_tag("/x.js?a=1&b=2", &attributes),
      r#"<script src="/x.js?a=1&amp;b=2" data-x="a&quot;&lt;b&gt;&amp;"></script>"#
    );
  }
}
