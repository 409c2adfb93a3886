//! Column/value lists handed to the upsert engine.
//!
//! A [`Fields`] value is both a natural-key filter (every pair must match)
//! and a set of column assignments (applied on create or refresh).

/// A single column value, independent of any database driver.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Null,
  Int(i64),
  Bool(bool),
  Text(String),
}

impl FieldValue {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }
}

impl From<i64> for FieldValue {
  fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<bool> for FieldValue {
  fn from(v: bool) -> Self { Self::Bool(v) }
}

impl From<String> for FieldValue {
  fn from(v: String) -> Self { Self::Text(v) }
}

impl From<&str> for FieldValue {
  fn from(v: &str) -> Self { Self::Text(v.to_owned()) }
}

impl From<&String> for FieldValue {
  fn from(v: &String) -> Self { Self::Text(v.clone()) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

/// An ordered list of `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(&'static str, FieldValue)>);

impl Fields {
  pub fn new() -> Self { Self::default() }

  /// Builder-style insert; a later value for the same column replaces the
  /// earlier one.
  pub fn with(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
    self.set(column, value);
    self
  }

  pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) {
    let value = value.into();
    match self.0.iter_mut().find(|(c, _)| *c == column) {
      Some(slot) => slot.1 = value,
      None => self.0.push((column, value)),
    }
  }

  pub fn get(&self, column: &str) -> Option<&FieldValue> {
    self.0.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
  }

  /// Merge `other` into `self`; `other` wins on conflicting columns.
  pub fn merge(mut self, other: Fields) -> Self {
    for (column, value) in other.0 {
      self.set(column, value);
    }
    self
  }

  /// Drop every `Null` value (used when refreshing an existing row so that
  /// absent remote attributes leave the stored value untouched).
  pub fn without_nulls(self) -> Self {
    Self(self.0.into_iter().filter(|(_, v)| !v.is_null()).collect())
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.iter().map(|(c, _)| *c)
  }

  pub fn values(&self) -> impl Iterator<Item = &FieldValue> + '_ {
    self.0.iter().map(|(_, v)| v)
  }
}

impl FromIterator<(&'static str, FieldValue)> for Fields {
  fn from_iter<I: IntoIterator<Item = (&'static str, FieldValue)>>(iter: I) -> Self {
    let mut fields = Fields::new();
    for (column, value) in iter {
      fields.set(column, value);
    }
    fields
  }
}
