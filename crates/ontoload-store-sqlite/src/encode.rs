//! Encoding helpers between core values and SQLite column values.

use ontoload_core::{entity::SynonymType, field::FieldValue};
use rusqlite::types::{Type, Value};

// ─── FieldValue ──────────────────────────────────────────────────────────────

pub fn encode_field(v: &FieldValue) -> Value {
  match v {
    FieldValue::Null => Value::Null,
    FieldValue::Int(i) => Value::Integer(*i),
    FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
    FieldValue::Text(s) => Value::Text(s.clone()),
  }
}

pub fn encode_fields<'a>(values: impl Iterator<Item = &'a FieldValue>) -> Vec<Value> {
  values.map(encode_field).collect()
}

// ─── SynonymType ─────────────────────────────────────────────────────────────

pub fn decode_synonym_type(
  idx: usize,
  raw: Option<String>,
) -> rusqlite::Result<Option<SynonymType>> {
  raw
    .map(|s| {
      s.parse::<SynonymType>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
          idx,
          Type::Text,
          Box::new(ontoload_core::Error::UnknownSynonymType(s)),
        )
      })
    })
    .transpose()
}

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// `a IS ?1 AND b IS ?2`: null-safe equality on every key column.
pub fn where_clause<'a>(columns: impl Iterator<Item = &'a str>, first_param: usize) -> String {
  let conds: Vec<String> = columns
    .enumerate()
    .map(|(i, c)| format!("{c} IS ?{}", i + first_param))
    .collect();
  if conds.is_empty() {
    "1 = 1".to_owned()
  } else {
    conds.join(" AND ")
  }
}

/// `a = ?1, b = ?2`.
pub fn set_clause<'a>(columns: impl Iterator<Item = &'a str>, first_param: usize) -> String {
  columns
    .enumerate()
    .map(|(i, c)| format!("{c} = ?{}", i + first_param))
    .collect::<Vec<_>>()
    .join(", ")
}
