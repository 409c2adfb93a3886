//! The get-or-create engine.
//!
//! Every function here runs synchronously on a borrowed connection and is
//! called from inside a single [`tokio_rusqlite::Connection::call`]
//! closure, so a lookup and the insert that follows it are never
//! interleaved with other work on the same handle. Races with other
//! connections are settled by the unique indexes: a create that loses
//! rolls back to its savepoint and reads the winner's row.

use ontoload_core::field::Fields;
use rusqlite::{Connection, OptionalExtension as _, params_from_iter};
use tracing::{debug, warn};

use crate::{
  encode::{encode_fields, set_clause, where_clause},
  record::Record,
};

/// What to do with the supplied values when the row already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
  /// Return the stored row untouched.
  Keep,
  /// Write every non-null supplied value onto the stored row.
  Refresh,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

fn select_sql<R: Record>(key: &Fields) -> String {
  format!(
    "SELECT {} FROM {} WHERE {} ORDER BY {}",
    R::COLUMNS.join(", "),
    R::TABLE,
    where_clause(key.columns(), 1),
    R::ID,
  )
}

pub fn select_one<R: Record>(conn: &Connection, key: &Fields) -> rusqlite::Result<Option<R>> {
  let sql = format!("{} LIMIT 1", select_sql::<R>(key));
  conn
    .query_row(&sql, params_from_iter(encode_fields(key.values())), R::from_row)
    .optional()
}

pub fn select_all<R: Record>(conn: &Connection, key: &Fields) -> rusqlite::Result<Vec<R>> {
  let mut stmt = conn.prepare(&select_sql::<R>(key))?;
  stmt
    .query_map(params_from_iter(encode_fields(key.values())), R::from_row)?
    .collect()
}

pub fn select_by_id<R: Record>(conn: &Connection, id: i64) -> rusqlite::Result<Option<R>> {
  let sql = format!(
    "SELECT {} FROM {} WHERE {} = ?1",
    R::COLUMNS.join(", "),
    R::TABLE,
    R::ID
  );
  conn.query_row(&sql, [id], R::from_row).optional()
}

pub fn count<R: Record>(conn: &Connection, key: &Fields) -> rusqlite::Result<u64> {
  let sql = format!(
    "SELECT COUNT(*) FROM {} WHERE {}",
    R::TABLE,
    where_clause(key.columns(), 1)
  );
  conn.query_row(&sql, params_from_iter(encode_fields(key.values())), |r| r.get(0))
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub fn insert<R: Record>(conn: &Connection, row: &Fields) -> rusqlite::Result<i64> {
  if row.is_empty() {
    conn.execute(&format!("INSERT INTO {} DEFAULT VALUES", R::TABLE), [])?;
    return Ok(conn.last_insert_rowid());
  }
  let columns: Vec<&str> = row.columns().collect();
  let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
  let sql = format!(
    "INSERT INTO {} ({}) VALUES ({})",
    R::TABLE,
    columns.join(", "),
    placeholders.join(", ")
  );
  conn.execute(&sql, params_from_iter(encode_fields(row.values())))?;
  Ok(conn.last_insert_rowid())
}

pub fn update_by_id<R: Record>(conn: &Connection, id: i64, values: &Fields) -> rusqlite::Result<()> {
  if values.is_empty() {
    return Ok(());
  }
  let sql = format!(
    "UPDATE {} SET {} WHERE {} = ?{}",
    R::TABLE,
    set_clause(values.columns(), 1),
    R::ID,
    values.len() + 1
  );
  let mut params = encode_fields(values.values());
  params.push(rusqlite::types::Value::Integer(id));
  conn.execute(&sql, params_from_iter(params))?;
  Ok(())
}

pub fn delete_where<R: Record>(conn: &Connection, key: &Fields) -> rusqlite::Result<usize> {
  let sql = format!("DELETE FROM {} WHERE {}", R::TABLE, where_clause(key.columns(), 1));
  conn.execute(&sql, params_from_iter(encode_fields(key.values())))
}

// ─── Get-or-create ───────────────────────────────────────────────────────────

/// Look `key` up; refresh or return the stored row, or create it from
/// `key ∪ values`.
///
/// Returns `None` only if a row vanished between write and read, which the
/// caller reports as an error.
pub fn get_or_create<R: Record>(
  conn: &Connection,
  key: &Fields,
  values: Fields,
  policy: Policy,
) -> rusqlite::Result<Option<(R, bool)>> {
  if let Some(found) = select_one::<R>(conn, key)? {
    debug!(table = R::TABLE, id = found.id(), "exists");
    let values = values.without_nulls();
    if policy == Policy::Keep || values.is_empty() {
      return Ok(Some((found, false)));
    }
    update_by_id::<R>(conn, found.id(), &values)?;
    debug!(table = R::TABLE, id = found.id(), "refreshed");
    return Ok(select_by_id::<R>(conn, found.id())?.map(|r| (r, false)));
  }
  create_or_reselect(conn, key, values)
}

/// Insert `key ∪ defaults`; if another writer created the same natural key
/// first, roll the insert back and return that row with `created = false`.
pub fn create_or_reselect<R: Record>(
  conn: &Connection,
  key: &Fields,
  defaults: Fields,
) -> rusqlite::Result<Option<(R, bool)>> {
  let row = defaults.merge(key.clone());
  conn.execute_batch("SAVEPOINT upsert")?;
  match insert::<R>(conn, &row) {
    Ok(id) => {
      conn.execute_batch("RELEASE upsert")?;
      debug!(table = R::TABLE, id, "created");
      Ok(select_by_id::<R>(conn, id)?.map(|r| (r, true)))
    }
    Err(e) if is_unique_violation(&e) => {
      warn!(table = R::TABLE, error = %e, "lost creation race, reselecting");
      conn.execute_batch("ROLLBACK TO upsert; RELEASE upsert")?;
      Ok(select_one::<R>(conn, key)?.map(|r| (r, false)))
    }
    Err(e) => {
      if let Err(rb) = conn.execute_batch("ROLLBACK TO upsert; RELEASE upsert") {
        warn!(table = R::TABLE, error = %rb, "savepoint rollback failed");
      }
      Err(e)
    }
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && (f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
          || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
  )
}
