//! [`SqliteStore`] — the relational store every synchroniser writes to.

use std::{path::Path, time::Duration};

use ontoload_core::field::Fields;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
  Error, Result,
  record::Record,
  schema::{DROP_SCHEMA, PRAGMAS, SCHEMA},
  upsert::{self, Policy},
};

/// How long a writer waits on another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(60);

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Row counts for one namespaced ontology row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OntologyReport {
  pub ontology:  String,
  pub namespace: String,
  pub terms:     u64,
  pub relations: u64,
  pub alt_ids:   u64,
  pub synonyms:  u64,
  pub closures:  u64,
}

/// Rows removed by [`SqliteStore::purge_ontology_terms`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeCounts {
  pub synonyms:  usize,
  pub relations: usize,
  pub closures:  usize,
  pub alt_ids:   usize,
  pub terms:     usize,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ontology database backed by a single SQLite file.
///
/// Cloning is cheap; clones share one connection and therefore one
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and create any missing table.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::configure(conn).await
  }

  /// Open a private in-memory database with the schema applied.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::configure(conn).await
  }

  async fn configure(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create every missing table and index.
  pub async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Drop every table. Everything stored is lost.
  pub async fn drop_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(DROP_SCHEMA)?;
        Ok(())
      })
      .await?;
    info!("schema dropped");
    Ok(())
  }

  // ─── Transactions ──────────────────────────────────────────────────────────

  /// Run `work` inside a transaction: commit when it returns `Ok`, roll back
  /// when it returns `Err`.
  ///
  /// A scope opened while another is active joins it; only the outermost
  /// scope commits or rolls back.
  pub async fn scope<T, E, F>(&self, work: F) -> std::result::Result<T, E>
  where
    F: AsyncFnOnce() -> std::result::Result<T, E>,
    E: From<Error>,
  {
    if !self.begin().await? {
      return work().await;
    }
    match work().await {
      Ok(value) => {
        self.finish("COMMIT").await?;
        debug!("transaction committed");
        Ok(value)
      }
      Err(e) => {
        if let Err(rb) = self.finish("ROLLBACK").await {
          error!(error = %rb, "rollback failed");
        } else {
          debug!("transaction rolled back");
        }
        Err(e)
      }
    }
  }

  /// Commit the work done so far in the current scope and keep the scope
  /// open. Outside any scope this is a no-op.
  pub async fn checkpoint(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          conn.execute_batch("COMMIT; BEGIN IMMEDIATE")?;
        }
        Ok(())
      })
      .await?;
    debug!("checkpoint");
    Ok(())
  }

  /// Whether a scope is currently open on this connection.
  pub async fn in_transaction(&self) -> Result<bool> {
    Ok(self.conn.call(|conn| Ok(!conn.is_autocommit())).await?)
  }

  /// Returns `true` when this call opened the transaction.
  async fn begin(&self) -> Result<bool> {
    let opened = self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          return Ok(false);
        }
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(true)
      })
      .await?;
    Ok(opened)
  }

  async fn finish(&self, statement: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        if !conn.is_autocommit() {
          conn.execute_batch(statement)?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ─── Upsert ────────────────────────────────────────────────────────────────

  /// Return the row matching `key`, creating it from `key ∪ defaults` when
  /// absent. The flag is `true` when this call created the row.
  pub async fn get_or_create<R: Record>(&self, key: Fields, defaults: Fields) -> Result<(R, bool)> {
    self.upsert(key, defaults, Policy::Keep).await
  }

  /// Like [`get_or_create`](Self::get_or_create), but an existing row also
  /// receives every non-null value of `values`.
  pub async fn update_or_create<R: Record>(&self, key: Fields, values: Fields) -> Result<(R, bool)> {
    self.upsert(key, values, Policy::Refresh).await
  }

  async fn upsert<R: Record>(&self, key: Fields, values: Fields, policy: Policy) -> Result<(R, bool)> {
    let lookup = key.clone();
    let found = self
      .conn
      .call(move |conn| Ok(upsert::get_or_create::<R>(conn, &lookup, values, policy)?))
      .await?;
    found.ok_or_else(|| Error::RowNotFound { table: R::TABLE, key: format!("{key:?}") })
  }

  /// Skip the lookup and go straight to the insert, as a writer that lost
  /// the lookup/insert race would.
  #[cfg(test)]
  pub(crate) async fn insert_or_reselect<R: Record>(
    &self,
    key: Fields,
    defaults: Fields,
  ) -> Result<(R, bool)> {
    let lookup = key.clone();
    let found = self
      .conn
      .call(move |conn| Ok(upsert::create_or_reselect::<R>(conn, &lookup, defaults)?))
      .await?;
    found.ok_or_else(|| Error::RowNotFound { table: R::TABLE, key: format!("{key:?}") })
  }

  // ─── Plain CRUD ────────────────────────────────────────────────────────────

  /// First row (lowest id) matching every pair of `key`.
  pub async fn find<R: Record>(&self, key: Fields) -> Result<Option<R>> {
    Ok(self.conn.call(move |conn| Ok(upsert::select_one::<R>(conn, &key)?)).await?)
  }

  pub async fn find_all<R: Record>(&self, key: Fields) -> Result<Vec<R>> {
    Ok(self.conn.call(move |conn| Ok(upsert::select_all::<R>(conn, &key)?)).await?)
  }

  pub async fn count<R: Record>(&self, key: Fields) -> Result<u64> {
    Ok(self.conn.call(move |conn| Ok(upsert::count::<R>(conn, &key)?)).await?)
  }

  /// Write `values` onto the row with primary key `id` and return it.
  pub async fn update<R: Record>(&self, id: i64, values: Fields) -> Result<R> {
    let row = self
      .conn
      .call(move |conn| {
        upsert::update_by_id::<R>(conn, id, &values)?;
        Ok(upsert::select_by_id::<R>(conn, id)?)
      })
      .await?;
    row.ok_or_else(|| Error::RowNotFound { table: R::TABLE, key: format!("{} = {id}", R::ID) })
  }

  /// Delete every row matching `key`; returns the number removed.
  pub async fn delete_where<R: Record>(&self, key: Fields) -> Result<usize> {
    Ok(self.conn.call(move |conn| Ok(upsert::delete_where::<R>(conn, &key)?)).await?)
  }

  // ─── Cascades ──────────────────────────────────────────────────────────────

  /// Delete every term of ontology row `ontology_id` along with the
  /// synonyms, relations, closures and alt ids that reference them. The
  /// ontology row itself stays.
  pub async fn purge_ontology_terms(&self, ontology_id: i64) -> Result<PurgeCounts> {
    let counts = self
      .conn
      .call(move |conn| {
        let sp = conn.savepoint()?;
        let counts = purge_terms(&sp, ontology_id)?;
        sp.commit()?;
        Ok(counts)
      })
      .await?;
    info!(ontology_id, terms = counts.terms, relations = counts.relations, "terms purged");
    Ok(counts)
  }

  /// Delete every trace of the ontology called `name` (case-insensitive)
  /// across all its namespaces, plus its `<NAME>_load_date` and
  /// `<NAME>_file_date` meta rows. Other ontologies' metas are untouched
  /// even when their name contains this one.
  ///
  /// Returns `false` when no ontology row has that name; its meta rows are
  /// still removed in that case.
  pub async fn wipe_ontology(&self, name: &str) -> Result<bool> {
    let upper = name.to_uppercase();
    let keys = [format!("{upper}_load_date"), format!("{upper}_file_date")];
    let (metas, ids) = self
      .conn
      .call(move |conn| {
        let sp = conn.savepoint()?;
        let metas = sp.execute("DELETE FROM meta WHERE meta_key IN (?1, ?2)", [&keys[0], &keys[1]])?;
        let ids: Vec<i64> = {
          let mut stmt = sp.prepare("SELECT ontology_id FROM ontology WHERE name = ?1")?;
          stmt.query_map([&upper], |r| r.get(0))?.collect::<rusqlite::Result<_>>()?
        };
        for &id in &ids {
          let counts = purge_terms(&sp, id)?;
          debug!(ontology_id = id, ?counts, "ontology purged");
          sp.execute("DELETE FROM ontology WHERE ontology_id = ?1", [id])?;
        }
        sp.commit()?;
        Ok((metas, ids))
      })
      .await?;

    if ids.is_empty() {
      error!(ontology = name, metas, "no ontology to wipe");
      return Ok(false);
    }
    info!(ontology = name, rows = ids.len(), metas, "ontology wiped");
    Ok(true)
  }

  /// Row counts for every namespaced row of ontology `name`.
  pub async fn ontology_report(&self, name: &str) -> Result<Vec<OntologyReport>> {
    let upper = name.to_uppercase();
    let reports = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT o.name, o.namespace,
             (SELECT COUNT(*) FROM term t WHERE t.ontology_id = o.ontology_id),
             (SELECT COUNT(*) FROM relation r WHERE r.ontology_id = o.ontology_id),
             (SELECT COUNT(*) FROM alt_id a JOIN term t ON t.term_id = a.term_id
                WHERE t.ontology_id = o.ontology_id),
             (SELECT COUNT(*) FROM synonym s JOIN term t ON t.term_id = s.term_id
                WHERE t.ontology_id = o.ontology_id),
             (SELECT COUNT(*) FROM closure c WHERE c.ontology_id = o.ontology_id)
           FROM ontology o
           WHERE o.name = ?1
           ORDER BY o.namespace",
        )?;
        let rows = stmt
          .query_map([&upper], |r| {
            Ok(OntologyReport {
              ontology:  r.get(0)?,
              namespace: r.get(1)?,
              terms:     r.get(2)?,
              relations: r.get(3)?,
              alt_ids:   r.get(4)?,
              synonyms:  r.get(5)?,
              closures:  r.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(reports)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Children before parents, so every statement satisfies the foreign keys.
fn purge_terms(conn: &rusqlite::Connection, ontology_id: i64) -> rusqlite::Result<PurgeCounts> {
  const TERMS: &str = "SELECT term_id FROM term WHERE ontology_id = ?1";

  let synonyms = conn.execute(&format!("DELETE FROM synonym WHERE term_id IN ({TERMS})"), [ontology_id])?;

  let relations = conn.execute(
    &format!(
      "DELETE FROM relation
       WHERE child_term_id IN ({TERMS})
          OR parent_term_id IN ({TERMS})
          OR ontology_id = ?1"
    ),
    [ontology_id],
  )?;

  let closures = conn.execute(
    &format!(
      "DELETE FROM closure
       WHERE child_term_id IN ({TERMS})
          OR parent_term_id IN ({TERMS})
          OR subparent_term_id IN ({TERMS})
          OR ontology_id = ?1"
    ),
    [ontology_id],
  )?;

  let alt_ids = conn.execute(&format!("DELETE FROM alt_id WHERE term_id IN ({TERMS})"), [ontology_id])?;
  let terms = conn.execute("DELETE FROM term WHERE ontology_id = ?1", [ontology_id])?;

  Ok(PurgeCounts { synonyms, relations, closures, alt_ids, terms })
}
