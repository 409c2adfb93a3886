//! Integration tests for `SqliteStore` against an in-memory database.

use ontoload_core::{
  entity::{AltId, Closure, Meta, Ontology, Relation, RelationType, Synonym, SynonymType, Term},
  field::Fields,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn ontology(s: &SqliteStore, name: &str, namespace: &str) -> Ontology {
  s.get_or_create(Fields::new().with("name", name).with("namespace", namespace), Fields::new())
    .await
    .unwrap()
    .0
}

async fn term(s: &SqliteStore, ontology: &Ontology, accession: &str) -> Term {
  s.get_or_create(
    Fields::new().with("accession", accession),
    Fields::new()
      .with("ontology_id", ontology.id)
      .with("name", accession),
  )
  .await
  .unwrap()
  .0
}

async fn relate(s: &SqliteStore, child: &Term, parent: &Term, kind: &str) -> Relation {
  let (rel_type, _) = s
    .get_or_create::<RelationType>(Fields::new().with("name", kind), Fields::new())
    .await
    .unwrap();
  s.get_or_create(
    Fields::new()
      .with("child_term_id", child.id)
      .with("parent_term_id", parent.id)
      .with("relation_type_id", rel_type.id)
      .with("intersection_of", false)
      .with("ontology_id", child.ontology_id),
    Fields::new(),
  )
  .await
  .unwrap()
  .0
}

/// One ontology row with two terms, a relation, a synonym, an alt id and a
/// closure row.
async fn populated(s: &SqliteStore, name: &str, prefix: &str) -> Ontology {
  let o = ontology(s, name, "default").await;
  let root = term(s, &o, &format!("{prefix}:0000001")).await;
  let leaf = term(s, &o, &format!("{prefix}:0000002")).await;
  relate(s, &leaf, &root, "is_a").await;
  s.get_or_create::<Synonym>(
    Fields::new().with("term_id", leaf.id).with("name", "leafy"),
    Fields::new().with("type", "EXACT"),
  )
  .await
  .unwrap();
  s.get_or_create::<AltId>(
    Fields::new().with("term_id", leaf.id).with("accession", format!("{prefix}:9999999")),
    Fields::new(),
  )
  .await
  .unwrap();
  s.get_or_create::<Closure>(
    Fields::new()
      .with("child_term_id", leaf.id)
      .with("parent_term_id", root.id)
      .with("subparent_term_id", leaf.id)
      .with("ontology_id", o.id),
    Fields::new().with("distance", 1),
  )
  .await
  .unwrap();
  o
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_is_idempotent() {
  let s = store().await;
  let key = Fields::new().with("name", "GO").with("namespace", "biological_process");

  let (first, created) = s
    .get_or_create::<Ontology>(key.clone(), Fields::new().with("title", "Gene Ontology"))
    .await
    .unwrap();
  assert!(created);
  assert_eq!(first.title.as_deref(), Some("Gene Ontology"));

  let (second, created) = s
    .get_or_create::<Ontology>(key, Fields::new().with("title", "Other"))
    .await
    .unwrap();
  assert!(!created);
  assert_eq!(second.id, first.id);
  assert_eq!(second.title.as_deref(), Some("Gene Ontology"));
  assert_eq!(s.count::<Ontology>(Fields::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn update_or_create_refreshes_non_null_values() {
  let s = store().await;
  let key = Fields::new().with("name", "SO").with("namespace", "sequence");

  let (created_row, _) = s
    .update_or_create::<Ontology>(
      key.clone(),
      Fields::new().with("title", "Sequence types").with("data_version", "1"),
    )
    .await
    .unwrap();

  let (refreshed, created) = s
    .update_or_create::<Ontology>(
      key,
      Fields::new()
        .with("title", "Sequence Ontology")
        .with("data_version", None::<String>),
    )
    .await
    .unwrap();
  assert!(!created);
  assert_eq!(refreshed.id, created_row.id);
  assert_eq!(refreshed.title.as_deref(), Some("Sequence Ontology"));
  assert_eq!(refreshed.version.as_deref(), Some("1"));
}

#[tokio::test]
async fn null_key_columns_match_null_rows() {
  let s = store().await;
  let key = Fields::new().with("meta_key", "patch").with("species_id", None::<i64>);

  let (first, created) = s
    .get_or_create::<Meta>(key.clone(), Fields::new().with("meta_value", "a"))
    .await
    .unwrap();
  assert!(created);
  let (second, created) = s.get_or_create::<Meta>(key, Fields::new()).await.unwrap();
  assert!(!created);
  assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn lost_creation_race_returns_existing_row() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("race.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let key = Fields::new().with("name", "part_of");
  let (winner, created) = a.get_or_create::<RelationType>(key.clone(), Fields::new()).await.unwrap();
  assert!(created);

  // `b` behaves as if its lookup ran before `a` committed.
  let (loser, created) = b.insert_or_reselect::<RelationType>(key, Fields::new()).await.unwrap();
  assert!(!created);
  assert_eq!(loser.id, winner.id);
  assert_eq!(b.count::<RelationType>(Fields::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn foreign_key_violation_propagates() {
  let s = store().await;
  let err = s
    .get_or_create::<Term>(
      Fields::new().with("accession", "GO:0000001"),
      Fields::new().with("ontology_id", 42_i64).with("name", "orphan"),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));
  assert_eq!(s.count::<Term>(Fields::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn synonym_type_round_trips() {
  let s = store().await;
  let o = ontology(&s, "GO", "cellular_component").await;
  let t = term(&s, &o, "GO:0005575").await;
  let (syn, _) = s
    .get_or_create::<Synonym>(
      Fields::new().with("term_id", t.id).with("name", "cell or subcellular entity"),
      Fields::new().with("type", SynonymType::Broad.to_string()).with("dbxref", "NIF:x"),
    )
    .await
    .unwrap();
  assert_eq!(syn.kind, Some(SynonymType::Broad));
  assert_eq!(syn.db_xref.as_deref(), Some("NIF:x"));
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_and_delete_where() {
  let s = store().await;
  let o = ontology(&s, "GO", "molecular_function").await;
  let t = term(&s, &o, "GO:0003674").await;

  let updated: Term = s
    .update(t.id, Fields::new().with("is_root", true).with("name", "molecular_function"))
    .await
    .unwrap();
  assert!(updated.is_root);
  assert_eq!(updated.name, "molecular_function");

  let found = s.find::<Term>(Fields::new().with("accession", "GO:0003674")).await.unwrap();
  assert_eq!(found, Some(updated));

  let removed = s.delete_where::<Term>(Fields::new().with("ontology_id", o.id)).await.unwrap();
  assert_eq!(removed, 1);
  assert!(s.find::<Term>(Fields::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
  let s = store().await;
  let err = s.update::<Ontology>(7, Fields::new().with("title", "x")).await.unwrap_err();
  assert!(matches!(err, Error::RowNotFound { table: "ontology", .. }));
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn scope_rolls_back_on_error() {
  let s = store().await;
  let result: Result<(), Error> = s
    .scope(async || -> Result<(), Error> {
      ontology(&s, "EFO", "efo").await;
      Err(Error::RowNotFound { table: "ontology", key: "boom".into() })
    })
    .await;
  assert!(result.is_err());
  assert_eq!(s.count::<Ontology>(Fields::new()).await.unwrap(), 0);
  assert!(!s.in_transaction().await.unwrap());
}

#[tokio::test]
async fn checkpoint_survives_a_later_rollback() {
  let s = store().await;
  let result: Result<(), Error> = s
    .scope(async || -> Result<(), Error> {
      ontology(&s, "PO", "plant_anatomy").await;
      s.checkpoint().await?;
      ontology(&s, "PO", "plant_structure_development_stage").await;
      Err(Error::RowNotFound { table: "ontology", key: "boom".into() })
    })
    .await;
  assert!(result.is_err());
  let kept = s.find_all::<Ontology>(Fields::new().with("name", "PO")).await.unwrap();
  assert_eq!(kept.len(), 1);
  assert_eq!(kept[0].namespace, "plant_anatomy");
}

#[tokio::test]
async fn nested_scope_joins_the_outer_transaction() {
  let s = store().await;
  let result: Result<(), Error> = s
    .scope(async || -> Result<(), Error> {
      s.scope(async || -> Result<(), Error> {
        ontology(&s, "TO", "plant_trait").await;
        assert!(s.in_transaction().await?);
        Ok(())
      })
      .await?;
      // Still inside the outer transaction after the inner scope returns.
      assert!(s.in_transaction().await?);
      Err(Error::RowNotFound { table: "ontology", key: "boom".into() })
    })
    .await;
  assert!(result.is_err());
  assert_eq!(s.count::<Ontology>(Fields::new()).await.unwrap(), 0);
}

// ─── Cascades ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn wipe_removes_every_dependant_and_spares_other_ontologies() {
  let s = store().await;
  let go = populated(&s, "GO", "GO").await;
  let go_cc = ontology(&s, "GO", "cellular_component").await;
  term(&s, &go_cc, "GO:0005575").await;
  populated(&s, "SO", "SO").await;
  for key in ["GO_load_date", "GO_file_date", "SO_load_date"] {
    s.get_or_create::<Meta>(Fields::new().with("meta_key", key), Fields::new().with("meta_value", "x"))
      .await
      .unwrap();
  }

  assert!(s.wipe_ontology("go").await.unwrap());

  assert_eq!(s.count::<Ontology>(Fields::new().with("name", "GO")).await.unwrap(), 0);
  assert_eq!(s.count::<Term>(Fields::new().with("ontology_id", go.id)).await.unwrap(), 0);
  assert_eq!(s.count::<Term>(Fields::new().with("ontology_id", go_cc.id)).await.unwrap(), 0);
  assert_eq!(s.count::<Relation>(Fields::new().with("ontology_id", go.id)).await.unwrap(), 0);
  assert_eq!(s.count::<Closure>(Fields::new().with("ontology_id", go.id)).await.unwrap(), 0);
  assert_eq!(s.count::<Meta>(Fields::new()).await.unwrap(), 1);

  // SO is untouched: 2 terms, 1 relation, 1 synonym, 1 alt id, 1 closure.
  let report = s.ontology_report("SO").await.unwrap();
  assert_eq!(report.len(), 1);
  let so_report = &report[0];
  assert_eq!(so_report.namespace, "default");
  assert_eq!(
    (so_report.terms, so_report.relations, so_report.synonyms, so_report.alt_ids, so_report.closures),
    (2, 1, 1, 1, 1)
  );
  assert_eq!(s.count::<Synonym>(Fields::new()).await.unwrap(), 1);
  assert_eq!(s.count::<AltId>(Fields::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn wipe_only_removes_its_own_meta_keys() {
  let s = store().await;
  populated(&s, "TO", "TO").await;
  for key in ["TO_load_date", "TO_file_date", "PATO_load_date", "BTO_file_date", "TOXO_load_date"] {
    s.get_or_create::<Meta>(Fields::new().with("meta_key", key), Fields::new().with("meta_value", "x"))
      .await
      .unwrap();
  }

  assert!(s.wipe_ontology("to").await.unwrap());

  assert_eq!(s.count::<Meta>(Fields::new().with("meta_key", "TO_load_date")).await.unwrap(), 0);
  assert_eq!(s.count::<Meta>(Fields::new().with("meta_key", "TO_file_date")).await.unwrap(), 0);
  assert_eq!(s.count::<Meta>(Fields::new()).await.unwrap(), 3);
}

#[tokio::test]
async fn wipe_does_not_treat_underscores_as_wildcards() {
  let s = store().await;
  s.get_or_create::<Meta>(Fields::new().with("meta_key", "GOX_load_date"), Fields::new())
    .await
    .unwrap();

  assert!(!s.wipe_ontology("go_").await.unwrap());
  assert_eq!(s.count::<Meta>(Fields::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn wipe_unknown_ontology_returns_false() {
  let s = store().await;
  assert!(!s.wipe_ontology("nope").await.unwrap());
}

#[tokio::test]
async fn purge_keeps_the_ontology_row() {
  let s = store().await;
  let o = populated(&s, "PHI", "PHI").await;
  let counts = s.purge_ontology_terms(o.id).await.unwrap();
  assert_eq!(counts.terms, 2);
  assert_eq!(counts.relations, 1);
  assert_eq!(counts.closures, 1);
  assert!(s.find::<Ontology>(Fields::new().with("name", "PHI")).await.unwrap().is_some());
}

#[tokio::test]
async fn drop_then_init_schema_starts_empty() {
  let s = store().await;
  populated(&s, "BFO", "BFO").await;
  s.drop_schema().await.unwrap();
  s.init_schema().await.unwrap();
  assert_eq!(s.count::<Term>(Fields::new()).await.unwrap(), 0);
}
