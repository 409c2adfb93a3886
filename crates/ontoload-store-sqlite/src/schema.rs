//! SQL schema for the ontology database.
//!
//! Executed at connection startup; every statement is idempotent. The
//! closure table is declared for the external closure tool and for cascade
//! deletes only.

/// Connection-level pragmas. Run outside any transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS meta (
    meta_id     INTEGER PRIMARY KEY,
    meta_key    TEXT NOT NULL,
    meta_value  TEXT,
    species_id  INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS key_value_idx ON meta(meta_key, meta_value);

CREATE TABLE IF NOT EXISTS ontology (
    ontology_id   INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,    -- upper-cased remote identifier
    namespace     TEXT NOT NULL,
    data_version  TEXT,
    title         TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS name_namespace_idx ON ontology(name, namespace);

CREATE TABLE IF NOT EXISTS relation_type (
    relation_type_id INTEGER PRIMARY KEY,
    name             TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subset (
    subset_id   INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    definition  TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS term (
    term_id      INTEGER PRIMARY KEY,
    ontology_id  INTEGER NOT NULL REFERENCES ontology(ontology_id),
    subsets      TEXT,             -- comma-joined subset names
    accession    TEXT NOT NULL UNIQUE,
    name         TEXT NOT NULL,
    definition   TEXT,
    is_root      INTEGER NOT NULL DEFAULT 0,
    is_obsolete  INTEGER NOT NULL DEFAULT 0,
    iri          TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS ontology_acc_idx ON term(ontology_id, accession);
CREATE INDEX IF NOT EXISTS term_name_idx ON term(name);

CREATE TABLE IF NOT EXISTS alt_id (
    alt_id     INTEGER PRIMARY KEY,
    term_id    INTEGER NOT NULL REFERENCES term(term_id),
    accession  TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS term_alt_idx ON alt_id(term_id, accession);
CREATE INDEX IF NOT EXISTS alt_id_accession_idx ON alt_id(accession);

-- Filled by the external closure computation; the loader only deletes.
CREATE TABLE IF NOT EXISTS closure (
    closure_id              INTEGER PRIMARY KEY,
    child_term_id           INTEGER NOT NULL REFERENCES term(term_id),
    parent_term_id          INTEGER NOT NULL REFERENCES term(term_id),
    subparent_term_id       INTEGER REFERENCES term(term_id),
    distance                INTEGER NOT NULL,
    ontology_id             INTEGER NOT NULL REFERENCES ontology(ontology_id),
    confident_relationship  INTEGER NOT NULL DEFAULT 0
);
CREATE UNIQUE INDEX IF NOT EXISTS child_parent_idx
    ON closure(child_term_id, parent_term_id, subparent_term_id, ontology_id);
CREATE INDEX IF NOT EXISTS parent_subparent_idx ON closure(parent_term_id, subparent_term_id);
CREATE INDEX IF NOT EXISTS closure_ontology_idx ON closure(ontology_id);

-- child_term_id <relation_type> parent_term_id, scoped to the ontology the
-- relation was discovered from.
CREATE TABLE IF NOT EXISTS relation (
    relation_id       INTEGER PRIMARY KEY,
    child_term_id     INTEGER NOT NULL REFERENCES term(term_id),
    parent_term_id    INTEGER NOT NULL REFERENCES term(term_id),
    relation_type_id  INTEGER NOT NULL REFERENCES relation_type(relation_type_id),
    intersection_of   INTEGER NOT NULL DEFAULT 0,
    ontology_id       INTEGER NOT NULL REFERENCES ontology(ontology_id)
);
CREATE UNIQUE INDEX IF NOT EXISTS child_parent_term_idx
    ON relation(child_term_id, parent_term_id, relation_type_id, intersection_of, ontology_id);
CREATE INDEX IF NOT EXISTS relation_parent_idx ON relation(parent_term_id);
CREATE INDEX IF NOT EXISTS relation_type_idx ON relation(relation_type_id);
CREATE INDEX IF NOT EXISTS relation_ontology_idx ON relation(ontology_id);

CREATE TABLE IF NOT EXISTS synonym (
    synonym_id  INTEGER PRIMARY KEY,
    term_id     INTEGER NOT NULL REFERENCES term(term_id),
    name        TEXT NOT NULL,
    type        TEXT,             -- 'EXACT' | 'BROAD' | 'NARROW' | 'RELATED'
    dbxref      TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS term_synonym_idx ON synonym(term_id, name);

PRAGMA user_version = 1;
";

/// Drop every table, children first.
pub const DROP_SCHEMA: &str = "
DROP TABLE IF EXISTS synonym;
DROP TABLE IF EXISTS relation;
DROP TABLE IF EXISTS closure;
DROP TABLE IF EXISTS alt_id;
DROP TABLE IF EXISTS term;
DROP TABLE IF EXISTS subset;
DROP TABLE IF EXISTS relation_type;
DROP TABLE IF EXISTS ontology;
DROP TABLE IF EXISTS meta;
PRAGMA user_version = 0;
";
