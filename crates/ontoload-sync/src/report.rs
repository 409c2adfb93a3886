//! Final import report.

use ontoload_core::source::OntologySource;
use ontoload_store_sqlite::OntologyReport;
use tracing::{info, warn};

use crate::{
  Result,
  loader::{OntologyLoader, require_identifier},
};

impl<S: OntologySource> OntologyLoader<S> {
  /// Count what was imported for every namespaced row of ontology `name`
  /// and log it on the `ontoload::report` target.
  pub async fn final_report(&self, name: &str) -> Result<Vec<OntologyReport>> {
    let name = require_identifier(name)?;
    let reports = self.store.ontology_report(name).await?;
    if reports.is_empty() {
      warn!(target: "ontoload::report", ontology = name, "nothing imported");
    }
    for r in &reports {
      info!(
        target: "ontoload::report",
        ontology = %r.ontology,
        namespace = %r.namespace,
        terms = r.terms,
        relations = r.relations,
        alt_ids = r.alt_ids,
        synonyms = r.synonyms,
        closures = r.closures,
        "imported"
      );
    }
    Ok(reports)
  }
}
