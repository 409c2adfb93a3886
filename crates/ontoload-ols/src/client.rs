//! [`OlsClient`] — `OntologySource` over the OLS REST API.

use std::time::Duration;

use ontoload_core::{
  SourceError,
  remote::{RemoteOntology, RemoteProperty, RemoteTerm},
  source::{DEFAULT_OLS_API_URL, OntologySource, SourceResult},
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::{
  Result,
  wire::{EmbeddedProperties, EmbeddedTerms, Page, SearchResponse, WireOntology},
};

/// Connection settings for [`OlsClient`].
#[derive(Debug, Clone)]
pub struct OlsConfig {
  pub base_url:  String,
  /// Page size requested from paginated collections.
  pub page_size: u32,
  pub timeout:   Duration,
}

impl Default for OlsConfig {
  fn default() -> Self {
    Self {
      base_url:  DEFAULT_OLS_API_URL.to_owned(),
      page_size: 500,
      timeout:   Duration::from_secs(720),
    }
  }
}

#[derive(Debug, Clone)]
pub struct OlsClient {
  client:    Client,
  base_url:  Url,
  page_size: u32,
}

impl OlsClient {
  pub fn new(config: &OlsConfig) -> Result<Self> {
    // A trailing slash makes `Url::join` append rather than replace the
    // last path segment.
    let mut base = config.base_url.trim_end_matches('/').to_owned();
    base.push('/');
    let base_url = Url::parse(&base)?;
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, base_url, page_size: config.page_size.max(1) })
  }

  fn endpoint(&self, path: &str) -> SourceResult<Url> {
    self
      .base_url
      .join(path)
      .map_err(|e| SourceError::Decode(format!("invalid endpoint {path:?}: {e}")))
  }

  /// GET `url` with `query` and decode the JSON body.
  async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> SourceResult<T> {
    debug!(%url, ?query, "GET");
    let response = self
      .client
      .get(url.clone())
      .query(query)
      .send()
      .await
      .map_err(|e| SourceError::Network(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(SourceError::NotFound(url.to_string()));
    }
    if !status.is_success() {
      return Err(SourceError::Http { status: status.as_u16(), url: url.to_string() });
    }

    let body = response
      .bytes()
      .await
      .map_err(|e| SourceError::Network(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| SourceError::Decode(format!("{url}: {e}")))
  }

  /// Walk every page of a HAL collection, concatenating the embedded items.
  async fn get_all_pages<E, T>(
    &self,
    url: Url,
    mut query: Vec<(&str, String)>,
    items: impl Fn(E) -> Vec<T>,
  ) -> SourceResult<Vec<T>>
  where
    E: DeserializeOwned,
  {
    query.push(("size", self.page_size.to_string()));
    let mut out = Vec::new();
    let mut number = 0u32;
    loop {
      let mut page_query = query.clone();
      page_query.push(("page", number.to_string()));
      let page: Page<E> = self.get_json(url.clone(), &page_query).await?;
      let has_next = page.has_next();
      if let Some(embedded) = page.embedded {
        out.extend(items(embedded));
      }
      trace!(%url, page = number, total = out.len(), "page fetched");
      if !has_next {
        return Ok(out);
      }
      number += 1;
    }
  }
}

impl OntologySource for OlsClient {
  async fn ontology(&self, identifier: &str) -> SourceResult<RemoteOntology> {
    let url = self.endpoint(&format!("ontologies/{}", identifier.to_lowercase()))?;
    let wire: WireOntology = self.get_json(url, &[]).await?;
    Ok(wire.into())
  }

  async fn ontology_terms(&self, identifier: &str) -> SourceResult<Vec<RemoteTerm>> {
    let url = self.endpoint(&format!("ontologies/{}/terms", identifier.to_lowercase()))?;
    self
      .get_all_pages(url, Vec::new(), |e: EmbeddedTerms| {
        e.terms.into_iter().map(RemoteTerm::from).collect()
      })
      .await
  }

  async fn term(&self, iri: &str) -> SourceResult<RemoteTerm> {
    let url = self.endpoint("terms")?;
    let terms = self
      .get_all_pages(url, vec![("iri", iri.to_owned())], |e: EmbeddedTerms| e.terms)
      .await?;
    // Several ontologies import the same term; the defining one wins.
    let chosen = match terms.iter().position(|t| t.is_defining_ontology == Some(true)) {
      Some(i) => terms.into_iter().nth(i),
      None => terms.into_iter().next(),
    };
    chosen
      .map(RemoteTerm::from)
      .ok_or_else(|| SourceError::NotFound(iri.to_owned()))
  }

  async fn term_relatives(&self, term: &RemoteTerm, relation: &str) -> SourceResult<Vec<RemoteTerm>> {
    let no_data = || SourceError::NoRelationData {
      term:     term.iri.clone(),
      relation: relation.to_owned(),
    };
    let href = term.links.get(relation).ok_or_else(no_data)?;
    let url = Url::parse(href).map_err(|e| SourceError::Decode(format!("{href:?}: {e}")))?;
    match self
      .get_all_pages(url, Vec::new(), |e: EmbeddedTerms| {
        e.terms.into_iter().map(RemoteTerm::from).collect()
      })
      .await
    {
      Err(SourceError::NotFound(_)) => Err(no_data()),
      other => other,
    }
  }

  async fn search_properties(&self, query: &str) -> SourceResult<Vec<RemoteProperty>> {
    let url = self.endpoint("search")?;
    let params = [
      ("q", query.to_owned()),
      ("type", "property".to_owned()),
      ("exact", "false".to_owned()),
      ("rows", self.page_size.to_string()),
    ];
    let found: SearchResponse = self.get_json(url, &params).await?;
    Ok(found.response.docs.into_iter().map(RemoteProperty::from).collect())
  }

  async fn property(&self, iri: &str) -> SourceResult<RemoteProperty> {
    let url = self.endpoint("properties")?;
    let page: Page<EmbeddedProperties> = self.get_json(url, &[("iri", iri.to_owned())]).await?;
    page
      .embedded
      .and_then(|e| e.properties.into_iter().next())
      .map(RemoteProperty::from)
      .ok_or_else(|| SourceError::NotFound(iri.to_owned()))
  }
}
