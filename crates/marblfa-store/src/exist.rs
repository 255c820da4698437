//! eXist-db REST client
//!
//! Queries are sent to `{url}{collection}` as the `_query` parameter with
//! `_wrap=no`, so the response body is exactly the XML the query returns.

use std::time::Duration;

use marblfa_core::{Document, Element, Query, StoreSettings};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::DocumentStore;

/// Upper bound on items the server returns for one query
const MAX_ITEMS: &str = "100000";

/// Blocking client for an eXist REST endpoint
#[derive(Debug, Clone)]
pub struct ExistStore {
    /// REST base URL, without trailing slash
    base_url: String,
    client: Client,
}

impl ExistStore {
    /// Create a client from store settings
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        Self::with_url(&settings.url, Duration::from_secs(settings.timeout_secs.max(1)))
    }

    /// Create a client for a REST base URL
    pub fn with_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the collection a query runs against
    pub fn collection_url(&self, query: &Query) -> String {
        let collection = query.source().trim_start_matches('/');
        format!("{}/{}", self.base_url, collection)
    }
}

impl DocumentStore for ExistStore {
    fn name(&self) -> &'static str {
        "exist"
    }

    fn execute(&self, query: &Query) -> Result<Document> {
        let url = self.collection_url(query);
        let xquery = query.to_xquery();
        debug!(url = %url, "sending xquery");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("_query", xquery.as_str()),
                ("_wrap", "no"),
                ("_howmany", MAX_ITEMS),
            ])
            .send()?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::QuerySyntax(message));
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let body = response.text()?;
        Element::parse(&body)
            .map_err(|e| StoreError::QuerySyntax(format!("malformed store response: {}", e)))?;
        Ok(Document::new(body))
    }
}
