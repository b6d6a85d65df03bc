//! Chroma vector store provider
//!
//! Talks to a Chroma server over its HTTP API. Chroma 0.6 and 1.x serve the
//! tenant/database scoped v2 routes; 0.4 and 0.5 serve the flat v1 routes.
//! `VectorDbConfig::api` selects between them. The collection is resolved
//! once at connect time; a missing collection means the catalog has not been
//! indexed yet and is reported as `Error::IndexUnavailable`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::{ChromaApi, VectorDbConfig};
use crate::error::{Error, Result};
use crate::types::Chunk;

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// Read-only handle on one Chroma collection
pub struct ChromaStore {
    client: Client,
    /// `{base}/api/v1` or `{base}/api/v2`
    api_root: String,
    collection_name: String,
    /// `{collections}/{id}`
    collection_url: String,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: [&'static str; 3],
}

/// Chroma returns one inner list per query embedding
#[derive(Deserialize, Default)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Map<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}

/// Collections endpoint for the configured API generation
fn collections_url(api_root: &str, config: &VectorDbConfig) -> String {
    match config.api {
        ChromaApi::V1 => format!("{}/collections", api_root),
        ChromaApi::V2 => format!(
            "{}/tenants/{}/databases/{}/collections",
            api_root, config.tenant, config.database
        ),
    }
}

impl ChromaStore {
    /// Connect to the configured collection
    pub async fn connect(config: &VectorDbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config.base_url.trim_end_matches('/');
        let api_root = match config.api {
            ChromaApi::V1 => format!("{}/api/v1", base_url),
            ChromaApi::V2 => format!("{}/api/v2", base_url),
        };
        let collections = collections_url(&api_root, config);
        let url = format!("{}/{}", collections, config.collection);

        let response = client.get(&url).send().await.map_err(|e| {
            Error::index_unavailable(format!("Chroma unreachable at {}: {}", base_url, e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            // Some server versions answer 400 for unknown collections
            return Err(Error::index_unavailable(format!(
                "Collection '{}' does not exist; build the index first",
                config.collection
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::index_unavailable(format!(
                "Failed to resolve collection '{}' ({}): {}",
                config.collection, status, body
            )));
        }

        let info: CollectionInfo = response.json().await.map_err(|e| {
            Error::index_unavailable(format!("Failed to parse collection info: {}", e))
        })?;

        tracing::info!(
            "Connected to Chroma collection '{}' ({}) via {:?} API",
            config.collection,
            info.id,
            config.api
        );

        Ok(Self {
            client,
            api_root,
            collection_name: config.collection.clone(),
            collection_url: format!("{}/{}", collections, info.id),
        })
    }

    /// Collection name
    pub fn collection(&self) -> &str {
        &self.collection_name
    }
}

/// Page numbers arrive as integers, or as strings from some loaders
fn page_from_metadata(metadata: &Map<String, Value>) -> Option<i64> {
    match metadata.get("page")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn chunk_from_parts(text: Option<String>, metadata: Option<Map<String, Value>>) -> Chunk {
    let metadata = metadata.unwrap_or_default();
    let source = metadata
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string);
    let page = page_from_metadata(&metadata);
    Chunk::new(text.unwrap_or_default(), source, page)
}

fn results_from_response(response: QueryResponse) -> Vec<VectorSearchResult> {
    let documents = response
        .documents
        .and_then(|d| d.into_iter().next())
        .unwrap_or_default();
    let mut metadatas = response
        .metadatas
        .and_then(|m| m.into_iter().next())
        .unwrap_or_default()
        .into_iter();
    let mut distances = response
        .distances
        .and_then(|d| d.into_iter().next())
        .unwrap_or_default()
        .into_iter();

    documents
        .into_iter()
        .map(|text| {
            let metadata = metadatas.next().flatten();
            let distance = distances.next().flatten().unwrap_or(1.0);
            VectorSearchResult {
                chunk: chunk_from_parts(text, metadata),
                similarity: 1.0 - distance,
            }
        })
        .collect()
}

#[async_trait]
impl VectorStoreProvider for ChromaStore {
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let url = format!("{}/query", self.collection_url);
        let request = QueryRequest {
            query_embeddings: vec![query_embedding],
            n_results: top_k,
            include: ["documents", "metadatas", "distances"],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::index_unavailable(format!("Chroma query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::index_unavailable(format!(
                "Chroma query failed ({}): {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            Error::index_unavailable(format!("Failed to parse Chroma response: {}", e))
        })?;

        Ok(results_from_response(parsed))
    }

    async fn len(&self) -> Result<usize> {
        let url = format!("{}/count", self.collection_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::index_unavailable(format!("Chroma count failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::index_unavailable(format!(
                "Chroma count failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<usize>().await?)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/heartbeat", self.api_root);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "chroma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_keep_rank_order_and_metadata() {
        let response: QueryResponse = serde_json::from_value(json!({
            "ids": [["a", "b", "c"]],
            "documents": [["Red wool rug", "Care guide", null]],
            "metadatas": [[
                {"source": "data/catalog.pdf", "page": 2},
                {"source": "data/care.md"},
                null
            ]],
            "distances": [[0.1, 0.25, 0.5]]
        }))
        .unwrap();

        let results = results_from_response(response);
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].chunk.text, "Red wool rug");
        assert_eq!(results[0].chunk.metadata.source.as_deref(), Some("data/catalog.pdf"));
        assert_eq!(results[0].chunk.metadata.page, Some(2));
        assert!((results[0].similarity - 0.9).abs() < 1e-6);

        assert_eq!(results[1].chunk.metadata.page, None);
        assert_eq!(results[2].chunk.text, "");
        assert_eq!(results[2].chunk.metadata.source, None);
    }

    #[test]
    fn test_page_parsing() {
        let meta = |v: Value| json!({ "page": v }).as_object().cloned().unwrap();
        assert_eq!(page_from_metadata(&meta(json!(3))), Some(3));
        assert_eq!(page_from_metadata(&meta(json!(4.0))), Some(4));
        assert_eq!(page_from_metadata(&meta(json!("7"))), Some(7));
        assert_eq!(page_from_metadata(&meta(json!("cover"))), None);
        assert_eq!(page_from_metadata(&meta(json!(null))), None);
    }

    #[test]
    fn test_collections_url_per_api() {
        let mut config = VectorDbConfig::default();
        assert_eq!(
            collections_url("http://chroma/api/v2", &config),
            "http://chroma/api/v2/tenants/default_tenant/databases/default_database/collections"
        );

        config.api = ChromaApi::V1;
        assert_eq!(
            collections_url("http://chroma/api/v1", &config),
            "http://chroma/api/v1/collections"
        );
    }

    #[test]
    fn test_empty_response() {
        let results = results_from_response(QueryResponse::default());
        assert!(results.is_empty());
    }
}
