use async_trait::async_trait;
use reqwest::{Client, StatusCode};

mod types;

pub use types::{Page, Volume, PAGE_SIZE};
pub(crate) use types::GOOGLE_BOOKS_VOLUMES_ENDPOINT;
use types::VolumesResponse;

/// Errors raised while fetching a page of results from the catalog.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to the catalog failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog responded with status {0}")]
    Status(StatusCode),
    #[error("catalog response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters for one block of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    /// 1-based page number.
    pub page: usize,
}

impl PageRequest {
    pub fn new(query: impl Into<String>, page: usize) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }

    /// Zero-based offset of the first result on this page.
    pub fn start_index(&self) -> usize {
        self.page.saturating_sub(1) * PAGE_SIZE
    }

    pub fn max_results(&self) -> usize {
        PAGE_SIZE
    }
}

/// A source of book search results.
#[async_trait]
pub trait Catalog {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}

/// Catalog backed by the Google Books volumes endpoint.
pub struct GoogleBooks {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleBooks {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    fn query_params(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", request.query.clone()),
            ("startIndex", request.start_index().to_string()),
            ("maxResults", request.max_results().to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl Catalog for GoogleBooks {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let res = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(request))
            .send()
            .await?;
        log::info!(target: "catalog", "Status: {}", res.status());

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = res.text().await?;
        log::debug!(target: "catalog", "Body:\n{body}");

        parse_page(&body)
    }
}

/// Parses a volumes response body, dropping records that lack an id or
/// volume info.
pub fn parse_page(body: &str) -> Result<Page, FetchError> {
    let response: VolumesResponse = serde_json::from_str(body)?;
    let volumes = response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.clone();
            let volume = item.into_volume();
            if volume.is_none() {
                log::warn!(target: "catalog", "Discarding malformed volume record {id:?}");
            }
            volume
        })
        .collect();

    Ok(Page {
        volumes,
        total_items: response.total_items,
    })
}
