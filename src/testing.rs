//! Fakes for the controller's collaborators.

use std::{collections::HashMap, io, sync::Mutex};

use async_trait::async_trait;

use crate::{
    app::Controller,
    catalog::{Catalog, FetchError, Page, PageRequest, Volume},
    favorites::{KeyValueStore, MemoryStore, StoreError},
    link::LinkOpener,
};

pub(crate) fn volume(id: &str) -> Volume {
    Volume {
        id: id.into(),
        title: Some(format!("Title {id}")),
        authors: vec!["Someone".into()],
        cover_url: None,
        info_link: Some(format!("https://books.example/{id}")),
    }
}

/// Serves canned pages and records every request it sees. Unknown pages are
/// empty.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub(crate) pages: HashMap<(String, usize), Page>,
    pub(crate) failing: bool,
    pub(crate) requests: Mutex<Vec<PageRequest>>,
}

impl FakeCatalog {
    pub(crate) fn with_page(mut self, query: &str, page: usize, ids: &[&str]) -> Self {
        let volumes = ids.iter().map(|id| volume(id)).collect();
        self.pages.insert(
            (query.to_string(), page),
            Page {
                volumes,
                total_items: 42,
            },
        );
        self
    }

    pub(crate) fn offsets(&self) -> Vec<usize> {
        let requests = self.requests.lock().unwrap();
        requests.iter().map(PageRequest::start_index).collect()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing {
            let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            return Err(FetchError::Parse(err));
        }
        Ok(self
            .pages
            .get(&(request.query.clone(), request.page))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct RecordingOpener {
    pub(crate) opened: Mutex<Vec<String>>,
    pub(crate) broken: bool,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Serves reads from `inner`; every write fails.
#[derive(Default)]
pub(crate) struct ReadOnlyStore {
    pub(crate) inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

pub(crate) fn controller(
    catalog: FakeCatalog,
) -> Controller<FakeCatalog, MemoryStore, RecordingOpener> {
    Controller::new(catalog, MemoryStore::default(), RecordingOpener::default())
}
