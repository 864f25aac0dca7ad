use serde::{Deserialize, Serialize};

pub(crate) const GOOGLE_BOOKS_VOLUMES_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";
pub const PAGE_SIZE: usize = 10;

/// A single book record, normalised from the catalog response.
///
/// This is also the shape persisted in the favorites store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub info_link: Option<String>,
}

impl Volume {
    /// Whether the record can be shown at all. Missing titles and authors
    /// fall back to placeholders when rendered.
    pub fn has_display_metadata(&self) -> bool {
        !self.id.is_empty()
    }
}

/// One block of results as returned by the volumes endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub volumes: Vec<Volume>,
    pub total_items: u64,
}

/// Response data structure returned by the volumes API endpoint
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub(crate) total_items: u64,
    #[serde(default)]
    pub(crate) items: Vec<VolumeItem>,
}

/// A volume as it appears in the volumes response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeItem {
    pub(crate) id: Option<String>,
    pub(crate) volume_info: Option<VolumeInfo>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) authors: Vec<String>,
    pub(crate) image_links: Option<ImageLinks>,
    pub(crate) info_link: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageLinks {
    pub(crate) thumbnail: Option<String>,
    pub(crate) small_thumbnail: Option<String>,
}

impl VolumeItem {
    /// Validates the raw record, returning `None` when it lacks an id or
    /// volume info.
    pub(crate) fn into_volume(self) -> Option<Volume> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let info = self.volume_info?;
        let cover_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail));

        Some(Volume {
            id,
            title: info.title.filter(|title| !title.trim().is_empty()),
            authors: info.authors,
            cover_url,
            info_link: info.info_link,
        })
    }
}
