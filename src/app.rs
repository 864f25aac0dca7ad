use crate::{
    catalog::{Catalog, Volume},
    favorites::{AddOutcome, Favorites, KeyValueStore},
    link::LinkOpener,
};

mod state;

pub use state::{AppState, Effect, Message, Notice};

/// Root controller: owns the application state and talks to the catalog,
/// the favorites store and the link opener on its behalf.
pub struct Controller<C, S, O> {
    catalog: C,
    favorites: Favorites<S>,
    opener: O,
    state: AppState,
}

impl<C, S, O> Controller<C, S, O>
where
    C: Catalog,
    S: KeyValueStore,
    O: LinkOpener,
{
    pub fn new(catalog: C, store: S, opener: O) -> Self {
        Self {
            catalog,
            favorites: Favorites::new(store),
            opener,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn opener(&self) -> &O {
        &self.opener
    }

    /// Fetches the first page for `query`, replacing the current results.
    pub async fn search(&mut self, query: &str) -> Option<Notice> {
        self.dispatch(Message::Search(query.to_string())).await
    }

    /// Fetches the next page of the active query and appends it.
    pub async fn load_more(&mut self) -> Option<Notice> {
        self.dispatch(Message::LoadMore).await
    }

    /// Reads the persisted favorites. Failures are logged and leave an empty
    /// list.
    pub async fn load_favorites(&mut self) {
        let favorites = match self.favorites.load().await {
            Ok(favorites) => favorites,
            Err(e) => {
                log::error!(target: "app", "Error loading favorites: {e}");
                Vec::new()
            }
        };
        self.state.update(Message::FavoritesReplaced(favorites));
    }

    pub async fn save_to_favorites(&mut self, volume: Volume) -> Option<Notice> {
        let title = volume.title.clone().unwrap_or_else(|| volume.id.clone());
        match self.favorites.add(volume).await {
            Ok(AddOutcome::Added(favorites)) => {
                self.state.update(Message::FavoritesReplaced(favorites));
                None
            }
            Ok(AddOutcome::Duplicate) => Some(Notice::AlreadyFavorite(title)),
            Err(e) => {
                log::error!(target: "app", "Error saving to favorites: {e}");
                None
            }
        }
    }

    pub async fn remove_from_favorites(&mut self, id: &str) {
        match self.favorites.remove(self.state.favorites(), id).await {
            Ok(favorites) => {
                self.state.update(Message::FavoritesReplaced(favorites));
            }
            Err(e) => log::error!(target: "app", "Error removing `{id}` from favorites: {e}"),
        }
    }

    pub fn show_favorites(&mut self) {
        self.state.update(Message::ShowFavorites);
    }

    pub fn hide_favorites(&mut self) {
        self.state.update(Message::HideFavorites);
    }

    /// Opens the volume's detail page, if it has one.
    pub fn open_link(&self, volume: &Volume) -> Option<Notice> {
        let Some(url) = volume.info_link.as_deref() else {
            return Some(Notice::NoLink);
        };
        match self.opener.open(url) {
            Ok(()) => None,
            Err(e) => {
                log::error!(target: "app", "Error opening `{url}`: {e}");
                Some(Notice::OpenFailed)
            }
        }
    }

    async fn dispatch(&mut self, message: Message) -> Option<Notice> {
        match self.state.update(message)? {
            Effect::Notify(notice) => Some(notice),
            Effect::Fetch(ticket) => {
                let message = match self.catalog.fetch_page(&ticket.request).await {
                    Ok(page) => {
                        log::info!(
                            target: "app",
                            "Fetched {} volumes for {:?}",
                            page.volumes.len(),
                            ticket.request
                        );
                        Message::PageLoaded { ticket, page }
                    }
                    Err(e) => {
                        log::error!(target: "app", "Error fetching books: {e}");
                        Message::PageFailed { ticket }
                    }
                };
                match self.state.update(message)? {
                    Effect::Notify(notice) => Some(notice),
                    Effect::Fetch(ticket) => {
                        log::warn!(target: "app", "Unexpected follow-up request {ticket:?}");
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::PAGE_SIZE,
        favorites::{FileStore, MemoryStore, FAVORITES_KEY},
        testing::{controller, volume, FakeCatalog, ReadOnlyStore, RecordingOpener},
    };

    fn ids(volumes: &[Volume]) -> Vec<&str> {
        volumes.iter().map(|v| v.id.as_str()).collect()
    }

    #[tokio::test]
    async fn search_shows_first_page() {
        let mut app = controller(FakeCatalog::default().with_page("dune", 1, &["1"]));

        assert_eq!(app.search("dune").await, None);

        assert_eq!(ids(app.state().results()), vec!["1"]);
        assert_eq!(app.catalog.offsets(), vec![0]);
        let requests = app.catalog.requests.lock().unwrap().clone();
        assert_eq!(requests[0].max_results(), PAGE_SIZE);
    }

    #[tokio::test]
    async fn search_without_results_clears_the_list() {
        let mut app = controller(FakeCatalog::default().with_page("dune", 1, &["1"]));
        app.search("dune").await;
        app.search("zzzzqx").await;

        assert!(app.state().results().is_empty());
        assert_eq!(app.state().query(), "zzzzqx");
    }

    #[tokio::test]
    async fn load_more_appends_successive_pages() {
        let catalog = FakeCatalog::default()
            .with_page("dune", 1, &["1", "2"])
            .with_page("dune", 2, &["3"])
            .with_page("dune", 3, &["4"]);
        let mut app = controller(catalog);

        app.search("dune").await;
        for _ in 0..3 {
            assert_eq!(app.load_more().await, None);
        }

        assert_eq!(ids(app.state().results()), vec!["1", "2", "3", "4"]);
        assert_eq!(app.catalog.offsets(), vec![0, 10, 20, 30]);
        assert_eq!(app.state().page(), 4);
    }

    #[tokio::test]
    async fn new_search_starts_over_at_first_page() {
        let catalog = FakeCatalog::default()
            .with_page("dune", 1, &["1"])
            .with_page("dune", 2, &["2"])
            .with_page("emma", 1, &["e"]);
        let mut app = controller(catalog);

        app.search("dune").await;
        app.load_more().await;
        app.search("emma").await;
        app.load_more().await;

        assert_eq!(app.catalog.offsets(), vec![0, 10, 0, 10]);
        assert_eq!(ids(app.state().results()), vec!["e"]);
    }

    #[tokio::test]
    async fn fetch_failures_surface_a_notice() {
        let mut app = controller(FakeCatalog {
            failing: true,
            ..Default::default()
        });

        assert_eq!(app.search("dune").await, Some(Notice::SearchFailed));
        assert!(app.state().results().is_empty());
        assert_eq!(app.load_more().await, Some(Notice::EmptyQuery));
    }

    #[tokio::test]
    async fn blank_search_issues_no_request() {
        let mut app = controller(FakeCatalog::default());
        assert_eq!(app.search("  ").await, Some(Notice::EmptyQuery));
        assert!(app.catalog.offsets().is_empty());
    }

    #[tokio::test]
    async fn saving_a_new_volume_grows_favorites_by_one() {
        let mut app = controller(FakeCatalog::default());
        app.load_favorites().await;

        assert_eq!(app.save_to_favorites(volume("A")).await, None);
        assert_eq!(app.save_to_favorites(volume("B")).await, None);

        assert_eq!(ids(app.state().favorites()), vec!["A", "B"]);
        assert!(app.state().favorites().iter().any(|v| v.id == "B"));
    }

    #[tokio::test]
    async fn saving_a_duplicate_changes_nothing() {
        let mut app = controller(FakeCatalog::default());
        app.save_to_favorites(volume("A")).await;

        assert_eq!(
            app.save_to_favorites(volume("A")).await,
            Some(Notice::AlreadyFavorite("Title A".into()))
        );
        assert_eq!(ids(app.state().favorites()), vec!["A"]);
    }

    #[tokio::test]
    async fn removing_is_idempotent() {
        let mut app = controller(FakeCatalog::default());
        app.save_to_favorites(volume("A")).await;
        app.save_to_favorites(volume("B")).await;

        app.remove_from_favorites("A").await;
        assert_eq!(ids(app.state().favorites()), vec!["B"]);
        app.remove_from_favorites("A").await;
        assert_eq!(ids(app.state().favorites()), vec!["B"]);

        let stored = app.favorites.load().await.unwrap();
        assert_eq!(ids(&stored), vec!["B"]);
    }

    #[tokio::test]
    async fn failed_writes_leave_favorites_untouched() {
        let store = ReadOnlyStore::default();
        let stored = serde_json::to_string(&[volume("A")]).unwrap();
        store.inner.set(FAVORITES_KEY, stored).await.unwrap();
        let mut app = Controller::new(FakeCatalog::default(), store, RecordingOpener::default());
        app.load_favorites().await;

        assert_eq!(app.save_to_favorites(volume("B")).await, None);
        assert_eq!(ids(app.state().favorites()), vec!["A"]);

        app.remove_from_favorites("A").await;
        assert_eq!(ids(app.state().favorites()), vec!["A"]);
    }

    #[tokio::test]
    async fn unwritable_data_dir_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut app = Controller::new(
            FakeCatalog::default(),
            FileStore::new(&blocker),
            RecordingOpener::default(),
        );

        assert_eq!(app.save_to_favorites(volume("A")).await, None);
        assert!(app.state().favorites().is_empty());
    }

    #[tokio::test]
    async fn corrupt_favorites_load_as_empty() {
        let store = MemoryStore::default();
        store.set(FAVORITES_KEY, "{oops".into()).await.unwrap();
        let mut app = Controller::new(FakeCatalog::default(), store, RecordingOpener::default());

        app.load_favorites().await;
        assert!(app.state().favorites().is_empty());
    }

    #[tokio::test]
    async fn favorites_persist_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = Controller::new(
            FakeCatalog::default(),
            FileStore::new(dir.path()),
            RecordingOpener::default(),
        );
        app.save_to_favorites(volume("A")).await;
        drop(app);

        let mut restarted = Controller::new(
            FakeCatalog::default(),
            FileStore::new(dir.path()),
            RecordingOpener::default(),
        );
        restarted.load_favorites().await;
        assert!(restarted.state().favorites().iter().any(|v| v.id == "A"));
    }

    #[tokio::test]
    async fn opening_links() {
        let app = controller(FakeCatalog::default());
        assert_eq!(app.open_link(&volume("A")), None);
        assert_eq!(
            *app.opener.opened.lock().unwrap(),
            vec!["https://books.example/A".to_string()]
        );

        let mut unlinked = volume("B");
        unlinked.info_link = None;
        assert_eq!(app.open_link(&unlinked), Some(Notice::NoLink));

        let broken = Controller::new(
            FakeCatalog::default(),
            MemoryStore::default(),
            RecordingOpener {
                broken: true,
                ..Default::default()
            },
        );
        assert_eq!(broken.open_link(&volume("A")), Some(Notice::OpenFailed));
    }

    #[tokio::test]
    async fn overlay_can_be_shown_and_hidden() {
        let mut app = controller(FakeCatalog::default());
        app.show_favorites();
        assert!(app.state().favorites_visible());
        app.hide_favorites();
        assert!(!app.state().favorites_visible());
    }
}
