use crate::catalog::{Page, PageRequest, Volume};

/// Identifies an outstanding catalog request.
///
/// `generation` is bumped by every new search; a response is only applied if
/// its generation is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub request: PageRequest,
}

/// User-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EmptyQuery,
    SearchFailed,
    LoadMoreFailed,
    AlreadyFavorite(String),
    NoLink,
    OpenFailed,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "Enter a search term first."),
            Self::SearchFailed => write!(f, "Error: Failed to fetch books. Please try again."),
            Self::LoadMoreFailed => {
                write!(f, "Error: Failed to load more books. Please try again.")
            }
            Self::AlreadyFavorite(title) => write!(f, "Already in Favorites: {title}"),
            Self::NoLink => write!(f, "This book has no link to open."),
            Self::OpenFailed => write!(f, "Error: Could not open the book's page."),
        }
    }
}

/// Inputs to [`AppState::update`].
#[derive(Debug)]
pub enum Message {
    Search(String),
    LoadMore,
    PageLoaded { ticket: Ticket, page: Page },
    PageFailed { ticket: Ticket },
    FavoritesReplaced(Vec<Volume>),
    ShowFavorites,
    HideFavorites,
}

/// Work the caller has to carry out after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Ticket),
    Notify(Notice),
}

/// Everything the root view renders from.
#[derive(Debug, Default)]
pub struct AppState {
    query: String,
    results: Vec<Volume>,
    total_items: u64,
    favorites: Vec<Volume>,
    favorites_visible: bool,
    page: usize,
    generation: u64,
}

impl AppState {
    /// The query the current results belong to.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Volume] {
        &self.results
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn favorites(&self) -> &[Volume] {
        &self.favorites
    }

    pub fn favorites_visible(&self) -> bool {
        self.favorites_visible
    }

    /// Last page that was appended to the results, 0 before any search.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn update(&mut self, message: Message) -> Option<Effect> {
        match message {
            Message::Search(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return Some(Effect::Notify(Notice::EmptyQuery));
                }
                self.generation += 1;
                Some(Effect::Fetch(self.ticket(PageRequest::new(query, 1))))
            }
            Message::LoadMore => {
                if self.query.is_empty() {
                    return Some(Effect::Notify(Notice::EmptyQuery));
                }
                let request = PageRequest::new(self.query.clone(), self.page + 1);
                Some(Effect::Fetch(self.ticket(request)))
            }
            Message::PageLoaded { ticket, page } => {
                if !self.is_expected(&ticket) {
                    log::debug!(target: "app", "Discarding stale response for {ticket:?}");
                    return None;
                }
                let Ticket { request, .. } = ticket;
                if request.page == 1 {
                    self.results = page.volumes;
                    self.query = request.query;
                } else {
                    self.results.extend(page.volumes);
                }
                self.page = request.page;
                self.total_items = page.total_items;
                None
            }
            Message::PageFailed { ticket } => {
                if !self.is_expected(&ticket) {
                    log::debug!(target: "app", "Ignoring failure of stale request {ticket:?}");
                    return None;
                }
                let notice = if ticket.request.page == 1 {
                    Notice::SearchFailed
                } else {
                    Notice::LoadMoreFailed
                };
                Some(Effect::Notify(notice))
            }
            Message::FavoritesReplaced(favorites) => {
                self.favorites = favorites;
                None
            }
            Message::ShowFavorites => {
                self.favorites_visible = true;
                None
            }
            Message::HideFavorites => {
                self.favorites_visible = false;
                None
            }
        }
    }

    fn ticket(&self, request: PageRequest) -> Ticket {
        Ticket {
            generation: self.generation,
            request,
        }
    }

    /// A first page is expected for the current generation; a later page only
    /// if it directly follows what is already shown for the same query.
    fn is_expected(&self, ticket: &Ticket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        ticket.request.page == 1
            || (ticket.request.page == self.page + 1 && ticket.request.query == self.query)
    }
}
