/// Opens URLs outside the application.
pub trait LinkOpener {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Hands URLs to the platform's default handler.
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        log::info!(target: "link", "Opening {url}");
        open::that(url)
    }
}
