use clap::Parser;
use std::{io::IsTerminal, path::PathBuf};

mod app;
mod app_dirs;
mod catalog;
mod favorites;
mod link;
mod shell;
#[cfg(test)]
mod testing;
mod view;

use app::Controller;
use catalog::{GoogleBooks, GOOGLE_BOOKS_VOLUMES_ENDPOINT};
use favorites::{FileStore, MemoryStore};
use link::SystemOpener;
use shell::Shell;

const GOOGLE_BOOKS_API_KEY: &str = "GOOGLE_BOOKS_API_KEY";
const GOOGLE_BOOKS_KEY_FILE_NAME: &str = ".google-books";

/// Struct to hold command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// Search to run on startup
    query: Option<String>,

    /// Directory that holds the favorites file. Defaults to the platform data
    /// directory.
    #[arg(short, long, env = app_dirs::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Google Books API key. If this is not provided, the
    /// `GOOGLE_BOOKS_API_KEY` environment variable is used, followed by the
    /// `.google-books` file stored in the user's home directory. Searching
    /// works without a key, at a lower quota.
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Keep favorites in memory only; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,

    #[arg(long, hide = true, default_value = GOOGLE_BOOKS_VOLUMES_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::debug!("CLI args: {args:?}");

    let query = args.query.clone();
    let (data_dir, api_key, endpoint) = validate_args(args)?;

    let catalog = GoogleBooks::new(reqwest::Client::new(), endpoint, api_key);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let spinner = std::io::stdin().is_terminal();

    match data_dir {
        None => {
            let controller = Controller::new(catalog, MemoryStore::default(), SystemOpener);
            let mut shell = Shell::new(controller).with_spinner(spinner);
            shell.run(query, stdin, &mut stdout).await?;
        }
        Some(data_dir) => {
            let store = FileStore::new(data_dir);
            log::info!(target: "main", "Favorites directory: {:?}", store.dir());
            let controller = Controller::new(catalog, store, SystemOpener);
            let mut shell = Shell::new(controller).with_spinner(spinner);
            shell.run(query, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Resolves the API key, the data directory (`None` when favorites stay in
/// memory) and the catalog endpoint.
fn validate_args(
    CliArgs {
        data_dir,
        api_key,
        ephemeral,
        endpoint,
        ..
    }: CliArgs,
) -> anyhow::Result<(Option<PathBuf>, Option<String>, String)> {
    let api_key = api_key
        .or_else(|| std::env::var(GOOGLE_BOOKS_API_KEY).ok())
        .or_else(|| {
            let home_dir = std::env::var("HOME").ok()?;
            let key_file = format!("{home_dir}/{GOOGLE_BOOKS_KEY_FILE_NAME}");
            std::fs::read_to_string(key_file).map(|s| s.trim().to_string()).ok()
        })
        .filter(|key| !key.is_empty());
    log::info!(target: "main", "Using API key: {}", api_key.is_some());

    let data_dir = match (ephemeral, data_dir) {
        (true, _) => None,
        (false, Some(dir)) => Some(dir),
        (false, None) => Some(app_dirs::get_data_dir()?),
    };
    log::info!(target: "main", "Data directory: {data_dir:?}");

    let endpoint = reqwest::Url::parse(&endpoint)
        .map_err(|e| anyhow::Error::msg(format!("Invalid catalog endpoint `{endpoint}`: {e}")))?
        .to_string();
    log::info!(target: "main", "Catalog endpoint: {endpoint}");

    Ok((data_dir, api_key, endpoint))
}
