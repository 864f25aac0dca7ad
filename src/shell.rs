use std::{future::Future, io::Write, str::FromStr, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    app::{Controller, Notice},
    catalog::Catalog,
    favorites::KeyValueStore,
    link::LinkOpener,
    view,
};

const HELP: &str = "\
Commands:
  search <query>   search for books (any other text searches too)
  more             load the next 10 results
  fav <n>          add result n to favorites
  open <n>         open result n in the browser
  favorites        show favorites
  rm <n>           remove favorite n
  close            hide favorites
  help             show this help
  quit             exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    LoadMore,
    Favorite(usize),
    Open(usize),
    ShowFavorites,
    HideFavorites,
    Remove(usize),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("nothing to do")]
    Empty,
    #[error("`{0}` needs a number, e.g. `{0} 1`")]
    MissingIndex(String),
    #[error("numbers start at 1")]
    ZeroIndex,
}

impl FromStr for Command {
    type Err = CommandError;

    /// Anything that is not a well-formed command is a search.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let verb_lower = verb.to_lowercase();

        let indexed = |make: fn(usize) -> Command| -> Option<Result<Command, CommandError>> {
            if rest.is_empty() {
                return Some(Err(CommandError::MissingIndex(verb_lower.clone())));
            }
            match rest.parse::<usize>() {
                Ok(0) => Some(Err(CommandError::ZeroIndex)),
                Ok(n) => Some(Ok(make(n))),
                Err(_) => None,
            }
        };

        let parsed = match verb_lower.as_str() {
            "search" | "s" => Some(Ok(Command::Search(rest.to_string()))),
            "more" | "m" if rest.is_empty() => Some(Ok(Command::LoadMore)),
            "favorites" | "favs" if rest.is_empty() => Some(Ok(Command::ShowFavorites)),
            "close" | "c" if rest.is_empty() => Some(Ok(Command::HideFavorites)),
            "help" | "h" | "?" if rest.is_empty() => Some(Ok(Command::Help)),
            "quit" | "exit" | "q" if rest.is_empty() => Some(Ok(Command::Quit)),
            "fav" | "f" => indexed(Command::Favorite),
            "open" | "o" => indexed(Command::Open),
            "remove" | "rm" => indexed(Command::Remove),
            _ => None,
        };

        parsed.unwrap_or_else(|| Ok(Command::Search(line.to_string())))
    }
}

/// Line-oriented front end driving a [`Controller`].
pub struct Shell<C, S, O> {
    controller: Controller<C, S, O>,
    spinner: bool,
}

impl<C, S, O> Shell<C, S, O>
where
    C: Catalog,
    S: KeyValueStore,
    O: LinkOpener,
{
    pub fn new(controller: Controller<C, S, O>) -> Self {
        Self {
            controller,
            spinner: true,
        }
    }

    /// Whether to show a spinner while requests are in flight.
    pub fn with_spinner(mut self, spinner: bool) -> Self {
        self.spinner = spinner;
        self
    }

    /// Loads favorites, runs `initial_query` if given, then executes commands
    /// from `input` until it ends or the user quits.
    pub async fn run<R, W>(
        &mut self,
        initial_query: Option<String>,
        input: R,
        out: &mut W,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.controller.load_favorites().await;

        match initial_query {
            Some(query) => self.execute(Command::Search(query), out).await?,
            None => self.render(out)?,
        };
        writeln!(out, "Type `help` for a list of commands.")?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            };
            log::debug!(target: "shell", "{command:?}");

            if command == Command::Quit {
                break;
            }
            self.execute(command, out).await?;
        }

        Ok(())
    }

    async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<()> {
        match command {
            Command::Search(query) => {
                let search = self.controller.search(&query);
                let notice = with_spinner(self.spinner, "Searching...", search).await;
                report(out, notice)?;
                self.render(out)?;
            }
            Command::LoadMore => {
                let load_more = self.controller.load_more();
                let notice = with_spinner(self.spinner, "Loading more...", load_more).await;
                report(out, notice)?;
                self.render(out)?;
            }
            Command::Favorite(n) => {
                let Some(volume) = self.controller.state().results().get(n - 1).cloned() else {
                    writeln!(out, "There is no result #{n}.")?;
                    return Ok(());
                };
                let before = self.controller.state().favorites().len();
                let notice = self.controller.save_to_favorites(volume).await;
                if self.controller.state().favorites().len() > before {
                    writeln!(out, "Added to favorites.")?;
                }
                report(out, notice)?;
                self.render(out)?;
            }
            Command::Open(n) => {
                let Some(volume) = self.controller.state().results().get(n - 1) else {
                    writeln!(out, "There is no result #{n}.")?;
                    return Ok(());
                };
                let notice = self.controller.open_link(volume);
                report(out, notice)?;
            }
            Command::ShowFavorites => {
                self.controller.show_favorites();
                self.render(out)?;
            }
            Command::HideFavorites => {
                self.controller.hide_favorites();
                self.render(out)?;
            }
            Command::Remove(n) => {
                let Some(id) = self
                    .controller
                    .state()
                    .favorites()
                    .get(n - 1)
                    .map(|fav| fav.id.clone())
                else {
                    writeln!(out, "There is no favorite #{n}.")?;
                    return Ok(());
                };
                let before = self.controller.state().favorites().len();
                self.controller.remove_from_favorites(&id).await;
                if self.controller.state().favorites().len() < before {
                    writeln!(out, "Removed from favorites.")?;
                }
                self.render(out)?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => {}
        }

        Ok(())
    }

    /// Draws the result list, then the favorites overlay when it is open.
    fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let state = self.controller.state();
        write!(out, "{}", view::render_screen(state))?;
        if let Some(overlay) = view::render_overlay(state.favorites_visible(), state.favorites()) {
            write!(out, "{overlay}")?;
        }
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, notice: Option<Notice>) -> std::io::Result<()> {
    if let Some(notice) = notice {
        writeln!(out, "! {notice}")?;
    }
    Ok(())
}

async fn with_spinner<F: Future>(enabled: bool, message: &'static str, fut: F) -> F::Output {
    if !enabled {
        return fut.await;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    pb.finish_and_clear();
    output
}
