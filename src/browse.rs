//! Interactive browse session.
//!
//! Reads one command per line and drives the list and detail controllers.
//! Pages are never printed by the command handlers themselves: each view's
//! controller gets a subscriber that re-renders whenever its state changes.
//!
//! # Commands
//!
//! | Command | Alias | Effect |
//! |---------|-------|--------|
//! | `category <name>` | `c` | browse a category from page 1 |
//! | `search <query>` | `s` | search from page 1 |
//! | `more` | `m` | append the next page |
//! | `open <n>` | `o` | show article `n` (`/article/n`) |
//! | `go <route>` | | navigate to `/` or `/article/:id` |
//! | `back` | `b` | return to the list (`/`) |
//! | `list` | `l` | print the current view again |
//! | `categories` | | list category names |
//! | `help` | `h`, `?` | show this table |
//! | `quit` | `q`, `exit` | leave |
//!
//! No command error ends the session; bad input prints a hint.

use crate::api::NewsSource;
use crate::config::resolve_category;
use crate::controllers::SubscriptionId;
use crate::controllers::detail::{DetailController, DetailState};
use crate::controllers::list::{ListController, ListState};
use crate::routes::Route;
use crate::utils::truncate_for_log;
use crate::views;
use itertools::Itertools;
#[cfg(test)]
use std::cell::Ref;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

pub const HELP: &str = "\
Commands:
  category <name>   (c)       browse a category
  search <query>    (s)       search all articles
  more              (m)       load the next page
  open <n>          (o)       open article n
  go <route>                  navigate to / or /article/<id>
  back              (b)       back to the list
  list              (l)       show the current view again
  categories                  list categories
  help              (h, ?)    this help
  quit              (q, exit) leave";

const PROMPT: &str = "> ";

const NEEDS_LIST: &str = "Go back to the list first (`back`)";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Category(String),
    Search(String),
    More,
    Open(usize),
    Go(Route),
    Back,
    Show,
    Categories,
    Help,
    Quit,
}

/// Parse a line. Blank lines give `Ok(None)`; bad input gives a hint.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "category" | "c" if !rest.is_empty() => BrowseCommand::Category(rest.to_lowercase()),
        "category" | "c" => return Err("Usage: category <name>".to_string()),
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "more" | "m" => BrowseCommand::More,
        "open" | "o" => match rest.parse::<usize>() {
            Ok(n) => BrowseCommand::Open(n),
            Err(_) => return Err("Usage: open <n> (the number shown on a card)".to_string()),
        },
        "go" => match rest.parse::<Route>() {
            Ok(route) => BrowseCommand::Go(route),
            Err(e) => return Err(e.to_string()),
        },
        "back" | "b" => BrowseCommand::Back,
        "list" | "l" => BrowseCommand::Show,
        "categories" => BrowseCommand::Categories,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("Unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum View<S> {
    List(ListController<S>),
    Detail(DetailController<S>),
}

/// State of one interactive run.
pub struct Session<S, W> {
    source: S,
    categories: Vec<String>,
    default_category: String,
    year: i32,
    out: Rc<RefCell<W>>,
    view: Option<View<S>>,
    /// Renderer registered on the current view.
    subscription: Option<SubscriptionId>,
    route: Route,
}

impl<S, W> Session<S, W>
where
    S: NewsSource + Clone,
    W: Write + 'static,
{
    pub fn new(
        source: S,
        categories: Vec<String>,
        default_category: &str,
        year: i32,
        out: W,
    ) -> Self {
        Self {
            source,
            categories,
            default_category: default_category.to_string(),
            year,
            out: Rc::new(RefCell::new(out)),
            view: None,
            subscription: None,
            route: Route::List,
        }
    }

    fn say(&self, text: &str) -> io::Result<()> {
        writeln!(self.out.borrow_mut(), "{text}")
    }

    fn list_listener(&self) -> impl FnMut(&ListState) + 'static {
        let out = Rc::clone(&self.out);
        let categories = self.categories.clone();
        let year = self.year;
        move |state: &ListState| {
            let text = if state.loading {
                format!("{}\n", views::list::LOADING)
            } else {
                views::list::render(state, &categories, year)
            };
            if let Err(e) = out.borrow_mut().write_all(text.as_bytes()) {
                warn!(error = %e, "Failed to render list view");
            }
        }
    }

    fn detail_listener(&self) -> impl FnMut(&DetailState) + 'static {
        let out = Rc::clone(&self.out);
        move |state: &DetailState| {
            if let Err(e) = out.borrow_mut().write_all(views::detail::render(state).as_bytes()) {
                warn!(error = %e, "Failed to render detail view");
            }
        }
    }

    /// Stop rendering the current view.
    fn detach(&mut self) {
        let (Some(id), Some(view)) = (self.subscription.take(), self.view.as_mut()) else {
            return;
        };
        let removed = match view {
            View::List(list) => list.unsubscribe(id),
            View::Detail(detail) => detail.unsubscribe(id),
        };
        debug!(removed, "Detached view renderer");
    }

    /// Enter `route`. Leaving the list view drops its articles; entering it
    /// starts over on the default category.
    #[instrument(level = "info", skip(self), fields(route = %route))]
    pub async fn navigate(&mut self, route: Route) {
        self.detach();
        self.route = route.clone();
        match route {
            Route::List => {
                let mut list = ListController::new(self.source.clone(), &self.default_category);
                self.subscription = Some(list.subscribe(self.list_listener()));
                self.view = Some(View::List(list));
                if let Some(View::List(list)) = self.view.as_mut() {
                    list.mount().await;
                }
            }
            Route::Article(id) => {
                let mut detail = DetailController::new(self.source.clone());
                self.subscription = Some(detail.subscribe(self.detail_listener()));
                self.view = Some(View::Detail(detail));
                if let Some(View::Detail(detail)) = self.view.as_mut() {
                    detail.resolve(&id).await;
                }
            }
        }
    }

    fn render_current(&self) -> io::Result<()> {
        let text = match &self.view {
            Some(View::List(list)) => {
                views::list::render(list.state(), &self.categories, self.year)
            }
            Some(View::Detail(detail)) => views::detail::render(detail.state()),
            None => return Ok(()),
        };
        self.out.borrow_mut().write_all(text.as_bytes())
    }

    /// Apply one command. Fetch failures show up in the rendered view; only
    /// output errors are returned.
    pub async fn handle(&mut self, command: BrowseCommand) -> io::Result<Flow> {
        debug!(?command, "Handling command");
        match command {
            BrowseCommand::Quit => return Ok(Flow::Quit),
            BrowseCommand::Help => self.say(HELP)?,
            BrowseCommand::Categories => self.say(&self.categories.iter().join(", "))?,
            BrowseCommand::Show => self.render_current()?,
            BrowseCommand::Back => self.navigate(Route::List).await,
            BrowseCommand::Go(route) => self.navigate(route).await,
            BrowseCommand::Open(n) => self.navigate(Route::article(n)).await,
            BrowseCommand::Category(name) => {
                match resolve_category(&self.categories, &name) {
                    Err(e) => self.say(&e.to_string())?,
                    Ok(category) => match self.view.as_mut() {
                        Some(View::List(list)) => list.load_category(&category).await,
                        _ => self.say(NEEDS_LIST)?,
                    },
                }
            }
            BrowseCommand::Search(query) => match self.view.as_mut() {
                Some(View::List(list)) => {
                    if !list.search(&query).await {
                        self.say("Nothing to search for")?;
                    }
                }
                _ => self.say(NEEDS_LIST)?,
            },
            BrowseCommand::More => match self.view.as_mut() {
                Some(View::List(list)) => {
                    if !list.load_more().await {
                        self.say("Nothing more to load")?;
                    }
                }
                _ => self.say(NEEDS_LIST)?,
            },
        }
        Ok(Flow::Continue)
    }

    /// Show the list view, then process commands from `input` until it ends
    /// or the user quits.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.navigate(Route::List).await;
        self.say("Type `help` for commands.")?;

        let mut lines = input.lines();
        loop {
            {
                let mut out = self.out.borrow_mut();
                write!(out, "{} {PROMPT}", self.route)?;
                out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if self.handle(command).await? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(hint) => {
                    debug!(input = %truncate_for_log(&line, 80), "Rejected input");
                    self.say(&hint)?;
                }
            }
        }
        info!("Browse session ended");
        Ok(())
    }
}

#[cfg(test)]
impl<S: NewsSource, W> Session<S, W> {
    fn route(&self) -> &Route {
        &self.route
    }

    fn output(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    fn list_state(&self) -> Option<&ListState> {
        match &self.view {
            Some(View::List(list)) => Some(list.state()),
            _ => None,
        }
    }

    fn detail_state(&self) -> Option<&DetailState> {
        match &self.view {
            Some(View::Detail(detail)) => Some(detail.state()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fake::{FakeSource, rate_limited};
    use crate::models::tests::sample_batch;

    fn categories() -> Vec<String> {
        ["general", "sports", "technology"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn session(source: &FakeSource) -> Session<FakeSource, Vec<u8>> {
        Session::new(source.clone(), categories(), "general", 2025, Vec::new())
    }

    fn output(session: &Session<FakeSource, Vec<u8>>) -> String {
        String::from_utf8(session.output().clone()).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("c Technology"),
            Ok(Some(BrowseCommand::Category("technology".to_string())))
        );
        assert_eq!(
            parse_command("search  solar power "),
            Ok(Some(BrowseCommand::Search("solar power".to_string())))
        );
        assert_eq!(parse_command("s"), Ok(Some(BrowseCommand::Search(String::new()))));
        assert_eq!(parse_command("M"), Ok(Some(BrowseCommand::More)));
        assert_eq!(parse_command("open 4"), Ok(Some(BrowseCommand::Open(4))));
        assert_eq!(
            parse_command("go /article/2"),
            Ok(Some(BrowseCommand::Go(Route::article(2))))
        );
        assert_eq!(parse_command("?"), Ok(Some(BrowseCommand::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(BrowseCommand::Quit)));
    }

    #[test]
    fn test_parse_command_hints() {
        assert!(parse_command("category").is_err());
        assert!(parse_command("open two").is_err());
        assert!(parse_command("go /nowhere").unwrap_err().contains("Unknown route"));
        assert!(parse_command("dance").unwrap_err().contains("help"));
    }

    #[tokio::test]
    async fn test_session_browses_and_opens_article() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 3))
            .push_ok(sample_batch("tech", 5))
            .push_ok(sample_batch("tech-2", 3))
            .push_ok(sample_batch("top", 5));
        let mut session = session(&source);

        session.navigate(Route::List).await;
        session.handle(BrowseCommand::Category("technology".to_string())).await.unwrap();
        session.handle(BrowseCommand::More).await.unwrap();
        assert_eq!(session.list_state().unwrap().articles.len(), 8);

        session.handle(BrowseCommand::Open(2)).await.unwrap();
        assert_eq!(session.route(), &Route::article(2));
        assert_eq!(
            session.detail_state(),
            Some(&DetailState::Loaded(sample_batch("top", 5)[2].clone()))
        );

        let out = output(&session);
        assert!(out.contains("[7] tech-2 2"));
        assert!(out.contains("top 2"));
    }

    #[tokio::test]
    async fn test_back_starts_a_fresh_list() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 2))
            .push_ok(sample_batch("sports", 2))
            .push_ok(sample_batch("top", 1))
            .push_ok(sample_batch("general-again", 2));
        let mut session = session(&source);

        session.navigate(Route::List).await;
        session.handle(BrowseCommand::Category("sports".to_string())).await.unwrap();
        session.handle(BrowseCommand::Open(0)).await.unwrap();
        session.handle(BrowseCommand::Back).await.unwrap();

        let state = session.list_state().unwrap();
        assert_eq!(state.active_category, "general");
        assert_eq!(state.articles, sample_batch("general-again", 2));
    }

    #[tokio::test]
    async fn test_errors_keep_session_alive() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 2))
            .push_err(rate_limited());
        let mut session = session(&source);

        session.navigate(Route::List).await;
        assert_eq!(
            session
                .handle(BrowseCommand::Search("markets".to_string()))
                .await
                .unwrap(),
            Flow::Continue
        );

        let state = session.list_state().unwrap();
        assert_eq!(state.error.as_deref(), Some("rate limited"));
        assert_eq!(state.articles.len(), 2);
        assert!(output(&session).contains("! rate limited"));
    }

    #[tokio::test]
    async fn test_unknown_category_and_empty_search_do_not_fetch() {
        let source = FakeSource::new();
        source.push_ok(sample_batch("general", 1));
        let mut session = session(&source);

        session.navigate(Route::List).await;
        session.handle(BrowseCommand::Category("weather".to_string())).await.unwrap();
        session.handle(BrowseCommand::Search(String::new())).await.unwrap();

        assert_eq!(source.requests().len(), 1);
        let out = output(&session);
        assert!(out.contains("Unknown category `weather`"));
        assert!(out.contains("Nothing to search for"));
    }

    #[tokio::test]
    async fn test_list_commands_need_list_view() {
        let source = FakeSource::new();
        source.push_ok(sample_batch("top", 1));
        let mut session = session(&source);

        session.navigate(Route::article(0)).await;
        session.handle(BrowseCommand::More).await.unwrap();

        assert!(output(&session).contains("Go back to the list first"));
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_run_reads_until_quit() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 2))
            .push_ok(sample_batch("general-2", 1));
        let mut session = session(&source);

        let input: &[u8] = b"more\n\nbogus\nquit\nmore\n";
        session.run(input).await.unwrap();

        assert_eq!(source.requests().len(), 2);
        assert_eq!(session.list_state().unwrap().articles.len(), 3);
        let out = output(&session);
        assert!(out.contains("Unknown command `bogus`"));
        assert!(out.contains("/ > "));
    }

    #[tokio::test]
    async fn test_detached_view_stops_rendering() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 2))
            .push_ok(sample_batch("general-2", 2));
        let mut session = session(&source);

        session.navigate(Route::List).await;
        assert!(session.subscription.is_some());
        let rendered = output(&session).len();

        session.detach();
        assert!(session.subscription.is_none());
        session.handle(BrowseCommand::More).await.unwrap();

        assert_eq!(session.list_state().unwrap().articles.len(), 4);
        assert_eq!(output(&session).len(), rendered);
    }

    #[tokio::test]
    async fn test_navigation_renders_only_the_new_view() {
        let source = FakeSource::new();
        source
            .push_ok(sample_batch("general", 1))
            .push_ok(sample_batch("top", 1));
        let mut session = session(&source);

        session.navigate(Route::List).await;
        session.handle(BrowseCommand::Open(0)).await.unwrap();
        let before = output(&session).len();

        session.handle(BrowseCommand::Show).await.unwrap();
        let shown = output(&session)[before..].to_string();
        assert!(shown.starts_with(views::detail::BACK_TO_NEWS));
        assert!(!shown.contains(views::list::TITLE));
    }
}
