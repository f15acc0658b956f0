use clap::Parser;
use error_stack::{Result, ResultExt};
use std::io::{self, Write};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use scribe::auth::{FileStorage, LoginError, MemoryStorage, Session, SessionStorage};
use scribe::config::Server as Config;
use scribe::listing::{render, Fetcher, Frame, PostList, SortKey};
use scribe::posts::{find_post, CreatePost, CreatePostError, FindPostError};
use scribe::schema::User;
use scribe::types::PostId;
use scribe::util::validator::FieldMessages;
use scribe::App;

/// Browse posts interactively from the terminal
#[derive(Debug, Parser)]
pub struct BrowseCommand {
    /// Initial sort order: newest, oldest, title-asc or title-desc.
    #[clap(long)]
    pub sort: Option<SortKey>,
    /// Initial search term.
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Debug, Error)]
#[error("Failed to run the post browser")]
pub struct BrowseError;

pub fn run(args: BrowseCommand) -> Result<(), BrowseError> {
    let config = Config::load().change_context(BrowseError)?;
    scribe::telemetry::init(&config.logging).change_context(BrowseError)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(BrowseError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let storage: Box<dyn SessionStorage> = match config.auth.session_file.clone() {
                Some(path) => Box::new(FileStorage::new(path)),
                None => Box::new(MemoryStorage::new()),
            };
            let app = App::new(config).await.change_context(BrowseError)?;

            let mut session = Session::new(storage);
            session.init();

            let input = BufReader::new(tokio::io::stdin());
            let browser = Browser::new(app, session, input, io::stdout());
            browser.run(args).await.change_context(BrowseError)
        })
}

const HELP: &str = "\
Commands:
  list                      show the current listing again
  more                      load the next page of posts
  search <term>             filter loaded posts by title, content or author
  clear                     clear the search term
  sort <key>                newest, oldest, title-asc or title-desc
  open <number|id>          read a post
  new                       create a post (admins and editors)
  login <username> <pass>   sign in
  logout                    sign out
  whoami                    show the signed in user
  help                      show this message
  quit                      leave";

enum Flow {
    Continue,
    Quit,
}

struct Browser<R, W> {
    app: App,
    session: Session,
    list: PostList,
    input: Lines<R>,
    out: W,
}

impl<R, W> Browser<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    fn new(app: App, session: Session, input: R, out: W) -> Self {
        let list = PostList::new(Fetcher::new(app.store.clone()));
        Self {
            app,
            session,
            list,
            input: input.lines(),
            out,
        }
    }

    async fn run(mut self, args: BrowseCommand) -> io::Result<()> {
        if let Some(sort) = args.sort {
            self.list.set_sort(sort);
        }
        if let Some(term) = args.search {
            self.list.set_search_term(term);
        }

        self.show_frame()?;
        self.list.mount().await;
        self.show_frame()?;

        loop {
            let Some(line) = self.prompt("> ").await? else {
                break;
            };
            if let Flow::Quit = self.handle(line.trim()).await? {
                break;
            }
        }

        self.session.teardown();
        Ok(())
    }

    async fn handle(&mut self, line: &str) -> io::Result<Flow> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "list" => self.show_frame()?,
            "more" => {
                self.list.load_more().await;
                self.show_frame()?;
            }
            "search" => {
                self.list.set_search_term(rest);
                self.show_frame()?;
            }
            "clear" => {
                self.list.set_search_term("");
                self.show_frame()?;
            }
            "sort" => match rest.parse::<SortKey>() {
                Ok(sort) => {
                    self.list.set_sort(sort);
                    self.show_frame()?;
                }
                Err(error) => writeln!(self.out, "{error}. {HELP}")?,
            },
            "open" => self.open(rest).await?,
            "new" => self.create_post().await?,
            "login" => {
                let (username, password) = rest.split_once(' ').unwrap_or((rest, ""));
                self.login(username, password.trim())?;
            }
            "logout" => {
                if let Err(report) = self.session.logout() {
                    tracing::error!(error = ?report, "failed to clear session");
                }
                writeln!(self.out, "Logged Out. You have been successfully logged out.")?;
            }
            "whoami" => match self.session.current_user() {
                Some(user) => writeln!(self.out, "{} (@{}, {})", user.name, user.username, user.role)?,
                None => writeln!(self.out, "Not signed in.")?,
            },
            "help" => writeln!(self.out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(self.out, "Unknown command `{other}`. Type `help` for commands.")?,
        }

        Ok(Flow::Continue)
    }

    fn show_frame(&mut self) -> io::Result<()> {
        render::write_frame(&mut self.out, &self.list.frame())?;
        self.out.flush()
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.input.next_line().await
    }

    async fn open(&mut self, target: &str) -> io::Result<()> {
        if target.is_empty() {
            return writeln!(self.out, "Usage: open <number|id>");
        }

        // card numbers refer to the listing as currently shown
        let id = match (target.parse::<usize>(), self.list.frame()) {
            (Ok(number), Frame::Listing(view)) if (1..=view.posts.len()).contains(&number) => {
                view.posts[number - 1].id.clone()
            }
            _ => PostId::new(target),
        };

        match find_post(self.app.store.as_ref(), &id).await {
            Ok(post) => render::write_post(&mut self.out, &post),
            Err(report) => match report.current_context() {
                FindPostError::NotFound => render::write_not_found(&mut self.out),
                FindPostError::Store => {
                    tracing::error!(error = ?report, "failed to fetch post");
                    writeln!(self.out, "Something went wrong while loading the post.")
                }
            },
        }
    }

    fn login(&mut self, username: &str, password: &str) -> io::Result<bool> {
        match self.session.login(username, password) {
            Ok(user) => {
                let name = user.name.clone();
                writeln!(self.out, "Login Successful. Welcome back, {name}!")?;
                Ok(true)
            }
            Err(report) => {
                if let LoginError::Storage = report.current_context() {
                    tracing::error!(error = ?report, "failed to save session");
                }
                writeln!(self.out, "Login Failed. {}", report.current_context())?;
                Ok(false)
            }
        }
    }

    async fn create_post(&mut self) -> io::Result<()> {
        if self.session.current_user().is_none() {
            writeln!(self.out, "Please log in to continue.")?;
            let Some(username) = self.prompt("Username: ").await? else {
                return Ok(());
            };
            let Some(password) = self.prompt("Password: ").await? else {
                return Ok(());
            };
            if !self.login(username.trim(), password.trim())? {
                return Ok(());
            }
        }

        if !self.session.current_user().is_some_and(User::can_publish) {
            return writeln!(self.out, "Only admins and editors may create posts.");
        }

        writeln!(self.out, "Craft Your Story")?;
        let Some(title) = self.prompt("Title: ").await? else {
            return Ok(());
        };

        writeln!(self.out, "Content (finish with an empty line):")?;
        let mut paragraphs = Vec::new();
        while let Some(line) = self.prompt("| ").await? {
            if line.is_empty() {
                break;
            }
            paragraphs.push(line);
        }

        let Some(image_url) = self.prompt("Image URL (optional): ").await? else {
            return Ok(());
        };
        let image_url = image_url.trim();

        let form = CreatePost {
            title: title.trim().to_string(),
            content: paragraphs.join("\n"),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        };

        match form
            .perform(self.app.store.as_ref(), self.session.current_user())
            .await
        {
            Ok(_) => {
                writeln!(self.out, "Post Created! Your new blog post has been successfully created.")?;
                self.list = PostList::new(Fetcher::new(self.app.store.clone()));
                self.list.mount().await;
                self.show_frame()
            }
            Err(report) => match report.current_context() {
                CreatePostError::InvalidForm => {
                    writeln!(self.out, "Please fix the following:")?;
                    let messages = report.downcast_ref::<FieldMessages>();
                    for message in messages.iter().flat_map(|m| m.0.iter()) {
                        writeln!(self.out, "  {}: {}", message.field, message.message)?;
                    }
                    Ok(())
                }
                CreatePostError::Store => {
                    tracing::error!(error = ?report, "failed to create post");
                    writeln!(self.out, "Error Creating Post. Something went wrong. Please try again.")
                }
                other => writeln!(self.out, "{other}."),
            },
        }
    }
}
