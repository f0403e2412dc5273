#![allow(clippy::cargo_common_metadata, reason = "not published; there is no public repository to link")]

mod adjacency;
mod catalog;
mod commands;
mod config;
mod content;
mod diagnostics;
mod error;
mod gate;
mod info;
mod loader;
mod navigator;
mod render;
mod route;
mod session;
mod types;
mod validator;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{Direction, Sources};
use crate::types::Reference;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SCRIPNAV_LOG";

#[derive(Parser)]
#[command(name = "scripnav", about = "Resolve scripture routing tokens into navigation views", version)]
struct Cli {
    /// Book catalog JSON (overrides `books` in .scripnav.toml)
    #[arg(long, global = true)]
    books: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
    /// Volume catalog JSON (overrides `volumes` in .scripnav.toml)
    #[arg(long, global = true)]
    volumes: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a routing token from its parts
    #[allow(clippy::arbitrary_source_item_ordering, reason = "positional arguments read volume, book, chapter")]
    Encode {
        /// Volume id
        volume: Option<u32>,
        /// Book id
        book: Option<u32>,
        /// Chapter number
        chapter: Option<u32>,
    },
    /// Print the scripnav reference and the current catalog state
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the view a routing token resolves to
    Navigate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Routing token, e.g. `1:101:3` (empty for home)
        #[arg(default_value = "")]
        token: String,
    },
    /// Show the chapter after a reference
    Next {
        /// Book id
        book: u32,
        /// Chapter number
        chapter: u32,
    },
    /// Show the chapter before a reference
    Prev {
        /// Book id
        book: u32,
        /// Chapter number
        chapter: u32,
    },
    /// Strictly parse a routing token and explain any rejection
    Resolve {
        /// Routing token
        token: String,
    },
    /// Print the content address of a chapter
    Url {
        /// Book id
        book: u32,
        /// Chapter number
        chapter: u32,
        /// Request the Joseph Smith Translation text
        #[arg(long)]
        jst: bool,
        /// Verse selection passed through to the content service
        #[arg(long)]
        verses: Option<String>,
    },
    /// List every volume and its books
    Volumes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow a file holding the current token and re-navigate on every change
    Watch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// File whose content is the current routing token
        token_file: PathBuf,
    },
}

/// Install the stderr log subscriber, filtered by `SCRIPNAV_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new("scripnav=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let sources = Sources { books: cli.books.as_deref(), volumes: cli.volumes.as_deref() };

    let result = match cli.command {
        Commands::Encode { volume, book, chapter } => Ok(commands::encode(volume, book, chapter)),
        Commands::Info { json } => {
            info::run(sources, json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Navigate { token, json } => commands::navigate(sources, &token, json),
        Commands::Next { book, chapter } => commands::neighbour(sources, Direction::Next, book, chapter),
        Commands::Prev { book, chapter } => commands::neighbour(sources, Direction::Previous, book, chapter),
        Commands::Resolve { token } => commands::resolve(sources, &token),
        Commands::Url { book, chapter, jst, verses } => {
            commands::url(sources, Reference::new(book, chapter), verses.as_deref(), jst)
        },
        Commands::Volumes { json } => commands::volumes(sources, json),
        Commands::Watch { token_file, json } => watch::run(sources, &token_file, json),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3)
        },
        Ok(code) => code,
    };
}
