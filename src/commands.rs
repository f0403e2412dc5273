//! Core CLI commands for scripnav: navigate, resolve, encode, next/prev, url, volumes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adjacency;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::content;
use crate::diagnostics;
use crate::error;
use crate::loader;
use crate::navigator::{Navigator, ViewState};
use crate::render;
use crate::route;
use crate::types::{NavigationIntent, Reference};
use crate::validator;

/// Which neighbour `neighbour` looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The following chapter.
    Next,
    /// The preceding chapter.
    Previous,
}

/// Catalog source overrides taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sources<'a> {
    /// Overrides the configured book source.
    pub books: Option<&'a Path>,
    /// Overrides the configured volume source.
    pub volumes: Option<&'a Path>,
}

/// Print the token built from whichever parts were given.
pub fn encode(volume: Option<u32>, book: Option<u32>, chapter: Option<u32>) -> ExitCode {
    println!("{}", route::encode(volume, book, chapter));
    return ExitCode::SUCCESS;
}

/// Load config and catalog from the working directory.
///
/// # Errors
///
/// Returns errors from config loading or catalog loading.
fn load(sources: Sources<'_>) -> Result<(Config, Catalog), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let paths = config.catalog_paths(sources.books, sources.volumes);
    let catalog = loader::load_catalog(&paths)?;
    return Ok((config, catalog));
}

/// Decode a token fail-soft, navigate, and print the view. Exits 1 when a
/// non-empty token fell back to Home.
///
/// # Errors
///
/// Returns errors from config or catalog loading, or JSON output.
pub fn navigate(sources: Sources<'_>, token: &str, json: bool) -> Result<ExitCode, error::Error> {
    let (config, catalog) = load(sources)?;
    let navigator = Navigator::new(Arc::new(catalog), config.content_locator(), config.root_title());

    let intent = route::decode(navigator.catalog(), token);
    let view = navigator.navigate(&intent);
    tracing::info!(token, view = view.state_name(), "navigated");
    print_view(&view, json)?;

    let requested_home = token.strip_prefix('#').unwrap_or(token).is_empty();
    if intent == NavigationIntent::Home && !requested_home {
        eprintln!("note: `{token}` does not resolve, showing home");
        return Ok(ExitCode::from(1));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the chapter before or after a reference. Exits 2 for an invalid
/// reference or at either end of the catalog.
///
/// # Errors
///
/// Returns errors from config or catalog loading.
pub fn neighbour(
    sources: Sources<'_>,
    direction: Direction,
    book_id: u32,
    chapter: u32,
) -> Result<ExitCode, error::Error> {
    let (_, catalog) = load(sources)?;
    if let Err(e) = validator::check_reference(&catalog, book_id, chapter) {
        diagnostics::print_error(&e);
        return Ok(ExitCode::from(2));
    }

    let (target, edge) = match direction {
        Direction::Next => (adjacency::next_reference(&catalog, book_id, chapter), "end"),
        Direction::Previous => (adjacency::previous_reference(&catalog, book_id, chapter), "start"),
    };
    let Some(target) = target else {
        println!("({edge} of catalog)");
        return Ok(ExitCode::from(2));
    };

    println!("{}", describe_reference(&catalog, target)?);
    return Ok(ExitCode::SUCCESS);
}

/// `"<title>  #<token>"` for a chapter reference.
///
/// # Errors
///
/// Returns `Error::BookNotFound` if the reference's book is not in the catalog.
fn describe_reference(catalog: &Catalog, reference: Reference) -> Result<String, error::Error> {
    let book = catalog.book_by_id(reference.book_id)?;
    let token = route::token_for(&NavigationIntent::Chapter(reference));
    return Ok(format!("{}  #{token}", book.title_for(reference.chapter)));
}

/// Print a view as JSON or plain text.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn print_view(view: &ViewState, json: bool) -> Result<(), error::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render::render_view(view));
    }
    return Ok(());
}

/// Strictly parse a token and print the intent with its canonical token, or
/// a diagnostic explaining the rejection (exit 2).
///
/// # Errors
///
/// Returns errors from config or catalog loading.
pub fn resolve(sources: Sources<'_>, token: &str) -> Result<ExitCode, error::Error> {
    let (_, catalog) = load(sources)?;
    return match route::parse(&catalog, token) {
        Err(e) => {
            diagnostics::print_error(&e);
            Ok(ExitCode::from(2))
        },
        Ok(intent) => {
            println!("{intent}  #{}", route::token_for(&intent));
            Ok(ExitCode::SUCCESS)
        },
    };
}

/// Print the content address of a valid reference (exit 2 otherwise).
///
/// # Errors
///
/// Returns errors from config or catalog loading.
pub fn url(
    sources: Sources<'_>,
    reference: Reference,
    verses: Option<&str>,
    jst: bool,
) -> Result<ExitCode, error::Error> {
    let (config, catalog) = load(sources)?;
    let locator = config.content_locator();

    let Some(address) = content::url_for_scripture_chapter(
        &catalog,
        &locator,
        reference.book_id,
        reference.chapter,
        verses,
        jst,
    ) else {
        if let Err(e) = validator::check_reference(&catalog, reference.book_id, reference.chapter) {
            diagnostics::print_error(&e);
        }
        return Ok(ExitCode::from(2));
    };

    println!("{address}");
    return Ok(ExitCode::SUCCESS);
}

/// List every volume with its books.
///
/// # Errors
///
/// Returns errors from config or catalog loading, or JSON output.
pub fn volumes(sources: Sources<'_>, json: bool) -> Result<ExitCode, error::Error> {
    let (_, catalog) = load(sources)?;
    let volumes = catalog.volumes();

    if json {
        println!("{}", serde_json::to_string_pretty(&volumes)?);
        return Ok(ExitCode::SUCCESS);
    }

    for volume in &volumes {
        println!(
            "{}  {}  (books {}-{})",
            volume.id, volume.full_name, volume.min_book_id, volume.max_book_id
        );
        for book in &volume.books {
            let chapters = match book.num_chapters {
                0 => "single page".to_string(),
                1 => "1 chapter".to_string(),
                n => format!("{n} chapters"),
            };
            println!("    {}  {}  ({chapters})", book.id, book.full_name);
        }
    }
    return Ok(ExitCode::SUCCESS);
}
