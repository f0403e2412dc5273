use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::BookNotFound { book_id } => render_book_not_found(*book_id),
        Error::CatalogSourceNotFound { path } => render_catalog_source_not_found(path),
        Error::IncompleteCatalog { reason } => render_incomplete_catalog(reason),
        Error::MalformedToken { token, reason } => render_malformed_token(token, reason),
        Error::UnresolvedReference { book_id, chapter, reason } => {
            render_unresolved_reference(*book_id, *chapter, reason)
        },
        Error::VolumeOutOfRange { volume_id, min, max } => render_volume_out_of_range(*volume_id, *min, *max),
        _ => render_generic(e),
    };
}

/// Variants that wrap an underlying library error.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON Output

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Check `.scripnav.toml`. Known keys: `books`, `volumes`, `content_url`, `root_title`.
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    };
}

/// Unknown book id.
fn render_book_not_found(book_id: u32) -> String {
    return format!("\
# Error: Book Not Found

No book has id `{book_id}`.

## Fix

List the books of every volume:

    scripnav volumes
");
}

/// Missing catalog file.
fn render_catalog_source_not_found(path: &std::path::Path) -> String {
    return format!("\
# Error: Catalog Source Not Found

`{}` does not exist.

## Fix

Point `books` / `volumes` in `.scripnav.toml` at the catalog files, or pass them directly:

    scripnav --books books.json --volumes volumes.json navigate \"\"
", path.display());
}

/// Catalog not ready or malformed.
fn render_incomplete_catalog(reason: &str) -> String {
    return format!("\
# Error: Incomplete Catalog

{reason}

Navigation is unavailable until both the book and volume sources load cleanly.
");
}

/// Token outside the grammar, with the grammar.
fn render_malformed_token(token: &str, reason: &str) -> String {
    return format!("\
# Error: Malformed Token

`{token}`: {reason}

## Grammar

    \"\"          home
    V           volume V
    V:B         book B
    V:B:C       chapter C of book B

`V`, `B` and `C` are non-negative integers.
");
}

/// Book and chapter that do not address a chapter.
fn render_unresolved_reference(book_id: u32, chapter: u32, reason: &str) -> String {
    return format!("\
# Error: Unresolved Reference

`{book_id}:{chapter}` does not address a chapter: {reason}.

Chaptered books number their chapters from 1; chapterless books only have chapter 0.
");
}

/// Volume id outside the catalog.
fn render_volume_out_of_range(volume_id: u32, min: u32, max: u32) -> String {
    return format!("\
# Error: Volume Out Of Range

Volume `{volume_id}` is outside the catalog's volumes `{min}` through `{max}`.
");
}
