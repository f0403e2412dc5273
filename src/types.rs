/// Core domain types for scripnav: books, volumes, references, and intents.
use std::fmt;

use serde::{Deserialize, Serialize};

/// One book of the corpus, as supplied by the book source.
/// Unknown fields in the source record are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Long display name, e.g. "The Book of Genesis".
    pub full_name: String,
    /// Short label used in volume grids.
    pub grid_name: String,
    /// Unique, densely increasing id across the whole catalog.
    pub id: u32,
    /// Chapter count. Zero means one unnumbered chapter, addressed as chapter 0.
    pub num_chapters: u32,
    /// One-based ordinal of the owning volume.
    pub parent_book_id: u32,
    /// Name used in breadcrumbs and chapter titles.
    pub toc_name: String,
}

impl Book {
    /// Whether this book is a single unnumbered page.
    pub const fn is_chapterless(&self) -> bool {
        return self.num_chapters == 0;
    }

    /// Human-readable title for one chapter of this book: `"<tocName> <chapter>"`,
    /// or just `"<tocName>"` for chapter 0.
    pub fn title_for(&self, chapter: u32) -> String {
        if chapter > 0 {
            return format!("{} {chapter}", self.toc_name);
        }
        return self.toc_name.clone();
    }
}

/// What a routing token means once decoded. Never stored; recomputed per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NavigationIntent {
    /// Show the chapter list of one book.
    Book {
        /// Book to show.
        book_id: u32,
    },
    /// Show one chapter.
    Chapter(Reference),
    /// Show every volume.
    Home,
    /// Show the table of contents of one volume.
    Volume {
        /// Volume to show.
        volume_id: u32,
    },
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match *self {
            NavigationIntent::Book { book_id } => write!(f, "book {book_id}"),
            NavigationIntent::Chapter(reference) => write!(f, "chapter {reference}"),
            NavigationIntent::Home => write!(f, "home"),
            NavigationIntent::Volume { volume_id } => write!(f, "volume {volume_id}"),
        };
    }
}

/// A (book, chapter) address into the catalog. Resolvable only when it
/// passes the address validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Book id.
    pub book_id: u32,
    /// Chapter number; 0 only for chapterless books.
    pub chapter: u32,
}

impl Reference {
    /// Pair a book id with a chapter number. Does not validate.
    pub const fn new(book_id: u32, chapter: u32) -> Self {
        return Self { book_id, chapter };
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}:{}", self.book_id, self.chapter);
    }
}

/// A top-level grouping of books. `books` is the cached slice of the book
/// catalog covering `min_book_id..=max_book_id`, built once at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Books of this volume in ascending id order.
    pub books: Vec<Book>,
    /// Display name, e.g. "Old Testament".
    pub full_name: String,
    /// Volume id.
    pub id: u32,
    /// Highest book id in this volume (inclusive).
    pub max_book_id: u32,
    /// Lowest book id in this volume (inclusive).
    pub min_book_id: u32,
}
