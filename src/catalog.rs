//! The loaded volume/book hierarchy and its load-time invariants.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use serde::Deserialize;

use crate::error::Error;
use crate::types::{Book, Volume};

/// The loaded hierarchy. Constructed only through `Catalog::from_json`,
/// which either publishes every volume with its book cache built or fails.
/// Read-only after construction.
#[derive(Debug)]
pub struct Catalog {
    /// Every book keyed by id, so id order is iteration order.
    books: BTreeMap<u32, Book>,
    /// Volumes in source order, each carrying its cached books.
    volumes: Vec<Volume>,
}

/// Raw volume record as supplied by the volume source, before its book cache exists.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeRecord {
    /// Display name.
    full_name: String,
    /// Volume id.
    id: u32,
    /// Highest book id (inclusive).
    max_book_id: u32,
    /// Lowest book id (inclusive).
    min_book_id: u32,
}

impl Catalog {
    /// The book with the next-higher id, crossing volume boundaries.
    pub fn book_after(&self, book_id: u32) -> Option<&Book> {
        return self
            .books
            .range((Bound::Excluded(book_id), Bound::Unbounded))
            .next()
            .map(|(_, book)| return book);
    }

    /// The book with the next-lower id, crossing volume boundaries.
    pub fn book_before(&self, book_id: u32) -> Option<&Book> {
        return self.books.range(..book_id).next_back().map(|(_, book)| return book);
    }

    /// Look up a book by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::BookNotFound` if no book has this id.
    pub fn book_by_id(&self, book_id: u32) -> Result<&Book, Error> {
        return self.books.get(&book_id).ok_or(Error::BookNotFound { book_id });
    }

    /// Number of books in the catalog.
    pub fn book_count(&self) -> usize {
        return self.books.len();
    }

    /// Parse both sources and build every volume's book cache.
    ///
    /// The book source is a JSON object keyed by book id; the volume source is
    /// a JSON array. Nothing is published unless both parse and every volume
    /// range lines up with the book set.
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteCatalog` if either source is malformed, a key
    /// disagrees with its record id, or the volumes do not partition the books.
    pub fn from_json(books_json: &str, volumes_json: &str) -> Result<Self, Error> {
        let books: BTreeMap<u32, Book> = serde_json::from_str(books_json).map_err(|e| {
            return Error::IncompleteCatalog { reason: format!("book source: {e}") };
        })?;
        let records: Vec<VolumeRecord> = serde_json::from_str(volumes_json).map_err(|e| {
            return Error::IncompleteCatalog { reason: format!("volume source: {e}") };
        })?;

        for (key, book) in &books {
            if *key != book.id {
                return Err(Error::IncompleteCatalog {
                    reason: format!("book keyed {key} carries id {}", book.id),
                });
            }
        }

        let volumes = build_volume_caches(&books, records)?;
        check_parent_ordinals(&books, &volumes)?;

        tracing::info!(volumes = volumes.len(), books = books.len(), "catalog loaded");
        return Ok(Self { books, volumes });
    }

    /// Look up a volume by id.
    pub fn volume_by_id(&self, volume_id: u32) -> Option<&Volume> {
        return self.volumes.iter().find(|v| return v.id == volume_id);
    }

    /// The volume owning a book, found through the book's one-based `parent_book_id` ordinal.
    pub fn volume_for_book(&self, book: &Book) -> Option<&Volume> {
        let ordinal = usize::try_from(book.parent_book_id).ok()?;
        return self.volumes.get(ordinal.checked_sub(1)?);
    }

    /// Ids of the first and last volume, the bounds single-segment tokens are checked against.
    pub fn volume_id_range(&self) -> (u32, u32) {
        let first = self.volumes.first().map_or(0, |v| return v.id);
        let last = self.volumes.last().map_or(0, |v| return v.id);
        return (first, last);
    }

    /// An owned snapshot of every volume, so callers never share mutable state.
    pub fn volumes(&self) -> Vec<Volume> {
        return self.volumes.clone();
    }
}

/// Slice the book set by each volume's `[min_book_id, max_book_id]` range.
///
/// # Errors
///
/// Returns `Error::IncompleteCatalog` if there are no volumes, a range is
/// inverted or names a missing book, two volumes overlap, or a book is unclaimed.
fn build_volume_caches(
    books: &BTreeMap<u32, Book>,
    records: Vec<VolumeRecord>,
) -> Result<Vec<Volume>, Error> {
    if records.is_empty() {
        return Err(Error::IncompleteCatalog { reason: "volume source is empty".to_string() });
    }

    let mut claimed: BTreeSet<u32> = BTreeSet::new();
    let mut volumes = Vec::with_capacity(records.len());

    for record in records {
        if record.min_book_id > record.max_book_id {
            return Err(Error::IncompleteCatalog {
                reason: format!(
                    "volume {} has minBookId {} > maxBookId {}",
                    record.id, record.min_book_id, record.max_book_id
                ),
            });
        }

        let mut volume_books = Vec::new();
        for book_id in record.min_book_id..=record.max_book_id {
            let Some(book) = books.get(&book_id) else {
                return Err(Error::IncompleteCatalog {
                    reason: format!("volume {} names missing book {book_id}", record.id),
                });
            };
            if !claimed.insert(book_id) {
                return Err(Error::IncompleteCatalog {
                    reason: format!("book {book_id} is claimed by more than one volume"),
                });
            }
            volume_books.push(book.clone());
        }

        volumes.push(Volume {
            books: volume_books,
            full_name: record.full_name,
            id: record.id,
            max_book_id: record.max_book_id,
            min_book_id: record.min_book_id,
        });
    }

    if let Some(orphan) = books.keys().find(|id| return !claimed.contains(id)) {
        return Err(Error::IncompleteCatalog {
            reason: format!("book {orphan} belongs to no volume"),
        });
    }

    return Ok(volumes);
}

/// Every book's `parent_book_id` must be the ordinal of the volume that claimed it.
///
/// # Errors
///
/// Returns `Error::IncompleteCatalog` on the first book whose ordinal points elsewhere.
fn check_parent_ordinals(books: &BTreeMap<u32, Book>, volumes: &[Volume]) -> Result<(), Error> {
    for book in books.values() {
        let owner = usize::try_from(book.parent_book_id)
            .ok()
            .and_then(|ordinal| return ordinal.checked_sub(1))
            .and_then(|index| return volumes.get(index));
        let Some(volume) = owner else {
            return Err(Error::IncompleteCatalog {
                reason: format!("book {} has no volume at ordinal {}", book.id, book.parent_book_id),
            });
        };
        if !(volume.min_book_id..=volume.max_book_id).contains(&book.id) {
            return Err(Error::IncompleteCatalog {
                reason: format!(
                    "book {} claims volume ordinal {} but lies outside volume {}",
                    book.id, book.parent_book_id, volume.id
                ),
            });
        }
    }
    return Ok(());
}

/// Shared in-memory catalog for unit tests across modules.
///
/// Three volumes: Old Testament (101 Genesis/3, 102 Exodus/2, 103 Obadiah/1),
/// New Testament (104 Matthew/4, 105 Jude/1), and Pearl of Great Price
/// (106 Introduction/0, 107 Moses/3, 108 Articles of Faith/0).
#[cfg(test)]
pub(crate) mod tests_support {
    use super::Catalog;

    pub(crate) const BOOKS_JSON: &str = r#"{
        "101": {"id": 101, "parentBookId": 1, "fullName": "Genesis", "tocName": "Genesis", "gridName": "Gen", "numChapters": 3, "citeAbbr": "Gen."},
        "102": {"id": 102, "parentBookId": 1, "fullName": "Exodus", "tocName": "Exodus", "gridName": "Ex", "numChapters": 2},
        "103": {"id": 103, "parentBookId": 1, "fullName": "Obadiah", "tocName": "Obadiah", "gridName": "Obad", "numChapters": 1},
        "104": {"id": 104, "parentBookId": 2, "fullName": "Matthew", "tocName": "Matthew", "gridName": "Matt", "numChapters": 4},
        "105": {"id": 105, "parentBookId": 2, "fullName": "Jude", "tocName": "Jude", "gridName": "Jude", "numChapters": 1},
        "106": {"id": 106, "parentBookId": 3, "fullName": "Introduction", "tocName": "Introduction", "gridName": "Intro", "numChapters": 0},
        "107": {"id": 107, "parentBookId": 3, "fullName": "Book of Moses", "tocName": "Moses", "gridName": "Moses", "numChapters": 3},
        "108": {"id": 108, "parentBookId": 3, "fullName": "Articles of Faith", "tocName": "Articles of Faith", "gridName": "A of F", "numChapters": 0}
    }"#;

    pub(crate) const VOLUMES_JSON: &str = r#"[
        {"id": 1, "fullName": "Old Testament", "minBookId": 101, "maxBookId": 103},
        {"id": 2, "fullName": "New Testament", "minBookId": 104, "maxBookId": 105},
        {"id": 3, "fullName": "Pearl of Great Price", "minBookId": 106, "maxBookId": 108}
    ]"#;

    /// Build the sample catalog. Panics only if the fixture itself is broken.
    pub(crate) fn sample_catalog() -> Catalog {
        return Catalog::from_json(BOOKS_JSON, VOLUMES_JSON).unwrap();
    }
}
