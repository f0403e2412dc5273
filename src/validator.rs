//! Address validation: is a (book, chapter) pair a legal reference?

use crate::catalog::Catalog;
use crate::error::Error;
use crate::types::Reference;

/// Check a (book, chapter) pair against the catalog, reporting why it fails.
///
/// Rules, in order: the book must exist; the chapter must not exceed the
/// book's chapter count; a chaptered book has no chapter 0, and a
/// chapterless book has only chapter 0.
///
/// # Errors
///
/// Returns `Error::UnresolvedReference` naming the first rule that failed.
pub fn check_reference(catalog: &Catalog, book_id: u32, chapter: u32) -> Result<Reference, Error> {
    let unresolved = |reason: &str| {
        return Error::UnresolvedReference { book_id, chapter, reason: reason.to_string() };
    };

    let Ok(book) = catalog.book_by_id(book_id) else {
        return Err(unresolved("unknown book"));
    };

    if chapter > book.num_chapters {
        return Err(unresolved(&format!(
            "chapter exceeds the book's {} chapters",
            book.num_chapters
        )));
    }

    if chapter == 0 && !book.is_chapterless() {
        return Err(unresolved("chaptered books have no chapter 0"));
    }

    return Ok(Reference::new(book_id, chapter));
}

/// Whether a (book, chapter) pair is a legal reference.
pub fn is_valid_reference(catalog: &Catalog, book_id: u32, chapter: u32) -> bool {
    return check_reference(catalog, book_id, chapter).is_ok();
}
