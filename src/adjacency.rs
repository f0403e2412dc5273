//! Next/previous chapter computation over catalog order.
//!
//! Adjacency follows book ids only. Volume boundaries are crossed freely.

use crate::catalog::Catalog;
use crate::types::{Book, Reference};

/// The chapter a reader lands on when entering a book from the front.
const fn first_chapter(book: &Book) -> u32 {
    if book.is_chapterless() {
        return 0;
    }
    return 1;
}

/// The chapter after `(book_id, chapter)`, or `None` at the end of the catalog
/// or for an unknown book.
pub fn next_reference(catalog: &Catalog, book_id: u32, chapter: u32) -> Option<Reference> {
    let book = catalog.book_by_id(book_id).ok()?;

    if chapter < book.num_chapters {
        return Some(Reference::new(book_id, chapter.checked_add(1)?));
    }

    let next = catalog.book_after(book_id)?;
    return Some(Reference::new(next.id, first_chapter(next)));
}

/// The chapter before `(book_id, chapter)`, or `None` at the start of the
/// catalog or for an unknown book. Entering a previous book lands on its
/// last chapter, which is 0 for a chapterless book.
pub fn previous_reference(catalog: &Catalog, book_id: u32, chapter: u32) -> Option<Reference> {
    catalog.book_by_id(book_id).ok()?;

    if chapter > 1 {
        return Some(Reference::new(book_id, chapter.checked_sub(1)?));
    }

    let previous = catalog.book_before(book_id)?;
    return Some(Reference::new(previous.id, previous.num_chapters));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::catalog::tests_support::sample_catalog;
    use crate::validator::is_valid_reference;

    /// Every valid reference in the sample catalog, in reading order.
    fn all_references(catalog: &Catalog) -> Vec<Reference> {
        let mut out = Vec::new();
        for book in catalog.volumes().iter().flat_map(|v| v.books.iter()) {
            if book.num_chapters == 0 {
                out.push(Reference::new(book.id, 0));
            } else {
                for chapter in 1..=book.num_chapters {
                    out.push(Reference::new(book.id, chapter));
                }
            }
        }
        out
    }

    #[test]
    fn steps_within_a_book() {
        let catalog = sample_catalog();
        assert_eq!(next_reference(&catalog, 101, 1), Some(Reference::new(101, 2)));
        assert_eq!(previous_reference(&catalog, 101, 3), Some(Reference::new(101, 2)));
    }

    #[test]
    fn chapterless_book_enters_next_book_at_chapter_one() {
        let catalog = sample_catalog();
        assert_eq!(next_reference(&catalog, 106, 0), Some(Reference::new(107, 1)));
        assert_eq!(previous_reference(&catalog, 107, 1), Some(Reference::new(106, 0)));
    }

    #[test]
    fn entering_chapterless_book_lands_on_zero() {
        let catalog = sample_catalog();
        assert_eq!(next_reference(&catalog, 107, 3), Some(Reference::new(108, 0)));
        assert_eq!(next_reference(&catalog, 105, 1), Some(Reference::new(106, 0)));
    }

    #[test]
    fn crosses_volume_boundaries() {
        let catalog = sample_catalog();
        assert_eq!(next_reference(&catalog, 103, 1), Some(Reference::new(104, 1)));
        assert_eq!(previous_reference(&catalog, 104, 1), Some(Reference::new(103, 1)));
    }

    #[test]
    fn ends_of_catalog_have_no_neighbour() {
        let catalog = sample_catalog();
        assert_eq!(next_reference(&catalog, 108, 0), None);
        assert_eq!(previous_reference(&catalog, 101, 1), None);
        assert_eq!(next_reference(&catalog, 999, 1), None);
        assert_eq!(previous_reference(&catalog, 999, 2), None);
    }

    #[test]
    fn adjacency_is_a_total_order() {
        let catalog = sample_catalog();
        let refs = all_references(&catalog);

        for pair in refs.windows(2) {
            assert_eq!(next_reference(&catalog, pair[0].book_id, pair[0].chapter), Some(pair[1]));
            assert_eq!(previous_reference(&catalog, pair[1].book_id, pair[1].chapter), Some(pair[0]));
        }

        for reference in &refs {
            if let Some(prev) = previous_reference(&catalog, reference.book_id, reference.chapter) {
                assert!(is_valid_reference(&catalog, prev.book_id, prev.chapter));
                assert_eq!(next_reference(&catalog, prev.book_id, prev.chapter), Some(*reference));
            }
            if let Some(next) = next_reference(&catalog, reference.book_id, reference.chapter) {
                assert!(is_valid_reference(&catalog, next.book_id, next.chapter));
                assert_eq!(previous_reference(&catalog, next.book_id, next.chapter), Some(*reference));
            }
        }
    }
}
