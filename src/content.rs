//! Remote content addresses for resolved chapters.
//!
//! The core only builds the address. Fetching it is the render collaborator's job.

use crate::catalog::Catalog;
use crate::types::Reference;
use crate::validator;

/// Default endpoint serving chapter HTML.
pub const DEFAULT_CONTENT_URL: &str = "http://scriptures.byu.edu/mapscrip/mapgetscrip.php";

/// Builds content addresses against one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocator {
    /// Endpoint the query string is appended to.
    base_url: String,
}

impl Default for ContentLocator {
    fn default() -> Self {
        return Self::new(DEFAULT_CONTENT_URL);
    }
}

impl ContentLocator {
    /// Address for one chapter: `{base}?book={b}&chap={c}&verses={verses}`,
    /// with `&jst=JST` appended when the alternate translation is requested.
    /// The reference is not validated here.
    pub fn chapter_url(&self, reference: Reference, verses: Option<&str>, jst: bool) -> String {
        let mut options = verses.unwrap_or_default().to_string();
        if jst {
            options.push_str("&jst=JST");
        }
        return format!(
            "{}?book={}&chap={}&verses={options}",
            self.base_url, reference.book_id, reference.chapter
        );
    }

    /// Locator for a specific endpoint.
    pub fn new(base_url: &str) -> Self {
        return Self { base_url: base_url.to_string() };
    }
}

/// Address for a chapter, or `None` when `(book_id, chapter)` is not a valid reference.
pub fn url_for_scripture_chapter(
    catalog: &Catalog,
    locator: &ContentLocator,
    book_id: u32,
    chapter: u32,
    verses: Option<&str>,
    jst: bool,
) -> Option<String> {
    let reference = validator::check_reference(catalog, book_id, chapter).ok()?;
    return Some(locator.chapter_url(reference, verses, jst));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::catalog::tests_support::sample_catalog;

    #[test]
    fn formats_plain_chapter_address() {
        let locator = ContentLocator::default();
        assert_eq!(
            locator.chapter_url(Reference::new(101, 2), None, false),
            "http://scriptures.byu.edu/mapscrip/mapgetscrip.php?book=101&chap=2&verses="
        );
    }

    #[test]
    fn appends_verses_and_alternate_translation_flag() {
        let locator = ContentLocator::new("http://example.test/scrip");
        assert_eq!(
            locator.chapter_url(Reference::new(107, 1), Some("3-5"), true),
            "http://example.test/scrip?book=107&chap=1&verses=3-5&jst=JST"
        );
        assert_eq!(
            locator.chapter_url(Reference::new(106, 0), None, true),
            "http://example.test/scrip?book=106&chap=0&verses=&jst=JST"
        );
    }

    #[test]
    fn validated_url_only_for_resolvable_references() {
        let catalog = sample_catalog();
        let locator = ContentLocator::default();
        assert!(url_for_scripture_chapter(&catalog, &locator, 106, 0, None, false).is_some());
        assert!(url_for_scripture_chapter(&catalog, &locator, 106, 1, None, false).is_none());
        assert!(url_for_scripture_chapter(&catalog, &locator, 101, 0, None, false).is_none());
        assert!(url_for_scripture_chapter(&catalog, &locator, 101, 3, None, false).is_some());
        assert!(url_for_scripture_chapter(&catalog, &locator, 999, 1, None, false).is_none());
    }
}
