//! Navigation state machine: a decoded intent in, the view to render out.
//!
//! The navigator is stateless apart from its injected catalog, so any number
//! of them can run side by side. Every transition goes through a
//! `NavigationIntent`; an intent that does not resolve shows Home.

use std::sync::Arc;

use serde::Serialize;

use crate::adjacency;
use crate::catalog::Catalog;
use crate::content::ContentLocator;
use crate::route;
use crate::types::{Book, NavigationIntent, Reference, Volume};
use crate::validator;

/// Root breadcrumb label unless configured otherwise.
pub const DEFAULT_ROOT_TITLE: &str = "The Scriptures";

/// Everything the render collaborator needs to show one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    /// Book being read.
    pub book: Book,
    /// Home → Volume → Book → Chapter.
    pub breadcrumb: Vec<Crumb>,
    /// Where the chapter text is fetched from.
    pub content_url: String,
    /// Following chapter, `None` at the end of the catalog.
    pub next: Option<Link>,
    /// Preceding chapter, `None` at the start of the catalog.
    pub previous: Option<Link>,
    /// The chapter shown.
    pub reference: Reference,
    /// Volume owning the book.
    pub volume: Volume,
}

/// One breadcrumb level. Every level except the current leaf links somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    /// Text shown for this level.
    pub label: String,
    /// Token navigated to when clicked; `None` for the leaf.
    pub token: Option<String>,
}

impl Crumb {
    /// The current, unclickable level.
    fn leaf(label: &str) -> Self {
        return Self { label: label.to_string(), token: None };
    }

    /// An ancestor level linking to `intent`.
    fn linked(label: &str, intent: &NavigationIntent) -> Self {
        return Self { label: label.to_string(), token: Some(route::token_for(intent)) };
    }
}

/// A clickable link producing a navigation intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Intent the link produces.
    pub intent: NavigationIntent,
    /// Human-readable title.
    pub title: String,
    /// Token written into the route when followed.
    pub token: String,
}

impl Link {
    /// Link to a book from a volume listing, carrying the real volume id in its token.
    pub fn book_in_volume(volume: &Volume, book: &Book) -> Self {
        return Self {
            intent: NavigationIntent::Book { book_id: book.id },
            title: book.grid_name.clone(),
            token: route::encode(Some(volume.id), Some(book.id), None),
        };
    }

    /// Link to an intent under its canonical token.
    fn to(intent: NavigationIntent, title: String) -> Self {
        return Self { token: route::token_for(&intent), intent, title };
    }
}

/// Builds view states from intents against one catalog.
#[derive(Debug, Clone)]
pub struct Navigator {
    /// Shared, read-only catalog.
    catalog: Arc<Catalog>,
    /// Builds chapter content addresses.
    content: ContentLocator,
    /// Label of the root breadcrumb.
    root_title: String,
}

/// What to render after a navigation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ViewState {
    /// Chapter picker for a book with more than one chapter.
    BookChapterList {
        /// Book whose chapters are listed.
        book: Book,
        /// Home → Volume → Book.
        breadcrumb: Vec<Crumb>,
        /// One link per chapter, `1..=numChapters`.
        chapters: Vec<Link>,
        /// Volume owning the book.
        volume: Volume,
    },
    /// A single chapter.
    Chapter(Box<ChapterView>),
    /// Every volume with its books.
    Home {
        /// Just the root.
        breadcrumb: Vec<Crumb>,
        /// Snapshot of every volume.
        volumes: Vec<Volume>,
    },
    /// One volume's table of contents.
    Volume {
        /// One link per book of the volume.
        books: Vec<Link>,
        /// Home → Volume.
        breadcrumb: Vec<Crumb>,
        /// Volume shown.
        volume: Volume,
    },
}

impl ViewState {
    /// Short name of the navigation state this view belongs to.
    pub const fn state_name(&self) -> &'static str {
        return match *self {
            ViewState::BookChapterList { .. } => "book_toc",
            ViewState::Chapter(_) => "chapter",
            ViewState::Home { .. } => "home",
            ViewState::Volume { .. } => "volume_toc",
        };
    }
}

impl Navigator {
    /// Intent for a book: chapterless and single-chapter books open straight
    /// to their only chapter, others list their chapters.
    fn book_view(&self, book_id: u32) -> ViewState {
        let intent = NavigationIntent::Book { book_id };
        let Ok(book) = self.catalog.book_by_id(book_id) else {
            return self.fallback(&intent);
        };

        match book.num_chapters {
            0 => return self.chapter_view(Reference::new(book_id, 0)),
            1 => return self.chapter_view(Reference::new(book_id, 1)),
            _ => {},
        }

        let Some(volume) = self.catalog.volume_for_book(book) else {
            return self.fallback(&intent);
        };

        let chapters = (1..=book.num_chapters)
            .map(|chapter| {
                let target = NavigationIntent::Chapter(Reference::new(book_id, chapter));
                return Link::to(target, chapter.to_string());
            })
            .collect();

        return ViewState::BookChapterList {
            book: book.clone(),
            breadcrumb: self.breadcrumb(Some(volume), Some(book), None),
            chapters,
            volume: volume.clone(),
        };
    }

    /// Breadcrumb path for a view. Chapter 0 ends at the book, like a book list.
    fn breadcrumb(&self, volume: Option<&Volume>, book: Option<&Book>, chapter: Option<u32>) -> Vec<Crumb> {
        let Some(volume) = volume else {
            return vec![Crumb::leaf(&self.root_title)];
        };
        let mut crumbs = vec![Crumb::linked(&self.root_title, &NavigationIntent::Home)];

        let Some(book) = book else {
            crumbs.push(Crumb::leaf(&volume.full_name));
            return crumbs;
        };
        crumbs.push(Crumb::linked(
            &volume.full_name,
            &NavigationIntent::Volume { volume_id: volume.id },
        ));

        match chapter.filter(|c| return *c > 0) {
            None => crumbs.push(Crumb::leaf(&book.toc_name)),
            Some(chapter) => {
                crumbs.push(Crumb::linked(&book.toc_name, &NavigationIntent::Book { book_id: book.id }));
                crumbs.push(Crumb::leaf(&chapter.to_string()));
            },
        }
        return crumbs;
    }

    /// The catalog this navigator reads.
    pub fn catalog(&self) -> &Catalog {
        return &self.catalog;
    }

    /// Link to a neighbouring chapter, titled after its book.
    fn chapter_link(&self, reference: Reference) -> Option<Link> {
        let book = self.catalog.book_by_id(reference.book_id).ok()?;
        return Some(Link::to(NavigationIntent::Chapter(reference), book.title_for(reference.chapter)));
    }

    /// Intent for one chapter.
    fn chapter_view(&self, reference: Reference) -> ViewState {
        let intent = NavigationIntent::Chapter(reference);
        if !validator::is_valid_reference(&self.catalog, reference.book_id, reference.chapter) {
            return self.fallback(&intent);
        }
        let Ok(book) = self.catalog.book_by_id(reference.book_id) else {
            return self.fallback(&intent);
        };
        let Some(volume) = self.catalog.volume_for_book(book) else {
            return self.fallback(&intent);
        };

        let previous = adjacency::previous_reference(&self.catalog, reference.book_id, reference.chapter)
            .and_then(|r| return self.chapter_link(r));
        let next = adjacency::next_reference(&self.catalog, reference.book_id, reference.chapter)
            .and_then(|r| return self.chapter_link(r));

        return ViewState::Chapter(Box::new(ChapterView {
            book: book.clone(),
            breadcrumb: self.breadcrumb(Some(volume), Some(book), Some(reference.chapter)),
            content_url: self.content.chapter_url(reference, None, false),
            next,
            previous,
            reference,
            volume: volume.clone(),
        }));
    }

    /// Home view for an intent that slipped past the codec without resolving.
    fn fallback(&self, intent: &NavigationIntent) -> ViewState {
        tracing::warn!(%intent, "intent does not resolve, showing home");
        return self.home_view();
    }

    /// Every volume, each with its cached books.
    fn home_view(&self) -> ViewState {
        return ViewState::Home {
            breadcrumb: self.breadcrumb(None, None, None),
            volumes: self.catalog.volumes(),
        };
    }

    /// Run the state machine for one intent.
    pub fn navigate(&self, intent: &NavigationIntent) -> ViewState {
        return match *intent {
            NavigationIntent::Book { book_id } => self.book_view(book_id),
            NavigationIntent::Chapter(reference) => self.chapter_view(reference),
            NavigationIntent::Home => self.home_view(),
            NavigationIntent::Volume { volume_id } => self.volume_view(volume_id),
        };
    }

    /// Decode a routing token (fail-soft) and navigate to it.
    pub fn navigate_token(&self, token: &str) -> ViewState {
        let intent = route::decode(&self.catalog, token);
        return self.navigate(&intent);
    }

    /// Navigator over a loaded catalog.
    pub fn new(catalog: Arc<Catalog>, content: ContentLocator, root_title: &str) -> Self {
        return Self { catalog, content, root_title: root_title.to_string() };
    }

    /// One volume's table of contents.
    fn volume_view(&self, volume_id: u32) -> ViewState {
        let Some(volume) = self.catalog.volume_by_id(volume_id) else {
            return self.fallback(&NavigationIntent::Volume { volume_id });
        };
        return ViewState::Volume {
            books: volume.books.iter().map(|book| return Link::book_in_volume(volume, book)).collect(),
            breadcrumb: self.breadcrumb(Some(volume), None, None),
            volume: volume.clone(),
        };
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::catalog::tests_support::sample_catalog;

    fn navigator() -> Navigator {
        return Navigator::new(Arc::new(sample_catalog()), ContentLocator::default(), DEFAULT_ROOT_TITLE);
    }

    fn chapter(view: ViewState) -> ChapterView {
        return match view {
            ViewState::Chapter(chapter) => *chapter,
            other => panic!("expected chapter view, got {}", other.state_name()),
        };
    }

    fn labels(crumbs: &[Crumb]) -> Vec<&str> {
        return crumbs.iter().map(|c| c.label.as_str()).collect();
    }

    #[test]
    fn empty_token_lists_every_volume() {
        let view = navigator().navigate_token("");
        let ViewState::Home { breadcrumb, volumes } = view else {
            panic!("expected home view");
        };
        assert_eq!(volumes.len(), 3);
        assert_eq!(volumes[1].books.len(), 2);
        assert_eq!(breadcrumb, vec![Crumb { label: "The Scriptures".to_string(), token: None }]);
    }

    #[test]
    fn volume_token_shows_only_that_volume() {
        let view = navigator().navigate_token("2");
        let ViewState::Volume { books, breadcrumb, volume } = view else {
            panic!("expected volume view");
        };
        assert_eq!(volume.id, 2);
        let ids: Vec<u32> = volume.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![104, 105]);
        assert_eq!(books[0].token, "2:104");
        assert_eq!(books[0].title, "Matt");
        assert_eq!(labels(&breadcrumb), vec!["The Scriptures", "New Testament"]);
        assert_eq!(breadcrumb[0].token.as_deref(), Some(""));
        assert_eq!(breadcrumb[1].token, None);
    }

    #[test]
    fn multi_chapter_book_lists_its_chapters() {
        let view = navigator().navigate_token("2:104");
        let ViewState::BookChapterList { book, breadcrumb, chapters, volume } = view else {
            panic!("expected chapter list");
        };
        assert_eq!(book.id, 104);
        assert_eq!(volume.id, 2);
        let tokens: Vec<&str> = chapters.iter().map(|l| l.token.as_str()).collect();
        assert_eq!(tokens, vec!["0:104:1", "0:104:2", "0:104:3", "0:104:4"]);
        assert_eq!(labels(&breadcrumb), vec!["The Scriptures", "New Testament", "Matthew"]);
        assert_eq!(breadcrumb[1].token.as_deref(), Some("2"));
        assert_eq!(breadcrumb[2].token, None);
    }

    #[test]
    fn single_and_zero_chapter_books_open_directly() {
        let nav = navigator();
        assert_eq!(chapter(nav.navigate_token("0:103")).reference, Reference::new(103, 1));
        assert_eq!(chapter(nav.navigate_token("0:106")).reference, Reference::new(106, 0));
    }

    #[test]
    fn chapter_view_carries_links_breadcrumb_and_content_url() {
        let view = chapter(navigator().navigate_token("0:104:1"));
        assert_eq!(view.reference, Reference::new(104, 1));
        assert_eq!(
            labels(&view.breadcrumb),
            vec!["The Scriptures", "New Testament", "Matthew", "1"]
        );
        assert_eq!(view.breadcrumb[2].token.as_deref(), Some("0:104"));
        assert_eq!(view.breadcrumb[3].token, None);

        let previous = view.previous.unwrap();
        assert_eq!(previous.title, "Obadiah 1");
        assert_eq!(previous.token, "0:103:1");
        let next = view.next.unwrap();
        assert_eq!(next.title, "Matthew 2");
        assert_eq!(next.intent, NavigationIntent::Chapter(Reference::new(104, 2)));
        assert!(view.content_url.ends_with("?book=104&chap=1&verses="));
    }

    #[test]
    fn chapterless_chapter_titles_and_crumbs_omit_the_number() {
        let view = chapter(navigator().navigate_token("0:106:0"));
        assert_eq!(labels(&view.breadcrumb), vec!["The Scriptures", "Pearl of Great Price", "Introduction"]);
        assert_eq!(view.previous.unwrap().title, "Jude 1");

        let moses = chapter(navigator().navigate_token("0:107:1"));
        assert_eq!(moses.previous.unwrap().title, "Introduction");
    }

    #[test]
    fn catalog_ends_have_no_links() {
        let first = chapter(navigator().navigate_token("0:101:1"));
        assert!(first.previous.is_none());
        assert!(first.next.is_some());

        let last = chapter(navigator().navigate_token("0:108:0"));
        assert!(last.next.is_none());
    }

    #[test]
    fn out_of_range_chapter_falls_back_home() {
        assert_eq!(navigator().navigate_token("0:104:9").state_name(), "home");
    }

    #[test]
    fn hand_built_unresolvable_intents_fall_back_home() {
        let nav = navigator();
        let intents = [
            NavigationIntent::Book { book_id: 5 },
            NavigationIntent::Chapter(Reference::new(101, 0)),
            NavigationIntent::Volume { volume_id: 9 },
        ];
        for intent in intents {
            assert_eq!(nav.navigate(&intent).state_name(), "home", "{intent}");
        }
    }

    #[test]
    fn configured_root_title_heads_the_breadcrumb() {
        let nav = Navigator::new(Arc::new(sample_catalog()), ContentLocator::default(), "Canon");
        let view = chapter(nav.navigate_token("0:101:2"));
        assert_eq!(view.breadcrumb[0].label, "Canon");
    }

    #[test]
    fn json_keys_are_camel_case_throughout() {
        let value = serde_json::to_value(navigator().navigate_token("0:104:3")).unwrap();
        assert_eq!(value["view"], "chapter");
        assert_eq!(value["reference"]["bookId"], 104);
        assert_eq!(value["book"]["numChapters"], 4);
        assert_eq!(value["next"]["intent"]["kind"], "chapter");
        assert_eq!(value["next"]["intent"]["bookId"], 104);
        assert!(value["contentUrl"].as_str().unwrap().contains("book=104&chap=3"));
        assert!(value.get("content_url").is_none());

        let book_list = serde_json::to_value(navigator().navigate_token("0:101")).unwrap();
        assert_eq!(book_list["view"], "bookChapterList");
        assert_eq!(book_list["volume"]["maxBookId"], 103);
    }
}
