//! Route state and the catalog-readiness gate in front of the navigator.
//!
//! There is one active route at a time, held in a `RouteCell`. Changes are
//! announced to subscribers over channels, the way a browser fires
//! `hashchange`. Until a catalog is installed nothing navigates; the cell just
//! keeps the latest token, which is navigated as soon as the catalog arrives.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::catalog::Catalog;
use crate::content::ContentLocator;
use crate::navigator::{Navigator, ViewState};

/// The single owned route-state cell.
#[derive(Debug, Default)]
pub struct RouteCell {
    /// Receivers notified of every change; dropped receivers are pruned on send.
    subscribers: Vec<Sender<String>>,
    /// Current routing token, without the leading `#`.
    token: String,
}

impl RouteCell {
    /// The current token.
    pub fn get(&self) -> &str {
        return &self.token;
    }

    /// Store a token. Subscribers are notified only when the token actually
    /// changed; returns whether it did.
    pub fn set(&mut self, token: &str) -> bool {
        if token == self.token {
            return false;
        }
        token.clone_into(&mut self.token);
        self.subscribers.retain(|subscriber| return subscriber.send(token.to_string()).is_ok());
        return true;
    }

    /// A receiver of every future change.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        return receiver;
    }
}

/// Owns the route and, once the catalog is ready, the navigator.
#[derive(Debug)]
pub struct Session {
    /// Content endpoint handed to the navigator on install.
    content: ContentLocator,
    /// Present only after `install_catalog`.
    navigator: Option<Navigator>,
    /// Root breadcrumb label handed to the navigator on install.
    root_title: String,
    /// The active route.
    route: RouteCell,
}

impl Session {
    /// Install the loaded catalog and navigate whatever route is current,
    /// including one that changed while loading.
    pub fn install_catalog(&mut self, catalog: Catalog) -> ViewState {
        let navigator = Navigator::new(Arc::new(catalog), self.content.clone(), &self.root_title);
        tracing::debug!(token = self.route.get(), "catalog ready, navigating current route");
        let view = navigator.navigate_token(self.route.get());
        self.navigator = Some(navigator);
        return view;
    }

    /// Whether a catalog has been installed.
    pub const fn is_ready(&self) -> bool {
        return self.navigator.is_some();
    }

    /// Navigate the current route, or `None` (deferring it) while the catalog is loading.
    pub fn navigate_current(&self) -> Option<ViewState> {
        let Some(navigator) = &self.navigator else {
            tracing::debug!(token = self.route.get(), "catalog not ready, deferring navigation");
            return None;
        };
        return Some(navigator.navigate_token(self.route.get()));
    }

    /// Session with an empty route and no catalog.
    pub fn new(content: ContentLocator, root_title: &str) -> Self {
        return Self {
            content,
            navigator: None,
            root_title: root_title.to_string(),
            route: RouteCell::default(),
        };
    }

    /// Handle a token-changed event: store it and, if the catalog is ready,
    /// navigate. Returns `None` for an unchanged token or while deferred.
    pub fn on_token_changed(&mut self, token: &str) -> Option<ViewState> {
        if !self.set_route(token) {
            return None;
        }
        return self.navigate_current();
    }

    /// The current routing token.
    pub fn route(&self) -> &str {
        return self.route.get();
    }

    /// Store a new route, notifying subscribers if it changed.
    pub fn set_route(&mut self, token: &str) -> bool {
        return self.route.set(token);
    }

    /// A receiver of every future route change.
    pub fn subscribe(&mut self) -> Receiver<String> {
        return self.route.subscribe();
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::catalog::tests_support::sample_catalog;
    use crate::navigator::DEFAULT_ROOT_TITLE;

    fn session() -> Session {
        return Session::new(ContentLocator::default(), DEFAULT_ROOT_TITLE);
    }

    #[test]
    fn route_cell_notifies_only_on_change() {
        let mut cell = RouteCell::default();
        let changes = cell.subscribe();

        assert!(cell.set("1"));
        assert!(!cell.set("1"));
        assert!(cell.set("0:101:2"));

        let seen: Vec<String> = changes.try_iter().collect();
        assert_eq!(seen, vec!["1".to_string(), "0:101:2".to_string()]);
        assert_eq!(cell.get(), "0:101:2");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut cell = RouteCell::default();
        let kept = cell.subscribe();
        drop(cell.subscribe());

        assert!(cell.set("2"));
        assert_eq!(cell.subscribers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), "2");
    }

    #[test]
    fn tokens_before_ready_are_deferred_not_dropped() {
        let mut session = session();
        assert!(!session.is_ready());
        assert!(session.on_token_changed("2").is_none());
        assert!(session.on_token_changed("0:104:3").is_none());

        let view = session.install_catalog(sample_catalog());
        let ViewState::Chapter(chapter) = view else {
            panic!("expected deferred chapter view, got {}", view.state_name());
        };
        assert_eq!(chapter.reference.chapter, 3);
        assert!(session.is_ready());
    }

    #[test]
    fn install_without_token_shows_home() {
        let mut session = session();
        assert_eq!(session.install_catalog(sample_catalog()).state_name(), "home");
    }

    #[test]
    fn ready_session_navigates_each_change_once() {
        let mut session = session();
        session.install_catalog(sample_catalog());

        assert_eq!(session.on_token_changed("3").unwrap().state_name(), "volume_toc");
        assert!(session.on_token_changed("3").is_none());
        assert_eq!(session.on_token_changed("0:999").unwrap().state_name(), "home");
        assert_eq!(session.route(), "0:999");
    }

    #[test]
    fn subscribers_see_session_route_changes() {
        let mut session = session();
        let changes = session.subscribe();
        assert!(session.set_route("0:107"));
        assert_eq!(changes.try_recv().unwrap(), "0:107");
        assert!(session.navigate_current().is_none());
    }
}
