//! Token-file watcher: the file plays the part of the URL fragment, and every
//! change to its content is a hash-change event.
//!
//! The catalog loads on a background thread while the file is already being
//! watched. Tokens that arrive before it is ready are deferred by the session.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crossbeam_channel::{Receiver, select};
use notify::{RecursiveMode, Watcher as _};

use crate::catalog::Catalog;
use crate::commands::{self, Sources};
use crate::config::Config;
use crate::error;
use crate::loader;
use crate::session::Session;

/// Debounce delay between filesystem events and re-reading the token.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::Io` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| return error::Error::Io(std::io::Error::other(format!("watcher setup failed: {e}"))));
}

/// Read the token file, trimming surrounding whitespace. A missing or
/// unreadable file is logged and skipped; the route stays where it was.
fn read_token(path: &Path) -> Option<String> {
    return match std::fs::read_to_string(path) {
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "token file unreadable");
            None
        },
        Ok(content) => Some(content.trim().to_string()),
    };
}

/// Entry point for the watch command.
///
/// Starts the catalog load, watches the token file's directory, and prints a
/// view for the initial route once the catalog is ready and again after
/// every route change.
///
/// # Errors
///
/// Returns errors from config loading, catalog loading, watcher setup, or JSON output.
pub fn run(sources: Sources<'_>, token_file: &Path, json: bool) -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let paths = config.catalog_paths(sources.books, sources.volumes);

    let mut session = Session::new(config.content_locator(), config.root_title());
    let route_changes = session.subscribe();

    let (catalog_tx, catalog_rx) = crossbeam_channel::bounded(1);
    std::thread::spawn(move || {
        let _ = catalog_tx.send(loader::load_catalog(&paths));
    });
    let mut catalog_rx: Receiver<Result<Catalog, error::Error>> = catalog_rx;

    let (fs_tx, fs_rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(fs_tx)?;
    let watch_dir = token_file
        .parent()
        .filter(|p| return !p.as_os_str().is_empty())
        .unwrap_or_else(|| return Path::new("."));
    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| return error::Error::Io(std::io::Error::other(e.to_string())))?;

    if let Some(token) = read_token(token_file) {
        session.set_route(&token);
    }
    eprintln!("watch: following {}, press Ctrl+C to stop", token_file.display());

    loop {
        select! {
            recv(catalog_rx) -> loaded => {
                catalog_rx = crossbeam_channel::never();
                let catalog = loaded.map_err(|e| {
                    return error::Error::IncompleteCatalog { reason: format!("catalog loader exited: {e}") };
                })??;
                let view = session.install_catalog(catalog);
                eprintln!("watch: catalog ready, showing `{}` ({})", session.route(), view.state_name());
                // Changes made while loading are already reflected in `view`.
                while route_changes.try_recv().is_ok() {}
                commands::print_view(&view, json)?;
            },
            recv(fs_rx) -> event => {
                if event.is_err() {
                    break;
                }
                let debounce = Duration::from_millis(DEBOUNCE_MS);
                while fs_rx.recv_timeout(debounce).is_ok() {}
                if let Some(token) = read_token(token_file)
                    && let Some(view) = session.on_token_changed(&token)
                {
                    commands::print_view(&view, json)?;
                }
            },
            recv(route_changes) -> change => {
                if let Ok(token) = change {
                    if session.is_ready() {
                        eprintln!("watch: route changed to `{token}`");
                    } else {
                        eprintln!("watch: `{token}` deferred until the catalog loads");
                    }
                }
            },
        }
    }

    return Ok(ExitCode::SUCCESS);
}
