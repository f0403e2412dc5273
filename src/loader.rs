//! Concurrent catalog loading.
//!
//! The book and volume sources are read on two threads and joined through a
//! `CompletionGate`. Whichever finishes second releases the gate, and the
//! catalog (with its volume book caches) is built exactly once after that.

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::Error;
use crate::gate::CompletionGate;

/// One finished source load.
enum Arrival {
    /// Outcome of reading the book source.
    Books(Result<String, Error>),
    /// Outcome of reading the volume source.
    Volumes(Result<String, Error>),
}

/// Where the two catalog sources live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    /// JSON object of book records keyed by id.
    pub books: PathBuf,
    /// JSON array of volume records.
    pub volumes: PathBuf,
}

/// Load both catalog sources from disk in parallel and build the catalog.
///
/// # Errors
///
/// Returns `Error::CatalogSourceNotFound` or `Error::Io` if a source cannot be
/// read, or `Error::IncompleteCatalog` if a source is malformed.
pub fn load_catalog(paths: &CatalogPaths) -> Result<Catalog, Error> {
    return load_with(|| return read_source(&paths.books), || return read_source(&paths.volumes));
}

/// Run two source loads concurrently, wait for both, then build the catalog.
///
/// # Errors
///
/// Returns the first source error encountered, or `Error::IncompleteCatalog`
/// if a load never reports or the joined sources are malformed.
pub fn load_with<B, V>(books: B, volumes: V) -> Result<Catalog, Error>
where
    B: FnOnce() -> Result<String, Error> + Send,
    V: FnOnce() -> Result<String, Error> + Send,
{
    let gate = CompletionGate::new(2);
    let books_done = gate.participant();
    let volumes_done = gate.participant();

    let arrivals = std::thread::scope(|scope| {
        scope.spawn(move || {
            let _ = books_done.send(Arrival::Books(books()));
        });
        scope.spawn(move || {
            let _ = volumes_done.send(Arrival::Volumes(volumes()));
        });
        return gate.wait();
    })?;

    let mut books_json = None;
    let mut volumes_json = None;
    for arrival in arrivals {
        match arrival {
            Arrival::Books(loaded) => books_json = Some(loaded?),
            Arrival::Volumes(loaded) => volumes_json = Some(loaded?),
        }
    }

    let (Some(books_json), Some(volumes_json)) = (books_json, volumes_json) else {
        return Err(Error::IncompleteCatalog {
            reason: "a catalog source reported twice".to_string(),
        });
    };
    return Catalog::from_json(&books_json, &volumes_json);
}

/// Read one source file.
///
/// # Errors
///
/// Returns `Error::CatalogSourceNotFound` if the file is missing, or `Error::Io`
/// for any other read failure.
fn read_source(path: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::CatalogSourceNotFound { path: path.to_path_buf() })
        },
        Err(e) => Err(Error::Io(e)),
        Ok(content) => Ok(content),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::catalog::tests_support::{BOOKS_JSON, VOLUMES_JSON};

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CatalogPaths {
            books: dir.path().join("books.json"),
            volumes: dir.path().join("volumes.json"),
        };
        std::fs::write(&paths.books, BOOKS_JSON).unwrap();
        std::fs::write(&paths.volumes, VOLUMES_JSON).unwrap();

        let catalog = load_catalog(&paths).unwrap();
        assert_eq!(catalog.book_count(), 8);
    }

    #[test]
    fn missing_source_is_reported_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CatalogPaths {
            books: dir.path().join("books.json"),
            volumes: dir.path().join("absent.json"),
        };
        std::fs::write(&paths.books, BOOKS_JSON).unwrap();

        match load_catalog(&paths) {
            Err(Error::CatalogSourceNotFound { path }) => assert!(path.ends_with("absent.json")),
            other => panic!("expected CatalogSourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn completion_order_does_not_matter() {
        let volumes_late = load_with(
            || return Ok(BOOKS_JSON.to_string()),
            || {
                thread::sleep(Duration::from_millis(20));
                return Ok(VOLUMES_JSON.to_string());
            },
        );
        assert!(volumes_late.is_ok());

        let books_late = load_with(
            || {
                thread::sleep(Duration::from_millis(20));
                return Ok(BOOKS_JSON.to_string());
            },
            || return Ok(VOLUMES_JSON.to_string()),
        );
        assert!(books_late.is_ok());
    }

    #[test]
    fn one_failed_source_fails_the_whole_load() {
        let result = load_with(
            || return Ok(BOOKS_JSON.to_string()),
            || return Ok("{not json".to_string()),
        );
        assert!(matches!(result, Err(Error::IncompleteCatalog { .. })));
    }
}
