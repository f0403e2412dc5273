use std::path::{Path, PathBuf};

use crate::content::{ContentLocator, DEFAULT_CONTENT_URL};
use crate::error::Error;
use crate::loader::CatalogPaths;
use crate::navigator::DEFAULT_ROOT_TITLE;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".scripnav.toml";

/// Project configuration loaded from `.scripnav.toml`.
/// Catalog paths are relative to the directory the config was loaded from.
pub struct Config {
    /// Path of the book source.
    books: PathBuf,
    /// Endpoint chapter content is fetched from.
    content_url: String,
    /// Label of the root breadcrumb.
    root_title: String,
    /// Path of the volume source.
    volumes: PathBuf,
}

/// Raw TOML structure for `.scripnav.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ScripnavTomlConfig {
    /// Book source path.
    books: Option<PathBuf>,
    /// Content endpoint.
    content_url: Option<String>,
    /// Root breadcrumb label.
    root_title: Option<String>,
    /// Volume source path.
    volumes: Option<PathBuf>,
}

impl Config {
    /// Resolved catalog source paths, with CLI overrides taking precedence.
    pub fn catalog_paths(&self, books: Option<&Path>, volumes: Option<&Path>) -> CatalogPaths {
        return CatalogPaths {
            books: books.map_or_else(|| return self.books.clone(), Path::to_path_buf),
            volumes: volumes.map_or_else(|| return self.volumes.clone(), Path::to_path_buf),
        };
    }

    /// Locator for the configured content endpoint.
    pub fn content_locator(&self) -> ContentLocator {
        return ContentLocator::new(&self.content_url);
    }

    /// Load config from `.scripnav.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::with_defaults(root)),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: ScripnavTomlConfig = toml::from_str(&content)?;
        let defaults = Self::with_defaults(root);
        return Ok(Self {
            books: raw.books.map_or(defaults.books, |p| return root.join(p)),
            content_url: raw.content_url.unwrap_or(defaults.content_url),
            root_title: raw.root_title.unwrap_or(defaults.root_title),
            volumes: raw.volumes.map_or(defaults.volumes, |p| return root.join(p)),
        });
    }

    /// Label of the root breadcrumb.
    pub fn root_title(&self) -> &str {
        return &self.root_title;
    }

    /// Defaults: `books.json` and `volumes.json` next to the config, the public endpoint.
    fn with_defaults(root: &Path) -> Self {
        return Self {
            books: root.join("books.json"),
            content_url: DEFAULT_CONTENT_URL.to_string(),
            root_title: DEFAULT_ROOT_TITLE.to_string(),
            volumes: root.join("volumes.json"),
        };
    }
}
