/// Crate-level error types for scripnav diagnostics.
use std::path::PathBuf;

/// All errors in scripnav carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the book, token, file, or reason for failure.
///
/// Only `IncompleteCatalog` and the I/O family are fatal. Token and reference
/// failures are downgraded to the Home view by the fail-soft route decoder.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A book id does not exist in the loaded catalog.
    #[error("book not found: {book_id}")]
    BookNotFound {
        /// Book id that was looked up.
        book_id: u32,
    },

    /// A configured catalog source file does not exist on disk.
    #[error("catalog source not found: {}", path.display())]
    CatalogSourceNotFound {
        /// Path to the missing source file.
        path: PathBuf,
    },

    /// The catalog is not ready, or one of its sources is malformed.
    #[error("incomplete catalog: {reason}")]
    IncompleteCatalog {
        /// Description of what was missing or inconsistent.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a view failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A routing token does not match `"" | V | V:B | V:B:C`.
    #[error("malformed token `{token}`: {reason}")]
    MalformedToken {
        /// Why the token was rejected.
        reason: String,
        /// The raw token as supplied.
        token: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A (book, chapter) pair does not address anything in the catalog.
    #[error("unresolved reference {book_id}:{chapter}: {reason}")]
    UnresolvedReference {
        /// Book id of the reference.
        book_id: u32,
        /// Chapter number of the reference.
        chapter: u32,
        /// Why the reference does not resolve.
        reason: String,
    },

    /// A single-segment token names a volume outside the catalog's id range.
    #[error("volume {volume_id} out of range {min}..={max}")]
    VolumeOutOfRange {
        /// Highest volume id in the catalog.
        max: u32,
        /// Lowest volume id in the catalog.
        min: u32,
        /// Volume id taken from the token.
        volume_id: u32,
    },
}
