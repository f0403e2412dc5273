//! Route codec: routing tokens (`"" | V | V:B | V:B:C`) to navigation intents and back.
//!
//! Only single-segment tokens are checked against the volume id range. The
//! volume segment of book and chapter tokens must be numeric but is otherwise
//! taken on trust, the same way the encoder trusts its caller.

use std::fmt::Write as _;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::types::NavigationIntent;
use crate::validator;

/// Volume id written into generated book and chapter tokens.
pub const PLACEHOLDER_VOLUME: u32 = 0;

/// Separator between token segments.
const SEPARATOR: char = ':';

/// Decode a token, downgrading every failure to `Home`.
pub fn decode(catalog: &Catalog, token: &str) -> NavigationIntent {
    return match parse(catalog, token) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::debug!(token, error = %e, "token downgraded to home");
            NavigationIntent::Home
        },
    };
}

/// Build a token from progressively more specific parts. A missing part
/// truncates the token there, so later parts are ignored.
pub fn encode(volume_id: Option<u32>, book_id: Option<u32>, chapter: Option<u32>) -> String {
    let Some(volume_id) = volume_id else {
        return String::new();
    };
    let mut token = volume_id.to_string();

    if let Some(book_id) = book_id {
        let _ = write!(token, "{SEPARATOR}{book_id}");
        if let Some(chapter) = chapter {
            let _ = write!(token, "{SEPARATOR}{chapter}");
        }
    }

    return token;
}

/// Strictly decode a token. A single leading `#` is tolerated.
///
/// # Errors
///
/// Returns `Error::MalformedToken` if the token has more than three segments
/// or a segment is not a non-negative integer, `Error::VolumeOutOfRange` for a
/// single segment outside the catalog's volume ids, or `Error::UnresolvedReference`
/// for an unknown book or an invalid chapter.
pub fn parse(catalog: &Catalog, token: &str) -> Result<NavigationIntent, Error> {
    let body = token.strip_prefix('#').unwrap_or(token);
    if body.is_empty() {
        return Ok(NavigationIntent::Home);
    }

    let segments: Vec<&str> = body.split(SEPARATOR).collect();
    if segments.len() > 3 {
        return Err(Error::MalformedToken {
            reason: format!("expected at most 3 segments, found {}", segments.len()),
            token: token.to_string(),
        });
    }

    let numbers = segments
        .iter()
        .map(|segment| return parse_segment(token, segment))
        .collect::<Result<Vec<u32>, Error>>()?;

    return match *numbers.as_slice() {
        [volume_id] => {
            let (min, max) = catalog.volume_id_range();
            if (min..=max).contains(&volume_id) {
                Ok(NavigationIntent::Volume { volume_id })
            } else {
                Err(Error::VolumeOutOfRange { max, min, volume_id })
            }
        },
        [_, book_id] => match catalog.book_by_id(book_id) {
            Err(_) => Err(Error::UnresolvedReference { book_id, chapter: 0, reason: "unknown book".to_string() }),
            Ok(_) => Ok(NavigationIntent::Book { book_id }),
        },
        [_, book_id, chapter] => {
            let reference = validator::check_reference(catalog, book_id, chapter)?;
            Ok(NavigationIntent::Chapter(reference))
        },
        _ => Err(Error::MalformedToken {
            reason: "no segments".to_string(),
            token: token.to_string(),
        }),
    };
}

/// Parse one segment as a non-negative integer: ASCII digits only, no sign or spaces.
///
/// # Errors
///
/// Returns `Error::MalformedToken` for empty, non-digit, or overflowing segments.
fn parse_segment(token: &str, segment: &str) -> Result<u32, Error> {
    if segment.is_empty() || !segment.bytes().all(|b| return b.is_ascii_digit()) {
        return Err(Error::MalformedToken {
            reason: format!("segment `{segment}` is not a non-negative integer"),
            token: token.to_string(),
        });
    }
    return segment.parse::<u32>().map_err(|e| {
        return Error::MalformedToken {
            reason: format!("segment `{segment}`: {e}"),
            token: token.to_string(),
        };
    });
}

/// Canonical token for an intent. Book and chapter tokens carry the placeholder volume.
pub fn token_for(intent: &NavigationIntent) -> String {
    return match *intent {
        NavigationIntent::Book { book_id } => encode(Some(PLACEHOLDER_VOLUME), Some(book_id), None),
        NavigationIntent::Chapter(reference) => encode(
            Some(PLACEHOLDER_VOLUME),
            Some(reference.book_id),
            Some(reference.chapter),
        ),
        NavigationIntent::Home => String::new(),
        NavigationIntent::Volume { volume_id } => encode(Some(volume_id), None, None),
    };
}
