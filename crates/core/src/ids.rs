//! Identifier generation, formatting, and validation.
//!
//! ## ID Formats
//!
//! | Entity | Pattern | Examples |
//! |--------|---------|----------|
//! | Quote (canonical) | `P-{8 digits}` | `P-00421337` |
//! | Quote (display) | `P-{8 digits}-{3 digit version}` | `P-00421337-002` |
//! | Client | `{4 digits}` | `0001`, `0042` |
//! | Generic | `{base36 millis}{8 alphanumerics}` | `lx3k9q2aZ8f0TQ1b` |
//!
//! Stored quote IDs never carry the version suffix. The suffix is derived
//! from `Quote::version` when an ID is shown to a user.
//!
//! ## Examples
//!
//! ```
//! use devis_core::ids::{format_quote_id, next_client_id, parse_display_quote_id};
//!
//! assert_eq!(format_quote_id("P-00421337", 2), "P-00421337-002");
//! assert_eq!(
//!     parse_display_quote_id("P-00421337-002"),
//!     Some(("P-00421337".to_string(), 2))
//! );
//! assert_eq!(next_client_id(&["0007".to_string(), "0012".to_string()]), "0013");
//! ```

use chrono::Utc;
use lazy_static::lazy_static;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;

use crate::constants::{CLIENT_ID_DIGITS, QUOTE_ID_DIGITS, QUOTE_ID_PREFIX, QUOTE_VERSION_DIGITS};

/// Length of the random portion of generic IDs
const RANDOM_SUFFIX_LENGTH: usize = 8;

/// Exclusive upper bound of the random quote number
const QUOTE_NUMBER_SPACE: u32 = 100_000_000;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

lazy_static! {
    /// Format: ^P-[0-9]{8}$
    static ref QUOTE_ID_REGEX: Regex =
        Regex::new(r"^P-[0-9]{8}$").expect("Invalid regex pattern");

    /// Format: ^(P-[0-9]{8})-([0-9]{3})$
    static ref DISPLAY_QUOTE_ID_REGEX: Regex =
        Regex::new(r"^(P-[0-9]{8})-([0-9]{3})$").expect("Invalid regex pattern");
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generates an opaque client-side key: a base36 millisecond timestamp
/// followed by 8 random alphanumeric characters.
///
/// Uniqueness is statistical only. Use it for temporary keys such as line
/// item IDs, never as an authoritative primary key.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(char::from)
        .collect();
    format!("{}{}", to_base36(millis), suffix)
}

/// Generates a canonical quote ID in the `P-########` format.
pub fn generate_quote_id() -> String {
    let number = rand::thread_rng().gen_range(0..QUOTE_NUMBER_SPACE);
    format!(
        "{}{:0width$}",
        QUOTE_ID_PREFIX,
        number,
        width = QUOTE_ID_DIGITS
    )
}

/// Generates a quote ID guaranteed to differ from `previous`.
pub fn generate_quote_id_excluding(previous: &str) -> String {
    loop {
        let candidate = generate_quote_id();
        if candidate != previous {
            return candidate;
        }
    }
}

/// Formats a canonical quote ID with its zero-padded version suffix.
///
/// Display only: the result is never stored as an ID.
pub fn format_quote_id(id: &str, version: u32) -> String {
    format!("{}-{:0width$}", id, version, width = QUOTE_VERSION_DIGITS)
}

/// Splits a display quote ID (`P-########-NNN`) into its canonical ID and version.
pub fn parse_display_quote_id(display_id: &str) -> Option<(String, u32)> {
    let captures = DISPLAY_QUOTE_ID_REGEX.captures(display_id)?;
    let id = captures.get(1)?.as_str().to_string();
    let version = captures.get(2)?.as_str().parse().ok()?;
    Some((id, version))
}

/// Checks whether an ID follows the canonical `P-########` format.
pub fn is_valid_quote_id(id: &str) -> bool {
    QUOTE_ID_REGEX.is_match(id)
}

/// Computes the next sequential client ID from the existing ones.
///
/// Non-numeric IDs are ignored. Returns `0001` when no numeric ID exists.
/// Two callers working from the same snapshot will mint the same ID; the
/// client service resolves that by retrying on conflict.
pub fn next_client_id(existing_ids: &[String]) -> String {
    let next = existing_ids
        .iter()
        .filter_map(|id| id.trim().parse::<u32>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1));
    format!("{:0width$}", next, width = CLIENT_ID_DIGITS)
}
