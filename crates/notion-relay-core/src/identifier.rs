//! Database identifier normalisation.
//!
//! Notion database IDs are UUIDs, but they are usually copied out of a share
//! URL where they appear as 32 contiguous hex characters (sometimes with a
//! title slug or query string around them). The API accepts the dashed
//! 8-4-4-4-12 form, so configuration values are canonicalised before use.

/// Length of an undashed Notion ID.
const ID_HEX_LEN: usize = 32;

/// Hex group boundaries of the dashed 8-4-4-4-12 form.
const GROUPS: [(usize, usize); 5] = [(0, 8), (8, 12), (12, 16), (16, 20), (20, 32)];

/// Normalise a raw database identifier into its dashed form.
///
/// Input: `"0123456789abcdef0123456789abcdef"`
/// Output: `"01234567-89ab-cdef-0123-456789abcdef"`
///
/// # Algorithm
///
/// 1. Strip every character that is not an ASCII hex digit.
/// 2. If exactly 32 digits remain, regroup them as 8-4-4-4-12 joined by `-`.
/// 3. Otherwise return the input unchanged.
///
/// Never fails. Applying it to its own output is a no-op.
pub fn normalize_database_id(raw: &str) -> String {
    let hex: String = raw.chars().filter(char::is_ascii_hexdigit).collect();
    if hex.len() != ID_HEX_LEN {
        return raw.to_string();
    }

    GROUPS
        .iter()
        .map(|&(start, end)| &hex[start..end])
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether `s` looks like a Notion ID: 32 to 36 characters of hex digits and hyphens.
pub fn looks_like_database_id(s: &str) -> bool {
    (ID_HEX_LEN..=ID_HEX_LEN + 4).contains(&s.len())
        && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}
