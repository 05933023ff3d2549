//! Query-string codec for the slip identifier sequence.
//!
//! The host encodes the slips a location wants loaded as repeated values
//! of a single query parameter: `?slip=noteA&slip=noteB`. Parsing returns
//! the values in order; encoding rewrites only that parameter and carries
//! every other query pair through untouched.

use url::form_urlencoded;

/// Query parameter key carrying slip identifiers.
pub const SLIP_PARAM: &str = "slip";

fn pairs(search: &str) -> form_urlencoded::Parse<'_> {
    let search = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(search.as_bytes())
}

/// Extract the ordered slip identifier sequence from a query string.
///
/// Accepts the raw search string with or without a leading `?`. A single
/// value yields a singleton sequence; an absent parameter yields an empty
/// one.
#[must_use]
pub fn parse_slip_ids(search: &str) -> Vec<String> {
    pairs(search)
        .filter(|(key, _)| key == SLIP_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect()
}

/// Rewrite `search` so its slip sequence becomes exactly `ids`.
///
/// Unrelated query parameters are preserved in their original order; the
/// previous slip values are dropped and the new ones appended. The result
/// has no leading `?`.
#[must_use]
pub fn with_slip_ids<S: AsRef<str>>(search: &str, ids: &[S]) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs(search) {
        if key != SLIP_PARAM {
            out.append_pair(&key, &value);
        }
    }
    for id in ids {
        out.append_pair(SLIP_PARAM, id.as_ref());
    }
    out.finish()
}
