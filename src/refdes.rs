//! Reference designator handling.
//!
//! Reference designators combine an alphabetic prefix with a 1-based index
//! ("B1", "R10"). Parsing them enables natural ordering, where "R2" sorts
//! before "R10" instead of after it.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Prefix-then-index shape of a conventional reference designator.
fn refdes_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z_]+)([0-9]+)$").ok())
        .as_ref()
}

/// Splits a reference designator into its prefix and index.
///
/// Returns None for text that does not follow the prefix-then-index
/// convention, or whose index overflows.
#[must_use]
pub fn parse_refdes(reference: &str) -> Option<(&str, u32)> {
    let captures = refdes_regex()?.captures(reference)?;
    let prefix = captures.get(1)?.as_str();
    let index = captures.get(2)?.as_str().parse().ok()?;
    Some((prefix, index))
}

/// Returns true when the text has the conventional designator shape.
#[must_use]
pub fn is_well_formed(reference: &str) -> bool {
    parse_refdes(reference).is_some()
}

/// Natural designator ordering: prefixes lexicographically, indexes
/// numerically. Designators that do not parse sort after well-formed ones,
/// by plain text comparison.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (parse_refdes(a), parse_refdes(b)) {
        (Some((prefix_a, index_a)), Some((prefix_b, index_b))) => {
            prefix_a.cmp(prefix_b).then(index_a.cmp(&index_b))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
