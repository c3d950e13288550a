//! Best-effort conversions from raw cell text into typed values.
//!
//! Nothing in here fails loudly: a value that cannot be coerced becomes `None`
//! and the caller decides whether that is worth a debug line.

use std::collections::BTreeSet;
use std::fmt;

/// Markers the site uses for "not applicable" in numeric columns.
pub const SENTINELS: [&str; 2] = ["—", "-"];

const INFINITY_MARK: char = '∞';

/// A numeric cell that may also hold the "never misses" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {
    Value(i64),
    Infinite,
}

impl Numeric {
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Numeric::Value(n) => Some(n),
            Numeric::Infinite => None,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Value(n) => write!(f, "{n}"),
            Numeric::Infinite => f.write_str("inf"),
        }
    }
}

pub fn normalize_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parses the number in front of `unit_suffix`, e.g. `"0.7 m (2′04″)"` with `"m"`.
pub fn normalize_measurement(text: &str, unit_suffix: &str) -> Option<f64> {
    let (value, _) = text.split_once(unit_suffix)?;
    value.trim().parse().ok()
}

/// Sentinels become `None`, infinity markers become [`Numeric::Infinite`],
/// and a trailing percent sign is ignored.
pub fn normalize_optional_numeric(text: &str) -> Option<Numeric> {
    let text = text.trim();
    if SENTINELS.contains(&text) {
        return None;
    }
    if text.contains(INFINITY_MARK) || text.to_lowercase().contains("inf") {
        return Some(Numeric::Infinite);
    }
    normalize_integer(&text.replace('%', "")).map(Numeric::Value)
}

/// `"25 (max. 40)"` -> `25`
pub fn normalize_capacity(text: &str) -> Option<i64> {
    first_token(text).and_then(normalize_integer)
}

/// `"45 (5.9% with PokéBall, full HP)"` -> `45`
pub fn normalize_rate(text: &str) -> Option<i64> {
    first_token(text).and_then(normalize_integer)
}

fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// `"#0005"` -> `"0005"`. Zero padding is part of the key and is kept.
pub fn canonicalize_cross_reference(raw_token: &str) -> String {
    let token = raw_token.trim();
    token.strip_prefix('#').unwrap_or(token).trim().to_string()
}

/// Sorts and de-duplicates identifiers, joining them with commas.
/// Returns `None` for an empty set so it renders as a missing value.
pub fn join_cross_references<I, S>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let ids: BTreeSet<String> = ids
        .into_iter()
        .map(Into::into)
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids.into_iter().collect::<Vec<_>>().join(","))
}

/// Left-pads a numeric identifier with zeros, never truncating.
pub fn zero_fill(text: &str, width: usize) -> String {
    format!("{:0>width$}", text.trim())
}

/// Collapses runs of whitespace into one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integers_are_trimmed_and_failures_are_none() {
        assert_eq!(normalize_integer("  64 "), Some(64));
        assert_eq!(normalize_integer("64a"), None);
        assert_eq!(normalize_integer(""), None);
    }

    #[test]
    fn measurements_need_their_unit() {
        assert_eq!(normalize_measurement("0.7 m", "m"), Some(0.7));
        assert_eq!(normalize_measurement("6.9 kg (15.2 lbs)", "kg"), Some(6.9));
        assert_eq!(normalize_measurement("bad", "m"), None);
        assert_eq!(normalize_measurement("0.7", "m"), None);
    }

    #[test]
    fn sentinels_are_null() {
        for sentinel in SENTINELS {
            assert_eq!(normalize_optional_numeric(sentinel), None);
        }
        assert_eq!(normalize_optional_numeric("  —  "), None);
    }

    #[test]
    fn infinity_markers_are_kept_distinct() {
        for text in ["∞", "Inf", "infinite", "INF"] {
            assert_eq!(normalize_optional_numeric(text), Some(Numeric::Infinite));
        }
        assert_eq!(Numeric::Infinite.to_string(), "inf");
        assert_eq!(Numeric::Infinite.as_integer(), None);
    }

    #[test]
    fn percent_values_parse() {
        assert_eq!(normalize_optional_numeric("100%"), Some(Numeric::Value(100)));
        assert_eq!(normalize_optional_numeric("85"), Some(Numeric::Value(85)));
        assert_eq!(normalize_optional_numeric("n/a"), None);
    }

    #[test]
    fn first_token_fields() {
        assert_eq!(normalize_capacity("25 (max. 40)"), Some(25));
        assert_eq!(normalize_rate("45 (5.9% with PokéBall, full HP)"), Some(45));
        assert_eq!(normalize_capacity("   "), None);
        assert_eq!(normalize_rate("— (unknown)"), None);
    }

    #[test]
    fn cross_references_are_canonical_sorted_and_unique() {
        assert_eq!(canonicalize_cross_reference("#0005"), "0005");
        assert_eq!(canonicalize_cross_reference("0005"), "0005");

        let ids = ["#0004", "#0001", "#0004"].map(canonicalize_cross_reference);
        assert_eq!(join_cross_references(ids), Some("0001,0004".to_string()));
        assert_eq!(join_cross_references(Vec::<String>::new()), None);
    }

    #[test]
    fn zero_fill_pads_without_truncating() {
        assert_eq!(zero_fill("1", 3), "001");
        assert_eq!(zero_fill("0025", 3), "0025");
    }
}
