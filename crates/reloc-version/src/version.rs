//! Version parsing and static ordering
//!
//! Provides [`Version`], a version string split into comparable parts, and
//! [`StaticVersionComparator`], the ordering used for range bounds.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// A parsed dependency version
///
/// Parts are split on `.`, `-`, `_` and `+`, and on every transition between
/// digits and non-digits: `1.2-beta4` has parts `[1, 2, beta, 4]`.
///
/// Equality follows the static ordering, so `1.0-RC1` and `1.0.rc.1` are
/// equal while `1.0` and `1.0.0` are not.
#[derive(Debug, Clone)]
pub struct Version {
    source: String,
    parts: Vec<String>,
    numeric_parts: Vec<Option<u64>>,
}

impl Version {
    /// Parse a version string
    ///
    /// Parsing never fails; any string yields a (possibly odd) version.
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut parts = Vec::new();
        let mut in_digits = false;
        let mut start = 0;

        for (pos, ch) in source.char_indices() {
            if matches!(ch, '.' | '_' | '-' | '+') {
                parts.push(source[start..pos].to_string());
                start = pos + 1;
                in_digits = false;
            } else if ch.is_ascii_digit() {
                if !in_digits && pos > start {
                    parts.push(source[start..pos].to_string());
                    start = pos;
                }
                in_digits = true;
            } else {
                if in_digits {
                    parts.push(source[start..pos].to_string());
                    start = pos;
                }
                in_digits = false;
            }
        }
        if source.len() > start {
            parts.push(source[start..].to_string());
        }

        let numeric_parts = parts.iter().map(|p| p.parse::<u64>().ok()).collect();

        Self {
            source,
            parts,
            numeric_parts,
        }
    }

    /// Original string representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// All parts, e.g. `1.2-beta4` returns `[1, 2, beta, 4]`
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Numeric value of each part, `None` in non-numeric positions
    #[inline]
    #[must_use]
    pub fn numeric_parts(&self) -> &[Option<u64>] {
        &self.numeric_parts
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        StaticVersionComparator.compare(self, other)
    }
}

/// Ordering of versions independent of any repository metadata
///
/// - numeric parts compare numerically and rank above qualifiers
/// - qualifiers rank `dev` < unknown < `rc` < `snapshot` < `final` < `ga`
///   < `release` < `sp`; unknown qualifiers compare case-insensitively
/// - when one version is a prefix of the other, the longer one is higher
///   only if its next part is numeric or a release qualifier, so
///   `1.0.1` > `1.0` but `1.0-M1` < `1.0`
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticVersionComparator;

impl StaticVersionComparator {
    /// Compare two versions
    #[must_use]
    pub fn compare(&self, a: &Version, b: &Version) -> Ordering {
        for i in 0..a.parts.len().min(b.parts.len()) {
            let ord = compare_part(
                &a.parts[i],
                a.numeric_parts[i],
                &b.parts[i],
                b.numeric_parts[i],
            );
            if ord != Ordering::Equal {
                return ord;
            }
        }

        match a.parts.len().cmp(&b.parts.len()) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => {
                let i = b.parts.len();
                extends_release(&a.parts[i], a.numeric_parts[i])
            }
            Ordering::Less => {
                let i = a.parts.len();
                extends_release(&b.parts[i], b.numeric_parts[i]).reverse()
            }
        }
    }
}

/// Ordering of the longer version against its prefix
fn extends_release(extra: &str, numeric: Option<u64>) -> Ordering {
    let higher = numeric.is_some() || qualifier_rank(extra).is_some_and(|r| r >= FINAL_RANK);
    if higher {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

const FINAL_RANK: i8 = 3;

fn qualifier_rank(part: &str) -> Option<i8> {
    match part.to_ascii_lowercase().as_str() {
        "dev" => Some(-1),
        "rc" | "cr" => Some(1),
        "snapshot" => Some(2),
        "final" => Some(FINAL_RANK),
        "ga" => Some(4),
        "release" => Some(5),
        "sp" => Some(6),
        _ => None,
    }
}

fn compare_part(a: &str, a_num: Option<u64>, b: &str, b_num: Option<u64>) -> Ordering {
    match (a_num, b_num) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => match (qualifier_rank(a), qualifier_rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(x), None) => x.cmp(&0),
            (None, Some(y)) => 0.cmp(&y),
            (None, None) => a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
        },
    }
}
