//! Version patterns for scoping migration rules
//!
//! A pattern is one of:
//! - wildcard: absent, empty, `*`, `any` or `+`
//! - exact: a bare version such as `1.2.3`, matched by string equality
//! - range: Maven range syntax, `[1.0,2.0)`, `(,1.0]`, `[1.5]`, or a union
//!   such as `(,1.0],[1.2,)`
//! - prefix: Gradle dynamic version `1.2.+`, matched by string prefix

use crate::version::Version;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Precedence class of a pattern, in resolution order
///
/// Exact patterns are consulted first, then ranges (including prefixes),
/// then wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternClass {
    /// Pattern text equals the version
    Exact,
    /// Range or prefix containing the version
    Range,
    /// Applies to every version
    Wildcard,
}

/// Parsed version pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPattern {
    /// Any version, including an unknown one
    Wildcard,
    /// Exactly this version string
    Exact(String),
    /// Maven-style version range
    Range(VersionRange),
    /// Versions whose text starts with the prefix (source pattern `prefix+`)
    Prefix(String),
}

impl VersionPattern {
    /// Parse an optional pattern string
    ///
    /// # Errors
    /// Returns [`PatternError`] for malformed ranges or stray range
    /// delimiters in a bare version.
    pub fn parse(source: Option<&str>) -> Result<Self, PatternError> {
        let Some(raw) = source.map(str::trim) else {
            return Ok(Self::Wildcard);
        };

        if is_wildcard_spelling(raw) {
            return Ok(Self::Wildcard);
        }

        if raw.starts_with('[') || raw.starts_with('(') {
            return VersionRange::parse(raw).map(Self::Range);
        }

        if raw.contains(['[', ']', '(', ')', ',']) {
            return Err(PatternError::UnexpectedDelimiter {
                pattern: raw.to_string(),
            });
        }

        match raw.strip_suffix('+') {
            Some(prefix) => Ok(Self::Prefix(prefix.to_string())),
            None => Ok(Self::Exact(raw.to_string())),
        }
    }

    /// Precedence class of this pattern
    #[must_use]
    pub fn class(&self) -> PatternClass {
        match self {
            Self::Exact(_) => PatternClass::Exact,
            Self::Range(_) | Self::Prefix(_) => PatternClass::Range,
            Self::Wildcard => PatternClass::Wildcard,
        }
    }

    /// Canonical text used as a collision key; `None` for wildcards
    #[must_use]
    pub fn canonical(&self) -> Option<String> {
        match self {
            Self::Wildcard => None,
            Self::Exact(v) => Some(v.clone()),
            Self::Range(r) => Some(r.source().to_string()),
            Self::Prefix(p) => Some(format!("{p}+")),
        }
    }

    /// Check whether a version falls under this pattern
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Exact(v) => v == version.as_str(),
            Self::Range(r) => r.contains(version),
            Self::Prefix(p) => version.as_str().starts_with(p.as_str()),
        }
    }

    /// Returns true for wildcard patterns
    #[inline]
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

/// Returns true for the spellings that mean "any version": empty, `*`, `+`
/// or `any` (case-insensitive)
#[must_use]
pub fn is_wildcard_spelling(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == "*" || raw == "+" || raw.eq_ignore_ascii_case("any")
}

/// Returns true when a declared version does not name one concrete version
///
/// Covers the wildcard spellings, Maven `RELEASE`/`LATEST`, Gradle
/// `latest.<status>` selectors and `1.2.+` prefixes, version ranges, and
/// unexpanded `${property}` placeholders. Such versions are treated as
/// unknown when resolving, so version-scoped rules never guess at them.
#[must_use]
pub fn is_unresolved_version(raw: &str) -> bool {
    let raw = raw.trim();
    is_wildcard_spelling(raw)
        || raw.eq_ignore_ascii_case("release")
        || raw.eq_ignore_ascii_case("latest")
        || raw
            .get(..7)
            .is_some_and(|head| head.eq_ignore_ascii_case("latest."))
        || raw.ends_with('+')
        || raw.starts_with(['[', '('])
        || raw.contains("${")
}

impl Display for VersionPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Some(text) => f.write_str(&text),
            None => f.write_str("*"),
        }
    }
}

/// One end of an interval
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: Version,
    inclusive: bool,
}

/// Contiguous interval; `None` bounds are unbounded
#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl Interval {
    fn contains(&self, version: &Version) -> bool {
        let above = self.lower.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below = self.upper.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above && below
    }
}

/// Maven version range, possibly a union of intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    source: String,
    intervals: Vec<Interval>,
}

impl VersionRange {
    /// Parse range syntax such as `[1.0,2.0)` or `(,1.0],[1.2,)`
    ///
    /// # Errors
    /// Returns [`PatternError`] for unbalanced delimiters, missing bounds or
    /// empty intervals.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let source = source.trim();
        let mut intervals = Vec::new();
        let mut rest = source;

        while !rest.is_empty() {
            let open = rest.chars().next().unwrap_or_default();
            if open != '[' && open != '(' {
                return Err(PatternError::unbalanced(source));
            }
            let close_at = rest
                .find([']', ')'])
                .ok_or_else(|| PatternError::unbalanced(source))?;
            let body = &rest[1..close_at];
            let close = &rest[close_at..=close_at];
            intervals.push(Interval::parse(source, open == '[', body, close == "]")?);

            rest = rest[close_at + 1..].trim_start();
            if let Some(after) = rest.strip_prefix(',') {
                rest = after.trim_start();
                if rest.is_empty() {
                    return Err(PatternError::unbalanced(source));
                }
            } else if !rest.is_empty() {
                return Err(PatternError::unbalanced(source));
            }
        }

        if intervals.is_empty() {
            return Err(PatternError::unbalanced(source));
        }

        Ok(Self {
            source: source.to_string(),
            intervals,
        })
    }

    /// Source text of the range
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check whether any interval contains the version
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        self.intervals.iter().any(|i| i.contains(version))
    }
}

impl Interval {
    fn parse(
        source: &str,
        lower_inclusive: bool,
        body: &str,
        upper_inclusive: bool,
    ) -> Result<Self, PatternError> {
        let Some((lower, upper)) = body.split_once(',') else {
            // `[1.5]` pins a single version
            let pinned = body.trim();
            if pinned.is_empty() || !lower_inclusive || !upper_inclusive {
                return Err(PatternError::InvalidInterval {
                    pattern: source.to_string(),
                    reason: "single-version range must be written [v]".to_string(),
                });
            }
            let bound = Bound {
                version: Version::parse(pinned),
                inclusive: true,
            };
            return Ok(Self {
                lower: Some(bound.clone()),
                upper: Some(bound),
            });
        };

        if upper.contains(',') {
            return Err(PatternError::InvalidInterval {
                pattern: source.to_string(),
                reason: "too many bounds".to_string(),
            });
        }

        let (lower, upper) = (lower.trim(), upper.trim());
        if lower.is_empty() && upper.is_empty() {
            return Err(PatternError::InvalidInterval {
                pattern: source.to_string(),
                reason: "at least one bound is required".to_string(),
            });
        }

        let lower = (!lower.is_empty()).then(|| Bound {
            version: Version::parse(lower),
            inclusive: lower_inclusive,
        });
        let upper = (!upper.is_empty()).then(|| Bound {
            version: Version::parse(upper),
            inclusive: upper_inclusive,
        });

        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            let empty = match lo.version.cmp(&hi.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(lo.inclusive && hi.inclusive),
                Ordering::Less => false,
            };
            if empty {
                return Err(PatternError::InvalidInterval {
                    pattern: source.to_string(),
                    reason: format!("empty interval {} to {}", lo.version, hi.version),
                });
            }
        }

        Ok(Self { lower, upper })
    }
}

/// Errors from version pattern parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Range delimiters do not pair up
    #[error("unbalanced version range: '{pattern}'")]
    Unbalanced {
        /// Offending pattern text
        pattern: String,
    },

    /// Interval is syntactically valid but meaningless
    #[error("invalid version range '{pattern}': {reason}")]
    InvalidInterval {
        /// Offending pattern text
        pattern: String,
        /// What is wrong with the interval
        reason: String,
    },

    /// Bare version contains range delimiters
    #[error("unexpected range delimiter in version '{pattern}'")]
    UnexpectedDelimiter {
        /// Offending version text
        pattern: String,
    },
}

impl PatternError {
    fn unbalanced(pattern: &str) -> Self {
        Self::Unbalanced {
            pattern: pattern.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> VersionPattern {
        VersionPattern::parse(Some(s)).unwrap()
    }

    fn matches(p: &str, v: &str) -> bool {
        pattern(p).matches(&Version::parse(v))
    }

    #[test]
    fn wildcard_spellings() {
        assert!(VersionPattern::parse(None).unwrap().is_wildcard());
        for s in ["", "  ", "*", "any", "ANY", "+"] {
            assert!(pattern(s).is_wildcard(), "{s:?} should be a wildcard");
        }
    }

    #[test]
    fn unresolved_versions() {
        for s in [
            "", "*", "+", "any", "RELEASE", "release", "LATEST", "latest.release",
            "latest.integration", "1.2.+", "[4.0,5.0)", "(,1.0]", "${junit.version}",
            "1.${minor}",
        ] {
            assert!(is_unresolved_version(s), "{s:?} should be unresolved");
        }
        for s in ["4.12", "1.0.0-rc-1", "2.0-SNAPSHOT", "1.0.RELEASE", "3.0-latest"] {
            assert!(!is_unresolved_version(s), "{s:?} should be concrete");
        }
    }

    #[test]
    fn bare_version_is_exact() {
        let p = pattern(" 1.2.3 ");
        assert_eq!(p, VersionPattern::Exact("1.2.3".to_string()));
        assert_eq!(p.class(), PatternClass::Exact);
        assert!(matches("1.2.3", "1.2.3"));
        assert!(!matches("1.2.3", "1.2.3.0"));
    }

    #[test]
    fn half_open_range() {
        assert!(matches("[1.0,2.0)", "1.0"));
        assert!(matches("[1.0,2.0)", "1.5.0"));
        assert!(matches("[1.0,2.0)", "1.9.9-SNAPSHOT"));
        assert!(!matches("[1.0,2.0)", "2.0"));
        assert!(!matches("[1.0,2.0)", "0.9"));
    }

    #[test]
    fn exclusive_lower_bound() {
        assert!(!matches("(1.0,2.0]", "1.0"));
        assert!(matches("(1.0,2.0]", "2.0"));
    }

    #[test]
    fn unbounded_ends() {
        assert!(matches("(,1.0]", "0.1"));
        assert!(!matches("(,1.0]", "1.0.1"));
        assert!(matches("[1.5,)", "99"));
        assert!(!matches("[1.5,)", "1.4"));
    }

    #[test]
    fn pinned_single_version_is_a_range() {
        let p = pattern("[1.5]");
        assert_eq!(p.class(), PatternClass::Range);
        assert!(p.matches(&Version::parse("1.5")));
        assert!(!p.matches(&Version::parse("1.5.1")));
    }

    #[test]
    fn union_of_intervals() {
        let p = "(,1.0],[1.2,)";
        assert!(matches(p, "0.5"));
        assert!(!matches(p, "1.1"));
        assert!(matches(p, "1.2"));
        assert_eq!(pattern(p).canonical().as_deref(), Some(p));
    }

    #[test]
    fn prefix_pattern() {
        let p = pattern("1.2.+");
        assert_eq!(p.class(), PatternClass::Range);
        assert!(p.matches(&Version::parse("1.2.7")));
        assert!(!p.matches(&Version::parse("1.3.0")));
        assert_eq!(p.canonical().as_deref(), Some("1.2.+"));
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        for bad in ["[1.0,2.0", "[1.0,2.0)x", "(,)", "[2.0,1.0]", "(1.0,1.0)", "(1.5)", "[1,2,3]", "[1.0,2.0),"] {
            assert!(VersionPattern::parse(Some(bad)).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn stray_delimiter_in_bare_version() {
        assert!(matches!(
            VersionPattern::parse(Some("1.0]")),
            Err(PatternError::UnexpectedDelimiter { .. })
        ));
    }

    #[test]
    fn class_order_is_precedence_order() {
        assert!(PatternClass::Exact < PatternClass::Range);
        assert!(PatternClass::Range < PatternClass::Wildcard);
    }

    #[test]
    fn display_uses_canonical_text() {
        assert_eq!(pattern("[1.0,2.0)").to_string(), "[1.0,2.0)");
        assert_eq!(VersionPattern::Wildcard.to_string(), "*");
    }
}
