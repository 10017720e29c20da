//! Dependency declaration sites
//!
//! A [`CoordinateSite`] is anything a relocation pass can inspect and
//! rewrite: a declared coordinate with an optional version. Build-file models
//! implement it; [`DependencyList`] is the plain-text one shipped here.
//!
//! The text format is one `group:artifact[:version]` per line. Blank lines
//! and lines starting with `#` are kept verbatim. The list is rendered with
//! the line terminator of its first line (`\n` or `\r\n`).

use crate::error::RelocError;
use reloc_index::{Coordinate, ANY_ARTIFACT};
use reloc_ingest::parse_gav;
use std::fmt::{self, Display, Formatter};

/// A rewritable dependency declaration
pub trait CoordinateSite: Send + Sync {
    /// Declared coordinate
    fn coordinate(&self) -> Coordinate;

    /// Declared version, if any
    fn version(&self) -> Option<&str>;

    /// Replace the declared coordinate, keeping the version
    fn relocate(&mut self, to: &Coordinate);

    /// Human-readable location used in findings
    fn label(&self) -> String;
}

/// One dependency line of a [`DependencyList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLine {
    line: usize,
    indent: String,
    coordinate: Coordinate,
    version: Option<String>,
}

impl DependencyLine {
    /// Parse a single `group:artifact[:version]` declaration
    ///
    /// `line` is the 1-based line number used in labels and errors.
    ///
    /// # Errors
    /// Returns [`RelocError::InvalidDependency`] if the text is not a full
    /// coordinate.
    pub fn parse(line: usize, text: &str) -> Result<Self, RelocError> {
        let invalid = |reason: String| RelocError::InvalidDependency { line, reason };

        let gav = parse_gav(text).map_err(|e| invalid(e.to_string()))?;
        if gav.artifact_id == ANY_ARTIFACT {
            return Err(invalid(format!("'{}' has no artifact id", text.trim())));
        }

        let indent_len = text.len() - text.trim_start().len();
        Ok(Self {
            line,
            indent: text[..indent_len].to_string(),
            coordinate: Coordinate::new(gav.group_id, gav.artifact_id),
            version: gav.version,
        })
    }

    /// 1-based line number
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl CoordinateSite for DependencyLine {
    fn coordinate(&self) -> Coordinate {
        self.coordinate.clone()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn relocate(&mut self, to: &Coordinate) {
        self.coordinate = to.clone();
    }

    fn label(&self) -> String {
        format!("line {}", self.line)
    }
}

impl Display for DependencyLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.indent, self.coordinate)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Line {
    Verbatim(String),
    Dependency(usize),
}

/// Plain-text dependency list
#[derive(Debug, Clone)]
pub struct DependencyList {
    lines: Vec<Line>,
    dependencies: Vec<DependencyLine>,
    newline: &'static str,
    trailing_newline: bool,
}

impl DependencyList {
    /// Parse a dependency list
    ///
    /// # Errors
    /// Returns [`RelocError::InvalidDependency`] for the first bad line.
    pub fn parse(text: &str) -> Result<Self, RelocError> {
        let mut lines = Vec::new();
        let mut dependencies = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                lines.push(Line::Verbatim(raw.to_string()));
            } else {
                lines.push(Line::Dependency(dependencies.len()));
                dependencies.push(DependencyLine::parse(i + 1, raw.trim_end())?);
            }
        }

        let newline = match text.find('\n') {
            Some(at) if text[..at].ends_with('\r') => "\r\n",
            _ => "\n",
        };

        Ok(Self {
            lines,
            dependencies,
            newline,
            trailing_newline: text.ends_with('\n'),
        })
    }

    /// Dependency declarations in file order
    #[inline]
    #[must_use]
    pub fn sites(&self) -> &[DependencyLine] {
        &self.dependencies
    }

    /// Mutable dependency declarations in file order
    #[inline]
    pub fn sites_mut(&mut self) -> &mut [DependencyLine] {
        &mut self.dependencies
    }

    /// Render back to text, comments and blank lines unchanged
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Verbatim(text) => text.clone(),
                Line::Dependency(i) => self.dependencies[*i].to_string(),
            })
            .collect::<Vec<_>>()
            .join(self.newline);

        if self.trailing_newline {
            out.push_str(self.newline);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LIST: &str = "\
# runtime
commons-lang:commons-lang:2.6

  com.jcraft:jsch
";

    #[test]
    fn parses_sites_in_order() {
        let list = DependencyList::parse(LIST).unwrap();
        let sites = list.sites();

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].coordinate(), Coordinate::new("commons-lang", "commons-lang"));
        assert_eq!(sites[0].version(), Some("2.6"));
        assert_eq!(sites[0].label(), "line 2");
        assert_eq!(sites[1].version(), None);
        assert_eq!(sites[1].line(), 4);
    }

    #[test]
    fn render_round_trips_untouched_text() {
        assert_eq!(DependencyList::parse(LIST).unwrap().render(), LIST);
        assert_eq!(DependencyList::parse("a:b").unwrap().render(), "a:b");
    }

    #[test]
    fn crlf_line_endings_survive_rewrite() {
        let text = "# runtime\r\ncommons-lang:commons-lang:2.6\r\n\r\norg.slf4j:slf4j-api\r\n";
        let mut list = DependencyList::parse(text).unwrap();
        assert_eq!(list.sites()[0].version(), Some("2.6"));
        assert_eq!(list.render(), text);

        list.sites_mut()[0].relocate(&Coordinate::new("org.apache.commons", "commons-lang3"));
        assert_eq!(
            list.render(),
            "# runtime\r\norg.apache.commons:commons-lang3:2.6\r\n\r\norg.slf4j:slf4j-api\r\n"
        );
    }

    #[test]
    fn relocate_keeps_version_and_indent() {
        let mut list = DependencyList::parse(LIST).unwrap();
        list.sites_mut()[0].relocate(&Coordinate::new("org.apache.commons", "commons-lang3"));
        list.sites_mut()[1].relocate(&Coordinate::new("com.github.mwiede", "jsch"));

        assert_eq!(
            list.render(),
            "# runtime\norg.apache.commons:commons-lang3:2.6\n\n  com.github.mwiede:jsch\n"
        );
    }

    #[test]
    fn group_only_line_is_invalid() {
        match DependencyList::parse("a:b\nacegisecurity\n") {
            Err(RelocError::InvalidDependency { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected invalid dependency, got {other:?}"),
        }
    }

    #[test]
    fn malformed_gav_is_invalid() {
        assert!(DependencyList::parse(":jsch").is_err());
        assert!(DependencyList::parse("a:b:c:d").is_err());
    }
}
