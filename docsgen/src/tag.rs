//! Autogen tags.
//!
//! A generated literal ends with `⟦AUTOGEN:<scheme>:<YYYY-MM-DD>⟧`. The tag
//! is what makes a literal safe to replace on the next run; anything without
//! a recognised tag belongs to the author.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Tag scheme written by this version.
pub const CURRENT_SCHEME: &str = "P1";

/// Older tag schemes that are migrated on sight.
pub const LEGACY_SCHEMES: &[&str] = &["P2"];

/// The marker appended to generated literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutogenTag {
    date: NaiveDate,
}

impl AutogenTag {
    /// A current-scheme tag for `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// The generation date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Appends the tag to a body: `"<body> ⟦AUTOGEN:P1:<date>⟧"`.
    #[must_use]
    pub fn stamp(&self, body: &str) -> String {
        format!("{body} {self}")
    }
}

impl fmt::Display for AutogenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\u{27E6}AUTOGEN:{CURRENT_SCHEME}:{}\u{27E7}",
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Who owns a literal, as far as the writer is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// No recognised tag: never touched.
    Author,
    /// Tagged with the current scheme: replaced.
    Generated,
    /// Tagged with a legacy scheme or marker: migrated.
    Legacy,
}

impl Provenance {
    /// Returns true for literals the writer may remove.
    #[must_use]
    pub fn is_replaceable(self) -> bool {
        !matches!(self, Self::Author)
    }
}

fn tag_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x{27E6}AUTOGEN:([^:\x{27E7}]*):([^\x{27E7}]*)\x{27E7}").ok())
        .as_ref()
}

fn legacy_marker() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)auto generated comment\s+(\d{4}-\d{2}-\d{2})\s*$").ok())
        .as_ref()
}

fn valid_date(text: &str) -> bool {
    text.len() == 10 && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Classifies a literal by the tags it carries.
///
/// A well-formed current tag wins over a legacy one. A tag with an unknown
/// scheme or a malformed date does not count, so such a literal is author
/// text.
#[must_use]
pub fn classify(text: &str) -> Provenance {
    let mut found = Provenance::Author;
    if let Some(re) = tag_pattern() {
        for caps in re.captures_iter(text) {
            let scheme = caps.get(1).map_or("", |m| m.as_str());
            let date = caps.get(2).map_or("", |m| m.as_str());
            if !valid_date(date) {
                continue;
            }
            if scheme == CURRENT_SCHEME {
                return Provenance::Generated;
            }
            if LEGACY_SCHEMES.contains(&scheme) {
                found = Provenance::Legacy;
            }
        }
    }
    if found == Provenance::Author {
        let marked = legacy_marker()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .is_some_and(|m| valid_date(m.as_str()));
        if marked {
            found = Provenance::Legacy;
        }
    }
    found
}
