//! Prefix tables.
//!
//! Turtle parsers expand prefixed names on the way in, so the table is
//! recovered separately by scanning the document's `@prefix` / `PREFIX`
//! directives. It drives compact names in rendered text (`xsd:decimal`)
//! and the prefix block of serialized output.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::iris;

/// Prefixes every document gets, unless it binds the label itself.
const WELL_KNOWN: &[(&str, &str)] = &[
    ("owl", iris::OWL),
    ("rdf", iris::RDF),
    ("rdfs", iris::RDFS),
    ("xsd", iris::XSD),
];

/// An ordered prefix → namespace table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the well-known `owl`, `rdf`, `rdfs`, and `xsd`
    /// prefixes.
    #[must_use]
    pub fn well_known() -> Self {
        let mut map = Self::new();
        for (prefix, ns) in WELL_KNOWN {
            map.insert(*prefix, *ns);
        }
        map
    }

    /// Scans Turtle source for prefix directives, layered over the
    /// well-known prefixes.
    #[must_use]
    pub fn from_turtle_source(src: &str) -> Self {
        static DIRECTIVE: OnceLock<Option<Regex>> = OnceLock::new();
        let mut map = Self::well_known();
        let re = DIRECTIVE.get_or_init(|| {
            Regex::new(r"(?mi)^\s*@?prefix\s+([A-Za-z][\w.\-]*)?:\s*<([^>]*)>").ok()
        });
        if let Some(re) = re {
            for caps in re.captures_iter(src) {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let ns = caps.get(2).map_or("", |m| m.as_str());
                map.insert(prefix, ns);
            }
        }
        map
    }

    /// Binds `prefix` to `namespace`, replacing any earlier binding.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    /// Binds `prefix` only when neither the label nor the namespace is bound.
    pub fn insert_if_absent(&mut self, prefix: &str, namespace: &str) {
        if self.entries.contains_key(prefix) || self.entries.values().any(|ns| ns == namespace) {
            return;
        }
        self.insert(prefix, namespace);
    }

    /// Looks up the namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// Iterates `(prefix, namespace)` pairs in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Returns true when no prefix is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compacts an IRI to `prefix:local` using the longest matching
    /// namespace. The local part must be a plain name (no `/`, `#`, or
    /// whitespace) for the result to be usable in Turtle.
    #[must_use]
    pub fn compact(&self, iri: &str) -> Option<String> {
        let (prefix, ns) = self
            .entries
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())?;
        let local = &iri[ns.len()..];
        if !is_pn_local(local) {
            return None;
        }
        Some(format!("{prefix}:{local}"))
    }

    /// Expands `prefix:local`, if the prefix is bound.
    #[must_use]
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        self.namespace(prefix).map(|ns| format!("{ns}{local}"))
    }
}

/// Conservative check for a Turtle `PN_LOCAL` that needs no escaping.
fn is_pn_local(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        None => true,
        Some(c) if c.is_alphanumeric() || c == '_' => {
            let rest: Vec<char> = chars.collect();
            rest.iter()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
                && rest.last() != Some(&'.')
        }
        Some(_) => false,
    }
}
