//! Turtle and N-Triples parsing.
//!
//! Parsing is delegated to `sophia_turtle`; each parsed triple is copied
//! into the owned [`Graph`] model so the rest of the workspace never deals
//! with borrowed parser terms.

use std::path::Path;

use sophia_api::source::TripleSource;
use sophia_api::term::TermKind;
use sophia_api::triple::Triple as _;
use thiserror::Error;

use crate::graph::Graph;
use crate::model::{Literal, Term};
use crate::prefix::PrefixMap;

/// Serialization formats understood by the parser and the serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Turtle 1.1.
    #[default]
    Turtle,
    /// N-Triples.
    NTriples,
}

impl Format {
    /// Picks a format from a file extension. Anything other than `.nt`
    /// is read as Turtle.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("nt") => Format::NTriples,
            _ => Format::Turtle,
        }
    }

    /// The conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Turtle => "ttl",
            Format::NTriples => "nt",
        }
    }
}

/// Input that could not be turned into a graph.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed.
    #[error("{format:?} syntax error: {message}")]
    Syntax {
        /// Format being parsed.
        format: Format,
        /// Parser diagnostic.
        message: String,
    },
    /// The document uses a term kind the graph model does not hold
    /// (quoted triples, variables).
    #[error("unsupported term in statement: {0}")]
    UnsupportedTerm(String),
}

/// Parses a document in the given format.
///
/// # Errors
///
/// Returns [`ParseError`] on malformed input or unsupported term kinds.
pub fn parse(src: &str, format: Format) -> Result<Graph, ParseError> {
    match format {
        Format::Turtle => parse_turtle(src),
        Format::NTriples => parse_ntriples(src),
    }
}

/// Parses a Turtle document. The prefix table is recovered from its
/// directives.
///
/// # Errors
///
/// Returns [`ParseError`] on malformed input or unsupported term kinds.
pub fn parse_turtle(src: &str) -> Result<Graph, ParseError> {
    let mut graph = Graph::with_prefixes(PrefixMap::from_turtle_source(src));
    let mut unsupported: Option<String> = None;
    sophia_turtle::parser::turtle::parse_str(src)
        .for_each_triple(|t| {
            match (own_term(t.s()), own_term(t.p()), own_term(t.o())) {
                (Some(s), Some(p), Some(o)) => {
                    graph.add(s, p, o);
                }
                _ => {
                    unsupported.get_or_insert_with(|| describe(t.s(), t.p(), t.o()));
                }
            }
        })
        .map_err(|e| ParseError::Syntax {
            format: Format::Turtle,
            message: e.to_string(),
        })?;
    match unsupported {
        Some(what) => Err(ParseError::UnsupportedTerm(what)),
        None => Ok(graph),
    }
}

/// Parses an N-Triples document. Only the well-known prefixes are bound.
///
/// # Errors
///
/// Returns [`ParseError`] on malformed input or unsupported term kinds.
pub fn parse_ntriples(src: &str) -> Result<Graph, ParseError> {
    let mut graph = Graph::new();
    let mut unsupported: Option<String> = None;
    sophia_turtle::parser::nt::parse_str(src)
        .for_each_triple(|t| {
            match (own_term(t.s()), own_term(t.p()), own_term(t.o())) {
                (Some(s), Some(p), Some(o)) => {
                    graph.add(s, p, o);
                }
                _ => {
                    unsupported.get_or_insert_with(|| describe(t.s(), t.p(), t.o()));
                }
            }
        })
        .map_err(|e| ParseError::Syntax {
            format: Format::NTriples,
            message: e.to_string(),
        })?;
    match unsupported {
        Some(what) => Err(ParseError::UnsupportedTerm(what)),
        None => Ok(graph),
    }
}

/// Copies a parser term into the owned model.
fn own_term<T: sophia_api::term::Term>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::Blank(id.as_str().to_owned())),
        TermKind::Literal => {
            let form = term.lexical_form()?;
            let lexical: String = (*form).to_owned();
            if let Some(tag) = term.language_tag() {
                return Some(Term::Literal(Literal::lang(lexical, tag.as_str())));
            }
            let literal = match term.datatype() {
                Some(dt) => Literal::typed(lexical, dt.as_str()),
                None => Literal::plain(lexical),
            };
            Some(Term::Literal(literal))
        }
        _ => None,
    }
}

fn describe<S, P, O>(s: S, p: P, o: O) -> String
where
    S: sophia_api::term::Term,
    P: sophia_api::term::Term,
    O: sophia_api::term::Term,
{
    format!("{:?} {:?} {:?}", s.kind(), p.kind(), o.kind())
}
