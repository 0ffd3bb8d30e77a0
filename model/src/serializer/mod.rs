//! Serializers for triple graphs.
//!
//! Two formats are supported, matching what the parser reads:
//! - **Turtle** ([`turtle`]): the default, human-diffable output
//! - **N-Triples** ([`ntriples`]): one statement per line

pub mod ntriples;
mod order;
pub mod turtle;

use crate::graph::Graph;
use crate::parser::Format;

/// Serializes a graph in the given format.
#[must_use]
pub fn serialize(graph: &Graph, format: Format) -> String {
    match format {
        Format::Turtle => turtle::to_turtle(graph),
        Format::NTriples => ntriples::to_ntriples(graph),
    }
}
