//! Triple graph model for `owl-docsgen`.
//!
//! The `owl-docsgen-model` crate holds the owned RDF term types, an indexed
//! in-memory [`Graph`], the document [`PrefixMap`], and the Turtle /
//! N-Triples readers and writers used by the documentation pipeline and the
//! shape generator.
//!
//! # Entry Point
//!
//! ```
//! use owl_docsgen_model::{parser, serializer, Format};
//!
//! let src = "@prefix ex: <http://ex.org/> .\nex:a ex:b ex:c .\n";
//! let graph = parser::parse(src, Format::Turtle).unwrap();
//! assert_eq!(graph.len(), 1);
//! let turtle = serializer::serialize(&graph, Format::Turtle);
//! assert!(turtle.contains("ex:a ex:b ex:c ."));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod graph;
pub mod model;
pub mod parser;
pub mod prefix;
pub mod serializer;

pub use graph::Graph;
pub use model::{iris, local_name, Literal, Term, Triple};
pub use parser::{Format, ParseError};
pub use prefix::PrefixMap;
