//! SHACL datatype shapes for OWL datatype properties.
//!
//! For each selected `owl:DatatypeProperty` a `sh:NodeShape` is generated
//! that targets every subject of the property and requires its values to
//! carry the property's XSD range as datatype. Optionally the ranges are
//! removed from a copy of the ontology, leaving the constraint to SHACL.
//!
//! # Entry Point
//!
//! ```no_run
//! use owl_docsgen_shapes::{run, ShapeConfig};
//!
//! let mut config = ShapeConfig::for_input("people.ttl");
//! config.remove_ranges = true;
//! let paths = run(&config).expect("shape generation failed");
//! println!("{} shapes in {}", paths.targets.len(), paths.shapes.display());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod generate;
pub mod resolve;
pub mod run;

pub use generate::{
    generate_shapes, remove_ranges, select_targets, ShapeOutcome, ShapeRequest, Skipped, Target,
};
pub use resolve::{resolve_identifier, IriBase};
pub use run::{run, ShapeConfig, ShapePaths};
