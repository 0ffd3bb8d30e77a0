//! OWL ontology documentation generator.
//!
//! Reads an ontology, computes its OWL 2 RL schema entailments, and writes
//! back tagged `skos:definition` and `skos:scopeNote` sentences for every
//! named class and property. Generated literals carry an autogen tag
//! (`⟦AUTOGEN:P1:YYYY-MM-DD⟧`) so that later runs can replace them; anything
//! without a tag is author text and is never modified.
//!
//! # Entry Points
//!
//! ```no_run
//! use owl_docsgen::{run, DocsgenConfig};
//!
//! let config = DocsgenConfig::for_input("people.ttl");
//! let report = run(&config).expect("documentation run failed");
//! println!("{} class definitions written", report.classes.written());
//! ```
//!
//! # Structure
//!
//! ```text
//! parse ─▶ BaseGraph ─▶ labels ─▶ Reasoner::closure ─▶ DerivedView
//!                                                         │
//!          ┌──────────────────────────────────────────────┘
//!          ▼
//!   ancestors / frontier / expression ─▶ render ─▶ definitions, scope_notes
//!                                                         │
//!   BaseGraph ◀── annotate (the only writer) ◀────────────┘
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod ancestors;
pub mod annotate;
pub mod config;
pub mod definitions;
pub mod entailment;
pub mod error;
pub mod expression;
pub mod frontier;
pub mod labels;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod scope_notes;
pub mod tag;
pub mod view;

pub use annotate::{Annotator, WriteOutcome};
pub use config::{DocsgenConfig, OnExisting};
pub use entailment::{ClosureOptions, Reasoner, RuleReasoner};
pub use error::{DocsgenError, DocsgenResult, IdentifierError, ReasoningError, RenderError};
pub use pipeline::{run, AnnotateOptions, Pipeline};
pub use report::{Issue, RunReport, Tally};
pub use tag::AutogenTag;
pub use view::{BaseGraph, DerivedView};
