//! Error types for the documentation pipeline.
//!
//! Fatal errors ([`ParseError`], [`ReasoningError`], [`OutputConflict`](DocsgenError::OutputConflict),
//! configuration and I/O failures) abort a run before anything is written.
//! [`RenderError`] is recoverable: the affected annotation is skipped and the
//! run continues.

use std::path::PathBuf;

use thiserror::Error;

pub use owl_docsgen_model::ParseError;

/// Result type for pipeline operations.
pub type DocsgenResult<T> = Result<T, DocsgenError>;

/// The entailment engine could not produce a derived view.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// No fixed point was reached within the configured number of rounds.
    #[error("entailment closure did not converge after {rounds} rounds ({triples} triples derived)")]
    Diverged {
        /// Rounds executed.
        rounds: usize,
        /// Size of the view when the engine gave up.
        triples: usize,
    },
    /// The engine itself failed. The built-in rule engine never reports
    /// this; it carries failures of other [`Reasoner`](crate::Reasoner)
    /// implementations plugged in through
    /// [`Pipeline::with_reasoner`](crate::Pipeline::with_reasoner).
    #[error("reasoner failure: {0}")]
    Engine(String),
}

/// An expression could not be rendered for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The expression structure loops back onto a node already on the
    /// current path.
    #[error("cyclic expression at {node}")]
    Cycle {
        /// Node that was revisited.
        node: String,
    },
    /// The expression nests deeper than the configured cap.
    #[error("expression nesting exceeds depth {limit}")]
    TooDeep {
        /// The configured cap.
        limit: usize,
    },
    /// The expression is structurally broken.
    #[error("malformed expression at {node}: {reason}")]
    Malformed {
        /// Offending node.
        node: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// A requested entity could not be resolved or failed a type check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// A prefixed name uses a prefix the document does not declare and it
    /// cannot be read as a bare name either.
    #[error("identifier '{0}' uses an undeclared prefix")]
    UnknownPrefix(String),
    /// A bare name was given but no base IRI is configured.
    #[error("identifier '{0}' is a bare name but no IRI base was provided")]
    BareNameWithoutBase(String),
    /// The identifier resolved to something that is not a datatype property.
    #[error("identifier '{ident}' resolved to <{iri}>, which is not an owl:DatatypeProperty")]
    NotDatatypeProperty {
        /// Identifier as given.
        ident: String,
        /// What it resolved to.
        iri: String,
    },
    /// Nothing was selected.
    #[error("no datatype properties selected")]
    NoSelection,
}

/// Top-level error for a documentation run.
#[derive(Debug, Error)]
pub enum DocsgenError {
    /// The input document could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Input path.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },

    /// The entailment engine failed.
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    /// An identifier could not be resolved in strict mode.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// The output file exists and the policy forbids replacing it.
    #[error("refusing to overwrite existing file: {}", path.display())]
    OutputConflict {
        /// Existing output path.
        path: PathBuf,
    },

    /// The input file does not exist.
    #[error("input file not found: {}", path.display())]
    InputNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The configuration file could not be read or is invalid.
    #[error("configuration error in {}: {message}", path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A file system operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl DocsgenError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error class.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::OutputConflict { .. } => 3,
            Self::Io { .. } => 4,
            _ => 1,
        }
    }
}
