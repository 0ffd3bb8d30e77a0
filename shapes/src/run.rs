//! File-level shape generation.

use std::fs;
use std::path::{Path, PathBuf};

use owl_docsgen::{DocsgenError, DocsgenResult};
use owl_docsgen_model::parser::{parse, Format};
use owl_docsgen_model::serializer::turtle::to_turtle;
use tracing::info;

use crate::generate::{generate_shapes, remove_ranges, ShapeRequest, Skipped, Target};

/// One `owl-shapes` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeConfig {
    /// Ontology to read.
    pub input: PathBuf,
    /// Which properties to constrain.
    pub request: ShapeRequest,
    /// Also write a copy of the ontology without the targets' ranges.
    pub remove_ranges: bool,
    /// Shapes output. Defaults to `<stem>_constraints.shacl.ttl`; `.ttl` is
    /// appended when the given path has no extension.
    pub shapes_out: Option<PathBuf>,
}

impl ShapeConfig {
    /// Automatic selection, strict checks, no refactoring.
    #[must_use]
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            request: ShapeRequest::default(),
            remove_ranges: false,
            shapes_out: None,
        }
    }

    /// Where the shapes graph goes.
    #[must_use]
    pub fn effective_shapes_path(&self) -> PathBuf {
        match &self.shapes_out {
            Some(path) if path.extension().is_none() => path.with_extension("ttl"),
            Some(path) => path.clone(),
            None => sibling(&self.input, "_constraints.shacl.ttl"),
        }
    }

    /// Where the range-free ontology goes.
    #[must_use]
    pub fn refactored_path(&self) -> PathBuf {
        sibling(&self.input, "_refactored.ttl")
    }
}

fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ontology".to_owned());
    input.with_file_name(format!("{stem}{suffix}"))
}

/// Files written by [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapePaths {
    /// The SHACL shapes document.
    pub shapes: PathBuf,
    /// The ontology without target ranges, when requested.
    pub refactored: Option<PathBuf>,
    /// Constrained properties.
    pub targets: Vec<Target>,
    /// Identifiers that produced no shape.
    pub skipped: Vec<Skipped>,
}

fn write(path: &Path, text: String) -> DocsgenResult<()> {
    fs::write(path, text).map_err(|e| DocsgenError::io(path, e))
}

/// Reads the ontology, writes the shapes and, optionally, the refactored
/// ontology. Both are Turtle.
///
/// # Errors
///
/// [`DocsgenError::InputNotFound`], [`DocsgenError::Parse`],
/// [`DocsgenError::Identifier`] for selection failures, and
/// [`DocsgenError::Io`] when a file cannot be written.
pub fn run(config: &ShapeConfig) -> DocsgenResult<ShapePaths> {
    let input = &config.input;
    if !input.is_file() {
        return Err(DocsgenError::InputNotFound { path: input.clone() });
    }
    let src = fs::read_to_string(input).map_err(|e| DocsgenError::io(input, e))?;
    let graph = parse(&src, Format::from_path(input)).map_err(|source| DocsgenError::Parse {
        path: input.clone(),
        source,
    })?;

    let outcome = generate_shapes(&graph, &config.request)?;
    let shapes = config.effective_shapes_path();
    write(&shapes, to_turtle(&outcome.shapes))?;
    info!(shapes = %shapes.display(), targets = outcome.targets.len(), "shapes written");

    let refactored = if config.remove_ranges {
        let path = config.refactored_path();
        write(&path, to_turtle(&remove_ranges(&graph, &outcome.targets)))?;
        info!(refactored = %path.display(), "ranges removed");
        Some(path)
    } else {
        None
    };

    Ok(ShapePaths {
        shapes,
        refactored,
        targets: outcome.targets,
        skipped: outcome.skipped,
    })
}
