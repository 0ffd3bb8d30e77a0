//! Property identifier resolution.
//!
//! An identifier is an absolute IRI (contains `://`), a prefixed name
//! expanded through the document's prefix table, or a bare local name
//! appended to a configured base IRI.

use owl_docsgen::IdentifierError;
use owl_docsgen_model::{iris, Graph};

/// How bare names are turned into IRIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IriBase {
    /// Namespace bare names live in.
    pub base: Option<String>,
    /// Separator placed between `base` and the name when `base` does not
    /// already end in `#` or `/`. Inferred from the document when absent.
    pub separator: Option<String>,
}

/// The separator most datatype properties under `base` use after it: `#`
/// unless strictly more of them use `/`.
#[must_use]
pub fn infer_separator(graph: &Graph, base: &str) -> &'static str {
    let (mut hash, mut slash) = (0usize, 0usize);
    for property in graph.instances_of(iris::OWL_DATATYPE_PROPERTY) {
        if let Some(rest) = property.strip_prefix(base) {
            if rest.contains('#') {
                hash += 1;
            } else {
                slash += 1;
            }
        }
    }
    if hash >= slash {
        "#"
    } else {
        "/"
    }
}

/// Resolves one identifier against `graph`.
///
/// A prefixed name whose prefix the document does not declare is treated as
/// a bare name.
///
/// # Errors
///
/// [`IdentifierError::UnknownPrefix`] or
/// [`IdentifierError::BareNameWithoutBase`] when a bare name (or an
/// undeclared prefixed name) is given without a base IRI.
pub fn resolve_identifier(
    graph: &Graph,
    ident: &str,
    base: &IriBase,
) -> Result<String, IdentifierError> {
    if ident.contains("://") {
        return Ok(ident.to_owned());
    }
    let prefixed = ident.contains(':');
    if prefixed {
        if let Some(iri) = graph.prefixes().expand(ident) {
            return Ok(iri);
        }
    }

    let Some(namespace) = base.base.as_deref() else {
        return Err(if prefixed {
            IdentifierError::UnknownPrefix(ident.to_owned())
        } else {
            IdentifierError::BareNameWithoutBase(ident.to_owned())
        });
    };
    if namespace.ends_with('#') || namespace.ends_with('/') {
        return Ok(format!("{namespace}{ident}"));
    }
    let separator = match base.separator.as_deref() {
        Some(sep) => sep,
        None => infer_separator(graph, namespace),
    };
    Ok(format!("{namespace}{separator}{ident}"))
}
