//! The two graph handles of a run.
//!
//! [`BaseGraph`] is the parsed document. It is the only graph that is ever
//! written back to disk, and only the annotation writer may change it.
//! [`DerivedView`] is the base plus everything the reasoner entailed. It is
//! read-only and never serialized.

use owl_docsgen_model::{Graph, Term, Triple};

/// The authoritative, serializable graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseGraph {
    graph: Graph,
}

impl BaseGraph {
    /// Wraps a parsed document.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Shared access to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Unwraps the graph for serialization.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub(crate) fn insert(&mut self, triple: Triple) -> bool {
        self.graph.insert(triple)
    }

    pub(crate) fn remove(&mut self, triple: &Triple) -> bool {
        self.graph.remove(triple)
    }

    pub(crate) fn bind_prefix(&mut self, prefix: &str, namespace: &str) {
        self.graph.prefixes_mut().insert_if_absent(prefix, namespace);
    }
}

/// Base statements plus entailed statements. Read-only.
#[derive(Debug, Clone)]
pub struct DerivedView {
    graph: Graph,
}

impl DerivedView {
    /// Builds a view holding every statement of `base` plus `entailed`.
    ///
    /// This is the only constructor, so a view is always a superset of the
    /// graph it was derived from.
    #[must_use]
    pub fn from_entailments(base: &Graph, entailed: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = base.clone();
        for triple in entailed {
            graph.insert(triple);
        }
        Self { graph }
    }

    /// Shared access to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of statements in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true when the view holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns true when `subject rdf:type class` holds in the view.
    #[must_use]
    pub fn is_a(&self, subject: &str, class: &str) -> bool {
        self.graph
            .has(&Term::iri(subject), owl_docsgen_model::iris::RDF_TYPE, class)
    }
}
