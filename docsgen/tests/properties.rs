//! Property-based checks for the ancestor reducer and the property frontier.

use std::collections::BTreeSet;

use owl_docsgen::ancestors::{minimal_named_parents, upward};
use owl_docsgen::frontier::{frontier, frontier_of_set};
use owl_docsgen::{ClosureOptions, DerivedView, Reasoner, RuleReasoner};
use owl_docsgen_model::{iris, Graph, Term};
use proptest::prelude::*;

fn class(i: usize) -> String {
    format!("http://ex.org/C{i}")
}

fn property(i: usize) -> String {
    format!("http://ex.org/p{i}")
}

/// A random subclass hierarchy over `n` named classes, closed by the reasoner.
fn hierarchy(n: usize, edges: &[(usize, usize)]) -> DerivedView {
    let mut g = Graph::new();
    for i in 0..n {
        g.add(Term::iri(class(i)), Term::iri(iris::RDF_TYPE), Term::iri(iris::OWL_CLASS));
    }
    for &(a, b) in edges {
        g.add(
            Term::iri(class(a % n)),
            Term::iri(iris::RDFS_SUBCLASS_OF),
            Term::iri(class(b % n)),
        );
    }
    RuleReasoner::new()
        .closure(&g, &ClosureOptions::default())
        .expect("closure converges")
}

fn property_graph(n: usize, edges: &[(usize, usize)]) -> DerivedView {
    let mut g = Graph::new();
    for &(a, b) in edges {
        g.add(
            Term::iri(property(a % n)),
            Term::iri(iris::RDFS_SUBPROPERTY_OF),
            Term::iri(property(b % n)),
        );
    }
    DerivedView::from_entailments(&g, std::iter::empty())
}

proptest! {
    /// No minimal parent is a strict ancestor of another one.
    #[test]
    fn prop_minimal_parents_form_an_antichain(
        n in 2usize..8,
        edges in proptest::collection::vec((0usize..8, 0usize..8), 0..16),
    ) {
        let view = hierarchy(n, &edges);
        for i in 0..n {
            let parents = minimal_named_parents(&view, &class(i));
            prop_assert!(!parents.contains(&class(i)));
            for a in &parents {
                let above_a = upward(view.graph(), iris::RDFS_SUBCLASS_OF, &Term::iri(a.as_str()));
                for b in &parents {
                    if a != b {
                        prop_assert!(!above_a.contains(&Term::iri(b.as_str())), "{a} is below {b}");
                    }
                }
            }
        }
    }

    /// Every minimal parent is a real ancestor.
    #[test]
    fn prop_minimal_parents_are_ancestors(
        n in 2usize..8,
        edges in proptest::collection::vec((0usize..8, 0usize..8), 0..16),
    ) {
        let view = hierarchy(n, &edges);
        for i in 0..n {
            let up = upward(view.graph(), iris::RDFS_SUBCLASS_OF, &Term::iri(class(i)));
            for parent in minimal_named_parents(&view, &class(i)) {
                prop_assert!(up.contains(&Term::iri(parent)));
            }
        }
    }

    /// The frontier contains its seed and is closed: expanding it again adds
    /// nothing.
    #[test]
    fn prop_frontier_is_a_fixed_point(
        n in 1usize..8,
        start in 0usize..8,
        edges in proptest::collection::vec((0usize..8, 0usize..8), 0..16),
    ) {
        let view = property_graph(n, &edges);
        let p = property(start % n);
        let reached = frontier(&view, &p);
        prop_assert!(reached.contains(&p));
        let again: BTreeSet<String> = frontier_of_set(&view, &reached);
        prop_assert_eq!(again, reached);
    }
}
