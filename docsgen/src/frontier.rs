//! Property frontier: a property together with everything it inherits
//! constraints from.

use std::collections::{BTreeSet, VecDeque};

use owl_docsgen_model::{iris, Term};

use crate::view::DerivedView;

/// The least fixed point of `{p} ∪ equivalents(·) ∪ super-properties(·)`.
///
/// Equivalence is followed in both directions. Only named properties are
/// members.
#[must_use]
pub fn frontier(view: &DerivedView, property: &str) -> BTreeSet<String> {
    let g = view.graph();
    let mut members = BTreeSet::from([property.to_owned()]);
    let mut queue = VecDeque::from([property.to_owned()]);

    while let Some(current) = queue.pop_front() {
        let node = Term::iri(current.as_str());
        let next = g
            .objects(&node, iris::RDFS_SUBPROPERTY_OF)
            .chain(g.objects(&node, iris::OWL_EQUIVALENT_PROPERTY))
            .chain(g.subjects(iris::OWL_EQUIVALENT_PROPERTY, &node))
            .filter_map(Term::as_iri);
        for peer in next {
            if members.insert(peer.to_owned()) {
                queue.push_back(peer.to_owned());
            }
        }
    }
    members
}

/// The frontier of every member of `seed`, unioned.
#[must_use]
pub fn frontier_of_set(view: &DerivedView, seed: &BTreeSet<String>) -> BTreeSet<String> {
    seed.iter().flat_map(|p| frontier(view, p)).collect()
}

fn declared(view: &DerivedView, property: &str, predicate: &str) -> BTreeSet<Term> {
    let g = view.graph();
    frontier(view, property)
        .iter()
        .flat_map(|member| {
            g.objects(&Term::iri(member.as_str()), predicate)
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Every `rdfs:domain` declared anywhere on the frontier, named or anonymous.
#[must_use]
pub fn effective_domains(view: &DerivedView, property: &str) -> BTreeSet<Term> {
    declared(view, property, iris::RDFS_DOMAIN)
}

/// Every `rdfs:range` declared anywhere on the frontier, named or anonymous.
#[must_use]
pub fn effective_ranges(view: &DerivedView, property: &str) -> BTreeSet<Term> {
    declared(view, property, iris::RDFS_RANGE)
}
