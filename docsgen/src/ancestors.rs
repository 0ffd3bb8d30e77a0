//! Ancestor reduction.
//!
//! Everything here reads the derived view only. The walks are iterative and
//! keep a visited set, so cyclic hierarchies (which entail equivalence) are
//! fine.

use std::collections::BTreeSet;

use owl_docsgen_model::{iris, Graph, Term};

use crate::view::DerivedView;

const TOP_AND_BOTTOM: &[&str] = &[
    iris::OWL_THING,
    iris::OWL_NOTHING,
    iris::OWL_TOP_OBJECT_PROPERTY,
    iris::OWL_BOTTOM_OBJECT_PROPERTY,
    iris::OWL_TOP_DATA_PROPERTY,
    iris::OWL_BOTTOM_DATA_PROPERTY,
];

fn is_top_or_bottom(term: &Term) -> bool {
    term.as_iri().is_some_and(|iri| TOP_AND_BOTTOM.contains(&iri))
}

/// Every term reachable from `start` over `relation`, `start` included.
#[must_use]
pub fn upward(g: &Graph, relation: &str, start: &Term) -> BTreeSet<Term> {
    walk(start, |t| g.objects(t, relation).cloned().collect())
}

/// Every term that reaches `start` over `relation`, `start` included.
#[must_use]
pub fn downward(g: &Graph, relation: &str, start: &Term) -> BTreeSet<Term> {
    walk(start, |t| g.subjects(relation, t).cloned().collect())
}

fn walk(start: &Term, step: impl Fn(&Term) -> Vec<Term>) -> BTreeSet<Term> {
    let mut seen = BTreeSet::from([start.clone()]);
    let mut queue = vec![start.clone()];
    while let Some(current) = queue.pop() {
        for next in step(&current) {
            if seen.insert(next.clone()) {
                queue.push(next);
            }
        }
    }
    seen
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Keep {
    Lowest,
    Highest,
}

/// Collapses equivalent members to their smallest term, then keeps only the
/// lowest (or highest) members of what is left.
fn reduce(g: &Graph, relation: &str, candidates: BTreeSet<Term>, keep: Keep) -> BTreeSet<Term> {
    let above: Vec<(Term, BTreeSet<Term>)> = candidates
        .into_iter()
        .map(|c| {
            let up = upward(g, relation, &c);
            (c, up)
        })
        .collect();
    let below = |a: &(Term, BTreeSet<Term>), b: &(Term, BTreeSet<Term>)| a.1.contains(&b.0);

    above
        .iter()
        .filter(|&c| {
            !above.iter().any(|d| {
                if d.0 == c.0 {
                    return false;
                }
                let equivalent = below(c, d) && below(d, c);
                if equivalent {
                    return d.0 < c.0;
                }
                match keep {
                    Keep::Lowest => below(d, c),
                    Keep::Highest => below(c, d),
                }
            })
        })
        .map(|c| c.0.clone())
        .collect()
}

fn named(terms: BTreeSet<Term>) -> BTreeSet<String> {
    terms
        .into_iter()
        .filter_map(|t| match t {
            Term::Iri(iri) => Some(iri),
            _ => None,
        })
        .collect()
}

/// Strict named ancestors of `entity` over `relation`, minus the entity,
/// anything equivalent to it, and the top and bottom entities.
fn strict_named_relatives(g: &Graph, relation: &str, entity: &str, up: bool) -> BTreeSet<Term> {
    let start = Term::iri(entity);
    let reach = if up {
        upward(g, relation, &start)
    } else {
        downward(g, relation, &start)
    };
    let back = if up {
        downward(g, relation, &start)
    } else {
        upward(g, relation, &start)
    };
    reach
        .into_iter()
        .filter(|t| t.is_iri() && *t != start && !back.contains(t) && !is_top_or_bottom(t))
        .collect()
}

/// The minimal named superclasses of `class`.
///
/// The result is an antichain under `rdfs:subClassOf`: it never holds the
/// class itself, a class equivalent to it, `owl:Thing` or `owl:Nothing`.
/// Equivalent ancestors are represented by their smallest IRI.
#[must_use]
pub fn minimal_named_parents(view: &DerivedView, class: &str) -> BTreeSet<String> {
    let g = view.graph();
    let candidates = strict_named_relatives(g, iris::RDFS_SUBCLASS_OF, class, true);
    named(reduce(g, iris::RDFS_SUBCLASS_OF, candidates, Keep::Lowest))
}

/// The minimal named super-properties of `property`, top properties excluded.
#[must_use]
pub fn minimal_super_properties(view: &DerivedView, property: &str) -> BTreeSet<String> {
    let g = view.graph();
    let candidates = strict_named_relatives(g, iris::RDFS_SUBPROPERTY_OF, property, true);
    named(reduce(g, iris::RDFS_SUBPROPERTY_OF, candidates, Keep::Lowest))
}

/// The maximal named sub-properties of `property`: its immediate children.
#[must_use]
pub fn maximal_sub_properties(view: &DerivedView, property: &str) -> BTreeSet<String> {
    let g = view.graph();
    let candidates = strict_named_relatives(g, iris::RDFS_SUBPROPERTY_OF, property, false);
    named(reduce(g, iris::RDFS_SUBPROPERTY_OF, candidates, Keep::Highest))
}

/// Reduces a set of class terms to its most specific members under
/// `rdfs:subClassOf`. Top and bottom are dropped; anonymous members take
/// part like named ones.
#[must_use]
pub fn most_specific<'a>(
    view: &DerivedView,
    classes: impl IntoIterator<Item = &'a Term>,
) -> BTreeSet<Term> {
    let candidates: BTreeSet<Term> = classes
        .into_iter()
        .filter(|t| !is_top_or_bottom(t) && t.as_literal().is_none())
        .cloned()
        .collect();
    reduce(view.graph(), iris::RDFS_SUBCLASS_OF, candidates, Keep::Lowest)
}
