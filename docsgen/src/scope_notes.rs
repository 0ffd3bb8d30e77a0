//! Technical scope notes: one sentence per class axiom.

use owl_docsgen_model::{iris, Term};

use crate::ancestors::upward;
use crate::error::RenderError;
use crate::expression::{DecodeLimits, Expression};
use crate::render::{quoted, Renderer};
use crate::view::DerivedView;

fn is_top_or_bottom(term: &Term) -> bool {
    term.is(iris::OWL_THING) || term.is(iris::OWL_NOTHING)
}

/// Renders the `owl:equivalentClass` and `rdfs:subClassOf` axioms of `class`.
///
/// Equivalences come first, then super-classes; sentences are sorted within
/// each group. The class itself, `owl:Thing`, `owl:Nothing` and (among
/// super-classes) anything equivalent to the class are left out. `None` when
/// nothing remains.
///
/// # Errors
///
/// Any [`RenderError`] aborts the whole note; a partial note is never
/// produced.
pub fn scope_note(
    view: &DerivedView,
    class: &str,
    limits: DecodeLimits,
) -> Result<Option<String>, RenderError> {
    let g = view.graph();
    let renderer = Renderer::new(view);
    let node = Term::iri(class);
    let subject = quoted(&renderer.label(class));

    let render = |term: &Term| -> Result<String, RenderError> {
        let expr = Expression::decode(view, term, limits)?;
        Ok(renderer.render(&expr))
    };

    let mut equivalent = Vec::new();
    for other in g.objects(&node, iris::OWL_EQUIVALENT_CLASS) {
        if *other == node || is_top_or_bottom(other) {
            continue;
        }
        equivalent.push(format!("A {subject} is equivalent to {}.", render(other)?));
    }

    let mut kind_of = Vec::new();
    for parent in g.objects(&node, iris::RDFS_SUBCLASS_OF) {
        if *parent == node || is_top_or_bottom(parent) {
            continue;
        }
        if upward(g, iris::RDFS_SUBCLASS_OF, parent).contains(&node) {
            continue;
        }
        kind_of.push(format!("A {subject} is a kind of {}.", render(parent)?));
    }

    equivalent.sort();
    equivalent.dedup();
    kind_of.sort();
    kind_of.dedup();
    equivalent.extend(kind_of);
    Ok(if equivalent.is_empty() {
        None
    } else {
        Some(equivalent.join(" "))
    })
}
