//! Definition generators for `skos:definition`.
//!
//! Each generator returns the sentence body only; the caller stamps the tag
//! and hands it to the annotation writer.

use std::collections::BTreeSet;

use owl_docsgen_model::{iris, Term};

use crate::ancestors::{
    maximal_sub_properties, minimal_named_parents, minimal_super_properties, most_specific,
};
use crate::error::RenderError;
use crate::expression::{DecodeLimits, Expression};
use crate::frontier::{effective_domains, effective_ranges};
use crate::render::{indefinite_article, join_all, join_and, quoted, Renderer};
use crate::view::DerivedView;

/// Object property characteristics, in the order they are described.
const CHARACTERISTICS: &[(&str, &str)] = &[
    (
        iris::OWL_FUNCTIONAL_PROPERTY,
        "It is functional, which means that each subject can relate to at most one object by this property.",
    ),
    (
        iris::OWL_INVERSE_FUNCTIONAL_PROPERTY,
        "It is inverse functional, which means that each object can be related to by at most one subject via this property.",
    ),
    (
        iris::OWL_TRANSITIVE_PROPERTY,
        "It is transitive, which means that if x relates to y and y relates to z, then x relates to z.",
    ),
    (
        iris::OWL_SYMMETRIC_PROPERTY,
        "It is symmetric, which means that if x relates to y, then y relates to x.",
    ),
    (
        iris::OWL_ASYMMETRIC_PROPERTY,
        "It is asymmetric, which means that if x relates to y, then y cannot relate to x by this property.",
    ),
    (
        iris::OWL_REFLEXIVE_PROPERTY,
        "It is reflexive, which means that every individual relates to itself by this property.",
    ),
    (
        iris::OWL_IRREFLEXIVE_PROPERTY,
        "It is irreflexive, which means that no individual relates to itself by this property.",
    ),
];

fn capitalized_article(word: &str) -> &'static str {
    match indefinite_article(word) {
        "an" => "An",
        _ => "A",
    }
}

/// Drops repeated sentences, keeping the first occurrence.
fn dedupe(sentences: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    sentences
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// "A Child is a kind of Person." per minimal named parent, parents in IRI
/// order. `None` when the class has no named parent.
#[must_use]
pub fn class_definition(view: &DerivedView, class: &str) -> Option<String> {
    let renderer = Renderer::new(view);
    let label = renderer.label(class);
    let article = capitalized_article(&label);
    let sentences: Vec<String> = minimal_named_parents(view, class)
        .iter()
        .map(|parent| format!("{article} {label} is a kind of {}.", renderer.label(parent)))
        .collect();
    if sentences.is_empty() {
        None
    } else {
        Some(dedupe(sentences).join(" "))
    }
}

fn named(terms: BTreeSet<Term>) -> Vec<String> {
    terms
        .into_iter()
        .filter_map(|t| t.as_iri().map(str::to_owned))
        .collect()
}

/// "The data property p records a D's p as an R value." per most specific
/// named domain.
#[must_use]
pub fn datatype_property_definition(view: &DerivedView, property: &str) -> String {
    let renderer = Renderer::new(view);
    let p = renderer.label(property);

    let ranges_in_view = effective_ranges(view, property);
    let mut ranges: Vec<String> = named(most_specific(view, ranges_in_view.iter()))
        .iter()
        .filter(|r| r.as_str() != iris::RDFS_LITERAL)
        .map(|r| renderer.compact(r))
        .collect();
    ranges.sort();
    ranges.dedup();
    let range_phrase = if ranges.is_empty() {
        "as a literal value.".to_owned()
    } else {
        let joined = ranges.join(" or ");
        format!("as {} {joined} value.", indefinite_article(&joined))
    };

    let domains_in_view = effective_domains(view, property);
    let mut domains: Vec<String> = named(most_specific(view, domains_in_view.iter()))
        .iter()
        .map(|d| renderer.label(d))
        .collect();
    domains.sort();

    let sentences: Vec<String> = if domains.is_empty() {
        vec![format!("The data property {p} records the {p} {range_phrase}")]
    } else {
        domains
            .iter()
            .map(|d| {
                format!(
                    "The data property {p} records {} {d}'s {p} {range_phrase}",
                    indefinite_article(d)
                )
            })
            .collect()
    };
    dedupe(sentences).join(" ")
}

/// Quotes a label the first time it is mentioned.
#[derive(Default)]
struct Mentions {
    seen: BTreeSet<String>,
}

impl Mentions {
    fn mention(&mut self, label: &str) -> String {
        if self.seen.insert(label.to_owned()) {
            quoted(label)
        } else {
            label.to_owned()
        }
    }
}

fn side(
    view: &DerivedView,
    renderer: &Renderer<'_>,
    terms: &BTreeSet<Term>,
    limits: DecodeLimits,
) -> Result<String, RenderError> {
    let parts = most_specific(view, terms.iter())
        .iter()
        .map(|term| match term {
            Term::Iri(iri) => Ok(renderer.label(iri)),
            other => Expression::decode(view, other, limits).map(|e| renderer.render(&e)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(if parts.is_empty() {
        "anything".to_owned()
    } else {
        join_all(&parts)
    })
}

/// The sentence bundle for an object property: domain and range, super- and
/// sub-properties, inverses, characteristics.
///
/// # Errors
///
/// Returns [`RenderError`] when an anonymous domain or range cannot be
/// decoded.
pub fn object_property_definition(
    view: &DerivedView,
    property: &str,
    limits: DecodeLimits,
) -> Result<String, RenderError> {
    let renderer = Renderer::new(view);
    let p = renderer.label(property);
    let mut mentions = Mentions::default();
    let mut parts = Vec::new();

    let domain = side(view, &renderer, &effective_domains(view, property), limits)?;
    let range = side(view, &renderer, &effective_ranges(view, property), limits)?;
    parts.push(format!(
        "The property {} is a relation between {domain} and {range}.",
        mentions.mention(&p)
    ));

    let supers = minimal_super_properties(view, property);
    if !supers.is_empty() {
        let labels: Vec<String> = supers.iter().map(|s| renderer.label(s)).collect();
        let listed: Vec<String> = labels.iter().map(|l| mentions.mention(l)).collect();
        parts.push(format!("It is a sub-property of {}.", join_and(&listed)));
        for q in &labels {
            parts.push(format!("This means that if x {p} y then x {q} y."));
        }
    }

    let subs = maximal_sub_properties(view, property);
    if !subs.is_empty() {
        let labels: Vec<String> = subs.iter().map(|s| renderer.label(s)).collect();
        let listed: Vec<String> = labels.iter().map(|l| mentions.mention(l)).collect();
        parts.push(format!("It is the super-property for {}.", join_and(&listed)));
        for s in &labels {
            parts.push(format!("This means that if a subject x {s} y then x {p} y."));
        }
    }

    let node = Term::iri(property);
    let g = view.graph();
    let inverses: BTreeSet<&str> = g
        .objects(&node, iris::OWL_INVERSE_OF)
        .chain(g.subjects(iris::OWL_INVERSE_OF, &node))
        .filter_map(Term::as_iri)
        .collect();
    for inverse in inverses {
        let q = renderer.label(inverse);
        parts.push(format!(
            "It has inverse {}, which means that if x {p} y then y {q} x.",
            mentions.mention(&q)
        ));
    }

    for (characteristic, sentence) in CHARACTERISTICS {
        if view.is_a(property, characteristic) {
            parts.push((*sentence).to_owned());
        }
    }

    Ok(dedupe(parts).join(" "))
}
