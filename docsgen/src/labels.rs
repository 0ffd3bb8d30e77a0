//! Label pre-pass: gives unlabelled entities of one namespace an
//! `rdfs:label` derived from their IRI.

use std::collections::BTreeMap;

use owl_docsgen_model::iris;
use tracing::debug;

use crate::annotate::Annotator;
use crate::report::Tally;

const SKIPPED: &[&str] = &[
    iris::OWL_THING,
    iris::OWL_NOTHING,
    iris::OWL_TOP_OBJECT_PROPERTY,
    iris::OWL_TOP_DATA_PROPERTY,
];

/// Types whose members are labelled in lowercase.
const PROPERTY_TYPES: &[&str] = &[
    iris::OWL_OBJECT_PROPERTY,
    iris::OWL_DATATYPE_PROPERTY,
];

/// Types that are neither labelled entities nor individuals.
const NON_INDIVIDUAL_TYPES: &[&str] = &[
    iris::OWL_ANNOTATION_PROPERTY,
    iris::OWL_TRANSITIVE_PROPERTY,
    iris::OWL_SYMMETRIC_PROPERTY,
    iris::OWL_FUNCTIONAL_PROPERTY,
    iris::OWL_INVERSE_FUNCTIONAL_PROPERTY,
    iris::OWL_ASYMMETRIC_PROPERTY,
    iris::OWL_REFLEXIVE_PROPERTY,
    iris::OWL_IRREFLEXIVE_PROPERTY,
    iris::RDF_PROPERTY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    AsWritten,
    Lowercase,
}

/// Label text for the part of an IRI after `namespace`.
fn label_text(local: &str, style: Style) -> String {
    let text = local.replace('_', " ").trim().to_owned();
    match style {
        Style::AsWritten => text,
        Style::Lowercase => text.to_lowercase(),
    }
}

/// Labels classes, object and datatype properties, and individuals under
/// `namespace` that have no label in `lang`.
pub fn generate_labels(writer: &mut Annotator<'_>, namespace: &str, lang: Option<&str>) -> Tally {
    let mut targets: BTreeMap<String, Style> = BTreeMap::new();
    for (subject, class) in writer.base().graph().pairs(iris::RDF_TYPE) {
        let (Some(entity), Some(class)) = (subject.as_iri(), class.as_iri()) else {
            continue;
        };
        if !entity.starts_with(namespace) || SKIPPED.contains(&entity) {
            continue;
        }
        let style = if PROPERTY_TYPES.contains(&class) {
            Style::Lowercase
        } else if NON_INDIVIDUAL_TYPES.contains(&class) {
            continue;
        } else {
            Style::AsWritten
        };
        // A property typed as anything else is still a property.
        let entry = targets.entry(entity.to_owned()).or_insert(style);
        if style == Style::Lowercase {
            *entry = Style::Lowercase;
        }
    }

    let mut tally = Tally::default();
    for (entity, style) in targets {
        let local = &entity[namespace.len()..];
        if local.is_empty() {
            continue;
        }
        let text = label_text(local, style);
        let outcome = writer.add_label_if_absent(&entity, &text, lang);
        debug!(entity = %entity, label = %text, ?outcome, "label");
        tally.record(outcome);
    }
    tally
}
