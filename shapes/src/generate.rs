//! Shape generation.

use std::collections::BTreeSet;

use owl_docsgen::IdentifierError;
use owl_docsgen_model::{iris, Graph, PrefixMap, Term, Triple};
use tracing::{debug, warn};

use crate::resolve::{resolve_identifier, IriBase};

/// Ranges picked up when no identifiers are given.
pub const AUTO_DATATYPES: &[&str] = &[iris::XSD_DECIMAL, iris::XSD_INTEGER, iris::XSD_DATETIME];

/// What to generate shapes for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRequest {
    /// Property identifiers. Empty selects properties automatically.
    pub properties: Vec<String>,
    /// Resolution of bare names.
    pub base: IriBase,
    /// Fail on unresolvable or non-datatype identifiers instead of skipping
    /// them.
    pub strict: bool,
}

impl Default for ShapeRequest {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            base: IriBase::default(),
            strict: true,
        }
    }
}

/// A property and the datatype its values must have.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target {
    /// Property IRI.
    pub property: String,
    /// Expected XSD datatype IRI.
    pub datatype: String,
}

/// A requested identifier that produced no shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Identifier as given.
    pub identifier: String,
    /// Why it was skipped.
    pub reason: String,
}

/// The generated shapes graph and how it was selected.
#[derive(Debug, Clone)]
pub struct ShapeOutcome {
    /// One `sh:NodeShape` per target.
    pub shapes: Graph,
    /// Targets, in the order they were selected.
    pub targets: Vec<Target>,
    /// Identifiers that were skipped in lenient mode, or that had no usable
    /// range.
    pub skipped: Vec<Skipped>,
}

fn auto_targets(graph: &Graph) -> Vec<Target> {
    let mut targets = Vec::new();
    for property in graph.instances_of(iris::OWL_DATATYPE_PROPERTY) {
        for range in graph.objects(&Term::iri(property), iris::RDFS_RANGE) {
            if let Some(datatype) = range.as_iri().filter(|dt| AUTO_DATATYPES.contains(dt)) {
                targets.push(Target {
                    property: property.to_owned(),
                    datatype: datatype.to_owned(),
                });
            }
        }
    }
    targets
}

/// Outcome of looking at one explicit identifier.
enum Selection {
    Target(Target),
    Skip(String),
}

fn select_one(graph: &Graph, ident: &str, base: &IriBase) -> Result<Selection, IdentifierError> {
    let property = resolve_identifier(graph, ident, base)?;
    let node = Term::iri(property.as_str());
    let declared = graph.has(&node, iris::RDF_TYPE, iris::OWL_DATATYPE_PROPERTY);
    let mut ranges = graph.objects(&node, iris::RDFS_RANGE).peekable();
    if !declared && ranges.peek().is_none() {
        return Err(IdentifierError::NotDatatypeProperty {
            ident: ident.to_owned(),
            iri: property,
        });
    }

    let ranges: Vec<&Term> = ranges.collect();
    if ranges.is_empty() {
        return Ok(Selection::Skip(format!("<{property}> has no explicit rdfs:range")));
    }
    let datatype = ranges
        .iter()
        .filter_map(|r| r.as_iri())
        .find(|r| r.starts_with(iris::XSD));
    Ok(match datatype {
        Some(datatype) => Selection::Target(Target {
            property,
            datatype: datatype.to_owned(),
        }),
        None => Selection::Skip(format!("<{property}> has no XSD range")),
    })
}

/// Picks the properties to constrain.
///
/// # Errors
///
/// In strict mode any [`IdentifierError`] from resolution or the datatype
/// property check. [`IdentifierError::NoSelection`] when nothing is left,
/// in either mode.
pub fn select_targets(
    graph: &Graph,
    request: &ShapeRequest,
) -> Result<(Vec<Target>, Vec<Skipped>), IdentifierError> {
    let mut skipped = Vec::new();
    let targets = if request.properties.is_empty() {
        auto_targets(graph)
    } else {
        let mut targets = Vec::new();
        for ident in &request.properties {
            match select_one(graph, ident, &request.base) {
                Ok(Selection::Target(target)) => targets.push(target),
                Ok(Selection::Skip(reason)) => {
                    warn!(identifier = %ident, %reason, "skipping property");
                    skipped.push(Skipped {
                        identifier: ident.clone(),
                        reason,
                    });
                }
                Err(err) if !request.strict => {
                    warn!(identifier = %ident, error = %err, "skipping property");
                    skipped.push(Skipped {
                        identifier: ident.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        targets
    };

    let mut seen = BTreeSet::new();
    let targets: Vec<Target> = targets
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect();
    if targets.is_empty() {
        return Err(IdentifierError::NoSelection);
    }
    Ok((targets, skipped))
}

/// Prefixes for the shapes document: `rdf rdfs owl xsd sh`, then whatever
/// the source binds that does not clash.
fn shape_prefixes(source: &PrefixMap) -> PrefixMap {
    let mut prefixes = PrefixMap::well_known();
    prefixes.insert("sh", iris::SH);
    for (prefix, namespace) in source.iter() {
        prefixes.insert_if_absent(prefix, namespace);
    }
    prefixes
}

/// Builds the SHACL shapes graph for `graph`.
///
/// # Errors
///
/// See [`select_targets`].
pub fn generate_shapes(
    graph: &Graph,
    request: &ShapeRequest,
) -> Result<ShapeOutcome, IdentifierError> {
    let (targets, skipped) = select_targets(graph, request)?;
    let mut shapes = Graph::with_prefixes(shape_prefixes(graph.prefixes()));
    let rdf_type = Term::iri(iris::RDF_TYPE);

    for (i, Target { property, datatype }) in targets.iter().enumerate() {
        let shape = Term::iri(format!("{property}_Shape"));
        let property_shape = Term::blank(format!("ps{i}"));
        let p = Term::iri(property.as_str());

        shapes.add(shape.clone(), rdf_type.clone(), Term::iri(iris::SH_NODE_SHAPE));
        shapes.add(shape.clone(), Term::iri(iris::SH_TARGET_SUBJECTS_OF), p.clone());
        shapes.add(shape, Term::iri(iris::SH_PROPERTY), property_shape.clone());
        shapes.add(property_shape.clone(), Term::iri(iris::SH_PATH), p);
        shapes.add(
            property_shape.clone(),
            Term::iri(iris::SH_DATATYPE),
            Term::iri(datatype.as_str()),
        );
        shapes.add(
            property_shape,
            Term::iri(iris::SH_MESSAGE),
            Term::plain(format!("Value of {property} must have datatype {datatype}.")),
        );
        debug!(property = %property, datatype = %datatype, "shape");
    }

    Ok(ShapeOutcome {
        shapes,
        targets,
        skipped,
    })
}

/// A copy of `graph` without the `rdfs:range` statements of `targets`.
#[must_use]
pub fn remove_ranges(graph: &Graph, targets: &[Target]) -> Graph {
    let mut refactored = graph.clone();
    let range = Term::iri(iris::RDFS_RANGE);
    for target in targets {
        let subject = Term::iri(target.property.as_str());
        let stale: Vec<Term> = graph.objects(&subject, iris::RDFS_RANGE).cloned().collect();
        for object in stale {
            refactored.remove(&Triple::new(subject.clone(), range.clone(), object));
        }
    }
    refactored
}

#[cfg(test)]
mod tests {
    use super::*;
    use owl_docsgen_model::parser::parse_turtle;

    const ONT: &str = "@prefix ex: <http://ex.org/> .\n\
                       @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
                       @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
                       @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
                       ex:has_income a owl:DatatypeProperty ; rdfs:range xsd:decimal .\n\
                       ex:born a owl:DatatypeProperty ; rdfs:range xsd:dateTime .\n\
                       ex:name a owl:DatatypeProperty ; rdfs:range xsd:string .\n\
                       ex:money a owl:DatatypeProperty ; rdfs:range ex:Currency .\n\
                       ex:note a owl:DatatypeProperty .\n\
                       ex:knows a owl:ObjectProperty .\n";

    fn graph() -> Graph {
        parse_turtle(ONT).unwrap()
    }

    fn request(props: &[&str], strict: bool) -> ShapeRequest {
        ShapeRequest {
            properties: props.iter().map(|p| (*p).to_owned()).collect(),
            strict,
            ..ShapeRequest::default()
        }
    }

    #[test]
    fn automatic_selection_uses_numeric_and_date_ranges() {
        let (targets, skipped) = select_targets(&graph(), &ShapeRequest::default()).unwrap();
        let props: Vec<&str> = targets.iter().map(|t| t.property.as_str()).collect();
        assert_eq!(props, vec!["http://ex.org/born", "http://ex.org/has_income"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn shape_structure() {
        let outcome = generate_shapes(&graph(), &request(&["ex:has_income"], true)).unwrap();
        let g = &outcome.shapes;
        let shape = Term::iri("http://ex.org/has_income_Shape");
        assert!(g.has(&shape, iris::RDF_TYPE, iris::SH_NODE_SHAPE));
        assert!(g.has(&shape, iris::SH_TARGET_SUBJECTS_OF, "http://ex.org/has_income"));
        let ps = g.object(&shape, iris::SH_PROPERTY).unwrap().clone();
        assert!(g.has(&ps, iris::SH_DATATYPE, iris::XSD_DECIMAL));
        assert_eq!(
            g.object(&ps, iris::SH_MESSAGE),
            Some(&Term::plain(
                "Value of http://ex.org/has_income must have datatype http://www.w3.org/2001/XMLSchema#decimal."
            ))
        );
        assert_eq!(g.prefixes().namespace("sh"), Some(iris::SH));
        assert_eq!(g.prefixes().namespace("ex"), Some("http://ex.org/"));
    }

    #[test]
    fn explicit_string_range_is_allowed() {
        let (targets, _) = select_targets(&graph(), &request(&["ex:name"], true)).unwrap();
        assert_eq!(targets[0].datatype, iris::XSD_STRING);
    }

    #[test]
    fn unusable_ranges_are_skipped() {
        let err = select_targets(&graph(), &request(&["ex:money", "ex:note"], true)).unwrap_err();
        assert_eq!(err, IdentifierError::NoSelection);

        let (targets, skipped) =
            select_targets(&graph(), &request(&["ex:money", "ex:note", "ex:born"], true)).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(skipped.len(), 2);
    }

    #[test]
    fn strict_and_lenient_identifier_checks() {
        let err = select_targets(&graph(), &request(&["ex:knows"], true)).unwrap_err();
        assert!(matches!(err, IdentifierError::NotDatatypeProperty { .. }));

        let (targets, skipped) =
            select_targets(&graph(), &request(&["ex:knows", "bare", "ex:born"], false)).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(skipped.len(), 2);
    }

    #[test]
    fn removing_ranges_touches_only_targets() {
        let g = graph();
        let (targets, _) = select_targets(&g, &ShapeRequest::default()).unwrap();
        let refactored = remove_ranges(&g, &targets);
        assert_eq!(refactored.len(), g.len() - 2);
        assert!(refactored.has(&Term::iri("http://ex.org/name"), iris::RDFS_RANGE, iris::XSD_STRING));
        assert!(g.has(&Term::iri("http://ex.org/born"), iris::RDFS_RANGE, iris::XSD_DATETIME));
    }
}
