//! Class and data-range expressions decoded from the graph.
//!
//! Decoding is the only place that walks nested blank nodes, so it is where
//! termination is enforced: every call carries the blank nodes already on the
//! current path and the current depth. A revisit or an over-deep nesting
//! stops the walk with a [`RenderError`] instead of recursing.

use std::collections::BTreeSet;

use owl_docsgen_model::{iris, Graph, Term};

use crate::error::RenderError;
use crate::view::DerivedView;

/// Bounds for expression decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest nesting accepted.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// A decoded class expression or data range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A named class, property or individual.
    Named(String),
    /// `owl:intersectionOf`.
    Intersection(Vec<Expression>),
    /// `owl:unionOf`.
    Union(Vec<Expression>),
    /// `owl:complementOf`.
    Complement(Box<Expression>),
    /// `owl:oneOf`.
    OneOf(Vec<Term>),
    /// An `owl:Restriction`.
    Restriction {
        /// The restricted property.
        property: String,
        /// What the restriction says about it.
        constraint: Constraint,
    },
    /// A datatype, possibly narrowed by facets.
    DataRange(DataRange),
    /// A blank node with no recognised structure.
    Anonymous,
}

/// The qualifier of a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `owl:someValuesFrom`.
    Some(Box<Expression>),
    /// `owl:allValuesFrom`.
    All(Box<Expression>),
    /// `owl:hasValue`.
    Value(Term),
    /// `owl:hasSelf`.
    HasSelf,
    /// Plain or qualified cardinality.
    Count {
        /// Exact, minimum or maximum.
        bound: Bound,
        /// The number.
        count: u64,
        /// `owl:onClass` / `owl:onDataRange` filler of a qualified cardinality.
        filler: Option<Box<Expression>>,
    },
}

/// Cardinality bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `owl:cardinality`, `owl:qualifiedCardinality`.
    Exactly,
    /// `owl:minCardinality`, `owl:minQualifiedCardinality`.
    AtLeast,
    /// `owl:maxCardinality`, `owl:maxQualifiedCardinality`.
    AtMost,
}

/// A datatype with optional facet restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRange {
    /// Datatype IRI.
    pub datatype: String,
    /// Facets in declaration order.
    pub facets: Vec<Facet>,
}

/// One XSD facet restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Which facet.
    pub kind: FacetKind,
    /// Its lexical value.
    pub value: String,
}

/// The XSD facets that are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// `xsd:minInclusive`.
    MinInclusive,
    /// `xsd:maxInclusive`.
    MaxInclusive,
    /// `xsd:minExclusive`.
    MinExclusive,
    /// `xsd:maxExclusive`.
    MaxExclusive,
    /// `xsd:pattern`.
    Pattern,
    /// `xsd:length`.
    Length,
    /// `xsd:minLength`.
    MinLength,
    /// `xsd:maxLength`.
    MaxLength,
}

impl FacetKind {
    fn from_iri(iri: &str) -> Option<Self> {
        Some(match iri {
            iris::XSD_MIN_INCLUSIVE => Self::MinInclusive,
            iris::XSD_MAX_INCLUSIVE => Self::MaxInclusive,
            iris::XSD_MIN_EXCLUSIVE => Self::MinExclusive,
            iris::XSD_MAX_EXCLUSIVE => Self::MaxExclusive,
            iris::XSD_PATTERN => Self::Pattern,
            iris::XSD_LENGTH => Self::Length,
            iris::XSD_MIN_LENGTH => Self::MinLength,
            iris::XSD_MAX_LENGTH => Self::MaxLength,
            _ => return None,
        })
    }
}

impl Expression {
    /// Decodes the expression rooted at `node`.
    ///
    /// # Errors
    ///
    /// [`RenderError::Cycle`] when a blank node is reached again on the same
    /// path, [`RenderError::TooDeep`] past `limits.max_depth`, and
    /// [`RenderError::Malformed`] for broken lists, restrictions without
    /// `owl:onProperty`, or non-numeric cardinalities.
    pub fn decode(
        view: &DerivedView,
        node: &Term,
        limits: DecodeLimits,
    ) -> Result<Self, RenderError> {
        Decoder {
            graph: view.graph(),
            limits,
            path: BTreeSet::new(),
        }
        .decode(node, 0)
    }

    /// Returns true for `owl:Thing`.
    #[must_use]
    pub fn is_top(&self) -> bool {
        matches!(self, Self::Named(iri) if iri == iris::OWL_THING)
    }

    /// Returns true for `owl:Nothing`.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Named(iri) if iri == iris::OWL_NOTHING)
    }
}

/// Returns true when `iri` names a datatype rather than a class.
#[must_use]
pub fn is_datatype(graph: &Graph, iri: &str) -> bool {
    iri.starts_with(iris::XSD)
        || iri == iris::RDFS_LITERAL
        || graph.has(&Term::iri(iri), iris::RDF_TYPE, iris::RDFS_DATATYPE)
}

struct Decoder<'a> {
    graph: &'a Graph,
    limits: DecodeLimits,
    path: BTreeSet<Term>,
}

fn malformed(node: &Term, reason: &'static str) -> RenderError {
    RenderError::Malformed {
        node: node.to_string(),
        reason,
    }
}

impl Decoder<'_> {
    fn decode(&mut self, node: &Term, depth: usize) -> Result<Expression, RenderError> {
        if depth > self.limits.max_depth {
            return Err(RenderError::TooDeep {
                limit: self.limits.max_depth,
            });
        }
        match node {
            Term::Iri(iri) if is_datatype(self.graph, iri) => Ok(Expression::DataRange(DataRange {
                datatype: iri.clone(),
                facets: Vec::new(),
            })),
            Term::Iri(iri) => Ok(Expression::Named(iri.clone())),
            Term::Literal(_) => Err(malformed(node, "literal in class position")),
            Term::Blank(_) => {
                if !self.path.insert(node.clone()) {
                    return Err(RenderError::Cycle {
                        node: node.to_string(),
                    });
                }
                let decoded = self.decode_blank(node, depth);
                self.path.remove(node);
                decoded
            }
        }
    }

    fn decode_blank(&mut self, node: &Term, depth: usize) -> Result<Expression, RenderError> {
        let g = self.graph;
        if g.object(node, iris::OWL_ON_PROPERTY).is_some()
            || g.has(node, iris::RDF_TYPE, iris::OWL_RESTRICTION)
        {
            return self.restriction(node, depth);
        }
        if let Some(head) = g.object(node, iris::OWL_INTERSECTION_OF) {
            return Ok(Expression::Intersection(self.members(node, head, depth)?));
        }
        if let Some(head) = g.object(node, iris::OWL_UNION_OF) {
            return Ok(Expression::Union(self.members(node, head, depth)?));
        }
        if let Some(inner) = g.object(node, iris::OWL_COMPLEMENT_OF) {
            return Ok(Expression::Complement(Box::new(self.decode(inner, depth + 1)?)));
        }
        if let Some(head) = g.object(node, iris::OWL_ONE_OF) {
            let items = g
                .list_items(head)
                .ok_or_else(|| malformed(node, "broken rdf:List in owl:oneOf"))?;
            return Ok(Expression::OneOf(items));
        }
        if let Some(datatype) = g.object(node, iris::OWL_ON_DATATYPE) {
            return self.data_range(node, datatype).map(Expression::DataRange);
        }
        Ok(Expression::Anonymous)
    }

    fn members(
        &mut self,
        node: &Term,
        head: &Term,
        depth: usize,
    ) -> Result<Vec<Expression>, RenderError> {
        let items = self
            .graph
            .list_items(head)
            .ok_or_else(|| malformed(node, "broken rdf:List"))?;
        items
            .iter()
            .map(|item| self.decode(item, depth + 1))
            .collect()
    }

    fn restriction(&mut self, node: &Term, depth: usize) -> Result<Expression, RenderError> {
        let g = self.graph;
        let property = g
            .object(node, iris::OWL_ON_PROPERTY)
            .and_then(Term::as_iri)
            .ok_or_else(|| malformed(node, "restriction without a named owl:onProperty"))?
            .to_owned();

        let constraint = if let Some(value) = g.object(node, iris::OWL_HAS_VALUE) {
            Constraint::Value(value.clone())
        } else if g.object(node, iris::OWL_HAS_SELF).is_some() {
            Constraint::HasSelf
        } else if let Some(constraint) = self.cardinality(node, depth)? {
            constraint
        } else if let Some(filler) = g.object(node, iris::OWL_SOME_VALUES_FROM) {
            Constraint::Some(Box::new(self.decode(filler, depth + 1)?))
        } else if let Some(filler) = g.object(node, iris::OWL_ALL_VALUES_FROM) {
            Constraint::All(Box::new(self.decode(filler, depth + 1)?))
        } else {
            return Err(malformed(node, "restriction without a recognised constraint"));
        };

        Ok(Expression::Restriction {
            property,
            constraint,
        })
    }

    fn cardinality(
        &mut self,
        node: &Term,
        depth: usize,
    ) -> Result<Option<Constraint>, RenderError> {
        const QUALIFIED: [(&str, Bound); 3] = [
            (iris::OWL_QUALIFIED_CARDINALITY, Bound::Exactly),
            (iris::OWL_MIN_QUALIFIED_CARDINALITY, Bound::AtLeast),
            (iris::OWL_MAX_QUALIFIED_CARDINALITY, Bound::AtMost),
        ];
        const PLAIN: [(&str, Bound); 3] = [
            (iris::OWL_CARDINALITY, Bound::Exactly),
            (iris::OWL_MIN_CARDINALITY, Bound::AtLeast),
            (iris::OWL_MAX_CARDINALITY, Bound::AtMost),
        ];
        let g = self.graph;

        let filler_node = g
            .object(node, iris::OWL_ON_CLASS)
            .or_else(|| g.object(node, iris::OWL_ON_DATA_RANGE));

        for (predicate, bound) in QUALIFIED {
            let Some(value) = g.object(node, predicate) else {
                continue;
            };
            let count = count_of(node, value)?;
            let filler = match filler_node {
                Some(f) => Some(Box::new(self.decode(f, depth + 1)?)),
                None => None,
            };
            return Ok(Some(Constraint::Count {
                bound,
                count,
                filler,
            }));
        }
        for (predicate, bound) in PLAIN {
            if let Some(value) = g.object(node, predicate) {
                return Ok(Some(Constraint::Count {
                    bound,
                    count: count_of(node, value)?,
                    filler: None,
                }));
            }
        }
        Ok(None)
    }

    fn data_range(&self, node: &Term, datatype: &Term) -> Result<DataRange, RenderError> {
        let g = self.graph;
        let datatype = datatype
            .as_iri()
            .ok_or_else(|| malformed(node, "owl:onDatatype is not a named datatype"))?
            .to_owned();

        let mut facets = Vec::new();
        if let Some(head) = g.object(node, iris::OWL_WITH_RESTRICTIONS) {
            let items = g
                .list_items(head)
                .ok_or_else(|| malformed(node, "broken rdf:List in owl:withRestrictions"))?;
            for item in &items {
                for (predicate, values) in g.predicate_objects(item) {
                    let Some(kind) = predicate.as_iri().and_then(FacetKind::from_iri) else {
                        continue;
                    };
                    for value in values {
                        let value = match value {
                            Term::Literal(lit) => lit.lexical.clone(),
                            other => other.to_string(),
                        };
                        facets.push(Facet { kind, value });
                    }
                }
            }
        }
        Ok(DataRange { datatype, facets })
    }
}

fn count_of(node: &Term, value: &Term) -> Result<u64, RenderError> {
    value
        .as_literal()
        .and_then(|lit| lit.as_count())
        .ok_or_else(|| malformed(node, "cardinality is not a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owl_docsgen_model::parser::parse_turtle;

    const PREFIXES: &str = "@prefix ex: <http://ex.org/> .\n\
        @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
        @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n";

    fn view(body: &str) -> DerivedView {
        let g = parse_turtle(&format!("{PREFIXES}{body}")).unwrap();
        DerivedView::from_entailments(&g, std::iter::empty())
    }

    fn superclass(v: &DerivedView, class: &str) -> Term {
        v.graph()
            .object(&Term::iri(format!("http://ex.org/{class}")), iris::RDFS_SUBCLASS_OF)
            .cloned()
            .unwrap()
    }

    #[test]
    fn decodes_existential_restriction() {
        let v = view("ex:Parent rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:hasChild ; owl:someValuesFrom ex:Person ] .\n");
        let e = Expression::decode(&v, &superclass(&v, "Parent"), DecodeLimits::default()).unwrap();
        assert_eq!(
            e,
            Expression::Restriction {
                property: "http://ex.org/hasChild".into(),
                constraint: Constraint::Some(Box::new(Expression::Named("http://ex.org/Person".into()))),
            }
        );
    }

    #[test]
    fn decodes_facets_in_list_order() {
        let v = view(
            "ex:Minor rdfs:subClassOf [ owl:onProperty ex:age ; owl:allValuesFrom [ a rdfs:Datatype ;\n\
               owl:onDatatype xsd:integer ; owl:withRestrictions ( [ xsd:maxExclusive 18 ] [ xsd:minInclusive 0 ] ) ] ] .\n",
        );
        let e = Expression::decode(&v, &superclass(&v, "Minor"), DecodeLimits::default()).unwrap();
        let Expression::Restriction {
            constraint: Constraint::All(filler),
            ..
        } = e
        else {
            unreachable!("expected a universal restriction");
        };
        let Expression::DataRange(range) = *filler else {
            unreachable!("expected a data range");
        };
        assert_eq!(range.datatype, iris::XSD_INTEGER);
        let kinds: Vec<FacetKind> = range.facets.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FacetKind::MaxExclusive, FacetKind::MinInclusive]);
    }

    #[test]
    fn self_referencing_filler_is_a_cycle() {
        let v = view(
            "ex:Loop rdfs:subClassOf _:r .\n\
             _:r a owl:Restriction ; owl:onProperty ex:p ; owl:someValuesFrom _:r .\n",
        );
        let err = Expression::decode(&v, &superclass(&v, "Loop"), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, RenderError::Cycle { .. }));
    }

    #[test]
    fn shared_blank_nodes_are_not_cycles() {
        let v = view(
            "ex:A rdfs:subClassOf [ owl:intersectionOf ( _:x _:x ) ] .\n\
             _:x owl:onProperty ex:p ; owl:someValuesFrom ex:B .\n",
        );
        let e = Expression::decode(&v, &superclass(&v, "A"), DecodeLimits::default()).unwrap();
        assert!(matches!(e, Expression::Intersection(ref members) if members.len() == 2));
    }

    #[test]
    fn depth_cap_is_enforced() {
        let v = view(
            "ex:Deep rdfs:subClassOf [ owl:onProperty ex:p ; owl:someValuesFrom\n\
               [ owl:onProperty ex:p ; owl:someValuesFrom\n\
               [ owl:onProperty ex:p ; owl:someValuesFrom ex:B ] ] ] .\n",
        );
        let node = superclass(&v, "Deep");
        assert!(Expression::decode(&v, &node, DecodeLimits { max_depth: 3 }).is_ok());
        assert_eq!(
            Expression::decode(&v, &node, DecodeLimits { max_depth: 2 }),
            Err(RenderError::TooDeep { limit: 2 })
        );
    }

    #[test]
    fn restriction_without_property_is_malformed() {
        let v = view("ex:Bad rdfs:subClassOf [ a owl:Restriction ; owl:someValuesFrom ex:B ] .\n");
        let err = Expression::decode(&v, &superclass(&v, "Bad"), DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, RenderError::Malformed { .. }));
    }

    #[test]
    fn qualified_cardinality_keeps_filler() {
        let v = view(
            "ex:Pair rdfs:subClassOf [ owl:onProperty ex:hasPart ;\n\
               owl:qualifiedCardinality \"2\"^^xsd:nonNegativeInteger ; owl:onClass ex:Piece ] .\n",
        );
        let e = Expression::decode(&v, &superclass(&v, "Pair"), DecodeLimits::default()).unwrap();
        assert!(matches!(
            e,
            Expression::Restriction {
                constraint: Constraint::Count { bound: Bound::Exactly, count: 2, filler: Some(_) },
                ..
            }
        ));
    }
}
