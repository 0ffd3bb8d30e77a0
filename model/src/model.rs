//! Core RDF term types.
//!
//! Terms are owned and totally ordered so that graphs built from them can be
//! walked in a stable order. Every enumeration in the pipeline inherits its
//! determinism from the `Ord` derived here.

use std::fmt;

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// Lexical form, unescaped.
    pub lexical: String,
    /// Full datatype IRI. `None` for plain and language-tagged strings.
    pub datatype: Option<String>,
    /// Language tag, lowercased.
    pub language: Option<String>,
}

impl Literal {
    /// A plain (`xsd:string`) literal.
    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// A language-tagged literal.
    #[must_use]
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    /// A typed literal. `xsd:string` is normalized to a plain literal.
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        if datatype == iris::XSD_STRING {
            return Self::plain(lexical);
        }
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Returns true for plain and language-tagged strings.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.datatype.is_none()
    }

    /// Parses the lexical form as a non-negative integer, if it is one.
    #[must_use]
    pub fn as_count(&self) -> Option<u64> {
        self.lexical.trim().parse().ok()
    }
}

/// An RDF term: IRI, blank node, or literal.
///
/// The variant order matters: IRIs sort before blank nodes, which sort
/// before literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its document-local label.
    Blank(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Creates an IRI term.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a blank node term.
    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Creates a plain literal term.
    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(lexical))
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for IRIs.
    #[must_use]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Returns true when this term is the given IRI.
    #[must_use]
    pub fn is(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", lit.lexical)?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    /// Subject: IRI or blank node.
    pub subject: Term,
    /// Predicate: always an IRI.
    pub predicate: Term,
    /// Object: any term.
    pub object: Term,
}

impl Triple {
    /// Creates a triple.
    #[must_use]
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Returns the local part of an IRI: the text after the last `#`, or after
/// the last `/` when there is no fragment.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        if !fragment.is_empty() {
            return fragment;
        }
    }
    let trimmed = iri.trim_end_matches(['/', '#']);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Standard IRI constants for the vocabularies the pipeline reads and writes.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// SKOS namespace.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// SHACL namespace.
    pub const SH: &str = "http://www.w3.org/ns/shacl#";

    // RDF
    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`.
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`.
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`.
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// `rdf:Property`.
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

    // RDFS
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:subPropertyOf`.
    pub const RDFS_SUBPROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:Class`.
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    /// `rdfs:Datatype`.
    pub const RDFS_DATATYPE: &str = "http://www.w3.org/2000/01/rdf-schema#Datatype";
    /// `rdfs:Literal`.
    pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";

    // OWL classes
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:Nothing`.
    pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
    /// `owl:Restriction`.
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`.
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:AnnotationProperty`.
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `owl:topObjectProperty`.
    pub const OWL_TOP_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#topObjectProperty";
    /// `owl:bottomObjectProperty`.
    pub const OWL_BOTTOM_OBJECT_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#bottomObjectProperty";
    /// `owl:topDataProperty`.
    pub const OWL_TOP_DATA_PROPERTY: &str = "http://www.w3.org/2002/07/owl#topDataProperty";
    /// `owl:bottomDataProperty`.
    pub const OWL_BOTTOM_DATA_PROPERTY: &str = "http://www.w3.org/2002/07/owl#bottomDataProperty";

    // OWL property characteristics
    /// `owl:FunctionalProperty`.
    pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
    /// `owl:InverseFunctionalProperty`.
    pub const OWL_INVERSE_FUNCTIONAL_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#InverseFunctionalProperty";
    /// `owl:TransitiveProperty`.
    pub const OWL_TRANSITIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#TransitiveProperty";
    /// `owl:SymmetricProperty`.
    pub const OWL_SYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#SymmetricProperty";
    /// `owl:AsymmetricProperty`.
    pub const OWL_ASYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AsymmetricProperty";
    /// `owl:ReflexiveProperty`.
    pub const OWL_REFLEXIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ReflexiveProperty";
    /// `owl:IrreflexiveProperty`.
    pub const OWL_IRREFLEXIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#IrreflexiveProperty";

    // OWL axioms
    /// `owl:equivalentClass`.
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:equivalentProperty`.
    pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";
    /// `owl:inverseOf`.
    pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
    /// `owl:intersectionOf`.
    pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
    /// `owl:unionOf`.
    pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
    /// `owl:complementOf`.
    pub const OWL_COMPLEMENT_OF: &str = "http://www.w3.org/2002/07/owl#complementOf";
    /// `owl:oneOf`.
    pub const OWL_ONE_OF: &str = "http://www.w3.org/2002/07/owl#oneOf";

    // OWL restrictions
    /// `owl:onProperty`.
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    /// `owl:someValuesFrom`.
    pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
    /// `owl:allValuesFrom`.
    pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
    /// `owl:hasValue`.
    pub const OWL_HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
    /// `owl:hasSelf`.
    pub const OWL_HAS_SELF: &str = "http://www.w3.org/2002/07/owl#hasSelf";
    /// `owl:cardinality`.
    pub const OWL_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
    /// `owl:minCardinality`.
    pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
    /// `owl:maxCardinality`.
    pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
    /// `owl:qualifiedCardinality`.
    pub const OWL_QUALIFIED_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#qualifiedCardinality";
    /// `owl:minQualifiedCardinality`.
    pub const OWL_MIN_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#minQualifiedCardinality";
    /// `owl:maxQualifiedCardinality`.
    pub const OWL_MAX_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#maxQualifiedCardinality";
    /// `owl:onClass`.
    pub const OWL_ON_CLASS: &str = "http://www.w3.org/2002/07/owl#onClass";
    /// `owl:onDataRange`.
    pub const OWL_ON_DATA_RANGE: &str = "http://www.w3.org/2002/07/owl#onDataRange";
    /// `owl:onDatatype`.
    pub const OWL_ON_DATATYPE: &str = "http://www.w3.org/2002/07/owl#onDatatype";
    /// `owl:withRestrictions`.
    pub const OWL_WITH_RESTRICTIONS: &str = "http://www.w3.org/2002/07/owl#withRestrictions";

    // SKOS
    /// `skos:definition`.
    pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
    /// `skos:scopeNote`.
    pub const SKOS_SCOPE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#scopeNote";

    // XSD datatypes and facets
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:minInclusive`.
    pub const XSD_MIN_INCLUSIVE: &str = "http://www.w3.org/2001/XMLSchema#minInclusive";
    /// `xsd:maxInclusive`.
    pub const XSD_MAX_INCLUSIVE: &str = "http://www.w3.org/2001/XMLSchema#maxInclusive";
    /// `xsd:minExclusive`.
    pub const XSD_MIN_EXCLUSIVE: &str = "http://www.w3.org/2001/XMLSchema#minExclusive";
    /// `xsd:maxExclusive`.
    pub const XSD_MAX_EXCLUSIVE: &str = "http://www.w3.org/2001/XMLSchema#maxExclusive";
    /// `xsd:pattern`.
    pub const XSD_PATTERN: &str = "http://www.w3.org/2001/XMLSchema#pattern";
    /// `xsd:length`.
    pub const XSD_LENGTH: &str = "http://www.w3.org/2001/XMLSchema#length";
    /// `xsd:minLength`.
    pub const XSD_MIN_LENGTH: &str = "http://www.w3.org/2001/XMLSchema#minLength";
    /// `xsd:maxLength`.
    pub const XSD_MAX_LENGTH: &str = "http://www.w3.org/2001/XMLSchema#maxLength";

    // SHACL
    /// `sh:NodeShape`.
    pub const SH_NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
    /// `sh:targetSubjectsOf`.
    pub const SH_TARGET_SUBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetSubjectsOf";
    /// `sh:property`.
    pub const SH_PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
    /// `sh:path`.
    pub const SH_PATH: &str = "http://www.w3.org/ns/shacl#path";
    /// `sh:datatype`.
    pub const SH_DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
    /// `sh:message`.
    pub const SH_MESSAGE: &str = "http://www.w3.org/ns/shacl#message";
}
