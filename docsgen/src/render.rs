//! Text rendering for entities and decoded expressions.
//!
//! | Expression | Text |
//! |------------|------|
//! | named | its label, else the IRI local name |
//! | `owl:Nothing` | "nothing" |
//! | intersection | "both A and B", "all of A, B, and C" |
//! | existential | "has at least one ‘p’ value that is a/an F" |
//! | universal | "only has ‘p’ values that are a/an F" |
//! | value | "has ‘p’ value V" |
//! | has-self | "is related to itself by ‘p’" |
//! | cardinality | "has exactly/at least/at most n ‘p’ value(s)" (+ " that are a/an F") |
//! | enumeration | "one of a, b, or c" |
//! | data range | "xsd:integer < 18 and ≥ 0" |
//! | anything else | "an anonymous class expression" |

use owl_docsgen_model::{iris, local_name, Term};
use tracing::warn;

use crate::expression::{Bound, Constraint, DataRange, Expression, FacetKind};
use crate::view::DerivedView;

/// Phrase used for expressions outside the supported subset.
pub const FALLBACK_PHRASE: &str = "an anonymous class expression";

/// Renders labels and expressions against one derived view.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    view: &'a DerivedView,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer reading labels and prefixes from `view`.
    #[must_use]
    pub fn new(view: &'a DerivedView) -> Self {
        Self { view }
    }

    /// Display label of an entity.
    ///
    /// An untagged or `@en` `rdfs:label` wins, then any other label (smallest
    /// first), then the IRI local name as written.
    #[must_use]
    pub fn label(&self, iri: &str) -> String {
        let mut preferred: Option<&str> = None;
        let mut other: Option<&str> = None;
        for term in self.view.graph().objects(&Term::iri(iri), iris::RDFS_LABEL) {
            let Some(lit) = term.as_literal() else { continue };
            let slot = match lit.language.as_deref() {
                None | Some("en") => &mut preferred,
                Some(_) => &mut other,
            };
            if slot.map_or(true, |current| lit.lexical.as_str() < current) {
                *slot = Some(lit.lexical.as_str());
            }
        }
        preferred
            .or(other)
            .map_or_else(|| local_name(iri).to_owned(), str::to_owned)
    }

    /// Prefixed name of an IRI (`xsd:decimal`), else its local name.
    #[must_use]
    pub fn compact(&self, iri: &str) -> String {
        self.view
            .graph()
            .prefixes()
            .compact(iri)
            .unwrap_or_else(|| local_name(iri).to_owned())
    }

    /// Renders an expression in class position, without an article.
    #[must_use]
    pub fn render(&self, expr: &Expression) -> String {
        match expr {
            e if e.is_bottom() => "nothing".to_owned(),
            Expression::Named(iri) => self.label(iri),
            Expression::Intersection(members) => {
                let parts: Vec<String> = members
                    .iter()
                    .filter(|m| !m.is_top() && !m.is_bottom())
                    .map(|m| self.render(m))
                    .collect();
                if parts.is_empty() {
                    "anything".to_owned()
                } else {
                    join_all(&parts)
                }
            }
            Expression::Restriction {
                property,
                constraint,
            } => self.restriction(property, constraint),
            Expression::OneOf(items) => {
                let parts: Vec<String> = items.iter().map(|t| self.value(t)).collect();
                join_one_of(&parts)
            }
            Expression::DataRange(range) => self.data_range(range),
            Expression::Union(_) => fallback("union"),
            Expression::Complement(_) => fallback("complement"),
            Expression::Anonymous => fallback("unrecognised blank node"),
        }
    }

    /// Renders a filler: named classes and data ranges take an indefinite
    /// article, `owl:Thing` reads as "anything" and `owl:Nothing` as
    /// "nothing", compound expressions are left bare.
    #[must_use]
    pub fn filler(&self, expr: &Expression) -> String {
        match expr {
            e if e.is_top() => "anything".to_owned(),
            e if e.is_bottom() => "nothing".to_owned(),
            Expression::Named(_) | Expression::DataRange(_) => with_article(&self.render(expr)),
            other => self.render(other),
        }
    }

    fn restriction(&self, property: &str, constraint: &Constraint) -> String {
        let p = quoted(&self.label(property));
        match constraint {
            Constraint::Some(filler) if filler.is_top() => format!("has at least one {p} value"),
            Constraint::Some(filler) => {
                format!("has at least one {p} value that is {}", self.filler(filler))
            }
            Constraint::All(filler) => {
                format!("only has {p} values that are {}", self.filler(filler))
            }
            Constraint::Value(value) => format!("has {p} value {}", self.value(value)),
            Constraint::HasSelf => format!("is related to itself by {p}"),
            Constraint::Count {
                bound,
                count,
                filler,
            } => {
                let bound = match bound {
                    Bound::Exactly => "exactly",
                    Bound::AtLeast => "at least",
                    Bound::AtMost => "at most",
                };
                let noun = if *count == 1 { "value" } else { "values" };
                let mut text = format!("has {bound} {count} {p} {noun}");
                if let Some(filler) = filler.as_deref().filter(|f| !f.is_top()) {
                    let verb = if *count == 1 { "is" } else { "are" };
                    text.push_str(&format!(" that {verb} {}", self.filler(filler)));
                }
                text
            }
        }
    }

    fn data_range(&self, range: &DataRange) -> String {
        let name = self.compact(&range.datatype);
        if range.facets.is_empty() {
            return name;
        }
        let facets: Vec<String> = range
            .facets
            .iter()
            .map(|facet| {
                let v = &facet.value;
                match facet.kind {
                    FacetKind::MinInclusive => format!("≥ {v}"),
                    FacetKind::MaxInclusive => format!("≤ {v}"),
                    FacetKind::MinExclusive => format!("> {v}"),
                    FacetKind::MaxExclusive => format!("< {v}"),
                    FacetKind::Pattern => format!("matching pattern {v}"),
                    FacetKind::Length => format!("with length = {v}"),
                    FacetKind::MinLength => format!("with length ≥ {v}"),
                    FacetKind::MaxLength => format!("with length ≤ {v}"),
                }
            })
            .collect();
        format!("{name} {}", facets.join(" and "))
    }

    /// Renders an individual or literal value.
    #[must_use]
    pub fn value(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.label(iri),
            Term::Literal(lit) => lit.lexical.clone(),
            Term::Blank(_) => "an anonymous individual".to_owned(),
        }
    }
}

fn fallback(kind: &str) -> String {
    warn!(kind, "class expression outside the rendered subset");
    FALLBACK_PHRASE.to_owned()
}

/// Wraps a label in typographic single quotes.
#[must_use]
pub fn quoted(label: &str) -> String {
    format!("‘{label}’")
}

/// "a" or "an" for a word, by its first letter. `x` counts as a vowel so
/// that `xsd:` names read "an xsd:integer".
#[must_use]
pub fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u' | 'x') => "an",
        _ => "a",
    }
}

/// Prefixes a word with its indefinite article.
#[must_use]
pub fn with_article(word: &str) -> String {
    format!("{} {word}", indefinite_article(word))
}

/// "A", "both A and B", "all of A, B, and C".
#[must_use]
pub fn join_all(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("both {a} and {b}"),
        [init @ .., last] => format!("all of {}, and {last}", init.join(", ")),
    }
}

/// "a", "one of a or b", "one of a, b, or c".
#[must_use]
pub fn join_one_of(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("one of {a} or {b}"),
        [init @ .., last] => format!("one of {}, or {last}", init.join(", ")),
    }
}

/// "A", "A and B", "A, B, and C".
#[must_use]
pub fn join_and(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{DecodeLimits, Facet};
    use owl_docsgen_model::parser::parse_turtle;

    fn view(body: &str) -> DerivedView {
        let g = parse_turtle(&format!(
            "@prefix ex: <http://ex.org/> .\n\
             @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
             @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n{body}"
        ))
        .unwrap();
        DerivedView::from_entailments(&g, std::iter::empty())
    }

    fn render_superclass(v: &DerivedView, class: &str) -> String {
        let node = v
            .graph()
            .object(&Term::iri(format!("http://ex.org/{class}")), iris::RDFS_SUBCLASS_OF)
            .cloned()
            .unwrap();
        let expr = Expression::decode(v, &node, DecodeLimits::default()).unwrap();
        Renderer::new(v).render(&expr)
    }

    #[test]
    fn label_preference() {
        let v = view(
            "ex:a rdfs:label \"Zed\"@de, \"Alpha\"@en .\n\
             ex:b rdfs:label \"Beta\"@fr .\n",
        );
        let r = Renderer::new(&v);
        assert_eq!(r.label("http://ex.org/a"), "Alpha");
        assert_eq!(r.label("http://ex.org/b"), "Beta");
        assert_eq!(r.label("http://ex.org/has_income"), "has_income");
    }

    #[test]
    fn existential_and_intersection() {
        let v = view(
            "ex:Parent rdfs:subClassOf [ owl:intersectionOf ( ex:Person\n\
               [ owl:onProperty ex:hasChild ; owl:someValuesFrom ex:Person ] ) ] .\n\
             ex:Person rdfs:label \"Person\" .\n",
        );
        assert_eq!(
            render_superclass(&v, "Parent"),
            "both Person and has at least one ‘hasChild’ value that is a Person"
        );
    }

    #[test]
    fn universal_over_facetted_data_range() {
        let v = view(
            "ex:Minor rdfs:subClassOf [ owl:onProperty ex:age ; owl:allValuesFrom [\n\
               owl:onDatatype xsd:integer ; owl:withRestrictions ( [ xsd:maxExclusive 18 ] [ xsd:minInclusive 0 ] ) ] ] .\n",
        );
        assert_eq!(
            render_superclass(&v, "Minor"),
            "only has ‘age’ values that are an xsd:integer < 18 and ≥ 0"
        );
    }

    #[test]
    fn cardinalities() {
        let v = view(
            "ex:A rdfs:subClassOf [ owl:onProperty ex:p ; owl:maxCardinality 1 ] .\n\
             ex:B rdfs:subClassOf [ owl:onProperty ex:p ; owl:minQualifiedCardinality 2 ; owl:onClass ex:Item ] .\n\
             ex:C rdfs:subClassOf [ owl:onProperty ex:p ; owl:hasValue ex:red ] .\n\
             ex:D rdfs:subClassOf [ owl:onProperty ex:p ; owl:hasSelf true ] .\n",
        );
        assert_eq!(render_superclass(&v, "A"), "has at most 1 ‘p’ value");
        assert_eq!(
            render_superclass(&v, "B"),
            "has at least 2 ‘p’ values that are an Item"
        );
        assert_eq!(render_superclass(&v, "C"), "has ‘p’ value red");
        assert_eq!(render_superclass(&v, "D"), "is related to itself by ‘p’");
    }

    #[test]
    fn bottom_filler_and_bottom_member() {
        let v = view(
            "ex:A rdfs:subClassOf [ owl:onProperty ex:p ; owl:allValuesFrom owl:Nothing ] .\n\
             ex:B rdfs:subClassOf [ owl:intersectionOf ( ex:Person owl:Nothing ) ] .\n\
             ex:Person rdfs:label \"Person\" .\n",
        );
        assert_eq!(render_superclass(&v, "A"), "only has ‘p’ values that are nothing");
        assert_eq!(render_superclass(&v, "B"), "Person");
    }

    #[test]
    fn enumeration_and_fallback() {
        let v = view(
            "ex:Colour rdfs:subClassOf [ owl:oneOf ( ex:red ex:green ex:blue ) ] .\n\
             ex:Either rdfs:subClassOf [ owl:unionOf ( ex:A ex:B ) ] .\n",
        );
        assert_eq!(render_superclass(&v, "Colour"), "one of red, green, or blue");
        assert_eq!(render_superclass(&v, "Either"), FALLBACK_PHRASE);
    }

    #[test]
    fn data_range_without_prefix_uses_local_name() {
        let v = view("");
        let r = Renderer::new(&v);
        let range = DataRange {
            datatype: "http://other.org/dt#Code".into(),
            facets: vec![Facet {
                kind: FacetKind::MaxLength,
                value: "8".into(),
            }],
        };
        assert_eq!(r.render(&Expression::DataRange(range)), "Code with length ≤ 8");
    }

    #[test]
    fn joins() {
        let parts: Vec<String> = ["A", "B", "C"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(join_all(&parts[..2]), "both A and B");
        assert_eq!(join_all(&parts), "all of A, B, and C");
        assert_eq!(join_and(&parts), "A, B, and C");
        assert_eq!(indefinite_article("Employee"), "an");
        assert_eq!(indefinite_article("Person"), "a");
    }
}
