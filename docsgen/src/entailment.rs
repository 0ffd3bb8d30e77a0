//! Entailment adapter.
//!
//! The rest of the pipeline only sees the [`Reasoner`] trait and the
//! [`DerivedView`] it returns. [`RuleReasoner`] is the shipped engine: naive
//! forward chaining over a schema-level subset of the OWL 2 RL rules, run
//! until a round adds nothing.
//!
//! Rules applied each round:
//!
//! | Rule | Effect |
//! |------|--------|
//! | `scm-cls` | `C ⊑ C`, `C ≡ C`, `C ⊑ owl:Thing`, `owl:Nothing ⊑ C` for every `owl:Class` |
//! | `scm-sco` | `rdfs:subClassOf` is transitive |
//! | `scm-eqc1/2` | equivalence and mutual subsumption imply each other |
//! | `scm-op/dp` | `p ⊑ p`, `p ≡ p` for object and datatype properties |
//! | `scm-spo` | `rdfs:subPropertyOf` is transitive |
//! | `scm-eqp1/2` | property equivalence and mutual sub-property imply each other |
//! | `scm-dom1/2`, `scm-rng1/2` | domains and ranges propagate up classes and down properties |
//! | `scm-int`, `scm-uni` | intersections are below, unions above, their members |
//! | `cax-sco`, `prp-dom`, `prp-rng` | instance typing |
//! | `prp-spo1`, `prp-inv1/2`, `prp-symp`, `prp-trp` | instance-level property propagation |

use std::collections::BTreeSet;

use owl_docsgen_model::{iris, Graph, Term, Triple};
use tracing::debug;

use crate::error::ReasoningError;
use crate::view::DerivedView;

/// What the closure adds beyond the rule consequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureOptions {
    /// Type the OWL and RDFS vocabulary itself (`owl:Thing a owl:Class`, ...).
    pub axiomatic_triples: bool,
    /// Type every XSD datatype in use as `rdfs:Datatype` and relate the
    /// numeric and string derivation chains among them.
    pub datatype_axioms: bool,
    /// Rounds of rule application allowed before giving up.
    pub max_rounds: usize,
}

impl Default for ClosureOptions {
    fn default() -> Self {
        Self {
            axiomatic_triples: false,
            datatype_axioms: false,
            max_rounds: 64,
        }
    }
}

/// An entailment engine.
pub trait Reasoner {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Computes the derived view of `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ReasoningError`] when the engine fails or does not reach a
    /// fixed point.
    fn closure(
        &self,
        base: &Graph,
        options: &ClosureOptions,
    ) -> Result<DerivedView, ReasoningError>;
}

/// Forward-chaining engine over the rule table above.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleReasoner;

impl RuleReasoner {
    /// Creates the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Reasoner for RuleReasoner {
    fn name(&self) -> &str {
        "owl2-rl-schema"
    }

    fn closure(
        &self,
        base: &Graph,
        options: &ClosureOptions,
    ) -> Result<DerivedView, ReasoningError> {
        let mut working = base.clone();
        let mut entailed = Vec::new();

        let mut seed = Vec::new();
        if options.axiomatic_triples {
            seed.extend(axiomatic_triples());
        }
        if options.datatype_axioms {
            seed.extend(datatype_axioms(base));
        }
        for triple in seed {
            if working.insert(triple.clone()) {
                entailed.push(triple);
            }
        }

        let mut rounds = 0;
        loop {
            let fresh = apply_rules(&working);
            if fresh.is_empty() {
                break;
            }
            if rounds == options.max_rounds {
                return Err(ReasoningError::Diverged {
                    rounds,
                    triples: working.len(),
                });
            }
            rounds += 1;
            debug!(round = rounds, new = fresh.len(), "entailment round");
            for triple in fresh {
                working.insert(triple.clone());
                entailed.push(triple);
            }
        }

        debug!(rounds, entailed = entailed.len(), "entailment closure reached");
        Ok(DerivedView::from_entailments(base, entailed))
    }
}

fn iri(value: &str) -> Term {
    Term::iri(value)
}

/// One round: every consequence of the current graph that it lacks.
fn apply_rules(g: &Graph) -> BTreeSet<Triple> {
    let mut out = Consequences { graph: g, fresh: BTreeSet::new() };
    class_rules(&mut out);
    property_rules(&mut out);
    domain_range_rules(&mut out);
    set_rules(&mut out);
    instance_rules(&mut out);
    out.fresh
}

struct Consequences<'a> {
    graph: &'a Graph,
    fresh: BTreeSet<Triple>,
}

impl Consequences<'_> {
    fn add(&mut self, subject: &Term, predicate: &str, object: &Term) {
        let predicate = iri(predicate);
        if !self.graph.contains(subject, &predicate, object) {
            self.fresh
                .insert(Triple::new(subject.clone(), predicate, object.clone()));
        }
    }
}

fn pairs(g: &Graph, predicate: &str) -> Vec<(Term, Term)> {
    g.pairs(predicate)
        .map(|(s, o)| (s.clone(), o.clone()))
        .collect()
}

fn typed(g: &Graph, class: &str) -> Vec<Term> {
    g.subjects(iris::RDF_TYPE, &iri(class)).cloned().collect()
}

fn class_rules(out: &mut Consequences<'_>) {
    let g = out.graph;
    let thing = iri(iris::OWL_THING);
    let nothing = iri(iris::OWL_NOTHING);

    // scm-cls
    for c in typed(g, iris::OWL_CLASS) {
        out.add(&c, iris::RDFS_SUBCLASS_OF, &c);
        out.add(&c, iris::OWL_EQUIVALENT_CLASS, &c);
        out.add(&c, iris::RDFS_SUBCLASS_OF, &thing);
        out.add(&nothing, iris::RDFS_SUBCLASS_OF, &c);
    }

    let sub_class = pairs(g, iris::RDFS_SUBCLASS_OF);
    for (a, b) in &sub_class {
        // scm-sco
        for c in g.objects(b, iris::RDFS_SUBCLASS_OF) {
            out.add(a, iris::RDFS_SUBCLASS_OF, c);
        }
        // scm-eqc2
        if g.contains(b, &iri(iris::RDFS_SUBCLASS_OF), a) {
            out.add(a, iris::OWL_EQUIVALENT_CLASS, b);
        }
    }

    // scm-eqc1 and symmetry
    for (a, b) in pairs(g, iris::OWL_EQUIVALENT_CLASS) {
        out.add(&a, iris::RDFS_SUBCLASS_OF, &b);
        out.add(&b, iris::RDFS_SUBCLASS_OF, &a);
        out.add(&b, iris::OWL_EQUIVALENT_CLASS, &a);
    }
}

fn property_rules(out: &mut Consequences<'_>) {
    let g = out.graph;

    // scm-op, scm-dp
    for kind in [iris::OWL_OBJECT_PROPERTY, iris::OWL_DATATYPE_PROPERTY] {
        for p in typed(g, kind) {
            out.add(&p, iris::RDFS_SUBPROPERTY_OF, &p);
            out.add(&p, iris::OWL_EQUIVALENT_PROPERTY, &p);
        }
    }

    for (p, q) in pairs(g, iris::RDFS_SUBPROPERTY_OF) {
        // scm-spo
        for r in g.objects(&q, iris::RDFS_SUBPROPERTY_OF) {
            out.add(&p, iris::RDFS_SUBPROPERTY_OF, r);
        }
        // scm-eqp2
        if g.contains(&q, &iri(iris::RDFS_SUBPROPERTY_OF), &p) {
            out.add(&p, iris::OWL_EQUIVALENT_PROPERTY, &q);
        }
    }

    // scm-eqp1 and symmetry
    for (p, q) in pairs(g, iris::OWL_EQUIVALENT_PROPERTY) {
        out.add(&p, iris::RDFS_SUBPROPERTY_OF, &q);
        out.add(&q, iris::RDFS_SUBPROPERTY_OF, &p);
        out.add(&q, iris::OWL_EQUIVALENT_PROPERTY, &p);
    }

    for (p, q) in pairs(g, iris::OWL_INVERSE_OF) {
        out.add(&q, iris::OWL_INVERSE_OF, &p);
    }
}

fn domain_range_rules(out: &mut Consequences<'_>) {
    let g = out.graph;
    for predicate in [iris::RDFS_DOMAIN, iris::RDFS_RANGE] {
        for (p, c) in pairs(g, predicate) {
            // scm-dom1, scm-rng1
            for d in g.objects(&c, iris::RDFS_SUBCLASS_OF) {
                out.add(&p, predicate, d);
            }
            // scm-dom2, scm-rng2
            for q in g.subjects(iris::RDFS_SUBPROPERTY_OF, &p) {
                out.add(q, predicate, &c);
            }
        }
    }
}

fn set_rules(out: &mut Consequences<'_>) {
    let g = out.graph;
    // scm-int
    for (c, head) in pairs(g, iris::OWL_INTERSECTION_OF) {
        for member in g.list_items(&head).unwrap_or_default() {
            out.add(&c, iris::RDFS_SUBCLASS_OF, &member);
        }
    }
    // scm-uni
    for (c, head) in pairs(g, iris::OWL_UNION_OF) {
        for member in g.list_items(&head).unwrap_or_default() {
            out.add(&member, iris::RDFS_SUBCLASS_OF, &c);
        }
    }
}

fn instance_rules(out: &mut Consequences<'_>) {
    let g = out.graph;

    // cax-sco
    for (x, c) in pairs(g, iris::RDF_TYPE) {
        for d in g.objects(&c, iris::RDFS_SUBCLASS_OF) {
            out.add(&x, iris::RDF_TYPE, d);
        }
    }

    // prp-dom, prp-rng
    for (p, c) in pairs(g, iris::RDFS_DOMAIN) {
        let Some(p_iri) = p.as_iri() else { continue };
        for (x, _) in g.pairs(p_iri) {
            out.add(x, iris::RDF_TYPE, &c);
        }
    }
    for (p, c) in pairs(g, iris::RDFS_RANGE) {
        let Some(p_iri) = p.as_iri() else { continue };
        for (_, y) in g.pairs(p_iri) {
            if y.as_literal().is_none() {
                out.add(y, iris::RDF_TYPE, &c);
            }
        }
    }

    // prp-spo1
    for (p, q) in pairs(g, iris::RDFS_SUBPROPERTY_OF) {
        if p == q {
            continue;
        }
        let (Some(p_iri), Some(q_iri)) = (p.as_iri(), q.as_iri()) else {
            continue;
        };
        for (x, y) in g.pairs(p_iri) {
            out.add(x, q_iri, y);
        }
    }

    // prp-inv1, prp-inv2
    for (p, q) in pairs(g, iris::OWL_INVERSE_OF) {
        let (Some(p_iri), Some(q_iri)) = (p.as_iri(), q.as_iri()) else {
            continue;
        };
        for (x, y) in g.pairs(p_iri) {
            if y.as_literal().is_none() {
                out.add(y, q_iri, x);
            }
        }
    }

    // prp-symp
    for p in typed(g, iris::OWL_SYMMETRIC_PROPERTY) {
        let Some(p_iri) = p.as_iri() else { continue };
        for (x, y) in g.pairs(p_iri) {
            if y.as_literal().is_none() {
                out.add(y, p_iri, x);
            }
        }
    }

    // prp-trp
    for p in typed(g, iris::OWL_TRANSITIVE_PROPERTY) {
        let Some(p_iri) = p.as_iri() else { continue };
        for (x, y) in g.pairs(p_iri) {
            for z in g.objects(y, p_iri) {
                out.add(x, p_iri, z);
            }
        }
    }
}

fn axiomatic_triples() -> Vec<Triple> {
    let rdf_type = iri(iris::RDF_TYPE);
    let mut out = Vec::new();
    for class in [iris::OWL_THING, iris::OWL_NOTHING] {
        out.push(Triple::new(iri(class), rdf_type.clone(), iri(iris::OWL_CLASS)));
    }
    for property in [iris::OWL_TOP_OBJECT_PROPERTY, iris::OWL_BOTTOM_OBJECT_PROPERTY] {
        out.push(Triple::new(iri(property), rdf_type.clone(), iri(iris::OWL_OBJECT_PROPERTY)));
    }
    for property in [iris::OWL_TOP_DATA_PROPERTY, iris::OWL_BOTTOM_DATA_PROPERTY] {
        out.push(Triple::new(iri(property), rdf_type.clone(), iri(iris::OWL_DATATYPE_PROPERTY)));
    }
    for property in [
        iris::RDF_TYPE,
        iris::RDFS_SUBCLASS_OF,
        iris::RDFS_SUBPROPERTY_OF,
        iris::RDFS_DOMAIN,
        iris::RDFS_RANGE,
        iris::OWL_EQUIVALENT_CLASS,
        iris::OWL_EQUIVALENT_PROPERTY,
        iris::OWL_INVERSE_OF,
    ] {
        out.push(Triple::new(iri(property), rdf_type.clone(), iri(iris::RDF_PROPERTY)));
    }
    for property in [iris::RDFS_LABEL, iris::SKOS_DEFINITION, iris::SKOS_SCOPE_NOTE] {
        out.push(Triple::new(iri(property), rdf_type.clone(), iri(iris::OWL_ANNOTATION_PROPERTY)));
    }
    out
}

/// Direct derivations among the built-in XSD types.
const XSD_DERIVATIONS: &[(&str, &str)] = &[
    ("integer", "decimal"),
    ("nonNegativeInteger", "integer"),
    ("positiveInteger", "nonNegativeInteger"),
    ("nonPositiveInteger", "integer"),
    ("negativeInteger", "nonPositiveInteger"),
    ("long", "integer"),
    ("int", "long"),
    ("short", "int"),
    ("byte", "short"),
    ("unsignedLong", "nonNegativeInteger"),
    ("unsignedInt", "unsignedLong"),
    ("unsignedShort", "unsignedInt"),
    ("unsignedByte", "unsignedShort"),
    ("normalizedString", "string"),
    ("token", "normalizedString"),
    ("dateTimeStamp", "dateTime"),
];

fn xsd_parent(local: &str) -> Option<&'static str> {
    XSD_DERIVATIONS
        .iter()
        .find(|(sub, _)| *sub == local)
        .map(|(_, sup)| *sup)
}

fn datatype_axioms(g: &Graph) -> Vec<Triple> {
    let mut used = BTreeSet::new();
    for triple in g.iter() {
        match &triple.object {
            Term::Iri(o) if o.starts_with(iris::XSD) => {
                used.insert(o.clone());
            }
            Term::Literal(lit) => {
                if let Some(dt) = lit.datatype.as_ref().filter(|dt| dt.starts_with(iris::XSD)) {
                    used.insert(dt.clone());
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    for dt in &used {
        out.push(Triple::new(iri(dt), iri(iris::RDF_TYPE), iri(iris::RDFS_DATATYPE)));
        let mut cursor = &dt[iris::XSD.len()..];
        while let Some(parent) = xsd_parent(cursor) {
            let parent_iri = format!("{}{parent}", iris::XSD);
            if used.contains(&parent_iri) {
                out.push(Triple::new(iri(dt), iri(iris::RDFS_SUBCLASS_OF), iri(&parent_iri)));
            }
            cursor = parent;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use owl_docsgen_model::parser::parse_turtle;

    fn view(src: &str, options: &ClosureOptions) -> DerivedView {
        let base = parse_turtle(src).unwrap();
        RuleReasoner::new().closure(&base, options).unwrap()
    }

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://ex.org/{local}"))
    }

    const PREFIXES: &str = "@prefix ex: <http://ex.org/> .\n\
        @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n";

    #[test]
    fn subclass_chain_is_closed() {
        let v = view(
            &format!(
                "{PREFIXES}ex:A a owl:Class ; rdfs:subClassOf ex:B .\n\
                 ex:B a owl:Class ; rdfs:subClassOf ex:C .\n\
                 ex:C a owl:Class ; rdfs:subClassOf ex:D .\n"
            ),
            &ClosureOptions::default(),
        );
        let g = v.graph();
        assert!(g.has(&ex("A"), iris::RDFS_SUBCLASS_OF, "http://ex.org/D"));
        assert!(g.has(&ex("A"), iris::RDFS_SUBCLASS_OF, iris::OWL_THING));
        assert!(g.has(&ex("A"), iris::RDFS_SUBCLASS_OF, "http://ex.org/A"));
    }

    #[test]
    fn equivalence_is_symmetric_and_implies_subsumption() {
        let v = view(
            &format!("{PREFIXES}ex:A a owl:Class ; owl:equivalentClass ex:B .\n"),
            &ClosureOptions::default(),
        );
        let g = v.graph();
        assert!(g.has(&ex("B"), iris::OWL_EQUIVALENT_CLASS, "http://ex.org/A"));
        assert!(g.has(&ex("B"), iris::RDFS_SUBCLASS_OF, "http://ex.org/A"));
    }

    #[test]
    fn ranges_flow_down_sub_properties() {
        let v = view(
            &format!(
                "{PREFIXES}ex:hasColleague a owl:ObjectProperty ; rdfs:subPropertyOf ex:hasSocialRelation .\n\
                 ex:hasSocialRelation a owl:ObjectProperty ; rdfs:range ex:Person .\n"
            ),
            &ClosureOptions::default(),
        );
        assert!(v
            .graph()
            .has(&ex("hasColleague"), iris::RDFS_RANGE, "http://ex.org/Person"));
    }

    #[test]
    fn instance_rules_type_individuals() {
        let v = view(
            &format!(
                "{PREFIXES}ex:knows a owl:ObjectProperty, owl:SymmetricProperty ; rdfs:domain ex:Person .\n\
                 ex:alice ex:knows ex:bob .\n"
            ),
            &ClosureOptions::default(),
        );
        let g = v.graph();
        assert!(g.has(&ex("bob"), "http://ex.org/knows", "http://ex.org/alice"));
        assert!(g.has(&ex("bob"), iris::RDF_TYPE, "http://ex.org/Person"));
    }

    #[test]
    fn optional_axioms_only_when_asked() {
        let src = format!(
            "{PREFIXES}ex:age a owl:DatatypeProperty ; rdfs:range xsd:integer .\nex:x ex:v 1.5 .\n"
        );
        let plain = view(&src, &ClosureOptions::default());
        assert!(!plain.is_a(iris::XSD_INTEGER, iris::RDFS_DATATYPE));
        assert!(!plain.is_a(iris::OWL_THING, iris::OWL_CLASS));

        let rich = view(
            &src,
            &ClosureOptions {
                axiomatic_triples: true,
                datatype_axioms: true,
                ..ClosureOptions::default()
            },
        );
        assert!(rich.is_a(iris::XSD_INTEGER, iris::RDFS_DATATYPE));
        assert!(rich.is_a(iris::OWL_THING, iris::OWL_CLASS));
        assert!(rich
            .graph()
            .has(&Term::iri(iris::XSD_INTEGER), iris::RDFS_SUBCLASS_OF, iris::XSD_DECIMAL));
    }

    #[test]
    fn round_limit_reports_divergence() {
        let base = parse_turtle(&format!(
            "{PREFIXES}ex:A rdfs:subClassOf ex:B . ex:B rdfs:subClassOf ex:C . ex:C rdfs:subClassOf ex:D .\n"
        ))
        .unwrap();
        let options = ClosureOptions {
            max_rounds: 0,
            ..ClosureOptions::default()
        };
        let err = RuleReasoner::new().closure(&base, &options).unwrap_err();
        assert!(matches!(err, ReasoningError::Diverged { rounds: 0, .. }));
    }
}
