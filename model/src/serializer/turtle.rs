//! Turtle 1.1 serializer.
//!
//! Output is deterministic for a given graph: prefixes sorted, subjects
//! grouped and sorted (IRIs before blank nodes, blank nodes in their
//! canonical order), `rdf:type` first among predicates, blank nodes
//! referenced exactly once written inline as `[ ... ]`, well-formed RDF
//! lists written as `( ... )`, and remaining blank nodes relabelled `_:b0`,
//! `_:b1`, ... in order of first appearance.

use std::collections::{BTreeSet, HashMap};

use super::order::BlankOrder;
use crate::graph::Graph;
use crate::model::{iris, Literal, Term};

const INDENT: &str = "    ";

/// Serializes a graph to a Turtle string.
#[must_use]
pub fn to_turtle(graph: &Graph) -> String {
    let mut out = String::with_capacity(64 * (graph.len() + 8));

    // Prefix declarations
    for (prefix, ns) in graph.prefixes().iter() {
        out.push_str(&format!("@prefix {prefix}: <{ns}> .\n"));
    }
    if !graph.prefixes().is_empty() {
        out.push('\n');
    }

    let order = BlankOrder::new(graph);
    let inline = inline_blanks(graph, &order);
    let mut writer = Writer {
        graph,
        inline: &inline,
        order: &order,
        labels: HashMap::new(),
    };

    let mut roots: Vec<&Term> = graph
        .subject_terms()
        .filter(|s| !inline.contains(*s))
        .collect();
    roots.sort_by_key(|s| order.key(*s));
    for subject in roots {
        let head = writer.subject(subject);
        out.push_str(&head);
        writer.predicate_list(subject, 1, &mut out);
        out.push_str(" .\n\n");
    }

    if out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Blank nodes that can be written inline at their single use site.
fn inline_blanks(graph: &Graph, order: &BlankOrder) -> BTreeSet<Term> {
    let mut inline: BTreeSet<Term> = graph
        .iter()
        .map(|t| t.object)
        .filter(|o| o.is_blank() && graph.object_occurrences(o) == 1)
        .collect();

    // A ring of blank nodes that only reference each other has no root to
    // hang from; demote one member at a time until every inline node is
    // reachable from a written subject.
    loop {
        let mut reached = BTreeSet::new();
        let mut stack: Vec<&Term> = graph
            .subject_terms()
            .filter(|s| !inline.contains(*s))
            .collect();
        while let Some(node) = stack.pop() {
            for (_, objects) in graph.predicate_objects(node) {
                for o in objects {
                    if inline.contains(o) && reached.insert(o.clone()) {
                        stack.push(o);
                    }
                }
            }
        }
        let orphan = inline
            .iter()
            .filter(|b| !reached.contains(*b))
            .min_by_key(|b| order.rank(b))
            .cloned();
        match orphan {
            Some(orphan) => {
                inline.remove(&orphan);
            }
            None => return inline,
        }
    }
}

struct Writer<'g> {
    graph: &'g Graph,
    inline: &'g BTreeSet<Term>,
    order: &'g BlankOrder,
    labels: HashMap<String, usize>,
}

impl Writer<'_> {
    fn subject(&mut self, term: &Term) -> String {
        self.term(term, 0)
    }

    fn predicate_list(&mut self, subject: &Term, depth: usize, out: &mut String) {
        let graph = self.graph;
        let type_pred = Term::iri(iris::RDF_TYPE);
        let mut groups: Vec<(&Term, &BTreeSet<Term>)> = graph.predicate_objects(subject).collect();
        groups.sort_by_key(|(p, _)| **p != type_pred);

        let indent = INDENT.repeat(depth);
        for (i, (predicate, objects)) in groups.into_iter().enumerate() {
            if i == 0 {
                out.push(if depth == 1 { ' ' } else { '\n' });
                if depth > 1 {
                    out.push_str(&indent);
                }
            } else {
                out.push_str(" ;\n");
                out.push_str(&indent);
            }
            if *predicate == type_pred {
                out.push('a');
            } else {
                out.push_str(&self.term(predicate, depth));
            }
            out.push(' ');
            let mut objects: Vec<&Term> = objects.iter().collect();
            objects.sort_by_key(|o| self.order.key(*o));
            let rendered: Vec<String> = objects.into_iter().map(|o| self.term(o, depth)).collect();
            out.push_str(&rendered.join(" , "));
        }
    }

    fn term(&mut self, term: &Term, depth: usize) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::Literal(lit) => self.literal(lit),
            Term::Blank(_) if self.inline.contains(term) => {
                if let Some(items) = self.list(term) {
                    let rendered: Vec<String> =
                        items.iter().map(|item| self.term(item, depth)).collect();
                    return format!("( {} )", rendered.join(" "));
                }
                let mut nested = String::from("[");
                self.predicate_list(term, depth + 1, &mut nested);
                if nested.len() == 1 {
                    return "[]".to_owned();
                }
                nested.push('\n');
                nested.push_str(&INDENT.repeat(depth));
                nested.push(']');
                nested
            }
            Term::Blank(label) => {
                let next = self.labels.len();
                let n = *self.labels.entry(label.clone()).or_insert(next);
                format!("_:b{n}")
            }
        }
    }

    fn iri(&self, iri: &str) -> String {
        self.graph
            .prefixes()
            .compact(iri)
            .unwrap_or_else(|| format!("<{iri}>"))
    }

    fn literal(&self, lit: &Literal) -> String {
        let mut s = turtle_string(&lit.lexical);
        if let Some(lang) = &lit.language {
            s.push('@');
            s.push_str(lang);
        } else if let Some(dt) = &lit.datatype {
            s.push_str("^^");
            s.push_str(&self.iri(dt));
        }
        s
    }

    /// Items of a well-formed list whose cells are all inline blank nodes
    /// carrying nothing but `rdf:first` / `rdf:rest`.
    fn list(&self, head: &Term) -> Option<Vec<Term>> {
        let items = self.graph.list_items(head)?;
        let mut cell = head.clone();
        while !cell.is(iris::RDF_NIL) {
            if !self.inline.contains(&cell) {
                return None;
            }
            let predicates: Vec<&Term> =
                self.graph.predicate_objects(&cell).map(|(p, _)| p).collect();
            let only_list_links = predicates.len() == 2
                && predicates
                    .iter()
                    .all(|p| p.is(iris::RDF_FIRST) || p.is(iris::RDF_REST));
            if !only_list_links {
                return None;
            }
            cell = self.graph.object(&cell, iris::RDF_REST)?.clone();
        }
        Some(items)
    }
}

/// Quotes a lexical form as a Turtle short string.
pub(crate) fn turtle_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}
