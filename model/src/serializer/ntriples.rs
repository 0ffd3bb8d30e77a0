//! N-Triples serializer.
//!
//! One triple per line, absolute IRIs, sorted with blank nodes in their
//! canonical order. Blank nodes are relabelled `_:b0`, `_:b1`, ... in order
//! of first appearance so the output does not depend on parser-assigned
//! labels.

use std::collections::HashMap;

use super::order::BlankOrder;
use crate::graph::Graph;
use crate::model::{Term, Triple};

/// Serializes a graph to an N-Triples string.
#[must_use]
pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::with_capacity(96 * graph.len());
    let order = BlankOrder::new(graph);
    let mut triples: Vec<Triple> = graph.iter().collect();
    triples.sort_by(|a, b| {
        (order.key(&a.subject), order.key(&a.predicate), order.key(&a.object)).cmp(&(
            order.key(&b.subject),
            order.key(&b.predicate),
            order.key(&b.object),
        ))
    });
    let mut labels: HashMap<String, usize> = HashMap::new();
    for t in &triples {
        out.push_str(&term(&t.subject, &mut labels));
        out.push(' ');
        out.push_str(&term(&t.predicate, &mut labels));
        out.push(' ');
        out.push_str(&term(&t.object, &mut labels));
        out.push_str(" .\n");
    }
    out
}

fn term(term: &Term, labels: &mut HashMap<String, usize>) -> String {
    match term {
        Term::Iri(iri) => format!("<{iri}>"),
        Term::Blank(label) => {
            let next = labels.len();
            let n = *labels.entry(label.clone()).or_insert(next);
            format!("_:b{n}")
        }
        Term::Literal(lit) => {
            let escaped = lit
                .lexical
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
                .replace('\r', "\\r");
            match (&lit.language, &lit.datatype) {
                (Some(lang), _) => format!("\"{escaped}\"@{lang}"),
                (None, Some(dt)) => format!("\"{escaped}\"^^<{dt}>"),
                (None, None) => format!("\"{escaped}\""),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::iris;
    use crate::parser::parse_ntriples;

    #[test]
    fn every_line_ends_with_period() {
        let mut g = Graph::new();
        g.add(
            Term::iri("http://ex.org/A"),
            Term::iri(iris::RDFS_LABEL),
            Term::plain("line one\nline \"two\""),
        );
        g.add(
            Term::blank("x"),
            Term::iri(iris::RDF_TYPE),
            Term::iri(iris::OWL_RESTRICTION),
        );
        let nt = to_ntriples(&g);
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
        assert!(nt.contains("_:b0 <"));
        assert_eq!(parse_ntriples(&nt).unwrap().len(), 2);
    }

    #[test]
    fn rewriting_own_output_is_stable_past_ten_blank_nodes() {
        let mut src = String::new();
        for i in 0..12 {
            src.push_str(&format!("<http://ex.org/s> <http://ex.org/p> _:n{i:02} .\n"));
            src.push_str(&format!("_:n{i:02} <http://ex.org/q> \"v{i}\" .\n"));
        }
        let first = to_ntriples(&parse_ntriples(&src).unwrap());
        let second = to_ntriples(&parse_ntriples(&first).unwrap());
        assert_eq!(first, second);
        let third = to_ntriples(&parse_ntriples(&second).unwrap());
        assert_eq!(second, third);
    }
}
