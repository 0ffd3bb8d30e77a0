//! Label-independent ordering of blank nodes.
//!
//! The graph indexes sort blank nodes by their document label, which changes
//! whenever a file is written and read back (`_:b10` sorts before `_:b2`).
//! The serializers order terms through [`BlankOrder`] instead: blank nodes
//! are ranked by first appearance in a walk from the IRI subjects, with
//! siblings under one predicate ordered by a structural fingerprint. Blank
//! nodes no IRI reaches come last, by fingerprint.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::graph::Graph;
use crate::model::{Literal, Term};

/// Sort key for a term: IRIs, then blank nodes by rank, then literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum TermKey<'a> {
    Iri(&'a str),
    Blank(usize),
    Literal(&'a Literal),
}

/// Canonical ranks for the blank nodes of one graph.
#[derive(Debug, Default)]
pub(crate) struct BlankOrder {
    rank: HashMap<Term, usize>,
}

impl BlankOrder {
    pub(crate) fn new(graph: &Graph) -> Self {
        let mut blanks: BTreeSet<&Term> = BTreeSet::new();
        for subject in graph.subject_terms() {
            if subject.is_blank() {
                blanks.insert(subject);
            }
            for (_, objects) in graph.predicate_objects(subject) {
                blanks.extend(objects.iter().filter(|o| o.is_blank()));
            }
        }
        if blanks.is_empty() {
            return Self::default();
        }

        let mut fingerprints = Fingerprints::new(graph);
        let fingerprint: HashMap<&Term, u64> = blanks
            .iter()
            .map(|b| (*b, fingerprints.with_context(b)))
            .collect();

        let mut order = Self::default();
        let roots = graph.subject_terms().filter(|s| s.is_iri());
        for root in roots {
            order.walk(graph, root, &fingerprint);
        }
        let mut rest: Vec<&Term> = blanks
            .iter()
            .copied()
            .filter(|b| !order.rank.contains_key(*b))
            .collect();
        rest.sort_by_key(|b| (fingerprint[b], *b));
        for blank in rest {
            if !order.rank.contains_key(blank) {
                order.assign(blank);
                order.walk(graph, blank, &fingerprint);
            }
        }
        order
    }

    fn assign(&mut self, blank: &Term) {
        let next = self.rank.len();
        self.rank.entry(blank.clone()).or_insert(next);
    }

    /// Ranks the unranked blank nodes reachable from `from`, siblings before
    /// their children.
    fn walk(&mut self, graph: &Graph, from: &Term, fingerprint: &HashMap<&Term, u64>) {
        let mut stack: Vec<Term> = vec![from.clone()];
        while let Some(node) = stack.pop() {
            let mut children: Vec<&Term> = Vec::new();
            for (_, objects) in graph.predicate_objects(&node) {
                let mut blanks: Vec<&Term> = objects
                    .iter()
                    .filter(|o| o.is_blank() && !self.rank.contains_key(*o))
                    .collect();
                blanks.sort_by_key(|b| (fingerprint.get(b).copied().unwrap_or_default(), *b));
                children.extend(blanks);
            }
            let mut fresh: Vec<Term> = Vec::new();
            for child in children {
                if !self.rank.contains_key(child) {
                    self.assign(child);
                    fresh.push(child.clone());
                }
            }
            stack.extend(fresh.into_iter().rev());
        }
    }

    /// Rank of a blank node; unknown terms sort last.
    pub(crate) fn rank(&self, term: &Term) -> usize {
        self.rank.get(term).copied().unwrap_or(usize::MAX)
    }

    pub(crate) fn key<'a>(&self, term: &'a Term) -> TermKey<'a> {
        match term {
            Term::Iri(iri) => TermKey::Iri(iri),
            Term::Blank(_) => TermKey::Blank(self.rank(term)),
            Term::Literal(lit) => TermKey::Literal(lit),
        }
    }
}

/// Memoised content hashes of blank nodes.
struct Fingerprints<'g> {
    graph: &'g Graph,
    incoming: HashMap<&'g Term, Vec<(&'g Term, &'g Term)>>,
    content: HashMap<Term, u64>,
    on_path: HashSet<Term>,
}

impl<'g> Fingerprints<'g> {
    fn new(graph: &'g Graph) -> Self {
        let mut incoming: HashMap<&'g Term, Vec<(&'g Term, &'g Term)>> = HashMap::new();
        for subject in graph.subject_terms() {
            for (predicate, objects) in graph.predicate_objects(subject) {
                for object in objects.iter().filter(|o| o.is_blank()) {
                    incoming.entry(object).or_default().push((subject, predicate));
                }
            }
        }
        Self {
            graph,
            incoming,
            content: HashMap::new(),
            on_path: HashSet::new(),
        }
    }

    /// Hash of everything reachable below a blank node. A node met again on
    /// the current path hashes as a fixed marker.
    fn content(&mut self, node: &Term) -> u64 {
        if let Some(hash) = self.content.get(node) {
            return *hash;
        }
        if !self.on_path.insert(node.clone()) {
            return 0;
        }
        let graph = self.graph;
        let mut edges: Vec<(String, String)> = Vec::new();
        for (predicate, objects) in graph.predicate_objects(node) {
            for object in objects {
                edges.push((self.text(predicate), self.text(object)));
            }
        }
        edges.sort();
        self.on_path.remove(node);
        let hash = hash_of(&edges);
        self.content.insert(node.clone(), hash);
        hash
    }

    /// Content hash plus the statements pointing at the node, so that two
    /// blank nodes with equal content but different parents still differ.
    fn with_context(&mut self, node: &Term) -> u64 {
        let content = self.content(node);
        let parents = self.incoming.get(node).cloned().unwrap_or_default();
        let mut incoming: Vec<(String, String)> = parents
            .into_iter()
            .map(|(subject, predicate)| (self.text(subject), self.text(predicate)))
            .collect();
        incoming.sort();
        hash_of(&(content, incoming))
    }

    fn text(&mut self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => format!("<{iri}>"),
            Term::Literal(lit) => format!("{lit:?}"),
            Term::Blank(_) => format!("_:{:016x}", self.content(term)),
        }
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
