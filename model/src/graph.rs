//! Indexed in-memory triple graph.
//!
//! Two ordered indexes are kept in step: subject → predicate → objects and
//! predicate → object → subjects. Every lookup the pipeline needs is a
//! prefix walk on one of them, and every iteration order is stable.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{iris, Term, Triple};
use crate::prefix::PrefixMap;

type Index = BTreeMap<Term, BTreeMap<Term, BTreeSet<Term>>>;

/// A set of triples plus the prefix table of the document it came from.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    spo: Index,
    pos: Index,
    len: usize,
    prefixes: PrefixMap,
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.spo == other.spo
    }
}

impl Eq for Graph {}

impl Graph {
    /// Creates an empty graph with the well-known prefixes bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefixes(PrefixMap::well_known())
    }

    /// Creates an empty graph with the given prefix table.
    #[must_use]
    pub fn with_prefixes(prefixes: PrefixMap) -> Self {
        Self {
            prefixes,
            ..Self::default()
        }
    }

    /// The prefix table.
    #[must_use]
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Mutable access to the prefix table.
    pub fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a triple. Returns false when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let Triple {
            subject,
            predicate,
            object,
        } = triple;
        let added = self
            .spo
            .entry(subject.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(object.clone());
        if added {
            self.pos
                .entry(predicate)
                .or_default()
                .entry(object)
                .or_default()
                .insert(subject);
            self.len += 1;
        }
        added
    }

    /// Inserts a triple built from three terms.
    pub fn add(&mut self, subject: Term, predicate: Term, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Removes a triple. Returns false when it was absent.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let removed =
            remove_nested(&mut self.spo, &triple.subject, &triple.predicate, &triple.object);
        if removed {
            remove_nested(&mut self.pos, &triple.predicate, &triple.object, &triple.subject);
            self.len -= 1;
        }
        removed
    }

    /// Inserts every triple of `other`. Returns how many were new.
    pub fn extend_from(&mut self, other: &Graph) -> usize {
        other.iter().filter(|t| self.insert(t.clone())).count()
    }

    /// Returns true when the triple is present.
    #[must_use]
    pub fn contains(&self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        self.spo
            .get(subject)
            .and_then(|by_p| by_p.get(predicate))
            .is_some_and(|objects| objects.contains(object))
    }

    /// Returns true when `subject predicate object` holds for IRI predicate
    /// and object.
    #[must_use]
    pub fn has(&self, subject: &Term, predicate: &str, object: &str) -> bool {
        self.contains(subject, &Term::iri(predicate), &Term::iri(object))
    }

    /// Objects of `subject predicate ?o`, in term order.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.spo
            .get(subject)
            .and_then(|by_p| by_p.get(&Term::iri(predicate)))
            .into_iter()
            .flatten()
    }

    /// The first object of `subject predicate ?o`, in term order.
    #[must_use]
    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    /// Subjects of `?s predicate object`, in term order.
    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.pos
            .get(&Term::iri(predicate))
            .and_then(|by_o| by_o.get(object))
            .into_iter()
            .flatten()
    }

    /// All `(subject, object)` pairs for a predicate, ordered by object then
    /// subject.
    pub fn pairs<'a>(&'a self, predicate: &str) -> impl Iterator<Item = (&'a Term, &'a Term)> + 'a {
        self.pos
            .get(&Term::iri(predicate))
            .into_iter()
            .flat_map(|by_o| by_o.iter())
            .flat_map(|(o, subjects)| subjects.iter().map(move |s| (s, o)))
    }

    /// Named subjects typed `rdf:type class`.
    pub fn instances_of<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.subjects(iris::RDF_TYPE, &Term::iri(class))
            .filter_map(Term::as_iri)
    }

    /// Predicates and objects of a subject, grouped by predicate.
    pub fn predicate_objects<'a>(
        &'a self,
        subject: &Term,
    ) -> impl Iterator<Item = (&'a Term, &'a BTreeSet<Term>)> + 'a {
        self.spo.get(subject).into_iter().flat_map(|by_p| by_p.iter())
    }

    /// All subjects, in term order.
    pub fn subject_terms(&self) -> impl Iterator<Item = &Term> {
        self.spo.keys()
    }

    /// All triples, ordered by subject, predicate, object.
    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.spo.iter().flat_map(|(s, by_p)| {
            by_p.iter().flat_map(move |(p, objects)| {
                objects
                    .iter()
                    .map(move |o| Triple::new(s.clone(), p.clone(), o.clone()))
            })
        })
    }

    /// How many triples use `term` as their object.
    #[must_use]
    pub fn object_occurrences(&self, term: &Term) -> usize {
        self.pos
            .values()
            .filter_map(|by_o| by_o.get(term))
            .map(BTreeSet::len)
            .sum()
    }

    /// Walks an `rdf:List` starting at `head`.
    ///
    /// Returns `None` when the list is malformed: a node without exactly one
    /// `rdf:first`, a missing `rdf:rest`, or a cycle back into the list.
    #[must_use]
    pub fn list_items(&self, head: &Term) -> Option<Vec<Term>> {
        let mut items = Vec::new();
        let mut seen = BTreeSet::new();
        let mut cursor = head.clone();
        while !cursor.is(iris::RDF_NIL) {
            if !seen.insert(cursor.clone()) {
                return None;
            }
            let mut firsts = self.objects(&cursor, iris::RDF_FIRST);
            let first = firsts.next()?;
            if firsts.next().is_some() {
                return None;
            }
            items.push(first.clone());
            cursor = self.object(&cursor, iris::RDF_REST)?.clone();
        }
        Some(items)
    }
}

fn remove_nested(index: &mut Index, a: &Term, b: &Term, c: &Term) -> bool {
    let Some(by_b) = index.get_mut(a) else {
        return false;
    };
    let Some(set) = by_b.get_mut(b) else {
        return false;
    };
    let removed = set.remove(c);
    if set.is_empty() {
        by_b.remove(b);
    }
    if by_b.is_empty() {
        index.remove(a);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://ex.org/{local}"))
    }

    #[test]
    fn insert_and_remove_keep_indexes_in_step() {
        let mut g = Graph::new();
        let sub = Term::iri(iris::RDFS_SUBCLASS_OF);
        assert!(g.add(ex("Child"), sub.clone(), ex("Person")));
        assert!(!g.add(ex("Child"), sub.clone(), ex("Person")));
        assert_eq!(g.len(), 1);
        assert_eq!(g.subjects(iris::RDFS_SUBCLASS_OF, &ex("Person")).count(), 1);

        assert!(g.remove(&Triple::new(ex("Child"), sub, ex("Person"))));
        assert!(g.is_empty());
        assert_eq!(g.subjects(iris::RDFS_SUBCLASS_OF, &ex("Person")).count(), 0);
    }

    #[test]
    fn walks_well_formed_lists() {
        let mut g = Graph::new();
        let first = Term::iri(iris::RDF_FIRST);
        let rest = Term::iri(iris::RDF_REST);
        g.add(Term::blank("l0"), first.clone(), ex("A"));
        g.add(Term::blank("l0"), rest.clone(), Term::blank("l1"));
        g.add(Term::blank("l1"), first, ex("B"));
        g.add(Term::blank("l1"), rest, Term::iri(iris::RDF_NIL));
        assert_eq!(g.list_items(&Term::blank("l0")), Some(vec![ex("A"), ex("B")]));
    }

    #[test]
    fn rejects_cyclic_lists() {
        let mut g = Graph::new();
        g.add(Term::blank("l0"), Term::iri(iris::RDF_FIRST), ex("A"));
        g.add(Term::blank("l0"), Term::iri(iris::RDF_REST), Term::blank("l0"));
        assert_eq!(g.list_items(&Term::blank("l0")), None);
    }

    #[test]
    fn equality_ignores_prefixes() {
        let mut a = Graph::new();
        let mut b = Graph::with_prefixes(PrefixMap::new());
        a.add(ex("A"), Term::iri(iris::RDF_TYPE), Term::iri(iris::OWL_CLASS));
        b.add(ex("A"), Term::iri(iris::RDF_TYPE), Term::iri(iris::OWL_CLASS));
        assert_eq!(a, b);
    }
}
