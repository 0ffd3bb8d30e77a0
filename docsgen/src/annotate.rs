//! The annotation writer: the only code that changes the base graph.

use owl_docsgen_model::{iris, Literal, Term, Triple};
use tracing::debug;

use crate::tag::{classify, AutogenTag, Provenance};
use crate::view::BaseGraph;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing existed; the new literal was added.
    Inserted,
    /// Current-scheme literals were replaced.
    Replaced,
    /// Legacy literals were replaced by a current-scheme one.
    Migrated,
    /// The only generated literal already had the new text.
    Unchanged,
    /// Only author text exists; nothing was written.
    Protected,
}

/// Writes generated literals into a [`BaseGraph`].
#[derive(Debug)]
pub struct Annotator<'a> {
    base: &'a mut BaseGraph,
}

fn provenance(term: &Term) -> Provenance {
    match term {
        Term::Literal(lit) => classify(&lit.lexical),
        _ => Provenance::Author,
    }
}

impl<'a> Annotator<'a> {
    /// Borrows the base graph for writing.
    pub fn new(base: &'a mut BaseGraph) -> Self {
        Self { base }
    }

    /// Read access to the graph being written.
    #[must_use]
    pub fn base(&self) -> &BaseGraph {
        &*self.base
    }

    /// Writes `body` stamped with `tag` as the `predicate` value of `entity`.
    ///
    /// Author literals are never touched. When only author literals exist
    /// nothing is written. Every generated or legacy literal is otherwise
    /// replaced by the single new one; author literals alongside them stay.
    pub fn upsert(
        &mut self,
        entity: &str,
        predicate: &str,
        body: &str,
        tag: &AutogenTag,
    ) -> WriteOutcome {
        let subject = Term::iri(entity);
        let pred = Term::iri(predicate);
        let new_object = Term::Literal(Literal::plain(tag.stamp(body)));

        let mut replaceable = Vec::new();
        let mut authored = 0usize;
        let mut legacy = false;
        for object in self.base.graph().objects(&subject, predicate) {
            match provenance(object) {
                Provenance::Author => authored += 1,
                Provenance::Generated => replaceable.push(object.clone()),
                Provenance::Legacy => {
                    legacy = true;
                    replaceable.push(object.clone());
                }
            }
        }

        let outcome = if replaceable.is_empty() {
            if authored > 0 {
                WriteOutcome::Protected
            } else {
                self.base.insert(Triple::new(subject, pred, new_object));
                WriteOutcome::Inserted
            }
        } else if replaceable.len() == 1 && replaceable[0] == new_object {
            WriteOutcome::Unchanged
        } else {
            for old in replaceable {
                self.base.remove(&Triple::new(subject.clone(), pred.clone(), old));
            }
            self.base.insert(Triple::new(subject, pred, new_object));
            if legacy {
                WriteOutcome::Migrated
            } else {
                WriteOutcome::Replaced
            }
        };
        debug!(entity, predicate, ?outcome, "upsert");
        outcome
    }

    /// Removes every generated or legacy `predicate` literal of `entity`.
    /// Returns how many were removed.
    pub fn retract(&mut self, entity: &str, predicate: &str) -> usize {
        let subject = Term::iri(entity);
        let pred = Term::iri(predicate);
        let stale: Vec<Term> = self
            .base
            .graph()
            .objects(&subject, predicate)
            .filter(|o| provenance(o).is_replaceable())
            .cloned()
            .collect();
        let removed = stale
            .into_iter()
            .filter(|old| {
                self.base
                    .remove(&Triple::new(subject.clone(), pred.clone(), old.clone()))
            })
            .count();
        if removed > 0 {
            debug!(entity, predicate, removed, "retracted stale literals");
        }
        removed
    }

    /// Adds an `rdfs:label` unless one already exists in `lang` (untagged
    /// when `None`).
    pub fn add_label_if_absent(
        &mut self,
        entity: &str,
        text: &str,
        lang: Option<&str>,
    ) -> WriteOutcome {
        let subject = Term::iri(entity);
        let wanted = lang.map(str::to_ascii_lowercase);
        let exists = self
            .base
            .graph()
            .objects(&subject, iris::RDFS_LABEL)
            .filter_map(Term::as_literal)
            .any(|lit| lit.is_string() && lit.language == wanted);
        if exists {
            return WriteOutcome::Protected;
        }
        let literal = match lang {
            Some(tag) => Literal::lang(text, tag),
            None => Literal::plain(text),
        };
        self.base.insert(Triple::new(
            subject,
            Term::iri(iris::RDFS_LABEL),
            Term::Literal(literal),
        ));
        WriteOutcome::Inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use owl_docsgen_model::Graph;

    const E: &str = "http://ex.org/Child";

    fn tag(day: u32) -> AutogenTag {
        AutogenTag::new(NaiveDate::from_ymd_opt(2025, 1, day).unwrap())
    }

    fn literals(base: &BaseGraph) -> Vec<String> {
        base.graph()
            .objects(&Term::iri(E), iris::SKOS_DEFINITION)
            .filter_map(Term::as_literal)
            .map(|l| l.lexical.clone())
            .collect()
    }

    fn with_literals(texts: &[&str]) -> BaseGraph {
        let mut g = Graph::new();
        for text in texts {
            g.add(Term::iri(E), Term::iri(iris::SKOS_DEFINITION), Term::plain(*text));
        }
        BaseGraph::new(g)
    }

    #[test]
    fn inserts_then_is_unchanged_then_replaces() {
        let mut base = BaseGraph::default();
        let mut w = Annotator::new(&mut base);
        assert_eq!(w.upsert(E, iris::SKOS_DEFINITION, "Body.", &tag(1)), WriteOutcome::Inserted);
        assert_eq!(w.upsert(E, iris::SKOS_DEFINITION, "Body.", &tag(1)), WriteOutcome::Unchanged);
        assert_eq!(w.upsert(E, iris::SKOS_DEFINITION, "Body.", &tag(2)), WriteOutcome::Replaced);
        assert_eq!(literals(&base), vec!["Body. ⟦AUTOGEN:P1:2025-01-02⟧".to_owned()]);
    }

    #[test]
    fn author_text_is_protected() {
        let mut base = with_literals(&["Hand written."]);
        let outcome = Annotator::new(&mut base).upsert(E, iris::SKOS_DEFINITION, "Body.", &tag(1));
        assert_eq!(outcome, WriteOutcome::Protected);
        assert_eq!(literals(&base), vec!["Hand written.".to_owned()]);
    }

    #[test]
    fn legacy_literal_is_migrated() {
        let mut base = with_literals(&["Old. Auto generated comment 2022-02-02"]);
        let outcome = Annotator::new(&mut base).upsert(E, iris::SKOS_DEFINITION, "Body.", &tag(1));
        assert_eq!(outcome, WriteOutcome::Migrated);
        assert_eq!(literals(&base), vec!["Body. ⟦AUTOGEN:P1:2025-01-01⟧".to_owned()]);
    }

    #[test]
    fn mixed_literals_keep_author_and_replace_tagged() {
        let mut base = with_literals(&["Hand written.", "Old. ⟦AUTOGEN:P1:2024-01-01⟧"]);
        let outcome = Annotator::new(&mut base).upsert(E, iris::SKOS_DEFINITION, "New.", &tag(1));
        assert_eq!(outcome, WriteOutcome::Replaced);
        let mut got = literals(&base);
        got.sort();
        assert_eq!(
            got,
            vec!["Hand written.".to_owned(), "New. ⟦AUTOGEN:P1:2025-01-01⟧".to_owned()]
        );
    }

    #[test]
    fn retract_leaves_author_text() {
        let mut base = with_literals(&["Hand written."]);
        let mut w = Annotator::new(&mut base);
        assert_eq!(w.retract(E, iris::SKOS_DEFINITION), 0);
        assert_eq!(w.upsert(E, iris::SKOS_SCOPE_NOTE, "Note.", &tag(1)), WriteOutcome::Inserted);
        assert_eq!(w.retract(E, iris::SKOS_SCOPE_NOTE), 1);
        assert_eq!(literals(&base).len(), 1);
    }

    #[test]
    fn labels_are_per_language() {
        let mut base = BaseGraph::default();
        let mut w = Annotator::new(&mut base);
        assert_eq!(w.add_label_if_absent(E, "Child", None), WriteOutcome::Inserted);
        assert_eq!(w.add_label_if_absent(E, "Child", None), WriteOutcome::Protected);
        assert_eq!(w.add_label_if_absent(E, "Child", Some("en")), WriteOutcome::Inserted);
        assert_eq!(base.graph().objects(&Term::iri(E), iris::RDFS_LABEL).count(), 2);
    }
}
