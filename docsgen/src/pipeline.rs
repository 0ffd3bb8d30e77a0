//! Run orchestration.
//!
//! [`Pipeline::annotate`] is the in-memory core: label pass, closure, then
//! every generator in a fixed order, all writing through one [`Annotator`].
//! [`Pipeline::run`] wraps it with file handling and the output policy.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use owl_docsgen_model::parser::{parse, Format};
use owl_docsgen_model::serializer::serialize;
use owl_docsgen_model::{iris, Graph, Term};
use tracing::{debug, info, warn};

use crate::annotate::Annotator;
use crate::config::{DocsgenConfig, LabelConfig, OnExisting};
use crate::definitions::{
    class_definition, datatype_property_definition, object_property_definition,
};
use crate::entailment::{ClosureOptions, Reasoner, RuleReasoner};
use crate::error::{DocsgenError, DocsgenResult, ReasoningError};
use crate::expression::{is_datatype, DecodeLimits};
use crate::labels::generate_labels;
use crate::report::{RunReport, Tally};
use crate::scope_notes::scope_note;
use crate::tag::AutogenTag;
use crate::view::BaseGraph;

const VOCABULARY: &[&str] = &[iris::OWL, iris::RDF, iris::RDFS, iris::XSD, iris::SKOS];

/// Settings for one in-memory annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Closure settings handed to the reasoner.
    pub closure: ClosureOptions,
    /// Expression decoding bounds.
    pub limits: DecodeLimits,
    /// Generate `skos:scopeNote` literals.
    pub include_scope_notes: bool,
    /// Tag stamped on every generated literal.
    pub tag: AutogenTag,
    /// Label pre-pass; skipped when no namespace is set.
    pub labels: LabelConfig,
}

impl AnnotateOptions {
    /// Defaults with literals tagged for `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            closure: ClosureOptions::default(),
            limits: DecodeLimits::default(),
            include_scope_notes: true,
            tag: AutogenTag::new(date),
            labels: LabelConfig::default(),
        }
    }

    /// The pass described by a run configuration.
    #[must_use]
    pub fn from_config(config: &DocsgenConfig) -> Self {
        Self {
            closure: config.reasoner.closure_options(),
            limits: DecodeLimits {
                max_depth: config.render.max_depth,
            },
            include_scope_notes: config.include_scope_notes,
            tag: AutogenTag::new(config.effective_date()),
            labels: config.labels.clone(),
        }
    }
}

/// The documentation pipeline.
pub struct Pipeline {
    reasoner: Box<dyn Reasoner>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("reasoner", &self.reasoner.name())
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn is_vocabulary(iri: &str) -> bool {
    VOCABULARY.iter().any(|ns| iri.starts_with(ns))
}

/// Named classes of the document: typed `owl:Class` or the subject of an
/// `rdfs:subClassOf`, minus vocabulary terms and datatypes.
fn document_classes(base: &Graph, view: &Graph) -> Vec<String> {
    let mut classes: Vec<String> = base
        .instances_of(iris::OWL_CLASS)
        .map(str::to_owned)
        .chain(
            base.pairs(iris::RDFS_SUBCLASS_OF)
                .filter_map(|(s, _)| s.as_iri().map(str::to_owned)),
        )
        .filter(|iri| !is_vocabulary(iri) && !is_datatype(view, iri))
        .collect();
    classes.sort();
    classes.dedup();
    classes
}

fn document_properties(base: &Graph, kind: &str) -> Vec<String> {
    let mut props: Vec<String> = base
        .instances_of(kind)
        .filter(|iri| !is_vocabulary(iri))
        .map(str::to_owned)
        .collect();
    props.sort();
    props.dedup();
    props
}

/// Upserts `body` or, when there is nothing to say, retracts stale
/// generated literals.
fn write_or_retract(
    writer: &mut Annotator<'_>,
    tally: &mut Tally,
    entity: &str,
    predicate: &str,
    body: Option<String>,
    tag: &AutogenTag,
) {
    match body {
        Some(body) => tally.record(writer.upsert(entity, predicate, &body, tag)),
        None => tally.retracted += writer.retract(entity, predicate),
    }
}

impl Pipeline {
    /// A pipeline using the built-in [`RuleReasoner`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_reasoner(Box::new(RuleReasoner::new()))
    }

    /// A pipeline using another entailment engine.
    #[must_use]
    pub fn with_reasoner(reasoner: Box<dyn Reasoner>) -> Self {
        Self { reasoner }
    }

    /// The configured engine.
    #[must_use]
    pub fn reasoner(&self) -> &dyn Reasoner {
        self.reasoner.as_ref()
    }

    /// Annotates `base` in place.
    ///
    /// Order: label pass, closure, class definitions and scope notes (classes
    /// by IRI), datatype properties, object properties. Render failures skip
    /// the affected literal and are recorded as issues in the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReasoningError`] when the closure fails; `base` then has at
    /// most its labels added.
    pub fn annotate(
        base: &mut BaseGraph,
        reasoner: &dyn Reasoner,
        options: &AnnotateOptions,
    ) -> Result<RunReport, ReasoningError> {
        let mut report = RunReport::default();

        if let Some(namespace) = options.labels.namespace.as_deref() {
            let mut writer = Annotator::new(base);
            report.labels = generate_labels(&mut writer, namespace, options.labels.lang.as_deref());
            info!(namespace, labels = %report.labels, "label pass done");
        }

        let view = reasoner.closure(base.graph(), &options.closure)?;
        report.derived_triples = view.len();
        info!(
            engine = reasoner.name(),
            base = base.graph().len(),
            derived = view.len(),
            "closure computed"
        );

        let classes = document_classes(base.graph(), view.graph());
        let datatype_properties = document_properties(base.graph(), iris::OWL_DATATYPE_PROPERTY);
        let object_properties = document_properties(base.graph(), iris::OWL_OBJECT_PROPERTY);

        let tag = &options.tag;
        let mut writer = Annotator::new(base);

        for class in &classes {
            debug!(class = %class, "class");
            let definition = class_definition(&view, class);
            write_or_retract(
                &mut writer,
                &mut report.classes,
                class,
                iris::SKOS_DEFINITION,
                definition,
                tag,
            );

            if !options.include_scope_notes {
                continue;
            }
            match scope_note(&view, class, options.limits) {
                Ok(note) => {
                    write_or_retract(
                        &mut writer,
                        &mut report.scope_notes,
                        class,
                        iris::SKOS_SCOPE_NOTE,
                        note,
                        tag,
                    );
                }
                Err(err) => {
                    warn!(class = %class, error = %err, "scope note skipped");
                    report.scope_notes.skipped += 1;
                    report.issue(class, format!("scope note skipped: {err}"));
                }
            }
        }

        for property in &datatype_properties {
            debug!(property = %property, "datatype property");
            let body = datatype_property_definition(&view, property);
            report
                .datatype_properties
                .record(writer.upsert(property, iris::SKOS_DEFINITION, &body, tag));
        }

        for property in &object_properties {
            let node = Term::iri(property.as_str());
            if node.is(iris::OWL_TOP_OBJECT_PROPERTY) || node.is(iris::OWL_BOTTOM_OBJECT_PROPERTY) {
                continue;
            }
            debug!(property = %property, "object property");
            match object_property_definition(&view, property, options.limits) {
                Ok(body) => report
                    .object_properties
                    .record(writer.upsert(property, iris::SKOS_DEFINITION, &body, tag)),
                Err(err) => {
                    warn!(property = %property, error = %err, "definition skipped");
                    report.object_properties.skipped += 1;
                    report.issue(property, format!("definition skipped: {err}"));
                }
            }
        }

        base.bind_prefix("skos", iris::SKOS);
        info!(
            classes = %report.classes,
            scope_notes = %report.scope_notes,
            datatype_properties = %report.datatype_properties,
            object_properties = %report.object_properties,
            "annotation done"
        );
        Ok(report)
    }

    /// Reads `config.input`, annotates it, and writes the result.
    ///
    /// With [`OnExisting::Error`] an existing output aborts the run before
    /// the input is even read. With [`OnExisting::Backup`] the existing
    /// output is renamed only after annotation succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`DocsgenError`] for a missing or unparsable input, an output
    /// conflict, a reasoning failure, or a failed file operation. Nothing is
    /// written in any of these cases except when the final write itself
    /// fails.
    pub fn run(&self, config: &DocsgenConfig) -> DocsgenResult<RunReport> {
        let input = &config.input;
        if !input.is_file() {
            return Err(DocsgenError::InputNotFound { path: input.clone() });
        }
        let output = config.effective_output();
        if output.exists() && config.on_existing == OnExisting::Error {
            return Err(DocsgenError::OutputConflict { path: output });
        }

        let format = Format::from_path(input);
        let src = fs::read_to_string(input).map_err(|e| DocsgenError::io(input, e))?;
        let graph = parse(&src, format).map_err(|source| DocsgenError::Parse {
            path: input.clone(),
            source,
        })?;
        info!(input = %input.display(), triples = graph.len(), "parsed");

        let mut base = BaseGraph::new(graph);
        let options = AnnotateOptions::from_config(config);
        let mut report = Self::annotate(&mut base, self.reasoner(), &options)?;
        let text = serialize(base.graph(), format);

        if output.exists() && config.on_existing == OnExisting::Backup {
            let backup = backup_path(&output, chrono::Local::now().naive_local());
            fs::rename(&output, &backup).map_err(|e| DocsgenError::io(&output, e))?;
            info!(backup = %backup.display(), "existing output moved");
            report.backup = Some(backup);
        }
        fs::write(&output, text).map_err(|e| DocsgenError::io(&output, e))?;
        info!(output = %output.display(), issues = report.issues.len(), "written");
        report.output = Some(output);
        Ok(report)
    }
}

/// `<output>.bak-YYYYMMDD-HHMMSS`, next to `output`.
#[must_use]
pub fn backup_path(output: &Path, at: NaiveDateTime) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{name}.bak-{}", at.format("%Y%m%d-%H%M%S")))
}

/// Runs the default pipeline.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn run(config: &DocsgenConfig) -> DocsgenResult<RunReport> {
    Pipeline::new().run(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owl_docsgen_model::parser::parse_turtle;

    fn options() -> AnnotateOptions {
        AnnotateOptions::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    fn base(body: &str) -> BaseGraph {
        BaseGraph::new(
            parse_turtle(&format!(
                "@prefix ex: <http://ex.org/> .\n\
                 @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
                 @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
                 @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n{body}"
            ))
            .unwrap(),
        )
    }

    struct Unavailable;

    impl Reasoner for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn closure(
            &self,
            _base: &Graph,
            _options: &ClosureOptions,
        ) -> Result<crate::view::DerivedView, ReasoningError> {
            Err(ReasoningError::Engine("engine offline".into()))
        }
    }

    #[test]
    fn engine_failure_stops_before_definitions() {
        let mut b = base("ex:Child a owl:Class ; rdfs:subClassOf ex:Person . ex:Person a owl:Class .\n");
        let pipeline = Pipeline::with_reasoner(Box::new(Unavailable));
        let err = Pipeline::annotate(&mut b, pipeline.reasoner(), &options()).unwrap_err();
        assert!(matches!(&err, ReasoningError::Engine(msg) if msg == "engine offline"));
        assert!(b
            .graph()
            .object(&Term::iri("http://ex.org/Child"), iris::SKOS_DEFINITION)
            .is_none());
        let fatal = DocsgenError::from(err);
        assert_eq!(fatal.exit_code(), 1);
    }

    #[test]
    fn backup_name_keeps_extension() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(
            backup_path(Path::new("/tmp/out.ttl"), at),
            PathBuf::from("/tmp/out.ttl.bak-20250301-090507")
        );
    }

    #[test]
    fn classes_exclude_vocabulary_and_datatypes() {
        let b = base(
            "ex:A a owl:Class . ex:B rdfs:subClassOf ex:A . owl:Thing a owl:Class .\n\
             ex:Money a rdfs:Datatype ; rdfs:subClassOf xsd:decimal .\n",
        );
        let view = RuleReasoner::new()
            .closure(b.graph(), &ClosureOptions::default())
            .unwrap();
        assert_eq!(
            document_classes(b.graph(), view.graph()),
            vec!["http://ex.org/A".to_owned(), "http://ex.org/B".to_owned()]
        );
    }

    #[test]
    fn annotate_counts_and_binds_skos() {
        let mut b = base(
            "ex:Person a owl:Class . ex:Child a owl:Class ; rdfs:subClassOf ex:Person .\n\
             ex:age a owl:DatatypeProperty ; rdfs:domain ex:Person ; rdfs:range xsd:integer .\n\
             ex:knows a owl:ObjectProperty ; rdfs:domain ex:Person ; rdfs:range ex:Person .\n",
        );
        let report = Pipeline::annotate(&mut b, &RuleReasoner::new(), &options()).unwrap();
        assert_eq!(report.classes.inserted, 1);
        assert_eq!(report.scope_notes.inserted, 1);
        assert_eq!(report.datatype_properties.inserted, 1);
        assert_eq!(report.object_properties.inserted, 1);
        assert!(report.issues.is_empty());
        assert_eq!(b.graph().prefixes().namespace("skos"), Some(iris::SKOS));

        let again = Pipeline::annotate(&mut b, &RuleReasoner::new(), &options()).unwrap();
        assert_eq!(again.classes.unchanged, 1);
        assert_eq!(again.classes.written(), 0);
        assert_eq!(again.object_properties.unchanged, 1);
    }

    #[test]
    fn stale_generated_definition_is_retracted() {
        let mut b = base(
            "ex:Orphan a owl:Class ;\n\
               <http://www.w3.org/2004/02/skos/core#definition> \"An Orphan is a kind of Gone. \u{27E6}AUTOGEN:P1:2024-01-01\u{27E7}\" .\n",
        );
        let report = Pipeline::annotate(&mut b, &RuleReasoner::new(), &options()).unwrap();
        assert_eq!(report.classes.retracted, 1);
        assert_eq!(
            b.graph()
                .objects(&Term::iri("http://ex.org/Orphan"), iris::SKOS_DEFINITION)
                .count(),
            0
        );
    }

    #[test]
    fn scope_notes_can_be_disabled() {
        let mut b = base("ex:Child a owl:Class ; rdfs:subClassOf ex:Person . ex:Person a owl:Class .\n");
        let opts = AnnotateOptions {
            include_scope_notes: false,
            ..options()
        };
        let report = Pipeline::annotate(&mut b, &RuleReasoner::new(), &opts).unwrap();
        assert_eq!(report.scope_notes, Tally::default());
    }
}
