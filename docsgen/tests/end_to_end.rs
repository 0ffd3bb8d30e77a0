//! File-level runs over small fixture ontologies.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use owl_docsgen::{run, DocsgenConfig, RunReport};
use tempfile::TempDir;

const PEOPLE: &str = r#"@prefix ex: <http://ex.org/people#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

ex:Agent a owl:Class .
ex:Person a owl:Class ; rdfs:subClassOf ex:Agent .
ex:Child a owl:Class ; rdfs:subClassOf ex:Person, ex:Agent .
ex:Parent a owl:Class ;
    owl:equivalentClass [ owl:intersectionOf ( ex:Person
        [ a owl:Restriction ; owl:onProperty ex:hasChild ; owl:someValuesFrom ex:Person ] ) ] .

ex:has_income a owl:DatatypeProperty ; rdfs:domain ex:Person ; rdfs:range xsd:decimal .
ex:hasChild a owl:ObjectProperty ; rdfs:domain ex:Person ; rdfs:range ex:Person .
ex:hasSocialRelation a owl:ObjectProperty ; rdfs:domain ex:Person ; rdfs:range ex:Person .
ex:hasColleague a owl:ObjectProperty ; rdfs:subPropertyOf ex:hasSocialRelation .
"#;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date")
}

fn write_input(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn config(input: &Path) -> DocsgenConfig {
    DocsgenConfig {
        generation_date: Some(date()),
        ..DocsgenConfig::for_input(input)
    }
}

fn run_ok(config: &DocsgenConfig) -> (RunReport, String) {
    let report = run(config).expect("run succeeds");
    let output = report.output.clone().expect("output recorded");
    let text = fs::read_to_string(output).expect("read output");
    (report, text)
}

#[test]
fn datatype_property_definition_lands_in_the_output() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", PEOPLE);
    let (report, text) = run_ok(&config(&input));

    assert_eq!(
        report.output.as_deref(),
        Some(dir.path().join("people_with_documentation.ttl").as_path())
    );
    assert!(text.contains(
        "\"The data property has_income records a Person's has_income as an xsd:decimal value. \u{27E6}AUTOGEN:P1:2025-01-31\u{27E7}\""
    ));
    assert!(text.contains("@prefix skos: <http://www.w3.org/2004/02/skos/core#> ."));
    assert!(text.contains("A Child is a kind of Person."));
    assert!(!text.contains("A Child is a kind of Agent."));
}

#[test]
fn inherited_range_reaches_sub_property() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", PEOPLE);
    let (_, text) = run_ok(&config(&input));
    assert!(text.contains(
        "The property \u{2018}hasColleague\u{2019} is a relation between Person and Person."
    ));
    assert!(!text.contains("relation between Thing"));
}

#[test]
fn same_date_rerun_is_byte_identical() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", PEOPLE);
    let (_, first) = run_ok(&config(&input));
    let (_, second) = run_ok(&config(&input));
    assert_eq!(first, second);
}

#[test]
fn rerun_on_own_output_changes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", PEOPLE);
    let (_, first) = run_ok(&config(&input));

    let again = write_input(&dir, "again.ttl", &first);
    let (report, second) = run_ok(&config(&again));
    assert_eq!(first, second);
    assert_eq!(report.classes.written(), 0);
    assert_eq!(report.datatype_properties.written(), 0);
    assert_eq!(report.object_properties.written(), 0);
    assert_eq!(report.scope_notes.written(), 0);
}

#[test]
fn author_definitions_survive() {
    let body = format!(
        "{PEOPLE}\n@prefix skos: <http://www.w3.org/2004/02/skos/core#> .\n\
         ex:Child skos:definition \"A young human, written by hand.\" .\n"
    );
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", &body);
    let (report, text) = run_ok(&config(&input));
    assert_eq!(report.classes.protected, 1);
    assert!(text.contains("\"A young human, written by hand.\""));
    assert!(!text.contains("A Child is a kind of Person."));
}

#[test]
fn self_referencing_filler_is_recovered() {
    let body = r#"@prefix ex: <http://ex.org/loop#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ex:Base a owl:Class .
ex:Loop a owl:Class ; rdfs:subClassOf ex:Base, _:r .
_:r a owl:Restriction ; owl:onProperty ex:p ; owl:someValuesFrom _:r .
"#;
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "loop.ttl", body);
    let (report, text) = run_ok(&config(&input));

    assert_eq!(report.scope_notes.skipped, 1);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].entity, "http://ex.org/loop#Loop");
    assert!(text.contains("A Loop is a kind of Base."));
}

#[test]
fn ntriples_in_ntriples_out() {
    let body = "<http://ex.org/A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n\
                <http://ex.org/B> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/A> .\n";
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "tiny.nt", body);
    let (report, text) = run_ok(&config(&input));
    assert_eq!(
        report.output.as_deref(),
        Some(dir.path().join("tiny_with_documentation.nt").as_path())
    );
    assert!(text.contains(
        "<http://ex.org/B> <http://www.w3.org/2004/02/skos/core#definition> \"A B is a kind of A. \u{27E6}AUTOGEN:P1:2025-01-31\u{27E7}\" ."
    ));
    assert!(!text.contains("@prefix"));
}

#[test]
fn label_pass_runs_before_definitions() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "people.ttl", PEOPLE);
    let mut cfg = config(&input);
    cfg.labels.namespace = Some("http://ex.org/people#".to_owned());
    let (report, text) = run_ok(&cfg);
    assert!(report.labels.inserted > 0);
    assert!(text.contains("rdfs:label \"has income\""));
    assert!(text.contains("The data property has income records a Person's has income as an xsd:decimal value."));
}
