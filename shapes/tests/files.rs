//! End-to-end shape generation through the file system.

use std::fs;

use owl_docsgen::{DocsgenError, IdentifierError};
use owl_docsgen_model::parser::parse_turtle;
use owl_docsgen_model::{iris, Term};
use owl_docsgen_shapes::{run, IriBase, ShapeConfig, ShapeRequest};
use tempfile::TempDir;

const PEOPLE: &str = "@prefix ex: <http://ex.org/people#> .\n\
                      @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
                      @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
                      @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
                      ex:Person a owl:Class .\n\
                      ex:has_income a owl:DatatypeProperty ; rdfs:domain ex:Person ; rdfs:range xsd:decimal .\n\
                      ex:has_birthdate a owl:DatatypeProperty ; rdfs:range xsd:dateTime .\n\
                      ex:nickname a owl:DatatypeProperty ; rdfs:range xsd:string .\n";

fn setup() -> (TempDir, ShapeConfig) {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("people.ttl");
    fs::write(&input, PEOPLE).expect("write input");
    (dir, ShapeConfig::for_input(input))
}

#[test]
fn default_outputs_next_to_input() {
    let (dir, mut config) = setup();
    config.remove_ranges = true;
    let paths = run(&config).expect("run");

    assert_eq!(paths.shapes, dir.path().join("people_constraints.shacl.ttl"));
    assert_eq!(
        paths.refactored.as_deref(),
        Some(dir.path().join("people_refactored.ttl").as_path())
    );
    assert_eq!(paths.targets.len(), 2);

    let shapes = parse_turtle(&fs::read_to_string(&paths.shapes).expect("read shapes")).expect("parse shapes");
    let shape = Term::iri("http://ex.org/people#has_income_Shape");
    assert!(shapes.has(&shape, iris::RDF_TYPE, iris::SH_NODE_SHAPE));

    let refactored = parse_turtle(&fs::read_to_string(dir.path().join("people_refactored.ttl")).expect("read"))
        .expect("parse refactored");
    let income = Term::iri("http://ex.org/people#has_income");
    assert_eq!(refactored.objects(&income, iris::RDFS_RANGE).count(), 0);
    assert!(refactored.has(&Term::iri("http://ex.org/people#nickname"), iris::RDFS_RANGE, iris::XSD_STRING));
}

#[test]
fn bare_names_with_inferred_hash_separator() {
    let (dir, mut config) = setup();
    config.request = ShapeRequest {
        properties: vec!["nickname".to_owned()],
        base: IriBase {
            base: Some("http://ex.org/people".to_owned()),
            separator: None,
        },
        strict: true,
    };
    config.shapes_out = Some(dir.path().join("nick"));
    let paths = run(&config).expect("run");
    assert_eq!(paths.shapes, dir.path().join("nick.ttl"));
    assert_eq!(paths.targets[0].property, "http://ex.org/people#nickname");
    assert!(paths.refactored.is_none());
}

#[test]
fn strict_mode_rejects_unknown_property() {
    let (dir, mut config) = setup();
    config.request.properties = vec!["ex:Person".to_owned()];
    let err = run(&config).expect_err("not a datatype property");
    assert!(matches!(
        err,
        DocsgenError::Identifier(IdentifierError::NotDatatypeProperty { .. })
    ));
    assert!(!dir.path().join("people_constraints.shacl.ttl").exists());
}
