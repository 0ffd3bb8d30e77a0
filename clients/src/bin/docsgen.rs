//! `owl-docsgen`: writes tagged `skos:definition` and `skos:scopeNote`
//! literals into an OWL ontology.
//!
//! **Outputs:**
//! - `<stem>_with_documentation.<ext>` next to the input, unless `-o` is given
//!
//! **Usage:**
//! ```
//! owl-docsgen people.ttl [-o out.ttl] [--on-exist overwrite|error|backup] [--config docsgen.toml]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use owl_docsgen::{DocsgenConfig, OnExisting, Pipeline, RunReport};
use owl_docsgen_clients::{init_logging, report_failure};

/// Generate definitions and scope notes for an OWL ontology.
#[derive(Parser)]
#[command(name = "owl-docsgen", version, about = "Generate SKOS documentation for an OWL ontology")]
struct Args {
    /// Ontology to document (Turtle, or N-Triples for `.nt`).
    input: PathBuf,

    /// Output file. Defaults to `<stem>_with_documentation.<ext>`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do when the output file exists.
    #[arg(long = "on-exist", value_name = "POLICY")]
    on_existing: Option<OnExisting>,

    /// Skip `skos:scopeNote` generation.
    #[arg(long)]
    no_scope_notes: bool,

    /// Date stamped into autogen tags (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// TOML configuration file; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Label unlabelled entities under this namespace before generating.
    #[arg(long, value_name = "IRI")]
    label_namespace: Option<String>,

    /// Language tag for generated labels.
    #[arg(long, value_name = "TAG", requires = "label_namespace")]
    label_lang: Option<String>,

    /// Add OWL/RDFS vocabulary typing triples to the closure.
    #[arg(long)]
    axiomatic_triples: bool,

    /// Add XSD datatype axioms to the closure.
    #[arg(long)]
    datatype_axioms: bool,

    /// Log per-entity decisions.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn into_config(self) -> Result<DocsgenConfig> {
        let mut config = match &self.config {
            Some(path) => DocsgenConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => DocsgenConfig::default(),
        };
        config.input = self.input;
        if self.output.is_some() {
            config.output = self.output;
        }
        if let Some(policy) = self.on_existing {
            config.on_existing = policy;
        }
        if self.no_scope_notes {
            config.include_scope_notes = false;
        }
        if self.date.is_some() {
            config.generation_date = self.date;
        }
        if self.label_namespace.is_some() {
            config.labels.namespace = self.label_namespace;
        }
        if self.label_lang.is_some() {
            config.labels.lang = self.label_lang;
        }
        config.reasoner.axiomatic_triples |= self.axiomatic_triples;
        config.reasoner.datatype_axioms |= self.datatype_axioms;
        Ok(config)
    }
}

fn print_summary(report: &RunReport) {
    if let Some(output) = &report.output {
        println!("  Written: {}", output.display());
    }
    if let Some(backup) = &report.backup {
        println!("  Backup:  {}", backup.display());
    }
    println!("  Derived view: {} triples", report.derived_triples);
    if report.labels != Default::default() {
        println!("  Labels:               {}", report.labels);
    }
    println!("  Class definitions:    {}", report.classes);
    println!("  Scope notes:          {}", report.scope_notes);
    println!("  Datatype properties:  {}", report.datatype_properties);
    println!("  Object properties:    {}", report.object_properties);
    if !report.issues.is_empty() {
        println!("  Issues ({}):", report.issues.len());
        for issue in &report.issues {
            println!("    {}: {}", issue.entity, issue.message);
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    let input = config.input.clone();
    let report = Pipeline::new()
        .run(&config)
        .with_context(|| format!("Failed to document {}", input.display()))?;
    print_summary(&report);
    println!("Documentation complete.");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}
