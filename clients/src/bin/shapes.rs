//! `owl-shapes`: generates SHACL datatype shapes from OWL datatype
//! property ranges.
//!
//! **Outputs:**
//! - `<stem>_constraints.shacl.ttl`: the shapes (or `--shapes-out`)
//! - `<stem>_refactored.ttl`: the ontology without target ranges, with `--remove-ranges`
//!
//! **Usage:**
//! ```
//! owl-shapes people.ttl [--property ID]... [--remove-ranges] [--iri-base IRI] [--lenient]
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
use clap::Parser;
use owl_docsgen_clients::{init_logging, report_failure};
use owl_docsgen_shapes::{run, IriBase, ShapeConfig, ShapeRequest};

/// Generate SHACL shapes for datatype properties.
#[derive(Parser)]
#[command(name = "owl-shapes", version, about = "Generate SHACL datatype shapes for an OWL ontology")]
struct Args {
    /// Ontology to read.
    input: PathBuf,

    /// Property to constrain: full IRI, prefixed name, or bare name (with
    /// `--iri-base`). Repeatable. Without it, every datatype property ranged
    /// over xsd:decimal, xsd:integer or xsd:dateTime is selected.
    #[arg(long = "property", value_name = "ID")]
    properties: Vec<String>,

    /// Also write `<stem>_refactored.ttl` without the targets' ranges.
    #[arg(long)]
    remove_ranges: bool,

    /// Shapes output file.
    #[arg(long, value_name = "PATH")]
    shapes_out: Option<PathBuf>,

    /// Base IRI for bare property names.
    #[arg(long, value_name = "IRI")]
    iri_base: Option<String>,

    /// Separator between base and bare name; inferred when omitted.
    #[arg(long, value_name = "SEP", value_parser = ["#", "/"])]
    iri_sep: Option<String>,

    /// Skip unresolvable identifiers with a warning instead of failing.
    #[arg(long)]
    lenient: bool,

    /// Log per-property decisions.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long)]
    quiet: bool,
}

fn execute(args: Args) -> Result<()> {
    let config = ShapeConfig {
        request: ShapeRequest {
            properties: args.properties,
            base: IriBase {
                base: args.iri_base,
                separator: args.iri_sep,
            },
            strict: !args.lenient,
        },
        remove_ranges: args.remove_ranges,
        shapes_out: args.shapes_out,
        ..ShapeConfig::for_input(args.input)
    };
    let paths = run(&config)
        .with_context(|| format!("Failed to generate shapes for {}", config.input.display()))?;

    println!("  Written: {} ({} shapes)", paths.shapes.display(), paths.targets.len());
    if let Some(refactored) = &paths.refactored {
        println!("  Written: {}", refactored.display());
    }
    for skipped in &paths.skipped {
        println!("  Skipped {}: {}", skipped.identifier, skipped.reason);
    }
    println!("Shapes complete.");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}
