//! Run configuration.
//!
//! A [`DocsgenConfig`] can be loaded from a TOML file and then overlaid with
//! command-line flags. Every field has a default, so an empty file (or no
//! file) is a valid configuration.
//!
//! ```toml
//! on_existing = "backup"
//! include_scope_notes = true
//! generation_date = "2025-01-31"
//!
//! [reasoner]
//! max_rounds = 64
//!
//! [render]
//! max_depth = 32
//!
//! [labels]
//! namespace = "http://ex.org/people/"
//! lang = "en"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::entailment::ClosureOptions;
use crate::error::DocsgenError;

/// What to do when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnExisting {
    /// Replace the file.
    #[default]
    Overwrite,
    /// Abort before writing anything.
    Error,
    /// Rename the existing file to `<name>.bak-<timestamp>` first.
    Backup,
}

impl FromStr for OnExisting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "error" => Ok(Self::Error),
            "backup" => Ok(Self::Backup),
            other => Err(format!(
                "unknown policy '{other}' (expected overwrite, error, or backup)"
            )),
        }
    }
}

impl fmt::Display for OnExisting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overwrite => "overwrite",
            Self::Error => "error",
            Self::Backup => "backup",
        })
    }
}

/// Entailment engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReasonerConfig {
    /// Add OWL/RDFS vocabulary typing triples to the derived view.
    pub axiomatic_triples: bool,
    /// Add XSD datatype typing and derivation triples to the derived view.
    pub datatype_axioms: bool,
    /// Rounds of rule application before the closure is declared divergent.
    pub max_rounds: usize,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        let options = ClosureOptions::default();
        Self {
            axiomatic_triples: options.axiomatic_triples,
            datatype_axioms: options.datatype_axioms,
            max_rounds: options.max_rounds,
        }
    }
}

impl ReasonerConfig {
    /// The closure options these settings describe.
    #[must_use]
    pub fn closure_options(&self) -> ClosureOptions {
        ClosureOptions {
            axiomatic_triples: self.axiomatic_triples,
            datatype_axioms: self.datatype_axioms,
            max_rounds: self.max_rounds,
        }
    }
}

/// Expression renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Deepest expression nesting decoded before giving up on an entity.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Label pre-pass settings. The pass runs only when a namespace is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Only IRIs starting with this namespace get labels.
    pub namespace: Option<String>,
    /// Language tag for generated labels; untagged when absent.
    pub lang: Option<String>,
}

/// Complete configuration for one documentation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsgenConfig {
    /// Ontology to document.
    pub input: PathBuf,
    /// Where to write the result. Defaults to `<stem>_with_documentation.<ext>`
    /// next to the input.
    pub output: Option<PathBuf>,
    /// Policy for an existing output file.
    pub on_existing: OnExisting,
    /// Generate `skos:scopeNote` audit sentences for class axioms.
    pub include_scope_notes: bool,
    /// Date stamped into autogen tags. Defaults to today.
    pub generation_date: Option<NaiveDate>,
    /// Entailment engine settings.
    pub reasoner: ReasonerConfig,
    /// Renderer settings.
    pub render: RenderConfig,
    /// Label pre-pass settings.
    pub labels: LabelConfig,
}

impl Default for DocsgenConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            on_existing: OnExisting::default(),
            include_scope_notes: true,
            generation_date: None,
            reasoner: ReasonerConfig::default(),
            render: RenderConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl DocsgenConfig {
    /// Creates a default configuration for `input`.
    #[must_use]
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DocsgenError::Config`] if the text is not valid TOML or has
    /// unknown keys.
    pub fn from_toml_str(src: &str, origin: &Path) -> Result<Self, DocsgenError> {
        toml::from_str(src).map_err(|e| DocsgenError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DocsgenError::Io`] if the file cannot be read and
    /// [`DocsgenError::Config`] if it is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, DocsgenError> {
        let src = std::fs::read_to_string(path).map_err(|e| DocsgenError::io(path, e))?;
        Self::from_toml_str(&src, path)
    }

    /// The generation date: the configured one, or today's local date.
    #[must_use]
    pub fn effective_date(&self) -> NaiveDate {
        self.generation_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// The output path: the configured one, or
    /// `<input stem>_with_documentation.<input extension>`.
    #[must_use]
    pub fn effective_output(&self) -> PathBuf {
        if let Some(out) = &self.output {
            return out.clone();
        }
        let stem = self
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ontology".to_owned());
        let ext = self
            .input
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ttl".to_owned());
        self.input
            .with_file_name(format!("{stem}_with_documentation.{ext}"))
    }
}
