//! Run summary.

use std::fmt;
use std::path::PathBuf;

use crate::annotate::WriteOutcome;

/// Outcome counts for one kind of annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// New literals.
    pub inserted: usize,
    /// Current-scheme literals rewritten.
    pub replaced: usize,
    /// Legacy literals rewritten.
    pub migrated: usize,
    /// Literals already up to date.
    pub unchanged: usize,
    /// Entities left alone because of author text.
    pub protected: usize,
    /// Stale generated literals removed.
    pub retracted: usize,
    /// Entities skipped because their expression could not be rendered.
    pub skipped: usize,
}

impl Tally {
    /// Counts one write.
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted => self.inserted += 1,
            WriteOutcome::Replaced => self.replaced += 1,
            WriteOutcome::Migrated => self.migrated += 1,
            WriteOutcome::Unchanged => self.unchanged += 1,
            WriteOutcome::Protected => self.protected += 1,
        }
    }

    /// Literals that now differ from the input.
    #[must_use]
    pub fn written(&self) -> usize {
        self.inserted + self.replaced + self.migrated
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} replaced, {} migrated, {} unchanged, {} protected",
            self.inserted, self.replaced, self.migrated, self.unchanged, self.protected
        )?;
        if self.retracted > 0 {
            write!(f, ", {} retracted", self.retracted)?;
        }
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// A non-fatal problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Entity the problem concerns.
    pub entity: String,
    /// What went wrong.
    pub message: String,
}

/// Everything a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Class definitions.
    pub classes: Tally,
    /// Class scope notes.
    pub scope_notes: Tally,
    /// Datatype property definitions.
    pub datatype_properties: Tally,
    /// Object property definitions.
    pub object_properties: Tally,
    /// Generated labels.
    pub labels: Tally,
    /// Non-fatal issues, in the order they were found.
    pub issues: Vec<Issue>,
    /// Triples in the derived view.
    pub derived_triples: usize,
    /// Where the result was written.
    pub output: Option<PathBuf>,
    /// Where a pre-existing output was moved.
    pub backup: Option<PathBuf>,
}

impl RunReport {
    /// Records a non-fatal issue.
    pub fn issue(&mut self, entity: &str, message: impl Into<String>) {
        self.issues.push(Issue {
            entity: entity.to_owned(),
            message: message.into(),
        });
    }
}
