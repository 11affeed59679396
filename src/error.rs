//! Error types for a seeding run.

use crate::run::Stage;
use thiserror::Error;

/// Errors raised by a [`ProductStore`](crate::store::ProductStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// PostgreSQL connection or query error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store refused a record for a reason other than a duplicate code.
    #[error("record {code} rejected: {reason}")]
    Rejected { code: String, reason: String },

    /// The store refused to commit a unit of work.
    #[error("commit rejected: {0}")]
    CommitRejected(String),

    /// A write was attempted before the products table exists.
    #[error("table '{0}' does not exist")]
    MissingTable(&'static str),
}

/// Errors raised while synthesizing records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SynthError {
    /// The uniqueness pool could not produce an unseen value.
    #[error("no unique value found after {attempts} attempts")]
    UniquenessExhausted { attempts: usize },
}

/// Coarse classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    Schema,
    Synthesis,
    Write,
}

/// Errors that abort a seeding run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Could not reach or authenticate to the store.
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] StoreError),

    /// Creating the products table failed.
    #[error("failed to create the products table: {0}")]
    Schema(#[source] StoreError),

    /// The synthesizer could not produce the requested batch.
    #[error("failed to generate products: {0}")]
    Synthesis(#[from] SynthError),

    /// Inserting a record failed; nothing from the batch was committed.
    #[error("failed to insert product #{position}: {source}")]
    Write {
        position: usize,
        #[source]
        source: StoreError,
    },

    /// Opening the unit of work failed.
    #[error("failed to start a transaction: {0}")]
    Begin(#[source] StoreError),

    /// Committing the unit of work failed; nothing from the batch persists.
    #[error("failed to commit products: {0}")]
    Commit(#[source] StoreError),
}

impl RunError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RunError::Connect(_) => FailureKind::Connection,
            RunError::Schema(_) => FailureKind::Schema,
            RunError::Synthesis(_) => FailureKind::Synthesis,
            RunError::Begin(_) | RunError::Write { .. } | RunError::Commit(_) => FailureKind::Write,
        }
    }

    /// The last stage the run reached before aborting.
    pub fn stage(&self) -> Stage {
        match self {
            RunError::Connect(_) => Stage::Idle,
            RunError::Schema(_) => Stage::Connected,
            RunError::Synthesis(_) => Stage::SchemaEnsured,
            RunError::Begin(_) | RunError::Write { .. } => Stage::RecordsSynthesized,
            RunError::Commit(_) => Stage::InsertAttempted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_name_the_failing_record() {
        let err = RunError::Write {
            position: 5,
            source: StoreError::Rejected {
                code: "4006381333931".into(),
                reason: "value too long".into(),
            },
        };

        assert_eq!(err.kind(), FailureKind::Write);
        assert_eq!(err.stage(), Stage::RecordsSynthesized);
        assert_eq!(
            err.to_string(),
            "failed to insert product #5: record 4006381333931 rejected: value too long"
        );
    }

    #[test]
    fn commit_failures_happen_after_the_inserts() {
        let err = RunError::Commit(StoreError::MissingTable("products"));
        assert_eq!(err.kind(), FailureKind::Write);
        assert_eq!(err.stage(), Stage::InsertAttempted);
    }

    #[test]
    fn synthesis_errors_convert() {
        let err: RunError = SynthError::UniquenessExhausted { attempts: 1000 }.into();
        assert_eq!(err.kind(), FailureKind::Synthesis);
        assert_eq!(err.stage(), Stage::SchemaEnsured);
    }
}
