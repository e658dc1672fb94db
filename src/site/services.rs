//! Collaborator contracts consumed by the editor.
//!
//! Persistence, generation and publishing live outside this crate. They are
//! modelled as traits plus the job records they hand back; the store module
//! provides an Automerge-backed [`PersistenceService`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};
use super::model::{new_id, Page, Section, SiteContent, SiteSettings, SiteVersion};

// =============================================================================
// SERVICE TRAITS
// =============================================================================

/// Durable storage for site documents and their numbered versions.
pub trait PersistenceService {
    /// Loads the current document for a site.
    fn load(&mut self, site_id: &str) -> SiteResult<SiteContent>;

    /// Stores `pages` as a new immutable, numbered version.
    fn save_draft(&mut self, site_id: &str, pages: &[Page]) -> SiteResult<SiteVersion>;
}

/// Produces a whole document, or one regenerated section, asynchronously.
pub trait GenerationService {
    /// Starts a generation job. `section_id` requests a single section.
    fn generate(&mut self, settings: &SiteSettings, section_id: Option<&str>) -> SiteResult<Job>;

    /// Returns the latest state of a job.
    fn poll(&mut self, job_id: &str) -> SiteResult<Job>;
}

/// Deploys saved versions externally.
pub trait PublishService {
    /// Deploys the currently saved version.
    fn publish(&mut self, site_id: &str) -> SiteResult<Job>;

    /// Re-activates a previously saved version.
    fn rollback(&mut self, site_id: &str, version_id: &str) -> SiteResult<Job>;
}

// =============================================================================
// JOBS
// =============================================================================

/// Lifecycle of a polled job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// True once the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Allowed: pending→running, pending→failed, running→completed, running→failed.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Pending, Self::Failed)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Generate,
    Publish,
    Rollback,
}

/// What a completed generation job produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GenerationOutput {
    /// A full replacement document.
    Content(SiteContent),
    /// One regenerated section, matched to the live one by id.
    Section(Section),
}

/// A polled unit of external work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<GenerationOutput>,
}

impl Job {
    /// Creates a pending job with a fresh id.
    pub fn new(kind: JobKind) -> Self {
        Self {
            id: new_id(),
            kind,
            status: JobStatus::Pending,
            error: None,
            output: None,
        }
    }

    /// Moves the job to `next`, rejecting transitions the lifecycle forbids.
    pub fn advance(&mut self, next: JobStatus) -> SiteResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(SiteError::invalid_job_transition(self.status, next));
        }
        self.status = next;
        Ok(())
    }

    /// Marks the job as started.
    pub fn start(&mut self) -> SiteResult<()> {
        self.advance(JobStatus::Running)
    }

    /// Completes a running job, attaching its output.
    pub fn complete(&mut self, output: Option<GenerationOutput>) -> SiteResult<()> {
        self.advance(JobStatus::Completed)?;
        self.output = output;
        Ok(())
    }

    /// Fails the job with a message.
    pub fn fail(&mut self, message: impl Into<String>) -> SiteResult<()> {
        self.advance(JobStatus::Failed)?;
        self.error = Some(message.into());
        Ok(())
    }

    /// Output of a completed job, None otherwise.
    pub fn completed_output(&self) -> Option<&GenerationOutput> {
        match self.status {
            JobStatus::Completed => self.output.as_ref(),
            _ => None,
        }
    }
}
