//! Error types for the site document engine.
//!
//! The editing operations themselves never fail on stale ids or out-of-range
//! indices (they are silent no-ops). Errors come from string parsing at the
//! boundaries, the Automerge-backed store, and job bookkeeping.

use thiserror::Error;

/// Result type alias for site operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Errors that can occur while loading, storing, or driving a site document.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Automerge error during document operations.
    #[error("Automerge error: {0}")]
    Automerge(#[from] automerge::AutomergeError),

    /// Autosurgeon hydration error.
    #[error("Hydration error: {0}")]
    Hydrate(#[from] autosurgeon::HydrateError),

    /// Autosurgeon reconcile error.
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] autosurgeon::ReconcileError),

    /// A section type string outside the closed set reached the template resolver.
    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),

    /// A block kind string outside the closed set.
    #[error("Unknown block kind: {0}")]
    UnknownBlockKind(String),

    /// A string that is not a valid value for an enumerated prop.
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// A partial props object whose shape does not match the target block.
    #[error("Invalid patch for {kind} block: {reason}")]
    InvalidPatch { kind: String, reason: String },

    /// Two pages share a slug.
    #[error("Duplicate page slug: {0}")]
    DuplicateSlug(String),

    /// Two sections (or two blocks within a section) share an id.
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Site not known to the repository.
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// Version id not present in the site's version list.
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// Job status change that the lifecycle does not allow.
    #[error("Invalid job transition: {from} -> {to}")]
    InvalidJobTransition { from: String, to: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SiteError {
    /// Creates an UnknownSectionType error.
    pub fn unknown_section_type(value: impl Into<String>) -> Self {
        Self::UnknownSectionType(value.into())
    }

    /// Creates an UnknownBlockKind error.
    pub fn unknown_block_kind(value: impl Into<String>) -> Self {
        Self::UnknownBlockKind(value.into())
    }

    /// Creates an InvalidValue error.
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// Creates an InvalidPatch error.
    pub fn invalid_patch(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPatch {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Creates a DuplicateSlug error.
    pub fn duplicate_slug(slug: impl Into<String>) -> Self {
        Self::DuplicateSlug(slug.into())
    }

    /// Creates a DuplicateId error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    /// Creates a SiteNotFound error.
    pub fn site_not_found(id: impl Into<String>) -> Self {
        Self::SiteNotFound(id.into())
    }

    /// Creates a VersionNotFound error.
    pub fn version_not_found(id: impl Into<String>) -> Self {
        Self::VersionNotFound(id.into())
    }

    /// Creates an InvalidJobTransition error.
    pub fn invalid_job_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidJobTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
