//! Sitecraft - versioned site document model and editing engine.
//!
//! A site is an ordered list of pages, each an ordered list of sections, each
//! an ordered list of typed blocks. This crate provides:
//!
//! - **Typed schema**: block props are a sum type keyed by block kind
//! - **Editing engine**: `EditorSession` with insert/delete/reorder/update
//!   operations that quietly ignore stale ids
//! - **Caller-driven undo**: snapshot history; the caller decides what one
//!   undo step is by calling `save_snapshot`
//! - **Durable drafts**: Automerge-backed documents with numbered versions
//!
//! # Example
//!
//! ```rust
//! use sitecraft::{EditorSession, Page, SectionType, SiteContent, SiteManager, SiteSettings};
//!
//! let content = SiteContent::new(vec![Page::new("Home", "/")], SiteSettings::new("Acme Bakery"));
//! let mut store = SiteManager::new("site-1", content.clone()).unwrap();
//!
//! // Load into an editing session
//! let mut session = EditorSession::from_content(content);
//! session.add_section(SectionType::Hero);
//! session.add_section(SectionType::Footer);
//! session.save_snapshot();
//!
//! // Persist a numbered draft
//! let version = store.save_draft(session.pages()).unwrap();
//! assert_eq!(version.version_number, 1);
//! session.mark_saved();
//! ```

pub mod error;

// Site module
pub mod site;

// Re-exports for convenience
pub use error::{SiteError, SiteResult};
pub use site::{
    create_default_section, Block, BlockKind, BlockPatch, BlockProps, EditCommand, EditorConfig,
    EditorSession, GenerationOutput, GenerationService, History, Job, JobKind, JobStatus,
    MemoryRepository, MoveDirection, Page, PersistenceService, PublishService, Section,
    SectionType, SiteContent, SiteManager, SiteSettings, SiteVersion,
};

#[cfg(feature = "wasm")]
pub use site::{JsEditorSession, JsSiteDocument};
