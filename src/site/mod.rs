//! Site document module.
//!
//! This module provides:
//! - `model`: Page / Section / Block schema and `SiteSettings`
//! - `template`: default section content from type + settings
//! - `patch`: typed partial block props
//! - `history`: snapshot undo/redo
//! - `editor`: `EditorSession`, the in-memory editing engine
//! - `command`: serializable `EditCommand`s for driving a session
//! - `services`: persistence / generation / publish contracts and jobs
//! - `store`: Automerge-backed `SiteManager` and `MemoryRepository`
//! - `wasm`: WASM bindings for browser usage (JsEditorSession, JsSiteDocument)

pub mod command;
pub mod editor;
pub mod history;
pub mod model;
pub mod patch;
pub mod services;
pub mod store;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use command::EditCommand;
pub use editor::{EditorConfig, EditorSession, MoveDirection};
pub use history::{History, DEFAULT_MAX_HISTORY};
pub use model::*;
pub use patch::{BlockPatch, ButtonPatch, ImagePatch, ListPatch, TextPatch};
pub use services::{
    GenerationOutput, GenerationService, Job, JobKind, JobStatus, PersistenceService,
    PublishService,
};
pub use store::{MemoryRepository, SiteManager, SiteRoot};
pub use template::{create_default_section, create_default_section_named};

#[cfg(feature = "wasm")]
pub use wasm::{JsEditorSession, JsSiteDocument};
