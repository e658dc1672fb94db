//! Automerge-backed durable storage for site documents.
//!
//! This module provides:
//! - `SiteManager`: one site's current content plus its numbered versions,
//!   held in an Automerge document via autosurgeon (hydrate/reconcile)
//! - `MemoryRepository`: a [`PersistenceService`] over a set of managers
//!
//! Versions are immutable deep copies of the page list. Concurrent writers
//! converge through Automerge merge/sync; the last write wins for content.
//! Version numbers are renumbered after every merge or sync so they stay
//! unique and every peer agrees on them.

use std::collections::HashMap;

use automerge::{AutoCommit, ChangeHash};
use autosurgeon::{hydrate, reconcile, Hydrate, Reconcile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SiteError, SiteResult};
use super::model::{new_id, Page, SiteContent, SiteVersion};
use super::services::PersistenceService;

// =============================================================================
// DOCUMENT ROOT
// =============================================================================

/// Root of a stored site document.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteRoot {
    pub site_id: String,
    /// The current draft.
    pub content: SiteContent,
    /// Saved versions, oldest first.
    pub versions: Vec<SiteVersion>,
}

impl SiteRoot {
    /// The version with the highest number.
    pub fn latest_version(&self) -> Option<&SiteVersion> {
        self.versions.iter().max_by_key(|v| v.version_number)
    }

    fn next_version_number(&self) -> i64 {
        self.versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Numbers versions 1..n ordered by `(version_number, created_at, id)`.
    ///
    /// List order is left alone. Returns true if any number changed.
    pub fn renumber_versions(&mut self) -> bool {
        let mut order: Vec<usize> = (0..self.versions.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.versions[a], &self.versions[b]);
            (a.version_number, a.created_at, &a.id).cmp(&(b.version_number, b.created_at, &b.id))
        });

        let mut changed = false;
        for (number, index) in (1..).zip(order) {
            let version = &mut self.versions[index];
            if version.version_number != number {
                version.version_number = number;
                changed = true;
            }
        }
        changed
    }
}

// =============================================================================
// SITE MANAGER
// =============================================================================

/// Durable document for one site.
///
/// Reads go through a cached hydrated [`SiteRoot`]; writes mutate a copy and
/// reconcile it back, refreshing the cache.
pub struct SiteManager {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated on load, merge, and sync.
    cached_state: Option<SiteRoot>,
}

impl SiteManager {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a document for `site_id` holding `content`, with no versions yet.
    pub fn new(site_id: impl Into<String>, content: SiteContent) -> SiteResult<Self> {
        let mut doc = AutoCommit::new();
        let root = SiteRoot {
            site_id: site_id.into(),
            content,
            versions: Vec::new(),
        };
        reconcile(&mut doc, &root)?;
        Ok(Self {
            doc,
            cached_state: Some(root),
        })
    }

    /// Creates a SiteManager from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> SiteResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
        })
    }

    /// Saves the document to binary format.
    pub fn save(&mut self) -> Vec<u8> {
        self.doc.save()
    }

    /// Returns the current heads (for sync protocol).
    pub fn get_heads(&mut self) -> Vec<ChangeHash> {
        self.doc.get_heads()
    }

    /// Gets the actor ID for this document instance.
    pub fn actor_id(&self) -> String {
        self.doc.get_actor().to_hex_string()
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Hydrates the whole stored document.
    pub fn get_state(&mut self) -> SiteResult<SiteRoot> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: SiteRoot = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies `f` to a copy of the state and reconciles it back.
    pub fn update_state<F, T>(&mut self, f: F) -> SiteResult<T>
    where
        F: FnOnce(&mut SiteRoot) -> T,
    {
        let mut state = self.get_state()?;
        let out = f(&mut state);
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        Ok(out)
    }

    pub fn site_id(&mut self) -> SiteResult<String> {
        Ok(self.get_state()?.site_id)
    }

    /// The current draft document.
    pub fn content(&mut self) -> SiteResult<SiteContent> {
        Ok(self.get_state()?.content)
    }

    /// Replaces the current draft wholesale (e.g. after full regeneration).
    pub fn replace_content(&mut self, content: SiteContent) -> SiteResult<()> {
        self.update_state(|state| state.content = content)
    }

    /// Stores a whole document, settings included, as the draft and a new version.
    ///
    /// Returns None without writing when `content` equals the current draft.
    pub fn save_content(&mut self, content: &SiteContent) -> SiteResult<Option<SiteVersion>> {
        let current = self.content()?;
        if current == *content {
            return Ok(None);
        }
        if current.settings != content.settings {
            self.update_state(|state| state.content.settings = content.settings.clone())?;
        }
        self.save_draft(&content.pages).map(Some)
    }

    // =========================================================================
    // VERSIONS
    // =========================================================================

    /// Stores `pages` as the current draft and as a new numbered version.
    pub fn save_draft(&mut self, pages: &[Page]) -> SiteResult<SiteVersion> {
        let version = self.update_state(|state| {
            let version = SiteVersion {
                id: new_id(),
                version_number: state.next_version_number(),
                pages: pages.to_vec(),
                created_at: chrono::Utc::now().timestamp_millis(),
            };
            state.content.pages = pages.to_vec();
            state.versions.push(version.clone());
            version
        })?;
        debug!(version = version.version_number, id = %version.id, "draft saved");
        Ok(version)
    }

    /// All saved versions, oldest first.
    pub fn versions(&mut self) -> SiteResult<Vec<SiteVersion>> {
        Ok(self.get_state()?.versions)
    }

    /// Gets a version by id.
    pub fn version(&mut self, version_id: &str) -> SiteResult<Option<SiteVersion>> {
        let state = self.get_state()?;
        Ok(state.versions.into_iter().find(|v| v.id == version_id))
    }

    /// Makes an earlier version's pages current again, recorded as a new version.
    pub fn restore_version(&mut self, version_id: &str) -> SiteResult<SiteVersion> {
        let restored = self
            .version(version_id)?
            .ok_or_else(|| SiteError::version_not_found(version_id))?;
        self.save_draft(&restored.pages)
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another document into this one.
    pub fn merge(&mut self, other: &mut Self) -> SiteResult<()> {
        self.cached_state = None;
        self.doc.merge(&mut other.doc)?;
        self.normalize_versions()
    }

    /// Generates sync message for incremental sync.
    /// Returns None if there are no changes since their_heads.
    pub fn generate_sync_message(&mut self, their_heads: &[ChangeHash]) -> Option<Vec<u8>> {
        let changes = self.doc.get_changes(their_heads);
        if changes.is_empty() {
            return None;
        }
        let mut bytes = Vec::new();
        for change in changes {
            bytes.extend_from_slice(change.raw_bytes());
        }
        Some(bytes)
    }

    /// Applies sync message from peer.
    pub fn apply_sync_message(&mut self, msg: &[u8]) -> SiteResult<()> {
        self.cached_state = None;
        self.doc.load_incremental(msg)?;
        self.normalize_versions()
    }

    /// Renumbers versions after remote changes land, writing only if needed.
    fn normalize_versions(&mut self) -> SiteResult<()> {
        let mut state = self.get_state()?;
        if state.renumber_versions() {
            debug!(versions = state.versions.len(), "renumbered versions after merge");
            reconcile(&mut self.doc, &state)?;
            self.cached_state = Some(state);
        }
        Ok(())
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// In-process set of site documents keyed by site id.
#[derive(Default)]
pub struct MemoryRepository {
    sites: HashMap<String, SiteManager>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a site with its initial content, replacing any previous one.
    pub fn insert(&mut self, site_id: &str, content: SiteContent) -> SiteResult<()> {
        let manager = SiteManager::new(site_id, content)?;
        self.sites.insert(site_id.to_string(), manager);
        Ok(())
    }

    /// Registers an already-loaded site document.
    pub fn insert_manager(&mut self, site_id: &str, manager: SiteManager) {
        self.sites.insert(site_id.to_string(), manager);
    }

    pub fn get_mut(&mut self, site_id: &str) -> SiteResult<&mut SiteManager> {
        self.sites
            .get_mut(site_id)
            .ok_or_else(|| SiteError::site_not_found(site_id))
    }

    pub fn contains(&self, site_id: &str) -> bool {
        self.sites.contains_key(site_id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl PersistenceService for MemoryRepository {
    fn load(&mut self, site_id: &str) -> SiteResult<SiteContent> {
        self.get_mut(site_id)?.content()
    }

    fn save_draft(&mut self, site_id: &str, pages: &[Page]) -> SiteResult<SiteVersion> {
        self.get_mut(site_id)?.save_draft(pages)
    }
}

// =============================================================================
// TESTS
// =============================================================================
