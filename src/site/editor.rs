//! # Editor Session
//!
//! Owns one in-memory editing context for a site document: the live pages,
//! the settings, the selection, and the snapshot history.
//!
//! Every structural operation works on owned data by index and is a silent
//! no-op when its target (page index, section id, block id) does not exist.
//! Mutations never push history themselves: callers decide what one undo step
//! is by calling [`EditorSession::save_snapshot`] after a batch of edits.
//!
//! ## Example
//!
//! ```rust
//! use sitecraft::{EditorSession, Page, SectionType, SiteContent, SiteSettings};
//!
//! let content = SiteContent::new(vec![Page::new("Home", "/")], SiteSettings::new("Acme"));
//! let mut session = EditorSession::new();
//! session.set_content(content);
//!
//! session.save_snapshot();
//! session.add_section(SectionType::Hero);
//! session.save_snapshot();
//!
//! session.undo();
//! assert!(session.pages()[0].sections.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SiteError, SiteResult};
use super::history::{History, DEFAULT_MAX_HISTORY};
use super::model::{Page, Section, SectionType, SiteContent, SiteSettings, SECTION_VARIANTS};
use super::patch::BlockPatch;
use super::services::{GenerationOutput, Job};
use super::template::create_default_section;

// =============================================================================
// CONFIG
// =============================================================================

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots (clamped to at least 1).
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Builder: Set history capacity.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }
}

/// Direction for [`EditorSession::move_section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Toward the head of the page.
    Up,
    /// Toward the tail of the page.
    Down,
}

impl FromStr for MoveDirection {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(SiteError::invalid_value("move direction", other)),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One editing context over a site document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pages: Vec<Page>,
    settings: SiteSettings,
    selected_page_index: usize,
    selected_section_id: Option<String>,
    history: History,
    config: EditorConfig,
    /// Pages as of the last load or `mark_saved`.
    saved_pages: Vec<Page>,
}

impl EditorSession {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates an empty session with default config.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Creates an empty session with the given config.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            pages: Vec::new(),
            settings: SiteSettings::default(),
            selected_page_index: 0,
            selected_section_id: None,
            history: History::with_capacity(&[], config.max_history),
            config,
            saved_pages: Vec::new(),
        }
    }

    /// Creates a session and loads `content` into it.
    pub fn from_content(content: SiteContent) -> Self {
        let mut session = Self::new();
        session.set_content(content);
        session
    }

    /// Replaces the document wholesale and resets selection and history.
    ///
    /// This is the only place a history baseline is established.
    pub fn set_content(&mut self, content: SiteContent) {
        let SiteContent { pages, settings } = content;
        self.history.reset(&pages);
        self.saved_pages = pages.clone();
        self.pages = pages;
        self.settings = settings;
        self.selected_page_index = 0;
        self.selected_section_id = None;
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn selected_page_index(&self) -> usize {
        self.selected_page_index
    }

    pub fn selected_section_id(&self) -> Option<&str> {
        self.selected_section_id.as_deref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The selected page, or None when the index is out of range.
    pub fn selected_page(&self) -> Option<&Page> {
        self.pages.get(self.selected_page_index)
    }

    /// The selected section on the selected page, if both resolve.
    pub fn selected_section(&self) -> Option<&Section> {
        let id = self.selected_section_id.as_deref()?;
        self.selected_page()?.section(id)
    }

    /// Assembles the live document.
    pub fn content(&self) -> SiteContent {
        SiteContent::new(self.pages.clone(), self.settings.clone())
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Selects a page and clears the section selection. Not bounds-checked.
    pub fn set_selected_page(&mut self, index: usize) {
        self.selected_page_index = index;
        self.selected_section_id = None;
    }

    /// Selects a section by id, or clears the selection. Not existence-checked.
    pub fn set_selected_section(&mut self, id: Option<&str>) {
        self.selected_section_id = id.map(str::to_string);
    }

    // =========================================================================
    // STRUCTURAL OPERATIONS
    // =========================================================================

    /// Inserts a default section of `kind` into the selected page.
    ///
    /// The section goes right before the first footer, or at the end when the
    /// page has no footer. The new section becomes the selection. Returns its
    /// id, or None when the selected page does not exist.
    pub fn add_section(&mut self, kind: SectionType) -> Option<String> {
        let section = create_default_section(kind, &self.settings);
        let Some(page) = self.pages.get_mut(self.selected_page_index) else {
            debug!(page = self.selected_page_index, "add_section: no such page");
            return None;
        };
        let id = section.id.clone();
        let at = page.footer_position().unwrap_or(page.sections.len());
        page.sections.insert(at, section);
        self.selected_section_id = Some(id.clone());
        Some(id)
    }

    /// Parses a section type name and inserts it. Unknown names fail fast.
    pub fn add_section_named(&mut self, kind: &str) -> SiteResult<Option<String>> {
        let kind: SectionType = kind.parse()?;
        Ok(self.add_section(kind))
    }

    /// Removes a section from the selected page and clears the selection.
    pub fn delete_section(&mut self, id: &str) -> bool {
        let Some(page) = self.pages.get_mut(self.selected_page_index) else {
            debug!(page = self.selected_page_index, "delete_section: no such page");
            return false;
        };
        let Some(pos) = page.position_of(id) else {
            debug!(section = id, "delete_section: no such section");
            return false;
        };
        page.sections.remove(pos);
        self.selected_section_id = None;
        true
    }

    /// Swaps a section with its neighbour on the selected page.
    pub fn move_section(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(page) = self.pages.get_mut(self.selected_page_index) else {
            debug!(page = self.selected_page_index, "move_section: no such page");
            return false;
        };
        let Some(pos) = page.position_of(id) else {
            debug!(section = id, "move_section: no such section");
            return false;
        };
        let target = match direction {
            MoveDirection::Up if pos > 0 => pos - 1,
            MoveDirection::Down if pos + 1 < page.sections.len() => pos + 1,
            _ => return false,
        };
        page.sections.swap(pos, target);
        true
    }

    /// Cut-and-paste reorder: removes the section at `from` and reinserts it
    /// at `to` on the page at `page_index`.
    ///
    /// Out-of-range indices and `from == to` change nothing.
    pub fn reorder_sections(&mut self, page_index: usize, from: usize, to: usize) -> bool {
        let Some(page) = self.pages.get_mut(page_index) else {
            debug!(page = page_index, "reorder_sections: no such page");
            return false;
        };
        let len = page.sections.len();
        if from >= len || to >= len || from == to {
            debug!(from, to, len, "reorder_sections: ignored");
            return false;
        }
        let section = page.sections.remove(from);
        page.sections.insert(to, section);
        true
    }

    /// Shallow-merges `patch` into a block on the selected page.
    ///
    /// Never changes a block's kind: a patch for another kind is ignored.
    pub fn update_block(&mut self, section_id: &str, block_id: &str, patch: &BlockPatch) -> bool {
        let Some(block) = self
            .pages
            .get_mut(self.selected_page_index)
            .and_then(|page| page.section_mut(section_id))
            .and_then(|section| section.block_mut(block_id))
        else {
            debug!(section = section_id, block = block_id, "update_block: no such block");
            return false;
        };
        let applied = patch.apply_to(&mut block.props);
        if !applied {
            debug!(
                block = block_id,
                expected = %block.kind(),
                got = %patch.kind(),
                "update_block: kind mismatch"
            );
        }
        applied
    }

    /// Like [`update_block`](Self::update_block) with a bare JSON props object,
    /// interpreted against the target block's kind.
    ///
    /// A missing block is still a no-op; a malformed object is an error.
    pub fn update_block_json(
        &mut self,
        section_id: &str,
        block_id: &str,
        partial: serde_json::Value,
    ) -> SiteResult<bool> {
        let kind = self
            .selected_page()
            .and_then(|page| page.section(section_id))
            .and_then(|section| section.block(block_id))
            .map(|block| block.kind());
        match kind {
            Some(kind) => {
                let patch = BlockPatch::from_json(kind, partial)?;
                Ok(self.update_block(section_id, block_id, &patch))
            }
            None => {
                debug!(section = section_id, block = block_id, "update_block_json: no such block");
                Ok(false)
            }
        }
    }

    /// Changes a section's presentation variant on the selected page.
    pub fn update_section_variant(&mut self, section_id: &str, variant: i32) -> bool {
        if !SECTION_VARIANTS.contains(&variant) {
            debug!(variant, "update_section_variant: unsupported variant");
            return false;
        }
        match self
            .pages
            .get_mut(self.selected_page_index)
            .and_then(|page| page.section_mut(section_id))
        {
            Some(section) => {
                section.variant = variant;
                true
            }
            None => false,
        }
    }

    /// Inserts a copy of a section (fresh ids) right after it and selects the copy.
    ///
    /// Footers are not duplicated.
    pub fn duplicate_section(&mut self, section_id: &str) -> Option<String> {
        let page = self.pages.get_mut(self.selected_page_index)?;
        let pos = page.position_of(section_id)?;
        if page.sections[pos].kind == SectionType::Footer {
            debug!(section = section_id, "duplicate_section: footer stays unique");
            return None;
        }
        let copy = page.sections[pos].duplicate();
        let id = copy.id.clone();
        page.sections.insert(pos + 1, copy);
        self.selected_section_id = Some(id.clone());
        Some(id)
    }

    /// Swaps in a regenerated section in place of the one with the same id,
    /// on whichever page holds it.
    pub fn replace_section(&mut self, section: Section) -> bool {
        for page in &mut self.pages {
            if let Some(pos) = page.position_of(&section.id) {
                page.sections[pos] = section;
                return true;
            }
        }
        debug!(section = %section.id, "replace_section: no such section");
        false
    }

    /// Appends an empty page. Slugs must stay unique.
    pub fn add_page(&mut self, title: &str, slug: &str) -> bool {
        if self.pages.iter().any(|p| p.slug == slug) {
            debug!(slug, "add_page: slug already used");
            return false;
        }
        self.pages.push(Page::new(title, slug));
        true
    }

    /// Removes a page. The last remaining page is kept.
    ///
    /// The page selection follows the previously selected page when it
    /// survives, and is clamped otherwise; section selection is cleared.
    pub fn delete_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() || self.pages.len() == 1 {
            debug!(page = index, pages = self.pages.len(), "delete_page: ignored");
            return false;
        }
        self.pages.remove(index);
        if index < self.selected_page_index {
            self.selected_page_index -= 1;
        }
        if self.selected_page_index >= self.pages.len() {
            self.selected_page_index = self.pages.len() - 1;
        }
        self.selected_section_id = None;
        true
    }

    /// Folds the output of a completed generation job into the session.
    ///
    /// A full document replaces everything (as [`set_content`](Self::set_content));
    /// a single section replaces its namesake. Unfinished jobs change nothing.
    pub fn apply_generation(&mut self, job: &Job) -> bool {
        match job.completed_output() {
            Some(GenerationOutput::Content(content)) => {
                self.set_content(content.clone());
                true
            }
            Some(GenerationOutput::Section(section)) => self.replace_section(section.clone()),
            None => {
                debug!(job = %job.id, status = %job.status, "apply_generation: nothing to apply");
                false
            }
        }
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Records the live pages as an undo checkpoint.
    pub fn save_snapshot(&mut self) {
        self.history.push(&self.pages);
    }

    /// Restores the previous checkpoint. No-op at the start of history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(pages) => {
                self.pages = pages;
                true
            }
            None => false,
        }
    }

    /// Restores the next checkpoint. No-op at the end of history.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(pages) => {
                self.pages = pages;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // =========================================================================
    // SAVE TRACKING
    // =========================================================================

    /// Records the live pages as durably saved.
    pub fn mark_saved(&mut self) {
        self.saved_pages = self.pages.clone();
    }

    /// True when the live pages differ from the last saved pages.
    pub fn has_unsaved_changes(&self) -> bool {
        self.pages != self.saved_pages
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::model::{Block, BlockProps, ButtonVariant, TextVariant};
    use crate::site::patch::{ButtonPatch, TextPatch};
    use crate::site::services::JobKind;

    fn footer(id: &str) -> Section {
        Section::new(SectionType::Footer).with_id(id)
    }

    fn plain(kind: SectionType, id: &str) -> Section {
        Section::new(kind).with_id(id)
    }

    fn home_with(sections: Vec<Section>) -> SiteContent {
        let mut page = Page::new("Home", "/");
        page.sections = sections;
        SiteContent::new(vec![page], SiteSettings::new("Acme").with_contact("a@acme.test", "555"))
    }

    fn ids(session: &EditorSession) -> Vec<String> {
        session.pages()[0].sections.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_set_content_resets_state() {
        let mut session = EditorSession::new();
        session.set_content(home_with(vec![footer("s1")]));
        session.set_selected_page(3);
        session.set_selected_section(Some("s1"));
        session.save_snapshot();

        session.set_content(home_with(vec![footer("s2")]));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().index(), 0);
        assert_eq!(session.selected_section_id(), None);
        assert_eq!(session.selected_page_index(), 0);
        assert!(!session.can_undo());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_set_content_keeps_configured_capacity() {
        let mut session = EditorSession::with_config(EditorConfig::default().with_max_history(3));
        session.set_content(home_with(vec![footer("s1")]));
        for _ in 0..5 {
            session.save_snapshot();
        }
        assert_eq!(session.history().len(), 3);

        session.set_content(home_with(vec![footer("s2")]));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().capacity(), 3);
        assert_eq!(session.history().current(), session.pages());
    }

    #[test]
    fn test_add_section_before_footer() {
        let mut session = EditorSession::from_content(home_with(vec![footer("s1")]));
        let id = session.add_section(SectionType::Hero).unwrap();

        assert_eq!(ids(&session), vec![id.clone(), "s1".to_string()]);
        assert_eq!(session.pages()[0].sections[0].kind, SectionType::Hero);
        assert_eq!(session.selected_section_id(), Some(id.as_str()));
    }

    #[test]
    fn test_add_section_lands_right_before_footer_after_many() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            plain(SectionType::About, "b"),
            plain(SectionType::Services, "c"),
            footer("f"),
        ]));
        let id = session.add_section(SectionType::Contact).unwrap();
        assert_eq!(ids(&session), vec!["a", "b", "c", id.as_str(), "f"]);
    }

    #[test]
    fn test_add_section_without_footer_appends() {
        let mut session = EditorSession::from_content(home_with(vec![plain(SectionType::Hero, "a")]));
        let id = session.add_section(SectionType::About).unwrap();
        assert_eq!(ids(&session), vec!["a".to_string(), id]);
    }

    #[test]
    fn test_add_section_out_of_range_page_is_noop() {
        let mut session = EditorSession::from_content(home_with(vec![footer("s1")]));
        session.set_selected_page(5);
        assert_eq!(session.add_section(SectionType::Hero), None);
        assert_eq!(ids(&session), vec!["s1"]);
        assert_eq!(session.selected_section_id(), None);
        assert!(session.selected_page().is_none());
    }

    #[test]
    fn test_add_section_named_unknown_fails() {
        let mut session = EditorSession::from_content(home_with(vec![]));
        assert!(matches!(
            session.add_section_named("carousel"),
            Err(SiteError::UnknownSectionType(_))
        ));
        assert!(session.pages()[0].sections.is_empty());
    }

    #[test]
    fn test_add_then_delete_restores_sections() {
        let content = home_with(vec![plain(SectionType::Hero, "a"), footer("f")]);
        let mut session = EditorSession::from_content(content.clone());
        let id = session.add_section(SectionType::Services).unwrap();
        assert!(session.delete_section(&id));
        assert_eq!(session.pages(), content.pages.as_slice());
        assert_eq!(session.selected_section_id(), None);
    }

    #[test]
    fn test_delete_clears_selection_even_for_other_section() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            plain(SectionType::About, "b"),
        ]));
        session.set_selected_section(Some("a"));
        assert!(session.delete_section("b"));
        assert_eq!(session.selected_section_id(), None);
        assert_eq!(ids(&session), vec!["a"]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut session = EditorSession::from_content(home_with(vec![plain(SectionType::Hero, "a")]));
        session.set_selected_section(Some("a"));
        assert!(!session.delete_section("zzz"));
        assert_eq!(session.selected_section_id(), Some("a"));
    }

    #[test]
    fn test_move_section_bounds() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            plain(SectionType::About, "b"),
            plain(SectionType::Contact, "c"),
        ]));
        assert!(!session.move_section("a", MoveDirection::Up));
        assert!(!session.move_section("c", MoveDirection::Down));
        assert_eq!(ids(&session), vec!["a", "b", "c"]);

        assert!(session.move_section("a", MoveDirection::Down));
        assert_eq!(ids(&session), vec!["b", "a", "c"]);
        assert!(session.move_section("c", MoveDirection::Up));
        assert_eq!(ids(&session), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_sections_splice() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            plain(SectionType::About, "b"),
            plain(SectionType::Services, "c"),
            plain(SectionType::Contact, "d"),
        ]));
        assert!(session.reorder_sections(0, 0, 2));
        assert_eq!(ids(&session), vec!["b", "c", "a", "d"]);
        assert!(session.reorder_sections(0, 3, 0));
        assert_eq!(ids(&session), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_reorder_sections_defensive() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            plain(SectionType::About, "b"),
        ]));
        assert!(!session.reorder_sections(0, 1, 1));
        assert!(!session.reorder_sections(0, 2, 0));
        assert!(!session.reorder_sections(0, 0, 2));
        assert!(!session.reorder_sections(9, 0, 1));
        assert_eq!(ids(&session), vec!["a", "b"]);
    }

    #[test]
    fn test_update_block_shallow_merge() {
        let button = Block::button("Go", "/go", ButtonVariant::Secondary).with_id("btn");
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a").with_block(button),
        ]));
        let patch = BlockPatch::Button(ButtonPatch {
            href: Some("/start".into()),
            ..Default::default()
        });
        assert!(session.update_block("a", "btn", &patch));

        match &session.pages()[0].sections[0].blocks[0].props {
            BlockProps::Button(b) => {
                assert_eq!(b.text, "Go");
                assert_eq!(b.href, "/start");
                assert_eq!(b.variant, ButtonVariant::Secondary);
            }
            _ => panic!("expected button"),
        }
    }

    #[test]
    fn test_update_block_missing_or_mismatched() {
        let text = Block::text("Hi", TextVariant::H1).with_id("t");
        let content = home_with(vec![plain(SectionType::Hero, "a").with_block(text)]);
        let mut session = EditorSession::from_content(content.clone());

        assert!(!session.update_block("a", "nope", &BlockPatch::text_content("x")));
        assert!(!session.update_block("nope", "t", &BlockPatch::text_content("x")));
        assert!(!session.update_block("a", "t", &BlockPatch::Button(ButtonPatch::default())));
        assert_eq!(session.pages(), content.pages.as_slice());
    }

    #[test]
    fn test_update_block_json() {
        let text = Block::text("Hi", TextVariant::H1).with_id("t");
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a").with_block(text),
        ]));
        assert!(session
            .update_block_json("a", "t", serde_json::json!({ "content": "Hello" }))
            .unwrap());
        assert!(session
            .update_block_json("a", "t", serde_json::json!({ "href": "/x" }))
            .is_err());
        assert!(!session
            .update_block_json("a", "missing", serde_json::json!({ "href": "/x" }))
            .unwrap());
        match &session.pages()[0].sections[0].blocks[0].props {
            BlockProps::Text(t) => {
                assert_eq!(t.content, "Hello");
                assert_eq!(t.variant, TextVariant::H1);
            }
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn test_update_block_only_on_selected_page() {
        let text = Block::text("Hi", TextVariant::H1).with_id("t");
        let mut content = home_with(vec![]);
        content
            .pages
            .push(Page::new("About", "/about").with_section(plain(SectionType::About, "x").with_block(text)));
        let mut session = EditorSession::from_content(content);

        let patch = BlockPatch::Text(TextPatch {
            content: Some("changed".into()),
            variant: None,
        });
        assert!(!session.update_block("x", "t", &patch));
        session.set_selected_page(1);
        assert!(session.update_block("x", "t", &patch));
    }

    #[test]
    fn test_selecting_page_clears_section() {
        let mut session = EditorSession::from_content(home_with(vec![plain(SectionType::Hero, "a")]));
        session.set_selected_section(Some("a"));
        assert_eq!(session.selected_section().map(|s| s.id.as_str()), Some("a"));
        session.set_selected_page(0);
        assert_eq!(session.selected_section_id(), None);
    }

    #[test]
    fn test_undo_right_after_load_is_noop() {
        let content = home_with(vec![footer("s1")]);
        let mut session = EditorSession::from_content(content.clone());
        assert!(!session.undo());
        assert_eq!(session.history().index(), 0);
        assert_eq!(session.pages(), content.pages.as_slice());
    }

    #[test]
    fn test_snapshot_mutate_snapshot_undo() {
        let mut session = EditorSession::from_content(home_with(vec![footer("s1")]));
        session.save_snapshot();
        let before = session.pages().to_vec();

        session.add_section(SectionType::Hero);
        session.save_snapshot();
        assert!(session.undo());
        assert_eq!(session.pages(), before.as_slice());

        assert!(session.redo());
        assert_eq!(session.pages()[0].sections.len(), 2);
    }

    #[test]
    fn test_divergent_edit_drops_redo() {
        let mut session = EditorSession::from_content(home_with(vec![footer("s1")]));
        session.add_section(SectionType::Hero);
        session.save_snapshot();
        session.add_section(SectionType::About);
        session.save_snapshot();

        assert!(session.undo());
        session.add_section(SectionType::Contact);
        session.save_snapshot();
        assert!(!session.can_redo());
        assert!(!session.redo());
        assert!(session.pages()[0]
            .sections
            .iter()
            .all(|s| s.kind != SectionType::About));
    }

    #[test]
    fn test_snapshots_are_isolated_from_live_pages() {
        let text = Block::text("Original", TextVariant::Body).with_id("t");
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a").with_block(text),
        ]));
        session.save_snapshot();
        session.update_block("a", "t", &BlockPatch::text_content("Edited"));

        match &session.history().current()[0].sections[0].blocks[0].props {
            BlockProps::Text(t) => assert_eq!(t.content, "Original"),
            _ => panic!("expected text"),
        }

        session.undo();
        session.update_block("a", "t", &BlockPatch::text_content("Again"));
        match &session.history().entries()[0][0].sections[0].blocks[0].props {
            BlockProps::Text(t) => assert_eq!(t.content, "Original"),
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn test_history_capped_by_config() {
        let mut session = EditorSession::with_config(EditorConfig::default().with_max_history(5));
        session.set_content(home_with(vec![]));
        for _ in 0..20 {
            session.add_section(SectionType::About);
            session.save_snapshot();
        }
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history().index(), 4);
        while session.undo() {}
        assert_eq!(session.pages()[0].sections.len(), 16);
    }

    #[test]
    fn test_duplicate_section() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            footer("f"),
        ]));
        let copy = session.duplicate_section("a").unwrap();
        assert_eq!(ids(&session), vec!["a", copy.as_str(), "f"]);
        assert_eq!(session.selected_section_id(), Some(copy.as_str()));
        assert_eq!(session.duplicate_section("f"), None);
        assert_eq!(session.duplicate_section("missing"), None);
    }

    #[test]
    fn test_update_section_variant() {
        let mut session = EditorSession::from_content(home_with(vec![plain(SectionType::Hero, "a")]));
        assert!(session.update_section_variant("a", 3));
        assert!(!session.update_section_variant("a", 7));
        assert_eq!(session.pages()[0].sections[0].variant, 3);
    }

    #[test]
    fn test_pages_add_and_delete() {
        let mut session = EditorSession::from_content(home_with(vec![]));
        assert!(session.add_page("About", "/about"));
        assert!(!session.add_page("Home again", "/"));
        assert!(session.add_page("Contact", "/contact"));

        session.set_selected_page(2);
        assert!(session.delete_page(1));
        assert_eq!(session.selected_page_index(), 1);
        assert_eq!(session.selected_page().unwrap().slug, "/contact");

        assert!(session.delete_page(1));
        assert_eq!(session.selected_page_index(), 0);
        assert!(!session.delete_page(0));
        assert_eq!(session.pages().len(), 1);
    }

    #[test]
    fn test_apply_generation_section() {
        let mut session = EditorSession::from_content(home_with(vec![
            plain(SectionType::Hero, "a"),
            footer("f"),
        ]));
        let regenerated = plain(SectionType::Hero, "a")
            .with_block(Block::text("Fresh copy", TextVariant::H1));

        let mut job = Job::new(JobKind::Generate);
        job.start().unwrap();
        assert!(!session.apply_generation(&job));
        job.complete(Some(GenerationOutput::Section(regenerated.clone())))
            .unwrap();
        assert!(session.apply_generation(&job));
        assert_eq!(session.pages()[0].sections[0], regenerated);
        assert_eq!(ids(&session), vec!["a", "f"]);
    }

    #[test]
    fn test_apply_generation_content_resets_history() {
        let mut session = EditorSession::from_content(home_with(vec![footer("f")]));
        session.add_section(SectionType::Hero);
        session.save_snapshot();

        let mut job = Job::new(JobKind::Generate);
        job.start().unwrap();
        job.complete(Some(GenerationOutput::Content(home_with(vec![footer("new")]))))
            .unwrap();
        assert!(session.apply_generation(&job));
        assert_eq!(ids(&session), vec!["new"]);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_unsaved_changes_tracking() {
        let mut session = EditorSession::from_content(home_with(vec![footer("f")]));
        assert!(!session.has_unsaved_changes());
        session.add_section(SectionType::Hero);
        assert!(session.has_unsaved_changes());
        session.mark_saved();
        assert!(!session.has_unsaved_changes());
    }
}
