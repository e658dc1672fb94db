//! WASM bindings for the site editor.
//!
//! This module provides JavaScript-friendly wrappers around
//! [`EditorSession`] and [`SiteManager`] for use in browser environments.

use js_sys::{Array, Uint8Array};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::SiteError;
use super::command::EditCommand;
use super::editor::{EditorConfig, EditorSession, MoveDirection};
use super::model::SiteContent;
use super::store::SiteManager;

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: SiteError| JsValue::from(e))
    };
}

// =============================================================================
// EDITOR SESSION
// =============================================================================

/// JavaScript-friendly wrapper around EditorSession.
///
/// One instance per open editor tab. Mutations return `true` when the document
/// changed and `false` when the target was not found.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Creates an empty session.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const session = new JsEditorSession();
    /// session.setContent(siteContent);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditorSession {
        JsEditorSession {
            inner: EditorSession::new(),
        }
    }

    /// Creates an empty session with a config object, e.g. `{ maxHistory: 100 }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<JsEditorSession, JsValue> {
        let config: EditorConfig = from_value(config)?;
        Ok(JsEditorSession {
            inner: EditorSession::with_config(config),
        })
    }

    /// Loads a document (`{ pages, settings }`) and resets selection and history.
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, content: JsValue) -> Result<(), JsValue> {
        let content: SiteContent = from_value(content)?;
        self.inner.set_content(content);
        Ok(())
    }

    /// Gets the live document as a JavaScript object.
    #[wasm_bindgen(js_name = getContent)]
    pub fn get_content(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.content())?)
    }

    /// Gets the live pages array.
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.pages())?)
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.settings())?)
    }

    #[wasm_bindgen(js_name = selectedPageIndex)]
    pub fn selected_page_index(&self) -> usize {
        self.inner.selected_page_index()
    }

    /// Selected section id, or undefined.
    #[wasm_bindgen(js_name = selectedSectionId)]
    pub fn selected_section_id(&self) -> Option<String> {
        self.inner.selected_section_id().map(str::to_string)
    }

    #[wasm_bindgen(js_name = setSelectedPage)]
    pub fn set_selected_page(&mut self, index: usize) {
        self.inner.set_selected_page(index);
    }

    #[wasm_bindgen(js_name = setSelectedSection)]
    pub fn set_selected_section(&mut self, id: Option<String>) {
        self.inner.set_selected_section(id.as_deref());
    }

    #[wasm_bindgen(js_name = hasUnsavedChanges)]
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.has_unsaved_changes()
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.inner.mark_saved();
    }
}

// =============================================================================
// STRUCTURAL OPERATIONS
// =============================================================================

#[wasm_bindgen]
impl JsEditorSession {
    /// Adds a default section by type name and returns its id.
    ///
    /// Throws on an unknown type name; returns undefined when the selected page
    /// does not exist.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const id = session.addSection('services');
    /// ```
    #[wasm_bindgen(js_name = addSection)]
    pub fn add_section(&mut self, section_type: &str) -> Result<Option<String>, JsValue> {
        js_result!(self.inner.add_section_named(section_type))
    }

    #[wasm_bindgen(js_name = deleteSection)]
    pub fn delete_section(&mut self, id: &str) -> bool {
        self.inner.delete_section(id)
    }

    /// Moves a section `'up'` or `'down'` on the selected page.
    #[wasm_bindgen(js_name = moveSection)]
    pub fn move_section(&mut self, id: &str, direction: &str) -> Result<bool, JsValue> {
        let direction = js_result!(direction.parse::<MoveDirection>())?;
        Ok(self.inner.move_section(id, direction))
    }

    #[wasm_bindgen(js_name = reorderSections)]
    pub fn reorder_sections(&mut self, page_index: usize, from_index: usize, to_index: usize) -> bool {
        self.inner.reorder_sections(page_index, from_index, to_index)
    }

    /// Shallow-merges partial props into a block.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// session.updateBlock(sectionId, blockId, { content: 'New headline' });
    /// ```
    #[wasm_bindgen(js_name = updateBlock)]
    pub fn update_block(
        &mut self,
        section_id: &str,
        block_id: &str,
        partial_props: JsValue,
    ) -> Result<bool, JsValue> {
        let partial: serde_json::Value = from_value(partial_props)?;
        js_result!(self.inner.update_block_json(section_id, block_id, partial))
    }

    #[wasm_bindgen(js_name = updateSectionVariant)]
    pub fn update_section_variant(&mut self, section_id: &str, variant: i32) -> bool {
        self.inner.update_section_variant(section_id, variant)
    }

    #[wasm_bindgen(js_name = duplicateSection)]
    pub fn duplicate_section(&mut self, section_id: &str) -> Option<String> {
        self.inner.duplicate_section(section_id)
    }

    #[wasm_bindgen(js_name = addPage)]
    pub fn add_page(&mut self, title: &str, slug: &str) -> bool {
        self.inner.add_page(title, slug)
    }

    #[wasm_bindgen(js_name = deletePage)]
    pub fn delete_page(&mut self, index: usize) -> bool {
        self.inner.delete_page(index)
    }

    /// Runs a serialized command, e.g. `{ op: 'addSection', sectionType: 'hero' }`.
    pub fn execute(&mut self, command: JsValue) -> Result<bool, JsValue> {
        let command: EditCommand = from_value(command)?;
        js_result!(self.inner.execute(command))
    }
}

// =============================================================================
// HISTORY
// =============================================================================

#[wasm_bindgen]
impl JsEditorSession {
    /// Records the current pages as one undo step.
    #[wasm_bindgen(js_name = saveSnapshot)]
    pub fn save_snapshot(&mut self) {
        self.inner.save_snapshot();
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }
}

impl Default for JsEditorSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SITE DOCUMENT
// =============================================================================

/// JavaScript-friendly wrapper around SiteManager (durable drafts and versions).
#[wasm_bindgen]
pub struct JsSiteDocument {
    inner: SiteManager,
}

#[wasm_bindgen]
impl JsSiteDocument {
    /// Creates a stored document for a site from a content object.
    #[wasm_bindgen(constructor)]
    pub fn new(site_id: &str, content: JsValue) -> Result<JsSiteDocument, JsValue> {
        let content: SiteContent = from_value(content)?;
        let inner = js_result!(SiteManager::new(site_id, content))?;
        Ok(JsSiteDocument { inner })
    }

    /// Loads from binary bytes (Uint8Array).
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: &[u8]) -> Result<JsSiteDocument, JsValue> {
        let inner = js_result!(SiteManager::from_bytes(bytes))?;
        Ok(JsSiteDocument { inner })
    }

    /// Saves to binary bytes (returns Uint8Array).
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&mut self) -> Uint8Array {
        let bytes = self.inner.save();
        Uint8Array::from(&bytes[..])
    }

    #[wasm_bindgen(js_name = getContent)]
    pub fn get_content(&mut self) -> Result<JsValue, JsValue> {
        let content = js_result!(self.inner.content())?;
        Ok(to_js_value(&content)?)
    }

    /// Saves the session's pages as a new version and returns it.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const version = doc.saveDraft(session);
    /// session.markSaved();
    /// console.log(version.versionNumber);
    /// ```
    #[wasm_bindgen(js_name = saveDraft)]
    pub fn save_draft(&mut self, session: &JsEditorSession) -> Result<JsValue, JsValue> {
        let version = js_result!(self.inner.save_draft(session.inner.pages()))?;
        Ok(to_js_value(&version)?)
    }

    /// Saves the session's whole document (settings included) if it changed.
    ///
    /// Returns the new version, or undefined when nothing differs.
    #[wasm_bindgen(js_name = saveContent)]
    pub fn save_content(&mut self, session: &JsEditorSession) -> Result<JsValue, JsValue> {
        let version = js_result!(self.inner.save_content(&session.inner.content()))?;
        Ok(to_js_value(&version)?)
    }

    #[wasm_bindgen(js_name = getVersions)]
    pub fn get_versions(&mut self) -> Result<JsValue, JsValue> {
        let versions = js_result!(self.inner.versions())?;
        Ok(to_js_value(&versions)?)
    }

    #[wasm_bindgen(js_name = restoreVersion)]
    pub fn restore_version(&mut self, version_id: &str) -> Result<JsValue, JsValue> {
        let version = js_result!(self.inner.restore_version(version_id))?;
        Ok(to_js_value(&version)?)
    }

    /// Gets the current heads (for sync protocol).
    #[wasm_bindgen(js_name = getHeads)]
    pub fn get_heads(&mut self) -> Array {
        let heads = self.inner.get_heads();
        let array = Array::new();
        for head in heads {
            array.push(&JsValue::from_str(&head.to_string()));
        }
        array
    }

    /// Applies sync message bytes from a peer.
    #[wasm_bindgen(js_name = applySyncMessage)]
    pub fn apply_sync_message(&mut self, msg: &[u8]) -> Result<(), JsValue> {
        js_result!(self.inner.apply_sync_message(msg))
    }
}
