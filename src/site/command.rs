//! Serializable editor commands.
//!
//! Lets a transport (CLI script, browser message, HTTP body) drive an
//! [`EditorSession`] without binding to its method signatures.

use serde::{Deserialize, Serialize};

use crate::error::SiteResult;
use super::editor::{EditorSession, MoveDirection};
use super::model::{SectionType, SiteContent};

/// One session operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditCommand {
    SetContent {
        content: SiteContent,
    },
    SelectPage {
        index: usize,
    },
    SelectSection {
        #[serde(default)]
        id: Option<String>,
    },
    /// Section type by name; unknown names fail.
    AddSection {
        section_type: String,
    },
    DeleteSection {
        id: String,
    },
    MoveSection {
        id: String,
        direction: MoveDirection,
    },
    ReorderSections {
        page_index: usize,
        from_index: usize,
        to_index: usize,
    },
    /// Bare partial props, interpreted against the target block's kind.
    UpdateBlock {
        section_id: String,
        block_id: String,
        props: serde_json::Value,
    },
    UpdateSectionVariant {
        section_id: String,
        variant: i32,
    },
    DuplicateSection {
        id: String,
    },
    AddPage {
        title: String,
        slug: String,
    },
    DeletePage {
        index: usize,
    },
    SaveSnapshot,
    Undo,
    Redo,
}

impl EditCommand {
    /// Parses a JSON array of commands.
    pub fn parse_list(json: &str) -> SiteResult<Vec<EditCommand>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl EditorSession {
    /// Runs one command.
    ///
    /// Returns whether the session changed. Missing targets yield `Ok(false)`;
    /// only malformed input (unknown section type, bad props) is an error.
    pub fn execute(&mut self, command: EditCommand) -> SiteResult<bool> {
        Ok(match command {
            EditCommand::SetContent { content } => {
                self.set_content(content);
                true
            }
            EditCommand::SelectPage { index } => {
                self.set_selected_page(index);
                true
            }
            EditCommand::SelectSection { id } => {
                self.set_selected_section(id.as_deref());
                true
            }
            EditCommand::AddSection { section_type } => {
                let kind: SectionType = section_type.parse()?;
                self.add_section(kind).is_some()
            }
            EditCommand::DeleteSection { id } => self.delete_section(&id),
            EditCommand::MoveSection { id, direction } => self.move_section(&id, direction),
            EditCommand::ReorderSections {
                page_index,
                from_index,
                to_index,
            } => self.reorder_sections(page_index, from_index, to_index),
            EditCommand::UpdateBlock {
                section_id,
                block_id,
                props,
            } => self.update_block_json(&section_id, &block_id, props)?,
            EditCommand::UpdateSectionVariant {
                section_id,
                variant,
            } => self.update_section_variant(&section_id, variant),
            EditCommand::DuplicateSection { id } => self.duplicate_section(&id).is_some(),
            EditCommand::AddPage { title, slug } => self.add_page(&title, &slug),
            EditCommand::DeletePage { index } => self.delete_page(index),
            EditCommand::SaveSnapshot => {
                self.save_snapshot();
                true
            }
            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),
        })
    }

    /// Runs commands in order, stopping at the first error.
    pub fn execute_all(&mut self, commands: Vec<EditCommand>) -> SiteResult<usize> {
        let mut changed = 0;
        for command in commands {
            if self.execute(command)? {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
