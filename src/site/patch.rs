//! Partial block props with shallow-merge semantics.
//!
//! A patch only ever targets one block kind: fields that are `Some` overwrite,
//! fields that are `None` keep the existing value. Applying a patch to a block
//! of a different kind changes nothing.

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};
use super::model::{BlockKind, BlockProps, ButtonVariant, ListItem, ListLayout, TextVariant};

/// Partial props for one block kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "lowercase")]
pub enum BlockPatch {
    Text(TextPatch),
    Image(ImagePatch),
    Button(ButtonPatch),
    List(ListPatch),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<TextVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPatch {
    /// Replaces the whole item list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ListItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ListLayout>,
}

impl BlockPatch {
    /// Parses a bare partial-props object for a block of the given kind.
    ///
    /// Unknown keys or values of the wrong type are rejected.
    pub fn from_json(kind: BlockKind, partial: serde_json::Value) -> SiteResult<Self> {
        let invalid = |e: serde_json::Error| SiteError::invalid_patch(kind.as_str(), e.to_string());
        Ok(match kind {
            BlockKind::Text => Self::Text(serde_json::from_value(partial).map_err(invalid)?),
            BlockKind::Image => Self::Image(serde_json::from_value(partial).map_err(invalid)?),
            BlockKind::Button => Self::Button(serde_json::from_value(partial).map_err(invalid)?),
            BlockKind::List => Self::List(serde_json::from_value(partial).map_err(invalid)?),
        })
    }

    /// Text patch that only replaces the content.
    pub fn text_content(content: impl Into<String>) -> Self {
        Self::Text(TextPatch {
            content: Some(content.into()),
            variant: None,
        })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Text(_) => BlockKind::Text,
            Self::Image(_) => BlockKind::Image,
            Self::Button(_) => BlockKind::Button,
            Self::List(_) => BlockKind::List,
        }
    }

    /// Merges into `props`. Returns false when the kinds differ.
    pub fn apply_to(&self, props: &mut BlockProps) -> bool {
        macro_rules! merge {
            ($target:expr, $patch:expr, $($field:ident),+) => {{
                $(
                    if let Some(v) = &$patch.$field {
                        $target.$field = v.clone();
                    }
                )+
            }};
        }

        match (self, props) {
            (Self::Text(p), BlockProps::Text(t)) => merge!(t, p, content, variant),
            (Self::Image(p), BlockProps::Image(t)) => merge!(t, p, src, alt),
            (Self::Button(p), BlockProps::Button(t)) => merge!(t, p, text, href, variant),
            (Self::List(p), BlockProps::List(t)) => merge!(t, p, items, layout),
            _ => return false,
        }
        true
    }
}
