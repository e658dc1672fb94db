//! Data models for the site document.
//!
//! A site is an ordered list of pages; a page is an ordered list of sections;
//! a section is an ordered list of blocks. Block props are a sum type so the
//! shape of the props always matches the block kind.
//!
//! All types use autosurgeon derives so the store can reconcile them into an
//! Automerge document, and serde derives for the JSON contract (camelCase keys).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use autosurgeon::{Hydrate, Reconcile};
use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};

/// Allowed values for [`Section::variant`].
pub const SECTION_VARIANTS: [i32; 3] = [1, 2, 3];

/// Generates a fresh opaque id for a section, block, or list item.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generates `as_str`, `Display` and `FromStr` for a closed, lowercase string enum.
macro_rules! string_enum {
    ($name:ident, $err:expr, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the wire name of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SiteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($err(other)),
                }
            }
        }
    };
}

// =============================================================================
// SITE CONTENT
// =============================================================================

/// Root document: ordered pages plus the site-wide settings.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct SiteContent {
    /// Page order defines navigation order.
    pub pages: Vec<Page>,
    pub settings: SiteSettings,
}

impl SiteContent {
    /// Creates a document from pages and settings.
    pub fn new(pages: Vec<Page>, settings: SiteSettings) -> Self {
        Self { pages, settings }
    }

    /// Finds a page by its routing slug.
    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Total number of sections across all pages.
    pub fn section_count(&self) -> usize {
        self.pages.iter().map(|p| p.sections.len()).sum()
    }

    /// Checks the document-wide uniqueness invariants.
    ///
    /// Slugs are unique across pages, section ids are unique across the whole
    /// document, and block ids are unique within their section.
    pub fn validate(&self) -> SiteResult<()> {
        let mut slugs = HashSet::new();
        let mut section_ids = HashSet::new();
        for page in &self.pages {
            if !slugs.insert(page.slug.as_str()) {
                return Err(SiteError::duplicate_slug(&page.slug));
            }
            for section in &page.sections {
                if !section_ids.insert(section.id.as_str()) {
                    return Err(SiteError::duplicate_id(&section.id));
                }
                let mut block_ids = HashSet::new();
                for block in &section.blocks {
                    if !block_ids.insert(block.id.as_str()) {
                        return Err(SiteError::duplicate_id(&block.id));
                    }
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Flat site configuration. Doubles as display data for default block content
/// and as generation parameters.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub business_name: String,
    pub industry: String,
    pub description: String,
    /// Style preset name, e.g. "modern" or "classic".
    pub style: String,
    /// CSS color, e.g. "#3b82f6".
    pub accent_color: String,
    /// Primary call-to-action label.
    pub primary_cta: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl SiteSettings {
    /// Creates settings with just a business name.
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            ..Default::default()
        }
    }

    /// Builder: Set industry.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set primary call-to-action label.
    pub fn with_primary_cta(mut self, cta: impl Into<String>) -> Self {
        self.primary_cta = cta.into();
        self
    }

    /// Builder: Set contact details.
    pub fn with_contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.contact_email = email.into();
        self.contact_phone = phone.into();
        self
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// One routable page.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub title: String,
    /// Routing key, unique within a [`SiteContent`].
    pub slug: String,
    /// Top-to-bottom rendering order.
    pub sections: Vec<Section>,
}

impl Page {
    /// Creates an empty page.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            sections: Vec::new(),
        }
    }

    /// Builder: Append a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Returns the position of the section with the given id.
    pub fn position_of(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    /// Gets a section by id.
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Gets a mutable section by id.
    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// Index of the first footer section, if any.
    pub fn footer_position(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.kind == SectionType::Footer)
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// Closed set of section kinds. Fixed at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reconcile, Hydrate, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    #[default]
    Hero,
    About,
    Services,
    Testimonials,
    Contact,
    Footer,
}

string_enum!(SectionType, SiteError::unknown_section_type, {
    Hero => "hero",
    About => "about",
    Services => "services",
    Testimonials => "testimonials",
    Contact => "contact",
    Footer => "footer",
});

impl SectionType {
    /// Every section type, in palette order.
    pub const ALL: [SectionType; 6] = [
        SectionType::Hero,
        SectionType::About,
        SectionType::Services,
        SectionType::Testimonials,
        SectionType::Contact,
        SectionType::Footer,
    ];
}

/// A removable, reorderable unit of page content.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct Section {
    /// Stable opaque id, unique within the document.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    /// Presentation style selector, one of [`SECTION_VARIANTS`].
    pub variant: i32,
    pub blocks: Vec<Block>,
}

impl Section {
    /// Creates an empty section with a fresh id and variant 1.
    pub fn new(kind: SectionType) -> Self {
        Self {
            id: new_id(),
            kind,
            variant: SECTION_VARIANTS[0],
            blocks: Vec::new(),
        }
    }

    /// Builder: Override the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder: Append a block.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Gets a block by id.
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Gets a mutable block by id.
    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    /// Deep copy with fresh ids for the section, its blocks, and list items.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        for block in &mut copy.blocks {
            block.id = new_id();
            if let BlockProps::List(list) = &mut block.props {
                for item in &mut list.items {
                    item.id = new_id();
                }
            }
        }
        copy
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// Closed set of block kinds. The kind is derived from [`BlockProps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Button,
    List,
}

string_enum!(BlockKind, SiteError::unknown_block_kind, {
    Text => "text",
    Image => "image",
    Button => "button",
    List => "list",
});

/// The smallest editable unit.
///
/// Serialized as `{ "id", "type", "props" }`. Kind and props are written
/// together only when the block is created.
#[derive(Debug, Clone, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(into = "RawBlock", try_from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub props: BlockProps,
}

impl Block {
    /// Creates a block with a fresh id.
    pub fn new(props: BlockProps) -> Self {
        Self { id: new_id(), props }
    }

    /// Builder: Override the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Shorthand for a text block.
    pub fn text(content: impl Into<String>, variant: TextVariant) -> Self {
        Self::new(BlockProps::Text(TextProps {
            content: content.into(),
            variant,
        }))
    }

    /// Shorthand for an image block.
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new(BlockProps::Image(ImageProps {
            src: src.into(),
            alt: alt.into(),
        }))
    }

    /// Shorthand for a button block.
    pub fn button(text: impl Into<String>, href: impl Into<String>, variant: ButtonVariant) -> Self {
        Self::new(BlockProps::Button(ButtonProps {
            text: text.into(),
            href: href.into(),
            variant,
        }))
    }

    /// Shorthand for a list block.
    pub fn list(items: Vec<ListItem>, layout: ListLayout) -> Self {
        Self::new(BlockProps::List(ListProps { items, layout }))
    }

    pub fn kind(&self) -> BlockKind {
        self.props.kind()
    }
}

/// JSON form of a block: the kind tag sits next to the props.
#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    props: serde_json::Value,
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let kind = block.kind();
        let props = match block.props {
            BlockProps::Text(p) => serde_json::to_value(p),
            BlockProps::Image(p) => serde_json::to_value(p),
            BlockProps::Button(p) => serde_json::to_value(p),
            BlockProps::List(p) => serde_json::to_value(p),
        }
        .unwrap_or(serde_json::Value::Null);
        Self {
            id: block.id,
            kind,
            props,
        }
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let props = match raw.kind {
            BlockKind::Text => BlockProps::Text(serde_json::from_value(raw.props)?),
            BlockKind::Image => BlockProps::Image(serde_json::from_value(raw.props)?),
            BlockKind::Button => BlockProps::Button(serde_json::from_value(raw.props)?),
            BlockKind::List => BlockProps::List(serde_json::from_value(raw.props)?),
        };
        Ok(Self { id: raw.id, props })
    }
}

/// Block props keyed by kind.
#[derive(Debug, Clone, PartialEq, Reconcile, Hydrate)]
pub enum BlockProps {
    Text(TextProps),
    Image(ImageProps),
    Button(ButtonProps),
    List(ListProps),
}

impl BlockProps {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Text(_) => BlockKind::Text,
            Self::Image(_) => BlockKind::Image,
            Self::Button(_) => BlockKind::Button,
            Self::List(_) => BlockKind::List,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct TextProps {
    pub content: String,
    pub variant: TextVariant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reconcile, Hydrate, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    H1,
    H2,
    H3,
    #[default]
    Body,
    Small,
}

string_enum!(TextVariant, |v: &str| SiteError::invalid_value("text variant", v), {
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    Body => "body",
    Small => "small",
});

#[derive(Debug, Clone, Default, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct ButtonProps {
    pub text: String,
    pub href: String,
    pub variant: ButtonVariant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reconcile, Hydrate, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
}

string_enum!(ButtonVariant, |v: &str| SiteError::invalid_value("button variant", v), {
    Primary => "primary",
    Secondary => "secondary",
});

#[derive(Debug, Clone, Default, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct ListProps {
    pub items: Vec<ListItem>,
    pub layout: ListLayout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reconcile, Hydrate, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListLayout {
    #[default]
    Grid,
    List,
}

string_enum!(ListLayout, |v: &str| SiteError::invalid_value("list layout", v), {
    Grid => "grid",
    List => "list",
});

/// One entry of a list block (a service, a testimonial, ...).
#[derive(Debug, Clone, Default, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ListItem {
    /// Creates a list item with a fresh id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            icon: None,
        }
    }

    /// Builder: Set icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

// =============================================================================
// SITE VERSION
// =============================================================================

/// A durable, numbered snapshot of a site's pages.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteVersion {
    pub id: String,
    /// Starts at 1, increments on every save.
    pub version_number: i64,
    pub pages: Vec<Page>,
    /// Milliseconds since epoch.
    pub created_at: i64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SiteContent {
        let hero = Section::new(SectionType::Hero)
            .with_id("s-hero")
            .with_block(Block::text("Welcome", TextVariant::H1).with_id("b1"));
        let footer = Section::new(SectionType::Footer).with_id("s-footer");
        SiteContent::new(
            vec![
                Page::new("Home", "/").with_section(hero).with_section(footer),
                Page::new("About", "/about"),
            ],
            SiteSettings::new("Acme"),
        )
    }

    #[test]
    fn test_section_type_parse() {
        assert_eq!("hero".parse::<SectionType>().unwrap(), SectionType::Hero);
        assert_eq!(SectionType::Testimonials.to_string(), "testimonials");
        let err = "gallery".parse::<SectionType>().unwrap_err();
        assert!(matches!(err, SiteError::UnknownSectionType(ref s) if s == "gallery"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_slug() {
        let mut content = sample();
        content.pages[1].slug = "/".to_string();
        assert!(matches!(content.validate(), Err(SiteError::DuplicateSlug(_))));
    }

    #[test]
    fn test_validate_duplicate_section_across_pages() {
        let mut content = sample();
        let copy = content.pages[0].sections[0].clone();
        content.pages[1].sections.push(copy);
        assert!(matches!(content.validate(), Err(SiteError::DuplicateId(ref id)) if id == "s-hero"));
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::button("Call us", "tel:555", ButtonVariant::Secondary).with_id("b9");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["id"], "b9");
        assert_eq!(json["type"], "button");
        assert_eq!(json["props"]["text"], "Call us");
        assert_eq!(json["props"]["variant"], "secondary");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_block_json_rejects_mismatched_props() {
        let json = serde_json::json!({
            "id": "b1",
            "type": "image",
            "props": { "content": "hi", "variant": "h1" }
        });
        assert!(serde_json::from_value::<Block>(json).is_err());
    }

    #[test]
    fn test_section_json_shape() {
        let json = serde_json::to_value(&sample().pages[0].sections[0]).unwrap();
        assert_eq!(json["type"], "hero");
        assert_eq!(json["variant"], 1);
        assert_eq!(json["blocks"][0]["props"]["variant"], "h1");
    }

    #[test]
    fn test_settings_camel_case() {
        let settings: SiteSettings = serde_json::from_value(serde_json::json!({
            "businessName": "Acme",
            "contactEmail": "hi@acme.test"
        }))
        .unwrap();
        assert_eq!(settings.business_name, "Acme");
        assert_eq!(settings.contact_email, "hi@acme.test");
        assert_eq!(settings.contact_phone, "");
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let section = Section::new(SectionType::Services).with_block(Block::list(
            vec![ListItem::new("Design", "Pixel work")],
            ListLayout::Grid,
        ));
        let copy = section.duplicate();
        assert_ne!(copy.id, section.id);
        assert_ne!(copy.blocks[0].id, section.blocks[0].id);
        match (&copy.blocks[0].props, &section.blocks[0].props) {
            (BlockProps::List(a), BlockProps::List(b)) => {
                assert_ne!(a.items[0].id, b.items[0].id);
                assert_eq!(a.items[0].title, b.items[0].title);
            }
            _ => panic!("expected list blocks"),
        }
    }

    #[test]
    fn test_footer_position() {
        let content = sample();
        assert_eq!(content.pages[0].footer_position(), Some(1));
        assert_eq!(content.pages[1].footer_position(), None);
        assert!(content.page_by_slug("/about").is_some());
        assert_eq!(content.section_count(), 2);
    }
}
