//! Template resolver: builds a new section's default content from its type and
//! the current site settings.
//!
//! Resolution is total over [`SectionType`]. The only failure mode is an
//! unrecognized type *name* reaching [`create_default_section_named`], which is
//! a caller bug and surfaces as [`SiteError::UnknownSectionType`].

use chrono::Datelike;

use crate::error::SiteResult;
use super::model::{
    Block, ButtonVariant, ListItem, ListLayout, Section, SectionType, SiteSettings, TextVariant,
};

const FALLBACK_CTA: &str = "Get Started";
const FALLBACK_DESCRIPTION: &str = "We help our customers with quality work and friendly service.";
const PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x600";

/// Builds a section of the given type with fresh ids and settings-derived content.
pub fn create_default_section(kind: SectionType, settings: &SiteSettings) -> Section {
    create_default_section_for_year(kind, settings, chrono::Local::now().year())
}

/// Parses a section type name and builds its default section.
pub fn create_default_section_named(kind: &str, settings: &SiteSettings) -> SiteResult<Section> {
    let kind: SectionType = kind.parse()?;
    Ok(create_default_section(kind, settings))
}

/// Same as [`create_default_section`] with the footer year supplied by the caller.
pub fn create_default_section_for_year(
    kind: SectionType,
    settings: &SiteSettings,
    year: i32,
) -> Section {
    let name = settings.business_name.as_str();
    let description = non_empty(&settings.description, FALLBACK_DESCRIPTION);

    let section = Section::new(kind);
    match kind {
        SectionType::Hero => section
            .with_block(Block::text(format!("Welcome to {}", name), TextVariant::H1))
            .with_block(Block::text(description, TextVariant::Body))
            .with_block(Block::button(
                non_empty(&settings.primary_cta, FALLBACK_CTA),
                "#contact",
                ButtonVariant::Primary,
            )),
        SectionType::About => section
            .with_block(Block::text(format!("About {}", name), TextVariant::H2))
            .with_block(Block::text(description, TextVariant::Body))
            .with_block(Block::image(PLACEHOLDER_IMAGE, format!("{} team", name))),
        SectionType::Services => section
            .with_block(Block::text("Our Services", TextVariant::H2))
            .with_block(Block::list(
                vec![
                    ListItem::new("Consultation", "Tell us what you need and we will plan it with you.")
                        .with_icon("chat"),
                    ListItem::new("Delivery", "Reliable work delivered on schedule.").with_icon("check"),
                    ListItem::new("Support", "We stay available after the job is done.")
                        .with_icon("heart"),
                ],
                ListLayout::Grid,
            )),
        SectionType::Testimonials => section
            .with_block(Block::text("What Our Clients Say", TextVariant::H2))
            .with_block(Block::list(
                vec![
                    ListItem::new("Jordan P.", format!("{} exceeded our expectations.", name)),
                    ListItem::new("Sam R.", "Professional, quick, and easy to work with."),
                ],
                ListLayout::List,
            )),
        SectionType::Contact => section
            .with_block(Block::text("Get in Touch", TextVariant::H2))
            .with_block(Block::text(
                format!("Email: {}", settings.contact_email),
                TextVariant::Body,
            ))
            .with_block(Block::text(
                format!("Phone: {}", settings.contact_phone),
                TextVariant::Body,
            ))
            .with_block(Block::button(
                "Send Message",
                format!("mailto:{}", settings.contact_email),
                ButtonVariant::Primary,
            )),
        SectionType::Footer => section.with_block(Block::text(
            format!("© {} {}. All rights reserved.", year, name),
            TextVariant::Small,
        )),
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;
    use crate::site::model::BlockProps;
    use std::collections::HashSet;

    fn settings() -> SiteSettings {
        SiteSettings::new("Bright Dental")
            .with_description("Family dentistry")
            .with_primary_cta("Book Now")
            .with_contact("hello@bright.test", "555-0100")
    }

    fn text_of(section: &Section, index: usize) -> &str {
        match &section.blocks[index].props {
            BlockProps::Text(t) => &t.content,
            other => panic!("expected text block, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_hero_uses_business_name() {
        let section = create_default_section(SectionType::Hero, &settings());
        assert_eq!(section.kind, SectionType::Hero);
        assert_eq!(text_of(&section, 0), "Welcome to Bright Dental");
        assert_eq!(text_of(&section, 1), "Family dentistry");
        match &section.blocks[2].props {
            BlockProps::Button(b) => assert_eq!(b.text, "Book Now"),
            _ => panic!("expected button"),
        }
    }

    #[test]
    fn test_contact_embeds_email_and_phone() {
        let section = create_default_section(SectionType::Contact, &settings());
        assert!(text_of(&section, 1).contains("hello@bright.test"));
        assert!(text_of(&section, 2).contains("555-0100"));
    }

    #[test]
    fn test_footer_embeds_year_and_name() {
        let section = create_default_section_for_year(SectionType::Footer, &settings(), 2031);
        assert_eq!(text_of(&section, 0), "© 2031 Bright Dental. All rights reserved.");
    }

    #[test]
    fn test_all_types_get_unique_ids() {
        let mut ids = HashSet::new();
        for kind in SectionType::ALL {
            let section = create_default_section(kind, &settings());
            assert_eq!(section.kind, kind);
            assert!(!section.blocks.is_empty());
            assert!(ids.insert(section.id.clone()));
            for block in &section.blocks {
                assert!(ids.insert(block.id.clone()));
            }
        }
    }

    #[test]
    fn test_empty_cta_falls_back() {
        let section = create_default_section(SectionType::Hero, &SiteSettings::new("X"));
        match &section.blocks[2].props {
            BlockProps::Button(b) => assert_eq!(b.text, FALLBACK_CTA),
            _ => panic!("expected button"),
        }
    }

    #[test]
    fn test_named_rejects_unknown_type() {
        let err = create_default_section_named("pricing", &settings()).unwrap_err();
        assert!(matches!(err, SiteError::UnknownSectionType(_)));
        assert!(create_default_section_named("about", &settings()).is_ok());
    }
}
