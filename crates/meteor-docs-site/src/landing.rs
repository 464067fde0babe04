//! Landing page content: hero banner and fixed content grids.

use serde::{Deserialize, Serialize};

use crate::descriptor::Shade;

/// The landing page, rendered at the site root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    /// Meta description for the page
    #[serde(default)]
    pub description: String,

    pub hero: Hero,

    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Hero banner. Its heading is the site tagline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    #[serde(default)]
    pub subtitle: String,

    pub call_to_action: CallToAction,

    #[serde(default)]
    pub banner_image: Option<String>,

    /// Decorative background pattern
    #[serde(default)]
    pub pattern_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    pub label: String,
    /// Site-relative path
    pub to: String,
}

/// Grid layout of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    #[default]
    OneColumn,
    TwoColumn,
    ThreeColumn,
    FourColumn,
}

impl GridLayout {
    pub fn columns(&self) -> u8 {
        match self {
            Self::OneColumn => 1,
            Self::TwoColumn => 2,
            Self::ThreeColumn => 3,
            Self::FourColumn => 4,
        }
    }
}

/// A titled section with an intro paragraph and a grid of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    #[serde(default)]
    pub intro: String,

    #[serde(default)]
    pub background: Shade,

    #[serde(default)]
    pub layout: GridLayout,

    #[serde(default)]
    pub blocks: Vec<ContentBlock>,

    /// Illustration shown beside the grid
    #[serde(default)]
    pub image: Option<String>,
}

/// One grid entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub image: Option<String>,
}

impl LandingPage {
    /// Parse landing content from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Every image reference on the page, in document order.
    pub fn image_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        refs.extend(self.hero.pattern_image.as_deref());
        refs.extend(self.hero.banner_image.as_deref());
        for section in &self.sections {
            for block in &section.blocks {
                refs.extend(block.image.as_deref());
            }
            refs.extend(section.image.as_deref());
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_with_defaults() {
        let source = r#"
[hero]
subtitle = "Collect metadata"
call_to_action = { label = "Documentation", to = "docs/introduction" }

[[sections]]
title = "Framework"
background = "dark"
layout = "three_column"

[[sections.blocks]]
title = "Extraction"
body = "Extractors are the source of metadata."

[[sections]]
title = "Plain"
"#;

        let page = LandingPage::from_toml(source).unwrap();

        assert_eq!(page.sections.len(), 2);
        let framework = page.section("Framework").unwrap();
        assert_eq!(framework.background, Shade::Dark);
        assert_eq!(framework.layout.columns(), 3);
        assert_eq!(framework.blocks[0].title, "Extraction");

        let plain = page.section("Plain").unwrap();
        assert_eq!(plain.background, Shade::Light);
        assert_eq!(plain.layout, GridLayout::OneColumn);
        assert!(plain.blocks.is_empty());
    }

    #[test]
    fn collects_image_refs_in_order() {
        let page = LandingPage::from_toml(crate::meteor::LANDING_TOML).unwrap();

        assert_eq!(
            page.image_refs(),
            vec!["img/pattern.svg", "img/banner.svg", "assets/overview.svg"]
        );
    }
}
