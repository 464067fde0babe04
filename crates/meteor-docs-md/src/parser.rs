//! Markdown document parser.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed Markdown document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Every heading, in document order
    pub toc: Vec<TocEntry>,
}

impl ParsedDoc {
    /// Text of the first level-1 heading.
    pub fn first_heading(&self) -> Option<&str> {
        self.toc
            .iter()
            .find(|e| e.level == 1)
            .map(|e| e.title.as_str())
    }

    /// Title from frontmatter, else the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or_else(|| self.first_heading())
    }

    /// Table of contents entries shown beside the page (levels 2 and 3).
    pub fn page_toc(&self) -> Vec<&TocEntry> {
        if self
            .frontmatter
            .as_ref()
            .is_some_and(|f| f.hide_table_of_contents)
        {
            return Vec::new();
        }
        self.toc
            .iter()
            .filter(|e| (2..=3).contains(&e.level))
            .collect()
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a Markdown document.
///
/// Extracts frontmatter and headings.
pub fn parse_doc(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut toc = Vec::new();
    let mut current_heading: Option<(u8, String)> = None; // (level, text)
    let mut slugs = SlugSet::default();

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugs.unique(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        toc,
    })
}

/// Hands out heading slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub(crate) struct SlugSet {
    seen: std::collections::HashMap<String, usize>,
}

impl SlugSet {
    pub(crate) fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_doc() {
        let source = r#"---
title: Recipes
description: How recipes are written
---

# Recipe

A recipe is a set of instructions.

```yaml title="sample-recipe.yaml"
name: main-kafka-production
source:
  type: kafka
```

## Sinks

Where metadata goes.

```bash
meteor run recipe.yaml
```
"#;

        let doc = parse_doc(source).unwrap();

        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title.as_deref(), Some("Recipes"));
        assert_eq!(doc.title(), Some("Recipes"));

        assert!(doc.content.starts_with("# Recipe"));
        assert!(doc.content.contains("type: kafka"));

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Recipe");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[1].id, "sinks");
        assert_eq!(doc.page_toc().len(), 1);
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let doc = parse_doc("Intro text\n\n# Installation\n\n## Homebrew").unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.title(), Some("Installation"));
    }

    #[test]
    fn includes_inline_code_in_headings() {
        let doc = parse_doc("## The `meteor run` command").unwrap();

        assert_eq!(doc.toc[0].title, "The meteor run command");
        assert_eq!(doc.toc[0].id, "the-meteor-run-command");
    }

    #[test]
    fn repeated_headings_get_unique_ids() {
        let doc = parse_doc("## Usage\n\n## Usage\n\n## Usage").unwrap();

        let ids: Vec<&str> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["usage", "usage-1", "usage-2"]);
    }

    #[test]
    fn hidden_toc_is_empty() {
        let doc = parse_doc("---\nhide_table_of_contents: true\n---\n## A\n## B").unwrap();

        assert!(doc.page_toc().is_empty());
        assert_eq!(doc.toc.len(), 2);
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Sink (HTTP)"), "sink-http");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("list_Plugins"), "list-plugins");
    }
}
