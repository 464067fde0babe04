//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a Markdown document. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Overrides the file stem as the last segment of the document id
    #[serde(default)]
    pub id: Option<String>,

    /// Page title; falls back to the first heading
    #[serde(default)]
    pub title: Option<String>,

    /// Shorter label for the sidebar entry
    #[serde(default)]
    pub sidebar_label: Option<String>,

    /// Page description for SEO
    #[serde(default)]
    pub description: Option<String>,

    /// Custom route under `docs/`
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub hide_table_of_contents: bool,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Extract frontmatter from Markdown content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(
    source: &str,
) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block is valid and means "no keys"
    let frontmatter: Frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
id: installation
title: Installing Meteor
sidebar_label: Installation
description: Install the meteor CLI
keywords: [install, cli]
---

# Installation
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.id.as_deref(), Some("installation"));
        assert_eq!(fm.title.as_deref(), Some("Installing Meteor"));
        assert_eq!(fm.sidebar_label.as_deref(), Some("Installation"));
        assert_eq!(fm.keywords, vec!["install", "cli"]);
        assert!(!fm.hide_table_of_contents);
        assert!(content.starts_with("# Installation"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn accepts_empty_block() {
        let (fm, content) = extract_frontmatter("---\n---\n# Body").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "# Body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
