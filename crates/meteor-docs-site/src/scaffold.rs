//! Starter project for a fresh Meteor docs checkout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::meteor::{meteor_project, LANDING_TOML, SIDEBAR_TOML, SITE_TOML};
use crate::SiteError;

/// A file of the starter project, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: String,
    pub contents: String,
}

impl ScaffoldFile {
    fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Every file of the starter project, in write order.
///
/// Includes the three site records, a stub document for every sidebar leaf,
/// the `help` page, the custom stylesheets and placeholder static assets.
pub fn meteor_scaffold() -> Result<Vec<ScaffoldFile>, SiteError> {
    let project = meteor_project()?;

    let mut files = vec![
        ScaffoldFile::new("site.toml", SITE_TOML),
        ScaffoldFile::new("sidebars.toml", SIDEBAR_TOML),
        ScaffoldFile::new("landing.toml", LANDING_TOML),
    ];

    let ids = project.sidebar.doc_ids();
    for id in &ids {
        files.push(ScaffoldFile::new(format!("docs/{}.md", id), stub_doc(id, &ids)));
    }

    files.push(ScaffoldFile::new("pages/help.md", HELP_PAGE));

    for css in &project.descriptor.theme.custom_css {
        files.push(ScaffoldFile::new(css.clone(), "/* Site overrides */\n"));
    }

    let mut assets: Vec<&str> = Vec::new();
    if let Some(favicon) = project.descriptor.favicon.as_deref() {
        assets.push(favicon);
    }
    if let Some(logo) = project.descriptor.navbar.logo.as_ref() {
        assets.push(&logo.src);
    }
    assets.extend(project.landing.image_refs());

    for asset in assets {
        let contents = if asset.ends_with(".svg") {
            PLACEHOLDER_SVG
        } else {
            ""
        };
        files.push(ScaffoldFile::new(format!("static/{}", asset), contents));
    }

    Ok(files)
}

/// Write the starter project below `root`.
///
/// Existing files are kept unless `overwrite` is set. Returns the paths written.
pub fn write_scaffold(root: &Path, overwrite: bool) -> Result<Vec<PathBuf>, SiteError> {
    let mut written = Vec::new();

    for file in meteor_scaffold()? {
        let path = root.join(&file.path);
        if path.exists() && !overwrite {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::Write {
                file: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, &file.contents).map_err(|e| SiteError::Write {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;

        written.push(path);
    }

    Ok(written)
}

fn stub_doc(id: &str, all_ids: &[&str]) -> String {
    let title = humanize(id.rsplit('/').next().unwrap_or(id));
    let mut doc = format!("---\ntitle: {}\n---\n\n# {}\n\n", title, title);

    if id == "introduction" {
        doc.push_str(
            "Meteor is a plugin driven agent for collecting metadata from a variety of \
             data stores, services and message queues.\n\n## Where to start\n\n",
        );
        for target in ["guides/installation", "concepts/recipe"] {
            if all_ids.contains(&target) {
                doc.push_str(&format!(
                    "- [{}]({}.md)\n",
                    humanize(target.rsplit('/').next().unwrap_or(target)),
                    target
                ));
            }
        }
    } else {
        doc.push_str("This page is a stub.\n");
    }

    doc
}

fn humanize(segment: &str) -> String {
    segment
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const HELP_PAGE: &str = r#"---
title: Need help?
---

# Need help?

Need a bit of help? We're here for you. Check out our current issues, GitHub
discussions, or get support through Slack.

## Slack

The Meteor team has an open source Slack workspace to discuss development and
support. Most of the Meteor discussions happen in the #meteor channel.

[Join us on Slack](https://bit.ly/2RzPbtn)

## GitHub issues

Have a general issue or bug that you've found? We'd love to hear about it in our
[GitHub issues](https://github.com/goto/meteor/issues).

## GitHub discussions

For help and questions about best practices, join our
[GitHub discussions](https://github.com/goto/meteor/discussions).
"#;

const PLACEHOLDER_SVG: &str =
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1\" height=\"1\" viewBox=\"0 0 1 1\"/>\n";
