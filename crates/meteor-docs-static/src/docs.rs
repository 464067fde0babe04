//! Document and standalone page discovery.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use meteor_docs_md::{parse_doc, ParsedDoc};
use meteor_docs_site::SiteDescriptor;

use crate::builder::BuildError;

/// A Markdown document under the docs directory.
#[derive(Debug)]
pub struct DocPage {
    /// Document id: directory path plus frontmatter id or file stem
    pub id: String,

    /// Path relative to the docs directory, with `/` separators
    pub relative_path: String,

    /// URL route, always under the base URL
    pub route: String,

    pub doc: ParsedDoc,
}

impl DocPage {
    /// Directory of the source file relative to the docs directory ("" at the top).
    pub fn relative_dir(&self) -> &str {
        self.relative_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }

    pub fn title(&self) -> String {
        self.doc
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone())
    }

    /// Label used in the sidebar and pagination.
    pub fn sidebar_label(&self) -> String {
        self.doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.sidebar_label.clone())
            .unwrap_or_else(|| self.title())
    }

    pub fn description(&self) -> Option<String> {
        self.doc.frontmatter.as_ref().and_then(|f| f.description.clone())
    }
}

/// All documents, keyed by id.
#[derive(Debug, Default)]
pub struct DocSet {
    docs: BTreeMap<String, DocPage>,
    /// Source path without extension -> id, for resolving Markdown file links
    by_source: HashMap<String, String>,
}

impl DocSet {
    pub fn get(&self, id: &str) -> Option<&DocPage> {
        self.docs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &DocPage> {
        self.docs.values()
    }

    /// Find the document whose source file is `path` (relative to the docs
    /// directory, with or without a `.md`/`.mdx` extension).
    pub fn by_source_path(&self, path: &str) -> Option<&DocPage> {
        let key = strip_markdown_ext(path);
        self.by_source.get(key).and_then(|id| self.docs.get(id))
    }

    fn insert(&mut self, page: DocPage) -> Result<(), BuildError> {
        if let Some(existing) = self.docs.get(&page.id) {
            return Err(BuildError::DuplicateDoc {
                id: page.id.clone(),
                first: existing.relative_path.clone(),
                second: page.relative_path.clone(),
            });
        }
        self.by_source.insert(
            strip_markdown_ext(&page.relative_path).to_string(),
            page.id.clone(),
        );
        self.docs.insert(page.id.clone(), page);
        Ok(())
    }
}

/// A standalone Markdown page (e.g. `help`), routed directly under the base URL.
#[derive(Debug)]
pub struct StandalonePage {
    pub relative_path: String,
    pub route: String,
    pub doc: ParsedDoc,
}

impl StandalonePage {
    pub fn title(&self) -> String {
        self.doc.title().map(str::to_string).unwrap_or_else(|| {
            strip_markdown_ext(&self.relative_path)
                .rsplit('/')
                .next()
                .unwrap_or("Untitled")
                .to_string()
        })
    }
}

/// Discover all documents in the docs directory.
pub fn discover_docs(docs_dir: &Path, site: &SiteDescriptor) -> Result<DocSet, BuildError> {
    if !docs_dir.exists() {
        return Err(BuildError::ReadError(format!(
            "Docs directory not found: {}",
            docs_dir.display()
        )));
    }

    let mut set = DocSet::default();
    for (relative_path, doc) in read_markdown_tree(docs_dir)? {
        let stem = strip_markdown_ext(&relative_path)
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let dir = relative_path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();

        let frontmatter = doc.frontmatter.as_ref();
        let last = frontmatter.and_then(|f| f.id.clone()).unwrap_or(stem);
        let id = if dir.is_empty() {
            last
        } else {
            format!("{}/{}", dir, last)
        };

        let route = match frontmatter.and_then(|f| f.slug.as_deref()) {
            Some(slug) => site.page_route(&format!("docs/{}", slug.trim_start_matches('/'))),
            None => site.doc_route(&id),
        };

        tracing::debug!("Discovered doc '{}' at {}", id, route);

        set.insert(DocPage {
            id,
            relative_path,
            route,
            doc,
        })?;
    }

    Ok(set)
}

/// Discover standalone pages. A missing directory means no pages.
pub fn discover_pages(
    pages_dir: &Path,
    site: &SiteDescriptor,
) -> Result<Vec<StandalonePage>, BuildError> {
    if !pages_dir.exists() {
        return Ok(Vec::new());
    }

    read_markdown_tree(pages_dir)?
        .into_iter()
        .map(|(relative_path, doc)| {
            let path = strip_markdown_ext(&relative_path);
            let path = if path == "index" {
                ""
            } else {
                path.strip_suffix("/index").unwrap_or(path)
            };
            let route = site.page_route(path);
            if route == site.base_url {
                return Err(BuildError::RouteConflict(format!(
                    "page {} would replace the landing page",
                    relative_path
                )));
            }
            Ok(StandalonePage {
                relative_path,
                route,
                doc,
            })
        })
        .collect()
}

/// Read and parse every Markdown file below `dir`, sorted by path.
fn read_markdown_tree(dir: &Path) -> Result<Vec<(String, ParsedDoc)>, BuildError> {
    let mut out = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_markdown(path) {
            continue;
        }

        let content = fs::read_to_string(path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

        let doc = parse_doc(&content).map_err(|e| BuildError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        out.push((relative_slash_path(dir, path), doc));
    }

    Ok(out)
}

/// List every file below `dir` as relative `/`-separated paths, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| relative_slash_path(dir, e.path()))
        .collect()
}

fn relative_slash_path(base: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(base).unwrap_or(path).to_path_buf();
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    )
}

/// Strip a trailing `.md` or `.mdx`.
pub fn strip_markdown_ext(path: &str) -> &str {
    path.strip_suffix(".mdx")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path)
}

/// Resolve `relative` against directory `base`, collapsing `.` and `..`.
///
/// Returns `None` if the path climbs above the root.
pub fn join_normalized(base: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = if relative.starts_with('/') {
        Vec::new()
    } else {
        base.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteor_docs_site::meteor_project;
    use tempfile::tempdir;

    fn site() -> SiteDescriptor {
        meteor_project().unwrap().descriptor
    }

    #[test]
    fn derives_ids_and_routes() {
        let temp = tempdir().unwrap();
        let docs = temp.path();
        fs::create_dir_all(docs.join("guides")).unwrap();
        fs::write(docs.join("introduction.md"), "# Introduction").unwrap();
        fs::write(
            docs.join("guides/0_install.md"),
            "---\nid: installation\nsidebar_label: Install\n---\n# Installing Meteor",
        )
        .unwrap();
        fs::write(docs.join("guides/notes.txt"), "ignored").unwrap();

        let set = discover_docs(docs, &site()).unwrap();

        assert_eq!(set.len(), 2);
        let install = set.get("guides/installation").unwrap();
        assert_eq!(install.route, "/meteor/docs/guides/installation/");
        assert_eq!(install.relative_path, "guides/0_install.md");
        assert_eq!(install.relative_dir(), "guides");
        assert_eq!(install.title(), "Installing Meteor");
        assert_eq!(install.sidebar_label(), "Install");
        assert_eq!(
            set.by_source_path("guides/0_install.md").map(|d| d.id.as_str()),
            Some("guides/installation")
        );
    }

    #[test]
    fn honours_slug() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("intro.md"), "---\nslug: /start\n---\nHello").unwrap();

        let set = discover_docs(temp.path(), &site()).unwrap();

        assert_eq!(set.get("intro").unwrap().route, "/meteor/docs/start/");
    }

    #[test]
    fn dotted_stems_route_as_directories() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("reference")).unwrap();
        fs::write(temp.path().join("reference/release-1.0.md"), "# Release 1.0").unwrap();
        fs::write(temp.path().join("v2.x.md"), "---\nslug: /v2.x\n---\n# v2").unwrap();

        let set = discover_docs(temp.path(), &site()).unwrap();

        assert_eq!(
            set.get("reference/release-1.0").unwrap().route,
            "/meteor/docs/reference/release-1.0/"
        );
        assert_eq!(set.get("v2.x").unwrap().route, "/meteor/docs/v2.x/");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.md"), "---\nid: same\n---\n").unwrap();
        fs::write(temp.path().join("b.md"), "---\nid: same\n---\n").unwrap();

        let err = discover_docs(temp.path(), &site()).unwrap_err();

        assert!(matches!(err, BuildError::DuplicateDoc { ref id, .. } if id == "same"));
    }

    #[test]
    fn errors_on_missing_docs_dir() {
        let temp = tempdir().unwrap();

        let err = discover_docs(&temp.path().join("nope"), &site()).unwrap_err();

        assert!(matches!(err, BuildError::ReadError(_)));
    }

    #[test]
    fn routes_pages_under_base_url() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("community")).unwrap();
        fs::write(temp.path().join("help.md"), "# Need help?").unwrap();
        fs::write(temp.path().join("community/index.md"), "# Community").unwrap();
        fs::write(temp.path().join("notes-0.9.md"), "# Notes").unwrap();

        let pages = discover_pages(temp.path(), &site()).unwrap();

        let routes: Vec<&str> = pages.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(
            routes,
            vec!["/meteor/community/", "/meteor/help/", "/meteor/notes-0.9/"]
        );
        assert_eq!(pages[1].title(), "Need help?");
    }

    #[test]
    fn root_index_page_conflicts_with_landing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.md"), "# Home").unwrap();

        let err = discover_pages(temp.path(), &site()).unwrap_err();

        assert!(matches!(err, BuildError::RouteConflict(_)));
    }

    #[test]
    fn normalizes_relative_paths() {
        assert_eq!(
            join_normalized("guides", "../concepts/recipe.md").as_deref(),
            Some("concepts/recipe.md")
        );
        assert_eq!(
            join_normalized("guides", "./run_recipes.md").as_deref(),
            Some("guides/run_recipes.md")
        );
        assert_eq!(
            join_normalized("", "/reference/sinks.md").as_deref(),
            Some("reference/sinks.md")
        );
        assert_eq!(join_normalized("", "../outside.md"), None);
    }
}
