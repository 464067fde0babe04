//! Static site builder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use meteor_docs_md::render::escape_html;
use meteor_docs_md::{render_html, LinkRewrite, ParsedDoc};
use meteor_docs_site::validate::is_asset_path;
use meteor_docs_site::{LinkPolicy, LinkTarget, SidebarItem, SiteDescriptor, SiteError, SiteProject};

use crate::assets::AssetPipeline;
use crate::docs::{
    discover_docs, discover_pages, join_normalized, list_files, strip_markdown_ext, DocPage,
    DocSet, StandalonePage,
};
use crate::links::{BrokenLink, LinkIndex};
use crate::templates::{
    BlockView, Chrome, DocContext, HeroView, LandingContext, PageContext, PageLink, SectionView,
    SidebarNode, TemplateEngine, TocEntry,
};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root; custom stylesheet paths resolve against it
    pub root_dir: PathBuf,

    /// Markdown documents
    pub docs_dir: PathBuf,

    /// Standalone Markdown pages
    pub pages_dir: PathBuf,

    /// Files copied verbatim to the output root
    pub static_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Inline script added to every page (dev server live reload)
    pub reload_script: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::for_root(Path::new("."))
    }
}

impl BuildConfig {
    /// Default layout below `root`.
    pub fn for_root(root: &Path) -> Self {
        Self {
            root_dir: root.to_path_buf(),
            docs_dir: root.join("docs"),
            pages_dir: root.join("pages"),
            static_dir: root.join("static"),
            output_dir: root.join("build"),
            minify: true,
            reload_script: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of HTML pages generated (landing, docs, standalone, 404)
    pub pages: usize,

    /// Number of documents rendered
    pub docs: usize,

    /// Number of non-HTML files written or copied
    pub assets: usize,

    /// Broken links and missing stylesheets that were logged but tolerated
    pub warnings: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Failed to read sources: {0}")]
    ReadError(String),

    #[error("Failed to parse Markdown: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Duplicate document id '{id}' in {first} and {second}")]
    DuplicateDoc {
        id: String,
        first: String,
        second: String,
    },

    #[error("Referenced documents not found: {}", .0.join(", "))]
    MissingDocs(Vec<String>),

    #[error("Referenced static assets not found: {}", .0.join(", "))]
    MissingAssets(Vec<String>),

    #[error("Route conflict: {0}")]
    RouteConflict(String),

    #[error("{} broken link(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    BrokenLinks(Vec<BrokenLink>),

    #[error("{} broken Markdown link(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    BrokenMarkdownLinks(Vec<BrokenLink>),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Invalid link pattern: {0}")]
    LinkPattern(#[from] regex::Error),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A rendered HTML page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL route
    pub route: String,

    /// Path relative to the output directory
    pub output_path: String,

    pub html: String,
}

/// A file copied into the output.
#[derive(Debug, Clone)]
pub struct CopiedFile {
    pub source: PathBuf,

    /// Path relative to the output directory
    pub output_path: String,
}

/// Everything a build would write, computed without touching the output directory.
#[derive(Debug)]
pub struct SitePlan {
    pub pages: Vec<RenderedPage>,
    pub copies: Vec<CopiedFile>,
    pub search_index: String,
    pub sitemap: String,
    pub robots: String,
    pub docs: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize)]
struct SearchEntry {
    title: String,
    description: String,
    url: String,
    content: String,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    project: SiteProject,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a builder for a validated project.
    pub fn new(config: BuildConfig, project: SiteProject) -> Result<Self, BuildError> {
        let project = project.validated()?;
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self {
            config,
            project,
            templates,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    fn site(&self) -> &SiteDescriptor {
        &self.project.descriptor
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let plan = self.plan()?;

        let out = &self.config.output_dir;
        self.reset_output_dir()?;

        for page in &plan.pages {
            write_file(out, &page.output_path, page.html.as_bytes())?;
        }

        let mut assets = 0;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Serving unminified CSS: {}", e);
                css
            })
        } else {
            css
        };
        write_file(out, "assets/main.css", css.as_bytes())?;
        write_file(out, "assets/main.js", AssetPipeline::generate_js().as_bytes())?;
        assets += 2;

        for copy in &plan.copies {
            let target = out.join(&copy.output_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(&copy.source, &target).map_err(|e| {
                BuildError::WriteError(format!("{}: {}", copy.source.display(), e))
            })?;
            assets += 1;
        }

        write_file(out, "search-index.json", plan.search_index.as_bytes())?;
        write_file(out, "sitemap.xml", plan.sitemap.as_bytes())?;
        write_file(out, "robots.txt", plan.robots.as_bytes())?;
        assets += 3;

        let duration = start.elapsed();

        tracing::debug!(
            "Wrote {} pages and {} assets to {}",
            plan.pages.len(),
            assets,
            out.display()
        );

        Ok(BuildResult {
            pages: plan.pages.len(),
            docs: plan.docs,
            assets,
            warnings: plan.warnings,
            duration_ms: duration.as_millis() as u64,
            output_dir: out.clone(),
        })
    }

    /// Remove the previous output so the tree holds only what this build writes.
    ///
    /// Refuses when the output directory is, or contains, a source directory.
    fn reset_output_dir(&self) -> Result<(), BuildError> {
        let out = &self.config.output_dir;

        if out.exists() {
            let out_abs = out
                .canonicalize()
                .map_err(|e| BuildError::WriteError(format!("{}: {}", out.display(), e)))?;
            let sources = [
                &self.config.root_dir,
                &self.config.docs_dir,
                &self.config.pages_dir,
                &self.config.static_dir,
            ];
            for source in sources {
                if let Ok(source_abs) = source.canonicalize() {
                    if source_abs.starts_with(&out_abs) {
                        return Err(BuildError::WriteError(format!(
                            "refusing to clear {}: it contains {}",
                            out.display(),
                            source.display()
                        )));
                    }
                }
            }

            tracing::debug!("Clearing {}", out.display());
            fs::remove_dir_all(out)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", out.display(), e)))?;
        }

        fs::create_dir_all(out).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Discover, resolve and render every page and check links.
    pub fn plan(&self) -> Result<SitePlan, BuildError> {
        let site = self.site();
        let mut warnings = 0;

        let docs = discover_docs(&self.config.docs_dir, site)?;
        let pages = discover_pages(&self.config.pages_dir, site)?;
        self.check_doc_references(&docs)?;

        let static_files = list_files(&self.config.static_dir);
        self.check_landing_assets(&static_files)?;

        let mut copies: Vec<CopiedFile> = static_files
            .iter()
            .map(|path| CopiedFile {
                source: self.config.static_dir.join(path),
                output_path: path.clone(),
            })
            .collect();

        let mut styles = Vec::new();
        for css in &site.theme.custom_css {
            let source = self.config.root_dir.join(css);
            if !source.is_file() {
                tracing::warn!("Stylesheet not found: {}", source.display());
                warnings += 1;
                continue;
            }
            let output_path = format!("assets/{}", css);
            styles.push(site.route(&output_path));
            copies.push(CopiedFile {
                source,
                output_path,
            });
        }

        let index = self.route_index(&docs, &pages, &copies)?;
        let doc_route = |id: &str| match docs.get(id) {
            Some(doc) => doc.route.clone(),
            None => site.doc_route(id),
        };
        let chrome = Chrome::new(site, &doc_route, styles, self.config.reload_script.clone());
        let sidebar = self.sidebar_nodes(&self.project.sidebar.items, &docs);

        let rendered_docs: Vec<(RenderedPage, Vec<BrokenLink>)> = docs
            .iter()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|doc| self.render_doc(doc, &docs, &chrome, &sidebar))
            .collect::<Result<_, _>>()?;

        let rendered_pages: Vec<(RenderedPage, Vec<BrokenLink>)> = pages
            .par_iter()
            .map(|page| self.render_standalone(page, &docs, &chrome))
            .collect::<Result<_, _>>()?;

        let mut markdown_broken = Vec::new();
        let mut out = Vec::with_capacity(rendered_docs.len() + rendered_pages.len() + 2);
        out.push(self.render_landing(&chrome)?);
        for (page, broken) in rendered_docs.into_iter().chain(rendered_pages) {
            out.push(page);
            markdown_broken.extend(broken);
        }
        out.push(self.render_not_found(&chrome)?);

        warnings += apply_policy(
            site.on_broken_markdown_links,
            markdown_broken,
            "Broken Markdown link",
            BuildError::BrokenMarkdownLinks,
        )?;

        let broken: Vec<BrokenLink> = out
            .iter()
            .flat_map(|page| index.check_page(&page.route, &page.html))
            .filter(|link| !is_markdown_href(&link.href))
            .collect();
        warnings += apply_policy(
            site.on_broken_links,
            broken,
            "Broken link",
            BuildError::BrokenLinks,
        )?;

        Ok(SitePlan {
            search_index: self.search_index(&docs, &pages)?,
            sitemap: self.sitemap(&docs, &pages),
            robots: format!(
                "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml\n",
                site.canonical_url()
            ),
            pages: out,
            copies,
            docs: docs.len(),
            warnings,
        })
    }

    /// Every document the sidebar, navbar or footer points at must exist.
    fn check_doc_references(&self, docs: &DocSet) -> Result<(), BuildError> {
        let site = self.site();

        let mut referenced: Vec<&str> = self.project.sidebar.doc_ids();
        referenced.extend(site.navbar.items.iter().filter_map(|item| match item.target() {
            Ok(LinkTarget::Doc(id)) => Some(id),
            _ => None,
        }));

        let mut missing: Vec<String> = Vec::new();
        for id in referenced {
            if !docs.contains(id) && !missing.iter().any(|m| m == id) {
                missing.push(id.to_string());
            }
        }

        for doc in docs.iter() {
            if !self.project.sidebar.contains(&doc.id) {
                tracing::debug!("Document '{}' is not in the sidebar", doc.id);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BuildError::MissingDocs(missing))
        }
    }

    fn check_landing_assets(&self, static_files: &[String]) -> Result<(), BuildError> {
        let landing = &self.project.landing;
        let missing: Vec<String> = landing
            .image_refs()
            .into_iter()
            .filter(|path| !static_files.iter().any(|f| f == path))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BuildError::MissingAssets(missing))
        }
    }

    /// Register every route and file the build will produce.
    fn route_index(
        &self,
        docs: &DocSet,
        pages: &[StandalonePage],
        copies: &[CopiedFile],
    ) -> Result<LinkIndex, BuildError> {
        let site = self.site();
        let mut index = LinkIndex::new()?;
        let mut outputs: HashSet<String> = HashSet::new();

        index.add_route(&site.base_url);
        outputs.insert(output_path(&site.base_url, &site.base_url));

        let routes = docs
            .iter()
            .map(|d| (&d.route, &d.relative_path))
            .chain(pages.iter().map(|p| (&p.route, &p.relative_path)));
        for (route, source) in routes {
            if !index.add_route(route) {
                return Err(BuildError::RouteConflict(format!(
                    "{} is generated more than once (last from {})",
                    route, source
                )));
            }
            outputs.insert(output_path(&site.base_url, route));
        }

        for file in GENERATED_FILES {
            index.add_file(&site.route(file));
            outputs.insert(file.to_string());
        }
        for copy in copies {
            if !outputs.insert(copy.output_path.clone()) {
                return Err(BuildError::RouteConflict(format!(
                    "{} from {} would overwrite a generated file",
                    copy.output_path,
                    copy.source.display()
                )));
            }
            index.add_file(&format!("{}{}", site.base_url, copy.output_path));
        }

        tracing::debug!("Route index holds {} entries", index.len());

        Ok(index)
    }

    fn sidebar_nodes(&self, items: &[SidebarItem], docs: &DocSet) -> Vec<SidebarNode> {
        let default_collapsed = self.site().docs.sidebar_collapsed;

        items
            .iter()
            .map(|item| match item {
                SidebarItem::Doc(id) => {
                    let (label, href) = match docs.get(id) {
                        Some(doc) => (doc.sidebar_label(), doc.route.clone()),
                        None => (id.clone(), self.site().doc_route(id)),
                    };
                    SidebarNode {
                        label,
                        href: Some(href),
                        doc_id: Some(id.clone()),
                        collapsed: false,
                        doc_ids: vec![id.clone()],
                        children: Vec::new(),
                    }
                }
                SidebarItem::Category {
                    label,
                    items,
                    collapsed,
                } => {
                    let children = self.sidebar_nodes(items, docs);
                    let doc_ids = children
                        .iter()
                        .flat_map(|c| c.doc_ids.iter().cloned())
                        .collect();
                    SidebarNode {
                        label: label.clone(),
                        href: None,
                        doc_id: None,
                        collapsed: collapsed.unwrap_or(default_collapsed),
                        doc_ids,
                        children,
                    }
                }
            })
            .collect()
    }

    fn render_doc(
        &self,
        doc: &DocPage,
        docs: &DocSet,
        chrome: &Chrome,
        sidebar: &[SidebarNode],
    ) -> Result<(RenderedPage, Vec<BrokenLink>), BuildError> {
        let site = self.site();
        let (content, broken) = render_markdown(&doc.doc, &doc.route, doc.relative_dir(), docs);

        let (prev, next) = self.project.sidebar.neighbours(&doc.id);
        let page_link = |id: Option<&str>| {
            id.and_then(|id| docs.get(id)).map(|d| PageLink {
                label: d.sidebar_label(),
                href: d.route.clone(),
            })
        };

        let frontmatter = doc.doc.frontmatter.as_ref();
        let context = DocContext {
            id: doc.id.clone(),
            title: doc.title(),
            description: doc.description(),
            keywords: frontmatter.map(|f| f.keywords.clone()).unwrap_or_default(),
            canonical: canonical(site, &doc.route),
            content,
            show_title: doc.doc.first_heading().is_none(),
            toc: toc_entries(&doc.doc),
            edit_url: site.docs.edit_url.as_ref().map(|base| {
                format!("{}/{}", base.trim_end_matches('/'), doc.relative_path)
            }),
            prev: page_link(prev),
            next: page_link(next),
        };

        let html = self
            .templates
            .render_doc(chrome, sidebar, &context)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", doc.relative_path, e)))?;

        tracing::debug!("Rendered doc '{}'", doc.id);

        Ok((self.page(&doc.route, html), broken))
    }

    fn render_standalone(
        &self,
        page: &StandalonePage,
        docs: &DocSet,
        chrome: &Chrome,
    ) -> Result<(RenderedPage, Vec<BrokenLink>), BuildError> {
        let site = self.site();
        let (content, broken) = render_markdown(&page.doc, &page.route, "", docs);

        let context = PageContext {
            title: page.title(),
            description: page
                .doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.description.clone()),
            canonical: canonical(site, &page.route),
            content,
            show_title: page.doc.first_heading().is_none(),
        };

        let html = self
            .templates
            .render_page(chrome, &context)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.relative_path, e)))?;

        Ok((self.page(&page.route, html), broken))
    }

    fn render_landing(&self, chrome: &Chrome) -> Result<RenderedPage, BuildError> {
        let site = self.site();
        let landing = &self.project.landing;
        let image = |path: &Option<String>| path.as_deref().map(|p| site.route(p));

        let context = LandingContext {
            description: landing.description.clone(),
            canonical: site.canonical_url(),
            hero: HeroView {
                subtitle: landing.hero.subtitle.clone(),
                cta_label: landing.hero.call_to_action.label.clone(),
                cta_href: site.route(&landing.hero.call_to_action.to),
                banner_image: image(&landing.hero.banner_image),
                pattern_image: image(&landing.hero.pattern_image),
            },
            sections: landing
                .sections
                .iter()
                .map(|section| SectionView {
                    title: section.title.clone(),
                    intro: section.intro.clone(),
                    background: section.background.as_str().to_string(),
                    columns: section.layout.columns(),
                    image: image(&section.image),
                    blocks: section
                        .blocks
                        .iter()
                        .map(|block| BlockView {
                            title: block.title.clone(),
                            body: block.body.clone(),
                            image: image(&block.image),
                        })
                        .collect(),
                })
                .collect(),
        };

        let html = self
            .templates
            .render_landing(chrome, &context)
            .map_err(|e| BuildError::TemplateError(format!("landing: {}", e)))?;

        Ok(self.page(&site.base_url, html))
    }

    fn render_not_found(&self, chrome: &Chrome) -> Result<RenderedPage, BuildError> {
        let site = self.site();
        let context = PageContext {
            title: "Page Not Found".to_string(),
            description: None,
            canonical: canonical(site, &site.route("404.html")),
            content: format!(
                "<p>We could not find what you were looking for.</p>\n<p><a href=\"{}\">Back to the home page</a></p>",
                escape_html(&site.base_url)
            ),
            show_title: true,
        };

        let html = self
            .templates
            .render_not_found(chrome, &context)
            .map_err(|e| BuildError::TemplateError(format!("404: {}", e)))?;

        Ok(RenderedPage {
            route: site.base_url.clone(),
            output_path: "404.html".to_string(),
            html,
        })
    }

    fn page(&self, route: &str, html: String) -> RenderedPage {
        RenderedPage {
            route: route.to_string(),
            output_path: output_path(&self.site().base_url, route),
            html,
        }
    }

    fn search_index(&self, docs: &DocSet, pages: &[StandalonePage]) -> Result<String, BuildError> {
        let entry = |title: String, doc: &ParsedDoc, route: &str| SearchEntry {
            title,
            description: doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.description.clone())
                .unwrap_or_default(),
            url: route.to_string(),
            content: excerpt(&doc.content),
        };

        let index: Vec<SearchEntry> = docs
            .iter()
            .map(|d| entry(d.title(), &d.doc, &d.route))
            .chain(pages.iter().map(|p| entry(p.title(), &p.doc, &p.route)))
            .collect();

        serde_json::to_string_pretty(&index).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    fn sitemap(&self, docs: &DocSet, pages: &[StandalonePage]) -> String {
        let site = self.site();
        let urls: Vec<String> = std::iter::once(site.base_url.as_str())
            .chain(docs.iter().map(|d| d.route.as_str()))
            .chain(pages.iter().map(|p| p.route.as_str()))
            .map(|route| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    escape_html(&canonical(site, route))
                )
            })
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
            urls.join("\n")
        )
    }
}

/// Files every build writes besides the pages.
const GENERATED_FILES: [&str; 6] = [
    "404.html",
    "assets/main.css",
    "assets/main.js",
    "search-index.json",
    "sitemap.xml",
    "robots.txt",
];

/// Render a document body, rewriting links to Markdown files into routes.
///
/// `dir` is the document's directory relative to the docs root. Links that
/// name a Markdown file with no matching document come back as broken.
fn render_markdown(
    doc: &ParsedDoc,
    route: &str,
    dir: &str,
    docs: &DocSet,
) -> (String, Vec<BrokenLink>) {
    let mut broken = Vec::new();

    let html = render_html(&doc.content, &mut |dest: &str| {
        if !is_markdown_href(dest) {
            return LinkRewrite::Keep;
        }

        let (path, suffix) = match dest.find(['#', '?']) {
            Some(pos) => dest.split_at(pos),
            None => (dest, ""),
        };

        match join_normalized(dir, path).and_then(|p| docs.by_source_path(&p)) {
            Some(target) => LinkRewrite::Replace(format!("{}{}", target.route, suffix)),
            None => {
                broken.push(BrokenLink {
                    page: route.to_string(),
                    href: dest.to_string(),
                });
                LinkRewrite::Keep
            }
        }
    });

    (html, broken)
}

/// Whether `href` is a relative or site-absolute link to a Markdown file.
fn is_markdown_href(href: &str) -> bool {
    if href.contains("://") || href.starts_with("//") || href.starts_with('#') {
        return false;
    }
    let path = href.split(['#', '?']).next().unwrap_or("");
    strip_markdown_ext(path) != path
}

/// Log, count or fail on broken links according to `policy`.
fn apply_policy(
    policy: LinkPolicy,
    broken: Vec<BrokenLink>,
    what: &str,
    fail: fn(Vec<BrokenLink>) -> BuildError,
) -> Result<usize, BuildError> {
    if broken.is_empty() {
        return Ok(0);
    }

    match policy {
        LinkPolicy::Throw => Err(fail(broken)),
        LinkPolicy::Warn => {
            for link in &broken {
                tracing::warn!("{}: {}", what, link);
            }
            Ok(broken.len())
        }
        LinkPolicy::Ignore => Ok(0),
    }
}

fn toc_entries(doc: &ParsedDoc) -> Vec<TocEntry> {
    doc.page_toc()
        .into_iter()
        .map(|e| TocEntry {
            title: e.title.clone(),
            id: e.id.clone(),
            level: e.level,
        })
        .collect()
}

fn canonical(site: &SiteDescriptor, route: &str) -> String {
    format!("{}{}", site.url.trim_end_matches('/'), route)
}

/// Output file for a page route, relative to the output directory.
fn output_path(base_url: &str, route: &str) -> String {
    let relative = route
        .strip_prefix(base_url)
        .unwrap_or_else(|| route.trim_start_matches('/'))
        .trim_matches('/');
    if relative.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", relative)
    }
}

/// First lines of prose, skipping headings and code.
fn excerpt(content: &str) -> String {
    let mut in_code = false;
    content
        .lines()
        .filter(|line| {
            if line.trim_start().starts_with("```") {
                in_code = !in_code;
                return false;
            }
            !in_code && !line.trim().is_empty() && !line.starts_with('#')
        })
        .take(10)
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_file(out: &Path, relative: &str, contents: &[u8]) -> Result<(), BuildError> {
    if !is_asset_path(relative) {
        return Err(BuildError::WriteError(format!(
            "refusing to write outside the output directory: {}",
            relative
        )));
    }

    let path = out.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(&path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteor_docs_site::{meteor_project, write_scaffold};
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    fn scaffolded() -> (TempDir, BuildConfig) {
        let temp = tempdir().unwrap();
        write_scaffold(temp.path(), false).unwrap();
        let config = BuildConfig::for_root(temp.path());
        (temp, config)
    }

    fn builder(config: BuildConfig) -> StaticBuilder {
        StaticBuilder::new(config, meteor_project().unwrap()).unwrap()
    }

    /// Output file contents with template-escaped slashes decoded.
    fn read(config: &BuildConfig, path: &str) -> String {
        fs::read_to_string(config.output_dir.join(path))
            .unwrap()
            .replace("&#x2f;", "/")
    }

    #[test]
    fn builds_meteor_site() {
        let (_temp, config) = scaffolded();

        let result = builder(config.clone()).build().unwrap();

        assert_eq!(result.docs, 20);
        // landing + 20 docs + help + 404
        assert_eq!(result.pages, 23);
        assert_eq!(result.warnings, 0);

        for path in [
            "index.html",
            "404.html",
            "help/index.html",
            "docs/introduction/index.html",
            "docs/guides/installation/index.html",
            "docs/contribute/contributing/index.html",
            "assets/main.css",
            "assets/main.js",
            "assets/css/theme.css",
            "assets/css/custom.css",
            "img/logo.svg",
            "assets/overview.svg",
            "search-index.json",
            "sitemap.xml",
            "robots.txt",
        ] {
            assert!(config.output_dir.join(path).exists(), "missing {}", path);
        }
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let (temp, config) = scaffolded();
        let builder = builder(config.clone());

        builder.build().unwrap();
        let first: Vec<(String, Vec<u8>)> = snapshot(&config.output_dir);
        builder.build().unwrap();
        let second = snapshot(&config.output_dir);

        assert_eq!(first.len(), second.len());
        assert!(first == second);
        drop(temp);
    }

    fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
        list_files(dir)
            .into_iter()
            .map(|path| {
                let bytes = fs::read(dir.join(&path)).unwrap();
                (path, bytes)
            })
            .collect()
    }

    #[test]
    fn rewrites_markdown_links_to_routes() {
        let (_temp, config) = scaffolded();

        builder(config.clone()).build().unwrap();

        let intro = read(&config, "docs/introduction/index.html");
        assert!(intro.contains("href=\"/meteor/docs/guides/installation/\""));
        assert!(intro.contains("href=\"/meteor/docs/concepts/recipe/\""));
        assert!(!intro.contains("installation.md"));
    }

    #[test]
    fn doc_page_has_chrome_and_pagination() {
        let (_temp, config) = scaffolded();

        builder(config.clone()).build().unwrap();

        let html = read(&config, "docs/guides/introduction/index.html");
        assert!(html.contains("menu-item active"));
        assert!(html.contains("announcement-bar"));
        assert!(html.contains("pagination-prev"));
        assert!(html.contains("pagination-next"));
        assert!(html.contains(
            "https://github.com/goto/meteor/edit/master/docs/guides/introduction.md"
        ));
        assert!(html.contains("/meteor/assets/css/custom.css"));
    }

    #[test]
    fn landing_renders_sections_in_order() {
        let (_temp, config) = scaffolded();

        builder(config.clone()).build().unwrap();

        let html = read(&config, "index.html");
        let built = html.find("Built for ease").unwrap();
        let framework = html.find("Framework").unwrap();
        let ecosystem = html.find("Ecosystem").unwrap();
        assert!(built < framework && framework < ecosystem);

        let tail = &html[ecosystem..];
        assert_eq!(tail.matches("class=\"grid-block\"").count(), 3);
        let extractors = tail.find("Extractors").unwrap();
        let processors = tail.find("Processors").unwrap();
        let sinks = tail.find("Sinks").unwrap();
        assert!(extractors < processors && processors < sinks);
        assert!(html.contains("grid-1"));
        assert!(html.contains("grid-3"));
    }

    #[test]
    fn dotted_doc_ids_get_directory_pages() {
        let (temp, config) = scaffolded();
        fs::write(
            temp.path().join("docs/reference/release-1.0.md"),
            "# Release 1.0\n\nNotes.",
        )
        .unwrap();
        let mut project = meteor_project().unwrap();
        project
            .sidebar
            .items
            .push(SidebarItem::Doc("reference/release-1.0".to_string()));

        StaticBuilder::new(config.clone(), project)
            .unwrap()
            .build()
            .unwrap();

        assert!(config
            .output_dir
            .join("docs/reference/release-1.0/index.html")
            .exists());
        assert!(!config
            .output_dir
            .join("docs/reference/release-1.0index.html")
            .exists());
        let html = read(&config, "docs/introduction/index.html");
        assert!(html.contains("href=\"/meteor/docs/reference/release-1.0/\""));
    }

    #[test]
    fn navbar_doc_links_follow_slugs() {
        let (temp, config) = scaffolded();
        fs::write(
            temp.path().join("docs/introduction.md"),
            "---\nslug: /\n---\n# Introduction",
        )
        .unwrap();
        let mut project = meteor_project().unwrap();
        project.descriptor.on_broken_links = LinkPolicy::Warn;

        let plan = StaticBuilder::new(config, project).unwrap().plan().unwrap();

        let help = plan
            .pages
            .iter()
            .find(|p| p.route == "/meteor/help/")
            .unwrap()
            .html
            .replace("&#x2f;", "/");
        assert!(help.contains("class=\"navbar-link\" href=\"/meteor/docs/\">Docs</a>"));
        assert!(!help.contains("href=\"/meteor/docs/introduction/\">Docs</a>"));
    }

    #[test]
    fn rebuild_drops_removed_pages() {
        let (temp, config) = scaffolded();
        let extra = temp.path().join("docs/concepts/retired.md");
        fs::write(&extra, "# Retired").unwrap();
        builder(config.clone()).build().unwrap();
        assert!(config
            .output_dir
            .join("docs/concepts/retired/index.html")
            .exists());

        fs::remove_file(&extra).unwrap();
        builder(config.clone()).build().unwrap();

        assert!(!config
            .output_dir
            .join("docs/concepts/retired/index.html")
            .exists());
        assert!(config.output_dir.join("docs/concepts/sink/index.html").exists());
    }

    #[test]
    fn refuses_to_clear_the_project_root() {
        let (temp, mut config) = scaffolded();
        config.output_dir = temp.path().to_path_buf();

        let err = builder(config).build().unwrap_err();

        assert!(matches!(err, BuildError::WriteError(_)));
        assert!(temp.path().join("docs/introduction.md").exists());
    }

    #[test]
    fn static_file_cannot_replace_generated_stylesheet() {
        let (temp, config) = scaffolded();
        fs::create_dir_all(temp.path().join("static/assets")).unwrap();
        fs::write(temp.path().join("static/assets/main.css"), "body {}").unwrap();

        let err = builder(config).plan().unwrap_err();

        assert!(
            matches!(err, BuildError::RouteConflict(ref msg) if msg.contains("assets/main.css"))
        );
    }

    #[test]
    fn broken_links_fail_under_throw() {
        let (temp, config) = scaffolded();
        fs::write(
            temp.path().join("docs/concepts/sink.md"),
            "# Sink\n\nSee the [missing page](/meteor/docs/nowhere/).",
        )
        .unwrap();

        let err = builder(config).build().unwrap_err();

        match err {
            BuildError::BrokenLinks(links) => {
                assert_eq!(
                    links,
                    vec![BrokenLink {
                        page: "/meteor/docs/concepts/sink/".to_string(),
                        href: "/meteor/docs/nowhere/".to_string(),
                    }]
                );
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn broken_links_are_counted_under_warn() {
        let (temp, config) = scaffolded();
        fs::write(
            temp.path().join("docs/concepts/sink.md"),
            "# Sink\n\nSee the [missing page](/meteor/docs/nowhere/).",
        )
        .unwrap();
        let mut project = meteor_project().unwrap();
        project.descriptor.on_broken_links = LinkPolicy::Warn;

        let result = StaticBuilder::new(config, project).unwrap().build().unwrap();

        assert_eq!(result.warnings, 1);
    }

    #[test]
    fn unresolved_markdown_links_follow_their_policy() {
        let (temp, config) = scaffolded();
        fs::write(
            temp.path().join("docs/concepts/sink.md"),
            "# Sink\n\nSee [sources](source.md) and [gone](gone.md).",
        )
        .unwrap();

        let result = builder(config.clone()).build().unwrap();
        assert_eq!(result.warnings, 1);
        let html = read(&config, "docs/concepts/sink/index.html");
        assert!(html.contains("href=\"/meteor/docs/concepts/source/\""));

        let mut project = meteor_project().unwrap();
        project.descriptor.on_broken_markdown_links = LinkPolicy::Throw;
        let err = StaticBuilder::new(config, project).unwrap().plan().unwrap_err();
        assert!(matches!(err, BuildError::BrokenMarkdownLinks(ref links) if links.len() == 1));
    }

    #[test]
    fn missing_sidebar_doc_fails() {
        let (temp, config) = scaffolded();
        fs::remove_file(temp.path().join("docs/reference/sinks.md")).unwrap();

        let err = builder(config).plan().unwrap_err();

        match err {
            BuildError::MissingDocs(ids) => assert_eq!(ids, vec!["reference/sinks".to_string()]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_landing_image_fails() {
        let (temp, config) = scaffolded();
        fs::remove_file(temp.path().join("static/assets/overview.svg")).unwrap();

        let err = builder(config).plan().unwrap_err();

        assert!(
            matches!(err, BuildError::MissingAssets(ref paths) if paths == &vec!["assets/overview.svg".to_string()])
        );
    }

    #[test]
    fn rejects_invalid_project() {
        let (_temp, config) = scaffolded();
        let mut project = meteor_project().unwrap();
        project.descriptor.navbar.items[0].label = String::new();

        let err = StaticBuilder::new(config, project).err().unwrap();

        assert!(matches!(err, BuildError::Site(SiteError::Invalid(ref v)) if v.len() == 1));
    }

    #[test]
    fn link_pattern_errors_have_their_own_variant() {
        let err: BuildError = regex::Regex::new("(").unwrap_err().into();

        assert!(matches!(err, BuildError::LinkPattern(_)));
        assert!(err.to_string().starts_with("Invalid link pattern"));
    }

    #[test]
    fn injects_reload_script() {
        let (_temp, mut config) = scaffolded();
        config.reload_script = Some("console.log('reload')".to_string());

        let plan = builder(config).plan().unwrap();

        assert!(plan
            .pages
            .iter()
            .all(|p| p.html.contains("console.log('reload')")));
    }

    #[test]
    fn writes_sitemap_and_search_index() {
        let (_temp, config) = scaffolded();

        builder(config.clone()).build().unwrap();

        let sitemap = read(&config, "sitemap.xml");
        assert!(sitemap.contains("<loc>https://goto.github.io/meteor/</loc>"));
        assert!(sitemap.contains("<loc>https://goto.github.io/meteor/help/</loc>"));

        let index: Vec<serde_json::Value> =
            serde_json::from_str(&read(&config, "search-index.json")).unwrap();
        assert_eq!(index.len(), 21);
        assert!(index.iter().any(|e| e["url"] == "/meteor/docs/concepts/recipe/"));

        assert_eq!(
            read(&config, "robots.txt"),
            "User-agent: *\nAllow: /\nSitemap: https://goto.github.io/meteor/sitemap.xml\n"
        );
    }

    #[test]
    fn maps_routes_to_output_paths() {
        assert_eq!(output_path("/meteor/", "/meteor/"), "index.html");
        assert_eq!(
            output_path("/meteor/", "/meteor/docs/introduction/"),
            "docs/introduction/index.html"
        );
        assert_eq!(output_path("/", "/help/"), "help/index.html");
        assert_eq!(
            output_path("/meteor/", "/meteor/docs/release-1.0"),
            "docs/release-1.0/index.html"
        );
    }

    #[test]
    fn recognizes_markdown_hrefs() {
        assert!(is_markdown_href("../concepts/recipe.md#sources"));
        assert!(is_markdown_href("guide.mdx"));
        assert!(!is_markdown_href("https://github.com/goto/meteor/blob/main/README.md"));
        assert!(!is_markdown_href("/meteor/docs/introduction/"));
    }
}
