//! Site descriptor: branding, navigation chrome, footer and theme selection.

use serde::{Deserialize, Serialize};

/// Static configuration record for the whole documentation site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Site title shown in the navbar and page titles
    pub title: String,

    /// Short tagline, also used as the landing page title
    pub tagline: String,

    /// Absolute URL of the host (e.g. `https://goto.github.io/`)
    pub url: String,

    /// Path prefix under which the site is served, starting and ending with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Favicon asset path relative to the static directory
    #[serde(default)]
    pub favicon: Option<String>,

    /// Hosting organization (GitHub org)
    pub organization_name: String,

    /// Hosting project (GitHub repository)
    pub project_name: String,

    /// What to do with internal links that resolve to nothing
    #[serde(default = "default_broken_links")]
    pub on_broken_links: LinkPolicy,

    /// What to do with links to Markdown files that resolve to no document
    #[serde(default = "default_broken_markdown_links")]
    pub on_broken_markdown_links: LinkPolicy,

    #[serde(default)]
    pub docs: DocsOptions,

    #[serde(default)]
    pub theme: ThemeOptions,

    #[serde(default)]
    pub analytics: Analytics,

    #[serde(default)]
    pub color_mode: ColorMode,

    pub navbar: Navbar,

    pub footer: Footer,

    #[serde(default)]
    pub prism: Prism,

    #[serde(default)]
    pub announcement_bar: Option<AnnouncementBar>,
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_broken_links() -> LinkPolicy {
    LinkPolicy::Throw
}

fn default_broken_markdown_links() -> LinkPolicy {
    LinkPolicy::Warn
}

impl SiteDescriptor {
    /// Parse a descriptor from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Join a site-relative path onto the base URL.
    ///
    /// Page routes get a trailing slash, file paths (last segment with an
    /// extension) and fragments are left alone.
    pub fn route(&self, path: &str) -> String {
        route(&self.base_url, path)
    }

    /// Public URL of the site root, e.g. `https://goto.github.io/meteor/`.
    pub fn canonical_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.base_url)
    }

    /// Join a page path onto the base URL. Always ends in `/`, even when the
    /// last segment contains a dot (`release-1.0`).
    pub fn page_route(&self, path: &str) -> String {
        page_route(&self.base_url, path)
    }

    /// Route of a document by id.
    pub fn doc_route(&self, doc_id: &str) -> String {
        self.page_route(&format!("docs/{}", doc_id.trim_matches('/')))
    }

    /// Resolve a link target into an href usable in rendered HTML.
    pub fn href(&self, target: LinkTarget<'_>) -> String {
        match target {
            LinkTarget::Doc(id) => self.doc_route(id),
            LinkTarget::Internal(path) => self.route(path),
            LinkTarget::External(url) => url.to_string(),
        }
    }
}

/// Join `path` onto `base_url`.
///
/// A last segment with an extension is treated as a file and left without a
/// trailing slash.
pub fn route(base_url: &str, path: &str) -> String {
    let (bare, _) = split_fragment(path);
    let last = bare.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    join_route(base_url, path, last.contains('.'))
}

/// Join a page path onto `base_url`, always as a directory route.
pub fn page_route(base_url: &str, path: &str) -> String {
    join_route(base_url, path, false)
}

fn split_fragment(path: &str) -> (&str, &str) {
    match path.find(['#', '?']) {
        Some(pos) => path.split_at(pos),
        None => (path, ""),
    }
}

fn join_route(base_url: &str, path: &str, is_file: bool) -> String {
    let (path, fragment) = split_fragment(path);

    let trimmed = path.trim_start_matches('/');
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    if trimmed.is_empty() {
        format!("{}{}", base, fragment)
    } else if is_file {
        format!("{}{}{}", base, trimmed, fragment)
    } else {
        format!("{}{}/{}", base, trimmed.trim_end_matches('/'), fragment)
    }
}

/// Broken link handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// Fail the build
    Throw,
    /// Log and continue
    Warn,
    /// Say nothing
    Ignore,
}

/// Options for the docs section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsOptions {
    /// Prefix for "Edit this page" links; the doc's source path is appended
    #[serde(default)]
    pub edit_url: Option<String>,

    /// Whether sidebar categories start collapsed
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

/// Extra stylesheets layered over the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOptions {
    #[serde(default)]
    pub custom_css: Vec<String>,
}

/// Analytics integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub gtag_tracking_id: Option<String>,
}

/// Light or dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shade {
    #[default]
    Light,
    Dark,
}

impl Shade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Colour mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMode {
    #[serde(default)]
    pub default_mode: Shade,

    #[serde(default = "default_true")]
    pub respect_prefers_color_scheme: bool,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self {
            default_mode: Shade::Light,
            respect_prefers_color_scheme: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Top navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navbar {
    pub title: String,

    #[serde(default)]
    pub logo: Option<Logo>,

    #[serde(default)]
    pub hide_on_scroll: bool,

    #[serde(default)]
    pub items: Vec<NavbarItem>,
}

/// Navbar logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub src: String,

    #[serde(default)]
    pub alt: Option<String>,
}

/// Which side of the navbar an item sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

/// A navbar entry. Exactly one of `doc_id`, `to` and `href` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavbarItem {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub doc_id: Option<String>,

    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub position: Position,

    /// Extra CSS class; icon-style items render the label for screen readers only
    #[serde(default)]
    pub class_name: Option<String>,
}

impl NavbarItem {
    pub fn target(&self) -> Result<LinkTarget<'_>, TargetError> {
        resolve_target(
            self.doc_id.as_deref(),
            self.to.as_deref(),
            self.href.as_deref(),
        )
    }
}

/// Page footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub style: Shade,

    #[serde(default)]
    pub links: Vec<FooterGroup>,

    #[serde(default)]
    pub copyright: Option<String>,
}

/// A titled column of footer links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterGroup {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub items: Vec<FooterLink>,
}

/// A footer link. Exactly one of `to` and `href` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub href: Option<String>,
}

impl FooterLink {
    pub fn target(&self) -> Result<LinkTarget<'_>, TargetError> {
        resolve_target(None, self.to.as_deref(), self.href.as_deref())
    }
}

/// Code highlighting theme names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    #[serde(default = "default_light_theme")]
    pub theme: String,

    #[serde(default = "default_dark_theme")]
    pub dark_theme: String,
}

impl Default for Prism {
    fn default() -> Self {
        Self {
            theme: default_light_theme(),
            dark_theme: default_dark_theme(),
        }
    }
}

fn default_light_theme() -> String {
    "github".to_string()
}

fn default_dark_theme() -> String {
    "dracula".to_string()
}

/// Dismissable banner above the navbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementBar {
    /// Key under which dismissal is remembered in the browser
    pub id: String,

    /// Raw HTML content
    pub content: String,

    #[serde(default = "default_bar_background")]
    pub background_color: String,

    #[serde(default = "default_bar_text")]
    pub text_color: String,

    #[serde(default = "default_true")]
    pub is_closeable: bool,
}

fn default_bar_background() -> String {
    "#fff".to_string()
}

fn default_bar_text() -> String {
    "#000".to_string()
}

/// Where a navigation entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// A document id, routed under `docs/`
    Doc(&'a str),
    /// A site-relative path, prefixed with the base URL
    Internal(&'a str),
    /// An absolute URL, used as is
    External(&'a str),
}

impl LinkTarget<'_> {
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Reasons an entry has no usable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("no target set (one of doc_id, to, href is required)")]
    Missing,

    #[error("more than one of doc_id, to, href is set")]
    Ambiguous,
}

fn resolve_target<'a>(
    doc_id: Option<&'a str>,
    to: Option<&'a str>,
    href: Option<&'a str>,
) -> Result<LinkTarget<'a>, TargetError> {
    let set: Vec<LinkTarget<'a>> = [
        doc_id.map(LinkTarget::Doc),
        to.map(LinkTarget::Internal),
        href.map(LinkTarget::External),
    ]
    .into_iter()
    .flatten()
    .filter(|t| match t {
        LinkTarget::Doc(s) | LinkTarget::Internal(s) | LinkTarget::External(s) => {
            !s.trim().is_empty()
        }
    })
    .collect();

    match set.as_slice() {
        [] => Err(TargetError::Missing),
        [target] => Ok(*target),
        _ => Err(TargetError::Ambiguous),
    }
}
