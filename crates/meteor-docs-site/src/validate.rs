//! Structural invariant checks over the site records.
//!
//! These checks need nothing but the records themselves. Checks that need the
//! document corpus or the static directory (sidebar leaves resolving to docs,
//! images resolving to files) happen during the build.

use std::collections::HashSet;
use std::fmt;

use crate::descriptor::{SiteDescriptor, TargetError};
use crate::landing::LandingPage;
use crate::loader::SiteProject;
use crate::sidebar::{SidebarItem, SidebarTree};

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Stable machine-readable code, e.g. `EMPTY_LABEL`
    pub code: &'static str,
    pub message: String,
    /// Dotted path of the offending entry, e.g. `navbar.items[2]`
    pub location: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.location, self.message)
    }
}

fn violation(
    code: &'static str,
    location: impl Into<String>,
    message: impl Into<String>,
) -> Violation {
    Violation {
        code,
        message: message.into(),
        location: location.into(),
    }
}

/// Check every record of a project.
pub fn validate(project: &SiteProject) -> Vec<Violation> {
    let mut violations = validate_descriptor(&project.descriptor);
    violations.extend(validate_sidebar(&project.sidebar));
    violations.extend(validate_landing(&project.landing));
    violations
}

/// Check the site descriptor.
pub fn validate_descriptor(site: &SiteDescriptor) -> Vec<Violation> {
    let mut out = Vec::new();

    if site.title.trim().is_empty() {
        out.push(violation("EMPTY_LABEL", "title", "site title is empty"));
    }

    if !site.base_url.starts_with('/') || !site.base_url.ends_with('/') {
        out.push(violation(
            "INVALID_BASE_URL",
            "base_url",
            format!("`{}` must start and end with `/`", site.base_url),
        ));
    }

    if !is_absolute_url(&site.url) {
        out.push(violation(
            "INVALID_URL",
            "url",
            format!("`{}` is not an absolute http(s) URL", site.url),
        ));
    }

    if let Some(favicon) = &site.favicon {
        check_asset_path(favicon, "favicon", &mut out);
    }
    if let Some(logo) = &site.navbar.logo {
        check_asset_path(&logo.src, "navbar.logo.src", &mut out);
    }

    for (i, item) in site.navbar.items.iter().enumerate() {
        let location = format!("navbar.items[{}]", i);
        check_label(&item.label, &location, &mut out);
        check_target(item.target().err(), &location, &mut out);
    }

    for (g, group) in site.footer.links.iter().enumerate() {
        let location = format!("footer.links[{}]", g);
        check_label(&group.title, &location, &mut out);
        for (i, link) in group.items.iter().enumerate() {
            let location = format!("{}.items[{}]", location, i);
            check_label(&link.label, &location, &mut out);
            check_target(link.target().err(), &location, &mut out);
        }
    }

    out
}

/// Check the sidebar tree.
pub fn validate_sidebar(sidebar: &SidebarTree) -> Vec<Violation> {
    let mut out = Vec::new();
    check_sidebar_level(&sidebar.items, "sidebar", &mut out);
    out
}

fn check_sidebar_level(items: &[SidebarItem], location: &str, out: &mut Vec<Violation>) {
    let mut doc_ids = HashSet::new();
    let mut labels = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        let item_location = format!("{}.items[{}]", location, i);
        match item {
            SidebarItem::Doc(id) => {
                if id.trim().is_empty() {
                    out.push(violation("EMPTY_DOC_ID", item_location, "document id is empty"));
                } else if !doc_ids.insert(id.as_str()) {
                    out.push(violation(
                        "DUPLICATE_DOC_ID",
                        item_location,
                        format!("`{}` appears more than once in this category", id),
                    ));
                }
            }
            SidebarItem::Category { label, items, .. } => {
                check_label(label, &item_location, out);
                if !label.trim().is_empty() && !labels.insert(label.as_str()) {
                    out.push(violation(
                        "DUPLICATE_CATEGORY",
                        item_location.clone(),
                        format!("category `{}` appears more than once at this level", label),
                    ));
                }
                if items.is_empty() {
                    out.push(violation(
                        "EMPTY_CATEGORY",
                        item_location.clone(),
                        format!("category `{}` has no items", label),
                    ));
                }
                check_sidebar_level(items, &item_location, out);
            }
        }
    }
}

/// Check the landing page content.
pub fn validate_landing(landing: &LandingPage) -> Vec<Violation> {
    let mut out = Vec::new();

    check_label(&landing.hero.call_to_action.label, "hero.call_to_action", &mut out);
    if landing.hero.call_to_action.to.trim().is_empty() {
        out.push(violation(
            "MISSING_TARGET",
            "hero.call_to_action",
            "call to action has no target",
        ));
    }
    if let Some(image) = &landing.hero.banner_image {
        check_asset_path(image, "hero.banner_image", &mut out);
    }
    if let Some(image) = &landing.hero.pattern_image {
        check_asset_path(image, "hero.pattern_image", &mut out);
    }

    for (s, section) in landing.sections.iter().enumerate() {
        let location = format!("sections[{}]", s);
        check_label(&section.title, &location, &mut out);
        if section.intro.trim().is_empty() && section.blocks.is_empty() {
            out.push(violation(
                "EMPTY_SECTION",
                location.clone(),
                format!("section `{}` has neither intro nor blocks", section.title),
            ));
        }
        if let Some(image) = &section.image {
            check_asset_path(image, &format!("{}.image", location), &mut out);
        }
        for (b, block) in section.blocks.iter().enumerate() {
            if let Some(image) = &block.image {
                check_asset_path(image, &format!("{}.blocks[{}].image", location, b), &mut out);
            }
        }
    }

    out
}

fn check_label(label: &str, location: &str, out: &mut Vec<Violation>) {
    if label.trim().is_empty() {
        out.push(violation("EMPTY_LABEL", location, "label is empty"));
    }
}

fn check_target(err: Option<TargetError>, location: &str, out: &mut Vec<Violation>) {
    let Some(err) = err else {
        return;
    };
    let code = match err {
        TargetError::Missing => "MISSING_TARGET",
        TargetError::Ambiguous => "AMBIGUOUS_TARGET",
    };
    out.push(violation(code, location, err.to_string()));
}

fn check_asset_path(path: &str, location: &str, out: &mut Vec<Violation>) {
    if !is_asset_path(path) {
        out.push(violation(
            "INVALID_ASSET_PATH",
            location,
            format!("`{}` is not a relative path inside the static directory", path),
        ));
    }
}

/// A packaged asset path: relative, no scheme, no parent segments.
pub fn is_asset_path(path: &str) -> bool {
    !path.trim().is_empty()
        && !path.contains("://")
        && !path.starts_with('/')
        && !path.contains('\\')
        && path.split('/').all(|segment| segment != "..")
}

fn is_absolute_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.trim_matches('/').is_empty())
}
