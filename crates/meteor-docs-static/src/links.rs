//! Broken link detection over rendered pages.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::docs::join_normalized;

/// An internal link that resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Route of the page containing the link
    pub page: String,
    /// The link as written
    pub href: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.page, self.href)
    }
}

/// The set of paths the built site serves.
pub struct LinkIndex {
    known: HashSet<String>,
    attr_re: Regex,
}

impl LinkIndex {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            known: HashSet::new(),
            attr_re: Regex::new(r#"\s(?:href|src)="([^"]*)""#)?,
        })
    }

    /// Register a page route (ending in `/`).
    ///
    /// Returns false if the route was already registered.
    pub fn add_route(&mut self, route: &str) -> bool {
        let fresh = self.known.insert(route.to_string());
        self.known.insert(format!("{}index.html", route));
        fresh
    }

    /// Register a file path.
    pub fn add_file(&mut self, path: &str) {
        self.known.insert(path.to_string());
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Whether `href`, found on the page at `page_route`, points at something served.
    pub fn resolves(&self, page_route: &str, href: &str) -> bool {
        if !is_internal(href) {
            return true;
        }

        let path = href.split(['#', '?']).next().unwrap_or("");
        if path.is_empty() {
            return true;
        }

        let Some(normalized) = join_normalized(page_route, path) else {
            return false;
        };
        let absolute = format!("/{}", normalized);

        self.known.contains(&absolute) || self.known.contains(&format!("{}/", absolute))
    }

    /// Every unresolved internal link in `html`, in document order.
    pub fn check_page(&self, page_route: &str, html: &str) -> Vec<BrokenLink> {
        self.extract_links(html)
            .into_iter()
            .filter(|href| !self.resolves(page_route, href))
            .map(|href| BrokenLink {
                page: page_route.to_string(),
                href,
            })
            .collect()
    }

    /// All `href` and `src` attribute values, entity-decoded.
    pub fn extract_links(&self, html: &str) -> Vec<String> {
        self.attr_re
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()))
            .collect()
    }
}

fn is_internal(href: &str) -> bool {
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("//")
        || href.contains("://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
        || href.starts_with("javascript:"))
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&#x2f;", "/")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> LinkIndex {
        let mut index = LinkIndex::new().unwrap();
        index.add_route("/meteor/");
        index.add_route("/meteor/docs/introduction/");
        index.add_route("/meteor/docs/guides/installation/");
        index.add_file("/meteor/img/logo.svg");
        index
    }

    #[test]
    fn resolves_absolute_and_relative_links() {
        let index = index();
        let page = "/meteor/docs/guides/installation/";

        assert!(index.resolves(page, "/meteor/docs/introduction/"));
        assert!(index.resolves(page, "/meteor/docs/introduction"));
        assert!(index.resolves(page, "/meteor/docs/introduction/index.html"));
        assert!(index.resolves(page, "../../introduction/#setup"));
        assert!(index.resolves(page, "/meteor/img/logo.svg"));
        assert!(!index.resolves(page, "/meteor/docs/missing/"));
        assert!(!index.resolves(page, "/docs/introduction/"));
    }

    #[test]
    fn ignores_external_and_fragment_links() {
        let index = index();

        assert!(index.resolves("/meteor/", "https://github.com/goto/meteor"));
        assert!(index.resolves("/meteor/", "#top"));
        assert!(index.resolves("/meteor/", "mailto:meteor@example.com"));
        assert!(index.resolves("/meteor/", "?q=kafka"));
    }

    #[test]
    fn decodes_escaped_attributes() {
        let index = index();
        let html = r#"<a href="&#x2f;meteor&#x2f;docs&#x2f;introduction&#x2f;">Docs</a>
<img src="/meteor/img/missing.png">"#;

        assert_eq!(
            index.extract_links(html),
            vec!["/meteor/docs/introduction/", "/meteor/img/missing.png"]
        );
        assert_eq!(
            index.check_page("/meteor/", html),
            vec![BrokenLink {
                page: "/meteor/".to_string(),
                href: "/meteor/img/missing.png".to_string(),
            }]
        );
    }

    #[test]
    fn reports_duplicate_routes() {
        let mut index = index();

        assert!(!index.add_route("/meteor/docs/introduction/"));
        assert!(index.add_route("/meteor/help/"));
    }
}
