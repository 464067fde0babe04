//! Template engine for rendering site pages.

use minijinja::{context, Environment};
use serde::Serialize;

use meteor_docs_site::{LinkTarget, NavbarItem, Position, SiteDescriptor};

/// A rendered link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    /// Opens in a new tab
    pub external: bool,
    pub class_name: Option<String>,
}

/// A titled column of footer links.
#[derive(Debug, Clone, Serialize)]
pub struct FooterGroupView {
    pub title: String,
    pub items: Vec<LinkView>,
}

/// Announcement bar as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    pub id: String,
    pub content: String,
    pub background_color: String,
    pub text_color: String,
    pub is_closeable: bool,
}

/// Site-wide chrome shared by every page: head, navbar, footer.
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub title: String,
    pub tagline: String,
    pub base_url: String,
    pub favicon: Option<String>,
    pub logo_src: Option<String>,
    pub logo_alt: String,
    pub navbar_title: String,
    pub navbar_left: Vec<LinkView>,
    pub navbar_right: Vec<LinkView>,
    pub hide_on_scroll: bool,
    pub footer_style: String,
    pub footer_groups: Vec<FooterGroupView>,
    pub copyright: Option<String>,
    pub announcement: Option<AnnouncementView>,
    pub default_mode: String,
    pub respect_prefers_color_scheme: bool,
    pub prism_theme: String,
    pub prism_dark_theme: String,
    pub gtag_id: Option<String>,
    /// Stylesheet hrefs layered after the built-in one
    pub styles: Vec<String>,
    /// Inline script appended to every page (dev server live reload)
    pub reload_script: Option<String>,
}

impl Chrome {
    /// Derive the chrome from a site descriptor.
    ///
    /// `doc_route` maps a document id to its published route, so links to a
    /// document honour its slug. Entries without a valid target are skipped;
    /// validation reports them.
    pub fn new(
        site: &SiteDescriptor,
        doc_route: &dyn Fn(&str) -> String,
        styles: Vec<String>,
        reload_script: Option<String>,
    ) -> Self {
        let navbar_items = |position: Position| -> Vec<LinkView> {
            site.navbar
                .items
                .iter()
                .filter(|item| item.position == position)
                .filter_map(|item| navbar_link(site, doc_route, item))
                .collect()
        };

        let footer_groups = site
            .footer
            .links
            .iter()
            .map(|group| FooterGroupView {
                title: group.title.clone(),
                items: group
                    .items
                    .iter()
                    .filter_map(|link| {
                        let target = link.target().ok()?;
                        Some(link_view(site, doc_route, &link.label, target, None))
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: site.title.clone(),
            tagline: site.tagline.clone(),
            base_url: site.base_url.clone(),
            favicon: site.favicon.as_deref().map(|f| site.route(f)),
            logo_src: site.navbar.logo.as_ref().map(|l| site.route(&l.src)),
            logo_alt: site
                .navbar
                .logo
                .as_ref()
                .and_then(|l| l.alt.clone())
                .unwrap_or_else(|| site.title.clone()),
            navbar_title: site.navbar.title.clone(),
            navbar_left: navbar_items(Position::Left),
            navbar_right: navbar_items(Position::Right),
            hide_on_scroll: site.navbar.hide_on_scroll,
            footer_style: site.footer.style.as_str().to_string(),
            footer_groups,
            copyright: site.footer.copyright.clone(),
            announcement: site.announcement_bar.as_ref().map(|bar| AnnouncementView {
                id: bar.id.clone(),
                content: bar.content.clone(),
                background_color: bar.background_color.clone(),
                text_color: bar.text_color.clone(),
                is_closeable: bar.is_closeable,
            }),
            default_mode: site.color_mode.default_mode.as_str().to_string(),
            respect_prefers_color_scheme: site.color_mode.respect_prefers_color_scheme,
            prism_theme: site.prism.theme.clone(),
            prism_dark_theme: site.prism.dark_theme.clone(),
            gtag_id: site.analytics.gtag_tracking_id.clone(),
            styles,
            reload_script,
        }
    }
}

fn navbar_link(
    site: &SiteDescriptor,
    doc_route: &dyn Fn(&str) -> String,
    item: &NavbarItem,
) -> Option<LinkView> {
    let target = item.target().ok()?;
    Some(link_view(
        site,
        doc_route,
        &item.label,
        target,
        item.class_name.clone(),
    ))
}

fn link_view(
    site: &SiteDescriptor,
    doc_route: &dyn Fn(&str) -> String,
    label: &str,
    target: LinkTarget<'_>,
    class_name: Option<String>,
) -> LinkView {
    let href = match target {
        LinkTarget::Doc(id) => doc_route(id),
        other => site.href(other),
    };
    LinkView {
        label: label.to_string(),
        href,
        external: target.is_external(),
        class_name,
    }
}

/// A sidebar node as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct SidebarNode {
    pub label: String,
    /// Set for document leaves
    pub href: Option<String>,
    pub doc_id: Option<String>,
    pub collapsed: bool,
    /// Every document id below this node, for marking the open category
    pub doc_ids: Vec<String>,
    pub children: Vec<SidebarNode>,
}

/// A table of contents entry.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub id: String,
    pub level: u8,
}

/// Previous/next pagination link.
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub label: String,
    pub href: String,
}

/// Context for a document page.
#[derive(Debug, Clone, Serialize)]
pub struct DocContext {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub canonical: String,
    pub content: String,
    /// Render a title heading above content that has no level-1 heading of its own
    pub show_title: bool,
    pub toc: Vec<TocEntry>,
    pub edit_url: Option<String>,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
}

/// Context for a standalone page or the 404 page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub description: Option<String>,
    pub canonical: String,
    pub content: String,
    pub show_title: bool,
}

/// Landing hero as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct HeroView {
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub banner_image: Option<String>,
    pub pattern_image: Option<String>,
}

/// A landing grid entry as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct BlockView {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
}

/// A landing section as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub title: String,
    pub intro: String,
    pub background: String,
    pub columns: u8,
    pub image: Option<String>,
    pub blocks: Vec<BlockView>,
}

/// Context for the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct LandingContext {
    pub description: String,
    pub canonical: String,
    pub hero: HeroView,
    pub sections: Vec<SectionView>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("nav.html", NAV_TEMPLATE),
            ("sidebar.html", SIDEBAR_TEMPLATE),
            ("footer.html", FOOTER_TEMPLATE),
            ("doc.html", DOC_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
            ("landing.html", LANDING_TEMPLATE),
            ("404.html", NOT_FOUND_TEMPLATE),
        ] {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render a document page.
    pub fn render_doc(
        &self,
        site: &Chrome,
        sidebar: &[SidebarNode],
        doc: &DocContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("doc.html")?.render(context! {
            site => site,
            sidebar => sidebar,
            current_doc => &doc.id,
            doc => doc,
            title => &doc.title,
            description => &doc.description,
            keywords => &doc.keywords,
            canonical => &doc.canonical,
        })
    }

    /// Render a standalone page.
    pub fn render_page(&self, site: &Chrome, page: &PageContext) -> Result<String, minijinja::Error> {
        self.render_plain("page.html", site, page)
    }

    /// Render the not-found page.
    pub fn render_not_found(
        &self,
        site: &Chrome,
        page: &PageContext,
    ) -> Result<String, minijinja::Error> {
        self.render_plain("404.html", site, page)
    }

    fn render_plain(
        &self,
        template: &str,
        site: &Chrome,
        page: &PageContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context! {
            site => site,
            page => page,
            title => &page.title,
            description => &page.description,
            canonical => &page.canonical,
        })
    }

    /// Render the landing page.
    pub fn render_landing(
        &self,
        site: &Chrome,
        landing: &LandingContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("landing.html")?.render(context! {
            site => site,
            landing => landing,
            title => &site.tagline,
            description => &landing.description,
            canonical => &landing.canonical,
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="{{ site.default_mode }}" data-prism-theme="{{ site.prism_theme }}" data-prism-dark-theme="{{ site.prism_dark_theme }}"{% if site.respect_prefers_color_scheme %} data-follow-system{% endif %}>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{{ title }} | {{ site.title }}{% endblock %}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% if keywords %}<meta name="keywords" content="{{ keywords | join(", ") }}">
  {% endif %}<link rel="canonical" href="{{ canonical }}">
  {% if site.favicon %}<link rel="icon" href="{{ site.favicon }}">
  {% endif %}<link rel="stylesheet" href="{{ site.base_url }}assets/main.css">
  {% for style in site.styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}{% if site.gtag_id %}<script async src="https://www.googletagmanager.com/gtag/js?id={{ site.gtag_id }}"></script>
  <script>window.dataLayer=window.dataLayer||[];function gtag(){dataLayer.push(arguments);}gtag('js',new Date());gtag('config','{{ site.gtag_id }}',{anonymize_ip:true});</script>
  {% endif %}
</head>
<body>
  {% if site.announcement %}
  <div class="announcement-bar" data-announcement-id="{{ site.announcement.id }}" style="background-color: {{ site.announcement.background_color }}; color: {{ site.announcement.text_color }};">
    <div class="announcement-content">{{ site.announcement.content | safe }}</div>
    {% if site.announcement.is_closeable %}<button type="button" class="announcement-close" aria-label="Close">&times;</button>{% endif %}
  </div>
  {% endif %}
  {% include "nav.html" %}
  {% block content %}{% endblock %}
  {% include "footer.html" %}
  <script src="{{ site.base_url }}assets/main.js"></script>
  {% if site.reload_script %}<script>{{ site.reload_script | safe }}</script>{% endif %}
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<nav class="navbar{% if site.hide_on_scroll %} navbar-hideable{% endif %}">
  <div class="navbar-inner">
    <div class="navbar-items navbar-items-left">
      <a class="navbar-brand" href="{{ site.base_url }}">
        {% if site.logo_src %}<img class="navbar-logo" src="{{ site.logo_src }}" alt="{{ site.logo_alt }}">{% endif %}
        <b class="navbar-title">{{ site.navbar_title }}</b>
      </a>
      {% for item in site.navbar_left %}
      <a class="navbar-link{% if item.class_name %} {{ item.class_name }}{% endif %}" href="{{ item.href }}"{% if item.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ item.label }}</a>
      {% endfor %}
    </div>
    <div class="navbar-items navbar-items-right">
      {% for item in site.navbar_right %}
      <a class="navbar-link{% if item.class_name %} {{ item.class_name }}{% endif %}" href="{{ item.href }}" aria-label="{{ item.label }}"{% if item.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{% if item.class_name %}<span class="sr-only">{{ item.label }}</span>{% else %}{{ item.label }}{% endif %}</a>
      {% endfor %}
      <button type="button" class="color-mode-toggle" aria-label="Switch between dark and light mode"></button>
    </div>
  </div>
</nav>"##;

const SIDEBAR_TEMPLATE: &str = r##"<ul class="menu-list">
{% for item in sidebar recursive %}
  {% if item.href %}
  <li class="menu-item{% if item.doc_id == current_doc %} active{% endif %}">
    <a class="menu-link" href="{{ item.href }}">{{ item.label }}</a>
  </li>
  {% else %}
  <li class="menu-category">
    <details{% if not item.collapsed or current_doc in item.doc_ids %} open{% endif %}>
      <summary class="menu-category-label">{{ item.label }}</summary>
      <ul class="menu-list">{{ loop(item.children) }}</ul>
    </details>
  </li>
  {% endif %}
{% endfor %}
</ul>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="footer footer-{{ site.footer_style }}">
  <div class="footer-links">
    {% for group in site.footer_groups %}
    <div class="footer-col">
      <div class="footer-title">{{ group.title }}</div>
      <ul class="footer-items">
        {% for item in group.items %}
        <li><a class="footer-link" href="{{ item.href }}"{% if item.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ item.label }}</a></li>
        {% endfor %}
      </ul>
    </div>
    {% endfor %}
  </div>
  {% if site.copyright %}<div class="footer-copyright">{{ site.copyright }}</div>{% endif %}
</footer>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="doc-layout">
  <aside class="sidebar">
    {% include "sidebar.html" %}
  </aside>
  <main class="doc-main">
    <article class="doc">
      <div class="content">
        {% if doc.show_title %}<h1>{{ doc.title }}</h1>{% endif %}
        {{ doc.content | safe }}
      </div>
      {% if doc.edit_url %}
      <div class="edit-this-page"><a href="{{ doc.edit_url }}" target="_blank" rel="noopener noreferrer">Edit this page</a></div>
      {% endif %}
      {% if doc.prev or doc.next %}
      <nav class="pagination-nav" aria-label="Docs pages navigation">
        {% if doc.prev %}<a class="pagination-prev" href="{{ doc.prev.href }}"><span class="pagination-sublabel">Previous</span><span class="pagination-label">{{ doc.prev.label }}</span></a>{% endif %}
        {% if doc.next %}<a class="pagination-next" href="{{ doc.next.href }}"><span class="pagination-sublabel">Next</span><span class="pagination-label">{{ doc.next.label }}</span></a>{% endif %}
      </nav>
      {% endif %}
    </article>
    {% if doc.toc %}
    <aside class="toc">
      <ul>
      {% for entry in doc.toc %}
        <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
      {% endfor %}
      </ul>
    </aside>
    {% endif %}
  </main>
</div>
{% endblock %}"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="page-main">
  <div class="content">
    {% if page.show_title %}<h1>{{ page.title }}</h1>{% endif %}
    {{ page.content | safe }}
  </div>
</main>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<main class="page-main not-found">
  <h1>{{ page.title }}</h1>
  <div class="content">{{ page.content | safe }}</div>
</main>
{% endblock %}"##;

const LANDING_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ site.tagline }} | {{ site.title }}{% endblock %}

{% block content %}
<header class="home-hero">
  {% if landing.hero.pattern_image %}<div class="home-pattern"><img src="{{ landing.hero.pattern_image }}" alt=""></div>{% endif %}
  <div class="home-banner">
    <div class="home-banner-text">
      <div class="home-title">{{ site.tagline }}</div>
      <small class="home-subtitle">{{ landing.hero.subtitle }}</small>
      <a class="button" href="{{ landing.hero.cta_href }}">{{ landing.hero.cta_label }}</a>
    </div>
    {% if landing.hero.banner_image %}<div class="home-banner-image"><img src="{{ landing.hero.banner_image }}" alt=""></div>{% endif %}
  </div>
</header>
<main class="home-main">
  {% for section in landing.sections %}
  <section class="text-section section-{{ section.background }}">
    <div class="wrapper">
      <h1>{{ section.title }}</h1>
      {% if section.intro %}<p class="section-intro">{{ section.intro }}</p>{% endif %}
      <div class="section-body{% if section.image %} section-with-image{% endif %}">
        <div class="grid grid-{{ section.columns }}">
          {% for block in section.blocks %}
          <div class="grid-block">
            {% if block.image %}<img class="grid-block-image" src="{{ block.image }}" alt="{{ block.title }}">{% endif %}
            {% if block.title %}<h3 class="grid-block-title">{{ block.title }}</h3>{% endif %}
            {% if block.body %}<div class="grid-block-body">{{ block.body }}</div>{% endif %}
          </div>
          {% endfor %}
        </div>
        {% if section.image %}<div class="section-image"><img src="{{ section.image }}" alt=""></div>{% endif %}
      </div>
    </div>
  </section>
  {% endfor %}
</main>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use meteor_docs_site::meteor_project;

    fn chrome() -> Chrome {
        let project = meteor_project().unwrap();
        let site = &project.descriptor;
        Chrome::new(site, &|id| site.doc_route(id), vec![], None)
    }

    fn page(title: &str, content: &str) -> PageContext {
        PageContext {
            title: title.to_string(),
            description: None,
            canonical: "https://goto.github.io/meteor/help/".to_string(),
            content: content.to_string(),
            show_title: true,
        }
    }

    #[test]
    fn splits_navbar_by_position() {
        let chrome = chrome();

        let left: Vec<&str> = chrome.navbar_left.iter().map(|l| l.label.as_str()).collect();
        let right: Vec<&str> = chrome.navbar_right.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(left, vec!["Docs", "Help"]);
        assert_eq!(right, vec!["Slack", "GitHub"]);
        assert_eq!(chrome.navbar_left[0].href, "/meteor/docs/introduction/");
        assert!(chrome.navbar_right[1].external);
        assert_eq!(chrome.favicon.as_deref(), Some("/meteor/img/favicon.ico"));
    }

    #[test]
    fn doc_links_use_resolved_route() {
        let project = meteor_project().unwrap();
        let resolve = |id: &str| {
            if id == "introduction" {
                "/meteor/docs/".to_string()
            } else {
                project.descriptor.doc_route(id)
            }
        };

        let chrome = Chrome::new(&project.descriptor, &resolve, vec![], None);

        assert_eq!(chrome.navbar_left[0].href, "/meteor/docs/");
        assert_eq!(chrome.navbar_left[1].href, "/meteor/help/");
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new().unwrap();

        let html = engine
            .render_page(&chrome(), &page("Help", "<p>Ask on Slack</p>"))
            .unwrap();

        assert!(html.contains("<title>Help | Meteor</title>"));
        assert!(html.contains("<p>Ask on Slack</p>"));
        assert!(html.contains("<h1>Help</h1>"));
        assert!(html.contains("announcement-bar"));
        assert!(html.contains("G-ZTPBZN6VK7"));
    }

    #[test]
    fn renders_footer_groups_in_order() {
        let engine = TemplateEngine::new().unwrap();

        let html = engine.render_page(&chrome(), &page("Help", "")).unwrap();

        let products = html.find("Products").unwrap();
        let resources = html.find("Resources").unwrap();
        let community = html.find("Community").unwrap();
        assert!(products < resources && resources < community);
        assert!(html.contains("Dagger"));
    }

    #[test]
    fn renders_sidebar_with_active_doc() {
        let engine = TemplateEngine::new().unwrap();
        let sidebar = vec![
            SidebarNode {
                label: "Introduction".to_string(),
                href: Some("/meteor/docs/introduction/".to_string()),
                doc_id: Some("introduction".to_string()),
                collapsed: false,
                doc_ids: vec!["introduction".to_string()],
                children: vec![],
            },
            SidebarNode {
                label: "Guides".to_string(),
                href: None,
                doc_id: None,
                collapsed: true,
                doc_ids: vec!["guides/installation".to_string()],
                children: vec![SidebarNode {
                    label: "Installation".to_string(),
                    href: Some("/meteor/docs/guides/installation/".to_string()),
                    doc_id: Some("guides/installation".to_string()),
                    collapsed: false,
                    doc_ids: vec!["guides/installation".to_string()],
                    children: vec![],
                }],
            },
        ];
        let doc = DocContext {
            id: "guides/installation".to_string(),
            title: "Installation".to_string(),
            description: None,
            keywords: vec![],
            canonical: "https://goto.github.io/meteor/docs/guides/installation/".to_string(),
            content: "<p>brew install meteor</p>".to_string(),
            show_title: true,
            toc: vec![],
            edit_url: None,
            prev: Some(PageLink {
                label: "Introduction".to_string(),
                href: "/meteor/docs/introduction/".to_string(),
            }),
            next: None,
        };

        let html = engine.render_doc(&chrome(), &sidebar, &doc).unwrap();

        assert!(html.contains("menu-item active"));
        assert!(html.contains("<details open>"));
        assert!(html.contains("pagination-prev"));
        assert!(!html.contains("pagination-next"));
    }
}
