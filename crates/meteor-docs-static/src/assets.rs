//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Meteor docs theme */

:root {
  --navbar-height: 3.75rem;
  --sidebar-width: 280px;
  --toc-width: 220px;
  --content-max-width: 820px;
  --background: #ffffff;
  --foreground: #1c1e21;
  --muted: #f5f6f7;
  --muted-foreground: #606770;
  --border: #dadde1;
  --primary: #2e8555;
  --primary-foreground: #ffffff;
  --code-background: #f6f8fa;
  --code-foreground: #393a34;
  --radius: 0.375rem;
}

html[data-theme="dark"] {
  --background: #1b1b1d;
  --foreground: #e3e3e3;
  --muted: #242526;
  --muted-foreground: #b0b3b8;
  --border: #444950;
  --primary: #25c2a0;
  --primary-foreground: #1b1b1d;
  --code-background: #282a36;
  --code-foreground: #f8f8f2;
}

/* Code palettes selected by the prism themes on <html> */
html[data-theme="light"][data-prism-theme="github"] {
  --code-background: #f6f8fa;
  --code-foreground: #393a34;
}

html[data-theme="light"][data-prism-theme="vsLight"] {
  --code-background: #ffffff;
  --code-foreground: #000080;
}

html[data-theme="light"][data-prism-theme="duotoneLight"] {
  --code-background: #faf8f5;
  --code-foreground: #728fcb;
}

html[data-theme="dark"][data-prism-dark-theme="dracula"] {
  --code-background: #282a36;
  --code-foreground: #f8f8f2;
}

html[data-theme="dark"][data-prism-dark-theme="vsDark"] {
  --code-background: #1e1e1e;
  --code-foreground: #d4d4d4;
}

html[data-theme="dark"][data-prism-dark-theme="nightOwl"] {
  --code-background: #011627;
  --code-foreground: #d6deeb;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.65;
}

.sr-only {
  position: absolute;
  width: 1px;
  height: 1px;
  overflow: hidden;
  clip: rect(0, 0, 0, 0);
  white-space: nowrap;
}

/* Announcement bar */
.announcement-bar {
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 0.5rem 2.5rem;
  position: relative;
  font-size: 0.9rem;
}

.announcement-bar.hidden {
  display: none;
}

.announcement-bar a {
  color: inherit;
  text-decoration: underline;
}

.announcement-close {
  position: absolute;
  right: 0.75rem;
  background: none;
  border: none;
  color: inherit;
  font-size: 1.25rem;
  cursor: pointer;
}

/* Navbar */
.navbar {
  position: sticky;
  top: 0;
  z-index: 20;
  height: var(--navbar-height);
  background: var(--background);
  border-bottom: 1px solid var(--border);
  transition: transform 0.2s;
}

.navbar.navbar-hidden {
  transform: translateY(-100%);
}

.navbar-inner {
  display: flex;
  justify-content: space-between;
  align-items: center;
  height: 100%;
  padding: 0 1rem;
}

.navbar-items {
  display: flex;
  align-items: center;
  gap: 1rem;
}

.navbar-brand {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  color: var(--foreground);
  text-decoration: none;
}

.navbar-logo {
  height: 2rem;
}

.navbar-link {
  color: var(--foreground);
  text-decoration: none;
  font-weight: 500;
}

.navbar-link:hover {
  color: var(--primary);
}

.color-mode-toggle {
  width: 2rem;
  height: 2rem;
  border-radius: 50%;
  border: 1px solid var(--border);
  background: var(--muted);
  cursor: pointer;
}

/* Docs layout */
.doc-layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: calc(100vh - var(--navbar-height));
}

.sidebar {
  border-right: 1px solid var(--border);
  padding: 1rem;
  position: sticky;
  top: var(--navbar-height);
  height: calc(100vh - var(--navbar-height));
  overflow-y: auto;
}

.menu-list {
  list-style: none;
}

.menu-list .menu-list {
  margin-left: 0.75rem;
}

.menu-link,
.menu-category-label {
  display: block;
  padding: 0.375rem 0.75rem;
  border-radius: var(--radius);
  color: var(--muted-foreground);
  text-decoration: none;
  cursor: pointer;
}

.menu-category-label {
  font-weight: 600;
  color: var(--foreground);
}

.menu-link:hover {
  background: var(--muted);
}

.menu-item.active > .menu-link {
  color: var(--primary);
  background: var(--muted);
  font-weight: 600;
}

.doc-main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
}

.doc {
  max-width: var(--content-max-width);
}

.page-main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem;
}

.content h1 {
  font-size: 2.5rem;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.75rem;
  margin: 2rem 0 1rem;
}

.content h3 {
  font-size: 1.25rem;
  margin: 1.5rem 0 0.75rem;
}

.content p,
.content ul,
.content ol,
.content table {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content a {
  color: var(--primary);
}

.content table {
  border-collapse: collapse;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.5rem 0.75rem;
}

/* Code blocks */
.code-block-title {
  background: var(--muted);
  border: 1px solid var(--border);
  border-bottom: none;
  border-radius: var(--radius) var(--radius) 0 0;
  padding: 0.5rem 1rem;
  font-size: 0.85rem;
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
}

.code-block-title + pre {
  border-top-left-radius: 0;
  border-top-right-radius: 0;
}

.content pre {
  background: var(--code-background);
  color: var(--code-foreground);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
  margin-bottom: 1rem;
  position: relative;
}

.content code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.9em;
  background: var(--code-background);
  padding: 0.1rem 0.3rem;
  border-radius: 0.25rem;
}

.content pre code {
  background: none;
  padding: 0;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  background: var(--muted);
  color: var(--foreground);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

/* Edit link and pagination */
.edit-this-page {
  margin-top: 2rem;
}

.edit-this-page a {
  color: var(--primary);
}

.pagination-nav {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 1rem;
  margin-top: 2rem;
}

.pagination-prev,
.pagination-next {
  display: flex;
  flex-direction: column;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  text-decoration: none;
  color: var(--foreground);
}

.pagination-next {
  grid-column: 2;
  text-align: right;
}

.pagination-sublabel {
  font-size: 0.8rem;
  color: var(--muted-foreground);
}

.pagination-label {
  font-weight: 600;
  color: var(--primary);
}

/* Table of contents */
.toc {
  position: sticky;
  top: calc(var(--navbar-height) + 2rem);
  align-self: start;
  border-left: 1px solid var(--border);
  padding-left: 1rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  font-size: 0.85rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc a:hover {
  color: var(--primary);
}

.toc-level-3 {
  padding-left: 1rem;
}

/* Landing */
.home-hero {
  position: relative;
  overflow: hidden;
  padding: 4rem 2rem;
  background: var(--muted);
}

.home-pattern {
  position: absolute;
  inset: 0;
  opacity: 0.3;
  pointer-events: none;
}

.home-banner {
  position: relative;
  display: grid;
  grid-template-columns: 5fr 1fr 6fr;
  align-items: center;
  max-width: 1140px;
  margin: 0 auto;
}

.home-banner-image {
  grid-column: 3;
  text-align: right;
}

.home-banner-image img {
  max-width: 100%;
}

.home-title {
  font-size: 3rem;
  font-weight: 700;
  line-height: 1.2;
}

.home-subtitle {
  display: block;
  margin: 1rem 0 2rem;
  font-size: 1.1rem;
  color: var(--muted-foreground);
}

.button {
  display: inline-block;
  padding: 0.75rem 1.5rem;
  border-radius: var(--radius);
  background: var(--primary);
  color: var(--primary-foreground);
  font-weight: 600;
  text-decoration: none;
}

.text-section {
  padding: 4rem 2rem;
}

.section-dark {
  background: var(--muted);
}

.wrapper {
  max-width: 1140px;
  margin: 0 auto;
}

.section-intro {
  margin: 1rem 0 2rem;
  max-width: 760px;
  color: var(--muted-foreground);
}

.section-with-image {
  display: grid;
  grid-template-columns: 1fr 2fr;
  gap: 2rem;
  align-items: center;
}

.section-image img {
  max-width: 100%;
}

.grid {
  display: grid;
  gap: 2rem;
}

.grid-1 { grid-template-columns: 1fr; }
.grid-2 { grid-template-columns: repeat(2, 1fr); }
.grid-3 { grid-template-columns: repeat(3, 1fr); }
.grid-4 { grid-template-columns: repeat(4, 1fr); }

.grid-block-title {
  font-size: 1.15rem;
  margin-bottom: 0.5rem;
}

.grid-block-body {
  color: var(--muted-foreground);
}

/* Footer */
.footer {
  border-top: 1px solid var(--border);
  padding: 3rem 2rem;
}

.footer-dark {
  background: #303846;
  color: #ebedf0;
}

.footer-links {
  display: flex;
  justify-content: space-around;
  flex-wrap: wrap;
  gap: 2rem;
  max-width: 1140px;
  margin: 0 auto;
}

.footer-title {
  font-weight: 700;
  margin-bottom: 0.5rem;
}

.footer-items {
  list-style: none;
}

.footer-link {
  color: inherit;
  text-decoration: none;
  line-height: 2;
}

.footer-link:hover {
  color: var(--primary);
}

.footer-copyright {
  text-align: center;
  margin-top: 2rem;
  font-size: 0.85rem;
}

/* Responsive */
@media (max-width: 996px) {
  .doc-layout,
  .doc-main,
  .home-banner,
  .section-with-image {
    grid-template-columns: 1fr;
  }

  .sidebar,
  .toc {
    display: none;
  }

  .grid-2,
  .grid-3,
  .grid-4 {
    grid-template-columns: 1fr;
  }
}
"#;

const DEFAULT_JS: &str = r#"// Meteor docs runtime
(function() {
  'use strict';

  var root = document.documentElement;
  var storageKey = 'theme';

  // Colour mode: stored choice, then system preference, then site default
  var stored = null;
  try { stored = localStorage.getItem(storageKey); } catch (e) {}
  if (stored === 'light' || stored === 'dark') {
    root.setAttribute('data-theme', stored);
  } else if (root.hasAttribute('data-follow-system') && window.matchMedia) {
    if (window.matchMedia('(prefers-color-scheme: dark)').matches) {
      root.setAttribute('data-theme', 'dark');
    }
  }

  var toggle = document.querySelector('.color-mode-toggle');
  if (toggle) {
    toggle.addEventListener('click', function() {
      var next = root.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
      root.setAttribute('data-theme', next);
      try { localStorage.setItem(storageKey, next); } catch (e) {}
    });
  }

  // Announcement bar dismissal is remembered per bar id
  var bar = document.querySelector('.announcement-bar');
  if (bar) {
    var barKey = 'announcement-dismiss-' + bar.getAttribute('data-announcement-id');
    try {
      if (localStorage.getItem(barKey) === 'true') bar.classList.add('hidden');
    } catch (e) {}
    var close = bar.querySelector('.announcement-close');
    if (close) {
      close.addEventListener('click', function() {
        bar.classList.add('hidden');
        try { localStorage.setItem(barKey, 'true'); } catch (e) {}
      });
    }
  }

  // Hide navbar when scrolling down
  var navbar = document.querySelector('.navbar-hideable');
  if (navbar) {
    var lastY = window.scrollY;
    window.addEventListener('scroll', function() {
      var y = window.scrollY;
      navbar.classList.toggle('navbar-hidden', y > lastY && y > navbar.offsetHeight);
      lastY = y;
    }, { passive: true });
  }

  // Copy button for code blocks
  document.querySelectorAll('.content pre').forEach(function(pre) {
    if (pre.querySelector('.copy-btn')) return;

    var btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', function() {
      var code = pre.querySelector('code');
      var text = code ? code.textContent : pre.textContent;
      navigator.clipboard.writeText(text || '').then(function() {
        btn.textContent = 'Copied!';
      }, function() {
        btn.textContent = 'Error';
      }).then(function() {
        setTimeout(function() { btn.textContent = 'Copy'; }, 2000);
      });
    });

    pre.appendChild(btn);
  });
})();
"#;
