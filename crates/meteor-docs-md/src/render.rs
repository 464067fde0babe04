//! Markdown to HTML rendering with link rewriting and heading anchors.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use crate::codeblock::{extract_title, Language};
use crate::parser::{markdown_options, SlugSet};

/// What to do with a link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRewrite {
    Keep,
    Replace(String),
}

/// Render Markdown content to HTML.
///
/// Every link destination goes through `rewrite`. Headings get the same ids
/// [`parse_doc`](crate::parse_doc) reports in its table of contents. Code
/// blocks get a canonical `language-*` class and, with a `title=` hint, a
/// title bar.
pub fn render_html(content: &str, rewrite: &mut dyn FnMut(&str) -> LinkRewrite) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(content, markdown_options()).collect();
    let mut slugs = SlugSet::default();
    let mut out: Vec<Event<'_>> = Vec::with_capacity(events.len());

    let mut i = 0;
    while i < events.len() {
        let event = std::mem::replace(&mut events[i], Event::SoftBreak);
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let id = id.unwrap_or_else(|| {
                    CowStr::from(slugs.unique(&heading_text(&events[i + 1..])))
                });
                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(id),
                    classes,
                    attrs,
                }));
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match rewrite(&dest_url) {
                    LinkRewrite::Keep => dest_url,
                    LinkRewrite::Replace(url) => CowStr::from(url),
                };
                out.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }

            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                if let Some(title) = extract_title(&info) {
                    out.push(Event::Html(CowStr::from(format!(
                        "<div class=\"code-block-title\">{}</div>\n",
                        escape_html(&title)
                    ))));
                }
                let info = match Language::from_info(&info) {
                    Language::Unknown => info,
                    language => CowStr::from(language.name()),
                };
                out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
            }

            other => out.push(other),
        }
        i += 1;
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, out.into_iter());
    html_output
}

/// Plain text of a heading, given the events that follow its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Escape text for use inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_doc;

    fn keep(_: &str) -> LinkRewrite {
        LinkRewrite::Keep
    }

    #[test]
    fn adds_heading_ids_matching_toc() {
        let md = "# Sinks\n\n## The `http` sink\n\n## Usage\n\n## Usage";
        let html = render_html(md, &mut keep);
        let doc = parse_doc(md).unwrap();

        for entry in &doc.toc {
            assert!(
                html.contains(&format!("id=\"{}\"", entry.id)),
                "missing id {} in {}",
                entry.id,
                html
            );
        }
        assert!(html.contains("<h2 id=\"usage-1\">Usage</h2>"));
    }

    #[test]
    fn rewrites_links() {
        let md =
            "See [recipes](../concepts/recipe.md) and [GitHub](https://github.com/goto/meteor).";
        let mut seen = Vec::new();
        let html = render_html(md, &mut |dest: &str| {
            seen.push(dest.to_string());
            if dest.ends_with(".md") {
                LinkRewrite::Replace("/meteor/docs/concepts/recipe/".to_string())
            } else {
                LinkRewrite::Keep
            }
        });

        assert_eq!(seen, vec!["../concepts/recipe.md", "https://github.com/goto/meteor"]);
        assert!(html.contains("href=\"/meteor/docs/concepts/recipe/\""));
        assert!(html.contains("href=\"https://github.com/goto/meteor\""));
    }

    #[test]
    fn renders_code_block_titles() {
        let md = "```yaml title=\"recipe.yaml\"\nname: demo\n```";
        let html = render_html(md, &mut keep);

        assert!(html.contains("<div class=\"code-block-title\">recipe.yaml</div>"));
        assert!(html.contains("class=\"language-yaml\""));
        assert!(!html.contains("title="));
    }

    #[test]
    fn canonicalizes_code_languages() {
        let md = "```yml\na: 1\n```\n\n```sh\nmeteor run\n```\n\n```python\nprint()\n```";
        let html = render_html(md, &mut keep);

        assert!(html.contains("class=\"language-yaml\""));
        assert!(html.contains("class=\"language-bash\""));
        assert!(html.contains("class=\"language-python\""));
        assert!(!html.contains("language-yml"));
    }

    #[test]
    fn escapes_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
