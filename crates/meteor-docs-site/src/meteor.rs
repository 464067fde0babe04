//! Built-in Meteor site content.
//!
//! These are the records `meteor-docs init` writes into a fresh project.

use crate::descriptor::SiteDescriptor;
use crate::landing::LandingPage;
use crate::loader::SiteProject;
use crate::sidebar::SidebarTree;
use crate::SiteError;

/// Site descriptor for the current hosting organization.
pub const SITE_TOML: &str = r##"title = "Meteor"
tagline = "Metadata collection framework"
url = "https://goto.github.io/"
base_url = "/meteor/"
favicon = "img/favicon.ico"
organization_name = "goto"
project_name = "meteor"
on_broken_links = "throw"
on_broken_markdown_links = "warn"

[docs]
edit_url = "https://github.com/goto/meteor/edit/master/docs/"
sidebar_collapsed = false

[theme]
custom_css = ["css/theme.css", "css/custom.css"]

[analytics]
gtag_tracking_id = "G-ZTPBZN6VK7"

[color_mode]
default_mode = "light"
respect_prefers_color_scheme = true

[navbar]
title = "Meteor"
logo = { src = "img/logo.svg", alt = "Meteor" }
hide_on_scroll = true

[[navbar.items]]
label = "Docs"
doc_id = "introduction"
position = "left"

[[navbar.items]]
label = "Help"
to = "/help"
position = "left"

[[navbar.items]]
label = "Slack"
href = "https://bit.ly/2RzPbtn"
position = "right"
class_name = "header-slack-link"

[[navbar.items]]
label = "GitHub"
href = "https://github.com/goto/meteor"
position = "right"
class_name = "navbar-item-github"

[footer]
style = "light"

[[footer.links]]
title = "Products"
items = [
  { label = "Optimus", href = "https://github.com/goto/optimus" },
  { label = "Firehose", href = "https://github.com/goto/firehose" },
  { label = "Raccoon", href = "https://github.com/goto/raccoon" },
  { label = "Dagger", href = "https://goto.github.io/dagger/" },
]

[[footer.links]]
title = "Resources"
items = [
  { label = "Docs", to = "/docs/introduction" },
  { label = "Help", to = "/help" },
]

[[footer.links]]
title = "Community"
items = [
  { label = "Slack", href = "https://bit.ly/2RzPbtn" },
  { label = "GitHub", href = "https://github.com/goto/meteor" },
]

[prism]
theme = "github"
dark_theme = "dracula"

[announcement_bar]
id = "star-repo"
content = '⭐️ If you like Meteor, give it a star on <a target="_blank" rel="noopener noreferrer" href="https://github.com/goto/meteor">GitHub</a>! ⭐'
background_color = "#222"
text_color = "#eee"
is_closeable = true
"##;

/// Docs sidebar.
pub const SIDEBAR_TOML: &str = r#"items = [
  "introduction",
  { type = "category", label = "Guides", items = [
    "guides/introduction",
    "guides/installation",
    "guides/list_Plugins",
    "guides/manage_recipes",
    "guides/run_recipes",
    "guides/deployment",
  ] },
  { type = "category", label = "Concepts", items = [
    "concepts/overview",
    "concepts/recipe",
    "concepts/source",
    "concepts/processor",
    "concepts/sink",
  ] },
  { type = "category", label = "Reference", items = [
    "reference/commands",
    "reference/configuration",
    "reference/metadata_models",
    "reference/extractors",
    "reference/processors",
    "reference/sinks",
  ] },
  { type = "category", label = "Contribute", items = [
    "contribute/guide",
    "contribute/contributing",
  ] },
]
"#;

/// Landing page content.
pub const LANDING_TOML: &str = r#"description = "Meteor is an easy-to-use, plugin-driven metadata collection framework to extract data from different sources and sink to any data catalog or store."

[hero]
subtitle = "Meteor is an open source plugin-driven metadata collection framework to extract data from different sources and sink to any data catalog or store."
call_to_action = { label = "Documentation", to = "docs/introduction" }
pattern_image = "img/pattern.svg"
banner_image = "img/banner.svg"

[[sections]]
title = "Built for ease"
background = "light"
layout = "three_column"
intro = """Meteor is a plugin driven agent for collecting metadata. \
Meteor has plugins to source metadata from a variety of data stores, \
services and message queues. It also has sink plugins to send metadata \
to variety of third party APIs and catalog services."""

[[sections.blocks]]
title = "Zero dependency"
body = "Meteor is written in Go and compiles into a single binary with no external dependencies, and requires a very minimal memory footprint."

[[sections.blocks]]
title = "Coverage"
body = "With 50+ plugins and many more coming soon to extract and sink metadata, it is easy to start collecting metadata from various sources."

[[sections.blocks]]
title = "Extensible"
body = "With the ease of plugin development you can build your own plugin to fit with your needs. It allows new sources, processors and sinks to be easily added."

[[sections.blocks]]
title = "CLI"
body = "Meteor comes with a CLI which allows you to interact with agent effectively. You can list all plugins, start and stop agent, and more."

[[sections.blocks]]
title = "Proven"
body = "Battle tested at large scale across multiple companies. Largest deployment collect metadata from thousands of data sources."

[[sections.blocks]]
title = "Runtime"
body = "Meteor can run from your local machine, cloud server machine or containers with minimum efforts required for deployment."

[[sections]]
title = "Framework"
background = "dark"
layout = "three_column"
intro = """Meteor agent uses recipes as a set of instructions which are configured by user. \
Recipes contains configurations about the source from which the metadata will be \
fetched, information about metadata processors and the destination to where \
the metadata will be sent."""

[[sections.blocks]]
title = "Extraction"
body = "Extraction is the process of extracting data from a source and transforming it into a format that can be consumed by the agent. Extractors are the set of plugins that are source of our metadata and include databases, dashboards, users, etc."

[[sections.blocks]]
title = "Processing"
body = "Processing is the process of transforming the extracted data into a format that can be consumed by the agent. Processors are the set of plugins that perform the enrichment or data processing for the metadata after extraction."

[[sections.blocks]]
title = "Sink"
body = "Sink is the process of sending the processed data to a single or multiple destinations as defined in recipes. Sinks are the set of plugins that act as the destination of our metadata after extraction and processing is done by agent."

[[sections]]
title = "Ecosystem"
background = "light"
layout = "one_column"
image = "assets/overview.svg"
intro = """Meteor’s plugin system allows new plugins to be easily added. \
With 50+ plugins and many more coming soon to extract and sink metadata, \
it is easy to start collecting metadata from various sources and \
sink to any data catalog or store."""

[[sections.blocks]]
title = "Extractors"
body = "Meteor supports source plugins to extract metadata from a variety of datastores services, and message queues, including BigQuery, InfluxDB, Kafka, Metabase, and many others."

[[sections.blocks]]
title = "Processors"
body = "Meteor has in-built processors including enrichment and others. It is easy to add your own processors as well using custom plugins."

[[sections.blocks]]
title = "Sinks"
body = "Meteor supports sink plugins to send metadata to a variety of third party APIs and catalog services, including Compass, HTTP, BigQuery, Kafka, and many others."
"#;

/// The built-in project, parsed.
pub fn meteor_project() -> Result<SiteProject, SiteError> {
    let descriptor = SiteDescriptor::from_toml(SITE_TOML).map_err(|e| SiteError::Parse {
        file: "site.toml".to_string(),
        message: e.to_string(),
    })?;
    let sidebar = SidebarTree::from_toml(SIDEBAR_TOML).map_err(|e| SiteError::Parse {
        file: "sidebars.toml".to_string(),
        message: e.to_string(),
    })?;
    let landing = LandingPage::from_toml(LANDING_TOML).map_err(|e| SiteError::Parse {
        file: "landing.toml".to_string(),
        message: e.to_string(),
    })?;

    Ok(SiteProject {
        descriptor,
        sidebar,
        landing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_project_is_valid() {
        let project = meteor_project().unwrap();

        assert_eq!(validate(&project), vec![]);
    }

    #[test]
    fn sidebar_has_four_categories_in_order() {
        let project = meteor_project().unwrap();

        assert_eq!(
            project.sidebar.categories(),
            vec!["Guides", "Concepts", "Reference", "Contribute"]
        );
        assert_eq!(project.sidebar.doc_ids().len(), 20);
        assert_eq!(project.sidebar.doc_ids()[0], "introduction");
    }

    #[test]
    fn ecosystem_has_exactly_three_entries() {
        let project = meteor_project().unwrap();
        let ecosystem = project.landing.section("Ecosystem").unwrap();

        let titles: Vec<&str> = ecosystem.blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Extractors", "Processors", "Sinks"]);
    }

    #[test]
    fn descriptor_points_at_goto() {
        let project = meteor_project().unwrap();

        assert_eq!(project.descriptor.organization_name, "goto");
        assert_eq!(project.descriptor.canonical_url(), "https://goto.github.io/meteor/");
        assert_eq!(project.descriptor.navbar.items.len(), 4);
        assert_eq!(project.descriptor.footer.links.len(), 3);
    }
}
