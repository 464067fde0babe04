//! Sidebar tree: ordered categories of document ids.

use serde::{Deserialize, Serialize};

/// The docs sidebar, in authored order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidebarTree {
    #[serde(default)]
    pub items: Vec<SidebarItem>,
}

/// A sidebar node: either a document leaf or a labelled category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarItem {
    Doc(String),
    Category {
        label: String,
        #[serde(default)]
        items: Vec<SidebarItem>,
        /// Overrides the site-wide collapsed default for this category
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collapsed: Option<bool>,
    },
}

impl SidebarItem {
    fn collect_doc_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Doc(id) => out.push(id),
            Self::Category { items, .. } => {
                for item in items {
                    item.collect_doc_ids(out);
                }
            }
        }
    }
}

impl SidebarTree {
    /// Parse a sidebar from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// All document ids, depth first, in authored order.
    pub fn doc_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for item in &self.items {
            item.collect_doc_ids(&mut out);
        }
        out
    }

    /// Labels of the top-level categories, in authored order.
    pub fn categories(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                SidebarItem::Category { label, .. } => Some(label.as_str()),
                SidebarItem::Doc(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.doc_ids().contains(&doc_id)
    }

    /// Previous and next documents around `doc_id` in reading order.
    pub fn neighbours(&self, doc_id: &str) -> (Option<&str>, Option<&str>) {
        let ids = self.doc_ids();
        let Some(pos) = ids.iter().position(|id| *id == doc_id) else {
            return (None, None);
        };

        let prev = pos.checked_sub(1).map(|i| ids[i]);
        let next = ids.get(pos + 1).copied();
        (prev, next)
    }

    /// Move a top-level item to a new position, shifting the rest.
    ///
    /// Returns false when either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIDEBAR: &str = r#"
items = [
  "introduction",
  { type = "category", label = "Guides", items = ["guides/introduction", "guides/installation"] },
  { type = "category", label = "Concepts", items = ["concepts/overview", "concepts/recipe"], collapsed = true },
]
"#;

    #[test]
    fn parses_mixed_leaves_and_categories() {
        let tree = SidebarTree::from_toml(SIDEBAR).unwrap();

        assert_eq!(tree.items.len(), 3);
        assert_eq!(tree.items[0], SidebarItem::Doc("introduction".to_string()));
        assert!(matches!(
            &tree.items[2],
            SidebarItem::Category { collapsed: Some(true), .. }
        ));
    }

    #[test]
    fn flattens_in_authored_order() {
        let tree = SidebarTree::from_toml(SIDEBAR).unwrap();

        assert_eq!(
            tree.doc_ids(),
            vec![
                "introduction",
                "guides/introduction",
                "guides/installation",
                "concepts/overview",
                "concepts/recipe",
            ]
        );
        assert_eq!(tree.categories(), vec!["Guides", "Concepts"]);
    }

    #[test]
    fn finds_neighbours_across_categories() {
        let tree = SidebarTree::from_toml(SIDEBAR).unwrap();

        assert_eq!(tree.neighbours("introduction"), (None, Some("guides/introduction")));
        assert_eq!(
            tree.neighbours("guides/installation"),
            (Some("guides/introduction"), Some("concepts/overview"))
        );
        assert_eq!(tree.neighbours("concepts/recipe"), (Some("concepts/overview"), None));
        assert_eq!(tree.neighbours("missing"), (None, None));
    }

    #[test]
    fn reorders_top_level_items() {
        let mut tree = SidebarTree::from_toml(SIDEBAR).unwrap();

        assert!(tree.move_item(2, 1));
        assert_eq!(tree.categories(), vec!["Concepts", "Guides"]);
        assert!(!tree.move_item(0, 3));
    }
}
