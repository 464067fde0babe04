//! Code fence info strings: language and title hints.

/// Language of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Go,
    Yaml,
    Json,
    Toml,
    Bash,
    Sql,
    Protobuf,
    JavaScript,
    TypeScript,
    Html,
    Css,
    Text,
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "go" | "golang" => Self::Go,
            "yaml" | "yml" => Self::Yaml,
            "json" => Self::Json,
            "toml" => Self::Toml,
            "bash" | "sh" | "shell" | "console" => Self::Bash,
            "sql" => Self::Sql,
            "proto" | "protobuf" => Self::Protobuf,
            "js" | "javascript" | "jsx" => Self::JavaScript,
            "ts" | "typescript" | "tsx" => Self::TypeScript,
            "html" => Self::Html,
            "css" => Self::Css,
            "text" | "txt" | "plain" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Highlighter class suffix, used as `language-{name}`.
    ///
    /// Aliases collapse to one name, so `yml` and `yaml` fences share a class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Bash => "bash",
            Self::Sql => "sql",
            Self::Protobuf => "protobuf",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Html => "html",
            Self::Css => "css",
            Self::Text | Self::Unknown => "text",
        }
    }
}

/// Extract a title from a code fence info string if present.
///
/// Supports `yaml title="recipe.yml"` and `yaml title=recipe.yml`.
pub fn extract_title(info: &str) -> Option<String> {
    let start = info.find("title=")?;
    let rest = &info[start + 6..];

    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(quoted[..end].to_string()).filter(|t| !t.is_empty());
    }

    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(rest[..end].to_string()).filter(|t| !t.is_empty())
}
