//! Component metadata headers
//!
//! Markdown components (commands, agents) carry YAML frontmatter between
//! `---` delimiters. Shell hooks carry a leading `# key: value` comment
//! block after the shebang. Both parse into the same [`MetadataHeader`];
//! parsing is strict parse-or-skip, so a partially parsed header never
//! reaches the catalog.

use serde::Deserialize;

/// Raw metadata header shared by all component file formats
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetadataHeader {
    /// Defaults to the file stem when omitted
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub optional_dependencies: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub enabled: Option<bool>,
    #[serde(default)]
    pub recommended: bool,
    /// Hook components only: host event the hook binds to
    pub event: Option<String>,
    /// Hook components only: matcher expression (`*` when omitted)
    pub matcher: Option<String>,
}

/// Split markdown content into YAML frontmatter and body
///
/// Returns `None` when the `---` delimiters are missing or the frontmatter
/// is not a mapping.
pub fn parse_frontmatter(content: &str) -> Option<(MetadataHeader, String)> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 3 || lines[0].trim() != "---" {
        return None;
    }
    let end_idx = lines[1..].iter().position(|l| l.trim() == "---")?;
    let end_idx = end_idx + 1;
    let frontmatter_str = lines[1..end_idx].join("\n");
    let body = lines[end_idx + 1..].join("\n");
    let header: MetadataHeader = serde_yaml::from_str(&frontmatter_str).ok()?;
    Some((header, body))
}

/// Parse the leading comment header of a shell hook
///
/// The header is the contiguous run of `# key: value` lines immediately
/// after the optional shebang. Returns `None` when no key/value lines are
/// found before the first non-comment line.
pub fn parse_shell_header(content: &str) -> Option<MetadataHeader> {
    let mut header = MetadataHeader::default();
    let mut found_any = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("#!") {
            continue;
        }
        if trimmed.is_empty() && !found_any {
            continue;
        }
        let Some(comment) = trimmed.strip_prefix('#') else {
            break;
        };
        let Some((key, value)) = comment.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "id" => header.id = Some(value.to_string()),
            "name" => header.name = Some(value.to_string()),
            "description" => header.description = Some(value.to_string()),
            "category" => header.category = Some(value.to_string()),
            "dependencies" => header.dependencies = parse_list(value),
            "optional-dependencies" => header.optional_dependencies = parse_list(value),
            "platforms" => header.platforms = parse_list(value),
            "enabled" => header.enabled = value.parse().ok(),
            "recommended" => header.recommended = value.parse().unwrap_or(false),
            "event" => header.event = Some(value.to_string()),
            "matcher" => header.matcher = Some(value.to_string()),
            _ => continue,
        }
        found_any = true;
    }

    if found_any { Some(header) } else { None }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
