//! Extraction of derived record fields from document text and metadata.
//!
//! The host supplies structured metadata (`DocMetadata`) alongside the raw
//! text; extraction normalizes both into the derived fields of a
//! `DocumentRecord`. Reference resolution is delegated to the caller via a
//! closure so the extractor stays independent of the document store.

pub mod markdown;

use crate::domain::{CodeBlockTally, Heading, TaskEntry};
use std::collections::{BTreeMap, HashSet};

pub use markdown::derive_metadata;

/// Section kind used for fenced code blocks.
pub const CODE_SECTION: &str = "code";

/// A list item as reported by the host's metadata layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// 1-based source line of the item.
    pub line: usize,
    /// Checkbox marker character, if the item is a checkbox.
    pub task: Option<char>,
}

/// A typed block of the document as reported by the host's metadata layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section kind, e.g. `code`.
    pub kind: String,
    /// 1-based source line where the section starts.
    pub line: usize,
}

/// Structured per-document metadata supplied by the host.
///
/// Every field is optional in spirit: an absent source is an empty one, and
/// extraction never fails because metadata is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocMetadata {
    /// Frontmatter key/value mapping.
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    /// Inline tag text, each with its leading `#` marker.
    pub tags: Vec<String>,
    /// Raw outgoing link references, unresolved.
    pub links: Vec<String>,
    /// Raw embed references, unresolved.
    pub embeds: Vec<String>,
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// List items in document order.
    pub list_items: Vec<ListItem>,
    /// Typed sections in document order.
    pub sections: Vec<Section>,
}

/// The derived fields of a `DocumentRecord` produced by extraction.
///
/// Path, basename, extension, size and timestamps come from file-system
/// attributes and are supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub tags: Vec<String>,
    pub outlinks: Vec<String>,
    pub embeds: Vec<String>,
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    pub headings: Vec<Heading>,
    pub tasks: Vec<TaskEntry>,
    pub code_blocks: Vec<CodeBlockTally>,
}

/// Extracts the derived record fields for one document.
///
/// `resolve` maps a raw link or embed reference to a concrete vault-relative
/// path; references that do not resolve are dropped, not recorded as broken.
/// The raw text is consulted only when the metadata carries checkbox items
/// or code sections.
pub fn extract<R>(meta: &DocMetadata, content: &str, resolve: R) -> ExtractedFields
where
    R: Fn(&str) -> Option<String>,
{
    let tags = collect_tags(meta);
    let outlinks = meta.links.iter().filter_map(|r| resolve(r)).collect();
    let embeds = meta.embeds.iter().filter_map(|r| resolve(r)).collect();

    let needs_text = meta.list_items.iter().any(|i| i.task.is_some())
        || meta.sections.iter().any(|s| s.kind == CODE_SECTION);
    let lines: Vec<&str> = if needs_text {
        content.lines().collect()
    } else {
        Vec::new()
    };

    ExtractedFields {
        tags,
        outlinks,
        embeds,
        frontmatter: meta.frontmatter.clone(),
        headings: meta.headings.clone(),
        tasks: collect_tasks(meta, &lines),
        code_blocks: collect_code_blocks(meta, &lines),
    }
}

/// Deduplicated union of inline tags and frontmatter tags, insertion order.
fn collect_tags(meta: &DocMetadata) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    let mut push = |tag: &str| {
        let tag = tag.strip_prefix('#').unwrap_or(tag).trim();
        if !tag.is_empty() && seen.insert(tag.to_string()) {
            tags.push(tag.to_string());
        }
    };

    for tag in &meta.tags {
        push(tag);
    }
    // Frontmatter tags may be a single string or a list of strings.
    if let Some(value) = meta.frontmatter.get("tags") {
        match value {
            serde_json::Value::String(s) => push(s),
            serde_json::Value::Array(items) => {
                for item in items {
                    if let serde_json::Value::String(s) = item {
                        push(s);
                    }
                }
            }
            _ => {}
        }
    }

    tags
}

fn collect_tasks(meta: &DocMetadata, lines: &[&str]) -> Vec<TaskEntry> {
    meta.list_items
        .iter()
        .filter_map(|item| {
            let marker = item.task?;
            let line = lines.get(item.line.saturating_sub(1)).copied().unwrap_or("");
            let text = checkbox_text(line)
                .unwrap_or_else(|| line.trim())
                .to_string();
            Some(TaskEntry {
                text,
                completed: marker != ' ',
                line: item.line,
            })
        })
        .collect()
}

/// Returns the content following a `- [<marker>] ` checkbox pattern, if the
/// line matches one.
fn checkbox_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))?
        .trim_start();

    let mut chars = rest.chars();
    if chars.next()? != '[' {
        return None;
    }
    chars.next()?;
    if chars.next()? != ']' {
        return None;
    }
    let after = chars.as_str();
    Some(after.strip_prefix(' ').unwrap_or(after))
}

fn collect_code_blocks(meta: &DocMetadata, lines: &[&str]) -> Vec<CodeBlockTally> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for section in &meta.sections {
        if section.kind != CODE_SECTION {
            continue;
        }
        let first_line = lines.get(section.line.saturating_sub(1)).copied().unwrap_or("");
        *counts.entry(fence_language(first_line)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(language, count)| CodeBlockTally { language, count })
        .collect()
}

/// Parses the language token from an opening fence line.
fn fence_language(line: &str) -> String {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("```")
        .or_else(|| trimmed.strip_prefix("~~~"))
        .unwrap_or("");
    let token = rest
        .trim_start_matches(['`', '~'])
        .split_whitespace()
        .next()
        .unwrap_or("");

    if token.is_empty() {
        "unknown".to_string()
    } else {
        token.to_string()
    }
}
