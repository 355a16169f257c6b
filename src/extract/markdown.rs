//! Derivation of `DocMetadata` from raw markdown.
//!
//! The scan is line-based and lenient: malformed frontmatter or stray
//! syntax degrades to empty metadata for that source, never to an error.

use crate::domain::Heading;
use crate::extract::{CODE_SECTION, DocMetadata, ListItem, Section};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Line patterns, compiled once for the process; derivation runs once per
/// document per rebuild.
struct Patterns {
    inline_tag: Regex,
    wikilink: Regex,
    heading: Regex,
    list_item: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        inline_tag: Regex::new(r"(^|[\s(])#([A-Za-z][\w/-]*)").unwrap(),
        wikilink: Regex::new(r"(!)?\[\[([^\[\]]+)\]\]").unwrap(),
        heading: Regex::new(r"^(#{1,6})\s+(.+?)\s*$").unwrap(),
        list_item: Regex::new(r"^\s*[-*+]\s+(?:\[(.)\]\s)?").unwrap(),
    })
}

/// Derives structured metadata from raw markdown content.
pub fn derive_metadata(content: &str) -> DocMetadata {
    let patterns = patterns();

    let mut meta = DocMetadata::default();
    let lines: Vec<&str> = content.lines().collect();

    let frontmatter_end = parse_frontmatter(&lines, &mut meta.frontmatter);

    let mut in_code = false;
    for (i, line) in lines.iter().enumerate().skip(frontmatter_end) {
        let number = i + 1;

        if is_fence(line) {
            if !in_code {
                meta.sections.push(Section {
                    kind: CODE_SECTION.into(),
                    line: number,
                });
            }
            in_code = !in_code;
            continue;
        }
        if in_code {
            continue;
        }

        if let Some(caps) = patterns.heading.captures(line) {
            meta.headings.push(Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            });
            continue;
        }

        if let Some(caps) = patterns.list_item.captures(line) {
            meta.list_items.push(ListItem {
                line: number,
                task: caps.get(1).and_then(|m| m.as_str().chars().next()),
            });
        }

        for caps in patterns.inline_tag.captures_iter(line) {
            meta.tags.push(format!("#{}", &caps[2]));
        }

        for caps in patterns.wikilink.captures_iter(line) {
            let target = link_target(&caps[2]);
            if target.is_empty() {
                continue;
            }
            if caps.get(1).is_some() {
                meta.embeds.push(target);
            } else {
                meta.links.push(target);
            }
        }
    }

    meta
}

/// Parses a leading YAML frontmatter block into `out`.
///
/// Returns the number of lines consumed (0 when there is no block). A block
/// that fails to parse as a YAML mapping is skipped but still consumed.
fn parse_frontmatter(
    lines: &[&str],
    out: &mut BTreeMap<String, serde_json::Value>,
) -> usize {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return 0;
    }
    let Some(close) = lines[1..].iter().position(|l| l.trim_end() == "---") else {
        return 0;
    };
    let yaml = lines[1..=close].join("\n");
    let end = close + 2;

    let Ok(serde_yaml::Value::Mapping(mapping)) = serde_yaml::from_str(&yaml) else {
        return end;
    };
    for (key, value) in mapping {
        let Some(key) = key.as_str() else { continue };
        if let Ok(value) = serde_json::to_value(&value) {
            out.insert(key.to_string(), value);
        }
    }

    end
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Strips alias and heading fragments from a wikilink target.
fn link_target(raw: &str) -> String {
    let target = raw.split('|').next().unwrap_or(raw);
    let target = target.split('#').next().unwrap_or(target);
    target.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_frontmatter_mapping() {
        let meta = derive_metadata("---\ntitle: Alpha\ntags:\n  - draft\n---\nbody\n");

        assert_eq!(meta.frontmatter["title"], serde_json::json!("Alpha"));
        assert_eq!(meta.frontmatter["tags"], serde_json::json!(["draft"]));
    }

    #[test]
    fn malformed_frontmatter_degrades_to_empty() {
        let meta = derive_metadata("---\n: [ not yaml\n---\nbody #tag\n");

        assert!(meta.frontmatter.is_empty());
        assert_eq!(meta.tags, vec!["#tag"]);
    }

    #[test]
    fn collects_inline_tags_with_marker() {
        let meta = derive_metadata("Some #rust notes, also #deep/nested\n");
        assert_eq!(meta.tags, vec!["#rust", "#deep/nested"]);
    }

    #[test]
    fn heading_markers_are_not_tags() {
        let meta = derive_metadata("# Title\n## Sub section\n");
        assert!(meta.tags.is_empty());
        assert_eq!(
            meta.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Title".into(),
                },
                Heading {
                    level: 2,
                    text: "Sub section".into(),
                },
            ]
        );
    }

    #[test]
    fn separates_links_from_embeds() {
        let meta = derive_metadata("See [[Other Note]] and ![[image.png]]\n");

        assert_eq!(meta.links, vec!["Other Note"]);
        assert_eq!(meta.embeds, vec!["image.png"]);
    }

    #[test]
    fn strips_alias_and_heading_from_link_targets() {
        let meta = derive_metadata("[[Target|shown text]] [[Other#Section]]\n");
        assert_eq!(meta.links, vec!["Target", "Other"]);
    }

    #[test]
    fn records_checkbox_and_plain_list_items() {
        let meta = derive_metadata("- [ ] open\n- [x] done\n- plain\n");

        assert_eq!(
            meta.list_items,
            vec![
                ListItem {
                    line: 1,
                    task: Some(' '),
                },
                ListItem {
                    line: 2,
                    task: Some('x'),
                },
                ListItem { line: 3, task: None },
            ]
        );
    }

    #[test]
    fn fenced_code_becomes_a_code_section() {
        let meta = derive_metadata("text\n```rust\nlet x = 1; // #not-a-tag\n```\nafter\n");

        assert_eq!(
            meta.sections,
            vec![Section {
                kind: CODE_SECTION.into(),
                line: 2,
            }]
        );
        assert!(meta.tags.is_empty(), "tags inside code blocks are ignored");
    }

    #[test]
    fn frontmatter_lines_are_not_scanned_for_tags() {
        let meta = derive_metadata("---\ntitle: has #hash\n---\nbody\n");
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn line_numbers_account_for_frontmatter() {
        let meta = derive_metadata("---\ntitle: x\n---\n- [ ] task\n");
        assert_eq!(meta.list_items[0].line, 4);
    }

    #[test]
    fn derivation_is_independent_across_documents() {
        // Patterns are shared process-wide; state must not leak between
        // consecutive derivations.
        let first = derive_metadata("#one [[A]]\n");
        let second = derive_metadata("#two ![[b.png]]\n");

        assert_eq!(first.tags, vec!["#one"]);
        assert_eq!(first.links, vec!["A"]);
        assert_eq!(second.tags, vec!["#two"]);
        assert_eq!(second.embeds, vec!["b.png"]);
        assert!(second.links.is_empty());
    }
}
