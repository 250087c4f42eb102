//! Plan text parser
//!
//! Total over arbitrary input: anything that is not a phase heading, a
//! section heading or a well-formed checkbox line is kept as opaque text.

use crate::document::{ChecklistItem, Document, LineEnding, Phase, PhaseLine, TrailingSection};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PHASE_RE: Regex = Regex::new(r"^###\s+(.*?)\s*$").unwrap();
    static ref SECTION_RE: Regex = Regex::new(r"^##\s+(.*?)\s*$").unwrap();
    static ref CHECKBOX_RE: Regex = Regex::new(r"^\s*-\s*\[([ xX])\](?:\s+(.*?))?\s*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Preamble,
    Phases,
    Trailing,
}

/// Phase name if `line` is a `### <name>` heading
pub fn phase_heading(line: &str) -> Option<&str> {
    PHASE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Section name if `line` is a `## <name>` heading
pub fn section_heading(line: &str) -> Option<&str> {
    SECTION_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a checkbox line; `- [y]` and friends are not checkboxes
pub fn checklist_item(line: &str) -> Option<ChecklistItem> {
    let caps = CHECKBOX_RE.captures(line)?;
    let checked = caps
        .get(1)
        .map(|m| m.as_str().eq_ignore_ascii_case("x"))
        .unwrap_or(false);
    let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some(ChecklistItem::new(text, checked))
}

/// Parse plan text into a [`Document`]. Never fails.
///
/// Text containing `\r\n` is read as CRLF: the `\r` is stripped from
/// every line and the document serializes back with CRLF throughout.
pub fn parse(text: &str) -> Document {
    let line_ending = LineEnding::detect(text);
    let mut doc = Document {
        trailing_newline: text.is_empty() || text.ends_with('\n'),
        line_ending,
        ..Document::default()
    };

    if text.is_empty() {
        return doc;
    }

    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut region = Region::Preamble;

    for line in body.split('\n') {
        let line = match line_ending {
            LineEnding::Crlf => line.strip_suffix('\r').unwrap_or(line),
            LineEnding::Lf => line,
        };
        match region {
            Region::Preamble => {
                if let Some(name) = phase_heading(line) {
                    doc.phases.push(Phase::new(name));
                    region = Region::Phases;
                } else {
                    doc.preamble.push_str(line);
                    doc.preamble.push('\n');
                }
            }
            Region::Phases => {
                if let Some(name) = phase_heading(line) {
                    doc.phases.push(Phase::new(name));
                } else if let Some(name) = section_heading(line) {
                    doc.trailing_sections.push(TrailingSection::new(name));
                    region = Region::Trailing;
                } else if let Some(phase) = doc.phases.last_mut() {
                    let entry = match checklist_item(line) {
                        Some(item) => PhaseLine::Item(item),
                        None => PhaseLine::Text(line.to_string()),
                    };
                    phase.lines.push(entry);
                }
            }
            Region::Trailing => {
                if let Some(name) = section_heading(line) {
                    doc.trailing_sections.push(TrailingSection::new(name));
                } else if let Some(section) = doc.trailing_sections.last_mut() {
                    section.body.push_str(line);
                    section.body.push('\n');
                }
            }
        }
    }

    tracing::debug!(
        phases = doc.phases.len(),
        sections = doc.trailing_sections.len(),
        "parsed plan"
    );

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PLAN: &str = r#"# PLAN: Add caching

## Objective
Speed up lookups.

## Implementation Steps

### Phase 1: Research & Design
- [x] Read existing code
- [ ] Write design doc

### Phase 2: Implementation
- [ ] Write test file(s)
- [X] Implement functionality

## Files to Change
- src/cache.rs

## Notes
"#;

    #[test]
    fn test_parse_preamble_and_phases() {
        let doc = parse(SAMPLE_PLAN);

        assert!(doc.preamble.starts_with("# PLAN: Add caching\n"));
        assert!(doc.preamble.ends_with("## Implementation Steps\n\n"));
        assert_eq!(
            doc.phase_names(),
            vec!["Phase 1: Research & Design", "Phase 2: Implementation"]
        );

        let first: Vec<&ChecklistItem> = doc.phases[0].items().collect();
        assert_eq!(first.len(), 2);
        assert!(first[0].checked);
        assert!(!first[1].checked);
        assert_eq!(first[1].text, "Write design doc");

        // uppercase X counts as checked
        let second: Vec<&ChecklistItem> = doc.phases[1].items().collect();
        assert!(second[1].checked);
    }

    #[test]
    fn test_parse_trailing_sections() {
        let doc = parse(SAMPLE_PLAN);

        assert_eq!(doc.trailing_sections.len(), 2);
        assert_eq!(doc.trailing_sections[0].name, "Files to Change");
        assert_eq!(doc.trailing_sections[0].body, "- src/cache.rs\n\n");
        assert_eq!(doc.trailing_sections[1].name, "Notes");
        assert_eq!(doc.trailing_sections[1].body, "");
    }

    #[test]
    fn test_checkboxes_in_trailing_sections_are_opaque() {
        let doc = parse("### P\n- [ ] A\n## Risks\n- [ ] not an item\n");
        assert_eq!(doc.items().count(), 1);
        assert_eq!(doc.trailing_sections[0].body, "- [ ] not an item\n");
    }

    #[test]
    fn test_malformed_checkbox_is_text() {
        let doc = parse("### P\n- [y] maybe\n- [x]glued\n- [ ] fine\n");
        let phase = &doc.phases[0];
        assert_eq!(phase.item_count(), 1);
        assert_eq!(phase.lines[0], PhaseLine::Text("- [y] maybe".to_string()));
        assert_eq!(phase.lines[1], PhaseLine::Text("- [x]glued".to_string()));
    }

    #[test]
    fn test_indented_checkbox_is_item() {
        let item = checklist_item("    -  [ ]   spaced out  ").unwrap();
        assert_eq!(item.text, "spaced out");
        assert!(!item.checked);
    }

    #[test]
    fn test_empty_checkbox_text() {
        let item = checklist_item("- [x]").unwrap();
        assert_eq!(item.text, "");
        assert!(item.checked);
    }

    #[test]
    fn test_heading_levels_are_distinct() {
        assert_eq!(phase_heading("### Phase 1"), Some("Phase 1"));
        assert_eq!(phase_heading("#### Detail"), None);
        assert_eq!(phase_heading("## Notes"), None);
        assert_eq!(section_heading("## Notes"), Some("Notes"));
        assert_eq!(section_heading("### Phase 1"), None);
        assert_eq!(section_heading("# Title"), None);
    }

    #[test]
    fn test_parse_empty_and_plain_text() {
        let doc = parse("");
        assert!(doc.phases.is_empty());
        assert!(doc.preamble.is_empty());

        let doc = parse("just some words");
        assert_eq!(doc.preamble, "just some words\n");
        assert!(!doc.trailing_newline);
    }

    #[test]
    fn test_checkboxes_before_first_phase_stay_in_preamble() {
        let doc = parse("- [ ] loose\n### P\n- [ ] A\n");
        assert_eq!(doc.preamble, "- [ ] loose\n");
        assert_eq!(doc.items().count(), 1);
    }

    #[test]
    fn test_crlf_lines_lose_carriage_return() {
        let doc = parse("# Title\r\n### P\r\nplain words\r\n- [ ] A\r\n## Notes\r\nkeep\r\n");
        assert_eq!(doc.line_ending, LineEnding::Crlf);
        assert_eq!(doc.preamble, "# Title\n");
        assert_eq!(doc.phases[0].lines[0], PhaseLine::Text("plain words".to_string()));
        assert_eq!(doc.items().next().unwrap().text, "A");
        assert_eq!(doc.section("Notes").unwrap().body, "keep\n");

        assert_eq!(parse("### P\n- [ ] A\n").line_ending, LineEnding::Lf);
    }
}
