//! Plan text serializer

use crate::document::{ChecklistItem, Document, LineEnding, Phase, PhaseLine};

/// Render one checkbox line; checked state is always a lowercase `x`
pub fn checklist_line(item: &ChecklistItem) -> String {
    let checkbox = if item.checked { "[x]" } else { "[ ]" };
    if item.text.is_empty() {
        format!("- {}", checkbox)
    } else {
        format!("- {} {}", checkbox, item.text)
    }
}

/// Render a phase heading and its body, newline-terminated
pub fn phase_block(phase: &Phase) -> String {
    let mut out = format!("### {}\n", phase.name);
    for line in &phase.lines {
        match line {
            PhaseLine::Item(item) => out.push_str(&checklist_line(item)),
            PhaseLine::Text(text) => out.push_str(text),
        }
        out.push('\n');
    }
    out
}

/// Serialize a [`Document`] back to plan text
pub fn serialize(doc: &Document) -> String {
    let mut out = doc.preamble.clone();

    for phase in &doc.phases {
        ensure_line_break(&mut out);
        out.push_str(&phase_block(phase));
    }

    for section in &doc.trailing_sections {
        ensure_line_break(&mut out);
        out.push_str("## ");
        out.push_str(&section.name);
        out.push('\n');
        out.push_str(&section.body);
    }

    if !doc.trailing_newline && out.ends_with('\n') {
        out.pop();
    }

    match doc.line_ending {
        LineEnding::Lf => out,
        LineEnding::Crlf => out.replace('\n', LineEnding::Crlf.as_str()),
    }
}

fn ensure_line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
