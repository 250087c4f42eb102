//! Plan mutations
//!
//! Every operation takes the current document by reference and hands back
//! a new one; the caller's value is never touched. Targets are resolved
//! with exact substring lookup only (see [`crate::query::locate_item`]).
//!
//! `remove_item` and `rename_item` treat a missing target as a no-op so a
//! caller can safely re-issue the same edit.

use crate::document::{
    normalize_text, ChecklistItem, Document, LineEnding, Phase, PhaseLine, TrailingSection,
};
use crate::error::{PlanError, Result};
use crate::parser::section_heading;
use crate::query::{locate_item, resolve_phase, ItemLocation, PhaseTarget};
use crate::serializer::serialize;

/// An edited document plus what the edit touched
#[derive(Debug, Clone, PartialEq)]
pub struct Edit<T> {
    pub document: Document,
    pub outcome: T,
}

impl<T> Edit<T> {
    fn new(document: Document, outcome: T) -> Self {
        Self { document, outcome }
    }
}

/// Result of a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    /// Item text as it was before the edit
    pub text: String,
    /// Phase index holding the item
    pub phase: usize,
    pub was_checked: bool,
}

fn item_at(doc: &mut Document, at: ItemLocation) -> Option<&mut ChecklistItem> {
    match doc.phases.get_mut(at.phase)?.lines.get_mut(at.line)? {
        PhaseLine::Item(item) => Some(item),
        PhaseLine::Text(_) => None,
    }
}

fn single_line(text: &str) -> Result<&str> {
    if text.contains(['\n', '\r']) {
        return Err(PlanError::MultiLine {
            text: text.to_string(),
        });
    }
    Ok(text)
}

fn require_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PlanError::EmptyText);
    }
    single_line(trimmed)
}

/// Keep the layout flags true to the text an edit leaves behind. Without
/// a final newline the last line cannot be blank, and a single line has
/// no line ending to remember.
fn settle_layout(mut doc: Document) -> Document {
    if !doc.trailing_newline {
        let text = serialize(&doc);
        if text.is_empty() || text.ends_with('\n') {
            doc.trailing_newline = true;
        }
    }
    if !serialize(&doc).contains('\n') {
        doc.line_ending = LineEnding::Lf;
    }
    doc
}

/// Set the checked state of the first item containing `query`
pub fn toggle_item(doc: &Document, query: &str, checked: bool) -> Result<Edit<Toggled>> {
    let location = locate_item(doc, query).ok_or_else(|| PlanError::NotFound {
        query: query.to_string(),
    })?;

    let mut next = doc.clone();
    let item = item_at(&mut next, location).ok_or_else(|| PlanError::NotFound {
        query: query.to_string(),
    })?;

    let toggled = Toggled {
        text: item.text.clone(),
        phase: location.phase,
        was_checked: item.checked,
    };
    item.checked = checked;

    tracing::info!(
        item = %toggled.text,
        "{} plan item",
        if checked { "Checked" } else { "Unchecked" }
    );
    Ok(Edit::new(next, toggled))
}

/// Existing item whose normalized text equals the candidate's, if any
pub fn find_duplicate<'a>(doc: &'a Document, candidate: &str) -> Option<&'a ChecklistItem> {
    let wanted = normalize_text(candidate);
    doc.items().find(|item| normalize_text(&item.text) == wanted)
}

/// Message naming the existing item when `candidate` would duplicate it.
///
/// Comparison ignores case, surrounding whitespace and the width of
/// internal whitespace runs; checked state does not matter. No fuzzy
/// threshold is involved.
pub fn validate_no_duplicate(doc: &Document, candidate: &str) -> Option<String> {
    find_duplicate(doc, candidate).map(|item| {
        PlanError::Duplicate {
            existing: item.text.clone(),
        }
        .to_string()
    })
}

/// Append an unchecked item to the phase matching `phase_query`.
///
/// An empty or unmatched query targets the last phase.
pub fn add_item(doc: &Document, phase_query: &str, text: &str) -> Result<Edit<PhaseTarget>> {
    let text = require_text(text)?;

    if let Some(existing) = find_duplicate(doc, text) {
        return Err(PlanError::Duplicate {
            existing: existing.text.clone(),
        });
    }

    let target = resolve_phase(doc, phase_query).ok_or(PlanError::NoPhase)?;

    let mut next = doc.clone();
    let phase = &mut next.phases[target.index()];
    phase.push_item(ChecklistItem::unchecked(text));

    tracing::info!(item = text, phase = %phase.name, "Added item");
    Ok(Edit::new(next, target))
}

/// Remove the first item containing `query`; unchanged if none does
pub fn remove_item(doc: &Document, query: &str) -> Edit<Option<ChecklistItem>> {
    let mut next = doc.clone();
    let removed = locate_item(doc, query).and_then(|at| {
        match next.phases[at.phase].lines.remove(at.line) {
            PhaseLine::Item(item) => Some(item),
            PhaseLine::Text(_) => None,
        }
    });

    match &removed {
        Some(item) => tracing::info!(item = %item.text, "Removed item"),
        None => tracing::debug!(query, "nothing to remove"),
    }
    Edit::new(settle_layout(next), removed)
}

/// Rename the first item containing `query`, keeping its checked state.
///
/// Returns the previous text, or `None` (document unchanged) when nothing
/// matched. Duplicate validation is left to the caller.
pub fn rename_item(doc: &Document, query: &str, new_text: &str) -> Result<Edit<Option<String>>> {
    let new_text = require_text(new_text)?;

    let mut next = doc.clone();
    let previous = match locate_item(doc, query) {
        Some(at) => item_at(&mut next, at)
            .map(|item| std::mem::replace(&mut item.text, new_text.to_string())),
        None => None,
    };

    match &previous {
        Some(old) => tracing::info!(from = %old, to = new_text, "Renamed item"),
        None => tracing::debug!(query, "nothing to rename"),
    }
    Ok(Edit::new(next, previous))
}

/// Append a phase after the existing ones (before the trailing sections).
///
/// Phase names need not be unique. Blank initial items are skipped. A
/// blank line separates the new phase from the one before it, and from
/// the trailing sections when there are any.
pub fn add_phase<S: AsRef<str>>(doc: &Document, name: &str, items: &[S]) -> Result<Document> {
    let name = require_text(name)?;
    let items = items
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.trim().is_empty())
        .map(require_text)
        .collect::<Result<Vec<&str>>>()?;

    let mut next = doc.clone();
    if let Some(previous) = next.phases.last_mut() {
        if !previous.ends_with_blank_line() {
            previous.lines.push(PhaseLine::Text(String::new()));
        }
    }
    let mut phase = Phase::with_items(name, &items);
    if !next.trailing_sections.is_empty() {
        phase.lines.push(PhaseLine::Text(String::new()));
    }
    next.phases.push(phase);

    tracing::info!(phase = name, items = items.len(), "Added phase");
    Ok(next)
}

/// Append `note` as a line of the trailing section named exactly
/// `section`, creating that section at the end if needed.
///
/// Trailing sections only exist after the phases, so a plan without
/// phases is refused with [`PlanError::NoPhase`]. The note must be a
/// single line that does not itself read as a `## ` heading.
pub fn add_note(doc: &Document, note: &str, section: &str) -> Result<Document> {
    let section = require_text(section)?;
    let note = single_line(note)?;
    if section_heading(note).is_some() {
        return Err(PlanError::HeadingNote {
            text: note.to_string(),
        });
    }
    if doc.phases.is_empty() {
        return Err(PlanError::NoPhase);
    }

    let mut next = doc.clone();
    let index = match next.trailing_sections.iter().position(|s| s.name == section) {
        Some(i) => i,
        None => {
            next.trailing_sections.push(TrailingSection::new(section));
            next.trailing_sections.len() - 1
        }
    };
    next.trailing_sections[index].push_line(note);

    tracing::info!(section, "Added note");
    Ok(settle_layout(next))
}
