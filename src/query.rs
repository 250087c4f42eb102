//! Queries and reports over a plan
//!
//! Two matching policies live here and are kept apart on purpose:
//! exact case-insensitive substring lookup, which is what every mutation
//! resolves its target with, and ranked fuzzy search, which only ever
//! produces suggestions.

use crate::document::{collapse_whitespace, Document, PhaseLine};
use crate::serializer::phase_block;
use crate::similarity::rank_indices;
use serde::Serialize;

/// Position of a checklist item: phase index and line index inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLocation {
    pub phase: usize,
    pub line: usize,
}

/// Phase chosen for a new item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTarget {
    /// First phase whose name contains the query
    Matched(usize),
    /// No query given, or nothing matched: the last phase
    LastPhase(usize),
}

impl PhaseTarget {
    pub fn index(self) -> usize {
        match self {
            PhaseTarget::Matched(i) | PhaseTarget::LastPhase(i) => i,
        }
    }
}

/// First item, in document order, whose text contains `query`
/// (case-insensitive). No fuzzy fallback.
///
/// A blank query names no item.
pub fn locate_item(doc: &Document, query: &str) -> Option<ItemLocation> {
    if query.trim().is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    for (phase_idx, phase) in doc.phases.iter().enumerate() {
        for (line_idx, line) in phase.lines.iter().enumerate() {
            if let PhaseLine::Item(item) = line {
                if item.text.to_lowercase().contains(&needle) {
                    return Some(ItemLocation {
                        phase: phase_idx,
                        line: line_idx,
                    });
                }
            }
        }
    }
    None
}

/// First phase whose name contains `query` (case-insensitive)
pub fn find_phase(doc: &Document, query: &str) -> Option<usize> {
    let needle = query.to_lowercase();
    doc.phases
        .iter()
        .position(|p| p.name.to_lowercase().contains(&needle))
}

/// Pick the phase a new item goes into; `None` only when there are no phases
pub fn resolve_phase(doc: &Document, query: &str) -> Option<PhaseTarget> {
    let last = doc.phases.len().checked_sub(1)?;
    let query = query.trim();
    if query.is_empty() {
        return Some(PhaseTarget::LastPhase(last));
    }
    match find_phase(doc, query) {
        Some(i) => Some(PhaseTarget::Matched(i)),
        None => {
            tracing::debug!(query, "no phase matched, using last phase");
            Some(PhaseTarget::LastPhase(last))
        }
    }
}

/// Items ranked by similarity to `query`, best first, for "did you mean".
///
/// Whitespace runs are collapsed on both sides before scoring; the
/// returned text is the item text as written.
pub fn find_similar_items<'a>(
    doc: &'a Document,
    query: &str,
    threshold: f64,
) -> Vec<(&'a str, f64)> {
    let texts: Vec<&'a str> = doc.items().map(|item| item.text.as_str()).collect();
    let collapsed: Vec<String> = texts.iter().map(|t| collapse_whitespace(t)).collect();

    rank_indices(&collapse_whitespace(query), &collapsed, threshold)
        .into_iter()
        .map(|(i, score)| (texts[i], score))
        .collect()
}

/// Checked/total for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub name: String,
    pub checked: usize,
    pub total: usize,
}

/// Checked/total for the whole plan plus a per-phase breakdown in
/// document order (phase names may repeat, so this is not keyed by name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub checked: usize,
    pub total: usize,
    pub per_phase: Vec<PhaseProgress>,
}

impl Progress {
    /// Whole-number percentage, rounded down; 0 for an empty plan
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.checked * 100 / self.total
        }
    }

    /// First phase entry with this exact name
    pub fn phase(&self, name: &str) -> Option<&PhaseProgress> {
        self.per_phase.iter().find(|p| p.name == name)
    }
}

pub fn compute_progress(doc: &Document) -> Progress {
    let per_phase: Vec<PhaseProgress> = doc
        .phases
        .iter()
        .map(|phase| PhaseProgress {
            name: phase.name.clone(),
            checked: phase.items().filter(|i| i.checked).count(),
            total: phase.item_count(),
        })
        .collect();

    Progress {
        checked: per_phase.iter().map(|p| p.checked).sum(),
        total: per_phase.iter().map(|p| p.total).sum(),
        per_phase,
    }
}

/// The phase at `phase_index` rendered as plan text, without the blank
/// lines that trail it
pub fn phase_excerpt(doc: &Document, phase_index: usize) -> Option<String> {
    let phase = doc.phases.get(phase_index)?;
    Some(phase_block(phase).trim_end().to_string())
}
