//! planedit - safe, idempotent edits to checklist plan documents
//!
//! A plan is a markdown-ish file made of `###` phases holding checkbox
//! items, followed by `##` free-form sections such as "Notes" or "Risks".
//! This crate parses that text, applies one edit, and writes it back
//! without disturbing anything it did not touch.
//!
//! # Format
//!
//! | Line | Meaning |
//! |------|---------|
//! | `### <name>` | starts a phase |
//! | `- [ ] <text>` | unchecked item in the current phase |
//! | `- [x] <text>` / `- [X] <text>` | checked item |
//! | `## <name>` | after the phases, starts a trailing section |
//! | anything else | kept verbatim |
//!
//! # Quick Start
//!
//! ```
//! use planedit::{compute_progress, parse, serialize, toggle_item};
//!
//! let doc = parse("### Phase 1: Test\n- [ ] A\n- [x] B\n");
//! let edit = toggle_item(&doc, "A", true).unwrap();
//! assert_eq!(serialize(&edit.document), "### Phase 1: Test\n- [x] A\n- [x] B\n");
//!
//! let progress = compute_progress(&edit.document);
//! assert_eq!((progress.checked, progress.total), (2, 2));
//! ```
//!
//! Every edit resolves its target by case-insensitive substring match.
//! Fuzzy matching ([`find_similar_items`]) only produces suggestions and
//! never drives an edit.

pub mod config;
pub mod document;
pub mod error;
pub mod mutate;
pub mod parser;
pub mod query;
pub mod serializer;
pub mod similarity;

pub use config::Config;
pub use document::{
    normalize_text, ChecklistItem, Document, LineEnding, Phase, PhaseLine, TrailingSection,
};
pub use error::{PlanError, Result};
pub use mutate::{
    add_item, add_note, add_phase, remove_item, rename_item, toggle_item, validate_no_duplicate,
    Edit, Toggled,
};
pub use parser::parse;
pub use query::{
    compute_progress, find_similar_items, phase_excerpt, PhaseProgress, PhaseTarget, Progress,
};
pub use serializer::serialize;
pub use similarity::{edit_distance, rank_by_similarity, similarity};
