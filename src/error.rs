//! Error type for plan edits

use thiserror::Error;

/// Failures a mutation can report back to its caller.
///
/// Lookups that find nothing on `remove`/`rename` are not errors; those
/// operations return the document unchanged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No checklist item contains the query text
    #[error("Checkbox item not found: {query}")]
    NotFound { query: String },

    /// An item with the same normalized text already exists
    #[error("Item '{existing}' already exists in plan. Use rename to modify it or remove to delete it.")]
    Duplicate { existing: String },

    /// The document has no phase to put an item into
    #[error("No phases found in plan. Use add-phase to create phases first.")]
    NoPhase,

    /// Item or phase text is empty or whitespace-only
    #[error("Text cannot be empty or whitespace-only. Please provide meaningful item text.")]
    EmptyText,

    /// Text holds a line break, so it would not stay a single plan line
    #[error("Text must fit on one line: {text:?}")]
    MultiLine { text: String },

    /// A note that would read back as a `## ` section heading
    #[error("Note '{text}' would start a new section. Use --section to write to that section instead.")]
    HeadingNote { text: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;
