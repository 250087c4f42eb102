//! Document model for plan files
//!
//! A plan is a preamble, an ordered list of `###` phases holding checkbox
//! items, and a run of `##` trailing sections kept as opaque text.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One checkbox line (`- [ ]` or `- [x]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: text.into(),
            checked,
        }
    }

    pub fn unchecked(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// A line inside a phase body
///
/// Non-checkbox lines (blank lines, prose, `####` sub-headings) stay where
/// they were so that re-serializing does not move them around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLine {
    Item(ChecklistItem),
    Text(String),
}

/// A `### <name>` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub lines: Vec<PhaseLine>,
}

impl Phase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// Build a phase from item texts, all unchecked
    pub fn with_items<S: AsRef<str>>(name: impl Into<String>, items: &[S]) -> Self {
        let mut phase = Self::new(name);
        for text in items {
            phase.push_item(ChecklistItem::unchecked(text.as_ref().trim()));
        }
        phase
    }

    /// Checklist items in order, skipping free text
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.lines.iter().filter_map(|line| match line {
            PhaseLine::Item(item) => Some(item),
            PhaseLine::Text(_) => None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Append an item directly after the last existing item.
    ///
    /// Free text that trails the items (usually the blank line before the
    /// next heading) stays at the end of the phase.
    pub fn push_item(&mut self, item: ChecklistItem) {
        let at = self
            .lines
            .iter()
            .rposition(|line| matches!(line, PhaseLine::Item(_)))
            .map(|i| i + 1)
            .unwrap_or_else(|| self.leading_text_len());
        self.lines.insert(at, PhaseLine::Item(item));
    }

    /// Whether the phase body ends with an empty line
    pub fn ends_with_blank_line(&self) -> bool {
        matches!(self.lines.last(), Some(PhaseLine::Text(text)) if text.is_empty())
    }

    /// Number of non-blank text lines before the first item, so a phase
    /// with only a description gets its first item after that description
    fn leading_text_len(&self) -> usize {
        let mut end = 0;
        for (i, line) in self.lines.iter().enumerate() {
            match line {
                PhaseLine::Text(text) if !text.trim().is_empty() => end = i + 1,
                PhaseLine::Text(_) => {}
                PhaseLine::Item(_) => break,
            }
        }
        end
    }
}

/// A `## <name>` section after the phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingSection {
    pub name: String,
    /// Raw body, every line newline-terminated
    pub body: String,
}

impl TrailingSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: String::new(),
        }
    }

    /// Append one line to the body
    pub fn push_line(&mut self, line: &str) {
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            self.body.push('\n');
        }
        self.body.push_str(line);
        self.body.push('\n');
    }
}

/// Line terminator a plan was written with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// `\r\n` when the text contains one, else `\n`
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// A parsed plan document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Everything before the first phase heading, verbatim
    pub preamble: String,
    pub phases: Vec<Phase>,
    pub trailing_sections: Vec<TrailingSection>,
    /// Whether the source text ended with a newline
    #[serde(default = "default_true")]
    pub trailing_newline: bool,
    /// Terminator used for every line when serialized
    #[serde(default)]
    pub line_ending: LineEnding,
}

fn default_true() -> bool {
    true
}

impl Default for Document {
    fn default() -> Self {
        Self {
            preamble: String::new(),
            phases: Vec::new(),
            trailing_sections: Vec::new(),
            trailing_newline: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase headings in document order
    pub fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name.as_str()).collect()
    }

    /// All items across all phases, in document order
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.phases.iter().flat_map(|p| p.items())
    }

    /// Trailing section by exact name
    pub fn section(&self, name: &str) -> Option<&TrailingSection> {
        self.trailing_sections.iter().find(|s| s.name == name)
    }
}

impl FromStr for Document {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::parser::parse(s))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serializer::serialize(self))
    }
}

/// Trim, collapse whitespace runs to one space, lowercase
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trim and collapse whitespace runs, keeping case
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
