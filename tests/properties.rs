//! Property tests for the similarity engine and the parse/serialize pipeline

use planedit::{
    add_item, add_note, add_phase, edit_distance, parse, remove_item, rename_item, serialize,
    similarity, toggle_item, Document,
};
use proptest::prelude::*;

/// One line of plan text in canonical form
fn canonical_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9][A-Za-z0-9 :&]{0,12}[A-Za-z0-9]".prop_map(|name| format!("### {}", name)),
        ("[ x]", "[a-z][a-z ]{0,10}[a-z]")
            .prop_map(|(mark, text)| format!("- [{}] {}", mark, text)),
        "[a-z ]{0,12}",
        "[A-Z][a-z]{0,8}".prop_map(|name| format!("## {}", name)),
    ]
}

fn plan_text() -> impl Strategy<Value = String> {
    (prop::collection::vec(canonical_line(), 0..24), any::<bool>()).prop_map(
        |(lines, final_newline)| {
            let mut text = lines.join("\n");
            if final_newline && !text.is_empty() {
                text.push('\n');
            }
            text
        },
    )
}

/// User-supplied text, including line breaks and heading look-alikes
fn free_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z ]{0,10}",
        "[a-zA-Z#x \\-\\[\\]\\r\\n]{0,16}",
        "[a-z]{1,6}".prop_map(|name| format!("## {}", name)),
        "[a-z]{1,6}".prop_map(|name| format!("a\n### {}\n- [x] b", name)),
    ]
}

#[derive(Debug, Clone)]
enum Mutation {
    Toggle(String, bool),
    Add(String, String),
    Remove(String),
    Rename(String, String),
    AddPhase(String, Vec<String>),
    Note(String, String),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    let query = "[a-z]{0,2}";
    prop_oneof![
        (query, any::<bool>()).prop_map(|(q, checked)| Mutation::Toggle(q, checked)),
        (query, free_text()).prop_map(|(phase, text)| Mutation::Add(phase, text)),
        query.prop_map(Mutation::Remove),
        (query, free_text()).prop_map(|(q, text)| Mutation::Rename(q, text)),
        (free_text(), prop::collection::vec(free_text(), 0..3))
            .prop_map(|(name, items)| Mutation::AddPhase(name, items)),
        (free_text(), prop_oneof![Just("Notes".to_string()), free_text()])
            .prop_map(|(note, section)| Mutation::Note(note, section)),
    ]
}

/// The edited document, or `None` when the edit was refused
fn apply(doc: &Document, mutation: &Mutation) -> Option<Document> {
    match mutation {
        Mutation::Toggle(q, checked) => toggle_item(doc, q, *checked).ok().map(|e| e.document),
        Mutation::Add(phase, text) => add_item(doc, phase, text).ok().map(|e| e.document),
        Mutation::Remove(q) => Some(remove_item(doc, q).document),
        Mutation::Rename(q, text) => rename_item(doc, q, text).ok().map(|e| e.document),
        Mutation::AddPhase(name, items) => add_phase(doc, name, items).ok(),
        Mutation::Note(note, section) => add_note(doc, note, section).ok(),
    }
}

fn item_texts(doc: &Document) -> Vec<String> {
    doc.items().map(|i| i.text.clone()).collect()
}

proptest! {
    #[test]
    fn edit_distance_identity(s in "\\PC{0,16}") {
        prop_assert_eq!(edit_distance(&s, &s), 0);
    }

    #[test]
    fn edit_distance_symmetric_and_bounded(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        let d = edit_distance(&a, &b);
        prop_assert_eq!(d, edit_distance(&b, &a));
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
    }

    #[test]
    fn edit_distance_from_empty_is_length(s in "\\PC{0,16}") {
        prop_assert_eq!(edit_distance("", &s), s.chars().count());
    }

    #[test]
    fn similarity_in_unit_interval(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn canonical_text_round_trips_exactly(text in plan_text()) {
        prop_assert_eq!(serialize(&parse(&text)), text);
    }

    #[test]
    fn parse_serialize_parse_is_stable(text in plan_text(), shout in any::<bool>()) {
        // uppercase markers and indentation are normalized, structure is not
        let text = if shout { text.replace("- [x]", "  - [X]") } else { text };
        let doc = parse(&text);
        prop_assert_eq!(parse(&serialize(&doc)), doc);
    }

    #[test]
    fn toggle_is_idempotent(text in plan_text(), checked in any::<bool>()) {
        let doc = parse(&text);
        if let Some(query) = item_texts(&doc).first().cloned() {
            let once = toggle_item(&doc, &query, checked).unwrap().document;
            let twice = toggle_item(&once, &query, checked).unwrap().document;
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn removing_unknown_item_is_noop(text in plan_text()) {
        let doc = parse(&text);
        // generated item text never contains digits
        let edit = remove_item(&doc, "0000");
        prop_assert_eq!(edit.document, doc);
        prop_assert!(edit.outcome.is_none());
    }

    #[test]
    fn edited_documents_read_back_unchanged(
        text in plan_text(),
        crlf in any::<bool>(),
        mutations in prop::collection::vec(mutation(), 1..6),
    ) {
        let text = if crlf { text.replace('\n', "\r\n") } else { text };
        let mut doc = parse(&text);
        for mutation in &mutations {
            if let Some(edited) = apply(&doc, mutation) {
                prop_assert_eq!(&parse(&serialize(&edited)), &edited, "after {:?}", mutation);
                doc = edited;
            }
        }
    }
}
