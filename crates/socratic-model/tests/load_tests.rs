//! Loading tests - source formats and structural rejection

use pretty_assertions::assert_eq;
use socratic_model::prelude::*;
use std::io::Write;

const SOURCE_JSON: &str = r#"{
    "title": "On courage",
    "questionParagraphs": [
        {
            "id": "p1",
            "title": "Fear",
            "image": "https://example.org/fear.png",
            "questions": [
                { "id": "q1", "paragraphId": "p1", "question": "What is fear?" },
                { "id": "q2", "question": "Is fear useful?" }
            ]
        },
        {
            "id": "p2",
            "title": "Action",
            "isActive": true,
            "questions": [
                { "id": "q1", "text": "What would you do?" }
            ],
            "insight": { "category": "aha", "content": "acting despite fear", "value": 2 }
        }
    ]
}"#;

const SOURCE_YAML: &str = r"
title: On courage
questionParagraphs:
  - id: p1
    questions:
      - id: q1
        question: What is fear?
      - id: q2
        question: Is fear useful?
        isActive: true
";

#[test]
fn json_source_is_validated_and_normalized() {
    let dialogue = Dialogue::from_json_str(SOURCE_JSON).unwrap();

    assert_eq!(dialogue.title, "On courage");
    assert_eq!(dialogue.len(), 2);
    // Explicit flag on p2 is kept, p1 stays inactive
    assert_eq!(dialogue.active_paragraph().unwrap().id, ParagraphId::new("p2"));
    // Missing owner filled from the parent
    assert_eq!(dialogue.paragraphs[0].questions[1].paragraph_id, ParagraphId::new("p1"));
    // `text` is accepted as an alias of `question`
    assert_eq!(dialogue.paragraphs[1].questions[0].text, "What would you do?");
    assert_eq!(
        dialogue.insight(&ParagraphId::new("p2")).unwrap().value,
        Some(2.0)
    );
    assert!(dialogue.is_normalized());
}

#[test]
fn yaml_source_keeps_flagged_question() {
    let dialogue = Dialogue::from_yaml_str(SOURCE_YAML).unwrap();
    let active = dialogue.active_paragraph().unwrap();

    assert_eq!(active.active_question().unwrap().id, QuestionId::new("q2"));
    assert!(!active.questions[0].is_active);
}

#[test]
fn export_then_reload_is_stable() {
    let dialogue = Dialogue::from_json_str(SOURCE_JSON).unwrap();
    let exported = serde_json::to_string(&dialogue).unwrap();
    let reloaded = Dialogue::from_json_str(&exported).unwrap();

    assert_eq!(reloaded, dialogue);
}

#[test]
fn rejects_empty_dialogue() {
    let err = Dialogue::from_json_str(r#"{ "title": "x", "questionParagraphs": [] }"#).unwrap_err();
    assert!(matches!(err, ModelError::Empty));

    let err = Dialogue::from_json_str("{}").unwrap_err();
    assert!(matches!(err, ModelError::Empty));
}

#[test]
fn rejects_paragraph_without_questions() {
    let err = Dialogue::from_json_str(
        r#"{ "questionParagraphs": [ { "id": "p1", "questions": [] } ] }"#,
    )
    .unwrap_err();

    assert!(matches!(err, ModelError::EmptyParagraph { paragraph } if paragraph.as_str() == "p1"));
}

#[test]
fn rejected_dialogue_is_left_untouched() {
    let mut first = Paragraph::new("a", "First");
    first.questions.push(Question::new("q1", "Why?"));
    let mut dialogue = Dialogue::new("t", vec![first, Paragraph::new("b", "Empty")]);
    let before = dialogue.clone();

    let err = dialogue.validate().unwrap_err();

    assert!(matches!(err, ModelError::EmptyParagraph { paragraph } if paragraph.as_str() == "b"));
    assert_eq!(dialogue, before);
    assert_eq!(dialogue.paragraphs[0].questions[0].paragraph_id, ParagraphId::default());
}

#[test]
fn rejects_duplicate_ids() {
    let err = Dialogue::from_json_str(
        r#"{ "questionParagraphs": [
            { "id": "p1", "questions": [ { "id": "q1" } ] },
            { "id": "p1", "questions": [ { "id": "q1" } ] }
        ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateParagraph { .. }));

    let err = Dialogue::from_json_str(
        r#"{ "questionParagraphs": [
            { "id": "p1", "questions": [ { "id": "q1" }, { "id": "q1" } ] }
        ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateQuestion { .. }));
}

#[test]
fn rejects_question_owned_by_other_paragraph() {
    let err = Dialogue::from_json_str(
        r#"{ "questionParagraphs": [
            { "id": "p1", "questions": [ { "id": "q1", "paragraphId": "p9" } ] }
        ] }"#,
    )
    .unwrap_err();

    match err {
        ModelError::ForeignQuestion { claimed, .. } => assert_eq!(claimed.as_str(), "p9"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_from_file_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(SOURCE_YAML.as_bytes()).unwrap();

    let dialogue = Dialogue::from_path(file.path()).unwrap();
    assert_eq!(dialogue.question_count(), 2);
}

#[test]
fn rejects_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
    let err = Dialogue::from_path(file.path()).unwrap_err();

    assert!(matches!(err, ModelError::UnsupportedFormat { extension } if extension == "xml"));
}
