use pretty_assertions::assert_eq;
use proptest::prelude::*;
use socratic_engine::{FailureKind, Focus, NavAction, NavigationError, NavigationState, Navigator};
use socratic_model::{Dialogue, ParagraphId, QuestionId};
use socratic_test_utils::{
    dialogue_with_shape, open_session, reflection_of, two_paragraph_dialogue, LONG_REFLECTION,
    SHORT_REFLECTION,
};

fn at(paragraph: &str, question: &str) -> Focus {
    Focus::new(ParagraphId::new(paragraph), QuestionId::new(question))
}

#[test]
fn test_walkthrough_two_paragraphs() {
    let mut session = open_session(two_paragraph_dialogue());
    assert_eq!(session.focus(), at("A", "q1"));

    let outcome = session.advance(NavAction::Next, None);
    assert!(outcome.accepted);
    assert_eq!(outcome.focus(), at("A", "q2"));
    assert!(outcome.is_at_paragraph_end);

    session.select_insight_category("confused", Some(false), None);
    let outcome = session.advance(NavAction::Next, None);
    assert!(outcome.accepted);
    assert!(outcome.crossed_paragraph_boundary);
    assert_eq!(outcome.focus(), at("B", "q1"));

    let record = session.insight(&ParagraphId::new("A")).unwrap();
    assert_eq!(record.category, "confused");
    assert_eq!(record.content, "");
    assert!(session.pending().is_empty());
}

#[test]
fn test_boundary_without_selection_is_rejected() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    let dialogue_before = session.dialogue().clone();
    let state_before = session.state().clone();

    let outcome = session.advance(NavAction::Next, Some(LONG_REFLECTION));

    assert!(!outcome.accepted);
    assert_eq!(outcome.failure, Some(FailureKind::InsightNotSelected));
    assert_eq!(
        outcome.message.as_deref(),
        Some("Spot an insight before proceeding.")
    );
    assert_eq!(session.dialogue(), &dialogue_before);
    assert_eq!(session.state(), &state_before);
}

#[test]
fn test_short_reflection_is_rejected() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.choose_reaction("insightful", None).unwrap();
    let state_before = session.state().clone();

    assert_eq!(SHORT_REFLECTION.chars().count(), 10);
    let outcome = session.advance(NavAction::Next, Some(SHORT_REFLECTION));

    assert_eq!(outcome.failure, Some(FailureKind::ReflectionTooShort));
    assert_eq!(
        outcome.message.as_deref(),
        Some("Please complete writing reflection before proceeding.")
    );
    assert_eq!(session.state(), &state_before);
    assert!(session.insight(&ParagraphId::new("A")).is_none());

    // the selection survives a rejection, so a retry only needs more text
    let outcome = session.advance(NavAction::Next, Some(LONG_REFLECTION));
    assert!(outcome.accepted);
    assert_eq!(
        session.insight(&ParagraphId::new("A")).unwrap().content,
        LONG_REFLECTION
    );
}

#[test]
fn test_reflection_must_exceed_threshold() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.choose_reaction("insightful", None).unwrap();

    let padded = format!("   {}   ", reflection_of(25));
    let outcome = session.advance(NavAction::Next, Some(padded.as_str()));
    assert_eq!(outcome.failure, Some(FailureKind::ReflectionTooShort));

    let outcome = session.advance(NavAction::Next, Some(reflection_of(26).as_str()));
    assert!(outcome.accepted);
}

#[test]
fn test_force_next_records_nothing() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.select_insight_category("confused", Some(false), Some(2.0));

    let outcome = session.advance(NavAction::ForceNext, None);

    assert!(outcome.accepted);
    assert_eq!(outcome.focus(), at("B", "q1"));
    assert_eq!(session.dialogue().insights().count(), 0);
    assert!(session.pending().is_empty());
}

#[test]
fn test_force_next_keeps_existing_record() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.choose_reaction("confused", None).unwrap();
    session.advance(NavAction::Prev, None);

    let outcome = session.advance(NavAction::ForceNext, None);

    assert!(outcome.accepted);
    assert_eq!(
        session.insight(&ParagraphId::new("A")).unwrap().category,
        "confused"
    );
}

#[test]
fn test_prev_enters_last_question_of_previous_paragraph() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::ForceNext, None);
    session.advance(NavAction::ForceNext, None);
    assert_eq!(session.focus(), at("B", "q1"));

    let outcome = session.advance(NavAction::Prev, None);

    assert!(outcome.accepted);
    assert!(outcome.crossed_paragraph_boundary);
    assert_eq!(outcome.focus(), at("A", "q2"));
    assert!(outcome.is_at_paragraph_end);
}

#[test]
fn test_ends_of_the_dialogue_are_silent() {
    let mut session = open_session(two_paragraph_dialogue());

    let outcome = session.advance(NavAction::Prev, None);
    assert!(!outcome.accepted);
    assert_eq!(outcome.failure, Some(FailureKind::SequenceExhausted));
    assert!(outcome.message.is_none());
    assert_eq!(session.focus(), at("A", "q1"));

    session.advance(NavAction::ForceNext, None);
    session.advance(NavAction::ForceNext, None);
    let outcome = session.advance(NavAction::ForceNext, None);
    assert_eq!(outcome.failure, Some(FailureKind::SequenceExhausted));
    assert_eq!(session.focus(), at("B", "q1"));
}

#[test]
fn test_next_on_final_question_completes() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::ForceNext, None);
    session.advance(NavAction::ForceNext, None);

    let outcome = session.advance(NavAction::Next, None);
    assert_eq!(outcome.failure, Some(FailureKind::InsightNotSelected));

    session.choose_reaction("insightful", None).unwrap();
    let outcome = session.advance(NavAction::Next, Some(LONG_REFLECTION));

    assert!(outcome.accepted);
    assert!(outcome.completed);
    assert!(!outcome.crossed_paragraph_boundary);
    assert_eq!(outcome.focus(), at("B", "q1"));
    assert!(session.insight(&ParagraphId::new("B")).is_some());

    let outcome = session.advance(NavAction::Next, None);
    assert_eq!(outcome.failure, Some(FailureKind::SequenceExhausted));
    assert!(outcome.message.is_none());
}

#[test]
fn test_round_trip_preserves_record() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.spot_insight("flame").unwrap();
    session.choose_reaction("insightful", None).unwrap();
    session.advance(NavAction::Next, Some(LONG_REFLECTION));
    let record = session.insight(&ParagraphId::new("A")).cloned().unwrap();

    session.advance(NavAction::Prev, None);
    session.advance(NavAction::Prev, None);
    session.advance(NavAction::Next, None);

    assert_eq!(session.focus(), at("A", "q2"));
    assert_eq!(session.insight(&ParagraphId::new("A")), Some(&record));
    assert_eq!(record.value, Some(2.5));
}

#[test]
fn test_recrossing_overwrites_record() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Next, None);
    session.choose_reaction("confused", None).unwrap();
    session.advance(NavAction::Prev, None);

    session.choose_reaction("insightful", None).unwrap();
    let outcome = session.advance(NavAction::Next, Some(LONG_REFLECTION));

    assert!(outcome.accepted);
    let record = session.insight(&ParagraphId::new("A")).unwrap();
    assert_eq!(record.category, "insightful");
    assert_eq!(record.content, LONG_REFLECTION);
}

#[test]
fn test_journal_tracks_every_request() {
    let mut session = open_session(two_paragraph_dialogue());
    session.advance(NavAction::Prev, None);
    session.advance(NavAction::Next, None);
    session.advance(NavAction::Next, None);

    let journal = session.journal();
    assert_eq!(journal.len(), 3);
    assert_eq!(journal.accepted_count(), 1);
    assert_eq!(journal.failures_of(FailureKind::SequenceExhausted), 1);
    assert_eq!(journal.failures_of(FailureKind::InsightNotSelected), 1);
    assert_eq!(journal.last().unwrap().from, at("A", "q2"));
}

#[test]
fn test_navigator_over_borrowed_model() {
    let mut dialogue = dialogue_with_shape(&[1, 1, 1]);
    dialogue.prepare().unwrap();
    let mut state = NavigationState::from_dialogue(&dialogue).unwrap();
    let navigator = Navigator::with_min_reflection_chars(5);

    navigator.select_insight_category(&mut state, "seen", None, None);
    let err = navigator
        .advance(&mut dialogue, &mut state, NavAction::Next, Some("tiny"))
        .unwrap_err();
    assert_eq!(
        err,
        NavigationError::ReflectionTooShort {
            min_chars: 5,
            actual_chars: 4
        }
    );

    let transition = navigator
        .advance(&mut dialogue, &mut state, NavAction::Next, Some("enough"))
        .unwrap();
    assert_eq!(transition.to, at("p1", "q0"));
    assert!(transition.insight_committed);
}

fn action_strategy() -> impl Strategy<Value = NavAction> {
    prop_oneof![
        Just(NavAction::Next),
        Just(NavAction::Prev),
        Just(NavAction::ForceNext),
    ]
}

fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..4, 1..5)
}

proptest! {
    #[test]
    fn prop_focus_always_resolves(
        shape in shape_strategy(),
        steps in prop::collection::vec((action_strategy(), any::<bool>(), any::<bool>()), 0..60),
    ) {
        let mut session = open_session(dialogue_with_shape(&shape));

        for (action, select, long) in steps {
            if select {
                session.choose_reaction("insightful", None).unwrap();
            }
            let reflection = if long { LONG_REFLECTION } else { SHORT_REFLECTION };
            let before: Dialogue = session.dialogue().clone();
            let state_before = session.state().clone();

            let outcome = session.advance(action, Some(reflection));

            prop_assert!(session.state().is_consistent_with(session.dialogue()));
            if outcome.accepted {
                prop_assert!(session.pending().is_empty());
            } else {
                prop_assert_eq!(session.dialogue(), &before);
                prop_assert_eq!(session.state(), &state_before);
            }
            if action != NavAction::Next {
                prop_assert_eq!(
                    session.dialogue().insights().count(),
                    before.insights().count()
                );
            }
        }
    }

    #[test]
    fn prop_force_next_reaches_the_end(shape in shape_strategy()) {
        let total: usize = shape.iter().sum();
        let mut session = open_session(dialogue_with_shape(&shape));

        let mut moves = 0;
        while session.advance(NavAction::ForceNext, None).accepted {
            moves += 1;
        }

        prop_assert_eq!(moves, total - 1);
        prop_assert_eq!(session.dialogue().insights().count(), 0);
        let last = shape.len() - 1;
        let focus = session.focus();
        prop_assert_eq!(focus.paragraph_id.as_str(), format!("p{last}"));
    }
}
