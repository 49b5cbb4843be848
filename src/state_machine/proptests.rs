//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::replies;
use crate::store::{GameMode, UserId};
use crate::validation::{is_game_mode_token, is_valid_contact_handle};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(user: i64) -> SubmitterContext {
    SubmitterContext::new(UserId(user), format!("user-{user}"))
}

fn feed(state: &ConvState, context: &SubmitterContext, text: &str) -> TransitionResult {
    transition(state, context, Event::text(text)).expect("text never fails mid-form")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_game_mode() -> impl Strategy<Value = GameMode> {
    prop_oneof![Just(GameMode::Moc), Just(GameMode::Pf), Just(GameMode::Apoc)]
}

fn arb_yes_no() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("Yes"), Just("No")]
}

fn arb_field_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 !@#$%^&*]{0,12}[a-zA-Z0-9]{1,12}"
}

fn arb_handle() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{4,31}".prop_map(|body| format!("@{body}"))
}

fn arb_pending_field() -> impl Strategy<Value = PendingField> {
    prop_oneof![
        Just(PendingField::GameMode),
        Just(PendingField::ArtifactChange),
        Just(PendingField::Login),
        Just(PendingField::Password),
        Just(PendingField::ContactHandle),
    ]
}

fn arb_draft() -> impl Strategy<Value = Draft> {
    (
        proptest::option::of(arb_game_mode()),
        proptest::option::of(prop_oneof![Just(ArtifactChoice::Yes), Just(ArtifactChoice::No)]),
        proptest::option::of(arb_field_text()),
        proptest::option::of(arb_field_text()),
    )
        .prop_map(|(game_mode, artifact_change, login, password)| Draft {
            game_mode,
            artifact_change,
            login,
            password,
            contact_handle: None,
        })
}

fn arb_collecting_state() -> impl Strategy<Value = ConvState> {
    (arb_pending_field(), arb_draft()).prop_map(|(field, draft)| ConvState::collecting(field, draft))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A full run of valid answers persists exactly those answers
    #[test]
    fn prop_valid_run_persists_inputs(
        user in 1i64..1_000_000,
        mode in arb_game_mode(),
        artifact in arb_yes_no(),
        login in arb_field_text(),
        password in arb_field_text(),
        handle in arb_handle(),
    ) {
        prop_assume!(!is_game_mode_token(&login) && !is_game_mode_token(&password));
        let context = test_context(user);

        let mut state = transition(&ConvState::Idle, &context, Event::BeginSubmission)
            .unwrap()
            .new_state;
        for text in [mode.as_str(), artifact, login.as_str(), password.as_str()] {
            state = feed(&state, &context, text).new_state;
        }
        prop_assert_eq!(state.pending_field(), Some(PendingField::ContactHandle));

        let result = feed(&state, &context, &handle);
        let submission = match result.effects.as_slice() {
            [Effect::PersistSubmission { submission }] => submission.clone(),
            other => return Err(TestCaseError::fail(format!("unexpected effects {other:?}"))),
        };
        prop_assert_eq!(submission.user_id, UserId(user));
        prop_assert_eq!(submission.game_mode, mode);
        prop_assert_eq!(&submission.login, &login);
        prop_assert_eq!(&submission.password, &password);
        prop_assert_eq!(&submission.contact_handle, &handle);

        // Store confirms -> conversation over
        let stored = submission.stamped(chrono::Utc::now().fixed_offset());
        let done = transition(
            &result.new_state,
            &context,
            Event::SubmissionPersisted { submission: stored },
        )
        .unwrap();
        prop_assert_eq!(done.new_state, ConvState::Idle);
    }

    /// Game-mode tokens only ever advance the game-mode step
    #[test]
    fn prop_mode_token_outside_mode_step_is_inert(
        state in arb_collecting_state(),
        mode in arb_game_mode(),
    ) {
        prop_assume!(state.pending_field() != Some(PendingField::GameMode));
        let result = feed(&state, &test_context(1), mode.as_str());
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.effects, vec![Effect::reply(replies::START_WITH_NEW_ORDER)]);
    }

    /// Anything that is not a mode token re-prompts the mode step untouched
    #[test]
    fn prop_invalid_mode_keeps_state(text in ".{0,20}") {
        prop_assume!(!is_game_mode_token(&text));
        let state = ConvState::collecting(PendingField::GameMode, Draft::default());
        let result = feed(&state, &test_context(1), &text);
        prop_assert_eq!(result.new_state, state);
    }

    /// Rejected handles never trigger a write and never lose the draft
    #[test]
    fn prop_invalid_handle_keeps_draft(draft in arb_draft(), text in ".{0,40}") {
        prop_assume!(!is_valid_contact_handle(&text));
        let state = ConvState::collecting(PendingField::ContactHandle, draft);
        let result = feed(&state, &test_context(1), &text);
        prop_assert_eq!(&result.new_state, &state);
        let persisted = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::PersistSubmission { .. }));
        prop_assert!(!persisted);
    }

    /// Text never fails while a form is in progress, and never empties it
    #[test]
    fn prop_text_never_errors_mid_form(state in arb_collecting_state(), text in ".{0,40}") {
        prop_assume!(state.pending_field() != Some(PendingField::ContactHandle));
        let result = transition(&state, &test_context(1), Event::text(text));
        prop_assert!(result.is_ok());
        prop_assert!(!result.unwrap().new_state.is_idle());
    }

    /// Starting over always lands on the mode step with an empty draft
    #[test]
    fn prop_begin_submission_always_resets(state in arb_collecting_state()) {
        let result = transition(&state, &test_context(1), Event::BeginSubmission).unwrap();
        prop_assert_eq!(
            result.new_state,
            ConvState::collecting(PendingField::GameMode, Draft::default())
        );
    }
}
