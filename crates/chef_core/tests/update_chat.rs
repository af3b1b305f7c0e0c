use std::sync::Once;

use chef_core::{
    update, AppState, ChatReply, Effect, Msg, Recipe, RemoteFailure, Sender, SessionToken,
    SuggestedAction,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chef_logging::initialize_for_tests);
}

fn recipe() -> Recipe {
    Recipe {
        id: "recipe-9".to_string(),
        title: "Risotto".to_string(),
        ingredients: Vec::new(),
        steps: vec!["Toast the rice.".to_string(), "Add stock.".to_string()],
        servings: 2,
    }
}

fn started() -> (AppState, SessionToken) {
    let (state, _) = update(AppState::default(), Msg::StartCooking(recipe()));
    let token = state.session().unwrap().token();
    (state, token)
}

fn send_chat(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::ChatSubmitted(text.to_string()))
}

fn reply(text: &str) -> ChatReply {
    ChatReply {
        text: text.to_string(),
        actions: Vec::new(),
    }
}

fn chat_texts(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::SendChat { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn blank_messages_are_ignored() {
    init_logging();
    let (mut state, _token) = started();
    assert!(state.consume_dirty());

    let (mut state, effects) = send_chat(state, "   \n ");

    assert!(effects.is_empty());
    assert!(state.view().conversation.is_empty());
    assert_eq!(state.last_error(), None);
    assert!(!state.consume_dirty());
}

#[test]
fn messages_sent_during_creation_are_replayed_in_order() {
    init_logging();
    let (state, token) = started();

    let (state, effects) = send_chat(state, "How thick should it be?");
    assert!(effects.is_empty());
    let (state, effects) = send_chat(state, "Can I use white wine?");
    assert!(effects.is_empty());
    assert_eq!(state.view().queued_messages, 2);
    assert_eq!(state.view().conversation.len(), 2);

    let (state, effects) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Ok("remote-7".to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::FetchStepActions {
                token,
                remote_id: "remote-7".to_string(),
                step: 0,
            },
            Effect::SendChat {
                token,
                remote_id: "remote-7".to_string(),
                text: "How thick should it be?".to_string(),
            },
        ]
    );
    assert!(state.view().chat_busy);

    let (state, effects) = update(
        state,
        Msg::ChatReplied {
            token,
            result: Ok(reply("Like loose porridge.")),
        },
    );
    assert_eq!(chat_texts(&effects), vec!["Can I use white wine?"]);

    let (state, effects) = update(
        state,
        Msg::ChatReplied {
            token,
            result: Ok(reply("Yes, half a cup.")),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.chat_busy);
    assert_eq!(view.queued_messages, 0);
    let senders: Vec<_> = view.conversation.iter().map(|line| line.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::User, Sender::Assistant, Sender::Assistant]
    );
}

#[test]
fn only_one_creation_is_requested_while_offline() {
    init_logging();
    let (state, token) = started();
    let (state, _) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Err(RemoteFailure::new("timeout")),
        },
    );

    let (state, effects) = send_chat(state, "first");
    assert_eq!(
        effects,
        vec![Effect::CreateRemoteSession {
            token,
            recipe_id: "recipe-9".to_string(),
        }]
    );
    let (state, effects) = send_chat(state, "second");
    assert!(effects.is_empty());

    // Creation fails again: the outbox is kept.
    let (state, effects) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Err(RemoteFailure::new("timeout")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().queued_messages, 2);

    let (state, effects) = send_chat(state, "third");
    assert_eq!(effects.len(), 1);
    let (_state, effects) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Ok("remote-2".to_string()),
        },
    );
    assert_eq!(chat_texts(&effects), vec!["first"]);
}

#[test]
fn chat_failure_is_reported_in_conversation_and_queue_continues() {
    init_logging();
    let (state, token) = started();
    let (state, _) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Ok("remote-3".to_string()),
        },
    );
    let (state, effects) = send_chat(state, "one");
    assert_eq!(chat_texts(&effects), vec!["one"]);
    let (state, effects) = send_chat(state, "two");
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::ChatReplied {
            token,
            result: Err(RemoteFailure::new("http status 500")),
        },
    );
    assert_eq!(chat_texts(&effects), vec!["two"]);

    let last = state.view().conversation.last().cloned().unwrap();
    assert_eq!(last.sender, Sender::Assistant);
    assert!(last.text.starts_with("Sorry"));
}

#[test]
fn chat_suggestions_are_added_without_duplicates() {
    init_logging();
    let (state, token) = started();
    let (state, _) = update(
        state,
        Msg::RemoteSessionCreated {
            token,
            result: Ok("remote-4".to_string()),
        },
    );
    let stir = SuggestedAction::Timer {
        duration_minutes: 18,
        appliance_hint: "STOVE".to_string(),
        label: "Risotto".to_string(),
        description: "Stir for 18 minutes".to_string(),
    };
    let (state, _) = update(
        state,
        Msg::StepActionsLoaded {
            token,
            step: 0,
            result: Ok(vec![stir.clone()]),
        },
    );

    let (state, _) = send_chat(state, "How long?");
    let (state, _) = update(
        state,
        Msg::ChatReplied {
            token,
            result: Ok(ChatReply {
                text: "About 18 minutes.".to_string(),
                actions: vec![
                    stir,
                    SuggestedAction::Temperature {
                        value_fahrenheit: None,
                        appliance_hint: "STOVE".to_string(),
                        description: "Keep at a gentle simmer".to_string(),
                    },
                ],
            }),
        },
    );

    assert_eq!(state.view().pending_actions.len(), 2);
}

#[test]
fn replies_for_a_replaced_session_are_discarded() {
    init_logging();
    let (state, old_token) = started();
    let (state, _) = update(state, Msg::StartCooking(recipe()));
    let new_token = state.session().unwrap().token();
    assert_ne!(old_token, new_token);

    let (state, effects) = update(
        state,
        Msg::ChatReplied {
            token: old_token,
            result: Ok(reply("stale")),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().conversation.is_empty());
}
