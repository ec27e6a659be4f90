//! Unit tests for RepeatHandler.

use tracer_core::{
    ActionButton, Handler, HandlerResponse, MessageRef, TrackedTarget, WatchList, PLUG_PAYLOAD,
};

use super::mock::*;
use crate::replies;
use crate::RepeatHandler;

fn answers(sent: &[Sent]) -> Vec<String> {
    sent.iter()
        .filter_map(|s| match s {
            Sent::Answer { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// **Test: re-arming an offline user re-adds fresh fields, answers and disables the button.**
#[tokio::test]
async fn test_repeat_offline_user_is_added_again() {
    let watch_list = WatchList::new();
    let presence = MockPresence::new(vec![user(12345, "alice", false, 900)]);
    let (messenger, mut rx) = MockMessenger::with_receiver();
    let h = RepeatHandler::new(watch_list.clone(), presence.clone(), messenger);

    let response = h
        .handle(&callback_event(OPERATOR, "repeat:12345:true"))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(presence.queries(), vec![vec!["12345".to_string()]]);

    let target = watch_list.find(12345).await.unwrap();
    assert_eq!(target.last_seen, 900);
    assert!(target.domain_is_primary);

    let sent = drain(&mut rx);
    assert_eq!(answers(&sent), vec![replies::USER_ADDED_AGAIN.to_string()]);
    assert!(sent.contains(&Sent::Edit {
        message: MessageRef {
            chat_id: OPERATOR,
            message_id: 77
        },
        action_row: vec![ActionButton::new(replies::REPEATED_BUTTON, PLUG_PAYLOAD)],
    }));
}

/// **Test: a user who is online now is not re-added.**
#[tokio::test]
async fn test_repeat_online_user_not_added() {
    let watch_list = WatchList::new();
    let presence = MockPresence::new(vec![user(5, "bob", true, 0)]);
    let (messenger, mut rx) = MockMessenger::with_receiver();
    let h = RepeatHandler::new(watch_list.clone(), presence, messenger);

    h.handle(&callback_event(OPERATOR, "repeat:5:false"))
        .await
        .unwrap();

    assert!(watch_list.is_empty().await);
    let sent = drain(&mut rx);
    assert_eq!(answers(&sent), vec![replies::USER_IS_ONLINE.to_string()]);
    assert!(!sent.iter().any(|s| matches!(s, Sent::Edit { .. })));
}

/// **Test: tapping the button twice does not create a duplicate.**
#[tokio::test]
async fn test_repeat_already_tracked() {
    let watch_list = WatchList::new();
    let stale = user(5, "bob", false, 1);
    watch_list
        .add(TrackedTarget::from_presence(&stale, false))
        .await;
    let presence = MockPresence::new(vec![user(5, "bob", false, 2)]);
    let (messenger, mut rx) = MockMessenger::with_receiver();
    let h = RepeatHandler::new(watch_list.clone(), presence, messenger);

    h.handle(&callback_event(OPERATOR, "repeat:5:false"))
        .await
        .unwrap();

    assert_eq!(watch_list.len().await, 1);
    assert_eq!(watch_list.find(5).await.unwrap().last_seen, 1);
    assert_eq!(
        answers(&drain(&mut rx)),
        vec![replies::ALREADY_ADDED.to_string()]
    );
}

/// **Test: malformed payloads, unknown users and query failures answer the generic error.**
#[tokio::test]
async fn test_repeat_errors_answer_generic_error() {
    let watch_list = WatchList::new();
    let (messenger, mut rx) = MockMessenger::with_receiver();

    let h = RepeatHandler::new(
        watch_list.clone(),
        MockPresence::new(vec![]),
        messenger.clone(),
    );
    h.handle(&callback_event(OPERATOR, "repeat:5")).await.unwrap();
    h.handle(&callback_event(OPERATOR, "repeat:abc:true"))
        .await
        .unwrap();
    h.handle(&callback_event(OPERATOR, "repeat:5:true"))
        .await
        .unwrap();

    let failing = RepeatHandler::new(watch_list.clone(), MockPresence::failing(), messenger);
    failing
        .handle(&callback_event(OPERATOR, "repeat:5:true"))
        .await
        .unwrap();

    assert!(watch_list.is_empty().await);
    assert_eq!(
        answers(&drain(&mut rx)),
        vec![replies::ERROR_OCCURRED.to_string(); 4]
    );
}

/// **Test: the inert "Repeated" button and unknown payloads just dismiss the spinner.**
#[tokio::test]
async fn test_unknown_payload_answered_empty() {
    let (messenger, mut rx) = MockMessenger::with_receiver();
    let presence = MockPresence::new(vec![]);
    let h = RepeatHandler::new(WatchList::new(), presence.clone(), messenger);

    h.handle(&callback_event(OPERATOR, PLUG_PAYLOAD))
        .await
        .unwrap();
    h.handle(&callback_event(OPERATOR, "")).await.unwrap();

    assert!(presence.queries().is_empty());
    assert_eq!(answers(&drain(&mut rx)), vec![String::new(), String::new()]);
}

/// **Test: text messages are left for other handlers.**
#[tokio::test]
async fn test_messages_ignored() {
    let (messenger, mut rx) = MockMessenger::with_receiver();
    let h = RepeatHandler::new(WatchList::new(), MockPresence::new(vec![]), messenger);

    assert_eq!(
        h.handle(&operator_text("/list")).await.unwrap(),
        HandlerResponse::Ignore
    );
    assert!(drain(&mut rx).is_empty());
}
