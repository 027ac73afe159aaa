use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use chat_wm::chat::{
    ChatError, ChatSession, CompletionClient, Prompt, Role, decode_reply, spawn_completion,
};
use chat_wm::geometry::Viewport;
use chat_wm::models::ModelId;
use chat_wm::window::WindowManager;

fn manager() -> WindowManager<ChatSession> {
    WindowManager::new(Viewport::new(120, 40, 1))
}

#[test]
fn full_round_trip_with_a_mocked_service_body() {
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);

    let session = wm.content_mut(id).unwrap();
    session.select_model(ModelId::DeepseekChatV31);
    let prompt = session.submit("hello").unwrap();
    assert_eq!(prompt.model.api_id(), "deepseek/deepseek-chat-v3.1:free");
    assert_eq!(prompt.text, "hello");

    // what the completion service would answer
    let reply = decode_reply(r#"{"choices":[{"message":{"content":"hi"}}]}"#);
    session.resolve(reply);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[0].text, "hello");
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].text, "hi");
    assert!(!session.is_pending());
}

#[test]
fn submitting_without_a_model_shows_a_dialog_and_leaves_the_transcript() {
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);
    let session = wm.content_mut(id).unwrap();

    let err = session.submit("hello").unwrap_err();
    assert_eq!(err, ChatError::NoModelSelected);
    assert_eq!(
        err.to_string(),
        "Please select an AI model before sending a message."
    );
    assert!(session.transcript().is_empty());
    assert!(!session.is_pending());
}

#[test]
fn a_failed_request_lands_in_the_transcript_as_error_text() {
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);
    let session = wm.content_mut(id).unwrap();
    session.select_model(ModelId::GptOss20b);
    session.submit("hello").unwrap();

    // a success body that lost its content path
    session.resolve(decode_reply(r#"{"choices":[]}"#));

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript[1].text.starts_with("Error: "));
    assert!(!session.is_pending());

    // the failure is local to one submission; the next one goes through
    let prompt = session.submit("again").unwrap();
    assert_eq!(prompt.text, "again");
}

#[test]
fn only_one_submission_may_be_pending_per_session() {
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);
    let session = wm.content_mut(id).unwrap();
    session.select_model(ModelId::Llama33_8bInstruct);
    session.submit("first").unwrap();
    assert_eq!(session.submit("second"), Err(ChatError::RequestPending));
    assert_eq!(session.transcript().len(), 1);
}

#[test]
fn sessions_in_different_windows_are_independent() {
    let mut wm = manager();
    let a = wm.create_window(ChatSession::new);
    let b = wm.create_window(ChatSession::new);

    wm.content_mut(a).unwrap().select_model(ModelId::GptOss20b);
    wm.content_mut(a).unwrap().submit("from a").unwrap();

    // window b is unaffected by a's pending request
    let session_b = wm.content_mut(b).unwrap();
    assert!(!session_b.is_pending());
    assert!(session_b.model().is_none());
    assert!(session_b.transcript().is_empty());
}

#[test]
fn an_outcome_for_a_closed_window_is_discarded() {
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);
    let session = wm.content_mut(id).unwrap();
    session.select_model(ModelId::GptOss20b);
    session.submit("hello").unwrap();

    // the window goes away while the request is in flight
    wm.close_window(id);

    // the drain applies an outcome only to a still-active window; a closed
    // id simply misses and the outcome is dropped
    let outcome = decode_reply(r#"{"choices":[{"message":{"content":"late"}}]}"#);
    match wm.content_mut(id) {
        Some(session) => session.resolve(outcome),
        None => {}
    }
    assert!(!wm.contains(id));
}

#[test]
fn worker_reports_back_over_the_channel() {
    // nothing listens on this port; the worker should deliver a transport
    // error rather than panic or hang
    let client = Arc::new(
        CompletionClient::new("http://127.0.0.1:1/v1/chat/completions", Duration::from_secs(5))
            .unwrap(),
    );
    let mut wm = manager();
    let id = wm.create_window(ChatSession::new);
    let (tx, rx) = mpsc::channel();

    spawn_completion(
        client,
        id,
        Prompt {
            model: ModelId::GptOss20b,
            text: "hello".to_string(),
        },
        tx,
    );

    let event = rx
        .recv_timeout(Duration::from_secs(30))
        .expect("worker must report an outcome");
    assert_eq!(event.window, id);
    assert!(event.result.is_err());
}
