use thiserror::Error;

use crate::models::ModelId;
use crate::window::WindowId;

use super::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
}

/// Validation failures surfaced to the user through the error dialog.
/// None of these touch the transcript or the session state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChatError {
    #[error("Please select an AI model before sending a message.")]
    NoModelSelected,
    #[error("Please enter a message to send.")]
    EmptyMessage,
    #[error("A reply is still on the way. Wait for it before sending again.")]
    RequestPending,
}

/// A validated submission, ready to hand to a completion worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub model: ModelId,
    pub text: String,
}

/// Per-window conversational state: the selected model, the transcript, and
/// whether a request is in flight. Idle/Pending is the whole state machine;
/// the only suspension point is the completion call, and at most one is
/// outstanding per session.
#[derive(Debug)]
pub struct ChatSession {
    window: WindowId,
    model: Option<ModelId>,
    transcript: Vec<TranscriptEntry>,
    pending: bool,
}

impl ChatSession {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            model: None,
            transcript: Vec::new(),
            pending: false,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    /// Select a model. Assignment makes the previous selection go away, so
    /// at most one model is ever selected.
    pub fn select_model(&mut self, model: ModelId) {
        self.model = Some(model);
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validate and accept a submission. On success the user entry is
    /// appended, the session turns Pending, and the prompt to dispatch is
    /// returned. Validation failures leave the session untouched; a
    /// submission while one is already pending is rejected.
    pub fn submit(&mut self, text: &str) -> Result<Prompt, ChatError> {
        if self.pending {
            return Err(ChatError::RequestPending);
        }
        let model = self.model.ok_or(ChatError::NoModelSelected)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.transcript.push(TranscriptEntry {
            role: Role::User,
            text: text.to_string(),
        });
        self.pending = true;
        Ok(Prompt {
            model,
            text: text.to_string(),
        })
    }

    /// Apply the outcome of the in-flight request: append the assistant
    /// entry (reply text, or a readable error) and return to Idle. Ignored
    /// when nothing is pending, so a stray worker outcome cannot corrupt an
    /// idle session.
    pub fn resolve(&mut self, result: Result<String, CompletionError>) {
        if !self.pending {
            tracing::debug!(window = self.window.raw(), "dropping completion outcome for idle session");
            return;
        }
        self.pending = false;
        let text = match result {
            Ok(reply) => reply,
            Err(err) => format!("Error: {err}"),
        };
        self.transcript.push(TranscriptEntry {
            role: Role::Assistant,
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChatSession {
        let mut wm = crate::window::WindowManager::new(crate::geometry::Viewport::new(100, 40, 1));
        let id = wm.create_window(|_| ());
        ChatSession::new(id)
    }

    #[test]
    fn submit_without_model_is_rejected_untouched() {
        let mut s = session();
        assert_eq!(s.submit("hello"), Err(ChatError::NoModelSelected));
        assert!(s.transcript().is_empty());
        assert!(!s.is_pending());
    }

    #[test]
    fn submit_empty_or_whitespace_is_rejected() {
        let mut s = session();
        s.select_model(ModelId::GptOss20b);
        assert_eq!(s.submit(""), Err(ChatError::EmptyMessage));
        assert_eq!(s.submit("   "), Err(ChatError::EmptyMessage));
        assert!(s.transcript().is_empty());
        assert!(!s.is_pending());
    }

    #[test]
    fn model_check_precedes_empty_check() {
        // matches the upstream dialog ordering
        let mut s = session();
        assert_eq!(s.submit(""), Err(ChatError::NoModelSelected));
    }

    #[test]
    fn successful_round_trip_appends_two_entries() {
        let mut s = session();
        s.select_model(ModelId::DeepseekChatV31);
        let prompt = s.submit("hello").unwrap();
        assert_eq!(prompt.model, ModelId::DeepseekChatV31);
        assert_eq!(prompt.text, "hello");
        assert!(s.is_pending());
        assert_eq!(s.transcript().len(), 1);

        s.resolve(Ok("hi".to_string()));
        assert!(!s.is_pending());
        let transcript = s.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].text, "hello");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].text, "hi");
    }

    #[test]
    fn failed_round_trip_appends_error_entry() {
        let mut s = session();
        s.select_model(ModelId::Llama33_8bInstruct);
        s.submit("hello").unwrap();
        s.resolve(Err(CompletionError::Format(
            "response carried no choices".to_string(),
        )));
        let transcript = s.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::Assistant);
        assert!(transcript[1].text.starts_with("Error: "));
        assert!(!s.is_pending());
    }

    #[test]
    fn second_submission_while_pending_is_rejected() {
        let mut s = session();
        s.select_model(ModelId::GptOss20b);
        s.submit("first").unwrap();
        assert_eq!(s.submit("second"), Err(ChatError::RequestPending));
        assert_eq!(s.transcript().len(), 1);
        assert!(s.is_pending());
    }

    #[test]
    fn resolve_on_idle_session_is_ignored() {
        let mut s = session();
        s.resolve(Ok("stray".to_string()));
        assert!(s.transcript().is_empty());
        assert!(!s.is_pending());
    }

    #[test]
    fn selecting_again_replaces_the_previous_model() {
        let mut s = session();
        s.select_model(ModelId::GptOss20b);
        s.select_model(ModelId::DeepseekChatV31);
        assert_eq!(s.model(), Some(ModelId::DeepseekChatV31));
    }
}
