mod completion;
mod session;
pub mod worker;

pub use completion::{CompletionClient, CompletionError, decode_reply};
pub use session::{ChatError, ChatSession, Prompt, Role, TranscriptEntry};
pub use worker::{CompletionEvent, spawn_completion};
