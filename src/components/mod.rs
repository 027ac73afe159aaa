mod chat_view;
mod dialog;

pub use chat_view::{ChatView, ChatViewAction, ScrollState};
pub use dialog::DialogOverlay;
