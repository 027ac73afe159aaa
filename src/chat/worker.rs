//! Completion requests run on short-lived worker threads so the UI thread
//! never blocks on the network. Each worker reports back over an mpsc
//! channel that the event loop drains on its tick; outcomes whose window
//! has been closed in the meantime are discarded at the drain site.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::window::WindowId;

use super::{CompletionClient, CompletionError, Prompt};

/// Outcome of one completion request, tagged with the window whose session
/// issued it.
#[derive(Debug)]
pub struct CompletionEvent {
    pub window: WindowId,
    pub result: Result<String, CompletionError>,
}

/// Run one request on a background thread. The session is already Pending,
/// so at most one worker exists per window at any time. A send failure
/// means the UI is gone; there is nobody left to tell.
pub fn spawn_completion(
    client: Arc<CompletionClient>,
    window: WindowId,
    prompt: Prompt,
    tx: Sender<CompletionEvent>,
) {
    thread::spawn(move || {
        tracing::debug!(
            window = window.raw(),
            model = prompt.model.api_id(),
            "dispatching completion request"
        );
        let result = client.complete(prompt.model.api_id(), &prompt.text);
        if let Err(err) = &result {
            tracing::debug!(window = window.raw(), %err, "completion request failed");
        }
        let _ = tx.send(CompletionEvent { window, result });
    });
}
