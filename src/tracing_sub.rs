use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

/// Initialize the global tracing subscriber.
///
/// The TUI owns stdout and stderr while the alternate screen is active, so
/// debug output goes to a log file when one is configured and is dropped
/// otherwise. Safe to call multiple times; later calls are no-ops for the
/// global subscriber.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_without_a_file_is_a_no_op() {
        init(None).unwrap();
    }

    #[test]
    fn init_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat-wm.log");
        init(Some(&path)).unwrap();
        assert!(path.exists());
    }
}
