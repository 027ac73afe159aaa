use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};

/// Source of terminal input events. The indirection keeps the loop testable
/// without a live terminal.
pub trait InputSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

/// Crossterm-backed input for the real terminal.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

pub enum ControlFlow {
    Continue,
    Quit,
}

/// The single loop driving the UI thread: poll input, dispatch to the
/// handler, tick on timeout. Completion workers run on their own threads
/// and feed state that the tick renders.
pub struct EventLoop<S> {
    source: S,
    poll_interval: Duration,
}

impl<S: InputSource> EventLoop<S> {
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source,
            poll_interval,
        }
    }

    /// Run until the handler asks to quit. The handler receives
    /// `Some(event)` for input and `None` on an idle tick (used for
    /// redrawing the clock and draining completion outcomes).
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                return Ok(());
            }
            if self.source.poll(self.poll_interval)? {
                // Drain the queued burst before rendering again so mouse
                // drags do not lag behind the input stream.
                loop {
                    let event = self.source.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.source.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Scripted input source: yields the queued events, then reports idle.
    struct ScriptedInput {
        events: Vec<Event>,
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            Ok(self.events.remove(0))
        }
    }

    #[test]
    fn run_dispatches_events_then_ticks() {
        let source = ScriptedInput {
            events: vec![
                Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
                Event::Key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE)),
            ],
        };
        let mut seen = Vec::new();
        let mut ticks = 0;
        EventLoop::new(source, Duration::from_millis(1))
            .run(|event| {
                match event {
                    Some(Event::Key(key)) => {
                        seen.push(key.code);
                        Ok(ControlFlow::Continue)
                    }
                    Some(_) => Ok(ControlFlow::Continue),
                    None => {
                        ticks += 1;
                        // quit on the tick after the burst drained
                        if seen.len() == 2 {
                            Ok(ControlFlow::Quit)
                        } else {
                            Ok(ControlFlow::Continue)
                        }
                    }
                }
            })
            .unwrap();
        assert_eq!(seen, vec![KeyCode::Char('a'), KeyCode::Char('b')]);
        assert!(ticks >= 1);
    }
}
