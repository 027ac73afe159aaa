use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::formatdoc;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::{Frame, Terminal};

use chat_wm::chat::{ChatSession, CompletionClient, CompletionEvent, spawn_completion};
use chat_wm::components::{ChatView, ChatViewAction, DialogOverlay};
use chat_wm::constants::{DEFAULT_TIMEOUT_SECS, PANEL_HEIGHT};
use chat_wm::event_loop::{ConsoleInput, ControlFlow, EventLoop};
use chat_wm::geometry::Viewport;
use chat_wm::panel::{Panel, PanelItem, START_MENU_ITEMS, StartMenuAction};
use chat_wm::state::ShellState;
use chat_wm::theme;
use chat_wm::tracing_sub;
use chat_wm::window::{HeaderHit, WindowId, WindowManager, chrome};

#[derive(Debug, Parser)]
#[command(name = "chat-wm", version, about = "A desktop-style chat window manager for terminal shells.")]
struct Cli {
    /// Completion endpoint receiving the chat POST requests.
    #[arg(long, default_value = "http://localhost:11434/v1/chat/completions")]
    endpoint: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Append debug logs to this file (the terminal UI owns stderr).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init(cli.log_file.as_deref())?;
    let mut desktop = Desktop::new(&cli)?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut desktop);

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    desktop: &mut Desktop,
) -> io::Result<()> {
    let mut events = EventLoop::new(ConsoleInput, Duration::from_millis(100));
    events.run(|event| {
        if let Some(event) = event {
            desktop.handle_event(&event);
        }
        desktop.drain_completions();
        terminal.draw(|frame| desktop.render(frame))?;
        Ok(if desktop.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    })
}

/// One window's content: the session and its view, created together by the
/// window manager and dropped together on close.
struct ChatWindow {
    session: ChatSession,
    view: ChatView,
}

/// The whole shell: window manager, taskbar, start menu, dialogs, and the
/// channel that completion workers report back on.
struct Desktop {
    windows: WindowManager<ChatWindow>,
    panel: Panel,
    shell: ShellState,
    error_dialog: DialogOverlay,
    credits_dialog: DialogOverlay,
    client: Arc<CompletionClient>,
    completion_tx: Sender<CompletionEvent>,
    completion_rx: Receiver<CompletionEvent>,
    should_quit: bool,
}

impl Desktop {
    fn new(cli: &Cli) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let viewport = Viewport::new(width, height, PANEL_HEIGHT);
        let client = CompletionClient::new(&cli.endpoint, Duration::from_secs(cli.timeout_secs))
            .map_err(io::Error::other)?;
        let (completion_tx, completion_rx) = mpsc::channel();

        let mut credits_dialog = DialogOverlay::new();
        credits_dialog.set_size(44, 12);

        let mut desktop = Self {
            windows: WindowManager::new(viewport),
            panel: Panel::new(),
            shell: ShellState::new(),
            error_dialog: DialogOverlay::new().with_accent_title(),
            credits_dialog,
            client: Arc::new(client),
            completion_tx,
            completion_rx,
            should_quit: false,
        };
        desktop.open_chat_window();
        Ok(desktop)
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn open_chat_window(&mut self) {
        self.windows.create_window(|id| ChatWindow {
            session: ChatSession::new(id),
            view: ChatView::new(),
        });
    }

    /// Apply worker outcomes that arrived since the last tick. An outcome
    /// whose window was closed in the meantime is discarded here; the
    /// session's own pending guard covers the rest.
    fn drain_completions(&mut self) {
        while let Ok(event) = self.completion_rx.try_recv() {
            match self.windows.content_mut(event.window) {
                Some(window) => {
                    window.session.resolve(event.result);
                    window.view.scroll_to_bottom();
                }
                None => {
                    tracing::debug!(
                        window = event.window.raw(),
                        "discarding completion for closed window"
                    );
                }
            }
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Resize(width, height) => {
                self.windows
                    .set_viewport(Viewport::new(*width, *height, PANEL_HEIGHT));
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.error_dialog.visible() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.error_dialog.close();
            }
            return;
        }
        if self.credits_dialog.visible() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.credits_dialog.close();
            }
            return;
        }
        if self.shell.menu_open() {
            match key.code {
                KeyCode::Esc => self.shell.close_menu(),
                KeyCode::Up => self.shell.move_menu_selection(-1, START_MENU_ITEMS.len()),
                KeyCode::Down => self.shell.move_menu_selection(1, START_MENU_ITEMS.len()),
                KeyCode::Enter => {
                    let action = START_MENU_ITEMS[self.shell.menu_selected()].1;
                    self.shell.close_menu();
                    self.run_menu_action(action);
                }
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.open_chat_window();
            return;
        }
        if let Some(id) = self.windows.focused() {
            let action = self
                .windows
                .content_mut(id)
                .and_then(|window| window.view.handle_key(key));
            if let Some(action) = action {
                self.apply_view_action(id, action);
            }
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let event = Event::Mouse(*mouse);

        // modal dialogs own the pointer while visible
        if self.error_dialog.visible() {
            if matches!(mouse.kind, MouseEventKind::Down(_))
                && self.error_dialog.hit_ok(mouse.column, mouse.row)
            {
                self.error_dialog.close();
            }
            return;
        }
        if self.credits_dialog.visible() {
            if matches!(mouse.kind, MouseEventKind::Down(_))
                && self.credits_dialog.hit_ok(mouse.column, mouse.row)
            {
                self.credits_dialog.close();
            }
            return;
        }

        if self.shell.menu_open() {
            if let Some(action) = self.panel.hit_menu_item(&event) {
                self.shell.close_menu();
                self.run_menu_action(action);
                return;
            }
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                // any press outside the menu dismisses it; the press still
                // lands on whatever is underneath
                self.shell.close_menu();
                if self.panel.hit_start(&event) {
                    return;
                }
            }
        }

        if self.panel.hit_start(&event) {
            self.shell.toggle_menu();
            return;
        }
        if let Some(id) = self.panel.hit_window(&event) {
            if self
                .windows
                .controller(id)
                .is_some_and(|controller| controller.is_minimized())
            {
                self.windows.restore_window(id);
            } else if self.windows.focused() == Some(id) {
                self.windows.minimize_window(id);
            } else {
                self.windows.focus_window(id);
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(id) = self.windows.window_at(mouse.column, mouse.row) else {
                    return;
                };
                self.windows.focus_window(id);
                let (header, resize) = {
                    let Some(controller) = self.windows.controller(id) else {
                        return;
                    };
                    (
                        controller.header_hit(mouse.column, mouse.row),
                        controller.resize_hit(mouse.column, mouse.row),
                    )
                };
                match header {
                    Some(HeaderHit::Close) => {
                        self.windows.close_window(id);
                        return;
                    }
                    Some(HeaderHit::Minimize) => {
                        self.windows.minimize_window(id);
                        return;
                    }
                    Some(HeaderHit::Drag) => {
                        if let Some(controller) = self.windows.controller_mut(id) {
                            controller.begin_drag(i32::from(mouse.column), i32::from(mouse.row));
                        }
                        return;
                    }
                    None => {}
                }
                if resize {
                    if let Some(controller) = self.windows.controller_mut(id) {
                        controller.begin_resize(i32::from(mouse.column), i32::from(mouse.row));
                    }
                    return;
                }
                let action = self
                    .windows
                    .content_mut(id)
                    .and_then(|window| window.view.handle_mouse(mouse));
                if let Some(action) = action {
                    self.apply_view_action(id, action);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let viewport = self.windows.viewport();
                if let Some(id) = self.windows.focused()
                    && let Some(controller) = self.windows.controller_mut(id)
                {
                    controller.update_drag(
                        i32::from(mouse.column),
                        i32::from(mouse.row),
                        viewport,
                    );
                    controller.update_resize(
                        i32::from(mouse.column),
                        i32::from(mouse.row),
                        viewport,
                    );
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.windows.focused()
                    && let Some(controller) = self.windows.controller_mut(id)
                {
                    controller.end_drag();
                    controller.end_resize();
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(id) = self.windows.window_at(mouse.column, mouse.row)
                    && let Some(window) = self.windows.content_mut(id)
                {
                    let _ = window.view.handle_mouse(mouse);
                }
            }
            _ => {}
        }
    }

    fn apply_view_action(&mut self, id: WindowId, action: ChatViewAction) {
        match action {
            ChatViewAction::NewChat => self.open_chat_window(),
            ChatViewAction::SelectModel(model) => {
                if let Some(window) = self.windows.content_mut(id) {
                    window.session.select_model(model);
                }
            }
            ChatViewAction::Submit(text) => self.submit(id, &text),
        }
    }

    fn submit(&mut self, id: WindowId, text: &str) {
        let Some(window) = self.windows.content_mut(id) else {
            return;
        };
        match window.session.submit(text) {
            Ok(prompt) => {
                window.view.clear_input();
                window.view.scroll_to_bottom();
                spawn_completion(
                    Arc::clone(&self.client),
                    id,
                    prompt,
                    self.completion_tx.clone(),
                );
            }
            Err(err) => self.error_dialog.open("Error", err.to_string()),
        }
    }

    fn run_menu_action(&mut self, action: StartMenuAction) {
        match action {
            StartMenuAction::NewChat => self.open_chat_window(),
            StartMenuAction::Source => {
                if let Err(err) = webbrowser::open(env!("CARGO_PKG_REPOSITORY")) {
                    tracing::warn!(%err, "failed to open the source repository");
                }
            }
            StartMenuAction::Credits => self.credits_dialog.open("Credits", credits_body()),
            StartMenuAction::Exit => self.should_quit = true,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let screen = frame.area();
        self.panel.begin_frame();
        self.panel.split_area(screen, PANEL_HEIGHT);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::desktop_bg())),
            screen,
        );

        let focused = self.windows.focused();
        for id in self.windows.render_order() {
            let Some(controller) = self.windows.controller(id) else {
                continue;
            };
            let is_focused = focused == Some(id);
            chrome::render_window_chrome(frame, controller, is_focused);
            let content = controller.content_rect();
            if let Some(window) = self.windows.content_mut(id) {
                window
                    .view
                    .render(frame, content, &window.session, is_focused);
            }
        }

        let items: Vec<PanelItem> = self
            .windows
            .list_active()
            .into_iter()
            .filter_map(|id| {
                self.windows.controller(id).map(|controller| PanelItem {
                    id,
                    label: controller.title().to_string(),
                    focused: focused == Some(id),
                    minimized: controller.is_minimized(),
                })
            })
            .collect();
        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        self.panel
            .render(frame, &items, self.shell.menu_open(), &clock);
        self.panel
            .render_menu(frame, screen, self.shell.menu_open(), self.shell.menu_selected());

        self.credits_dialog.render(frame, screen);
        self.error_dialog.render(frame, screen);
    }
}

fn credits_body() -> String {
    formatdoc! {"
        {name} {version}

        A desktop-style chat window manager
        for terminal shells.

        Replies are generated by the configured
        completion endpoint.
        ",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    }
}
