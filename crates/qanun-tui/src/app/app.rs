use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use qanun_config::Config;

use crate::api::{ApiClient, ChatBackend};
use crate::app::layout::{contains, AppLayout, MIN_WIDTH_FOR_SIDEBAR, SIDEBAR_WIDTH};
use crate::app::state::{AppState, Focus};
use crate::branding::{APP_NAME, APP_SHORT_NAME, APP_VERSION, DICTATION_UNSUPPORTED};
use crate::components::{
    AlertDialog, AlertType, ExportDialog, HelpDialog, KeyboardView, ModeBar, Prompt,
    RecordingIndicator, Sidebar, Spinner, TranscriptView,
};
use crate::context::ChatController;
use crate::event::{CustomEvent, Event};
use crate::export::{self, default_filename, resolve_export_path, write_export};
use crate::input::{
    ArabicKeyboard, CommandRecognizer, Dictation, DictationOutcome, KeyAction,
    ModeSelector, SpeechRecognizer,
};
use crate::request::RequestLane;
use crate::terminal;
use crate::theme::Theme;

const MAX_EVENTS_PER_FRAME: usize = 256;
const SCROLL_STEP: usize = 3;
const PAGE_STEP: usize = 10;

pub struct App {
    state: AppState,
    terminal: terminal::Tui,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
    lane: RequestLane,
    theme: Theme,
    base_url: String,
    chat: ChatController,
    modes: ModeSelector,
    keyboard: ArabicKeyboard,
    dictation: Dictation,
    sidebar: Sidebar,
    sidebar_visible: bool,
    focus: Focus,
    alert: AlertDialog,
    help: HelpDialog,
    export: ExportDialog,
    spinner: Spinner,
    export_dir: Option<PathBuf>,
    layout: AppLayout,
    tick_rate: Duration,
    last_tick: Instant,
    event_caused_change: bool,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = ApiClient::with_options(&config.base_url(), config.timeout(), config.user_id())?;
        let base_url = client.base_url().to_string();
        let backend: Arc<dyn ChatBackend> = Arc::new(client);

        let (event_tx, event_rx) = mpsc::channel();
        let lane = RequestLane::spawn(backend, event_tx.clone())?;

        let recognizer = config
            .dictation_command()
            .and_then(CommandRecognizer::new)
            .map(|r| Arc::new(r) as Arc<dyn SpeechRecognizer>);
        if recognizer.is_none() {
            tracing::info!("no dictation command configured; voice input disabled");
        }

        let theme = Theme::by_name(config.theme_name()).unwrap_or_else(|| {
            tracing::warn!(theme = config.theme_name(), "unknown theme, using dark");
            Theme::dark()
        });
        let tick_rate = Duration::from_millis(config.tick_rate_ms().max(1));

        let terminal = terminal::init()?;
        spawn_input_thread(event_tx.clone(), tick_rate);

        let mut app = Self {
            state: AppState::default(),
            terminal,
            event_tx,
            event_rx,
            lane,
            spinner: Spinner::new(theme.accent),
            theme,
            base_url,
            chat: ChatController::new(),
            modes: ModeSelector::new(config.default_mode()),
            keyboard: ArabicKeyboard::new(),
            dictation: Dictation::new(recognizer),
            sidebar: Sidebar::new(),
            sidebar_visible: config.show_sidebar(),
            focus: Focus::Input,
            alert: AlertDialog::default(),
            help: HelpDialog::new(),
            export: ExportDialog::new(),
            export_dir: config.export_dir.clone(),
            layout: AppLayout::default(),
            tick_rate,
            last_tick: Instant::now(),
            event_caused_change: true,
        };

        if let Err(error) = terminal::reset_title() {
            tracing::debug!(%error, "failed to reset terminal title");
        }
        app.request_history();
        Ok(app)
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let result = self.event_loop();
        self.dictation.stop();
        terminal::restore()?;
        result
    }

    fn event_loop(&mut self) -> anyhow::Result<()> {
        self.draw()?;

        while self.state != AppState::Exiting {
            let mut should_draw = false;

            let first_event = match self.event_rx.recv_timeout(self.tick_rate) {
                Ok(event) => Some(event),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };

            if let Some(event) = first_event {
                self.handle_event(event)?;
                should_draw |= self.event_caused_change;

                for _ in 0..MAX_EVENTS_PER_FRAME {
                    let next = match self.event_rx.try_recv() {
                        Ok(next) => next,
                        Err(mpsc::TryRecvError::Empty) => break,
                        Err(mpsc::TryRecvError::Disconnected) => {
                            self.state = AppState::Exiting;
                            break;
                        }
                    };
                    self.handle_event(next)?;
                    should_draw |= self.event_caused_change;
                }
            }

            if should_draw {
                self.draw()?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        self.event_caused_change = true;

        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => {}
            Event::Tick => self.handle_tick(),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Custom(custom) => self.handle_custom(custom),
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        let elapsed = self.last_tick.elapsed();
        self.last_tick = Instant::now();
        let animating = self.chat.is_busy() || self.chat.transcript().has_typing();
        let advanced = self.spinner.tick(elapsed.as_millis() as u64);
        self.event_caused_change = animating && advanced;
    }

    // ---- keyboard ----

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            self.event_caused_change = false;
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state = AppState::Exiting;
            return;
        }

        if self.alert.is_open() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert.close();
            }
            return;
        }
        if self.help.is_open() {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')
            ) {
                self.help.close();
            }
            return;
        }
        if self.export.is_open() {
            self.handle_export_key(key);
            return;
        }

        if self.handle_global_key(key) {
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Keyboard => self.handle_keyboard_key(key),
        }
    }

    /// Shortcuts that work regardless of focus.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::F(1) => self.help.open(),
            KeyCode::Char('l') if ctrl => self.clear_chat(),
            KeyCode::Char('n') if ctrl => self.new_session(),
            KeyCode::Char('k') if ctrl => self.toggle_keyboard(),
            KeyCode::Char('r') if ctrl => self.toggle_dictation(),
            KeyCode::Char('d') if ctrl => self.export.open(),
            KeyCode::Char('b') if ctrl => self.toggle_sidebar(),
            KeyCode::Char('o') if ctrl => self.modes.cycle(),
            KeyCode::Char(c @ '1'..='6') if alt => {
                self.modes.activate_slot(c as usize - '0' as usize);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self
                    .focus
                    .next(self.layout.sidebar.is_some(), self.keyboard.is_visible());
            }
            KeyCode::Esc => self.escape(),
            KeyCode::PageUp => self.chat.transcript_mut().scroll_up(PAGE_STEP),
            KeyCode::PageDown => self.chat.transcript_mut().scroll_down(PAGE_STEP),
            _ => return false,
        }
        true
    }

    fn escape(&mut self) {
        if self.dictation.is_recording() {
            self.dictation.stop();
        } else if self.keyboard.is_visible() {
            self.keyboard.close();
            self.focus = Focus::Input;
        } else {
            self.focus = Focus::Input;
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let newline = key
            .modifiers
            .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
        match key.code {
            KeyCode::Enter if newline => self.chat.input_mut().insert_char('\n'),
            KeyCode::Enter => self.submit_message(),
            KeyCode::Char('?') if self.chat.input().is_empty() => self.help.open(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.chat.input_mut().insert_char(c)
            }
            KeyCode::Backspace => self.chat.input_mut().backspace(),
            KeyCode::Delete => self.chat.input_mut().delete(),
            KeyCode::Left => self.chat.input_mut().move_left(),
            KeyCode::Right => self.chat.input_mut().move_right(),
            KeyCode::Home => self.chat.input_mut().move_home(),
            KeyCode::End => self.chat.input_mut().move_end(),
            KeyCode::Up => self.chat.transcript_mut().scroll_up(1),
            KeyCode::Down => self.chat.transcript_mut().scroll_down(1),
            _ => self.event_caused_change = false,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let len = self.chat.history().sessions().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.sidebar.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.sidebar.move_down(len),
            KeyCode::Enter => self.select_session(self.sidebar.cursor()),
            _ => self.event_caused_change = false,
        }
    }

    fn handle_keyboard_key(&mut self, key: KeyEvent) {
        // Rows are laid out right to left.
        match key.code {
            KeyCode::Up => self.keyboard.move_up(),
            KeyCode::Down => self.keyboard.move_down(),
            KeyCode::Left => self.keyboard.move_left(),
            KeyCode::Right => self.keyboard.move_right(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let action = self.keyboard.press_selected(self.chat.input_mut());
                self.after_key_action(action);
            }
            KeyCode::Backspace => self.chat.input_mut().pop_char(),
            _ => self.event_caused_change = false,
        }
    }

    fn after_key_action(&mut self, action: KeyAction) {
        if action == KeyAction::Close {
            self.focus = Focus::Input;
        }
    }

    fn handle_export_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.export.close(),
            KeyCode::Enter => self.save_export(),
            KeyCode::Tab | KeyCode::BackTab => self.export.toggle_format(),
            KeyCode::Backspace => self.export.handle_backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.export.handle_input(c)
            }
            _ => self.event_caused_change = false,
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.export.is_open() {
            text.chars().for_each(|c| self.export.handle_input(c));
        } else if !self.alert.is_open() && !self.help.is_open() {
            self.chat.input_mut().insert_str(&text.replace("\r\n", "\n"));
            self.focus = Focus::Input;
        }
    }

    // ---- mouse ----

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollUp if contains(self.layout.transcript, x, y) => {
                self.chat.transcript_mut().scroll_up(SCROLL_STEP)
            }
            MouseEventKind::ScrollDown if contains(self.layout.transcript, x, y) => {
                self.chat.transcript_mut().scroll_down(SCROLL_STEP)
            }
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(x, y),
            _ => self.event_caused_change = false,
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        if self.alert.is_open() || self.help.is_open() || self.export.is_open() {
            self.event_caused_change = false;
            return;
        }

        if let Some(area) = self.layout.sidebar {
            let len = self.chat.history().sessions().len();
            if let Some(index) = self.sidebar.row_at(area, x, y, len) {
                self.focus = Focus::Sidebar;
                self.select_session(index);
                return;
            }
        }

        if self.keyboard.is_visible() && contains(self.layout.keyboard, x, y) {
            if let Some((row, col)) = KeyboardView::key_at(&self.keyboard, self.layout.keyboard, x, y)
            {
                self.keyboard.set_cursor(row, col);
                let action = self.keyboard.press_selected(self.chat.input_mut());
                self.focus = Focus::Keyboard;
                self.after_key_action(action);
            }
            return;
        }

        if let Some(mode) = ModeBar::mode_at(self.layout.mode_bar, x, y) {
            self.modes.activate(mode);
            return;
        }

        if contains(self.layout.prompt, x, y) {
            self.focus = Focus::Input;
            return;
        }

        self.event_caused_change = false;
    }

    // ---- actions ----

    fn submit_message(&mut self) {
        let text = self.chat.input().text().to_string();
        let Some(ticket) = self.chat.begin_send(&text, self.modes.active()) else {
            return;
        };
        tracing::debug!(mode = %ticket.mode, chars = ticket.message.chars().count(), "sending question");
        self.lane.submit(move |backend| CustomEvent::SendFinished {
            result: backend.send_chat(&ticket.message, ticket.mode),
            ticket,
        });
    }

    fn clear_chat(&mut self) {
        self.chat.begin_clear();
        self.lane
            .submit(|backend| CustomEvent::ClearFinished(backend.clear()));
        self.request_history();
    }

    fn new_session(&mut self) {
        self.chat.begin_new_session();
        self.sidebar = Sidebar::new();
        self.lane
            .submit(|backend| CustomEvent::NewSessionFinished(backend.new_session()));
        self.request_history();
    }

    fn select_session(&mut self, index: usize) {
        let Some(session_id) = self.chat.history().get(index).map(|s| s.id.clone()) else {
            self.event_caused_change = false;
            return;
        };
        let ticket = self.chat.begin_select(&session_id);
        self.lane.submit(move |backend| CustomEvent::SessionLoaded {
            result: backend.get_session(&ticket.session_id),
            ticket,
        });
    }

    fn request_history(&mut self) {
        let ticket = self.chat.begin_refresh();
        self.lane.submit(move |backend| CustomEvent::HistoryLoaded {
            ticket,
            result: backend.list_history(),
        });
    }

    fn toggle_keyboard(&mut self) {
        self.focus = if self.keyboard.toggle() {
            Focus::Keyboard
        } else {
            Focus::Input
        };
    }

    fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible && self.focus == Focus::Sidebar {
            self.focus = Focus::Input;
        }
    }

    fn toggle_dictation(&mut self) {
        if !self.dictation.is_supported() {
            self.alert.show(AlertType::Warning, DICTATION_UNSUPPORTED);
            return;
        }
        match self.dictation.toggle(&self.event_tx) {
            Ok(_) => {}
            Err(error) => {
                tracing::error!(%error, "failed to start dictation");
                self.alert.show(AlertType::Error, &error.to_string());
            }
        }
    }

    fn save_export(&mut self) {
        let format = self.export.format();
        let filename = match self.export.filename().trim() {
            "" => default_filename(format),
            name => name.to_string(),
        };
        self.export.close();

        let path = resolve_export_path(self.export_dir.as_deref(), &filename);
        let content = export::render(self.chat.transcript(), format);
        match write_export(&path, &content) {
            Ok(written) => {
                self.alert.show(
                    AlertType::Success,
                    &format!("تم حفظ المحادثة في\n{}", written.display()),
                );
            }
            Err(error) => {
                tracing::error!(%error, "transcript export failed");
                self.alert.show(AlertType::Error, &format!("{:#}", error));
            }
        }
    }

    // ---- completions ----

    fn handle_custom(&mut self, event: CustomEvent) {
        match event {
            CustomEvent::SendFinished { ticket, result } => {
                if self.chat.finish_send(ticket, result).refreshes_history() {
                    self.request_history();
                }
            }
            CustomEvent::ClearFinished(result) => self.chat.finish_clear(result),
            CustomEvent::NewSessionFinished(result) => self.chat.finish_new_session(result),
            CustomEvent::HistoryLoaded { ticket, result } => {
                if self.chat.finish_refresh(ticket, result) {
                    self.sidebar.follow_active(self.chat.history());
                }
            }
            CustomEvent::SessionLoaded { ticket, result } => {
                if self.chat.finish_select(ticket, result) {
                    self.sidebar.follow_active(self.chat.history());
                }
            }
            CustomEvent::Dictation(event) => {
                let outcome = self.dictation.handle_event(event, self.chat.input_mut());
                if let Some(DictationOutcome::Transcript(_)) = outcome {
                    self.focus = Focus::Input;
                }
            }
        }
    }

    // ---- drawing ----

    fn draw(&mut self) -> anyhow::Result<()> {
        let App {
            terminal,
            theme,
            base_url,
            chat,
            modes,
            keyboard,
            dictation,
            sidebar,
            sidebar_visible,
            focus,
            alert,
            help,
            export,
            spinner,
            layout,
            ..
        } = self;

        terminal.draw(|frame| {
            let area = frame.size();
            let show_sidebar = *sidebar_visible && area.width >= MIN_WIDTH_FOR_SIDEBAR;
            let main_width = if show_sidebar {
                area.width - SIDEBAR_WIDTH
            } else {
                area.width
            };
            let keyboard_height = if keyboard.is_visible() {
                KeyboardView::height(keyboard)
            } else {
                0
            };
            let computed = AppLayout::compute(
                area,
                show_sidebar,
                dictation.is_recording(),
                keyboard_height,
                Prompt::height(chat.input(), main_width),
            );
            *layout = computed;

            frame.render_widget(
                Block::default().style(Style::default().bg(theme.background)),
                area,
            );
            render_header(frame, computed.header, theme, base_url);
            ModeBar::render(frame, computed.mode_bar, modes, theme);

            let lines = TranscriptView::build_lines(
                chat.transcript(),
                computed.transcript.width,
                theme,
                spinner.frame(),
            );
            let viewport = computed.transcript.height.saturating_sub(1) as usize;
            chat.transcript_mut()
                .clamp_scroll(TranscriptView::max_scroll_back(lines.len(), viewport));
            TranscriptView::render(
                frame,
                computed.transcript,
                lines,
                chat.transcript().scroll_back(),
                theme,
            );

            RecordingIndicator::render(frame, computed.recording, dictation, theme);
            if keyboard.is_visible() {
                KeyboardView::render(
                    frame,
                    computed.keyboard,
                    keyboard,
                    theme,
                    *focus == Focus::Keyboard,
                );
            }
            let busy = chat.is_busy().then(|| spinner.frame());
            Prompt::render(
                frame,
                computed.prompt,
                chat.input(),
                modes,
                busy,
                theme,
                *focus == Focus::Input,
            );
            render_footer(frame, computed.footer, theme);

            if let Some(sidebar_area) = computed.sidebar {
                sidebar.sync(
                    chat.history().sessions().len(),
                    Sidebar::body_area(sidebar_area).height as usize,
                );
                sidebar.render(
                    frame,
                    sidebar_area,
                    chat.history(),
                    theme,
                    *focus == Focus::Sidebar,
                );
            }

            export.render(frame, area, theme);
            help.render(frame, area, theme);
            alert.render(frame, area, theme);
        })?;
        Ok(())
    }
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, base_url: &str) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} {} ", APP_SHORT_NAME, APP_VERSION),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("· {}", base_url), Style::default().fg(theme.text_muted)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background_panel)),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let hints = [
        ("Enter", "إرسال"),
        ("^N", "جديدة"),
        ("^L", "مسح"),
        ("^K", "لوحة المفاتيح"),
        ("^R", "إملاء"),
        ("^D", "تنزيل"),
        ("^B", "السجل"),
        ("F1", "مساعدة"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {}", key), Style::default().fg(theme.primary)));
        spans.push(Span::styled(
            format!(" {} ", label),
            Style::default().fg(theme.text_muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn spawn_input_thread(event_tx: Sender<Event>, tick_rate: Duration) {
    thread::spawn(move || {
        let mut last_tick = Instant::now();

        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(tick_rate);

            if crossterm::event::poll(timeout).unwrap_or(false) {
                let event = match crossterm::event::read() {
                    Ok(crossterm::event::Event::Key(key)) => Some(Event::Key(key)),
                    Ok(crossterm::event::Event::Mouse(mouse))
                        if !matches!(mouse.kind, MouseEventKind::Moved) =>
                    {
                        Some(Event::Mouse(mouse))
                    }
                    Ok(crossterm::event::Event::Resize(w, h)) => Some(Event::Resize(w, h)),
                    Ok(crossterm::event::Event::Paste(s)) => Some(Event::Paste(s)),
                    _ => None,
                };

                if let Some(e) = event {
                    if event_tx.send(e).is_err() {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if event_tx.send(Event::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
    });
}
