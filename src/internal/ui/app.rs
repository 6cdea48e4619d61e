use anyhow::Result;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::PotApi;
use crate::config::{AppConfig, BackendKind};
use crate::internal::manager::{Effects, PotManager};
use crate::internal::modal::ConfirmChoice;
use crate::internal::models::Pot;
use crate::internal::notification::Notification;
use crate::internal::sync::{RequestResult, SyncBackend};
use crate::internal::ui::keybindings::{Command, KeyBindingContext, KeyBindingMap};
use crate::internal::ui::keybindings_default::create_default_keybindings;
use crate::internal::ui::log_viewer::LogViewer;
use crate::utils::url::is_openable;

use ratatui::Frame;
use ratatui::widgets::ListState;

/// Input modes for the UI, derived from what is open.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Form,
    Confirm,
}

/// Messages sent through the app action channel.
#[derive(Debug, Clone)]
pub enum Action {
    Command(Command),
    Completed { ticket: u64, result: RequestResult },
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub manager: PotManager,
    pub list_state: ListState,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    pub last_spinner_update: Option<tokio::time::Instant>,
    pub show_help: bool,
    pub config: AppConfig,
    pub keybindings: KeyBindingMap,
    pub log_viewer: LogViewer,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    /// Compose the app with the backend selected in `config`.
    #[tracing::instrument(skip(config), fields(backend = %config.backend))]
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = match config.backend {
            BackendKind::Remote => {
                let api = PotApi::new(&config.network)?;
                tracing::info!("Using remote pot API at {}", api.base_url());
                SyncBackend::Remote(api)
            }
            BackendKind::Local => {
                tracing::info!("Using in-memory pot list; changes are lost on exit");
                SyncBackend::Local
            }
        };
        let rules = config.rules_for(config.backend);

        Ok(Self::with_manager(PotManager::new(backend, rules), config))
    }

    pub fn with_manager(manager: PotManager, config: AppConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut keybindings = create_default_keybindings();
        if let Some(custom_bindings) = &config.keybindings {
            keybindings.merge_config(custom_bindings);
        }

        let log_viewer = LogViewer::new(config.logging.directory().to_string());

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            manager,
            list_state: ListState::default(),
            notification: None,
            spinner_state: 0,
            last_spinner_update: None,
            show_help: false,
            config,
            keybindings,
            log_viewer,
            action_tx,
            action_rx,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match (
            self.manager.confirmation().is_some(),
            self.manager.modal.is_open(),
        ) {
            (true, _) => InputMode::Confirm,
            (false, true) => InputMode::Form,
            (false, false) => InputMode::Normal,
        }
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub fn notify_warning(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::warning(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    pub fn selected_pot(&self) -> Option<&Pot> {
        self.list_state
            .selected()
            .and_then(|i| self.manager.store.pots().get(i))
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_pot().map(|p| p.id.clone())
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        // Initial load
        let effects = self.manager.refresh();
        self.apply(effects);

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            // Update spinner animation every 100ms
            let now = tokio::time::Instant::now();
            match self.last_spinner_update {
                Some(last_update) => {
                    if now.duration_since(last_update).as_millis() >= 100 {
                        self.spinner_state = self.spinner_state.wrapping_add(1);
                        self.last_spinner_update = Some(now);
                    }
                }
                None => {
                    self.last_spinner_update = Some(now);
                }
            }

            // Auto-dismiss expired notifications
            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.clear_notification();
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                        && key.kind == KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    /// Show the notice and run every dispatched request on its own task.
    fn apply(&mut self, effects: Effects) {
        if let Some(notice) = effects.notice {
            self.notification = Some(notice);
        }

        for dispatch in effects.requests {
            let backend = self.manager.backend().clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                let result = backend.run(&dispatch.request).await;
                let _ = tx.send(Action::Completed {
                    ticket: dispatch.ticket,
                    result,
                });
            });
        }

        self.clamp_selection();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // If log viewer is visible, it traps input
        if self.log_viewer.visible {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => self.log_viewer.toggle(),
                KeyCode::Char('j') | KeyCode::Down => self.log_viewer.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => self.log_viewer.scroll_up(),
                KeyCode::Char('G') => self.log_viewer.scroll_to_bottom(),
                KeyCode::Tab => self.log_viewer.next_tab(),
                _ => {}
            }
            return;
        }

        match self.input_mode() {
            InputMode::Confirm => self.handle_confirm_input(key),
            InputMode::Form => self.handle_form_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_confirm_input(&mut self, key: KeyEvent) {
        let choice = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ConfirmChoice::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ConfirmChoice::Cancel,
            _ => return,
        };
        let effects = self.manager.resolve_delete(choice);
        self.apply(effects);
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.manager.cancel(),
            KeyCode::Enter => {
                let effects = self.manager.save();
                self.apply(effects);
            }
            KeyCode::Tab | KeyCode::Down => self.manager.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.manager.form.focus_prev(),
            KeyCode::Backspace => self.manager.form.pop_char(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.manager.cancel()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.manager.form.push_char(c)
            }
            _ => {}
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        // Help overlay swallows everything but its own close keys
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
            ) {
                self.show_help = false;
            }
            return;
        }

        if key.code == KeyCode::Esc && self.notification.is_some() {
            self.clear_notification();
            return;
        }

        if let Some(command) = self.keybindings.get_command(&key, KeyBindingContext::List) {
            self.handle_command(command);
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::NavigateUp => self.select_prev(),
            Command::NavigateDown => self.select_next(),
            Command::Add => self.manager.open_create(),
            Command::Edit => {
                if let Some(id) = self.selected_id() {
                    let effects = self.manager.open_edit(&id);
                    self.apply(effects);
                }
            }
            Command::Delete => {
                if let Some(id) = self.selected_id() {
                    let effects = self.manager.request_delete(&id);
                    self.apply(effects);
                }
            }
            Command::Refresh => {
                let effects = self.manager.refresh();
                match effects.requests.is_empty() {
                    true => self.notify_info("Local pots are always up to date"),
                    false => self.apply(effects),
                }
            }
            Command::OpenImage => {
                let image = self.selected_pot().map(|p| p.image.clone());
                match image.as_deref().map(str::trim) {
                    Some("") => self.notify_warning("This pot has no image URL"),
                    Some(url) if !is_openable(url) => {
                        self.notify_warning(format!("Not a web link: {}", url))
                    }
                    Some(url) => {
                        if let Err(e) = open::that(url) {
                            tracing::error!("Failed to open {}: {}", url, e);
                            self.notify_error(format!("Could not open {}", url));
                        }
                    }
                    None => {}
                }
            }
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::ToggleLogs => self.log_viewer.toggle(),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Command(command) => self.handle_command(command),
            Action::Completed { ticket, result } => {
                let effects = self.manager.complete(ticket, result);
                self.apply(effects);
            }
        }
    }

    /// Keep the selection on a real row after the list changed underneath it.
    fn clamp_selection(&mut self) {
        let len = self.manager.store.len();
        let selected = match (len, self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.list_state.select(selected);
    }

    fn select_next(&mut self) {
        let len = self.manager.store.len();
        if len == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        let len = self.manager.store.len();
        if len == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(n) => n - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn get_spinner_char(&self) -> &'static str {
        const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER_FRAMES[self.spinner_state % SPINNER_FRAMES.len()]
    }

    pub fn loading_description(&self) -> Option<String> {
        let store = &self.manager.store;
        match (self.manager.is_fetching(), store.in_flight()) {
            (_, n) if n > 0 => Some(format!("Saving {} change(s)...", n)),
            (true, _) => Some("Loading pots...".to_string()),
            _ => None,
        }
    }

    pub fn ui(&mut self, f: &mut Frame) {
        self.clamp_selection();
        super::view::draw(self, f);
    }
}
