use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::api::{ApiService, FeedError};
use crate::config::AppConfig;
use crate::internal::feed::{FeedSession, LoadRequest};
use crate::internal::models::DisplayArticle;
use crate::internal::notification::Notification;
use crate::internal::theme_store::{FileStorage, MemoryStorage, ThemePreference, ThemeStore};
use crate::internal::thread::Thread;
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crate::internal::vote::VoteAction;
use crate::utils::theme::TuiTheme;

use ratatui::Frame;
use ratatui::widgets::ListState;

/// Actions/messages sent through the app action channel.
///
/// User-facing variants can be bound to keys in `config.ron`; `PageLoaded`
/// only travels from fetch tasks back to the loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Action {
    Quit,
    NavigateUp,
    NavigateDown,
    OpenBrowser,
    SelectThread(Thread),
    NextThread,
    PrevThread,
    LoadMore,
    Retry,
    Upvote,
    Downvote,
    ToggleTheme,
    ToggleHelp,
    ClearNotification,
    #[serde(skip)]
    PageLoaded(LoadRequest, Result<Vec<DisplayArticle>, FeedError>),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub app_version: String,
    pub config: AppConfig,
    pub api_service: Arc<ApiService>,
    pub feed: FeedSession,
    pub list_state: ListState,
    pub theme_store: ThemeStore,
    theme_rx: watch::Receiver<ThemePreference>,
    pub theme: TuiTheme,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    pub last_spinner_update: Option<tokio::time::Instant>,
    pub show_help: bool,
    pub keybindings: KeyBindingMap,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    #[tracing::instrument(skip_all)]
    pub fn new(config: AppConfig) -> Result<Self> {
        let api_service = ApiService::new(&config)?;
        let theme_store = Self::open_theme_store(&config);
        Ok(Self::with_parts(config, api_service, theme_store))
    }

    /// Assemble an app from explicit collaborators.
    pub fn with_parts(config: AppConfig, api_service: ApiService, theme_store: ThemeStore) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut keybindings = super::keybindings_default::create_default_keybindings();
        keybindings.merge_config(&config.keybindings);

        let theme_rx = theme_store.subscribe();
        let theme = TuiTheme::for_preference(theme_store.preference());

        tracing::info!(
            thread = %config.default_thread,
            theme = %theme_store.preference(),
            credential = api_service.has_credential(),
            "App initialized"
        );

        Self {
            running: true,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            feed: FeedSession::new(config.default_thread),
            config,
            api_service: Arc::new(api_service),
            list_state: ListState::default(),
            theme_store,
            theme_rx,
            theme,
            notification: None,
            spinner_state: 0,
            last_spinner_update: None,
            show_help: false,
            keybindings,
            action_tx,
            action_rx,
        }
    }

    /// Theme store backed by the configured preference file, falling back to
    /// memory when the file cannot be opened.
    pub fn open_theme_store(config: &AppConfig) -> ThemeStore {
        let storage = match &config.preferences_file {
            Some(path) => FileStorage::open(path),
            None => FileStorage::load_or_create(),
        };

        match storage {
            Ok(storage) => ThemeStore::load(Box::new(storage)),
            Err(e) => {
                tracing::error!("Failed to open preferences, theme will not persist: {:#}", e);
                ThemeStore::load(Box::new(MemoryStorage::new()))
            }
        }
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        // Initial load
        self.start();

        let tick = std::time::Duration::from_millis(self.config.ui.tick_rate_ms.max(1));
        let mut event_interval = tokio::time::interval(tick);

        loop {
            // Update spinner animation every 100ms
            let now = tokio::time::Instant::now();
            match self.last_spinner_update {
                Some(last_update) if now.duration_since(last_update).as_millis() >= 100 => {
                    self.spinner_state = self.spinner_state.wrapping_add(1);
                    self.last_spinner_update = Some(now);
                }
                Some(_) => {}
                None => self.last_spinner_update = Some(now),
            }

            if let Some(notification) = &self.notification
                && notification.should_dismiss()
            {
                self.clear_notification();
            }

            self.sync_theme();
            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
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

    /// Issue the first load for the configured thread.
    pub fn start(&mut self) {
        let request = self.feed.start();
        self.spawn_load(request);
    }

    /// Receive one action from the channel and handle it.
    /// Returns false once every sender is gone.
    pub async fn process_next_action(&mut self) -> bool {
        match self.action_rx.recv().await {
            Some(action) => {
                self.handle_action(action);
                true
            }
            None => false,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let context = match self.show_help {
            true => KeyBindingContext::Help,
            false => KeyBindingContext::Feed,
        };

        if let Some(action) = self.keybindings.get_action(&key, context) {
            let _ = self.action_tx.send(action);
        }
    }

    #[tracing::instrument(skip(self, action))]
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NavigateUp => self.select_prev(),
            Action::NavigateDown => self.select_next(),
            Action::OpenBrowser => self.open_selected(),
            Action::SelectThread(thread) => self.select_thread(thread),
            Action::NextThread => self.select_thread(self.feed.thread().next()),
            Action::PrevThread => self.select_thread(self.feed.thread().prev()),
            Action::LoadMore => {
                if let Some(request) = self.feed.load_more() {
                    self.spawn_load(request);
                }
            }
            Action::Retry => {
                if let Some(request) = self.feed.retry() {
                    self.spawn_load(request);
                }
            }
            Action::Upvote => self.vote_selected(VoteAction::Up),
            Action::Downvote => self.vote_selected(VoteAction::Down),
            Action::ToggleTheme => match self.theme_store.toggle() {
                Ok(preference) => {
                    self.sync_theme();
                    self.notify_info(format!("Theme: {}", preference));
                }
                Err(e) => {
                    self.sync_theme();
                    tracing::error!("{:#}", e);
                    self.notify_error("Theme changed but could not be saved");
                }
            },
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ClearNotification => self.clear_notification(),
            Action::PageLoaded(request, result) => self.on_page_loaded(request, result),
        }
    }

    fn select_thread(&mut self, thread: Thread) {
        if let Some(request) = self.feed.select_thread(thread) {
            self.list_state.select(None);
            self.spawn_load(request);
        }
    }

    /// Run the fetch on the runtime and post the result back to the loop.
    /// Results for a superseded request are dropped at the source.
    fn spawn_load(&mut self, request: LoadRequest) {
        tracing::debug!(page = request.page, thread = %request.thread, "spawning feed load");
        let api = self.api_service.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = api.fetch_page(request.page, request.thread).await;
            if request.is_superseded() {
                tracing::debug!(page = request.page, thread = %request.thread, "load superseded");
                return;
            }
            let _ = tx.send(Action::PageLoaded(request, result));
        });
    }

    fn on_page_loaded(&mut self, request: LoadRequest, result: Result<Vec<DisplayArticle>, FeedError>) {
        let failure = result.as_ref().err().map(|e| e.to_string());
        if !self.feed.complete(&request, result) {
            return;
        }

        match failure {
            Some(message) => {
                tracing::error!(page = request.page, thread = %request.thread, "{}", message);
                self.notify_error(message);
            }
            None => {
                if self.list_state.selected().is_none() && !self.feed.articles().is_empty() {
                    self.list_state.select(Some(0));
                }
            }
        }
    }

    /// Apply theme changes published by the store.
    fn sync_theme(&mut self) {
        if self.theme_rx.has_changed().unwrap_or(false) {
            let preference = *self.theme_rx.borrow_and_update();
            self.theme = TuiTheme::for_preference(preference);
            tracing::debug!(theme = %preference, "Applied theme");
        }
    }

    pub fn selected_article(&self) -> Option<&DisplayArticle> {
        self.list_state
            .selected()
            .and_then(|i| self.feed.articles().get(i))
    }

    fn vote_selected(&mut self, action: VoteAction) {
        let Some(id) = self.selected_article().map(|a| a.id.clone()) else {
            return;
        };
        if let Some(counter) = self.feed.vote(&id, action) {
            tracing::debug!(id = %id, count = counter.count(), "vote");
        }
    }

    fn open_selected(&mut self) {
        let Some(article) = self.selected_article() else {
            return;
        };
        if !article.has_link() {
            return;
        }

        let url = article.url.clone();
        match open::that(&url) {
            Ok(()) => tracing::info!(url = %url, "Opened article in browser"),
            Err(e) => {
                tracing::error!("Failed to open {}: {}", url, e);
                self.notify_error(format!("Failed to open browser: {}", e));
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.feed.articles().len();
        if len == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        let len = self.feed.articles().len();
        if len == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn get_spinner_char(&self) -> &'static str {
        const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER_FRAMES[self.spinner_state % SPINNER_FRAMES.len()]
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }
}
