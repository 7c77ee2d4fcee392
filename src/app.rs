//! Application state management for WeatherLens
//!
//! This module contains the main application state, handling keyboard input,
//! snapshot loading, assistant questions and transitions between views. Work
//! that waits on a source is queued as a [`PendingAction`] so the event loop
//! can draw the loading or thinking state before awaiting it.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, info};

use crate::assistant::{APOLOGY, SUGGESTIONS};
use crate::cli::StartupConfig;
use crate::data::{fetch_snapshot, CityQuery, Snapshot, Units, WeatherSource};
use crate::export::write_export;
use crate::store::{CityHistory, Store};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Fetching a snapshot
    Loading,
    /// Snapshot loaded, tabs visible
    Dashboard,
    /// Fetch failed; holds the message shown with the retry prompt
    Error(String),
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Current,
    Forecast,
    AirQuality,
    Assistant,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Current, Tab::Forecast, Tab::AirQuality, Tab::Assistant];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Current => "🌡️ Current",
            Tab::Forecast => "📅 Forecast",
            Tab::AirQuality => "🌫️ Air Quality",
            Tab::Assistant => "🧠 Assistant",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which forecast the forecast tab shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastView {
    Daily,
    Hourly,
}

/// Where typed characters go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Editing the city name
    City,
    /// Typing a question for the assistant
    Question,
}

/// State of the assistant panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantState {
    Idle,
    Thinking,
    Answered(String),
    /// The reply could not be produced; holds the apology shown instead
    Failed(String),
}

/// Work queued by key handling for the event loop to await
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    LoadSnapshot,
    Ask(String),
    Export,
}

/// Main application struct managing state and data
pub struct App<S> {
    /// Current application state/view
    pub state: AppState,
    /// Selected dashboard tab
    pub tab: Tab,
    /// Daily or hourly forecast
    pub forecast_view: ForecastView,
    pub input_mode: InputMode,
    /// Text being typed in City or Question mode
    pub input: String,
    /// City the snapshot is for
    pub city: String,
    /// Latest snapshot, replaced whole on every load
    pub snapshot: Option<Snapshot>,
    pub assistant: AssistantState,
    /// Last question sent to the assistant
    pub last_question: Option<String>,
    /// Recently searched cities
    pub history: CityHistory,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the forecast list
    pub forecast_scroll: u16,
    /// Timestamp of last successful load
    pub last_refresh: Option<DateTime<Local>>,
    /// One-line message for the status bar (export results)
    pub status: Option<String>,
    pub units: Units,
    lang: String,
    pending: Option<PendingAction>,
    /// Position while cycling history or suggestions with ↑/↓
    recall_index: Option<usize>,
    source: S,
    store: Option<Store>,
    export_dir: PathBuf,
}

impl<S: WeatherSource> App<S> {
    /// Creates an App for the configured city and queues its first load
    pub fn new(source: S, config: &StartupConfig, store: Option<Store>) -> Self {
        let history = store.as_ref().map(CityHistory::load).unwrap_or_default();

        Self {
            state: AppState::Loading,
            tab: Tab::Current,
            forecast_view: ForecastView::Daily,
            input_mode: InputMode::Normal,
            input: String::new(),
            city: config.city.clone(),
            snapshot: None,
            assistant: AssistantState::Idle,
            last_question: None,
            history,
            should_quit: false,
            show_help: false,
            forecast_scroll: 0,
            last_refresh: None,
            status: None,
            units: config.units,
            lang: config.lang.clone(),
            pending: Some(PendingAction::LoadSnapshot),
            recall_index: None,
            source,
            store,
            export_dir: config.export_dir.clone(),
        }
    }

    /// Query for the current city
    pub fn query(&self) -> CityQuery {
        CityQuery::new(self.city.clone())
            .with_units(self.units)
            .with_lang(self.lang.clone())
    }

    /// Removes and returns the queued action, if any
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Switches to `city`, remembering it, and queues a load. Blank names are ignored.
    pub fn request_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        self.city = city.to_string();
        self.history.record(city);
        if let Some(store) = &self.store {
            self.history.save(store);
        }
        self.request_snapshot();
    }

    /// Queues a reload of the current city (refresh, or retry after an error)
    pub fn request_snapshot(&mut self) {
        self.state = AppState::Loading;
        self.status = None;
        self.pending = Some(PendingAction::LoadSnapshot);
    }

    /// Queues a question for the assistant.
    ///
    /// Blank questions, and questions sent while a reply is pending, are ignored.
    pub fn submit_question(&mut self, question: &str) {
        let question = question.trim();
        if question.is_empty() || self.assistant == AssistantState::Thinking {
            return;
        }

        self.assistant = AssistantState::Thinking;
        self.last_question = Some(question.to_string());
        self.pending = Some(PendingAction::Ask(question.to_string()));
    }

    /// Runs a queued action to completion
    pub async fn run(&mut self, action: PendingAction) {
        match action {
            PendingAction::LoadSnapshot => self.load_snapshot().await,
            PendingAction::Ask(question) => self.answer(&question).await,
            PendingAction::Export => self.export(),
        }
    }

    /// Runs the queued action, if any
    pub async fn run_pending(&mut self) {
        if let Some(action) = self.take_pending() {
            self.run(action).await;
        }
    }

    /// Fetches a snapshot for the current city.
    ///
    /// On success the snapshot replaces the previous one and the dashboard is
    /// shown. On failure the snapshot is cleared and the error view shows the
    /// source's message.
    pub async fn load_snapshot(&mut self) {
        self.state = AppState::Loading;
        let query = self.query();

        match fetch_snapshot(&self.source, &query).await {
            Ok(snapshot) => {
                info!("Loaded snapshot for {}", query.city);
                self.snapshot = Some(snapshot);
                self.last_refresh = Some(Local::now());
                self.forecast_scroll = 0;
                self.state = AppState::Dashboard;
            }
            Err(e) => {
                error!("Failed to load {}: {}", query.city, e);
                self.snapshot = None;
                self.state = AppState::Error(e.to_string());
            }
        }
    }

    /// Asks the source, recording the reply or an apology
    async fn answer(&mut self, question: &str) {
        self.assistant = AssistantState::Thinking;
        let query = self.query();
        let current = self.snapshot.as_ref().map(|s| &s.current);

        let result = self.source.ask(question, current, &query).await;
        self.assistant = match result {
            Ok(reply) => AssistantState::Answered(reply),
            Err(e) => {
                error!("Assistant failed: {}", e);
                AssistantState::Failed(APOLOGY.to_string())
            }
        };
    }

    /// Writes the loaded snapshot to the export directory
    pub fn export(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            self.status = Some("Nothing to export yet".to_string());
            return;
        };

        self.status = Some(match write_export(&self.export_dir, snapshot, Utc::now()) {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => {
                error!("Export failed: {}", e);
                e.to_string()
            }
        });
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (Esc also quits from the error view)
    /// - `Tab`/`→`/`l`, `BackTab`/`←`/`h`: Next/previous tab
    /// - `1`-`4`: Select tab
    /// - `/` or `c`: Edit the city
    /// - `a`: Ask the assistant
    /// - `f`: Toggle daily/hourly forecast
    /// - `j`/`k`: Scroll the forecast
    /// - `r`: Refresh (retry in the error view)
    /// - `e`: Export the snapshot
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode != InputMode::Normal {
            self.handle_input_key(key_event);
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Error(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('r') | KeyCode::Enter => self.request_snapshot(),
                KeyCode::Char('/') | KeyCode::Char('c') => self.start_input(InputMode::City),
                _ => {}
            },
            AppState::Dashboard => self.handle_dashboard_key(key_event),
        }
    }

    fn handle_dashboard_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.tab = self.tab.previous()
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
            }
            KeyCode::Char('/') | KeyCode::Char('c') => self.start_input(InputMode::City),
            KeyCode::Char('a') => {
                self.tab = Tab::Assistant;
                self.start_input(InputMode::Question);
            }
            KeyCode::Char('f') => {
                self.forecast_view = match self.forecast_view {
                    ForecastView::Daily => ForecastView::Hourly,
                    ForecastView::Hourly => ForecastView::Daily,
                };
                self.forecast_scroll = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('r') => self.request_snapshot(),
            KeyCode::Char('e') => self.pending = Some(PendingAction::Export),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn start_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
        self.recall_index = None;
    }

    fn handle_input_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                let mode = self.input_mode;
                self.input_mode = InputMode::Normal;
                match mode {
                    InputMode::City => self.request_city(&text),
                    InputMode::Question => self.submit_question(&text),
                    InputMode::Normal => {}
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up => self.recall(true),
            KeyCode::Down => self.recall(false),
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Cycles the input through history (city) or suggestions (question)
    fn recall(&mut self, older: bool) {
        let options: Vec<&str> = match self.input_mode {
            InputMode::City => self.history.cities().iter().map(String::as_str).collect(),
            InputMode::Question => SUGGESTIONS.to_vec(),
            InputMode::Normal => return,
        };
        if options.is_empty() {
            return;
        }

        let index = match (self.recall_index, older) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.recall_index = Some(index);
        self.input = options[index].to_string();
    }

    /// Scrolls the forecast list up, stopping at 0
    pub fn scroll_up(&mut self) {
        self.forecast_scroll = self.forecast_scroll.saturating_sub(1);
    }

    /// Scrolls the forecast list down, stopping at the last entry
    pub fn scroll_down(&mut self) {
        let max = self.forecast_len().saturating_sub(1) as u16;
        if self.forecast_scroll < max {
            self.forecast_scroll += 1;
        }
    }

    /// Number of rows in the selected forecast view
    pub fn forecast_len(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(|s| match self.forecast_view {
                ForecastView::Daily => s.forecast.len(),
                ForecastView::Hourly => s.hourly.len(),
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::RAIN_REPLIES;
    use crate::data::{
        AirQualitySnapshot, Coordinates, ForecastDay, HourlyEntry, Latency, SourceError,
        SyntheticSource, WeatherSnapshot, FORECAST_DAYS, HOURLY_HOURS,
    };
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<S: WeatherSource>(app: &mut App<S>, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    /// Synthetic source that counts fetches and can be told to fail
    struct TestSource {
        inner: SyntheticSource,
        fail_with: Mutex<Option<String>>,
        fail_ask: AtomicBool,
        current_calls: AtomicUsize,
        cities: Mutex<Vec<String>>,
    }

    impl TestSource {
        fn new() -> Self {
            Self {
                inner: SyntheticSource::seeded(1).with_latency(Latency::none()),
                fail_with: Mutex::new(None),
                fail_ask: AtomicBool::new(false),
                current_calls: AtomicUsize::new(0),
                cities: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            let source = Self::new();
            *source.fail_with.lock().unwrap() = Some(message.to_string());
            source
        }

        fn calls(&self) -> usize {
            self.current_calls.load(Ordering::SeqCst)
        }
    }

    impl WeatherSource for TestSource {
        async fn current(&self, query: &CityQuery) -> Result<WeatherSnapshot, SourceError> {
            self.current_calls.fetch_add(1, Ordering::SeqCst);
            self.cities.lock().unwrap().push(query.city.clone());
            let failure = self.fail_with.lock().unwrap().clone();
            match failure {
                Some(message) => Err(SourceError::Remote(message)),
                None => self.inner.current(query).await,
            }
        }

        async fn forecast(
            &self,
            query: &CityQuery,
            days: usize,
        ) -> Result<Vec<ForecastDay>, SourceError> {
            self.inner.forecast(query, days).await
        }

        async fn hourly(
            &self,
            query: &CityQuery,
            hours: usize,
        ) -> Result<Vec<HourlyEntry>, SourceError> {
            self.inner.hourly(query, hours).await
        }

        async fn air_quality(
            &self,
            query: &CityQuery,
            coordinates: Coordinates,
        ) -> Result<AirQualitySnapshot, SourceError> {
            self.inner.air_quality(query, coordinates).await
        }

        async fn ask(
            &self,
            question: &str,
            current: Option<&WeatherSnapshot>,
            query: &CityQuery,
        ) -> Result<String, SourceError> {
            if self.fail_ask.load(Ordering::SeqCst) {
                return Err(SourceError::Remote("assistant offline".to_string()));
            }
            self.inner.ask(question, current, query).await
        }
    }

    fn test_app(source: TestSource) -> App<TestSource> {
        App::new(source, &StartupConfig::default(), None)
    }

    async fn loaded_app() -> App<TestSource> {
        let mut app = test_app(TestSource::new());
        app.run_pending().await;
        app
    }

    // ========================================================================
    // Loading and error flow
    // ========================================================================

    #[test]
    fn test_initial_state_is_loading_with_queued_load() {
        let app = test_app(TestSource::new());
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.city, "London");
        assert!(app.has_pending());
    }

    #[tokio::test]
    async fn test_city_request_loads_full_snapshot_and_tabs_do_not_refetch() {
        let mut app = loaded_app().await;
        assert_eq!(app.source.calls(), 1);

        app.request_city("Paris");
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.take_pending(), Some(PendingAction::LoadSnapshot));

        app.load_snapshot().await;
        assert_eq!(app.state, AppState::Dashboard);
        let snapshot = app.snapshot.as_ref().expect("Snapshot should be loaded");
        assert_eq!(snapshot.city(), "Paris");
        assert_eq!(snapshot.forecast.len(), FORECAST_DAYS);
        assert_eq!(snapshot.hourly.len(), HOURLY_HOURS);
        assert_eq!(app.source.calls(), 2);

        for code in [
            KeyCode::Tab,
            KeyCode::Tab,
            KeyCode::Char('4'),
            KeyCode::Left,
            KeyCode::Char('1'),
        ] {
            app.handle_key(key_event(code));
            assert!(!app.has_pending(), "tab switch queued work: {:?}", code);
        }
        app.run_pending().await;
        assert_eq!(app.source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_message_and_retry_refetches_same_city() {
        let mut app = test_app(TestSource::failing("network unreachable"));
        app.run_pending().await;

        assert_eq!(
            app.state,
            AppState::Error("network unreachable".to_string())
        );
        assert!(app.snapshot.is_none());

        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Loading);
        app.run_pending().await;

        assert_eq!(app.source.calls(), 2);
        assert_eq!(
            *app.source.cities.lock().unwrap(),
            vec!["London".to_string(), "London".to_string()]
        );
    }

    #[tokio::test]
    async fn test_retry_after_recovery_shows_dashboard() {
        let mut app = test_app(TestSource::failing("timeout"));
        app.run_pending().await;
        assert!(matches!(app.state, AppState::Error(_)));

        *app.source.fail_with.lock().unwrap() = None;
        app.handle_key(key_event(KeyCode::Enter));
        app.run_pending().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.snapshot.is_some());
    }

    #[test]
    fn test_only_quit_allowed_while_loading() {
        let mut app = test_app(TestSource::new());
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Current);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    // ========================================================================
    // Tabs and navigation
    // ========================================================================

    #[tokio::test]
    async fn test_tab_cycling_wraps() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(app.tab, Tab::Assistant);
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.tab, Tab::Current);
        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.tab, Tab::AirQuality);
    }

    #[tokio::test]
    async fn test_forecast_toggle_and_scroll_bounds() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('2')));

        for _ in 0..100 {
            app.handle_key(key_event(KeyCode::Char('j')));
        }
        assert_eq!(app.forecast_scroll, (FORECAST_DAYS - 1) as u16);

        app.handle_key(key_event(KeyCode::Char('f')));
        assert_eq!(app.forecast_view, ForecastView::Hourly);
        assert_eq!(app.forecast_scroll, 0);
        assert_eq!(app.forecast_len(), HOURLY_HOURS);

        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.forecast_scroll, 0);
    }

    #[tokio::test]
    async fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    // ========================================================================
    // City input and history
    // ========================================================================

    #[tokio::test]
    async fn test_typing_a_city_requests_it() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::City);
        type_text(&mut app, "Romx");
        app.handle_key(key_event(KeyCode::Backspace));
        type_text(&mut app, "e");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.city, "Rome");
        assert_eq!(app.history.get(0), Some("Rome"));
        assert_eq!(app.take_pending(), Some(PendingAction::LoadSnapshot));
    }

    #[tokio::test]
    async fn test_blank_city_is_ignored() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('c')));
        type_text(&mut app, "   ");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.city, "London");
        assert!(!app.has_pending());
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[tokio::test]
    async fn test_escape_cancels_input() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Oslo");
        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(app.city, "London");
    }

    #[tokio::test]
    async fn test_up_recalls_history() {
        let mut app = loaded_app().await;
        app.request_city("Oslo");
        app.run_pending().await;
        app.request_city("Lima");
        app.run_pending().await;

        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.input, "Lima");
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.input, "Oslo");
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.input, "Lima");
    }

    #[tokio::test]
    async fn test_city_history_is_persisted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Store::with_dir(temp_dir.path().to_path_buf());

        let mut app = App::new(TestSource::new(), &StartupConfig::default(), Some(store.clone()));
        app.request_city("Quito");

        let reloaded = App::new(TestSource::new(), &StartupConfig::default(), Some(store));
        assert_eq!(reloaded.history.get(0), Some("Quito"));
    }

    // ========================================================================
    // Assistant
    // ========================================================================

    #[tokio::test]
    async fn test_question_goes_through_thinking_to_answer() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('a')));
        assert_eq!(app.tab, Tab::Assistant);
        assert_eq!(app.input_mode, InputMode::Question);
        type_text(&mut app, "Do I need an umbrella?");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.assistant, AssistantState::Thinking);
        app.run_pending().await;

        match &app.assistant {
            AssistantState::Answered(reply) => assert!(RAIN_REPLIES.contains(&reply.as_str())),
            other => panic!("Expected an answer, got {:?}", other),
        }
        assert_eq!(app.last_question.as_deref(), Some("Do I need an umbrella?"));
        assert_eq!(app.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_assistant_failure_is_inline_apology() {
        let mut app = loaded_app().await;
        app.source.fail_ask.store(true, Ordering::SeqCst);

        app.submit_question("Should I water my plants?");
        app.run_pending().await;

        assert_eq!(app.assistant, AssistantState::Failed(APOLOGY.to_string()));
        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.snapshot.is_some());
    }

    #[tokio::test]
    async fn test_blank_or_overlapping_questions_are_ignored() {
        let mut app = loaded_app().await;

        app.submit_question("   ");
        assert_eq!(app.assistant, AssistantState::Idle);
        assert!(!app.has_pending());

        app.submit_question("first");
        app.submit_question("second");
        assert_eq!(app.take_pending(), Some(PendingAction::Ask("first".to_string())));
    }

    #[tokio::test]
    async fn test_question_suggestions_cycle() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('a')));
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.input, SUGGESTIONS[0]);
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.input, SUGGESTIONS[SUGGESTIONS.len() - 1]);
    }

    // ========================================================================
    // Export
    // ========================================================================

    #[tokio::test]
    async fn test_export_writes_file_into_export_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StartupConfig {
            export_dir: temp_dir.path().to_path_buf(),
            ..StartupConfig::default()
        };
        let mut app = App::new(TestSource::new(), &config, None);
        app.run_pending().await;

        app.handle_key(key_event(KeyCode::Char('e')));
        app.run_pending().await;

        let status = app.status.clone().expect("Export should set a status");
        assert!(status.starts_with("Exported to"), "{}", status);
        let exported: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(exported.len(), 1);
    }

    #[test]
    fn test_export_without_snapshot_sets_status() {
        let mut app = test_app(TestSource::new());
        app.export();
        assert_eq!(app.status.as_deref(), Some("Nothing to export yet"));
    }
}
