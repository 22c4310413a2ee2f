use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use thinkchat_core::{ChatSession, Config, ReasonClient, RequestFailure, Settings, Theme};

/// Prompts offered in the examples panel; picking one fills the input verbatim.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "How many Rs are in the word 'strawberry'?",
    "If I have 5 apples and give 2 to my friend, then buy 3 more, how many apples do I have?",
    "Explain the concept of recursion in programming.",
];

/// Input box height bounds, borders included.
const MIN_INPUT_HEIGHT: u16 = 3;
const MAX_INPUT_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Transcript,
    Examples,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Input => FocusPane::Transcript,
            FocusPane::Transcript => FocusPane::Examples,
            FocusPane::Examples => FocusPane::Input,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Query input (multi-line)
    pub query_input: String,
    pub query_cursor: usize, // cursor position in query_input, in chars

    // Controls
    pub settings: Settings,
    pub theme: Theme,
    pub config_path: Option<PathBuf>,

    // Chat
    pub session: ChatSession,
    pub client: ReasonClient,
    pub request_task: Option<JoinHandle<Result<Value, RequestFailure>>>,
    pub chat_scroll: u16,
    pub max_chat_scroll: u16, // updated during render

    // Examples panel
    pub examples_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // One-line feedback shown in the footer
    pub status_message: Option<String>,

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub examples_area: Option<Rect>,
    pub input_area: Option<Rect>,
}

impl App {
    pub fn new(client: ReasonClient, theme: Theme, config_path: Option<PathBuf>) -> Self {
        let mut examples_state = ListState::default();
        examples_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Input,

            query_input: String::new(),
            query_cursor: 0,

            settings: Settings::default(),
            theme,
            config_path,

            session: ChatSession::new(),
            client,
            request_task: None,
            chat_scroll: 0,
            max_chat_scroll: 0,

            examples_state,

            animation_frame: 0,
            status_message: None,

            chat_area: None,
            examples_area: None,
            input_area: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Send the current input. Does nothing for blank input or while a request is in flight.
    pub fn submit(&mut self) {
        let Some(request) = self.session.begin_submit(&mut self.query_input, &self.settings) else {
            return;
        };
        self.query_cursor = 0;
        self.status_message = None;

        let client = self.client.clone();
        self.request_task = Some(tokio::spawn(async move { client.reason(&request).await }));
    }

    /// Hand a finished request back to the session. The session goes idle
    /// even when the task panicked.
    pub async fn poll_request(&mut self) {
        let finished = self
            .request_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.request_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(RequestFailure::from(join_err)),
            };
            self.session.complete(outcome);
            self.animation_frame = 0;
        }
    }

    /// Flip light/dark and persist the choice.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();

        if let Some(path) = &self.config_path {
            if let Err(err) = Config::save_theme(path, self.theme) {
                warn!(error = %err, "failed to save theme");
                self.status_message = Some(format!("Could not save theme: {}", err));
            }
        }
    }

    /// Put an example prompt into the input and focus it.
    pub fn fill_example(&mut self, index: usize) {
        if self.is_busy() {
            return;
        }
        if let Some(prompt) = EXAMPLE_PROMPTS.get(index) {
            self.query_input = prompt.to_string();
            self.query_cursor = self.query_input.chars().count();
            self.examples_state.select(Some(index));
            self.focus = FocusPane::Input;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn examples_nav_down(&mut self) {
        let i = self.examples_state.selected().unwrap_or(0);
        self.examples_state.select(Some((i + 1).min(EXAMPLE_PROMPTS.len() - 1)));
    }

    pub fn examples_nav_up(&mut self) {
        let i = self.examples_state.selected().unwrap_or(0);
        self.examples_state.select(Some(i.saturating_sub(1)));
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
        self.query_input.insert(byte_pos, c);
        self.query_cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        // Terminals send CRLF on paste
        for c in text.chars().filter(|c| *c != '\r') {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
            self.query_input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.query_input.chars().count();
        if self.query_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
            self.query_input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.query_cursor = self.query_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.query_input.chars().count();
        self.query_cursor = (self.query_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.query_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.query_cursor = self.query_input.chars().count();
    }

    /// Row and display column of the cursor inside the input text.
    /// Wide characters count as two columns.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let before: String = self.query_input.chars().take(self.query_cursor).collect();
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().map_or(0, |line| line.width());
        (row, col)
    }

    /// The input grows with its content, like an auto-resizing textarea.
    pub fn input_height(&self) -> u16 {
        let lines = self.query_input.split('\n').count() as u16;
        (lines + 2).clamp(MIN_INPUT_HEIGHT, MAX_INPUT_HEIGHT)
    }

    // Transcript scrolling

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(self.max_chat_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.session.transcript.request_scroll();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Write the transcript as a standalone HTML page under the data directory.
    pub fn export_transcript(&mut self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join("thinkchat");
        fs::create_dir_all(&data_dir)?;

        let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let path = data_dir.join(format!("transcript-{}.html", stamp));
        fs::write(&path, self.session.transcript.to_html_document(self.theme))?;

        info!(path = %path.display(), messages = self.session.transcript.len(), "exported transcript");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app() -> App {
        App::new(ReasonClient::new("http://127.0.0.1:1"), Theme::Light, None)
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut app = test_app();
        app.insert_str("héllo");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.query_input, "hélo");
        app.cursor_home();
        app.delete();
        assert_eq!(app.query_input, "élo");
    }

    #[test]
    fn test_paste_drops_carriage_returns() {
        let mut app = test_app();
        app.insert_str("a\r\nb");
        assert_eq!(app.query_input, "a\nb");
        assert_eq!(app.cursor_row_col(), (1, 1));
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        let mut app = test_app();
        app.insert_str("ok\n你好x");
        assert_eq!(app.cursor_row_col(), (1, 5));
        app.cursor_left();
        assert_eq!(app.cursor_row_col(), (1, 4));
    }

    #[test]
    fn test_input_height_grows_and_caps() {
        let mut app = test_app();
        assert_eq!(app.input_height(), 3);
        app.insert_str("1\n2\n3");
        assert_eq!(app.input_height(), 5);
        app.insert_str(&"\n".repeat(20));
        assert_eq!(app.input_height(), 8);
    }

    #[test]
    fn test_fill_example_focuses_input() {
        let mut app = test_app();
        app.focus = FocusPane::Examples;
        app.input_mode = InputMode::Normal;

        app.fill_example(1);

        assert_eq!(app.query_input, EXAMPLE_PROMPTS[1]);
        assert_eq!(app.query_cursor, EXAMPLE_PROMPTS[1].chars().count());
        assert_eq!(app.focus, FocusPane::Input);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_out_of_range_example_is_ignored() {
        let mut app = test_app();
        app.fill_example(EXAMPLE_PROMPTS.len());
        assert!(app.query_input.is_empty());
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut app = App::new(ReasonClient::new("http://127.0.0.1:1"), Theme::Light, Some(path.clone()));

        app.toggle_theme();

        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(Config::load_from(&path).unwrap().theme, Some(Theme::Dark));
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_blank_submit_spawns_nothing() {
        let mut app = test_app();
        app.insert_str("   ");
        app.submit();
        assert!(app.request_task.is_none());
        assert!(app.session.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_failed_request_releases_input() {
        let mut app = test_app();
        app.insert_str("hello");
        app.submit();

        assert!(app.is_busy());
        assert!(app.query_input.is_empty());
        assert_eq!(app.query_cursor, 0);

        while app.request_task.is_some() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_request().await;
        }

        assert!(!app.is_busy());
        assert_eq!(app.session.transcript.len(), 2);
        assert!(app.session.transcript.last().unwrap().is_error());
    }
}
