use std::sync::Arc;

use advisor_core::{
    provider, ChatTurn, Config, ConversationSession, ResponseProvider, SessionOptions,
    SessionStatus, SubmitOutcome,
};
use ratatui::layout::Rect;

use crate::content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingSelection {
    GetStarted,
    Faq(usize),
}

#[derive(Debug, Clone)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
    pub expanded: bool,
}

impl FaqItem {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
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
    pub screen: Screen,

    // Landing state
    pub faqs: Vec<FaqItem>,
    pub selection: LandingSelection,
    pub landing_scroll: u16,
    pub follow_selection: bool,
    // Section positions, recorded during render for the About/FAQs jumps
    pub about_line: u16,
    pub faq_line: u16,

    // Chat state
    pub session: Option<ConversationSession>,
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_total_lines: u16,
    pub follow_tail: bool,
    pub animation_frame: u8, // 0-2 for the thinking dots

    // Panel areas for mouse hit-testing (updated during render)
    pub landing_area: Option<Rect>,
    pub chat_area: Option<Rect>,

    provider: Arc<dyn ResponseProvider>,
    session_options: SessionOptions,
}

impl App {
    pub fn new(provider: Arc<dyn ResponseProvider>, session_options: SessionOptions) -> Self {
        let faqs = content::FAQS
            .iter()
            .map(|&(question, answer)| FaqItem {
                question,
                answer,
                expanded: false,
            })
            .collect();

        Self {
            should_quit: false,
            screen: Screen::Landing,

            faqs,
            selection: LandingSelection::GetStarted,
            landing_scroll: 0,
            follow_selection: true,
            about_line: 0,
            faq_line: 0,

            session: None,
            input: String::new(),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_total_lines: 0,
            follow_tail: true,
            animation_frame: 0,

            landing_area: None,
            chat_area: None,

            provider,
            session_options,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(provider::from_config(config), SessionOptions::from(config))
    }

    // Landing navigation
    pub fn select_next(&mut self) {
        self.selection = match self.selection {
            LandingSelection::GetStarted if !self.faqs.is_empty() => LandingSelection::Faq(0),
            LandingSelection::Faq(i) if i + 1 < self.faqs.len() => LandingSelection::Faq(i + 1),
            other => other,
        };
        self.follow_selection = true;
    }

    pub fn select_prev(&mut self) {
        self.selection = match self.selection {
            LandingSelection::Faq(0) => LandingSelection::GetStarted,
            LandingSelection::Faq(i) => LandingSelection::Faq(i - 1),
            LandingSelection::GetStarted => LandingSelection::GetStarted,
        };
        self.follow_selection = true;
    }

    /// Enter on the landing page: open chat, or expand/collapse a FAQ
    pub fn activate_selection(&mut self) {
        match self.selection {
            LandingSelection::GetStarted => self.enter_chat(),
            LandingSelection::Faq(i) => {
                if let Some(faq) = self.faqs.get_mut(i) {
                    faq.toggle();
                }
            }
        }
    }

    pub fn jump_to_about(&mut self) {
        self.landing_scroll = self.about_line;
        self.follow_selection = false;
    }

    pub fn jump_to_faqs(&mut self) {
        self.landing_scroll = self.faq_line;
        self.follow_selection = false;
    }

    pub fn scroll_landing(&mut self, delta: i32) {
        self.landing_scroll = (self.landing_scroll as i32 + delta).max(0) as u16;
        self.follow_selection = false;
    }

    // Chat lifecycle
    pub fn enter_chat(&mut self) {
        if let Some(old) = self.session.take() {
            old.close();
        }
        self.session = Some(ConversationSession::start(
            Arc::clone(&self.provider),
            self.session_options.clone(),
        ));
        self.screen = Screen::Chat;
        self.input.clear();
        self.input_cursor = 0;
        self.chat_scroll = 0;
        self.follow_tail = true;
    }

    /// Logout: back to the landing page, discarding the conversation
    pub fn leave_chat(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        self.screen = Screen::Landing;
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn turns(&self) -> &[ChatTurn] {
        self.session.as_ref().map(|s| s.turns()).unwrap_or(&[])
    }

    pub fn is_thinking(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_pending())
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.as_ref().map(|s| s.status()).unwrap_or_default()
    }

    /// Send the input line. It is kept when the session is busy so it can be
    /// resent once the reply arrives.
    pub fn submit_input(&mut self) -> Option<SubmitOutcome> {
        let session = self.session.as_mut()?;
        let outcome = session.submit_user_message(&self.input);
        if outcome == SubmitOutcome::Sent {
            self.input.clear();
            self.input_cursor = 0;
            self.follow_tail = true;
        }
        Some(outcome)
    }

    /// Wait for the outstanding reply, if any, and apply it to the session
    pub async fn await_reply(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.settle().await.is_some() {
                self.follow_tail = true;
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.is_thinking() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        let max = self.chat_total_lines.saturating_sub(self.chat_height);
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
        if self.chat_scroll >= max {
            self.follow_tail = true;
        }
    }

    // Input editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.insert(byte_pos, c);
        self.input_cursor += 1;
    }

    /// Pasted text goes in as a single line
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().map(|c| if c.is_control() { ' ' } else { c }) {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::session::GREETING;
    use advisor_core::CannedProvider;
    use std::time::Duration;

    fn test_app(delay: Duration) -> App {
        let provider = CannedProvider::with_responses(delay, vec!["Try CSE 332.".to_string()]);
        App::new(Arc::new(provider), SessionOptions::default())
    }

    #[test]
    fn test_starts_on_landing_without_session() {
        let app = test_app(Duration::ZERO);
        assert_eq!(app.screen, Screen::Landing);
        assert!(app.session.is_none());
        assert!(app.turns().is_empty());
        assert_eq!(app.faqs.len(), content::FAQS.len());
    }

    #[test]
    fn test_landing_selection_is_clamped() {
        let mut app = test_app(Duration::ZERO);
        app.select_prev();
        assert_eq!(app.selection, LandingSelection::GetStarted);

        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selection, LandingSelection::Faq(app.faqs.len() - 1));

        app.select_prev();
        assert_eq!(app.selection, LandingSelection::Faq(app.faqs.len() - 2));
    }

    #[test]
    fn test_activate_toggles_faq() {
        let mut app = test_app(Duration::ZERO);
        app.select_next();
        app.activate_selection();
        assert!(app.faqs[0].expanded);
        assert!(!app.faqs[1].expanded);

        app.activate_selection();
        assert!(!app.faqs[0].expanded);
        assert_eq!(app.screen, Screen::Landing);
    }

    #[tokio::test]
    async fn test_get_started_opens_seeded_chat() {
        let mut app = test_app(Duration::ZERO);
        app.activate_selection();

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.turns().len(), 1);
        assert_eq!(app.turns()[0].text(), GREETING);
        assert!(!app.is_thinking());
    }

    #[tokio::test]
    async fn test_submit_clears_input_and_reply_arrives() {
        let mut app = test_app(Duration::from_millis(5));
        app.enter_chat();
        app.insert_str("What classes should I take?");

        assert_eq!(app.submit_input(), Some(SubmitOutcome::Sent));
        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);
        assert!(app.is_thinking());

        app.await_reply().await;
        assert!(!app.is_thinking());
        assert_eq!(app.turns().len(), 3);
        assert_eq!(app.turns()[2].text(), "Try CSE 332.");
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut app = test_app(Duration::ZERO);
        app.enter_chat();
        app.insert_str("   ");

        assert_eq!(app.submit_input(), Some(SubmitOutcome::Ignored));
        assert_eq!(app.turns().len(), 1);
        assert!(!app.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_submission_keeps_input() {
        let mut app = test_app(Duration::from_secs(2));
        app.enter_chat();
        app.insert_str("first");
        app.submit_input();

        app.insert_str("second");
        assert_eq!(app.submit_input(), Some(SubmitOutcome::Busy));
        assert_eq!(app.input, "second");
        assert_eq!(app.turns().len(), 2);

        app.await_reply().await;
        assert_eq!(app.submit_input(), Some(SubmitOutcome::Sent));
    }

    #[tokio::test]
    async fn test_leave_chat_discards_session() {
        let mut app = test_app(Duration::from_secs(60));
        app.enter_chat();
        app.insert_str("hello");
        app.submit_input();

        app.leave_chat();
        assert_eq!(app.screen, Screen::Landing);
        assert!(app.session.is_none());
        assert!(!app.is_thinking());

        // Re-entering starts over with only the greeting
        app.enter_chat();
        assert_eq!(app.turns().len(), 1);
    }

    #[test]
    fn test_submit_without_session() {
        let mut app = test_app(Duration::ZERO);
        app.insert_str("hello");
        assert_eq!(app.submit_input(), None);
    }

    #[test]
    fn test_utf8_editing() {
        let mut app = test_app(Duration::ZERO);
        app.insert_str("café");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input, "caé");

        app.cursor_home();
        app.delete();
        assert_eq!(app.input, "aé");

        app.cursor_end();
        app.insert_char('!');
        assert_eq!(app.input, "aé!");
        assert_eq!(app.input_cursor, 3);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut app = test_app(Duration::ZERO);
        app.insert_str("line one\nline two");
        assert_eq!(app.input, "line one line two");
    }

    #[test]
    fn test_chat_scroll_follows_tail_at_bottom() {
        let mut app = test_app(Duration::ZERO);
        app.chat_total_lines = 40;
        app.chat_height = 10;
        app.chat_scroll = 30;

        app.scroll_chat_up(5);
        assert_eq!(app.chat_scroll, 25);
        assert!(!app.follow_tail);

        app.scroll_chat_down(100);
        assert_eq!(app.chat_scroll, 30);
        assert!(app.follow_tail);
    }
}
