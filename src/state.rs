//! Page state as an immutable record plus the events and commands that move it.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisCache;
use crate::error::Result;
use crate::message::{Message, Transcript};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiFlags {
    pub menu_open: bool,
    pub header_scrolled: bool,
    pub chat_open: bool,
    pub bot_thinking: bool,
    /// Video currently being summarised. The most recent request owns the marker.
    pub analyzing: Option<String>,
}

/// Everything the page shell renders. Transitions consume a value and return the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    flags: UiFlags,
    input: String,
    transcript: Transcript,
    analyses: AnalysisCache,
}

impl ViewState {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            flags: UiFlags::default(),
            input: String::new(),
            transcript: Transcript::with_greeting(greeting),
            analyses: AnalysisCache::default(),
        }
    }

    pub fn flags(&self) -> &UiFlags {
        &self.flags
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn analyses(&self) -> &AnalysisCache {
        &self.analyses
    }

    /// Whether the send button is usable.
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty() && !self.flags.bot_thinking
    }

    pub fn is_analyzing(&self, id: &str) -> bool {
        self.flags.analyzing.as_deref() == Some(id)
    }

    pub fn with_menu_open(mut self, open: bool) -> Self {
        self.flags.menu_open = open;
        self
    }

    pub fn with_chat_open(mut self, open: bool) -> Self {
        self.flags.chat_open = open;
        self
    }

    pub fn with_header_scrolled(mut self, scrolled: bool) -> Self {
        self.flags.header_scrolled = scrolled;
        self
    }

    pub fn with_bot_thinking(mut self, thinking: bool) -> Self {
        self.flags.bot_thinking = thinking;
        self
    }

    pub fn with_analyzing(mut self, id: Option<String>) -> Self {
        self.flags.analyzing = id;
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.transcript = self.transcript.appended(message);
        self
    }

    /// Stores a summary unless one is already cached for `id`.
    pub fn with_analysis(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.analyses.insert_if_absent(id, text);
        self
    }
}

/// Interactions coming from the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    ToggleMenu,
    /// A navigation link was followed.
    CloseMenu,
    ToggleChat,
    Input { text: String },
    Submit,
    Scrolled { offset: f64 },
    Analyze { id: String },
}

/// Everything the coordinator processes: user interactions and network completions.
#[derive(Debug)]
pub enum Event {
    User(UserEvent),
    ReplyReceived {
        message: String,
        outcome: Result<String>,
    },
    AnalysisReceived {
        id: String,
        outcome: Result<String>,
    },
}

impl From<UserEvent> for Event {
    fn from(event: UserEvent) -> Self {
        Event::User(event)
    }
}

/// Side effects a transition asks for. Each one is exactly one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Converse {
        system_instruction: String,
        history: Vec<Message>,
        message: String,
    },
    Summarize {
        id: String,
        prompt: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn starts_with_greeting_and_closed_widgets() {
        let state = ViewState::new("hello");
        assert_eq!(state.flags(), &UiFlags::default());
        assert_eq!(state.transcript().len(), 1);
        assert_eq!(state.transcript().last().map(|m| m.role), Some(Role::Bot));
        assert!(!state.can_send());
    }

    #[test]
    fn transitions_leave_the_previous_value_intact() {
        let before = ViewState::new("hello");
        let after = before.clone().with_message(Message::user("hi")).with_chat_open(true);
        assert_eq!(before.transcript().len(), 1);
        assert!(!before.flags().chat_open);
        assert_eq!(after.transcript().len(), 2);
    }

    #[test]
    fn cached_analysis_is_not_overwritten() {
        let state = ViewState::new("hello")
            .with_analysis("1", "first")
            .with_analysis("1", "second");
        assert_eq!(state.analyses().get("1"), Some("first"));
    }

    #[test]
    fn send_requires_text_and_idle_bot() {
        let state = ViewState::new("hello").with_input("  ");
        assert!(!state.can_send());
        let state = state.with_input("question");
        assert!(state.can_send());
        assert!(!state.with_bot_thinking(true).can_send());
    }

    #[test]
    fn user_events_decode_from_tagged_json() {
        let event: UserEvent =
            serde_json::from_str(r#"{"type":"analyze","id":"2"}"#).unwrap();
        assert_eq!(event, UserEvent::Analyze { id: "2".into() });
        let event: UserEvent = serde_json::from_str(r#"{"type":"scrolled","offset":42}"#).unwrap();
        assert_eq!(event, UserEvent::Scrolled { offset: 42.0 });
    }
}
