//! The chat widget's conversation with the AI gateway.

use crate::catalog::Organization;
use crate::error::{Result, SiteError};
use crate::message::Message;
use crate::state::{Command, ViewState};

pub const CHAT_APOLOGY: &str =
    "Sorry, I'm having a little trouble connecting right now. Please try again later.";

/// Steering text sent with every conversation turn.
pub fn system_instruction(org: &Organization) -> String {
    format!(
        "You are a friendly and helpful chatbot for a non-profit organization called '{name}'.\n\
         - **Mission:** {mission}\n\
         - **Tagline:** {tagline}.\n\
         - **Contact:** The primary contact email is {email}.\n\
         - **Tone:** {tone}\n\
         - **Goal:** {goal}",
        name = org.name,
        mission = org.mission,
        tagline = org.tagline,
        email = org.contact_email,
        tone = org.tone,
        goal = org.goal,
    )
}

/// Context the gateway sees: the fixed instruction and the completed exchanges.
///
/// Only successful exchanges are recorded. The greeting and apology turns shown
/// in the chat window never reach the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSession {
    system_instruction: String,
    history: Vec<Message>,
}

impl ConversationSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    pub fn for_organization(org: &Organization) -> Self {
        Self::new(system_instruction(org))
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    fn record_exchange(&mut self, message: &str, reply: &str) {
        self.history.push(Message::user(message));
        self.history.push(Message::bot(reply));
    }
}

/// Owns the conversation session and serialises sends: one reply in flight at a time.
#[derive(Debug, Clone)]
pub struct ConversationController {
    session: ConversationSession,
}

impl ConversationController {
    pub fn new(session: ConversationSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Validates `text` and moves the state to "bot thinking".
    ///
    /// On rejection the caller keeps its state and no command is produced.
    pub fn begin_send(&self, state: ViewState, text: &str) -> Result<(ViewState, Command)> {
        if text.trim().is_empty() {
            return Err(SiteError::InvalidInput("message is empty".into()));
        }
        if state.flags().bot_thinking {
            return Err(SiteError::BotBusy);
        }
        let command = Command::Converse {
            system_instruction: self.session.system_instruction.clone(),
            history: self.session.history.clone(),
            message: text.to_string(),
        };
        let state = state
            .with_message(Message::user(text))
            .with_input("")
            .with_bot_thinking(true);
        Ok((state, command))
    }

    /// Appends the bot turn for a finished request and leaves the "thinking" state.
    pub fn finish_send(
        &mut self,
        state: ViewState,
        message: &str,
        outcome: Result<String>,
    ) -> ViewState {
        if !state.flags().bot_thinking {
            tracing::warn!("dropping chat reply with no outstanding request");
            return state;
        }
        let reply = match outcome {
            Ok(reply) => {
                self.session.record_exchange(message, &reply);
                reply
            }
            Err(err) => {
                tracing::error!(error = %err, "error sending message");
                CHAT_APOLOGY.to_string()
            }
        };
        state
            .with_message(Message::bot(reply))
            .with_bot_thinking(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::message::Role;

    fn controller() -> ConversationController {
        ConversationController::new(ConversationSession::for_organization(
            &catalog::stem_out().organization,
        ))
    }

    #[test]
    fn instruction_names_mission_and_contact() {
        let text = system_instruction(&catalog::stem_out().organization);
        assert!(text.contains("'STEM Out'"));
        assert!(text.contains("stemout.co@gmail.com"));
        assert!(text.contains("Let's rediscover the world through science."));
    }

    #[test]
    fn blank_input_is_rejected() {
        let controller = controller();
        for text in ["", "   ", "\n\t"] {
            let err = controller
                .begin_send(ViewState::new("hi"), text)
                .unwrap_err();
            assert!(matches!(err, SiteError::InvalidInput(_)));
        }
    }

    #[test]
    fn busy_bot_rejects_second_send() {
        let controller = controller();
        let (state, _) = controller.begin_send(ViewState::new("hi"), "one").unwrap();
        let err = controller.begin_send(state, "two").unwrap_err();
        assert!(matches!(err, SiteError::BotBusy));
    }

    #[test]
    fn successful_reply_extends_session_history() {
        let mut controller = controller();
        let (state, command) = controller
            .begin_send(ViewState::new("hi"), "What is STEM Out?")
            .unwrap();
        assert!(state.flags().bot_thinking);
        assert_eq!(state.input(), "");
        match command {
            Command::Converse { history, message, .. } => {
                assert!(history.is_empty());
                assert_eq!(message, "What is STEM Out?");
            }
            other => panic!("unexpected command {other:?}"),
        }

        let state = controller.finish_send(state, "What is STEM Out?", Ok("A non-profit.".into()));
        assert!(!state.flags().bot_thinking);
        assert_eq!(state.transcript().len(), 3);
        assert_eq!(
            controller.session().history(),
            &[Message::user("What is STEM Out?"), Message::bot("A non-profit.")]
        );
    }

    #[test]
    fn failed_reply_appends_apology_only_to_transcript() {
        let mut controller = controller();
        let (state, _) = controller.begin_send(ViewState::new("hi"), "hello?").unwrap();
        let state =
            controller.finish_send(state, "hello?", Err(SiteError::Service("500".into())));

        let last = state.transcript().last().unwrap();
        assert_eq!(last.role, Role::Bot);
        assert_eq!(last.text, CHAT_APOLOGY);
        assert!(controller.session().history().is_empty());
    }
}
