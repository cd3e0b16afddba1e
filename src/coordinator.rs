//! Single owner of one page session's state.
//!
//! Events are queued and processed in order, each one synchronously producing the
//! next [`ViewState`]. Gateway calls are returned as [`Command`]s so the caller can
//! await them without holding the coordinator, then feed the completion back.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::analysis::AnalysisController;
use crate::catalog::{ContentCatalog, CHAT_GREETING};
use crate::conversation::{ConversationController, ConversationSession};
use crate::error::{Result, SiteError};
use crate::gateway::AiGateway;
use crate::scroll::ScrollWatcher;
use crate::state::{Command, Event, UserEvent, ViewState};

pub struct Coordinator {
    catalog: Arc<ContentCatalog>,
    state: ViewState,
    scroll: ScrollWatcher,
    conversation: ConversationController,
    analysis: AnalysisController,
    queue: VecDeque<Event>,
}

impl Coordinator {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        let session = ConversationSession::for_organization(&catalog.organization);
        Self {
            catalog,
            state: ViewState::new(CHAT_GREETING),
            scroll: ScrollWatcher::default(),
            conversation: ConversationController::new(session),
            analysis: AnalysisController,
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn conversation(&self) -> &ConversationController {
        &self.conversation
    }

    pub fn enqueue(&mut self, event: impl Into<Event>) {
        self.queue.push_back(event.into());
    }

    /// Drains the queue. Rejected events are logged and skipped.
    pub fn process(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            match self.step(event) {
                Ok(Some(command)) => commands.push(command),
                Ok(None) => {}
                Err(err) => tracing::debug!(reason = %err, "event rejected"),
            }
        }
        commands
    }

    /// Processes anything already queued, then `event`, reporting `event`'s rejection.
    pub fn dispatch(&mut self, event: impl Into<Event>) -> Result<Vec<Command>> {
        let mut commands = self.process();
        if let Some(command) = self.step(event.into())? {
            commands.push(command);
        }
        Ok(commands)
    }

    /// Stops reacting to scroll positions.
    pub fn teardown(&mut self) {
        self.scroll.unsubscribe();
    }

    fn step(&mut self, event: Event) -> Result<Option<Command>> {
        let state = self.state.clone();
        let (next, command) = match event {
            Event::User(UserEvent::ToggleMenu) => {
                let open = !state.flags().menu_open;
                (state.with_menu_open(open), None)
            }
            Event::User(UserEvent::CloseMenu) => (state.with_menu_open(false), None),
            Event::User(UserEvent::ToggleChat) => {
                let open = !state.flags().chat_open;
                (state.with_chat_open(open), None)
            }
            Event::User(UserEvent::Input { text }) => (state.with_input(text), None),
            Event::User(UserEvent::Submit) => {
                let text = state.input().to_string();
                let (next, command) = self.conversation.begin_send(state, &text)?;
                (next, Some(command))
            }
            Event::User(UserEvent::Scrolled { offset }) => match self.scroll.observe(offset) {
                Some(scrolled) => (state.with_header_scrolled(scrolled), None),
                None => return Ok(None),
            },
            Event::User(UserEvent::Analyze { id }) => {
                let title = self
                    .catalog
                    .video(&id)
                    .map(|video| video.title)
                    .ok_or_else(|| SiteError::UnknownItem(id.clone()))?;
                self.analysis.begin(state, &id, title)
            }
            Event::ReplyReceived { message, outcome } => {
                (self.conversation.finish_send(state, &message, outcome), None)
            }
            Event::AnalysisReceived { id, outcome } => {
                (self.analysis.finish(state, &id, outcome), None)
            }
        };
        self.state = next;
        Ok(command)
    }

    /// Runs one command against the gateway and returns its completion event.
    ///
    /// Takes no coordinator borrow so a server can release its session lock meanwhile.
    pub async fn execute(gateway: &dyn AiGateway, command: Command) -> Event {
        match command {
            Command::Converse {
                system_instruction,
                history,
                message,
            } => {
                let outcome = gateway
                    .converse(&system_instruction, &history, &message)
                    .await;
                Event::ReplyReceived { message, outcome }
            }
            Command::Summarize { id, prompt } => {
                let outcome = gateway.generate_text(&prompt).await;
                Event::AnalysisReceived { id, outcome }
            }
        }
    }

    /// Dispatches `event` and drives any resulting gateway calls to completion.
    pub async fn run(&mut self, gateway: &dyn AiGateway, event: impl Into<Event>) -> Result<()> {
        let commands = self.dispatch(event)?;
        for command in commands {
            let completion = Self::execute(gateway, command).await;
            self.dispatch(completion)?;
        }
        Ok(())
    }

    /// Types `text` into the chat input and submits it.
    pub async fn send(&mut self, gateway: &dyn AiGateway, text: &str) -> Result<()> {
        if self.state.flags().bot_thinking {
            return Err(SiteError::BotBusy);
        }
        self.dispatch(UserEvent::Input {
            text: text.to_string(),
        })?;
        self.run(gateway, UserEvent::Submit).await
    }

    pub async fn analyze(&mut self, gateway: &dyn AiGateway, id: &str) -> Result<()> {
        self.run(gateway, UserEvent::Analyze { id: id.to_string() })
            .await
    }
}
