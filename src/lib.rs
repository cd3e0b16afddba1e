//! The STEM Out website: static content, an AI chat widget and AI video summaries.
//!
//! The crate provides:
//! - An AI gateway abstraction (`AiGateway`) with a Gemini client and a scripted stub.
//! - An immutable page state (`ViewState`) moved by a single `Coordinator`.
//! - Conversation and analysis controllers that guard and memoize gateway calls.
//! - Server-side rendering (`PageShell`) and, with the `server` feature, an axum site.

mod analysis;
pub mod catalog;
mod config;
mod conversation;
mod coordinator;
mod error;
mod gateway;
mod message;
mod render;
mod scroll;
#[cfg(feature = "server")]
mod server;
mod state;
mod telemetry;

pub use analysis::{summary_prompt, AnalysisCache, AnalysisController, ANALYSIS_FAILURE};
pub use catalog::{ContentCatalog, CHAT_GREETING};
pub use config::{AppConfig, LoggingConfig, ModelConfig, ServerConfig};
pub use conversation::{
    system_instruction, ConversationController, ConversationSession, CHAT_APOLOGY,
};
pub use coordinator::Coordinator;
pub use error::{Result, SiteError};
pub use gateway::{AiGateway, GeminiGateway, StubCall, StubGateway, StubReply};
pub use message::{Message, Role, Transcript};
pub use render::{analyze_button_label, Fragments, PageShell};
pub use scroll::{ScrollWatcher, HEADER_SCROLL_THRESHOLD};
#[cfg(feature = "server")]
pub use server::SiteServer;
pub use state::{Command, Event, UiFlags, UserEvent, ViewState};
pub use telemetry::init_tracing;
