use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Serialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::coordinator::Coordinator;
use crate::error::{Result, SiteError};
use crate::gateway::AiGateway;
use crate::render::{Fragments, PageShell};
use crate::state::{Command, UserEvent};

const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Clone)]
struct PageSession {
    opened: u64,
    coordinator: Arc<Mutex<Coordinator>>,
}

/// Serves the page. Every page load gets its own coordinator, dropped on eviction.
pub struct SiteServer {
    catalog: Arc<ContentCatalog>,
    shell: Arc<PageShell>,
    gateway: Arc<dyn AiGateway>,
    sessions: Arc<RwLock<HashMap<Uuid, PageSession>>>,
    opened: Arc<AtomicU64>,
    max_sessions: usize,
}

impl Clone for SiteServer {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            shell: Arc::clone(&self.shell),
            gateway: Arc::clone(&self.gateway),
            sessions: Arc::clone(&self.sessions),
            opened: Arc::clone(&self.opened),
            max_sessions: self.max_sessions,
        }
    }
}

impl SiteServer {
    pub fn new(catalog: Arc<ContentCatalog>, gateway: Arc<dyn AiGateway>) -> Result<Self> {
        Ok(Self {
            shell: Arc::new(PageShell::new(Arc::clone(&catalog))?),
            catalog,
            gateway,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            opened: Arc::new(AtomicU64::new(0)),
            max_sessions: DEFAULT_MAX_SESSIONS,
        })
    }

    /// Caps live page sessions; the oldest one is evicted to make room.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/health", get(|| async { "ok" }))
            .route("/static/site.css", get(stylesheet))
            .route("/sessions/:id/events", post(post_event))
            .route("/sessions/:id/fragments", get(fragments))
            .with_state(self.clone())
    }

    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "serving site");
        axum::serve(listener, app.into_make_service())
            .await
            .map_err(|err| SiteError::Network(format!("server error: {err}")))?;
        Ok(())
    }

    async fn open_session(&self) -> (Uuid, Arc<Mutex<Coordinator>>) {
        let id = Uuid::new_v4();
        let coordinator = Arc::new(Mutex::new(Coordinator::new(Arc::clone(&self.catalog))));
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.opened)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                if let Some(evicted) = sessions.remove(&oldest) {
                    tracing::debug!(session = %oldest, "evicting page session");
                    if let Ok(mut coord) = evicted.coordinator.try_lock() {
                        coord.teardown();
                    }
                }
            }
        }
        sessions.insert(
            id,
            PageSession {
                opened: self.opened.fetch_add(1, Ordering::Relaxed),
                coordinator: Arc::clone(&coordinator),
            },
        );
        (id, coordinator)
    }

    async fn session(&self, id: &Uuid) -> Option<Arc<Mutex<Coordinator>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|session| Arc::clone(&session.coordinator))
    }

    /// Runs each command off the request path and feeds the completion back.
    fn spawn_commands(&self, coordinator: &Arc<Mutex<Coordinator>>, commands: Vec<Command>) {
        for command in commands {
            let gateway = Arc::clone(&self.gateway);
            let coordinator = Arc::clone(coordinator);
            tokio::spawn(async move {
                let completion = Coordinator::execute(gateway.as_ref(), command).await;
                if let Err(err) = coordinator.lock().await.dispatch(completion) {
                    tracing::warn!(error = %err, "completion rejected");
                }
            });
        }
    }

    async fn render_fragments(&self, coordinator: &Mutex<Coordinator>) -> Result<Fragments> {
        let state = coordinator.lock().await.state().clone();
        self.shell.render_fragments(&state)
    }
}

fn rejection_code(err: &SiteError) -> &'static str {
    match err {
        SiteError::InvalidInput(_) => "invalid_input",
        SiteError::BotBusy => "bot_busy",
        SiteError::UnknownItem(_) => "unknown_item",
        _ => "error",
    }
}

fn internal_error(err: SiteError) -> Response {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

fn session_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "session not found" })),
    )
        .into_response()
}

#[derive(Serialize)]
struct EventResponse {
    #[serde(flatten)]
    fragments: Fragments,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected: Option<&'static str>,
}

async fn index(State(server): State<SiteServer>) -> Response {
    let (id, coordinator) = server.open_session().await;
    let state = coordinator.lock().await.state().clone();
    match server.shell.render_page(&id.to_string(), &state) {
        Ok(html) => Html(html).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../static/site.css"),
    )
}

async fn post_event(
    State(server): State<SiteServer>,
    Path(id): Path<Uuid>,
    Json(event): Json<UserEvent>,
) -> Response {
    let Some(coordinator) = server.session(&id).await else {
        return session_not_found();
    };
    let outcome = coordinator.lock().await.dispatch(event);
    let rejected = match outcome {
        Ok(commands) => {
            server.spawn_commands(&coordinator, commands);
            None
        }
        Err(err) => {
            tracing::debug!(session = %id, reason = %err, "event rejected");
            Some(rejection_code(&err))
        }
    };
    match server.render_fragments(&coordinator).await {
        Ok(fragments) => Json(EventResponse {
            fragments,
            rejected,
        })
        .into_response(),
        Err(err) => internal_error(err),
    }
}

async fn fragments(State(server): State<SiteServer>, Path(id): Path<Uuid>) -> Response {
    let Some(coordinator) = server.session(&id).await else {
        return session_not_found();
    };
    match server.render_fragments(&coordinator).await {
        Ok(fragments) => Json(fragments).into_response(),
        Err(err) => internal_error(err),
    }
}
