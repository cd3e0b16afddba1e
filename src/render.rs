//! Server-side rendering of the page and of the fragments the browser swaps in.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Datelike;
use minijinja::{context, Environment};
use serde::Serialize;

use crate::catalog::{ContentCatalog, Video};
use crate::error::Result;
use crate::message::Message;
use crate::state::{UiFlags, ViewState};

/// Label of a video's analyze button.
pub fn analyze_button_label(state: &ViewState, id: &str) -> &'static str {
    if state.is_analyzing(id) {
        "Analyzing..."
    } else if state.analyses().contains(id) {
        "View Analysis"
    } else {
        "Analyze with AI"
    }
}

#[derive(Serialize)]
struct ViewModel<'a> {
    flags: &'a UiFlags,
    input: &'a str,
    messages: Vec<&'a Message>,
    can_send: bool,
}

impl<'a> ViewModel<'a> {
    fn new(state: &'a ViewState) -> Self {
        Self {
            flags: state.flags(),
            input: state.input(),
            messages: state.transcript().iter().collect(),
            can_send: state.can_send(),
        }
    }
}

#[derive(Serialize)]
struct VideoCard<'a> {
    video: &'a Video,
    label: &'static str,
    busy: bool,
    analysis: Option<&'a str>,
}

impl<'a> VideoCard<'a> {
    fn new(video: &'a Video, state: &'a ViewState) -> Self {
        Self {
            video,
            label: analyze_button_label(state, video.id),
            busy: state.is_analyzing(video.id),
            analysis: state.analyses().get(video.id),
        }
    }
}

/// The dynamic parts of the page, re-rendered after every event.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Fragments {
    pub header: String,
    pub chat: String,
    pub videos: BTreeMap<String, String>,
    /// A gateway call is still out; the browser should poll.
    pub pending: bool,
}

pub struct PageShell {
    env: Environment<'static>,
    catalog: Arc<ContentCatalog>,
}

impl PageShell {
    pub fn new(catalog: Arc<ContentCatalog>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("page.html", include_str!("../templates/page.html"))?;
        env.add_template("header.html", include_str!("../templates/header.html"))?;
        env.add_template("chat.html", include_str!("../templates/chat.html"))?;
        env.add_template("video.html", include_str!("../templates/video.html"))?;
        Ok(Self { env, catalog })
    }

    pub fn render_page(&self, session_id: &str, state: &ViewState) -> Result<String> {
        let catalog = &self.catalog;
        let cards: Vec<VideoCard<'_>> = catalog
            .videos
            .iter()
            .map(|video| VideoCard::new(video, state))
            .collect();
        let html = self.env.get_template("page.html")?.render(context! {
            session_id => session_id,
            org => &catalog.organization,
            nav_links => &catalog.nav_links,
            team => &catalog.team,
            kits => &catalog.kits,
            cards => cards,
            view => ViewModel::new(state),
            year => chrono::Utc::now().year(),
        })?;
        Ok(html)
    }

    pub fn render_header(&self, state: &ViewState) -> Result<String> {
        let html = self.env.get_template("header.html")?.render(context! {
            org => &self.catalog.organization,
            nav_links => &self.catalog.nav_links,
            view => ViewModel::new(state),
        })?;
        Ok(html)
    }

    pub fn render_chat(&self, state: &ViewState) -> Result<String> {
        let html = self.env.get_template("chat.html")?.render(context! {
            org => &self.catalog.organization,
            view => ViewModel::new(state),
        })?;
        Ok(html)
    }

    /// `None` for an id the catalog does not list.
    pub fn render_video(&self, id: &str, state: &ViewState) -> Result<Option<String>> {
        let Some(video) = self.catalog.video(id) else {
            return Ok(None);
        };
        let html = self.env.get_template("video.html")?.render(context! {
            card => VideoCard::new(video, state),
        })?;
        Ok(Some(html))
    }

    pub fn render_fragments(&self, state: &ViewState) -> Result<Fragments> {
        let mut videos = BTreeMap::new();
        for video in &self.catalog.videos {
            if let Some(html) = self.render_video(video.id, state)? {
                videos.insert(video.id.to_string(), html);
            }
        }
        Ok(Fragments {
            header: self.render_header(state)?,
            chat: self.render_chat(state)?,
            videos,
            pending: state.flags().bot_thinking || state.flags().analyzing.is_some(),
        })
    }
}
