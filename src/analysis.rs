use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::state::{Command, ViewState};

pub const ANALYSIS_FAILURE: &str = "Sorry, couldn't analyze this video right now.";

pub fn summary_prompt(title: &str) -> String {
    format!(
        "As an educational assistant for 'STEM Out', provide a brief, engaging summary (2-3 sentences) for a YouTube video titled \"{title}\". Focus on the potential learning points and what makes it exciting for a young audience interested in science."
    )
}

/// Session-scoped video summaries. An entry, once written, is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisCache {
    entries: BTreeMap<String, String>,
}

impl AnalysisCache {
    /// Returns false, leaving the cache untouched, when `id` already has an entry.
    pub fn insert_if_absent(&mut self, id: impl Into<String>, text: impl Into<String>) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, text.into());
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Requests short video summaries and memoizes them per video id.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisController;

impl AnalysisController {
    /// Starts an analysis. `None` means nothing to do: the summary is cached or
    /// a request for the same id is already out.
    pub fn begin(&self, state: ViewState, id: &str, title: &str) -> (ViewState, Option<Command>) {
        if state.analyses().contains(id) || state.is_analyzing(id) {
            tracing::debug!(video = id, "analysis already available or in flight");
            return (state, None);
        }
        let command = Command::Summarize {
            id: id.to_string(),
            prompt: summary_prompt(title),
        };
        (state.with_analyzing(Some(id.to_string())), Some(command))
    }

    /// Records the outcome and releases the marker if this request still owns it.
    pub fn finish(&self, state: ViewState, id: &str, outcome: Result<String>) -> ViewState {
        let text = match outcome {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(video = id, error = %err, "error analyzing video");
                ANALYSIS_FAILURE.to_string()
            }
        };
        let state = state.with_analysis(id, text);
        if state.is_analyzing(id) {
            state.with_analyzing(None)
        } else {
            state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;

    fn fresh() -> ViewState {
        ViewState::new("hello")
    }

    #[test]
    fn prompt_embeds_title() {
        let prompt = summary_prompt("How to Build a Lemon Battery!");
        assert!(prompt.contains("titled \"How to Build a Lemon Battery!\""));
        assert!(prompt.starts_with("As an educational assistant for 'STEM Out'"));
    }

    #[test]
    fn begin_marks_and_emits_one_command() {
        let controller = AnalysisController;
        let (state, command) = controller.begin(fresh(), "1", "Lemon");
        assert!(state.is_analyzing("1"));
        assert!(matches!(command, Some(Command::Summarize { ref id, .. }) if id == "1"));

        let (state, again) = controller.begin(state, "1", "Lemon");
        assert!(again.is_none());
        assert!(state.is_analyzing("1"));
    }

    #[test]
    fn cached_entry_short_circuits() {
        let controller = AnalysisController;
        let state = fresh().with_analysis("1", "done");
        let (state, command) = controller.begin(state, "1", "Lemon");
        assert!(command.is_none());
        assert_eq!(state.flags().analyzing, None);
    }

    #[test]
    fn failure_stores_fixed_text_and_clears_marker() {
        let controller = AnalysisController;
        let (state, _) = controller.begin(fresh(), "2", "Surface Tension");
        let state = controller.finish(state, "2", Err(SiteError::Network("down".into())));

        assert_eq!(state.analyses().get("2"), Some(ANALYSIS_FAILURE));
        assert_eq!(state.analyses().len(), 1);
        assert_eq!(state.flags().analyzing, None);
    }

    #[test]
    fn later_request_keeps_the_marker() {
        let controller = AnalysisController;
        let (state, _) = controller.begin(fresh(), "1", "Lemon");
        let (state, _) = controller.begin(state, "3", "Rocket");
        assert!(state.is_analyzing("3"));

        let state = controller.finish(state, "1", Ok("volts".into()));
        assert_eq!(state.analyses().get("1"), Some("volts"));
        assert!(state.is_analyzing("3"));

        let state = controller.finish(state, "3", Ok("thrust".into()));
        assert_eq!(state.flags().analyzing, None);
    }

    #[test]
    fn reclick_after_marker_moved_issues_a_new_request() {
        let controller = AnalysisController;
        let (state, _) = controller.begin(fresh(), "1", "Lemon");
        let (state, _) = controller.begin(state, "3", "Rocket");

        let (state, command) = controller.begin(state, "1", "Lemon");
        assert!(matches!(command, Some(Command::Summarize { ref id, .. }) if id == "1"));
        assert!(state.is_analyzing("1"));
    }
}
