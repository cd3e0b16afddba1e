/// Offset in pixels past which the header switches to its compact style.
pub const HEADER_SCROLL_THRESHOLD: f64 = 10.0;

/// Derives the header-scrolled flag from page scroll positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollWatcher {
    threshold: f64,
    scrolled: bool,
    subscribed: bool,
}

impl Default for ScrollWatcher {
    fn default() -> Self {
        Self::new(HEADER_SCROLL_THRESHOLD)
    }
}

impl ScrollWatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: false,
            subscribed: true,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Feeds one scroll position. Returns the new flag only when it flipped.
    pub fn observe(&mut self, offset: f64) -> Option<bool> {
        if !self.subscribed {
            return None;
        }
        let scrolled = offset > self.threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }

    /// Stops reacting to positions. Called when the page session is torn down.
    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}
