use std::time::Duration;
use tokio::time::Instant;

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Listening for scroll signals.
    Armed,
    /// Not listening.
    Disarmed,
    /// A next-page request is in flight; not listening until it resolves.
    Pending,
}

/// How nearness to the end of the gallery is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Bounding box of the last card against the viewport, on every evaluation.
    Scroll,
    /// A sentinel element after the last card intersecting the viewport.
    #[default]
    Sentinel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub columns: usize,
    pub card_height: f64,
    /// Extra distance below the viewport at which the sentinel counts as visible.
    pub root_margin: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: 4,
            card_height: 260.,
            root_margin: 200.,
        }
    }
}

impl Layout {
    pub fn content_height(&self, cards: usize) -> f64 {
        cards.div_ceil(self.columns.max(1)) as f64 * self.card_height
    }

    /// Document-relative top of the card at `index`.
    pub fn card_top(&self, index: usize) -> f64 {
        (index / self.columns.max(1)) as f64 * self.card_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(height: f64) -> Self {
        Self {
            scroll_top: 0.,
            height,
        }
    }

    /// Scrolls by `dy`, clamped to the scrollable range of `content` pixels.
    pub fn scroll_by(&mut self, dy: f64, content: f64) {
        if dy.is_nan() {
            return;
        }
        let max = (content - self.height).max(0.);
        self.scroll_top = (self.scroll_top + dy).clamp(0., max);
    }

    pub fn reset(&mut self) {
        self.scroll_top = 0.;
    }
}

impl Strategy {
    /// Whether the end of a gallery of `cards` is close enough to load more.
    pub fn near_end(self, cards: usize, layout: &Layout, viewport: &Viewport) -> bool {
        if cards == 0 {
            return false;
        }
        match self {
            Strategy::Scroll => {
                let h = layout.card_height;
                let top = layout.card_top(cards - 1) - viewport.scroll_top;
                let bottom = top + h;
                top >= -h && bottom <= viewport.height + h
            }
            Strategy::Sentinel => {
                let y = layout.content_height(cards) - viewport.scroll_top;
                y >= 0. && y <= viewport.height + layout.root_margin
            }
        }
    }
}

/// Trailing debounce: fires once, `delay` after the latest signal.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True exactly once per burst of signals, once the deadline passed.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The pagination trigger.
///
/// Armed after a page that leaves more results behind; fires at most once
/// per arming, moving to [`State::Pending`] until the controller resolves
/// the request it issued.
#[derive(Debug, Clone)]
pub struct Trigger {
    state: State,
    pub strategy: Strategy,
    debounce: Debouncer,
}

impl Trigger {
    pub fn new(strategy: Strategy, delay: Duration) -> Self {
        Self {
            state: State::Disarmed,
            strategy,
            debounce: Debouncer::new(delay),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == State::Armed
    }

    pub fn arm(&mut self) {
        self.state = State::Armed;
    }

    pub fn disarm(&mut self) {
        self.state = State::Disarmed;
        self.debounce.cancel();
    }

    /// Records a scroll signal. Ignored unless armed.
    pub fn on_signal(&mut self, now: Instant) {
        if self.is_armed() {
            self.debounce.touch(now);
        }
    }

    /// When the next debounced evaluation is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        if self.is_armed() {
            self.debounce.deadline()
        } else {
            None
        }
    }

    /// Runs a due evaluation. Returns true if the trigger fired, in which
    /// case it is now pending.
    pub fn poll(&mut self, now: Instant, cards: usize, layout: &Layout, viewport: &Viewport) -> bool {
        if !self.is_armed() || !self.debounce.due(now) {
            return false;
        }
        let near = self.strategy.near_end(cards, layout, viewport);
        trace!(
            "trigger: {:?} at {:.0}/{:.0} with {} cards: {}",
            self.strategy,
            viewport.scroll_top,
            layout.content_height(cards),
            cards,
            near
        );
        if near {
            self.state = State::Pending;
        }
        near
    }
}
