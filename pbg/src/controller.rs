use crate::bug;
use crate::gallery::Gallery;
use crate::lightbox::Lightbox;
use crate::notify::{self, Notify};
use crate::sanitize::{sanitize, validate};
use crate::session::SearchSession;
use crate::trigger::{Layout, State, Strategy, Trigger, Viewport};
use pixabay::reqwest::Url;
use pixabay::{ApiEndpoint, Filters, PageNum, SearchResponse};
use std::time::Duration;
use tokio::time::Instant;

/// Why a request ended without rendering anything. The message is what the
/// user gets to see.
#[derive(thiserror::Error, Debug)]
pub enum Failure {
    #[error("Invalid query")]
    InvalidQuery,
    #[error("Sorry, there are no images matching your search query. Please try again.")]
    NoResults,
    #[error("Error searching")]
    Fetch(#[source] pixabay::Error),
}

/// A request issued by the controller, to be fetched by the caller and
/// handed back through [`Controller::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub page: PageNum,
    pub url: Url,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub key: String,
    pub endpoint: ApiEndpoint,
    pub filters: Filters,
    pub per_page: u32,
    pub max_query_len: usize,
    pub debounce: Duration,
    pub strategy: Strategy,
    pub layout: Layout,
    pub viewport_height: f64,
}

pub struct Controller<N: Notify> {
    settings: Settings,
    session: SearchSession,
    gallery: Gallery,
    lightbox: Option<Lightbox>,
    trigger: Trigger,
    viewport: Viewport,
    pub notifier: N,
}

impl<N: Notify> Controller<N> {
    pub fn new(settings: Settings, notifier: N) -> Self {
        Self {
            session: SearchSession::new(settings.per_page),
            gallery: Gallery::new(),
            lightbox: None,
            trigger: Trigger::new(settings.strategy, settings.debounce),
            viewport: Viewport::new(settings.viewport_height),
            settings,
            notifier,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn lightbox(&mut self) -> Option<&mut Lightbox> {
        self.lightbox.as_mut()
    }

    pub fn trigger_state(&self) -> State {
        self.trigger.state()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn document(&self) -> String {
        self.gallery.document(&self.session.query)
    }

    fn fail(&mut self, failure: Failure) {
        self.notifier.failure(&failure.to_string());
    }

    fn issue(&mut self) -> Ticket {
        self.gallery.set_loading(true);
        let url = self.settings.endpoint.search_url(
            &self.settings.key,
            &self.settings.filters,
            &self.session.request(),
        );
        Ticket {
            generation: self.session.generation,
            page: self.session.page,
            url,
        }
    }

    /// Starts a new search session from raw form input.
    ///
    /// Everything from the previous session is dropped before validation,
    /// so an invalid query also leaves an empty gallery behind.
    pub fn submit(&mut self, raw: &str) -> Option<Ticket> {
        let generation = self.session.reset(sanitize(raw));
        self.trigger.disarm();
        self.gallery.clear();
        self.gallery.set_loading(false);
        self.lightbox = None;
        self.viewport.reset();
        if let Err(e) = validate(&self.session.query, self.settings.max_query_len) {
            info!("rejected query {:?}", raw);
            self.fail(e);
            return None;
        }
        info!("search #{}: {:?}", generation, self.session.query);
        Some(self.issue())
    }

    /// Records a scroll signal at `now`.
    pub fn signal(&mut self, now: Instant) {
        self.trigger.on_signal(now);
    }

    /// When [`Controller::poll`] should next be called, if at all.
    pub fn deadline(&self) -> Option<Instant> {
        self.trigger.deadline()
    }

    /// Runs the debounced trigger evaluation; yields the next-page request
    /// when the end of the gallery is near.
    pub fn poll(&mut self, now: Instant) -> Option<Ticket> {
        if !self.trigger.poll(
            now,
            self.gallery.len(),
            &self.settings.layout,
            &self.viewport,
        ) {
            return None;
        }
        info!(
            "search #{}: loading page {}",
            self.session.generation, self.session.page
        );
        Some(self.issue())
    }

    pub fn scroll_by(&mut self, cards: f64, now: Instant) {
        let layout = &self.settings.layout;
        self.viewport.scroll_by(
            cards * layout.card_height,
            layout.content_height(self.gallery.len()),
        );
        self.signal(now);
    }

    pub fn scroll_to_end(&mut self, now: Instant) {
        self.scroll_by(f64::INFINITY, now);
    }

    /// Applies the outcome of a ticket. Responses to superseded sessions
    /// are dropped without touching the gallery.
    pub fn complete(&mut self, ticket: Ticket, result: pixabay::Result<SearchResponse>) {
        if ticket.generation != self.session.generation {
            warn!(
                "dropping page {} of superseded search #{} (now #{})",
                ticket.page, ticket.generation, self.session.generation
            );
            return;
        }
        if ticket.page != self.session.page {
            bug!(
                "page {} resolved while expecting page {}",
                ticket.page,
                self.session.page
            );
            return;
        }
        self.gallery.set_loading(false);

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                error!("search #{} page {}: {:?}", ticket.generation, ticket.page, e);
                self.reset_view();
                self.fail(Failure::Fetch(e));
                return;
            }
        };
        if page.is_empty() {
            info!("search #{}: no results", ticket.generation);
            self.reset_view();
            self.fail(Failure::NoResults);
            return;
        }

        self.gallery.append(&page.hits);
        if self.session.advance(page.total_hits) {
            self.trigger.arm();
        } else {
            self.trigger.disarm();
            self.notifier.info(notify::END_OF_RESULTS);
        }
        info!(
            "search #{}: page {} with {} hits, {}/{} shown",
            ticket.generation,
            ticket.page,
            page.hits.len(),
            self.gallery.len(),
            page.total_hits
        );

        match &mut self.lightbox {
            Some(lb) if ticket.page != 1 => lb.refresh(&self.gallery),
            lightbox => {
                *lightbox = Some(Lightbox::new(&self.gallery));
                self.notifier.success(&notify::found(page.total_hits));
            }
        }
    }

    fn reset_view(&mut self) {
        self.gallery.clear();
        self.lightbox = None;
        self.viewport.reset();
        self.trigger.disarm();
    }
}

// Drivers that run a ticket to completion in place, for sequential callers.
#[cfg(test)]
use crate::fetch::Fetch;

#[cfg(test)]
impl<N: Notify> Controller<N> {
    /// Fetches `ticket` through `fetch` and applies the result.
    pub async fn run<F: Fetch>(&mut self, fetch: &F, ticket: Ticket) {
        let r = fetch.fetch(&ticket.url).await;
        self.complete(ticket, r);
    }

    /// Submit and fetch the first page in one go.
    pub async fn search<F: Fetch>(&mut self, fetch: &F, raw: &str) {
        if let Some(ticket) = self.submit(raw) {
            self.run(fetch, ticket).await;
        }
    }

    /// Polls the trigger and fetches the next page if it fired.
    pub async fn load_more<F: Fetch>(&mut self, fetch: &F, now: Instant) -> bool {
        match self.poll(now) {
            Some(ticket) => {
                self.run(fetch, ticket).await;
                true
            }
            None => false,
        }
    }
}
