use pixabay::{PageNum, SearchQuery};

/// State of the current search, owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    /// The next page to request.
    pub page: PageNum,
    pub per_page: u32,
    pub total: u64,
    /// Identifies the session; bumped on every submit.
    pub generation: u64,
}

impl SearchSession {
    pub fn new(per_page: u32) -> Self {
        Self {
            query: String::new(),
            page: 1,
            per_page,
            total: 0,
            generation: 0,
        }
    }

    /// Starts over with a new query, returning the new generation.
    pub fn reset(&mut self, query: String) -> u64 {
        self.query = query;
        self.page = 1;
        self.total = 0;
        self.generation += 1;
        self.generation
    }

    pub fn request(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone(), self.page, self.per_page)
    }

    /// Records a successfully loaded page and returns whether more remain.
    pub fn advance(&mut self, total: u64) -> bool {
        self.total = total;
        let more = self.has_more();
        self.page += 1;
        more
    }

    /// Whether results remain past the current page.
    pub fn has_more(&self) -> bool {
        (self.page as u64) * (self.per_page as u64) < self.total
    }
}
