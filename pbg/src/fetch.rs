use pixabay::reqwest::Url;
use pixabay::{Client, Result, SearchResponse};

/// Performs one GET for a composed search URL.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<SearchResponse>>;
}

impl Fetch for Client {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<SearchResponse>> {
        self.call_url(url)
    }
}
