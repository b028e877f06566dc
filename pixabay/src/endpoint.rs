use crate::query::{Filters, SearchQuery};
use reqwest::{Client, Method, RequestBuilder, Url};

type Result<T> = std::result::Result<T, url::ParseError>;
pub type SimpleEndpoint = (Method, Url);

pub const DEFAULT_HOST: &str = "https://pixabay.com";

pub trait Endpoint {
    fn request(&self, client: &Client) -> RequestBuilder;
}

impl Endpoint for SimpleEndpoint {
    fn request(&self, client: &Client) -> RequestBuilder {
        client.request(self.0.clone(), self.1.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    pub search: SimpleEndpoint,
}

impl ApiEndpoint {
    pub fn with_host(host: Option<&str>) -> Result<Self> {
        let host = host.unwrap_or(DEFAULT_HOST).trim_end_matches('/');
        // The API only answers on the slash-terminated path.
        let search = Url::parse(&format!("{host}/api/"))?;
        Ok(Self {
            search: (Method::GET, search),
        })
    }

    /// Composes the full request URL for one page of a search.
    ///
    /// Parameters are emitted in a fixed order: `q`, the filters,
    /// `per_page`, `key` and finally `page`.
    pub fn search_url(&self, key: &str, filters: &Filters, query: &SearchQuery) -> Url {
        let mut url = self.search.1.clone();
        url.query_pairs_mut()
            .append_pair("q", &query.q)
            .append_pair("orientation", filters.orientation.into())
            .append_pair("image_type", filters.image_type.into())
            .append_pair("safesearch", if filters.safesearch { "true" } else { "false" })
            .append_pair("per_page", &query.per_page.to_string())
            .append_pair("key", key)
            .append_pair("page", &query.page.to_string());
        url
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self::with_host(None).expect("default host is a valid url")
    }
}
