use crate::endpoint::{ApiEndpoint, Endpoint};
use crate::error::{Error, Result};
use crate::model::SearchResponse;
use crate::query::{Filters, SearchQuery};
use log::{debug, error, info};
use reqwest::{Client as Http, Method, Proxy, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

async fn finalize<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let r = req.send().await?;
    let st = r.status();
    if st.is_success() {
        debug!("{} from {}", st, r.url());
        Ok(serde_json::from_slice(&r.bytes().await?)?)
    } else {
        error!("{} from {}", st, r.url());
        Err(Error::Api(st.as_u16(), r.text().await?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub host: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub filters: Filters,
}

#[derive(Debug, Clone)]
pub struct Client {
    http: Http,
    api: ApiEndpoint,
    key: String,
    pub filters: Filters,
}

impl Client {
    pub fn new<T: Into<String>>(key: T) -> Result<Self> {
        Self::with_options(key, &Options::default())
    }

    pub fn with_options<T: Into<String>>(key: T, opts: &Options) -> Result<Self> {
        let mut http = Http::builder().connect_timeout(Duration::from_secs(30));
        if let Some(timeout) = opts.timeout {
            http = http.timeout(timeout);
        }
        if let Some(proxy) = &opts.proxy {
            info!("using proxy {}", proxy);
            http = http.proxy(Proxy::all(proxy)?);
        }
        if let Some(ua) = &opts.user_agent {
            http = http.user_agent(ua);
        }
        Ok(Self {
            http: http.build()?,
            api: ApiEndpoint::with_host(opts.host.as_deref())?,
            key: key.into(),
            filters: opts.filters,
        })
    }

    pub fn search_url(&self, query: &SearchQuery) -> Url {
        self.api.search_url(&self.key, &self.filters, query)
    }

    /// Issues a single GET for an already composed search URL. No retries.
    pub async fn call_url(&self, url: &Url) -> Result<SearchResponse> {
        finalize((Method::GET, url.clone()).request(&self.http)).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        self.call_url(&self.search_url(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers exactly one request with a canned response and hands back
    /// the request head it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let _ = pretty_env_logger::try_init();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut head = Vec::new();
            loop {
                let n = sock.read(&mut buf).await.unwrap();
                head.extend_from_slice(&buf[..n]);
                if n == 0 || head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn client(host: String) -> Client {
        Client::with_options(
            "secret",
            &Options {
                host: Some(host),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn search_parses_hits() {
        let (host, server) = serve_once(
            "200 OK",
            r#"{"total":2,"totalHits":2,"hits":[{"id":1,"tags":"cat"},{"id":2,"tags":"kitten"}]}"#,
        )
        .await;
        let api = client(host);
        let r = api.search(&SearchQuery::new("cats", 1, 40)).await.unwrap();
        assert_eq!(r.total_hits, 2);
        assert_eq!(r.hits[1].tags, "kitten");

        let head = server.await.unwrap();
        let line = head.lines().next().unwrap();
        assert!(line.starts_with("GET /api/?q=cats&orientation=horizontal&image_type=photo"));
        assert!(line.contains("&key=secret&page=1 "));
    }

    #[tokio::test]
    async fn call_url_uses_the_given_url() {
        let (host, server) = serve_once("200 OK", r#"{"totalHits":0,"hits":[]}"#).await;
        let api = client(host);
        let url = api.search_url(&SearchQuery::new("dogs", 3, 10));
        let r = api.call_url(&url).await.unwrap();
        assert!(r.is_empty());
        let head = server.await.unwrap();
        assert!(head.contains("per_page=10&key=secret&page=3"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let (host, server) = serve_once("400 Bad Request", r#""[ERROR 400] Invalid API key""#).await;
        let api = client(host);
        let err = api.search(&SearchQuery::new("cats", 1, 40)).await.unwrap_err();
        match err {
            Error::Api(400, body) => assert!(body.contains("Invalid API key")),
            e => panic!("unexpected error: {e:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let (host, server) = serve_once("200 OK", "not json").await;
        let api = client(host);
        let err = api.search(&SearchQuery::new("cats", 1, 40)).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)), "unexpected error: {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = client(format!("http://{addr}"));
        let err = api.search(&SearchQuery::new("cats", 1, 40)).await.unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }
}
