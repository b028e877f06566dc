use crate::controller::Settings;
use crate::sanitize::MAX_QUERY_LEN;
use crate::trigger::{DEBOUNCE_DELAY, Layout, Strategy};
use anyhow::{Context, Result, bail};
use pixabay::client::Options;
use pixabay::{ApiEndpoint, Filters};
use serde::Deserialize;
use serde_json::from_str;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Shipped with the widget; override with `key` in the config file.
const DEFAULT_KEY: &str = "28371758-065fc86b54820776754ee6bc7";
const DEFAULT_PER_PAGE: u32 = 40;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    key: Option<String>,
    api_host: Option<String>,
    per_page: Option<u32>,
    max_query_len: Option<usize>,
    debounce_ms: Option<u64>,
    strategy: Option<String>,
    proxy: Option<String>,
    timeout_secs: Option<u64>,
    output: Option<PathBuf>,
    columns: Option<usize>,
    card_height: Option<f64>,
    viewport_height: Option<f64>,
    root_margin: Option<f64>,
    color: Option<bool>,
}

#[derive(Debug)]
pub struct Config {
    pub key: String,
    pub api_host: Option<String>,
    pub per_page: u32,
    pub max_query_len: usize,
    pub debounce: Duration,
    pub strategy: Strategy,
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
    pub output: PathBuf,
    pub layout: Layout,
    pub viewport_height: f64,
    pub color: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy> {
    match s {
        "scroll" => Ok(Strategy::Scroll),
        "sentinel" => Ok(Strategy::Sentinel),
        _ => bail!("unknown strategy {:?}, expected \"scroll\" or \"sentinel\"", s),
    }
}

impl Config {
    fn resolve(file: ConfigFile) -> Result<Self> {
        let per_page = file.per_page.unwrap_or(DEFAULT_PER_PAGE);
        // The API serves between 3 and 200 hits per page.
        if !(3..=200).contains(&per_page) {
            bail!("per_page must be within 3..=200, got {}", per_page);
        }
        let defaults = Layout::default();
        let layout = Layout {
            columns: file.columns.unwrap_or(defaults.columns).max(1),
            card_height: file.card_height.unwrap_or(defaults.card_height),
            root_margin: file.root_margin.unwrap_or(defaults.root_margin),
        };
        if layout.card_height <= 0. {
            bail!("card_height must be positive");
        }
        if layout.root_margin < 0. {
            bail!("root_margin must not be negative");
        }
        let viewport_height = file.viewport_height.unwrap_or(800.);
        if viewport_height <= 0. {
            bail!("viewport_height must be positive");
        }
        Ok(Self {
            key: file.key.unwrap_or_else(|| DEFAULT_KEY.to_owned()),
            api_host: file.api_host,
            per_page,
            max_query_len: file.max_query_len.unwrap_or(MAX_QUERY_LEN),
            debounce: file
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEBOUNCE_DELAY),
            strategy: match file.strategy {
                Some(s) => parse_strategy(&s)?,
                None => Strategy::default(),
            },
            proxy: file.proxy,
            timeout: file.timeout_secs.map(Duration::from_secs),
            output: file.output.unwrap_or_else(|| "gallery.html".into()),
            layout,
            viewport_height,
            color: file.color.unwrap_or(true),
        })
    }

    pub fn client_options(&self) -> Options {
        Options {
            host: self.api_host.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
            user_agent: Some(concat!("pbg/", env!("CARGO_PKG_VERSION")).to_owned()),
            filters: Filters::default(),
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings {
            key: self.key.clone(),
            endpoint: ApiEndpoint::with_host(self.api_host.as_deref())
                .context("bad api_host")?,
            filters: Filters::default(),
            per_page: self.per_page,
            max_query_len: self.max_query_len,
            debounce: self.debounce,
            strategy: self.strategy,
            layout: self.layout,
            viewport_height: self.viewport_height,
        })
    }
}

/// Reads the config file at `path`; a missing file means all defaults.
pub fn read_config(path: &Path) -> Result<Config> {
    let file = match fs::read_to_string(path) {
        Ok(s) => from_str(&s).with_context(|| format!("parsing {}", path.display()))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("no {}, using defaults", path.display());
            ConfigFile::default()
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    Config::resolve(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Config> {
        Config::resolve(from_str(s)?)
    }

    #[test]
    fn defaults() {
        let c = parse("{}").unwrap();
        assert_eq!(c.key, DEFAULT_KEY);
        assert_eq!(c.per_page, 40);
        assert_eq!(c.max_query_len, 100);
        assert_eq!(c.debounce, Duration::from_millis(250));
        assert_eq!(c.strategy, Strategy::Sentinel);
        assert_eq!(c.output, PathBuf::from("gallery.html"));
        assert_eq!(c.layout, Layout::default());
        assert!(c.timeout.is_none());
    }

    #[test]
    fn overrides() {
        let c = parse(
            r#"{"key": "abc", "per_page": 20, "strategy": "scroll", "debounce_ms": 100,
                "timeout_secs": 5, "columns": 0, "api_host": "http://localhost:9000"}"#,
        )
        .unwrap();
        assert_eq!(c.key, "abc");
        assert_eq!(c.per_page, 20);
        assert_eq!(c.strategy, Strategy::Scroll);
        assert_eq!(c.debounce, Duration::from_millis(100));
        assert_eq!(c.timeout, Some(Duration::from_secs(5)));
        assert_eq!(c.layout.columns, 1);
        let s = c.settings().unwrap();
        assert_eq!(s.endpoint.search.1.as_str(), "http://localhost:9000/api/");
        assert_eq!(c.client_options().host.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(r#"{"strategy": "poll"}"#).is_err());
        assert!(parse(r#"{"per_page": 500}"#).is_err());
        assert!(parse(r#"{"card_height": 0}"#).is_err());
        assert!(parse(r#"{"viewport_height": 0}"#).is_err());
        assert!(parse(r#"{"viewport_height": -10.5}"#).is_err());
        assert!(parse(r#"{"root_margin": -1}"#).is_err());
        assert!(parse(r#"{"root_margin": 0, "viewport_height": 1}"#).is_ok());
        assert!(parse(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let c = read_config(Path::new("/nonexistent/pbg/config.json")).unwrap();
        assert_eq!(c.per_page, 40);
    }
}
