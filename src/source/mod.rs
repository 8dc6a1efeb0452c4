use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::events::{Command, Completion};
use crate::model::{PageRequest, PageResponse, RecordId, ThingType};

pub const DEFAULT_BASE_URL: &str = "https://mars.cyverse.org";
pub const DEFAULT_THING_PATH: &str = "thing";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Read side of the remote thing API.
#[async_trait]
pub trait ThingSource: Send + Sync {
    async fn list(&self, request: &PageRequest) -> Result<PageResponse, FetchError>;

    async fn get(&self, id: &RecordId) -> Result<Value, FetchError>;

    async fn types(&self) -> Result<Vec<ThingType>, FetchError>;
}

#[derive(Clone, Debug)]
pub struct SourceOptions {
    pub base_url: String,
    pub thing_path: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            thing_path: DEFAULT_THING_PATH.to_string(),
            timeout_seconds: 30,
            proxy: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpThingSource {
    client: reqwest::Client,
    root: Url,
}

impl HttpThingSource {
    pub fn new(options: &SourceOptions) -> Result<Self, FetchError> {
        let root = thing_root(&options.base_url, &options.thing_path)?;
        let client = build_client(options.proxy.as_deref(), options.timeout_seconds)?;
        Ok(Self { client, root })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    fn list_url(&self, request: &PageRequest) -> Url {
        let mut url = self.root.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("offset", &request.offset.to_string());
            query.append_pair("limit", &request.limit.to_string());
            if let Some(status) = request.status {
                query.append_pair("status", &status.to_string());
            }
            if let Some(authority) = request.authority.as_deref() {
                query.append_pair("authority", authority);
            }
        }
        url
    }

    fn record_url(&self, id: &RecordId) -> Result<Url, FetchError> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: self.root.to_string(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        url.query_pairs_mut().append_pair("full", "false");
        Ok(url)
    }

    fn types_url(&self) -> Result<Url, FetchError> {
        self.root.join("types").map_err(|_| FetchError::InvalidUrl {
            url: self.root.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl ThingSource for HttpThingSource {
    async fn list(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        self.get_json(self.list_url(request)).await
    }

    async fn get(&self, id: &RecordId) -> Result<Value, FetchError> {
        let url = self.record_url(id)?;
        self.get_json(url).await
    }

    async fn types(&self) -> Result<Vec<ThingType>, FetchError> {
        let url = self.types_url()?;
        self.get_json(url).await
    }
}

/// `<base>/<thing_path>/`, always with a trailing slash so relative joins
/// land under the thing path.
pub fn thing_root(base_url: &str, thing_path: &str) -> Result<Url, FetchError> {
    let invalid = || FetchError::InvalidUrl {
        url: base_url.to_string(),
    };
    let mut base = Url::parse(base_url.trim()).map_err(|_| invalid())?;
    if base.cannot_be_a_base() {
        return Err(invalid());
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let segment = thing_path.trim().trim_matches('/');
    if segment.is_empty() {
        return Ok(base);
    }
    base.join(&format!("{segment}/")).map_err(|_| invalid())
}

fn build_client(proxy: Option<&str>, timeout_seconds: u64) -> Result<reqwest::Client, FetchError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "thingview/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds.max(1)));

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::HttpClientBuild { source: e })
}

/// Performs one fetch command and packages its outcome for
/// [`crate::session::Session::complete`].
pub async fn execute(source: &dyn ThingSource, command: Command) -> Completion {
    match command {
        Command::FetchPage(request) => {
            let result = source.list(&request).await;
            Completion::Page { request, result }
        }
        Command::FetchDetail(ticket) => {
            let result = source.get(&ticket.id).await;
            Completion::Detail { ticket, result }
        }
        Command::FetchTypes => {
            let result = source.types().await;
            Completion::Types { result }
        }
    }
}
