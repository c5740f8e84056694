use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::ModulesError;
use crate::model::RepositoryReference;

pub const GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("nfmod/", env!("CARGO_PKG_VERSION"));

/// Status and raw body of a completed GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Seam between the module workflow and the network.
#[allow(async_fn_in_trait)]
pub trait HttpFetch {
    async fn get(&self, url: &str) -> Result<HttpResponse, ModulesError>;
}

/// Unauthenticated GitHub REST client.
pub struct GitHubClient {
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new() -> Result<Self, ModulesError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|source| ModulesError::Http {
                url: GITHUB_API_URL.to_string(),
                source,
            })?;

        Ok(Self { client })
    }
}

impl HttpFetch for GitHubClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ModulesError> {
        debug!("GET {url}");
        let to_error = |source| ModulesError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(to_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(to_error)?;
        debug!("{status} from {url} ({} bytes)", body.len());

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Recursive tree listing URL for a repository branch.
pub fn tree_url(api_url: &str, reference: &RepositoryReference) -> String {
    format!(
        "{}/repos/{}/git/trees/{}?recursive=1",
        api_url.trim_end_matches('/'),
        reference.name(),
        reference.branch()
    )
}
