use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use gateway_binding_planner::entities::{RenderedRequest, Verb};
use reqwest::header::ACCEPT;
use url::Url;

use crate::entities::RawResponse;
use crate::error::CallError;
use crate::use_cases::ports::Transport;

/// Reqwest-based HTTP transport
#[derive(Clone, Debug)]
pub struct Reqwest {
    client: reqwest::Client,
    base_url: Url,
}

impl Reqwest {
    /// Transport sending every request below `base_url`, e.g. `http://localhost:8081`
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, CallError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Same as [`new`](Self::new) with a preconfigured client (timeouts, TLS, headers)
    pub fn with_client(client: reqwest::Client, base_url: impl AsRef<str>) -> Result<Self, CallError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| CallError::Transport(format!("invalid base url: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append the rendered path to the base url, keeping any base path prefix
    fn url(&self, request: &RenderedRequest) -> Result<Url, CallError> {
        let url = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path_and_query()
        );
        Url::parse(&url).map_err(|e| CallError::Transport(format!("invalid request url: {}", e)))
    }
}

fn method(verb: Verb) -> reqwest::Method {
    match verb {
        Verb::Get => reqwest::Method::GET,
        Verb::Post => reqwest::Method::POST,
        Verb::Put => reqwest::Method::PUT,
        Verb::Patch => reqwest::Method::PATCH,
        Verb::Delete => reqwest::Method::DELETE,
    }
}

impl Reqwest {
    /// Prepare the reqwest request; a JSON body sets the content type
    fn request(&self, request: &RenderedRequest) -> Result<reqwest::RequestBuilder, CallError> {
        let url = self.url(request)?;
        let builder = self
            .client
            .request(method(request.verb), url)
            .header(ACCEPT, "application/json");
        Ok(match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        })
    }
}

#[async_trait]
impl Transport for Reqwest {
    async fn send(&self, request: RenderedRequest) -> Result<RawResponse, CallError> {
        let response = self
            .request(&request)?
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map_err(|e| CallError::Transport(e.to_string()))
            .boxed();
        Ok(RawResponse::new(status, body))
    }
}
