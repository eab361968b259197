//! reqwest backed transport tuned for GitBucket response framing
use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::{
    error::{KeeperError, Result},
    forge::{
        config::{AuthSettings, USER_AGENT},
        request::{ApiRequest, ApiResponse},
        traits::Transport,
    },
};

/// Token authenticated JSON client bound to a single API root.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(settings: &AuthSettings) -> Result<Self> {
        let token = settings.token.expose_secret();

        let mut headers = HeaderMap::new();

        let token_value =
            HeaderValue::from_str(format!("token {}", token).as_str())?;

        headers.append(AUTHORIZATION, token_value);
        headers.append(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: api_root(&settings.api_base),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `req`, percent-encoding every path segment and
    /// query pair.
    pub fn url_for(&self, req: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                KeeperError::configuration(format!(
                    "{} cannot be used as an API root",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(&req.segments);

        if !req.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&req.query);
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&req)?;
        log::debug!("{} {}", req.method, url);

        let mut builder = self.client.request(req.method, url);
        if let Some(body) = req.body {
            builder = builder.json(&body);
        }

        let request = builder.build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(ApiResponse::new(status, unescape_body(body)))
    }
}

/// Normalise the API root so it always ends with a slash.
fn api_root(api_base: &Url) -> Url {
    let mut base_url = api_base.clone();
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

/// GitBucket occasionally serializes a JSON document a second time as a
/// string literal. Unwrap one level when the inner text is itself JSON.
pub fn unescape_body(body: String) -> String {
    if let Ok(Value::String(inner)) = serde_json::from_str::<Value>(&body)
        && serde_json::from_str::<Value>(&inner).is_ok()
    {
        return inner;
    }
    body
}
