use reqwest::Method;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::ApiReply;
use crate::error::{ClientError, Result};

/// Thin HTTP dispatcher shared by every resource service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("clinic-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req.header("Accept", "application/json")
    }

    /// Send one request. Query parameters are always passed as parameters,
    /// never folded into `path`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiReply> {
        let url = self.api_url(path);
        tracing::debug!(%method, %url, "dispatching request");

        let mut req = self.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(ClientError::Transport)?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<ApiReply> {
    let status = resp.status();
    let body = resp.text().await.map_err(ClientError::Transport)?;

    if !status.is_success() {
        let parsed = serde_json::from_str::<Value>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|json| json.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    body.clone()
                }
            });
        return Err(ClientError::server(status.as_u16(), message, parsed));
    }

    if body.trim().is_empty() {
        return Ok(ApiReply::new(status.as_u16(), Value::Null));
    }

    let json = serde_json::from_str(&body)?;
    Ok(ApiReply::new(status.as_u16(), json))
}
