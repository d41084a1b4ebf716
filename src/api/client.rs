use std::time::Duration;

use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{BotReply, BotRequest, Conversation, Message, SendRequest};

fn build_http(timeout: Duration) -> Result<HttpClient, ApiError> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(ApiError::Transport)
}

/// Appends path segments to `base`, keeping any path prefix the base already
/// has (e.g. a reverse proxy mount point).
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    check_status(resp)?.json::<T>().await.map_err(ApiError::Decode)
}

/// Client for the operator console server.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    pub http: HttpClient,
    pub base: Url,
}

impl ConsoleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http(timeout)?,
            base: Url::parse(base_url)?,
        })
    }

    /// Reach the conversations endpoint and report the HTTP status, whatever
    /// it is. Only transport failures are errors.
    pub async fn ping(&self) -> Result<u16, ApiError> {
        let url = endpoint(&self.base, &["api", "conversations"])?;
        let resp = self.http.get(url).send().await.map_err(ApiError::Transport)?;
        Ok(resp.status().as_u16())
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let url = endpoint(&self.base, &["api", "conversations"])?;
        log::debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(ApiError::Transport)?;
        read_json(resp).await
    }

    pub async fn messages(&self, phone_number: &str) -> Result<Vec<Message>, ApiError> {
        let url = endpoint(&self.base, &["api", "messages", phone_number])?;
        log::debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(ApiError::Transport)?;
        read_json(resp).await
    }

    /// Post a manual operator message. The response body is ignored.
    pub async fn send(&self, request: &SendRequest) -> Result<(), ApiError> {
        let url = endpoint(&self.base, &["api", "send"])?;
        log::debug!("POST {url} for {}", request.phone_number);
        let resp = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check_status(resp)?;
        Ok(())
    }
}

/// Client for the single bot endpoint.
#[derive(Debug, Clone)]
pub struct BotClient {
    pub http: HttpClient,
    pub base: Url,
}

impl BotClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http(timeout)?,
            base: Url::parse(base_url)?,
        })
    }

    pub async fn ask(&self, message: &str) -> Result<String, ApiError> {
        let url = endpoint(&self.base, &["api", "message"])?;
        log::debug!("POST {url}");
        let body = BotRequest {
            message: message.to_string(),
        };
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let reply: BotReply = read_json(resp).await?;
        Ok(reply.reply)
    }
}
