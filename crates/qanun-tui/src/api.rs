use qanun_types::{ChatRequest, ChatResponse, Mode, SessionDetail, SessionSummary};
use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The five calls the chat view-model issues against the backend.
pub trait ChatBackend: Send + Sync {
    fn send_chat(&self, message: &str, mode: Mode) -> Result<String, ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
    fn new_session(&self) -> Result<(), ApiError>;
    fn list_history(&self) -> Result<Vec<SessionSummary>, ApiError>;
    fn get_session(&self, session_id: &str) -> Result<SessionDetail, ApiError>;
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_options(base_url, DEFAULT_TIMEOUT, None)
    }

    /// `user_id` seeds the backend's identity cookie; the jar is never persisted.
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        user_id: Option<&str>,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let cookies = Arc::new(Jar::default());
        if let Some(user_id) = user_id.map(str::trim).filter(|id| !id.is_empty()) {
            cookies.add_cookie_str(&format!("user_id={}; Path=/", user_id), &base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(cookies.clone())
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Raw `Cookie` header the next request would carry.
    pub fn cookie_header(&self) -> Option<String> {
        use reqwest::cookie::CookieStore;
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn send_chat(&self, message: &str, mode: Mode) -> Result<String, ApiError> {
        let url = self.endpoint(&["chat"])?;
        let request = ChatRequest {
            message: message.to_string(),
            mode,
        };

        let response = self.client.post(url).json(&request).send()?;
        let response = check_status(response)?;

        let body: ChatResponse = decode(response)?;
        Ok(body.answer)
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "clear"])?;
        let response = self.client.post(url).send()?;
        check_status(response)?;
        Ok(())
    }

    pub fn new_session(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "new_session"])?;
        let response = self.client.post(url).send()?;
        check_status(response)?;
        Ok(())
    }

    pub fn list_history(&self) -> Result<Vec<SessionSummary>, ApiError> {
        let url = self.endpoint(&["api", "history"])?;
        let response = self.client.get(url).send()?;
        let response = check_status(response)?;
        decode(response)
    }

    pub fn get_session(&self, session_id: &str) -> Result<SessionDetail, ApiError> {
        let url = self.endpoint(&["api", "session", session_id])?;
        let response = self.client.get(url).send()?;
        let response = check_status(response)?;
        decode(response)
    }
}

impl ChatBackend for ApiClient {
    fn send_chat(&self, message: &str, mode: Mode) -> Result<String, ApiError> {
        ApiClient::send_chat(self, message, mode)
    }

    fn clear(&self) -> Result<(), ApiError> {
        ApiClient::clear(self)
    }

    fn new_session(&self) -> Result<(), ApiError> {
        ApiClient::new_session(self)
    }

    fn list_history(&self) -> Result<Vec<SessionSummary>, ApiError> {
        ApiClient::list_history(self)
    }

    fn get_session(&self, session_id: &str) -> Result<SessionDetail, ApiError> {
        ApiClient::get_session(self, session_id)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http(s) url".to_string(),
        });
    }
    Ok(url)
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status { status, body })
}

fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes()?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
