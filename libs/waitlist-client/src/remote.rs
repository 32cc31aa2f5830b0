//! HTTP implementation of [`WaitlistStore`].

use async_trait::async_trait;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;
use waitlist_types::{
    ErrorCode, ErrorResponse, MaintenanceStatus, SubmitResponse, WaitlistSubmission,
};

use crate::{
    error::ClientError,
    store::{SubmitOutcome, WaitlistStore},
};

/// Talks to a running waitlist API.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: Url,
    http_client: reqwest::Client,
}

impl RemoteStore {
    /// Create a client for the API mounted at `base_url`
    /// (for example `http://localhost:3001/api`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base url: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config("base url cannot be a base".into()));
        }
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Whether the site should show its maintenance page.
    pub async fn maintenance_status(&self) -> Result<bool, ClientError> {
        let response = self
            .http_client
            .get(self.endpoint("maintenance-status")?)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let status: MaintenanceStatus = read_json(response).await?;
        Ok(status.maintenance_mode)
    }
}

#[async_trait]
impl WaitlistStore for RemoteStore {
    async fn submit(&self, submission: &WaitlistSubmission) -> Result<SubmitOutcome, ClientError> {
        let response = self
            .http_client
            .post(self.endpoint("waitlist")?)
            .json(submission)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        let body: SubmitResponse = read_json(response).await?;

        Ok(SubmitOutcome {
            id: body.id,
            message: body.message,
            saved_locally: false,
        })
    }
}

/// Decode a JSON success body or turn the error body into a [`ClientError`].
///
/// A response that is not JSON at all means something other than the API
/// answered (a proxy error page, a misrouted request), so it counts as
/// unavailable.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if !is_json {
        return Err(ClientError::Unavailable(format!(
            "server returned non-JSON response ({status})"
        )));
    }

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::Unavailable(format!("malformed response: {e}")));
    }

    match response.json::<ErrorResponse>().await {
        Ok(body) if body.duplicate || body.code == ErrorCode::DuplicateEmail => {
            Err(ClientError::Duplicate)
        }
        Ok(body) => Err(ClientError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message.unwrap_or_else(|| default_message(status)),
        }),
        Err(_) => Err(ClientError::Api {
            status: status.as_u16(),
            code: ErrorCode::InternalError,
            message: default_message(status),
        }),
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
