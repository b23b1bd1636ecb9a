use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::protocol::{ErrorBody, Monitor, MonitorCreate, MonitorPatch};
use crate::types::map_reqwest_error;
use crate::{AuditError, FailureKind};

const USER_AGENT: &str = concat!("siteauditor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applied to discrete requests only, never to the streaming GET.
    pub request_timeout: Duration,
    pub bearer_token: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            bearer_token: None,
        }
    }
}

/// Shared HTTP client for the audit backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    request_timeout: Duration,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, AuditError> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let mut base_url = settings.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|err| AuditError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self {
            http,
            base,
            request_timeout: settings.request_timeout,
            token: settings.bearer_token.clone(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AuditError> {
        self.base
            .join(path)
            .map_err(|err| AuditError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET with the request timeout applied; for discrete calls.
    pub(crate) fn get(&self, path: &str) -> Result<RequestBuilder, AuditError> {
        let url = self.endpoint(path)?;
        Ok(self
            .authorize(self.http.get(url))
            .timeout(self.request_timeout))
    }

    /// GET without an overall timeout; the stream lives as long as the
    /// server keeps it open.
    pub(crate) fn get_streaming(&self, path: &str) -> Result<RequestBuilder, AuditError> {
        let url = self.endpoint(path)?;
        Ok(self.authorize(self.http.get(url)))
    }

    pub(crate) fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RequestBuilder, AuditError> {
        let url = self.endpoint(path)?;
        Ok(self
            .authorize(self.http.post(url))
            .timeout(self.request_timeout)
            .json(body))
    }

    /// Map a non-success response to an error, preferring the backend's
    /// `detail` text over the bare status line.
    pub(crate) async fn failure_from_response(response: Response) -> AuditError {
        let status = response.status();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        AuditError::new(
            FailureKind::HttpStatus(status.as_u16()),
            detail.unwrap_or_else(|| status.to_string()),
        )
    }

    /// `GET /api/health`; Ok means the backend answered 200.
    pub async fn health(&self) -> Result<(), AuditError> {
        let response = self.get("api/health")?.send().await.map_err(map_reqwest_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure_from_response(response).await)
        }
    }

    pub async fn list_monitors(&self) -> Result<Vec<Monitor>, AuditError> {
        let response = self
            .get("api/monitors")?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }
        response
            .json::<Vec<Monitor>>()
            .await
            .map_err(|err| AuditError::new(FailureKind::Protocol, err.to_string()))
    }

    pub async fn create_monitor(&self, create: &MonitorCreate) -> Result<Monitor, AuditError> {
        let response = self
            .post_json("api/monitors", create)?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }
        response
            .json::<Monitor>()
            .await
            .map_err(|err| AuditError::new(FailureKind::Protocol, err.to_string()))
    }

    pub async fn update_monitor(
        &self,
        id: i64,
        patch: &MonitorPatch,
    ) -> Result<Monitor, AuditError> {
        let url = self.endpoint(&format!("api/monitors/{id}"))?;
        let response = self
            .authorize(self.http.patch(url))
            .timeout(self.request_timeout)
            .json(patch)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(Self::failure_from_response(response).await);
        }
        response
            .json::<Monitor>()
            .await
            .map_err(|err| AuditError::new(FailureKind::Protocol, err.to_string()))
    }

    pub async fn delete_monitor(&self, id: i64) -> Result<(), AuditError> {
        let url = self.endpoint(&format!("api/monitors/{id}"))?;
        let response = self
            .authorize(self.http.delete(url))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            _ => Err(Self::failure_from_response(response).await),
        }
    }
}
