use std::sync::Arc;
use std::time::Duration;

use common::types::ApiResponse;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use service::auth::SessionStore;
use service::ServiceError;
use tracing::{debug, warn};

/// Base REST client: attaches the stored bearer token and unwraps the
/// `{success, data, message, errors}` envelope. No retries.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

fn transport(e: reqwest::Error) -> ServiceError { ServiceError::Transport(e.to_string()) }

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn SessionStore>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder().timeout(timeout).build().map_err(transport)?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), session })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn session(&self) -> Arc<dyn SessionStore> { self.session.clone() }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.session.token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and unwrap the envelope; `Ok(None)` when the call succeeded without data.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<Option<T>, ServiceError> {
        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(transport)?;
        debug!(%status, path, "api_response");

        match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope.data),
            Ok(envelope) => {
                let message = envelope.failure_text();
                warn!(status = status.as_u16(), path, %message, "api_call_failed");
                Err(ServiceError::Http { status: status.as_u16(), message })
            }
            Err(e) if status.is_success() => Err(ServiceError::Transport(format!("unreadable response from {path}: {e}"))),
            Err(_) => Err(ServiceError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            }),
        }
    }

    fn required<T>(data: Option<T>, path: &str) -> Result<T, ServiceError> {
        data.ok_or_else(|| ServiceError::Transport(format!("response from {path} has no data")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let req = self.request(Method::GET, path).await;
        Self::required(self.send(req, path).await?, path)
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync + ?Sized,
    {
        let req = self.request(Method::GET, path).await.query(query);
        Self::required(self.send(req, path).await?, path)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).await.json(body);
        Self::required(self.send(req, path).await?, path)
    }

    /// POST without a body; the response data is optional.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ServiceError> {
        let req = self.request(Method::POST, path).await;
        self.send(req, path).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path).await.json(body);
        Self::required(self.send(req, path).await?, path)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ServiceError> {
        let req = self.request(Method::DELETE, path).await;
        self.send(req, path).await
    }
}
