//! Request pipeline
//!
//! Every call to the backend goes through [`HttpPipeline`]:
//!
//! - outbound: bearer token and identity headers read from session storage
//! - inbound 2xx: the envelope is validated; domain failures become
//!   [`ClientError::Domain`], and session-invalidating ones tear the session down
//! - inbound failure: the transport error is classified into a user notice
//!
//! The caller always receives the error as well; notices are a side channel.

use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use shared::error::is_session_invalidating;
use shared::{EnvelopeOutcome, ResponseCategory};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::notice::{
    MSG_ACCESS_DENIED, MSG_AUTH_FAILED, MSG_NETWORK, MSG_NOT_FOUND, MSG_REQUEST_FAILED,
    MSG_SERVER_ERROR, MSG_TIMEOUT, Notice, Notifier,
};
use crate::session::{KEY_TOKEN, KEY_USER, SessionStorage};
use crate::signal::{AuthEvent, AuthSignals};

pub const HEADER_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");
pub const HEADER_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const HEADER_USERNAME: HeaderName = HeaderName::from_static("x-username");

/// Connect timeout for event streams, which have no overall deadline
const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Identity fields the gateway expects as headers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentity {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
}

/// Backend request pipeline
#[derive(Clone)]
pub struct HttpPipeline {
    client: Client,
    stream_client: Client,
    base_url: String,
    storage: Arc<dyn SessionStorage>,
    notifier: Arc<dyn Notifier>,
    signals: AuthSignals,
}

impl std::fmt::Debug for HttpPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPipeline")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpPipeline {
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
        signals: AuthSignals,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        let stream_client = Client::builder()
            .connect_timeout(STREAM_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            stream_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
            notifier,
            signals,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signals(&self) -> &AuthSignals {
        &self.signals
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.storage
            .get(key)
            .ok()
            .flatten()
            .filter(|value| !value.is_empty())
    }

    /// Headers attached to every request
    pub fn outbound_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = self
            .stored(KEY_TOKEN)
            .and_then(|token| HeaderValue::from_str(&format!("Bearer {token}")).ok());
        if let Some(value) = bearer {
            headers.insert(AUTHORIZATION, value);
        }

        // An unreadable user record just means no identity headers
        let identity = self
            .stored(KEY_USER)
            .and_then(|raw| serde_json::from_str::<StoredIdentity>(&raw).ok());
        if let Some(identity) = identity {
            let fields = [
                (HEADER_TENANT_ID, identity.tenant_id),
                (HEADER_USER_ID, identity.id),
                (
                    HEADER_USERNAME,
                    identity
                        .username
                        .map(|name| urlencoding::encode(&name).into_owned()),
                ),
            ];
            for (name, value) in fields {
                let Some(value) = value.filter(|v| !v.is_empty()) else {
                    continue;
                };
                if let Ok(value) = HeaderValue::from_str(&value) {
                    headers.insert(name, value);
                }
            }
        }

        headers
    }

    /// Start a request with the outbound headers applied
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .headers(self.outbound_headers())
    }

    /// Send a request and unwrap its envelope
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<Option<T>> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(e.into())),
        };
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ClientResult<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.transport_failure(ClientError::Status { status, body }));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.transport_failure(e.into())),
        };

        let outcome = match EnvelopeOutcome::parse(&body).and_then(|o| o.bind::<T>()) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected response envelope");
                self.notifier.notify(Notice::error(MSG_REQUEST_FAILED));
                return Err(e.into());
            }
        };

        match outcome {
            EnvelopeOutcome::Success { data, .. } => Ok(data),
            EnvelopeOutcome::Failure { code, message } => Err(self.domain_failure(code, message)),
        }
    }

    /// Report a domain failure and tear the session down when the backend says so
    fn domain_failure(&self, code: i32, message: String) -> ClientError {
        let text = if message.is_empty() {
            MSG_REQUEST_FAILED
        } else {
            message.as_str()
        };
        self.notifier.notify(Notice::error(text));

        let category = ResponseCategory::from_code(code);
        if is_session_invalidating(code, &message) {
            tracing::warn!(code, "Session invalidated by backend");
            if let Err(e) = self.storage.clear_session() {
                tracing::error!(error = %e, "Failed to clear persisted session");
            }
            self.signals.publish(AuthEvent::Unauthorized);
        } else if category.is_server_side() {
            tracing::warn!(code, category = category.name(), message = %message, "Backend failure");
        } else {
            tracing::debug!(code, category = category.name(), message = %message, "Domain error");
        }

        ClientError::Domain { code, message }
    }

    /// Report a transport failure; the session is never touched here
    fn transport_failure(&self, error: ClientError) -> ClientError {
        tracing::warn!(error = %error, status = ?error.status(), "Request failed");
        self.notifier.notify(Notice::error(transport_notice(&error)));
        error
    }

    /// Success envelope without the data the endpoint promises
    fn require<T>(&self, data: Option<T>, path: &str) -> ClientResult<T> {
        data.ok_or_else(|| {
            tracing::warn!(path, "Success envelope carried no data");
            self.notifier.notify(Notice::error(MSG_REQUEST_FAILED));
            ClientError::InvalidResponse(format!("Missing data for {path}"))
        })
    }

    // ========== Convenience verbs ==========

    /// GET and require data
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let data = self.send(self.request(Method::GET, path)).await?;
        self.require(data, path)
    }

    /// GET with query parameters and require data
    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let data = self.send(self.request(Method::GET, path).query(query)).await?;
        self.require(data, path)
    }

    /// POST a JSON body and require data
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = self.send(self.request(Method::POST, path).json(body)).await?;
        self.require(data, path)
    }

    /// POST without a body and require data
    pub async fn post_for<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let data = self.send(self.request(Method::POST, path)).await?;
        self.require(data, path)
    }

    /// POST a JSON body to a void endpoint
    pub async fn post_void<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send::<IgnoredAny>(self.request(Method::POST, path).json(body))
            .await
            .map(|_| ())
    }

    /// POST without a body to a void endpoint
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        self.send::<IgnoredAny>(self.request(Method::POST, path))
            .await
            .map(|_| ())
    }

    /// POST without a body, passing arguments in the query string
    pub async fn post_empty_with<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> ClientResult<()> {
        self.send::<IgnoredAny>(self.request(Method::POST, path).query(query))
            .await
            .map(|_| ())
    }

    /// PUT a JSON body and require data
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = self.send(self.request(Method::PUT, path).json(body)).await?;
        self.require(data, path)
    }

    /// PUT a JSON body to a void endpoint
    pub async fn put_void<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send::<IgnoredAny>(self.request(Method::PUT, path).json(body))
            .await
            .map(|_| ())
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<IgnoredAny>(self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }

    /// Open an event stream with a JSON body.
    ///
    /// The status is not checked here; the stream reader reports non-2xx
    /// responses through its error callback.
    pub async fn open_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Response> {
        let response = self
            .stream_client
            .post(self.url(path))
            .headers(self.outbound_headers())
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await?;
        tracing::debug!(path, status = %response.status(), "Event stream opened");
        Ok(response)
    }
}

/// User-facing text for a transport failure
pub fn transport_notice(error: &ClientError) -> String {
    match error.status() {
        Some(StatusCode::UNAUTHORIZED) => MSG_AUTH_FAILED.to_string(),
        Some(StatusCode::FORBIDDEN) => MSG_ACCESS_DENIED.to_string(),
        Some(StatusCode::NOT_FOUND) => MSG_NOT_FOUND.to_string(),
        Some(StatusCode::INTERNAL_SERVER_ERROR) => MSG_SERVER_ERROR.to_string(),
        Some(_) => body_message(error).unwrap_or_else(|| MSG_REQUEST_FAILED.to_string()),
        None if error.is_timeout() => MSG_TIMEOUT.to_string(),
        None if error.is_network() => MSG_NETWORK.to_string(),
        None => MSG_REQUEST_FAILED.to_string(),
    }
}

/// `message` field of a JSON error body
fn body_message(error: &ClientError) -> Option<String> {
    let ClientError::Status { body, .. } = error else {
        return None;
    };
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
