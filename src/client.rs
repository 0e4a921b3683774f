use std::sync::RwLock;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::api::ApiResponse;
use crate::session::{AuthToken, Session};

/// HTTP client for the SúperLista REST backend.
///
/// Every request carries the current session's bearer token. A 401 answered
/// to an expired token drops the session back to anonymous.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: RwLock<Session>,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::Config(format!("{}: {e}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "{} cannot be used as a base URL",
                config.api_base_url
            )));
        }

        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            base_url,
            session: RwLock::new(Session::from_token(config.api_token.clone())),
        })
    }

    pub fn with_session(self, session: Session) -> Self {
        Self {
            session: RwLock::new(session),
            ..self
        }
    }

    pub fn session(&self) -> Session {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn sign_in(&self, token: AuthToken) {
        self.replace_session(Session::Authenticated(token));
    }

    pub fn sign_out(&self) {
        self.replace_session(Session::Anonymous);
    }

    fn replace_session(&self, session: Session) {
        match self.session.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    /// Token of the current session, or `NotSignedIn`.
    pub fn require_session(&self) -> ApiResult<AuthToken> {
        self.session().token().cloned().ok_or(ApiError::NotSignedIn)
    }

    /// Base URL joined with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session().token() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if self.session().token().is_some_and(AuthToken::is_expired) {
                tracing::info!("Session token expired, signing out");
                self.sign_out();
            }
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            tracing::warn!("Backend error {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Unwrap the `{data, estado}` envelope. An empty body yields `None`.
    async fn read_envelope(response: Response) -> ApiResult<Option<Value>> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let envelope: ApiResponse<Value> = serde_json::from_str(&text)?;
        if envelope.is_error() {
            return Err(ApiError::Rejected(
                envelope.data.map(value_message).unwrap_or_default(),
            ));
        }
        Ok(envelope.data.filter(|v| !v.is_null()))
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        segments: &[&str],
    ) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let data = Self::read_envelope(response)
            .await?
            .ok_or_else(|| ApiError::MissingData(segments.join("/")))?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn get_data<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);
        self.fetch_data(self.request(Method::GET, url), segments).await
    }

    pub async fn post_data<B, T>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);
        self.fetch_data(self.request(Method::POST, url).json(body), segments)
            .await
    }

    /// POST whose envelope carries no useful data.
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<()> {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        Self::read_envelope(response).await?;
        Ok(())
    }

    pub async fn put_unit<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<()> {
        let url = self.endpoint(segments)?;
        tracing::debug!("PUT {}", url);
        self.send(self.request(Method::PUT, url).json(body)).await?;
        Ok(())
    }

    pub async fn delete_unit(&self, segments: &[&str]) -> ApiResult<()> {
        let url = self.endpoint(segments)?;
        tracing::debug!("DELETE {}", url);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

fn value_message(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Best-effort message from an error body: the envelope's `data` when the
/// body is an envelope, the raw text otherwise.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiResponse<Value>>(body)
        .ok()
        .and_then(|env| env.data)
        .map(value_message)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Serve `router` on an ephemeral port and return a client pointed at it.
#[cfg(test)]
pub(crate) async fn mock_backend(router: axum::Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ApiClient::new(&Config::for_base_url(format!("http://{addr}"))).unwrap()
}
