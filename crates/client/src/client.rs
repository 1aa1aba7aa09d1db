use reqwest::{Method, RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, Result},
    session::Session,
};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "error", alias = "title")]
    message: Option<String>,
}

/// REST client for the carbonboard API.
///
/// Every request reads the token from the shared [`Session`] right before it
/// is sent and carries it as `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    session: Session,
}

impl Client {
    /// `base_url` includes the API prefix, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "api request");
        let req = self.http.request(method, url);
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends `req` and decodes a JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = self.execute(req).await?;
        Ok(res.json::<T>().await?)
    }

    /// Sends `req` and decodes the body if there is one.
    pub(crate) async fn send_optional<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<Option<T>> {
        let res = self.execute(req).await?;
        let body = res.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Sends `req` and ignores the body.
    pub(crate) async fn send_unit(&self, req: RequestBuilder) -> Result<()> {
        self.execute(req).await.map(|_| ())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let res = req.send().await.inspect_err(|err| {
            tracing::error!("api transport error: {err}");
        })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let url = res.url().to_string();
        let text = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| match text.trim() {
                "" => "unknown error".to_string(),
                raw => raw.chars().take(200).collect(),
            });

        tracing::error!(status = status.as_u16(), %url, "api error: {message}");
        Err(ClientError::from_status(status.as_u16(), message))
    }
}
