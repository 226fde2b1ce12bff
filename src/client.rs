// SafeComms API client: a thin reqwest wrapper around the moderation
// and usage endpoints.
//
// Each call is a single request/response round trip. Nothing is retried and
// no state changes between calls, so one client can be cloned and shared
// across tasks freely.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Error, Result};
use crate::image;
use crate::types::{
    ImageModerationRequest, ModerationResult, ProblemDetails, TextModerationRequest,
    UsageResponse,
};

const USER_AGENT: &str = concat!("safecomms-rust/", env!("CARGO_PKG_VERSION"));

const TEXT_MODERATION_PATH: &str = "/moderation/text";
const IMAGE_MODERATION_PATH: &str = "/moderation/image";
const USAGE_PATH: &str = "/usage";

/// Authenticated client for the SafeComms API.
#[derive(Debug, Clone)]
pub struct SafeCommsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SafeCommsClient {
    /// Create a client for the configured endpoint.
    ///
    /// No network I/O happens here. The credential isn't validated: an empty
    /// key sends no `Authorization` header, and a key that isn't a legal
    /// header value fails on the first request as a transport error.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: config.resolved_base_url().to_string(),
            api_key: config.api_key,
        })
    }

    /// The endpoint this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Moderate a piece of text.
    ///
    /// Unset fields default to `language="en"`, `replace=false`, `pii=false`.
    pub async fn moderate_text(
        &self,
        request: TextModerationRequest,
    ) -> Result<ModerationResult> {
        self.post_json(TEXT_MODERATION_PATH, &request.with_defaults()).await
    }

    /// Moderate an image given as a URL or data URI. Unset language defaults to `"en"`.
    pub async fn moderate_image(
        &self,
        request: ImageModerationRequest,
    ) -> Result<ModerationResult> {
        self.post_json(IMAGE_MODERATION_PATH, &request.with_defaults()).await
    }

    /// Read a local image, inline it as a base64 data URI and moderate it.
    ///
    /// The MIME type comes from the file extension (see
    /// [`image::mime_type_for_path`]). A failed read is returned as
    /// [`Error::Io`] before any request is made.
    pub async fn moderate_image_file(
        &self,
        path: impl AsRef<Path>,
        language: Option<&str>,
        moderation_profile_id: Option<&str>,
    ) -> Result<ModerationResult> {
        let path = path.as_ref();
        let data_uri = image::load_data_uri(path).await?;

        debug!(
            path = %path.display(),
            encoded_len = data_uri.len(),
            "Encoded image file"
        );

        let request = ImageModerationRequest {
            image: data_uri,
            language: language.map(str::to_string),
            moderation_profile_id: moderation_profile_id.map(str::to_string),
        };
        self.moderate_image(request).await
    }

    /// Fetch the account's tier, limits and token usage.
    pub async fn get_usage(&self) -> Result<UsageResponse> {
        let response = self
            .request(Method::GET, USAGE_PATH)
            .send()
            .await
            .map_err(Error::Transport)?;
        read_json(response, USAGE_PATH).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        read_json(response, path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path = path, "SafeComms request");

        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }
}

/// Decode a success body, or turn an error response into a [`ClientError`].
async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let fallback = response
            .error_for_status_ref()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| format!("HTTP status {status}"));

        // Any JSON body is kept as-is; only an unreadable or non-JSON body leaves `problem` unset
        let problem = response
            .bytes()
            .await
            .ok()
            .and_then(|body| serde_json::from_slice::<Value>(&body).ok())
            .map(ProblemDetails::new);

        let error = ClientError::from_problem(status.as_u16(), problem, fallback);
        warn!(
            status = status.as_u16(),
            path = path,
            message = %error.message,
            "SafeComms API returned an error"
        );
        return Err(error.into());
    }

    response.json::<T>().await.map_err(Error::Decode)
}
