use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use crate::feed::LikeBackend;
use crate::logging::targets;
use repdeck_types::*;

/// Name of the header the backend checks for its anti-forgery token
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// API client for the feed backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
    session_id: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: None,
            session_id: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the anti-forgery token sent with state-changing requests
    pub fn set_csrf_token(&mut self, token: Option<String>) {
        self.csrf_token = token;
    }

    /// Set the session id used as the same-origin credential
    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    /// Cookie header value carrying the session credentials, if any are set
    fn cookie_header(&self) -> Option<String> {
        let mut cookies = Vec::new();
        if let Some(session_id) = &self.session_id {
            cookies.push(format!("sessionid={}", session_id));
        }
        if let Some(token) = &self.csrf_token {
            cookies.push(format!("csrftoken={}", token));
        }
        if cookies.is_empty() {
            None
        } else {
            Some(cookies.join("; "))
        }
    }

    /// Helper to attach credentials to a request
    fn add_credentials(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.cookie_header() {
            Some(cookies) => req.header(reqwest::header::COOKIE, cookies),
            None => req,
        }
    }

    /// Helper to attach credentials plus the anti-forgery header
    fn add_csrf(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = self.add_credentials(req);
        match &self.csrf_token {
            Some(token) => req.header(CSRF_HEADER, token),
            None => req,
        }
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            // Django debug pages and proxies answer with HTML
            let clean_error = if error_text.contains("<html") || error_text.contains("<!DOCTYPE") {
                format!("Server returned {} error. Please check the server URL.", status.as_u16())
            } else {
                error_text
            };

            match status.as_u16() {
                404 => Err(ApiError::NotFound(clean_error)),
                401 | 403 => Err(ApiError::Unauthorized(clean_error)),
                400 => Err(ApiError::BadRequest(clean_error)),
                code => Err(ApiError::Api {
                    status: code,
                    message: clean_error,
                }),
            }
        }
    }

    /// URL of the like toggle endpoint for a post
    pub fn like_url(&self, post_id: &PostId) -> String {
        format!(
            "{}/social/post/{}/like/",
            self.base_url,
            urlencoding::encode(&post_id.to_string())
        )
    }

    /// Fetch the feed (read-only)
    pub async fn get_posts(&self) -> ApiResult<Vec<Post>> {
        let url = format!("{}/social/api/posts/", self.base_url);
        log::debug!(target: targets::API_CALLS, "GET {}", url);
        let req = self.add_credentials(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Toggle the current user's like on a post
    pub async fn toggle_like(&self, post_id: &PostId) -> ApiResult<LikeResponse> {
        let url = self.like_url(post_id);
        log::debug!(target: targets::API_CALLS, "POST {}", url);
        let req = self.add_csrf(self.client.post(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl LikeBackend for ApiClient {
    async fn toggle_like(&self, post_id: &PostId) -> ApiResult<LikeResponse> {
        ApiClient::toggle_like(self, post_id).await
    }
}
