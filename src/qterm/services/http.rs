//! The network seam.
//!
//! Services speak to the outside world only through [`HttpClient`], so the
//! request-building and response-interpretation logic can be exercised with
//! canned responses.

use crate::error::{QtermError, Result};
use async_trait::async_trait;
use reqwest::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum HttpRequest {
    Get {
        url: Url,
    },
    PostJson {
        url: Url,
        bearer: Option<String>,
        body: serde_json::Value,
    },
}

impl HttpRequest {
    pub fn url(&self) -> &Url {
        match self {
            HttpRequest::Get { url } | HttpRequest::PostJson { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one request and returns whatever the server answered.
///
/// Only failures to obtain a response are errors; a non-2xx status is a
/// successful exchange that callers interpret themselves.
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("qterm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QtermError::Transport(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait(?Send)]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request {
            HttpRequest::Get { url } => self.inner.get(url),
            HttpRequest::PostJson { url, bearer, body } => {
                let builder = self.inner.post(url).json(&body);
                match bearer {
                    Some(token) => builder.bearer_auth(token),
                    None => builder,
                }
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays queued outcomes and records every request it receives.
    #[derive(Default)]
    pub struct StubClient {
        replies: RefCell<VecDeque<Result<HttpResponse>>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl StubClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            let status_text = match status {
                200 => "OK",
                401 => "Unauthorized",
                429 => "Too Many Requests",
                500 => "Internal Server Error",
                503 => "Service Unavailable",
                _ => "",
            };
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(self, error: QtermError) -> Self {
            self.replies.borrow_mut().push_back(Err(error));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl HttpClient for StubClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(QtermError::Transport("no stubbed reply".into())))
        }
    }
}
