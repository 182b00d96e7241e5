// src/fetch/http.rs
// =============================================================================
// The production Fetcher, built on reqwest.
//
// Key functionality:
// - One pooled Client shared by every worker (Client is cheap to clone)
// - probe(): HEAD request, falls back to GET for servers that refuse HEAD
// - fetch(): GET with its own (longer) timeout, follows redirects and
//   reports where they ended up
// - reqwest errors are turned into TransportError variants
//
// Rust concepts:
// - async/await: network I/O without blocking the thread
// - impl Trait for Type: HttpFetcher implements our Fetcher trait
// =============================================================================

use super::{FetchedPage, Fetcher};
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    fetch_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpFetcher {
    // Builds a fetcher with its own connection pool.
    //
    // Parameters:
    //   user_agent: sent with every request
    //   fetch_timeout: limit for a full GET
    //   probe_timeout: limit for a HEAD liveness check
    pub fn new(
        user_agent: impl Into<String>,
        fetch_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
            fetch_timeout,
            probe_timeout,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.fetch_timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        debug!(url, status, bytes = body.len(), "fetched");

        Ok(FetchedPage {
            status,
            final_url,
            content_type,
            body,
        })
    }

    async fn probe(&self, url: &str) -> Result<u16, TransportError> {
        // First, try a HEAD request (faster, no body download)
        let response = self
            .client
            .head(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.probe_timeout)
            .send()
            .await?;

        let status = response.status();
        if !matches!(status, StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED) {
            return Ok(status.as_u16());
        }

        // Some servers refuse HEAD outright; that says nothing about the page
        debug!(url, status = status.as_u16(), "HEAD refused, retrying with GET");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.probe_timeout)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("crawlscope-test", Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_status_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href=\"/next\">next</a>")
            .create_async()
            .await;

        let page = fetcher().fetch(&format!("{}/page", server.url())).await.unwrap();
        assert_eq!(page.status, 200);
        assert!(page.is_html());
        assert!(page.body.contains("/next"));
        assert_eq!(page.final_url, format!("{}/page", server.url()));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_redirect_target() {
        let mut server = Server::new_async().await;
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new")
            .with_status(200)
            .with_body("moved here")
            .create_async()
            .await;

        let page = fetcher().fetch(&format!("{}/old", server.url())).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.final_url, format!("{}/new", server.url()));
    }

    #[tokio::test]
    async fn test_probe_uses_head() {
        let mut server = Server::new_async().await;
        let head = server
            .mock("HEAD", "/dead")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let status = fetcher().probe(&format!("{}/dead", server.url())).await.unwrap();
        assert_eq!(status, 404);
        head.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_get() {
        let mut server = Server::new_async().await;
        let _head = server
            .mock("HEAD", "/no-head")
            .with_status(405)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/no-head")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let status = fetcher().probe(&format!("{}/no-head", server.url())).await.unwrap();
        assert_eq!(status, 200);
        get.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is essentially never listening on a test machine
        let result = fetcher().probe("http://127.0.0.1:9/").await;
        assert!(result.is_err());
    }
}
