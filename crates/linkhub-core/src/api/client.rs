//! HTTP client for the bookmark service
//!
//! Blocking REST client. Every call carries the configured request timeout;
//! requests are issued one at a time.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::{BookmarkApi, BookmarkFilter};
use crate::config::Config;
use crate::models::{BookmarkDraft, BookmarkPatch, Page, RemoteBookmark, Tag};

/// Paginated listing as returned by the service
#[derive(Debug, Deserialize)]
struct PageBody<T> {
    count: usize,
    next: Option<String>,
    results: Vec<T>,
}

impl<T> From<PageBody<T>> for Page<T> {
    fn from(body: PageBody<T>) -> Self {
        Page {
            count: body.count,
            items: body.results,
            has_next: body.next.is_some(),
        }
    }
}

/// Blocking client for the bookmark service REST API
pub struct HttpClient {
    /// Base URL without trailing slash
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Create a client for a service URL and API token
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::NotConfigured("service URL is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Token {}", token.trim()))
            .map_err(|_| ApiError::NotConfigured("API token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkhub/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| ApiError::NotConfigured("service URL is not set".to_string()))?;
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| ApiError::NotConfigured("API token is not set".to_string()))?;
        Self::new(url, token, Duration::from_secs(config.timeout_secs))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode its JSON body
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let text = self.send_raw(request)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            details: e.to_string(),
        })
    }

    /// Send a request, check its status and return the body text
    fn send_raw(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send()?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        let text = response.text()?;
        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), &text));
        }
        Ok(text)
    }

    fn bookmark_path(id: u64) -> String {
        format!("bookmarks/{}/", id)
    }

    /// Get a single bookmark
    pub fn get_bookmark(&self, id: u64) -> ApiResult<RemoteBookmark> {
        self.send(self.client.get(self.endpoint(&Self::bookmark_path(id))))
    }

    /// Change only the given fields of a bookmark
    pub fn patch_bookmark(&self, id: u64, patch: &BookmarkPatch) -> ApiResult<RemoteBookmark> {
        self.send(
            self.client
                .patch(self.endpoint(&Self::bookmark_path(id)))
                .json(patch),
        )
    }

    /// Delete a bookmark
    pub fn delete_bookmark(&self, id: u64) -> ApiResult<()> {
        self.send_raw(self.client.delete(self.endpoint(&Self::bookmark_path(id))))
            .map(|_| ())
    }

    /// Move a bookmark to the archive
    pub fn archive_bookmark(&self, id: u64) -> ApiResult<()> {
        let path = format!("bookmarks/{}/archive/", id);
        self.send_raw(self.client.post(self.endpoint(&path))).map(|_| ())
    }

    /// Move a bookmark out of the archive
    pub fn unarchive_bookmark(&self, id: u64) -> ApiResult<()> {
        let path = format!("bookmarks/{}/unarchive/", id);
        self.send_raw(self.client.post(self.endpoint(&path))).map(|_| ())
    }

    /// Create a tag
    pub fn create_tag(&self, name: &str) -> ApiResult<Tag> {
        self.send(
            self.client
                .post(self.endpoint("tags/"))
                .json(&serde_json::json!({ "name": name })),
        )
    }
}

impl BookmarkApi for HttpClient {
    fn fetch_bookmark_page(
        &self,
        filter: &BookmarkFilter,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Page<RemoteBookmark>> {
        let path = if filter.archived {
            "bookmarks/archived/"
        } else {
            "bookmarks/"
        };

        let mut params = vec![
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(ref query) = filter.query {
            params.push(("q", query.clone()));
        }

        let body: PageBody<RemoteBookmark> =
            self.send(self.client.get(self.endpoint(path)).query(&params))?;
        Ok(body.into())
    }

    fn fetch_tag_page(&self, offset: usize, limit: usize) -> ApiResult<Page<Tag>> {
        let params = [("offset", offset.to_string()), ("limit", limit.to_string())];
        let request = self.client.get(self.endpoint("tags/")).query(&params);
        let body: PageBody<Tag> = self.send(request)?;
        Ok(body.into())
    }

    fn create_bookmark(&self, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark> {
        self.send(self.client.post(self.endpoint("bookmarks/")).json(draft))
    }

    fn update_bookmark(&self, id: u64, draft: &BookmarkDraft) -> ApiResult<RemoteBookmark> {
        self.send(
            self.client
                .put(self.endpoint(&Self::bookmark_path(id)))
                .json(draft),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> HttpClient {
        HttpClient::new(url, "secret", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = client("https://links.example.com/");
        assert_eq!(client.base_url(), "https://links.example.com");
        assert_eq!(
            client.endpoint("bookmarks/"),
            "https://links.example.com/api/bookmarks/"
        );
        assert_eq!(
            client.endpoint(&HttpClient::bookmark_path(42)),
            "https://links.example.com/api/bookmarks/42/"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = HttpClient::new("  ", "secret", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::NotConfigured(_))));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = HttpClient::new("https://x.test", "bad\ntoken", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::NotConfigured(_))));
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = Config::default();
        assert!(matches!(
            HttpClient::from_config(&config),
            Err(ApiError::NotConfigured(_))
        ));

        config.url = Some("https://links.example.com".to_string());
        assert!(matches!(
            HttpClient::from_config(&config),
            Err(ApiError::NotConfigured(_))
        ));

        config.token = Some("secret".to_string());
        assert!(HttpClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_page_body_conversion() {
        let json = r#"{
            "count": 3,
            "next": "https://links.example.com/api/tags/?limit=2&offset=2",
            "previous": null,
            "results": [
                {"id": 1, "name": "rust", "date_added": "2024-01-01T00:00:00Z"},
                {"id": 2, "name": "web", "date_added": "2024-01-01T00:00:00Z"}
            ]
        }"#;
        let body: PageBody<Tag> = serde_json::from_str(json).unwrap();
        let page: Page<Tag> = body.into();
        assert_eq!(page.count, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next);
        assert_eq!(page.items[1].name, "web");
    }

    #[test]
    fn test_page_body_last_page() {
        let json = r#"{"count": 0, "next": null, "previous": null, "results": []}"#;
        let page: Page<Tag> = serde_json::from_str::<PageBody<Tag>>(json).unwrap().into();
        assert!(!page.has_next);
        assert!(page.items.is_empty());
    }
}
