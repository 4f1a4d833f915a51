use crate::error::{FeedError, Result};
use crate::post::Post;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Something that can hand out one page of posts at a time.
///
/// An empty page marks the end of pagination.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Post>>;

    /// Human readable location of the given page, for progress output.
    fn describe_page(&self, page: usize) -> String;
}

fn parse_posts(body: &[u8]) -> Result<Vec<Post>> {
    let feed = feed_rs::parser::parse(body)?;
    Ok(feed.entries.into_iter().map(Post::from_entry).collect())
}

/// Paged RSS/Atom feed served over HTTP (WordPress style `?paged=N`).
pub struct HttpFeedSource {
    client: Client,
    base_url: Url,
}

impl HttpFeedSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, 15)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FeedError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent("Anchorage/0.1 (https://github.com/trapdoorsec/anchorage)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Host of the feed URL, used as the default site domain.
    pub fn host(&self) -> Option<&str> {
        self.base_url.host_str()
    }

    pub fn page_url(&self, page: usize) -> Url {
        let mut url = self.base_url.clone();
        if page > 1 {
            url.query_pairs_mut().append_pair("paged", &page.to_string());
        }
        url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Post>> {
        let url = self.page_url(page);
        debug!("Fetching feed page {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        // WordPress answers 404 past the last page
        if status == reqwest::StatusCode::NOT_FOUND && page > 1 {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_posts(&body)
    }

    fn describe_page(&self, page: usize) -> String {
        self.page_url(page).to_string()
    }
}

/// A feed document on disk. It only has a first page.
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Post>> {
        if page > 1 {
            return Ok(Vec::new());
        }
        let body = tokio::fs::read(&self.path).await?;
        parse_posts(&body)
    }

    fn describe_page(&self, _page: usize) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_first_page_is_base() {
        let source = HttpFeedSource::new("https://example.com/feed").unwrap();
        assert_eq!(source.page_url(1).as_str(), "https://example.com/feed");
    }

    #[test]
    fn test_page_url_appends_paged() {
        let source = HttpFeedSource::new("https://example.com/feed").unwrap();
        assert_eq!(
            source.page_url(3).as_str(),
            "https://example.com/feed?paged=3"
        );
    }

    #[test]
    fn test_page_url_keeps_existing_query() {
        let source = HttpFeedSource::new("https://example.com/?feed=rss2").unwrap();
        assert_eq!(
            source.page_url(2).as_str(),
            "https://example.com/?feed=rss2&paged=2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpFeedSource::new("not a url"),
            Err(FeedError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_host() {
        let source = HttpFeedSource::new("https://blog.example.com/feed").unwrap();
        assert_eq!(source.host(), Some("blog.example.com"));
    }
}
