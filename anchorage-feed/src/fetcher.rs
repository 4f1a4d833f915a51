use crate::post::Post;
use crate::source::FeedSource;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Called once per page with `(page_number, page_location, new_posts, total_posts)`.
pub type PageCallback = Arc<dyn Fn(usize, String, usize, usize) + Send + Sync>;

/// Walks a paged feed until it runs dry.
pub struct FeedFetcher {
    max_pages: usize,
    delay: Duration,
    page_callback: Option<PageCallback>,
}

impl FeedFetcher {
    pub fn new() -> Self {
        Self {
            max_pages: 200,
            delay: Duration::from_millis(400),
            page_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    /// Collect every post the source yields, deduplicated by raw link.
    ///
    /// Stops at the first empty page, the first page without unseen links,
    /// or `max_pages`. A failing page ends the walk; whatever was collected
    /// before it is still returned.
    pub async fn fetch_all(&self, source: &dyn FeedSource) -> Vec<Post> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();

        for page in 1..=self.max_pages {
            let location = source.describe_page(page);
            debug!("Requesting page {}: {}", page, location);

            let entries = match source.fetch_page(page).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Feed page {} failed ({}), stopping: {}", page, location, e);
                    break;
                }
            };

            if entries.is_empty() {
                debug!("Page {} is empty, end of feed", page);
                break;
            }

            let mut new_count = 0;
            for post in entries {
                if post.link.is_empty() || seen.contains(&post.link) {
                    continue;
                }
                seen.insert(post.link.clone());
                posts.push(post);
                new_count += 1;
            }

            if let Some(ref callback) = self.page_callback {
                callback(page, location, new_count, posts.len());
            }

            if new_count == 0 {
                debug!("Page {} had no unseen posts, stopping", page);
                break;
            }

            if page < self.max_pages && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!("Feed fetch complete. Collected {} posts", posts.len());
        posts
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FeedError, Result};
    use crate::source::{FileFeedSource, HttpFeedSource};
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn rss_page(links: &[&str]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Site</title><link>https://example.com</link><description>d</description>"#,
        );
        for link in links {
            xml.push_str(&format!(
                "<item><title>{0}</title><link>{0}</link><description>c</description></item>",
                link
            ));
        }
        xml.push_str("</channel></rss>");
        xml
    }

    /// In-memory source keyed by page number; `None` pages fail.
    struct StaticSource {
        pages: Vec<Option<Vec<Post>>>,
        requested: Mutex<Vec<usize>>,
    }

    impl StaticSource {
        fn new(pages: Vec<Option<Vec<Post>>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn fetch_page(&self, page: usize) -> Result<Vec<Post>> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page - 1) {
                Some(Some(posts)) => Ok(posts.clone()),
                Some(None) => Err(FeedError::InvalidUrl(format!("page {}", page))),
                None => Ok(Vec::new()),
            }
        }

        fn describe_page(&self, page: usize) -> String {
            format!("static:{}", page)
        }
    }

    fn posts(links: &[&str]) -> Vec<Post> {
        links.iter().map(|l| Post::new(*l, *l)).collect()
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let source = StaticSource::new(vec![Some(posts(&["a", "b"])), Some(posts(&["c"]))]);
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        let result = fetcher.fetch_all(&source).await;

        assert_eq!(result.len(), 3);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_stops_when_page_has_nothing_new() {
        // Feeds that ignore the page parameter keep returning page 1
        let source = StaticSource::new(vec![
            Some(posts(&["a", "b"])),
            Some(posts(&["a", "b"])),
            Some(posts(&["c"])),
        ]);
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        let result = fetcher.fetch_all(&source).await;

        assert_eq!(result.len(), 2);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_respects_max_pages() {
        let source = StaticSource::new(vec![
            Some(posts(&["a"])),
            Some(posts(&["b"])),
            Some(posts(&["c"])),
        ]);
        let fetcher = FeedFetcher::new()
            .with_delay(Duration::ZERO)
            .with_max_pages(2);

        let result = fetcher.fetch_all(&source).await;

        assert_eq!(result.len(), 2);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_skips_posts_without_link() {
        let source = StaticSource::new(vec![Some(vec![
            Post::new("no link", ""),
            Post::new("linked", "https://example.com/x"),
        ])]);
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        let result = fetcher.fetch_all(&source).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "linked");
    }

    #[tokio::test]
    async fn test_error_keeps_collected_posts() {
        let source = StaticSource::new(vec![
            Some(posts(&["a"])),
            None,
            Some(posts(&["c"])),
        ]);
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        let result = fetcher.fetch_all(&source).await;

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_first_page_failure_yields_nothing() {
        let source = StaticSource::new(vec![None]);
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        assert!(fetcher.fetch_all(&source).await.is_empty());
    }

    #[tokio::test]
    async fn test_page_callback_reports_progress() {
        let calls: Arc<Mutex<Vec<(usize, usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();

        let source = StaticSource::new(vec![Some(posts(&["a", "b"])), Some(posts(&["b", "c"]))]);
        let fetcher = FeedFetcher::new()
            .with_delay(Duration::ZERO)
            .with_page_callback(Arc::new(move |page, _location, new_posts, total| {
                calls_clone.lock().unwrap().push((page, new_posts, total));
            }));

        fetcher.fetch_all(&source).await;

        assert_eq!(*calls.lock().unwrap(), vec![(1, 2, 2), (2, 1, 3)]);
    }

    #[tokio::test]
    async fn test_http_pagination() {
        let mock_server = MockServer::start().await;
        let base = mock_server.uri();

        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(query_param("paged", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/rss+xml")
                    .set_body_string(rss_page(&[&format!("{}/post-3", base)])),
            )
            .with_priority(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(query_param("paged", "3"))
            .respond_with(ResponseTemplate::new(404))
            .with_priority(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/rss+xml")
                    .set_body_string(rss_page(&[
                        &format!("{}/post-1", base),
                        &format!("{}/post-2/", base),
                    ])),
            )
            .with_priority(5)
            .mount(&mock_server)
            .await;

        let source = HttpFeedSource::new(&format!("{}/feed", base)).unwrap();
        let fetcher = FeedFetcher::new().with_delay(Duration::ZERO);

        let result = fetcher.fetch_all(&source).await;

        let links: Vec<String> = result.iter().map(|p| p.link.clone()).collect();
        assert_eq!(
            links,
            vec![
                format!("{}/post-1", base),
                format!("{}/post-2/", base),
                format!("{}/post-3", base),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_server_error_yields_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = HttpFeedSource::new(&format!("{}/feed", mock_server.uri())).unwrap();
        let result = FeedFetcher::new()
            .with_delay(Duration::ZERO)
            .fetch_all(&source)
            .await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_file_source_has_single_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            rss_page(&["https://example.com/a", "https://example.com/b"])
        )
        .unwrap();

        let source = FileFeedSource::new(file.path());
        let result = FeedFetcher::new()
            .with_delay(Duration::ZERO)
            .fetch_all(&source)
            .await;

        assert_eq!(result.len(), 2);
    }
}
