use anchorage_feed::{FeedFetcher, FeedSource, FileFeedSource, HttpFeedSource, Post};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where posts come from
pub enum FeedLocation {
    /// Paged feed over HTTP
    Url(String),
    /// Feed document on disk
    File(PathBuf),
}

/// Options for configuring a feed crawl
pub struct CrawlOptions {
    pub location: FeedLocation,
    pub max_pages: usize,
    pub delay: Duration,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            location: FeedLocation::Url(String::new()),
            max_pages: 200,
            delay: Duration::from_millis(400),
            timeout_secs: 15,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Fetch every post from the configured feed.
///
/// Only an unusable feed location is an error. Failed pages end the crawl
/// early and whatever was fetched is returned.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<Post>, String> {
    let CrawlOptions {
        location,
        max_pages,
        delay,
        timeout_secs,
        show_progress_bars,
    } = options;

    let source: Box<dyn FeedSource> = match location {
        FeedLocation::Url(url) => Box::new(
            HttpFeedSource::with_timeout(&url, timeout_secs)
                .map_err(|e| format!("Cannot use feed {}: {}", url, e))?,
        ),
        FeedLocation::File(path) => Box::new(FileFeedSource::new(path)),
    };

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| e.to_string())?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching feed...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let page_callback = Arc::new(
        move |page: usize, location: String, new_posts: usize, total: usize| {
            let msg = format!(
                "Page {}: {} new posts ({} total) <- {}",
                page, new_posts, total, location
            );
            if let Some(ref pb) = pb_clone {
                pb.set_message(msg.clone());
            }
            if let Some(ref callback) = progress_callback {
                callback(msg);
            }
        },
    );

    let fetcher = FeedFetcher::new()
        .with_max_pages(max_pages)
        .with_delay(delay)
        .with_page_callback(page_callback);

    let posts = fetcher.fetch_all(source.as_ref()).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Feed fetched! {} posts collected", posts.len()));
    }

    Ok(posts)
}
