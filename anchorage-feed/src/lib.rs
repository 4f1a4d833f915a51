pub mod error;
pub mod fetcher;
pub mod post;
pub mod source;

pub use error::FeedError;
pub use fetcher::{FeedFetcher, PageCallback};
pub use post::{Post, parse_feed_date};
pub use source::{FeedSource, FileFeedSource, HttpFeedSource};
