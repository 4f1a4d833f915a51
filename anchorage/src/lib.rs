pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    audit_posts, build_audit_config, build_notifiers, expand_output_path, parse_as_of,
    resolve_site_domain,
};

// Re-export crawl functionality from anchorage-core
pub use anchorage_core::crawl::{CrawlOptions, CrawlProgressCallback, FeedLocation, execute_crawl};
