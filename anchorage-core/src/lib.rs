pub mod audit;
pub mod classify;
pub mod config;
pub mod crawl;
pub mod links;
pub mod notify;
pub mod report;
pub mod summarize;

pub use anchorage_feed::Post;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
     _                _
    / \   _ __   ___ | |__   ___  _ __ __ _  __ _  ___
   / _ \ | '_ \ / __|| '_ \ / _ \| '__/ _` |/ _` |/ _ \
  / ___ \| | | | (__ | | | | (_) | | | (_| | (_| |  __/
 /_/   \_\_| |_|\___||_| |_|\___/|_|  \__,_|\__, |\___|
                                            |___/
"#;
    eprintln!("{}", banner.bright_cyan());
    eprintln!(
        "  {} {}\n",
        "internal-link auditor".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
