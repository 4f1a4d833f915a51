use clap::{arg, command};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("anchorage")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("anchorage")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log debug output to stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("audit")
                .about(
                    "Fetch a site's feed and audit its internal linking between anchor and \
                general posts.",
                )
                .arg(
                    arg!(-u --"feed-url" <URL>)
                        .required_unless_present("feed-file")
                        .help("Feed URL; further pages are requested with ?paged=N")
                        .env("FEED_URL")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("feed-file"),
                )
                .arg(
                    arg!(-F --"feed-file" <PATH>)
                        .required(false)
                        .help("Audit a feed document on disk instead of fetching one")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-d --"site-domain" <DOMAIN>)
                        .required(false)
                        .help("Domain that marks a link as internal (default: feed URL host)")
                        .env("SITE_DOMAIN"),
                )
                .arg(
                    arg!(-a --"anchor-tag" <TAG>)
                        .required(false)
                        .help("Category that marks a post as an anchor (case-insensitive)")
                        .env("ANCHOR_TAG")
                        .default_value("anchor"),
                )
                .arg(
                    arg!(--"min-general-to-anchor" <COUNT>)
                        .required(false)
                        .help("Minimum links from each general post to anchors")
                        .env("MIN_L_G2A")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"min-anchor-to-general" <COUNT>)
                        .required(false)
                        .help("Minimum distinct general posts each anchor links to")
                        .env("MIN_A2C")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("6"),
                )
                .arg(
                    arg!(--"orphan-max-internal" <COUNT>)
                        .required(false)
                        .help("General posts with at most this many internal links are orphan risks")
                        .env("ORPHAN_MAX_INTERNAL")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"stale-days" <DAYS>)
                        .required(false)
                        .help("Anchors at least this many days old need a refresh")
                        .env("STALE_DAYS")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("90"),
                )
                .arg(
                    arg!(--"max-pages" <PAGES>)
                        .required(false)
                        .help("Upper bound on feed pages requested")
                        .env("MAX_PAGES")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("200"),
                )
                .arg(
                    arg!(--"delay" <SECONDS>)
                        .required(false)
                        .help("Pause between feed page requests")
                        .env("SLEEP_SEC")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0.4"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("15"),
                )
                .arg(
                    arg!(--"as-of" <DATE>)
                        .required(false)
                        .help("Measure post age against this RFC 2822 / RFC 3339 date instead of now"),
                )
                .arg(
                    arg!(--"utc-offset" <HOURS>)
                        .required(false)
                        .help("UTC offset used for the report timestamp")
                        .value_parser(clap::value_parser!(i32))
                        .allow_negative_numbers(true)
                        .default_value("9"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Also save the report to a file"),
                )
                .arg(
                    arg!(-w --"webhook" <URL>)
                        .required(false)
                        .help("Incoming-webhook URL to send the report to (repeatable)")
                        .env("WEBHOOK_URLS")
                        .value_delimiter(',')
                        .action(clap::ArgAction::Append)
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"fail-on-findings")
                        .required(false)
                        .help("Exit with status 2 when any finding is reported")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
