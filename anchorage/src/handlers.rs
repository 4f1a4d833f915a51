use anchorage_core::audit::{AuditReport, FindingKind, run_audit};
use anchorage_core::config::AuditConfig;
use anchorage_core::crawl::{CrawlOptions, FeedLocation, execute_crawl};
use anchorage_core::notify::{Notifier, WebhookNotifier, deliver};
use anchorage_core::report::{ReportContext, ReportFormat, render_report, report_time, save_report};
use anchorage_core::summarize::{DEFAULT_SUGGESTION_LIMIT, Summarizer, attach_suggestions};
use anchorage_core::Post;
use anchorage_feed::parse_feed_date;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Exit status when `--fail-on-findings` is set and something was found.
pub const FINDINGS_EXIT_CODE: i32 = 2;

/// Explicit domain wins, then the feed URL host.
pub fn resolve_site_domain(explicit: Option<&str>, feed_url: Option<&Url>) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| feed_url.and_then(|u| u.host_str()).map(str::to_string))
}

/// Turn `--delay` seconds into a `Duration`, rejecting values it cannot hold.
pub fn parse_delay(secs: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(delay) => Ok(delay),
        Err(_) => bail!("--delay must be a non-negative number of seconds, got {}", secs),
    }
}

/// Parse `--as-of`, defaulting to the current time.
pub fn parse_as_of(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_feed_date(raw).ok_or_else(|| anyhow!("Unrecognised date '{}'", raw)),
        None => Ok(Utc::now()),
    }
}

pub fn expand_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn build_audit_config(args: &ArgMatches) -> Result<AuditConfig> {
    let feed_url = args.get_one::<Url>("feed-url");
    let site_domain = resolve_site_domain(
        args.get_one::<String>("site-domain").map(String::as_str),
        feed_url,
    )
    .ok_or_else(|| anyhow!("Cannot determine the site domain; pass --site-domain"))?;

    let config = AuditConfig::new(site_domain)
        .with_anchor_tag(
            args.get_one::<String>("anchor-tag")
                .cloned()
                .unwrap_or_else(|| "anchor".to_string()),
        )
        .with_min_general_to_anchor(*args.get_one::<u32>("min-general-to-anchor").unwrap_or(&1))
        .with_min_anchor_to_general(*args.get_one::<u32>("min-anchor-to-general").unwrap_or(&6))
        .with_orphan_max_internal_links(*args.get_one::<u32>("orphan-max-internal").unwrap_or(&1))
        .with_stale_days(*args.get_one::<u32>("stale-days").unwrap_or(&90));

    config.validate()?;
    Ok(config)
}

pub fn build_notifiers(urls: &[Url]) -> Result<Vec<Box<dyn Notifier>>> {
    urls.iter()
        .map(|url| {
            WebhookNotifier::new(url.as_str())
                .map(|n| Box::new(n) as Box<dyn Notifier>)
                .with_context(|| format!("Cannot create webhook client for {}", url))
        })
        .collect()
}

/// Audit the posts and, when a summarizer is available, ask it about stale anchors.
pub async fn audit_posts(
    posts: &[Post],
    config: &AuditConfig,
    now: DateTime<Utc>,
    summarizer: Option<&dyn Summarizer>,
) -> AuditReport {
    let mut report = run_audit(posts, config, now);

    if let Some(summarizer) = summarizer
        && !report.stale_anchors.is_empty()
    {
        attach_suggestions(&mut report, summarizer, DEFAULT_SUGGESTION_LIMIT).await;
    }

    report
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn status(quiet: bool, msg: String) {
    if !quiet {
        eprintln!("{} {}", "→".blue(), msg);
    }
}

pub async fn handle_audit(sub_matches: &ArgMatches, quiet: bool, verbose: bool) -> Result<i32> {
    init_tracing(verbose);

    let config = build_audit_config(sub_matches)?;
    let now = parse_as_of(sub_matches.get_one::<String>("as-of").map(String::as_str))?;

    let format_name = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;

    let delay = parse_delay(*sub_matches.get_one::<f64>("delay").unwrap_or(&0.4))?;

    let (location, site) = match sub_matches.get_one::<PathBuf>("feed-file") {
        Some(path) => (FeedLocation::File(path.clone()), config.site_domain.clone()),
        None => {
            let url = sub_matches
                .get_one::<Url>("feed-url")
                .ok_or_else(|| anyhow!("Either --feed-url or --feed-file must be provided"))?;
            (FeedLocation::Url(url.to_string()), url.to_string())
        }
    };

    let webhooks: Vec<Url> = sub_matches
        .get_many::<Url>("webhook")
        .map(|urls| urls.cloned().collect())
        .unwrap_or_default();
    let notifiers = build_notifiers(&webhooks)?;

    status(quiet, format!("Auditing {} (internal domain: {})", site, config.site_domain));

    let options = CrawlOptions {
        location,
        max_pages: *sub_matches.get_one::<usize>("max-pages").unwrap_or(&200),
        delay,
        timeout_secs: *sub_matches.get_one::<u64>("timeout").unwrap_or(&15),
        show_progress_bars: !quiet,
    };

    let posts = execute_crawl(options, None)
        .await
        .map_err(|e| anyhow!(e))?;

    if posts.is_empty() {
        eprintln!("{} No posts fetched; the report will be empty", "⚠".yellow().bold());
    }

    let report = audit_posts(&posts, &config, now, None).await;

    status(
        quiet,
        format!(
            "{} posts: {} anchors, {} general",
            report.total, report.anchor_count, report.general_count
        ),
    );
    for kind in [
        FindingKind::StaleAnchor,
        FindingKind::WeakForwardLink,
        FindingKind::WeakReverseLink,
        FindingKind::OrphanRisk,
    ] {
        status(
            quiet,
            format!("{}: {}", kind.as_str(), report.finding_count(kind)),
        );
    }

    let utc_offset = *sub_matches.get_one::<i32>("utc-offset").unwrap_or(&9);
    let ctx = ReportContext {
        site: &site,
        config: &config,
        generated_at: report_time(Utc::now(), utc_offset),
    };
    let rendered = render_report(format, &report, &ctx).context("Failed to render report")?;

    if let Some(output) = sub_matches.get_one::<String>("output") {
        let path = expand_output_path(output);
        save_report(&rendered, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        status(quiet, format!("Report saved to {}", path.display()));
    }

    if notifiers.is_empty() {
        println!("{}", rendered);
    } else {
        let delivered = deliver(&notifiers, &rendered).await;
        status(
            quiet,
            format!("Report delivered to {}/{} webhooks", delivered, notifiers.len()),
        );
    }

    if sub_matches.get_flag("fail-on-findings") && !report.is_clean() {
        return Ok(FINDINGS_EXIT_CODE);
    }

    if !quiet {
        eprintln!("{} Audit complete", "✓".green().bold());
    }
    Ok(0)
}
