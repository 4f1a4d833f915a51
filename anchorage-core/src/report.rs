// Report rendering for audit results

use crate::audit::{AuditReport, LinkFinding, StaleAnchor};
use crate::config::AuditConfig;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Stale anchors listed before the rest is summarised as a count.
pub const STALE_LIST_LIMIT: usize = 10;
/// Entries listed per link section.
pub const LINK_LIST_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// What a report needs besides the findings themselves.
pub struct ReportContext<'a> {
    pub site: &'a str,
    pub config: &'a AuditConfig,
    pub generated_at: DateTime<FixedOffset>,
}

/// `now` shifted to a fixed UTC offset for display. Out of range offsets fall back to UTC.
pub fn report_time(now: DateTime<Utc>, offset_hours: i32) -> DateTime<FixedOffset> {
    let offset = offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix());
    now.with_timezone(&offset)
}

pub fn render_report(
    format: ReportFormat,
    report: &AuditReport,
    ctx: &ReportContext<'_>,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report, ctx)),
        ReportFormat::Markdown => Ok(generate_markdown_report(report, ctx)),
        ReportFormat::Json => generate_json_report(report, ctx),
    }
}

fn thresholds_line(config: &AuditConfig) -> String {
    format!(
        "general->anchor >= {}, anchor->general >= {}, orphan <= {}, anchor age >= {} days",
        config.min_general_to_anchor,
        config.min_anchor_to_general,
        config.orphan_max_internal_links,
        config.stale_days
    )
}

fn format_time(ctx: &ReportContext<'_>) -> String {
    ctx.generated_at.format("%Y-%m-%d %H:%M (UTC%:z)").to_string()
}

pub fn generate_text_report(report: &AuditReport, ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("Link audit for {} at {}\n", ctx.site, format_time(ctx)));
    out.push_str(&format!(
        "- Posts: {} / anchors {} / general {}\n",
        report.total, report.anchor_count, report.general_count
    ));
    out.push_str(&format!("- Thresholds: {}\n\n", thresholds_line(ctx.config)));

    if !report.stale_anchors.is_empty() {
        out.push_str(&format!(
            "Anchors needing a refresh ({}), most stale first:\n",
            report.stale_anchors.len()
        ));
        for stale in report.stale_anchors.iter().take(STALE_LIST_LIMIT) {
            out.push_str(&format!(
                "  * {}: {} days old -> {}\n",
                stale.title, stale.age_days, stale.link
            ));
            if let Some(ref suggestion) = stale.suggestion {
                out.push_str("    Suggested updates:\n");
                for line in suggestion.lines() {
                    out.push_str(&format!("      {}\n", line));
                }
            }
        }
        push_overflow(&mut out, report.stale_anchors.len(), STALE_LIST_LIMIT, "  ");
        out.push('\n');
    }

    push_text_section(
        &mut out,
        "General posts under-linking to anchors",
        &report.weak_forward_links,
        |f| format!("  * {} ({}) -> {}\n", f.title, f.count, f.link),
    );
    push_text_section(
        &mut out,
        "Anchors under-linking to their cluster",
        &report.weak_reverse_links,
        |f| format!("  * {} ({}) -> {}\n", f.title, f.count, f.link),
    );
    push_text_section(
        &mut out,
        &format!(
            "General posts at orphan risk (internal links <= {})",
            ctx.config.orphan_max_internal_links
        ),
        &report.orphan_risks,
        |f| format!("  * {} ({} internal links) -> {}\n", f.title, f.count, f.link),
    );

    if report.is_clean() {
        out.push_str("No issues found. Structure, links and freshness look healthy.\n");
    }

    out
}

fn push_text_section(
    out: &mut String,
    heading: &str,
    findings: &[LinkFinding],
    line: impl Fn(&LinkFinding) -> String,
) {
    if findings.is_empty() {
        return;
    }

    out.push_str(&format!("{} ({}):\n", heading, findings.len()));
    for finding in findings.iter().take(LINK_LIST_LIMIT) {
        out.push_str(&line(finding));
    }
    push_overflow(out, findings.len(), LINK_LIST_LIMIT, "  ");
    out.push('\n');
}

fn push_overflow(out: &mut String, len: usize, limit: usize, indent: &str) {
    if len > limit {
        out.push_str(&format!("{}... and {} more\n", indent, len - limit));
    }
}

pub fn generate_markdown_report(report: &AuditReport, ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Link audit: {}\n\n", ctx.site));
    out.push_str(&format!("_Generated {}_\n\n", format_time(ctx)));
    out.push_str("| Posts | Anchors | General |\n|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} |\n\n",
        report.total, report.anchor_count, report.general_count
    ));
    out.push_str(&format!("Thresholds: {}\n\n", thresholds_line(ctx.config)));

    if !report.stale_anchors.is_empty() {
        out.push_str(&format!(
            "## Anchors needing a refresh ({})\n\n",
            report.stale_anchors.len()
        ));
        for stale in report.stale_anchors.iter().take(STALE_LIST_LIMIT) {
            push_markdown_stale(&mut out, stale);
        }
        push_overflow(&mut out, report.stale_anchors.len(), STALE_LIST_LIMIT, "- ");
        out.push('\n');
    }

    let sections: [(&str, &[LinkFinding], &str); 3] = [
        (
            "General posts under-linking to anchors",
            report.weak_forward_links.as_slice(),
            "anchor links",
        ),
        (
            "Anchors under-linking to their cluster",
            report.weak_reverse_links.as_slice(),
            "distinct cluster links",
        ),
        (
            "General posts at orphan risk",
            report.orphan_risks.as_slice(),
            "internal links",
        ),
    ];

    for (heading, findings, unit) in sections {
        if findings.is_empty() {
            continue;
        }
        out.push_str(&format!("## {} ({})\n\n", heading, findings.len()));
        for finding in findings.iter().take(LINK_LIST_LIMIT) {
            out.push_str(&format!(
                "- [{}]({}): {} {}\n",
                escape_markdown(&finding.title),
                finding.link,
                finding.count,
                unit
            ));
        }
        push_overflow(&mut out, findings.len(), LINK_LIST_LIMIT, "- ");
        out.push('\n');
    }

    if report.is_clean() {
        out.push_str("**No issues found.** Structure, links and freshness look healthy.\n");
    }

    out
}

fn push_markdown_stale(out: &mut String, stale: &StaleAnchor) {
    out.push_str(&format!(
        "- [{}]({}): {} days old\n",
        escape_markdown(&stale.title),
        stale.link,
        stale.age_days
    ));
    if let Some(ref suggestion) = stale.suggestion {
        for line in suggestion.lines() {
            out.push_str(&format!("  > {}\n", line));
        }
    }
}

fn escape_markdown(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

pub fn generate_json_report(
    report: &AuditReport,
    ctx: &ReportContext<'_>,
) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Anchorage",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": ctx.generated_at.to_rfc3339(),
                "site": ctx.site,
            },
            "thresholds": {
                "anchor_tag": ctx.config.anchor_tag,
                "site_domain": ctx.config.site_domain,
                "min_general_to_anchor": ctx.config.min_general_to_anchor,
                "min_anchor_to_general": ctx.config.min_anchor_to_general,
                "orphan_max_internal_links": ctx.config.orphan_max_internal_links,
                "stale_days": ctx.config.stale_days,
            },
            "result": report,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
