// Link graph audit over classified posts

use crate::classify::{Classification, classify};
use crate::config::AuditConfig;
use crate::links::internal_links;
use anchorage_feed::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Age reported for anchors whose timestamp is unknown.
pub const UNKNOWN_AGE_DAYS: i64 = 9999;

/// Characters of content kept alongside a stale anchor.
pub const EXCERPT_CHARS: usize = 2000;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    WeakForwardLink,
    WeakReverseLink,
    OrphanRisk,
    StaleAnchor,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::WeakForwardLink => "weak_forward_link",
            FindingKind::WeakReverseLink => "weak_reverse_link",
            FindingKind::OrphanRisk => "orphan_risk",
            FindingKind::StaleAnchor => "stale_anchor",
        }
    }
}

/// A post and the link count that put it on a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkFinding {
    pub title: String,
    pub link: String,
    pub count: usize,
}

impl LinkFinding {
    fn new(post: &Post, count: usize) -> Self {
        Self {
            title: post.title.clone(),
            link: post.link.clone(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleAnchor {
    pub title: String,
    pub link: String,
    pub age_days: i64,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub total: usize,
    pub anchor_count: usize,
    pub general_count: usize,
    pub weak_forward_links: Vec<LinkFinding>,
    pub weak_reverse_links: Vec<LinkFinding>,
    pub orphan_risks: Vec<LinkFinding>,
    pub stale_anchors: Vec<StaleAnchor>,
}

impl AuditReport {
    pub fn finding_count(&self, kind: FindingKind) -> usize {
        match kind {
            FindingKind::WeakForwardLink => self.weak_forward_links.len(),
            FindingKind::WeakReverseLink => self.weak_reverse_links.len(),
            FindingKind::OrphanRisk => self.orphan_risks.len(),
            FindingKind::StaleAnchor => self.stale_anchors.len(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.weak_forward_links.is_empty()
            && self.weak_reverse_links.is_empty()
            && self.orphan_risks.is_empty()
            && self.stale_anchors.is_empty()
    }
}

/// Whole days from `timestamp` to `now`, rounded down (so anything in the
/// future is negative); unknown timestamps count as very old.
pub fn age_in_days(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    timestamp
        .map(|ts| (now - ts).num_seconds().div_euclid(SECONDS_PER_DAY))
        .unwrap_or(UNKNOWN_AGE_DAYS)
}

fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}

/// Classify then audit in one step.
pub fn run_audit(posts: &[Post], config: &AuditConfig, now: DateTime<Utc>) -> AuditReport {
    let classification = classify(posts, &config.anchor_tag);
    audit_links(&classification, config, now)
}

pub fn audit_links(
    classification: &Classification<'_>,
    config: &AuditConfig,
    now: DateTime<Utc>,
) -> AuditReport {
    let anchors = &classification.anchors;
    let generals = &classification.generals;

    let anchor_links: HashSet<&str> = anchors.iter().map(|a| a.normalized_link()).collect();
    let general_links: HashSet<&str> = generals.iter().map(|g| g.normalized_link()).collect();

    let mut report = AuditReport {
        total: classification.total(),
        anchor_count: anchors.len(),
        general_count: generals.len(),
        ..AuditReport::default()
    };

    for general in generals {
        let links = internal_links(&general.content, &general.link, &config.site_domain);

        // Repeated links to the same anchor each count
        let to_anchors = links.iter().filter(|l| anchor_links.contains(*l)).count();
        if to_anchors < config.min_general_to_anchor as usize {
            report
                .weak_forward_links
                .push(LinkFinding::new(general, to_anchors));
        }

        if links.len() <= config.orphan_max_internal_links as usize {
            report.orphan_risks.push(LinkFinding::new(general, links.len()));
        }
    }

    for anchor in anchors {
        let links = internal_links(&anchor.content, &anchor.link, &config.site_domain);

        let to_generals = links
            .iter()
            .filter(|l| general_links.contains(*l))
            .collect::<HashSet<_>>()
            .len();
        if to_generals < config.min_anchor_to_general as usize {
            report
                .weak_reverse_links
                .push(LinkFinding::new(anchor, to_generals));
        }

        let age_days = age_in_days(anchor.published_or_updated_at, now);
        if age_days >= i64::from(config.stale_days) {
            report.stale_anchors.push(StaleAnchor {
                title: anchor.title.clone(),
                link: anchor.link.clone(),
                age_days,
                excerpt: excerpt(&anchor.content),
                suggestion: None,
            });
        }
    }

    // Stable, so equal ages keep anchor order
    report
        .stale_anchors
        .sort_by(|a, b| b.age_days.cmp(&a.age_days));

    debug!(
        "Audit of {} posts: {} weak forward, {} weak reverse, {} orphan, {} stale",
        report.total,
        report.weak_forward_links.len(),
        report.weak_reverse_links.len(),
        report.orphan_risks.len(),
        report.stale_anchors.len()
    );

    report
}
