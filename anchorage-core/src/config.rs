// Audit thresholds and site identity

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Anchor tag must not be empty")]
    EmptyAnchorTag,

    #[error("Site domain must not be empty")]
    EmptySiteDomain,
}

/// Everything the auditor needs to know, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub anchor_tag: String,
    pub site_domain: String,
    /// General posts should link to anchors at least this often.
    pub min_general_to_anchor: u32,
    /// Anchors should link to at least this many distinct general posts.
    pub min_anchor_to_general: u32,
    /// General posts with this many internal links or fewer are orphan risks.
    pub orphan_max_internal_links: u32,
    /// Anchors this many days old or older are stale.
    pub stale_days: u32,
}

impl AuditConfig {
    pub fn new(site_domain: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
            ..Self::default()
        }
    }

    pub fn with_anchor_tag(mut self, tag: impl Into<String>) -> Self {
        self.anchor_tag = tag.into();
        self
    }

    pub fn with_min_general_to_anchor(mut self, min: u32) -> Self {
        self.min_general_to_anchor = min;
        self
    }

    pub fn with_min_anchor_to_general(mut self, min: u32) -> Self {
        self.min_anchor_to_general = min;
        self
    }

    pub fn with_orphan_max_internal_links(mut self, max: u32) -> Self {
        self.orphan_max_internal_links = max;
        self
    }

    pub fn with_stale_days(mut self, days: u32) -> Self {
        self.stale_days = days;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.anchor_tag.trim().is_empty() {
            return Err(ConfigError::EmptyAnchorTag);
        }
        if self.site_domain.trim().is_empty() {
            return Err(ConfigError::EmptySiteDomain);
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            anchor_tag: "anchor".to_string(),
            site_domain: String::new(),
            min_general_to_anchor: 1,
            min_anchor_to_general: 6,
            orphan_max_internal_links: 1,
            stale_days: 90,
        }
    }
}
