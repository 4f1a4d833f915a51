// Link extraction from raw post markup

use regex::Regex;
use std::sync::LazyLock;
use url::{Host, ParseError, Url};

static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href=['"]([^'"]+)['"]"#).expect("valid href pattern"));

const PSEUDO_PREFIXES: [&str; 4] = ["#", "mailto:", "tel:", "javascript:"];

/// Every href target in the markup, in document order, duplicates kept.
///
/// This is a scan for href attributes, not an HTML parse, so broken markup
/// still yields whatever links it contains.
pub fn extract_links(markup: &str) -> Vec<&str> {
    if markup.is_empty() {
        return Vec::new();
    }

    HREF_PATTERN
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Whether `href` points at `site_domain` (or is relative, and so same-site).
///
/// Unparseable URLs count as external. Unicode domains are compared in their
/// punycode form, which is what parsed URLs report as their host.
pub fn is_internal(href: &str, site_domain: &str) -> bool {
    if href.is_empty() || is_pseudo_link(href) {
        return false;
    }

    // Scheme-relative references carry an authority but no scheme
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("http:{}", href))
    } else {
        Url::parse(href)
    };

    match parsed {
        Ok(url) => match url.host_str() {
            Some(host) => host.contains(&ascii_domain(site_domain)),
            None => true,
        },
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Lowercased ASCII form of a domain; input `Host` cannot parse is only lowercased.
pub fn ascii_domain(domain: &str) -> String {
    match Host::parse(domain.trim()) {
        Ok(host) => host.to_string(),
        Err(_) => domain.to_ascii_lowercase(),
    }
}

fn is_pseudo_link(href: &str) -> bool {
    PSEUDO_PREFIXES.iter().any(|prefix| {
        href.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Strip trailing `/` so `https://a/b/` and `https://a/b` compare equal.
pub fn normalize_link(link: &str) -> &str {
    link.trim_end_matches('/')
}

/// Internal links of a post: extracted, filtered to the site, normalized,
/// and with links back to the post itself removed. Duplicates are kept.
pub fn internal_links<'a>(content: &'a str, self_link: &str, site_domain: &str) -> Vec<&'a str> {
    let self_link = normalize_link(self_link);

    extract_links(content)
        .into_iter()
        .filter(|href| is_internal(href, site_domain))
        .map(normalize_link)
        .filter(|href| *href != self_link)
        .collect()
}
