// Tests for link extraction and internal-link classification

use anchorage_core::links::{
    ascii_domain, extract_links, internal_links, is_internal, normalize_link,
};

const DOMAIN: &str = "example.com";

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_extract_links_empty() {
    assert!(extract_links("").is_empty());
}

#[test]
fn test_extract_links_document_order_with_duplicates() {
    let html = r#"<p><a href="https://example.com/a">A</a> <a href='/b'>B</a>
        <a href="https://example.com/a">A again</a></p>"#;
    assert_eq!(
        extract_links(html),
        vec!["https://example.com/a", "/b", "https://example.com/a"]
    );
}

#[test]
fn test_extract_links_case_insensitive_attribute() {
    let html = r#"<A HREF="https://example.com/upper">x</A>"#;
    assert_eq!(extract_links(html), vec!["https://example.com/upper"]);
}

#[test]
fn test_extract_links_tolerates_broken_markup() {
    let html = r#"<div><a href="/one">unclosed <p><a href="/two"</div>"#;
    assert_eq!(extract_links(html), vec!["/one", "/two"]);
}

#[test]
fn test_extract_links_ignores_unquoted_and_empty() {
    let html = r#"<a href=/bare>x</a><a href="">y</a>"#;
    assert!(extract_links(html).is_empty());
}

#[test]
fn test_extract_links_includes_non_anchor_elements() {
    let html = r#"<link rel="stylesheet" href="/style.css"><a href="/post">p</a>"#;
    assert_eq!(extract_links(html), vec!["/style.css", "/post"]);
}

// ============================================================================
// Internal Classification Tests
// ============================================================================

#[test]
fn test_is_internal_empty() {
    assert!(!is_internal("", DOMAIN));
}

#[test]
fn test_is_internal_pseudo_links() {
    assert!(!is_internal("#section", DOMAIN));
    assert!(!is_internal("mailto:me@example.com", DOMAIN));
    assert!(!is_internal("tel:+821012345678", DOMAIN));
    assert!(!is_internal("javascript:void(0)", DOMAIN));
}

#[test]
fn test_is_internal_relative_paths() {
    assert!(is_internal("/blog/x", DOMAIN));
    assert!(is_internal("blog/x", DOMAIN));
    assert!(is_internal("../x", DOMAIN));
    assert!(is_internal("?p=12", DOMAIN));
}

#[test]
fn test_is_internal_same_domain() {
    assert!(is_internal("https://example.com/post", DOMAIN));
    assert!(is_internal("http://example.com", DOMAIN));
}

#[test]
fn test_is_internal_subdomain_matches_by_substring() {
    assert!(is_internal("https://blog.example.com/post", DOMAIN));
    assert!(is_internal("https://www.example.com/post", DOMAIN));
}

#[test]
fn test_is_internal_host_is_case_insensitive() {
    assert!(is_internal("https://EXAMPLE.COM/post", DOMAIN));
    assert!(is_internal("https://example.com/post", "Example.com"));
}

#[test]
fn test_is_internal_ignores_port() {
    assert!(is_internal("https://example.com:8443/post", DOMAIN));
}

#[test]
fn test_is_internal_external() {
    assert!(!is_internal("https://other.org/post", DOMAIN));
    assert!(!is_internal("https://other.org/example.com", DOMAIN));
}

#[test]
fn test_is_internal_scheme_relative() {
    assert!(is_internal("//example.com/post", DOMAIN));
    assert!(!is_internal("//cdn.other.org/lib.js", DOMAIN));
}

#[test]
fn test_is_internal_malformed_fails_closed() {
    assert!(!is_internal("http://[::1", DOMAIN));
    assert!(!is_internal("https://", DOMAIN));
}

#[test]
fn test_is_internal_unicode_domain() {
    assert!(is_internal("https://한국.kr/post", "한국.kr"));
    assert!(is_internal("https://blog.한국.kr/post", "한국.kr"));
    assert!(!is_internal("https://다른.kr/post", "한국.kr"));

    let content = r#"<a href="https://한국.kr/anchor">a</a> <a href="https://other.org/x">x</a>"#;
    assert_eq!(
        internal_links(content, "https://한국.kr/self", "한국.kr").len(),
        1
    );
}

#[test]
fn test_ascii_domain() {
    let ascii = ascii_domain("한국.kr");
    assert!(ascii.starts_with("xn--"));
    assert!(ascii.ends_with(".kr"));
    assert_eq!(ascii_domain("Example.COM"), "example.com");
    assert_eq!(ascii_domain("example.com:8080"), "example.com:8080");
}

// ============================================================================
// Normalization Tests
// ============================================================================

#[test]
fn test_normalize_link() {
    assert_eq!(normalize_link("https://example.com/a/"), "https://example.com/a");
    assert_eq!(normalize_link("https://example.com/a"), "https://example.com/a");
    assert_eq!(normalize_link("/"), "");
}

#[test]
fn test_internal_links_excludes_self() {
    let html = r#"<a href="https://example.com/me/">me</a><a href="https://example.com/you">you</a>"#;
    let links = internal_links(html, "https://example.com/me", DOMAIN);
    assert_eq!(links, vec!["https://example.com/you"]);
}

#[test]
fn test_internal_links_self_with_trailing_slash_on_post() {
    let html = r#"<a href="https://example.com/me">me</a>"#;
    assert!(internal_links(html, "https://example.com/me/", DOMAIN).is_empty());
}

#[test]
fn test_internal_links_keeps_duplicates_and_drops_external() {
    let html = r#"<a href="/x/">x</a><a href="https://other.org">o</a><a href="/x">x</a>"#;
    let links = internal_links(html, "https://example.com/me", DOMAIN);
    assert_eq!(links, vec!["/x", "/x"]);
}
