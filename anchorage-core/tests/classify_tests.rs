// Tests for anchor / general classification

use anchorage_core::Post;
use anchorage_core::classify::{Role, classify};

fn post(link: &str, categories: &[&str]) -> Post {
    categories
        .iter()
        .fold(Post::new(link, link), |p, c| p.with_category(*c))
}

#[test]
fn test_role_matches_tag_case_insensitively() {
    assert_eq!(Role::of(&post("a", &["Anchor"]), "anchor"), Role::Anchor);
    assert_eq!(Role::of(&post("a", &["ANCHOR"]), "anchor"), Role::Anchor);
    assert_eq!(Role::of(&post("a", &["anchor"]), "Anchor"), Role::Anchor);
}

#[test]
fn test_role_requires_whole_category() {
    assert_eq!(Role::of(&post("a", &["anchors"]), "anchor"), Role::General);
    assert_eq!(Role::of(&post("a", &["news"]), "anchor"), Role::General);
    assert_eq!(Role::of(&post("a", &[]), "anchor"), Role::General);
}

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Anchor.as_str(), "anchor");
    assert_eq!(Role::General.as_str(), "general");
}

#[test]
fn test_classify_partition_is_total_and_ordered() {
    let posts = vec![
        post("g1", &["news"]),
        post("a1", &["anchor"]),
        post("g2", &[]),
        post("a2", &["guides", "Anchor"]),
        post("g3", &["tips"]),
    ];

    let classification = classify(&posts, "anchor");

    let anchors: Vec<&str> = classification.anchors.iter().map(|p| p.link.as_str()).collect();
    let generals: Vec<&str> = classification.generals.iter().map(|p| p.link.as_str()).collect();

    assert_eq!(anchors, vec!["a1", "a2"]);
    assert_eq!(generals, vec!["g1", "g2", "g3"]);
    assert_eq!(classification.total(), posts.len());
}

#[test]
fn test_classify_empty() {
    let classification = classify(&[], "anchor");
    assert!(classification.anchors.is_empty());
    assert!(classification.generals.is_empty());
    assert_eq!(classification.total(), 0);
}
