// Anchor / general partition of posts

use anchorage_feed::Post;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Anchor,
    General,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anchor => "anchor",
            Role::General => "general",
        }
    }

    /// A post is an anchor when one of its categories equals the tag, ignoring case.
    pub fn of(post: &Post, anchor_tag: &str) -> Self {
        let tag = anchor_tag.to_lowercase();
        if post.categories.iter().any(|c| c.to_lowercase() == tag) {
            Role::Anchor
        } else {
            Role::General
        }
    }
}

/// Posts split by role, each side in input order.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub anchors: Vec<&'a Post>,
    pub generals: Vec<&'a Post>,
}

impl Classification<'_> {
    pub fn total(&self) -> usize {
        self.anchors.len() + self.generals.len()
    }
}

pub fn classify<'a>(posts: &'a [Post], anchor_tag: &str) -> Classification<'a> {
    let mut classification = Classification::default();

    for post in posts {
        match Role::of(post, anchor_tag) {
            Role::Anchor => classification.anchors.push(post),
            Role::General => classification.generals.push(post),
        }
    }

    classification
}
