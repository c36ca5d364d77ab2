//! Citation rendering for grounded replies.
//!
//! The provider can cite the same page several times in one answer. The
//! widget shows one link per URI, labelled with the first occurrence's
//! title cut at the first `|` and capped at [`LABEL_MAX_CHARS`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::llm::types::GroundingLink;

pub const LABEL_MAX_CHARS: usize = 28;

/// One rendered reference link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
    pub label: String,
}

/// Keep the first link for each URI, preserving order.
#[must_use]
pub fn dedupe_by_uri(links: &[GroundingLink]) -> Vec<&GroundingLink> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| seen.insert(link.uri.as_str()))
        .collect()
}

/// Short link text: the part before the first `|`, trimmed, truncated by chars.
#[must_use]
pub fn display_label(title: &str) -> String {
    let head = title.split('|').next().unwrap_or_default().trim();
    head.chars().take(LABEL_MAX_CHARS).collect()
}

/// Deduplicate and label a message's sources for display.
#[must_use]
pub fn citations_for(links: &[GroundingLink]) -> Vec<Citation> {
    dedupe_by_uri(links)
        .into_iter()
        .map(|link| Citation { uri: link.uri.clone(), title: link.title.clone(), label: display_label(&link.title) })
        .collect()
}

#[cfg(test)]
#[path = "citations_test.rs"]
mod tests;
