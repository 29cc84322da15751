use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Header line of the trailing link section appended to the text blob.
pub const LINKS_HEADER: &str = "All Links Found:";

/// Unique URLs gathered from link annotations and from the visible text.
/// Exact-string dedup; iteration is sorted so the appended section is stable.
#[derive(Debug, Default)]
pub struct LinkSet {
    links: BTreeSet<String>,
}

impl LinkSet {
    pub fn insert(&mut self, link: impl Into<String>) {
        let link = link.into();
        let link = link.trim();
        if !link.is_empty() {
            self.links.insert(link.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }
}

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"))
}

/// Returns every `http`/`https` URL-shaped substring, each running up to the
/// next whitespace.
pub fn scan_text_urls(text: &str) -> Vec<&str> {
    url_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Appends the link section to `blob` when `links` is non-empty.
pub fn append_links_section(blob: &mut String, links: &LinkSet) {
    if links.is_empty() {
        return;
    }
    blob.push_str("\n\n");
    blob.push_str(LINKS_HEADER);
    blob.push('\n');
    for link in links.iter() {
        blob.push_str(link);
        blob.push('\n');
    }
}
