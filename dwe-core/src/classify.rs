//! Group assignment for item definitions.

use std::sync::LazyLock;

use regex::Regex;

/// Prefix that marks an explicit filter tag.
pub const FILTER_TAG_PREFIX: &str = "ItemFilter.";

/// Group used when a record carries neither a filter tag nor a category.
pub const FALLBACK_GROUP: &str = "Misc";

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"));

/// Which precedence rule produced the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    FilterTag,
    Category,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The tag the group was derived from, unsanitized.
    pub tag: String,
    /// Sanitized group key, safe as a directory name.
    pub group: String,
    pub rule: ClassificationRule,
    /// All filter tags seen, when there was more than one. The last one won.
    pub conflicting: Vec<String>,
}

impl Classification {
    pub fn has_conflict(&self) -> bool {
        !self.conflicting.is_empty()
    }
}

/// Classify from the record's tags.
///
/// Precedence: last `ItemFilter.*` tag (multiple tags are reported in
/// `conflicting`), then the category tag, then [`FALLBACK_GROUP`].
pub fn classify(tags: &[String], category_tag: Option<&str>) -> Classification {
    let filter_tags: Vec<&String> = tags
        .iter()
        .filter(|t| t.starts_with(FILTER_TAG_PREFIX))
        .collect();

    let (tag, rule) = match filter_tags.last() {
        Some(last) => (last.to_string(), ClassificationRule::FilterTag),
        None => match category_tag.filter(|c| !c.is_empty()) {
            Some(category) => (category.to_string(), ClassificationRule::Category),
            None => (FALLBACK_GROUP.to_string(), ClassificationRule::Fallback),
        },
    };

    let conflicting = if filter_tags.len() > 1 {
        filter_tags.into_iter().cloned().collect()
    } else {
        Vec::new()
    };

    Classification {
        group: sanitize_tag(&tag),
        tag,
        rule,
        conflicting,
    }
}

/// Reduce a dotted tag to its last segment and make it filesystem-safe.
///
/// `ItemFilter.Bag.Food` becomes `Food`; runs of characters outside
/// `[A-Za-z0-9._-]` become a single underscore.
pub fn sanitize_tag(tag: &str) -> String {
    let stripped = tag.replace(FILTER_TAG_PREFIX, "");
    let last = stripped.rsplit('.').next().unwrap_or_default();
    UNSAFE_RUN.replace_all(last, "_").into_owned()
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
