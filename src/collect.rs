//! Item collection for a feed.
//!
//! Items from every included section are concatenated and sorted newest
//! first. The sort is stable, so items sharing a date keep their collection
//! order. No deduplication happens: an item listed in two included sections
//! appears twice.

use crate::content::{ContentError, ItemSource};
use crate::types::Item;
use std::collections::BTreeSet;
use tracing::debug;

/// Gather the items of `sections` from `source`, ordered by date descending.
pub fn collect_items(
    sections: &BTreeSet<String>,
    source: &dyn ItemSource,
) -> Result<Vec<Item>, ContentError> {
    let mut items = Vec::new();
    for section in sections {
        let section_items = source.items(section)?;
        debug!(section = %section, count = section_items.len(), "collected section");
        items.extend_from_slice(section_items);
    }
    items.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentTree;
    use crate::test_helpers::{item, sections, titles};

    #[test]
    fn orders_newest_first_regardless_of_input_order() {
        let mut tree = ContentTree::default();
        tree.insert("posts", item("middle", 2));
        tree.insert("posts", item("oldest", 1));
        tree.insert("posts", item("newest", 3));

        let items = collect_items(&sections(&["posts"]), &tree).unwrap();
        assert_eq!(titles(&items), vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn merges_sections() {
        let mut tree = ContentTree::default();
        tree.insert("posts", item("post", 1));
        tree.insert("notes", item("note", 2));
        tree.insert("drafts", item("draft", 3));

        let items = collect_items(&sections(&["posts", "notes"]), &tree).unwrap();
        assert_eq!(titles(&items), vec!["note", "post"]);
    }

    #[test]
    fn absent_section_contributes_nothing() {
        let mut tree = ContentTree::default();
        tree.insert("posts", item("post", 1));

        let items = collect_items(&sections(&["posts", "missing"]), &tree).unwrap();
        assert_eq!(titles(&items), vec!["post"]);
    }

    #[test]
    fn equal_dates_keep_collection_order() {
        let mut tree = ContentTree::default();
        tree.insert("posts", item("first", 1));
        tree.insert("posts", item("second", 1));
        tree.insert("posts", item("third", 1));

        let items = collect_items(&sections(&["posts"]), &tree).unwrap();
        assert_eq!(titles(&items), vec!["first", "second", "third"]);
    }

    #[test]
    fn item_in_two_sections_is_duplicated() {
        let mut tree = ContentTree::default();
        tree.insert("posts", item("shared", 1));
        tree.insert("featured", item("shared", 1));

        let items = collect_items(&sections(&["posts", "featured"]), &tree).unwrap();
        assert_eq!(items.len(), 2);
    }

    struct Broken;

    impl ItemSource for Broken {
        fn items(&self, section: &str) -> Result<&[Item], ContentError> {
            Err(ContentError::Section {
                section: section.to_string(),
                reason: "offline".into(),
            })
        }
    }

    #[test]
    fn source_errors_propagate() {
        let result = collect_items(&sections(&["posts"]), &Broken);
        assert!(matches!(result, Err(ContentError::Section { .. })));
    }

    #[test]
    fn no_sections_yields_nothing() {
        let tree = ContentTree::default();
        assert!(collect_items(&BTreeSet::new(), &tree).unwrap().is_empty());
    }
}
