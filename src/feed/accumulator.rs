//! Identity-based merging of fetched pages.
//!
//! Offset pagination is not atomic against concurrent inserts and deletes:
//! an insert ahead of the cursor shifts later items down, so the next page
//! repeats an item already shown. Merging by identity keeps the visible list
//! free of such repeats. An item skipped entirely by a shift stays skipped.

use std::collections::HashSet;

use crate::domain::{FeedItem, ItemId, Page};

/// Append `new_page` to `existing`, dropping every item whose id has already
/// been seen on any earlier page or earlier in `new_page` itself.
///
/// The appended page keeps its `fetched_len`, so cursor arithmetic still
/// follows the server's position.
pub fn merge<T: FeedItem>(existing: Vec<Page<T>>, new_page: Page<T>) -> Vec<Page<T>> {
    let mut seen: HashSet<ItemId> = existing
        .iter()
        .flat_map(|page| page.items.iter().map(FeedItem::item_id))
        .collect();

    let items = new_page
        .items
        .into_iter()
        .filter(|item| seen.insert(item.item_id()))
        .collect();

    let mut pages = existing;
    pages.push(Page {
        items,
        fetched_len: new_page.fetched_len,
    });
    pages
}

/// Concatenate pages into the list shown to the user.
pub fn flatten<T: Clone>(pages: &[Page<T>]) -> Vec<T> {
    pages
        .iter()
        .flat_map(|page| page.items.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        label: &'static str,
    }

    impl FeedItem for Item {
        fn item_id(&self) -> ItemId {
            ItemId::Int(self.id)
        }
    }

    fn item(id: i64) -> Item {
        Item { id, label: "" }
    }

    fn ids(pages: &[Page<Item>]) -> Vec<i64> {
        flatten(pages).iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_merge_drops_ids_seen_on_any_earlier_page() {
        let pages = merge(Vec::new(), Page::new(vec![item(1), item(2)]));
        let pages = merge(pages, Page::new(vec![item(3), item(4)]));
        let pages = merge(pages, Page::new(vec![item(1), item(4), item(5)]));
        assert_eq!(ids(&pages), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_merge_drops_repeats_within_a_page() {
        let pages = merge(Vec::new(), Page::new(vec![item(7), item(7), item(8)]));
        assert_eq!(ids(&pages), vec![7, 8]);
        assert_eq!(pages[0].fetched_len, 3);
    }

    #[test]
    fn test_merge_keeps_first_seen_payload_and_order() {
        let first = Item { id: 2, label: "first" };
        let again = Item { id: 2, label: "again" };
        let pages = merge(Vec::new(), Page::new(vec![item(3), first.clone()]));
        let pages = merge(pages, Page::new(vec![again, item(1)]));

        let flat = flatten(&pages);
        assert_eq!(flat.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(flat[1], first);
    }

    #[test]
    fn test_merge_keeps_server_count() {
        let pages = merge(Vec::new(), Page::new(vec![item(1), item(2)]));
        let pages = merge(pages, Page::new(vec![item(2), item(3)]));
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1].fetched_len, 2);
    }

    #[test]
    fn test_merge_fully_duplicated_page_appends_empty_page() {
        let pages = merge(Vec::new(), Page::new(vec![item(1), item(2)]));
        let pages = merge(pages, Page::new(vec![item(2), item(1)]));
        assert_eq!(pages.len(), 2);
        assert!(pages[1].is_empty());
        assert_eq!(ids(&pages), vec![1, 2]);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let input = vec![
            Page::new(vec![item(5), item(1)]),
            Page::new(vec![item(1), item(9), item(5)]),
            Page::new(vec![item(2), item(9)]),
        ];

        let run = || {
            input
                .iter()
                .cloned()
                .fold(Vec::new(), |pages, page| merge(pages, page))
        };
        assert_eq!(ids(&run()), ids(&run()));
        assert_eq!(ids(&run()), vec![5, 1, 9, 2]);
    }
}
