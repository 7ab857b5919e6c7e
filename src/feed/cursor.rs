use crate::domain::Page;

/// Offset of the page after `last_page`, or `None` once a short page was seen.
///
/// A full page means more data may exist. The offset is the number of items
/// the server returned so far, before deduplication, so it tracks the
/// server's position rather than the visible count. A page cut short by a
/// concurrent delete is indistinguishable from the last page.
pub fn next_offset<T>(last_page: &Page<T>, all_pages: &[Page<T>], limit: usize) -> Option<usize> {
    if last_page.fetched_len >= limit {
        Some(all_pages.iter().map(|page| page.fetched_len).sum())
    } else {
        None
    }
}

pub fn has_next_page<T>(last_page: &Page<T>, all_pages: &[Page<T>], limit: usize) -> bool {
    next_offset(last_page, all_pages, limit).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(len: usize) -> Page<usize> {
        Page::new((0..len).collect())
    }

    #[test]
    fn test_full_page_continues_at_total_fetched() {
        let pages = vec![page(20), page(20)];
        assert_eq!(next_offset(&pages[1], &pages, 20), Some(40));
        assert!(has_next_page(&pages[1], &pages, 20));
    }

    #[test]
    fn test_short_page_ends_the_feed() {
        let pages = vec![page(20), page(19)];
        assert_eq!(next_offset(&pages[1], &pages, 20), None);
        assert!(!has_next_page(&pages[1], &pages, 20));
    }

    #[test]
    fn test_empty_page_ends_the_feed() {
        let pages = vec![page(0)];
        assert_eq!(next_offset(&pages[0], &pages, 20), None);
    }

    #[test]
    fn test_offset_counts_items_dropped_by_dedup() {
        let mut deduped = page(20);
        deduped.items.truncate(15);
        let pages = vec![page(20), deduped];
        assert_eq!(next_offset(&pages[1], &pages, 20), Some(40));
    }
}
