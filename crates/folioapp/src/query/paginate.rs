//! Fixed-size page slicing. Pages are 1-based.

/// Number of pages needed for `len` items, 0 when there are none.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size)
}

/// Returns a copy of page `page` (1-based) of `items`.
///
/// Pages past the end come back empty; page 0 is read as page 1 and a page
/// size of 0 as 1.
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let size = page_size.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(size).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn third_page_of_twenty_five() {
        let items: Vec<usize> = (0..25).collect();
        assert_eq!(page_slice(&items, 3, 10), vec![20, 21, 22, 23, 24]);
        assert!(page_slice(&items, 4, 10).is_empty());
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let items: Vec<usize> = (0..5).collect();
        assert_eq!(page_slice(&items, 0, 2), vec![0, 1]);
    }

    #[test]
    fn zero_page_size_reads_as_one() {
        let items: Vec<usize> = (0..5).collect();
        assert_eq!(page_slice(&items, 2, 0), vec![1]);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let items: Vec<usize> = (0..5).collect();
        assert!(page_slice(&items, usize::MAX, usize::MAX).is_empty());
    }
}
