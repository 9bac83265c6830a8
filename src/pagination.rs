use serde::Serialize;

/// Builds the compact page list rendered under tables. `None` marks an
/// ellipsis between page ranges.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Wraps a page already cut by the backend.
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }

    /// Cuts page `current_page` out of a fully fetched list.
    pub fn from_vec(items: Vec<T>, current_page: usize, per_page: usize) -> Self {
        let total = items.len();
        let pages = total_pages(total, per_page);
        let current_page = current_page.clamp(1, pages.max(1));
        let items = items
            .into_iter()
            .skip((current_page - 1) * per_page)
            .take(per_page)
            .collect();
        Self::new(items, current_page, pages, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_show_every_page() {
        assert_eq!(get_pages(3, 1, 2, 2, 4, 2), vec![Some(1), Some(2), Some(3)]);
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn long_lists_collapse_into_ellipses() {
        let pages = get_pages(40, 20, 2, 2, 4, 2);
        assert_eq!(pages.first(), Some(&Some(1)));
        assert_eq!(pages.last(), Some(&Some(40)));
        assert_eq!(pages.iter().filter(|p| p.is_none()).count(), 2);
        assert!(pages.contains(&Some(20)));
    }

    #[test]
    fn from_vec_slices_and_clamps() {
        let page = Paginated::from_vec((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);

        let clamped = Paginated::from_vec((1..=5).collect::<Vec<_>>(), 9, 10);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items.len(), 5);

        let empty = Paginated::from_vec(Vec::<u8>::new(), 1, 10);
        assert!(empty.pages.is_empty());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
    }
}
