//! Pagination for already sorted in-memory lists.

use serde::Deserialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Pagination {
    /// Take one page out of an already ordered list. Out-of-range pages are empty.
    pub fn slice<T: Clone>(self, items: &[T]) -> Vec<T> {
        let (idx, per) = self.normalize();
        let start = (idx * per) as usize;
        items.iter().skip(start).take(per as usize).cloned().collect()
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn slice_takes_requested_page() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(Pagination { page: 2, per_page: 3 }.slice(&items), vec![4, 5, 6]);
        assert_eq!(Pagination { page: 3, per_page: 3 }.slice(&items), vec![7]);
        assert!(Pagination { page: 9, per_page: 3 }.slice(&items).is_empty());
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }
}