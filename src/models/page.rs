use serde::Serialize;

/// One page of results plus the numbers needed to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Paginator metadata as the mobile client expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

/// Row offset of a 1-based page, or `None` when it does not fit in `u64`.
#[must_use]
pub const fn page_offset(page: u64, per_page: u64) -> Option<u64> {
    let page = if page == 0 { 1 } else { page };
    let per_page = if per_page == 0 { 1 } else { per_page };
    (page - 1).checked_mul(per_page)
}

impl<T> Page<T> {
    /// `page` is 1-based; zero is treated as the first page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        Self {
            items,
            total,
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Slices an already filtered result set.
    #[must_use]
    pub fn from_vec(all: Vec<T>, page: u64, per_page: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len() as u64;
        let skip = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, page, per_page)
    }

    #[must_use]
    pub const fn last_page(&self) -> u64 {
        let pages = self.total.div_ceil(self.per_page);
        if pages == 0 { 1 } else { pages }
    }

    #[must_use]
    pub fn info(&self) -> PageInfo {
        let (from, to) = if self.items.is_empty() {
            (None, None)
        } else {
            let from = page_offset(self.page, self.per_page)
                .unwrap_or(u64::MAX)
                .saturating_add(1);
            let to = from.saturating_add(self.items.len() as u64 - 1);
            (Some(from), Some(to))
        };

        PageInfo {
            current_page: self.page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page(),
            from,
            to,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
