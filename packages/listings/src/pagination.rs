//! Page arithmetic for listing queries.
//!
//! Pages are 1-based. A page beyond the last one is not an error: it simply
//! selects no rows, and the caller still receives the real `total`/`pages`.

use serde::{Deserialize, Serialize};

/// Upper bound for a requested page size.
pub const MAX_LIMIT: u32 = 100;

/// Number of page buttons shown around the current page.
pub const DEFAULT_WINDOW: u32 = 5;

/// Page sizes offered by the rows-per-page selector.
pub const PAGE_SIZES: &[u32] = &[10, 25, 50, 100];

/// Fallback page and page size a call site declares for malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    pub page: u32,
    pub limit: u32,
}

impl PageDefaults {
    /// The generic jobs endpoint and the overview.
    pub const OVERVIEW: PageDefaults = PageDefaults { page: 1, limit: 10 };
    /// Per-board sections.
    pub const SECTION: PageDefaults = PageDefaults { page: 1, limit: 20 };
    /// Sections with a denser table (Glassdoor).
    pub const WIDE_SECTION: PageDefaults = PageDefaults { page: 1, limit: 50 };
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self::OVERVIEW
    }
}

/// Parse a `page` query parameter. Anything that is not a positive integer
/// falls back to page 1.
pub fn parse_page_param(raw: Option<&str>) -> u32 {
    parse_positive(raw).unwrap_or(1)
}

/// Parse a `limit` query parameter, falling back to `default` for anything
/// that is not a positive integer and clamping to [`MAX_LIMIT`].
pub fn parse_limit_param(raw: Option<&str>, default: u32) -> u32 {
    parse_positive(raw).unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&n| n > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub pages: u32,
    pub skip: u64,
}

/// Compute the number of pages and the row offset for `page`.
///
/// `limit` of zero is treated as one row per page.
pub fn paginate(total: u64, page: u32, limit: u32) -> PageSpan {
    let limit = limit.max(1);
    let pages = total.div_ceil(u64::from(limit));
    PageSpan {
        pages: u32::try_from(pages).unwrap_or(u32::MAX),
        skip: u64::from(page.max(1) - 1) * u64::from(limit),
    }
}

/// Pagination block returned with every jobs response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let span = paginate(total, page, limit);
        Self {
            total,
            page: page.max(1),
            limit: limit.max(1),
            pages: span.pages,
        }
    }

    /// Empty state before the first response arrives.
    pub fn initial(defaults: PageDefaults) -> Self {
        Self::new(0, defaults.page, defaults.limit)
    }

    /// 1-based bounds of the rows on this page, for "showing X to Y of Z".
    pub fn range(&self) -> (u64, u64) {
        let limit = u64::from(self.limit);
        let page = u64::from(self.page);
        let from = self.total.min(page.saturating_sub(1) * limit + 1);
        let to = (page * limit).min(self.total);
        (from, to)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn window(&self) -> PageWindow {
        windowed_page_numbers(self.page, self.pages, DEFAULT_WINDOW)
    }
}

/// The page buttons to draw around the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub numbers: Vec<u32>,
    pub show_first: bool,
    pub show_left_ellipsis: bool,
    pub show_right_ellipsis: bool,
    pub show_last: bool,
}

impl PageWindow {
    /// With no pages there is nothing to navigate.
    pub fn is_visible(&self) -> bool {
        !self.numbers.is_empty()
    }
}

/// Sliding window of at most `window` page numbers centred on `page`.
///
/// The window is shifted left when it would run past the last page, so it
/// stays full whenever there are enough pages.
pub fn windowed_page_numbers(page: u32, pages: u32, window: u32) -> PageWindow {
    let window = i64::from(window.max(1));
    let page = i64::from(page);
    let pages = i64::from(pages);

    let mut start = (page - window / 2).max(1);
    let end = (start + window - 1).min(pages);
    if end - start + 1 < window {
        start = (end - window + 1).max(1);
    }

    let numbers = (start..=end)
        .filter_map(|n| u32::try_from(n).ok())
        .collect();

    PageWindow {
        numbers,
        show_first: start > 1,
        show_left_ellipsis: start > 2,
        show_right_ellipsis: end < pages - 1,
        show_last: end < pages,
    }
}
