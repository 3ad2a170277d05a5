//! Table-of-contents page estimation.
//!
//! The page shown next to each TOC entry is an estimate, not a measurement:
//! the HTML is paginated later by the print step, which this crate never sees.
//! Each rendering mode assumes a fixed number of pages per travel:
//!
//! ```text
//! book mode:    page(i) = 4 + i * 4   → 4, 8, 12, ...
//! layout mode:  page(i) = 3 + i * 2   → 3, 5, 7, ...
//! ```
//!
//! Both formulas are kept as the defaults and can be tuned in `book.toml`.

use serde::{Deserialize, Serialize};

/// Linear page estimate: `first_page + index * pages_per_travel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    /// Page of the travel at index 0.
    #[serde(default = "Pagination::default_first_page")]
    pub first_page: u32,
    /// Pages between consecutive travels. Must be at least 1.
    #[serde(default = "Pagination::default_pages_per_travel")]
    pub pages_per_travel: u32,
}

impl Pagination {
    /// Fixed book template: title, TOC, then four pages per travel.
    pub const BOOK: Pagination = Pagination {
        first_page: 4,
        pages_per_travel: 4,
    };

    /// Custom block layout: two pages per travel after cover and TOC.
    pub const LAYOUT: Pagination = Pagination {
        first_page: 3,
        pages_per_travel: 2,
    };

    fn default_first_page() -> u32 {
        Self::BOOK.first_page
    }

    fn default_pages_per_travel() -> u32 {
        Self::BOOK.pages_per_travel
    }

    /// Estimated page of the travel at zero-based `index`.
    pub fn page_for(&self, index: usize) -> u64 {
        u64::from(self.first_page) + index as u64 * u64::from(self.pages_per_travel)
    }

    /// Page numbers for `count` travels, in travel order.
    pub fn pages(&self, count: usize) -> Vec<u64> {
        (0..count).map(|i| self.page_for(i)).collect()
    }
}
