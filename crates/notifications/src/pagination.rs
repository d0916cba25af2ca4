//! Page arithmetic for the admin notification list

use std::ops::Range;

/// Rows per page on the admin notification page
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Pages either side of the current one that get a numbered button
const WINDOW: usize = 2;

/// `ceil(len / page_size)`
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (len + page_size - 1) / page_size
}

/// Index range of page `page` (1-based), clamped to `len`
pub fn page_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// One control in the pagination bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageButton {
    Previous { target: usize, disabled: bool },
    Number { page: usize, active: bool },
    Ellipsis,
    Next { target: usize, disabled: bool },
}

/// Pagination bar for `current` of `total` pages
///
/// Numbered buttons cover the first and last page and everything within two
/// of the current page; a page exactly three away becomes an ellipsis.
pub fn page_buttons(current: usize, total: usize) -> Vec<PageButton> {
    let mut buttons = vec![PageButton::Previous {
        target: current.saturating_sub(1).max(1),
        disabled: current <= 1,
    }];

    for page in 1..=total {
        let distance = page.abs_diff(current);
        if page == 1 || page == total || distance <= WINDOW {
            buttons.push(PageButton::Number {
                page,
                active: page == current,
            });
        } else if distance == WINDOW + 1 {
            buttons.push(PageButton::Ellipsis);
        }
    }

    buttons.push(PageButton::Next {
        target: (current + 1).min(total.max(1)),
        disabled: current >= total,
    });
    buttons
}

/// "Showing a-b of n" for a non-empty page
pub fn showing_text(range: &Range<usize>, len: usize) -> String {
    format!("Showing {}-{} of {}", range.start + 1, range.end, len)
}

/// Pagination state handed to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total_pages: usize,
    pub buttons: Vec<PageButton>,
}

impl Pagination {
    pub fn new(current: usize, total_pages: usize) -> Self {
        Self {
            current,
            total_pages,
            buttons: page_buttons(current, total_pages),
        }
    }
}
