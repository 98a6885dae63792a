use serde::Serialize;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64, per_page: u64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Pull the page number back onto the last existing page.
    pub fn clamp(self, total_items: u64) -> Self {
        let last = total_pages(total_items, self.per_page);
        Self {
            number: self.number.min(last),
            ..self
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }
}

fn total_pages(total_items: u64, per_page: u64) -> u64 {
    total_items.div_ceil(per_page.max(1)).max(1)
}

/// One page of results plus what is needed to render page links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// `request` is expected to be clamped already.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            total_items,
            total_pages: total_pages(total_items, request.per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_last_page() {
        let request = PageRequest::new(7, 10).clamp(25);
        assert_eq!(request.number, 3);
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_empty_result_still_has_one_page() {
        let request = PageRequest::new(4, 10).clamp(0);
        assert_eq!(request.number, 1);

        let page: Page<u8> = Page::new(vec![], request, 0);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_zero_is_treated_as_first_page() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.number, 1);
        assert_eq!(request.per_page, 1);
    }

    #[test]
    fn test_page_links() {
        let page = Page::new(vec![1, 2], PageRequest::new(2, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.items, vec![1, 2]);
    }
}
