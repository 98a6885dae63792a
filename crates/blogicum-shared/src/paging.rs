//! `?page=N` handling.

use serde::Deserialize;

use blogicum_core::domain::PageRequest;

/// Query string of paginated pages.
///
/// Anything that is not a positive number falls back to the first page;
/// numbers past the end are clamped by the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1)
    }

    pub fn request(&self, per_page: u64) -> PageRequest {
        PageRequest::new(self.number(), per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_page_number_parsing() {
        assert_eq!(query(None).number(), 1);
        assert_eq!(query(Some("3")).number(), 3);
        assert_eq!(query(Some("0")).number(), 1);
        assert_eq!(query(Some("-2")).number(), 1);
        assert_eq!(query(Some("last")).number(), 1);
    }

    #[test]
    fn test_request_uses_page_size() {
        let request = query(Some("2")).request(10);
        assert_eq!(request.offset(), 10);
    }
}
