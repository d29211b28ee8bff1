pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;

use serde::Serialize;

use crate::errors::ServiceError;

/// One page of results from a paginated listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    /// 1-based page number as requested.
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size)
        }
    }
}

/// Rejects out-of-range pagination before any database call.
pub(crate) fn validate_pagination(page: u64, page_size: u64) -> Result<(), ServiceError> {
    if page < 1 {
        return Err(ServiceError::InvalidInput(
            "page must be a positive number".to_string(),
        ));
    }
    if page_size < 1 {
        return Err(ServiceError::InvalidInput(
            "page size must be a positive number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds() {
        assert!(validate_pagination(1, 10).is_ok());
        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(1, 0).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::<u8> {
            items: vec![],
            total: 21,
            page: 1,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let empty = Page::<u8> {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(empty.total_pages(), 1);
    }
}
