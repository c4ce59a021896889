//! Fixed-size result windows

use serde::Deserialize;

/// Rows per page for operation and chat listings
pub const PAGE_SIZE: u32 = 50;

/// Zero-based page index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Page(u32);

impl Page {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn limit(&self) -> i64 {
        i64::from(PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.0) * i64::from(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(Page::default().offset(), 0);
        assert_eq!(Page::new(2).offset(), 100);
        assert_eq!(Page::new(2).limit(), 50);
    }
}
