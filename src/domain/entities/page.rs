//! Pagination request and response envelope.

use serde::Serialize;
use std::num::NonZeroU32;

use crate::domain::query::QueryError;

/// A validated, zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: NonZeroU32,
}

impl PageRequest {
    pub fn new(page: u32, size: NonZeroU32) -> Self {
        Self { page, size }
    }

    /// Validates raw pagination input. Out-of-range values are rejected, not
    /// clamped.
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidPage`] if `page` is negative or does not fit `u32`
    /// - [`QueryError::InvalidPageSize`] if `size` is outside `1..=max_size`
    pub fn parse(page: i64, size: i64, max_size: u32) -> Result<Self, QueryError> {
        let page = u32::try_from(page).map_err(|_| QueryError::InvalidPage(page))?;

        let size = u32::try_from(size)
            .ok()
            .filter(|s| *s <= max_size)
            .and_then(NonZeroU32::new)
            .ok_or(QueryError::InvalidPageSize {
                size,
                max: max_size,
            })?;

        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size.get()
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size.get())
    }

    /// `page × size`, computed in 64 bits.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size.get())
    }
}

/// One page of results plus page metadata.
///
/// Built once per request and immutable afterwards; `has_next` and
/// `has_previous` are derived from `current_page` and `total_pages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    data: Vec<T>,
    current_page: u32,
    total_pages: u64,
    total_elements: u64,
    page_size: u32,
    has_next: bool,
    has_previous: bool,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let current_page = request.page();
        let total_pages = total_elements.div_ceil(u64::from(request.size()));

        Self {
            data,
            current_page,
            total_pages,
            total_elements,
            page_size: request.size(),
            has_next: u64::from(current_page) + 1 < total_pages,
            has_previous: current_page > 0,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }
}
