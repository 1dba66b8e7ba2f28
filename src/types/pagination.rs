//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across all admin list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Get limit clamped to [1, MAX_PAGE_SIZE]
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Get page number, 1-indexed
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper: `{items, total, page, pages}`.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedUsers = Paginated<crate::domain::UserResponse>,
    PaginatedClinics = Paginated<crate::domain::ClinicResponse>,
    PaginatedAppointments = Paginated<crate::domain::AppointmentResponse>
)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(items: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams { page: 1, limit: 500 };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = PaginationParams { page: 1, limit: 0 };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn offset_accounts_for_one_indexing() {
        let params = PaginationParams { page: 3, limit: 20 };
        assert_eq!(params.offset(), 40);

        // Page 0 is treated as page 1.
        let params = PaginationParams { page: 0, limit: 20 };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn page_count_rounds_up() {
        let paged: Paginated<u8> = Paginated::new(vec![], 1, 20, 41);
        assert_eq!(paged.pages, 3);
    }
}
