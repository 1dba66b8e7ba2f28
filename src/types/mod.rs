//! Shared types for DRY compliance.

mod pagination;
mod response;

pub use pagination::{
    Paginated, PaginatedAppointments, PaginatedClinics, PaginatedUsers, PaginationParams,
};
pub use response::MessageResponse;
