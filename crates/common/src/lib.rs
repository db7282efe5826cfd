//! Types shared between the `railscred` provider service and its callers.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
