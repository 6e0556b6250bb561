//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from the web framework.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod notify;
pub mod report;
