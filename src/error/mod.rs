//! Error taxonomy for the service core
//!
//! - **`types`** - the `ApiError` enum and its status-code mapping
//! - **`conversion`** - `IntoResponse` so handlers can return errors
//!   directly

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::ApiError;
