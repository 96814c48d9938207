//! Domain record and response models for the product API
//!
//! The product record plus the DTOs used for serializing HTTP response bodies.

pub mod product;
pub mod responses;

// Re-export commonly used types
pub use product::Product;
pub use responses::{HealthResponse, ProductResponse, StatsResponse};
