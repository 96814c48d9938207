//! Product record
//!
//! The record served by the store and snapshotted into cache entries.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A product record keyed by its string id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl Product {
    /// Creates a product, rejecting empty ids and negative or non-finite prices.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AppError::InvalidRequest(
                "Product id cannot be empty".to_string(),
            ));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::InvalidRequest(format!(
                "Product {} has invalid price {}",
                id, price
            )));
        }

        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        })
    }
}
