//! Product domain rules: size enumeration, field validation and paging.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Op};
use crate::types::{DbId, Timestamp};

/// Maximum number of products returned per list page.
pub const PAGE_SIZE: i64 = 10;

pub const INVALID_CATEGORY_MESSAGE: &str = "Check the product category.";
pub const INVALID_PRICE_MESSAGE: &str = "Check the product price.";
pub const INVALID_COST_MESSAGE: &str = "Check the product cost.";
pub const INVALID_NAME_MESSAGE: &str = "Check the product name.";
pub const INVALID_DESCRIPTION_MESSAGE: &str = "Check the product description.";
pub const INVALID_BARCODE_MESSAGE: &str = "Check the product barcode.";
pub const INVALID_PRODUCT_ID_MESSAGE: &str = "Check the product ID.";
pub const INVALID_EXPIRY_DATE_MESSAGE: &str = "Check the product expiry date.";

/// `0001-01-01T00:00:00Z`, the value clients send for an unset date.
const UNSET_DATE_SECS: i64 = -62_135_596_800;

/// Physical size of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSize {
    Small,
    Large,
}

impl ProductSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSize::Small => "small",
            ProductSize::Large => "large",
        }
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown product size: {0}")]
pub struct ParseProductSizeError(String);

impl FromStr for ProductSize {
    type Err = ParseProductSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(ProductSize::Small),
            "large" => Ok(ProductSize::Large),
            other => Err(ParseProductSizeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProductSize {
    type Error = ParseProductSizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reject an empty text field.
pub fn require_text(op: Op, value: &str, message: &'static str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::invalid(op, message));
    }
    Ok(())
}

/// Reject a negative (or non-finite) monetary amount.
pub fn require_amount(op: Op, value: f64, message: &'static str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::invalid(op, message));
    }
    Ok(())
}

/// Reject an unset expiry date (`0001-01-01T00:00:00Z` or earlier).
pub fn require_expiry_date(op: Op, value: Timestamp) -> Result<(), CoreError> {
    if value.timestamp() <= UNSET_DATE_SECS {
        return Err(CoreError::invalid(op, INVALID_EXPIRY_DATE_MESSAGE));
    }
    Ok(())
}

/// Reject a non-positive product id.
pub fn require_product_id(op: Op, id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::invalid(op, INVALID_PRODUCT_ID_MESSAGE));
    }
    Ok(())
}
