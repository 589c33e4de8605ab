//! Result type aliases for Product Search.

use crate::ProductSearchError;

/// A specialized `Result` type for Product Search operations.
pub type ProductSearchResult<T> = Result<T, ProductSearchError>;
