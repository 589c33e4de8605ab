//! Product entity.

use super::Seller;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A product offered by a seller.
///
/// Equality covers every field while the hash covers `id` only. That stays
/// consistent because equal products always share an id.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seller: Seller,
}

impl Product {
    /// Creates a new product without a description.
    #[must_use]
    pub fn new(id: impl Into<String>, product_name: impl Into<String>, seller: Seller) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.into(),
            description: None,
            seller,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.product_name == other.product_name
            && self.description == other.description
            && self.seller == other.seller
    }
}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(product: &Product) -> u64 {
        let mut hasher = DefaultHasher::new();
        product.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_includes_description_and_seller() {
        let seller = Seller::named("s-1", "Acme");
        let a = Product::new("p-1", "Anvil", seller.clone());
        let b = Product::new("p-1", "Anvil", seller.clone());
        assert_eq!(a, b);

        assert_ne!(a, b.clone().with_description("heavy"));
        assert_ne!(a, Product::new("p-1", "Anvil", Seller::named("s-2", "Acme")));
    }

    #[test]
    fn test_hash_depends_on_id_only() {
        let a = Product::new("p-1", "Anvil", Seller::named("s-1", "Acme"));
        let b = Product::new("p-1", "Rocket", Seller::named("s-2", "Other"));
        assert_ne!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
