use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// A product copied into a user's cart. There is no quantity: adding the same
/// product twice yields two entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
}

impl From<Product> for CartEntry {
    fn from(product: Product) -> Self {
        Self { product }
    }
}
