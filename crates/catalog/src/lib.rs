//! Catalog resources: products and the categories they belong to.
//!
//! Record types and their request bodies live in `category` / `product`;
//! `viewsets` exposes them to the resource router.

pub mod category;
pub mod fields;
pub mod product;
pub mod store;
pub mod viewsets;

pub use category::{Category, CategoryId, CategoryInput, CategoryPatch};
pub use product::{Product, ProductId, ProductInput, ProductPatch};
pub use store::{InMemoryRepository, Repository};
pub use viewsets::{Catalog, CategoryViewSet, ProductViewSet};
