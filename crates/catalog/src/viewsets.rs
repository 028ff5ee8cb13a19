//! Viewsets exposing the catalog to the resource router.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use factory_core::RecordId;
use factory_routers::{Capabilities, ViewError, ViewResult, ViewSet};

use crate::category::{Category, CategoryId, CategoryInput, CategoryPatch};
use crate::product::{Product, ProductId, ProductInput, ProductPatch};
use crate::store::{InMemoryRepository, Repository};

/// Shared catalog state: both repositories, so each viewset can check
/// references into the other.
///
/// Every write holds `writes` from its first read to its last store, so a
/// check made during a write still holds when the write lands.
pub struct Catalog {
    categories: Arc<dyn Repository<Category>>,
    products: Arc<dyn Repository<Product>>,
    writes: Mutex<()>,
}

impl Catalog {
    pub fn new(
        categories: Arc<dyn Repository<Category>>,
        products: Arc<dyn Repository<Product>>,
    ) -> Self {
        Self {
            categories,
            products,
            writes: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::<Category>::new()),
            Arc::new(InMemoryRepository::<Product>::new()),
        )
    }

    pub fn categories(&self) -> &Arc<dyn Repository<Category>> {
        &self.categories
    }

    pub fn products(&self) -> &Arc<dyn Repository<Product>> {
        &self.products
    }

    fn write_lock(&self) -> ViewResult<MutexGuard<'_, ()>> {
        self.writes
            .lock()
            .map_err(|_| ViewError::Internal("catalog write lock poisoned".to_string()))
    }

    fn ensure_category(&self, category: Option<CategoryId>) -> ViewResult<()> {
        match category {
            Some(id) if self.categories.get(id).is_none() => Err(ViewError::Validation(format!(
                "category: invalid pk \"{id}\" - object does not exist"
            ))),
            _ => Ok(()),
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: Value) -> ViewResult<T> {
    serde_json::from_value(body).map_err(|e| ViewError::Validation(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> ViewResult<Value> {
    serde_json::to_value(value).map_err(|e| ViewError::Internal(e.to_string()))
}

fn parse_lookup(lookup: &str) -> ViewResult<RecordId> {
    Ok(lookup.parse::<RecordId>()?)
}

/// CRUD over `/product/`.
pub struct ProductViewSet {
    catalog: Arc<Catalog>,
}

impl ProductViewSet {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn load(&self, lookup: &str) -> ViewResult<Product> {
        let id = ProductId::new(parse_lookup(lookup)?);
        self.catalog.products.get(id).ok_or(ViewError::NotFound)
    }
}

impl ViewSet for ProductViewSet {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn list(&self) -> ViewResult<Value> {
        to_json(&self.catalog.products.list())
    }

    fn create(&self, body: Value) -> ViewResult<Value> {
        let input: ProductInput = parse_body(body)?;
        let _guard = self.catalog.write_lock()?;
        self.catalog.ensure_category(input.category)?;

        let product = Product::create(ProductId::new(RecordId::new()), input, Utc::now())?;
        self.catalog.products.upsert(product.clone());
        tracing::info!(product_id = %product.id, "product created");
        to_json(&product)
    }

    fn retrieve(&self, lookup: &str) -> ViewResult<Value> {
        to_json(&self.load(lookup)?)
    }

    fn update(&self, lookup: &str, body: Value) -> ViewResult<Value> {
        let _guard = self.catalog.write_lock()?;
        let mut product = self.load(lookup)?;
        let input: ProductInput = parse_body(body)?;
        self.catalog.ensure_category(input.category)?;

        product.replace(input, Utc::now())?;
        self.catalog.products.upsert(product.clone());
        tracing::info!(product_id = %product.id, "product updated");
        to_json(&product)
    }

    fn partial_update(&self, lookup: &str, body: Value) -> ViewResult<Value> {
        let _guard = self.catalog.write_lock()?;
        let mut product = self.load(lookup)?;
        let patch: ProductPatch = parse_body(body)?;
        if patch.category.is_some() {
            self.catalog.ensure_category(product.category_after(&patch))?;
        }

        product.patch(patch, Utc::now())?;
        self.catalog.products.upsert(product.clone());
        tracing::info!(product_id = %product.id, "product patched");
        to_json(&product)
    }

    fn destroy(&self, lookup: &str) -> ViewResult<()> {
        let id = ProductId::new(parse_lookup(lookup)?);
        let _guard = self.catalog.write_lock()?;
        self.catalog.products.remove(id).ok_or(ViewError::NotFound)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

/// CRUD over `/category/`.
pub struct CategoryViewSet {
    catalog: Arc<Catalog>,
}

impl CategoryViewSet {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn load(&self, lookup: &str) -> ViewResult<Category> {
        let id = CategoryId::new(parse_lookup(lookup)?);
        self.catalog.categories.get(id).ok_or(ViewError::NotFound)
    }
}

impl ViewSet for CategoryViewSet {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn list(&self) -> ViewResult<Value> {
        to_json(&self.catalog.categories.list())
    }

    fn create(&self, body: Value) -> ViewResult<Value> {
        let input: CategoryInput = parse_body(body)?;
        let category = Category::create(CategoryId::new(RecordId::new()), input, Utc::now())?;
        self.catalog.categories.upsert(category.clone());
        tracing::info!(category_id = %category.id, "category created");
        to_json(&category)
    }

    fn retrieve(&self, lookup: &str) -> ViewResult<Value> {
        to_json(&self.load(lookup)?)
    }

    fn update(&self, lookup: &str, body: Value) -> ViewResult<Value> {
        let _guard = self.catalog.write_lock()?;
        let mut category = self.load(lookup)?;
        let input: CategoryInput = parse_body(body)?;
        category.replace(input, Utc::now())?;
        self.catalog.categories.upsert(category.clone());
        tracing::info!(category_id = %category.id, "category updated");
        to_json(&category)
    }

    fn partial_update(&self, lookup: &str, body: Value) -> ViewResult<Value> {
        let _guard = self.catalog.write_lock()?;
        let mut category = self.load(lookup)?;
        let patch: CategoryPatch = parse_body(body)?;
        category.patch(patch, Utc::now())?;
        self.catalog.categories.upsert(category.clone());
        tracing::info!(category_id = %category.id, "category patched");
        to_json(&category)
    }

    /// Products pointing at the removed category keep existing with no category.
    fn destroy(&self, lookup: &str) -> ViewResult<()> {
        let id = CategoryId::new(parse_lookup(lookup)?);
        let _guard = self.catalog.write_lock()?;
        self.catalog.categories.remove(id).ok_or(ViewError::NotFound)?;

        let now = Utc::now();
        let mut detached = 0usize;
        for mut product in self.catalog.products.list() {
            if product.category == Some(id) {
                product.category = None;
                product.timestamps.touch(now);
                self.catalog.products.upsert(product);
                detached += 1;
            }
        }

        tracing::info!(category_id = %id, detached, "category deleted");
        Ok(())
    }
}
