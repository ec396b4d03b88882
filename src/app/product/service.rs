//! 商品业务服务

use std::sync::Arc;

use tracing::{debug, info};

use super::model::{NewProduct, Product, ProductPatch, ProductStats};
use super::query::{self, Page, PageRequest, ProductFilter};
use super::stats;
use super::store::ProductStore;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }

    pub fn list_products(&self, filter: &ProductFilter, request: PageRequest) -> Page {
        let page = self
            .store
            .read(|records| query::list(records, filter, request));
        debug!(
            total = page.pagination.total,
            returned = page.products.len(),
            "list products"
        );
        page
    }

    pub fn search_products(&self, term: &str) -> Vec<Product> {
        self.store.read(|records| query::search(records, term))
    }

    pub fn product_stats(&self) -> ProductStats {
        self.store.read(stats::compute)
    }

    pub fn get_product(&self, id: &str) -> Option<Product> {
        self.store.get(id)
    }

    pub fn create_product(&self, data: NewProduct) -> Product {
        let product = self.store.insert(data);
        info!(id = %product.id, name = %product.name, "product created");
        product
    }

    pub fn update_product(&self, id: &str, patch: ProductPatch) -> Option<Product> {
        let updated = self.store.update(id, patch)?;
        info!(id = %updated.id, "product updated");
        Some(updated)
    }

    pub fn delete_product(&self, id: &str) -> Option<Product> {
        let deleted = self.store.remove(id)?;
        info!(id = %deleted.id, "product deleted");
        Some(deleted)
    }
}
