//! 商品内存存储
//!
//! 唯一持有商品集合的组件。所有操作都在同一把互斥锁内完成，
//! 读操作看不到写了一半的状态。

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::model::{NewProduct, Product, ProductPatch};

#[derive(Debug, Default)]
pub struct ProductStore {
    records: Mutex<Vec<Product>>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带三条示例商品的存储
    pub fn with_sample_data() -> Self {
        Self::from_records(sample_products())
    }

    pub fn from_records(records: Vec<Product>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    // 单个操作内不会 panic，锁中毒时数据依然完整
    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 在锁内对当前快照执行只读计算
    pub fn read<R>(&self, f: impl FnOnce(&[Product]) -> R) -> R {
        let records = self.lock();
        f(&records)
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.lock().iter().find(|p| p.id == id).cloned()
    }

    /// 生成 id、裁剪文本字段并追加到末尾
    pub fn insert(&self, data: NewProduct) -> Product {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: data.name.trim().to_string(),
            description: data.description.trim().to_string(),
            price: data.price,
            category: data.category.trim().to_string(),
            in_stock: data.in_stock.unwrap_or(true),
        };

        self.lock().push(product.clone());
        product
    }

    /// 只修改提供的字段；找不到时返回 `None`
    pub fn update(&self, id: &str, patch: ProductPatch) -> Option<Product> {
        let mut records = self.lock();
        let product = records.iter_mut().find(|p| p.id == id)?;

        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            product.description = description.trim().to_string();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = category.trim().to_string();
        }
        if let Some(in_stock) = patch.in_stock {
            product.in_stock = in_stock;
        }

        Some(product.clone())
    }

    pub fn remove(&self, id: &str) -> Option<Product> {
        let mut records = self.lock();
        let index = records.iter().position(|p| p.id == id)?;
        Some(records.remove(index))
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop".to_string(),
            description: "High-performance laptop with 16GB RAM".to_string(),
            price: 1200.0,
            category: "electronics".to_string(),
            in_stock: true,
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone".to_string(),
            description: "Latest model with 128GB storage".to_string(),
            price: 800.0,
            category: "electronics".to_string(),
            in_stock: true,
        },
        Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            description: "Programmable coffee maker with timer".to_string(),
            price: 50.0,
            category: "kitchen".to_string(),
            in_stock: false,
        },
    ]
}
