//! 查询引擎：过滤、搜索与分页
//!
//! 全部是对快照的线性扫描，不修改存储。

use serde::Serialize;

use super::model::Product;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// 列表过滤条件，各条件之间为 AND 关系，`None` 表示不过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !contains_ci(&product.name, &term) && !contains_ci(&product.description, &term) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if product.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }

        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }

        true
    }
}

// `term` 已转为小写
fn contains_ci(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 从 1 开始
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    fn end(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

/// 分页信息，每次查询重新计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// 过滤后分页；超出范围的页返回空数据，分页信息照常计算
pub fn list(records: &[Product], filter: &ProductFilter, request: PageRequest) -> Page {
    let request = PageRequest {
        page: request.page.max(1),
        limit: request.limit.clamp(1, MAX_LIMIT),
    };

    let filtered: Vec<&Product> = records.iter().filter(|p| filter.matches(p)).collect();
    let total = filtered.len();
    let (start, end) = (request.start(), request.end());

    let products = filtered
        .into_iter()
        .skip(start)
        .take(request.limit)
        .cloned()
        .collect();

    let pagination = Pagination {
        current: request.page,
        pages: total.div_ceil(request.limit),
        total,
        limit: request.limit,
        next: (end < total).then(|| request.page + 1),
        prev: (start > 0).then(|| request.page - 1),
    };

    Page {
        products,
        pagination,
    }
}

/// 名称、描述或分类包含 `term`（不区分大小写）的全部商品，不分页
pub fn search(records: &[Product], term: &str) -> Vec<Product> {
    let term = term.to_lowercase();
    records
        .iter()
        .filter(|p| {
            contains_ci(&p.name, &term)
                || contains_ci(&p.description, &term)
                || contains_ci(&p.category, &term)
        })
        .cloned()
        .collect()
}
