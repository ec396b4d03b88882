//! 校验层
//!
//! 请求体校验会累积全部字段错误后一次性返回；
//! 查询参数校验遇到第一个错误即返回。

use serde_json::Value;

use super::model::{ListQuery, NewProduct, ProductPatch, ProductPayload};
use super::query::{PageRequest, ProductFilter, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::core::error::CoreError;

const NAME_MIN: usize = 2;
const DESCRIPTION_MIN: usize = 5;
const CATEGORY_MIN: usize = 2;

const IN_STOCK_INVALID: &str = "In stock must be a boolean";

fn text_field(value: Option<&Value>, min: usize) -> Option<String> {
    match value {
        Some(Value::String(s)) if s.trim().chars().count() >= min => Some(s.clone()),
        _ => None,
    }
}

fn price_field(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// 创建时的完整校验，所有字段必填
pub fn validate_new(payload: &ProductPayload) -> Result<NewProduct, CoreError> {
    let mut violations = Vec::new();

    let name = text_field(payload.name.as_ref(), NAME_MIN);
    if name.is_none() {
        violations.push("Name is required and must be at least 2 characters long");
    }

    let description = text_field(payload.description.as_ref(), DESCRIPTION_MIN);
    if description.is_none() {
        violations.push("Description is required and must be at least 5 characters long");
    }

    let price = price_field(payload.price.as_ref());
    if price.is_none() {
        violations.push("Price is required and must be a positive number");
    }

    let category = text_field(payload.category.as_ref(), CATEGORY_MIN);
    if category.is_none() {
        violations.push("Category is required and must be at least 2 characters long");
    }

    let in_stock = match &payload.in_stock {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(()),
    };
    if in_stock.is_err() {
        violations.push(IN_STOCK_INVALID);
    }

    match (name, description, price, category, in_stock) {
        (Some(name), Some(description), Some(price), Some(category), Ok(in_stock)) => {
            Ok(NewProduct {
                name,
                description,
                price,
                category,
                in_stock,
            })
        }
        _ => Err(CoreError::validation_failed(violations)),
    }
}

/// 更新时的部分校验，只检查提供了的字段
pub fn validate_patch(payload: &ProductPayload) -> Result<ProductPatch, CoreError> {
    let mut violations = Vec::new();
    let mut patch = ProductPatch::default();

    if let Some(value) = &payload.name {
        patch.name = text_field(Some(value), NAME_MIN);
        if patch.name.is_none() {
            violations.push("Name must be at least 2 characters long");
        }
    }

    if let Some(value) = &payload.description {
        patch.description = text_field(Some(value), DESCRIPTION_MIN);
        if patch.description.is_none() {
            violations.push("Description must be at least 5 characters long");
        }
    }

    if let Some(value) = &payload.price {
        patch.price = price_field(Some(value));
        if patch.price.is_none() {
            violations.push("Price must be a positive number");
        }
    }

    if let Some(value) = &payload.category {
        patch.category = text_field(Some(value), CATEGORY_MIN);
        if patch.category.is_none() {
            violations.push("Category must be at least 2 characters long");
        }
    }

    if let Some(value) = &payload.in_stock {
        patch.in_stock = value.as_bool();
        if patch.in_stock.is_none() {
            violations.push(IN_STOCK_INVALID);
        }
    }

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(CoreError::validation_failed(violations))
    }
}

// 空字符串视为未提供
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// 列表查询参数校验，返回过滤条件和分页请求
pub fn validate_list_query(query: &ListQuery) -> Result<(ProductFilter, PageRequest), CoreError> {
    let page = match supplied(&query.page) {
        None => DEFAULT_PAGE,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(page) if page >= 1 => page,
            _ => {
                return Err(CoreError::Validation(
                    "Page must be a positive integer".to_string(),
                ))
            }
        },
    };

    let limit = match supplied(&query.limit) {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
            _ => {
                return Err(CoreError::Validation(
                    "Limit must be a positive integer between 1 and 100".to_string(),
                ))
            }
        },
    };

    let min_price = match supplied(&query.min_price) {
        None => None,
        Some(raw) => Some(parse_price(raw).ok_or_else(|| {
            CoreError::Validation("Minimum price must be a positive number".to_string())
        })?),
    };

    let max_price = match supplied(&query.max_price) {
        None => None,
        Some(raw) => Some(parse_price(raw).ok_or_else(|| {
            CoreError::Validation("Maximum price must be a positive number".to_string())
        })?),
    };

    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(CoreError::Validation(
                "Minimum price cannot be greater than maximum price".to_string(),
            ));
        }
    }

    let filter = ProductFilter {
        search: supplied(&query.search).map(str::to_string),
        category: supplied(&query.category).map(str::to_string),
        in_stock: query.in_stock.as_deref().map(|v| v == "true"),
        min_price,
        max_price,
    };

    Ok((filter, PageRequest { page, limit }))
}

/// 搜索词必填且不能为空
pub fn validate_search_term(q: Option<&str>) -> Result<&str, CoreError> {
    q.filter(|q| !q.is_empty()).ok_or_else(|| {
        CoreError::Validation("Search query is required. Use ?q=searchTerm".to_string())
    })
}
