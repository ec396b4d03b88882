//! 商品统计

use std::collections::BTreeMap;

use super::model::{PriceStats, Product, ProductStats};

pub fn compute(records: &[Product]) -> ProductStats {
    let total_products = records.len();
    let in_stock_products = records.iter().filter(|p| p.in_stock).count();

    let mut category_breakdown = BTreeMap::new();
    for product in records {
        *category_breakdown
            .entry(product.category.clone())
            .or_insert(0) += 1;
    }

    ProductStats {
        total_products,
        in_stock_products,
        out_of_stock_products: total_products - in_stock_products,
        category_breakdown,
        price_statistics: price_stats(records),
    }
}

fn price_stats(records: &[Product]) -> PriceStats {
    if records.is_empty() {
        return PriceStats::default();
    }

    // 逐项除以数量再累加，接近 f64::MAX 的价格也不会溢出
    let count = records.len() as f64;
    let (min, max, average) = records.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, avg), p| (min.min(p.price), max.max(p.price), avg + p.price / count),
    );

    PriceStats {
        min: round2(min),
        max: round2(max),
        average: round2(average),
    }
}

fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}
