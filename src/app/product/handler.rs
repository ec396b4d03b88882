//! 商品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use super::model::{ListQuery, Product, ProductPayload, ProductStats, SearchQuery};
use super::query::Pagination;
use super::validation;
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ApiResponse, ListResponse, SearchResponse};

type HandlerResult<T> = Result<Json<T>, CoreError>;

fn not_found() -> CoreError {
    CoreError::NotFound("Product not found".to_string())
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HandlerResult<ListResponse<Product, Pagination>> {
    let Query(query) = query?;
    let (filter, page) = validation::validate_list_query(&query)?;

    let result = state.product_service.list_products(&filter, page);
    Ok(Json(ListResponse::new(result.products, result.pagination)))
}

pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> HandlerResult<SearchResponse<Product>> {
    let Query(query) = query?;
    let term = validation::validate_search_term(query.q.as_deref())?;

    let results = state.product_service.search_products(term);
    Ok(Json(SearchResponse::new(term.to_string(), results)))
}

pub async fn product_stats(State(state): State<AppState>) -> Json<ApiResponse<ProductStats>> {
    Json(ApiResponse::success(state.product_service.product_stats()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<ApiResponse<Product>> {
    let product = state.product_service.get_product(&id).ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let Json(payload) = payload?;
    let data = validation::validate_new(&payload)?;

    let product = state.product_service.create_product(data);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            product,
            "Product created successfully",
        )),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> HandlerResult<ApiResponse<Product>> {
    let Json(payload) = payload?;
    let patch = validation::validate_patch(&payload)?;

    let product = state
        .product_service
        .update_product(&id, patch)
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::with_message(
        product,
        "Product updated successfully",
    )))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<ApiResponse<Product>> {
    let product = state
        .product_service
        .delete_product(&id)
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::with_message(
        product,
        "Product deleted successfully",
    )))
}
