//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use clementine_core::{ApiMessage, ProductId};

use crate::db::products::{NewProduct, ProductRepository};
use crate::db::ReserveOutcome;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::state::AppState;

/// Body accepted by product create/update.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl ProductPayload {
    fn validate(self) -> Result<NewProduct> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Price must be non-negative".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest(
                "Stock must be non-negative".to_string(),
            ));
        }

        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
        })
    }
}

/// Query parameters for stock reservation.
#[derive(Debug, Deserialize)]
pub struct ReserveParams {
    /// Quantity to reserve; negative values are rejected at deserialization.
    pub qty: u32,
}

/// `GET /api/products`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// `POST /api/admin/products`
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    let new = payload.validate()?;
    let product = ProductRepository::new(state.pool()).create(&new).await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products/{id}`
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let new = payload.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &new)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/products/{id}/reserve?qty=N`
///
/// The one write exposed to other services: check-then-decrement inside a
/// row-locking transaction. 409 means insufficient stock and guarantees
/// nothing was changed.
pub async fn reserve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ReserveParams>,
) -> Result<Json<ApiMessage>> {
    let quantity = i32::try_from(params.qty)
        .map_err(|_| AppError::BadRequest("Quantity out of range".to_string()))?;

    let outcome = ProductRepository::new(state.pool())
        .reserve(ProductId::new(id), quantity)
        .await?;

    match outcome {
        ReserveOutcome::Reserved => Ok(Json(ApiMessage::ok())),
        ReserveOutcome::InsufficientStock => {
            Err(AppError::Conflict("Not enough stock".to_string()))
        }
        ReserveOutcome::NotFound => Err(AppError::NotFound("Product not found".to_string())),
    }
}
