//! Order route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{OrderId, OrderStatus, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItem};
use crate::services::{CartLine, CheckoutError, CheckoutService};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Cart submission body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// One requested cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: u32,
}

/// Wire shape of a persisted order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
}

/// Wire shape of one order line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            total: order.total,
            status: order.status,
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/orders/checkout`
///
/// Cart-shape validation happens here, before the saga runs; the saga
/// revalidates, so a direct caller of [`CheckoutService`] gets the same
/// answers.
pub async fn checkout(
    RequireAuth(principal): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<OrderResponse>> {
    if req.items.is_empty() {
        return Err(AppError::Checkout(CheckoutError::EmptyCart));
    }
    if req.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::Checkout(CheckoutError::InvalidQuantity));
    }

    let cart: Vec<CartLine> = req
        .items
        .iter()
        .map(|item| CartLine {
            product_id: ProductId::new(item.product_id),
            quantity: item.quantity,
        })
        .collect();

    let service = CheckoutService::new(state.catalog(), state.store());
    let order = service.checkout(&principal, &cart).await?;

    Ok(Json(order.into()))
}

/// `GET /api/orders`
pub async fn list(
    RequireAuth(principal): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>> {
    let service = CheckoutService::new(state.catalog(), state.store());
    let orders = service.list_orders(&principal).await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
