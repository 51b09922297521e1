//! Cart route handlers.
//!
//! The cart lives in the client's session. Every mutation loads it, applies
//! the change through [`vitrine_core::Cart`] and writes it back, then answers
//! with the full cart view so the client never has to recompute totals.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::{
    Address, Cart, CartItem, CartPolicy, CartTotals, OrderId, Price, ProductId, Variant,
    VariantId,
};

use crate::api::OrderRequest;
use crate::client_state::{load_cart, save_cart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    /// Stable line key (`product` or `product:variant`).
    pub key: String,
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
    pub variant: Option<Variant>,
    pub quantity: u32,
    pub stock: u32,
    pub unit_price: Price,
    pub sale_price: Price,
    pub line_total: Price,
    /// Formatted unit price, e.g. `$49.99`.
    pub price: String,
    /// Formatted line total before discount.
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let line_total = item.line_subtotal();
        Self {
            key: item.key(),
            product_id: item.product.id.clone(),
            slug: item.product.slug.clone(),
            name: item.product.name.clone(),
            image: item.product.primary_image().map(String::from),
            variant: item.selected_variant.clone(),
            quantity: item.quantity,
            stock: item.product.stock,
            unit_price: item.product.price,
            sale_price: item.product.sale_price().round_cents(),
            line_total,
            price: item.product.price.display(),
            line_price: line_total.display(),
        }
    }
}

/// Cart display data with derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: CartTotals,
    pub display: TotalsDisplay,
    /// How much more to spend for free shipping; `None` once it applies.
    pub free_shipping_remaining: Option<Price>,
}

/// Formatted cart totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    pub subtotal: String,
    pub discount: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Build the view of `cart` under `policy`.
    #[must_use]
    pub fn new(cart: &Cart, policy: &CartPolicy) -> Self {
        let totals = cart.totals(policy);
        let free_shipping_remaining = (!cart.is_empty()
            && totals.subtotal <= policy.free_shipping_threshold)
            .then(|| policy.free_shipping_threshold - totals.subtotal);

        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: totals.item_count,
            display: TotalsDisplay {
                subtotal: totals.subtotal.display(),
                discount: totals.discount.display(),
                shipping: if totals.shipping.is_zero() {
                    "Free".to_string()
                } else {
                    totals.shipping.display()
                },
                tax: totals.tax.display(),
                total: totals.total.display(),
            },
            totals,
            free_shipping_remaining,
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// Product slug, as used in catalogue URLs.
    pub slug: String,
    pub quantity: Option<u32>,
    pub variant_id: Option<VariantId>,
}

/// Update cart line request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

/// Remove cart line request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
}

/// Checkout request. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub payment_method: Option<String>,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Order placed from the cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub order_number: String,
    pub total: Price,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::new(&cart, state.cart_policy()))
}

/// Add a product to the cart.
///
/// The product is re-read from the catalogue so the stored snapshot has
/// current price and stock.
#[instrument(skip(state, session), fields(slug = %request.slug))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .api()
        .product_by_slug(&request.slug)
        .await
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
    let product_id = product.id.clone();

    let mut cart = load_cart(&session).await;
    let quantity = cart.add(
        product,
        request.quantity.unwrap_or(1),
        request.variant_id.as_ref(),
    )?;
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::debug!(product_id = %product_id, quantity, "Cart line updated");

    Ok(Json(CartView::new(&cart, state.cart_policy())))
}

/// Set a line's quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(
        &request.product_id,
        request.quantity,
        request.variant_id.as_ref(),
    )?;
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::new(&cart, state.cart_policy())))
}

/// Remove a line. Removing a line that is not there is not an error.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    if cart.remove(&request.product_id, request.variant_id.as_ref()) {
        save_cart(&session, &cart).await?;
    }

    Ok(Json(CartView::new(&cart, state.cart_policy())))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = Cart::new();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, state.cart_policy())))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = load_cart(&session).await;
    Json(CartCount {
        count: cart.item_count(),
    })
}

/// Place an order for the cart's contents and empty the cart.
///
/// Guests may check out; a signed-in user's token is forwarded.
#[instrument(skip(state, session, user, request))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    request: Option<Json<CheckoutRequest>>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let Json(details) = request.unwrap_or_default();
    let totals = cart.totals(state.cart_policy());
    let order = OrderRequest {
        shipping_address: details.shipping_address,
        billing_address: details.billing_address,
        payment_method: details.payment_method,
        ..OrderRequest::from_cart(&cart, &totals)
    };

    let token = user.as_ref().and_then(|u| u.token());
    let confirmation = state.api().create_order(token.as_ref(), &order).await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(
        order_id = %confirmation.order_id,
        order_number = %confirmation.order_number,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: confirmation.order_id,
            order_number: confirmation.order_number,
            total: totals.total,
        }),
    )
        .into_response())
}
