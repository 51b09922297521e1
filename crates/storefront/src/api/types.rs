//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use vitrine_core::{
    Address, Cart, CartTotals, Email, Price, ProductId, UserProfile, VariantId,
};

/// Successful login or registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: UserProfile,
    /// Bearer token for user-scoped calls, when the backend issues one.
    #[serde(default)]
    pub token: Option<String>,
}

/// A new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: secrecy::SecretString,
}

/// Order creation payload sent to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// One cart line as submitted with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    /// Unit price before the product discount.
    pub price: Price,
    pub quantity: u32,
}

impl OrderRequest {
    /// Build an order from the cart and its derived totals.
    #[must_use]
    pub fn from_cart(cart: &Cart, totals: &CartTotals) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product.id.clone(),
                    product_name: item.product.name.clone(),
                    variant_id: item.selected_variant.as_ref().map(|v| v.id.clone()),
                    price: item.product.price,
                    quantity: item.quantity,
                })
                .collect(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            shipping: totals.shipping,
            tax: totals.tax,
            total: totals.total,
            shipping_address: None,
            billing_address: None,
            payment_method: None,
        }
    }
}

/// Credentials body for `POST /auth/login`.
#[derive(Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration body for `POST /auth/register`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for `POST /user/wishlist`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistBody<'a> {
    pub product_id: &'a ProductId,
}

/// Body for `PATCH /user/notifications/{id}`.
#[derive(Serialize)]
pub(crate) struct ReadBody {
    pub read: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::{CartPolicy, Product};

    use super::*;

    fn product(id: &str, price: i64, discount: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Name {id}"),
            "slug": id,
            "price": price,
            "discount": discount,
            "stock": 10,
            "categoryId": "category-1",
            "category": { "id": "category-1", "name": "Category 1", "slug": "category-1" },
            "variants": [{ "id": "v-red", "name": "Color", "value": "Red" }],
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_order_request_from_cart() {
        let mut cart = Cart::new();
        cart.add(product("p1", 20, 10), 2, Some(&VariantId::new("v-red")))
            .unwrap();
        cart.add(product("p2", 5, 0), 1, None).unwrap();
        let totals = cart.totals(&CartPolicy::default());

        let request = OrderRequest::from_cart(&cart, &totals);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.total, totals.total);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["variantId"], "v-red");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert!(json["items"][1].get("variantId").is_none());
        assert!(json.get("shippingAddress").is_none());
    }

    #[test]
    fn test_auth_session_token_optional() {
        let session: AuthSession = serde_json::from_value(serde_json::json!({
            "user": {
                "id": "user-1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "createdAt": "2026-01-01T00:00:00Z"
            }
        }))
        .unwrap();
        assert!(session.token.is_none());
        assert_eq!(session.user.display_name(), "Ada Lovelace");
    }
}
