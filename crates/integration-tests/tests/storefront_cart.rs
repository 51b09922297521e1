//! Cart, wishlist and checkout flows through the session layer.

use reqwest::StatusCode;
use serde_json::{Value, json};
use vitrine_integration_tests::{TestServer, Visitor};

async fn cart_count(visitor: &Visitor) -> u64 {
    let (status, body) = visitor.get("/cart/count").await;
    assert_eq!(status, StatusCode::OK);
    body["count"].as_u64().expect("count")
}

fn line<'a>(cart: &'a Value, product_id: &str) -> Option<&'a Value> {
    cart["items"]
        .as_array()?
        .iter()
        .find(|item| item["productId"] == product_id)
}

#[tokio::test]
async fn test_cart_add_update_remove() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    let (status, cart) = visitor
        .post("/cart/add", &json!({ "slug": "arc-floor-lamp", "quantity": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], 2);
    assert_eq!(line(&cart, "prod-arc-lamp").map(|l| &l["quantity"]), Some(&json!(2)));
    assert_eq!(cart_count(&visitor).await, 2);

    let (_, cart) = visitor.post("/cart/add", &json!({ "slug": "stoneware-mug" })).await;
    assert_eq!(cart["itemCount"], 3);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));

    let (status, cart) = visitor
        .post(
            "/cart/update",
            &json!({ "productId": "prod-arc-lamp", "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], 2);

    let (status, cart) = visitor
        .post("/cart/remove", &json!({ "productId": "prod-arc-lamp" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(line(&cart, "prod-arc-lamp").is_none());

    // Removing again is not an error.
    let (status, _) = visitor
        .post("/cart/remove", &json!({ "productId": "prod-arc-lamp" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart_count(&visitor).await, 1);

    let (status, cart) = visitor.post_empty("/cart/clear").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], 0);
    assert_eq!(cart_count(&visitor).await, 0);
}

#[tokio::test]
async fn test_cart_stock_rules() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    let (status, body) = visitor.post("/cart/add", &json!({ "slug": "walnut-stool" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, cart) = visitor
        .post("/cart/add", &json!({ "slug": "oak-lounge-chair", "quantity": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(line(&cart, "prod-oak-chair").map(|l| &l["quantity"]), Some(&json!(2)));

    let (status, _) = visitor
        .post("/cart/add", &json!({ "slug": "wool-throw", "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = visitor.post("/cart/add", &json!({ "slug": "missing" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_cart_variants_are_separate_lines() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    visitor
        .post(
            "/cart/add",
            &json!({ "slug": "oak-lounge-chair", "variantId": "var-oak-natural" }),
        )
        .await;
    let (_, cart) = visitor
        .post(
            "/cart/add",
            &json!({ "slug": "oak-lounge-chair", "variantId": "var-oak-smoked" }),
        )
        .await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(cart["itemCount"], 2);

    let (status, _) = visitor
        .post(
            "/cart/add",
            &json!({ "slug": "oak-lounge-chair", "variantId": "var-missing" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_free_shipping_display() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    let (_, cart) = visitor.post("/cart/add", &json!({ "slug": "stoneware-mug" })).await;
    assert_ne!(cart["display"]["shipping"], "Free");
    assert!(cart["freeShippingRemaining"].is_string());

    let (_, cart) = visitor.post("/cart/add", &json!({ "slug": "arc-floor-lamp" })).await;
    assert_eq!(cart["display"]["shipping"], "Free");
    assert!(cart["freeShippingRemaining"].is_null());
}

#[tokio::test]
async fn test_carts_are_isolated_per_visitor() {
    let server = TestServer::fixtures().await;
    let alice = server.visitor();
    let bob = server.visitor();

    alice
        .post("/cart/add", &json!({ "slug": "wool-throw", "quantity": 3 }))
        .await;

    assert_eq!(cart_count(&alice).await, 3);
    assert_eq!(cart_count(&bob).await, 0);
}

#[tokio::test]
async fn test_checkout() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    let (status, body) = visitor.post_empty("/checkout").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");

    visitor
        .post("/cart/add", &json!({ "slug": "wool-throw", "quantity": 2 }))
        .await;
    let (_, cart) = visitor.get("/cart").await;

    let (status, body) = visitor
        .post("/checkout", &json!({ "paymentMethod": "card" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(
        body["orderNumber"]
            .as_str()
            .is_some_and(|n| n.starts_with("ORD-"))
    );
    assert_eq!(body["total"], cart["totals"]["total"]);
    assert_eq!(cart_count(&visitor).await, 0);
}

#[tokio::test]
async fn test_wishlist() {
    let server = TestServer::fixtures().await;
    let visitor = server.visitor();

    let (status, body) = visitor.post("/wishlist/toggle", &json!({ "slug": "wool-throw" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "saved": true, "count": 1 }));

    let (_, detail) = visitor.get("/products/wool-throw").await;
    assert_eq!(detail["inWishlist"], true);

    let (_, body) = visitor.post("/wishlist/toggle", &json!({ "slug": "wool-throw" })).await;
    assert_eq!(body, json!({ "saved": false, "count": 0 }));

    visitor.post("/wishlist/add", &json!({ "slug": "brass-pendant" })).await;
    let (_, body) = visitor.post("/wishlist/add", &json!({ "slug": "brass-pendant" })).await;
    assert_eq!(body, json!({ "saved": true, "count": 1 }));

    let (_, wishlist) = visitor.get("/wishlist").await;
    assert_eq!(wishlist["count"], 1);
    assert_eq!(wishlist["items"][0]["id"], "prod-brass-pendant");

    let (_, body) = visitor
        .post("/wishlist/remove", &json!({ "productId": "prod-brass-pendant" }))
        .await;
    assert_eq!(body, json!({ "saved": false, "count": 0 }));

    let (_, body) = visitor.get("/wishlist/count").await;
    assert_eq!(body["count"], 0);

    let (status, _) = visitor.post("/wishlist/add", &json!({ "slug": "missing" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
