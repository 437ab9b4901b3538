// SPDX-License-Identifier: Apache-2.0

use bazaar_server::{build_router, AppState, StoreIdentity, ANTI_FORGERY_HEADER};
use bazaar_store::Store;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

struct App {
    _dir: TempDir,
    addr: SocketAddr,
    store: Arc<Store>,
}

async fn spawn_app() -> App {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(dir.path().join("bazaar.sqlite")).expect("open store");
    let identity = Arc::new(StoreIdentity::new(store.clone()));
    let app = build_router(AppState::new(store.clone(), identity));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    App {
        _dir: dir,
        addr,
        store,
    }
}

async fn send(addr: SocketAddr, request: String) -> (String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("response head/body split");
    let status_line = head.lines().next().unwrap_or_default().to_string();
    (status_line, body.to_string())
}

async fn get(addr: SocketAddr, path: &str, token: &str) -> (String, String) {
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: {addr}\r\nx-bazaar-token: {token}\r\nConnection: close\r\n\r\n"
    );
    send(addr, request).await
}

async fn post_json(
    addr: SocketAddr,
    path: &str,
    token: &str,
    anti_forgery: &str,
    body: &str,
) -> (String, String) {
    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\nx-bazaar-token: {token}\r\n{ANTI_FORGERY_HEADER}: {anti_forgery}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    send(addr, request).await
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

#[tokio::test]
async fn cart_to_checkout_flow_moves_the_order_from_cart_to_index() {
    let app = spawn_app().await;
    let alice = app
        .store
        .insert_user("alice".into(), "Alice".into(), "tok-alice".into())
        .await
        .expect("insert user");
    let coffee = app
        .store
        .insert_product("coffee beans".into(), 1250)
        .await
        .expect("insert product");
    let kettle = app
        .store
        .insert_product("kettle".into(), 4900)
        .await
        .expect("insert product");
    let visa = app
        .store
        .insert_payment_type(alice, "visa".into(), "4242".into())
        .await
        .expect("insert payment type");

    // Add the first product: a cart comes into being.
    let (status, _) = get(
        app.addr,
        &format!("/orders/add/{}", coffee.as_i64()),
        "tok-alice",
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 303"), "got {status}");

    let (status, body) = get(app.addr, "/orders/cart", "tok-alice").await;
    assert!(status.starts_with("HTTP/1.1 200"), "got {status}");
    let cart = json(&body);
    assert_eq!(cart["cart"]["items"].as_array().expect("items").len(), 1);
    let order_id = cart["cart"]["order"]["id"].as_i64().expect("order id");

    // Add the second product: same open order, now two line items.
    let (status, _) = get(
        app.addr,
        &format!("/orders/add/{}", kettle.as_i64()),
        "tok-alice",
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 303"), "got {status}");

    let (_, body) = get(app.addr, "/orders/cart", "tok-alice").await;
    let cart = json(&body);
    assert_eq!(cart["cart"]["order"]["id"].as_i64(), Some(order_id));
    let items = cart["cart"]["items"].as_array().expect("items").clone();
    assert_eq!(items.len(), 2);
    let coffee_item = items
        .iter()
        .find(|i| i["product"]["id"].as_i64() == Some(coffee.as_i64()))
        .expect("coffee line item")["id"]
        .as_i64()
        .expect("item id");

    // Remove the first product's line item.
    let (status, _) = get(
        app.addr,
        &format!("/orders/remove/{coffee_item}"),
        "tok-alice",
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 303"), "got {status}");

    let (_, body) = get(app.addr, "/orders/cart", "tok-alice").await;
    let cart = json(&body);
    let items = cart["cart"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0]["product"]["id"].as_i64(),
        Some(kettle.as_i64())
    );

    // Checkout through the edit form.
    let (status, body) = get(app.addr, &format!("/orders/{order_id}/edit"), "tok-alice").await;
    assert!(status.starts_with("HTTP/1.1 200"), "got {status}");
    let form_view = json(&body);
    let anti_forgery = form_view["anti_forgery_token"]
        .as_str()
        .expect("anti-forgery token")
        .to_string();
    let row_version = form_view["order"]["row_version"]
        .as_i64()
        .expect("row version");
    assert!(form_view["payment_options"]
        .as_array()
        .expect("payment options")
        .iter()
        .any(|p| p["id"].as_i64() == Some(visa.as_i64())));

    let submit = serde_json::json!({
        "id": order_id,
        "payment_type_id": visa.as_i64(),
        "row_version": row_version,
    })
    .to_string();
    let (status, body) = post_json(
        app.addr,
        &format!("/orders/{order_id}/edit"),
        "tok-alice",
        &anti_forgery,
        &submit,
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 303"), "got {status}: {body}");
    assert!(body.contains("/orders/confirm"));

    // The order left the cart view and shows up completed in the index.
    let (_, body) = get(app.addr, "/orders/cart", "tok-alice").await;
    assert!(json(&body)["cart"].is_null());

    let (status, body) = get(app.addr, "/orders", "tok-alice").await;
    assert!(status.starts_with("HTTP/1.1 200"), "got {status}");
    let index = json(&body);
    let orders = index["orders"].as_array().expect("orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order"]["id"].as_i64(), Some(order_id));
    assert!(orders[0]["order"]["completed_at"].as_i64().is_some());
    assert_eq!(
        orders[0]["payment"]["id"].as_i64(),
        Some(visa.as_i64())
    );
}

#[tokio::test]
async fn confirmation_view_is_static_and_unauthenticated() {
    let app = spawn_app().await;
    let request = format!(
        "GET /orders/confirm HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        app.addr
    );
    let (status, body) = send(app.addr, request).await;
    assert!(status.starts_with("HTTP/1.1 200"), "got {status}");
    assert_eq!(json(&body)["view"], "order_confirm");
}

#[tokio::test]
async fn stale_checkout_after_concurrent_completion_is_not_found() {
    let app = spawn_app().await;
    let alice = app
        .store
        .insert_user("alice".into(), "Alice".into(), "tok-alice".into())
        .await
        .expect("insert user");
    let coffee = app
        .store
        .insert_product("coffee beans".into(), 1250)
        .await
        .expect("insert product");
    let visa = app
        .store
        .insert_payment_type(alice, "visa".into(), "4242".into())
        .await
        .expect("insert payment type");
    let order = app
        .store
        .add_to_cart(alice, coffee, 1_754_000_000)
        .await
        .expect("seed cart");

    // A concurrent writer bumps the version before the form comes back.
    let (_, body) = get(
        app.addr,
        &format!("/orders/{}/edit", order.as_i64()),
        "tok-alice",
    )
    .await;
    let form_view = json(&body);
    let anti_forgery = form_view["anti_forgery_token"]
        .as_str()
        .expect("token")
        .to_string();
    let stale_version = form_view["order"]["row_version"]
        .as_i64()
        .expect("version");
    app.store
        .checkout_order(order, alice, visa, stale_version, 1_754_000_100)
        .await
        .expect("concurrent checkout");

    // The order is now completed, so the stale submission dies on the
    // open-state precondition with not-found, as the contract demands.
    let submit = serde_json::json!({
        "id": order.as_i64(),
        "payment_type_id": visa.as_i64(),
        "row_version": stale_version,
    })
    .to_string();
    let (status, _) = post_json(
        app.addr,
        &format!("/orders/{}/edit", order.as_i64()),
        "tok-alice",
        &anti_forgery,
        &submit,
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 404"), "got {status}");
}

#[tokio::test]
async fn edit_submission_without_payment_type_redisplays_the_form() {
    let app = spawn_app().await;
    let alice = app
        .store
        .insert_user("alice".into(), "Alice".into(), "tok-alice".into())
        .await
        .expect("insert user");
    let coffee = app
        .store
        .insert_product("coffee beans".into(), 1250)
        .await
        .expect("insert product");
    let order = app
        .store
        .add_to_cart(alice, coffee, 1_754_000_000)
        .await
        .expect("seed cart");

    let (_, body) = get(
        app.addr,
        &format!("/orders/{}/edit", order.as_i64()),
        "tok-alice",
    )
    .await;
    let form_view = json(&body);
    let anti_forgery = form_view["anti_forgery_token"]
        .as_str()
        .expect("token")
        .to_string();

    let submit = serde_json::json!({
        "id": order.as_i64(),
        "row_version": 0,
    })
    .to_string();
    let (status, body) = post_json(
        app.addr,
        &format!("/orders/{}/edit", order.as_i64()),
        "tok-alice",
        &anti_forgery,
        &submit,
    )
    .await;
    assert!(status.starts_with("HTTP/1.1 422"), "got {status}");
    let err = json(&body);
    assert_eq!(err["code"], "validation_failed");
    assert_eq!(
        err["details"]["field_errors"][0]["parameter"],
        "payment_type_id"
    );
    assert_eq!(err["details"]["form"]["id"].as_i64(), Some(order.as_i64()));

    // Nothing was persisted: the order is still an open cart.
    let (_, body) = get(app.addr, "/orders/cart", "tok-alice").await;
    assert_eq!(
        json(&body)["cart"]["order"]["id"].as_i64(),
        Some(order.as_i64())
    );
}
