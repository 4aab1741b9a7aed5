//! Postings driven through the router against a migrated database.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use super::build_app;
use crate::error::AppError;
use crate::state::AppState;

struct Shop {
    app: Router,
    partner_id: i64,
    item_id: i64,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create(app: &Router, uri: &str, body: Value, key: &str) -> i64 {
    let (status, created) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {created}");
    created[key]["id"].as_i64().unwrap()
}

/// One partner and one item taxed at 20%.
async fn shop(pool: PgPool) -> Shop {
    let app = build_app(AppState::new(pool));
    let partner_id = create(
        &app,
        "/partners",
        json!({ "partner_name": "Acme", "partner_address": "Main St 1" }),
        "partner",
    )
    .await;
    let unit_id = create(
        &app,
        "/units_of_measure",
        json!({ "unit_acronym": "pcs", "unit_name": "pieces" }),
        "unit_of_measure",
    )
    .await;
    let vat_rate_id = create(&app, "/vat_rates", json!({ "vat_rate": 20 }), "vat_rate").await;
    let item_id = create(
        &app,
        "/items",
        json!({
            "item_code": "A-1",
            "item_description": "Widget",
            "unit_id": unit_id,
            "vat_rate_id": vat_rate_id,
        }),
        "item",
    )
    .await;
    Shop { app, partner_id, item_id }
}

impl Shop {
    async fn purchase(&self, bill_date: &str, quantity: f64, price: f64) {
        let bill_id = create(
            &self.app,
            "/bills",
            json!({
                "bill_number": format!("B-{bill_date}-{quantity}"),
                "bill_date": bill_date,
                "bill_due_date": bill_date,
                "bill_amount": quantity * price,
                "partner_id": self.partner_id,
            }),
            "bill",
        )
        .await;
        create(
            &self.app,
            "/bill_records",
            json!({ "item_id": self.item_id, "bill_id": bill_id, "quantity": quantity, "price": price }),
            "bill_record",
        )
        .await;
    }

    async fn invoice(&self, invoice_date: &str) -> i64 {
        create(
            &self.app,
            "/invoices",
            json!({
                "invoice_date": invoice_date,
                "invoice_due_date": invoice_date,
                "partner_id": self.partner_id,
            }),
            "invoice",
        )
        .await
    }

    async fn sell(&self, invoice_id: i64, quantity: f64, selling_price: f64) -> (StatusCode, Value) {
        send(
            &self.app,
            Method::POST,
            "/invoice_records",
            Some(json!({
                "item_id": self.item_id,
                "invoice_id": invoice_id,
                "quantity": quantity,
                "selling_price": selling_price,
                "vat_included": 0,
            })),
        )
        .await
    }

    async fn item(&self) -> Value {
        let (status, body) = send(&self.app, Method::GET, &format!("/items/{}", self.item_id), None).await;
        assert_eq!(status, StatusCode::OK);
        body["item"].clone()
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn item_never_purchased_is_out_of_stock(pool: PgPool) {
    let shop = shop(pool).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, body) = shop.sell(invoice_id, 1.0, 150.0).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "You have no quantity on stock. Cannot continue until you have quantity."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn purchase_dated_after_the_invoice_is_not_on_stock(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("20.01.2024", 10.0, 100.0).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, body) = shop.sell(invoice_id, 1.0, 150.0).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "You don't have enough quantity on stock. Maximum quantity allowed: 0"
    );
    assert_eq!(shop.item().await["quantity_on_hand"], 10.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn purchase_on_the_invoice_date_is_on_stock(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("10.01.2024", 10.0, 100.0).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, body) = shop.sell(invoice_id, 10.0, 150.0).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["item"]["quantity_on_hand"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn overselling_reports_the_maximum_and_writes_nothing(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("01.01.2024", 10.0, 100.0).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, body) = shop.sell(invoice_id, 20.0, 150.0).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "You don't have enough quantity on stock. Maximum quantity allowed: 10"
    );
    assert_eq!(shop.item().await["quantity_on_hand"], 10.0);
    let (status, _) = send(&shop.app, Method::GET, "/invoice_records", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn cost_basis_is_taken_as_of_the_invoice_date(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("01.01.2024", 10.0, 100.0).await;
    shop.purchase("20.01.2024", 10.0, 200.0).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, body) = shop.sell(invoice_id, 5.0, 150.0).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    // The later, dearer purchase is not yet on stock.
    assert_eq!(body["invoice_record"]["average_purchase_price"], 100.0);
    assert_eq!(body["item"]["average_purchase_price"], 150.0);
    assert_eq!(body["item"]["quantity_on_hand"], 15.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn two_sales_update_item_averages_and_invoice_totals(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("01.01.2024", 10.0, 100.0).await;
    let invoice_id = shop.invoice("10.01.2024").await;

    let (status, first) = shop.sell(invoice_id, 4.0, 150.0).await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    let record = &first["invoice_record"];
    assert_eq!(record["average_purchase_price"], 100.0);
    assert_eq!(record["net_selling_price"], 150.0);
    assert!((record["gross_selling_price"].as_f64().unwrap() - 180.0).abs() < 1e-9);
    assert_eq!(record["invoice_record_amount_net"], 600.0);

    let (status, second) = shop.sell(invoice_id, 2.0, 120.0).await;
    assert_eq!(status, StatusCode::CREATED, "{second}");

    let item = shop.item().await;
    assert_eq!(item["quantity_on_hand"], 4.0);
    assert_eq!(item["latest_net_selling_price"], 120.0);
    assert_eq!(item["average_net_selling_price"], 140.0);
    assert_eq!(item["average_purchase_price"], 100.0);

    let (status, body) = send(&shop.app, Method::GET, &format!("/invoices/{invoice_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["invoice_amount_net"], 840.0);
    assert_eq!(body["invoice"]["invoice_vat"], 168.0);
    assert_eq!(body["invoice"]["invoice_amount_total"], 1008.0);
    assert_eq!(body["invoice_records"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn backdated_sale_is_checked_only_as_of_its_own_date(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("01.01.2024", 10.0, 100.0).await;
    let march = shop.invoice("01.03.2024").await;
    let february = shop.invoice("01.02.2024").await;

    let (status, body) = shop.sell(march, 10.0, 150.0).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    // Nothing was sold on or before 01.02, so the earlier invoice still sees 10.
    let (status, body) = shop.sell(february, 10.0, 150.0).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    assert_eq!(shop.item().await["quantity_on_hand"], -10.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn stock_query_honours_the_cutoff(pool: PgPool) {
    let shop = shop(pool).await;
    shop.purchase("20.01.2024", 10.0, 100.0).await;
    let uri = |date: &str| format!("/items/{}/stock?date={date}", shop.item_id);

    let (status, before) = send(&shop.app, Method::GET, &uri("10.01.2024"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["stock"]["quantity_on_stock"], 0.0);

    let (_, after) = send(&shop.app, Method::GET, &uri("20.01.2024"), None).await;
    assert_eq!(after["stock"]["quantity_on_stock"], 10.0);
    assert_eq!(after["stock"]["weighted_average_cost"], 100.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn foreign_key_violation_is_a_referential_block(pool: PgPool) {
    let shop = shop(pool.clone()).await;
    shop.invoice("10.01.2024").await;

    let err = sqlx::query("DELETE FROM partners WHERE id = $1")
        .bind(shop.partner_id)
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(matches!(AppError::from(err), AppError::ReferentialBlock(_)));
}
