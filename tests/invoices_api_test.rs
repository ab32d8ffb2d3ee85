mod common;

use axum::http::{Method, StatusCode};
use chrono::{NaiveDate, Utc};
use common::{response_json, TestApp};
use serde_json::json;

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn lists_invoices_as_id_and_company_code() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/invoices", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "comp_code": "apple"},
            {"id": 2, "comp_code": "apple"},
            {"id": 3, "comp_code": "ibm"}
        ])
    );
}

#[tokio::test]
async fn empty_invoice_table_lists_as_empty_array() {
    let app = TestApp::empty().await;

    let (status, body) = app.send(Method::GET, "/invoices", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn get_invoice_embeds_its_company() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/invoices/2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "invoice": {
                "id": 2,
                "company": {"code": "apple", "name": "Apple", "description": "Maker of OSX."},
                "amt": 200.0,
                "paid": true,
                "add_date": "2018-02-01",
                "paid_date": "2018-02-02"
            }
        })
    );
}

#[tokio::test]
async fn unknown_invoice_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/invoices/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "Invoice 999 does not exist");
}

#[tokio::test]
async fn created_invoice_is_unpaid_and_dated_today() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/invoices",
            Some(json!({"comp_code": "ibm", "amt": 450.5})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": 4,
            "comp_code": "ibm",
            "amt": 450.5,
            "paid": false,
            "add_date": today(),
            "paid_date": null
        }])
    );

    let (status, body) = app.send(Method::GET, "/invoices/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["amt"], 450.5);
    assert_eq!(body["invoice"]["company"]["code"], "ibm");
}

#[tokio::test]
async fn invoice_for_unknown_company_is_server_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/invoices",
            Some(json!({"comp_code": "nope", "amt": 10.0})),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "foreign_key_violation");
}

#[tokio::test]
async fn invoice_with_wrong_amount_type_is_server_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/invoices",
            Some(json!({"comp_code": "apple", "amt": "lots"})),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn paying_an_unpaid_invoice_stamps_today() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/1",
            Some(json!({"amt": 150.0, "paid": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "invoice": {
                "id": 1,
                "comp_code": "apple",
                "amt": 150.0,
                "paid": true,
                "add_date": "2018-01-01",
                "paid_date": today()
            }
        })
    );
}

#[tokio::test]
async fn paying_twice_keeps_first_date() {
    let app = TestApp::new().await;

    // Invoice 2 was paid on 2018-02-02
    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/2",
            Some(json!({"amt": 250.0, "paid": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["paid_date"], "2018-02-02");
    assert_eq!(body["invoice"]["amt"], 250.0);

    let row = app.invoice_row(2).await.expect("invoice 2");
    assert_eq!(row.paid_date, NaiveDate::from_ymd_opt(2018, 2, 2));
}

#[tokio::test]
async fn unpaying_an_unpaid_invoice_keeps_date_null() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/1",
            Some(json!({"amt": 5000.0, "paid": false})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["paid"], false);
    assert_eq!(body["invoice"]["paid_date"], json!(null));
    assert_eq!(body["invoice"]["amt"], 5000.0);
}

#[tokio::test]
async fn unpaying_a_paid_invoice_clears_date() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/2",
            Some(json!({"amt": 200.0, "paid": false})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["paid"], false);
    assert_eq!(body["invoice"]["paid_date"], json!(null));

    let row = app.invoice_row(2).await.expect("invoice 2");
    assert_eq!(row.paid_date, None);
}

#[tokio::test]
async fn pay_then_unpay_then_pay_restamps() {
    let app = TestApp::new().await;

    app.send(
        Method::PUT,
        "/invoices/2",
        Some(json!({"amt": 200.0, "paid": false})),
    )
    .await;
    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/2",
            Some(json!({"amt": 200.0, "paid": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["paid_date"], today());
}

#[tokio::test]
async fn update_unknown_invoice_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/999",
            Some(json!({"amt": 1.0, "paid": true})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn update_with_missing_field_is_server_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::PUT, "/invoices/1", Some(json!({"amt": 1.0})))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "invalid_input");

    let row = app.invoice_row(1).await.expect("invoice 1");
    assert_eq!(row.amt, 100.0);
}

#[tokio::test]
async fn delete_invoice_then_get_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::DELETE, "/invoices/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    let (status, _) = app.send(Method::GET, "/invoices/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, "/invoices/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn end_to_end_company_and_invoice_lifecycle() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/companies/apple", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &body["company"]["invoices"][0];
    assert_eq!(first["paid"], false);
    assert_eq!(first["paid_date"], json!(null));

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/1",
            Some(json!({"amt": 5000, "paid": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["paid_date"], json!(null));

    let (status, _) = app.send(Method::DELETE, "/companies/apple", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/companies/apple", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::GET, "/invoices/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paying_an_unpaid_invoice_twice_keeps_first_stamp() {
    let app = TestApp::new().await;

    let (status, first) = app
        .send(
            Method::PUT,
            "/invoices/1",
            Some(json!({"amt": 100.0, "paid": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["invoice"]["paid_date"], today());

    let (status, second) = app
        .send(
            Method::PUT,
            "/invoices/1",
            Some(json!({"amt": 120.0, "paid": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["invoice"]["paid_date"], first["invoice"]["paid_date"]);
    assert_eq!(second["invoice"]["amt"], 120.0);
}

#[tokio::test]
async fn non_numeric_invoice_id_is_json_not_found() {
    let app = TestApp::new().await;

    for uri in ["/invoices/abc", "/invoices/99999999999"] {
        let response = app
            .request_with_headers(Method::GET, uri, None, &[("x-request-id", "bad-id-1")])
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let body = response_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["request_id"], "bad-id-1");
    }
}

#[tokio::test]
async fn non_numeric_invoice_id_on_update_and_delete_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/invoices/abc",
            Some(json!({"amt": 1.0, "paid": true})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, body) = app.send(Method::DELETE, "/invoices/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}
