//! End-to-end tests over the in-memory backend. Every test builds its
//! own app from the demo dataset, signs in through the real login
//! endpoint and talks to the router over `oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bdticket_api::state::AuthConfig;
use bdticket_api::{app, worker, AppState};
use bdticket_store::app_config::BusinessRules;
use bdticket_store::MemoryStore;

fn test_state() -> AppState {
    let auth = AuthConfig {
        secret: "test-secret".to_string(),
        expiration: 3600,
    };
    let rules = BusinessRules {
        lock_sweep_seconds: 60,
        rate_limit_per_minute: 120,
    };
    AppState::for_store(Arc::new(MemoryStore::with_demo_data()), None, auth, rules, "memory")
}

fn test_app() -> Router {
    app(test_state())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": username })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

/// Seeded ids are fixed, so tests can address demo rows directly.
fn seeded(n: u128) -> String {
    uuid::Uuid::from_u128(n).to_string()
}

fn booking_body(ticket_id: &str, pax_count: i32, selling_price: i64) -> Value {
    json!({
        "ticket_id": ticket_id,
        "agent": {
            "name": "Dhanmondi Travels",
            "phone": "+8801712000111",
            "email": "sales@dhanmonditravels.com",
        },
        "passenger": {
            "name": "Rahim Uddin",
            "passport_no": "E1122334",
            "phone": "+8801855556666",
            "email": "rahim@example.com",
            "pax_count": pax_count,
        },
        "selling_price": selling_price,
        "payment_type": "full",
        "payment_method": "cash",
    })
}

#[tokio::test]
async fn health_and_login_are_open() {
    let app = test_app();

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");

    let response = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["role"], "admin");

    let response = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");

    let response = send(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "nobody" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();

    let response = send(&app, "GET", "/v1/tickets", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Missing authorization header"
    );

    let response = send(&app, "GET", "/v1/tickets", Some("not-a-jwt"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");
}

#[tokio::test]
async fn buying_price_is_hidden_without_the_permission() {
    let app = test_app();
    let admin = login(&app, "admin").await;
    let staff = login(&app, "staff").await;

    let response = send(&app, "GET", "/v1/tickets", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let tickets = body_json(response).await;
    assert_eq!(tickets.as_array().unwrap().len(), 6);
    assert!(tickets[0].get("buying_price").is_some());

    let response = send(&app, "GET", "/v1/tickets", Some(&staff), None).await;
    let tickets = body_json(response).await;
    for ticket in tickets.as_array().unwrap() {
        assert!(ticket.get("buying_price").is_none());
    }

    let uri = format!("/v1/tickets/{}", seeded(0x3001));
    let response = send(&app, "GET", &uri, Some(&staff), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let ticket = body_json(response).await;
    assert!(ticket.get("buying_price").is_none());
    assert_eq!(ticket["selling_price"], 95_000);
}

#[tokio::test]
async fn booking_flow_holds_seats_and_records_payment() {
    let app = test_app();
    let staff = login(&app, "staff").await;
    let admin = login(&app, "admin").await;

    // QR-639 starts with 15 of 15 seats.
    let ticket_id = seeded(0x3003);
    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&ticket_id, 2, 196_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["reference"], "BK005");
    assert_eq!(body["booking"]["status"], "pending");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let uri = format!("/v1/tickets/{ticket_id}");
    let response = send(&app, "GET", &uri, Some(&admin), None).await;
    let ticket = body_json(response).await;
    assert_eq!(ticket["available_seats"], 13);
    assert_eq!(ticket["status"], "locked");
    assert!(ticket["locked_until"].is_string());

    // The full amount is recorded as the first payment.
    let uri = format!("/v1/payments?booking_id={booking_id}");
    let response = send(&app, "GET", &uri, Some(&staff), None).await;
    let payments = body_json(response).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["amount"], 196_000);
    assert!(payments[0]["transaction_id"]
        .as_str()
        .unwrap()
        .starts_with("TXN-"));
}

#[tokio::test]
async fn confirming_a_booking_commits_the_sale() {
    let app = test_app();
    let manager = login(&app, "manager").await;
    let admin = login(&app, "admin").await;

    // BK001 holds 2 seats of the Emirates batch.
    let uri = format!("/v1/bookings/{}", seeded(0x4001));
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&manager),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "confirmed");

    // Seats stay drawn down, the hold is gone.
    let ticket_uri = format!("/v1/tickets/{}", seeded(0x3002));
    let response = send(&app, "GET", &ticket_uri, Some(&admin), None).await;
    let ticket = body_json(response).await;
    assert_eq!(ticket["available_seats"], 18);
    assert_eq!(ticket["status"], "available");
    assert!(ticket.get("locked_until").is_none() || ticket["locked_until"].is_null());

    // A confirmed sale cannot go back to pending.
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&manager),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_permissions_follow_the_role_matrix() {
    let app = test_app();
    let admin = login(&app, "admin").await;
    let manager = login(&app, "manager").await;
    let staff = login(&app, "staff").await;

    // Admin manages inventory but does not sell.
    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&admin),
        Some(booking_body(&seeded(0x3001), 1, 95_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Partial payment terms are a staff-desk arrangement.
    let mut partial = booking_body(&seeded(0x3006), 1, 61_000);
    partial["payment_type"] = json!("partial");
    partial["partial_amount"] = json!(20_000);
    let response = send(&app, "POST", "/v1/bookings", Some(&manager), Some(partial.clone())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "POST", "/v1/bookings", Some(&staff), Some(partial)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["booking"]["payment_type"], "partial");

    // Staff cannot confirm their own sales.
    let uri = format!("/v1/bookings/{}", seeded(0x4003));
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&staff),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn overbooking_and_bad_quantities_are_rejected() {
    let app = test_app();
    let staff = login(&app, "staff").await;

    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&seeded(0x3001), 99, 95_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&seeded(0x3001), 0, 95_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The Saudia batch is sold out.
    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&seeded(0x3004), 1, 88_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mut blank = booking_body(&seeded(0x3001), 1, 95_000);
    blank["passenger"]["name"] = json!("   ");
    let response = send(&app, "POST", "/v1/bookings", Some(&staff), Some(blank)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing required fields");

    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&uuid::Uuid::new_v4().to_string(), 1, 95_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelling_returns_seats_to_the_batch() {
    let app = test_app();
    let staff = login(&app, "staff").await;
    let admin = login(&app, "admin").await;

    let ticket_id = seeded(0x3006);
    let response = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(&staff),
        Some(booking_body(&ticket_id, 3, 183_000)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking_id = body_json(response).await["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let ticket_uri = format!("/v1/tickets/{ticket_id}");
    let response = send(&app, "GET", &ticket_uri, Some(&admin), None).await;
    assert_eq!(body_json(response).await["available_seats"], 22);

    let uri = format!("/v1/bookings/{booking_id}");
    let response = send(&app, "DELETE", &uri, Some(&staff), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["status"], "cancelled");

    let response = send(&app, "GET", &ticket_uri, Some(&admin), None).await;
    let ticket = body_json(response).await;
    assert_eq!(ticket["available_seats"], 25);
    assert_eq!(ticket["status"], "available");

    // Cancelling twice is an idempotent no-op.
    let response = send(&app, "DELETE", &uri, Some(&staff), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, "GET", &ticket_uri, Some(&admin), None).await;
    assert_eq!(body_json(response).await["available_seats"], 25);
}

#[tokio::test]
async fn bulk_intake_expands_into_single_seat_tickets() {
    let app = test_app();
    let admin = login(&app, "admin").await;
    let staff = login(&app, "staff").await;

    let intake = json!({
        "airline_id": seeded(0x2001),
        "country_id": seeded(0x1001),
        "flight_number": "BG-247",
        "origin": "DAC",
        "destination": "JED",
        "departure_date": "2026-10-12",
        "departure_time": "04:15",
        "buying_price": 84_000,
        "selling_price": 93_000,
        "quantity": 3,
        "batch_number": "BATCH-2026-101",
    });

    let response = send(&app, "POST", "/v1/tickets/bulk", Some(&staff), Some(intake.clone())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "POST", "/v1/tickets/bulk", Some(&admin), Some(intake)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["count"], 3);
    for ticket in body["tickets"].as_array().unwrap() {
        assert_eq!(ticket["total_seats"], 1);
        assert_eq!(ticket["available_seats"], 1);
        assert_eq!(ticket["batch_number"], "BATCH-2026-101");
    }

    let response = send(&app, "GET", "/v1/tickets", Some(&admin), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn deleting_a_batch_with_active_bookings_is_refused() {
    let app = test_app();
    let admin = login(&app, "admin").await;

    // BK001 is still pending against the Emirates batch.
    let uri = format!("/v1/tickets/{}", seeded(0x3002));
    let response = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Ticket has active bookings");

    // The Biman batch has no bookings at all.
    let uri = format!("/v1/tickets/{}", seeded(0x3001));
    let response = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/v1/tickets/{}", uuid::Uuid::new_v4());
    let response = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_cover_sales_inventory_and_profit() {
    let app = test_app();
    let admin = login(&app, "admin").await;
    let manager = login(&app, "manager").await;

    // One confirmed sale in the demo data: BK002 at 88,000.
    let response = send(&app, "GET", "/v1/reports?type=sales", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"].as_array().unwrap().len(), 1);
    assert_eq!(report["summary"]["total_revenue"], 88_000);
    assert_eq!(report["summary"]["total_profit"], 10_000);

    let response = send(&app, "GET", "/v1/reports?type=inventory", Some(&admin), None).await;
    let report = body_json(response).await;
    assert_eq!(report["summary"]["available"], 3);
    assert_eq!(report["summary"]["locked"], 2);
    assert_eq!(report["summary"]["sold"], 1);
    assert_eq!(report["summary"]["total"], 6);

    let response = send(&app, "GET", "/v1/reports?type=profit", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["summary"]["total_profit"], 10_000);

    // Profit figures expose buying prices.
    let response = send(&app, "GET", "/v1/reports?type=profit", Some(&manager), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/v1/reports?type=bogus", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid report type");
}

#[tokio::test]
async fn dashboard_reflects_the_seeded_ledger() {
    let app = test_app();
    let manager = login(&app, "manager").await;

    let response = send(&app, "GET", "/v1/dashboard/stats", Some(&manager), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;

    // Two pending bookings, two locked batches, three on open sale,
    // one sold-out batch worth 10,000 in margin.
    assert_eq!(stats["total_bookings"], 2);
    assert_eq!(stats["locked_tickets"], 2);
    assert_eq!(stats["total_inventory"], 3);
    assert_eq!(stats["estimated_profit"], 10_000);
    assert!(stats["todays_sales"]["amount"].is_number());
}

#[tokio::test]
async fn settings_sections_merge_shallowly() {
    let app = test_app();
    let admin = login(&app, "admin").await;
    let manager = login(&app, "manager").await;

    let response = send(&app, "GET", "/v1/settings", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let document = body_json(response).await;
    assert!(document.get("system").is_some());
    assert!(document.get("business").is_some());

    let response = send(&app, "GET", "/v1/settings?section=business", Some(&admin), None).await;
    let business = body_json(response).await;
    assert_eq!(business["lock_duration_minutes"], 30);

    let response = send(
        &app,
        "PUT",
        "/v1/settings",
        Some(&admin),
        Some(json!({ "section": "business", "data": { "lock_duration_minutes": 45 } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["business"]["lock_duration_minutes"], 45);

    // Untouched keys in the section survive the merge.
    let response = send(&app, "GET", "/v1/settings?section=business", Some(&admin), None).await;
    let business = body_json(response).await;
    assert_eq!(business["lock_duration_minutes"], 45);
    assert_eq!(business["profit_margin_percentage"], 18.5);

    let response = send(
        &app,
        "PUT",
        "/v1/settings",
        Some(&admin),
        Some(json!({ "section": "bogus", "data": {} })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid section");

    let response = send(&app, "GET", "/v1/settings?section=bogus", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        "/v1/settings",
        Some(&manager),
        Some(json!({ "section": "business", "data": { "tax_percentage": 10.0 } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The users section is a read-only composite.
    let response = send(&app, "GET", "/v1/settings?section=users", Some(&admin), None).await;
    let body = body_json(response).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn umrah_group_booking_reserves_pilgrim_seats() {
    let app = test_app();
    let manager = login(&app, "manager").await;

    let response = send(&app, "GET", "/v1/umrah/packages", Some(&manager), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    // VIP package: 15 seats open, 180,000 a head.
    let package_id = seeded(0x6003);
    let group = json!({
        "package_id": package_id,
        "group_leader": {
            "name": "Hafez Karim",
            "phone": "+8801733340011",
            "email": "hafez.karim@example.com",
        },
        "number_of_pilgrims": 10,
    });
    let response = send(&app, "POST", "/v1/umrah/bookings", Some(&manager), Some(group)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["booking"]["booking_reference"]
        .as_str()
        .unwrap()
        .starts_with("UMH-"));
    assert_eq!(body["booking"]["total_amount"], 1_800_000);
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let uri = format!("/v1/umrah/packages/{package_id}");
    let response = send(&app, "GET", &uri, Some(&manager), None).await;
    assert_eq!(body_json(response).await["available_seats"], 5);

    // A group of 20 no longer fits.
    let oversize = json!({
        "package_id": package_id,
        "group_leader": {
            "name": "Hafez Karim",
            "phone": "+8801733340011",
            "email": "hafez.karim@example.com",
        },
        "number_of_pilgrims": 20,
    });
    let response = send(&app, "POST", "/v1/umrah/bookings", Some(&manager), Some(oversize)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/v1/umrah/bookings/{booking_id}");
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&manager),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "confirmed");

    // Cancelling the seeded pending group returns its 12 seats.
    let uri = format!("/v1/umrah/bookings/{}", seeded(0x7002));
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&manager),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/v1/umrah/packages/{}", seeded(0x6002));
    let response = send(&app, "GET", &uri, Some(&manager), None).await;
    assert_eq!(body_json(response).await["available_seats"], 20);

    // Cancelled groups are final.
    let uri = format!("/v1/umrah/bookings/{}", seeded(0x7002));
    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&manager),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn countries_carry_ticket_counts() {
    let app = test_app();
    let admin = login(&app, "admin").await;

    let response = send(&app, "GET", "/v1/countries", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let countries = body_json(response).await;
    assert_eq!(countries.as_array().unwrap().len(), 10);
    let ksa = countries
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["code"] == "KSA")
        .unwrap();
    assert_eq!(ksa["ticket_count"], 2);

    let response = send(&app, "GET", "/v1/countries/stats", Some(&admin), None).await;
    let stats = body_json(response).await;
    let ksa = stats["countries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["code"] == "KSA")
        .unwrap();
    assert_eq!(ksa["total_tickets"], 20);
    assert_eq!(ksa["available_tickets"], 10);

    let response = send(
        &app,
        "POST",
        "/v1/countries",
        Some(&admin),
        Some(json!({ "name": "Indonesia", "code": "IDN", "flag": "🇮🇩" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "GET", "/v1/countries", Some(&admin), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 11);

    let response = send(
        &app,
        "POST",
        "/v1/airlines",
        Some(&admin),
        Some(json!({ "name": "Garuda Indonesia", "code": "GA" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        "POST",
        "/v1/airlines",
        Some(&admin),
        Some(json!({ "name": "  ", "code": "XX" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settlement_payments_follow_the_booking_state() {
    let app = test_app();
    let staff = login(&app, "staff").await;

    // Balance on the partial booking BK003.
    let response = send(
        &app,
        "POST",
        "/v1/payments",
        Some(&staff),
        Some(json!({
            "booking_id": seeded(0x4003),
            "amount": 215_000,
            "payment_method": "bkash",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["payment"]["amount"], 215_000);
    assert!(body["payment"]["transaction_id"]
        .as_str()
        .unwrap()
        .starts_with("TXN-"));

    let response = send(
        &app,
        "POST",
        "/v1/payments",
        Some(&staff),
        Some(json!({
            "booking_id": seeded(0x4004),
            "amount": 1_000,
            "payment_method": "cash",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        "POST",
        "/v1/payments",
        Some(&staff),
        Some(json!({
            "booking_id": seeded(0x4003),
            "amount": -5,
            "payment_method": "cash",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Newest first: the settlement leads the list.
    let response = send(&app, "GET", "/v1/payments", Some(&staff), None).await;
    let payments = body_json(response).await;
    assert_eq!(payments.as_array().unwrap().len(), 4);
    assert_eq!(payments[0]["amount"], 215_000);
}

#[tokio::test]
async fn activity_log_lists_newest_first_and_filters() {
    let app = test_app();
    let admin = login(&app, "admin").await;

    let response = send(&app, "GET", "/v1/activity-logs", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = body_json(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 5);
    assert_eq!(entries[0]["action"], "booking_created");

    let response = send(&app, "GET", "/v1/activity-logs?limit=2", Some(&admin), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = send(
        &app,
        "GET",
        "/v1/activity-logs?action=payment_received",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let uri = format!("/v1/activity-logs?user_id={}", seeded(0x0001));
    let response = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = send(
        &app,
        "POST",
        "/v1/activity-logs",
        Some(&admin),
        Some(json!({
            "action": "note",
            "description": "Called the airline about BATCH-2024-002",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "GET", "/v1/activity-logs", Some(&admin), None).await;
    let entries = body_json(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 6);
    assert_eq!(entries[0]["action"], "note");
}

#[tokio::test]
async fn activity_stream_answers_as_server_sent_events() {
    let app = test_app();
    let admin = login(&app, "admin").await;

    let response = send(&app, "GET", "/v1/activity/stream", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn lock_sweeper_releases_expired_holds() {
    use bdticket_core::repository::{ActivityLogRepository, TicketRepository};
    use bdticket_inventory::{Ticket, TicketStatus};
    use chrono::{Duration, Utc};

    let state = test_state();
    let now = Utc::now();

    let mut stale = Ticket {
        id: uuid::Uuid::new_v4(),
        airline_id: uuid::Uuid::from_u128(0x2001),
        country_id: uuid::Uuid::from_u128(0x1001),
        flight_number: "BG-349".to_string(),
        origin: "DAC".to_string(),
        destination: "JED".to_string(),
        departure_date: (now + Duration::days(6)).date_naive(),
        departure_time: "07:10".to_string(),
        arrival_time: None,
        buying_price: 70_000,
        selling_price: 79_000,
        total_seats: 5,
        available_seats: 3,
        status: TicketStatus::Locked,
        locked_until: Some(now - Duration::minutes(5)),
        batch_number: "BATCH-STALE".to_string(),
        notes: None,
        created_by: uuid::Uuid::from_u128(0x0001),
        created_at: now - Duration::days(1),
        updated_at: now - Duration::hours(1),
    };
    state.tickets.create_ticket(&stale).await.unwrap();

    let released = worker::sweep_expired_locks(&state).await.unwrap();
    assert_eq!(released, 1);
    assert_eq!(state.metrics.locks_expired.get(), 1);

    stale = state.tickets.get_ticket(stale.id).await.unwrap().unwrap();
    assert_eq!(stale.status, TicketStatus::Available);
    assert!(stale.locked_until.is_none());

    // Live holds from the demo data are left alone.
    let live = state
        .tickets
        .get_ticket(uuid::Uuid::from_u128(0x3002))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.status, TicketStatus::Locked);

    // The sweep shows up in the audit trail.
    let filter = bdticket_shared::ActivityFilter {
        action: Some("lock_expired".to_string()),
        ..Default::default()
    };
    let entries = state.activity.list_activity(&filter).await.unwrap();
    assert_eq!(entries.len(), 1);

    // A second pass finds nothing.
    assert_eq!(worker::sweep_expired_locks(&state).await.unwrap(), 0);
}

#[tokio::test]
async fn metrics_endpoint_is_open() {
    let app = test_app();

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/metrics", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("bdticket_http_requests_total"));
    assert!(text.contains("bdticket_bookings_created_total"));
}
