//! HTTP-level integration tests for company/slot browsing and booking.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, seed_company, seed_slot};
use sqlx::PgPool;
use uuid::Uuid;

async fn book(pool: &PgPool, slot_id: Uuid, student_id: &str) -> axum::response::Response {
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/slots/{slot_id}/book"),
        serde_json::json!({ "student_id": student_id }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn companies_are_listed_by_name(pool: PgPool) {
    seed_company(&pool, "Zeta Labs").await;
    let acme = seed_company(&pool, "Acme").await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/companies").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["company_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Acme", "Zeta Labs"]);

    let one = get(common::build_test_app(pool), &format!("/api/v1/companies/{}", acme.id)).await;
    assert_eq!(body_json(one).await["data"]["company_name"], "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_company_returns_404(pool: PgPool) {
    let id = Uuid::new_v4();

    let company = get(common::build_test_app(pool.clone()), &format!("/api/v1/companies/{id}")).await;
    assert_eq!(company.status(), StatusCode::NOT_FOUND);

    let slots = get(common::build_test_app(pool), &format!("/api/v1/companies/{id}/slots")).await;
    assert_eq!(slots.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(slots).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slots_carry_derived_availability(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;
    let late = seed_slot(&pool, &acme, 60, 3).await;
    let early = seed_slot(&pool, &acme, 0, 2).await;

    for student in ["s1", "s2"] {
        assert_eq!(book(&pool, early.id, student).await.status(), StatusCode::CREATED);
    }
    assert_eq!(book(&pool, late.id, "s1").await.status(), StatusCode::CREATED);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/companies/{}/slots", acme.id),
    )
    .await;
    let json = body_json(response).await;
    let slots = json["data"].as_array().unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["id"], early.id.to_string());
    assert_eq!(slots[0]["booked_count"], 2);
    assert_eq!(slots[0]["is_full"], true);
    assert_eq!(slots[1]["id"], late.id.to_string());
    assert_eq!(slots[1]["booked_count"], 1);
    assert_eq!(slots[1]["is_full"], false);
    assert_eq!(slots[1]["capacity"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_without_slots_returns_empty_list(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/companies/{}/slots", acme.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_returns_appointment_id(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;
    let slot = seed_slot(&pool, &acme, 0, 1).await;

    let response = book(&pool, slot.id, "student-token").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let appointment_id = json["data"]["appointment_id"].as_str().unwrap();
    assert!(Uuid::parse_str(appointment_id).is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_rejections_surface_the_procedure_message(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;
    let slot = seed_slot(&pool, &acme, 0, 1).await;
    let roomy = seed_slot(&pool, &acme, 30, 5).await;

    assert_eq!(book(&pool, slot.id, "s1").await.status(), StatusCode::CREATED);

    let full = book(&pool, slot.id, "s2").await;
    assert_eq!(full.status(), StatusCode::CONFLICT);
    let json = body_json(full).await;
    assert_eq!(json["code"], "BOOKING_FAILED");
    assert_eq!(json["error"], "This time slot is full");

    assert_eq!(book(&pool, roomy.id, "s1").await.status(), StatusCode::CREATED);
    let repeat = body_json(book(&pool, roomy.id, "s1").await).await;
    assert_eq!(repeat["error"], "You already booked this time slot");

    let missing = book(&pool, Uuid::new_v4(), "s1").await;
    assert_eq!(missing.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(missing).await["error"], "Time slot not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_requires_a_student_id(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;
    let slot = seed_slot(&pool, &acme, 0, 1).await;

    let response = book(&pool, slot.id, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slot_lookup(pool: PgPool) {
    let acme = seed_company(&pool, "Acme").await;
    let slot = seed_slot(&pool, &acme, 0, 4).await;

    let found = get(common::build_test_app(pool.clone()), &format!("/api/v1/slots/{}", slot.id)).await;
    assert_eq!(found.status(), StatusCode::OK);
    let json = body_json(found).await;
    assert_eq!(json["data"]["company_id"], acme.id.to_string());
    assert_eq!(json["data"]["capacity"], 4);

    let missing = get(common::build_test_app(pool), &format!("/api/v1/slots/{}", Uuid::new_v4())).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
