//! Integration tests for transport seat allocation and the derived
//! passenger counter.
//!
//! Exercises capacity enforcement, per-leg seat uniqueness, all-or-nothing
//! bulk creation, and counter recomputation against a real database.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use tourwise_core::error::CoreError;
use tourwise_db::error::RepoError;
use tourwise_db::models::seat_assignment::{CreateSeatAssignment, UpdateSeatAssignment};
use tourwise_db::repositories::{SeatAssignmentRepo, TransportLegRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_departure(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO tour_departures (departure_code, tour_name, departure_date, return_date, status) \
         VALUES ($1, $2, '2025-11-01', '2025-11-08', 'confirmed') RETURNING id",
    )
    .bind(code)
    .bind(format!("Tour {code}"))
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_transport(pool: &PgPool, departure_id: i64, total_seats: Option<i32>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO tour_transports \
            (tour_departure_id, transport_type, route_from, route_to, departure_datetime, total_seats) \
         VALUES ($1, 'bus', 'Munich', 'Innsbruck', $2, $3) RETURNING id",
    )
    .bind(departure_id)
    .bind(Utc.with_ymd_and_hms(2025, 11, 1, 8, 0, 0).unwrap())
    .bind(total_seats)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_guest(pool: &PgPool, departure_id: i64, name: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO departure_guests (tour_departure_id, full_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(departure_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn new_seat(transport_id: i64, guest_id: i64, seat: Option<&str>) -> CreateSeatAssignment {
    CreateSeatAssignment {
        tour_transport_id: transport_id,
        guest_id,
        seat_number: seat.map(|s| s.to_string()),
        ticket_number: None,
        baggage_count: None,
        baggage_weight_kg: None,
        special_needs: None,
        notes: None,
    }
}

async fn assigned_count(pool: &PgPool, transport_id: i64) -> i32 {
    TransportLegRepo::get_availability(pool, transport_id)
        .await
        .unwrap()
        .unwrap()
        .assigned_guests
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_seats_guest_and_recomputes_counter(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;
    let guest = seed_guest(&pool, departure, "Eva Kern").await;

    let mut input = new_seat(transport, guest, Some("12A"));
    input.ticket_number = Some("TK-5531".to_string());
    input.baggage_count = Some(2);

    let detail = SeatAssignmentRepo::create(&pool, &input).await.unwrap();

    assert_eq!(detail.guest_name, "Eva Kern");
    assert_eq!(detail.seat_number.as_deref(), Some("12A"));
    assert_eq!(detail.route_from, "Munich");

    let availability = TransportLegRepo::get_availability(&pool, transport)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(availability.assigned_guests, 1);
    assert_eq!(availability.available_seats, Some(29));

    // Round trip: the stored row carries the same business fields.
    let row = SeatAssignmentRepo::find_by_id(&pool, detail.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.ticket_number.as_deref(), Some("TK-5531"));
    assert_eq!(row.baggage_count, Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_missing_leg_is_not_found(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let guest = seed_guest(&pool, departure, "Eva Kern").await;

    let err = SeatAssignmentRepo::create(&pool, &new_seat(4242, guest, None))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::NotFound {
            entity: "TourTransport",
            id: 4242
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_leg_rejects_another_guest(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(2)).await;

    for name in ["Eva Kern", "Max Roth"] {
        let guest = seed_guest(&pool, departure, name).await;
        SeatAssignmentRepo::create(&pool, &new_seat(transport, guest, None))
            .await
            .unwrap();
    }

    let third = seed_guest(&pool, departure, "Iris Lang").await;
    let err = SeatAssignmentRepo::create(&pool, &new_seat(transport, third, None))
        .await
        .unwrap_err();

    match err {
        RepoError::Domain(CoreError::CapacityExceeded {
            transport_id,
            total_seats,
            assigned_guests,
        }) => {
            assert_eq!(transport_id, transport);
            assert_eq!(total_seats, 2);
            assert_eq!(assigned_guests, 2);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    assert_eq!(assigned_count(&pool, transport).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn taken_seat_is_rejected_with_seat_number(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let first = seed_guest(&pool, departure, "Eva Kern").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, first, Some("12A")))
        .await
        .unwrap();
    let second = seed_guest(&pool, departure, "Max Roth").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, second, Some("12B")))
        .await
        .unwrap();

    let third = seed_guest(&pool, departure, "Iris Lang").await;
    let err = SeatAssignmentRepo::create(&pool, &new_seat(transport, third, Some("12A")))
        .await
        .unwrap_err();

    // The user-facing message names the seat.
    assert!(err.to_string().contains("12A"));
    match err {
        RepoError::Domain(CoreError::SeatConflict { seat_number, .. }) => {
            assert_eq!(seat_number, "12A");
        }
        other => panic!("expected SeatConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unseated_guests_may_share_a_leg(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    for name in ["Eva Kern", "Max Roth", "Iris Lang"] {
        let guest = seed_guest(&pool, departure, name).await;
        SeatAssignmentRepo::create(&pool, &new_seat(transport, guest, None))
            .await
            .unwrap();
    }

    assert_eq!(assigned_count(&pool, transport).await, 3);
    assert!(SeatAssignmentRepo::used_seats(&pool, transport)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unbounded_leg_never_fills(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, None).await;

    for i in 0..5 {
        let guest = seed_guest(&pool, departure, &format!("Guest {i}")).await;
        SeatAssignmentRepo::create(&pool, &new_seat(transport, guest, None))
            .await
            .unwrap();
    }

    let availability = TransportLegRepo::get_availability(&pool, transport)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(availability.assigned_guests, 5);
    assert_eq!(availability.total_seats, None);
    assert_eq!(availability.available_seats, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seat_numbers_are_trimmed_before_storage(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let first = seed_guest(&pool, departure, "Eva Kern").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, first, Some(" 12A ")))
        .await
        .unwrap();

    let second = seed_guest(&pool, departure, "Max Roth").await;
    let err = SeatAssignmentRepo::create(&pool, &new_seat(transport, second, Some("12A")))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::SeatConflict { .. }));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_revalidates_changed_seat(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, eva, Some("12A")))
        .await
        .unwrap();

    let max = seed_guest(&pool, departure, "Max Roth").await;
    let assignment = SeatAssignmentRepo::create(&pool, &new_seat(transport, max, Some("12B")))
        .await
        .unwrap();

    // Moving onto an occupied seat fails.
    let err = SeatAssignmentRepo::update(
        &pool,
        assignment.id,
        &UpdateSeatAssignment {
            seat_number: Some("12A".to_string()),
            ticket_number: None,
            baggage_count: None,
            baggage_weight_kg: None,
            special_needs: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::SeatConflict { .. }));

    // Re-stating the current seat is fine (the row excludes itself).
    let same = SeatAssignmentRepo::update(
        &pool,
        assignment.id,
        &UpdateSeatAssignment {
            seat_number: Some("12B".to_string()),
            ticket_number: Some("TK-9001".to_string()),
            baggage_count: None,
            baggage_weight_kg: None,
            special_needs: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(same.seat_number.as_deref(), Some("12B"));
    assert_eq!(same.ticket_number.as_deref(), Some("TK-9001"));

    // Moving to a free seat works.
    let moved = SeatAssignmentRepo::update(
        &pool,
        assignment.id,
        &UpdateSeatAssignment {
            seat_number: Some("14C".to_string()),
            ticket_number: None,
            baggage_count: None,
            baggage_weight_kg: None,
            special_needs: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.seat_number.as_deref(), Some("14C"));

    // The passenger count did not change.
    assert_eq!(assigned_count(&pool, transport).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_assignment_is_not_found(pool: PgPool) {
    let err = SeatAssignmentRepo::update(
        &pool,
        77,
        &UpdateSeatAssignment {
            seat_number: None,
            ticket_number: None,
            baggage_count: None,
            baggage_weight_kg: None,
            special_needs: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::NotFound {
            entity: "TransportGuestAssignment",
            id: 77
        })
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_recomputes_counter(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let mut last_id = 0;
    for name in ["Eva Kern", "Max Roth", "Iris Lang"] {
        let guest = seed_guest(&pool, departure, name).await;
        last_id = SeatAssignmentRepo::create(&pool, &new_seat(transport, guest, None))
            .await
            .unwrap()
            .id;
    }
    assert_eq!(assigned_count(&pool, transport).await, 3);

    assert!(SeatAssignmentRepo::delete(&pool, last_id).await.unwrap());
    assert_eq!(assigned_count(&pool, transport).await, 2);

    assert!(!SeatAssignmentRepo::delete(&pool, last_id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Bulk create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_duplicate_in_batch_persists_nothing(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;
    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    let max = seed_guest(&pool, departure, "Max Roth").await;

    let err = SeatAssignmentRepo::bulk_create(
        &pool,
        &[
            new_seat(transport, eva, Some("5A")),
            new_seat(transport, max, Some("5A")),
        ],
    )
    .await
    .unwrap_err();

    match err {
        RepoError::Domain(CoreError::DuplicateSeatInBatch {
            transport_id,
            seat_number,
        }) => {
            assert_eq!(transport_id, transport);
            assert_eq!(seat_number, "5A");
        }
        other => panic!("expected DuplicateSeatInBatch, got {other:?}"),
    }

    assert!(SeatAssignmentRepo::used_seats(&pool, transport)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(assigned_count(&pool, transport).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_existing_seat_conflict_rolls_back_whole_batch(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, eva, Some("7C")))
        .await
        .unwrap();

    let max = seed_guest(&pool, departure, "Max Roth").await;
    let iris = seed_guest(&pool, departure, "Iris Lang").await;

    let err = SeatAssignmentRepo::bulk_create(
        &pool,
        &[
            new_seat(transport, max, Some("7B")),
            new_seat(transport, iris, Some("7C")),
        ],
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::SeatConflict { .. }));

    // Only the original occupant remains.
    assert_eq!(
        SeatAssignmentRepo::used_seats(&pool, transport).await.unwrap(),
        vec!["7C".to_string()]
    );
    assert_eq!(assigned_count(&pool, transport).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_over_capacity_is_rejected_before_any_write(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(2)).await;

    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    SeatAssignmentRepo::create(&pool, &new_seat(transport, eva, None))
        .await
        .unwrap();

    let max = seed_guest(&pool, departure, "Max Roth").await;
    let iris = seed_guest(&pool, departure, "Iris Lang").await;

    let err = SeatAssignmentRepo::bulk_create(
        &pool,
        &[
            new_seat(transport, max, None),
            new_seat(transport, iris, None),
        ],
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::CapacityExceeded { .. }));
    assert_eq!(assigned_count(&pool, transport).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_create_spans_legs_and_recomputes_each(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let bus = seed_transport(&pool, departure, Some(30)).await;
    let ferry = seed_transport(&pool, departure, Some(200)).await;

    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    let max = seed_guest(&pool, departure, "Max Roth").await;
    let iris = seed_guest(&pool, departure, "Iris Lang").await;

    let created = SeatAssignmentRepo::bulk_create(
        &pool,
        &[
            new_seat(bus, eva, Some("5B")),
            new_seat(bus, max, Some("5A")),
            // Same seat label on a different leg is fine.
            new_seat(ferry, iris, Some("5A")),
        ],
    )
    .await
    .unwrap();
    assert_eq!(created, 3);

    assert_eq!(assigned_count(&pool, bus).await, 2);
    assert_eq!(assigned_count(&pool, ferry).await, 1);

    // Used seats come back sorted.
    assert_eq!(
        SeatAssignmentRepo::used_seats(&pool, bus).await.unwrap(),
        vec!["5A".to_string(), "5B".to_string()]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_empty_batch_is_a_no_op(pool: PgPool) {
    let created = SeatAssignmentRepo::bulk_create(&pool, &[]).await.unwrap();
    assert_eq!(created, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_missing_leg_is_not_found(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let guest = seed_guest(&pool, departure, "Eva Kern").await;

    let err = SeatAssignmentRepo::bulk_create(&pool, &[new_seat(31337, guest, None)])
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::NotFound {
            entity: "TourTransport",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Seat queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn is_seat_taken_honours_exclusion(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;
    let eva = seed_guest(&pool, departure, "Eva Kern").await;

    let assignment = SeatAssignmentRepo::create(&pool, &new_seat(transport, eva, Some("3F")))
        .await
        .unwrap();

    assert!(SeatAssignmentRepo::is_seat_taken(&pool, transport, "3F", None)
        .await
        .unwrap());
    assert!(
        !SeatAssignmentRepo::is_seat_taken(&pool, transport, "3F", Some(assignment.id))
            .await
            .unwrap()
    );
    assert!(!SeatAssignmentRepo::is_seat_taken(&pool, transport, "4F", None)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manifest_lists_seated_rows_first(pool: PgPool) {
    let departure = seed_departure(&pool, "ALP-2511").await;
    let transport = seed_transport(&pool, departure, Some(30)).await;

    let eva = seed_guest(&pool, departure, "Eva Kern").await;
    let max = seed_guest(&pool, departure, "Max Roth").await;
    let iris = seed_guest(&pool, departure, "Iris Lang").await;

    SeatAssignmentRepo::create(&pool, &new_seat(transport, eva, None))
        .await
        .unwrap();
    SeatAssignmentRepo::create(&pool, &new_seat(transport, max, Some("2B")))
        .await
        .unwrap();
    SeatAssignmentRepo::create(&pool, &new_seat(transport, iris, Some("2A")))
        .await
        .unwrap();

    let manifest = SeatAssignmentRepo::list_by_transport(&pool, transport)
        .await
        .unwrap();
    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest[0].seat_number.as_deref(), Some("2A"));
    assert_eq!(manifest[1].seat_number.as_deref(), Some("2B"));
    assert!(manifest[2].seat_number.is_none());
    assert_eq!(manifest[2].guest_name, "Eva Kern");
}
