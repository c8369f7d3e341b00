/// Vacation request lifecycle: submission rules, review transitions, cancellation.
mod helpers;

use helpers::*;
use leavedesk::domain::entities::{RequestFilter, VacationStatus};
use leavedesk::domain::errors::VacationError;
use leavedesk::domain::ports::balance_ledger::BalanceLedger;
use leavedesk::domain::ports::vacation_request_repository::VacationRequestRepository;
use tokio_test::{assert_err, assert_ok};

// ===== Submission =====

#[tokio::test]
async fn test_weekday_request_scenario_end_to_end() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;
    let admin = create_admin(db).await;

    // Mon 2024-01-15 .. Fri 2024-01-19 under the default weekend policy
    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", Some("Ski trip"))
        .await
        .unwrap();
    assert_eq!(request.total_days, 5);
    assert_eq!(request.status, VacationStatus::Pending);
    assert_eq!(request.reason.as_deref(), Some("Ski trip"));

    // Submission does not touch the balance
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(25));

    let approved = state
        .vacation_service
        .approve(&request.id, &admin.id)
        .await
        .unwrap();
    assert_eq!(approved.status, VacationStatus::Approved);
    assert_eq!(approved.reviewed_by.as_deref(), Some(admin.id.as_str()));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(20));

    let second = state.vacation_service.approve(&request.id, &admin.id).await;
    assert!(matches!(
        second,
        Err(VacationError::RequestAlreadyProcessed { .. })
    ));
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(20));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_weekend_only_request_is_accepted_with_zero_days() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    // Sat 2024-01-20 .. Sun 2024-01-21
    let request = state
        .vacation_service
        .submit(&employee.id, "20/01/2024", "21/01/2024", None)
        .await
        .unwrap();

    assert_eq!(request.total_days, 0);
    assert_eq!(request.status, VacationStatus::Pending);
    let stored = db.get_request(&request.id).await.unwrap().unwrap();
    assert_eq!(stored, request);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_reversed_range_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    let err = state
        .vacation_service
        .submit(&employee.id, "19/01/2024", "15/01/2024", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_DATE_RANGE");

    let stored = db
        .list_requests(&RequestFilter::for_user(&employee.id))
        .await
        .unwrap();
    assert!(stored.is_empty());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_malformed_dates_are_validation_errors() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    for (start, end) in [
        ("2024-01-15", "19/01/2024"),
        ("15/01/2024", "01/19/2024"),
        ("tomorrow", "19/01/2024"),
    ] {
        let err = state
            .vacation_service
            .submit(&employee.id, start, end, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR", "{} .. {}", start, end);
    }

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_past_start_date_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    // The fixed clock reads 2024-01-10
    let err = state
        .vacation_service
        .submit(&employee.id, "09/01/2024", "12/01/2024", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DATE_IN_PAST");

    // Starting today is allowed
    assert_ok!(
        state
            .vacation_service
            .submit(&employee.id, "10/01/2024", "10/01/2024", None)
            .await
    );

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_insufficient_balance() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 4).await;

    let err = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VacationError::InsufficientBalance {
            requested: 5,
            available: 4
        }
    ));

    // Exactly the balance is fine
    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "18/01/2024", None)
        .await
        .unwrap();
    assert_eq!(request.total_days, 4);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_unknown_user_cannot_submit() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);

    let err = state
        .vacation_service
        .submit("no-such-user", "15/01/2024", "19/01/2024", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "USER_NOT_FOUND");

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_blank_reason_is_stored_as_absent() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "16/01/2024", Some("   "))
        .await
        .unwrap();
    assert!(request.reason.is_none());

    let stored = state.vacation_service.get_request(&request.id).await.unwrap();
    assert!(stored.reason.is_none());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_policy_change_applies_to_next_submission_only() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    let before = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "21/01/2024", None)
        .await
        .unwrap();
    assert_eq!(before.total_days, 5);

    state
        .settings_service
        .update_weekend_policy(leavedesk::WeekendPolicy::including_all_days())
        .await
        .unwrap();

    let after = state
        .vacation_service
        .submit(&employee.id, "22/01/2024", "28/01/2024", None)
        .await
        .unwrap();
    assert_eq!(after.total_days, 7);

    // total_days is fixed at submission time
    let stored = state.vacation_service.get_request(&before.id).await.unwrap();
    assert_eq!(stored.total_days, 5);

    teardown_test_db(test_db).await;
}

// ===== Review =====

#[tokio::test]
async fn test_reject_records_reason_without_balance_effect() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;
    let admin = create_admin(db).await;

    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();

    let rejected = state
        .vacation_service
        .reject(&request.id, &admin.id, Some("  Release week "))
        .await
        .unwrap();
    assert_eq!(rejected.status, VacationStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Release week"));
    assert_eq!(rejected.reviewed_by.as_deref(), Some(admin.id.as_str()));
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(25));

    // Terminal: neither approval nor a second rejection is possible
    let err = state
        .vacation_service
        .approve(&request.id, &admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "REQUEST_ALREADY_PROCESSED");
    assert_err!(state.vacation_service.reject(&request.id, &admin.id, None).await);
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(25));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_review_of_missing_request() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let admin = create_admin(db).await;

    let err = state
        .vacation_service
        .approve("missing", &admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "REQUEST_NOT_FOUND");

    let err = state
        .vacation_service
        .reject("missing", &admin.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "REQUEST_NOT_FOUND");

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_approval_floors_balance_at_zero() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 6).await;
    let admin = create_admin(db).await;

    // Two pending requests that together exceed the balance both pass submission
    let first = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();
    let second = state
        .vacation_service
        .submit(&employee.id, "22/01/2024", "26/01/2024", None)
        .await
        .unwrap();

    state.vacation_service.approve(&first.id, &admin.id).await.unwrap();
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(1));

    state.vacation_service.approve(&second.id, &admin.id).await.unwrap();
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(0));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_approve_rolls_back_when_owner_is_missing() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;
    let admin = create_admin(db).await;

    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();

    // Orphan the request so the balance step fails mid-transaction
    let mut conn = db.pool().acquire().await.unwrap();
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query("UPDATE vacation_requests SET user_id = 'ghost' WHERE id = ?")
        .bind(&request.id)
        .execute(&mut *conn)
        .await
        .unwrap();
    drop(conn);

    let err = state
        .vacation_service
        .approve(&request.id, &admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "USER_NOT_FOUND");

    // The status write was rolled back with the failed balance step
    let stored = state.vacation_service.get_request(&request.id).await.unwrap();
    assert_eq!(stored.status, VacationStatus::Pending);
    assert!(stored.reviewed_by.is_none());

    teardown_test_db(test_db).await;
}

// ===== Cancellation =====

#[tokio::test]
async fn test_owner_cancels_pending_request() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();

    state
        .vacation_service
        .cancel(&request.id, &employee.id)
        .await
        .unwrap();

    assert!(db.get_request(&request.id).await.unwrap().is_none());
    let err = state
        .vacation_service
        .cancel(&request.id, &employee.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "REQUEST_NOT_FOUND");
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(25));

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_only_owner_can_cancel() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let owner = create_employee(db, 25).await;
    let colleague = create_employee(db, 25).await;

    let request = state
        .vacation_service
        .submit(&owner.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();

    let err = state
        .vacation_service
        .cancel(&request.id, &colleague.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert!(db.get_request(&request.id).await.unwrap().is_some());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_reviewed_requests_cannot_be_cancelled() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;
    let admin = create_admin(db).await;

    let approved = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();
    let approved = state
        .vacation_service
        .approve(&approved.id, &admin.id)
        .await
        .unwrap();

    let rejected = state
        .vacation_service
        .submit(&employee.id, "05/02/2024", "06/02/2024", None)
        .await
        .unwrap();
    let rejected = state
        .vacation_service
        .reject(&rejected.id, &admin.id, None)
        .await
        .unwrap();

    let err = state
        .vacation_service
        .cancel(&approved.id, &employee.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CANNOT_CANCEL_APPROVED");

    let err = state
        .vacation_service
        .cancel(&rejected.id, &employee.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CANNOT_CANCEL_REJECTED");

    // Records are untouched
    assert_eq!(db.get_request(&approved.id).await.unwrap().unwrap(), approved);
    assert_eq!(db.get_request(&rejected.id).await.unwrap().unwrap(), rejected);
    assert_eq!(db.get_balance(&employee.id).await.unwrap(), Some(20));

    teardown_test_db(test_db).await;
}

// ===== Queries =====

#[tokio::test]
async fn test_list_filters_and_pending_queue() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let alice = create_employee(db, 40).await;
    let bob = create_employee(db, 40).await;
    let admin = create_admin(db).await;

    let a1 = state
        .vacation_service
        .submit(&alice.id, "15/01/2024", "16/01/2024", None)
        .await
        .unwrap();
    let a2 = state
        .vacation_service
        .submit(&alice.id, "06/01/2025", "07/01/2025", None)
        .await
        .unwrap();
    let b1 = state
        .vacation_service
        .submit(&bob.id, "12/02/2024", "13/02/2024", None)
        .await
        .unwrap();
    state.vacation_service.approve(&a1.id, &admin.id).await.unwrap();

    let alice_all = state
        .vacation_service
        .list_requests(&RequestFilter::for_user(&alice.id))
        .await
        .unwrap();
    // Newest start date first
    let ids: Vec<_> = alice_all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![a2.id.as_str(), a1.id.as_str()]);

    let alice_2024 = state
        .vacation_service
        .list_requests(&RequestFilter::for_user(&alice.id).with_year(2024))
        .await
        .unwrap();
    assert_eq!(alice_2024.len(), 1);
    assert_eq!(alice_2024[0].id, a1.id);

    let approved = state
        .vacation_service
        .list_requests(&RequestFilter::default().with_status(VacationStatus::Approved))
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, a1.id);

    let pending = state.vacation_service.list_pending().await.unwrap();
    let mut pending_ids: Vec<_> = pending.iter().map(|r| r.id.clone()).collect();
    pending_ids.sort();
    let mut expected = vec![a2.id.clone(), b1.id.clone()];
    expected.sort();
    assert_eq!(pending_ids, expected);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_unreviewed_request_without_reason_reads_back() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = app_state(db);
    let employee = create_employee(db, 25).await;

    let request = state
        .vacation_service
        .submit(&employee.id, "15/01/2024", "19/01/2024", None)
        .await
        .unwrap();

    // Every nullable column is NULL in storage
    let stored = state.vacation_service.get_request(&request.id).await.unwrap();
    assert_eq!(stored, request);
    assert!(stored.reason.is_none());
    assert!(stored.reviewed_by.is_none());
    assert!(stored.reviewed_at.is_none());
    assert!(stored.rejection_reason.is_none());

    let listed = state
        .vacation_service
        .list_requests(&RequestFilter::for_user(&employee.id))
        .await
        .unwrap();
    assert_eq!(listed, vec![request.clone()]);

    let pending = state.vacation_service.list_pending().await.unwrap();
    assert_eq!(pending, vec![request]);

    teardown_test_db(test_db).await;
}
