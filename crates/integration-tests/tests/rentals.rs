//! Rental windows and the two-phase rental action, against the in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};

use bookhub_core::{BookId, RentalDuration, RentalStatus, UserId};
use bookhub_storefront::notify::{MemoryNotifier, NotificationKind};
use bookhub_storefront::rentals::{
    ActionState, FixedClock, MemoryRentalStore, RentalError, RentalFlow, RentalManager,
};

type Manager = RentalManager<MemoryRentalStore, FixedClock, MemoryNotifier>;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .expect("Valid timestamp")
}

fn manager() -> (Manager, FixedClock, MemoryNotifier) {
    let clock = FixedClock::new(t0());
    let notifier = MemoryNotifier::new();
    let manager = RentalManager::new(MemoryRentalStore::new(), clock.clone(), notifier.clone());
    (manager, clock, notifier)
}

#[tokio::test]
async fn test_one_year_rental_lifecycle() {
    let (manager, clock, _) = manager();
    let user = UserId::new("u1");
    let book = BookId::new("book1");

    let rental = manager
        .rent(Some(&user), &book, "1_year")
        .await
        .expect("Rental should succeed");
    assert_eq!(rental.duration, RentalDuration::OneYear);
    assert_eq!(rental.expires_at, t0() + Duration::days(365));

    clock.set(t0() + Duration::days(364));
    assert!(manager.is_active(&rental));
    assert!(
        manager
            .find_active_for_item(&user, &book)
            .await
            .expect("lookup")
            .is_some()
    );

    clock.set(t0() + Duration::days(366));
    assert!(!manager.is_active(&rental));
    assert_eq!(rental.status(manager.now()), RentalStatus::Expired);
    assert!(
        manager
            .find_active_for_item(&user, &book)
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test]
async fn test_rentals_listed_newest_first() {
    let (manager, clock, _) = manager();
    let user = UserId::new("u1");

    manager
        .rent(Some(&user), &BookId::new("a"), "1_month")
        .await
        .expect("rent a");
    clock.advance(Duration::hours(1));
    manager
        .rent(Some(&user), &BookId::new("b"), "6_months")
        .await
        .expect("rent b");
    manager
        .rent(Some(&UserId::new("u2")), &BookId::new("c"), "1_month")
        .await
        .expect("rent c");

    let rentals = manager.list_for_user(&user).await.expect("list");
    let books: Vec<&str> = rentals.iter().map(|r| r.book_id.as_str()).collect();
    assert_eq!(books, vec!["b", "a"]);
}

#[tokio::test]
async fn test_flow_reports_failure_then_success() {
    let (manager, _, notifier) = manager();
    let flow = RentalFlow::new();
    let book = BookId::new("book1");

    let err = flow
        .submit(&manager, None, &book, "1_year")
        .await
        .expect_err("Anonymous rental should fail");
    assert!(matches!(err, RentalError::NotAuthenticated));
    assert_eq!(
        flow.state(),
        ActionState::Failed("Please log in to rent books".to_owned())
    );
    let failure = notifier.drain();
    assert_eq!(failure.len(), 1);
    assert!(failure.iter().all(|n| n.kind == NotificationKind::Destructive));

    flow.reset();
    assert_eq!(flow.state(), ActionState::Idle);

    let user = UserId::new("u1");
    let rental = flow
        .submit(&manager, Some(&user), &book, "6_months")
        .await
        .expect("Rental should succeed");
    assert_eq!(flow.state(), ActionState::Succeeded(rental));
    assert_eq!(notifier.titles(), vec!["Book rented!"]);
}

#[tokio::test]
async fn test_unknown_plan_rejected() {
    let (manager, _, _) = manager();
    let err = manager
        .rent(Some(&UserId::new("u1")), &BookId::new("book1"), "2_years")
        .await
        .expect_err("Unknown plan should fail");
    assert!(matches!(err, RentalError::InvalidPlan(plan) if plan == "2_years"));
}
