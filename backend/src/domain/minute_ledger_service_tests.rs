//! Tests for the minute ledger service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockAssociationRepository, MockMinuteRepository, MockUserRepository};
use crate::domain::test_fixtures::{association, association_id, date, minute, user, user_id};
use crate::domain::{ErrorCode, MinuteContent, MinuteSortField, SortOrder};

fn make_service(
    minutes: MockMinuteRepository,
    associations: MockAssociationRepository,
    users: MockUserRepository,
) -> MinuteLedgerService {
    MinuteLedgerService::new(Arc::new(minutes), Arc::new(associations), Arc::new(users))
}

fn existing_association() -> MockAssociationRepository {
    let mut associations = MockAssociationRepository::new();
    associations
        .expect_find_by_id()
        .returning(|id| Ok(Some(association(id.get(), "Club", Vec::new()))));
    associations
}

fn new_minute(voters: &[i32]) -> NewMinute {
    NewMinute {
        association_id: association_id(1),
        content: MinuteContent::new("Budget approved").expect("valid content"),
        date: date("2021-03-01"),
        voter_ids: voters.iter().map(|id| user_id(*id)).collect(),
    }
}

#[tokio::test]
async fn create_fails_without_persisting_when_a_voter_is_unknown() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_many_by_id()
        .return_once(|_| Ok(vec![user(1, "a@x.io")]));
    let mut minutes = MockMinuteRepository::new();
    minutes.expect_insert().times(0);

    let service = make_service(minutes, existing_association(), users);
    let error = service
        .create(new_minute(&[1, 999]))
        .await
        .expect_err("unknown voter");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("999"));
}

#[tokio::test]
async fn create_requires_existing_association() {
    let mut associations = MockAssociationRepository::new();
    associations.expect_find_by_id().return_once(|_| Ok(None));
    let mut minutes = MockMinuteRepository::new();
    minutes.expect_insert().times(0);

    let service = make_service(minutes, associations, MockUserRepository::new());
    let error = service
        .create(new_minute(&[]))
        .await
        .expect_err("unknown association");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn create_persists_resolved_voters() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_many_by_id()
        .return_once(|_| Ok(vec![user(1, "a@x.io"), user(2, "b@x.io")]));
    let mut minutes = MockMinuteRepository::new();
    minutes
        .expect_insert()
        .times(1)
        .withf(|fields| fields.voter_ids == vec![user_id(1), user_id(2)])
        .return_once(|_| {
            Ok(minute(
                5,
                1,
                "Budget approved",
                "2021-03-01",
                vec![user(1, "a@x.io"), user(2, "b@x.io")],
            ))
        });

    let service = make_service(minutes, existing_association(), users);
    let created = service
        .create(new_minute(&[1, 2]))
        .await
        .expect("create succeeds");
    assert_eq!(created.voters().len(), 2);
}

#[tokio::test]
async fn find_for_association_applies_ordering() {
    let mut minutes = MockMinuteRepository::new();
    minutes.expect_list_for_association().return_once(|_| {
        Ok(vec![
            minute(1, 1, "b", "2021-01-01", Vec::new()),
            minute(2, 1, "a", "2021-01-03", Vec::new()),
            minute(3, 1, "c", "2021-01-02", Vec::new()),
        ])
    });

    let service = make_service(
        minutes,
        MockAssociationRepository::new(),
        MockUserRepository::new(),
    );
    let ordered = service
        .find_for_association(
            association_id(1),
            MinuteOrdering::new(MinuteSortField::Date, SortOrder::Asc),
        )
        .await
        .expect("listing succeeds");

    let dates: Vec<_> = ordered.iter().map(Minute::date).collect();
    assert_eq!(
        dates,
        vec![date("2021-01-01"), date("2021-01-02"), date("2021-01-03")]
    );
}

#[tokio::test]
async fn update_rechecks_supplied_voters() {
    let mut minutes = MockMinuteRepository::new();
    minutes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(minute(5, 1, "x", "2021-01-01", Vec::new()))));
    minutes.expect_replace().times(0);
    let mut users = MockUserRepository::new();
    users.expect_find_many_by_id().return_once(|_| Ok(Vec::new()));

    let service = make_service(minutes, MockAssociationRepository::new(), users);
    let error = service
        .update(
            crate::domain::MinuteId::new(5).expect("valid id"),
            MinuteChanges {
                voter_ids: Some(vec![user_id(8)]),
                ..MinuteChanges::default()
            },
        )
        .await
        .expect_err("unknown voter");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_keeps_untouched_fields() {
    let mut minutes = MockMinuteRepository::new();
    minutes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(minute(5, 1, "old", "2021-01-01", vec![user(1, "a@x.io")]))));
    minutes
        .expect_replace()
        .withf(|_, fields| {
            fields.content.as_ref() == "new"
                && fields.date == date("2021-01-01")
                && fields.voter_ids == vec![user_id(1)]
        })
        .return_once(|_, _| {
            Ok(Some(minute(5, 1, "new", "2021-01-01", vec![user(1, "a@x.io")])))
        });

    let service = make_service(
        minutes,
        MockAssociationRepository::new(),
        MockUserRepository::new(),
    );
    let updated = service
        .update(
            crate::domain::MinuteId::new(5).expect("valid id"),
            MinuteChanges {
                content: Some(MinuteContent::new("new").expect("valid content")),
                ..MinuteChanges::default()
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(updated.content().as_ref(), "new");
}

#[tokio::test]
async fn remove_missing_minute_is_not_found() {
    let mut minutes = MockMinuteRepository::new();
    minutes.expect_find_by_id().return_once(|_| Ok(None));
    minutes.expect_delete().times(0);

    let service = make_service(
        minutes,
        MockAssociationRepository::new(),
        MockUserRepository::new(),
    );
    let error = service
        .remove(crate::domain::MinuteId::new(9).expect("valid id"))
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
