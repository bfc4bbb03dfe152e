//! Tests for the in-memory store.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::test_fixtures::{date, new_event, new_user};
use crate::domain::{AssociationName, MinuteContent};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

async fn seed_user(store: &InMemoryStore, email: &str) -> User {
    UserRepository::insert(store, &new_user(email))
        .await
        .expect("user insert succeeds")
}

async fn seed_association(store: &InMemoryStore, members: &[UserId]) -> Association {
    let fields = NewAssociation::new(
        AssociationName::new("Club").expect("valid name"),
        members.iter().copied(),
    );
    AssociationRepository::insert(store, &fields)
        .await
        .expect("association insert succeeds")
}

#[rstest]
#[tokio::test]
async fn serial_ids_start_at_one(store: InMemoryStore) {
    let first = seed_user(&store, "a@x.io").await;
    let second = seed_user(&store, "b@x.io").await;
    assert_eq!(first.id().get(), 1);
    assert_eq!(second.id().get(), 2);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(store: InMemoryStore) {
    seed_user(&store, "a@x.io").await;
    let error = UserRepository::insert(&store, &new_user("a@x.io"))
        .await
        .expect_err("duplicate email");
    assert_eq!(crate::domain::Error::from(error).code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_updates_rosters_voters_and_roles(store: InMemoryStore) {
    let ada = seed_user(&store, "a@x.io").await;
    let bob = seed_user(&store, "b@x.io").await;
    let club = seed_association(&store, &[ada.id(), bob.id()]).await;
    let role = Role::new(bob.id(), club.id(), RoleName::new("Chair").expect("valid role"));
    RoleRepository::upsert(&store, &role).await.expect("upsert");
    let kept = Role::new(ada.id(), club.id(), RoleName::new("Treasurer").expect("valid role"));
    RoleRepository::upsert(&store, &kept).await.expect("upsert");
    let minute = MinuteRepository::insert(
        &store,
        &NewMinute {
            association_id: club.id(),
            content: MinuteContent::new("Vote").expect("valid content"),
            date: date("2021-01-01"),
            voter_ids: vec![ada.id(), bob.id()],
        },
    )
    .await
    .expect("minute insert");

    assert!(UserRepository::delete(&store, bob.id()).await.expect("delete"));

    let club = AssociationRepository::find_by_id(&store, club.id())
        .await
        .expect("lookup")
        .expect("association exists");
    assert_eq!(club.member_ids().collect::<Vec<_>>(), vec![ada.id()]);
    let minute = MinuteRepository::find_by_id(&store, minute.id())
        .await
        .expect("lookup")
        .expect("minute exists");
    assert_eq!(minute.voters().len(), 1);
    assert!(RoleRepository::find(&store, role.key()).await.expect("lookup").is_none());
    assert!(RoleRepository::find(&store, kept.key()).await.expect("lookup").is_some());
}

#[rstest]
#[tokio::test]
async fn unknown_member_ids_are_not_stored(store: InMemoryStore) {
    let ada = seed_user(&store, "a@x.io").await;
    let ghost = UserId::new(77).expect("valid id");
    let club = seed_association(&store, &[ada.id(), ghost]).await;
    assert!(!club.has_member(ghost));
}

#[rstest]
#[tokio::test]
async fn replace_of_missing_rows_returns_none(store: InMemoryStore) {
    let missing_association = AssociationId::new(9).expect("valid id");
    let fields = NewAssociation::new(AssociationName::new("X").expect("valid name"), []);
    assert!(
        AssociationRepository::replace(&store, missing_association, &fields)
            .await
            .expect("replace")
            .is_none()
    );

    let missing_event = EventId::new(9).expect("valid id");
    assert!(
        EventRepository::replace(&store, missing_event, &new_event(1, "X"))
            .await
            .expect("replace")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn delete_many_counts_only_existing_rows(store: InMemoryStore) {
    let ada = seed_user(&store, "a@x.io").await;
    let club = seed_association(&store, &[ada.id()]).await;
    let role = Role::new(ada.id(), club.id(), RoleName::member());
    RoleRepository::upsert(&store, &role).await.expect("upsert");
    let absent = RoleKey::new(UserId::new(50).expect("valid id"), club.id());

    let removed = RoleRepository::delete_many(&store, &[role.key(), absent])
        .await
        .expect("delete many");
    assert_eq!(removed, 1);
    let again = RoleRepository::delete_many(&store, &[role.key()])
        .await
        .expect("delete many");
    assert_eq!(again, 0);
}
