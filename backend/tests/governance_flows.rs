//! End-to-end behaviour of the governance services over the in-memory store.

use std::sync::{Arc, Mutex};

use association_hub::domain::ports::{
    AssociationRegistry, CreateAssociationRequest, EventScheduler, MembershipCoordinator,
    MinuteLedger, NotificationPublisher, NotificationPublisherError, RegisterUserRequest,
    RoleLedger, UpdateAssociationRequest, UserDirectory,
};
use association_hub::domain::{
    Age, Association, AssociationId, AssociationName, AssociationRegistryService, Email,
    ErrorCode, EventName, EventSchedulerService, MembershipService, MinuteContent,
    MinuteLedgerService, MinuteOrdering, MinuteSortField, NewEvent, NewMinute, Notification,
    Password, PersonName, RoleKey, RoleLedgerService, RoleName, SortOrder, User,
    UserDirectoryService, UserId,
};
use association_hub::outbound::credentials::Argon2CredentialHasher;
use association_hub::outbound::memory::InMemoryStore;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

#[derive(Default)]
struct RecordingPublisher {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingPublisher {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("publisher lock").clone()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationPublisherError> {
        self.sent
            .lock()
            .expect("publisher lock")
            .push(notification.clone());
        Ok(())
    }
}

struct Hub {
    users: UserDirectoryService,
    associations: Arc<AssociationRegistryService>,
    roles: Arc<RoleLedgerService>,
    minutes: MinuteLedgerService,
    events: EventSchedulerService,
    membership: MembershipService,
    publisher: Arc<RecordingPublisher>,
}

#[fixture]
fn hub() -> Hub {
    let store = Arc::new(InMemoryStore::new());
    let publisher = Arc::new(RecordingPublisher::default());
    let associations = Arc::new(AssociationRegistryService::new(store.clone(), store.clone()));
    let roles = Arc::new(RoleLedgerService::new(store.clone(), store.clone(), store.clone()));
    Hub {
        users: UserDirectoryService::new(
            store.clone(),
            Arc::new(Argon2CredentialHasher::new()),
            publisher.clone(),
            None,
        ),
        membership: MembershipService::new(associations.clone(), roles.clone()),
        associations,
        roles,
        minutes: MinuteLedgerService::new(store.clone(), store.clone(), store.clone()),
        events: EventSchedulerService::new(store.clone(), store, publisher.clone()),
        publisher,
    }
}

impl Hub {
    async fn register(&self, first: &str, email: &str) -> User {
        self.users
            .register(RegisterUserRequest {
                email: Email::new(email).expect("valid email"),
                firstname: PersonName::new(first, "firstname").expect("valid name"),
                lastname: PersonName::new("Tester", "lastname").expect("valid name"),
                age: Age::new(30).expect("valid age"),
                password: Password::new("secret").expect("valid password"),
            })
            .await
            .expect("registration succeeds")
    }

    async fn club(&self, members: &[UserId]) -> Association {
        self.associations
            .create(CreateAssociationRequest {
                name: AssociationName::new("Club").expect("valid name"),
                member_ids: members.to_vec(),
            })
            .await
            .expect("association created")
    }

    async fn assign(&self, user: UserId, association: AssociationId, name: &str) {
        self.roles
            .create(
                RoleKey::new(user, association),
                RoleName::new(name).expect("valid role name"),
            )
            .await
            .expect("role created");
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

fn unknown_user() -> UserId {
    UserId::new(9_999).expect("valid id")
}

#[rstest]
#[tokio::test]
async fn shrinking_the_roster_removes_orphaned_roles(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;
    let bob = hub.register("Bob", "bob@example.org").await;
    let club = hub.club(&[ada.id(), bob.id()]).await;
    hub.assign(ada.id(), club.id(), "President").await;
    hub.assign(bob.id(), club.id(), "Secretary").await;

    let view = hub
        .membership
        .update_membership(
            club.id(),
            UpdateAssociationRequest {
                name: None,
                member_ids: Some(vec![ada.id()]),
            },
        )
        .await
        .expect("membership updated");

    let members: Vec<(UserId, &str)> = view
        .members
        .iter()
        .map(|member| (member.id, member.role.as_str()))
        .collect();
    assert_eq!(members, vec![(ada.id(), "President")]);

    let err = hub
        .roles
        .find_one(RoleKey::new(bob.id(), club.id()))
        .await
        .expect_err("removed member keeps no role");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let report = hub.membership.reconcile(club.id()).await.expect("reconcile");
    assert!(report.orphaned.is_empty());
    assert_eq!(report.removed, 0);
}

#[rstest]
#[tokio::test]
async fn creating_an_association_drops_unknown_members(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;

    let club = hub.club(&[ada.id(), unknown_user(), ada.id()]).await;

    let ids: Vec<UserId> = club.member_ids().collect();
    assert_eq!(ids, vec![ada.id()]);
    let mine = hub
        .associations
        .associations_for(ada.id())
        .await
        .expect("lookup by member");
    assert_eq!(mine.len(), 1);
}

#[rstest]
#[tokio::test]
async fn minutes_list_in_the_requested_order(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;
    let club = hub.club(&[ada.id()]).await;
    let entries = [
        ("first", "2021-01-01"),
        ("third", "2021-03-01"),
        ("second", "2021-02-01"),
    ];
    for (content, day) in entries {
        hub.minutes
            .create(NewMinute {
                association_id: club.id(),
                content: MinuteContent::new(content).expect("valid content"),
                date: date(day),
                voter_ids: vec![ada.id()],
            })
            .await
            .expect("minute created");
    }

    let newest_first = hub
        .minutes
        .find_for_association(club.id(), MinuteOrdering::default())
        .await
        .expect("minutes listed");
    let contents: Vec<&str> = newest_first.iter().map(|m| m.content().as_ref()).collect();
    assert_eq!(contents, vec!["third", "second", "first"]);

    let by_content = hub
        .minutes
        .find_for_association(
            club.id(),
            MinuteOrdering::new(MinuteSortField::Content, SortOrder::Asc),
        )
        .await
        .expect("minutes listed");
    let contents: Vec<&str> = by_content.iter().map(|m| m.content().as_ref()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[rstest]
#[tokio::test]
async fn minute_with_unknown_voter_is_not_stored(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;
    let club = hub.club(&[ada.id()]).await;

    let err = hub
        .minutes
        .create(NewMinute {
            association_id: club.id(),
            content: MinuteContent::new("Budget approved").expect("valid content"),
            date: date("2021-05-01"),
            voter_ids: vec![ada.id(), unknown_user()],
        })
        .await
        .expect_err("unknown voter rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(hub.minutes.find_all().await.expect("minutes listed").is_empty());
}

#[rstest]
#[tokio::test]
async fn scheduling_an_event_notifies_current_members(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;
    let bob = hub.register("Bob", "bob@example.org").await;
    let club = hub.club(&[ada.id(), bob.id()]).await;
    let start = Utc
        .with_ymd_and_hms(2021, 6, 1, 18, 0, 0)
        .single()
        .expect("valid instant");

    let event = hub
        .events
        .create(NewEvent {
            name: EventName::new("General assembly").expect("valid name"),
            start,
            end: start,
            association_id: club.id(),
        })
        .await
        .expect("event scheduled");

    assert_eq!(event.association_id(), club.id());
    let sent = hub.publisher.sent();
    let [Notification::EventCreated(payload)] = sent.as_slice() else {
        panic!("expected one event notification, got {sent:?}");
    };
    assert_eq!(payload.association_name, "Club");
    assert_eq!(
        payload.attendees_emails,
        vec!["ada@example.org".to_owned(), "bob@example.org".to_owned()]
    );
}

#[rstest]
#[tokio::test]
async fn roles_round_trip_through_the_ledger(hub: Hub) {
    let ada = hub.register("Ada", "ada@example.org").await;
    let club = hub.club(&[ada.id()]).await;
    let key = RoleKey::new(ada.id(), club.id());
    hub.assign(ada.id(), club.id(), "Treasurer").await;

    let renamed = hub
        .roles
        .update(key, RoleName::new("President").expect("valid role name"))
        .await
        .expect("role renamed");
    assert_eq!(renamed.name().as_ref(), "President");

    let holders = hub
        .roles
        .find_users_by_role_name(&RoleName::new("President").expect("valid role name"))
        .await
        .expect("lookup by name");
    assert_eq!(holders.iter().map(User::id).collect::<Vec<_>>(), vec![ada.id()]);

    hub.roles.remove(key).await.expect("role removed");
    let err = hub.roles.find_one(key).await.expect_err("role gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn missing_association_lookups_report_not_found(hub: Hub) {
    let id = AssociationId::new(404).expect("valid id");
    let err = hub.associations.get(id).await.expect_err("no association");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = hub.membership.view(id).await.expect_err("no view");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = hub.associations.delete(id).await.expect_err("nothing to delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
