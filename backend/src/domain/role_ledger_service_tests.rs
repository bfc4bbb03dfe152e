//! Tests for the role ledger service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockAssociationRepository, MockRoleRepository, MockUserRepository};
use crate::domain::test_fixtures::{association, association_id, user, user_id};
use crate::domain::ErrorCode;

struct Mocks {
    roles: MockRoleRepository,
    users: MockUserRepository,
    associations: MockAssociationRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            roles: MockRoleRepository::new(),
            users: MockUserRepository::new(),
            associations: MockAssociationRepository::new(),
        }
    }

    fn into_service(self) -> RoleLedgerService {
        RoleLedgerService::new(
            Arc::new(self.roles),
            Arc::new(self.users),
            Arc::new(self.associations),
        )
    }
}

fn role_name(raw: &str) -> RoleName {
    RoleName::new(raw).expect("valid role name")
}

fn key(user: i32, association: i32) -> RoleKey {
    RoleKey::new(user_id(user), association_id(association))
}

#[tokio::test]
async fn create_requires_existing_user() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));
    mocks.roles.expect_upsert().times(0);

    let error = mocks
        .into_service()
        .create(key(1, 1), role_name("President"))
        .await
        .expect_err("unknown user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn create_requires_existing_association() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1, "a@x.io"))));
    mocks
        .associations
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    mocks.roles.expect_upsert().times(0);

    let error = mocks
        .into_service()
        .create(key(1, 1), role_name("President"))
        .await
        .expect_err("unknown association");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn create_upserts_role() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1, "a@x.io"))));
    mocks
        .associations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(association(2, "Club", Vec::new()))));
    mocks
        .roles
        .expect_upsert()
        .times(1)
        .withf(|role| role.name().as_ref() == "Treasurer")
        .return_once(|_| Ok(()));

    let role = mocks
        .into_service()
        .create(key(1, 2), role_name("Treasurer"))
        .await
        .expect("create succeeds");
    assert_eq!(role.key(), key(1, 2));
}

#[tokio::test]
async fn find_by_association_skips_orphaned_holders() {
    let mut mocks = Mocks::new();
    mocks
        .associations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(association(2, "Club", vec![user(1, "a@x.io")]))));
    mocks.roles.expect_list_for_association().return_once(|_| {
        Ok(vec![
            Role::new(user_id(1), association_id(2), role_name("Chair")),
            Role::new(user_id(7), association_id(2), role_name("Ghost")),
        ])
    });
    mocks
        .users
        .expect_find_many_by_id()
        .return_once(|_| Ok(vec![user(1, "a@x.io")]));

    let resolved = mocks
        .into_service()
        .find_by_association(association_id(2))
        .await
        .expect("lookup succeeds");

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name.as_ref(), "Chair");
    assert_eq!(resolved[0].association.name.as_ref(), "Club");
}

#[tokio::test]
async fn update_missing_role_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.roles.expect_find().return_once(|_| Ok(None));
    mocks.roles.expect_upsert().times(0);

    let error = mocks
        .into_service()
        .update(key(1, 1), role_name("Chair"))
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn remove_returns_deleted_role() {
    let mut mocks = Mocks::new();
    mocks
        .roles
        .expect_find()
        .return_once(|key| Ok(Some(Role::new(key.user_id, key.association_id, role_name("Chair")))));
    mocks.roles.expect_delete().return_once(|_| Ok(true));

    let removed = mocks
        .into_service()
        .remove(key(3, 4))
        .await
        .expect("remove succeeds");
    assert_eq!(removed.name().as_ref(), "Chair");
}

#[tokio::test]
async fn delete_many_with_no_keys_skips_storage() {
    let mut mocks = Mocks::new();
    mocks.roles.expect_delete_many().times(0);

    let removed = mocks
        .into_service()
        .delete_many(&[])
        .await
        .expect("no-op succeeds");
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn users_by_role_name_are_resolved_once() {
    let mut mocks = Mocks::new();
    mocks.roles.expect_list_by_name().return_once(|_| {
        Ok(vec![
            Role::new(user_id(1), association_id(1), role_name("Chair")),
            Role::new(user_id(1), association_id(2), role_name("Chair")),
        ])
    });
    mocks
        .users
        .expect_find_many_by_id()
        .withf(|ids| ids.to_vec() == vec![user_id(1)])
        .return_once(|_| Ok(vec![user(1, "a@x.io")]));

    let holders = mocks
        .into_service()
        .find_users_by_role_name(&role_name("Chair"))
        .await
        .expect("lookup succeeds");
    assert_eq!(holders.len(), 1);
}
