//! Associations and their member rosters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssociationId, Role, RoleName, User, UserId};

const ASSOCIATION_NAME_MAX: usize = 128;

/// Validation errors raised by association value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssociationValidationError {
    /// Name was blank.
    #[error("association name must not be empty")]
    EmptyName,
    /// Name exceeded the maximum length.
    #[error("association name must be at most {max} characters")]
    NameTooLong {
        /// Maximum length.
        max: usize,
    },
}

/// Display name of an association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Chess Club")]
pub struct AssociationName(String);

impl AssociationName {
    /// Validate an association name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AssociationValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AssociationValidationError::EmptyName);
        }
        if trimmed.chars().count() > ASSOCIATION_NAME_MAX {
            return Err(AssociationValidationError::NameTooLong {
                max: ASSOCIATION_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AssociationName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Keep the first occurrence of each id, preserving order.
pub(crate) fn dedup_ids(ids: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Fields required to store an association with an already-resolved roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssociation {
    /// Display name.
    pub name: AssociationName,
    /// Resolved member ids, without duplicates.
    pub member_ids: Vec<UserId>,
}

impl NewAssociation {
    /// Build the record, collapsing duplicate member ids.
    pub fn new(name: AssociationName, member_ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            name,
            member_ids: dedup_ids(member_ids),
        }
    }
}

/// Association with its roster resolved to users.
///
/// ## Invariants
/// - `members` holds no duplicate user ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Association {
    id: AssociationId,
    name: AssociationName,
    members: Vec<User>,
}

impl Association {
    /// Assemble an association, dropping repeated members.
    #[must_use]
    pub fn new(id: AssociationId, name: AssociationName, members: Vec<User>) -> Self {
        let mut seen = HashSet::new();
        let members = members
            .into_iter()
            .filter(|user| seen.insert(user.id()))
            .collect();
        Self { id, name, members }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> AssociationId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &AssociationName {
        &self.name
    }

    /// Resolved members.
    #[must_use]
    pub fn members(&self) -> &[User] {
        &self.members
    }

    /// Ids of the current members.
    pub fn member_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.members.iter().map(User::id)
    }

    /// Whether `user_id` is on the roster.
    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|user| user.id() == user_id)
    }

    /// Id and name only.
    #[must_use]
    pub fn summary(&self) -> AssociationSummary {
        AssociationSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Join the roster with role names, defaulting to `member`.
    #[must_use]
    pub fn view(&self, roles: &[Role]) -> AssociationView {
        AssociationView {
            id: self.id,
            name: self.name.clone(),
            members: member_views(self, roles),
        }
    }
}

/// Association reference without the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssociationSummary {
    /// Stable identifier.
    pub id: AssociationId,
    /// Display name.
    pub name: AssociationName,
}

/// Member of an association together with their role there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssociationMember {
    /// User id.
    pub id: UserId,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Age in years.
    pub age: u16,
    /// Role name, `member` when no role was assigned.
    #[schema(example = "President")]
    pub role: String,
}

/// Association with members annotated by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssociationView {
    /// Stable identifier.
    pub id: AssociationId,
    /// Display name.
    pub name: AssociationName,
    /// Members with role names.
    pub members: Vec<AssociationMember>,
}

/// Annotate each member of `association` with their role name.
#[must_use]
pub fn member_views(association: &Association, roles: &[Role]) -> Vec<AssociationMember> {
    association
        .members()
        .iter()
        .map(|user| {
            let role = roles
                .iter()
                .find(|role| {
                    role.user_id() == user.id() && role.association_id() == association.id()
                })
                .map_or_else(RoleName::member, |role| role.name().clone());
            AssociationMember {
                id: user.id(),
                firstname: user.firstname().as_ref().to_owned(),
                lastname: user.lastname().as_ref().to_owned(),
                age: user.age().years(),
                role: role.as_ref().to_owned(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{association_id, user};
    use rstest::rstest;

    #[rstest]
    fn new_association_collapses_duplicate_ids() {
        let ids = [7, 8, 7, 9, 8].map(|raw| UserId::new(raw).expect("valid id"));
        let record = NewAssociation::new(AssociationName::new("Club").expect("name"), ids);
        let raw: Vec<i32> = record.member_ids.iter().map(|id| id.get()).collect();
        assert_eq!(raw, vec![7, 8, 9]);
    }

    #[rstest]
    fn association_roster_has_no_duplicates() {
        let association = Association::new(
            association_id(1),
            AssociationName::new("Club").expect("name"),
            vec![user(7, "a@x.io"), user(8, "b@x.io"), user(7, "a@x.io")],
        );
        assert_eq!(association.members().len(), 2);
        assert!(association.has_member(UserId::new(8).expect("valid id")));
    }

    #[rstest]
    fn view_defaults_missing_roles_to_member() {
        let association = Association::new(
            association_id(1),
            AssociationName::new("Club").expect("name"),
            vec![user(7, "a@x.io"), user(8, "b@x.io")],
        );
        let roles = vec![Role::new(
            UserId::new(7).expect("valid id"),
            association_id(1),
            RoleName::new("President").expect("role name"),
        )];

        let view = association.view(&roles);
        let names: Vec<(i32, &str)> = view
            .members
            .iter()
            .map(|member| (member.id.get(), member.role.as_str()))
            .collect();
        assert_eq!(names, vec![(7, "President"), (8, "member")]);
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case(" Club ", true)]
    fn name_validation(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(AssociationName::new(raw).is_ok(), valid);
    }
}
