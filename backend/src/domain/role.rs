//! Per-(user, association) role records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssociationId, AssociationSummary, User, UserId};

/// Role name implied for members without an explicit role.
pub const DEFAULT_ROLE_NAME: &str = "member";

const ROLE_NAME_MAX: usize = 64;

/// Validation errors raised by role value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleValidationError {
    /// Name was blank.
    #[error("role name must not be empty")]
    EmptyName,
    /// Name exceeded the maximum length.
    #[error("role name must be at most {max} characters")]
    NameTooLong {
        /// Maximum length.
        max: usize,
    },
}

/// Free-text role title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Secretary")]
pub struct RoleName(String);

impl RoleName {
    /// Validate a role name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RoleValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RoleValidationError::EmptyName);
        }
        if trimmed.chars().count() > ROLE_NAME_MAX {
            return Err(RoleValidationError::NameTooLong { max: ROLE_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The implicit `member` role.
    #[must_use]
    pub fn member() -> Self {
        Self(DEFAULT_ROLE_NAME.to_owned())
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Composite key of a role row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleKey {
    /// Holder of the role.
    pub user_id: UserId,
    /// Association the role applies to.
    pub association_id: AssociationId,
}

impl RoleKey {
    /// Build a key.
    #[must_use]
    pub const fn new(user_id: UserId, association_id: AssociationId) -> Self {
        Self {
            user_id,
            association_id,
        }
    }
}

/// Role row keyed by (user, association).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    user_id: UserId,
    association_id: AssociationId,
    name: RoleName,
}

impl Role {
    /// Build a role row.
    #[must_use]
    pub const fn new(user_id: UserId, association_id: AssociationId, name: RoleName) -> Self {
        Self {
            user_id,
            association_id,
            name,
        }
    }

    /// Holder of the role.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Association the role applies to.
    #[must_use]
    pub const fn association_id(&self) -> AssociationId {
        self.association_id
    }

    /// Composite key.
    #[must_use]
    pub const fn key(&self) -> RoleKey {
        RoleKey::new(self.user_id, self.association_id)
    }

    /// Role title.
    #[must_use]
    pub const fn name(&self) -> &RoleName {
        &self.name
    }

    /// Replace the role title.
    pub fn rename(&mut self, name: RoleName) {
        self.name = name;
    }
}

/// Role with its user and association resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRole {
    /// Role title.
    pub name: RoleName,
    /// Holder of the role.
    pub user: User,
    /// Association the role applies to.
    pub association: AssociationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn member_is_the_default_name() {
        assert_eq!(RoleName::member().as_ref(), DEFAULT_ROLE_NAME);
    }

    #[rstest]
    #[case(" President ", Some("President"))]
    #[case("", None)]
    #[case("\t", None)]
    fn names_are_trimmed(#[case] raw: &str, #[case] expected: Option<&str>) {
        let parsed = RoleName::new(raw).ok();
        assert_eq!(parsed.as_ref().map(AsRef::as_ref), expected);
    }

    #[rstest]
    fn serialises_with_camel_case_keys() {
        let role = Role::new(
            UserId::new(7).expect("valid id"),
            AssociationId::new(1).expect("valid id"),
            RoleName::new("President").expect("role name"),
        );
        let value = serde_json::to_value(role).expect("serialise role");
        assert_eq!(
            value,
            serde_json::json!({ "userId": 7, "associationId": 1, "name": "President" })
        );
    }
}
