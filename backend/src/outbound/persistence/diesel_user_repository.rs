//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, NewUser, User, UserId, VerificationToken};

use super::diesel_basic_error_mapping::{FailureKind, basic_error_mappers, classify};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::{roles, users};

basic_error_mappers!(UserRepositoryError);

fn to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(map_row_error)
}

fn to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter().map(to_user).collect()
}

fn map_insert_error(error: diesel::result::Error, email: &Email) -> UserRepositoryError {
    match classify(&error) {
        FailureKind::UniqueViolation => UserRepositoryError::duplicate_email(email.as_ref()),
        _ => map_diesel_error(error),
    }
}

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_insert_error(error, &user.email))?;
        to_user(row)
    }

    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(user.id().get()))
            .set(UserUpdate::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn find_many_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::id.eq_any(raw))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_users(rows)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::verification_token.eq(token.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_users(rows)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = conn
            .transaction(|conn| {
                async move {
                    // Roles carry no foreign keys, so they go with the rosters here.
                    diesel::delete(roles::table.filter(roles::user_id.eq(id.get())))
                        .execute(conn)
                        .await?;
                    diesel::delete(users::table.find(id.get()))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::diesel_basic_error_mapping::test_support::database_error;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn email() -> Email {
        Email::new("ada@example.org").expect("valid email")
    }

    fn row(id: i32) -> UserRow {
        UserRow {
            id,
            email: "ada@example.org".to_owned(),
            firstname: "Ada".to_owned(),
            lastname: "Lovelace".to_owned(),
            age: 36,
            password_hash: "$argon2id$stub".to_owned(),
            verified: false,
            verification_token: "token".to_owned(),
        }
    }

    #[rstest]
    fn unique_violation_on_insert_is_a_duplicate_email(email: Email) {
        let mapped = map_insert_error(database_error(DatabaseErrorKind::UniqueViolation), &email);
        assert_eq!(
            mapped,
            UserRepositoryError::DuplicateEmail {
                email: "ada@example.org".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), true)]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation), false)]
    #[case(DieselError::NotFound, false)]
    fn other_insert_failures_keep_their_classification(
        email: Email,
        #[case] error: DieselError,
        #[case] is_connection: bool,
    ) {
        let mapped = map_insert_error(error, &email);
        assert_eq!(
            matches!(mapped, UserRepositoryError::Connection { .. }),
            is_connection
        );
        assert!(!matches!(mapped, UserRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    fn rows_convert_in_order() {
        let users = to_users(vec![row(1), row(2)]).expect("valid rows");
        let ids: Vec<i32> = users.iter().map(|user| user.id().get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    fn an_invalid_row_fails_the_whole_batch() {
        let err = to_users(vec![row(1), row(0)]).expect_err("id 0 is invalid");
        assert!(matches!(err, UserRepositoryError::Query { .. }));
        assert!(err.to_string().contains("stored row is invalid"));
    }
}
