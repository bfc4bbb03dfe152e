//! PostgreSQL-backed `RoleRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RoleRepository, RoleRepositoryError};
use crate::domain::{AssociationId, Role, RoleKey, RoleName, UserId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{NewRoleRow, RoleRow};
use super::pool::DbPool;
use super::schema::roles;

basic_error_mappers!(RoleRepositoryError);

fn to_roles(rows: Vec<RoleRow>) -> Result<Vec<Role>, RoleRepositoryError> {
    rows.into_iter()
        .map(|row| Role::try_from(row).map_err(map_row_error))
        .collect()
}

/// Diesel-backed implementation of the role repository port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn upsert(&self, role: &Role) -> Result<(), RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(roles::table)
            .values(NewRoleRow::from(role))
            .on_conflict((roles::user_id, roles::association_id))
            .do_update()
            .set(roles::name.eq(excluded(roles::name)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, key: RoleKey) -> Result<Option<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = roles::table
            .find((key.user_id.get(), key.association_id.get()))
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Role::try_from(row).map_err(map_row_error))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = roles::table
            .order((roles::association_id.asc(), roles::user_id.asc()))
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_roles(rows)
    }

    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = roles::table
            .filter(roles::association_id.eq(association_id.get()))
            .order(roles::user_id.asc())
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_roles(rows)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = roles::table
            .filter(roles::user_id.eq(user_id.get()))
            .order(roles::association_id.asc())
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_roles(rows)
    }

    async fn list_by_name(&self, name: &RoleName) -> Result<Vec<Role>, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = roles::table
            .filter(roles::name.eq(name.as_ref()))
            .order((roles::association_id.asc(), roles::user_id.asc()))
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_roles(rows)
    }

    async fn delete(&self, key: RoleKey) -> Result<bool, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(roles::table.find((key.user_id.get(), key.association_id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, keys: &[RoleKey]) -> Result<u64, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut removed = 0_u64;
        for key in keys {
            let count = diesel::delete(
                roles::table.find((key.user_id.get(), key.association_id.get())),
            )
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
            removed += u64::try_from(count).unwrap_or_default();
        }
        Ok(removed)
    }
}
