//! PostgreSQL-backed `AssociationRepository` implementation using Diesel ORM.
//!
//! Rosters live in `association_members`. Writes replace the roster inside a
//! single transaction so readers never observe a half-written membership.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AssociationRepository, AssociationRepositoryError};
use crate::domain::{Association, AssociationId, NewAssociation, User, UserId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{AssociationRow, MemberRow, NewAssociationRow, UserRow};
use super::pool::DbPool;
use super::schema::{association_members, associations, users};

basic_error_mappers!(AssociationRepositoryError);

type MemberLink = (i32, UserRow);

async fn load_members(
    conn: &mut AsyncPgConnection,
    association_ids: &[i32],
) -> QueryResult<Vec<MemberLink>> {
    if association_ids.is_empty() {
        return Ok(Vec::new());
    }
    association_members::table
        .inner_join(users::table)
        .filter(association_members::association_id.eq_any(association_ids.to_vec()))
        .order((association_members::association_id.asc(), users::id.asc()))
        .select((association_members::association_id, UserRow::as_select()))
        .load(conn)
        .await
}

async fn write_roster(
    conn: &mut AsyncPgConnection,
    association_id: i32,
    member_ids: &[UserId],
) -> QueryResult<()> {
    diesel::delete(
        association_members::table.filter(association_members::association_id.eq(association_id)),
    )
    .execute(conn)
    .await?;
    if member_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<MemberRow> = member_ids
        .iter()
        .map(|user_id| MemberRow {
            association_id,
            user_id: user_id.get(),
        })
        .collect();
    diesel::insert_into(association_members::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

async fn load_many(
    conn: &mut AsyncPgConnection,
    rows: Vec<AssociationRow>,
) -> Result<Vec<Association>, AssociationRepositoryError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let links = load_members(conn, &ids).await.map_err(map_diesel_error)?;
    assemble(rows, links)
}

fn assemble(
    rows: Vec<AssociationRow>,
    links: Vec<MemberLink>,
) -> Result<Vec<Association>, AssociationRepositoryError> {
    let mut members: Vec<(i32, User)> = Vec::with_capacity(links.len());
    for (association_id, row) in links {
        members.push((association_id, User::try_from(row).map_err(map_row_error)?));
    }
    rows.into_iter()
        .map(|row| {
            let (id, name) = row.parts().map_err(map_row_error)?;
            let roster = members
                .iter()
                .filter(|(owner, _)| *owner == row.id)
                .map(|(_, user)| user.clone())
                .collect();
            Ok(Association::new(id, name, roster))
        })
        .collect()
}

fn single(mut associations: Vec<Association>) -> Option<Association> {
    associations.pop()
}

/// Diesel-backed implementation of the association repository port.
#[derive(Clone)]
pub struct DieselAssociationRepository {
    pool: DbPool,
}

impl DieselAssociationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationRepository for DieselAssociationRepository {
    async fn insert(
        &self,
        association: &NewAssociation,
    ) -> Result<Association, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: AssociationRow = diesel::insert_into(associations::table)
                        .values(NewAssociationRow {
                            name: association.name.as_ref(),
                        })
                        .returning(AssociationRow::as_returning())
                        .get_result(conn)
                        .await?;
                    write_roster(conn, row.id, &association.member_ids).await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        single(load_many(&mut conn, vec![row]).await?)
            .ok_or_else(|| AssociationRepositoryError::query("inserted association vanished"))
    }

    async fn replace(
        &self,
        id: AssociationId,
        association: &NewAssociation,
    ) -> Result<Option<Association>, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: Option<AssociationRow> =
                        diesel::update(associations::table.find(id.get()))
                            .set(NewAssociationRow {
                                name: association.name.as_ref(),
                            })
                            .returning(AssociationRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;
                    if let Some(row) = &row {
                        write_roster(conn, row.id, &association.member_ids).await?;
                    }
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(single(load_many(&mut conn, vec![row]).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(
        &self,
        id: AssociationId,
    ) -> Result<Option<Association>, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = associations::table
            .find(id.get())
            .select(AssociationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(single(load_many(&mut conn, vec![row]).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Association>, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = associations::table
            .order(associations::id.asc())
            .select(AssociationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_many(&mut conn, rows).await
    }

    async fn list_for_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Association>, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = associations::table
            .inner_join(association_members::table)
            .filter(association_members::user_id.eq(user_id.get()))
            .order(associations::id.asc())
            .select(AssociationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_many(&mut conn, rows).await
    }

    async fn delete(&self, id: AssociationId) -> Result<bool, AssociationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(associations::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn association(id: i32, name: &str) -> AssociationRow {
        AssociationRow {
            id,
            name: name.to_owned(),
        }
    }

    fn user(id: i32) -> UserRow {
        UserRow {
            id,
            email: format!("member{id}@example.org"),
            firstname: "Member".to_owned(),
            lastname: format!("No{id}"),
            age: 30,
            password_hash: "$argon2id$stub".to_owned(),
            verified: true,
            verification_token: format!("token-{id}"),
        }
    }

    fn member_ids(association: &Association) -> Vec<i32> {
        association.member_ids().map(|id| id.get()).collect()
    }

    #[rstest]
    fn members_are_grouped_under_their_association() {
        let rows = vec![association(1, "Club"), association(2, "Choir")];
        let links = vec![(1, user(10)), (2, user(20)), (1, user(11))];

        let assembled = assemble(rows, links).expect("valid rows");

        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].name().as_ref(), "Club");
        assert_eq!(member_ids(&assembled[0]), vec![10, 11]);
        assert_eq!(assembled[1].name().as_ref(), "Choir");
        assert_eq!(member_ids(&assembled[1]), vec![20]);
    }

    #[rstest]
    fn associations_without_links_have_empty_rosters() {
        let assembled = assemble(vec![association(3, "Quiet")], Vec::new()).expect("valid rows");
        assert!(assembled[0].members().is_empty());
    }

    #[rstest]
    fn links_to_unlisted_associations_are_ignored() {
        let assembled =
            assemble(vec![association(1, "Club")], vec![(9, user(10))]).expect("valid rows");
        assert!(assembled[0].members().is_empty());
    }

    #[rstest]
    #[case(vec![association(1, "   ")], Vec::new())]
    #[case(vec![association(0, "Club")], Vec::new())]
    #[case(vec![association(1, "Club")], vec![(1, UserRow { age: -1, ..user(10) })])]
    fn invalid_stored_rows_surface_as_query_errors(
        #[case] rows: Vec<AssociationRow>,
        #[case] links: Vec<MemberLink>,
    ) {
        let err = assemble(rows, links).expect_err("invalid row");
        assert!(matches!(err, AssociationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn single_takes_the_only_association() {
        let assembled = assemble(vec![association(1, "Club")], Vec::new()).expect("valid rows");
        assert_eq!(single(assembled).map(|a| a.id().get()), Some(1));
        assert!(single(Vec::new()).is_none());
    }
}
