//! PostgreSQL-backed `MinuteRepository` implementation using Diesel ORM.
//!
//! Voters live in `minute_voters`; a minute and its voter links are written
//! in one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{MinuteRepository, MinuteRepositoryError};
use crate::domain::{AssociationId, Minute, MinuteId, NewMinute, User};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{MinuteRow, NewMinuteRow, UserRow, VoterRow};
use super::pool::DbPool;
use super::schema::{minute_voters, minutes, users};

basic_error_mappers!(MinuteRepositoryError);

type VoterLink = (i32, UserRow);

fn minute_row(minute: &NewMinute) -> NewMinuteRow<'_> {
    NewMinuteRow {
        association_id: minute.association_id.get(),
        content: minute.content.as_ref(),
        meeting_date: minute.date,
    }
}

async fn write_voters(
    conn: &mut AsyncPgConnection,
    minute_id: i32,
    minute: &NewMinute,
) -> QueryResult<()> {
    diesel::delete(minute_voters::table.filter(minute_voters::minute_id.eq(minute_id)))
        .execute(conn)
        .await?;
    if minute.voter_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<VoterRow> = minute
        .voter_ids
        .iter()
        .map(|user_id| VoterRow {
            minute_id,
            user_id: user_id.get(),
        })
        .collect();
    diesel::insert_into(minute_voters::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

async fn load_many(
    conn: &mut AsyncPgConnection,
    rows: Vec<MinuteRow>,
) -> Result<Vec<Minute>, MinuteRepositoryError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let links: Vec<VoterLink> = if ids.is_empty() {
        Vec::new()
    } else {
        minute_voters::table
            .inner_join(users::table)
            .filter(minute_voters::minute_id.eq_any(ids))
            .order((minute_voters::minute_id.asc(), users::id.asc()))
            .select((minute_voters::minute_id, UserRow::as_select()))
            .load(conn)
            .await
            .map_err(map_diesel_error)?
    };
    assemble(rows, links)
}

fn assemble(
    rows: Vec<MinuteRow>,
    links: Vec<VoterLink>,
) -> Result<Vec<Minute>, MinuteRepositoryError> {
    let mut voters: Vec<(i32, User)> = Vec::with_capacity(links.len());
    for (minute_id, row) in links {
        voters.push((minute_id, User::try_from(row).map_err(map_row_error)?));
    }
    rows.into_iter()
        .map(|row| {
            let (id, association_id, content) = row.parts().map_err(map_row_error)?;
            let roster: Vec<User> = voters
                .iter()
                .filter(|(owner, _)| *owner == row.id)
                .map(|(_, user)| user.clone())
                .collect();
            let fields = NewMinute {
                association_id,
                content,
                date: row.meeting_date,
                voter_ids: roster.iter().map(User::id).collect(),
            };
            Ok(Minute::from_parts(id, fields, roster))
        })
        .collect()
}

/// Diesel-backed implementation of the minute repository port.
#[derive(Clone)]
pub struct DieselMinuteRepository {
    pool: DbPool,
}

impl DieselMinuteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MinuteRepository for DieselMinuteRepository {
    async fn insert(&self, minute: &NewMinute) -> Result<Minute, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: MinuteRow = diesel::insert_into(minutes::table)
                        .values(minute_row(minute))
                        .returning(MinuteRow::as_returning())
                        .get_result(conn)
                        .await?;
                    write_voters(conn, row.id, minute).await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        load_many(&mut conn, vec![row])
            .await?
            .pop()
            .ok_or_else(|| MinuteRepositoryError::query("inserted minute vanished"))
    }

    async fn replace(
        &self,
        id: MinuteId,
        minute: &NewMinute,
    ) -> Result<Option<Minute>, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: Option<MinuteRow> = diesel::update(minutes::table.find(id.get()))
                        .set(minute_row(minute))
                        .returning(MinuteRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                    if let Some(row) = &row {
                        write_voters(conn, row.id, minute).await?;
                    }
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(load_many(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: MinuteId) -> Result<Option<Minute>, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = minutes::table
            .find(id.get())
            .select(MinuteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(load_many(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Minute>, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = minutes::table
            .order(minutes::id.asc())
            .select(MinuteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_many(&mut conn, rows).await
    }

    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Minute>, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = minutes::table
            .filter(minutes::association_id.eq(association_id.get()))
            .order(minutes::id.asc())
            .select(MinuteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_many(&mut conn, rows).await
    }

    async fn delete(&self, id: MinuteId) -> Result<bool, MinuteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(minutes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
