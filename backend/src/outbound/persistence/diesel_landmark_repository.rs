//! PostgreSQL-backed `LandmarkRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LandmarkRepository, RepositoryError};
use crate::domain::{Landmark, LandmarkDraft, LandmarkId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LandmarkRow, LandmarkRowUpdate, NewLandmarkRow};
use super::pool::DbPool;
use super::schema::landmarks;

/// Diesel-backed implementation of the `LandmarkRepository` port.
#[derive(Clone)]
pub struct DieselLandmarkRepository {
    pool: DbPool,
}

impl DieselLandmarkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LandmarkRepository for DieselLandmarkRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &LandmarkDraft,
    ) -> Result<Landmark, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewLandmarkRow {
            name: draft.name(),
            description: &draft.description,
            location: &draft.location,
            country: &draft.country,
            image_url: &draft.image_url,
            user_id: owner.value(),
        };

        let row: LandmarkRow = diesel::insert_into(landmarks::table)
            .values(&new_row)
            .returning(LandmarkRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Landmark>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LandmarkRow> = landmarks::table
            .order(landmarks::id.asc())
            .select(LandmarkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: LandmarkId) -> Result<Option<Landmark>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LandmarkRow> = landmarks::table
            .find(id.value())
            .select(LandmarkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<Landmark>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LandmarkRow> = landmarks::table
            .filter(landmarks::user_id.eq(user.value()))
            .order(landmarks::id.asc())
            .select(LandmarkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<Landmark>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LandmarkRow> = landmarks::table
            .filter(landmarks::country.eq(country))
            .order(landmarks::id.asc())
            .select(LandmarkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: LandmarkId,
        draft: &LandmarkDraft,
    ) -> Result<Option<Landmark>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = LandmarkRowUpdate {
            name: draft.name(),
            description: &draft.description,
            location: &draft.location,
            country: &draft.country,
            image_url: &draft.image_url,
        };

        let row: Option<LandmarkRow> = diesel::update(landmarks::table.find(id.value()))
            .set(&changeset)
            .returning(LandmarkRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: LandmarkId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(landmarks::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
